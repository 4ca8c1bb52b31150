//! Server-to-client response payload builders.
//!
//! Each function produces one packet payload; framing (length prefix and
//! sequence id) is applied by the frame writer.

use bytes::{BufMut, Bytes, BytesMut};

use super::encode::{put_lenenc_int, put_lenenc_str};
use super::packet::capabilities::CLIENT_PROTOCOL_41;
use crate::result::Field;

/// Column definition catalog, always "def" in protocol 4.1
const CATALOG: &str = "def";

/// Default character set for column definitions (utf8_general_ci)
pub const DEFAULT_CHARSET: u8 = 0x21;

/// OK packet payload (header 0x00)
pub fn ok_payload(
    affected_rows: u64,
    last_insert_id: u64,
    status_flags: u16,
    warnings: u16,
    capabilities: u32,
) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_u8(0x00);
    put_lenenc_int(&mut buf, affected_rows);
    put_lenenc_int(&mut buf, last_insert_id);
    if capabilities & CLIENT_PROTOCOL_41 != 0 {
        buf.put_u16_le(status_flags);
        buf.put_u16_le(warnings);
    }
    buf.freeze()
}

/// OK packet payload with the 0xFE EOF header, the terminal packet shape
/// used in place of the legacy EOF when CLIENT_DEPRECATE_EOF is negotiated
pub fn ok_with_eof_header_payload(
    affected_rows: u64,
    last_insert_id: u64,
    status_flags: u16,
    warnings: u16,
    capabilities: u32,
) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_u8(0xFE);
    put_lenenc_int(&mut buf, affected_rows);
    put_lenenc_int(&mut buf, last_insert_id);
    if capabilities & CLIENT_PROTOCOL_41 != 0 {
        buf.put_u16_le(status_flags);
        buf.put_u16_le(warnings);
    }
    buf.freeze()
}

/// Legacy EOF packet payload (header 0xFE, always < 9 bytes)
pub fn eof_payload(status_flags: u16, warnings: u16, capabilities: u32) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_u8(0xFE);
    if capabilities & CLIENT_PROTOCOL_41 != 0 {
        buf.put_u16_le(warnings);
        buf.put_u16_le(status_flags);
    }
    buf.freeze()
}

/// ERR packet payload (header 0xFF)
pub fn err_payload(error_code: u16, sql_state: &str, message: &str, capabilities: u32) -> Bytes {
    let mut buf = BytesMut::new();
    buf.put_u8(0xFF);
    buf.put_u16_le(error_code);
    if capabilities & CLIENT_PROTOCOL_41 != 0 {
        buf.put_u8(b'#');
        buf.extend_from_slice(sql_state.as_bytes());
    }
    buf.extend_from_slice(message.as_bytes());
    buf.freeze()
}

/// Result set header payload: the column count as a length-encoded integer
pub fn column_count_payload(count: u64) -> Bytes {
    let mut buf = BytesMut::new();
    put_lenenc_int(&mut buf, count);
    buf.freeze()
}

/// ColumnDefinition41 payload for one field
pub fn column_definition_payload(field: &Field) -> Bytes {
    let mut buf = BytesMut::new();

    put_lenenc_str(&mut buf, CATALOG);
    // Schema, table, org_table: not tracked per field
    put_lenenc_str(&mut buf, "");
    put_lenenc_str(&mut buf, "");
    put_lenenc_str(&mut buf, "");
    put_lenenc_str(&mut buf, &field.name);
    put_lenenc_str(&mut buf, &field.name);

    // Length of the fixed-size trailer
    buf.put_u8(0x0C);
    buf.put_u16_le(DEFAULT_CHARSET as u16);
    // Column display length
    buf.put_u32_le(255);
    buf.put_u8(field.typ as u8);
    buf.put_u16_le(field.flags);
    // Decimals
    buf.put_u8(0);
    // Filler
    buf.put_u16_le(0);

    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ColumnType;

    const CAPS_41: u32 = CLIENT_PROTOCOL_41;

    #[test]
    fn test_ok_payload() {
        let payload = ok_payload(3, 7, 0x0002, 1, CAPS_41);
        assert_eq!(&payload[..], &[0x00, 3, 7, 0x02, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn test_ok_with_eof_header_differs_only_in_header() {
        let ok = ok_payload(1, 2, 0x0002, 0, CAPS_41);
        let eof_ok = ok_with_eof_header_payload(1, 2, 0x0002, 0, CAPS_41);
        assert_eq!(ok[0], 0x00);
        assert_eq!(eof_ok[0], 0xFE);
        assert_eq!(&ok[1..], &eof_ok[1..]);
    }

    #[test]
    fn test_eof_payload_is_short() {
        let payload = eof_payload(0x0002, 4, CAPS_41);
        assert_eq!(&payload[..], &[0xFE, 0x04, 0x00, 0x02, 0x00]);
        assert!(payload.len() < 9);
    }

    #[test]
    fn test_err_payload() {
        let payload = err_payload(1105, "HY000", "boom", CAPS_41);
        assert_eq!(payload[0], 0xFF);
        assert_eq!(&payload[1..3], &[0x51, 0x04]);
        assert_eq!(payload[3], b'#');
        assert_eq!(&payload[4..9], b"HY000");
        assert_eq!(&payload[9..], b"boom");
    }

    #[test]
    fn test_column_definition_contains_name() {
        let field = Field::new("id", ColumnType::Long);
        let payload = column_definition_payload(&field);
        // Catalog "def" is length-prefixed at the front
        assert_eq!(&payload[..4], &[3, b'd', b'e', b'f']);
        // Name appears length-prefixed
        assert!(payload.windows(3).any(|w| w == [2, b'i', b'd']));
        assert_eq!(payload[payload.len() - 6], ColumnType::Long as u8);
    }
}
