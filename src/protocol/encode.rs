//! Length-encoded primitives of the MySQL text protocol.

use bytes::{BufMut, BytesMut};

/// Marker byte for a NULL value in a text result row
pub const NULL_MARKER: u8 = 0xFB;

/// Encode a length-encoded integer
pub fn put_lenenc_int(buf: &mut BytesMut, value: u64) {
    if value < 251 {
        buf.put_u8(value as u8);
    } else if value < 65536 {
        buf.put_u8(0xFC);
        buf.put_u16_le(value as u16);
    } else if value < 16777216 {
        buf.put_u8(0xFD);
        buf.put_u8((value & 0xFF) as u8);
        buf.put_u8(((value >> 8) & 0xFF) as u8);
        buf.put_u8(((value >> 16) & 0xFF) as u8);
    } else {
        buf.put_u8(0xFE);
        buf.put_u64_le(value);
    }
}

/// Encode length-prefixed raw bytes
pub fn put_lenenc_bytes(buf: &mut BytesMut, data: &[u8]) {
    put_lenenc_int(buf, data.len() as u64);
    buf.extend_from_slice(data);
}

/// Encode a length-prefixed string
pub fn put_lenenc_str(buf: &mut BytesMut, s: &str) {
    put_lenenc_bytes(buf, s.as_bytes());
}

/// Encode the NULL marker. Distinct from a zero-length string,
/// which encodes as a single 0x00 length byte.
pub fn put_null(buf: &mut BytesMut) {
    buf.put_u8(NULL_MARKER);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lenenc_int_boundaries() {
        let mut buf = BytesMut::new();
        put_lenenc_int(&mut buf, 250);
        assert_eq!(&buf[..], &[250]);

        let mut buf = BytesMut::new();
        put_lenenc_int(&mut buf, 251);
        assert_eq!(&buf[..], &[0xFC, 251, 0]);

        let mut buf = BytesMut::new();
        put_lenenc_int(&mut buf, 65536);
        assert_eq!(&buf[..], &[0xFD, 0, 0, 1]);

        let mut buf = BytesMut::new();
        put_lenenc_int(&mut buf, 16777216);
        assert_eq!(&buf[..], &[0xFE, 0, 0, 0, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_null_distinct_from_empty() {
        let mut null_buf = BytesMut::new();
        put_null(&mut null_buf);

        let mut empty_buf = BytesMut::new();
        put_lenenc_bytes(&mut empty_buf, b"");

        assert_eq!(&null_buf[..], &[0xFB]);
        assert_eq!(&empty_buf[..], &[0x00]);
        assert_ne!(null_buf, empty_buf);
    }
}
