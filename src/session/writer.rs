use bytes::{Bytes, BytesMut};
use futures::SinkExt;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Framed;

use crate::protocol::{response, PacketCodec};
use crate::protocol::packet::Packet;
use crate::result::Field;

/// Frame-level packet writer bound 1:1 to one transport.
///
/// All `append_*` methods buffer encoded packets and assign sequence ids;
/// only [`flush`](FrameWriter::flush) (and [`write_err`](FrameWriter::write_err),
/// which flushes) performs I/O.
pub struct FrameWriter<S> {
    framed: Framed<S, PacketCodec>,
    buf: BytesMut,
    seq: u8,
}

impl<S: AsyncRead + AsyncWrite + Unpin> FrameWriter<S> {
    pub fn new(stream: S) -> Self {
        Self {
            framed: Framed::new(stream, PacketCodec),
            buf: BytesMut::with_capacity(256),
            // A response follows the client command packet at sequence 0
            seq: 1,
        }
    }

    /// Reset the sequence counter for the next command/response cycle
    pub fn reset_seq(&mut self, seq: u8) {
        self.seq = seq;
    }

    /// Buffer one packet carrying `payload`
    pub fn append_payload(&mut self, payload: Bytes) {
        let pkt = Packet::new(self.seq, payload);
        pkt.encode(&mut self.buf);
        self.seq = self.seq.wrapping_add(1);
    }

    /// Buffer the column-count packet followed by one ColumnDefinition41
    /// packet per field
    pub fn append_columns(&mut self, fields: &[Field]) {
        self.append_payload(response::column_count_payload(fields.len() as u64));
        for field in fields {
            self.append_payload(response::column_definition_payload(field));
        }
    }

    /// Buffer a legacy EOF marker packet
    pub fn append_eof(&mut self, status_flags: u16, warnings: u16, capabilities: u32) {
        self.append_payload(response::eof_payload(status_flags, warnings, capabilities));
    }

    /// Buffer an OK packet
    pub fn append_ok(
        &mut self,
        affected_rows: u64,
        last_insert_id: u64,
        status_flags: u16,
        warnings: u16,
        capabilities: u32,
    ) {
        self.append_payload(response::ok_payload(
            affected_rows,
            last_insert_id,
            status_flags,
            warnings,
            capabilities,
        ));
    }

    /// Buffer the OK-shaped terminal packet with the 0xFE EOF header
    pub fn append_ok_with_eof_header(
        &mut self,
        affected_rows: u64,
        last_insert_id: u64,
        status_flags: u16,
        warnings: u16,
        capabilities: u32,
    ) {
        self.append_payload(response::ok_with_eof_header_payload(
            affected_rows,
            last_insert_id,
            status_flags,
            warnings,
            capabilities,
        ));
    }

    /// Write an ERR packet and flush immediately
    pub async fn write_err(
        &mut self,
        code: u16,
        sql_state: &str,
        message: &str,
        capabilities: u32,
    ) -> std::io::Result<()> {
        self.append_payload(response::err_payload(code, sql_state, message, capabilities));
        self.flush().await
    }

    /// Hand all buffered packets to the transport as one write batch
    pub async fn flush(&mut self) -> std::io::Result<()> {
        if self.buf.is_empty() {
            return SinkExt::<&[u8]>::flush(&mut self.framed).await;
        }
        let pending = self.buf.split().freeze();
        self.framed.send(&pending[..]).await
    }

    /// Number of buffered, unflushed bytes
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Shut the underlying transport down
    pub async fn shutdown(&mut self) -> std::io::Result<()> {
        self.framed.get_mut().shutdown().await
    }
}
