mod auth;
mod greeting;
mod registry;
mod writer;

pub use auth::AuthContext;
pub use greeting::{Greeting, SALT_LEN};
pub use registry::{SessionInfo, SessionRegistry};
pub use writer::FrameWriter;

use std::net::SocketAddr;
use std::sync::OnceLock;

use bytes::BytesMut;
use parking_lot::RwLock;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::error::{SessionError, SqlError};
use crate::protocol::encode;
use crate::result::{QueryResult, ResultState};

/// Sentinel returned by [`Session::address`] once the transport is gone
const ADDR_UNKNOWN: &str = "unknown";

/// Mutable session surface, guarded by one reader/writer lock.
///
/// `peer` doubles as the transport-liveness flag: it is cleared exactly once
/// by `close`, so accessors observing the session mid-teardown never see a
/// half-closed state.
struct SessionState {
    schema: String,
    peer: Option<SocketAddr>,
}

/// Server-side state of one client connection.
///
/// Write operations (`write_result`, `write_error`, `close`) are driven by a
/// single request-handling task; accessors may be called concurrently from
/// other tasks (e.g. an administrative listing of live sessions).
pub struct Session<S = TcpStream> {
    id: u32,
    greeting: Greeting,
    auth: OnceLock<AuthContext>,
    state: RwLock<SessionState>,
    // The frame writer owns the transport. It sits behind its own async lock
    // so the state lock is never held across network I/O.
    writer: Mutex<Option<FrameWriter<S>>>,
}

impl<S> Session<S> {
    /// Install the negotiated authentication context. Called once by the
    /// handshake collaborator; later calls are ignored.
    pub fn authenticate(&self, auth: AuthContext) {
        if self.auth.set(auth).is_err() {
            warn!(session_id = self.id, "auth context already set, ignoring");
        }
    }

    fn auth(&self) -> &AuthContext {
        static PLACEHOLDER: OnceLock<AuthContext> = OnceLock::new();
        self.auth
            .get()
            .unwrap_or_else(|| PLACEHOLDER.get_or_init(AuthContext::default))
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Peer address, or `"unknown"` once the transport is closed
    pub fn address(&self) -> String {
        match self.state.read().peer {
            Some(addr) => addr.to_string(),
            None => ADDR_UNKNOWN.to_string(),
        }
    }

    pub fn schema(&self) -> String {
        self.state.read().schema.clone()
    }

    pub fn set_schema(&self, schema: impl Into<String>) {
        self.state.write().schema = schema.into();
    }

    pub fn user(&self) -> String {
        self.auth().user().to_string()
    }

    pub fn charset(&self) -> u8 {
        self.auth().charset()
    }

    pub fn salt(&self) -> &[u8] {
        self.greeting.salt()
    }

    pub fn auth_response(&self) -> Vec<u8> {
        self.auth().auth_response().to_vec()
    }

    pub fn greeting(&self) -> &Greeting {
        &self.greeting
    }
}

impl<S: AsyncRead + AsyncWrite + Unpin> Session<S> {
    pub fn new(id: u32, stream: S, peer: Option<SocketAddr>) -> Self {
        Self::with_config(id, stream, peer, &ServerConfig::default())
    }

    pub fn with_config(id: u32, stream: S, peer: Option<SocketAddr>, config: &ServerConfig) -> Self {
        Self {
            id,
            greeting: Greeting::new(id, config),
            auth: OnceLock::new(),
            state: RwLock::new(SessionState {
                schema: String::new(),
                peer,
            }),
            writer: Mutex::new(Some(FrameWriter::new(stream))),
        }
    }

    /// Close the transport. Idempotent; never errors.
    pub async fn close(&self) {
        let taken = self.writer.lock().await.take();
        match taken {
            Some(mut writer) => {
                if let Err(e) = writer.shutdown().await {
                    debug!(session_id = self.id, error = %e, "transport shutdown failed");
                }
                self.state.write().peer = None;
                debug!(session_id = self.id, "session closed");
            }
            None => {
                // Already closed
            }
        }
    }

    /// Serialize `result` to the wire according to its streaming state and
    /// the negotiated capability flags, then flush.
    ///
    /// On error the remaining phases are skipped and nothing further is
    /// flushed; the connection framing is undefined and the caller is
    /// expected to close the session.
    pub async fn write_result(&self, result: &QueryResult) -> Result<(), SessionError> {
        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(SessionError::Closed)?;
        let auth = self.auth();
        let caps = auth.client_flags();
        let status = self.greeting.status();

        if result.fields.is_empty() {
            // Pure mutation acknowledgment; any streaming state without
            // column metadata is a bug in the execution layer.
            if result.state != ResultState::Complete {
                return Err(SessionError::UnexpectedResultShape {
                    state: result.state,
                    rows: result.rows.len(),
                });
            }
            writer.append_ok(
                result.rows_affected,
                result.insert_id,
                status,
                result.warnings,
                caps,
            );
            return writer.flush().await.map_err(SessionError::from);
        }

        match result.state {
            ResultState::Complete => {
                self.write_fields(writer, result);
                self.write_rows(writer, result);
                self.write_finish(writer, result);
            }
            ResultState::FieldsOnly => self.write_fields(writer, result),
            ResultState::RowsOnly => self.write_rows(writer, result),
            ResultState::FinishedOnly => self.write_finish(writer, result),
        }
        writer.flush().await.map_err(SessionError::from)
    }

    /// Phase 1: column definitions, plus the legacy EOF marker unless the
    /// client deprecates it
    fn write_fields(&self, writer: &mut FrameWriter<S>, result: &QueryResult) {
        let auth = self.auth();
        writer.append_columns(&result.fields);
        if !auth.deprecate_eof() {
            writer.append_eof(self.greeting.status(), 0, auth.client_flags());
        }
    }

    /// Phase 2: one packet per row, NULL marker or length-prefixed raw bytes
    /// per value
    fn write_rows(&self, writer: &mut FrameWriter<S>, result: &QueryResult) {
        for row in &result.rows {
            let mut buf = BytesMut::with_capacity(16);
            for value in row {
                match value {
                    Some(raw) => encode::put_lenenc_bytes(&mut buf, raw),
                    None => encode::put_null(&mut buf),
                }
            }
            writer.append_payload(buf.freeze());
        }
    }

    /// Phase 3: exactly one terminal packet, shape decided by the
    /// deprecate-EOF capability alone
    fn write_finish(&self, writer: &mut FrameWriter<S>, result: &QueryResult) {
        let auth = self.auth();
        if auth.deprecate_eof() {
            writer.append_ok_with_eof_header(
                result.rows_affected,
                result.insert_id,
                self.greeting.status(),
                result.warnings,
                auth.client_flags(),
            );
        } else {
            writer.append_eof(self.greeting.status(), result.warnings, auth.client_flags());
        }
    }

    /// Map `err` onto the wire as a single ERR packet and flush
    pub async fn write_error(&self, err: &SessionError) -> Result<(), SessionError> {
        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(SessionError::Closed)?;
        let sql_err = SqlError::from_session_error(err);
        debug!(
            session_id = self.id,
            code = sql_err.code,
            state = %sql_err.state,
            "writing error packet"
        );
        writer
            .write_err(
                sql_err.code,
                &sql_err.state,
                &sql_err.message,
                self.auth().client_flags(),
            )
            .await
            .map_err(SessionError::from)
    }

    /// Reset the frame writer's sequence counter for the next command cycle.
    /// No-op on a closed session.
    pub async fn reset_sequence(&self, seq: u8) {
        if let Some(writer) = self.writer.lock().await.as_mut() {
            writer.reset_seq(seq);
        }
    }
}

impl Session<TcpStream> {
    /// Wrap a freshly accepted connection, capturing its peer address
    pub fn accept(id: u32, stream: TcpStream, config: &ServerConfig) -> Self {
        let peer = stream.peer_addr().ok();
        Self::with_config(id, stream, peer, config)
    }
}
