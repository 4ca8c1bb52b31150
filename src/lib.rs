//! Server-side session and result serialization layer of the MySQL wire
//! protocol.
//!
//! A [`Session`] is bound 1:1 to one client connection: it owns the
//! transport, the per-connection greeting, and the authentication context
//! negotiated by the handshake, and serializes [`QueryResult`]s and errors
//! into framed protocol packets. Query execution, the accept loop, and the
//! handshake exchange itself live outside this crate and drive it through
//! [`Session::write_result`] and [`Session::write_error`].

pub mod config;
pub mod error;
pub mod protocol;
pub mod result;
pub mod session;

pub use config::{load_config, ConfigError, ServerConfig};
pub use error::{SessionError, SqlError};
pub use result::{ColumnType, Field, QueryResult, ResultState, Row};
pub use session::{AuthContext, Session, SessionRegistry};
