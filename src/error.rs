use thiserror::Error;

use crate::result::ResultState;

/// Common MySQL server error codes
#[allow(dead_code)]
pub mod codes {
    pub const ER_ACCESS_DENIED_ERROR: u16 = 1045;
    pub const ER_BAD_DB_ERROR: u16 = 1049;
    pub const ER_PARSE_ERROR: u16 = 1064;
    pub const ER_UNKNOWN_ERROR: u16 = 1105;
    pub const ER_NET_PACKET_TOO_LARGE: u16 = 1153;
    pub const ER_MALFORMED_PACKET: u16 = 1835;
}

/// Default SQL state used when no more specific state applies
pub const SQLSTATE_GENERAL: &str = "HY000";

/// A protocol-classified error: already carries everything the ERR packet
/// needs and is passed through to the wire verbatim
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} (errno {code}) (sqlstate {state})")]
pub struct SqlError {
    pub code: u16,
    pub state: String,
    pub message: String,
}

impl SqlError {
    pub fn new(code: u16, state: &str, message: impl Into<String>) -> Self {
        Self {
            code,
            state: state.to_string(),
            message: message.into(),
        }
    }

    /// Synthesize the generic unknown-error classification
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(codes::ER_UNKNOWN_ERROR, SQLSTATE_GENERAL, message)
    }

    /// Classify an arbitrary session failure for the wire: protocol-classified
    /// errors pass through unchanged, everything else becomes an unknown error
    /// carrying the failure's description
    pub fn from_session_error(err: &SessionError) -> Self {
        match err {
            SessionError::Sql(e) => e.clone(),
            other => Self::unknown(other.to_string()),
        }
    }
}

/// Failures surfaced by session write operations
#[derive(Debug, Error)]
pub enum SessionError {
    /// Error produced by the execution layer with protocol classification
    #[error("{0}")]
    Sql(#[from] SqlError),

    /// Transport or flush failure; the connection framing is undefined
    /// afterwards and the session should be closed
    #[error("connection write failed: {0}")]
    Io(#[from] std::io::Error),

    /// Write attempted after the session was closed
    #[error("session is closed")]
    Closed,

    /// Result shape not covered by the write protocol: rows or a streaming
    /// state without column metadata
    #[error("unexpected result shape: no fields but state {state:?} ({rows} rows)")]
    UnexpectedResultShape { state: ResultState, rows: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sql_error_passthrough() {
        let err = SessionError::Sql(SqlError::new(codes::ER_BAD_DB_ERROR, "42000", "no such db"));
        let mapped = SqlError::from_session_error(&err);
        assert_eq!(mapped.code, codes::ER_BAD_DB_ERROR);
        assert_eq!(mapped.state, "42000");
        assert_eq!(mapped.message, "no such db");
    }

    #[test]
    fn test_unclassified_error_becomes_unknown() {
        let err = SessionError::Io(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "pipe broke",
        ));
        let mapped = SqlError::from_session_error(&err);
        assert_eq!(mapped.code, codes::ER_UNKNOWN_ERROR);
        assert_eq!(mapped.state, SQLSTATE_GENERAL);
        assert!(mapped.message.contains("pipe broke"));
    }

    #[test]
    fn test_shape_violation_maps_to_unknown() {
        let err = SessionError::UnexpectedResultShape {
            state: ResultState::RowsOnly,
            rows: 2,
        };
        let mapped = SqlError::from_session_error(&err);
        assert_eq!(mapped.code, codes::ER_UNKNOWN_ERROR);
        assert!(mapped.message.contains("RowsOnly"));
    }
}
