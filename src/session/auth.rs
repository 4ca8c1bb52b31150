use crate::protocol::capabilities::{CLIENT_DEPRECATE_EOF, CLIENT_PROTOCOL_41};
use crate::protocol::response::DEFAULT_CHARSET;

/// Authentication context negotiated during the handshake.
///
/// Produced once by the handshake collaborator and never mutated afterwards;
/// the session reads it lock-free.
#[derive(Debug, Clone)]
pub struct AuthContext {
    client_flags: u32,
    user: String,
    charset: u8,
    auth_response: Vec<u8>,
}

impl Default for AuthContext {
    /// Placeholder used before the handshake completes. Protocol 4.1 is the
    /// server baseline, so it is part of the flags even before negotiation.
    fn default() -> Self {
        Self {
            client_flags: CLIENT_PROTOCOL_41,
            user: String::new(),
            charset: DEFAULT_CHARSET,
            auth_response: Vec::new(),
        }
    }
}

impl AuthContext {
    pub fn new(client_flags: u32, user: impl Into<String>, charset: u8, auth_response: Vec<u8>) -> Self {
        Self {
            client_flags,
            user: user.into(),
            charset,
            auth_response,
        }
    }

    pub fn client_flags(&self) -> u32 {
        self.client_flags
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn charset(&self) -> u8 {
        self.charset
    }

    pub fn auth_response(&self) -> &[u8] {
        &self.auth_response
    }

    /// Whether the client negotiated CLIENT_DEPRECATE_EOF.
    ///
    /// The single predicate deciding the terminal packet shape at both the
    /// end of the column definition block and the end of the row stream.
    pub fn deprecate_eof(&self) -> bool {
        self.client_flags & CLIENT_DEPRECATE_EOF != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deprecate_eof_predicate() {
        let auth = AuthContext::new(CLIENT_DEPRECATE_EOF, "root", DEFAULT_CHARSET, vec![]);
        assert!(auth.deprecate_eof());

        let auth = AuthContext::default();
        assert!(!auth.deprecate_eof());
    }
}
