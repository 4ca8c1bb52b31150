use rand::RngCore;

use crate::config::ServerConfig;

/// Salt length sent in the greeting (8 + 12 bytes across the two
/// auth-plugin-data parts)
pub const SALT_LEN: usize = 20;

/// Per-connection greeting data, generated at session creation and immutable
/// afterwards. The handshake collaborator reads the whole surface when
/// building the initial handshake packet: version string, charset, status
/// flags, and salt.
#[derive(Debug, Clone)]
pub struct Greeting {
    connection_id: u32,
    server_version: String,
    charset: u8,
    status: u16,
    salt: [u8; SALT_LEN],
}

impl Greeting {
    pub fn new(connection_id: u32, config: &ServerConfig) -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self {
            connection_id,
            server_version: config.server_version.clone(),
            charset: config.charset,
            status: config.status_flags(),
            salt,
        }
    }

    pub fn connection_id(&self) -> u32 {
        self.connection_id
    }

    /// Version string advertised to the client
    pub fn server_version(&self) -> &str {
        &self.server_version
    }

    /// Character set advertised before the handshake negotiates one
    pub fn charset(&self) -> u8 {
        self.charset
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }
}
