use std::sync::Arc;

use dashmap::DashMap;
use tokio::net::TcpStream;
use tracing::debug;

use super::Session;

/// Snapshot of one live session for administrative listings
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub id: u32,
    pub user: String,
    pub address: String,
    pub schema: String,
}

/// Concurrent table of live sessions, keyed by connection id.
///
/// The accept loop registers a session after the handshake and removes it on
/// teardown; administrative callers may list sessions at any time while their
/// handlers are mid-query.
pub struct SessionRegistry<S = TcpStream> {
    sessions: DashMap<u32, Arc<Session<S>>>,
}

impl<S> Default for SessionRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SessionRegistry<S> {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn register(&self, session: Arc<Session<S>>) {
        debug!(session_id = session.id(), "session registered");
        self.sessions.insert(session.id(), session);
    }

    pub fn unregister(&self, id: u32) -> Option<Arc<Session<S>>> {
        self.sessions.remove(&id).map(|(_, s)| s)
    }

    pub fn get(&self, id: u32) -> Option<Arc<Session<S>>> {
        self.sessions.get(&id).map(|s| Arc::clone(s.value()))
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Snapshot all live sessions
    pub fn list(&self) -> Vec<SessionInfo> {
        self.sessions
            .iter()
            .map(|entry| {
                let s = entry.value();
                SessionInfo {
                    id: s.id(),
                    user: s.user(),
                    address: s.address(),
                    schema: s.schema(),
                }
            })
            .collect()
    }
}
