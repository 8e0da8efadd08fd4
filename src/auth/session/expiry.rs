//! Session expiry signal

use tokio::sync::broadcast;
use tracing::warn;

const CHANNEL_CAPACITY: usize = 16;

/// Raised whenever the backend rejects an auth-sensitive request with an
/// authorization error. The session store listens and clears local state.
#[derive(Debug, Clone)]
pub struct SessionExpirySignal {
    sender: broadcast::Sender<String>,
}

impl SessionExpirySignal {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn raise(&self, reason: impl Into<String>) {
        let reason = reason.into();
        warn!("Session expired: {}", reason);
        // no subscribers just means nobody is signed in to care
        let _ = self.sender.send(reason);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.sender.subscribe()
    }
}

impl Default for SessionExpirySignal {
    fn default() -> Self {
        Self::new()
    }
}
