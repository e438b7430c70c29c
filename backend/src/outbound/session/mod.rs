//! In-process session source backed by a `tokio::sync::watch` channel.
//!
//! The owner publishes sign-in, refresh and sign-out events; subscribers
//! such as the access gate observe them without polling.

use tokio::sync::watch;
use tracing::debug;

use crate::domain::AuthSession;
use crate::domain::ports::SessionSource;

/// Holds the current session and fans changes out to subscribers.
#[derive(Debug)]
pub struct WatchSessionSource {
    sender: watch::Sender<Option<AuthSession>>,
}

impl Default for WatchSessionSource {
    fn default() -> Self {
        Self::new(None)
    }
}

impl WatchSessionSource {
    /// Start with an optional restored session.
    pub fn new(initial: Option<AuthSession>) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Replace the session after a sign-in or token refresh.
    pub fn publish(&self, session: AuthSession) {
        debug!(user_id = %session.user_id(), "session published");
        self.sender.send_replace(Some(session));
    }

    /// Forget the session after a sign-out.
    pub fn clear(&self) {
        if self.sender.send_replace(None).is_some() {
            debug!("session cleared");
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl SessionSource for WatchSessionSource {
    fn current(&self) -> Option<AuthSession> {
        self.sender.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<AuthSession>> {
        self.sender.subscribe()
    }
}
