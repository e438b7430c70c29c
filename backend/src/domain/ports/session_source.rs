//! Port publishing authentication state changes.

use tokio::sync::watch;

use crate::domain::AuthSession;

/// Source of the current session and of change notifications.
///
/// Each subscriber owns its receiver; dropping it releases the subscription.
#[cfg_attr(test, mockall::automock)]
pub trait SessionSource: Send + Sync {
    /// Session at this instant, if signed in.
    fn current(&self) -> Option<AuthSession>;

    /// Receiver notified on every sign-in, sign-out or refresh.
    fn subscribe(&self) -> watch::Receiver<Option<AuthSession>>;
}
