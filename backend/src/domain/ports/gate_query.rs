//! Driving port resolving which top-level view a visitor sees.

use async_trait::async_trait;

use crate::domain::{GateState, UserId};

/// Resolves access gate state for an optional signed-in user.
///
/// Resolution never fails: lookup errors resolve to "no profile".
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GateQuery: Send + Sync {
    async fn resolve(&self, user_id: Option<UserId>) -> GateState;
}
