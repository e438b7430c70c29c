//! Driving port for the home dashboard and chat scheduling.

use async_trait::async_trait;

use crate::domain::{Chat, ChatDraft, Dashboard, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatCommand: Send + Sync {
    /// Greeting name and every chat, earliest first.
    async fn dashboard(&self, user_id: &UserId) -> Result<Dashboard, Error>;

    /// Validate and schedule a chat with one of the user's people.
    async fn schedule(&self, user_id: &UserId, draft: ChatDraft) -> Result<Chat, Error>;
}
