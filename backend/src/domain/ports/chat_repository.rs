//! Port for scheduled chats.

use async_trait::async_trait;

use crate::domain::{Chat, ChatId, ChatListing, Company, NewChat, Person, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by chat repository adapters.
    pub enum ChatRepositoryError {
        Connection { message: String } => "chat repository connection failed: {message}",
        Query { message: String } => "chat repository query failed: {message}",
    }
}

/// A chat joined with its person and the person's company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatContext {
    pub chat: Chat,
    pub person: Person,
    pub company: Option<Company>,
}

/// Storage for chats, always scoped by owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// The user's chats ordered by scheduled time, earliest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<ChatListing>, ChatRepositoryError>;

    /// One chat with its person and company, if owned by `user_id`.
    async fn find_context(
        &self,
        user_id: &UserId,
        chat_id: &ChatId,
    ) -> Result<Option<ChatContext>, ChatRepositoryError>;

    /// Insert a chat with status `scheduled`.
    async fn create(&self, chat: &NewChat) -> Result<Chat, ChatRepositoryError>;
}
