//! Infrastructure traits, used for DI on higher levels

use crate::core::error::ChatError;
use crate::infrastructure::entities;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Sessions owned by `user_id` (anonymous sessions when `None`), newest first.
    async fn list_sessions(&self, user_id: Option<Uuid>) -> Result<Vec<entities::Session>, ChatError>;

    async fn create_session(&self, session: entities::Session) -> Result<entities::Session, ChatError>;

    /// Inserts `session` unless a session with the same id already exists, then returns the
    /// stored row.
    async fn find_or_create_session(
        &self,
        session: entities::Session,
    ) -> Result<entities::Session, ChatError>;

    /// All messages of a session visible to `user_id`, oldest first.
    async fn list_session_messages(
        &self,
        user_id: Option<Uuid>,
        session_id: &str,
    ) -> Result<Vec<entities::Message>, ChatError>;

    /// The newest `limit` messages of a session other than `excluding`, oldest first.
    async fn list_recent_messages(
        &self,
        session_id: &str,
        excluding: Uuid,
        limit: Option<usize>,
    ) -> Result<Vec<entities::Message>, ChatError>;

    async fn create_message(&self, message: entities::Message) -> Result<entities::Message, ChatError>;
}

#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends `text` to the provider and returns its JSON body as-is.
    ///
    /// Returns `Err` only when the request could not be made. A body that isn't JSON comes
    /// back as `Value::Null`.
    async fn generate_content(&self, text: &str) -> Result<serde_json::Value, ChatError>;
}
