//! DI "Interfaces"

use crate::core::error::ChatError;
use crate::infrastructure::entities;
use crate::infrastructure::entities::MessageRole;
use async_trait::async_trait;
use uuid::Uuid;

/// Both halves of one chat turn.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub user_message: entities::Message,
    pub assistant_message: entities::Message,
}

#[async_trait]
pub trait ChatService: Send + Sync {
    /// Lists the sessions of the given user, newest first.
    ///
    /// `None` is the anonymous user, who only sees sessions without an owner.
    async fn list_sessions(&self, user_id: Option<Uuid>) -> Result<Vec<entities::Session>, ChatError>;

    /// Creates a new session for the given user. Without a title the default one is used.
    async fn create_session(
        &self,
        user_id: Option<Uuid>,
        title: Option<String>,
    ) -> Result<entities::Session, ChatError>;

    /// List all messages in a session, in creation order.
    ///
    /// An unknown session, or one the user doesn't own, yields an empty list.
    async fn list_messages(
        &self,
        user_id: Option<Uuid>,
        session_id: &str,
    ) -> Result<Vec<entities::Message>, ChatError>;

    /// Builds the prompt for `input` from the recent history of a session.
    ///
    /// `exclude` is left out of the history, which is how the just-stored user message of the
    /// current turn avoids being replayed twice.
    async fn build_prompt(
        &self,
        session_id: &str,
        input: &str,
        exclude: Uuid,
    ) -> Result<String, ChatError>;

    /// Runs one chat turn: stores the user message, asks the provider, stores the reply.
    ///
    /// With `with_context` the provider sees the session transcript, otherwise just `text`.
    /// The session is created on first use. Returns `Err` if the session belongs to someone
    /// else or a step fails, in which case the user message may already be stored.
    async fn store_message(
        &self,
        user_id: Option<Uuid>,
        session_id: &str,
        text: String,
        with_context: bool,
    ) -> Result<ChatTurn, ChatError>;

    /// Sends `text` to the provider without touching any session.
    async fn generate(&self, text: &str) -> Result<serde_json::Value, ChatError>;

    /// Creates a new message in a session.
    ///
    /// The helper functions `create_X_message` should be used instead for clarity.
    async fn create_raw_message(
        &self,
        user_id: Option<Uuid>,
        session_id: &str,
        role: MessageRole,
        content: String,
    ) -> Result<entities::Message, ChatError>;

    async fn create_user_message(
        &self,
        user_id: Option<Uuid>,
        session_id: &str,
        message: String,
    ) -> Result<entities::Message, ChatError> {
        self.create_raw_message(user_id, session_id, MessageRole::User, message)
            .await
    }

    async fn create_assistant_message(
        &self,
        user_id: Option<Uuid>,
        session_id: &str,
        message: String,
    ) -> Result<entities::Message, ChatError> {
        self.create_raw_message(user_id, session_id, MessageRole::Assistant, message)
            .await
    }
}
