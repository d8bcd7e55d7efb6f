//! Implementations for the service the app needs.
//!

use crate::config::Settings;
use crate::core::error::ChatError;
use crate::core::traits::{ChatService, ChatTurn};
use crate::core::transcript::{ChatMessage, build_transcript};
use crate::infrastructure::entities::{DEFAULT_SESSION_TITLE, Message, MessageRole, Session};
use crate::infrastructure::gemini::extract_reply_text;
use crate::infrastructure::traits::{ChatRepository, CompletionClient};
use async_trait::async_trait;
use chrono::Utc;
use di::{Ref, injectable};
use log::{debug, info};
use serde_json::Value;
use uuid::Uuid;

#[injectable(ChatService)]
pub struct MyChatService {
    repo: Ref<dyn ChatRepository>,
    completion: Ref<dyn CompletionClient>,
    settings: Ref<Settings>,
}

#[async_trait]
impl ChatService for MyChatService {
    async fn list_sessions(&self, user_id: Option<Uuid>) -> Result<Vec<Session>, ChatError> {
        self.repo.list_sessions(user_id).await
    }

    async fn create_session(
        &self,
        user_id: Option<Uuid>,
        title: Option<String>,
    ) -> Result<Session, ChatError> {
        let title = title
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_SESSION_TITLE.to_owned());

        let session = self
            .repo
            .create_session(Session {
                id: Uuid::new_v4().to_string(),
                user_id,
                title,
                created_at: Utc::now(),
            })
            .await?;

        info!("created session {}", session.id);
        Ok(session)
    }

    async fn list_messages(
        &self,
        user_id: Option<Uuid>,
        session_id: &str,
    ) -> Result<Vec<Message>, ChatError> {
        self.repo.list_session_messages(user_id, session_id).await
    }

    async fn build_prompt(
        &self,
        session_id: &str,
        input: &str,
        exclude: Uuid,
    ) -> Result<String, ChatError> {
        let history: Vec<ChatMessage> = self
            .repo
            .list_recent_messages(session_id, exclude, self.settings.transcript_max_messages)
            .await?
            .into_iter()
            .map(ChatMessage::from)
            .collect();

        debug!(
            "replaying {} prior messages of session {session_id}",
            history.len()
        );

        Ok(build_transcript(&history, input)?)
    }

    async fn store_message(
        &self,
        user_id: Option<Uuid>,
        session_id: &str,
        text: String,
        with_context: bool,
    ) -> Result<ChatTurn, ChatError> {
        if text.trim().is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        let session = self
            .repo
            .find_or_create_session(Session {
                id: session_id.to_owned(),
                user_id,
                title: DEFAULT_SESSION_TITLE.to_owned(),
                created_at: Utc::now(),
            })
            .await?;
        if session.user_id != user_id {
            return Err(ChatError::SessionNotFound(session_id.to_owned()));
        }

        let user_message = self
            .create_user_message(user_id, session_id, text)
            .await?;

        let prompt = if with_context {
            self.build_prompt(session_id, &user_message.content, user_message.id)
                .await?
        } else {
            user_message.content.clone()
        };

        // no rollback: if the provider fails the user message stays stored on its own
        let response = self.completion.generate_content(&prompt).await?;
        let reply = extract_reply_text(&response);

        let assistant_message = self
            .create_assistant_message(user_id, session_id, reply)
            .await?;

        Ok(ChatTurn {
            user_message,
            assistant_message,
        })
    }

    async fn generate(&self, text: &str) -> Result<Value, ChatError> {
        self.completion.generate_content(text).await
    }

    async fn create_raw_message(
        &self,
        user_id: Option<Uuid>,
        session_id: &str,
        role: MessageRole,
        content: String,
    ) -> Result<Message, ChatError> {
        self.repo
            .create_message(Message {
                id: Uuid::new_v4(),
                session_id: session_id.to_owned(),
                user_id,
                role,
                content,
                created_at: Utc::now(),
            })
            .await
    }
}
