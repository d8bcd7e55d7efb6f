//! DB Repository abstractions

use crate::core::error::ChatError;
use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{Message, Session};
use crate::infrastructure::traits::ChatRepository;
use async_trait::async_trait;
use di::{Ref, injectable};
use uuid::Uuid;

const MESSAGE_COLUMNS: &str =
    "messages.id, messages.session_id, messages.user_id, messages.role, messages.content, messages.created_at";

#[injectable(ChatRepository)]
pub struct DbChatRepository {
    connection: Ref<DatabaseConnection>,
}

#[async_trait]
impl ChatRepository for DbChatRepository {
    async fn list_sessions(&self, user_id: Option<Uuid>) -> Result<Vec<Session>, ChatError> {
        let sessions = sqlx::query_as(
            "SELECT * FROM sessions WHERE user_id IS ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(user_id)
        .fetch_all(&**self.connection)
        .await?;

        Ok(sessions)
    }

    async fn create_session(&self, session: Session) -> Result<Session, ChatError> {
        let session = sqlx::query_as(
            "INSERT INTO sessions (id, user_id, title, created_at) VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(session.id)
        .bind(session.user_id)
        .bind(session.title)
        .bind(session.created_at)
        .fetch_one(&**self.connection)
        .await?;

        Ok(session)
    }

    async fn find_or_create_session(&self, session: Session) -> Result<Session, ChatError> {
        sqlx::query(
            "INSERT INTO sessions (id, user_id, title, created_at) VALUES (?, ?, ?, ?) ON CONFLICT (id) DO NOTHING",
        )
        .bind(&session.id)
        .bind(session.user_id)
        .bind(&session.title)
        .bind(session.created_at)
        .execute(&**self.connection)
        .await?;

        let stored = sqlx::query_as("SELECT * FROM sessions WHERE id = ?")
            .bind(&session.id)
            .fetch_one(&**self.connection)
            .await?;

        Ok(stored)
    }

    async fn list_session_messages(
        &self,
        user_id: Option<Uuid>,
        session_id: &str,
    ) -> Result<Vec<Message>, ChatError> {
        let query = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages INNER JOIN sessions ON sessions.id = messages.session_id WHERE messages.session_id = ? AND sessions.user_id IS ? ORDER BY messages.created_at ASC, messages.rowid ASC"
        );

        let messages = sqlx::query_as(&query)
            .bind(session_id)
            .bind(user_id)
            .fetch_all(&**self.connection)
            .await?;

        Ok(messages)
    }

    async fn list_recent_messages(
        &self,
        session_id: &str,
        excluding: Uuid,
        limit: Option<usize>,
    ) -> Result<Vec<Message>, ChatError> {
        // SQLite treats a negative LIMIT as unbounded
        let limit = limit.map_or(-1, |l| i64::try_from(l).unwrap_or(i64::MAX));
        let query = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE messages.session_id = ? AND messages.id != ? ORDER BY messages.created_at DESC, messages.rowid DESC LIMIT ?"
        );

        let mut messages: Vec<Message> = sqlx::query_as(&query)
            .bind(session_id)
            .bind(excluding)
            .bind(limit)
            .fetch_all(&**self.connection)
            .await?;
        messages.reverse();

        Ok(messages)
    }

    async fn create_message(&self, message: Message) -> Result<Message, ChatError> {
        let message = sqlx::query_as(
            "INSERT INTO messages (id, session_id, user_id, role, content, created_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(message.id)
        .bind(message.session_id)
        .bind(message.user_id)
        .bind(message.role)
        .bind(message.content)
        .bind(message.created_at)
        .fetch_one(&**self.connection)
        .await?;

        Ok(message)
    }
}
