//! Session endpoints

use crate::api::ExtractUser;
use crate::api::sessions::schemas::{CreateMessage, CreateSession, SessionList};
use crate::core::error::ChatError;
use crate::core::traits::ChatService;
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use di_axum::Inject;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_sessions).post(new_session))
        .route("/:id/messages", get(session_messages).post(post_message))
}

async fn list_sessions(
    Inject(chat_service): Inject<dyn ChatService>,
    ExtractUser(current_user): ExtractUser,
) -> Result<Json<SessionList>, ChatError> {
    let sessions = chat_service.list_sessions(current_user).await?;

    Ok(SessionList {
        sessions: sessions.into_iter().map(schemas::Session::from).collect(),
    }
    .into())
}

async fn new_session(
    Inject(chat_service): Inject<dyn ChatService>,
    ExtractUser(current_user): ExtractUser,
    create_session: Option<Json<CreateSession>>,
) -> Result<(StatusCode, Json<schemas::Session>), ChatError> {
    let title = create_session.and_then(|Json(body)| body.title);
    let session = chat_service.create_session(current_user, title).await?;

    Ok((StatusCode::CREATED, Json(session.into())))
}

async fn session_messages(
    Inject(chat_service): Inject<dyn ChatService>,
    Path(session_id): Path<String>,
    ExtractUser(current_user): ExtractUser,
) -> Result<Json<schemas::MessagesList>, ChatError> {
    let messages = chat_service.list_messages(current_user, &session_id).await?;

    Ok(Json(schemas::MessagesList {
        messages: messages.into_iter().map(schemas::Message::from).collect(),
    }))
}

async fn post_message(
    Inject(chat_service): Inject<dyn ChatService>,
    ExtractUser(current_user): ExtractUser,
    Path(session_id): Path<String>,
    Json(message): Json<CreateMessage>,
) -> Result<Json<schemas::ChatTurn>, ChatError> {
    let turn = chat_service
        .store_message(current_user, &session_id, message.text, message.context)
        .await?;

    Ok(Json(turn.into()))
}

pub mod schemas {
    use crate::core::traits;
    use crate::infrastructure::entities;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use uuid::Uuid;

    #[derive(Deserialize, Debug, Default)]
    pub struct CreateSession {
        pub title: Option<String>,
    }

    #[derive(Serialize, Debug)]
    pub struct Session {
        pub id: String,
        pub user_id: Option<Uuid>,
        pub title: String,
        pub created_at: DateTime<Utc>,
    }

    impl From<entities::Session> for Session {
        fn from(session: entities::Session) -> Self {
            Session {
                id: session.id,
                user_id: session.user_id,
                title: session.title,
                created_at: session.created_at,
            }
        }
    }

    #[derive(Serialize, Debug)]
    pub struct SessionList {
        pub sessions: Vec<Session>,
    }

    #[derive(Serialize, Debug, Default)]
    pub struct MessagesList {
        pub messages: Vec<Message>,
    }

    #[derive(Serialize, Debug, PartialEq, Eq)]
    #[serde(rename_all = "lowercase")]
    pub enum Role {
        User,
        Assistant,
    }

    impl From<entities::MessageRole> for Role {
        fn from(role: entities::MessageRole) -> Self {
            match role {
                entities::MessageRole::User => Role::User,
                entities::MessageRole::Assistant => Role::Assistant,
            }
        }
    }

    #[derive(Serialize, Debug)]
    pub struct Message {
        pub id: Uuid,
        pub session_id: String,
        pub user_id: Option<Uuid>,
        pub role: Role,
        pub content: String,
        pub created_at: DateTime<Utc>,
    }

    impl From<entities::Message> for Message {
        fn from(message: entities::Message) -> Self {
            Message {
                id: message.id,
                session_id: message.session_id,
                user_id: message.user_id,
                role: message.role.into(),
                content: message.content,
                created_at: message.created_at,
            }
        }
    }

    #[derive(Deserialize, Debug)]
    pub struct CreateMessage {
        pub text: String,
        /// Replay the session transcript to the provider. Off sends the text alone.
        #[serde(default = "replay_context")]
        pub context: bool,
    }

    fn replay_context() -> bool {
        true
    }

    #[derive(Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct ChatTurn {
        pub user_message: Message,
        pub assistant_message: Message,
    }

    impl From<traits::ChatTurn> for ChatTurn {
        fn from(turn: traits::ChatTurn) -> Self {
            ChatTurn {
                user_message: turn.user_message.into(),
                assistant_message: turn.assistant_message.into(),
            }
        }
    }
}
