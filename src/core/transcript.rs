//! Transcript builder.
//!
//! Turns the stored history of a session into the single prompt string the completion
//! provider receives: one `Role: content` line per message, then the new input and an
//! `Assistant:` cue.

use crate::infrastructure::entities;
use minijinja::context;

const TRANSCRIPT_TEMPLATE: &str = "{% for message in messages %}{{ message.role }}: {{ message.content }}
{% endfor %}User: {{ input }}
Assistant:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    role: Role,
    content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        ChatMessage {
            role,
            content: content.into(),
        }
    }

    pub fn as_jinja_value(&self) -> minijinja::Value {
        context! {
            role => self.role.label(),
            content => self.content
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

impl From<entities::Message> for ChatMessage {
    fn from(m: entities::Message) -> Self {
        Self {
            content: m.content,
            role: match m.role {
                entities::MessageRole::User => Role::User,
                entities::MessageRole::Assistant => Role::Assistant,
            },
        }
    }
}

/// Renders `history` (oldest first) followed by the new `input`.
pub fn build_transcript(history: &[ChatMessage], input: &str) -> Result<String, minijinja::Error> {
    let messages: Vec<minijinja::Value> = history.iter().map(ChatMessage::as_jinja_value).collect();

    minijinja::Environment::new().render_str(
        TRANSCRIPT_TEMPLATE,
        context! {
            messages => messages,
            input => input
        },
    )
}
