//! Fitness coach chat
//!
//! A conversation is a transcript of [`ChatMessage`]s owned by a
//! [`ChatSession`]. Replies come from a [`ChatBackend`]: either a direct
//! completion call that replays the whole transcript, or a relay that sees
//! only the newest message and injects the user's stored history itself.

mod backend;
pub mod completion;
pub mod relay;
mod session;

pub use backend::{DirectChat, RelayChat};
pub use completion::CompletionClient;
pub use session::{ChatSession, QUICK_ACTIONS};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ---------------------------------------------------------------------------
/// Fixed Copy
/// ---------------------------------------------------------------------------

pub const GREETING: &str = "Hi! I'm your personal fitness coach. I can help you with workouts, nutrition advice, and answer any fitness questions based on your progress. How can I help you today?";

pub const EMPTY_REPLY: &str = "I'm sorry, I couldn't generate a response.";

pub const CONNECTION_TROUBLE: &str =
  "I'm sorry, I'm having trouble connecting right now. Please try again in a moment.";

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ChatError {
  #[error("OpenAI API key not configured")]
  MissingApiKey,

  #[error("No user message to send")]
  NoUserMessage,

  #[error("Invalid chat request: {0}")]
  BadRequest(String),

  #[error("Request failed: {0}")]
  Request(String),

  #[error("OpenAI API error: {0}")]
  Api(String),

  #[error("Relay returned {status}: {body}")]
  Relay { status: u16, body: String },

  #[error("Parse error: {0}")]
  Parse(String),
}

/// ---------------------------------------------------------------------------
/// Transcript Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  User,
  Assistant,
  System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
  pub role: Role,
  pub content: String,
  pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
  pub fn new(role: Role, content: impl Into<String>) -> Self {
    Self {
      role,
      content: content.into(),
      timestamp: Utc::now(),
    }
  }

  pub fn user(content: impl Into<String>) -> Self {
    Self::new(Role::User, content)
  }

  pub fn assistant(content: impl Into<String>) -> Self {
    Self::new(Role::Assistant, content)
  }
}

/// ---------------------------------------------------------------------------
/// Backend Trait
/// ---------------------------------------------------------------------------

/// One reply per call. The transcript already ends with the user turn
/// being answered.
#[async_trait]
pub trait ChatBackend: Send + Sync {
  async fn send_message(
    &self,
    transcript: &[ChatMessage],
    user_id: &str,
  ) -> Result<String, ChatError>;
}
