use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::completion::{CompletionClient, WireMessage};
use super::relay::{RelayRequest, RelayResponse};
use super::{ChatBackend, ChatError, ChatMessage, Role, EMPTY_REPLY};

pub const COACH_SYSTEM_PROMPT: &str = "You are a helpful and knowledgeable fitness coach. Provide personalized advice on workouts, nutrition, and general fitness. Be encouraging and motivating. Keep responses concise and actionable.";

/// ---------------------------------------------------------------------------
/// Direct Completion
/// ---------------------------------------------------------------------------

/// Calls the completion API itself, replaying the visible transcript
/// (greeting included) behind the coach persona.
#[derive(Debug, Clone)]
pub struct DirectChat {
  client: CompletionClient,
}

impl DirectChat {
  pub fn new(client: CompletionClient) -> Self {
    Self { client }
  }

  fn messages(transcript: &[ChatMessage]) -> Vec<WireMessage> {
    std::iter::once(WireMessage::system(COACH_SYSTEM_PROMPT))
      .chain(
        transcript
          .iter()
          .filter(|m| m.role != Role::System)
          .map(|m| WireMessage { role: m.role, content: m.content.clone() }),
      )
      .collect()
  }
}

#[async_trait]
impl ChatBackend for DirectChat {
  async fn send_message(
    &self,
    transcript: &[ChatMessage],
    _user_id: &str,
  ) -> Result<String, ChatError> {
    self.client.complete(&Self::messages(transcript)).await
  }
}

/// ---------------------------------------------------------------------------
/// Relay
/// ---------------------------------------------------------------------------

/// Posts only the newest user message and the user id; the relay looks up
/// the history and builds the prompt.
#[derive(Debug, Clone)]
pub struct RelayChat {
  client: Client,
  url: String,
  api_key: Option<String>,
}

impl RelayChat {
  pub fn new(url: impl Into<String>, api_key: Option<String>) -> Self {
    Self {
      client: Client::new(),
      url: url.into(),
      api_key,
    }
  }
}

#[async_trait]
impl ChatBackend for RelayChat {
  async fn send_message(
    &self,
    transcript: &[ChatMessage],
    user_id: &str,
  ) -> Result<String, ChatError> {
    let latest = transcript
      .iter()
      .rev()
      .find(|m| m.role == Role::User)
      .ok_or(ChatError::NoUserMessage)?;

    let request = RelayRequest {
      message: latest.content.clone(),
      user_id: user_id.to_string(),
    };

    debug!(url = %self.url, "Sending chat message to relay");

    let mut builder = self.client.post(&self.url).json(&request);
    if let Some(key) = &self.api_key {
      builder = builder.header("apikey", key).bearer_auth(key);
    }

    let response = builder
      .send()
      .await
      .map_err(|e| ChatError::Request(e.to_string()))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| ChatError::Request(e.to_string()))?;

    if !status.is_success() {
      return Err(ChatError::Relay { status: status.as_u16(), body });
    }

    let parsed: RelayResponse =
      serde_json::from_str(&body).map_err(|e| ChatError::Parse(e.to_string()))?;

    if parsed.response.is_empty() {
      return Ok(EMPTY_REPLY.to_string());
    }
    Ok(parsed.response)
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
