//! Chat-completion API client
//!
//! Both chat paths end here: the direct backend replays the transcript,
//! the relay sends a context-bearing system prompt plus one user turn.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ChatError, Role, EMPTY_REPLY};

/// ---------------------------------------------------------------------------
/// Configuration
/// ---------------------------------------------------------------------------

pub const DEFAULT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const CHAT_MODEL: &str = "gpt-4o-mini";
pub const TEMPERATURE: f64 = 0.7;
pub const MAX_TOKENS: u32 = 500;

/// ---------------------------------------------------------------------------
/// Wire Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WireMessage {
  pub role: Role,
  pub content: String,
}

impl WireMessage {
  pub fn system(content: impl Into<String>) -> Self {
    Self { role: Role::System, content: content.into() }
  }

  pub fn user(content: impl Into<String>) -> Self {
    Self { role: Role::User, content: content.into() }
  }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
  model: &'a str,
  messages: &'a [WireMessage],
  temperature: f64,
  max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
  #[serde(default)]
  choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
  message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
  content: Option<String>,
}

/// ---------------------------------------------------------------------------
/// Client
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CompletionClient {
  client: Client,
  api_key: String,
  url: String,
}

impl CompletionClient {
  pub fn new(api_key: impl Into<String>, url: impl Into<String>) -> Self {
    Self {
      client: Client::new(),
      api_key: api_key.into(),
      url: url.into(),
    }
  }

  /// Create a client from `OPENAI_API_KEY`, honouring `OPENAI_API_URL`
  pub fn from_env() -> Result<Self, ChatError> {
    let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| ChatError::MissingApiKey)?;
    let url =
      std::env::var("OPENAI_API_URL").unwrap_or_else(|_| DEFAULT_COMPLETIONS_URL.to_string());
    Ok(Self::new(api_key, url))
  }

  /// Request one completion. A missing or empty first choice yields the
  /// stock apology rather than an error.
  pub async fn complete(&self, messages: &[WireMessage]) -> Result<String, ChatError> {
    let request = CompletionRequest {
      model: CHAT_MODEL,
      messages,
      temperature: TEMPERATURE,
      max_tokens: MAX_TOKENS,
    };

    debug!(turns = messages.len(), "Requesting chat completion");

    let response = self
      .client
      .post(&self.url)
      .bearer_auth(&self.api_key)
      .json(&request)
      .send()
      .await
      .map_err(|e| ChatError::Request(e.to_string()))?;

    let status = response.status();
    let body = response
      .text()
      .await
      .map_err(|e| ChatError::Request(e.to_string()))?;

    if !status.is_success() {
      return Err(ChatError::Api(body));
    }

    let parsed: CompletionResponse =
      serde_json::from_str(&body).map_err(|e| ChatError::Parse(e.to_string()))?;

    Ok(first_reply(parsed))
  }
}

fn first_reply(response: CompletionResponse) -> String {
  response
    .choices
    .into_iter()
    .next()
    .and_then(|c| c.message)
    .and_then(|m| m.content)
    .filter(|text| !text.is_empty())
    .unwrap_or_else(|| EMPTY_REPLY.to_string())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
