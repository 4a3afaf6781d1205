//! Context-injecting chat relay
//!
//! Accepts `{message, userId}`, looks up the user's stored history through
//! the store's context procedure, folds it into the coach system prompt and
//! answers with `{response}`. Any failure other than the context lookup is
//! a 500 with `{error}`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderName, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use super::completion::{CompletionClient, WireMessage};
use super::ChatError;
use crate::store::FitnessStore;

/// ---------------------------------------------------------------------------
/// Wire Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayRequest {
  pub message: String,
  #[serde(rename = "userId")]
  pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayResponse {
  pub response: String,
}

#[derive(Debug, Serialize)]
struct RelayErrorBody {
  error: String,
}

/// ---------------------------------------------------------------------------
/// Prompt
/// ---------------------------------------------------------------------------

/// Coach persona with the serialized user context embedded verbatim. An
/// empty context leaves the section blank.
pub fn build_system_prompt(context: &str) -> String {
  format!(
    "You are a professional fitness coach and nutrition expert integrated into a fitness tracking app. \
You have access to the user's workout history, nutrition profile, and progress data.

User Context:
{context}

Your role:
- Provide personalized workout and nutrition advice based on their data
- Answer questions about exercises, form, and technique
- Help interpret their macro calculations and meal plans
- Motivate and encourage based on their progress
- Suggest modifications or progressions for exercises
- Be supportive, knowledgeable, and concise
- Reference their specific data when relevant (e.g., \"Based on your last leg workout...\")

Keep responses clear, actionable, and encouraging."
  )
}

/// ---------------------------------------------------------------------------
/// Server
/// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct RelayState {
  store: Arc<dyn FitnessStore>,
  completions: Option<CompletionClient>,
}

impl RelayState {
  /// `completions` is `None` when no API key is configured; every chat
  /// request then fails with a 500.
  pub fn new(store: Arc<dyn FitnessStore>, completions: Option<CompletionClient>) -> Self {
    Self { store, completions }
  }
}

pub fn cors_layer() -> CorsLayer {
  CorsLayer::new()
    .allow_origin(Any)
    .allow_methods([
      Method::GET,
      Method::POST,
      Method::PUT,
      Method::DELETE,
      Method::OPTIONS,
    ])
    .allow_headers([
      header::CONTENT_TYPE,
      header::AUTHORIZATION,
      HeaderName::from_static("x-client-info"),
      HeaderName::from_static("apikey"),
    ])
}

pub fn router(state: RelayState) -> Router {
  Router::new()
    .route("/", post(chat).options(preflight))
    .layer(cors_layer())
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

async fn preflight() -> StatusCode {
  StatusCode::OK
}

async fn chat(
  State(state): State<RelayState>,
  payload: Result<Json<RelayRequest>, JsonRejection>,
) -> Response {
  match reply(&state, payload).await {
    Ok(response) => Json(RelayResponse { response }).into_response(),
    Err(e) => {
      error!(error = %e, "Error in fitness chat relay");
      (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(RelayErrorBody { error: e.to_string() }),
      )
        .into_response()
    }
  }
}

async fn reply(
  state: &RelayState,
  payload: Result<Json<RelayRequest>, JsonRejection>,
) -> Result<String, ChatError> {
  let Json(request) = payload.map_err(|e| ChatError::BadRequest(e.body_text()))?;
  let completions = state.completions.as_ref().ok_or(ChatError::MissingApiKey)?;

  let context = match state.store.user_context(&request.user_id).await {
    Ok(value) => value.to_string(),
    Err(e) => {
      warn!(user_id = %request.user_id, error = %e, "User context lookup failed");
      String::new()
    }
  };

  info!(user_id = %request.user_id, context_bytes = context.len(), "Relaying chat message");

  let messages = [
    WireMessage::system(build_system_prompt(&context)),
    WireMessage::user(request.message),
  ];
  completions.complete(&messages).await
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
