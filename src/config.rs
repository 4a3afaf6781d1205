//! Environment-driven configuration
//!
//! The binaries load `.env` with `dotenvy` first; everything here reads the
//! process environment only.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::chat::completion::DEFAULT_COMPLETIONS_URL;
use crate::chat::{ChatBackend, CompletionClient, DirectChat, RelayChat};
use crate::db;
use crate::store::{FitnessStore, RestStore, SqliteStore, StoreError};

/// ---------------------------------------------------------------------------
/// Defaults
/// ---------------------------------------------------------------------------

pub const DEFAULT_RELAY_ADDR: &str = "0.0.0.0:8787";
pub const DEFAULT_USER_ID: &str = "demo-user-123";
const RELAY_FUNCTION_PATH: &str = "functions/v1/fitness-chat";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Missing configuration: {0}")]
  Missing(String),

  #[error("Invalid value for {name}: {value}")]
  Invalid { name: String, value: String },
}

/// ---------------------------------------------------------------------------
/// Configuration Types
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatMode {
  #[default]
  Direct,
  Relay,
}

impl fmt::Display for ChatMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ChatMode::Direct => write!(f, "direct"),
      ChatMode::Relay => write!(f, "relay"),
    }
  }
}

impl FromStr for ChatMode {
  type Err = ConfigError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "direct" => Ok(ChatMode::Direct),
      "relay" => Ok(ChatMode::Relay),
      _ => Err(ConfigError::Invalid {
        name: "CHAT_MODE".into(),
        value: s.to_string(),
      }),
    }
  }
}

/// Where rows live: the hosted row store, or a local SQLite file
#[derive(Debug, Clone, PartialEq)]
pub enum StoreConfig {
  Rest {
    url: String,
    anon_key: String,
    service_role_key: Option<String>,
  },
  Sqlite {
    path: PathBuf,
  },
}

#[derive(Debug, Clone)]
pub struct Config {
  pub store: StoreConfig,
  pub openai_api_key: Option<String>,
  pub openai_api_url: String,
  pub chat_mode: ChatMode,
  pub relay_url: Option<String>,
  pub relay_addr: SocketAddr,
  pub user_id: String,
}

fn var(name: &str) -> Option<String> {
  env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn required(name: &str) -> Result<String, ConfigError> {
  var(name).ok_or_else(|| ConfigError::Missing(name.into()))
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    let store = match var("SUPABASE_URL") {
      Some(url) => StoreConfig::Rest {
        url,
        anon_key: required("SUPABASE_ANON_KEY")?,
        service_role_key: var("SUPABASE_SERVICE_ROLE_KEY"),
      },
      None => StoreConfig::Sqlite {
        path: var("HOURGLASS_DB")
          .map(PathBuf::from)
          .unwrap_or_else(db::default_db_path),
      },
    };

    let chat_mode = match var("CHAT_MODE") {
      Some(mode) => mode.parse()?,
      None => ChatMode::default(),
    };

    let relay_url = var("CHAT_RELAY_URL").or_else(|| match &store {
      StoreConfig::Rest { url, .. } => {
        Some(format!("{}/{}", url.trim_end_matches('/'), RELAY_FUNCTION_PATH))
      }
      StoreConfig::Sqlite { .. } => None,
    });

    let relay_addr_raw = var("RELAY_ADDR").unwrap_or_else(|| DEFAULT_RELAY_ADDR.to_string());
    let relay_addr = relay_addr_raw.parse().map_err(|_| ConfigError::Invalid {
      name: "RELAY_ADDR".into(),
      value: relay_addr_raw.clone(),
    })?;

    Ok(Self {
      store,
      openai_api_key: var("OPENAI_API_KEY"),
      openai_api_url: var("OPENAI_API_URL").unwrap_or_else(|| DEFAULT_COMPLETIONS_URL.to_string()),
      chat_mode,
      relay_url,
      relay_addr,
      user_id: var("HOURGLASS_USER").unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
    })
  }

  pub fn completion_client(&self) -> Option<CompletionClient> {
    self
      .openai_api_key
      .as_ref()
      .map(|key| CompletionClient::new(key.clone(), self.openai_api_url.clone()))
  }

  /// The chat backend selected by `CHAT_MODE`
  pub fn chat_backend(&self) -> Result<Box<dyn ChatBackend>, ConfigError> {
    match self.chat_mode {
      ChatMode::Direct => {
        let client = self
          .completion_client()
          .ok_or_else(|| ConfigError::Missing("OPENAI_API_KEY".into()))?;
        Ok(Box::new(DirectChat::new(client)))
      }
      ChatMode::Relay => {
        let url = self
          .relay_url
          .clone()
          .ok_or_else(|| ConfigError::Missing("CHAT_RELAY_URL".into()))?;
        let key = match &self.store {
          StoreConfig::Rest { anon_key, .. } => Some(anon_key.clone()),
          StoreConfig::Sqlite { .. } => None,
        };
        Ok(Box::new(RelayChat::new(url, key)))
      }
    }
  }

  /// Store for client-side operations, authenticated with the anon key
  pub async fn open_store(&self) -> Result<Arc<dyn FitnessStore>, StoreError> {
    match &self.store {
      StoreConfig::Rest { url, anon_key, .. } => Ok(Arc::new(RestStore::new(url, anon_key)?)),
      StoreConfig::Sqlite { path } => open_sqlite(path).await,
    }
  }

  /// Store for the relay; prefers the service-role key when one is set
  pub async fn open_relay_store(&self) -> Result<Arc<dyn FitnessStore>, StoreError> {
    match &self.store {
      StoreConfig::Rest { url, anon_key, service_role_key } => {
        let key = service_role_key.as_deref().unwrap_or(anon_key);
        Ok(Arc::new(RestStore::new(url, key)?))
      }
      StoreConfig::Sqlite { path } => open_sqlite(path).await,
    }
  }
}

async fn open_sqlite(path: &std::path::Path) -> Result<Arc<dyn FitnessStore>, StoreError> {
  let pool = db::initialize_db(path).await?;
  info!(path = %path.display(), "Using local SQLite store");
  Ok(Arc::new(SqliteStore::new(pool)))
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
