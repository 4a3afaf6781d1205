use std::error::Error;

use tokio::net::TcpListener;
use tracing::{info, warn};

use hourglass_lib::chat::relay::{router, RelayState};
use hourglass_lib::{logging, Config};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
  dotenvy::dotenv().ok();
  logging::init();

  let config = Config::from_env()?;
  let store = config.open_relay_store().await?;

  let completions = config.completion_client();
  if completions.is_none() {
    warn!("OPENAI_API_KEY is not set; chat requests will fail");
  }

  let app = router(RelayState::new(store, completions));
  let listener = TcpListener::bind(config.relay_addr).await?;
  info!(addr = %config.relay_addr, "Fitness chat relay listening");

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;

  info!("Relay stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    warn!(error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
}
