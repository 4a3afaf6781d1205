//! Tracing setup shared by the binaries

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging at `info`, overridable with `RUST_LOG`
pub fn init() {
  init_with_level("info")
}

/// Initialize logging with a specific default level. `RUST_LOG` still wins.
pub fn init_with_level(default_level: &str) {
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().compact())
    .init();
}
