use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub type DbPool = SqlitePool;

const DB_FILE_NAME: &str = "hourglass.db";

/// Default location of the local database file: `$HOME/.hourglass/hourglass.db`,
/// or the working directory when there is no home.
pub fn default_db_path() -> PathBuf {
  std::env::var_os("HOME")
    .map(|home| PathBuf::from(home).join(".hourglass"))
    .unwrap_or_else(|| PathBuf::from("."))
    .join(DB_FILE_NAME)
}

/// Open (creating if needed) the database file and run migrations
pub async fn initialize_db(db_path: &Path) -> Result<DbPool, sqlx::Error> {
  if let Some(dir) = db_path.parent() {
    // Create directory if it doesn't exist
    fs::create_dir_all(dir)?;
  }

  let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
  info!(path = %db_path.display(), "Initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(5)
    .connect(&db_url)
    .await?;

  migrate(&pool).await?;
  Ok(pool)
}

/// In-memory database, single connection so every query sees the same data
pub async fn initialize_memory_db() -> Result<DbPool, sqlx::Error> {
  let pool = SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await?;

  migrate(&pool).await?;
  Ok(pool)
}

async fn migrate(pool: &DbPool) -> Result<(), sqlx::Error> {
  sqlx::migrate!("./migrations").run(pool).await?;
  info!("Database migrations applied");
  Ok(())
}
