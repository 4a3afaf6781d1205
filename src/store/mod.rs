//! Persistence contracts
//!
//! Every user-owned table is written by overwrite upsert on its composite
//! key and read by exact-match equality on that key. Two backends implement
//! [`FitnessStore`]: the hosted row store over REST, and a local SQLite
//! database with the same tables.

mod rest;
mod sqlite;

pub use rest::RestStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{
  DailyTracking, DietType, MealPlan, NutritionProfile, ProgressKey, SmartwatchData,
  WorkoutProgress,
};

/// ---------------------------------------------------------------------------
/// Table Names
/// ---------------------------------------------------------------------------

pub const NUTRITION_TABLE: &str = "user_nutrition_profile";
pub const PROGRESS_TABLE: &str = "workout_progress";
pub const TRACKING_TABLE: &str = "daily_tracking";
pub const SMARTWATCH_TABLE: &str = "smartwatch_data";
pub const MEAL_PLANS_TABLE: &str = "meal_plans";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("HTTP request failed: {0}")]
  Request(#[from] reqwest::Error),

  #[error("Row store returned {status}: {body}")]
  Api { status: u16, body: String },

  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Failed to decode stored row: {0}")]
  Decode(String),

  #[error("Invalid store URL: {0}")]
  InvalidUrl(String),
}

impl From<serde_json::Error> for StoreError {
  fn from(e: serde_json::Error) -> Self {
    StoreError::Decode(e.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Store Trait
/// ---------------------------------------------------------------------------

#[async_trait]
pub trait FitnessStore: Send + Sync {
  async fn load_nutrition_profile(&self, user_id: &str)
    -> Result<Option<NutritionProfile>, StoreError>;

  async fn save_nutrition_profile(
    &self,
    user_id: &str,
    profile: &NutritionProfile,
  ) -> Result<(), StoreError>;

  async fn load_workout_progress(
    &self,
    key: &ProgressKey,
  ) -> Result<Option<WorkoutProgress>, StoreError>;

  async fn save_workout_progress(
    &self,
    key: &ProgressKey,
    progress: &WorkoutProgress,
  ) -> Result<(), StoreError>;

  async fn load_daily_tracking(
    &self,
    user_id: &str,
    date: NaiveDate,
  ) -> Result<Option<DailyTracking>, StoreError>;

  async fn save_daily_tracking(
    &self,
    user_id: &str,
    date: NaiveDate,
    tracking: &DailyTracking,
  ) -> Result<(), StoreError>;

  async fn load_smartwatch(
    &self,
    user_id: &str,
    date: NaiveDate,
  ) -> Result<Option<SmartwatchData>, StoreError>;

  /// Upsert; stamps the row's sync time
  async fn save_smartwatch(
    &self,
    user_id: &str,
    date: NaiveDate,
    data: &SmartwatchData,
  ) -> Result<(), StoreError>;

  /// Meal plans for one diet, ordered Monday first
  async fn meal_plans(&self, diet: DietType) -> Result<Vec<MealPlan>, StoreError>;

  /// Workout and nutrition history handed to the coach as prompt context
  async fn user_context(&self, user_id: &str) -> Result<serde_json::Value, StoreError>;
}
