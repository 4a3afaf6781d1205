//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - In-memory store setup
//! - Mock data factories
//! - Fixed dates so persisted keys are predictable

use chrono::NaiveDate;

use crate::db;
use crate::models::{DailyTracking, NutritionProfile, SmartwatchData};
use crate::store::SqliteStore;

pub const TEST_USER: &str = "test-user-1";

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite store for testing. Runs all migrations
/// (including the meal plan seed) and returns a ready-to-use store.
///
/// The pool is capped at one connection; each extra connection to
/// `sqlite::memory:` would open its own empty database.
pub async fn setup_test_store() -> SqliteStore {
  let pool = db::initialize_memory_db()
    .await
    .expect("Failed to create in-memory database");
  SqliteStore::new(pool)
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

pub fn test_date() -> NaiveDate {
  NaiveDate::from_ymd_opt(2026, 10, 13).expect("valid date")
}

pub fn mock_profile(weight_lbs: f64, goal: &str) -> NutritionProfile {
  let mut profile = NutritionProfile {
    weight_lbs,
    goal: goal.to_string(),
    ..NutritionProfile::default()
  };
  profile.recalculate();
  profile
}

pub fn mock_tracking(water_intake_oz: i64) -> DailyTracking {
  DailyTracking {
    water_intake_oz,
    took_supplements: true,
    took_preworkout: false,
    notes: String::new(),
  }
}

pub fn mock_smartwatch() -> SmartwatchData {
  SmartwatchData {
    steps: 8000,
    calories_burned: 350,
    active_minutes: 45,
    heart_rate_avg: 74,
  }
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::FitnessStore;

  #[tokio::test]
  async fn test_setup_store_creates_schema() {
    let store = setup_test_store().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN \
       ('user_nutrition_profile', 'workout_progress', 'daily_tracking', 'smartwatch_data', 'meal_plans')",
    )
    .fetch_all(store.pool())
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 5, "got {:?}", tables);
  }

  #[tokio::test]
  async fn test_mock_factories_persist() {
    let store = setup_test_store().await;
    store
      .save_daily_tracking(TEST_USER, test_date(), &mock_tracking(32))
      .await
      .unwrap();
    store
      .save_smartwatch(TEST_USER, test_date(), &mock_smartwatch())
      .await
      .unwrap();

    let tracking = store.load_daily_tracking(TEST_USER, test_date()).await.unwrap();
    assert_eq!(tracking.map(|t| t.water_intake_oz), Some(32));
  }

  #[test]
  fn test_mock_profile_is_consistent() {
    let profile = mock_profile(180.0, "Maintain");
    assert_eq!(profile.protein_g, 180);
    assert_eq!(profile.targets(), crate::macros::calculate_macros(&profile.input()));
  }
}
