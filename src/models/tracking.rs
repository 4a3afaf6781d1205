use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Body of a `daily_tracking` row, keyed by (user, date)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DailyTracking {
  #[serde(default, deserialize_with = "null_as_default")]
  pub water_intake_oz: i64,
  #[serde(default, deserialize_with = "null_as_default")]
  pub took_supplements: bool,
  #[serde(default, deserialize_with = "null_as_default")]
  pub took_preworkout: bool,
  #[serde(default, deserialize_with = "null_as_default")]
  pub notes: String,
}

/// Body of a `smartwatch_data` row, keyed by (user, date). Entered by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct SmartwatchData {
  #[serde(default, deserialize_with = "null_as_default")]
  pub steps: i64,
  #[serde(default, deserialize_with = "null_as_default")]
  pub calories_burned: i64,
  #[serde(default, deserialize_with = "null_as_default")]
  pub active_minutes: i64,
  #[serde(default, deserialize_with = "null_as_default")]
  pub heart_rate_avg: i64,
}
