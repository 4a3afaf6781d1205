//! Daily habit tracking and manually entered smartwatch counters

use serde::{Deserialize, Serialize};

use crate::macros::coerce_int;
use crate::models::{DailyTracking, SmartwatchData};

pub const WATER_GOAL_OZ: i64 = 64;
pub const WATER_SMALL_OZ: i64 = 8;
pub const WATER_LARGE_OZ: i64 = 16;

impl DailyTracking {
  /// Additive for non-negative amounts: two calls equal one call with
  /// the sum. The total saturates at `i64::MAX` and is floored at 0, so a
  /// negative amount takes water off without going below empty.
  pub fn add_water(&mut self, ounces: i64) {
    self.water_intake_oz = self.water_intake_oz.saturating_add(ounces).max(0);
  }

  pub fn reset_water(&mut self) {
    self.water_intake_oz = 0;
  }

  /// Share of the daily water goal, capped at 100
  pub fn water_progress_pct(&self) -> u8 {
    let pct = 100.0 * self.water_intake_oz as f64 / WATER_GOAL_OZ as f64;
    pct.round().clamp(0.0, 100.0) as u8
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchMetric {
  Steps,
  CaloriesBurned,
  ActiveMinutes,
  HeartRateAvg,
}

impl std::str::FromStr for WatchMetric {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
      "steps" => Ok(Self::Steps),
      "calories_burned" | "calories" => Ok(Self::CaloriesBurned),
      "active_minutes" | "minutes" => Ok(Self::ActiveMinutes),
      "heart_rate_avg" | "heart_rate" | "hr" => Ok(Self::HeartRateAvg),
      other => Err(format!("Unknown smartwatch metric: {}", other)),
    }
  }
}

impl SmartwatchData {
  /// Overwrite one counter; negative values become 0
  pub fn set(&mut self, metric: WatchMetric, value: i64) {
    let value = value.max(0);
    match metric {
      WatchMetric::Steps => self.steps = value,
      WatchMetric::CaloriesBurned => self.calories_burned = value,
      WatchMetric::ActiveMinutes => self.active_minutes = value,
      WatchMetric::HeartRateAvg => self.heart_rate_avg = value,
    }
  }

  /// Overwrite one counter from raw field text
  pub fn set_from_text(&mut self, metric: WatchMetric, text: &str) {
    self.set(metric, coerce_int(text));
  }

  pub fn get(&self, metric: WatchMetric) -> i64 {
    match metric {
      WatchMetric::Steps => self.steps,
      WatchMetric::CaloriesBurned => self.calories_burned,
      WatchMetric::ActiveMinutes => self.active_minutes,
      WatchMetric::HeartRateAvg => self.heart_rate_avg,
    }
  }
}
