//! Today's habits and smartwatch counters

use chrono::NaiveDate;
use tracing::warn;

use super::AppState;
use crate::models::{DailyTracking, SmartwatchData};
use crate::tracking::WatchMetric;

pub struct DailyTracker {
  state: AppState,
  date: NaiveDate,
  tracking: DailyTracking,
  smartwatch: SmartwatchData,
}

impl DailyTracker {
  pub async fn open(state: AppState, date: NaiveDate) -> Self {
    let tracking = match state.store.load_daily_tracking(&state.user_id, date).await {
      Ok(found) => found.unwrap_or_default(),
      Err(e) => {
        warn!(%date, error = %e, "Failed to load daily tracking");
        DailyTracking::default()
      }
    };
    let smartwatch = match state.store.load_smartwatch(&state.user_id, date).await {
      Ok(found) => found.unwrap_or_default(),
      Err(e) => {
        warn!(%date, error = %e, "Failed to load smartwatch data");
        SmartwatchData::default()
      }
    };

    Self { state, date, tracking, smartwatch }
  }

  pub fn tracking(&self) -> &DailyTracking {
    &self.tracking
  }

  pub fn smartwatch(&self) -> &SmartwatchData {
    &self.smartwatch
  }

  pub async fn add_water(&mut self, ounces: i64) {
    self.tracking.add_water(ounces);
    self.save_tracking().await;
  }

  pub async fn reset_water(&mut self) {
    self.tracking.reset_water();
    self.save_tracking().await;
  }

  pub async fn set_supplements(&mut self, taken: bool) {
    self.tracking.took_supplements = taken;
    self.save_tracking().await;
  }

  pub async fn set_preworkout(&mut self, taken: bool) {
    self.tracking.took_preworkout = taken;
    self.save_tracking().await;
  }

  pub async fn set_notes(&mut self, notes: impl Into<String>) {
    self.tracking.notes = notes.into();
    self.save_tracking().await;
  }

  /// Overwrite one counter from field text and stamp a sync
  pub async fn set_metric(&mut self, metric: WatchMetric, text: &str) {
    self.smartwatch.set_from_text(metric, text);
    if let Err(e) = self
      .state
      .store
      .save_smartwatch(&self.state.user_id, self.date, &self.smartwatch)
      .await
    {
      warn!(error = %e, "Failed to save smartwatch data");
    }
  }

  async fn save_tracking(&self) {
    if let Err(e) = self
      .state
      .store
      .save_daily_tracking(&self.state.user_id, self.date, &self.tracking)
      .await
    {
      warn!(error = %e, "Failed to save daily tracking");
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::commands::testing::{local_state, offline_state};
  use crate::test_utils::{mock_smartwatch, mock_tracking, test_date};
  use crate::tracking::{WATER_LARGE_OZ, WATER_SMALL_OZ};

  #[tokio::test]
  async fn test_water_and_flags_persist() {
    let state = local_state().await;
    let mut tracker = DailyTracker::open(state.clone(), test_date()).await;

    tracker.add_water(WATER_SMALL_OZ).await;
    tracker.add_water(WATER_LARGE_OZ).await;
    tracker.set_supplements(true).await;
    tracker.set_notes("Legs sore").await;

    let reopened = DailyTracker::open(state.clone(), test_date()).await;
    assert_eq!(reopened.tracking().water_intake_oz, 24);
    assert!(reopened.tracking().took_supplements);
    assert!(!reopened.tracking().took_preworkout);
    assert_eq!(reopened.tracking().notes, "Legs sore");

    tracker.reset_water().await;
    let reopened = DailyTracker::open(state, test_date()).await;
    assert_eq!(reopened.tracking().water_intake_oz, 0);
  }

  #[tokio::test]
  async fn test_open_continues_saved_day() {
    let state = local_state().await;
    state
      .store
      .save_daily_tracking(&state.user_id, test_date(), &mock_tracking(32))
      .await
      .unwrap();
    state
      .store
      .save_smartwatch(&state.user_id, test_date(), &mock_smartwatch())
      .await
      .unwrap();

    let mut tracker = DailyTracker::open(state, test_date()).await;
    assert!(tracker.tracking().took_supplements);
    assert_eq!(tracker.smartwatch(), &mock_smartwatch());

    tracker.add_water(WATER_SMALL_OZ).await;
    assert_eq!(tracker.tracking().water_intake_oz, 40);
  }

  #[tokio::test]
  async fn test_smartwatch_fields_independent() {
    let state = local_state().await;
    let mut tracker = DailyTracker::open(state.clone(), test_date()).await;

    tracker.set_metric(WatchMetric::Steps, "9500").await;
    tracker.set_metric(WatchMetric::HeartRateAvg, "72bpm").await;
    tracker.set_metric(WatchMetric::ActiveMinutes, "abc").await;

    let reopened = DailyTracker::open(state, test_date()).await;
    let watch = reopened.smartwatch();
    assert_eq!(watch.steps, 9500);
    assert_eq!(watch.heart_rate_avg, 72);
    assert_eq!(watch.active_minutes, 0);
    assert_eq!(watch.calories_burned, 0);
  }

  #[tokio::test]
  async fn test_other_dates_start_empty() {
    let state = local_state().await;
    let mut tracker = DailyTracker::open(state.clone(), test_date()).await;
    tracker.add_water(32).await;

    let tomorrow = test_date().succ_opt().unwrap();
    let other = DailyTracker::open(state, tomorrow).await;
    assert_eq!(other.tracking(), &DailyTracking::default());
  }

  #[tokio::test]
  async fn test_offline_keeps_memory_state() {
    let mut tracker = DailyTracker::open(offline_state(), test_date()).await;
    tracker.add_water(16).await;
    tracker.set_metric(WatchMetric::Steps, "100").await;
    assert_eq!(tracker.tracking().water_intake_oz, 16);
    assert_eq!(tracker.smartwatch().steps, 100);
  }
}
