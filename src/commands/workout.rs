//! Workout tracker: one (level, day) selection for one calendar date

use chrono::NaiveDate;
use tracing::{info, warn};

use super::AppState;
use crate::models::LoggedSet;
use crate::plan::{DayWorkout, Level, Weekday, WorkoutPlan};
use crate::progress::{ProgressError, ProgressUpdate, WorkoutSession};

pub struct WorkoutTracker {
  state: AppState,
  date: NaiveDate,
  plan: &'static WorkoutPlan,
  session: WorkoutSession,
}

impl WorkoutTracker {
  /// Open a selection and load whatever was saved for it on `date`
  pub async fn open(state: AppState, date: NaiveDate, level: Level, day: Weekday) -> Self {
    let plan = WorkoutPlan::builtin();
    let session = WorkoutSession::new(level, plan.day(level, day));
    let mut tracker = Self { state, date, plan, session };
    tracker.load().await;
    tracker
  }

  /// Switch level or day; progress for the new selection is reloaded
  pub async fn select(&mut self, level: Level, day: Weekday) {
    self.session = WorkoutSession::new(level, self.plan.day(level, day));
    self.load().await;
  }

  async fn load(&mut self) {
    let plan = self.plan;
    let level = self.session.level();
    let workout = plan.day(level, self.session.day());
    let key = self.session.key(&self.state.user_id, self.date);

    match self.state.store.load_workout_progress(&key).await {
      Ok(Some(record)) => {
        self.session = WorkoutSession::from_record(level, workout, record);
      }
      Ok(None) => {}
      Err(e) => {
        warn!(level = %level, day = %key.day, error = %e, "Failed to load workout progress");
      }
    }
  }

  pub fn workout(&self) -> &DayWorkout {
    self.plan.day(self.session.level(), self.session.day())
  }

  pub fn session(&self) -> &WorkoutSession {
    &self.session
  }

  pub fn date(&self) -> NaiveDate {
    self.date
  }

  pub async fn toggle(&mut self, exercise_id: &str) -> Result<ProgressUpdate, ProgressError> {
    let update = self.session.toggle(exercise_id)?;
    self.persist(update).await;
    Ok(update)
  }

  pub async fn record_sets(&mut self, exercise_id: &str, sets: Vec<LoggedSet>) -> ProgressUpdate {
    let update = self.session.record_sets(exercise_id, sets);
    self.persist(update).await;
    update
  }

  pub async fn mark_all_complete(&mut self) -> ProgressUpdate {
    let update = self.session.mark_all_complete();
    self.persist(update).await;
    update
  }

  async fn persist(&self, update: ProgressUpdate) {
    let key = self.session.key(&self.state.user_id, self.date);
    let record = self.session.to_record();

    if let Err(e) = self.state.store.save_workout_progress(&key, &record).await {
      warn!(error = %e, "Failed to save workout progress");
      return;
    }
    if update.celebrate {
      info!(level = %key.level, day = %key.day, "Workout complete");
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::commands::testing::{local_state, offline_state};
  use crate::test_utils::test_date;

  #[tokio::test]
  async fn test_toggle_persists_and_reloads() {
    let state = local_state().await;
    let mut tracker =
      WorkoutTracker::open(state.clone(), test_date(), Level::One, Weekday::Tuesday).await;
    assert_eq!(tracker.session().completed_count(), 0);

    let update = tracker.toggle("l1-tue-1").await.unwrap();
    assert_eq!(update.percentage, 50);
    assert!(!update.celebrate);

    let reopened = WorkoutTracker::open(state, test_date(), Level::One, Weekday::Tuesday).await;
    assert!(reopened.session().is_completed("l1-tue-1"));
    assert_eq!(reopened.session().completion_percentage(), 50);
  }

  #[tokio::test]
  async fn test_completion_celebrates_once() {
    let state = local_state().await;
    let mut tracker =
      WorkoutTracker::open(state.clone(), test_date(), Level::One, Weekday::Tuesday).await;

    tracker.toggle("l1-tue-1").await.unwrap();
    let done = tracker.toggle("l1-tue-2").await.unwrap();
    assert!(done.is_complete && done.celebrate);

    let again = tracker
      .record_sets("l1-tue-2", vec![LoggedSet::new("12", Some("20"))])
      .await;
    assert!(again.is_complete && !again.celebrate);

    let key = tracker.session().key(&state.user_id, test_date());
    let stored = state.store.load_workout_progress(&key).await.unwrap().unwrap();
    assert!(stored.is_complete);
    assert_eq!(stored.exercise_details.len(), 1);
  }

  #[tokio::test]
  async fn test_select_switches_record() {
    let state = local_state().await;
    let mut tracker =
      WorkoutTracker::open(state, test_date(), Level::One, Weekday::Wednesday).await;
    assert!(tracker.workout().is_rest_day());
    tracker.mark_all_complete().await;

    tracker.select(Level::Two, Weekday::Monday).await;
    assert_eq!(tracker.session().completed_count(), 0);
    assert_eq!(tracker.workout().exercises.len(), 17);

    tracker.select(Level::One, Weekday::Wednesday).await;
    assert!(tracker.session().is_fully_complete());
  }

  #[tokio::test]
  async fn test_unknown_exercise_rejected() {
    let state = local_state().await;
    let mut tracker = WorkoutTracker::open(state, test_date(), Level::One, Weekday::Monday).await;
    assert!(tracker.toggle("l2-mon-1").await.is_err());
  }

  #[tokio::test]
  async fn test_store_failure_keeps_memory_state() {
    let mut tracker =
      WorkoutTracker::open(offline_state(), test_date(), Level::One, Weekday::Tuesday).await;
    let update = tracker.toggle("l1-tue-1").await.unwrap();
    assert_eq!(update.percentage, 50);
    assert!(tracker.session().is_completed("l1-tue-1"));
  }
}
