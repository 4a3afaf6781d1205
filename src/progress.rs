//! Per-day workout progress aggregation
//!
//! A [`WorkoutSession`] holds, for one (level, weekday) selection, the
//! ordered exercise ids from the static plan plus the mutable completion set
//! and logged-set details. Completion percentage and the complete flag are
//! always derived from the current set, never cached.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::models::{ExerciseDetail, LoggedSet, ProgressKey, WorkoutProgress};
use crate::plan::{DayWorkout, Level, Weekday};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgressError {
  #[error("Exercise {0} is not part of this workout")]
  UnknownExercise(String),
}

/// Outcome of a mutation, as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressUpdate {
  pub percentage: u8,
  pub is_complete: bool,
  /// True only when this mutation moved the day from incomplete to complete
  pub celebrate: bool,
}

#[derive(Debug, Clone)]
pub struct WorkoutSession {
  level: Level,
  day: Weekday,
  exercise_ids: Vec<String>,
  completed: BTreeSet<String>,
  details: BTreeMap<String, Vec<LoggedSet>>,
}

impl WorkoutSession {
  pub fn new(level: Level, workout: &DayWorkout) -> Self {
    Self {
      level,
      day: workout.day,
      exercise_ids: workout.exercise_ids(),
      completed: BTreeSet::new(),
      details: BTreeMap::new(),
    }
  }

  /// Rebuild a session from a stored row. Completion ids that are no longer
  /// in the day's plan are dropped.
  pub fn from_record(level: Level, workout: &DayWorkout, record: WorkoutProgress) -> Self {
    let mut session = Self::new(level, workout);
    session.completed = record
      .completed_exercises
      .into_iter()
      .filter(|id| session.exercise_ids.contains(id))
      .collect();
    session.details = record
      .exercise_details
      .into_iter()
      .map(|d| (d.exercise_id, d.completed_sets))
      .collect();
    session
  }

  pub fn level(&self) -> Level {
    self.level
  }

  pub fn day(&self) -> Weekday {
    self.day
  }

  pub fn exercise_ids(&self) -> &[String] {
    &self.exercise_ids
  }

  pub fn is_completed(&self, exercise_id: &str) -> bool {
    self.completed.contains(exercise_id)
  }

  pub fn completed_count(&self) -> usize {
    self.completed.len()
  }

  /// Logged sets for an exercise; empty when nothing was logged
  pub fn sets(&self, exercise_id: &str) -> &[LoggedSet] {
    self.details.get(exercise_id).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn completion_percentage(&self) -> u8 {
    if self.exercise_ids.is_empty() {
      return 0;
    }
    let pct = 100.0 * self.completed.len() as f64 / self.exercise_ids.len() as f64;
    pct.round() as u8
  }

  pub fn is_fully_complete(&self) -> bool {
    !self.exercise_ids.is_empty() && self.completion_percentage() == 100
  }

  pub fn toggle(&mut self, exercise_id: &str) -> Result<ProgressUpdate, ProgressError> {
    if !self.exercise_ids.iter().any(|id| id == exercise_id) {
      return Err(ProgressError::UnknownExercise(exercise_id.to_string()));
    }

    let was_complete = self.is_fully_complete();
    if !self.completed.remove(exercise_id) {
      self.completed.insert(exercise_id.to_string());
    }
    Ok(self.update(was_complete))
  }

  /// Replace the logged sets for an exercise wholesale
  pub fn record_sets(&mut self, exercise_id: &str, sets: Vec<LoggedSet>) -> ProgressUpdate {
    let was_complete = self.is_fully_complete();
    self.details.insert(exercise_id.to_string(), sets);
    self.update(was_complete)
  }

  pub fn mark_all_complete(&mut self) -> ProgressUpdate {
    let was_complete = self.is_fully_complete();
    self.completed = self.exercise_ids.iter().cloned().collect();
    self.update(was_complete)
  }

  fn update(&self, was_complete: bool) -> ProgressUpdate {
    let is_complete = self.is_fully_complete();
    ProgressUpdate {
      percentage: self.completion_percentage(),
      is_complete,
      celebrate: is_complete && !was_complete,
    }
  }

  pub fn key(&self, user_id: &str, date: NaiveDate) -> ProgressKey {
    ProgressKey {
      user_id: user_id.to_string(),
      workout_date: date,
      level: self.level,
      day: self.day,
    }
  }

  /// Full row body for an overwrite upsert
  pub fn to_record(&self) -> WorkoutProgress {
    WorkoutProgress {
      completed_exercises: self.completed.iter().cloned().collect(),
      exercise_details: self
        .details
        .iter()
        .map(|(id, sets)| ExerciseDetail {
          exercise_id: id.clone(),
          completed_sets: sets.clone(),
        })
        .collect(),
      is_complete: self.completed.len() == self.exercise_ids.len(),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
