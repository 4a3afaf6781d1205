use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::null_as_default;
use crate::plan::{Level, Weekday};

/// One logged set. Both fields are free text as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedSet {
  pub reps: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub weight: Option<String>,
}

impl LoggedSet {
  pub fn new(reps: impl Into<String>, weight: Option<&str>) -> Self {
    Self {
      reps: reps.into(),
      weight: weight.map(str::to_string),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseDetail {
  pub exercise_id: String,
  pub completed_sets: Vec<LoggedSet>,
}

/// Composite key of `workout_progress`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgressKey {
  pub user_id: String,
  pub workout_date: NaiveDate,
  pub level: Level,
  pub day: Weekday,
}

/// Stored body of a `workout_progress` row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkoutProgress {
  #[serde(default, deserialize_with = "null_as_default")]
  pub completed_exercises: Vec<String>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub exercise_details: Vec<ExerciseDetail>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub is_complete: bool,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_null_columns_read_as_empty() {
    let row: WorkoutProgress = serde_json::from_str(
      r#"{"completed_exercises": ["l1-tue-1"], "exercise_details": null, "is_complete": null}"#,
    )
    .unwrap();
    assert_eq!(row.completed_exercises, vec!["l1-tue-1".to_string()]);
    assert!(row.exercise_details.is_empty());
    assert!(!row.is_complete);

    let row: WorkoutProgress = serde_json::from_str(r#"{"completed_exercises": null}"#).unwrap();
    assert_eq!(row, WorkoutProgress::default());
  }
}
