//! Static two-level workout plan
//!
//! The plan is reference data, not user-owned: two levels, seven weekdays
//! each, every day an ordered list of exercises. It is embedded at compile
//! time and parsed once.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

const PLAN_JSON: &str = include_str!("../data/workout_plan.json");

/// ---------------------------------------------------------------------------
/// Error Types
/// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
  #[error("Unknown level: {0}")]
  UnknownLevel(String),

  #[error("Unknown day: {0}")]
  UnknownDay(String),

  #[error("Invalid workout plan: {0}")]
  Invalid(String),
}

/// ---------------------------------------------------------------------------
/// Level and Weekday
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
  #[serde(rename = "Level 1")]
  One,
  #[serde(rename = "Level 2")]
  Two,
}

impl Level {
  pub const ALL: [Level; 2] = [Level::One, Level::Two];

  pub fn as_str(&self) -> &'static str {
    match self {
      Level::One => "Level 1",
      Level::Two => "Level 2",
    }
  }
}

impl fmt::Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Level {
  type Err = PlanError;

  /// Accepts the wire form ("Level 1") and the bare number ("1")
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "Level 1" | "1" => Ok(Level::One),
      "Level 2" | "2" => Ok(Level::Two),
      other => Err(PlanError::UnknownLevel(other.to_string())),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Weekday {
  Monday,
  Tuesday,
  Wednesday,
  Thursday,
  Friday,
  Saturday,
  Sunday,
}

impl Weekday {
  pub const ALL: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Weekday::Monday => "Monday",
      Weekday::Tuesday => "Tuesday",
      Weekday::Wednesday => "Wednesday",
      Weekday::Thursday => "Thursday",
      Weekday::Friday => "Friday",
      Weekday::Saturday => "Saturday",
      Weekday::Sunday => "Sunday",
    }
  }

  /// Zero-based index with Monday = 0, as used by the meal plan table
  pub fn index(&self) -> usize {
    *self as usize
  }

  pub fn from_index(index: usize) -> Option<Self> {
    Self::ALL.get(index).copied()
  }
}

impl From<chrono::Weekday> for Weekday {
  fn from(day: chrono::Weekday) -> Self {
    Weekday::ALL[day.num_days_from_monday() as usize]
  }
}

impl fmt::Display for Weekday {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Weekday {
  type Err = PlanError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim();
    Weekday::ALL
      .iter()
      .find(|d| d.as_str().eq_ignore_ascii_case(wanted))
      .copied()
      .ok_or_else(|| PlanError::UnknownDay(wanted.to_string()))
  }
}

/// ---------------------------------------------------------------------------
/// Exercises
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
  pub id: String,
  pub name: String,
  /// Free text: "3 sets", "1 warm up set", "20-30 min", "-"
  pub sets: String,
  /// Free text; "-" for activities that are not rep based
  pub reps: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub notes: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub video_url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub activation_steps: Option<Vec<String>>,
}

/// What an exercise asks of the user: a warm-up checklist or a fixed target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseTarget<'a> {
  Activation(&'a [String]),
  SetsReps { sets: &'a str, reps: &'a str },
}

impl Exercise {
  pub fn target(&self) -> ExerciseTarget<'_> {
    match self.activation_steps.as_deref() {
      Some(steps) if !steps.is_empty() => ExerciseTarget::Activation(steps),
      _ => ExerciseTarget::SetsReps {
        sets: &self.sets,
        reps: &self.reps,
      },
    }
  }

  /// First integer in the sets text, 1 when there is none
  pub fn target_set_count(&self) -> u32 {
    let digits: String = self
      .sets
      .chars()
      .skip_while(|c| !c.is_ascii_digit())
      .take_while(|c| c.is_ascii_digit())
      .collect();
    digits.parse().unwrap_or(1)
  }

  /// Timed or rest entries get no per-set logging
  pub fn is_time_based(&self) -> bool {
    self.reps == "-" || self.sets.contains("min")
  }

  pub fn has_video(&self) -> bool {
    self.video_url.as_deref().is_some_and(|u| !u.is_empty())
  }
}

/// ---------------------------------------------------------------------------
/// Days and Plan
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayWorkout {
  pub day: Weekday,
  pub title: String,
  pub exercises: Vec<Exercise>,
}

impl DayWorkout {
  pub fn exercise_ids(&self) -> Vec<String> {
    self.exercises.iter().map(|e| e.id.clone()).collect()
  }

  pub fn is_rest_day(&self) -> bool {
    self.title.contains("REST")
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelPlan {
  pub level: Level,
  pub days: Vec<DayWorkout>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlan {
  pub levels: Vec<LevelPlan>,
}

static BUILTIN: OnceLock<WorkoutPlan> = OnceLock::new();

impl WorkoutPlan {
  /// The embedded plan, parsed on first use
  pub fn builtin() -> &'static WorkoutPlan {
    BUILTIN.get_or_init(|| {
      WorkoutPlan::from_json(PLAN_JSON).unwrap_or_else(|e| panic!("embedded workout plan: {}", e))
    })
  }

  pub fn from_json(json: &str) -> Result<Self, PlanError> {
    let plan: WorkoutPlan =
      serde_json::from_str(json).map_err(|e| PlanError::Invalid(e.to_string()))?;
    plan.validate()?;
    Ok(plan)
  }

  fn validate(&self) -> Result<(), PlanError> {
    for level in Level::ALL {
      let level_plan = self
        .levels
        .iter()
        .find(|l| l.level == level)
        .ok_or_else(|| PlanError::Invalid(format!("{} missing", level)))?;

      let days: Vec<Weekday> = level_plan.days.iter().map(|d| d.day).collect();
      if days != Weekday::ALL {
        return Err(PlanError::Invalid(format!(
          "{} must list Monday through Sunday in order",
          level
        )));
      }
    }

    let mut seen = HashSet::new();
    for exercise in self.levels.iter().flat_map(|l| &l.days).flat_map(|d| &d.exercises) {
      if !seen.insert(exercise.id.as_str()) {
        return Err(PlanError::Invalid(format!("duplicate exercise id {}", exercise.id)));
      }
    }

    Ok(())
  }

  pub fn day(&self, level: Level, day: Weekday) -> &DayWorkout {
    // validate() guarantees both lookups
    self
      .levels
      .iter()
      .find(|l| l.level == level)
      .map(|l| &l.days[day.index()])
      .unwrap_or_else(|| unreachable!("validated plan has every level"))
  }

  pub fn days(&self, level: Level) -> impl Iterator<Item = &DayWorkout> {
    self
      .levels
      .iter()
      .filter(move |l| l.level == level)
      .flat_map(|l| l.days.iter())
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  fn exercise(sets: &str, reps: &str) -> Exercise {
    Exercise {
      id: "x".to_string(),
      name: "Test".to_string(),
      sets: sets.to_string(),
      reps: reps.to_string(),
      notes: None,
      video_url: None,
      activation_steps: None,
    }
  }

  #[test]
  fn test_builtin_plan_parses() {
    let plan = WorkoutPlan::from_json(PLAN_JSON).unwrap();
    assert_eq!(plan.levels.len(), 2);
    for level in Level::ALL {
      assert_eq!(plan.days(level).count(), 7);
    }
  }

  #[test]
  fn test_level_one_monday_is_booty_day() {
    let day = WorkoutPlan::builtin().day(Level::One, Weekday::Monday);
    assert_eq!(day.title, "BOOTY");
    assert_eq!(day.exercises.len(), 15);
    assert_eq!(day.exercise_ids()[0], "l1-mon-1");
    assert!(!day.is_rest_day());
  }

  #[test]
  fn test_rest_day_detection() {
    let day = WorkoutPlan::builtin().day(Level::One, Weekday::Wednesday);
    assert!(day.is_rest_day());
    assert_eq!(day.exercises.len(), 1);
  }

  #[test]
  fn test_activation_steps_replace_sets_reps() {
    let day = WorkoutPlan::builtin().day(Level::One, Weekday::Monday);
    match day.exercises[0].target() {
      ExerciseTarget::Activation(steps) => assert_eq!(steps.len(), 4),
      other => panic!("expected activation checklist, got {:?}", other),
    }
    match day.exercises[1].target() {
      ExerciseTarget::SetsReps { sets, reps } => {
        assert_eq!(sets, "1 warm up set");
        assert_eq!(reps, "10-12 reps");
      }
      other => panic!("expected sets/reps, got {:?}", other),
    }
  }

  #[test]
  fn test_target_set_count() {
    assert_eq!(exercise("3 sets (each side)", "12-15 reps").target_set_count(), 3);
    assert_eq!(exercise("1 AMRAP set", "As many reps as possible").target_set_count(), 1);
    assert_eq!(exercise("-", "-").target_set_count(), 1);
    assert_eq!(exercise("20-30 min", "-").target_set_count(), 20);
  }

  #[test]
  fn test_has_video() {
    let mut e = exercise("3 sets", "10 reps");
    assert!(!e.has_video());
    e.video_url = Some(String::new());
    assert!(!e.has_video());
    e.video_url = Some("https://youtu.be/abc".to_string());
    assert!(e.has_video());
  }

  #[test]
  fn test_time_based_exercises() {
    assert!(exercise("5 min", "-").is_time_based());
    assert!(exercise("1 min 30 sec", "Speed 5.5 km/h").is_time_based());
    assert!(!exercise("3 sets", "8 reps").is_time_based());
  }

  #[test]
  fn test_level_and_day_parsing() {
    assert_eq!("Level 2".parse::<Level>().unwrap(), Level::Two);
    assert_eq!("1".parse::<Level>().unwrap(), Level::One);
    assert!("Level 3".parse::<Level>().is_err());
    assert_eq!("thursday".parse::<Weekday>().unwrap(), Weekday::Thursday);
    assert_eq!(
      "Funday".parse::<Weekday>(),
      Err(PlanError::UnknownDay("Funday".to_string()))
    );
  }

  #[test]
  fn test_weekday_from_chrono() {
    assert_eq!(Weekday::from(chrono::Weekday::Mon), Weekday::Monday);
    assert_eq!(Weekday::from(chrono::Weekday::Sun), Weekday::Sunday);
    assert_eq!(Weekday::from_index(3), Some(Weekday::Thursday));
    assert_eq!(Weekday::from_index(7), None);
  }

  #[test]
  fn test_duplicate_ids_rejected() {
    let mut plan = WorkoutPlan::from_json(PLAN_JSON).unwrap();
    let first = plan.levels[0].days[0].exercises[0].clone();
    plan.levels[1].days[0].exercises.push(first);
    let json = serde_json::to_string(&plan).unwrap();
    assert!(matches!(WorkoutPlan::from_json(&json), Err(PlanError::Invalid(_))));
  }
}
