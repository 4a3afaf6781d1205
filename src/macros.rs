//! Deterministic macro engine
//!
//! Converts body metrics, activity level and goal into a daily calorie and
//! macronutrient target (Mifflin-St Jeor BMR, female coefficient). Pure:
//! no clock, no randomness, no hidden state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// ---------------------------------------------------------------------------
/// Constants
/// ---------------------------------------------------------------------------

const KG_PER_LB: f64 = 0.453592;
const CM_PER_INCH: f64 = 2.54;
const PROTEIN_G_PER_LB: f64 = 1.0;
const FAT_CALORIE_SHARE: f64 = 0.25;
const KCAL_PER_G_FAT: f64 = 9.0;
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;

const MAX_FEET: u32 = 8;
const MAX_EXTRA_INCHES: u32 = 11;

/// ---------------------------------------------------------------------------
/// Activity Level
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActivityLevel {
  Sedentary,
  Light,
  Moderate,
  VeryActive,
  ExtraActive,
  /// Anything else; treated as sedentary
  Other(String),
}

impl ActivityLevel {
  pub const KNOWN: [ActivityLevel; 5] = [
    ActivityLevel::Sedentary,
    ActivityLevel::Light,
    ActivityLevel::Moderate,
    ActivityLevel::VeryActive,
    ActivityLevel::ExtraActive,
  ];

  pub fn multiplier(&self) -> f64 {
    match self {
      ActivityLevel::Sedentary => 1.2,
      ActivityLevel::Light => 1.375,
      ActivityLevel::Moderate => 1.55,
      ActivityLevel::VeryActive => 1.725,
      ActivityLevel::ExtraActive => 1.9,
      ActivityLevel::Other(_) => 1.2,
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      ActivityLevel::Sedentary => "Sedentary",
      ActivityLevel::Light => "Light",
      ActivityLevel::Moderate => "Moderate",
      ActivityLevel::VeryActive => "Very Active",
      ActivityLevel::ExtraActive => "Extra Active",
      ActivityLevel::Other(s) => s,
    }
  }

  pub fn label(&self) -> &str {
    match self {
      ActivityLevel::Sedentary => "Sedentary (little/no exercise)",
      ActivityLevel::Light => "Light (1-3 days/week)",
      ActivityLevel::Moderate => "Moderate (3-5 days/week)",
      ActivityLevel::VeryActive => "Very Active (6-7 days/week)",
      ActivityLevel::ExtraActive => "Extra Active (athlete)",
      ActivityLevel::Other(s) => s,
    }
  }
}

impl From<String> for ActivityLevel {
  fn from(s: String) -> Self {
    match s.as_str() {
      "Sedentary" => ActivityLevel::Sedentary,
      "Light" => ActivityLevel::Light,
      "Moderate" => ActivityLevel::Moderate,
      "Very Active" => ActivityLevel::VeryActive,
      "Extra Active" => ActivityLevel::ExtraActive,
      _ => ActivityLevel::Other(s),
    }
  }
}

impl From<&str> for ActivityLevel {
  fn from(s: &str) -> Self {
    ActivityLevel::from(s.to_string())
  }
}

impl From<ActivityLevel> for String {
  fn from(level: ActivityLevel) -> Self {
    level.as_str().to_string()
  }
}

impl fmt::Display for ActivityLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// ---------------------------------------------------------------------------
/// Goal
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Goal {
  LoseFat,
  Maintain,
  GainMuscle,
  /// Anything else; no calorie adjustment
  Other(String),
}

impl Goal {
  pub const KNOWN: [Goal; 3] = [Goal::LoseFat, Goal::Maintain, Goal::GainMuscle];

  pub fn calorie_adjustment(&self) -> f64 {
    match self {
      Goal::LoseFat => -500.0,
      Goal::Maintain => 0.0,
      Goal::GainMuscle => 300.0,
      Goal::Other(_) => 0.0,
    }
  }

  pub fn as_str(&self) -> &str {
    match self {
      Goal::LoseFat => "Lose Fat",
      Goal::Maintain => "Maintain",
      Goal::GainMuscle => "Gain Muscle",
      Goal::Other(s) => s,
    }
  }
}

impl From<String> for Goal {
  fn from(s: String) -> Self {
    match s.as_str() {
      "Lose Fat" => Goal::LoseFat,
      "Maintain" => Goal::Maintain,
      "Gain Muscle" => Goal::GainMuscle,
      _ => Goal::Other(s),
    }
  }
}

impl From<&str> for Goal {
  fn from(s: &str) -> Self {
    Goal::from(s.to_string())
  }
}

impl From<Goal> for String {
  fn from(goal: Goal) -> Self {
    goal.as_str().to_string()
  }
}

impl fmt::Display for Goal {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// ---------------------------------------------------------------------------
/// Engine
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroInput {
  pub weight_lbs: f64,
  pub height_inches: u32,
  pub age: u32,
  pub activity_level: ActivityLevel,
  pub goal: Goal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTargets {
  pub calories: i64,
  pub protein_g: i64,
  /// Can be negative when protein and fat already exceed the calorie target
  pub carbs_g: i64,
  pub fat_g: i64,
}

impl MacroInput {
  pub fn weight_kg(&self) -> f64 {
    self.weight_lbs * KG_PER_LB
  }

  pub fn height_cm(&self) -> f64 {
    f64::from(self.height_inches) * CM_PER_INCH
  }

  /// Basal metabolic rate in kcal/day
  pub fn bmr(&self) -> f64 {
    10.0 * self.weight_kg() + 6.25 * self.height_cm() - 5.0 * f64::from(self.age) + 5.0
  }

  /// Total daily energy expenditure in kcal/day
  pub fn tdee(&self) -> f64 {
    self.bmr() * self.activity_level.multiplier()
  }
}

pub fn calculate_macros(input: &MacroInput) -> MacroTargets {
  let calories = (input.tdee() + input.goal.calorie_adjustment()).round() as i64;
  let protein_g = (input.weight_lbs * PROTEIN_G_PER_LB).round() as i64;
  let fat_g = (calories as f64 * FAT_CALORIE_SHARE / KCAL_PER_G_FAT).round() as i64;

  let remaining =
    calories as f64 - protein_g as f64 * KCAL_PER_G_PROTEIN - fat_g as f64 * KCAL_PER_G_FAT;
  let carbs_g = (remaining / KCAL_PER_G_CARBS).round() as i64;

  MacroTargets {
    calories,
    protein_g,
    carbs_g,
    fat_g,
  }
}

/// ---------------------------------------------------------------------------
/// Input Helpers
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Height {
  pub feet: u32,
  pub inches: u32,
}

impl Height {
  /// Clamp the two entry fields (0-8 ft, 0-11 in)
  pub fn from_feet_inches(feet: i64, inches: i64) -> Self {
    Self {
      feet: feet.clamp(0, i64::from(MAX_FEET)) as u32,
      inches: inches.clamp(0, i64::from(MAX_EXTRA_INCHES)) as u32,
    }
  }

  pub fn split(total_inches: u32) -> Self {
    Self {
      feet: total_inches / 12,
      inches: total_inches % 12,
    }
  }

  pub fn total_inches(&self) -> u32 {
    self.feet * 12 + self.inches
  }
}

/// Stepper adjustment, never below zero
pub fn adjust(value: i64, delta: i64) -> i64 {
  (value + delta).max(0)
}

/// Lenient integer parse: optional sign and leading digits, anything
/// unparseable becomes 0
pub fn coerce_int(text: &str) -> i64 {
  let trimmed = text.trim_start();
  let (sign, rest) = match trimmed.as_bytes().first() {
    Some(b'-') => (-1, &trimmed[1..]),
    Some(b'+') => (1, &trimmed[1..]),
    _ => (1, trimmed),
  };

  let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
  digits.parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
