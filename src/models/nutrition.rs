use serde::{Deserialize, Serialize};

use crate::macros::{calculate_macros, ActivityLevel, Goal, MacroInput, MacroTargets};

/// One row of `user_nutrition_profile`, minus the owning user id.
///
/// The four derived columns are only ever written together, from the same
/// input snapshot, through [`NutritionProfile::recalculate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct NutritionProfile {
  pub weight_lbs: f64,
  pub height_inches: i64,
  pub age: i64,
  pub activity_level: String,
  pub goal: String,
  pub calories: i64,
  pub protein_g: i64,
  pub carbs_g: i64,
  pub fat_g: i64,
}

impl Default for NutritionProfile {
  fn default() -> Self {
    Self {
      weight_lbs: 150.0,
      height_inches: 67,
      age: 25,
      activity_level: ActivityLevel::Sedentary.to_string(),
      goal: Goal::LoseFat.to_string(),
      calories: 1500,
      protein_g: 120,
      carbs_g: 145,
      fat_g: 39,
    }
  }
}

impl NutritionProfile {
  pub fn input(&self) -> MacroInput {
    MacroInput {
      weight_lbs: self.weight_lbs,
      height_inches: self.height_inches.max(0) as u32,
      age: self.age.max(0) as u32,
      activity_level: ActivityLevel::from(self.activity_level.as_str()),
      goal: Goal::from(self.goal.as_str()),
    }
  }

  pub fn targets(&self) -> MacroTargets {
    MacroTargets {
      calories: self.calories,
      protein_g: self.protein_g,
      carbs_g: self.carbs_g,
      fat_g: self.fat_g,
    }
  }

  /// Recompute all derived outputs from the current inputs
  pub fn recalculate(&mut self) -> MacroTargets {
    let targets = calculate_macros(&self.input());
    self.calories = targets.calories;
    self.protein_g = targets.protein_g;
    self.carbs_g = targets.carbs_g;
    self.fat_g = targets.fat_g;
    targets
  }
}
