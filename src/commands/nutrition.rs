//! Macro calculator state: edit inputs freely, persist on calculate

use tracing::{info, warn};

use super::AppState;
use crate::macros::{adjust, ActivityLevel, Goal, Height, MacroTargets};
use crate::models::NutritionProfile;

pub struct MacroCalculator {
  state: AppState,
  profile: NutritionProfile,
}

impl MacroCalculator {
  /// Load the saved profile, or start from the stock defaults
  pub async fn open(state: AppState) -> Self {
    let profile = match state.store.load_nutrition_profile(&state.user_id).await {
      Ok(Some(profile)) => profile,
      Ok(None) => NutritionProfile::default(),
      Err(e) => {
        warn!(error = %e, "Failed to load nutrition profile");
        NutritionProfile::default()
      }
    };
    Self { state, profile }
  }

  pub fn profile(&self) -> &NutritionProfile {
    &self.profile
  }

  pub fn height(&self) -> Height {
    Height::split(self.profile.height_inches.max(0) as u32)
  }

  pub fn set_weight(&mut self, weight_lbs: f64) {
    self.profile.weight_lbs = weight_lbs.max(0.0);
  }

  pub fn adjust_weight(&mut self, delta: f64) {
    self.set_weight(self.profile.weight_lbs + delta);
  }

  pub fn set_height(&mut self, feet: i64, inches: i64) {
    self.profile.height_inches = i64::from(Height::from_feet_inches(feet, inches).total_inches());
  }

  pub fn set_age(&mut self, age: i64) {
    self.profile.age = age.max(0);
  }

  pub fn adjust_age(&mut self, delta: i64) {
    self.profile.age = adjust(self.profile.age, delta);
  }

  pub fn set_activity_level(&mut self, level: ActivityLevel) {
    self.profile.activity_level = level.to_string();
  }

  pub fn set_goal(&mut self, goal: Goal) {
    self.profile.goal = goal.to_string();
  }

  /// Recompute targets from the current inputs and upsert the profile
  pub async fn calculate(&mut self) -> MacroTargets {
    let targets = self.profile.recalculate();
    info!(
      calories = targets.calories,
      protein_g = targets.protein_g,
      carbs_g = targets.carbs_g,
      fat_g = targets.fat_g,
      "Calculated macros"
    );

    if let Err(e) = self
      .state
      .store
      .save_nutrition_profile(&self.state.user_id, &self.profile)
      .await
    {
      warn!(error = %e, "Failed to save nutrition profile");
    }
    targets
  }
}
