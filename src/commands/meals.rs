//! Read-only weekly meal plans per diet

use tracing::warn;

use super::AppState;
use crate::models::{DietType, MealPlan};
use crate::plan::Weekday;

pub struct MealBrowser {
  state: AppState,
  diet: DietType,
  plans: Vec<MealPlan>,
}

impl MealBrowser {
  pub async fn open(state: AppState, diet: DietType) -> Self {
    let mut browser = Self {
      state,
      diet,
      plans: Vec::new(),
    };
    browser.load().await;
    browser
  }

  /// Switch diet. On a failed load the previous listing stays visible.
  pub async fn select(&mut self, diet: DietType) {
    self.diet = diet;
    self.load().await;
  }

  async fn load(&mut self) {
    match self.state.store.meal_plans(self.diet).await {
      Ok(plans) => self.plans = plans,
      Err(e) => warn!(diet = %self.diet, error = %e, "Failed to load meal plans"),
    }
  }

  pub fn diet(&self) -> DietType {
    self.diet
  }

  /// Ordered Monday first
  pub fn plans(&self) -> &[MealPlan] {
    &self.plans
  }

  pub fn for_day(&self, day: Weekday) -> Option<&MealPlan> {
    self.plans.iter().find(|p| p.weekday() == Some(day))
  }
}
