use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::plan::Weekday;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DietType {
  Omnivore,
  Pescatarian,
  Vegan,
}

impl DietType {
  pub const ALL: [DietType; 3] = [DietType::Omnivore, DietType::Pescatarian, DietType::Vegan];

  pub fn as_str(&self) -> &'static str {
    match self {
      DietType::Omnivore => "Omnivore",
      DietType::Pescatarian => "Pescatarian",
      DietType::Vegan => "Vegan",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      DietType::Omnivore => "Option A: Omnivore",
      DietType::Pescatarian => "Option B: Pescatarian",
      DietType::Vegan => "Option C: Vegan",
    }
  }
}

impl fmt::Display for DietType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for DietType {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    DietType::ALL
      .iter()
      .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
      .copied()
      .ok_or_else(|| format!("Unknown diet type: {}", s))
  }
}

/// Read-only reference row of `meal_plans`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MealPlan {
  pub id: String,
  pub diet_type: String,
  /// 0 = Monday
  pub day_of_week: i64,
  pub breakfast: String,
  pub lunch: String,
  pub dinner: String,
}

impl MealPlan {
  pub fn weekday(&self) -> Option<Weekday> {
    usize::try_from(self.day_of_week)
      .ok()
      .and_then(Weekday::from_index)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_diet_type_parse() {
    assert_eq!("vegan".parse::<DietType>().unwrap(), DietType::Vegan);
    assert!("Keto".parse::<DietType>().is_err());
  }

  #[test]
  fn test_meal_plan_weekday() {
    let plan = MealPlan {
      id: "omnivore-0".to_string(),
      diet_type: "Omnivore".to_string(),
      day_of_week: 0,
      breakfast: String::new(),
      lunch: String::new(),
      dinner: String::new(),
    };
    assert_eq!(plan.weekday(), Some(Weekday::Monday));
    assert_eq!(MealPlan { day_of_week: 9, ..plan }.weekday(), None);
  }
}
