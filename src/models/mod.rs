pub mod meal_plan;
pub mod nutrition;
pub mod progress;
pub mod tracking;

use serde::{Deserialize, Deserializer};

pub use meal_plan::{DietType, MealPlan};
pub use nutrition::NutritionProfile;
pub use progress::{ExerciseDetail, LoggedSet, ProgressKey, WorkoutProgress};
pub use tracking::{DailyTracking, SmartwatchData};

/// Hosted rows can hold `null` in columns that have a default locally
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
