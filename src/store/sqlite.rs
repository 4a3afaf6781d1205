//! Local SQLite store with the same tables as the hosted one

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use serde_json::{json, Value};

use super::{FitnessStore, StoreError};
use crate::db::DbPool;
use crate::models::{
  DailyTracking, DietType, MealPlan, NutritionProfile, ProgressKey, SmartwatchData,
  WorkoutProgress,
};

const CONTEXT_WORKOUT_LIMIT: i64 = 10;
const CONTEXT_TRACKING_LIMIT: i64 = 7;

#[derive(Debug, Clone)]
pub struct SqliteStore {
  db: DbPool,
}

impl SqliteStore {
  pub fn new(db: DbPool) -> Self {
    Self { db }
  }

  pub fn pool(&self) -> &DbPool {
    &self.db
  }
}

#[async_trait]
impl FitnessStore for SqliteStore {
  async fn load_nutrition_profile(
    &self,
    user_id: &str,
  ) -> Result<Option<NutritionProfile>, StoreError> {
    let profile = sqlx::query_as::<_, NutritionProfile>(
      r#"
      SELECT weight_lbs, height_inches, age, activity_level, goal,
             calories, protein_g, carbs_g, fat_g
      FROM user_nutrition_profile WHERE user_id = ?1
      "#,
    )
    .bind(user_id)
    .fetch_optional(&self.db)
    .await?;

    Ok(profile)
  }

  async fn save_nutrition_profile(
    &self,
    user_id: &str,
    profile: &NutritionProfile,
  ) -> Result<(), StoreError> {
    sqlx::query(
      r#"
      INSERT INTO user_nutrition_profile (
        user_id, weight_lbs, height_inches, age, activity_level, goal,
        calories, protein_g, carbs_g, fat_g, updated_at
      )
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
      ON CONFLICT(user_id) DO UPDATE SET
        weight_lbs = excluded.weight_lbs,
        height_inches = excluded.height_inches,
        age = excluded.age,
        activity_level = excluded.activity_level,
        goal = excluded.goal,
        calories = excluded.calories,
        protein_g = excluded.protein_g,
        carbs_g = excluded.carbs_g,
        fat_g = excluded.fat_g,
        updated_at = excluded.updated_at
      "#,
    )
    .bind(user_id)
    .bind(profile.weight_lbs)
    .bind(profile.height_inches)
    .bind(profile.age)
    .bind(&profile.activity_level)
    .bind(&profile.goal)
    .bind(profile.calories)
    .bind(profile.protein_g)
    .bind(profile.carbs_g)
    .bind(profile.fat_g)
    .bind(Utc::now().to_rfc3339())
    .execute(&self.db)
    .await?;

    Ok(())
  }

  async fn load_workout_progress(
    &self,
    key: &ProgressKey,
  ) -> Result<Option<WorkoutProgress>, StoreError> {
    let row: Option<(String, String, bool)> = sqlx::query_as(
      r#"
      SELECT completed_exercises, exercise_details, is_complete
      FROM workout_progress
      WHERE user_id = ?1 AND workout_date = ?2 AND level = ?3 AND day = ?4
      "#,
    )
    .bind(&key.user_id)
    .bind(key.workout_date.to_string())
    .bind(key.level.as_str())
    .bind(key.day.as_str())
    .fetch_optional(&self.db)
    .await?;

    row
      .map(|(completed, details, is_complete)| {
        Ok::<_, StoreError>(WorkoutProgress {
          completed_exercises: serde_json::from_str(&completed)?,
          exercise_details: serde_json::from_str(&details)?,
          is_complete,
        })
      })
      .transpose()
  }

  async fn save_workout_progress(
    &self,
    key: &ProgressKey,
    progress: &WorkoutProgress,
  ) -> Result<(), StoreError> {
    sqlx::query(
      r#"
      INSERT INTO workout_progress (
        user_id, workout_date, level, day,
        completed_exercises, exercise_details, is_complete, updated_at
      )
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
      ON CONFLICT(user_id, workout_date, level, day) DO UPDATE SET
        completed_exercises = excluded.completed_exercises,
        exercise_details = excluded.exercise_details,
        is_complete = excluded.is_complete,
        updated_at = excluded.updated_at
      "#,
    )
    .bind(&key.user_id)
    .bind(key.workout_date.to_string())
    .bind(key.level.as_str())
    .bind(key.day.as_str())
    .bind(serde_json::to_string(&progress.completed_exercises)?)
    .bind(serde_json::to_string(&progress.exercise_details)?)
    .bind(progress.is_complete)
    .bind(Utc::now().to_rfc3339())
    .execute(&self.db)
    .await?;

    Ok(())
  }

  async fn load_daily_tracking(
    &self,
    user_id: &str,
    date: NaiveDate,
  ) -> Result<Option<DailyTracking>, StoreError> {
    let tracking = sqlx::query_as::<_, DailyTracking>(
      r#"
      SELECT water_intake_oz, took_supplements, took_preworkout, notes
      FROM daily_tracking WHERE user_id = ?1 AND date = ?2
      "#,
    )
    .bind(user_id)
    .bind(date.to_string())
    .fetch_optional(&self.db)
    .await?;

    Ok(tracking)
  }

  async fn save_daily_tracking(
    &self,
    user_id: &str,
    date: NaiveDate,
    tracking: &DailyTracking,
  ) -> Result<(), StoreError> {
    sqlx::query(
      r#"
      INSERT INTO daily_tracking (
        user_id, date, water_intake_oz, took_supplements, took_preworkout, notes
      )
      VALUES (?1, ?2, ?3, ?4, ?5, ?6)
      ON CONFLICT(user_id, date) DO UPDATE SET
        water_intake_oz = excluded.water_intake_oz,
        took_supplements = excluded.took_supplements,
        took_preworkout = excluded.took_preworkout,
        notes = excluded.notes
      "#,
    )
    .bind(user_id)
    .bind(date.to_string())
    .bind(tracking.water_intake_oz)
    .bind(tracking.took_supplements)
    .bind(tracking.took_preworkout)
    .bind(&tracking.notes)
    .execute(&self.db)
    .await?;

    Ok(())
  }

  async fn load_smartwatch(
    &self,
    user_id: &str,
    date: NaiveDate,
  ) -> Result<Option<SmartwatchData>, StoreError> {
    let data = sqlx::query_as::<_, SmartwatchData>(
      r#"
      SELECT steps, calories_burned, active_minutes, heart_rate_avg
      FROM smartwatch_data WHERE user_id = ?1 AND date = ?2
      "#,
    )
    .bind(user_id)
    .bind(date.to_string())
    .fetch_optional(&self.db)
    .await?;

    Ok(data)
  }

  async fn save_smartwatch(
    &self,
    user_id: &str,
    date: NaiveDate,
    data: &SmartwatchData,
  ) -> Result<(), StoreError> {
    sqlx::query(
      r#"
      INSERT INTO smartwatch_data (
        user_id, date, steps, calories_burned, active_minutes, heart_rate_avg, synced_at
      )
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
      ON CONFLICT(user_id, date) DO UPDATE SET
        steps = excluded.steps,
        calories_burned = excluded.calories_burned,
        active_minutes = excluded.active_minutes,
        heart_rate_avg = excluded.heart_rate_avg,
        synced_at = excluded.synced_at
      "#,
    )
    .bind(user_id)
    .bind(date.to_string())
    .bind(data.steps)
    .bind(data.calories_burned)
    .bind(data.active_minutes)
    .bind(data.heart_rate_avg)
    .bind(Utc::now().to_rfc3339())
    .execute(&self.db)
    .await?;

    Ok(())
  }

  async fn meal_plans(&self, diet: DietType) -> Result<Vec<MealPlan>, StoreError> {
    let plans = sqlx::query_as::<_, MealPlan>(
      r#"
      SELECT id, diet_type, day_of_week, breakfast, lunch, dinner
      FROM meal_plans WHERE diet_type = ?1
      ORDER BY day_of_week
      "#,
    )
    .bind(diet.as_str())
    .fetch_all(&self.db)
    .await?;

    Ok(plans)
  }

  /// Same shape the hosted lookup procedure returns
  async fn user_context(&self, user_id: &str) -> Result<Value, StoreError> {
    let profile = self.load_nutrition_profile(user_id).await?;

    let workouts: Vec<(String, String, String, String, bool)> = sqlx::query_as(
      r#"
      SELECT workout_date, level, day, completed_exercises, is_complete
      FROM workout_progress WHERE user_id = ?1
      ORDER BY workout_date DESC, updated_at DESC
      LIMIT ?2
      "#,
    )
    .bind(user_id)
    .bind(CONTEXT_WORKOUT_LIMIT)
    .fetch_all(&self.db)
    .await?;

    let mut recent_workouts = Vec::with_capacity(workouts.len());
    for (date, level, day, completed, is_complete) in workouts {
      let completed: Vec<String> = serde_json::from_str(&completed)?;
      recent_workouts.push(json!({
        "workout_date": date,
        "level": level,
        "day": day,
        "completed_exercises": completed.len(),
        "is_complete": is_complete,
      }));
    }

    let tracking: Vec<(String, i64, bool, bool)> = sqlx::query_as(
      r#"
      SELECT date, water_intake_oz, took_supplements, took_preworkout
      FROM daily_tracking WHERE user_id = ?1
      ORDER BY date DESC
      LIMIT ?2
      "#,
    )
    .bind(user_id)
    .bind(CONTEXT_TRACKING_LIMIT)
    .fetch_all(&self.db)
    .await?;

    let recent_tracking: Vec<Value> = tracking
      .into_iter()
      .map(|(date, water, supplements, preworkout)| {
        json!({
          "date": date,
          "water_intake_oz": water,
          "took_supplements": supplements,
          "took_preworkout": preworkout,
        })
      })
      .collect();

    Ok(json!({
      "nutrition_profile": profile,
      "recent_workouts": recent_workouts,
      "recent_tracking": recent_tracking,
    }))
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
