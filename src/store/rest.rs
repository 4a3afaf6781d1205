//! Hosted row store over its REST interface
//!
//! Reads are `GET /rest/v1/<table>?<col>=eq.<value>`; writes are
//! `POST /rest/v1/<table>?on_conflict=<cols>` with merge-duplicates
//! resolution so a repeated key overwrites rather than duplicates.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::debug;
use url::Url;

use super::{
  FitnessStore, StoreError, MEAL_PLANS_TABLE, NUTRITION_TABLE, PROGRESS_TABLE,
  SMARTWATCH_TABLE, TRACKING_TABLE,
};
use crate::models::{
  DailyTracking, DietType, MealPlan, NutritionProfile, ProgressKey, SmartwatchData,
  WorkoutProgress,
};

const REST_PATH: &str = "rest/v1/";
const USER_CONTEXT_RPC: &str = "rpc/get_user_context";
const UPSERT_PREFER: &str = "resolution=merge-duplicates,return=minimal";

const PROGRESS_CONFLICT: &str = "user_id,workout_date,level,day";
const DAILY_CONFLICT: &str = "user_id,date";
const USER_CONFLICT: &str = "user_id";

/// ---------------------------------------------------------------------------
/// Client
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RestStore {
  client: Client,
  base: Url,
  api_key: String,
}

impl RestStore {
  pub fn new(project_url: &str, api_key: &str) -> Result<Self, StoreError> {
    let mut base = Url::parse(project_url).map_err(|e| StoreError::InvalidUrl(e.to_string()))?;
    if !base.path().ends_with('/') {
      let path = format!("{}/", base.path());
      base.set_path(&path);
    }
    let base = base
      .join(REST_PATH)
      .map_err(|e| StoreError::InvalidUrl(e.to_string()))?;

    Ok(Self {
      client: Client::new(),
      base,
      api_key: api_key.to_string(),
    })
  }

  fn endpoint(&self, path: &str) -> Result<Url, StoreError> {
    self
      .base
      .join(path)
      .map_err(|e| StoreError::InvalidUrl(e.to_string()))
  }

  /// Rows matching every `column = value` filter
  async fn select<T: DeserializeOwned>(
    &self,
    table: &str,
    filters: &[(&str, String)],
    extra: &[(&str, &str)],
  ) -> Result<Vec<T>, StoreError> {
    let mut url = self.endpoint(table)?;
    {
      let mut query = url.query_pairs_mut();
      query.append_pair("select", "*");
      for (column, value) in filters {
        query.append_pair(column, &format!("eq.{}", value));
      }
      for (key, value) in extra {
        query.append_pair(key, value);
      }
    }

    debug!(table, "select");
    let response = self
      .client
      .get(url)
      .header("apikey", &self.api_key)
      .bearer_auth(&self.api_key)
      .send()
      .await?;

    let body = check(response).await?.text().await?;
    Ok(serde_json::from_str(&body)?)
  }

  /// At most one row matching the filters
  async fn select_one<T: DeserializeOwned>(
    &self,
    table: &str,
    filters: &[(&str, String)],
  ) -> Result<Option<T>, StoreError> {
    let rows = self.select(table, filters, &[("limit", "1")]).await?;
    Ok(rows.into_iter().next())
  }

  async fn upsert(&self, table: &str, on_conflict: &str, row: &Value) -> Result<(), StoreError> {
    let mut url = self.endpoint(table)?;
    url.query_pairs_mut().append_pair("on_conflict", on_conflict);

    debug!(table, on_conflict, "upsert");
    let response = self
      .client
      .post(url)
      .header("apikey", &self.api_key)
      .bearer_auth(&self.api_key)
      .header("Prefer", UPSERT_PREFER)
      .json(row)
      .send()
      .await?;

    check(response).await?;
    Ok(())
  }
}

/// Turn a non-2xx response into [`StoreError::Api`]
async fn check(response: Response) -> Result<Response, StoreError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }
  let body = response.text().await.unwrap_or_default();
  Err(StoreError::Api {
    status: status.as_u16(),
    body,
  })
}

/// Merge key columns and the row body into one JSON object
fn keyed_row(key: Value, body: &impl Serialize) -> Result<Value, StoreError> {
  let mut row: Map<String, Value> = match key {
    Value::Object(map) => map,
    _ => Map::new(),
  };
  if let Value::Object(fields) = serde_json::to_value(body)? {
    row.extend(fields);
  }
  Ok(Value::Object(row))
}

/// ---------------------------------------------------------------------------
/// FitnessStore
/// ---------------------------------------------------------------------------

#[async_trait]
impl FitnessStore for RestStore {
  async fn load_nutrition_profile(
    &self,
    user_id: &str,
  ) -> Result<Option<NutritionProfile>, StoreError> {
    self
      .select_one(NUTRITION_TABLE, &[("user_id", user_id.to_string())])
      .await
  }

  async fn save_nutrition_profile(
    &self,
    user_id: &str,
    profile: &NutritionProfile,
  ) -> Result<(), StoreError> {
    let key = json!({ "user_id": user_id, "updated_at": Utc::now().to_rfc3339() });
    let row = keyed_row(key, profile)?;
    self.upsert(NUTRITION_TABLE, USER_CONFLICT, &row).await
  }

  async fn load_workout_progress(
    &self,
    key: &ProgressKey,
  ) -> Result<Option<WorkoutProgress>, StoreError> {
    self
      .select_one(
        PROGRESS_TABLE,
        &[
          ("user_id", key.user_id.clone()),
          ("workout_date", key.workout_date.to_string()),
          ("level", key.level.to_string()),
          ("day", key.day.to_string()),
        ],
      )
      .await
  }

  async fn save_workout_progress(
    &self,
    key: &ProgressKey,
    progress: &WorkoutProgress,
  ) -> Result<(), StoreError> {
    let row = keyed_row(serde_json::to_value(key)?, progress)?;
    self.upsert(PROGRESS_TABLE, PROGRESS_CONFLICT, &row).await
  }

  async fn load_daily_tracking(
    &self,
    user_id: &str,
    date: NaiveDate,
  ) -> Result<Option<DailyTracking>, StoreError> {
    self
      .select_one(
        TRACKING_TABLE,
        &[("user_id", user_id.to_string()), ("date", date.to_string())],
      )
      .await
  }

  async fn save_daily_tracking(
    &self,
    user_id: &str,
    date: NaiveDate,
    tracking: &DailyTracking,
  ) -> Result<(), StoreError> {
    let key = json!({ "user_id": user_id, "date": date });
    let row = keyed_row(key, tracking)?;
    self.upsert(TRACKING_TABLE, DAILY_CONFLICT, &row).await
  }

  async fn load_smartwatch(
    &self,
    user_id: &str,
    date: NaiveDate,
  ) -> Result<Option<SmartwatchData>, StoreError> {
    self
      .select_one(
        SMARTWATCH_TABLE,
        &[("user_id", user_id.to_string()), ("date", date.to_string())],
      )
      .await
  }

  async fn save_smartwatch(
    &self,
    user_id: &str,
    date: NaiveDate,
    data: &SmartwatchData,
  ) -> Result<(), StoreError> {
    let key = json!({
      "user_id": user_id,
      "date": date,
      "synced_at": Utc::now().to_rfc3339(),
    });
    let row = keyed_row(key, data)?;
    self.upsert(SMARTWATCH_TABLE, DAILY_CONFLICT, &row).await
  }

  async fn meal_plans(&self, diet: DietType) -> Result<Vec<MealPlan>, StoreError> {
    self
      .select(
        MEAL_PLANS_TABLE,
        &[("diet_type", diet.to_string())],
        &[("order", "day_of_week.asc")],
      )
      .await
  }

  async fn user_context(&self, user_id: &str) -> Result<Value, StoreError> {
    let url = self.endpoint(USER_CONTEXT_RPC)?;
    let response = self
      .client
      .post(url)
      .header("apikey", &self.api_key)
      .bearer_auth(&self.api_key)
      .json(&json!({ "p_user_id": user_id }))
      .send()
      .await?;

    let body = check(response).await?.text().await?;
    Ok(serde_json::from_str(&body)?)
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::{ExerciseDetail, LoggedSet};
  use crate::plan::{Level, Weekday};
  use mockito::Matcher;

  fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
  }

  #[test]
  fn test_base_url_keeps_project_path() {
    let store = RestStore::new("https://abc.supabase.co", "key").unwrap();
    assert_eq!(
      store.endpoint("daily_tracking").unwrap().as_str(),
      "https://abc.supabase.co/rest/v1/daily_tracking"
    );
    assert!(RestStore::new("not a url", "key").is_err());
  }

  #[tokio::test]
  async fn test_load_progress_filters_on_full_key() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("GET", "/rest/v1/workout_progress")
      .match_query(Matcher::AllOf(vec![
        Matcher::UrlEncoded("user_id".into(), "eq.demo-user-123".into()),
        Matcher::UrlEncoded("workout_date".into(), "eq.2026-10-18".into()),
        Matcher::UrlEncoded("level".into(), "eq.Level 1".into()),
        Matcher::UrlEncoded("day".into(), "eq.Tuesday".into()),
        Matcher::UrlEncoded("limit".into(), "1".into()),
      ]))
      .match_header("apikey", "anon")
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(
        r#"[{"user_id":"demo-user-123","completed_exercises":["l1-tue-1"],
            "exercise_details":[{"exercise_id":"l1-tue-1","completed_sets":[{"reps":"12"}]}],
            "is_complete":false}]"#,
      )
      .create_async()
      .await;

    let store = RestStore::new(&server.url(), "anon").unwrap();
    let key = ProgressKey {
      user_id: "demo-user-123".to_string(),
      workout_date: date(),
      level: Level::One,
      day: Weekday::Tuesday,
    };
    let progress = store.load_workout_progress(&key).await.unwrap().unwrap();

    assert_eq!(progress.completed_exercises, vec!["l1-tue-1".to_string()]);
    assert_eq!(progress.exercise_details[0].completed_sets[0].weight, None);
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_load_progress_tolerates_null_columns() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/rest/v1/workout_progress")
      .match_query(Matcher::Any)
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"[{"completed_exercises":["l1-tue-1"],"exercise_details":null,"is_complete":false}]"#)
      .create_async()
      .await;
    server
      .mock("GET", "/rest/v1/smartwatch_data")
      .match_query(Matcher::Any)
      .with_status(200)
      .with_header("content-type", "application/json")
      .with_body(r#"[{"steps":5100,"calories_burned":null,"active_minutes":null,"heart_rate_avg":null}]"#)
      .create_async()
      .await;

    let store = RestStore::new(&server.url(), "anon").unwrap();
    let key = ProgressKey {
      user_id: "demo-user-123".to_string(),
      workout_date: date(),
      level: Level::One,
      day: Weekday::Tuesday,
    };
    let progress = store.load_workout_progress(&key).await.unwrap().unwrap();
    assert_eq!(progress.completed_exercises, vec!["l1-tue-1".to_string()]);
    assert!(progress.exercise_details.is_empty());

    let watch = store.load_smartwatch("demo-user-123", date()).await.unwrap().unwrap();
    assert_eq!(watch.steps, 5100);
    assert_eq!(watch.heart_rate_avg, 0);
  }

  #[tokio::test]
  async fn test_missing_row_is_none() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("GET", "/rest/v1/user_nutrition_profile")
      .match_query(Matcher::Any)
      .with_status(200)
      .with_body("[]")
      .create_async()
      .await;

    let store = RestStore::new(&server.url(), "anon").unwrap();
    assert!(store.load_nutrition_profile("nobody").await.unwrap().is_none());
  }

  #[tokio::test]
  async fn test_upsert_progress_sends_conflict_key_and_full_row() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", "/rest/v1/workout_progress")
      .match_query(Matcher::UrlEncoded(
        "on_conflict".into(),
        "user_id,workout_date,level,day".into(),
      ))
      .match_header("prefer", UPSERT_PREFER)
      .match_body(Matcher::PartialJson(json!({
        "user_id": "u1",
        "workout_date": "2026-10-18",
        "level": "Level 2",
        "day": "Monday",
        "completed_exercises": ["l2-mon-1"],
        "exercise_details": [
          { "exercise_id": "l2-mon-2", "completed_sets": [{ "reps": "10", "weight": "30" }] }
        ],
        "is_complete": false,
      })))
      .with_status(201)
      .create_async()
      .await;

    let store = RestStore::new(&server.url(), "anon").unwrap();
    let key = ProgressKey {
      user_id: "u1".to_string(),
      workout_date: date(),
      level: Level::Two,
      day: Weekday::Monday,
    };
    let progress = WorkoutProgress {
      completed_exercises: vec!["l2-mon-1".to_string()],
      exercise_details: vec![ExerciseDetail {
        exercise_id: "l2-mon-2".to_string(),
        completed_sets: vec![LoggedSet::new("10", Some("30"))],
      }],
      is_complete: false,
    };
    store.save_workout_progress(&key, &progress).await.unwrap();
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_smartwatch_upsert_stamps_sync_time() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", "/rest/v1/smartwatch_data")
      .match_query(Matcher::UrlEncoded("on_conflict".into(), "user_id,date".into()))
      .match_body(Matcher::Regex(r#""synced_at":"\d{4}-"#.to_string()))
      .with_status(201)
      .create_async()
      .await;

    let store = RestStore::new(&server.url(), "anon").unwrap();
    let data = SmartwatchData {
      steps: 9000,
      ..Default::default()
    };
    store.save_smartwatch("u1", date(), &data).await.unwrap();
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_error_status_surfaces_as_api_error() {
    let mut server = mockito::Server::new_async().await;
    server
      .mock("POST", "/rest/v1/daily_tracking")
      .match_query(Matcher::Any)
      .with_status(401)
      .with_body(r#"{"message":"Invalid API key"}"#)
      .create_async()
      .await;

    let store = RestStore::new(&server.url(), "bad").unwrap();
    let err = store
      .save_daily_tracking("u1", date(), &DailyTracking::default())
      .await
      .unwrap_err();
    match err {
      StoreError::Api { status, body } => {
        assert_eq!(status, 401);
        assert!(body.contains("Invalid API key"));
      }
      other => panic!("expected Api error, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_meal_plans_ordered_by_day() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("GET", "/rest/v1/meal_plans")
      .match_query(Matcher::AllOf(vec![
        Matcher::UrlEncoded("diet_type".into(), "eq.Vegan".into()),
        Matcher::UrlEncoded("order".into(), "day_of_week.asc".into()),
      ]))
      .with_status(200)
      .with_body(
        r#"[{"id":"v0","diet_type":"Vegan","day_of_week":0,"breakfast":"Oats","lunch":"Bowl","dinner":"Curry"}]"#,
      )
      .create_async()
      .await;

    let store = RestStore::new(&server.url(), "anon").unwrap();
    let plans = store.meal_plans(DietType::Vegan).await.unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0].dinner, "Curry");
    mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_user_context_rpc() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
      .mock("POST", "/rest/v1/rpc/get_user_context")
      .match_body(Matcher::Json(json!({ "p_user_id": "u1" })))
      .with_status(200)
      .with_body(r#"{"recent_workouts":[],"nutrition":{"calories":1449}}"#)
      .create_async()
      .await;

    let store = RestStore::new(&server.url(), "service").unwrap();
    let context = store.user_context("u1").await.unwrap();
    assert_eq!(context["nutrition"]["calories"], 1449);
    mock.assert_async().await;
  }
}
