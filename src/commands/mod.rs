//! Session operations behind each surface
//!
//! Each tracker owns its in-memory state and writes through to the store
//! after every mutation. Store failures are logged and swallowed: the
//! in-memory value stays authoritative for the session.

pub mod daily;
pub mod meals;
pub mod nutrition;
pub mod workout;

pub use daily::DailyTracker;
pub use meals::MealBrowser;
pub use nutrition::MacroCalculator;
pub use workout::WorkoutTracker;

use std::sync::Arc;

use crate::store::FitnessStore;

/// Store handle and identity shared by every tracker in a session
#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn FitnessStore>,
  pub user_id: String,
}

impl AppState {
  pub fn new(store: Arc<dyn FitnessStore>, user_id: impl Into<String>) -> Self {
    Self {
      store,
      user_id: user_id.into(),
    }
  }
}
