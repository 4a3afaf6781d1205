pub mod chat;
pub mod commands;
pub mod config;
pub mod db;
pub mod logging;
pub mod macros;
pub mod models;
pub mod plan;
pub mod progress;
pub mod store;
pub mod tracking;

#[cfg(test)]
pub mod test_utils;

pub use config::Config;
pub use macros::{calculate_macros, MacroInput, MacroTargets};
pub use plan::{Level, Weekday, WorkoutPlan};
pub use progress::{ProgressUpdate, WorkoutSession};
pub use store::{FitnessStore, StoreError};
