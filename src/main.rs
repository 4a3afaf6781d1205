use std::error::Error;

use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use hourglass_lib::chat::ChatSession;
use hourglass_lib::commands::{AppState, DailyTracker, MacroCalculator, MealBrowser, WorkoutTracker};
use hourglass_lib::macros::{ActivityLevel, Goal};
use hourglass_lib::models::{DietType, LoggedSet};
use hourglass_lib::plan::{ExerciseTarget, Level, Weekday, WorkoutPlan};
use hourglass_lib::progress::ProgressUpdate;
use hourglass_lib::tracking::{WatchMetric, WATER_GOAL_OZ};
use hourglass_lib::{logging, Config};

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(name = "hourglass")]
#[command(about = "Workout tracker, macro calculator and fitness coach", long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,

  /// Override the user id (defaults to HOURGLASS_USER)
  #[arg(long, global = true)]
  user: Option<String>,

  /// Calendar date to record against (defaults to today)
  #[arg(long, global = true)]
  date: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
  /// Show the weekly plan for a level
  Plan {
    #[arg(long, default_value = "1")]
    level: Level,
  },

  /// Work through one day's exercises
  Workout {
    #[arg(long, default_value = "1")]
    level: Level,

    /// Day of the plan (defaults to the weekday of --date)
    #[arg(long)]
    day: Option<Weekday>,

    #[command(subcommand)]
    action: Option<WorkoutAction>,
  },

  /// Calculate daily calorie and macro targets
  Macros {
    #[arg(long)]
    weight: Option<f64>,

    #[arg(long, requires = "inches")]
    feet: Option<i64>,

    #[arg(long, requires = "feet")]
    inches: Option<i64>,

    #[arg(long)]
    age: Option<i64>,

    /// Sedentary, Light, Moderate, Very Active, Extra Active
    #[arg(long)]
    activity: Option<String>,

    /// Lose Fat, Maintain, Gain Muscle
    #[arg(long)]
    goal: Option<String>,
  },

  /// Water, supplements, notes and smartwatch counters
  Daily {
    #[command(subcommand)]
    action: Option<DailyAction>,
  },

  /// Browse the weekly meal plans
  Meals {
    #[arg(long, default_value = "Omnivore")]
    diet: DietType,

    #[arg(long)]
    day: Option<Weekday>,
  },

  /// Talk to the fitness coach; without a message, starts an interactive session
  Chat { message: Vec<String> },
}

#[derive(Subcommand)]
enum WorkoutAction {
  /// Check or uncheck an exercise
  Toggle { exercise_id: String },

  /// Replace the logged sets, each as REPS or REPS@WEIGHT
  Sets { exercise_id: String, sets: Vec<String> },

  /// Check every exercise for the day
  Complete,
}

#[derive(Subcommand)]
enum DailyAction {
  /// Add ounces of water
  Water { ounces: i64 },

  /// Reset water to zero
  ResetWater,

  Supplements {
    #[arg(action = clap::ArgAction::Set)]
    taken: bool,
  },

  Preworkout {
    #[arg(action = clap::ArgAction::Set)]
    taken: bool,
  },

  Notes { text: String },

  /// Set a smartwatch counter: steps, calories, minutes, heart_rate
  Watch { metric: WatchMetric, value: String },
}

#[tokio::main]
async fn main() -> CliResult {
  dotenvy::dotenv().ok();
  logging::init_with_level("warn");

  let cli = Cli::parse();
  let config = Config::from_env()?;
  let date = cli.date.unwrap_or_else(|| Local::now().date_naive());
  let user_id = cli.user.unwrap_or_else(|| config.user_id.clone());

  match cli.command {
    Commands::Plan { level } => {
      cmd_plan(level);
      Ok(())
    }
    Commands::Chat { message } => cmd_chat(&config, user_id, message.join(" ")).await,
    command => {
      let state = AppState::new(config.open_store().await?, user_id);
      match command {
        Commands::Workout { level, day, action } => {
          let day = day.unwrap_or_else(|| Weekday::from(date.weekday()));
          cmd_workout(state, date, level, day, action).await
        }
        Commands::Macros { weight, feet, inches, age, activity, goal } => {
          let mut calc = MacroCalculator::open(state).await;
          if let Some(weight) = weight {
            calc.set_weight(weight);
          }
          if let (Some(feet), Some(inches)) = (feet, inches) {
            calc.set_height(feet, inches);
          }
          if let Some(age) = age {
            calc.set_age(age);
          }
          if let Some(activity) = activity {
            let activity = ActivityLevel::from(activity);
            if let ActivityLevel::Other(name) = &activity {
              eprintln!("Unknown activity level '{}', using the sedentary multiplier", name);
            }
            calc.set_activity_level(activity);
          }
          if let Some(goal) = goal {
            let goal = Goal::from(goal);
            if !Goal::KNOWN.contains(&goal) {
              let known: Vec<String> = Goal::KNOWN.iter().map(Goal::to_string).collect();
              eprintln!("Unknown goal '{}', no calorie adjustment (known: {})", goal, known.join(", "));
            }
            calc.set_goal(goal);
          }
          cmd_macros(calc).await;
          Ok(())
        }
        Commands::Daily { action } => {
          cmd_daily(DailyTracker::open(state, date).await, action).await;
          Ok(())
        }
        Commands::Meals { diet, day } => {
          cmd_meals(MealBrowser::open(state, diet).await, day);
          Ok(())
        }
        Commands::Plan { .. } | Commands::Chat { .. } => Ok(()),
      }
    }
  }
}

fn cmd_plan(level: Level) {
  println!("{}", level);
  for day in WorkoutPlan::builtin().days(level) {
    println!("  {:<10} {:<28} {} exercises", day.day.as_str(), day.title, day.exercises.len());
  }
}

async fn cmd_workout(
  state: AppState,
  date: NaiveDate,
  level: Level,
  day: Weekday,
  action: Option<WorkoutAction>,
) -> CliResult {
  let mut tracker = WorkoutTracker::open(state, date, level, day).await;

  let update = match action {
    None => None,
    Some(WorkoutAction::Toggle { exercise_id }) => Some(tracker.toggle(&exercise_id).await?),
    Some(WorkoutAction::Sets { exercise_id, sets }) => {
      let sets = sets.iter().map(|s| parse_set(s)).collect();
      Some(tracker.record_sets(&exercise_id, sets).await)
    }
    Some(WorkoutAction::Complete) => Some(tracker.mark_all_complete().await),
  };

  let workout = tracker.workout();
  let session = tracker.session();
  println!("{} {} - {} ({})", level, workout.day, workout.title, tracker.date());
  for exercise in &workout.exercises {
    let mark = if session.is_completed(&exercise.id) { "x" } else { " " };
    let target = match exercise.target() {
      ExerciseTarget::Activation(steps) => format!("{} activation steps", steps.len()),
      ExerciseTarget::SetsReps { sets, reps } => format!("{} x {}", sets, reps),
    };
    println!("  [{}] {:<12} {:<40} {}", mark, exercise.id, exercise.name, target);
    if let Some(url) = exercise.video_url.as_deref().filter(|_| exercise.has_video()) {
      println!("        video: {}", url);
    }
    for (i, set) in session.sets(&exercise.id).iter().enumerate() {
      match &set.weight {
        Some(weight) => println!("        set {}: {} reps @ {}", i + 1, set.reps, weight),
        None => println!("        set {}: {} reps", i + 1, set.reps),
      }
    }
  }
  println!("Progress: {}%", session.completion_percentage());

  if let Some(ProgressUpdate { celebrate: true, .. }) = update {
    println!("Workout complete! Great job!");
  }
  Ok(())
}

fn parse_set(text: &str) -> LoggedSet {
  match text.split_once('@') {
    Some((reps, weight)) => LoggedSet::new(reps.trim(), Some(weight.trim())),
    None => LoggedSet::new(text.trim(), None),
  }
}

async fn cmd_macros(mut calc: MacroCalculator) {
  let targets = calc.calculate().await;
  let profile = calc.profile();
  let height = calc.height();

  println!(
    "{} lbs, {}'{}\", age {}, {}",
    profile.weight_lbs, height.feet, height.inches, profile.age, profile.goal
  );
  println!("Activity: {}", ActivityLevel::from(profile.activity_level.as_str()).label());
  println!("Calories: {}", targets.calories);
  println!("Protein:  {} g", targets.protein_g);
  println!("Carbs:    {} g", targets.carbs_g);
  println!("Fat:      {} g", targets.fat_g);
}

async fn cmd_daily(mut tracker: DailyTracker, action: Option<DailyAction>) {
  match action {
    None => {}
    Some(DailyAction::Water { ounces }) => tracker.add_water(ounces).await,
    Some(DailyAction::ResetWater) => tracker.reset_water().await,
    Some(DailyAction::Supplements { taken }) => tracker.set_supplements(taken).await,
    Some(DailyAction::Preworkout { taken }) => tracker.set_preworkout(taken).await,
    Some(DailyAction::Notes { text }) => tracker.set_notes(text).await,
    Some(DailyAction::Watch { metric, value }) => tracker.set_metric(metric, &value).await,
  }

  let tracking = tracker.tracking();
  let watch = tracker.smartwatch();
  println!(
    "Water:        {} / {} oz ({}%)",
    tracking.water_intake_oz,
    WATER_GOAL_OZ,
    tracking.water_progress_pct()
  );
  println!("Supplements:  {}", tracking.took_supplements);
  println!("Pre-workout:  {}", tracking.took_preworkout);
  if !tracking.notes.is_empty() {
    println!("Notes:        {}", tracking.notes);
  }
  println!(
    "Watch:        {} steps, {} kcal, {} active min, {} bpm avg",
    watch.steps, watch.calories_burned, watch.active_minutes, watch.heart_rate_avg
  );
}

fn cmd_meals(browser: MealBrowser, day: Option<Weekday>) {
  println!("{}", browser.diet().label());
  let plans = browser
    .plans()
    .iter()
    .filter(|p| day.is_none() || p.weekday() == day);
  for plan in plans {
    let name = plan.weekday().map(|d| d.as_str()).unwrap_or("?");
    println!("{}", name);
    println!("  Breakfast: {}", plan.breakfast);
    println!("  Lunch:     {}", plan.lunch);
    println!("  Dinner:    {}", plan.dinner);
  }
}

async fn cmd_chat(config: &Config, user_id: String, message: String) -> CliResult {
  let backend = config.chat_backend()?;
  let mut session = ChatSession::new(user_id);

  if !message.trim().is_empty() {
    if let Some(reply) = session.send(backend.as_ref(), &message).await {
      println!("{}", reply.content);
    }
    return Ok(());
  }

  println!("{}", session.messages()[0].content);
  for action in session.quick_actions() {
    println!("  - {}", action);
  }

  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  while let Some(line) = lines.next_line().await? {
    if let Some(reply) = session.send(backend.as_ref(), &line).await {
      println!("{}", reply.content);
    }
  }
  Ok(())
}
