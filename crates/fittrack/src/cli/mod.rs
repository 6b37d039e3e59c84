//! Command-line front end.
//!
//! Every command loads the full state, applies at most one change, and saves
//! if something changed. A failed save is reported but does not fail the
//! command.

pub mod display;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use food_db_client::FoodDatabase;

use crate::dates::parse_calendar_date;
use crate::domains::aggregate::{day_totals, meal_totals, weekly_average};
use crate::domains::copy_forward::{CopyMode, CopyOutcome};
use crate::domains::goals::goal_progress;
use crate::domains::lookup::search_for_items;
use crate::domains::timeline::{goal_reference_lines, macro_timeline, weight_calories_timeline};
use crate::domains::workouts::{
    CardioEntry, ExerciseKind, SetEntry, Workout, WorkoutEntry, find_exercise, recent_workouts,
    weekly_workout_count, workout_volume,
};
use crate::error::{AppError, AppResult};
use crate::ids::{IdGenerator, ItemId};
use crate::numeric::{format_decimal, parse_decimal};
use crate::snapshot::{CollectionImport, export_snapshot, import_snapshot};
use crate::state::AppState;
use crate::store::KeyValueStore;
use crate::types::{MealName, RawFoodItem};

#[derive(Debug, Parser)]
#[command(
    name = "fittrack",
    about = "Personal workout and nutrition log",
    long_about = "Log meals and workouts, follow macro totals against goals, and chart trends."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the JSON data files (overrides FITTRACK_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Day to act on, YYYY-MM-DD (defaults to today)
    #[arg(long, global = true, value_parser = calendar_date)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log a food item
    Add {
        meal: MealName,
        name: String,
        #[arg(long, value_parser = decimal)]
        qty: Option<f64>,
        #[arg(long, value_parser = decimal)]
        calories: Option<f64>,
        #[arg(long, value_parser = decimal)]
        protein: Option<f64>,
        #[arg(long, value_parser = decimal)]
        carbs: Option<f64>,
        #[arg(long, value_parser = decimal)]
        fat: Option<f64>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        serving: Option<String>,
    },

    /// Remove a logged item by id
    Remove { meal: MealName, item_id: String },

    /// Show the day's meals, totals and goal progress
    Day,

    /// Record body weight, or `clear` to remove it
    Weight { value: String },

    /// Replace the day's notes
    Notes { text: String },

    /// Copy every meal from the most recent earlier day
    CopyDay,

    /// Copy one meal from the most recent earlier day
    CopyMeal {
        meal: MealName,
        /// Put copied items ahead of existing ones instead of replacing them
        #[arg(long)]
        append: bool,
    },

    /// Daily average over the seven days ending at --date
    Weekly,

    /// Per-day totals for the latest days
    Timeline {
        /// Number of days (overrides FITTRACK_TIMELINE_RANGE)
        #[arg(long)]
        range: Option<usize>,
        /// Show calories, rolling average and weight instead of all macros
        #[arg(long)]
        weight: bool,
    },

    /// Show or set daily macro goals; 0 clears a goal
    Goals {
        #[arg(long, value_parser = decimal)]
        calories: Option<f64>,
        #[arg(long, value_parser = decimal)]
        protein: Option<f64>,
        #[arg(long, value_parser = decimal)]
        carbs: Option<f64>,
        #[arg(long, value_parser = decimal)]
        fat: Option<f64>,
    },

    /// Search the food database
    Search {
        query: String,
        #[arg(long)]
        page_size: Option<u32>,
        /// Log one of the results into this meal
        #[arg(long, requires = "pick")]
        add: Option<MealName>,
        /// 1-based result number to log
        #[arg(long, requires = "add")]
        pick: Option<usize>,
    },

    /// Write a snapshot of exercises, workouts and nutrition days
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Replace collections from a snapshot file
    Import { path: PathBuf },

    /// Workout log
    Workout {
        #[command(subcommand)]
        action: WorkoutCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum WorkoutCommand {
    /// Log an exercise; repeat --reps once per set
    Log {
        exercise: String,
        #[arg(long)]
        reps: Vec<u32>,
        #[arg(long, value_parser = decimal)]
        weight: Option<f64>,
        #[arg(long, value_parser = decimal)]
        minutes: Option<f64>,
        #[arg(long, value_parser = decimal)]
        distance: Option<f64>,
    },

    /// Recent workouts, newest first
    List {
        #[arg(long, default_value = "10")]
        limit: usize,
    },
}

fn decimal(s: &str) -> Result<f64, String> {
    parse_decimal(s).ok_or_else(|| format!("{s:?} is not a number"))
}

fn calendar_date(s: &str) -> Result<NaiveDate, String> {
    parse_calendar_date(s).ok_or_else(|| format!("{s:?} is not a date (expected YYYY-MM-DD)"))
}

/// Collaborators a command runs against.
pub struct Context<'a> {
    pub store: &'a dyn KeyValueStore,
    pub ids: Arc<dyn IdGenerator>,
    /// `None` when search is not configured.
    pub food_db: Option<&'a dyn FoodDatabase>,
    pub today: NaiveDate,
    pub timeline_range: usize,
    /// Results per search when `--page-size` is not given.
    pub default_page_size: u32,
}

pub async fn run(cli: Cli, ctx: &Context<'_>, out: &mut dyn Write) -> AppResult<()> {
    let date = cli.date.unwrap_or(ctx.today);
    let mut state = AppState::load(ctx.store, ctx.ids.clone());

    let changed = execute(cli.command, date, ctx, &mut state, out).await?;
    if changed && !state.save(ctx.store) {
        writeln!(out, "Warning: changes could not be saved.")?;
    }
    Ok(())
}

async fn execute(
    command: Command,
    date: NaiveDate,
    ctx: &Context<'_>,
    state: &mut AppState,
    out: &mut dyn Write,
) -> AppResult<bool> {
    match command {
        Command::Add {
            meal,
            name,
            qty,
            calories,
            protein,
            carbs,
            fat,
            brand,
            serving,
        } => {
            let raw = RawFoodItem {
                name: Some(name),
                brand,
                serving,
                qty,
                calories,
                protein,
                carbs,
                fat,
                ..Default::default()
            };
            let id = state.nutrition.add_item(date, meal, raw);
            writeln!(out, "Added {id} to {meal} on {date}")?;
            Ok(true)
        }
        Command::Remove { meal, item_id } => {
            let id = ItemId::new(item_id);
            if !state.nutrition.remove_item(date, meal, &id) {
                return Err(AppError::NotFound(format!("item {id} in {meal} on {date}")));
            }
            writeln!(out, "Removed {id}")?;
            Ok(true)
        }
        Command::Day => {
            show_day(state, date, out)?;
            Ok(false)
        }
        Command::Weight { value } => {
            let weight = if value.trim().eq_ignore_ascii_case("clear") {
                None
            } else {
                Some(decimal(&value)?)
            };
            state.nutrition.set_weight(date, weight);
            match weight {
                Some(w) => writeln!(out, "Weight on {date}: {}", format_decimal(Some(w)))?,
                None => writeln!(out, "Weight on {date} cleared")?,
            }
            Ok(true)
        }
        Command::Notes { text } => {
            state.nutrition.set_notes(date, text);
            writeln!(out, "Notes saved for {date}")?;
            Ok(true)
        }
        Command::CopyDay => report_copy(state.nutrition.copy_forward_day(date), date, out),
        Command::CopyMeal { meal, append } => {
            let mode = if append {
                CopyMode::Append
            } else {
                CopyMode::Replace
            };
            report_copy(state.nutrition.copy_forward_meal(date, meal, mode), date, out)
        }
        Command::Weekly => {
            let avg = weekly_average(state.nutrition.days(), date);
            writeln!(
                out,
                "Daily average, 7 days ending {date}: {}",
                display::totals_line(&avg)
            )?;
            Ok(false)
        }
        Command::Timeline { range, weight } => {
            let range = range.unwrap_or(ctx.timeline_range).max(1);
            let days = state.nutrition.days();
            if weight {
                for point in weight_calories_timeline(days, range) {
                    writeln!(out, "{}", display::weight_point_line(&point))?;
                }
            } else {
                for point in macro_timeline(days, range) {
                    writeln!(out, "{}", display::macro_point_line(&point))?;
                }
            }
            for line in goal_reference_lines(&state.goals) {
                writeln!(out, "{}", display::goal_line(&line))?;
            }
            Ok(false)
        }
        Command::Goals {
            calories,
            protein,
            carbs,
            fat,
        } => {
            let updates = [
                (&mut state.goals.calories, calories),
                (&mut state.goals.protein, protein),
                (&mut state.goals.carbs, carbs),
                (&mut state.goals.fat, fat),
            ];
            let mut changed = false;
            for (slot, value) in updates {
                if let Some(value) = value {
                    *slot = Some(value).filter(|v| *v > 0.0);
                    changed = true;
                }
            }
            writeln!(out, "Goals:")?;
            for line in display::goals_lines(&state.goals) {
                writeln!(out, "{line}")?;
            }
            Ok(changed)
        }
        Command::Search {
            query,
            page_size,
            add,
            pick,
        } => {
            let db = ctx.food_db.ok_or_else(|| {
                AppError::Search("Food search is not configured: set FOOD_DB_API_KEY.".into())
            })?;
            let items = search_for_items(db, &query, page_size.or(Some(ctx.default_page_size)))
                .await
                .map_err(AppError::Search)?;
            if items.is_empty() {
                writeln!(out, "No foods found for {query:?}")?;
            }
            for (n, item) in items.iter().enumerate() {
                let name = item.name.as_deref().unwrap_or_default();
                let brand = item
                    .brand
                    .as_deref()
                    .map(|b| format!(" ({b})"))
                    .unwrap_or_default();
                writeln!(
                    out,
                    "{:>2}. {name}{brand}  kcal {} | P {} | C {} | F {}",
                    n + 1,
                    format_decimal(item.calories),
                    format_decimal(item.protein),
                    format_decimal(item.carbs),
                    format_decimal(item.fat),
                )?;
            }
            let (Some(meal), Some(pick)) = (add, pick) else {
                return Ok(false);
            };
            let chosen = pick
                .checked_sub(1)
                .and_then(|i| items.get(i))
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("result {pick}")))?;
            let id = state.nutrition.add_item(date, meal, chosen);
            writeln!(out, "Added {id} to {meal} on {date}")?;
            Ok(true)
        }
        Command::Export { out: path } => {
            let text = export_snapshot(state, Utc::now())?;
            match path {
                Some(path) => {
                    std::fs::write(&path, text)?;
                    writeln!(out, "Exported to {}", path.display())?;
                }
                None => writeln!(out, "{text}")?,
            }
            Ok(false)
        }
        Command::Import { path } => {
            let text = std::fs::read_to_string(&path)?;
            let summary = import_snapshot(state, &text)?;
            for (name, result) in [
                ("exercises", &summary.exercises),
                ("workouts", &summary.workouts),
                ("nutritionDays", &summary.nutrition_days),
            ] {
                let status = match result {
                    CollectionImport::Replaced(n) => format!("replaced ({n})"),
                    CollectionImport::Missing => "not in snapshot, kept".to_string(),
                    CollectionImport::NotAnArray => "not a list, kept".to_string(),
                };
                writeln!(out, "{name}: {status}")?;
            }
            Ok([&summary.exercises, &summary.workouts, &summary.nutrition_days]
                .iter()
                .any(|r| r.replaced()))
        }
        Command::Workout { action } => run_workout(action, date, ctx, state, out),
    }
}

fn show_day(state: &AppState, date: NaiveDate, out: &mut dyn Write) -> AppResult<()> {
    writeln!(out, "{date}")?;
    let Some(day) = state.nutrition.day(date) else {
        writeln!(out, "Nothing logged.")?;
        return Ok(());
    };
    for name in MealName::ALL {
        let totals = day.meal(name).map(meal_totals).unwrap_or_default();
        writeln!(out, "{name}: {}", display::totals_line(&totals))?;
        for item in day.items(name) {
            writeln!(out, "{}", display::item_line(item))?;
        }
    }
    let totals = day_totals(day);
    writeln!(out, "Total: {}", display::totals_line(&totals))?;
    let progress = display::progress_lines(&goal_progress(&totals, &state.goals));
    if !progress.is_empty() {
        writeln!(out, "Goals:")?;
        for line in progress {
            writeln!(out, "{line}")?;
        }
    }
    if let Some(weight) = day.weight {
        writeln!(out, "Weight: {}", format_decimal(Some(weight)))?;
    }
    if !day.notes.is_empty() {
        writeln!(out, "Notes: {}", day.notes)?;
    }
    Ok(())
}

fn report_copy(outcome: CopyOutcome, date: NaiveDate, out: &mut dyn Write) -> AppResult<bool> {
    match outcome {
        CopyOutcome::Copied { from, items } => {
            writeln!(out, "Copied {items} item(s) from {from} to {date}")?;
            Ok(true)
        }
        CopyOutcome::NothingToCopy => {
            writeln!(out, "Nothing to copy before {date}")?;
            Ok(false)
        }
    }
}

fn run_workout(
    action: WorkoutCommand,
    date: NaiveDate,
    ctx: &Context<'_>,
    state: &mut AppState,
    out: &mut dyn Write,
) -> AppResult<bool> {
    match action {
        WorkoutCommand::Log {
            exercise,
            reps,
            weight,
            minutes,
            distance,
        } => {
            let found = find_exercise(&state.exercises, &exercise)
                .ok_or_else(|| AppError::NotFound(format!("exercise {exercise:?}")))?;
            let entry = match found.kind {
                ExerciseKind::Cardio => WorkoutEntry {
                    exercise_id: found.id.clone(),
                    sets: Vec::new(),
                    cardio: Some(CardioEntry { minutes, distance }),
                },
                ExerciseKind::Resistance => {
                    if reps.is_empty() {
                        return Err(AppError::Validation(
                            "resistance exercises need at least one --reps".into(),
                        ));
                    }
                    WorkoutEntry {
                        exercise_id: found.id.clone(),
                        sets: reps.iter().map(|r| SetEntry { reps: *r, weight }).collect(),
                        cardio: None,
                    }
                }
            };
            let name = found.name.clone();

            let index = match state.workouts.iter().position(|w| w.date == date) {
                Some(index) => index,
                None => {
                    state.workouts.push(Workout::new(ctx.ids.as_ref(), date));
                    state.workouts.len() - 1
                }
            };
            let workout = &mut state.workouts[index];
            workout.entries.push(entry);
            tracing::debug!(%date, exercise = %name, "logged exercise");
            writeln!(
                out,
                "Logged {name} on {date}; session volume {}",
                format_decimal(Some(workout_volume(workout)))
            )?;
            Ok(true)
        }
        WorkoutCommand::List { limit } => {
            for workout in recent_workouts(&state.workouts, limit) {
                writeln!(out, "{}", display::workout_line(workout, &state.exercises))?;
            }
            writeln!(
                out,
                "{} workout(s) in the 7 days ending {date}",
                weekly_workout_count(&state.workouts, date)
            )?;
            Ok(false)
        }
    }
}
