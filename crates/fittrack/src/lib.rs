//! Personal workout and nutrition tracker.
//!
//! The nutrition core lives in [`domains`]: item normalization, meal and day
//! totals, copy-forward and chart series. [`log::NutritionLog`] owns the day
//! collection, [`state::AppState`] bundles everything that is persisted, and
//! [`store`] and [`snapshot`] move it in and out of storage.

pub mod cli;
pub mod config;
pub mod dates;
pub mod domains;
pub mod error;
pub mod ids;
pub mod log;
pub mod numeric;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod types;

pub use error::{AppError, AppResult};
pub use ids::{IdGenerator, ItemId, RandomIds, SequentialIds};
pub use log::NutritionLog;
pub use state::AppState;
pub use types::{Day, FoodItem, Macro, MacroGoals, MacroTotals, Meal, MealName, RawFoodItem};
