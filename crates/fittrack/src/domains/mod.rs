//! Domain modules for the tracker's business logic.
//!
//! Everything here is synchronous and side-effect free except
//! [`lookup::search_for_items`], which awaits the food database.
//!
//! # Modules
//!
//! - [`food`]: Food-item normalization and patching
//! - [`aggregate`]: Meal, day and weekly macro totals
//! - [`copy_forward`]: Copying meals from the most recent earlier day
//! - [`timeline`]: Chart series and goal reference lines
//! - [`goals`]: Progress toward macro goals
//! - [`lookup`]: Food-database hits as loggable items
//! - [`workouts`]: Exercise library and workout log

pub mod aggregate;
pub mod copy_forward;
pub mod food;
pub mod goals;
pub mod lookup;
pub mod timeline;
pub mod workouts;

pub use copy_forward::{CopyMode, CopyOutcome};
pub use food::FoodItemPatch;
pub use timeline::ROLLING_WINDOW;
