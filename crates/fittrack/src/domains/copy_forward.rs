//! Carrying meals forward from the most recent earlier day.
//!
//! Copies are deep and every copied item gets a fresh identity. The source
//! day is only ever borrowed immutably.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::ids::IdGenerator;
use crate::types::{Day, FoodItem, Meal, MealName};

/// How copied items combine with what the destination meal already holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMode {
    /// The destination meal becomes exactly the copied items.
    Replace,
    /// Copied items go ahead of the existing ones.
    Append,
}

/// Result of a copy request against the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied { from: NaiveDate, items: usize },
    NothingToCopy,
}

/// The day with the latest date strictly before `target`, if any.
pub fn most_recent_prior_day(days: &[Day], target: NaiveDate) -> Option<&Day> {
    days.iter()
        .filter(|d| d.date < target)
        .max_by_key(|d| d.date)
}

fn fresh_items(items: &[FoodItem], ids: &dyn IdGenerator) -> Vec<FoodItem> {
    items.iter().map(|item| item.clone_with_new_id(ids)).collect()
}

/// Deep copy of every meal of `source`, each item with a new id.
pub fn copy_all_meals(source: &Day, ids: &dyn IdGenerator) -> BTreeMap<MealName, Meal> {
    MealName::ALL
        .into_iter()
        .map(|name| {
            let meal = Meal {
                items: fresh_items(source.items(name), ids),
            };
            (name, meal)
        })
        .collect()
}

/// Copy one meal of `source` into a copy of `dest`.
pub fn copy_one_meal(
    source: &Day,
    dest: &Day,
    meal: MealName,
    mode: CopyMode,
    ids: &dyn IdGenerator,
) -> Day {
    let copied = fresh_items(source.items(meal), ids);
    let mut out = dest.clone();
    let target = out.meal_mut(meal);
    match mode {
        CopyMode::Replace => target.items = copied,
        CopyMode::Append => {
            let existing = std::mem::take(&mut target.items);
            target.items = copied.into_iter().chain(existing).collect();
        }
    }
    out
}
