//! Chart series over the day collection.
//!
//! Both series are pure projections re-derived on every call; the day
//! collection is the only source of truth.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::short_label;
use crate::domains::aggregate::{day_totals, rolling_average};
use crate::numeric::round0;
use crate::types::{Day, Macro, MacroGoals, MacroTotals};

/// Entries averaged by the rolling calorie line.
pub const ROLLING_WINDOW: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacroPoint {
    pub date: NaiveDate,
    pub label: String,
    pub totals: MacroTotals,
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightCaloriesPoint {
    pub date: NaiveDate,
    pub label: String,
    pub calories: f64,
    pub rolling_calories: f64,
    pub weight: Option<f64>,
}

/// Horizontal reference value for a macro that has a goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalLine {
    pub nutrient: Macro,
    pub value: f64,
}

fn latest_sorted(days: &[Day], range_limit: usize) -> Vec<&Day> {
    let mut sorted: Vec<&Day> = days.iter().collect();
    sorted.sort_by_key(|d| d.date);
    let skip = sorted.len().saturating_sub(range_limit);
    sorted.split_off(skip)
}

/// Day totals for the latest `range_limit` days, oldest first.
pub fn macro_timeline(days: &[Day], range_limit: usize) -> Vec<MacroPoint> {
    latest_sorted(days, range_limit)
        .into_iter()
        .map(|day| MacroPoint {
            date: day.date,
            label: short_label(day.date),
            totals: day_totals(day),
            weight: day.weight,
        })
        .collect()
}

/// Calories, weight and a trailing calorie average for the latest `range_limit` days.
///
/// The rolling window only sees entries inside the truncated series, so the
/// first points average fewer than seven days even when older history
/// exists. The first point's average is its own value.
pub fn weight_calories_timeline(days: &[Day], range_limit: usize) -> Vec<WeightCaloriesPoint> {
    let window = latest_sorted(days, range_limit);
    let calories: Vec<f64> = window.iter().map(|d| day_totals(d).calories).collect();
    let rolling = rolling_average(&calories, ROLLING_WINDOW);

    window
        .into_iter()
        .zip(calories.iter().zip(rolling))
        .map(|(day, (cal, avg))| WeightCaloriesPoint {
            date: day.date,
            label: short_label(day.date),
            calories: *cal,
            rolling_calories: round0(avg),
            weight: day.weight,
        })
        .collect()
}

/// One reference line per macro with a goal set.
pub fn goal_reference_lines(goals: &MacroGoals) -> Vec<GoalLine> {
    Macro::ALL
        .into_iter()
        .filter_map(|m| goals.target(m).map(|value| GoalLine { nutrient: m, value }))
        .collect()
}
