//! Text rendering for command output. No computation happens here.

use crate::domains::goals::{GoalProgress, MacroProgress};
use crate::domains::timeline::{GoalLine, MacroPoint, WeightCaloriesPoint};
use crate::domains::workouts::{Exercise, Workout, workout_volume};
use crate::numeric::format_decimal;
use crate::types::{FoodItem, Macro, MacroGoals, MacroTotals};

fn short(m: Macro) -> &'static str {
    match m {
        Macro::Calories => "kcal",
        Macro::Protein => "P",
        Macro::Carbs => "C",
        Macro::Fat => "F",
    }
}

/// `kcal 350 | P 20.5 | C 40 | F 10`
pub fn totals_line(totals: &MacroTotals) -> String {
    Macro::ALL
        .iter()
        .map(|m| format!("{} {}", short(*m), format_decimal(Some(totals.get(*m)))))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// One logged item; unknown macros print as blanks.
pub fn item_line(item: &FoodItem) -> String {
    let mut line = format!("  [{}] {}", item.id, item.name);
    if let Some(brand) = &item.brand {
        line.push_str(&format!(" ({brand})"));
    }
    if let Some(serving) = &item.serving {
        line.push_str(&format!(", {serving}"));
    }
    line.push_str(&format!(" x{}", format_decimal(Some(item.qty))));
    let macros: Vec<String> = Macro::ALL
        .iter()
        .map(|m| format!("{} {}", short(*m), format_decimal(item.macro_value(*m))).trim_end().to_string())
        .collect();
    line.push_str(&format!("  per serving: {}", macros.join(" | ")));
    line
}

fn progress_line(m: Macro, p: &MacroProgress) -> String {
    let remaining = if p.remaining < 0.0 {
        format!("{} over", format_decimal(Some(-p.remaining)))
    } else {
        format!("{} left", format_decimal(Some(p.remaining)))
    };
    format!(
        "  {:<8} {} / {} ({}%), {}",
        m.label(),
        format_decimal(Some(p.consumed)),
        format_decimal(Some(p.target)),
        format_decimal(Some(p.percent)),
        remaining
    )
}

pub fn progress_lines(progress: &GoalProgress) -> Vec<String> {
    Macro::ALL
        .iter()
        .filter_map(|m| progress.get(*m).map(|p| progress_line(*m, &p)))
        .collect()
}

pub fn goals_lines(goals: &MacroGoals) -> Vec<String> {
    Macro::ALL
        .iter()
        .map(|m| {
            let value = goals.target(*m).map(|v| format_decimal(Some(v)));
            format!("  {:<8} {}", m.label(), value.unwrap_or_else(|| "no goal".to_string()))
        })
        .collect()
}

fn weight_suffix(weight: Option<f64>) -> String {
    match weight {
        Some(w) => format!("  weight {}", format_decimal(Some(w))),
        None => String::new(),
    }
}

pub fn macro_point_line(point: &MacroPoint) -> String {
    format!(
        "{:<7} {}{}",
        point.label,
        totals_line(&point.totals),
        weight_suffix(point.weight)
    )
}

pub fn weight_point_line(point: &WeightCaloriesPoint) -> String {
    format!(
        "{:<7} kcal {}  avg {}{}",
        point.label,
        format_decimal(Some(point.calories)),
        format_decimal(Some(point.rolling_calories)),
        weight_suffix(point.weight)
    )
}

pub fn goal_line(line: &GoalLine) -> String {
    format!("goal {} {}", line.nutrient.label(), format_decimal(Some(line.value)))
}

pub fn workout_line(workout: &Workout, library: &[Exercise]) -> String {
    let names: Vec<&str> = workout
        .entries
        .iter()
        .map(|entry| {
            library
                .iter()
                .find(|e| e.id == entry.exercise_id)
                .map(|e| e.name.as_str())
                .unwrap_or_else(|| entry.exercise_id.as_str())
        })
        .collect();
    format!(
        "{}  {}  volume {}",
        workout.date,
        names.join(", "),
        format_decimal(Some(workout_volume(workout)))
    )
}
