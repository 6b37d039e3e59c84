use serde::Serialize;

use crate::numeric::{round0, round1};
use crate::types::{Macro, MacroGoals, MacroTotals};

/// Progress toward one macro goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MacroProgress {
    pub consumed: f64,
    pub target: f64,
    /// Negative once the goal is exceeded.
    pub remaining: f64,
    pub percent: f64,
}

/// Per-macro progress; `None` means no goal is set for that macro.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GoalProgress {
    pub calories: Option<MacroProgress>,
    pub protein: Option<MacroProgress>,
    pub carbs: Option<MacroProgress>,
    pub fat: Option<MacroProgress>,
}

impl GoalProgress {
    pub fn get(&self, m: Macro) -> Option<MacroProgress> {
        match m {
            Macro::Calories => self.calories,
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fat => self.fat,
        }
    }
}

fn progress(consumed: f64, target: Option<f64>) -> Option<MacroProgress> {
    let target = target?;
    Some(MacroProgress {
        consumed,
        target,
        remaining: round1(target - consumed),
        percent: round0(consumed / target * 100.0),
    })
}

pub fn goal_progress(totals: &MacroTotals, goals: &MacroGoals) -> GoalProgress {
    GoalProgress {
        calories: progress(totals.calories, goals.target(Macro::Calories)),
        protein: progress(totals.protein, goals.target(Macro::Protein)),
        carbs: progress(totals.carbs, goals.target(Macro::Carbs)),
        fat: progress(totals.fat, goals.target(Macro::Fat)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_goal_is_none() {
        let totals = MacroTotals {
            calories: 1500.0,
            ..Default::default()
        };
        let p = goal_progress(&totals, &MacroGoals::default());
        assert_eq!(p, GoalProgress::default());
    }

    #[test]
    fn progress_reports_remaining_and_percent() {
        let totals = MacroTotals {
            calories: 1500.0,
            protein: 160.0,
            ..Default::default()
        };
        let goals = MacroGoals {
            calories: Some(2000.0),
            protein: Some(150.0),
            carbs: Some(0.0),
            fat: None,
        };
        let p = goal_progress(&totals, &goals);
        let cal = p.get(Macro::Calories).expect("calorie goal");
        assert_eq!(cal.remaining, 500.0);
        assert_eq!(cal.percent, 75.0);
        let protein = p.protein.expect("protein goal");
        assert_eq!(protein.remaining, -10.0);
        assert_eq!(protein.percent, 107.0);
        assert!(p.carbs.is_none());
        assert!(p.fat.is_none());
    }
}
