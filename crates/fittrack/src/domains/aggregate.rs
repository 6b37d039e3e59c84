//! Meal, day and weekly macro totals.
//!
//! Rounding is applied per meal and again per day (sum of rounded meal
//! totals). Day totals can therefore differ by up to 0.1 from rounding the
//! raw sum, but stay stable against floating-point noise.

use chrono::NaiveDate;

use crate::dates::week_ending;
use crate::numeric::{round0, round1};
use crate::types::{Day, FoodItem, Macro, MacroTotals, Meal, MealName};

fn items_totals(items: &[FoodItem]) -> MacroTotals {
    let raw = items.iter().fold(MacroTotals::default(), |acc, item| MacroTotals {
        calories: acc.calories + item.contribution(Macro::Calories),
        protein: acc.protein + item.contribution(Macro::Protein),
        carbs: acc.carbs + item.contribution(Macro::Carbs),
        fat: acc.fat + item.contribution(Macro::Fat),
    });
    raw.map(round1)
}

/// Σ per-serving macro × qty, each macro rounded to one decimal.
pub fn meal_totals(meal: &Meal) -> MacroTotals {
    items_totals(&meal.items)
}

/// Sum of the four meal totals, rounded again at day level.
///
/// A day with no items but a pre-migration snapshot reports the snapshot.
pub fn day_totals(day: &Day) -> MacroTotals {
    if day.item_count() == 0 {
        if let Some(legacy) = day.legacy_totals {
            return legacy.map(round1);
        }
    }
    MealName::ALL
        .iter()
        .map(|name| day.meal(*name).map(meal_totals).unwrap_or_default())
        .fold(MacroTotals::default(), |acc, t| acc + t)
        .map(round1)
}

/// Average over the seven calendar days ending at `anchor`.
///
/// Days with no record count as zero and the divisor is always 7, so the
/// number reflects logging consistency rather than only logged days.
/// Each macro is rounded to a whole number.
pub fn weekly_average(days: &[Day], anchor: NaiveDate) -> MacroTotals {
    week_ending(anchor)
        .iter()
        .map(|date| {
            days.iter()
                .find(|d| d.date == *date)
                .map(day_totals)
                .unwrap_or_default()
        })
        .fold(MacroTotals::default(), |acc, t| acc + t)
        .map(|sum| round0(sum / 7.0))
}

/// Trailing mean over up to `window` entries ending at each index.
///
/// The window shrinks at the start of the series: the first value averages
/// only itself.
pub fn rolling_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::{ItemId, SequentialIds};
    use crate::domains::food::normalize_item;
    use crate::types::RawFoodItem;

    fn item(ids: &SequentialIds, qty: f64, calories: Option<f64>, protein: Option<f64>) -> FoodItem {
        normalize_item(
            RawFoodItem {
                qty: Some(qty),
                calories,
                protein,
                ..Default::default()
            },
            ids,
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn meal_totals_multiplies_by_qty() {
        let ids = SequentialIds::new("f");
        let meal = Meal {
            items: vec![
                item(&ids, 2.0, Some(100.0), None),
                item(&ids, 1.0, Some(50.0), None),
            ],
        };
        let t = meal_totals(&meal);
        assert_eq!(t.calories, 250.0);
        assert_eq!(t.protein, 0.0);
    }

    #[test]
    fn empty_meal_is_zero() {
        assert_eq!(meal_totals(&Meal::default()), MacroTotals::default());
    }

    #[test]
    fn meal_totals_round_to_one_decimal() {
        let ids = SequentialIds::new("f");
        let meal = Meal {
            items: vec![item(&ids, 3.0, None, Some(0.33))],
        };
        assert_eq!(meal_totals(&meal).protein, 1.0);
    }

    #[test]
    fn day_totals_is_sum_of_rounded_meals() {
        let ids = SequentialIds::new("f");
        let mut day = Day::new(ItemId::new("d"), date(2026, 1, 1));
        // 0.04 per meal rounds to 0.0; the raw day sum of 0.16 would round to 0.2
        for name in MealName::ALL {
            day.meal_mut(name).items.push(item(&ids, 1.0, None, Some(0.04)));
        }
        assert_eq!(day_totals(&day).protein, 0.0);
    }

    #[test]
    fn day_totals_ignores_missing_meals() {
        let ids = SequentialIds::new("f");
        let mut day = Day::new(ItemId::new("d"), date(2026, 1, 1));
        day.meals.clear();
        day.meal_mut(MealName::Dinner)
            .items
            .push(item(&ids, 1.5, Some(400.0), Some(30.0)));
        let t = day_totals(&day);
        assert_eq!(t.calories, 600.0);
        assert_eq!(t.protein, 45.0);
    }

    #[test]
    fn legacy_totals_used_only_without_items() {
        let ids = SequentialIds::new("f");
        let mut day = Day::new(ItemId::new("d"), date(2026, 1, 1));
        day.legacy_totals = Some(MacroTotals {
            calories: 1800.0,
            ..Default::default()
        });
        assert_eq!(day_totals(&day).calories, 1800.0);

        day.meal_mut(MealName::Lunch)
            .items
            .push(item(&ids, 1.0, Some(300.0), None));
        assert_eq!(day_totals(&day).calories, 300.0);
    }

    #[test]
    fn weekly_average_counts_missing_days_as_zero() {
        let ids = SequentialIds::new("f");
        let mut a = Day::new(ItemId::new("a"), date(2026, 2, 2));
        a.meal_mut(MealName::Breakfast)
            .items
            .push(item(&ids, 1.0, Some(100.0), None));
        let mut b = Day::new(ItemId::new("b"), date(2026, 2, 5));
        b.meal_mut(MealName::Lunch)
            .items
            .push(item(&ids, 1.0, Some(200.0), None));
        // outside the window
        let mut c = Day::new(ItemId::new("c"), date(2026, 1, 20));
        c.meal_mut(MealName::Lunch)
            .items
            .push(item(&ids, 1.0, Some(5000.0), None));

        let avg = weekly_average(&[a, b, c], date(2026, 2, 7));
        assert_eq!(avg.calories, 43.0);
        assert_eq!(avg.fat, 0.0);
    }

    #[test]
    fn rolling_average_shrinks_at_start() {
        let out = rolling_average(&[10.0, 20.0, 30.0, 40.0], 3);
        assert_eq!(out, vec![10.0, 15.0, 20.0, 30.0]);
        assert!(rolling_average(&[], 7).is_empty());
    }
}
