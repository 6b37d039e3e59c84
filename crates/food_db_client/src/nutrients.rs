//! Macro extraction from a food candidate's nutrient list.

use crate::{FoodCandidate, FoodNutrient};

/// Standard nutrient numbers used when no nutrient name matches.
pub const ENERGY_KCAL: &str = "208";
pub const PROTEIN: &str = "203";
pub const CARBOHYDRATE: &str = "205";
pub const TOTAL_FAT: &str = "204";

/// Per-serving macros pulled from a candidate. `None` means "not reported",
/// which is kept distinct from an explicit zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ExtractedMacros {
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
}

impl ExtractedMacros {
    /// Display form: `[calories, protein, carbs, fat]`, empty string when not found.
    pub fn as_strings(&self) -> [String; 4] {
        [self.calories, self.protein, self.carbs, self.fat].map(|v| match v {
            None => String::new(),
            Some(v) if v.fract() == 0.0 => format!("{}", v as i64),
            Some(v) => format!("{v}"),
        })
    }
}

pub fn extract_macros(candidate: &FoodCandidate) -> ExtractedMacros {
    let nutrients = &candidate.food_nutrients;
    ExtractedMacros {
        calories: find_macro(nutrients, is_energy_kcal, ENERGY_KCAL),
        protein: find_macro(nutrients, |n| n.contains("protein"), PROTEIN),
        carbs: find_macro(nutrients, |n| n.contains("carbohydrate"), CARBOHYDRATE),
        fat: find_macro(nutrients, is_total_fat, TOTAL_FAT),
    }
}

/// Name match first, then the standard nutrient number.
fn find_macro(
    nutrients: &[FoodNutrient],
    name_matches: impl Fn(&str) -> bool,
    number: &str,
) -> Option<f64> {
    let by_name = nutrients
        .iter()
        .filter(|n| {
            n.nutrient_name
                .as_deref()
                .map(|name| name_matches(&name.to_lowercase()))
                .unwrap_or(false)
                && !is_kilojoules(n)
        })
        .find_map(FoodNutrient::quantity);
    by_name.or_else(|| {
        nutrients
            .iter()
            .filter(|n| n.nutrient_number.as_deref().map(str::trim) == Some(number))
            .find_map(FoodNutrient::quantity)
    })
}

fn is_energy_kcal(name: &str) -> bool {
    name.contains("energy")
}

fn is_total_fat(name: &str) -> bool {
    name.contains("total lipid") || name == "fat" || name.contains("total fat")
}

// Energy is reported twice by some data types; the kJ row must never win.
fn is_kilojoules(n: &FoodNutrient) -> bool {
    n.unit_name
        .as_deref()
        .map(|u| u.eq_ignore_ascii_case("kj"))
        .unwrap_or(false)
        || n.nutrient_number.as_deref() == Some("268")
}
