use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::dates::deserialize_calendar_date;
use crate::ids::ItemId;
use crate::numeric::deserialize_lenient_f64;

/// One of the four tracked macronutrients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Macro {
    Calories,
    Protein,
    Carbs,
    Fat,
}

impl Macro {
    pub const ALL: [Macro; 4] = [Macro::Calories, Macro::Protein, Macro::Carbs, Macro::Fat];

    pub fn label(self) -> &'static str {
        match self {
            Macro::Calories => "calories",
            Macro::Protein => "protein",
            Macro::Carbs => "carbs",
            Macro::Fat => "fat",
        }
    }
}

/// Where a food item came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodSource {
    #[default]
    Manual,
    External,
}

/// A logged food. Macros are per serving; `None` means "not entered", which is
/// displayed as empty but counts as zero in totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawFoodItem")]
pub struct FoodItem {
    pub id: ItemId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serving: Option<String>,
    pub qty: f64,
    pub calories: Option<f64>,
    pub protein: Option<f64>,
    pub carbs: Option<f64>,
    pub fat: Option<f64>,
    pub source: FoodSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl FoodItem {
    pub fn macro_value(&self, m: Macro) -> Option<f64> {
        match m {
            Macro::Calories => self.calories,
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fat => self.fat,
        }
    }

    pub(crate) fn macro_slot(&mut self, m: Macro) -> &mut Option<f64> {
        match m {
            Macro::Calories => &mut self.calories,
            Macro::Protein => &mut self.protein,
            Macro::Carbs => &mut self.carbs,
            Macro::Fat => &mut self.fat,
        }
    }
}

/// A partial food record as typed by a user, returned by a lookup, or read
/// from storage. Every field is optional and loosely typed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFoodItem {
    #[serde(default)]
    pub id: Option<ItemId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub serving: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub qty: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub calories: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub protein: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub carbs: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub fat: Option<f64>,
    #[serde(default)]
    pub source: Option<FoodSource>,
    #[serde(default)]
    pub external_id: Option<ItemId>,
}

/// The four fixed meals of a day, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MealName {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealName {
    pub const ALL: [MealName; 4] = [
        MealName::Breakfast,
        MealName::Lunch,
        MealName::Dinner,
        MealName::Snack,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealName::Breakfast => "Breakfast",
            MealName::Lunch => "Lunch",
            MealName::Dinner => "Dinner",
            MealName::Snack => "Snack",
        }
    }
}

impl fmt::Display for MealName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        MealName::ALL
            .into_iter()
            .find(|m| {
                let name = m.as_str().to_lowercase();
                name == lowered || format!("{name}s") == lowered
            })
            .ok_or_else(|| format!("unknown meal {s:?}; expected Breakfast, Lunch, Dinner or Snack"))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    #[serde(default)]
    pub items: Vec<FoodItem>,
}

/// One logged calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    #[serde(default)]
    pub id: ItemId,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "deserialize_meals")]
    pub meals: BTreeMap<MealName, Meal>,
    #[serde(default)]
    pub notes: String,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub weight: Option<f64>,
    /// Totals recorded before per-item logging existed. Read, never written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_totals: Option<MacroTotals>,
}

impl Day {
    pub fn new(id: ItemId, date: NaiveDate) -> Self {
        Self {
            id,
            date,
            meals: MealName::ALL.into_iter().map(|m| (m, Meal::default())).collect(),
            notes: String::new(),
            weight: None,
            legacy_totals: None,
        }
    }

    pub fn meal(&self, name: MealName) -> Option<&Meal> {
        self.meals.get(&name)
    }

    pub fn meal_mut(&mut self, name: MealName) -> &mut Meal {
        self.meals.entry(name).or_default()
    }

    pub fn items(&self, name: MealName) -> &[FoodItem] {
        self.meal(name).map(|m| m.items.as_slice()).unwrap_or_default()
    }

    pub fn item_count(&self) -> usize {
        self.meals.values().map(|m| m.items.len()).sum()
    }
}

// Unknown meal keys in stored data are dropped rather than failing the whole day.
fn deserialize_meals<'de, D>(deserializer: D) -> Result<BTreeMap<MealName, Meal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, Meal>> = Option::deserialize(deserializer)?;
    let mut meals = BTreeMap::new();
    for (key, meal) in raw.unwrap_or_default() {
        match key.parse::<MealName>() {
            Ok(name) => meals.entry(name).or_insert_with(Meal::default).items.extend(meal.items),
            Err(_) => tracing::warn!(meal = %key, "dropping unknown meal from stored day"),
        }
    }
    Ok(meals)
}

/// Derived macro totals, one decimal place. Never persisted except as legacy data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroTotals {
    #[serde(default, deserialize_with = "deserialize_total")]
    pub calories: f64,
    #[serde(default, deserialize_with = "deserialize_total")]
    pub protein: f64,
    #[serde(default, deserialize_with = "deserialize_total")]
    pub carbs: f64,
    #[serde(default, deserialize_with = "deserialize_total")]
    pub fat: f64,
}

fn deserialize_total<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_lenient_f64(deserializer)?.unwrap_or(0.0))
}

impl MacroTotals {
    pub fn get(&self, m: Macro) -> f64 {
        match m {
            Macro::Calories => self.calories,
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fat => self.fat,
        }
    }

    /// Apply `f` to each macro.
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            calories: f(self.calories),
            protein: f(self.protein),
            carbs: f(self.carbs),
            fat: f(self.fat),
        }
    }
}

impl std::ops::Add for MacroTotals {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein: self.protein + other.protein,
            carbs: self.carbs + other.carbs,
            fat: self.fat + other.fat,
        }
    }
}

/// Daily targets. Zero or absent means "no goal".
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroGoals {
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub calories: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub protein: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub carbs: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub fat: Option<f64>,
}

impl MacroGoals {
    /// The goal for `m`, or `None` when unset or not positive.
    pub fn target(&self, m: Macro) -> Option<f64> {
        let v = match m {
            Macro::Calories => self.calories,
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fat => self.fat,
        };
        v.filter(|v| *v > 0.0)
    }

    pub fn has_any(&self) -> bool {
        Macro::ALL.iter().any(|m| self.target(*m).is_some())
    }
}
