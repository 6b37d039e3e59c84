//! The nutrition day log.
//!
//! [`NutritionLog`] owns the day collection and is the only place days are
//! created or changed. Every successful mutation bumps [`NutritionLog::version`],
//! so callers holding an older version know their derived views are stale.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;

use crate::domains::copy_forward::{
    CopyMode, CopyOutcome, copy_all_meals, copy_one_meal, most_recent_prior_day,
};
use crate::domains::food::{FoodItemPatch, normalize_item};
use crate::ids::{IdGenerator, ItemId};
use crate::types::{Day, FoodItem, MealName, RawFoodItem};

#[derive(Clone)]
pub struct NutritionLog {
    version: u64,
    days: Vec<Day>,
    ids: Arc<dyn IdGenerator>,
}

impl fmt::Debug for NutritionLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NutritionLog")
            .field("version", &self.version)
            .field("days", &self.days.len())
            .finish()
    }
}

impl NutritionLog {
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            version: 0,
            days: Vec::new(),
            ids,
        }
    }

    /// Build a log from stored days.
    ///
    /// Days sharing a calendar date collapse into the first one seen; items of
    /// the later duplicates are appended to the matching meals. Missing day and
    /// item ids are filled in.
    pub fn from_days(days: Vec<Day>, ids: Arc<dyn IdGenerator>) -> Self {
        let mut merged: Vec<Day> = Vec::with_capacity(days.len());
        for mut day in days {
            for meal in day.meals.values_mut() {
                for item in meal.items.iter_mut() {
                    if item.id.is_empty() {
                        item.id = ids.next_id();
                    }
                }
            }
            match merged.iter_mut().find(|d| d.date == day.date) {
                Some(first) => {
                    tracing::warn!(date = %day.date, "merging duplicate stored day");
                    for (name, meal) in day.meals {
                        first.meal_mut(name).items.extend(meal.items);
                    }
                    if first.weight.is_none() {
                        first.weight = day.weight;
                    }
                    if first.notes.is_empty() {
                        first.notes = day.notes;
                    }
                }
                None => {
                    if day.id.is_empty() {
                        day.id = ids.next_id();
                    }
                    merged.push(day);
                }
            }
        }
        Self {
            version: 0,
            days: merged,
            ids,
        }
    }

    /// Decode a stored day array one element at a time, skipping entries that
    /// cannot be read (for example a missing or unparseable date).
    pub fn from_json(value: Value, ids: Arc<dyn IdGenerator>) -> Self {
        let days = match value {
            Value::Array(entries) => entries
                .into_iter()
                .enumerate()
                .filter_map(|(index, entry)| match serde_json::from_value::<Day>(entry) {
                    Ok(day) => Some(day),
                    Err(e) => {
                        tracing::warn!(index, error = %e, "skipping unreadable stored day");
                        None
                    }
                })
                .collect(),
            Value::Null => Vec::new(),
            other => {
                tracing::warn!(kind = json_kind(&other), "stored days are not an array");
                Vec::new()
            }
        };
        Self::from_days(days, ids)
    }

    /// Swap in a whole new day collection, with the same merging as loading.
    pub fn replace_days(&mut self, days: Vec<Day>) {
        let version = self.version + 1;
        *self = Self::from_days(days, self.ids.clone());
        self.version = version;
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn into_days(self) -> Vec<Day> {
        self.days
    }

    pub fn day(&self, date: NaiveDate) -> Option<&Day> {
        self.days.iter().find(|d| d.date == date)
    }

    fn day_mut(&mut self, date: NaiveDate) -> Option<&mut Day> {
        self.days.iter_mut().find(|d| d.date == date)
    }

    fn bump(&mut self) {
        self.version += 1;
    }

    /// The day for `date`, created empty on first use.
    pub fn get_or_create_day(&mut self, date: NaiveDate) -> &mut Day {
        let index = match self.days.iter().position(|d| d.date == date) {
            Some(index) => index,
            None => {
                tracing::debug!(%date, "creating day");
                self.days.push(Day::new(self.ids.next_id(), date));
                self.bump();
                self.days.len() - 1
            }
        };
        &mut self.days[index]
    }

    pub fn add_item(&mut self, date: NaiveDate, meal: MealName, raw: RawFoodItem) -> ItemId {
        let item = normalize_item(raw, self.ids.as_ref());
        let id = item.id.clone();
        self.get_or_create_day(date).meal_mut(meal).items.push(item);
        self.bump();
        tracing::debug!(%date, %meal, item = %id, "added item");
        id
    }

    fn item_mut(&mut self, date: NaiveDate, meal: MealName, id: &ItemId) -> Option<&mut FoodItem> {
        self.day_mut(date)?
            .meals
            .get_mut(&meal)?
            .items
            .iter_mut()
            .find(|item| &item.id == id)
    }

    /// Returns `false` when no such item exists.
    pub fn update_item(
        &mut self,
        date: NaiveDate,
        meal: MealName,
        id: &ItemId,
        patch: FoodItemPatch,
    ) -> bool {
        let Some(item) = self.item_mut(date, meal, id) else {
            return false;
        };
        item.apply_patch(patch);
        self.bump();
        true
    }

    /// Returns `false` when no such item exists.
    pub fn remove_item(&mut self, date: NaiveDate, meal: MealName, id: &ItemId) -> bool {
        let Some(meal) = self.day_mut(date).and_then(|d| d.meals.get_mut(&meal)) else {
            return false;
        };
        let before = meal.items.len();
        meal.items.retain(|item| &item.id != id);
        if meal.items.len() == before {
            return false;
        }
        self.bump();
        tracing::debug!(%date, item = %id, "removed item");
        true
    }

    pub fn set_notes(&mut self, date: NaiveDate, notes: impl Into<String>) {
        self.get_or_create_day(date).notes = notes.into();
        self.bump();
    }

    /// `None` clears the weight. Non-finite values are treated as cleared.
    pub fn set_weight(&mut self, date: NaiveDate, weight: Option<f64>) {
        self.get_or_create_day(date).weight = weight.filter(|w| w.is_finite());
        self.bump();
    }

    /// Replace every meal of `target` with copies from the most recent earlier day.
    pub fn copy_forward_day(&mut self, target: NaiveDate) -> CopyOutcome {
        let Some(source) = most_recent_prior_day(&self.days, target) else {
            return CopyOutcome::NothingToCopy;
        };
        let items = source.item_count();
        if items == 0 {
            return CopyOutcome::NothingToCopy;
        }
        let from = source.date;
        let meals = copy_all_meals(source, self.ids.as_ref());
        self.get_or_create_day(target).meals = meals;
        self.bump();
        tracing::debug!(%from, to = %target, items, "copied day forward");
        CopyOutcome::Copied { from, items }
    }

    /// Copy one meal from the most recent earlier day into `target`.
    pub fn copy_forward_meal(
        &mut self,
        target: NaiveDate,
        meal: MealName,
        mode: CopyMode,
    ) -> CopyOutcome {
        let Some(source) = most_recent_prior_day(&self.days, target) else {
            return CopyOutcome::NothingToCopy;
        };
        let items = source.items(meal).len();
        if items == 0 {
            return CopyOutcome::NothingToCopy;
        }
        let from = source.date;
        let dest = match self.day(target) {
            Some(day) => day.clone(),
            None => Day::new(self.ids.next_id(), target),
        };
        let updated = copy_one_meal(source, &dest, meal, mode, self.ids.as_ref());
        match self.day_mut(target) {
            Some(day) => *day = updated,
            None => self.days.push(updated),
        }
        self.bump();
        tracing::debug!(%from, to = %target, %meal, items, "copied meal forward");
        CopyOutcome::Copied { from, items }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::aggregate::day_totals;
    use crate::ids::SequentialIds;
    use serde_json::json;

    fn log() -> NutritionLog {
        NutritionLog::new(Arc::new(SequentialIds::new("t")))
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn food(name: &str, calories: f64) -> RawFoodItem {
        RawFoodItem {
            name: Some(name.into()),
            calories: Some(calories),
            ..Default::default()
        }
    }

    #[test]
    fn days_are_created_lazily_once() {
        let mut log = log();
        assert!(log.day(date(1)).is_none());
        log.add_item(date(1), MealName::Breakfast, food("Oats", 150.0));
        log.add_item(date(1), MealName::Lunch, food("Soup", 200.0));
        assert_eq!(log.days().len(), 1);
        assert_eq!(day_totals(&log.days()[0]).calories, 350.0);
    }

    #[test]
    fn mutations_bump_version() {
        let mut log = log();
        let v0 = log.version();
        let id = log.add_item(date(1), MealName::Dinner, food("Rice", 200.0));
        let v1 = log.version();
        assert!(v1 > v0);

        let patch = FoodItemPatch {
            qty: Some(Some(2.0)),
            ..Default::default()
        };
        assert!(log.update_item(date(1), MealName::Dinner, &id, patch));
        assert!(log.version() > v1);
        assert_eq!(day_totals(&log.days()[0]).calories, 400.0);

        let v2 = log.version();
        assert!(!log.remove_item(date(1), MealName::Lunch, &id));
        assert_eq!(log.version(), v2);
        assert!(log.remove_item(date(1), MealName::Dinner, &id));
        assert!(log.version() > v2);
    }

    #[test]
    fn update_unknown_item_is_false() {
        let mut log = log();
        let missing = ItemId::new("nope");
        assert!(!log.update_item(date(2), MealName::Snack, &missing, FoodItemPatch::default()));
        assert!(log.days().is_empty());
    }

    #[test]
    fn notes_and_weight_are_stored_on_the_day() {
        let mut log = log();
        log.set_weight(date(4), Some(81.2));
        log.set_notes(date(4), "long run");
        let day = log.day(date(4)).expect("day");
        assert_eq!(day.weight, Some(81.2));
        assert_eq!(day.notes, "long run");
        log.set_weight(date(4), Some(f64::NAN));
        assert_eq!(log.day(date(4)).and_then(|d| d.weight), None);
    }

    #[test]
    fn copy_forward_without_prior_day_changes_nothing() {
        let mut log = log();
        log.add_item(date(5), MealName::Lunch, food("Soup", 200.0));
        let version = log.version();
        assert_eq!(log.copy_forward_day(date(5)), CopyOutcome::NothingToCopy);
        assert_eq!(
            log.copy_forward_meal(date(3), MealName::Lunch, CopyMode::Append),
            CopyOutcome::NothingToCopy
        );
        assert_eq!(log.version(), version);
        assert_eq!(log.days().len(), 1);
    }

    #[test]
    fn copy_forward_meal_appends_ahead_and_keeps_source() {
        let mut log = log();
        log.add_item(date(1), MealName::Lunch, food("Soup", 200.0));
        log.add_item(date(1), MealName::Lunch, food("Bread", 100.0));
        log.add_item(date(3), MealName::Lunch, food("Salad", 50.0));
        let source_before = log.day(date(1)).cloned();

        let out = log.copy_forward_meal(date(3), MealName::Lunch, CopyMode::Append);
        assert_eq!(
            out,
            CopyOutcome::Copied {
                from: date(1),
                items: 2
            }
        );
        let names: Vec<_> = log
            .day(date(3))
            .map(|d| d.items(MealName::Lunch).iter().map(|i| i.name.clone()).collect())
            .unwrap_or_default();
        assert_eq!(names, vec!["Soup", "Bread", "Salad"]);
        assert_eq!(log.day(date(1)).cloned(), source_before);
    }

    #[test]
    fn copy_forward_day_creates_target_with_fresh_ids() {
        let mut log = log();
        let original = log.add_item(date(1), MealName::Breakfast, food("Eggs", 140.0));
        let out = log.copy_forward_day(date(2));
        assert!(matches!(out, CopyOutcome::Copied { items: 1, .. }));
        let copied = &log.day(date(2)).expect("target").items(MealName::Breakfast)[0];
        assert_ne!(copied.id, original);
        assert_eq!(copied.name, "Eggs");
    }

    #[test]
    fn loading_merges_duplicate_dates_and_skips_bad_days() {
        let stored = json!([
            {"id": 1, "date": "2026-03-01", "meals": {"Lunch": {"items": [{"name": "A", "calories": "100"}]}}},
            {"date": "not a date"},
            {"id": 2, "date": "2026-03-01T18:30:00", "weight": 80,
             "meals": {"Lunch": {"items": [{"name": "B", "calories": 50, "qty": ""}]}}},
            {"id": 3, "date": "2026-03-02"}
        ]);
        let log = NutritionLog::from_json(stored, Arc::new(SequentialIds::new("t")));
        assert_eq!(log.days().len(), 2);
        let first = log.day(date(1)).expect("merged day");
        assert_eq!(first.id.as_str(), "1");
        assert_eq!(first.weight, Some(80.0));
        let lunch = first.items(MealName::Lunch);
        assert_eq!(lunch.len(), 2);
        assert!(lunch.iter().all(|i| !i.id.is_empty()));
        assert_eq!(day_totals(first).calories, 150.0);
    }

    #[test]
    fn non_array_storage_loads_empty() {
        let log = NutritionLog::from_json(json!({"days": []}), Arc::new(SequentialIds::new("t")));
        assert!(log.days().is_empty());
    }
}
