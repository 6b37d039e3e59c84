//! Whole-log export and import.
//!
//! A snapshot carries the exercise library, the workout log and the nutrition
//! days. Goals stay local and are never exported.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domains::workouts::{Exercise, Workout};
use crate::state::AppState;
use crate::types::Day;

const EXERCISES: &str = "exercises";
const WORKOUTS: &str = "workouts";
const NUTRITION_DAYS: &str = "nutritionDays";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<'a> {
    pub exercises: &'a [Exercise],
    pub workouts: &'a [Workout],
    pub nutrition_days: &'a [Day],
    pub exported_at: String,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("snapshot must be a JSON object")]
    NotAnObject,
}

/// What happened to one collection during import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionImport {
    Replaced(usize),
    Missing,
    NotAnArray,
}

impl CollectionImport {
    pub fn replaced(&self) -> bool {
        matches!(self, Self::Replaced(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub exercises: CollectionImport,
    pub workouts: CollectionImport,
    pub nutrition_days: CollectionImport,
}

pub fn export_snapshot(state: &AppState, now: DateTime<Utc>) -> Result<String, SnapshotError> {
    let snapshot = Snapshot {
        exercises: &state.exercises,
        workouts: &state.workouts,
        nutrition_days: state.nutrition.days(),
        exported_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
    };
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

fn take_collection<T: DeserializeOwned>(
    object: &mut Map<String, Value>,
    key: &str,
) -> (Option<Vec<T>>, CollectionImport) {
    match object.remove(key) {
        None => (None, CollectionImport::Missing),
        Some(Value::Array(entries)) => {
            let items: Vec<T> = entries
                .into_iter()
                .enumerate()
                .filter_map(|(index, entry)| match serde_json::from_value::<T>(entry) {
                    Ok(item) => Some(item),
                    Err(e) => {
                        tracing::warn!(key, index, error = %e, "skipping unreadable snapshot entry");
                        None
                    }
                })
                .collect();
            let count = items.len();
            (Some(items), CollectionImport::Replaced(count))
        }
        Some(_) => (None, CollectionImport::NotAnArray),
    }
}

/// Replace each collection present in `text` wholesale.
///
/// A collection that is missing or not an array is left as it was and
/// reported in the summary. Entries of an array that cannot be read are
/// skipped. Only a text that is not a JSON object at all is an error, in which
/// case nothing changes.
pub fn import_snapshot(state: &mut AppState, text: &str) -> Result<ImportSummary, SnapshotError> {
    let Value::Object(mut object) = serde_json::from_str::<Value>(text)? else {
        return Err(SnapshotError::NotAnObject);
    };

    let (exercises, exercises_result) = take_collection::<Exercise>(&mut object, EXERCISES);
    let (workouts, workouts_result) = take_collection::<Workout>(&mut object, WORKOUTS);
    let (days, days_result) = take_collection::<Day>(&mut object, NUTRITION_DAYS);

    if let Some(exercises) = exercises {
        state.exercises = exercises;
    }
    if let Some(workouts) = workouts {
        state.workouts = workouts;
    }
    if let Some(days) = days {
        state.nutrition.replace_days(days);
    }

    let summary = ImportSummary {
        exercises: exercises_result,
        workouts: workouts_result,
        nutrition_days: days_result,
    };
    tracing::info!(?summary, "snapshot imported");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::types::{MealName, RawFoodItem};
    use chrono::{NaiveDate, TimeZone};
    use std::sync::Arc;

    fn state_with_day() -> AppState {
        let mut state = AppState::empty(Arc::new(SequentialIds::new("s")));
        state.goals.protein = Some(150.0);
        state.nutrition.add_item(
            NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            MealName::Lunch,
            RawFoodItem {
                name: Some("Wrap".into()),
                calories: Some(420.0),
                ..Default::default()
            },
        );
        state
    }

    #[test]
    fn export_uses_wire_keys_and_omits_goals() {
        let state = state_with_day();
        let now = Utc.with_ymd_and_hms(2026, 8, 2, 9, 30, 0).unwrap();
        let text = export_snapshot(&state, now).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["exportedAt"], "2026-08-02T09:30:00.000Z");
        assert_eq!(value["nutritionDays"].as_array().map(Vec::len), Some(1));
        assert!(value["exercises"].is_array());
        assert!(value.get("macroGoals").is_none());
    }

    #[test]
    fn export_then_import_restores_days() {
        let source = state_with_day();
        let text = export_snapshot(&source, Utc::now()).unwrap();

        let mut target = AppState::empty(Arc::new(SequentialIds::new("x")));
        let summary = import_snapshot(&mut target, &text).unwrap();
        assert_eq!(summary.nutrition_days, CollectionImport::Replaced(1));
        assert_eq!(target.nutrition.days(), source.nutrition.days());
        assert_eq!(target.goals, crate::types::MacroGoals::default());
    }

    #[test]
    fn non_array_collections_are_skipped() {
        let mut state = state_with_day();
        let before = state.nutrition.days().to_vec();
        let summary = import_snapshot(
            &mut state,
            r#"{"nutritionDays": {"oops": true}, "workouts": [], "exercises": [{"nope": 1}]}"#,
        )
        .unwrap();
        assert_eq!(summary.nutrition_days, CollectionImport::NotAnArray);
        assert_eq!(summary.workouts, CollectionImport::Replaced(0));
        assert_eq!(summary.exercises, CollectionImport::Replaced(0));
        assert_eq!(state.nutrition.days(), before.as_slice());
        assert!(state.exercises.is_empty());
    }

    #[test]
    fn unreadable_entries_are_skipped_and_the_rest_imported() {
        let mut state = state_with_day();
        let summary = import_snapshot(
            &mut state,
            r#"{"nutritionDays": [
                {"id": "a", "date": "2026-01-01"},
                {"id": "b", "date": "2026-01-02"},
                {"id": "c", "date": 1767312000000}
            ]}"#,
        )
        .unwrap();
        assert_eq!(summary.nutrition_days, CollectionImport::Replaced(2));
        assert_eq!(summary.exercises, CollectionImport::Missing);
        let dates: Vec<_> = state.nutrition.days().iter().map(|d| d.date).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
            ]
        );
        assert!(!state.exercises.is_empty());
    }

    #[test]
    fn non_object_text_is_an_error() {
        let mut state = state_with_day();
        assert!(matches!(import_snapshot(&mut state, "[1, 2]"), Err(SnapshotError::NotAnObject)));
        assert!(matches!(import_snapshot(&mut state, "nope"), Err(SnapshotError::Parse(_))));
        assert_eq!(state.nutrition.days().len(), 1);
    }
}
