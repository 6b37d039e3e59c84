use std::sync::Arc;

use serde_json::Value;

use crate::domains::workouts::{Exercise, Workout, default_library};
use crate::ids::IdGenerator;
use crate::log::NutritionLog;
use crate::store::{
    EXERCISES, KeyValueStore, MACRO_GOALS, NUTRITION_DAYS, WORKOUTS, load_or_default,
    save_best_effort,
};
use crate::types::MacroGoals;

/// Everything the tracker persists, loaded together and saved together.
#[derive(Debug, Clone)]
pub struct AppState {
    pub exercises: Vec<Exercise>,
    pub workouts: Vec<Workout>,
    pub nutrition: NutritionLog,
    pub goals: MacroGoals,
}

impl AppState {
    pub fn empty(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            exercises: default_library(),
            workouts: Vec::new(),
            nutrition: NutritionLog::new(ids),
            goals: MacroGoals::default(),
        }
    }

    /// Load all four values; anything missing or malformed starts from its default.
    pub fn load(store: &dyn KeyValueStore, ids: Arc<dyn IdGenerator>) -> Self {
        let days: Value = load_or_default(store, NUTRITION_DAYS, Value::Null);
        let state = Self {
            exercises: load_or_default(store, EXERCISES, default_library()),
            workouts: load_or_default(store, WORKOUTS, Vec::new()),
            nutrition: NutritionLog::from_json(days, ids),
            goals: load_or_default(store, MACRO_GOALS, MacroGoals::default()),
        };
        tracing::debug!(
            exercises = state.exercises.len(),
            workouts = state.workouts.len(),
            days = state.nutrition.days().len(),
            "state loaded"
        );
        state
    }

    /// Save all four values. Every key is attempted; `false` if any failed.
    pub fn save(&self, store: &dyn KeyValueStore) -> bool {
        [
            save_best_effort(store, EXERCISES, &self.exercises),
            save_best_effort(store, WORKOUTS, &self.workouts),
            save_best_effort(store, NUTRITION_DAYS, self.nutrition.days()),
            save_best_effort(store, MACRO_GOALS, &self.goals),
        ]
        .iter()
        .all(|ok| *ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::store::MemoryStore;
    use crate::types::{MealName, RawFoodItem};
    use chrono::NaiveDate;

    #[test]
    fn fresh_store_loads_defaults() {
        let store = MemoryStore::new();
        let state = AppState::load(&store, Arc::new(SequentialIds::new("t")));
        assert_eq!(state.exercises, default_library());
        assert!(state.workouts.is_empty());
        assert!(state.nutrition.days().is_empty());
        assert!(!state.goals.has_any());
    }

    #[test]
    fn save_then_load_restores_everything() {
        let store = MemoryStore::new();
        let ids: Arc<dyn IdGenerator> = Arc::new(SequentialIds::new("t"));
        let date = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();

        let mut state = AppState::empty(ids.clone());
        state.goals.calories = Some(2000.0);
        state.workouts.push(Workout::new(ids.as_ref(), date));
        let id = state.nutrition.add_item(
            date,
            MealName::Snack,
            RawFoodItem {
                name: Some("Apple".into()),
                calories: Some(95.0),
                ..Default::default()
            },
        );
        assert!(state.save(&store));

        let loaded = AppState::load(&store, ids);
        assert_eq!(loaded.goals.calories, Some(2000.0));
        assert_eq!(loaded.workouts.len(), 1);
        let snack = loaded.nutrition.day(date).expect("day").items(MealName::Snack);
        assert_eq!(snack[0].id, id);
        assert_eq!(snack[0].calories, Some(95.0));
        assert_eq!(snack[0].protein, None);
    }
}
