use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::{deserialize_calendar_date, week_ending};
use crate::ids::{IdGenerator, ItemId};
use crate::numeric::{deserialize_lenient_f64, round1};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseKind {
    #[default]
    Resistance,
    Cardio,
}

/// An entry in the exercise library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    #[serde(default)]
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub kind: ExerciseKind,
}

/// Library used when nothing has been saved yet.
pub fn default_library() -> Vec<Exercise> {
    [
        ("bench-press", "Bench Press", ExerciseKind::Resistance),
        ("squat", "Squat", ExerciseKind::Resistance),
        ("deadlift", "Deadlift", ExerciseKind::Resistance),
        ("overhead-press", "Overhead Press", ExerciseKind::Resistance),
        ("barbell-row", "Barbell Row", ExerciseKind::Resistance),
        ("pull-up", "Pull-up", ExerciseKind::Resistance),
        ("running", "Running", ExerciseKind::Cardio),
        ("cycling", "Cycling", ExerciseKind::Cardio),
        ("rowing", "Rowing", ExerciseKind::Cardio),
    ]
    .into_iter()
    .map(|(id, name, kind)| Exercise {
        id: ItemId::new(id),
        name: name.to_string(),
        kind,
    })
    .collect()
}

/// Case-insensitive lookup by name or id.
pub fn find_exercise<'a>(library: &'a [Exercise], name: &str) -> Option<&'a Exercise> {
    let wanted = name.trim().to_lowercase();
    library
        .iter()
        .find(|e| e.name.to_lowercase() == wanted || e.id.as_str().eq_ignore_ascii_case(&wanted))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SetEntry {
    #[serde(default)]
    pub reps: u32,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CardioEntry {
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub minutes: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_f64")]
    pub distance: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutEntry {
    pub exercise_id: ItemId,
    #[serde(default)]
    pub sets: Vec<SetEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardio: Option<CardioEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    #[serde(default)]
    pub id: ItemId,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub entries: Vec<WorkoutEntry>,
}

impl Workout {
    pub fn new(ids: &dyn IdGenerator, date: NaiveDate) -> Self {
        Self {
            id: ids.next_id(),
            date,
            entries: Vec::new(),
        }
    }
}

/// Σ reps × weight across all sets; sets without a weight add nothing.
pub fn workout_volume(workout: &Workout) -> f64 {
    let total: f64 = workout
        .entries
        .iter()
        .flat_map(|e| e.sets.iter())
        .map(|s| f64::from(s.reps) * s.weight.unwrap_or(0.0))
        .sum();
    round1(total)
}

pub fn workouts_on(workouts: &[Workout], date: NaiveDate) -> Vec<&Workout> {
    workouts.iter().filter(|w| w.date == date).collect()
}

/// Workouts logged in the seven days ending at `anchor`.
pub fn weekly_workout_count(workouts: &[Workout], anchor: NaiveDate) -> usize {
    let week = week_ending(anchor);
    workouts.iter().filter(|w| week.contains(&w.date)).count()
}

/// Most recent workouts first, at most `limit`.
pub fn recent_workouts(workouts: &[Workout], limit: usize) -> Vec<&Workout> {
    let mut sorted: Vec<&Workout> = workouts.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(limit);
    sorted
}
