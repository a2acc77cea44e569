use chrono::NaiveDate;
use serde::Serialize;

use super::{ExerciseCategory, HistoryEntry};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalBest {
    pub category: ExerciseCategory,
    pub exercise_name: String,
    pub max_weight: f64,
}

/// One day's records for a single category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyGroup {
    pub category: ExerciseCategory,
    pub entries: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub weight: f64,
}
