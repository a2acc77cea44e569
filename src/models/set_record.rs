use chrono::NaiveDate;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::{ExerciseCategory, ExerciseId, FromSqliteRow, SetRecordId};
use crate::error::{AppError, Result};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Shown in place of an exercise that was deleted after sets were logged against it.
pub const MISSING_EXERCISE: &str = "(missing exercise)";

/// One logged entry, before it has an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSetRecord {
    pub exercise_id: ExerciseId,
    pub date: NaiveDate,
    pub weight: f64,
    pub reps: i64,
    pub set_count: i64,
}

impl NewSetRecord {
    /// Build a record from raw text fields.
    ///
    /// Only the shape is checked: numbers must parse and the weight must be
    /// finite. Ranges (negative weight, zero reps) pass through untouched.
    pub fn parse(
        exercise_id: &str,
        date: &str,
        weight: &str,
        reps: &str,
        set_count: &str,
    ) -> Result<Self> {
        let record = Self {
            exercise_id: exercise_id
                .parse()
                .map_err(|_| malformed("exercise", exercise_id))?,
            date: NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
                .map_err(|_| malformed("date", date))?,
            weight: weight
                .trim()
                .parse()
                .map_err(|_| malformed("weight", weight))?,
            reps: reps.trim().parse().map_err(|_| malformed("reps", reps))?,
            set_count: set_count
                .trim()
                .parse()
                .map_err(|_| malformed("set count", set_count))?,
        };
        record.check_numeric()?;
        Ok(record)
    }

    pub fn check_numeric(&self) -> Result<()> {
        if !self.weight.is_finite() {
            return Err(AppError::MalformedInput(format!(
                "weight must be a number, got {}",
                self.weight
            )));
        }
        Ok(())
    }
}

fn malformed(field: &str, raw: &str) -> AppError {
    AppError::MalformedInput(format!("{field} is not valid: {raw:?}"))
}

/// Form body for logging a set. Every field arrives as text.
#[derive(Debug, Deserialize)]
pub struct CreateSetRecord {
    pub exercise_id: String,
    #[serde(default)]
    pub date: String,
    pub weight: String,
    pub reps: String,
    pub set_count: String,
}

impl CreateSetRecord {
    /// An empty date means `today`.
    pub fn into_record(self, today: NaiveDate) -> Result<NewSetRecord> {
        let date = if self.date.trim().is_empty() {
            today.format(DATE_FORMAT).to_string()
        } else {
            self.date
        };
        NewSetRecord::parse(
            &self.exercise_id,
            &date,
            &self.weight,
            &self.reps,
            &self.set_count,
        )
    }
}

/// The exercise a history row points at.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExerciseRef {
    Known {
        id: ExerciseId,
        name: String,
        category: ExerciseCategory,
    },
    /// The referenced exercise no longer exists.
    Missing { id: Option<ExerciseId> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryOrder {
    #[default]
    NewestFirst,
    OldestFirst,
}

impl HistoryOrder {
    pub(crate) fn sql(&self) -> &'static str {
        match self {
            HistoryOrder::NewestFirst => "s.date DESC, s.id DESC",
            HistoryOrder::OldestFirst => "s.date ASC, s.id ASC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub id: SetRecordId,
    pub date: NaiveDate,
    pub exercise: ExerciseRef,
    pub weight: f64,
    pub reps: i64,
    pub set_count: i64,
}

impl HistoryEntry {
    pub fn exercise_name(&self) -> &str {
        match &self.exercise {
            ExerciseRef::Known { name, .. } => name,
            ExerciseRef::Missing { .. } => MISSING_EXERCISE,
        }
    }

    pub fn category(&self) -> ExerciseCategory {
        match &self.exercise {
            ExerciseRef::Known { category, .. } => *category,
            ExerciseRef::Missing { .. } => ExerciseCategory::Uncategorized,
        }
    }
}

/// Expects the columns produced by the history join: the set columns plus
/// `exercise_name` and `exercise_category`, which are NULL when the exercise
/// row is gone.
impl FromSqliteRow for HistoryEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let exercise_id: Option<ExerciseId> = row.get("exercise_id")?;
        let exercise_name: Option<String> = row.get("exercise_name")?;
        let category: Option<String> = row.get("exercise_category")?;

        let exercise = match (exercise_id, exercise_name) {
            (Some(id), Some(name)) => ExerciseRef::Known {
                id,
                name,
                category: ExerciseCategory::from_stored(category.as_deref()),
            },
            (id, _) => ExerciseRef::Missing { id },
        };

        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            exercise,
            weight: row.get("weight")?,
            reps: row.get("reps")?,
            set_count: row.get("set_count")?,
        })
    }
}
