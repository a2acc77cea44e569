pub mod account;
pub mod exercise;
pub mod from_row;
pub mod ids;
pub mod set_record;
pub mod stats;

pub use account::{Account, CreateAccount, LoginCredentials};
pub use exercise::{Category, CreateExercise, Exercise, ExerciseCategory, ExerciseKey};
pub use from_row::FromSqliteRow;
pub use ids::{AccountId, ExerciseId, SetRecordId};
pub use set_record::{CreateSetRecord, ExerciseRef, HistoryEntry, HistoryOrder, NewSetRecord};
pub use stats::{DailyGroup, PersonalBest, TrendPoint};
