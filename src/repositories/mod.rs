pub mod account_repo;
pub mod exercise_repo;
pub mod record_repo;
pub mod stats_repo;

pub use account_repo::AccountRepository;
pub use exercise_repo::ExerciseRepository;
pub use record_repo::SetRecordRepository;
pub use stats_repo::{PersonalBests, StatsRepository, TrendSeries};
