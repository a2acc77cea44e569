//! The workout store: every repository over one pool and one schema check.

use crate::db::{create_pool, DbPool};
use crate::error::Result;
use crate::repositories::{
    AccountRepository, ExerciseRepository, SetRecordRepository, StatsRepository,
};
use crate::schema::{ensure_schema, SchemaInfo};

#[derive(Clone)]
pub struct WorkoutStore {
    pub accounts: AccountRepository,
    pub exercises: ExerciseRepository,
    pub records: SetRecordRepository,
    pub stats: StatsRepository,
    schema: SchemaInfo,
}

impl WorkoutStore {
    /// Open (or create) the database at `path` and make sure the tables exist.
    pub fn open(path: &str) -> Result<Self> {
        tracing::info!("Opening workout store: {}", path);
        let pool = create_pool(path)?;
        Self::from_pool(pool)
    }

    pub fn from_pool(pool: DbPool) -> Result<Self> {
        let schema = ensure_schema(&pool)?;
        Ok(Self {
            accounts: AccountRepository::new(pool.clone()),
            exercises: ExerciseRepository::new(pool.clone(), schema),
            records: SetRecordRepository::new(pool.clone(), schema),
            stats: StatsRepository::new(pool, schema),
            schema,
        })
    }

    pub fn schema(&self) -> SchemaInfo {
        self.schema
    }
}
