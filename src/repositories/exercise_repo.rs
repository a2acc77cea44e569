use rusqlite::OptionalExtension;

use crate::db::{with_conn, DbPool};
use crate::error::{AppError, Result};
use crate::models::{Category, Exercise, ExerciseId, ExerciseKey, FromSqliteRow};
use crate::schema::SchemaInfo;

#[derive(Clone)]
pub struct ExerciseRepository {
    pool: DbPool,
    schema: SchemaInfo,
}

impl ExerciseRepository {
    pub fn new(pool: DbPool, schema: SchemaInfo) -> Self {
        Self { pool, schema }
    }

    fn select_sql(&self) -> String {
        format!(
            "SELECT e.id, e.name, {} AS category FROM exercises e",
            self.schema.category_expr()
        )
    }

    pub async fn find_by_id(&self, id: ExerciseId) -> Result<Option<Exercise>> {
        let sql = format!("{} WHERE e.id = ?", self.select_sql());
        with_conn(&self.pool, move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let result = stmt.query_row([id], Exercise::from_row).optional()?;
            Ok(result)
        })
        .await
    }

    /// The catalog in insertion order, optionally narrowed to one category.
    pub async fn list(&self, category: Option<Category>) -> Result<Vec<Exercise>> {
        let select = self.select_sql();
        let has_category = self.schema.exercises_has_category;

        with_conn(&self.pool, move |conn| {
            let exercises = match category {
                None => {
                    let mut stmt = conn.prepare(&format!("{select} ORDER BY e.id"))?;
                    let rows = stmt
                        .query_map([], Exercise::from_row)?
                        .collect::<rusqlite::Result<Vec<_>>>()?;
                    rows
                }
                // Nothing can match a filter when the column doesn't exist
                Some(_) if !has_category => Vec::new(),
                Some(category) => {
                    // Rows written by older versions carry the legacy labels
                    let (label, legacy_label) = (category.as_str(), category.legacy_label());
                    let mut stmt = conn.prepare(&format!(
                        "{select} WHERE e.category IN (?, ?) ORDER BY e.id"
                    ))?;
                    let rows = stmt
                        .query_map([label, legacy_label], Exercise::from_row)?
                        .collect::<rusqlite::Result<Vec<_>>>()?;
                    rows
                }
            };
            Ok(exercises)
        })
        .await
    }

    /// Insert a new catalog entry. Names are not deduplicated.
    pub async fn add(&self, name: &str, category: Option<Category>) -> Result<ExerciseId> {
        if name.trim().is_empty() {
            return Err(AppError::MalformedInput(
                "exercise name is required".to_string(),
            ));
        }

        let name = name.trim().to_string();
        let has_category = self.schema.exercises_has_category;

        with_conn(&self.pool, move |conn| {
            if has_category {
                conn.execute(
                    "INSERT INTO exercises (name, category) VALUES (?, ?)",
                    rusqlite::params![name, category.map(|c| c.as_str())],
                )?;
            } else {
                if let Some(category) = category {
                    tracing::warn!(
                        "exercises table has no category column; dropping category {} for {}",
                        category.as_str(),
                        name
                    );
                }
                conn.execute("INSERT INTO exercises (name) VALUES (?)", [&name])?;
            }
            let id = ExerciseId(conn.last_insert_rowid());
            tracing::debug!(exercise_id = %id, "Added exercise {}", name);
            Ok(id)
        })
        .await
    }

    /// Remove catalog rows. Sets logged against them are left in place and
    /// read back as referencing a missing exercise.
    pub async fn delete(&self, key: ExerciseKey) -> Result<usize> {
        with_conn(&self.pool, move |conn| {
            let rows = match &key {
                ExerciseKey::Id(id) => conn.execute("DELETE FROM exercises WHERE id = ?", [id])?,
                ExerciseKey::Name(name) => {
                    conn.execute("DELETE FROM exercises WHERE name = ?", [name])?
                }
            };

            if rows == 0 {
                return Err(AppError::NotFound(format!("exercise {key:?}")));
            }

            let orphaned: i64 = match &key {
                ExerciseKey::Id(id) => conn.query_row(
                    "SELECT COUNT(*) FROM sets WHERE exercise_id = ?",
                    [id],
                    |row| row.get(0),
                )?,
                ExerciseKey::Name(_) => conn.query_row(
                    "SELECT COUNT(*) FROM sets s LEFT JOIN exercises e ON s.exercise_id = e.id
                     WHERE s.exercise_id IS NOT NULL AND e.id IS NULL",
                    [],
                    |row| row.get(0),
                )?,
            };
            if orphaned > 0 {
                tracing::warn!(
                    "Deleted {} exercise row(s) for {:?}; {} set record(s) now reference a missing exercise",
                    rows,
                    key,
                    orphaned
                );
            }

            Ok(rows)
        })
        .await
    }
}
