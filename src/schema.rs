//! Embedded table definitions and starter data.
//!
//! Tables are only ever created, never dropped or altered, so `ensure_schema`
//! is safe to run on every start against any existing database.

use rusqlite::{params, Connection, Transaction};

use crate::db::DbPool;
use crate::error::Result;
use crate::models::Category;

/// Every table in creation order, each as (table name, sql)
pub const TABLES: &[(&str, &str)] = &[
    (
        "accounts",
        include_str!("../migrations/001_create_accounts.sql"),
    ),
    (
        "exercises",
        include_str!("../migrations/002_create_exercises.sql"),
    ),
    ("sets", include_str!("../migrations/003_create_sets.sql")),
];

/// Written only when the `exercises` table is created.
pub const STARTER_EXERCISES: &[(&str, Category)] = &[
    ("Bench Press", Category::Chest),
    ("Squat", Category::Legs),
    ("Deadlift", Category::Back),
    ("Shoulder Press", Category::Other),
];

/// What `ensure_schema` found on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaInfo {
    /// False for databases created before exercises had a category.
    pub exercises_has_category: bool,
    /// True when this call created the catalog and wrote the starter exercises.
    pub seeded: bool,
}

impl SchemaInfo {
    /// Category expression for queries that alias `exercises` as `e`.
    pub fn category_expr(&self) -> &'static str {
        if self.exercises_has_category {
            "e.category"
        } else {
            "NULL"
        }
    }
}

pub fn ensure_schema(pool: &DbPool) -> Result<SchemaInfo> {
    let mut conn = pool.get()?;
    ensure_schema_on(&mut conn)
}

pub fn ensure_schema_on(conn: &mut Connection) -> Result<SchemaInfo> {
    tracing::info!("Ensuring schema...");

    let tx = conn.transaction()?;
    let mut seeded = false;

    for (table, sql) in TABLES {
        if table_exists(&tx, table)? {
            tracing::debug!("Table {} already present", table);
            continue;
        }

        tracing::info!("Creating table: {}", table);
        tx.execute_batch(sql)?;

        if *table == "exercises" {
            seed_exercises(&tx)?;
            seeded = true;
        }
    }

    let exercises_has_category = has_column(&tx, "exercises", "category")?;
    if !exercises_has_category {
        tracing::warn!("exercises table has no category column; all exercises read as uncategorized");
    }

    tx.commit()?;

    tracing::info!("Schema ready");
    Ok(SchemaInfo {
        exercises_has_category,
        seeded,
    })
}

fn seed_exercises(tx: &Transaction) -> Result<()> {
    let mut stmt = tx.prepare("INSERT INTO exercises (name, category) VALUES (?, ?)")?;
    for (name, category) in STARTER_EXERCISES {
        stmt.execute(params![name, category.as_str()])?;
    }
    tracing::info!("Seeded {} starter exercises", STARTER_EXERCISES.len());
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type = 'table' AND name = ?",
        [table],
        |row| row.get(0),
    )
}

fn has_column(conn: &Connection, table: &str, column: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM pragma_table_info(?) WHERE name = ?",
        [table, column],
        |row| row.get(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;

    fn count(pool: &DbPool, sql: &str) -> i64 {
        let conn = pool.get().unwrap();
        conn.query_row(sql, [], |row| row.get(0)).unwrap()
    }

    #[test]
    fn test_creates_tables_and_seeds() {
        let pool = create_memory_pool().unwrap();

        let info = ensure_schema(&pool).unwrap();

        assert!(info.seeded);
        assert!(info.exercises_has_category);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM exercises"), 4);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM accounts"), 0);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM sets"), 0);
        assert_eq!(
            count(
                &pool,
                "SELECT COUNT(*) FROM exercises WHERE name = 'Squat' AND category = 'legs'"
            ),
            1
        );
    }

    #[test]
    fn test_repeated_calls_do_not_reseed() {
        let pool = create_memory_pool().unwrap();

        ensure_schema(&pool).unwrap();
        let second = ensure_schema(&pool).unwrap();
        let third = ensure_schema(&pool).unwrap();

        assert!(!second.seeded);
        assert!(!third.seeded);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM exercises"), 4);
    }

    #[test]
    fn test_existing_empty_catalog_is_not_seeded() {
        let pool = create_memory_pool().unwrap();
        pool.get()
            .unwrap()
            .execute_batch("CREATE TABLE exercises (id INTEGER PRIMARY KEY, name TEXT NOT NULL, category TEXT)")
            .unwrap();

        let info = ensure_schema(&pool).unwrap();

        assert!(!info.seeded);
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM exercises"), 0);
    }

    #[test]
    fn test_tolerates_legacy_exercises_without_category() {
        let pool = create_memory_pool().unwrap();
        pool.get()
            .unwrap()
            .execute_batch(
                "CREATE TABLE exercises (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL);
                 INSERT INTO exercises (name) VALUES ('Curl');",
            )
            .unwrap();

        let info = ensure_schema(&pool).unwrap();

        assert!(!info.exercises_has_category);
        assert!(!info.seeded);
        assert!(!has_column(&pool.get().unwrap(), "exercises", "category").unwrap());
        assert_eq!(count(&pool, "SELECT COUNT(*) FROM exercises"), 1);
    }
}
