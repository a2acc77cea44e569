use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::db::{with_conn, DbPool};
use crate::error::Result;
use crate::models::{
    AccountId, DailyGroup, ExerciseCategory, FromSqliteRow, HistoryEntry, HistoryOrder,
    PersonalBest, TrendPoint,
};
use crate::repositories::record_repo::history_sql;
use crate::schema::SchemaInfo;

pub type PersonalBests = BTreeMap<(ExerciseCategory, String), f64>;
pub type TrendSeries = BTreeMap<String, Vec<TrendPoint>>;

/// Read-only aggregates over an account's history. Sets whose exercise was
/// deleted only show up in the daily log; per-exercise aggregates skip them.
#[derive(Clone)]
pub struct StatsRepository {
    pool: DbPool,
    schema: SchemaInfo,
}

impl StatsRepository {
    pub fn new(pool: DbPool, schema: SchemaInfo) -> Self {
        Self { pool, schema }
    }

    /// Heaviest weight per (category, exercise name).
    pub async fn personal_bests(&self, account_id: AccountId) -> Result<PersonalBests> {
        let sql = format!(
            "SELECT {} AS category, e.name, MAX(s.weight)
             FROM sets s
             JOIN exercises e ON s.exercise_id = e.id
             WHERE s.account_id = ?
             GROUP BY e.id",
            self.schema.category_expr()
        );

        with_conn(&self.pool, move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([account_id], |row| {
                    let category: Option<String> = row.get(0)?;
                    Ok((
                        ExerciseCategory::from_stored(category.as_deref()),
                        row.get::<_, String>(1)?,
                        row.get::<_, f64>(2)?,
                    ))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(merge_personal_bests(rows))
        })
        .await
    }

    /// Personal bests heaviest first, for display.
    pub async fn personal_best_list(&self, account_id: AccountId) -> Result<Vec<PersonalBest>> {
        let mut bests: Vec<_> = self
            .personal_bests(account_id)
            .await?
            .into_iter()
            .map(|((category, exercise_name), max_weight)| PersonalBest {
                category,
                exercise_name,
                max_weight,
            })
            .collect();
        bests.sort_by(|a, b| b.max_weight.total_cmp(&a.max_weight));
        Ok(bests)
    }

    /// One day's records grouped by category in display order.
    pub async fn daily_log(&self, account_id: AccountId, date: NaiveDate) -> Result<Vec<DailyGroup>> {
        let sql = history_sql(&self.schema, "AND s.date = ?", HistoryOrder::OldestFirst);
        with_conn(&self.pool, move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let entries = stmt
                .query_map(rusqlite::params![account_id, date], HistoryEntry::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(group_by_category(entries))
        })
        .await
    }

    /// Weight over time per exercise name, oldest first. Several records of one
    /// exercise on the same day are averaged into a single point.
    pub async fn trend_series(&self, account_id: AccountId) -> Result<TrendSeries> {
        with_conn(&self.pool, move |conn| {
            let mut stmt = conn.prepare(
                "SELECT e.name, s.date, AVG(s.weight)
                 FROM sets s
                 JOIN exercises e ON s.exercise_id = e.id
                 WHERE s.account_id = ?
                 GROUP BY e.name, s.date
                 ORDER BY e.name, s.date",
            )?;
            let rows = stmt.query_map([account_id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    TrendPoint {
                        date: row.get(1)?,
                        weight: row.get(2)?,
                    },
                ))
            })?;

            let mut series = TrendSeries::new();
            for row in rows {
                let (name, point) = row?;
                series.entry(name).or_default().push(point);
            }
            Ok(series)
        })
        .await
    }

    /// Distinct dates with at least one record, newest first.
    pub async fn training_days(&self, account_id: AccountId) -> Result<Vec<NaiveDate>> {
        with_conn(&self.pool, move |conn| {
            let mut stmt =
                conn.prepare("SELECT DISTINCT date FROM sets WHERE account_id = ? ORDER BY date DESC")?;
            let days: Vec<NaiveDate> = stmt
                .query_map([account_id], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(days)
        })
        .await
    }
}

/// Labels that parse to the same category (e.g. an old and a new spelling)
/// collapse into one key.
fn merge_personal_bests(
    rows: impl IntoIterator<Item = (ExerciseCategory, String, f64)>,
) -> PersonalBests {
    let mut bests = PersonalBests::new();
    for (category, name, weight) in rows {
        bests
            .entry((category, name))
            .and_modify(|best| *best = best.max(weight))
            .or_insert(weight);
    }
    bests
}

fn group_by_category(entries: Vec<HistoryEntry>) -> Vec<DailyGroup> {
    let mut groups: BTreeMap<ExerciseCategory, Vec<HistoryEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.category()).or_default().push(entry);
    }
    groups
        .into_iter()
        .map(|(category, entries)| DailyGroup { category, entries })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::models::{Category, ExerciseId, ExerciseKey, NewSetRecord};
    use crate::repositories::{AccountRepository, ExerciseRepository, SetRecordRepository};
    use crate::schema::ensure_schema;

    const BENCH: ExerciseId = ExerciseId(1);
    const SQUAT: ExerciseId = ExerciseId(2);
    const DEADLIFT: ExerciseId = ExerciseId(3);
    const PRESS: ExerciseId = ExerciseId(4);

    struct Fixture {
        stats: StatsRepository,
        records: SetRecordRepository,
        exercises: ExerciseRepository,
        account: AccountId,
    }

    async fn setup() -> Fixture {
        let pool = create_memory_pool().expect("Failed to create test database");
        let schema = ensure_schema(&pool).expect("Failed to create schema");
        let account = AccountRepository::new(pool.clone())
            .register("alice", "secret")
            .await
            .unwrap();
        Fixture {
            stats: StatsRepository::new(pool.clone(), schema),
            records: SetRecordRepository::new(pool.clone(), schema),
            exercises: ExerciseRepository::new(pool, schema),
            account,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    impl Fixture {
        async fn log(&self, exercise_id: ExerciseId, date: NaiveDate, weight: f64) {
            let record = NewSetRecord {
                exercise_id,
                date,
                weight,
                reps: 5,
                set_count: 3,
            };
            self.records.add(self.account, record).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_personal_bests() {
        let f = setup().await;
        f.log(BENCH, day(1), 50.0).await;
        f.log(BENCH, day(2), 70.0).await;
        f.log(SQUAT, day(2), 90.0).await;

        let bests = f.stats.personal_bests(f.account).await.unwrap();

        let expected = PersonalBests::from([
            (
                (ExerciseCategory::Tagged(Category::Chest), "Bench Press".to_string()),
                70.0,
            ),
            (
                (ExerciseCategory::Tagged(Category::Legs), "Squat".to_string()),
                90.0,
            ),
        ]);
        assert_eq!(bests, expected);
    }

    #[tokio::test]
    async fn test_personal_bests_empty_history() {
        let f = setup().await;

        assert!(f.stats.personal_bests(f.account).await.unwrap().is_empty());
        assert!(f.stats.personal_best_list(f.account).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_personal_best_list_heaviest_first() {
        let f = setup().await;
        f.log(BENCH, day(1), 70.0).await;
        f.log(DEADLIFT, day(1), 140.0).await;
        f.log(SQUAT, day(1), 100.0).await;

        let names: Vec<_> = f
            .stats
            .personal_best_list(f.account)
            .await
            .unwrap()
            .into_iter()
            .map(|pb| pb.exercise_name)
            .collect();

        assert_eq!(names, ["Deadlift", "Squat", "Bench Press"]);
    }

    #[tokio::test]
    async fn test_personal_bests_skip_orphans() {
        let f = setup().await;
        let dip = f.exercises.add("Dip", Some(Category::Chest)).await.unwrap();
        f.log(dip, day(1), 30.0).await;
        f.log(BENCH, day(1), 60.0).await;
        f.exercises.delete(ExerciseKey::Id(dip)).await.unwrap();

        let bests = f.stats.personal_bests(f.account).await.unwrap();

        assert_eq!(bests.len(), 1);
        assert!(bests.contains_key(&(
            ExerciseCategory::Tagged(Category::Chest),
            "Bench Press".to_string()
        )));
    }

    #[test]
    fn test_merge_personal_bests_collapses_same_key() {
        let legs = ExerciseCategory::Tagged(Category::Legs);
        let merged = merge_personal_bests([
            (legs, "Squat".to_string(), 80.0),
            (legs, "Squat".to_string(), 100.0),
            (legs, "Squat".to_string(), 95.0),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[&(legs, "Squat".to_string())], 100.0);
    }

    #[tokio::test]
    async fn test_daily_log_groups_in_category_order() {
        let f = setup().await;
        let plank = f.exercises.add("Plank", None).await.unwrap();
        f.log(PRESS, day(3), 40.0).await;
        f.log(plank, day(3), 0.0).await;
        f.log(SQUAT, day(3), 100.0).await;
        f.log(BENCH, day(3), 60.0).await;
        f.log(SQUAT, day(3), 105.0).await;
        f.log(DEADLIFT, day(4), 140.0).await;

        let groups = f.stats.daily_log(f.account, day(3)).await.unwrap();

        let categories: Vec<_> = groups.iter().map(|g| g.category).collect();
        assert_eq!(
            categories,
            [
                ExerciseCategory::Tagged(Category::Chest),
                ExerciseCategory::Tagged(Category::Legs),
                ExerciseCategory::Tagged(Category::Other),
                ExerciseCategory::Uncategorized,
            ]
        );
        let squats: Vec<_> = groups[1].entries.iter().map(|e| e.weight).collect();
        assert_eq!(squats, [100.0, 105.0]);
    }

    #[tokio::test]
    async fn test_daily_log_empty_day() {
        let f = setup().await;
        f.log(BENCH, day(1), 60.0).await;

        assert!(f.stats.daily_log(f.account, day(2)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_daily_log_puts_orphans_in_uncategorized() {
        let f = setup().await;
        let dip = f.exercises.add("Dip", Some(Category::Chest)).await.unwrap();
        f.log(dip, day(1), 30.0).await;
        f.exercises.delete(ExerciseKey::Id(dip)).await.unwrap();

        let groups = f.stats.daily_log(f.account, day(1)).await.unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].category, ExerciseCategory::Uncategorized);
        assert_eq!(groups[0].entries[0].exercise_name(), "(missing exercise)");
    }

    #[tokio::test]
    async fn test_trend_series_pivots_by_exercise() {
        let f = setup().await;
        f.log(BENCH, day(5), 65.0).await;
        f.log(BENCH, day(1), 60.0).await;
        f.log(BENCH, day(5), 75.0).await;
        f.log(SQUAT, day(2), 90.0).await;

        let series = f.stats.trend_series(f.account).await.unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(
            series["Bench Press"],
            [
                TrendPoint {
                    date: day(1),
                    weight: 60.0
                },
                TrendPoint {
                    date: day(5),
                    weight: 70.0
                },
            ]
        );
        assert_eq!(
            series["Squat"],
            [TrendPoint {
                date: day(2),
                weight: 90.0
            }]
        );
    }

    #[tokio::test]
    async fn test_training_days() {
        let f = setup().await;
        f.log(BENCH, day(1), 60.0).await;
        f.log(SQUAT, day(3), 90.0).await;
        f.log(BENCH, day(3), 62.5).await;

        let days = f.stats.training_days(f.account).await.unwrap();

        assert_eq!(days, [day(3), day(1)]);
    }

    #[tokio::test]
    async fn test_aggregates_over_category_less_catalog() {
        let pool = create_memory_pool().expect("Failed to create test database");
        pool.get()
            .unwrap()
            .execute_batch(
                "CREATE TABLE exercises (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL);
                 INSERT INTO exercises (name) VALUES ('Curl');",
            )
            .unwrap();
        let schema = ensure_schema(&pool).expect("Failed to create schema");
        let account = AccountRepository::new(pool.clone())
            .register("alice", "secret")
            .await
            .unwrap();
        let f = Fixture {
            stats: StatsRepository::new(pool.clone(), schema),
            records: SetRecordRepository::new(pool.clone(), schema),
            exercises: ExerciseRepository::new(pool, schema),
            account,
        };
        let curl = ExerciseId(1);
        f.log(curl, day(1), 15.0).await;
        f.log(curl, day(1), 20.0).await;

        let bests = f.stats.personal_bests(f.account).await.unwrap();
        let daily = f.stats.daily_log(f.account, day(1)).await.unwrap();

        assert_eq!(bests.len(), 1);
        assert_eq!(
            bests.get(&(ExerciseCategory::Uncategorized, "Curl".to_string())),
            Some(&20.0)
        );
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].category, ExerciseCategory::Uncategorized);
        assert_eq!(daily[0].entries.len(), 2);
    }
}
