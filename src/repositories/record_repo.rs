use crate::db::{with_conn, DbPool};
use crate::error::{AppError, Result};
use crate::models::{
    AccountId, FromSqliteRow, HistoryEntry, HistoryOrder, NewSetRecord, SetRecordId,
};
use crate::schema::SchemaInfo;

/// Sets joined to their exercises for one account. The join is a LEFT JOIN so
/// sets whose exercise was deleted still come back.
pub(crate) fn history_sql(schema: &SchemaInfo, filter: &str, order: HistoryOrder) -> String {
    format!(
        "SELECT s.id, s.date, s.exercise_id, e.name AS exercise_name,
                {} AS exercise_category, s.weight, s.reps, s.set_count
         FROM sets s
         LEFT JOIN exercises e ON s.exercise_id = e.id
         WHERE s.account_id = ? {}
         ORDER BY {}",
        schema.category_expr(),
        filter,
        order.sql()
    )
}

#[derive(Clone)]
pub struct SetRecordRepository {
    pool: DbPool,
    schema: SchemaInfo,
}

impl SetRecordRepository {
    pub fn new(pool: DbPool, schema: SchemaInfo) -> Self {
        Self { pool, schema }
    }

    /// Log one entry. The exercise and the account must exist at write time.
    pub async fn add(&self, account_id: AccountId, record: NewSetRecord) -> Result<SetRecordId> {
        record.check_numeric()?;

        with_conn(&self.pool, move |conn| {
            let tx = conn.transaction()?;

            let account_exists: bool = tx.query_row(
                "SELECT COUNT(*) > 0 FROM accounts WHERE id = ?",
                [account_id],
                |row| row.get(0),
            )?;
            if !account_exists {
                return Err(AppError::NotFound(format!("account {account_id}")));
            }

            let exercise_exists: bool = tx.query_row(
                "SELECT COUNT(*) > 0 FROM exercises WHERE id = ?",
                [record.exercise_id],
                |row| row.get(0),
            )?;
            if !exercise_exists {
                return Err(AppError::NotFound(format!(
                    "exercise {}",
                    record.exercise_id
                )));
            }

            tx.execute(
                "INSERT INTO sets (account_id, date, exercise_id, weight, reps, set_count)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    account_id,
                    record.date,
                    record.exercise_id,
                    record.weight,
                    record.reps,
                    record.set_count
                ],
            )?;
            let id = SetRecordId(tx.last_insert_rowid());
            tx.commit()?;

            tracing::debug!(record_id = %id, account_id = %account_id, "Logged set");
            Ok(id)
        })
        .await
    }

    /// Delete one of the account's records. Deleting an id that does not
    /// exist (or belongs to someone else) is `NotFound`.
    pub async fn delete(&self, account_id: AccountId, id: SetRecordId) -> Result<()> {
        with_conn(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM sets WHERE id = ? AND account_id = ?",
                rusqlite::params![id, account_id],
            )?;
            if rows == 0 {
                return Err(AppError::NotFound(format!("set record {id}")));
            }
            Ok(())
        })
        .await
    }

    pub async fn history(
        &self,
        account_id: AccountId,
        order: HistoryOrder,
    ) -> Result<Vec<HistoryEntry>> {
        let sql = history_sql(&self.schema, "", order);
        with_conn(&self.pool, move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let entries = stmt
                .query_map([account_id], HistoryEntry::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(entries)
        })
        .await
    }
}
