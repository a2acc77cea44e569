use rusqlite::Row;
use serde::Deserialize;

use super::{AccountId, FromSqliteRow};

#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub username: String,
    /// argon2 PHC string, never the raw secret
    pub secret_hash: String,
}

impl FromSqliteRow for Account {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
            secret_hash: row.get("secret")?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAccount {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}
