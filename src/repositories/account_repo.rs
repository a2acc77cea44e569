use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rusqlite::{ErrorCode, OptionalExtension};

use crate::db::{with_conn, DbPool};
use crate::error::{AppError, Result};
use crate::models::{Account, AccountId, FromSqliteRow};

#[derive(Clone)]
pub struct AccountRepository {
    pool: DbPool,
}

impl AccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create an account. The secret is stored as a salted argon2 hash.
    pub async fn register(&self, username: &str, secret: &str) -> Result<AccountId> {
        if username.trim().is_empty() {
            return Err(AppError::MalformedInput("username is required".to_string()));
        }

        let secret_hash = hash_secret(secret)?;
        let username = username.to_string();

        with_conn(&self.pool, move |conn| {
            let inserted = conn.execute(
                "INSERT INTO accounts (username, secret) VALUES (?, ?)",
                rusqlite::params![username, secret_hash],
            );
            match inserted {
                Ok(_) => {
                    let id = AccountId(conn.last_insert_rowid());
                    tracing::info!(account_id = %id, "Registered account {}", username);
                    Ok(id)
                }
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    tracing::debug!("Username {} already taken", username);
                    Err(AppError::DuplicateUsername)
                }
                Err(e) => Err(e.into()),
            }
        })
        .await
    }

    /// Stateless credential check. Unknown usernames and wrong secrets are
    /// indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, secret: &str) -> Result<AccountId> {
        let account = self
            .find_by_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if verify_secret(secret, &account.secret_hash)? {
            Ok(account.id)
        } else {
            Err(AppError::InvalidCredentials)
        }
    }

    pub async fn find_by_id(&self, id: AccountId) -> Result<Option<Account>> {
        with_conn(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM accounts WHERE id = ?")?;
            let result = stmt.query_row([id], Account::from_row).optional()?;
            Ok(result)
        })
        .await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<Account>> {
        let username = username.to_string();
        with_conn(&self.pool, move |conn| {
            let mut stmt = conn.prepare("SELECT * FROM accounts WHERE username = ?")?;
            let result = stmt.query_row([&username], Account::from_row).optional()?;
            Ok(result)
        })
        .await
    }
}

fn hash_secret(secret: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|_| AppError::PasswordHash)?
        .to_string();
    Ok(hash)
}

fn verify_secret(secret: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AppError::PasswordHash)?;
    Ok(Argon2::default()
        .verify_password(secret.as_bytes(), &parsed_hash)
        .is_ok())
}
