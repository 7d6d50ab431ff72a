//! Durable key-value storage for client state.
//!
//! SQLite holds the persisted session record and token so they survive
//! restarts until an explicit logout or a new login.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;

use crate::errors::ClientError;

/// Key holding the persisted session record (JSON).
pub const SESSION_KEY: &str = "russian_town_user";
/// Key holding the persisted auth token.
pub const TOKEN_KEY: &str = "russian_town_token";

/// Key-value store backed by a SQLite file.
#[derive(Clone)]
pub struct KeyValueStore {
    pool: SqlitePool,
}

impl KeyValueStore {
    /// Open the store at `path`, creating the file and table if missing.
    pub async fn open(path: &Path) -> Result<Self, ClientError> {
        let pool = init_database(path).await?;
        Ok(Self { pool })
    }

    /// Read a value.
    pub async fn get(&self, key: &str) -> Result<Option<String>, ClientError> {
        let row = sqlx::query("SELECT value FROM kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get::<String, _>("value")))
    }

    /// Write all pairs in one transaction; either every pair lands or none does.
    pub async fn put_many(&self, pairs: &[(&str, &str)]) -> Result<(), ClientError> {
        let mut tx = self.pool.begin().await?;
        for (key, value) in pairs {
            sqlx::query(
                "INSERT INTO kv (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            )
            .bind(key)
            .bind(value)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Remove all keys in one transaction. Missing keys are not an error.
    pub async fn remove_many(&self, keys: &[&str]) -> Result<(), ClientError> {
        let mut tx = self.pool.begin().await?;
        for key in keys {
            sqlx::query("DELETE FROM kv WHERE key = ?")
                .bind(key)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Close the pool, flushing the file. Used when handing the file to a
    /// fresh store instance.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Initialize the database connection pool and run migrations.
async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(2)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_put_get_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = KeyValueStore::open(&temp_dir.path().join("kv.sqlite"))
            .await
            .unwrap();

        assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);

        store
            .put_many(&[(SESSION_KEY, "{}"), (TOKEN_KEY, "tok-1")])
            .await
            .unwrap();
        assert_eq!(store.get(TOKEN_KEY).await.unwrap().as_deref(), Some("tok-1"));

        store.put_many(&[(TOKEN_KEY, "tok-2")]).await.unwrap();
        assert_eq!(store.get(TOKEN_KEY).await.unwrap().as_deref(), Some("tok-2"));

        store.remove_many(&[SESSION_KEY, TOKEN_KEY]).await.unwrap();
        store.remove_many(&[SESSION_KEY, TOKEN_KEY]).await.unwrap();
        assert_eq!(store.get(SESSION_KEY).await.unwrap(), None);
        assert_eq!(store.get(TOKEN_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("kv.sqlite");

        let store = KeyValueStore::open(&path).await.unwrap();
        store.put_many(&[(TOKEN_KEY, "tok-1")]).await.unwrap();
        store.close().await;

        let reopened = KeyValueStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get(TOKEN_KEY).await.unwrap().as_deref(),
            Some("tok-1")
        );
    }
}
