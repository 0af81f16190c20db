use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

use super::{legacy, StateStore, StoreError, STORAGE_KEY};
use crate::models::app_state::AppState;

#[derive(Debug, FromRow)]
pub struct StoredBlob {
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Key/value table standing in for browser local storage: one JSON blob per key.
pub struct SqliteStore {
    pool: SqlitePool,
    key: String,
}

impl SqliteStore {
    pub async fn new(pool: SqlitePool) -> Result<Self, StoreError> {
        Self::with_key(pool, STORAGE_KEY).await
    }

    pub async fn with_key(pool: SqlitePool, key: &str) -> Result<Self, StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS local_storage (
                storage_key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await?;
        info!("State store ready under key {}", key);

        Ok(SqliteStore {
            pool,
            key: key.to_string(),
        })
    }

    pub async fn fetch_blob(&self) -> Result<Option<StoredBlob>, StoreError> {
        let blob = sqlx::query_as::<_, StoredBlob>(
            "SELECT value, updated_at FROM local_storage WHERE storage_key = ?",
        )
        .bind(self.key.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(blob)
    }

    /// Writes a raw blob without checking it parses; used to simulate what an
    /// older client left behind.
    pub async fn write_raw(&self, raw: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO local_storage (storage_key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(storage_key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(self.key.as_str())
        .bind(raw)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl StateStore for SqliteStore {
    async fn load(&self) -> Result<Option<AppState>, StoreError> {
        match self.fetch_blob().await? {
            Some(blob) => {
                info!("Found saved state written at {}", blob.updated_at);
                Ok(Some(legacy::parse_state(&blob.value)?))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, state: &AppState) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(state)?;
        self.write_raw(&serialized).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    async fn memory_pool() -> SqlitePool {
        // every connection to :memory: is its own database
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn empty_store_loads_nothing() {
        let store = SqliteStore::new(memory_pool().await).await.unwrap();
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_reproduces_state() {
        let store = SqliteStore::new(memory_pool().await).await.unwrap();
        let state = seed::initial_state(Utc::now());

        store.save(&state).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(state.clone()));

        // a second save overwrites the same key
        let mut trimmed = state.clone();
        trimmed.boards.truncate(1);
        store.save(&trimmed).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(trimmed));
    }

    #[tokio::test]
    async fn keys_are_isolated() {
        let pool = memory_pool().await;
        let first = SqliteStore::with_key(pool.clone(), "first").await.unwrap();
        let second = SqliteStore::with_key(pool, "second").await.unwrap();

        first.save(&seed::initial_state(Utc::now())).await.unwrap();
        assert!(second.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn corrupt_blob_is_reported() {
        let store = SqliteStore::new(memory_pool().await).await.unwrap();
        store.write_raw("{definitely not json").await.unwrap();
        assert!(matches!(store.load().await, Err(StoreError::Corrupt(_))));
    }
}
