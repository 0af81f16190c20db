// src/store/mod.rs

pub mod container;
pub mod legacy;
#[cfg(test)]
pub mod memory_store;
pub mod sqlite_store;

use async_trait::async_trait;

use crate::models::app_state::AppState;

/// Fixed key the whole state blob lives under.
pub const STORAGE_KEY: &str = "car_maintenance_dash_state";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored state is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Persistence port for the state container.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<AppState>, StoreError>;

    async fn save(&self, state: &AppState) -> Result<(), StoreError>;
}
