use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{legacy, StateStore, StoreError};
use crate::models::app_state::AppState;

/// Keeps the serialized blob in memory. Goes through the same JSON path as the
/// SQLite store so round-trip behaviour matches.
#[derive(Default)]
pub struct MemoryStore {
    blob: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(raw: impl Into<String>) -> Self {
        MemoryStore {
            blob: Mutex::new(Some(raw.into())),
        }
    }

    pub async fn raw(&self) -> Option<String> {
        self.blob.lock().await.clone()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self) -> Result<Option<AppState>, StoreError> {
        let blob = self.blob.lock().await;
        match blob.as_deref() {
            Some(raw) => Ok(Some(legacy::parse_state(raw)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, state: &AppState) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(state)?;
        *self.blob.lock().await = Some(serialized);
        Ok(())
    }
}
