use chrono::{DateTime, Utc};
use log::{error, info};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::StateStore;
use crate::models::app_state::AppState;
use crate::models::status_change_log::StatusChangeLog;
use crate::mutators::{self, StateError};
use crate::seed;

/// Owns the live [`AppState`] and writes every change through to the store.
///
/// Mutations are serialised behind one lock, and the save happens while the
/// lock is held so the store never sees writes out of order. A failed save is
/// logged and the in-memory state stays authoritative.
pub struct StateContainer {
    state: Mutex<AppState>,
    store: Arc<dyn StateStore>,
}

impl StateContainer {
    /// Loads the saved state, or starts from seed data when nothing usable is
    /// stored.
    pub async fn open(store: Arc<dyn StateStore>, now: DateTime<Utc>) -> Self {
        let state = match store.load().await {
            Ok(Some(state)) => {
                info!(
                    "Loaded saved state: {} boards, {} tasks, {} log entries",
                    state.boards.len(),
                    state.tasks.len(),
                    state.status_change_logs.len()
                );
                state
            }
            Ok(None) => {
                info!("No saved state found, starting from seed data");
                seed::initial_state(now)
            }
            Err(e) => {
                error!("Failed to load saved state, starting from seed data: {}", e);
                seed::initial_state(now)
            }
        };

        StateContainer {
            state: Mutex::new(state),
            store,
        }
    }

    pub async fn snapshot(&self) -> AppState {
        self.state.lock().await.clone()
    }

    pub async fn read<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&AppState) -> T,
    {
        let state = self.state.lock().await;
        f(&state)
    }

    /// Runs a mutator against the current state and, if it succeeds, installs
    /// and persists the result.
    pub async fn apply<T, F>(&self, mutation: F) -> Result<T, StateError>
    where
        F: FnOnce(&AppState) -> Result<(AppState, T), StateError>,
    {
        let mut state = self.state.lock().await;
        let (next, output) = mutation(&state)?;
        *state = next;
        self.persist(&state).await;
        Ok(output)
    }

    /// Like [`apply`](Self::apply) for transitions that cannot fail.
    pub async fn update<F>(&self, transition: F)
    where
        F: FnOnce(&AppState) -> AppState,
    {
        let mut state = self.state.lock().await;
        *state = transition(&state);
        self.persist(&state).await;
    }

    pub async fn replace(&self, next: AppState) {
        let mut state = self.state.lock().await;
        *state = next;
        self.persist(&state).await;
    }

    /// Promotes overdue tasks. Only saves when something changed.
    pub async fn escalate(&self, now: DateTime<Utc>) -> Vec<StatusChangeLog> {
        let mut state = self.state.lock().await;
        let (next, appended) = mutators::escalate_tasks(&state, now);
        if !appended.is_empty() {
            *state = next;
            self.persist(&state).await;
        }
        appended
    }

    async fn persist(&self, state: &AppState) {
        if let Err(e) = self.store.save(state).await {
            error!("Failed to save state: {}", e);
        }
    }
}
