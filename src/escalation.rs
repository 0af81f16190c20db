use chrono::{DateTime, Utc};
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::store::container::StateContainer;

/// One pass of the ticker. Returns how many tasks were promoted.
pub async fn tick(container: &StateContainer, now: DateTime<Utc>) -> usize {
    let promoted = container.escalate(now).await;
    for log in &promoted {
        warn!(
            "Task {} ({}) escalated from {} to {}",
            log.task_name, log.task_id, log.old_status, log.new_status
        );
    }
    promoted.len()
}

/// Re-evaluates every task once per `every` for the life of the process.
pub fn spawn(container: Arc<StateContainer>, every: Duration) -> JoinHandle<()> {
    info!("Escalation ticker running every {:?}", every);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            tick(&container, Utc::now()).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory_store::MemoryStore;
    use chrono::Duration as ChronoDuration;

    #[tokio::test]
    async fn tick_promotes_overdue_tasks_once() {
        let start = Utc::now();
        let container = StateContainer::open(Arc::new(MemoryStore::new()), start).await;

        assert_eq!(tick(&container, start).await, 0);

        // Stretching/Yoga warns after 12h, Skin Care/Deep Cleaning/Laundry after 24h
        let later = start + ChronoDuration::hours(13);
        assert_eq!(tick(&container, later).await, 1);
        assert_eq!(tick(&container, later).await, 0);
    }
}
