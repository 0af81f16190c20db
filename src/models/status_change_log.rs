use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::task::TaskStatus;

/// One entry of the append-only audit trail. A missing `user_id` marks a
/// change made by the escalation ticker rather than a person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeLog {
    pub id: String,
    pub task_id: String,
    pub task_name: String,
    pub old_status: TaskStatus,
    pub new_status: TaskStatus,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}
