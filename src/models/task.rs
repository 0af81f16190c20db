use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::icon::{IconLibrary, FALLBACK_ICON_NAME};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    // Older clients called the resting state "inactive".
    #[serde(alias = "inactive")]
    Active,
    Warning,
    Critical,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Active,
        TaskStatus::Warning,
        TaskStatus::Critical,
        TaskStatus::Completed,
    ];

    /// Status reached by one short interaction. The cycle wraps from
    /// `Completed` back to `Active`.
    pub fn next(self) -> TaskStatus {
        match self {
            TaskStatus::Active => TaskStatus::Warning,
            TaskStatus::Warning => TaskStatus::Critical,
            TaskStatus::Critical => TaskStatus::Completed,
            TaskStatus::Completed => TaskStatus::Active,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Active => "active",
            TaskStatus::Warning => "warning",
            TaskStatus::Critical => "critical",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn parse(value: &str) -> Option<TaskStatus> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" | "inactive" => Some(TaskStatus::Active),
            "warning" => Some(TaskStatus::Warning),
            "critical" => Some(TaskStatus::Critical),
            "completed" => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn fallback_icon_name() -> String {
    FALLBACK_ICON_NAME.to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub board_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    pub warning_hours: f64,
    pub critical_hours: f64,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub last_interaction: DateTime<Utc>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub last_status_change: DateTime<Utc>,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub icon_library: IconLibrary,
    #[serde(default = "fallback_icon_name")]
    pub icon_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_steps_complete_the_cycle() {
        for start in TaskStatus::ALL {
            let mut status = start;
            for _ in 0..4 {
                status = status.next();
            }
            assert_eq!(status, start);
        }
        assert_eq!(TaskStatus::Active.next(), TaskStatus::Warning);
        assert_eq!(TaskStatus::Critical.next(), TaskStatus::Completed);
    }

    #[test]
    fn inactive_reads_as_active() {
        let status: TaskStatus = serde_json::from_str("\"inactive\"").unwrap();
        assert_eq!(status, TaskStatus::Active);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"active\"");
        assert_eq!(TaskStatus::parse(" Warning "), Some(TaskStatus::Warning));
        assert_eq!(TaskStatus::parse("done"), None);
    }
}
