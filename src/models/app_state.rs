use serde::{Deserialize, Serialize};

use super::board::Board;
use super::icon::{IconLibrary, FALLBACK_ICON_NAME};
use super::status_change_log::StatusChangeLog;
use super::task::{Task, TaskStatus};

pub const DEFAULT_WARNING_HOURS: f64 = 24.0;
pub const DEFAULT_CRITICAL_HOURS: f64 = 48.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultTaskSettings {
    pub warning_hours: f64,
    pub critical_hours: f64,
    pub default_status: TaskStatus,
    #[serde(default)]
    pub default_icon_name: Option<String>,
    #[serde(default)]
    pub default_icon_library: Option<IconLibrary>,
}

impl Default for DefaultTaskSettings {
    fn default() -> Self {
        DefaultTaskSettings {
            warning_hours: DEFAULT_WARNING_HOURS,
            critical_hours: DEFAULT_CRITICAL_HOURS,
            default_status: TaskStatus::Active,
            default_icon_name: Some(FALLBACK_ICON_NAME.to_string()),
            default_icon_library: Some(IconLibrary::Fa),
        }
    }
}

/// The aggregate root and the unit of persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub boards: Vec<Board>,
    pub tasks: Vec<Task>,
    pub status_change_logs: Vec<StatusChangeLog>,
    #[serde(default)]
    pub default_task_settings: DefaultTaskSettings,
}

impl AppState {
    pub fn board(&self, board_id: &str) -> Option<&Board> {
        self.boards.iter().find(|board| board.id == board_id)
    }

    pub fn task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == task_id)
    }

    pub fn tasks_for_board<'a>(&'a self, board_id: &'a str) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks.iter().filter(move |task| task.board_id == board_id)
    }

    /// Boards in display order; ties keep insertion order.
    pub fn ordered_boards(&self) -> Vec<&Board> {
        let mut boards: Vec<&Board> = self.boards.iter().collect();
        boards.sort_by_key(|board| board.order);
        boards
    }

    pub fn logs_for_task<'a>(&'a self, task_id: &'a str) -> impl Iterator<Item = &'a StatusChangeLog> + 'a {
        self.status_change_logs
            .iter()
            .filter(move |log| log.task_id == task_id)
    }
}
