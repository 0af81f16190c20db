use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::health::task_health_score;
use crate::models::icon::{self, IconEntry, IconLibrary};
use crate::models::status_change_log::StatusChangeLog;
use crate::models::task::{Task, TaskStatus};
use crate::mutators::{NewTask, TaskPatch};
use crate::search::TaskSortKey;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub health_score: f64,
    /// The icon to render; unknown names resolve to the fallback.
    pub icon: &'static IconEntry,
}

impl TaskView {
    pub fn new(task: &Task, now: DateTime<Utc>) -> Self {
        TaskView {
            health_score: task_health_score(task, now),
            icon: icon::resolve(task.icon_library, &task.icon_name),
            task: task.clone(),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListQuery {
    pub board_id: Option<String>,
    /// Comma-separated statuses, e.g. `warning,critical`.
    pub status: Option<String>,
    pub search: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub sort_by: Option<TaskSortKey>,
    pub ascending: Option<bool>,
}

#[derive(Serialize)]
pub struct TaskListResponse {
    pub tasks: Vec<TaskView>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    #[serde(alias = "title")]
    pub name: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub warning_hours: Option<f64>,
    pub critical_hours: Option<f64>,
    pub icon_library: Option<IconLibrary>,
    pub icon_name: Option<String>,
}

impl From<CreateTaskRequest> for NewTask {
    fn from(req: CreateTaskRequest) -> Self {
        NewTask {
            name: req.name,
            description: req.description,
            status: req.status,
            warning_hours: req.warning_hours,
            critical_hours: req.critical_hours,
            icon_library: req.icon_library,
            icon_name: req.icon_name,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub board_id: Option<String>,
    #[serde(alias = "title")]
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub warning_hours: Option<f64>,
    pub critical_hours: Option<f64>,
    pub icon_library: Option<IconLibrary>,
    pub icon_name: Option<String>,
    pub user_id: Option<String>,
}

impl UpdateTaskRequest {
    pub fn into_patch(self) -> (TaskPatch, Option<String>) {
        (
            TaskPatch {
                board_id: self.board_id,
                name: self.name,
                description: self.description,
                status: self.status,
                warning_hours: self.warning_hours,
                critical_hours: self.critical_hours,
                icon_library: self.icon_library,
                icon_name: self.icon_name,
            },
            self.user_id,
        )
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeStatusRequest {
    pub status: TaskStatus,
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InteractionKind {
    Tap,
    LongPress,
}

/// Every field is optional; an empty body is a plain tap.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractRequest {
    pub kind: Option<InteractionKind>,
    pub press_duration_ms: Option<u64>,
    pub user_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<Task>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<StatusChangeLog>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub enum InteractionAction {
    StatusChanged,
    Edit,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractResponse {
    pub success: bool,
    pub action: InteractionAction,
    pub task: Task,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<StatusChangeLog>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskHistoryResponse {
    pub task_id: String,
    pub logs: Vec<StatusChangeLog>,
}
