use serde::Serialize;
use std::collections::BTreeMap;

use crate::analytics::{BoardStatistics, StatusChangeStatistics, TaskStatistics};
use crate::models::board::Board;
use crate::models::icon::{IconCategory, IconEntry};
use crate::models::task::TaskStatus;
use crate::routes::tasks::tasks_models::TaskView;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardBoard {
    #[serde(flatten)]
    pub board: Board,
    pub health_score: f64,
    pub status_counts: BTreeMap<TaskStatus, usize>,
    pub tasks: Vec<TaskView>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub system_health_score: f64,
    pub boards: Vec<DashboardBoard>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub tasks: TaskStatistics,
    pub boards: BoardStatistics,
    pub status_changes: StatusChangeStatistics,
}

#[derive(Serialize)]
pub struct IconCatalogResponse {
    pub categories: &'static [IconCategory],
    pub fallback: &'static IconEntry,
}
