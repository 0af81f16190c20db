use serde::{Deserialize, Serialize};

use crate::models::board::Board;
use crate::routes::tasks::tasks_models::TaskView;

#[derive(Deserialize)]
pub struct BoardListQuery {
    pub search: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    #[serde(flatten)]
    pub board: Board,
    pub task_count: usize,
    pub health_score: f64,
}

#[derive(Serialize)]
pub struct BoardListResponse {
    pub boards: Vec<BoardSummary>,
}

#[derive(Deserialize)]
pub struct CreateBoardRequest {
    pub name: String,
    pub order: Option<i64>,
}

#[derive(Deserialize)]
pub struct UpdateBoardRequest {
    pub name: Option<String>,
    pub order: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderBoardsRequest {
    pub board_ids: Vec<String>,
}

#[derive(Serialize)]
pub struct BoardResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub board: Option<Board>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardTasksResponse {
    pub board: Board,
    pub health_score: f64,
    pub tasks: Vec<TaskView>,
}
