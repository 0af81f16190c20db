use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use log::info;

use super::dashboard_models::{
    AnalyticsResponse, DashboardBoard, DashboardResponse, IconCatalogResponse,
};
use crate::analytics::{board_statistics, status_change_statistics, task_statistics};
use crate::health::{board_health_score, system_health_score};
use crate::models::icon::{CATALOG, FALLBACK_ICON};
use crate::models::task::Task;
use crate::routes::tasks::tasks_models::TaskView;
use crate::search::group_tasks_by_status;
use crate::store::container::StateContainer;

// Scores are derived at request time; nothing here is stored.
pub async fn dashboard(container: web::Data<StateContainer>) -> impl Responder {
    let now = Utc::now();

    let response = container
        .read(|state| DashboardResponse {
            system_health_score: system_health_score(&state.tasks, now),
            boards: state
                .ordered_boards()
                .into_iter()
                .map(|board| {
                    let tasks: Vec<Task> = state.tasks_for_board(&board.id).cloned().collect();
                    DashboardBoard {
                        board: board.clone(),
                        health_score: board_health_score(&tasks, now),
                        status_counts: group_tasks_by_status(&tasks)
                            .into_iter()
                            .map(|(status, group)| (status, group.len()))
                            .collect(),
                        tasks: tasks.iter().map(|task| TaskView::new(task, now)).collect(),
                    }
                })
                .collect(),
        })
        .await;

    info!("System health score: {:.1}", response.system_health_score);
    HttpResponse::Ok().json(response)
}

pub async fn analytics(container: web::Data<StateContainer>) -> impl Responder {
    let response = container
        .read(|state| AnalyticsResponse {
            tasks: task_statistics(&state.tasks),
            boards: board_statistics(&state.boards, &state.tasks),
            status_changes: status_change_statistics(&state.status_change_logs, &state.tasks),
        })
        .await;

    HttpResponse::Ok().json(response)
}

pub async fn icons() -> impl Responder {
    HttpResponse::Ok().json(IconCatalogResponse {
        categories: CATALOG,
        fallback: &FALLBACK_ICON,
    })
}
