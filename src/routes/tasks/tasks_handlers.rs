use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use log::{info, warn};
use std::time::Duration;

use super::tasks_models::{
    ChangeStatusRequest, InteractRequest, InteractResponse, InteractionAction, InteractionKind,
    TaskHistoryResponse, TaskListQuery, TaskListResponse, TaskResponse, TaskView,
    UpdateTaskRequest,
};
use crate::models::task::{Task, TaskStatus};
use crate::mutators::{self, Interaction, InteractionOutcome, StateError, DEFAULT_USER_ID};
use crate::routes::{bad_request_response, state_error_response};
use crate::search::{filter_tasks, search_tasks, sort_tasks, SearchOptions, TaskFilter};
use crate::store::container::StateContainer;
use crate::validation::ValidationErrors;

fn parse_status_filter(raw: &str) -> Result<Vec<TaskStatus>, StateError> {
    let mut statuses = Vec::new();
    for part in raw.split(',').filter(|part| !part.trim().is_empty()) {
        match TaskStatus::parse(part) {
            Some(status) => statuses.push(status),
            None => {
                let mut errors = ValidationErrors::new();
                errors.add("status", format!("Unknown status: {}", part.trim()));
                return Err(errors.into());
            }
        }
    }
    Ok(statuses)
}

pub async fn list_tasks(
    container: web::Data<StateContainer>,
    query: web::Query<TaskListQuery>,
) -> impl Responder {
    let query = query.into_inner();
    let filter = TaskFilter {
        statuses: match query.status.as_deref().map(parse_status_filter) {
            Some(Ok(statuses)) => statuses,
            Some(Err(e)) => return state_error_response(e),
            None => Vec::new(),
        },
        created_from: query.created_from,
        created_to: query.created_to,
    };
    let term = query.search.unwrap_or_default();
    let now = Utc::now();

    let tasks = container
        .read(|state| {
            let on_board: Vec<Task> = state
                .tasks
                .iter()
                .filter(|task| query.board_id.as_ref().map_or(true, |id| task.board_id == *id))
                .cloned()
                .collect();
            let found = search_tasks(&on_board, &term, &SearchOptions::default());
            let mut found = filter_tasks(found, &filter);
            if let Some(key) = query.sort_by {
                sort_tasks(&mut found, key, query.ascending.unwrap_or(true));
            }
            found
                .into_iter()
                .map(|task| TaskView::new(task, now))
                .collect::<Vec<_>>()
        })
        .await;

    info!("Listing {} tasks", tasks.len());
    HttpResponse::Ok().json(TaskListResponse { tasks })
}

pub async fn get_task(
    container: web::Data<StateContainer>,
    path: web::Path<String>,
) -> impl Responder {
    let task_id = path.into_inner();
    let now = Utc::now();

    let found = container
        .read(|state| {
            state.task(&task_id).map(|task| TaskView::new(task, now))
        })
        .await;

    match found {
        Some(view) => HttpResponse::Ok().json(view),
        None => state_error_response(StateError::TaskNotFound(task_id)),
    }
}

pub async fn update_task(
    container: web::Data<StateContainer>,
    path: web::Path<String>,
    body: web::Json<UpdateTaskRequest>,
) -> impl Responder {
    let task_id = path.into_inner();
    let (patch, user_id) = body.into_inner().into_patch();
    let user_id = user_id.unwrap_or_else(|| DEFAULT_USER_ID.to_string());

    match container
        .apply(|state| mutators::update_task(state, &task_id, patch, Some(&user_id), Utc::now()))
        .await
    {
        Ok(change) => {
            info!("Updated task {}", task_id);
            HttpResponse::Ok().json(TaskResponse {
                success: true,
                message: "Task updated".into(),
                task: Some(change.task),
                log: change.log,
            })
        }
        Err(e) => state_error_response(e),
    }
}

pub async fn delete_task(
    container: web::Data<StateContainer>,
    path: web::Path<String>,
) -> impl Responder {
    let task_id = path.into_inner();

    match container
        .apply(|state| mutators::delete_task(state, &task_id))
        .await
    {
        Ok(task) => {
            info!("Deleted task {} ({})", task.name, task.id);
            HttpResponse::Ok().json(TaskResponse {
                success: true,
                message: "Task deleted".into(),
                task: Some(task),
                log: None,
            })
        }
        Err(e) => state_error_response(e),
    }
}

pub async fn change_status(
    container: web::Data<StateContainer>,
    path: web::Path<String>,
    body: web::Json<ChangeStatusRequest>,
) -> impl Responder {
    let task_id = path.into_inner();
    let body = body.into_inner();
    let user_id = body.user_id.unwrap_or_else(|| DEFAULT_USER_ID.to_string());

    match container
        .apply(|state| {
            mutators::change_task_status(state, &task_id, body.status, Some(&user_id), Utc::now())
        })
        .await
    {
        Ok(change) => {
            info!("Task {} is now {}", task_id, change.task.status);
            HttpResponse::Ok().json(TaskResponse {
                success: true,
                message: "Status changed".into(),
                task: Some(change.task),
                log: change.log,
            })
        }
        Err(e) => state_error_response(e),
    }
}

pub async fn interact(
    container: web::Data<StateContainer>,
    path: web::Path<String>,
    body: web::Bytes,
) -> impl Responder {
    let task_id = path.into_inner();
    let body: InteractRequest = if body.iter().all(u8::is_ascii_whitespace) {
        InteractRequest::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(body) => body,
            Err(e) => {
                info!("Rejected interaction body for task {}: {}", task_id, e);
                return bad_request_response(format!("Invalid request body: {}", e));
            }
        }
    };
    let interaction = match (body.kind, body.press_duration_ms) {
        (Some(InteractionKind::Tap), _) => Interaction::Tap,
        (Some(InteractionKind::LongPress), _) => Interaction::LongPress,
        (None, Some(ms)) => Interaction::from_press(Duration::from_millis(ms)),
        (None, None) => Interaction::Tap,
    };
    let user_id = body.user_id.unwrap_or_else(|| DEFAULT_USER_ID.to_string());

    match container
        .apply(|state| {
            mutators::interact_with_task(state, &task_id, interaction, Some(&user_id), Utc::now())
        })
        .await
    {
        Ok(InteractionOutcome::StatusChanged(change)) => {
            info!("Tap moved task {} to {}", task_id, change.task.status);
            HttpResponse::Ok().json(InteractResponse {
                success: true,
                action: InteractionAction::StatusChanged,
                task: change.task,
                log: change.log,
            })
        }
        Ok(InteractionOutcome::EditRequested(task)) => {
            info!("Long press on task {}, opening editor", task_id);
            HttpResponse::Ok().json(InteractResponse {
                success: true,
                action: InteractionAction::Edit,
                task,
                log: None,
            })
        }
        Err(e) => state_error_response(e),
    }
}

// Log entries outlive their task, so history stays readable after a delete.
pub async fn task_history(
    container: web::Data<StateContainer>,
    path: web::Path<String>,
) -> impl Responder {
    let task_id = path.into_inner();

    let (exists, logs) = container
        .read(|state| {
            let mut logs: Vec<_> = state.logs_for_task(&task_id).cloned().collect();
            logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            (state.task(&task_id).is_some(), logs)
        })
        .await;

    if !exists && logs.is_empty() {
        warn!("History requested for unknown task {}", task_id);
        return state_error_response(StateError::TaskNotFound(task_id));
    }
    HttpResponse::Ok().json(TaskHistoryResponse { task_id, logs })
}


#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    use super::*;
    use crate::routes::routes::api_configure;
    use crate::routes::testing::seeded_container;

    async fn first_task_id(container: &web::Data<StateContainer>) -> String {
        container.snapshot().await.tasks[0].id.clone()
    }

    #[actix_web::test]
    async fn four_taps_cycle_back_with_four_log_entries() {
        let container = seeded_container().await;
        let task_id = first_task_id(&container).await;
        let app = test::init_service(
            App::new().app_data(container.clone()).configure(api_configure),
        )
        .await;

        let mut seen = Vec::new();
        for _ in 0..4 {
            let req = test::TestRequest::post()
                .uri(&format!("/api/tasks/{task_id}/interact"))
                .set_json(json!({"kind": "tap"}))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["action"], "statusChanged");
            assert_eq!(body["log"]["userId"], "USER");
            seen.push(body["task"]["status"].as_str().unwrap().to_string());
        }
        assert_eq!(seen, vec!["warning", "critical", "completed", "active"]);

        let req = test::TestRequest::get()
            .uri(&format!("/api/tasks/{task_id}/history"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["logs"].as_array().unwrap().len(), 4);
    }

    #[actix_web::test]
    async fn long_press_requests_edit_without_changes() {
        let container = seeded_container().await;
        let task_id = first_task_id(&container).await;
        let before = container.snapshot().await;
        let app = test::init_service(
            App::new().app_data(container.clone()).configure(api_configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/tasks/{task_id}/interact"))
            .set_json(json!({"pressDurationMs": 650}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["action"], "edit");
        assert!(body.get("log").is_none());
        assert_eq!(container.snapshot().await, before);
    }

    #[actix_web::test]
    async fn empty_interaction_body_is_a_tap() {
        let container = seeded_container().await;
        let task_id = first_task_id(&container).await;
        let app = test::init_service(
            App::new().app_data(container.clone()).configure(api_configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/tasks/{task_id}/interact"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["action"], "statusChanged");
        assert_eq!(body["task"]["status"], "warning");

        let req = test::TestRequest::post()
            .uri(&format!("/api/tasks/{task_id}/interact"))
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
    }

    #[actix_web::test]
    async fn bad_query_reports_json_error() {
        let container = seeded_container().await;
        let app = test::init_service(App::new().app_data(container).configure(api_configure)).await;

        let req = test::TestRequest::get().uri("/api/tasks?sortBy=colour").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().starts_with("Invalid query"));
    }

    #[actix_web::test]
    async fn short_press_counts_as_tap() {
        let container = seeded_container().await;
        let task_id = first_task_id(&container).await;
        let app = test::init_service(
            App::new().app_data(container.clone()).configure(api_configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/tasks/{task_id}/interact"))
            .set_json(json!({"pressDurationMs": 120, "userId": "alice"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["action"], "statusChanged");
        assert_eq!(body["log"]["userId"], "alice");
    }

    #[actix_web::test]
    async fn explicit_status_change_and_same_status_noop() {
        let container = seeded_container().await;
        let task_id = first_task_id(&container).await;
        let app = test::init_service(
            App::new().app_data(container.clone()).configure(api_configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/tasks/{task_id}/status"))
            .set_json(json!({"status": "critical"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["task"]["status"], "critical");
        assert_eq!(body["log"]["oldStatus"], "active");

        let req = test::TestRequest::post()
            .uri(&format!("/api/tasks/{task_id}/status"))
            .set_json(json!({"status": "critical"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body.get("log").is_none());
        assert_eq!(container.snapshot().await.status_change_logs.len(), 1);
    }

    #[actix_web::test]
    async fn update_validates_thresholds() {
        let container = seeded_container().await;
        let task_id = first_task_id(&container).await;
        let app = test::init_service(
            App::new().app_data(container.clone()).configure(api_configure),
        )
        .await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/tasks/{task_id}"))
            .set_json(json!({"warningHours": 10, "criticalHours": 5}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::put()
            .uri(&format!("/api/tasks/{task_id}"))
            .set_json(json!({"title": "Floss daily", "description": "after dinner"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["task"]["name"], "Floss daily");
        assert_eq!(body["task"]["description"], "after dinner");
    }

    #[actix_web::test]
    async fn list_filters_and_sorts() {
        let container = seeded_container().await;
        let app = test::init_service(
            App::new().app_data(container.clone()).configure(api_configure),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/tasks?search=clean&sortBy=name&ascending=true")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let names: Vec<&str> = body["tasks"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Deep Cleaning", "Dental Cleaning", "Fridge Cleaning"]);
        assert_eq!(body["tasks"][0]["healthScore"], 100.0);
        assert!(body["tasks"][0]["icon"]["name"].is_string());

        let req = test::TestRequest::get().uri("/api/tasks?status=warning").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["tasks"].as_array().unwrap().is_empty());

        let req = test::TestRequest::get()
            .uri("/api/tasks?createdTo=2000-01-01T00:00:00Z")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["tasks"].as_array().unwrap().is_empty());

        let req = test::TestRequest::get().uri("/api/tasks?status=bogus").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn deleted_task_keeps_history() {
        let container = seeded_container().await;
        let task_id = first_task_id(&container).await;
        let app = test::init_service(
            App::new().app_data(container.clone()).configure(api_configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri(&format!("/api/tasks/{task_id}/interact"))
            .set_json(json!({}))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/tasks/{task_id}"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/api/tasks/{task_id}"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get()
            .uri(&format!("/api/tasks/{task_id}/history"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["logs"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::get().uri("/api/tasks/nope/history").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
