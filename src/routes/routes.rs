use actix_web::web;

use super::{json_config, query_config};

use super::admin::admin_handlers;
use super::boards::boards_handlers;
use super::dashboard::dashboard_handlers;
use super::diagnostic::diagnostic_handlers;
use super::membership::membership_handlers;
use super::settings::settings_handlers;
use super::tasks::tasks_handlers;

pub fn api_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .app_data(query_config())
            .route("/test", web::post().to(diagnostic_handlers::test_probe))
            .route("/check-membership", web::post().to(membership_handlers::check_membership))
            .route("/dashboard", web::get().to(dashboard_handlers::dashboard))
            .route("/analytics", web::get().to(dashboard_handlers::analytics))
            .route("/icons", web::get().to(dashboard_handlers::icons))
            .route("/settings", web::get().to(settings_handlers::get_settings))
            .route("/settings", web::put().to(settings_handlers::update_settings))
            .route("/boards", web::get().to(boards_handlers::list_boards))
            .route("/boards", web::post().to(boards_handlers::create_board))
            .route("/boards/reorder", web::post().to(boards_handlers::reorder_boards))
            .route("/boards/{board_id}", web::put().to(boards_handlers::update_board))
            .route("/boards/{board_id}", web::delete().to(boards_handlers::delete_board))
            .route("/boards/{board_id}/tasks", web::get().to(boards_handlers::list_board_tasks))
            .route("/boards/{board_id}/tasks", web::post().to(boards_handlers::create_task))
            .route("/tasks", web::get().to(tasks_handlers::list_tasks))
            .route("/tasks/{task_id}", web::get().to(tasks_handlers::get_task))
            .route("/tasks/{task_id}", web::put().to(tasks_handlers::update_task))
            .route("/tasks/{task_id}", web::delete().to(tasks_handlers::delete_task))
            .route("/tasks/{task_id}/status", web::post().to(tasks_handlers::change_status))
            .route("/tasks/{task_id}/interact", web::post().to(tasks_handlers::interact))
            .route("/tasks/{task_id}/history", web::get().to(tasks_handlers::task_history))
    );
}

pub fn admin_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .app_data(json_config())
            .route("/reset-data", web::post().to(admin_handlers::reset_data))
            .route("/export", web::get().to(admin_handlers::export_state))
            .route("/import", web::post().to(admin_handlers::import_state))
    );
}
