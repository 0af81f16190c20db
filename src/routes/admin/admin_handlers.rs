use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use log::{error, info};
use serde_json::Value;

use super::admin_models::AdminDefaultResponse;
use crate::mutators;
use crate::store::container::StateContainer;
use crate::store::legacy;

pub async fn reset_data(container: web::Data<StateContainer>) -> impl Responder {
    container
        .update(|state| mutators::reset_state(state, Utc::now()))
        .await;

    info!("State reset to seed data");
    HttpResponse::Ok().json(AdminDefaultResponse {
        success: true,
        message: "All data has been reset successfully".into(),
    })
}

pub async fn export_state(container: web::Data<StateContainer>) -> impl Responder {
    HttpResponse::Ok().json(container.snapshot().await)
}

// Accepts the current blob shape as well as older nested exports.
pub async fn import_state(
    container: web::Data<StateContainer>,
    body: web::Json<Value>,
) -> impl Responder {
    match legacy::from_value(body.into_inner()) {
        Ok(state) => {
            info!(
                "Importing state: {} boards, {} tasks",
                state.boards.len(),
                state.tasks.len()
            );
            container.replace(state).await;
            HttpResponse::Ok().json(AdminDefaultResponse {
                success: true,
                message: "State imported successfully".into(),
            })
        }
        Err(e) => {
            error!("Failed to import state: {}", e);
            HttpResponse::BadRequest().json(AdminDefaultResponse {
                success: false,
                message: format!("Invalid state: {}", e),
            })
        }
    }
}
