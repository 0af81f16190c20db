use actix_web::error::InternalError;
use actix_web::{web, HttpResponse};
use log::{error, info};
use serde::Serialize;

use crate::mutators::StateError;
use crate::validation::ValidationErrors;

pub mod routes;

pub mod admin {
    pub mod admin_handlers;
    pub mod admin_models;
}

pub mod boards {
    pub mod boards_handlers;
    pub mod boards_models;
}

pub mod dashboard {
    pub mod dashboard_handlers;
    pub mod dashboard_models;
}

pub mod diagnostic {
    pub mod diagnostic_handlers;
    pub mod diagnostic_models;
}

pub mod membership {
    pub mod membership_handlers;
    pub mod membership_models;
}

pub mod settings {
    pub mod settings_handlers;
}

pub mod tasks {
    pub mod tasks_handlers;
    pub mod tasks_models;
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<ValidationErrors>,
}

// Shared mapping so every area reports missing ids and bad input the same way.
pub fn state_error_response(e: StateError) -> HttpResponse {
    match e {
        StateError::BoardNotFound(_) | StateError::TaskNotFound(_) => {
            info!("{}", e);
            HttpResponse::NotFound().json(ErrorResponse {
                success: false,
                message: e.to_string(),
                errors: None,
            })
        }
        StateError::Invalid(errors) => {
            info!("Rejected invalid input: {}", errors);
            HttpResponse::BadRequest().json(ErrorResponse {
                success: false,
                message: "Invalid input".into(),
                errors: Some(errors),
            })
        }
    }
}

pub fn bad_request_response(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        success: false,
        message: message.into(),
        errors: None,
    })
}

// Extractor failures report in the same JSON shape as handler-level errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        info!("Rejected request body: {}", err);
        let response = bad_request_response(format!("Invalid request body: {}", err));
        InternalError::from_response(err, response).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        info!("Rejected query string: {}", err);
        let response = bad_request_response(format!("Invalid query: {}", err));
        InternalError::from_response(err, response).into()
    })
}

pub fn internal_error_response(context: &str, e: impl std::fmt::Display) -> HttpResponse {
    error!("{}: {}", context, e);
    HttpResponse::InternalServerError().json(ErrorResponse {
        success: false,
        message: context.to_string(),
        errors: None,
    })
}
