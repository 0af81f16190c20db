use actix_web::{web, HttpResponse, Responder};
use log::{error, info};
use serde_json::Value;

use super::diagnostic_models::TestProbeResponse;

// Liveness probe: echoes whether `test` was exactly 1.
pub async fn test_probe(body: web::Bytes) -> impl Responder {
    let payload: Value = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(e) => {
            error!("Test API error: {}", e);
            return HttpResponse::InternalServerError().json(TestProbeResponse {
                success: false,
                message: "Internal server error".into(),
            });
        }
    };

    let is_one = payload.get("test").and_then(Value::as_f64) == Some(1.0);
    info!("Received test probe, test == 1: {}", is_one);
    if is_one {
        HttpResponse::Ok().json(TestProbeResponse {
            success: true,
            message: "hooray!".into(),
        })
    } else {
        HttpResponse::Ok().json(TestProbeResponse {
            success: false,
            message: "not 1 :(".into(),
        })
    }
}
