use actix_web::{web, HttpResponse, Responder};
use log::info;

use crate::models::app_state::DefaultTaskSettings;
use crate::mutators;
use crate::routes::state_error_response;
use crate::store::container::StateContainer;

pub async fn get_settings(container: web::Data<StateContainer>) -> impl Responder {
    let settings = container
        .read(|state| state.default_task_settings.clone())
        .await;
    HttpResponse::Ok().json(settings)
}

pub async fn update_settings(
    container: web::Data<StateContainer>,
    body: web::Json<DefaultTaskSettings>,
) -> impl Responder {
    let settings = body.into_inner();

    match container
        .apply(|state| {
            let next = mutators::update_default_settings(state, settings)?;
            let saved = next.default_task_settings.clone();
            Ok((next, saved))
        })
        .await
    {
        Ok(saved) => {
            info!(
                "Default thresholds set to {}h / {}h",
                saved.warning_hours, saved.critical_hours
            );
            HttpResponse::Ok().json(saved)
        }
        Err(e) => state_error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    use crate::routes::routes::api_configure;
    use crate::routes::testing::seeded_container;

    #[actix_web::test]
    async fn defaults_apply_to_new_tasks() {
        let container = seeded_container().await;
        let board_id = container.snapshot().await.boards[0].id.clone();
        let app = test::init_service(
            App::new().app_data(container.clone()).configure(api_configure),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/settings").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["warningHours"], 24.0);
        assert_eq!(body["criticalHours"], 48.0);

        let req = test::TestRequest::put()
            .uri("/api/settings")
            .set_json(json!({
                "warningHours": 6,
                "criticalHours": 18,
                "defaultStatus": "warning",
                "defaultIconName": "FaBroom"
            }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri(&format!("/api/boards/{board_id}/tasks"))
            .set_json(json!({"name": "Sweep porch"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["task"]["warningHours"], 6.0);
        assert_eq!(body["task"]["criticalHours"], 18.0);
        assert_eq!(body["task"]["status"], "warning");
        assert_eq!(body["task"]["iconName"], "FaBroom");
    }

    #[actix_web::test]
    async fn inverted_thresholds_are_rejected() {
        let container = seeded_container().await;
        let app = test::init_service(
            App::new().app_data(container.clone()).configure(api_configure),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/api/settings")
            .set_json(json!({"warningHours": 48, "criticalHours": 24, "defaultStatus": "active"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(container.snapshot().await.default_task_settings.warning_hours, 24.0);
    }
}
