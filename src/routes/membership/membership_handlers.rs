use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use log::{error, info};

use super::membership_models::{
    CheckMembershipRequest, CheckMembershipResponse, MembershipErrorResponse, RequestProblem,
};
use crate::telegram::{MembershipError, TelegramClient};

fn membership_error(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(MembershipErrorResponse {
        error: message.into(),
        is_member: false,
    })
}

pub async fn check_membership(
    client: web::Data<TelegramClient>,
    body: web::Bytes,
) -> impl Responder {
    if !client.has_token() {
        error!("Bot token is missing from environment variables");
        return membership_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            MembershipError::MissingToken.to_string(),
        );
    }

    let request: CheckMembershipRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            error!("Failed to parse request body: {}", e);
            return membership_error(StatusCode::BAD_REQUEST, "Invalid JSON body");
        }
    };

    let (telegram_id, chat_id) = match request.validate() {
        Ok(fields) => fields,
        Err(RequestProblem::Missing) => {
            info!("Membership check with missing fields");
            return membership_error(
                StatusCode::BAD_REQUEST,
                "Invalid request: missing telegramId or channelUsername",
            );
        }
        Err(RequestProblem::NotNumeric) => {
            info!("Membership check with non-numeric telegramId");
            return membership_error(
                StatusCode::BAD_REQUEST,
                "Invalid request: telegramId must be a number",
            );
        }
    };

    info!("Checking membership of user {} in {:?}", telegram_id, chat_id);

    match client.is_member(&chat_id, telegram_id).await {
        Ok(is_member) => {
            info!("Membership result for user {}: {}", telegram_id, is_member);
            HttpResponse::Ok().json(CheckMembershipResponse { is_member })
        }
        Err(e) => {
            error!("Membership check failed: {}", e);
            let status = StatusCode::from_u16(e.status().as_u16())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            membership_error(status, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN: &str = "999:token";

    async fn call(client: TelegramClient, body: &str) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(client))
                .route("/api/check-membership", web::post().to(check_membership)),
        )
        .await;
        let req = test::TestRequest::post()
            .uri("/api/check-membership")
            .insert_header(("content-type", "application/json"))
            .set_payload(body.to_string())
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        (status, test::read_body_json(resp).await)
    }

    async fn telegram_answering(status: u16, body: Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(format!("/bot{TOKEN}/getChatMember")))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;
        server
    }

    #[actix_web::test]
    async fn member_is_reported() {
        let server = telegram_answering(200, json!({"ok": true, "result": {"status": "member"}})).await;
        let client = TelegramClient::new(server.uri(), Some(TOKEN.into()));
        let (status, body) = call(client, r#"{"telegramId": 42, "channelUsername": "news"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"isMember": true}));
    }

    #[actix_web::test]
    async fn left_user_is_not_a_member() {
        let server = telegram_answering(200, json!({"ok": true, "result": {"status": "left"}})).await;
        let client = TelegramClient::new(server.uri(), Some(TOKEN.into()));
        let (status, body) = call(client, r#"{"telegramId": "42", "channelUsername": "@news"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"isMember": false}));
    }

    #[actix_web::test]
    async fn missing_token_is_a_server_error() {
        let client = TelegramClient::new("http://127.0.0.1:9", None);
        let (status, body) = call(client, r#"{"telegramId": 42, "channelUsername": "news"}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Telegram bot token is missing");
        assert_eq!(body["isMember"], false);
    }

    #[actix_web::test]
    async fn bad_input_is_rejected() {
        let client = TelegramClient::new("http://127.0.0.1:9", Some(TOKEN.into()));

        let (status, body) = call(client.clone(), "{oops").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid JSON body");

        let (status, body) = call(client.clone(), r#"{"channelUsername": "news"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request: missing telegramId or channelUsername");

        let (status, body) = call(client, r#"{"telegramId": "abc", "channelUsername": "news"}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid request: telegramId must be a number");
    }

    #[actix_web::test]
    async fn upstream_status_is_passed_through() {
        let server = telegram_answering(
            403,
            json!({"ok": false, "error_code": 403, "description": "Forbidden: bot was kicked from the channel chat"}),
        )
        .await;
        let client = TelegramClient::new(server.uri(), Some(TOKEN.into()));
        let (status, body) = call(client, r#"{"telegramId": 42, "channelUsername": "news"}"#).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "Bot was kicked from the channel/group.");
        assert_eq!(body["isMember"], false);
    }
}
