//! Telegram Bot API client used by the membership check.
//!
//! One request per check, no retry and no timeout beyond what the HTTP client
//! applies by default.

use log::{error, info};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Member statuses Telegram reports for users who are in the chat.
pub const MEMBER_STATUSES: [&str; 4] = ["creator", "administrator", "member", "restricted"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ChatId {
    Numeric(i64),
    Username(String),
}

impl ChatId {
    /// Supergroup/channel ids (`-100…`) stay numeric; anything else is treated
    /// as a public username and gets a leading `@`.
    pub fn normalize(channel: &str) -> ChatId {
        let channel = channel.trim();
        if channel.starts_with("-100") {
            if let Ok(id) = channel.parse::<i64>() {
                return ChatId::Numeric(id);
            }
        }
        if channel.starts_with('@') {
            ChatId::Username(channel.to_string())
        } else {
            ChatId::Username(format!("@{channel}"))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MembershipError {
    #[error("Telegram bot token is missing")]
    MissingToken,
    #[error("Invalid response from Telegram API")]
    InvalidResponse,
    #[error("{message}")]
    Api { status: StatusCode, message: String },
    #[error("Failed to check membership due to an internal error")]
    Transport(#[from] reqwest::Error),
}

impl MembershipError {
    pub fn status(&self) -> StatusCode {
        match self {
            MembershipError::Api { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct GetChatMemberRequest<'a> {
    chat_id: &'a ChatId,
    user_id: i64,
}

#[derive(Debug, Deserialize)]
struct ChatMember {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    result: Option<ChatMember>,
    #[serde(default)]
    error_code: Option<u16>,
    #[serde(default)]
    description: Option<String>,
}

/// Turns Telegram's error descriptions into something a user can act on.
pub fn describe_api_error(error_code: Option<u16>, description: Option<&str>) -> String {
    let text = description.unwrap_or("");
    match error_code {
        Some(400) if text.contains("user not found") => "User not found.".to_string(),
        Some(400) if text.contains("chat not found") => {
            "Channel/Group not found or bot is not an administrator.".to_string()
        }
        Some(403) if text.contains("bot was kicked") => {
            "Bot was kicked from the channel/group.".to_string()
        }
        Some(403) if text.contains("bot is not a member") => {
            "Bot must be an administrator in the channel/group.".to_string()
        }
        _ => format!(
            "Telegram API error: {}",
            description.unwrap_or("Unknown error")
        ),
    }
}

#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: Option<String>,
}

impl TelegramClient {
    pub fn new(api_base: impl Into<String>, bot_token: Option<String>) -> Self {
        TelegramClient {
            http: reqwest::Client::new(),
            api_base: api_base.into(),
            bot_token,
        }
    }

    pub fn has_token(&self) -> bool {
        self.bot_token.is_some()
    }

    pub async fn is_member(&self, chat_id: &ChatId, user_id: i64) -> Result<bool, MembershipError> {
        let token = self.bot_token.as_deref().ok_or(MembershipError::MissingToken)?;
        let url = format!("{}/bot{}/getChatMember", self.api_base, token);
        info!("Calling getChatMember for chat {:?}, user {}", chat_id, user_id);

        let response = self
            .http
            .post(&url)
            .json(&GetChatMemberRequest { chat_id, user_id })
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        info!("Telegram API responded with status {}", status);

        let data: ApiResponse = match serde_json::from_str(&body) {
            Ok(data) => data,
            Err(e) => {
                error!("Failed to parse Telegram API response: {}", e);
                return Err(MembershipError::InvalidResponse);
            }
        };

        if !status.is_success() || !data.ok {
            error!(
                "Telegram API error {:?}: {:?}",
                data.error_code, data.description
            );
            return Err(MembershipError::Api {
                status,
                message: describe_api_error(data.error_code, data.description.as_deref()),
            });
        }

        let member_status = data.result.and_then(|member| member.status);
        info!("ChatMember status: {:?}", member_status);
        Ok(member_status.is_some_and(|s| MEMBER_STATUSES.contains(&s.as_str())))
    }
}
