use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::telegram::ChatId;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckMembershipRequest {
    #[serde(default)]
    pub telegram_id: Value,
    #[serde(default)]
    pub channel_username: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckMembershipResponse {
    pub is_member: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipErrorResponse {
    pub error: String,
    pub is_member: bool,
}

#[derive(Debug, PartialEq, Eq)]
pub enum RequestProblem {
    Missing,
    NotNumeric,
}

// Mirrors JS truthiness: null, "", 0 and false all count as absent.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

// Leading-digits parse: surrounding junk after the number is ignored, so
// "42abc" reads as 42.
fn parse_leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let unsigned = text.trim_start_matches(['+', '-']);
    let sign_len = text.len() - unsigned.len();
    if sign_len > 1 {
        return None;
    }
    let digits_len = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits_len == 0 {
        return None;
    }
    text[..sign_len + digits_len].parse().ok()
}

fn integral(n: &serde_json::Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

impl CheckMembershipRequest {
    pub fn validate(&self) -> Result<(i64, ChatId), RequestProblem> {
        if is_blank(&self.telegram_id) || is_blank(&self.channel_username) {
            return Err(RequestProblem::Missing);
        }

        // numeric channels are sent as-is; strings go through normalisation
        let chat_id = match &self.channel_username {
            Value::String(s) => ChatId::normalize(s),
            Value::Number(n) => match integral(n) {
                Some(id) => ChatId::Numeric(id),
                None => ChatId::normalize(&n.to_string()),
            },
            _ => return Err(RequestProblem::Missing),
        };

        let telegram_id = match &self.telegram_id {
            Value::Number(n) => integral(n),
            Value::String(s) => parse_leading_integer(s),
            _ => None,
        }
        .ok_or(RequestProblem::NotNumeric)?;

        Ok((telegram_id, chat_id))
    }
}
