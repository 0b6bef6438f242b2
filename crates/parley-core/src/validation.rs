//! Chat-turn request validation.
//!
//! The only gate between an untyped client payload and the remote
//! completion API. Validation is pure: it never touches the store or the
//! network, and it stops at the first violated constraint.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::models::message::MessageRole;
use crate::models::turn::{ChatTurnRequest, TurnMessage};

/// Validate and normalize a raw chat-turn payload.
///
/// Expected shape (camelCase, as sent by the web client):
///
/// ```json
/// {
///   "projectId": "…", "chatId": "…", "callerId": "…",
///   "messages": [{ "role": "user", "content": "…" }],
///   "webSearch": true
/// }
/// ```
///
/// `userId` is accepted as an alias for `callerId`.
pub fn validate_turn_request(raw: &Value) -> Result<ChatTurnRequest, ValidationError> {
    let obj = raw.as_object().ok_or(ValidationError::NotAnObject)?;

    let project_id = required_uuid(obj, &["projectId"], "projectId")?;
    let chat_id = required_uuid(obj, &["chatId"], "chatId")?;
    let caller_id = required_uuid(obj, &["callerId", "userId"], "callerId")?;

    let entries = match obj.get("messages") {
        Some(Value::Array(entries)) => entries,
        None | Some(Value::Null) => return Err(ValidationError::EmptyHistory),
        Some(_) => return Err(ValidationError::MessagesNotArray),
    };
    if entries.is_empty() {
        return Err(ValidationError::EmptyHistory);
    }

    let messages = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_message(index, entry))
        .collect::<Result<Vec<_>, _>>()?;

    if !messages.iter().any(|m| m.role == MessageRole::User) {
        return Err(ValidationError::NoUserMessage);
    }

    let web_search = coerce_bool(obj.get("webSearch")).ok_or(ValidationError::InvalidWebSearch)?;

    Ok(ChatTurnRequest {
        project_id,
        chat_id,
        caller_id,
        messages,
        web_search,
    })
}

fn required_uuid(
    obj: &Map<String, Value>,
    names: &[&str],
    field: &'static str,
) -> Result<Uuid, ValidationError> {
    names
        .iter()
        .find_map(|name| obj.get(*name).and_then(Value::as_str))
        .and_then(|s| Uuid::parse_str(s.trim()).ok())
        .ok_or(ValidationError::InvalidId { field })
}

fn parse_message(index: usize, entry: &Value) -> Result<TurnMessage, ValidationError> {
    let obj = entry
        .as_object()
        .ok_or(ValidationError::MalformedMessage { index })?;

    let role_str = obj
        .get("role")
        .and_then(Value::as_str)
        .ok_or(ValidationError::MalformedMessage { index })?;
    let role = MessageRole::parse(role_str).ok_or_else(|| ValidationError::UnknownRole {
        index,
        role: role_str.to_string(),
    })?;

    let content = obj
        .get("content")
        .and_then(Value::as_str)
        .ok_or(ValidationError::MalformedMessage { index })?;
    if content.trim().is_empty() {
        return Err(ValidationError::EmptyContent { index });
    }

    Ok(TurnMessage {
        role,
        content: content.to_string(),
    })
}

/// Coerce the web-search toggle. Absent and `null` mean off.
fn coerce_bool(value: Option<&Value>) -> Option<bool> {
    match value {
        None | Some(Value::Null) => Some(false),
        Some(Value::Bool(b)) => Some(*b),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        Some(Value::Number(n)) => match n.as_u64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Some(_) => None,
    }
}
