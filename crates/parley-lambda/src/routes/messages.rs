use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Serialize;
use serde_json::{Map, Value};

use parley_chat::turn::send_project_chat_message;

use crate::error::ApiError;
use crate::middleware::caller::Caller;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub assistant: AssistantReply,
}

#[derive(Debug, Serialize)]
pub struct AssistantReply {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// `POST /projects/{id}/chat/messages`
///
/// The project id comes from the path and the caller from the
/// authorizer header; the body supplies `chatId`, `messages`, `webSearch`.
pub async fn send_message(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(project_id): Path<String>,
    body: Bytes,
) -> Result<Json<SendMessageResponse>, ApiError> {
    let mut raw = match super::json_body::<Value>(&body)? {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };

    if let Value::Object(fields) = &mut raw {
        fields.remove("userId");
        fields.insert("projectId".to_string(), Value::String(project_id));
        fields.insert("callerId".to_string(), Value::String(caller.id.to_string()));
    }

    let result = send_project_chat_message(&state.chat, &raw).await?;

    Ok(Json(SendMessageResponse {
        assistant: AssistantReply {
            content: result.assistant_text,
            image: result.image_data_url,
        },
    }))
}
