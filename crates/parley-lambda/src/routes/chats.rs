use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parley_chat::projects;
use parley_core::models::chat::{ChatThread, ProjectChat};

use crate::error::ApiError;
use crate::middleware::caller::Caller;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ChatList {
    pub chats: Vec<ChatThread>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateChatBody {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedChat {
    pub chat: ProjectChat,
}

pub async fn list_chats(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ChatList>, ApiError> {
    let chats =
        projects::list_chat_threads(state.chat.store.as_ref(), project_id, caller.id).await?;
    Ok(Json(ChatList { chats }))
}

pub async fn create_chat(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(project_id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<CreatedChat>, ApiError> {
    let body: CreateChatBody = super::json_body(&body)?;
    let chat = projects::create_chat(
        state.chat.store.as_ref(),
        project_id,
        caller.id,
        body.title.as_deref(),
    )
    .await?;
    Ok(Json(CreatedChat { chat }))
}
