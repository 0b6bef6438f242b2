use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parley_chat::projects;

use crate::error::ApiError;
use crate::middleware::caller::Caller;
use crate::state::AppState;

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InstructionsBody {
    #[serde(default)]
    pub instructions: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Updated {
    pub success: bool,
}

pub async fn get_instructions(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<InstructionsBody>, ApiError> {
    let instructions =
        projects::get_instructions(state.chat.store.as_ref(), project_id, caller.id).await?;
    Ok(Json(InstructionsBody { instructions }))
}

pub async fn update_instructions(
    State(state): State<AppState>,
    Extension(caller): Extension<Caller>,
    Path(project_id): Path<Uuid>,
    body: Bytes,
) -> Result<Json<Updated>, ApiError> {
    let body: InstructionsBody = super::json_body(&body)?;
    projects::update_instructions(
        state.chat.store.as_ref(),
        project_id,
        caller.id,
        body.instructions,
    )
    .await?;
    Ok(Json(Updated { success: true }))
}
