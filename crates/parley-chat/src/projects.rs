//! Project plumbing around the turn pipeline: custom instructions and chat
//! threads. Every operation is scoped to a project the caller owns.

use jiff::Timestamp;
use tracing::info;
use uuid::Uuid;

use parley_core::models::chat::{ChatThread, ProjectChat};
use parley_core::models::project::ProjectInstructions;
use parley_storage::store::ProjectStore;

use crate::context::require_project;
use crate::error::ChatError;

pub async fn get_instructions(
    store: &dyn ProjectStore,
    project_id: Uuid,
    caller_id: Uuid,
) -> Result<Option<String>, ChatError> {
    require_project(store, project_id, caller_id).await?;

    Ok(store
        .get_instructions(project_id)
        .await?
        .and_then(|record| record.instructions))
}

/// Replace the project's instructions. Blank text clears them.
pub async fn update_instructions(
    store: &dyn ProjectStore,
    project_id: Uuid,
    caller_id: Uuid,
    instructions: Option<String>,
) -> Result<ProjectInstructions, ChatError> {
    require_project(store, project_id, caller_id).await?;

    let record = ProjectInstructions {
        project_id,
        instructions: instructions
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()),
        updated_at: Timestamp::now(),
        updated_by: Some(caller_id),
    };
    store.put_instructions(record.clone()).await?;

    info!(
        project_id = %project_id,
        cleared = record.instructions.is_none(),
        "instructions updated"
    );
    Ok(record)
}

/// Live chats, most recent activity first, each with its messages oldest first.
pub async fn list_chat_threads(
    store: &dyn ProjectStore,
    project_id: Uuid,
    caller_id: Uuid,
) -> Result<Vec<ChatThread>, ChatError> {
    require_project(store, project_id, caller_id).await?;

    let chats = store.list_chats(project_id).await?;
    let mut threads = Vec::with_capacity(chats.len());
    for chat in chats {
        let messages = store.list_messages(chat.id).await?;
        threads.push(ChatThread {
            id: chat.id,
            title: chat.title,
            updated_at: chat.updated_at,
            messages,
        });
    }

    Ok(threads)
}

pub async fn create_chat(
    store: &dyn ProjectStore,
    project_id: Uuid,
    caller_id: Uuid,
    title: Option<&str>,
) -> Result<ProjectChat, ChatError> {
    require_project(store, project_id, caller_id).await?;

    let chat = ProjectChat::new(project_id, title.unwrap_or_default(), caller_id);
    store.put_chat(chat.clone()).await?;

    info!(project_id = %project_id, chat_id = %chat.id, "chat created");
    Ok(chat)
}
