//! Per-turn project context and the system instruction built from it.

use tracing::debug;
use uuid::Uuid;

use parley_core::models::project::Project;
use parley_storage::store::ProjectStore;

use crate::error::ChatError;

/// Project facts the model is grounded on. Loaded fresh every turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    pub project_id: Uuid,
    pub project_name: String,
    pub custom_instructions: Option<String>,
    pub document_index_id: Option<String>,
}

impl ProjectContext {
    pub fn system_prompt(&self) -> String {
        build_system_prompt(&self.project_name, self.custom_instructions.as_deref())
    }
}

/// The caller's live project, or `NotFound("Project not found")`.
pub async fn require_project(
    store: &dyn ProjectStore,
    project_id: Uuid,
    caller_id: Uuid,
) -> Result<Project, ChatError> {
    store
        .find_project(project_id, caller_id)
        .await?
        .ok_or_else(ChatError::project_not_found)
}

/// Resolve project, chat, and instructions for a turn.
///
/// Ownership is checked before the chat is looked at, so a foreign project
/// never reveals whether a chat id exists.
pub async fn load_project_context(
    store: &dyn ProjectStore,
    project_id: Uuid,
    chat_id: Uuid,
    caller_id: Uuid,
) -> Result<ProjectContext, ChatError> {
    let project = require_project(store, project_id, caller_id).await?;

    store
        .find_chat(chat_id, project_id)
        .await?
        .ok_or_else(ChatError::chat_not_found)?;

    let custom_instructions = store
        .get_instructions(project_id)
        .await?
        .and_then(|record| record.instructions);

    debug!(
        project_id = %project_id,
        chat_id = %chat_id,
        has_instructions = custom_instructions.is_some(),
        has_index = project.vector_store_id.is_some(),
        "project context loaded"
    );

    Ok(ProjectContext {
        project_id,
        project_name: project.name,
        custom_instructions,
        document_index_id: project.vector_store_id,
    })
}

pub fn build_system_prompt(project_name: &str, instructions: Option<&str>) -> String {
    let mut lines = vec![
        format!("You are the project-only assistant for project \"{project_name}\"."),
        "Memory mode: project-only. Only use context from this project; do not rely on any other workspace memory.".to_string(),
    ];

    if let Some(instructions) = instructions.map(str::trim).filter(|s| !s.is_empty()) {
        lines.push("Project instructions:".to_string());
        lines.push(instructions.to_string());
    }

    lines.push("Be concise and focus on the user request.".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_without_instructions() {
        let prompt = build_system_prompt("Atlas", None);
        let lines: Vec<&str> = prompt.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "You are the project-only assistant for project \"Atlas\"."
        );
        assert!(lines[1].starts_with("Memory mode: project-only."));
        assert_eq!(lines[2], "Be concise and focus on the user request.");
    }

    #[test]
    fn instructions_sit_between_memory_and_closing_lines() {
        let prompt = build_system_prompt("Atlas", Some("  Answer in French.\n"));
        let lines: Vec<&str> = prompt.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[2], "Project instructions:");
        assert_eq!(lines[3], "Answer in French.");
        assert_eq!(lines[4], "Be concise and focus on the user request.");
    }

    #[test]
    fn blank_instructions_are_skipped() {
        assert_eq!(
            build_system_prompt("Atlas", Some("   ")),
            build_system_prompt("Atlas", None)
        );
    }
}
