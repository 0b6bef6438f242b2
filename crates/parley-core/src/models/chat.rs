use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::message::ProjectMessage;

pub const DEFAULT_CHAT_TITLE: &str = "New chat";

/// A conversation thread inside a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProjectChat {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    #[serde(default)]
    pub created_by: Option<Uuid>,
    pub created_at: jiff::Timestamp,
    /// Last activity. Bumped after every committed turn.
    pub updated_at: jiff::Timestamp,
    #[serde(default)]
    pub deleted_at: Option<jiff::Timestamp>,
}

impl ProjectChat {
    pub fn new(project_id: Uuid, title: &str, created_by: Uuid) -> Self {
        let title = title.trim();
        let now = jiff::Timestamp::now();
        Self {
            id: Uuid::new_v4(),
            project_id,
            title: if title.is_empty() {
                DEFAULT_CHAT_TITLE.to_string()
            } else {
                title.to_string()
            },
            created_by: Some(created_by),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A chat together with its messages, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ChatThread {
    pub id: Uuid,
    pub title: String,
    pub updated_at: jiff::Timestamp,
    pub messages: Vec<ProjectMessage>,
}
