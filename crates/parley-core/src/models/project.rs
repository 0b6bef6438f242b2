use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// A named workspace with its own documents and custom instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Project {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Identifier of the project's document index, if files were ingested.
    #[serde(default)]
    pub vector_store_id: Option<String>,
    #[serde(default)]
    pub deleted_at: Option<jiff::Timestamp>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl Project {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Visible to `caller`: owned by them and not soft-deleted.
    pub fn is_visible_to(&self, caller: Uuid) -> bool {
        self.owner_id == caller && !self.is_deleted()
    }
}

/// The single custom-instructions record kept per project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProjectInstructions {
    pub project_id: Uuid,
    #[serde(default)]
    pub instructions: Option<String>,
    pub updated_at: jiff::Timestamp,
    #[serde(default)]
    pub updated_by: Option<Uuid>,
}
