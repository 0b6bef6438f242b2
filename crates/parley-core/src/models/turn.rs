use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::message::MessageRole;

/// One entry of the conversation history sent with a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TurnMessage {
    pub role: MessageRole,
    pub content: String,
}

/// A validated chat-turn request. Only [`crate::validation`] builds these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurnRequest {
    pub project_id: Uuid,
    pub chat_id: Uuid,
    pub caller_id: Uuid,
    pub messages: Vec<TurnMessage>,
    pub web_search: bool,
}

impl ChatTurnRequest {
    /// The newest `user` entry. Persisted as the turn's user message and used
    /// as the image prompt when the model gives none.
    pub fn current_message(&self) -> Option<&TurnMessage> {
        self.messages.iter().rev().find(|m| m.role == MessageRole::User)
    }
}

/// What the caller gets back for a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProjectChatResult {
    pub assistant_text: String,
    pub image_data_url: Option<String>,
}
