use thiserror::Error;

/// A malformed chat-turn request. The message is the first constraint the
/// payload violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("request payload must be a JSON object")]
    NotAnObject,

    #[error("{field} must be a valid UUID")]
    InvalidId { field: &'static str },

    #[error("messages must be an array")]
    MessagesNotArray,

    #[error("At least one message is required")]
    EmptyHistory,

    #[error("message {index} must be an object with role and content")]
    MalformedMessage { index: usize },

    #[error("message {index} has unknown role {role:?}")]
    UnknownRole { index: usize, role: String },

    #[error("message {index} has empty content")]
    EmptyContent { index: usize },

    #[error("At least one user message is required")]
    NoUserMessage,

    #[error("webSearch must be a boolean")]
    InvalidWebSearch,
}
