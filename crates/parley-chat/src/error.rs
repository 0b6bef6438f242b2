use thiserror::Error;

use parley_core::error::ValidationError;
use parley_openai::error::OpenAiError;
use parley_storage::error::StorageError;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    NotFound(String),

    #[error("upstream call failed: {0}")]
    Upstream(#[from] OpenAiError),

    #[error("store error: {0}")]
    Store(#[from] StorageError),
}

impl ChatError {
    pub fn project_not_found() -> Self {
        ChatError::NotFound("Project not found".to_string())
    }

    pub fn chat_not_found() -> Self {
        ChatError::NotFound("Chat not found".to_string())
    }
}
