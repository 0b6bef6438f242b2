//! Recording a finished turn: the user message, the assistant message, and
//! the chat's last-activity timestamp, in that order.

use std::fmt;

use jiff::Timestamp;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use parley_core::models::message::{Citation, MessageRole, ProjectMessage, RichImage, RichPayload};
use parley_storage::error::StorageError;
use parley_storage::store::ProjectStore;

use crate::resolve::ResolvedImage;

/// Stored content for an assistant reply that had no text.
pub const EMPTY_ASSISTANT_TEXT: &str = "No response.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitStep {
    UserMessage,
    AssistantMessage,
    ChatActivity,
}

impl fmt::Display for CommitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CommitStep::UserMessage => "user message",
            CommitStep::AssistantMessage => "assistant message",
            CommitStep::ChatActivity => "chat activity",
        })
    }
}

/// A write that failed after the turn had already succeeded.
#[derive(Debug, Error)]
#[error("failed to persist {step}: {source}")]
pub struct PersistenceWarning {
    pub step: CommitStep,
    #[source]
    pub source: StorageError,
}

impl PersistenceWarning {
    fn at(step: CommitStep) -> impl FnOnce(StorageError) -> Self {
        move |source| PersistenceWarning { step, source }
    }
}

/// What got written. Never affects the caller's result.
#[derive(Debug)]
pub enum CommitOutcome {
    Committed,
    /// Steps before `warning.step` were written; it and later steps were not.
    Partial(PersistenceWarning),
}

impl CommitOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, CommitOutcome::Committed)
    }
}

/// One completed turn, ready to be written.
#[derive(Debug, Clone, Copy)]
pub struct TurnRecord<'a> {
    pub project_id: Uuid,
    pub chat_id: Uuid,
    pub caller_id: Uuid,
    pub user_text: &'a str,
    pub assistant_text: &'a str,
    pub image: Option<&'a ResolvedImage>,
    pub citations: &'a [Citation],
}

/// Persist a turn. Failures are logged and reported, never raised.
pub async fn commit_turn(store: &dyn ProjectStore, record: TurnRecord<'_>) -> CommitOutcome {
    match write_turn(store, &record).await {
        Ok(()) => {
            info!(chat_id = %record.chat_id, "turn committed");
            CommitOutcome::Committed
        }
        Err(warning) => {
            warn!(
                chat_id = %record.chat_id,
                step = %warning.step,
                error = %warning.source,
                "persistence warning: turn result returned without full history"
            );
            CommitOutcome::Partial(warning)
        }
    }
}

async fn write_turn(
    store: &dyn ProjectStore,
    record: &TurnRecord<'_>,
) -> Result<(), PersistenceWarning> {
    let user_message = ProjectMessage {
        id: Uuid::new_v4(),
        chat_id: record.chat_id,
        role: MessageRole::User,
        content: record.user_text.to_string(),
        rich: None,
        created_by: Some(record.caller_id),
        created_at: Timestamp::now(),
    };
    store
        .append_message(user_message)
        .await
        .map_err(PersistenceWarning::at(CommitStep::UserMessage))?;

    let assistant_message = assistant_message(record);
    let finished_at = assistant_message.created_at;
    store
        .append_message(assistant_message)
        .await
        .map_err(PersistenceWarning::at(CommitStep::AssistantMessage))?;

    store
        .touch_chat(record.project_id, record.chat_id, finished_at)
        .await
        .map_err(PersistenceWarning::at(CommitStep::ChatActivity))?;

    Ok(())
}

fn assistant_message(record: &TurnRecord<'_>) -> ProjectMessage {
    let content = if record.assistant_text.trim().is_empty() {
        EMPTY_ASSISTANT_TEXT.to_string()
    } else {
        record.assistant_text.to_string()
    };

    let rich = RichPayload {
        image: record.image.map(|image| RichImage {
            data_url: image.data_url.clone(),
            prompt: image.source_prompt.clone(),
        }),
        citations: record.citations.to_vec(),
    };

    ProjectMessage {
        id: Uuid::new_v4(),
        chat_id: record.chat_id,
        role: MessageRole::Assistant,
        content,
        rich: (!rich.is_empty()).then_some(rich),
        created_by: None,
        created_at: Timestamp::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ImageSource;

    fn record<'a>(text: &'a str, image: Option<&'a ResolvedImage>) -> TurnRecord<'a> {
        TurnRecord {
            project_id: Uuid::new_v4(),
            chat_id: Uuid::new_v4(),
            caller_id: Uuid::new_v4(),
            user_text: "hello",
            assistant_text: text,
            image,
            citations: &[],
        }
    }

    #[test]
    fn empty_reply_is_stored_as_placeholder() {
        let message = assistant_message(&record("  ", None));
        assert_eq!(message.content, EMPTY_ASSISTANT_TEXT);
        assert_eq!(message.rich, None);
        assert_eq!(message.role, MessageRole::Assistant);
    }

    #[test]
    fn image_lands_in_rich_payload() {
        let image = ResolvedImage {
            data_url: "data:image/png;base64,aGk=".to_string(),
            source_prompt: "a fox".to_string(),
            source: ImageSource::Inline,
        };
        let message = assistant_message(&record("Image generated.", Some(&image)));
        let rich = message.rich.unwrap();
        let stored = rich.image.unwrap();
        assert_eq!(stored.data_url, image.data_url);
        assert_eq!(stored.prompt, "a fox");
    }
}
