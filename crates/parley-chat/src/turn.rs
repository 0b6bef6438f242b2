//! The turn pipeline entry point.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use parley_core::models::turn::{ChatTurnRequest, ProjectChatResult};
use parley_core::validation::validate_turn_request;
use parley_openai::capabilities::active_capabilities;
use parley_openai::client::OpenAiClient;
use parley_openai::completion::{CompletionApi, CompletionRequest};
use parley_openai::image::{ImageApi, ImageFetcher};
use parley_storage::store::ProjectStore;

use crate::commit::{TurnRecord, commit_turn};
use crate::context::load_project_context;
use crate::error::ChatError;
use crate::resolve::{final_assistant_text, interpret_output, resolve_image};

/// Collaborators for a turn. Built once at start-up and cloned per request.
#[derive(Clone)]
pub struct ChatDeps {
    pub store: Arc<dyn ProjectStore>,
    pub completion: Arc<dyn CompletionApi>,
    pub images: Arc<dyn ImageApi>,
    pub fetcher: Arc<dyn ImageFetcher>,
}

impl ChatDeps {
    /// One client serves completion, image generation, and re-fetching.
    pub fn with_client(store: Arc<dyn ProjectStore>, client: OpenAiClient) -> Self {
        let client = Arc::new(client);
        Self {
            store,
            completion: client.clone(),
            images: client.clone(),
            fetcher: client,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    Validating,
    ContextLoading,
    Invoking,
    ResolvingImage,
    Committing,
    Done,
}

impl fmt::Display for TurnStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TurnStage::Validating => "validating",
            TurnStage::ContextLoading => "context_loading",
            TurnStage::Invoking => "invoking",
            TurnStage::ResolvingImage => "resolving_image",
            TurnStage::Committing => "committing",
            TurnStage::Done => "done",
        })
    }
}

/// Validate a raw request and run the turn.
pub async fn send_project_chat_message(
    deps: &ChatDeps,
    raw: &Value,
) -> Result<ProjectChatResult, ChatError> {
    let request = validate_turn_request(raw).map_err(|e| {
        warn!(stage = %TurnStage::Validating, error = %e, "turn rejected");
        ChatError::from(e)
    })?;

    run_turn(deps, request).await
}

/// Run an already validated turn.
pub async fn run_turn(
    deps: &ChatDeps,
    request: ChatTurnRequest,
) -> Result<ProjectChatResult, ChatError> {
    // Validation guarantees at least one user entry.
    let user_text = request
        .current_message()
        .map(|m| m.content.clone())
        .unwrap_or_default();

    let ChatTurnRequest {
        project_id,
        chat_id,
        caller_id,
        messages,
        web_search,
    } = request;

    let context = load_project_context(deps.store.as_ref(), project_id, chat_id, caller_id)
        .await
        .inspect_err(|e| warn!(stage = %TurnStage::ContextLoading, error = %e, "turn aborted"))?;

    let capabilities = active_capabilities(web_search, context.document_index_id.as_deref());
    info!(
        stage = %TurnStage::Invoking,
        project_id = %project_id,
        chat_id = %chat_id,
        history = messages.len(),
        capabilities = capabilities.len(),
        "starting turn"
    );

    let output = deps
        .completion
        .complete(CompletionRequest {
            system_prompt: context.system_prompt(),
            messages,
            capabilities,
        })
        .await
        .map_err(|e| {
            warn!(stage = %TurnStage::Invoking, error = %e, "completion failed");
            ChatError::from(e)
        })?;

    let turn = interpret_output(output);

    let image = match &turn.image_invocation {
        Some(invocation) => {
            let request = invocation.to_request(&user_text);
            resolve_image(deps.images.as_ref(), deps.fetcher.as_ref(), request)
                .await
                .inspect_err(|e| {
                    warn!(stage = %TurnStage::ResolvingImage, error = %e, "image generation failed")
                })?
                .into_image()
        }
        None => None,
    };

    let assistant_text = final_assistant_text(turn.assistant_text, image.is_some());

    debug!(stage = %TurnStage::Committing, chat_id = %chat_id, "recording turn");
    let outcome = commit_turn(
        deps.store.as_ref(),
        TurnRecord {
            project_id,
            chat_id,
            caller_id,
            user_text: &user_text,
            assistant_text: &assistant_text,
            image: image.as_ref(),
            citations: &turn.citations,
        },
    )
    .await;

    info!(
        stage = %TurnStage::Done,
        chat_id = %chat_id,
        committed = outcome.is_committed(),
        has_image = image.is_some(),
        "turn finished"
    );

    Ok(ProjectChatResult {
        assistant_text,
        image_data_url: image.map(|image| image.data_url),
    })
}
