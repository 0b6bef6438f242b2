//! Completion requests against the Responses endpoint.
//!
//! One blocking round trip per turn: the system instruction, the full
//! history, and the turn's capability declarations go out; text, function
//! calls, and citations come back.

use serde_json::{Value, json};

use parley_core::models::message::{Citation, MessageRole};
use parley_core::models::turn::TurnMessage;

use crate::BoxFuture;
use crate::capabilities::{CapabilityDeclaration, CapabilityInvocation};
use crate::error::OpenAiError;

/// Everything the completion endpoint needs for one turn.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub messages: Vec<TurnMessage>,
    pub capabilities: Vec<CapabilityDeclaration>,
}

/// Model output before any invocation is acted on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawModelOutput {
    pub text: String,
    /// In the order the model emitted them.
    pub invocations: Vec<CapabilityInvocation>,
    pub citations: Vec<Citation>,
}

pub trait CompletionApi: Send + Sync {
    fn complete(&self, request: CompletionRequest)
    -> BoxFuture<'_, Result<RawModelOutput, OpenAiError>>;
}

/// Build the JSON body for `POST /v1/responses`.
///
/// The system instruction is the first input item. Assistant history is
/// tagged `output_text` (already produced); everything else `input_text`.
pub fn build_request_body(model: &str, request: &CompletionRequest) -> Value {
    let mut input = Vec::with_capacity(request.messages.len() + 1);
    input.push(input_item(MessageRole::System, &request.system_prompt));
    input.extend(request.messages.iter().map(|m| input_item(m.role, &m.content)));

    let tools: Vec<Value> = request
        .capabilities
        .iter()
        .map(CapabilityDeclaration::to_tool)
        .collect();

    json!({
        "model": model,
        "input": input,
        "tools": tools,
    })
}

fn input_item(role: MessageRole, text: &str) -> Value {
    let content_type = match role {
        MessageRole::Assistant => "output_text",
        MessageRole::User | MessageRole::System => "input_text",
    };

    json!({
        "role": role.as_str(),
        "content": [{ "type": content_type, "text": text }],
    })
}

/// Parse a Responses payload.
///
/// Text is the top-level `output_text` when present, otherwise the
/// concatenated `output_text` parts of `message` items, unmodified.
pub fn parse_response(response: &Value) -> Result<RawModelOutput, OpenAiError> {
    if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(OpenAiError::ResponseParse(message));
    }

    let items = match (response.get("output"), response.get("output_text")) {
        (Some(Value::Array(items)), _) => items.as_slice(),
        (None, Some(Value::String(_))) => &[],
        _ => {
            return Err(OpenAiError::ResponseParse(
                "response has no output array".to_string(),
            ));
        }
    };

    let mut output = RawModelOutput::default();
    let mut message_text = String::new();

    for item in items {
        match item.get("type").and_then(Value::as_str) {
            Some("message") => {
                let parts = item
                    .get("content")
                    .and_then(Value::as_array)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                for part in parts {
                    if part.get("type").and_then(Value::as_str) != Some("output_text") {
                        continue;
                    }
                    if let Some(text) = part.get("text").and_then(Value::as_str) {
                        message_text.push_str(text);
                    }
                    collect_citations(part, &mut output.citations);
                }
            }
            Some("function_call") => {
                let Some(name) = item.get("name").and_then(Value::as_str) else {
                    continue;
                };
                let arguments = item.get("arguments").cloned().unwrap_or(Value::Null);
                output
                    .invocations
                    .push(CapabilityInvocation::from_call(name, &arguments));
            }
            // web_search_call, file_search_call, reasoning: nothing to act on.
            _ => {}
        }
    }

    output.text = match response.get("output_text").and_then(Value::as_str) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => message_text,
    };

    Ok(output)
}

fn collect_citations(part: &Value, citations: &mut Vec<Citation>) {
    let annotations = part
        .get("annotations")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for annotation in annotations {
        let field = |key: &str| annotation.get(key).and_then(Value::as_str).map(str::to_string);

        let citation = match annotation.get("type").and_then(Value::as_str) {
            Some("url_citation") => field("url").map(|url| Citation::Url {
                url,
                title: field("title"),
            }),
            Some("file_citation") => field("file_id").map(|file_id| Citation::File {
                file_id,
                filename: field("filename"),
            }),
            _ => None,
        };

        if let Some(citation) = citation
            && !citations.contains(&citation)
        {
            citations.push(citation);
        }
    }
}
