//! Capability ("tool") declarations and the invocations the model returns.
//!
//! Which capabilities a turn gets is a pure function of two inputs: the
//! caller's web-search toggle and whether the project has a document index.
//! Image generation is always offered, with an identical declaration on
//! every turn so the model can rely on its shape.

use serde_json::{Map, Value, json};

/// Function name the model uses to request an image.
pub const IMAGE_TOOL_NAME: &str = "generate_image";

const IMAGE_TOOL_DESCRIPTION: &str = "Generate an image for the project chat request.";

/// Result cap for document search over the project's index.
pub const DOCUMENT_SEARCH_MAX_RESULTS: u32 = 8;

/// Image size presets accepted by the image API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageSize {
    #[default]
    Square,
    Landscape,
    Portrait,
}

impl ImageSize {
    pub const ALL: [ImageSize; 3] = [ImageSize::Square, ImageSize::Landscape, ImageSize::Portrait];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::Square => "1024x1024",
            ImageSize::Landscape => "1536x1024",
            ImageSize::Portrait => "1024x1536",
        }
    }

    pub fn from_preset(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.as_str() == s.trim())
    }
}

/// A capability offered to the model for one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityDeclaration {
    WebSearch,
    DocumentSearch {
        index_id: String,
        max_results: u32,
    },
    ImageGeneration {
        name: String,
        description: String,
        parameters: Value,
    },
}

impl CapabilityDeclaration {
    /// The image-generation declaration. Always the same value.
    pub fn image_generation() -> Self {
        let sizes: Vec<&str> = ImageSize::ALL.iter().map(|s| s.as_str()).collect();

        CapabilityDeclaration::ImageGeneration {
            name: IMAGE_TOOL_NAME.to_string(),
            description: IMAGE_TOOL_DESCRIPTION.to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "prompt": {
                        "type": "string",
                        "description": "Full image description including style and subject."
                    },
                    "size": {
                        "type": "string",
                        "enum": sizes,
                        "description": "Optional size; landscape=1536x1024, portrait=1024x1536, square=1024x1024."
                    }
                },
                "required": ["prompt"]
            }),
        }
    }

    /// Wire shape for the completion endpoint's `tools` array.
    pub fn to_tool(&self) -> Value {
        match self {
            CapabilityDeclaration::WebSearch => json!({ "type": "web_search" }),
            CapabilityDeclaration::DocumentSearch {
                index_id,
                max_results,
            } => json!({
                "type": "file_search",
                "vector_store_ids": [index_id],
                "max_num_results": max_results,
            }),
            CapabilityDeclaration::ImageGeneration {
                name,
                description,
                parameters,
            } => json!({
                "type": "function",
                "name": name,
                "description": description,
                "parameters": parameters,
            }),
        }
    }
}

/// Capabilities for a turn, in fixed order: web search, document search,
/// image generation.
pub fn active_capabilities(
    web_search: bool,
    document_index_id: Option<&str>,
) -> Vec<CapabilityDeclaration> {
    let mut declarations = Vec::with_capacity(3);

    if web_search {
        declarations.push(CapabilityDeclaration::WebSearch);
    }

    if let Some(index_id) = document_index_id.filter(|id| !id.trim().is_empty()) {
        declarations.push(CapabilityDeclaration::DocumentSearch {
            index_id: index_id.to_string(),
            max_results: DOCUMENT_SEARCH_MAX_RESULTS,
        });
    }

    declarations.push(CapabilityDeclaration::image_generation());
    declarations
}

/// A function call found in the model output.
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityInvocation {
    /// Arguments exactly as the model sent them; defaults are applied later.
    GenerateImage {
        prompt: Option<String>,
        size: Option<String>,
    },
    Other {
        name: String,
        arguments: Value,
    },
}

impl CapabilityInvocation {
    /// Classify a function call by name.
    ///
    /// `arguments` may arrive as a JSON object or as a string holding JSON;
    /// anything unparseable is treated as no arguments.
    pub fn from_call(name: &str, arguments: &Value) -> Self {
        let args = normalize_arguments(arguments);

        if name != IMAGE_TOOL_NAME {
            return CapabilityInvocation::Other {
                name: name.to_string(),
                arguments: Value::Object(args),
            };
        }

        let string_arg = |key: &str| args.get(key).and_then(Value::as_str).map(str::to_string);

        CapabilityInvocation::GenerateImage {
            prompt: string_arg("prompt"),
            size: string_arg("size"),
        }
    }
}

fn normalize_arguments(arguments: &Value) -> Map<String, Value> {
    match arguments {
        Value::Object(map) => map.clone(),
        Value::String(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_presets_round_trip() {
        for size in ImageSize::ALL {
            assert_eq!(ImageSize::from_preset(size.as_str()), Some(size));
        }
        assert_eq!(ImageSize::from_preset("512x512"), None);
        assert_eq!(ImageSize::default(), ImageSize::Square);
    }

    #[test]
    fn string_arguments_are_parsed() {
        let call = CapabilityInvocation::from_call(
            IMAGE_TOOL_NAME,
            &Value::String(r#"{"prompt":"a red bicycle","size":"1536x1024"}"#.to_string()),
        );
        assert_eq!(
            call,
            CapabilityInvocation::GenerateImage {
                prompt: Some("a red bicycle".to_string()),
                size: Some("1536x1024".to_string()),
            }
        );
    }

    #[test]
    fn garbage_arguments_become_empty() {
        let call = CapabilityInvocation::from_call(IMAGE_TOOL_NAME, &Value::String("{".into()));
        assert_eq!(
            call,
            CapabilityInvocation::GenerateImage {
                prompt: None,
                size: None
            }
        );
    }

    #[test]
    fn other_functions_are_kept_by_name() {
        let call = CapabilityInvocation::from_call("lookup_weather", &json!({ "city": "Oslo" }));
        assert!(matches!(
            call,
            CapabilityInvocation::Other { ref name, .. } if name == "lookup_weather"
        ));
    }

    #[test]
    fn blank_index_id_does_not_enable_document_search() {
        let caps = active_capabilities(false, Some("  "));
        assert_eq!(caps, vec![CapabilityDeclaration::image_generation()]);
    }
}
