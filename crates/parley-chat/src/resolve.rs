//! Acting on the model's output: picking the image invocation, generating
//! the image, and normalizing it to a self-contained `data:` URL.

use tracing::{info, warn};

use parley_core::models::message::Citation;
use parley_openai::capabilities::{CapabilityInvocation, ImageSize};
use parley_openai::completion::RawModelOutput;
use parley_openai::image::{GeneratedImage, ImageApi, ImageFetcher, ImageRequest, inline_data_url};

use crate::error::ChatError;

/// Assistant text used when an image was produced without accompanying text.
pub const IMAGE_ONLY_TEXT: &str = "Image generated.";

/// Arguments of the image invocation the turn acts on, as the model sent them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInvocation {
    pub prompt: Option<String>,
    pub size: Option<String>,
}

impl ImageInvocation {
    /// Apply defaults: a blank prompt becomes `fallback_prompt`, an unknown
    /// or absent size becomes square.
    pub fn to_request(&self, fallback_prompt: &str) -> ImageRequest {
        let prompt = self
            .prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(fallback_prompt.trim())
            .to_string();

        let size = self
            .size
            .as_deref()
            .and_then(ImageSize::from_preset)
            .unwrap_or_default();

        ImageRequest { prompt, size }
    }
}

/// Model output reduced to what the turn acts on.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelTurnResult {
    pub assistant_text: String,
    pub image_invocation: Option<ImageInvocation>,
    pub citations: Vec<Citation>,
}

/// Keep the first image invocation; anything after it, and any call to a
/// function that was never declared, is dropped.
pub fn interpret_output(output: RawModelOutput) -> ModelTurnResult {
    let mut image_invocation = None;

    for invocation in output.invocations {
        match invocation {
            CapabilityInvocation::GenerateImage { prompt, size } if image_invocation.is_none() => {
                image_invocation = Some(ImageInvocation { prompt, size });
            }
            CapabilityInvocation::GenerateImage { .. } => {
                warn!("dropping extra image invocation");
            }
            CapabilityInvocation::Other { name, .. } => {
                warn!(name = %name, "dropping invocation of undeclared function");
            }
        }
    }

    ModelTurnResult {
        assistant_text: output.text,
        image_invocation,
        citations: output.citations,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    /// Inline base64 from the image API.
    Inline,
    /// Downloaded from the provider URL and re-encoded.
    Refetched,
    /// Download failed; `data_url` holds the provider URL itself.
    RemoteUrlFallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub data_url: String,
    pub source_prompt: String,
    pub source: ImageSource,
}

/// How image resolution ended. Only an image API failure is an error; the
/// variants here are all successful turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    Encoded(ResolvedImage),
    /// The provider URL could not be re-fetched.
    Degraded { image: ResolvedImage, reason: String },
    /// The image API answered with neither inline data nor a URL.
    Empty,
}

impl ImageOutcome {
    pub fn into_image(self) -> Option<ResolvedImage> {
        match self {
            ImageOutcome::Encoded(image) | ImageOutcome::Degraded { image, .. } => Some(image),
            ImageOutcome::Empty => None,
        }
    }
}

/// Generate the requested image and normalize it.
pub async fn resolve_image(
    images: &dyn ImageApi,
    fetcher: &dyn ImageFetcher,
    request: ImageRequest,
) -> Result<ImageOutcome, ChatError> {
    let source_prompt = request.prompt.clone();
    let generated = images.generate(request).await?;

    let outcome = match generated {
        GeneratedImage::Inline { b64 } => ImageOutcome::Encoded(ResolvedImage {
            data_url: inline_data_url(&b64),
            source_prompt,
            source: ImageSource::Inline,
        }),
        GeneratedImage::Remote { url } => match fetcher.fetch(url.clone()).await {
            Ok(fetched) => ImageOutcome::Encoded(ResolvedImage {
                data_url: fetched.to_data_url(),
                source_prompt,
                source: ImageSource::Refetched,
            }),
            Err(e) => {
                warn!(url = %url, error = %e, "image re-fetch failed, keeping provider URL");
                ImageOutcome::Degraded {
                    image: ResolvedImage {
                        data_url: url,
                        source_prompt,
                        source: ImageSource::RemoteUrlFallback,
                    },
                    reason: e.to_string(),
                }
            }
        },
        GeneratedImage::Missing => {
            warn!("image API returned no image data");
            ImageOutcome::Empty
        }
    };

    if let ImageOutcome::Encoded(image) = &outcome {
        info!(source = ?image.source, bytes = image.data_url.len(), "image resolved");
    }

    Ok(outcome)
}

/// The text returned to the caller for this turn.
pub fn final_assistant_text(text: String, has_image: bool) -> String {
    if has_image && text.trim().is_empty() {
        IMAGE_ONLY_TEXT.to_string()
    } else {
        text
    }
}
