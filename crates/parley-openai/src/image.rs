//! Image generation and re-encoding of generated images as `data:` URLs.

use base64::{Engine, engine::general_purpose};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::BoxFuture;
use crate::capabilities::ImageSize;
use crate::error::OpenAiError;

/// Content type assumed for inline payloads and for fetches that omit one.
pub const DEFAULT_IMAGE_MIME: &str = "image/png";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
    pub size: ImageSize,
}

/// What the image API handed back for the first generated image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedImage {
    /// Base64 image bytes, no `data:` prefix.
    Inline { b64: String },
    /// A provider-hosted URL with a limited lifetime.
    Remote { url: String },
    /// Neither field was present.
    Missing,
}

/// Bytes of a fetched image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FetchedImage {
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

pub trait ImageApi: Send + Sync {
    fn generate(&self, request: ImageRequest)
    -> BoxFuture<'_, Result<GeneratedImage, OpenAiError>>;
}

/// Downloads a generated image so it can be re-encoded.
pub trait ImageFetcher: Send + Sync {
    fn fetch(&self, url: String) -> BoxFuture<'_, Result<FetchedImage, OpenAiError>>;
}

/// Wrap inline base64 image data as a `data:` URL.
pub fn inline_data_url(b64: &str) -> String {
    format!("data:{DEFAULT_IMAGE_MIME};base64,{b64}")
}

/// Body for `POST /v1/images/generations`. One image per call.
pub fn build_request_body(model: &str, request: &ImageRequest) -> Value {
    json!({
        "model": model,
        "prompt": request.prompt,
        "size": request.size.as_str(),
        "n": 1,
    })
}

#[derive(Deserialize)]
struct ImagesResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    #[serde(default)]
    b64_json: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Parse an images response. Inline data is preferred over a URL.
pub fn parse_response(response: Value) -> Result<GeneratedImage, OpenAiError> {
    let parsed: ImagesResponse = serde_json::from_value(response)
        .map_err(|e| OpenAiError::ResponseParse(format!("failed to parse image response: {e}")))?;

    let Some(first) = parsed.data.into_iter().next() else {
        return Ok(GeneratedImage::Missing);
    };

    let non_empty = |s: Option<String>| s.filter(|v| !v.trim().is_empty());

    Ok(match (non_empty(first.b64_json), non_empty(first.url)) {
        (Some(b64), _) => GeneratedImage::Inline { b64 },
        (None, Some(url)) => GeneratedImage::Remote { url },
        (None, None) => GeneratedImage::Missing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_wins_over_url() {
        let image = parse_response(json!({
            "data": [{ "b64_json": "aGk=", "url": "https://img.example/1.png" }]
        }))
        .unwrap();
        assert_eq!(image, GeneratedImage::Inline { b64: "aGk=".to_string() });
    }

    #[test]
    fn url_only() {
        let image =
            parse_response(json!({ "data": [{ "url": "https://img.example/1.png" }] })).unwrap();
        assert_eq!(
            image,
            GeneratedImage::Remote {
                url: "https://img.example/1.png".to_string()
            }
        );
    }

    #[test]
    fn empty_data_is_missing() {
        assert_eq!(parse_response(json!({ "data": [] })).unwrap(), GeneratedImage::Missing);
        assert_eq!(parse_response(json!({})).unwrap(), GeneratedImage::Missing);
    }

    #[test]
    fn fetched_bytes_keep_their_content_type() {
        let fetched = FetchedImage {
            content_type: "image/webp".to_string(),
            bytes: b"hi".to_vec(),
        };
        assert_eq!(fetched.to_data_url(), "data:image/webp;base64,aGk=");
        assert_eq!(inline_data_url("aGk="), "data:image/png;base64,aGk=");
    }
}
