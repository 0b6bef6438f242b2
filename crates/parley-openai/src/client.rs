use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, info};

use crate::BoxFuture;
use crate::completion::{self, CompletionApi, CompletionRequest, RawModelOutput};
use crate::config::OpenAiConfig;
use crate::error::OpenAiError;
use crate::image::{
    self, DEFAULT_IMAGE_MIME, FetchedImage, GeneratedImage, ImageApi, ImageFetcher, ImageRequest,
};

/// HTTP client for the completion and image endpoints.
///
/// Constructed once at start-up and shared; cloning is cheap.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, OpenAiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OpenAiError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<Value, OpenAiError> {
        let url = self.config.endpoint(path);
        debug!(url = %url, "sending API request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OpenAiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| OpenAiError::ResponseParse(e.to_string()))
    }
}

impl CompletionApi for OpenAiClient {
    fn complete(
        &self,
        request: CompletionRequest,
    ) -> BoxFuture<'_, Result<RawModelOutput, OpenAiError>> {
        Box::pin(async move {
            let model = &self.config.chat_model;
            info!(
                model = %model,
                messages = request.messages.len(),
                tools = request.capabilities.len(),
                "invoking completion"
            );

            let body = completion::build_request_body(model, &request);
            let response = self.post_json("responses", &body).await?;
            let output = completion::parse_response(&response)?;

            info!(
                model = %model,
                text_len = output.text.len(),
                invocations = output.invocations.len(),
                "completion returned"
            );
            Ok(output)
        })
    }
}

impl ImageApi for OpenAiClient {
    fn generate(
        &self,
        request: ImageRequest,
    ) -> BoxFuture<'_, Result<GeneratedImage, OpenAiError>> {
        Box::pin(async move {
            let model = &self.config.image_model;
            info!(model = %model, size = request.size.as_str(), "generating image");

            let body = image::build_request_body(model, &request);
            let response = self.post_json("images/generations", &body).await?;
            image::parse_response(response)
        })
    }
}

impl ImageFetcher for OpenAiClient {
    fn fetch(&self, url: String) -> BoxFuture<'_, Result<FetchedImage, OpenAiError>> {
        Box::pin(async move {
            // Provider-hosted URLs are pre-signed; no bearer token.
            let response = self.http.get(&url).send().await?;

            let status = response.status();
            if !status.is_success() {
                return Err(OpenAiError::Status {
                    status: status.as_u16(),
                    body: format!("image download failed for {url}"),
                });
            }

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string());

            let bytes = response.bytes().await?.to_vec();

            Ok(FetchedImage {
                content_type,
                bytes,
            })
        })
    }
}
