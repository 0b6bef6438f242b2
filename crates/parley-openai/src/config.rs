use std::env;
use std::time::Duration;

use crate::error::OpenAiError;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_IMAGE_MODEL: &str = "gpt-image-1";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Connection settings for the completion and image APIs.
#[derive(Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    /// Scheme and host, without the `/v1` suffix.
    pub base_url: String,
    pub chat_model: String,
    pub image_model: String,
    /// Applied per request. A turn makes up to three sequential calls.
    pub timeout: Duration,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("chat_model", &self.chat_model)
            .field("image_model", &self.image_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAiConfig {
    /// Read settings from the process environment.
    ///
    /// | Variable                   | Default                  |
    /// |----------------------------|--------------------------|
    /// | `OPENAI_API_KEY`           | required                 |
    /// | `OPENAI_BASE_URL`          | `https://api.openai.com` |
    /// | `OPENAI_SIMPLE_CHAT_MODEL` | `gpt-4o-mini`            |
    /// | `OPENAI_IMAGE_MODEL`       | `gpt-image-1`            |
    /// | `OPENAI_TIMEOUT_SECS`      | `120`                    |
    pub fn from_env() -> Result<Self, OpenAiError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`OpenAiConfig::from_env`] with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, OpenAiError> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = non_empty("OPENAI_API_KEY")
            .ok_or_else(|| OpenAiError::Config("OPENAI_API_KEY is not configured".to_string()))?;

        let timeout_secs = match non_empty("OPENAI_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                OpenAiError::Config(format!("OPENAI_TIMEOUT_SECS is not a number: {raw}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            base_url: non_empty("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            chat_model: non_empty("OPENAI_SIMPLE_CHAT_MODEL")
                .unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            image_model: non_empty("OPENAI_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Build an endpoint URL, tolerating a base URL that already ends in `/v1`.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if base.ends_with("/v1") {
            format!("{base}/{path}")
        } else {
            format!("{base}/v1/{path}")
        }
    }
}
