use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

pub mod chats;
pub mod health;
pub mod instructions;
pub mod messages;

/// Decode an optional JSON body. An empty body yields `T::default()`.
fn json_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::BadRequest(e.to_string()))
}
