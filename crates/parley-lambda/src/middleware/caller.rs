use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::error::ApiError;

/// Header carrying the authenticated user id, set by the upstream authorizer.
pub const CALLER_HEADER: &str = "x-parley-caller";

/// Identity of the user making the request.
#[derive(Clone, Copy, Debug)]
pub struct Caller {
    pub id: Uuid,
}

/// Reads [`CALLER_HEADER`] and inserts a [`Caller`] into request extensions.
///
/// Token validation happens before requests reach this service; a missing
/// or malformed header is rejected outright.
pub async fn require_caller(mut req: Request, next: Next) -> Result<Response, ApiError> {
    let id = req
        .headers()
        .get(CALLER_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or_else(|| ApiError::Unauthorized("missing or invalid caller".to_string()))?;

    req.extensions_mut().insert(Caller { id });

    Ok(next.run(req).await)
}
