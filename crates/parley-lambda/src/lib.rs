//! HTTP surface for project chat.
//!
//! The binary in `main.rs` wires configuration and runs [`router`] under
//! the Lambda runtime; tests drive the same router in-process.

pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::middleware as axum_mw;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = Router::new()
        .route(
            "/projects/{id}/chat/messages",
            post(routes::messages::send_message),
        )
        .route(
            "/projects/{id}/chats",
            get(routes::chats::list_chats).post(routes::chats::create_chat),
        )
        .route(
            "/projects/{id}/instructions",
            get(routes::instructions::get_instructions)
                .put(routes::instructions::update_instructions),
        )
        .route_layer(axum_mw::from_fn(middleware::caller::require_caller));

    Router::new()
        // Health (no caller)
        .route("/health", get(routes::health::health_check))
        .merge(protected)
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
