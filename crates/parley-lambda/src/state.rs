use parley_chat::turn::ChatDeps;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub chat: ChatDeps,
}
