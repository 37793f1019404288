//! HTTP route trees.

use axum::Router;

use crate::state::SharedState;

/// Swagger UI.
pub mod docs;
/// Quiz generation and game history routes.
pub mod game;
/// Health routes.
pub mod health;
/// Playlist routes.
pub mod playlist;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(playlist::router())
        .merge(game::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
