//! HTTP JSON API for the circuit game engine.
//!
//! Endpoints:
//! - `GET  /health`                               - server status
//! - `POST /api/v1/games/logic`                   - create a game
//! - `GET  /api/v1/games/logic/{game_id}`         - session state
//! - `POST /api/v1/games/logic/{game_id}/answer`  - submit an answer
//!
//! All responses use Content-Type: application/json; errors are
//! `{"error": message}` bodies. CORS is permissive for local dev.

mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::engine::GameEngine;

/// Application state shared across handlers.
pub struct AppState {
    /// The game engine.
    pub engine: GameEngine,
}

/// Shared application state handle
pub type SharedState = Arc<AppState>;

/// Build the API router over the shared state.
pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::handle_health))
        .route("/api/v1/games/logic", post(handlers::handle_create_game))
        .route(
            "/api/v1/games/logic/{game_id}",
            get(handlers::handle_game_status),
        )
        .route(
            "/api/v1/games/logic/{game_id}/answer",
            post(handlers::handle_submit_answer),
        )
        .fallback(handlers::handle_not_found)
        .layer(cors)
        .with_state(state)
}
