//! HTTP route handlers: health, game creation, status, answers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::error;

use super::SharedState;
use crate::circuit::{ComplexityType, Difficulty};
use crate::error::{AppError, StoreError};

/// Construct a JSON error response with the given status code and message.
fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({"error": message}))).into_response()
}

/// Fallback handler for unmatched routes.
pub(crate) async fn handle_not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "not found")
}

/// GET /health
pub(crate) async fn handle_health() -> Response {
    let response = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(response)).into_response()
}

/// POST /api/v1/games/logic
#[derive(Debug, Deserialize)]
pub(crate) struct CreateGameRequest {
    difficulty: Difficulty,
    #[serde(default)]
    complexity_type: Option<ComplexityType>,
}

pub(crate) async fn handle_create_game(
    State(state): State<SharedState>,
    Json(request): Json<CreateGameRequest>,
) -> Response {
    match state
        .engine
        .create_game(request.difficulty, request.complexity_type)
        .await
    {
        Ok(created) => (StatusCode::OK, Json(created)).into_response(),
        Err(e) => {
            error!(error = %e, "Game creation failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to create game")
        }
    }
}

/// GET /api/v1/games/logic/{game_id}
pub(crate) async fn handle_game_status(
    State(state): State<SharedState>,
    Path(game_id): Path<String>,
) -> Response {
    match state.engine.game_status(&game_id).await {
        Ok(Some(status)) => (StatusCode::OK, Json(status)).into_response(),
        Ok(None) => json_error(StatusCode::NOT_FOUND, "game not found"),
        Err(e) => {
            error!(error = %e, game_id = %game_id, "Status lookup failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch game")
        }
    }
}

/// POST /api/v1/games/logic/{game_id}/answer
///
/// The body must be a JSON object carrying an `answer` member; anything
/// inside `answer` is handed to the evaluator, whose tolerant coercion
/// turns malformed moves into zero-score results rather than errors.
pub(crate) async fn handle_submit_answer(
    State(state): State<SharedState>,
    Path(game_id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let answer = match body.get("answer") {
        Some(answer) => answer.clone(),
        None => return json_error(StatusCode::BAD_REQUEST, "missing 'answer' field"),
    };

    match state.engine.submit_answer(&game_id, answer).await {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(AppError::Store(StoreError::SessionNotFound { .. })) => {
            json_error(StatusCode::NOT_FOUND, "game not found")
        }
        Err(e) => {
            error!(error = %e, game_id = %game_id, "Answer submission failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "failed to submit answer")
        }
    }
}
