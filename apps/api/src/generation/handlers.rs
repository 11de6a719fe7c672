//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::generation::generator::{generate_image_url, generate_recipes, GenerateResponse};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ImageRequest {
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub image_url: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/recipes/generate
///
/// Generates one recipe per selected meal type from the current session
/// preferences. Only one generation runs at a time; a second submission while
/// one is in flight is rejected instead of queued.
pub async fn handle_generate(
    State(state): State<AppState>,
) -> Result<Json<GenerateResponse>, AppError> {
    let Ok(_in_flight) = state.generation_guard.try_lock() else {
        warn!("Rejected generate request: a generation is already running");
        return Err(AppError::Conflict(
            "A generation is already in progress.".to_string(),
        ));
    };

    // Snapshot first so preference edits during the call do not leak into it.
    let snapshot = state.preferences.lock().await.snapshot();

    let response = generate_recipes(state.gateway.as_ref(), &snapshot).await?;
    Ok(Json(response))
}

/// POST /api/v1/recipes/image
///
/// Best-effort dish photo. Always 200; `image_url` is null when no image
/// could be produced.
pub async fn handle_generate_image(
    State(state): State<AppState>,
    Json(request): Json<ImageRequest>,
) -> Result<Json<ImageResponse>, AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }

    let image_url =
        generate_image_url(state.gateway.as_ref(), &request.title, &request.ingredients).await;

    Ok(Json(ImageResponse { image_url }))
}
