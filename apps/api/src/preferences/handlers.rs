//! Axum route handlers for the catalog and the session preference model.

use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::preferences::catalog::{build_catalog, Catalog};
use crate::preferences::model::{PreferenceAction, PreferenceSnapshot};
use crate::state::AppState;

/// GET /api/v1/catalog
pub async fn handle_catalog() -> Json<Catalog> {
    Json(build_catalog())
}

/// GET /api/v1/preferences
pub async fn handle_get_preferences(State(state): State<AppState>) -> Json<PreferenceSnapshot> {
    Json(state.preferences.lock().await.snapshot())
}

/// POST /api/v1/preferences
///
/// Applies one mutation and returns the resulting snapshot. A rejected
/// mutation leaves the model untouched.
pub async fn handle_update_preferences(
    State(state): State<AppState>,
    Json(action): Json<PreferenceAction>,
) -> Result<Json<PreferenceSnapshot>, AppError> {
    let mut preferences = state.preferences.lock().await;
    preferences.apply(action)?;
    Ok(Json(preferences.snapshot()))
}
