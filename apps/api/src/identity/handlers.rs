//! Axum route handlers for the local identity stub.

use axum::{extract::State, http::StatusCode, Json};

use crate::errors::AppError;
use crate::identity::service::{self, LoginRequest, ProfileUpdate};
use crate::models::user::UserIdentity;
use crate::state::AppState;

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<UserIdentity>, AppError> {
    let identity = service::login(&state.store, &state.preferences, request).await?;
    Ok(Json(identity))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    service::logout(&state.store).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
) -> Result<Json<UserIdentity>, AppError> {
    Ok(Json(service::current_profile(&state.store).await?))
}

/// PUT /api/v1/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserIdentity>, AppError> {
    let identity = service::update_profile(&state.store, &state.preferences, update).await?;
    Ok(Json(identity))
}

/// DELETE /api/v1/profile
///
/// Also deletes every recipe saved under the profile.
pub async fn handle_delete_profile(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    service::delete_profile(&state.store).await?;
    Ok(StatusCode::NO_CONTENT)
}
