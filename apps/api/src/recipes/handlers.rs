//! Axum route handlers for saved recipes.
//!
//! Every handler works on the collection of the active scope: the signed-in
//! identity, or the guest collection when nobody is signed in.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::validation::flag_nutrition;
use crate::models::recipe::Recipe;
use crate::recipes::reconciler::SaveOutcome;
use crate::recipes::share::share_text;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SavedRecipeResponse {
    pub recipe: Recipe,
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub title: String,
    pub text: String,
}

/// GET /api/v1/recipes
pub async fn handle_list_recipes(
    State(state): State<AppState>,
) -> Result<Json<Vec<Recipe>>, AppError> {
    let scope = state.store.active_scope().await?;
    Ok(Json(state.store.collection(scope).await?))
}

/// POST /api/v1/recipes
///
/// Saves or updates a recipe. A recipe whose id or title is already saved
/// replaces that entry and keeps its id. 201 on insert, 200 on replace.
///
/// Nutrition validity flags are recomputed; client-sent flags are ignored.
pub async fn handle_save_recipe(
    State(state): State<AppState>,
    Json(mut recipe): Json<Recipe>,
) -> Result<(StatusCode, Json<SavedRecipeResponse>), AppError> {
    if recipe.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    flag_nutrition(&mut recipe);

    let scope = state.store.active_scope().await?;
    let (recipe, outcome, recipes) = state.store.save_recipe(scope, recipe).await?;
    info!("Recipe '{}' saved to {:?} ({:?})", recipe.title, scope, outcome);

    let status = match outcome {
        SaveOutcome::Inserted => StatusCode::CREATED,
        SaveOutcome::Replaced => StatusCode::OK,
    };
    Ok((status, Json(SavedRecipeResponse { recipe, recipes })))
}

/// DELETE /api/v1/recipes/:id
///
/// Idempotent: deleting an unknown id returns the unchanged collection.
pub async fn handle_delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Recipe>>, AppError> {
    let scope = state.store.active_scope().await?;
    Ok(Json(state.store.delete_recipe(scope, id).await?))
}

/// GET /api/v1/recipes/:id/share
pub async fn handle_share_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ShareResponse>, AppError> {
    let scope = state.store.active_scope().await?;
    let recipe = state
        .store
        .collection(scope)
        .await?
        .into_iter()
        .find(|r| r.id == id)
        .ok_or_else(|| AppError::NotFound(format!("recipe {id}")))?;

    Ok(Json(ShareResponse {
        text: share_text(&recipe),
        title: recipe.title,
    }))
}
