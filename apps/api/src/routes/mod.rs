pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::identity::handlers as identity;
use crate::preferences::handlers as preferences;
use crate::recipes::handlers as recipes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Preferences
        .route("/api/v1/catalog", get(preferences::handle_catalog))
        .route(
            "/api/v1/preferences",
            get(preferences::handle_get_preferences).post(preferences::handle_update_preferences),
        )
        // Generation
        .route("/api/v1/recipes/generate", post(generation::handle_generate))
        .route(
            "/api/v1/recipes/image",
            post(generation::handle_generate_image),
        )
        // Saved recipes
        .route(
            "/api/v1/recipes",
            get(recipes::handle_list_recipes).post(recipes::handle_save_recipe),
        )
        .route("/api/v1/recipes/:id", delete(recipes::handle_delete_recipe))
        .route(
            "/api/v1/recipes/:id/share",
            get(recipes::handle_share_recipe),
        )
        // Identity
        .route("/api/v1/auth/login", post(identity::handle_login))
        .route("/api/v1/auth/logout", post(identity::handle_logout))
        .route(
            "/api/v1/profile",
            get(identity::handle_get_profile)
                .put(identity::handle_update_profile)
                .delete(identity::handle_delete_profile),
        )
        .with_state(state)
}
