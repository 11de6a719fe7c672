//! Recipe Generation: orchestrates the full generation pipeline.
//!
//! Flow: snapshot → compile → gateway.generate → normalize → compliance scan.
//!
//! All-or-nothing: either every returned recipe is usable or the call fails.
//! Nothing here persists; saving is an explicit, separate user action.

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::compiler::compile;
use crate::generation::compliance::check_compliance;
use crate::generation::gateway::RecipeGateway;
use crate::generation::normalizer::normalize;
use crate::models::recipe::Recipe;
use crate::preferences::model::PreferenceSnapshot;

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub recipes: Vec<Recipe>,
    pub requested_count: usize,
    /// True when the model returned a different number of recipes than meal types.
    pub count_mismatch: bool,
}

/// Runs the generation pipeline for one preference snapshot.
///
/// Steps:
/// 1. reject an empty ingredient selection
/// 2. compile() → GenerationRequest
/// 3. gateway.generate() → raw payload (single attempt)
/// 4. normalize() → Vec<Recipe> with fresh ids and flagged nutrition
/// 5. check_compliance() → advisory warnings attached per recipe
pub async fn generate_recipes(
    gateway: &dyn RecipeGateway,
    snapshot: &PreferenceSnapshot,
) -> Result<GenerateResponse, AppError> {
    if snapshot.ingredients.is_empty() {
        return Err(AppError::Validation(
            "Select at least one ingredient before generating.".to_string(),
        ));
    }

    let request = compile(snapshot);
    info!(
        "Generating {} recipe(s) from {} ingredient(s)",
        request.expected_count,
        snapshot.ingredients.len()
    );

    let payload = gateway.generate(&request).await?;

    let mut recipes = normalize(&payload, request.expected_count).map_err(|e| {
        warn!("Discarding unusable model payload: {e}");
        AppError::Generation {
            message: e.to_string(),
            needs_credentials: false,
        }
    })?;

    for recipe in &mut recipes {
        recipe.compliance_warnings =
            check_compliance(recipe, &snapshot.allergens, &snapshot.avoid_ingredients);
        for warning in &recipe.compliance_warnings {
            warn!(
                "Recipe '{}' may contain excluded item '{}' ({:?}) in '{}'",
                recipe.title, warning.term, warning.kind, warning.ingredient
            );
        }
    }

    info!("Generated {} recipe(s)", recipes.len());

    Ok(GenerateResponse {
        count_mismatch: recipes.len() != request.expected_count,
        requested_count: request.expected_count,
        recipes,
    })
}

/// Best-effort dish photo as a `data:` URL. `None` on any failure.
pub async fn generate_image_url(
    gateway: &dyn RecipeGateway,
    title: &str,
    ingredients: &[String],
) -> Option<String> {
    gateway
        .generate_image(title, ingredients)
        .await
        .map(|image| image.to_data_url())
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use serde_json::json;

    use super::*;
    use crate::generation::gateway::testing::ScriptedGateway;
    use crate::generation::gateway::GenerationError;
    use crate::llm_client::GeneratedImage;
    use crate::models::recipe::ComplianceKind;
    use crate::preferences::model::{PreferenceAction, PreferenceModel};

    fn chicken_and_rice() -> PreferenceSnapshot {
        let mut model = PreferenceModel::default();
        model.toggle_ingredient("Chicken breast").unwrap();
        model.toggle_ingredient("Rice").unwrap();
        model
            .apply(PreferenceAction::ToggleAllergen {
                name: "Gluten-free".to_string(),
            })
            .unwrap();
        model
            .apply(PreferenceAction::SetPortions { portions: 2 })
            .unwrap();
        model.snapshot()
    }

    fn pilaf() -> serde_json::Value {
        json!({
            "title": "Chicken pilaf",
            "description": "Rice and chicken, Satu Mare style",
            "cookingTime": "25 minutes",
            "portions": 2,
            "difficulty": "easy",
            "caloriesPerPortion": 540,
            "mealType": "Lunch or Dinner",
            "ingredients": ["300 g chicken breast", "200 g rice"],
            "steps": ["Brown the chicken.", "Simmer with the rice."],
            "chefTips": "Rinse the rice first."
        })
    }

    #[tokio::test]
    async fn test_end_to_end_single_recipe() {
        let gateway = ScriptedGateway::answering(Ok(json!([pilaf()])));
        let snapshot = chicken_and_rice();
        assert_eq!(snapshot.meal_types.len(), 1);

        let before = chrono::Utc::now();
        let response = generate_recipes(&gateway, &snapshot).await.unwrap();

        assert_eq!(response.requested_count, 1);
        assert!(!response.count_mismatch);
        assert_eq!(response.recipes.len(), 1);
        let recipe = &response.recipes[0];
        assert!(!recipe.id.is_nil());
        assert!(recipe.created_at >= before);
        assert!(recipe.compliance_warnings.is_empty());

        let requests = gateway.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].prompt.contains("Chicken breast, Rice"));
        assert!(requests[0].prompt.contains("must not contain: Gluten-free"));
        assert!(requests[0].prompt.contains("PORTIONS: 2."));
    }

    #[tokio::test]
    async fn test_empty_ingredients_rejected_before_any_call() {
        let gateway = ScriptedGateway::answering(Ok(json!([pilaf()])));
        let snapshot = PreferenceModel::default().snapshot();

        let result = generate_recipes(&gateway, &snapshot).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_count_mismatch_is_reported_not_fixed() {
        let gateway = ScriptedGateway::answering(Ok(json!([pilaf(), pilaf()])));
        let response = generate_recipes(&gateway, &chicken_and_rice()).await.unwrap();
        assert_eq!(response.recipes.len(), 2);
        assert!(response.count_mismatch);
    }

    #[tokio::test]
    async fn test_unusable_payload_is_a_generation_failure() {
        let gateway = ScriptedGateway::answering(Ok(json!([])));
        let result = generate_recipes(&gateway, &chicken_and_rice()).await;
        assert!(matches!(
            result,
            Err(AppError::Generation {
                needs_credentials: false,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_credential_failure_carries_hint() {
        let gateway = ScriptedGateway::answering(Err(GenerationError::Configuration(
            "API key not valid".to_string(),
        )));
        let result = generate_recipes(&gateway, &chicken_and_rice()).await;
        assert!(matches!(
            result,
            Err(AppError::Generation {
                needs_credentials: true,
                ..
            })
        ));
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_compliance_warnings_are_attached() {
        let mut tainted = pilaf();
        tainted["ingredients"] = json!(["300 g chicken breast", "2 tbsp gluten flour"]);
        let gateway = ScriptedGateway::answering(Ok(json!([tainted])));

        let response = generate_recipes(&gateway, &chicken_and_rice()).await.unwrap();

        let warnings = &response.recipes[0].compliance_warnings;
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, ComplianceKind::Allergen);
    }

    #[tokio::test]
    async fn test_image_url_is_data_url() {
        let gateway = ScriptedGateway::default().with_image(GeneratedImage {
            mime_type: "image/png".to_string(),
            bytes: Bytes::from_static(b"abc"),
        });
        let url = generate_image_url(&gateway, "Chicken pilaf", &[]).await;
        assert_eq!(url.as_deref(), Some("data:image/png;base64,YWJj"));
    }

    #[tokio::test]
    async fn test_missing_image_is_none() {
        let gateway = ScriptedGateway::default();
        assert!(generate_image_url(&gateway, "Chicken pilaf", &[])
            .await
            .is_none());
    }
}
