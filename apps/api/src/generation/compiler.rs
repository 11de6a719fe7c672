//! Prompt Compiler: maps a preference snapshot to a generation request.
//!
//! Pure and deterministic: the same snapshot always yields the same request.
//! Callers must reject an empty ingredient list before compiling.

use serde_json::Value;

use crate::generation::prompts::{
    ADULT_AUDIENCE, ALLERGEN_CLAUSE, AUDIENCE_LINE, AVOID_CLAUSE, CHILD_AUDIENCE,
    COOKING_METHOD_CLAUSE, HIDE_VEGGIES_INSTRUCTION, INGREDIENTS_LINE, MEAL_TYPES_LINE,
    OUTPUT_REMINDER, PORTIONS_LINE, RECIPE_SYSTEM, SPICES_CLAUSE, TIME_LIMIT_LINE,
    TIME_LIMIT_MINUTES,
};
use crate::generation::schema::recipe_batch_schema;
use crate::llm_client::prompts::JSON_ARRAY_ONLY_SYSTEM;
use crate::preferences::model::{CookingMethod, PreferenceSnapshot};

/// Everything the gateway needs for one generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub prompt: String,
    pub response_schema: Value,
    /// One recipe per selected meal type.
    pub expected_count: usize,
}

pub fn compile(snapshot: &PreferenceSnapshot) -> GenerationRequest {
    let meal_types = snapshot
        .meal_types
        .iter()
        .map(|m| m.label())
        .collect::<Vec<_>>()
        .join(", ");
    let expected_count = snapshot.meal_types.len();

    let mut lines = vec![
        MEAL_TYPES_LINE
            .replace("{meal_types}", &meal_types)
            .replace("{recipe_count}", &expected_count.to_string()),
        INGREDIENTS_LINE.replace("{ingredients}", &snapshot.ingredients.join(", ")),
    ];

    if !snapshot.spices.is_empty() {
        lines.push(SPICES_CLAUSE.replace("{spices}", &snapshot.spices.join(", ")));
    }
    if let Some(clause) = avoid_clause(&snapshot.avoid_ingredients) {
        lines.push(clause);
    }
    if let Some(clause) = allergen_clause(&snapshot.allergens) {
        lines.push(clause);
    }
    if snapshot.cooking_method != CookingMethod::Any {
        lines.push(COOKING_METHOD_CLAUSE.replace("{method}", snapshot.cooking_method.label()));
    }

    lines.push(AUDIENCE_LINE.replace("{audience}", &target_audience(snapshot)));
    lines.push(PORTIONS_LINE.replace("{portions}", &snapshot.portions.to_string()));
    lines.push(TIME_LIMIT_LINE.replace("{minutes}", &TIME_LIMIT_MINUTES.to_string()));
    lines.push(String::new());
    lines.push(OUTPUT_REMINDER.to_string());

    GenerationRequest {
        system_instruction: format!("{RECIPE_SYSTEM} {JSON_ARRAY_ONLY_SYSTEM}"),
        prompt: lines.join("\n"),
        response_schema: recipe_batch_schema(),
        expected_count,
    }
}

fn target_audience(snapshot: &PreferenceSnapshot) -> String {
    if !snapshot.age_group.is_child() {
        return ADULT_AUDIENCE.to_string();
    }
    let mut audience = CHILD_AUDIENCE.replace("{bracket}", snapshot.age_group.bracket());
    if snapshot.hide_veggies {
        audience.push_str(HIDE_VEGGIES_INSTRUCTION);
    }
    audience
}

/// Splits the comma-separated avoid text; `None` when nothing is left.
fn avoid_clause(avoid_text: &str) -> Option<String> {
    let items = split_avoid_list(avoid_text);
    if items.is_empty() {
        return None;
    }
    Some(AVOID_CLAUSE.replace("{avoid}", &items.join(", ")))
}

fn allergen_clause(allergens: &[String]) -> Option<String> {
    if allergens.is_empty() {
        return None;
    }
    Some(ALLERGEN_CLAUSE.replace("{allergens}", &allergens.join(", ")))
}

pub fn split_avoid_list(avoid_text: &str) -> Vec<&str> {
    avoid_text
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
