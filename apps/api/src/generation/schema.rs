//! Structured output schema sent with every recipe generation call.
//!
//! Uses the provider's OpenAPI-style schema dialect (upper-case type names).
//! `nutritionalDetails` is always described but not required, so a model that
//! omits it still produces a schema-valid answer.

use serde_json::{json, Value};

/// Fields every generated recipe object must carry.
pub const REQUIRED_RECIPE_FIELDS: &[&str] = &[
    "title",
    "description",
    "cookingTime",
    "ingredients",
    "steps",
    "chefTips",
    "portions",
    "difficulty",
    "caloriesPerPortion",
    "mealType",
];

pub const DIFFICULTY_VALUES: &[&str] = &["easy", "medium"];

/// Schema for the whole batch: an array of recipe objects.
pub fn recipe_batch_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": recipe_schema(),
    })
}

fn recipe_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "description": { "type": "STRING" },
            "cookingTime": { "type": "STRING" },
            "portions": { "type": "NUMBER" },
            "difficulty": { "type": "STRING", "enum": DIFFICULTY_VALUES },
            "caloriesPerPortion": { "type": "NUMBER" },
            "mealType": { "type": "STRING" },
            "ingredients": { "type": "ARRAY", "items": { "type": "STRING" } },
            "steps": { "type": "ARRAY", "items": { "type": "STRING" } },
            "chefTips": { "type": "STRING" },
            "nutritionalDetails": {
                "type": "ARRAY",
                "items": nutrition_entry_schema(),
            },
        },
        "required": REQUIRED_RECIPE_FIELDS,
    })
}

fn nutrition_entry_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "ingredient": { "type": "STRING" },
            "details": { "type": "STRING" },
            "calories": { "type": "NUMBER" },
            "value": { "type": "NUMBER" },
            "unit": { "type": "STRING" },
        },
        "required": ["ingredient", "details", "calories"],
    })
}
