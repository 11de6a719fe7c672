//! Response Normalizer: turns the untrusted model payload into typed recipes.
//!
//! Nothing about the payload is trusted and every field is read leniently.
//! A record is rejected only when it cannot be used at all (not an object, or
//! missing a title, ingredients or steps); everything else is defaulted and the
//! soft problems are flagged on the recipe. Pure transformation: no I/O.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::generation::validation::flag_nutrition;
use crate::models::recipe::{Difficulty, NutritionEntry, Recipe};

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("payload is neither a recipe array nor a recipe object")]
    NotRecipeShaped,

    #[error("payload contains no recipes")]
    Empty,

    #[error("recipe #{index} is malformed: {reason}")]
    MalformedRecipe { index: usize, reason: String },
}

/// Normalizes a raw payload into recipes with fresh ids and `created_at`.
///
/// A count different from `expected_count` is passed through unchanged and
/// only logged.
pub fn normalize(payload: &Value, expected_count: usize) -> Result<Vec<Recipe>, NormalizeError> {
    normalize_at(payload, expected_count, Utc::now())
}

pub fn normalize_at(
    payload: &Value,
    expected_count: usize,
    now: DateTime<Utc>,
) -> Result<Vec<Recipe>, NormalizeError> {
    let records: Vec<&Value> = match payload {
        Value::Array(items) => items.iter().collect(),
        // Single-meal-type answers from older prompts come back as one object.
        Value::Object(_) => vec![payload],
        _ => return Err(NormalizeError::NotRecipeShaped),
    };

    if records.is_empty() {
        return Err(NormalizeError::Empty);
    }

    if records.len() != expected_count {
        warn!(
            "Model returned {} recipe(s) for {} requested meal type(s)",
            records.len(),
            expected_count
        );
    }

    let mut recipes = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let mut recipe = parse_record(index, record, now)?;
        let report = flag_nutrition(&mut recipe);
        if !report.passed() {
            warn!(
                "Recipe '{}' has {}/{} invalid nutrition entries",
                recipe.title, report.invalid, report.total
            );
        }
        recipes.push(recipe);
    }

    Ok(recipes)
}

fn parse_record(index: usize, record: &Value, now: DateTime<Utc>) -> Result<Recipe, NormalizeError> {
    let malformed = |reason: &str| NormalizeError::MalformedRecipe {
        index,
        reason: reason.to_string(),
    };

    let fields = record.as_object().ok_or_else(|| malformed("not an object"))?;

    let title = string_field(fields, "title");
    if title.is_empty() {
        return Err(malformed("missing title"));
    }
    let ingredients = string_list(fields, "ingredients");
    if ingredients.is_empty() {
        return Err(malformed("missing ingredients"));
    }
    let steps = string_list(fields, "steps");
    if steps.is_empty() {
        return Err(malformed("missing steps"));
    }

    let portions = number_field(fields, "portions")
        .filter(|p| p.is_finite() && *p >= 1.0)
        .map(|p| p.round() as u32)
        .unwrap_or(1);

    let meal_type = Some(string_field(fields, "mealType")).filter(|m| !m.is_empty());

    Ok(Recipe {
        id: Uuid::new_v4(),
        title,
        description: string_field(fields, "description"),
        cooking_time: string_field(fields, "cookingTime"),
        portions,
        difficulty: Difficulty::from_loose(&string_field(fields, "difficulty")),
        calories_per_portion: number_field(fields, "caloriesPerPortion")
            .filter(|c| c.is_finite())
            .unwrap_or(0.0),
        ingredients,
        steps,
        chef_tips: string_field(fields, "chefTips"),
        nutritional_details: nutrition_entries(fields),
        image_url: None,
        meal_type,
        created_at: now,
        compliance_warnings: Vec::new(),
    })
}

fn nutrition_entries(fields: &Map<String, Value>) -> Vec<NutritionEntry> {
    let Some(items) = fields.get("nutritionalDetails").and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| match item.as_object() {
            Some(entry) => NutritionEntry {
                ingredient: string_field(entry, "ingredient"),
                details: string_field(entry, "details"),
                // Unreadable calories become 0 so validation flags them.
                calories: number_field(entry, "calories").unwrap_or(0.0),
                value: number_field(entry, "value"),
                unit: Some(string_field(entry, "unit")).filter(|u| !u.is_empty()),
                validation_error: None,
            },
            // Keep stray scalars visible as an invalid row.
            None => NutritionEntry {
                ingredient: scalar_text(item),
                details: String::new(),
                calories: 0.0,
                value: None,
                unit: None,
                validation_error: None,
            },
        })
        .collect()
}

fn string_field(fields: &Map<String, Value>, key: &str) -> String {
    fields.get(key).map(scalar_text).unwrap_or_default()
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Reads a number, accepting numeric strings such as `"450"` or `"450 kcal"`.
fn number_field(fields: &Map<String, Value>, key: &str) -> Option<f64> {
    match fields.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let numeric: String = s
                .trim()
                .chars()
                .take_while(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
                .collect();
            numeric.parse().ok()
        }
        _ => None,
    }
}

fn string_list(fields: &Map<String, Value>, key: &str) -> Vec<String> {
    match fields.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .map(scalar_text)
            .filter(|s| !s.is_empty())
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}
