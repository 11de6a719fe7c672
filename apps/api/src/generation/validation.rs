use serde::Serialize;

use crate::models::recipe::{NutritionEntry, Recipe};

pub const NON_POSITIVE_CALORIES: &str = "calories must be a positive number";
pub const MISSING_DETAILS: &str = "details must not be empty";

/// Per-recipe tally of nutrition entry validity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NutritionReport {
    pub total: usize,
    pub invalid: usize,
}

impl NutritionReport {
    pub fn passed(&self) -> bool {
        self.invalid == 0
    }
}

/// Checks a single nutrition entry.
///
/// PASS conditions:
/// - `calories` is a finite number greater than zero
/// - `details` has non-whitespace content
///
/// Returns the first failing rule, `None` when the entry is valid.
pub fn nutrition_issue(entry: &NutritionEntry) -> Option<&'static str> {
    if !(entry.calories.is_finite() && entry.calories > 0.0) {
        return Some(NON_POSITIVE_CALORIES);
    }
    if entry.details.trim().is_empty() {
        return Some(MISSING_DETAILS);
    }
    None
}

/// Flags every nutrition entry of a recipe in place. Nothing is removed.
pub fn flag_nutrition(recipe: &mut Recipe) -> NutritionReport {
    let mut report = NutritionReport {
        total: recipe.nutritional_details.len(),
        invalid: 0,
    };
    for entry in &mut recipe.nutritional_details {
        entry.validation_error = nutrition_issue(entry).map(str::to_string);
        if entry.validation_error.is_some() {
            report.invalid += 1;
        }
    }
    report
}
