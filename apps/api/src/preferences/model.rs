//! Preference Model: the session's generation constraints.
//!
//! Enumerated domains are strong types, so an out-of-domain age group or meal
//! type is rejected when the request body is deserialized and never reaches
//! here. The remaining runtime rules are enforced by the mutation methods:
//! - `meal_types` is never empty
//! - `portions` stays within `MIN_PORTIONS..=MAX_PORTIONS`
//! - `avoid_ingredients` only carries the safe character class

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::user::ProfilePreferences;

pub const MIN_PORTIONS: u8 = 1;
pub const MAX_PORTIONS: u8 = 10;
const DEFAULT_PORTIONS: u8 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "1-3")]
    Toddler,
    #[serde(rename = "4-8")]
    SchoolChild,
    #[serde(rename = "9-13")]
    PreTeen,
    #[default]
    #[serde(rename = "adult")]
    Adult,
}

impl AgeGroup {
    pub fn is_child(self) -> bool {
        self != AgeGroup::Adult
    }

    /// Age bracket as shown to the model, e.g. `4-8`.
    pub fn bracket(self) -> &'static str {
        match self {
            AgeGroup::Toddler => "1-3",
            AgeGroup::SchoolChild => "4-8",
            AgeGroup::PreTeen => "9-13",
            AgeGroup::Adult => "adult",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    LunchDinner,
    Snack,
    Smoothie,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CookingMethod {
    #[default]
    Any,
    Stovetop,
    Oven,
    Pressure,
    Airfryer,
    Drycooker,
    Grill,
}

#[derive(Debug, Error, PartialEq)]
pub enum PreferenceError {
    #[error("At least one meal type must stay selected")]
    LastMealType,

    #[error("{0} cannot be empty")]
    EmptyValue(&'static str),
}

/// Read-only view handed to the prompt compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceSnapshot {
    /// Selected ingredients, in selection order.
    pub ingredients: Vec<String>,
    pub custom_ingredients: Vec<String>,
    pub age_group: AgeGroup,
    pub meal_types: Vec<MealType>,
    pub cooking_method: CookingMethod,
    pub hide_veggies: bool,
    pub portions: u8,
    pub avoid_ingredients: String,
    pub allergens: Vec<String>,
    pub spices: Vec<String>,
}

/// A single mutation, as posted by the client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PreferenceAction {
    ToggleIngredient { name: String },
    AddCustomIngredient { name: String },
    RemoveCustomIngredient { name: String },
    ToggleMealType { meal_type: MealType },
    SetAgeGroup { age_group: AgeGroup },
    SetCookingMethod { cooking_method: CookingMethod },
    SetHideVeggies { hide_veggies: bool },
    SetPortions { portions: i64 },
    SetAvoidIngredients { text: String },
    ToggleAllergen { name: String },
    AddAllergen { name: String },
    RemoveAllergen { name: String },
    ToggleSpice { name: String },
    Reset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceModel {
    state: PreferenceSnapshot,
}

impl Default for PreferenceModel {
    fn default() -> Self {
        Self {
            state: PreferenceSnapshot {
                ingredients: Vec::new(),
                custom_ingredients: Vec::new(),
                age_group: AgeGroup::Adult,
                meal_types: vec![MealType::LunchDinner],
                cooking_method: CookingMethod::Any,
                hide_veggies: false,
                portions: DEFAULT_PORTIONS,
                avoid_ingredients: String::new(),
                allergens: Vec::new(),
                spices: Vec::new(),
            },
        }
    }
}

impl PreferenceModel {
    pub fn snapshot(&self) -> PreferenceSnapshot {
        self.state.clone()
    }

    pub fn apply(&mut self, action: PreferenceAction) -> Result<(), PreferenceError> {
        match action {
            PreferenceAction::ToggleIngredient { name } => self.toggle_ingredient(&name),
            PreferenceAction::AddCustomIngredient { name } => self.add_custom_ingredient(&name),
            PreferenceAction::RemoveCustomIngredient { name } => {
                self.remove_custom_ingredient(&name);
                Ok(())
            }
            PreferenceAction::ToggleMealType { meal_type } => self.toggle_meal_type(meal_type),
            PreferenceAction::SetAgeGroup { age_group } => {
                self.state.age_group = age_group;
                Ok(())
            }
            PreferenceAction::SetCookingMethod { cooking_method } => {
                self.state.cooking_method = cooking_method;
                Ok(())
            }
            PreferenceAction::SetHideVeggies { hide_veggies } => {
                self.state.hide_veggies = hide_veggies;
                Ok(())
            }
            PreferenceAction::SetPortions { portions } => {
                self.set_portions(portions);
                Ok(())
            }
            PreferenceAction::SetAvoidIngredients { text } => {
                self.set_avoid_ingredients(&text);
                Ok(())
            }
            PreferenceAction::ToggleAllergen { name } => {
                let name = non_empty(&name, "Allergen")?;
                toggle(&mut self.state.allergens, name);
                Ok(())
            }
            PreferenceAction::AddAllergen { name } => {
                let name = non_empty(&name, "Allergen")?;
                insert(&mut self.state.allergens, name);
                Ok(())
            }
            PreferenceAction::RemoveAllergen { name } => {
                self.state.allergens.retain(|a| a != name.trim());
                Ok(())
            }
            PreferenceAction::ToggleSpice { name } => {
                let name = non_empty(&name, "Spice")?;
                toggle(&mut self.state.spices, name);
                Ok(())
            }
            PreferenceAction::Reset => {
                *self = Self::default();
                Ok(())
            }
        }
    }

    pub fn toggle_ingredient(&mut self, name: &str) -> Result<(), PreferenceError> {
        let name = non_empty(name, "Ingredient")?;
        toggle(&mut self.state.ingredients, name);
        Ok(())
    }

    /// Adds a custom ingredient and selects it in the same step.
    pub fn add_custom_ingredient(&mut self, name: &str) -> Result<(), PreferenceError> {
        let name = non_empty(name, "Ingredient")?;
        if !self.state.custom_ingredients.iter().any(|c| c == name) {
            self.state.custom_ingredients.push(name.to_string());
            insert(&mut self.state.ingredients, name);
        }
        Ok(())
    }

    /// Drops a custom ingredient and deselects it.
    pub fn remove_custom_ingredient(&mut self, name: &str) {
        let name = name.trim();
        self.state.custom_ingredients.retain(|c| c != name);
        self.state.ingredients.retain(|i| i != name);
    }

    /// Rejects removal of the last selected meal type.
    pub fn toggle_meal_type(&mut self, meal_type: MealType) -> Result<(), PreferenceError> {
        if let Some(pos) = self.state.meal_types.iter().position(|m| *m == meal_type) {
            if self.state.meal_types.len() == 1 {
                return Err(PreferenceError::LastMealType);
            }
            self.state.meal_types.remove(pos);
        } else {
            self.state.meal_types.push(meal_type);
        }
        Ok(())
    }

    pub fn set_portions(&mut self, portions: i64) {
        self.state.portions = portions.clamp(MIN_PORTIONS as i64, MAX_PORTIONS as i64) as u8;
    }

    pub fn set_avoid_ingredients(&mut self, text: &str) {
        self.state.avoid_ingredients = sanitize_avoid_text(text);
    }

    /// Replaces the allergen and avoid defaults with the ones stored on a profile.
    pub fn seed_from_profile(&mut self, preferences: &ProfilePreferences) {
        self.state.allergens.clear();
        for allergen in &preferences.allergens {
            if let Ok(name) = non_empty(allergen, "Allergen") {
                insert(&mut self.state.allergens, name);
            }
        }
        self.set_avoid_ingredients(&preferences.avoid_ingredients);
    }
}

/// Keeps letters (diacritics included), digits, space, comma, period and hyphen.
pub fn sanitize_avoid_text(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | ',' | '.' | '-'))
        .collect()
}

fn non_empty<'a>(value: &'a str, what: &'static str) -> Result<&'a str, PreferenceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PreferenceError::EmptyValue(what));
    }
    Ok(value)
}

fn toggle(values: &mut Vec<String>, value: &str) {
    if let Some(pos) = values.iter().position(|v| v == value) {
        values.remove(pos);
    } else {
        values.push(value.to_string());
    }
}

fn insert(values: &mut Vec<String>, value: &str) {
    if !values.iter().any(|v| v == value) {
        values.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_one_meal_type() {
        let snapshot = PreferenceModel::default().snapshot();
        assert_eq!(snapshot.meal_types, vec![MealType::LunchDinner]);
        assert_eq!(snapshot.portions, 2);
        assert_eq!(snapshot.age_group, AgeGroup::Adult);
    }

    #[test]
    fn test_toggle_ingredient_twice_restores_state() {
        let mut model = PreferenceModel::default();
        model.toggle_ingredient("Rice").unwrap();
        let before = model.clone();
        model.toggle_ingredient("Chicken breast").unwrap();
        model.toggle_ingredient("Chicken breast").unwrap();
        assert_eq!(model, before);
    }

    #[test]
    fn test_toggle_ingredient_rejects_blank() {
        let mut model = PreferenceModel::default();
        assert_eq!(
            model.toggle_ingredient("   "),
            Err(PreferenceError::EmptyValue("Ingredient"))
        );
    }

    #[test]
    fn test_cannot_remove_last_meal_type() {
        let mut model = PreferenceModel::default();
        assert_eq!(
            model.toggle_meal_type(MealType::LunchDinner),
            Err(PreferenceError::LastMealType)
        );
        assert_eq!(model.snapshot().meal_types, vec![MealType::LunchDinner]);
    }

    #[test]
    fn test_meal_type_toggle_adds_and_removes() {
        let mut model = PreferenceModel::default();
        model.toggle_meal_type(MealType::Breakfast).unwrap();
        model.toggle_meal_type(MealType::Smoothie).unwrap();
        assert_eq!(model.snapshot().meal_types.len(), 3);
        model.toggle_meal_type(MealType::LunchDinner).unwrap();
        assert_eq!(
            model.snapshot().meal_types,
            vec![MealType::Breakfast, MealType::Smoothie]
        );
    }

    #[test]
    fn test_custom_ingredient_is_selected_and_removed_together() {
        let mut model = PreferenceModel::default();
        model.add_custom_ingredient(" Quinoa ").unwrap();
        let snapshot = model.snapshot();
        assert_eq!(snapshot.custom_ingredients, vec!["Quinoa"]);
        assert_eq!(snapshot.ingredients, vec!["Quinoa"]);

        model.remove_custom_ingredient("Quinoa");
        let snapshot = model.snapshot();
        assert!(snapshot.custom_ingredients.is_empty());
        assert!(snapshot.ingredients.is_empty());
    }

    #[test]
    fn test_adding_existing_custom_ingredient_is_noop() {
        let mut model = PreferenceModel::default();
        model.add_custom_ingredient("Quinoa").unwrap();
        model.add_custom_ingredient("Quinoa").unwrap();
        assert_eq!(model.snapshot().ingredients.len(), 1);
    }

    #[test]
    fn test_portions_are_clamped() {
        let mut model = PreferenceModel::default();
        model.set_portions(0);
        assert_eq!(model.snapshot().portions, MIN_PORTIONS);
        model.set_portions(42);
        assert_eq!(model.snapshot().portions, MAX_PORTIONS);
        model.set_portions(4);
        assert_eq!(model.snapshot().portions, 4);
    }

    #[test]
    fn test_avoid_text_strips_markup() {
        assert_eq!(
            sanitize_avoid_text("nuts, <script>alert(1)</script>"),
            "nuts, scriptalert1script"
        );
    }

    #[test]
    fn test_avoid_text_keeps_diacritics_and_punctuation() {
        let text = "ceapă, țelină, usturoi-verde, 2.5 ardei";
        assert_eq!(sanitize_avoid_text(text), text);
    }

    #[test]
    fn test_set_avoid_ingredients_stores_sanitized_text() {
        let mut model = PreferenceModel::default();
        model.set_avoid_ingredients("nuts; <b>garlic</b>");
        assert_eq!(model.snapshot().avoid_ingredients, "nuts bgarlicb");
    }

    #[test]
    fn test_allergen_actions() {
        let mut model = PreferenceModel::default();
        model
            .apply(PreferenceAction::ToggleAllergen {
                name: "Gluten-free".to_string(),
            })
            .unwrap();
        model
            .apply(PreferenceAction::AddAllergen {
                name: "Kiwi".to_string(),
            })
            .unwrap();
        model
            .apply(PreferenceAction::AddAllergen {
                name: "Kiwi".to_string(),
            })
            .unwrap();
        assert_eq!(model.snapshot().allergens, vec!["Gluten-free", "Kiwi"]);

        model
            .apply(PreferenceAction::RemoveAllergen {
                name: "Kiwi".to_string(),
            })
            .unwrap();
        assert_eq!(model.snapshot().allergens, vec!["Gluten-free"]);
    }

    #[test]
    fn test_seed_from_profile_replaces_allergens_and_avoid() {
        let mut model = PreferenceModel::default();
        model.toggle_ingredient("Rice").unwrap();
        model
            .apply(PreferenceAction::AddAllergen {
                name: "Egg-free".to_string(),
            })
            .unwrap();

        model.seed_from_profile(&ProfilePreferences {
            allergens: vec!["Nut-free".to_string(), " ".to_string()],
            avoid_ingredients: "celery<>".to_string(),
        });

        let snapshot = model.snapshot();
        assert_eq!(snapshot.allergens, vec!["Nut-free"]);
        assert_eq!(snapshot.avoid_ingredients, "celery");
        assert_eq!(snapshot.ingredients, vec!["Rice"]);
    }

    #[test]
    fn test_action_deserialization() {
        let action: PreferenceAction = serde_json::from_value(serde_json::json!({
            "action": "set_age_group",
            "age_group": "4-8"
        }))
        .unwrap();
        let mut model = PreferenceModel::default();
        model.apply(action).unwrap();
        assert_eq!(model.snapshot().age_group, AgeGroup::SchoolChild);
    }

    #[test]
    fn test_out_of_domain_meal_type_is_rejected_at_deserialization() {
        let result: Result<PreferenceAction, _> = serde_json::from_value(serde_json::json!({
            "action": "toggle_meal_type",
            "meal_type": "brunch"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut model = PreferenceModel::default();
        model.toggle_ingredient("Rice").unwrap();
        model.apply(PreferenceAction::Reset).unwrap();
        assert_eq!(model, PreferenceModel::default());
    }
}
