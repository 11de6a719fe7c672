use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    // Aliases cover recipes saved by the Romanian-language releases.
    #[serde(alias = "Ușor", alias = "Usor")]
    Easy,
    #[serde(alias = "Mediu")]
    Medium,
}

impl Difficulty {
    /// Lenient parse used on model output. Unknown values fall back to `Medium`.
    pub fn from_loose(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "easy" | "ușor" | "usor" | "simple" => Difficulty::Easy,
            _ => Difficulty::Medium,
        }
    }
}

/// One line of estimated nutrition data attached to a recipe.
///
/// `validation_error` is filled in by the normalizer. Invalid entries stay in
/// the recipe so the client can render them as a validation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionEntry {
    pub ingredient: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_error: Option<String>,
}

impl NutritionEntry {
    pub fn is_valid(&self) -> bool {
        self.validation_error.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceKind {
    /// Hard exclusion: the recipe was asked to never contain this.
    Allergen,
    /// Soft exclusion: a declared dislike.
    Avoided,
}

/// Advisory finding from the post-generation exclusion scan. Never blocks a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceWarning {
    pub kind: ComplianceKind,
    pub term: String,
    pub ingredient: String,
}

/// A generated or saved dish.
///
/// Records written before ids existed deserialize with a fresh id; the title
/// fallback in the reconciler keeps them from duplicating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub cooking_time: String,
    pub portions: u32,
    pub difficulty: Difficulty,
    pub calories_per_portion: f64,
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub chef_tips: String,
    #[serde(default)]
    pub nutritional_details: Vec<NutritionEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<String>,
    #[serde(default = "Utc::now", deserialize_with = "created_at::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compliance_warnings: Vec<ComplianceWarning>,
}

/// `createdAt` is written as RFC 3339. Older clients stored epoch milliseconds.
mod created_at {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StoredTimestamp {
        Millis(#[serde(with = "chrono::serde::ts_milliseconds")] DateTime<Utc>),
        Rfc3339(DateTime<Utc>),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match StoredTimestamp::deserialize(deserializer)? {
            StoredTimestamp::Millis(at) | StoredTimestamp::Rfc3339(at) => at,
        })
    }
}

#[cfg(test)]
pub(crate) fn sample_recipe(title: &str) -> Recipe {
    Recipe {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: "Creamy rice with seared chicken".to_string(),
        cooking_time: "25 minutes".to_string(),
        portions: 2,
        difficulty: Difficulty::Easy,
        calories_per_portion: 540.0,
        ingredients: vec!["200 g chicken breast".to_string(), "150 g rice".to_string()],
        steps: vec!["Cook the rice.".to_string(), "Sear the chicken.".to_string()],
        chef_tips: "Rest the chicken for two minutes.".to_string(),
        nutritional_details: vec![],
        image_url: None,
        meal_type: Some("Lunch or Dinner".to_string()),
        created_at: Utc::now(),
        compliance_warnings: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_record_without_id_gets_one() {
        let json = r#"{
            "title": "Papanași",
            "description": "Fried cheese doughnuts",
            "cookingTime": "25 minute",
            "portions": 4,
            "difficulty": "Mediu",
            "caloriesPerPortion": 420,
            "ingredients": ["brânză de vaci"],
            "steps": ["Mix", "Fry"],
            "chefTips": "Serve with sour cream",
            "createdAt": "2024-05-01T10:00:00Z"
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.difficulty, Difficulty::Medium);
        assert!(recipe.nutritional_details.is_empty());
        assert!(recipe.image_url.is_none());
        assert_ne!(recipe.id, Uuid::nil());
    }

    #[test]
    fn test_epoch_millis_created_at_is_accepted() {
        let json = r#"{
            "id": "3f2c1a7e-4b8d-4c2a-9e1f-0a1b2c3d4e5f",
            "title": "Sarmale",
            "description": "Cabbage rolls",
            "cookingTime": "25 minute",
            "portions": 4,
            "difficulty": "Ușor",
            "caloriesPerPortion": 510,
            "ingredients": ["varză murată"],
            "steps": ["Roll", "Simmer"],
            "chefTips": "Smoked bacon on top",
            "nutritionalDetails": [],
            "createdAt": 1714557600000
        }"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.created_at.to_rfc3339(), "2024-05-01T10:00:00+00:00");

        let reloaded: Recipe =
            serde_json::from_value(serde_json::to_value(&recipe).unwrap()).unwrap();
        assert_eq!(reloaded.created_at, recipe.created_at);
    }

    #[test]
    fn test_recipe_serializes_camel_case() {
        let recipe = sample_recipe("Chicken and rice");
        let value = serde_json::to_value(&recipe).unwrap();
        assert!(value.get("cookingTime").is_some());
        assert!(value.get("caloriesPerPortion").is_some());
        assert!(value.get("imageUrl").is_none());
        assert!(value.get("complianceWarnings").is_none());
        assert_eq!(value["difficulty"], "easy");
    }

    #[test]
    fn test_difficulty_from_loose() {
        assert_eq!(Difficulty::from_loose("Easy"), Difficulty::Easy);
        assert_eq!(Difficulty::from_loose("Ușor"), Difficulty::Easy);
        assert_eq!(Difficulty::from_loose("medium"), Difficulty::Medium);
        assert_eq!(Difficulty::from_loose("hard"), Difficulty::Medium);
    }
}
