// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Persona, language and batch contract. Independent of user input; the
/// JSON-only fragment is appended by the compiler.
pub const RECIPE_SYSTEM: &str = "You are an expert head chef from Satu Mare, Romania, \
    cooking in a warm Transylvanian home style. \
    You write exclusively in English. \
    You compose a menu using the ingredients the user has available. \
    If the user selected several meal types, return EXACTLY one recipe for each selected meal type, \
    no more and no fewer.";

/// Batch header. Replace `{meal_types}` and `{recipe_count}`.
pub const MEAL_TYPES_LINE: &str = "Generate recipes for the following meal types: {meal_types}. \
    Return exactly {recipe_count} recipe(s), one per meal type, \
    and set each recipe's mealType to the meal type it answers.";

/// Replace `{ingredients}`.
pub const INGREDIENTS_LINE: &str = "AVAILABLE INGREDIENTS: {ingredients}.";

/// Replace `{spices}`.
pub const SPICES_CLAUSE: &str = "Use these spices: {spices}.";

/// Soft exclusion. Replace `{avoid}`.
pub const AVOID_CLAUSE: &str = "AVOID: the eater dislikes {avoid}. Leave these out of every recipe.";

/// Hard exclusion. Replace `{allergens}`.
pub const ALLERGEN_CLAUSE: &str = "CRITICAL - ALLERGENS: Every recipe must not contain: {allergens}. \
    If an available ingredient conflicts with an allergen, replace it with a safe substitute \
    and name the substitution in chefTips. Never drop a conflicting ingredient silently.";

/// Replace `{method}`.
pub const COOKING_METHOD_CLAUSE: &str =
    "REQUIRED COOKING METHOD: {method}. Every recipe must be cooked this way.";

/// Replace `{bracket}`.
pub const CHILD_AUDIENCE: &str =
    "Children aged {bracket}: a healthy, visually appealing, easy-to-digest recipe";

pub const ADULT_AUDIENCE: &str = "Adults: rich flavour, traditional or modern";

pub const HIDE_VEGGIES_INSTRUCTION: &str = ". IMPORTANT: Hide the vegetables inside the dish \
    so they are invisible. Do not leave them out";

/// Replace `{audience}`.
pub const AUDIENCE_LINE: &str = "FOR WHOM: {audience}.";

/// Replace `{portions}`.
pub const PORTIONS_LINE: &str = "PORTIONS: {portions}.";

pub const TIME_LIMIT_MINUTES: u32 = 25;

/// Replace `{minutes}`.
pub const TIME_LIMIT_LINE: &str = "TIME LIMIT PER RECIPE: {minutes} minutes maximum.";

pub const OUTPUT_REMINDER: &str = "IMPORTANT: Return a valid JSON array of recipe objects.";

/// How many ingredients the photo prompt mentions.
pub const IMAGE_PROMPT_INGREDIENTS: usize = 3;

/// Dish photo prompt for `title`, featuring its first few ingredients.
pub fn image_prompt(title: &str, ingredients: &[String]) -> String {
    let featured = ingredients
        .iter()
        .take(IMAGE_PROMPT_INGREDIENTS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    // Filled in one pass so braces inside a title stay literal.
    format!("High quality food photography: \"{title}\" with {featured}. 4k, rustic style.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_prompt_uses_first_three_ingredients() {
        let ingredients = vec![
            "rice".to_string(),
            "chicken".to_string(),
            "peas".to_string(),
            "dill".to_string(),
        ];
        let prompt = image_prompt("Chicken pilaf", &ingredients);
        assert!(prompt.contains("\"Chicken pilaf\""));
        assert!(prompt.contains("rice, chicken, peas"));
        assert!(!prompt.contains("dill"));
    }

    #[test]
    fn test_placeholder_text_in_title_stays_literal() {
        let ingredients = vec!["rice".to_string()];
        let prompt = image_prompt("Bowl of {ingredients}", &ingredients);
        assert_eq!(
            prompt,
            "High quality food photography: \"Bowl of {ingredients}\" with rice. 4k, rustic style."
        );
    }
}
