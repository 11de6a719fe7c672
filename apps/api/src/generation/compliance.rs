use crate::generation::compiler::split_avoid_list;
use crate::models::recipe::{ComplianceKind, ComplianceWarning, Recipe};

/// Shorter terms match almost any ingredient line.
const MIN_TERM_LEN: usize = 3;

/// Scans a generated recipe's ingredient lines for excluded items.
/// Returns advisory warnings (non-blocking).
///
/// Allergen labels are written as "X-free" in the catalog; the scanned term
/// is "x". Matching is a case-insensitive substring test, so it can both
/// miss renamed ingredients and over-report ("egg" in "eggplant").
pub fn check_compliance(
    recipe: &Recipe,
    allergens: &[String],
    avoid_text: &str,
) -> Vec<ComplianceWarning> {
    let mut terms: Vec<(ComplianceKind, String)> = allergens
        .iter()
        .map(|a| (ComplianceKind::Allergen, allergen_term(a)))
        .collect();
    terms.extend(
        split_avoid_list(avoid_text)
            .into_iter()
            .map(|t| (ComplianceKind::Avoided, t.to_lowercase())),
    );

    let mut warnings = Vec::new();
    for (kind, term) in terms {
        if term.chars().count() < MIN_TERM_LEN {
            continue;
        }
        let hit = recipe
            .ingredients
            .iter()
            .find(|line| line.to_lowercase().contains(&term));

        if let Some(ingredient) = hit {
            warnings.push(ComplianceWarning {
                kind,
                term,
                ingredient: ingredient.clone(),
            });
        }
    }
    warnings
}

/// "Gluten-free" -> "gluten", "Kiwi" -> "kiwi".
fn allergen_term(label: &str) -> String {
    let lowered = label.trim().to_lowercase();
    lowered
        .strip_suffix("-free")
        .or_else(|| lowered.strip_suffix(" free"))
        .unwrap_or(&lowered)
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::recipe::sample_recipe;

    fn recipe_with(ingredients: &[&str]) -> Recipe {
        let mut recipe = sample_recipe("Test dish");
        recipe.ingredients = ingredients.iter().map(|s| s.to_string()).collect();
        recipe
    }

    #[test]
    fn test_allergen_term_strips_free_suffix() {
        assert_eq!(allergen_term("Gluten-free"), "gluten");
        assert_eq!(allergen_term("Lactose free"), "lactose");
        assert_eq!(allergen_term(" Kiwi "), "kiwi");
    }

    #[test]
    fn test_clean_recipe_has_no_warnings() {
        let recipe = recipe_with(&["200 g chicken breast", "150 g rice"]);
        let allergens = vec!["Gluten-free".to_string(), "Egg-free".to_string()];
        assert!(check_compliance(&recipe, &allergens, "celery").is_empty());
    }

    #[test]
    fn test_allergen_hit_is_reported() {
        let recipe = recipe_with(&["2 eggs", "1 cup gluten flour"]);
        let warnings = check_compliance(&recipe, &["Gluten-free".to_string()], "");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, ComplianceKind::Allergen);
        assert_eq!(warnings[0].term, "gluten");
        assert_eq!(warnings[0].ingredient, "1 cup gluten flour");
    }

    #[test]
    fn test_avoid_hit_is_case_insensitive() {
        let recipe = recipe_with(&["1 stalk Celery, diced"]);
        let warnings = check_compliance(&recipe, &[], "nuts, celery");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, ComplianceKind::Avoided);
        assert_eq!(warnings[0].term, "celery");
    }

    #[test]
    fn test_short_terms_are_skipped() {
        let recipe = recipe_with(&["1 tbsp oil"]);
        assert!(check_compliance(&recipe, &[], "o, il").is_empty());
    }

    #[test]
    fn test_one_warning_per_term() {
        let recipe = recipe_with(&["milk", "milk powder"]);
        let warnings = check_compliance(&recipe, &["Milk".to_string()], "");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].ingredient, "milk");
    }
}
