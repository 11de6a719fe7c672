use crate::models::recipe::Recipe;

pub const SHARE_FOOTER: &str = "Made with Bucătar, the Satu Mare kitchen helper";

/// Plain-text rendering of a recipe for the system share sheet or clipboard.
pub fn share_text(recipe: &Recipe) -> String {
    let ingredients = recipe
        .ingredients
        .iter()
        .map(|i| format!("• {i}"))
        .collect::<Vec<_>>()
        .join("\n");
    let steps = recipe
        .steps
        .iter()
        .enumerate()
        .map(|(n, s)| format!("{}. {s}", n + 1))
        .collect::<Vec<_>>()
        .join("\n");

    let mut text = format!(
        "{title}\n{description}\n\nTime: {time}\nCalories: {calories} kcal/portion\n\n\
         Ingredients:\n{ingredients}\n\nMethod:\n{steps}\n",
        title = recipe.title,
        description = recipe.description,
        time = recipe.cooking_time,
        calories = recipe.calories_per_portion.round(),
    );
    if !recipe.chef_tips.trim().is_empty() {
        text.push_str(&format!("\nChef's tip: {}\n", recipe.chef_tips));
    }
    text.push('\n');
    text.push_str(SHARE_FOOTER);
    text
}
