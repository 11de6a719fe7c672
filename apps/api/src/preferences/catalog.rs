//! Static selection catalog and display labels.

use serde::Serialize;

use crate::preferences::model::{AgeGroup, CookingMethod, MealType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngredientCategory {
    Smoothie,
    Vegetables,
    Meat,
    Dairy,
    Pantry,
    Fruit,
}

impl IngredientCategory {
    pub fn label(self) -> &'static str {
        match self {
            IngredientCategory::Smoothie => "Smoothie Bar",
            IngredientCategory::Vegetables => "Vegetables & Greens",
            IngredientCategory::Meat => "Meat & Protein",
            IngredientCategory::Dairy => "Dairy & Eggs",
            IngredientCategory::Pantry => "Pantry Basics",
            IngredientCategory::Fruit => "Fruit",
        }
    }
}

pub const PREDEFINED_INGREDIENTS: &[(IngredientCategory, &str)] = &[
    (IngredientCategory::Smoothie, "Bananas"),
    (IngredientCategory::Smoothie, "Forest berries"),
    (IngredientCategory::Smoothie, "Rolled oats"),
    (IngredientCategory::Smoothie, "Greek yogurt"),
    (IngredientCategory::Smoothie, "Baby spinach"),
    (IngredientCategory::Smoothie, "Peanut butter"),
    (IngredientCategory::Smoothie, "Chia seeds"),
    (IngredientCategory::Smoothie, "Avocado"),
    (IngredientCategory::Smoothie, "Plant milk"),
    (IngredientCategory::Smoothie, "Mango"),
    (IngredientCategory::Smoothie, "Pineapple"),
    (IngredientCategory::Smoothie, "Cinnamon"),
    (IngredientCategory::Vegetables, "Tomatoes"),
    (IngredientCategory::Vegetables, "Cucumbers"),
    (IngredientCategory::Vegetables, "Peppers"),
    (IngredientCategory::Vegetables, "Potatoes"),
    (IngredientCategory::Vegetables, "Onion"),
    (IngredientCategory::Vegetables, "Garlic"),
    (IngredientCategory::Vegetables, "Carrots"),
    (IngredientCategory::Vegetables, "Eggplant"),
    (IngredientCategory::Vegetables, "Zucchini"),
    (IngredientCategory::Meat, "Chicken breast"),
    (IngredientCategory::Meat, "Minced meat"),
    (IngredientCategory::Meat, "Ham / bacon"),
    (IngredientCategory::Meat, "Smoked sausages"),
    (IngredientCategory::Dairy, "Eggs"),
    (IngredientCategory::Dairy, "Milk"),
    (IngredientCategory::Dairy, "Cottage cheese"),
    (IngredientCategory::Dairy, "Cascaval cheese"),
    (IngredientCategory::Dairy, "Sour cream"),
    (IngredientCategory::Dairy, "Butter"),
    (IngredientCategory::Pantry, "Flour"),
    (IngredientCategory::Pantry, "Cornmeal"),
    (IngredientCategory::Pantry, "Rice"),
    (IngredientCategory::Pantry, "Pasta"),
    (IngredientCategory::Pantry, "Oil"),
    (IngredientCategory::Pantry, "Bread"),
    (IngredientCategory::Fruit, "Apples"),
    (IngredientCategory::Fruit, "Plums (silvoiță)"),
    (IngredientCategory::Fruit, "Walnuts"),
];

pub const SPICES: &[&str] = &[
    "Parsley",
    "Dill",
    "Lovage",
    "Thyme",
    "Sweet paprika",
    "Pepper",
    "Basil",
    "Tarragon",
];

/// Curated allergen set offered by default. Users may add arbitrary entries on top.
pub const COMMON_ALLERGENS: &[&str] = &[
    "Gluten-free",
    "Lactose-free",
    "Egg-free",
    "Nut-free",
    "Peanut-free",
    "Soy-free",
    "Fish-free",
    "Shellfish-free",
    "Sesame-free",
];

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::LunchDinner,
        MealType::Snack,
        MealType::Smoothie,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::LunchDinner => "Lunch or Dinner",
            MealType::Snack => "Snack",
            MealType::Smoothie => "Smoothie",
        }
    }
}

impl CookingMethod {
    pub const ALL: [CookingMethod; 7] = [
        CookingMethod::Any,
        CookingMethod::Stovetop,
        CookingMethod::Oven,
        CookingMethod::Pressure,
        CookingMethod::Airfryer,
        CookingMethod::Drycooker,
        CookingMethod::Grill,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CookingMethod::Any => "Any method",
            CookingMethod::Stovetop => "Stovetop",
            CookingMethod::Oven => "Oven",
            CookingMethod::Pressure => "Pressure cooker",
            CookingMethod::Airfryer => "Air fryer",
            CookingMethod::Drycooker => "Dry cooker",
            CookingMethod::Grill => "Grill",
        }
    }
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Toddler,
        AgeGroup::SchoolChild,
        AgeGroup::PreTeen,
        AgeGroup::Adult,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Toddler => "1-3 years",
            AgeGroup::SchoolChild => "4-8 years",
            AgeGroup::PreTeen => "9-13 years",
            AgeGroup::Adult => "Adults",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LabeledOption<T: Serialize> {
    pub value: T,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CatalogIngredient {
    pub name: &'static str,
    pub category: IngredientCategory,
}

#[derive(Debug, Serialize)]
pub struct Catalog {
    pub categories: Vec<LabeledOption<IngredientCategory>>,
    pub ingredients: Vec<CatalogIngredient>,
    pub spices: &'static [&'static str],
    pub allergens: &'static [&'static str],
    pub meal_types: Vec<LabeledOption<MealType>>,
    pub cooking_methods: Vec<LabeledOption<CookingMethod>>,
    pub age_groups: Vec<LabeledOption<AgeGroup>>,
}

pub fn build_catalog() -> Catalog {
    let categories = [
        IngredientCategory::Smoothie,
        IngredientCategory::Vegetables,
        IngredientCategory::Meat,
        IngredientCategory::Dairy,
        IngredientCategory::Pantry,
        IngredientCategory::Fruit,
    ];

    Catalog {
        categories: categories
            .iter()
            .map(|&c| LabeledOption {
                value: c,
                label: c.label(),
            })
            .collect(),
        ingredients: PREDEFINED_INGREDIENTS
            .iter()
            .map(|&(category, name)| CatalogIngredient { name, category })
            .collect(),
        spices: SPICES,
        allergens: COMMON_ALLERGENS,
        meal_types: MealType::ALL
            .iter()
            .map(|&m| LabeledOption {
                value: m,
                label: m.label(),
            })
            .collect(),
        cooking_methods: CookingMethod::ALL
            .iter()
            .map(|&m| LabeledOption {
                value: m,
                label: m.label(),
            })
            .collect(),
        age_groups: AgeGroup::ALL
            .iter()
            .map(|&a| LabeledOption {
                value: a,
                label: a.label(),
            })
            .collect(),
    }
}
