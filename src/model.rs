//! Recipe and meal representation
//!
//! Recipes are immutable once loaded into a [`Catalog`](crate::catalog::Catalog).
//! Plans hold them behind an [`Arc`](std::sync::Arc) so they are shared, never
//! copied or mutated.

use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// One of the meals of a school day
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    enum_map::Enum,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum MealType {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
}

impl MealType {
    /// All meal types in the order they happen during the day
    pub const ALL: [MealType; 5] = [
        MealType::Breakfast,
        MealType::MorningSnack,
        MealType::Lunch,
        MealType::AfternoonSnack,
        MealType::Dinner,
    ];

    /// Human readable label, as shown on menu cards
    pub fn label(self) -> &'static str {
        match self {
            MealType::Breakfast => "Desayuno",
            MealType::MorningSnack => "Medias nueves",
            MealType::Lunch => "Almuerzo",
            MealType::AfternoonSnack => "Onces",
            MealType::Dinner => "Cena",
        }
    }
}

/// Dish category of a recipe
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RecipeCategory {
    Main,
    Side,
    Soup,
    Dessert,
    Snack,
    Breakfast,
    Beverage,
}

/// How likely children are to eat a dish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Acceptance {
    High,
    Medium,
    Low,
}

/// Shopping category of an ingredient
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IngredientCategory {
    Protein,
    Carb,
    Vegetable,
    Fruit,
    Dairy,
    Fat,
    Seasoning,
    Other,
}

impl IngredientCategory {
    /// Title used when printing a shopping list
    pub fn title(self) -> &'static str {
        match self {
            IngredientCategory::Protein => "Proteínas",
            IngredientCategory::Carb => "Carbohidratos",
            IngredientCategory::Vegetable => "Verduras",
            IngredientCategory::Fruit => "Frutas",
            IngredientCategory::Dairy => "Lácteos",
            IngredientCategory::Fat => "Grasas y Aceites",
            IngredientCategory::Seasoning => "Condimentos",
            IngredientCategory::Other => "Otros",
        }
    }
}

/// Nutrition values
///
/// For a [`Recipe`] these are the values for its stated servings. For a
/// [`MenuSlot`](crate::plan::MenuSlot) they are already scaled by the portions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein_grams: f64,
    pub carbs_grams: f64,
    pub fat_grams: f64,
    pub fiber_grams: f64,
    pub sodium_mg: f64,
}

impl Nutrition {
    /// Scale all the values by `factor`
    ///
    /// Calories and sodium are rounded to integers, the rest to 1 decimal.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            calories: (self.calories * factor).round(),
            protein_grams: round_to(self.protein_grams * factor, 1),
            carbs_grams: round_to(self.carbs_grams * factor, 1),
            fat_grams: round_to(self.fat_grams * factor, 1),
            fiber_grams: round_to(self.fiber_grams * factor, 1),
            sodium_mg: (self.sodium_mg * factor).round(),
        }
    }

    fn all_positive(&self) -> bool {
        [
            self.calories,
            self.protein_grams,
            self.carbs_grams,
            self.fat_grams,
            self.fiber_grams,
            self.sodium_mg,
        ]
        .iter()
        .all(|v| *v >= 0.0)
            && self.calories > 0.0
    }
}

impl Add for Nutrition {
    type Output = Nutrition;

    fn add(mut self, rhs: Self) -> Self::Output {
        self += rhs;
        self
    }
}

impl AddAssign for Nutrition {
    fn add_assign(&mut self, rhs: Self) {
        self.calories += rhs.calories;
        self.protein_grams += rhs.protein_grams;
        self.carbs_grams += rhs.carbs_grams;
        self.fat_grams += rhs.fat_grams;
        self.fiber_grams += rhs.fiber_grams;
        self.sodium_mg += rhs.sodium_mg;
    }
}

impl Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::default(), Add::add)
    }
}

impl<'a> Sum<&'a Nutrition> for Nutrition {
    fn sum<I: Iterator<Item = &'a Nutrition>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

/// An ingredient line of a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    pub name: String,
    /// Amount for the recipe servings
    pub amount: f64,
    /// Free form unit, units are never converted
    pub unit: String,
    pub category: IngredientCategory,
}

/// A complete recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique identifier inside a catalog
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: RecipeCategory,
    /// Meals this recipe can be served at
    pub meal_types: Vec<MealType>,
    /// Cuisine tag, used for diversity
    pub cuisine: String,
    /// How well the dish holds up when reheated, from 1 to 5
    pub reheat_rating: u8,
    /// Hours the dish can be transported in a lunchbox
    pub transport_hours: f64,
    pub child_acceptance: Acceptance,
    #[serde(default)]
    pub prep_time_minutes: u32,
    #[serde(default)]
    pub cook_time_minutes: u32,
    pub servings: u32,
    pub ingredients: Vec<RecipeIngredient>,
    #[serde(default)]
    pub instructions: Vec<String>,
    pub nutrition: Nutrition,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Ingredient substitutions, ingredient name to replacement
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub substitutions: BTreeMap<String, String>,
}

impl Recipe {
    /// Check if the recipe contains any of the given allergens
    ///
    /// The comparison is case-insensitive and exact.
    pub fn contains_allergen(&self, allergies: &[String]) -> bool {
        self.allergens
            .iter()
            .any(|a| allergies.iter().any(|b| a.to_lowercase() == b.to_lowercase()))
    }

    /// Check if any tag contains any of the terms, case-insensitive
    pub fn has_tag_matching(&self, terms: &[String]) -> bool {
        self.tags.iter().any(|tag| {
            let tag = tag.to_lowercase();
            terms.iter().any(|t| tag.contains(&t.to_lowercase()))
        })
    }

    /// Check if the recipe can be served at `meal_type`
    pub fn serves(&self, meal_type: MealType) -> bool {
        self.meal_types.contains(&meal_type)
    }

    /// Check the recipe invariants
    ///
    /// Nutrition values must be positive and the reheat rating in `1..=5`.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if !self.nutrition.all_positive() {
            return Err(CatalogError::InvalidRecipe {
                id: self.id.clone(),
                reason: "nutrition values must be positive",
            });
        }
        if !(1..=5).contains(&self.reheat_rating) {
            return Err(CatalogError::InvalidRecipe {
                id: self.id.clone(),
                reason: "reheat rating must be between 1 and 5",
            });
        }
        if self.meal_types.is_empty() {
            return Err(CatalogError::InvalidRecipe {
                id: self.id.clone(),
                reason: "at least one meal type is required",
            });
        }
        Ok(())
    }
}

/// Round to a number of decimal places
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let m = 10f64.powi(decimals);
    (value * m).round() / m
}
