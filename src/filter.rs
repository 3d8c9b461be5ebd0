//! Hard constraints on the candidate recipes
//!
//! Nothing here fails. An empty result is a valid answer, and it's the
//! assembler's job to decide what to do with a slot without candidates.

use std::sync::Arc;

use crate::model::{MealType, Recipe};

/// Minimum reheat rating used for lunchbox planning
pub const DEFAULT_MIN_REHEAT_RATING: u8 = 3;

/// Remove the recipes containing any of the allergens
///
/// Allergens are compared case-insensitively and exactly. With no allergies
/// all the recipes are returned.
pub fn filter_by_allergies(recipes: Vec<Arc<Recipe>>, allergies: &[String]) -> Vec<Arc<Recipe>> {
    if allergies.is_empty() {
        return recipes;
    }
    recipes
        .into_iter()
        .filter(|r| !r.contains_allergen(allergies))
        .collect()
}

/// Keep the recipes with a reheat rating of at least `min_rating`
pub fn filter_by_reheat_rating(recipes: Vec<Arc<Recipe>>, min_rating: u8) -> Vec<Arc<Recipe>> {
    recipes
        .into_iter()
        .filter(|r| r.reheat_rating >= min_rating)
        .collect()
}

/// Keep the recipes that can be served at `meal_type`
pub fn filter_by_meal_type(recipes: Vec<Arc<Recipe>>, meal_type: MealType) -> Vec<Arc<Recipe>> {
    recipes
        .into_iter()
        .filter(|r| r.serves(meal_type))
        .collect()
}

/// All the hard constraints of a slot combined
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFilter<'a> {
    pub allergies: &'a [String],
    pub min_reheat_rating: u8,
    pub meal_type: Option<MealType>,
}

impl<'a> CandidateFilter<'a> {
    pub fn new(allergies: &'a [String]) -> Self {
        Self {
            allergies,
            min_reheat_rating: DEFAULT_MIN_REHEAT_RATING,
            meal_type: None,
        }
    }

    pub fn min_reheat_rating(mut self, min: u8) -> Self {
        self.min_reheat_rating = min;
        self
    }

    pub fn meal_type(mut self, meal_type: MealType) -> Self {
        self.meal_type = Some(meal_type);
        self
    }

    /// Check a single recipe
    pub fn accepts(&self, recipe: &Recipe) -> bool {
        !recipe.contains_allergen(self.allergies)
            && recipe.reheat_rating >= self.min_reheat_rating
            && self.meal_type.map_or(true, |m| recipe.serves(m))
    }

    /// Apply the filter to a list of recipes, keeping their order
    pub fn apply<'r>(&self, recipes: impl IntoIterator<Item = &'r Arc<Recipe>>) -> Vec<Arc<Recipe>> {
        let recipes: Vec<Arc<Recipe>> = recipes.into_iter().cloned().collect();
        let mut recipes = filter_by_allergies(recipes, self.allergies);
        recipes = filter_by_reheat_rating(recipes, self.min_reheat_rating);
        if let Some(meal_type) = self.meal_type {
            recipes = filter_by_meal_type(recipes, meal_type);
        }
        tracing::trace!(
            meal_type = ?self.meal_type,
            candidates = recipes.len(),
            "filtered candidates"
        );
        recipes
    }
}
