//! Immutable recipe collection the planner draws candidates from
//!
//! A catalog can be built from any list of recipes with [`Catalog::new`] or
//! parsed from TOML with [`Catalog::from_toml`]:
//!
//! ```toml
//! [[recipe]]
//! id = "arroz-con-pollo"
//! name = "Arroz con pollo"
//! category = "main"
//! meal_types = ["lunch", "dinner"]
//! cuisine = "colombian"
//! reheat_rating = 5
//! transport_hours = 5.0
//! child_acceptance = "high"
//! servings = 1
//! tags = ["pollo", "arroz"]
//! nutrition = { calories = 520.0, protein_grams = 28.0, carbs_grams = 62.0, fat_grams = 14.0, fiber_grams = 3.0, sodium_mg = 620.0 }
//! ingredients = [
//!     { name = "Arroz", amount = 0.5, unit = "taza", category = "carb" },
//! ]
//! ```

use std::{collections::HashSet, sync::Arc};

use serde::Deserialize;

use crate::{
    error::CatalogError,
    model::{Recipe, RecipeCategory},
};

/// A validated, read-only collection of recipes
///
/// Cloning is cheap, recipes are reference counted.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    recipes: Vec<Arc<Recipe>>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default, rename = "recipe")]
    recipes: Vec<Recipe>,
}

impl Catalog {
    /// Create a catalog from a list of recipes
    ///
    /// Every recipe is [validated](Recipe::validate) and ids must be unique.
    pub fn new(recipes: Vec<Recipe>) -> Result<Self, CatalogError> {
        let mut ids = HashSet::with_capacity(recipes.len());
        for recipe in &recipes {
            recipe.validate()?;
            if !ids.insert(recipe.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: recipe.id.clone(),
                });
            }
        }
        Ok(Self {
            recipes: recipes.into_iter().map(Arc::new).collect(),
        })
    }

    /// Parse a catalog in TOML format
    #[tracing::instrument(level = "debug", name = "catalog", skip_all, fields(len = input.len()))]
    pub fn from_toml(input: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(input)?;
        Self::new(file.recipes)
    }

    /// Catalog with the bundled sample recipes
    ///
    /// This is only available when the `bundled_catalog` feature is enabled.
    #[cfg(feature = "bundled_catalog")]
    pub fn bundled() -> &'static Catalog {
        static BUNDLED: once_cell::sync::Lazy<Catalog> = once_cell::sync::Lazy::new(|| {
            Catalog::from_toml(include_str!("../catalog.toml")).unwrap()
        });
        &BUNDLED
    }

    /// All the recipes, in catalog order
    pub fn recipes(&self) -> &[Arc<Recipe>] {
        &self.recipes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Recipe>> {
        self.recipes.iter()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Find a recipe by id
    pub fn get(&self, id: &str) -> Option<&Arc<Recipe>> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Case-insensitive search in names, descriptions and tags
    pub fn search(&self, query: &str) -> Vec<Arc<Recipe>> {
        let query = query.to_lowercase();
        self.matching(|r| {
            r.name.to_lowercase().contains(&query)
                || r.description.to_lowercase().contains(&query)
                || r.tags.iter().any(|t| t.to_lowercase().contains(&query))
        })
    }

    pub fn by_category(&self, category: RecipeCategory) -> Vec<Arc<Recipe>> {
        self.matching(|r| r.category == category)
    }

    pub fn by_cuisine(&self, cuisine: &str) -> Vec<Arc<Recipe>> {
        self.matching(|r| r.cuisine.eq_ignore_ascii_case(cuisine))
    }

    /// Recipes with a tag containing any of `tags`
    pub fn by_tags(&self, tags: &[String]) -> Vec<Arc<Recipe>> {
        self.matching(|r| r.has_tag_matching(tags))
    }

    fn matching(&self, pred: impl Fn(&Recipe) -> bool) -> Vec<Arc<Recipe>> {
        self.recipes
            .iter()
            .filter(|r| pred(r))
            .cloned()
            .collect()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Arc<Recipe>;

    type IntoIter = std::slice::Iter<'a, Arc<Recipe>>;

    fn into_iter(self) -> Self::IntoIter {
        self.recipes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::recipe;
    use indoc::indoc;

    const INPUT: &str = indoc! {r#"
        [[recipe]]
        id = "sudado"
        name = "Sudado de pollo"
        description = "Pollo guisado"
        category = "main"
        meal_types = ["lunch", "dinner"]
        cuisine = "colombian"
        reheat_rating = 5
        transport_hours = 5
        child_acceptance = "high"
        servings = 1
        tags = ["pollo", "papa"]
        nutrition = { calories = 490.0, protein_grams = 30.0, carbs_grams = 45.0, fat_grams = 16.0, fiber_grams = 4.0, sodium_mg = 640.0 }
        ingredients = [
            { name = "Papa", amount = 1.5, unit = "unidad", category = "carb" },
        ]

        [[recipe]]
        id = "pasta"
        name = "Pasta"
        category = "main"
        meal_types = ["lunch"]
        cuisine = "international"
        reheat_rating = 4
        transport_hours = 4.0
        child_acceptance = "medium"
        servings = 1
        allergens = ["gluten"]
        tags = ["res", "pasta"]
        nutrition = { calories = 590.0, protein_grams = 29.0, carbs_grams = 72.0, fat_grams = 20.0, fiber_grams = 5.0, sodium_mg = 620.0 }
        ingredients = []
    "#};

    #[test]
    fn parse_toml() {
        let catalog = Catalog::from_toml(INPUT).unwrap();
        assert_eq!(catalog.len(), 2);
        let sudado = catalog.get("sudado").unwrap();
        assert_eq!(sudado.transport_hours, 5.0);
        assert_eq!(sudado.ingredients[0].amount, 1.5);
        assert!(catalog.get("pasta").unwrap().description.is_empty());
        assert!(catalog.get("nope").is_none());
    }

    #[test]
    fn queries() {
        let catalog = Catalog::from_toml(INPUT).unwrap();
        assert_eq!(catalog.search("GUISADO").len(), 1);
        assert_eq!(catalog.search("pa").len(), 2);
        assert_eq!(catalog.by_cuisine("Colombian").len(), 1);
        assert_eq!(catalog.by_category(RecipeCategory::Main).len(), 2);
        assert_eq!(catalog.by_category(RecipeCategory::Soup).len(), 0);
        assert_eq!(catalog.by_tags(&["res".into()])[0].id, "pasta");
    }

    #[test]
    fn duplicate_ids() {
        let err = Catalog::new(vec![recipe("a"), recipe("a")]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { id } if id == "a"));
    }

    #[test]
    fn invalid_recipe() {
        let mut bad = recipe("bad");
        bad.nutrition.calories = 0.0;
        let err = Catalog::new(vec![recipe("a"), bad]).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidRecipe { .. }));
    }

    #[test]
    fn bad_toml() {
        assert!(matches!(
            Catalog::from_toml("[[recipe]]\nid = 1"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[cfg(feature = "bundled_catalog")]
    #[test]
    fn bundled() {
        let catalog = Catalog::bundled();
        assert!(catalog.len() >= 40);
        assert!(catalog.get("arroz-con-pollo").is_some());
    }

    #[cfg(feature = "bundled_catalog")]
    #[test]
    fn bundled_pools() {
        use crate::{filter::CandidateFilter, model::MealType};

        let catalog = Catalog::bundled();
        let allergies = ["maní".to_string()];
        // a month of lunches and a few weeks of every other meal
        for meal_type in MealType::ALL {
            let pool = CandidateFilter::new(&allergies)
                .min_reheat_rating(3)
                .meal_type(meal_type)
                .apply(catalog);
            let min = if meal_type == MealType::Lunch { 20 } else { 15 };
            assert!(pool.len() >= min, "{meal_type}: {}", pool.len());
        }
    }
}
