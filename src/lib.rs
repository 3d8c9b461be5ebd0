//! School lunch menu planner.
//!
//! Plans weekly and monthly menus for a child from a recipe [`Catalog`],
//! and turns the menus into a consolidated [`ShoppingList`].
//!
//! The planning happens in 4 steps:
//! - The [candidate filter](filter) removes the recipes a child can't have:
//!   allergens, recipes that don't reheat well and the wrong meal type.
//! - The [selector](select) scores the candidates and picks one at random
//!   from the best ones, favouring variety of cuisines and proteins.
//! - The [assembler](plan) fills every school day of the horizon with no
//!   recipe repeated, sizing the portions to the calories of each meal.
//! - The [shopping list](shopping_list) adds up all the ingredients.
//!
//! # Basic usage
//! The [`MenuPlanner`] ties everything together. [`MenuPlanner::bundled`]
//! uses the bundled sample catalog and the FAO/WHO energy requirements.
//!
//! ```rust
//! # use lonchera::{MenuPlanner, ChildProfile, Sex, ActivityLevel, Preferences};
//! let planner = MenuPlanner::bundled();
//! let child = ChildProfile {
//!     id: "sofia".into(),
//!     name: "Sofía".into(),
//!     birth_date: "2017-03-15".parse().unwrap(),
//!     sex: Sex::Female,
//!     weight_kg: 25.0,
//!     height_cm: 127.0,
//!     activity_level: ActivityLevel::Moderate,
//!     allergies: vec!["maní".into()],
//!     preferences: Preferences::default(),
//! };
//!
//! let start = "2025-02-03".parse().unwrap();
//! let plan = planner.generate_week(&child, start);
//! assert_eq!(plan.slots.len(), 5);
//! assert!(plan.is_allergen_free(&child.allergies));
//!
//! let list = planner.shopping_list(&plan);
//! assert!(!list.is_empty());
//! ```
//!
//! Selection is random. Every operation has a `_with_rng` variant to use a
//! seeded generator when the output has to be reproducible.

#![warn(rustdoc::broken_intra_doc_links, clippy::doc_markdown)]

#[cfg(doc)]
pub mod _features {
    //! This lib has 1 feature, enabled by default:
    //! - `bundled_catalog`. Includes a sample catalog of Colombian school
    //!   lunches, breakfasts and snacks, available with [`Catalog::bundled`]
    //!   and [`MenuPlanner::bundled`](crate::MenuPlanner::bundled).
    //!
    //! [`Catalog::bundled`]: crate::catalog::Catalog::bundled
}

pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod model;
pub mod nutrition;
pub mod plan;
pub mod profile;
pub mod protein;
pub mod select;
pub mod shopping_list;

use chrono::NaiveDate;
use rand::Rng;

pub use catalog::Catalog;
pub use config::{PlannerConfig, SelectionWeights};
pub use error::{CatalogError, ConfigError, SelectError};
pub use model::*;
pub use nutrition::{
    FaoRequirements, FixedRequirements, NutritionalRequirements, RequirementSource,
};
pub use plan::{Horizon, MenuPlan, MenuSlot};
pub use profile::{ActivityLevel, ChildProfile, Preferences, Sex};
pub use protein::{Protein, ProteinTable};
pub use shopping_list::{ShoppingList, ShoppingListEntry};

use plan::Assembler;

/// A menu planner
///
/// Holds everything that doesn't change between plans: the catalog, the
/// configuration, the protein table and the source of the nutritional
/// requirements. Create one and reuse it.
///
/// The requirement source is generic, [`FaoRequirements`] by default. Use
/// [`FixedRequirements`] to plan with a known calorie target.
#[derive(Debug, Clone)]
pub struct MenuPlanner<S = FaoRequirements> {
    catalog: Catalog,
    config: PlannerConfig,
    proteins: ProteinTable,
    requirements: S,
}

impl<S: RequirementSource> MenuPlanner<S> {
    /// Creates a new planner
    ///
    /// Fails if the configuration is not [valid](PlannerConfig::validate).
    pub fn new(catalog: Catalog, config: PlannerConfig, requirements: S) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            catalog,
            config,
            proteins: ProteinTable::default(),
            requirements,
        })
    }

    /// Replace the protein table used for diversity
    pub fn with_proteins(mut self, proteins: ProteinTable) -> Self {
        self.proteins = proteins;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn proteins(&self) -> &ProteinTable {
        &self.proteins
    }

    pub fn requirement_source(&self) -> &S {
        &self.requirements
    }

    /// Nutritional requirements of a child with the planner configuration
    pub fn requirements(&self, profile: &ChildProfile) -> NutritionalRequirements {
        self.requirements.requirements(profile, &self.config)
    }

    fn assembler(&self) -> Assembler {
        Assembler::new(&self.catalog, &self.config, &self.proteins)
    }

    /// Lunches for the 5 school days from `start`
    pub fn generate_week(&self, profile: &ChildProfile, start: NaiveDate) -> MenuPlan {
        self.generate_week_with_rng(profile, start, &mut rand::thread_rng())
    }

    /// Same as [`Self::generate_week`] with a custom random generator
    pub fn generate_week_with_rng<R: Rng + ?Sized>(
        &self,
        profile: &ChildProfile,
        start: NaiveDate,
        rng: &mut R,
    ) -> MenuPlan {
        self.generate_with_rng(profile, start, &[MealType::Lunch], Horizon::Week, rng)
    }

    /// Lunches for 4 weeks of school days
    ///
    /// The month starts on the first Monday on or after `start`.
    pub fn generate_month(&self, profile: &ChildProfile, start: NaiveDate) -> MenuPlan {
        self.generate_month_with_rng(profile, start, &mut rand::thread_rng())
    }

    /// Same as [`Self::generate_month`] with a custom random generator
    pub fn generate_month_with_rng<R: Rng + ?Sized>(
        &self,
        profile: &ChildProfile,
        start: NaiveDate,
        rng: &mut R,
    ) -> MenuPlan {
        self.generate_with_rng(profile, start, &[MealType::Lunch], Horizon::Month, rng)
    }

    /// Plan any set of meal types over a horizon
    ///
    /// Repeated meal types are planned once. Slots without candidates are
    /// skipped, so the plan may be shorter than `days x meal types`.
    pub fn generate(
        &self,
        profile: &ChildProfile,
        start: NaiveDate,
        meal_types: &[MealType],
        horizon: Horizon,
    ) -> MenuPlan {
        self.generate_with_rng(profile, start, meal_types, horizon, &mut rand::thread_rng())
    }

    /// Same as [`Self::generate`] with a custom random generator
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        profile: &ChildProfile,
        start: NaiveDate,
        meal_types: &[MealType],
        horizon: Horizon,
        rng: &mut R,
    ) -> MenuPlan {
        let requirements = self.requirements(profile);
        self.assembler()
            .generate(profile, &requirements, start, meal_types, horizon, rng)
    }

    /// Plan a single meal
    pub fn generate_day(
        &self,
        profile: &ChildProfile,
        date: NaiveDate,
        meal_type: MealType,
    ) -> Result<MenuSlot, SelectError> {
        self.generate_day_with_rng(profile, date, meal_type, &mut rand::thread_rng())
    }

    /// Same as [`Self::generate_day`] with a custom random generator
    pub fn generate_day_with_rng<R: Rng + ?Sized>(
        &self,
        profile: &ChildProfile,
        date: NaiveDate,
        meal_type: MealType,
        rng: &mut R,
    ) -> Result<MenuSlot, SelectError> {
        let requirements = self.requirements(profile);
        self.assembler()
            .generate_day(profile, &requirements, date, meal_type, rng)
    }

    /// Pick a different recipe for one slot of a plan
    ///
    /// Returns a new plan where only that slot changed, with the totals
    /// recomputed. The new recipe is not used anywhere else in the plan.
    /// If the slot doesn't exist or there is no other candidate, the plan is
    /// returned unchanged.
    pub fn replace_slot(
        &self,
        plan: &MenuPlan,
        date: NaiveDate,
        meal_type: MealType,
        profile: &ChildProfile,
    ) -> MenuPlan {
        self.replace_slot_with_rng(plan, date, meal_type, profile, &mut rand::thread_rng())
    }

    /// Same as [`Self::replace_slot`] with a custom random generator
    pub fn replace_slot_with_rng<R: Rng + ?Sized>(
        &self,
        plan: &MenuPlan,
        date: NaiveDate,
        meal_type: MealType,
        profile: &ChildProfile,
        rng: &mut R,
    ) -> MenuPlan {
        let requirements = self.requirements(profile);
        self.assembler()
            .replace_slot(plan, date, meal_type, profile, &requirements, rng)
    }

    /// Consolidated ingredients of a plan
    pub fn shopping_list(&self, plan: &MenuPlan) -> ShoppingList {
        ShoppingList::from_plan(plan)
    }
}

impl MenuPlanner<FaoRequirements> {
    /// Planner with the bundled catalog, the default configuration and the
    /// FAO/WHO requirements at the current date
    ///
    /// This is only available when the `bundled_catalog` feature is enabled.
    #[cfg(feature = "bundled_catalog")]
    pub fn bundled() -> Self {
        Self {
            catalog: Catalog::bundled().clone(),
            config: PlannerConfig::default(),
            proteins: ProteinTable::default(),
            requirements: FaoRequirements::today(),
        }
    }
}
