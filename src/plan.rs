//! Menu assembly over a week or a month of school days
//!
//! A plan is a grid of dates by meal types, filled one slot at a time with
//! the [`Selector`]. A recipe is never repeated in the whole horizon,
//! while cuisine and protein diversity is judged one calendar week at a time.

use std::{collections::HashSet, sync::Arc};

use chrono::{Datelike, NaiveDate, Weekday};
use enum_map::EnumMap;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    catalog::Catalog,
    config::PlannerConfig,
    error::SelectError,
    filter::CandidateFilter,
    model::{round_to, MealType, Nutrition, Recipe},
    nutrition::NutritionalRequirements,
    profile::ChildProfile,
    protein::ProteinTable,
    select::{Diversity, Selector, SlotRequest},
};

/// Period covered by a plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Horizon {
    /// The 5 weekdays starting at the start date
    Week,
    /// 4 weeks of weekdays starting on the first Monday on or after the
    /// start date
    Month,
}

impl Horizon {
    /// Number of school days in the horizon
    pub fn days(self) -> usize {
        match self {
            Horizon::Week => 5,
            Horizon::Month => 20,
        }
    }

    /// The school days of the horizon from `start`
    pub fn school_days(self, start: NaiveDate) -> Vec<NaiveDate> {
        let first = match self {
            Horizon::Week => Some(start),
            Horizon::Month => start.iter_days().find(|d| d.weekday() == Weekday::Mon),
        };
        let Some(first) = first else {
            return Vec::new();
        };
        first
            .iter_days()
            .filter(|d| is_weekday(*d))
            .take(self.days())
            .collect()
    }
}

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// A planned meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuSlot {
    pub date: NaiveDate,
    pub meal_type: MealType,
    /// Shared recipe, never modified
    pub recipe: Arc<Recipe>,
    /// Multiplier of the recipe servings, rounded to 2 decimals
    pub portions: f64,
    /// Recipe nutrition scaled by the portions
    pub nutrition: Nutrition,
}

impl MenuSlot {
    /// Create a slot sizing the recipe to `target_calories`
    ///
    /// The portions are `target / recipe calories` clamped to the configured
    /// range. Nutrition is scaled with the unrounded portions.
    pub fn new(
        date: NaiveDate,
        meal_type: MealType,
        recipe: Arc<Recipe>,
        target_calories: f64,
        config: &PlannerConfig,
    ) -> Self {
        let portions = config.clamp_portions(target_calories / recipe.nutrition.calories);
        let nutrition = recipe.nutrition.scaled(portions);
        Self {
            date,
            meal_type,
            recipe,
            portions: round_to(portions, 2),
            nutrition,
        }
    }

    /// Check the slot calories are within `tolerance` (a fraction) of the
    /// target
    pub fn within_calorie_tolerance(&self, target_calories: f64, tolerance: f64) -> bool {
        let low = target_calories * (1.0 - tolerance);
        let high = target_calories * (1.0 + tolerance);
        (low..=high).contains(&self.nutrition.calories)
    }
}

/// A menu for a child over a [`Horizon`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuPlan {
    pub child_id: String,
    /// The start date as requested
    pub start_date: NaiveDate,
    pub horizon: Horizon,
    /// Requested meal types, without duplicates
    pub meal_types: Vec<MealType>,
    /// Slots ordered by date, then by the order of [`Self::meal_types`]
    pub slots: Vec<MenuSlot>,
    /// Sum of the nutrition of all slots
    pub total_nutrition: Nutrition,
}

impl MenuPlan {
    /// Find the slot of a date and meal type
    pub fn slot(&self, date: NaiveDate, meal_type: MealType) -> Option<&MenuSlot> {
        self.slots
            .iter()
            .find(|s| s.date == date && s.meal_type == meal_type)
    }

    /// Recipes in slot order
    pub fn recipes(&self) -> impl Iterator<Item = &Arc<Recipe>> {
        self.slots.iter().map(|s| &s.recipe)
    }

    /// Sum the nutrition of every slot into [`Self::total_nutrition`]
    pub fn recompute_totals(&mut self) {
        self.total_nutrition = self.slots.iter().map(|s| &s.nutrition).sum();
    }

    /// Check no recipe is used twice
    pub fn has_no_repeats(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.slots.len());
        self.recipes().all(|r| seen.insert(r.id.as_str()))
    }

    /// Check no recipe contains any of the allergies
    pub fn is_allergen_free(&self, allergies: &[String]) -> bool {
        self.recipes().all(|r| !r.contains_allergen(allergies))
    }
}

/// Builds and edits [`MenuPlan`]s from a catalog
///
/// The configuration must be valid, [`MenuPlanner::new`](crate::MenuPlanner::new)
/// checks it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Assembler<'a> {
    catalog: &'a Catalog,
    config: &'a PlannerConfig,
    proteins: &'a ProteinTable,
}

impl<'a> Assembler<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a PlannerConfig, proteins: &'a ProteinTable) -> Self {
        Self {
            catalog,
            config,
            proteins,
        }
    }

    fn selector(&self) -> Selector<'a> {
        Selector::new(&self.config.selection, self.proteins)
    }

    /// Candidates of a meal type for a profile
    pub fn candidates(&self, profile: &ChildProfile, meal_type: MealType) -> Vec<Arc<Recipe>> {
        CandidateFilter::new(&profile.allergies)
            .min_reheat_rating(self.config.min_reheat_rating)
            .meal_type(meal_type)
            .apply(self.catalog)
    }

    /// Generate a full plan
    ///
    /// Slots without candidates are skipped, so the plan may be shorter than
    /// `days x meal types`.
    #[tracing::instrument(level = "debug", name = "generate", skip_all, fields(child = %profile.id, %start, %horizon))]
    pub fn generate<R: Rng + ?Sized>(
        &self,
        profile: &ChildProfile,
        requirements: &NutritionalRequirements,
        start: NaiveDate,
        meal_types: &[MealType],
        horizon: Horizon,
        rng: &mut R,
    ) -> MenuPlan {
        let meal_types = dedup(meal_types);
        let mut pools: EnumMap<MealType, Vec<Arc<Recipe>>> = EnumMap::default();
        for &meal_type in &meal_types {
            pools[meal_type] = self.candidates(profile, meal_type);
        }

        let selector = self.selector();
        let mut used = HashSet::new();
        let mut diversity = Diversity::new();
        let mut week = None;
        let mut slots = Vec::with_capacity(horizon.days() * meal_types.len());

        for date in horizon.school_days(start) {
            if week != Some(date.iso_week()) {
                diversity.clear();
                week = Some(date.iso_week());
            }

            for &meal_type in &meal_types {
                let target = requirements.meal_calories[meal_type];
                let request = SlotRequest {
                    target_calories: target,
                    preferences: &profile.preferences,
                    exclude: &used,
                    diversity: Some(&diversity),
                };
                let recipe = match selector.select(&pools[meal_type], &request, rng) {
                    Ok(recipe) => recipe,
                    Err(err) => {
                        tracing::warn!(%date, %meal_type, "{err}, skipping slot");
                        continue;
                    }
                };
                used.insert(recipe.id.clone());
                diversity.record(&recipe, self.proteins);
                slots.push(MenuSlot::new(date, meal_type, recipe, target, self.config));
            }
        }

        let mut plan = MenuPlan {
            child_id: profile.id.clone(),
            start_date: start,
            horizon,
            meal_types,
            slots,
            total_nutrition: Nutrition::default(),
        };
        plan.recompute_totals();
        tracing::debug!(slots = plan.slots.len(), "plan generated");
        plan
    }

    /// Plan a single meal, without any exclusion
    pub fn generate_day<R: Rng + ?Sized>(
        &self,
        profile: &ChildProfile,
        requirements: &NutritionalRequirements,
        date: NaiveDate,
        meal_type: MealType,
        rng: &mut R,
    ) -> Result<MenuSlot, SelectError> {
        let target = requirements.meal_calories[meal_type];
        let exclude = HashSet::new();
        let request = SlotRequest {
            target_calories: target,
            preferences: &profile.preferences,
            exclude: &exclude,
            diversity: None,
        };
        let pool = self.candidates(profile, meal_type);
        let recipe = self.selector().select(&pool, &request, rng)?;
        Ok(MenuSlot::new(date, meal_type, recipe, target, self.config))
    }

    /// Pick another recipe for one slot
    ///
    /// Returns a new plan where only that slot changed, and the totals are
    /// recomputed. The new recipe is not used anywhere else in the plan and
    /// is different from the replaced one.
    ///
    /// If the slot doesn't exist or there is no other candidate, the plan is
    /// returned unchanged.
    #[tracing::instrument(level = "debug", name = "replace", skip_all, fields(%date, %meal_type))]
    pub fn replace_slot<R: Rng + ?Sized>(
        &self,
        plan: &MenuPlan,
        date: NaiveDate,
        meal_type: MealType,
        profile: &ChildProfile,
        requirements: &NutritionalRequirements,
        rng: &mut R,
    ) -> MenuPlan {
        let Some(index) = plan
            .slots
            .iter()
            .position(|s| s.date == date && s.meal_type == meal_type)
        else {
            tracing::debug!("slot not in plan");
            return plan.clone();
        };

        // every other slot, plus the replaced recipe only for this pick
        let exclude: HashSet<String> = plan.recipes().map(|r| r.id.clone()).collect();

        let target = requirements.meal_calories[meal_type];
        let request = SlotRequest {
            target_calories: target,
            preferences: &profile.preferences,
            exclude: &exclude,
            diversity: None,
        };
        let pool = self.candidates(profile, meal_type);
        let recipe = match self.selector().select(&pool, &request, rng) {
            Ok(recipe) => recipe,
            Err(err) => {
                tracing::debug!("{err}, keeping the plan");
                return plan.clone();
            }
        };

        let mut new_plan = plan.clone();
        new_plan.slots[index] = MenuSlot::new(date, meal_type, recipe, target, self.config);
        new_plan.recompute_totals();
        new_plan
    }
}

fn dedup(meal_types: &[MealType]) -> Vec<MealType> {
    let mut seen = HashSet::new();
    meal_types
        .iter()
        .copied()
        .filter(|m| seen.insert(*m))
        .collect()
}
