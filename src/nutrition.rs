//! Daily nutritional requirements of a child
//!
//! Energy values come from the FAO/WHO reference tables for children with
//! moderate activity, adjusted by the actual weight of the child against the
//! reference weight of the age group. Outside the tabulated ages a kcal/kg
//! rule is used.

use chrono::NaiveDate;
use enum_map::EnumMap;
use serde::{Deserialize, Serialize};

use crate::{
    config::PlannerConfig,
    model::{round_to, MealType},
    profile::{ActivityLevel, ChildProfile, Sex},
};

struct AgeGroup {
    age: u32,
    kcal: f64,
    ref_weight: f64,
}

const fn group(age: u32, kcal: f64, ref_weight: f64) -> AgeGroup {
    AgeGroup {
        age,
        kcal,
        ref_weight,
    }
}

const MALE: [AgeGroup; 9] = [
    group(4, 1360.0, 17.7),
    group(5, 1467.0, 19.7),
    group(6, 1573.0, 21.7),
    group(7, 1692.0, 24.0),
    group(8, 1830.0, 26.7),
    group(9, 1978.0, 29.7),
    group(10, 2150.0, 33.3),
    group(11, 2341.0, 37.5),
    group(12, 2548.0, 42.3),
];

const FEMALE: [AgeGroup; 9] = [
    group(4, 1241.0, 16.8),
    group(5, 1330.0, 18.6),
    group(6, 1428.0, 20.6),
    group(7, 1554.0, 23.3),
    group(8, 1698.0, 26.6),
    group(9, 1854.0, 30.5),
    group(10, 2006.0, 34.7),
    group(11, 2149.0, 39.2),
    group(12, 2276.0, 43.8),
];

/// kcal per kg for ages without a table entry: `(from, to_exclusive, kcal)`
const KCAL_PER_KG: [(u32, u32, f64); 3] = [(4, 6, 70.0), (6, 9, 62.5), (9, 13, 40.0)];
const FALLBACK_KCAL_PER_KG: f64 = 50.0;

const PROTEIN_PCT: f64 = 17.5;
const CARBS_PCT: f64 = 52.5;
const FAT_PCT: f64 = 30.0;

const KCAL_PER_GRAM_PROTEIN: f64 = 4.0;
const KCAL_PER_GRAM_CARBS: f64 = 4.0;
const KCAL_PER_GRAM_FAT: f64 = 9.0;

/// Macronutrient targets in grams
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Macros {
    pub protein_grams: f64,
    pub carbs_grams: f64,
    pub fat_grams: f64,
}

/// What the planner needs to know about the energy needs of a child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionalRequirements {
    pub daily_calories: f64,
    /// Target calories for each meal type
    pub meal_calories: EnumMap<MealType, f64>,
    /// Macro targets for the lunch
    pub lunch_macros: Macros,
}

impl NutritionalRequirements {
    /// Split `daily_calories` into meals with the configured fractions
    pub fn from_daily(daily_calories: f64, config: &PlannerConfig) -> Self {
        let meal_calories =
            EnumMap::from_fn(|meal_type| config.meal_calories(daily_calories, meal_type));
        let lunch_macros = macros(meal_calories[MealType::Lunch]);
        Self {
            daily_calories,
            meal_calories,
            lunch_macros,
        }
    }

    pub fn lunch_calories(&self) -> f64 {
        self.meal_calories[MealType::Lunch]
    }
}

/// Source of nutritional requirements for the planner
///
/// Implement this to plug a different formula.
pub trait RequirementSource {
    fn requirements(&self, profile: &ChildProfile, config: &PlannerConfig)
        -> NutritionalRequirements;
}

/// Requirements from the FAO/WHO tables
///
/// The age of the child is computed at [`Self::today`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaoRequirements {
    pub today: NaiveDate,
}

impl FaoRequirements {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Compute ages with the current local date
    pub fn today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }
}

impl RequirementSource for FaoRequirements {
    fn requirements(
        &self,
        profile: &ChildProfile,
        config: &PlannerConfig,
    ) -> NutritionalRequirements {
        let age = profile.age_on(self.today);
        let daily = daily_calories(
            age,
            profile.sex,
            profile.weight_kg,
            profile.activity_level,
        );
        tracing::debug!(age, daily, "computed daily calories");
        NutritionalRequirements::from_daily(daily, config)
    }
}

/// A fixed daily calorie value, no matter the profile
///
/// Useful for tests and for callers who already know the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRequirements(pub f64);

impl RequirementSource for FixedRequirements {
    fn requirements(&self, _: &ChildProfile, config: &PlannerConfig) -> NutritionalRequirements {
        NutritionalRequirements::from_daily(self.0, config)
    }
}

/// Daily calories for a child, rounded to an integer
pub fn daily_calories(age: u32, sex: Sex, weight_kg: f64, activity: ActivityLevel) -> f64 {
    let table = match sex {
        Sex::Male => &MALE,
        Sex::Female => &FEMALE,
    };

    let base = match table.iter().find(|g| g.age == age) {
        Some(g) => g.kcal * (weight_kg / g.ref_weight),
        None => {
            let kcal_per_kg = KCAL_PER_KG
                .iter()
                .find(|(from, to, _)| (*from..*to).contains(&age))
                .map(|(_, _, k)| *k)
                .unwrap_or(FALLBACK_KCAL_PER_KG);
            weight_kg * kcal_per_kg
        }
    };

    (base * activity_multiplier(activity)).round()
}

fn activity_multiplier(activity: ActivityLevel) -> f64 {
    match activity {
        ActivityLevel::Light => 0.85,
        ActivityLevel::Moderate => 1.0,
        ActivityLevel::Heavy => 1.15,
    }
}

/// Macro split of `calories`, rounded to 1 decimal
pub fn macros(calories: f64) -> Macros {
    let grams = |pct: f64, kcal_per_gram: f64| round_to(calories * pct / 100.0 / kcal_per_gram, 1);
    Macros {
        protein_grams: grams(PROTEIN_PCT, KCAL_PER_GRAM_PROTEIN),
        carbs_grams: grams(CARBS_PCT, KCAL_PER_GRAM_CARBS),
        fat_grams: grams(FAT_PCT, KCAL_PER_GRAM_FAT),
    }
}
