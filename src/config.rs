//! Planning policy configuration
//!
//! Every value here has a default, so an empty TOML file is a valid
//! configuration. Only the keys that need changing have to be written:
//!
//! ```toml
//! min_reheat_rating = 4
//!
//! [selection]
//! top_k = 10
//! jitter = 0.0
//! ```

use enum_map::{enum_map, EnumMap};
use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, model::MealType};

/// Policy constants used by the planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    /// Share of the daily calories for each meal type
    ///
    /// Must sum to 1. When written in a file all meal types must be present.
    pub meal_fractions: EnumMap<MealType, f64>,
    /// Minimum [`reheat_rating`](crate::model::Recipe::reheat_rating) a
    /// recipe needs to be a candidate
    pub min_reheat_rating: u8,
    /// Lower clamp of the portions multiplier
    pub min_portions: f64,
    /// Upper clamp of the portions multiplier
    pub max_portions: f64,
    /// Weights of the recipe selector
    pub selection: SelectionWeights,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            meal_fractions: enum_map! {
                MealType::Breakfast => 0.25,
                MealType::MorningSnack => 0.10,
                MealType::Lunch => 0.35,
                MealType::AfternoonSnack => 0.10,
                MealType::Dinner => 0.20,
            },
            min_reheat_rating: 3,
            min_portions: 0.5,
            max_portions: 2.0,
            selection: SelectionWeights::default(),
        }
    }
}

/// Score weights for the [recipe selector](crate::select)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionWeights {
    /// Points per reheat rating star
    pub reheat: f64,
    /// Bonus for [`Acceptance::High`](crate::model::Acceptance::High)
    pub high_acceptance: f64,
    /// Bonus for [`Acceptance::Medium`](crate::model::Acceptance::Medium)
    pub medium_acceptance: f64,
    /// Points per transport hour
    pub transport: f64,
    /// Bonus when the cuisine was not used yet this week
    pub cuisine_diversity: f64,
    /// Bonus when the main protein was not used yet this week
    pub protein_diversity: f64,
    /// Bonus when a tag matches a liked term
    pub liked: f64,
    /// Penalty (subtracted) when a tag matches a disliked term
    pub disliked: f64,
    /// The calorie distance to the target is divided by this
    pub calorie_divisor: f64,
    /// Upper bound of the random jitter added to every score
    pub jitter: f64,
    /// Number of best scored recipes to pick from
    pub top_k: usize,
}

impl Default for SelectionWeights {
    fn default() -> Self {
        Self {
            reheat: 10.0,
            high_acceptance: 30.0,
            medium_acceptance: 15.0,
            transport: 5.0,
            cuisine_diversity: 25.0,
            protein_diversity: 20.0,
            liked: 20.0,
            disliked: 50.0,
            calorie_divisor: 10.0,
            jitter: 40.0,
            top_k: 15,
        }
    }
}

impl PlannerConfig {
    /// Parse a configuration from TOML and validate it
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.meal_fractions.values().any(|f| *f < 0.0) {
            return Err(ConfigError::Invalid("meal fractions can't be negative"));
        }
        let total: f64 = self.meal_fractions.values().sum();
        if (total - 1.0).abs() > 1e-6 {
            return Err(ConfigError::Invalid("meal fractions must sum to 1"));
        }
        if !(1..=5).contains(&self.min_reheat_rating) {
            return Err(ConfigError::Invalid(
                "min reheat rating must be between 1 and 5",
            ));
        }
        if self.min_portions <= 0.0 || self.min_portions > self.max_portions {
            return Err(ConfigError::Invalid("invalid portions range"));
        }
        if self.selection.top_k == 0 {
            return Err(ConfigError::Invalid("top_k must be at least 1"));
        }
        if self.selection.jitter < 0.0 {
            return Err(ConfigError::Invalid("jitter can't be negative"));
        }
        if self.selection.calorie_divisor <= 0.0 {
            return Err(ConfigError::Invalid("calorie divisor must be positive"));
        }
        Ok(())
    }

    /// Target calories of a meal given the daily calories
    pub fn meal_calories(&self, daily_calories: f64, meal_type: MealType) -> f64 {
        (daily_calories * self.meal_fractions[meal_type]).round()
    }

    /// Clamp a portions multiplier to the configured range
    ///
    /// With an inverted range the upper bound wins.
    pub fn clamp_portions(&self, portions: f64) -> f64 {
        portions.max(self.min_portions).min(self.max_portions)
    }
}
