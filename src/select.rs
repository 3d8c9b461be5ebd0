//! Recipe selection for a single slot
//!
//! Selection is greedy and stochastic. Every candidate gets a score, the best
//! [`top_k`](crate::config::SelectionWeights::top_k) are kept and one of them
//! is picked uniformly at random. Together with a small random jitter in the
//! score, this gives different menus on each run while keeping them good.
//!
//! Score terms:
//! - reheat rating, per star
//! - child acceptance bonus, high or medium
//! - transport hours, per hour
//! - cuisine not used yet this week
//! - main [protein](crate::protein) not used yet this week
//! - a tag matches a liked term, and a penalty if one matches a disliked term
//! - calorie distance to the slot target, as a penalty
//! - jitter
//!
//! Dislikes are only a penalty. The only hard exclusions are the ones made by
//! the [candidate filter](crate::filter) and the already used recipes.

use std::{collections::HashSet, sync::Arc};

use rand::Rng;

use crate::{
    config::SelectionWeights,
    error::SelectError,
    model::{Acceptance, Recipe},
    profile::Preferences,
    protein::{Protein, ProteinTable},
};

/// Cuisines and proteins already used in the current week
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diversity {
    /// Lowercase cuisine names
    pub cuisines: HashSet<String>,
    pub proteins: HashSet<Protein>,
}

impl Diversity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the cuisine and main protein of `recipe` as used
    pub fn record(&mut self, recipe: &Recipe, table: &ProteinTable) {
        self.cuisines.insert(recipe.cuisine.to_lowercase());
        if let Some(protein) = table.main_protein(recipe) {
            self.proteins.insert(protein);
        }
    }

    pub fn clear(&mut self) {
        self.cuisines.clear();
        self.proteins.clear();
    }

    fn cuisine_used(&self, recipe: &Recipe) -> bool {
        self.cuisines.contains(&recipe.cuisine.to_lowercase())
    }
}

/// Everything that describes the slot being filled
#[derive(Debug, Clone, Copy)]
pub struct SlotRequest<'a> {
    pub target_calories: f64,
    pub preferences: &'a Preferences,
    /// Recipe ids that can't be selected
    pub exclude: &'a HashSet<String>,
    /// Used cuisines and proteins. With `None` there are no diversity bonuses.
    pub diversity: Option<&'a Diversity>,
}

/// Scores and picks recipes
#[derive(Debug, Clone, Copy)]
pub struct Selector<'a> {
    weights: &'a SelectionWeights,
    proteins: &'a ProteinTable,
}

impl<'a> Selector<'a> {
    pub fn new(weights: &'a SelectionWeights, proteins: &'a ProteinTable) -> Self {
        Self { weights, proteins }
    }

    /// Score of a recipe without the random jitter
    pub fn base_score(&self, recipe: &Recipe, request: &SlotRequest) -> f64 {
        let w = self.weights;
        let mut score = 0.0;

        score += f64::from(recipe.reheat_rating) * w.reheat;
        score += match recipe.child_acceptance {
            Acceptance::High => w.high_acceptance,
            Acceptance::Medium => w.medium_acceptance,
            Acceptance::Low => 0.0,
        };
        score += recipe.transport_hours * w.transport;

        if let Some(diversity) = request.diversity {
            if !diversity.cuisine_used(recipe) {
                score += w.cuisine_diversity;
            }
            if let Some(protein) = self.proteins.main_protein(recipe) {
                if !diversity.proteins.contains(&protein) {
                    score += w.protein_diversity;
                }
            }
        }

        if recipe.has_tag_matching(&request.preferences.likes) {
            score += w.liked;
        }
        if recipe.has_tag_matching(&request.preferences.dislikes) {
            score -= w.disliked;
        }

        score -= (recipe.nutrition.calories - request.target_calories).abs() / w.calorie_divisor;
        score
    }

    /// Score of a recipe with the random jitter, in `[0, jitter)`
    pub fn score<R: Rng + ?Sized>(&self, recipe: &Recipe, request: &SlotRequest, rng: &mut R) -> f64 {
        let jitter = if self.weights.jitter > 0.0 {
            rng.gen::<f64>() * self.weights.jitter
        } else {
            0.0
        };
        self.base_score(recipe, request) + jitter
    }

    /// Pick one recipe from `pool`
    ///
    /// The pool must already be filtered by the hard constraints. Recipes in
    /// [`SlotRequest::exclude`] are removed first.
    pub fn select<R: Rng + ?Sized>(
        &self,
        pool: &[Arc<Recipe>],
        request: &SlotRequest,
        rng: &mut R,
    ) -> Result<Arc<Recipe>, SelectError> {
        let mut scored: Vec<(f64, &Arc<Recipe>)> = pool
            .iter()
            .filter(|r| !request.exclude.contains(&r.id))
            .map(|r| (self.score(r, request, rng), r))
            .collect();

        if scored.is_empty() {
            return Err(SelectError::NoCandidates);
        }

        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        let top = scored.len().min(self.weights.top_k.max(1));
        let (score, recipe) = scored[rng.gen_range(0..top)];
        tracing::debug!(
            id = %recipe.id,
            score,
            candidates = scored.len(),
            top,
            "selected recipe"
        );
        Ok(Arc::clone(recipe))
    }
}
