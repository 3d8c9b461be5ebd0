//! Main protein of a recipe
//!
//! Recipes don't declare their protein. It is inferred from the tags with a
//! lookup table from tag to [`Protein`]. The first tag found in the table
//! is the main protein.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::Recipe;

/// Canonical protein categories
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Protein {
    Chicken,
    Beef,
    Pork,
    Fish,
    Egg,
    Legume,
    Tuna,
    Shrimp,
}

const DEFAULT_TAGS: &[(&str, Protein)] = &[
    ("pollo", Protein::Chicken),
    ("chicken", Protein::Chicken),
    ("res", Protein::Beef),
    ("carne", Protein::Beef),
    ("beef", Protein::Beef),
    ("cerdo", Protein::Pork),
    ("pork", Protein::Pork),
    ("pescado", Protein::Fish),
    ("fish", Protein::Fish),
    ("huevo", Protein::Egg),
    ("egg", Protein::Egg),
    ("frijol", Protein::Legume),
    ("lenteja", Protein::Legume),
    ("garbanzo", Protein::Legume),
    ("legumbre", Protein::Legume),
    ("legume", Protein::Legume),
    ("atún", Protein::Tuna),
    ("atun", Protein::Tuna),
    ("tuna", Protein::Tuna),
    ("camarón", Protein::Shrimp),
    ("camaron", Protein::Shrimp),
    ("shrimp", Protein::Shrimp),
];

/// Lookup table from a lowercase tag to its [`Protein`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProteinTable {
    tags: HashMap<String, Protein>,
}

impl Default for ProteinTable {
    /// Spanish and English names for every protein
    fn default() -> Self {
        Self::new(DEFAULT_TAGS.iter().map(|&(t, p)| (t.to_string(), p)))
    }
}

impl ProteinTable {
    /// Build a table from `(tag, protein)` pairs
    ///
    /// Tags are lowercased. If a tag is repeated the last one wins.
    pub fn new(entries: impl IntoIterator<Item = (String, Protein)>) -> Self {
        let tags = entries
            .into_iter()
            .map(|(tag, protein)| (tag.to_lowercase(), protein))
            .collect();
        Self { tags }
    }

    /// Protein of a single tag
    pub fn lookup(&self, tag: &str) -> Option<Protein> {
        self.tags.get(tag.to_lowercase().as_str()).copied()
    }

    /// Main protein of a recipe, the first of its tags in the table
    pub fn main_protein(&self, recipe: &Recipe) -> Option<Protein> {
        recipe.tags.iter().find_map(|t| self.lookup(t))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
