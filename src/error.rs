//! Error types

use thiserror::Error;

/// Error from the [recipe selector](crate::select)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectError {
    /// After filtering and removing excluded recipes nothing is left.
    ///
    /// This is recoverable. Full plan generation skips the slot and slot
    /// replacement leaves the plan unchanged.
    #[error("No suitable recipes available")]
    NoCandidates,
}

/// Error loading a [`Catalog`](crate::catalog::Catalog)
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Error parsing catalog: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid recipe '{id}': {reason}")]
    InvalidRecipe { id: String, reason: &'static str },

    #[error("Duplicate recipe id: '{id}'")]
    DuplicateId { id: String },
}

/// Error loading a [`PlannerConfig`](crate::config::PlannerConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Error parsing configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}
