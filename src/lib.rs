//! GigeBid Matchmaker - team formation engine for the GigeBid supplier marketplace
//!
//! This library selects a team of informal suppliers for a fulfillment project.
//! It scores candidates, builds a greedy baseline, refines it with an
//! evolutionary search, then explains the choice and splits the budget.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{source_for, FormationError, RandomSource, TeamMatcher};
pub use models::{
    Candidate, ConflictSet, OptimizerConfig, ProjectRequirement, RecommendTeamRequest, Team,
    TeamRecommendation,
};
