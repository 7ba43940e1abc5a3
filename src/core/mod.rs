// Core algorithm exports
pub mod cost;
pub mod explain;
pub mod filters;
pub mod greedy;
pub mod location;
pub mod matcher;
pub mod optimizer;
pub mod rng;
pub mod roles;
pub mod scoring;

pub use cost::allocate_costs;
pub use explain::{confidence_score, explain_team};
pub use filters::filter_candidates;
pub use greedy::assemble_greedy;
pub use matcher::{FormationError, TeamMatcher};
pub use optimizer::{team_fitness, OptimizerError, PopulationOptimizer};
pub use rng::{source_for, RandomSource};
pub use roles::{RoleRule, RoleTable};
pub use scoring::{calculate_match_score, score_candidates};
