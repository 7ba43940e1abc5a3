// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Candidate, ConflictSet, CostShare, OptimizerConfig, ProjectRequirement, Role,
    ScoredCandidate, SelectionStrategy, Specialization, Team, TeamMember, TeamRecommendation,
};
pub use requests::RecommendTeamRequest;
pub use responses::{CandidatesResponse, ErrorResponse, HealthResponse, RecommendTeamResponse};
