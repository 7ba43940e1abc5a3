use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::{default_skills, ConflictSet, ProjectRequirement, Specialization};

/// Request to recommend a team for a project
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendTeamRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(range(min = 1))]
    pub capacity_needed: i64,
    #[validate(range(min = 0.0, max = 9_007_199_254_740_992.0))]
    pub budget: f64,
    #[validate(length(min = 1))]
    #[serde(default = "default_skills")]
    pub skills_required: Vec<String>,
    #[serde(default)]
    pub project_type: Option<Specialization>,
    /// Fixes the optimizer's random source for reproducible results
    #[serde(default)]
    pub seed: Option<u64>,
    /// Candidate id pairs that must not share a team
    #[serde(default)]
    pub excluded_pairs: Vec<(String, String)>,
}

impl RecommendTeamRequest {
    pub fn requirement(&self) -> ProjectRequirement {
        ProjectRequirement {
            location: self.location.clone(),
            capacity_needed: self.capacity_needed,
            budget: self.budget,
            skills_required: self.skills_required.clone(),
            project_type: self.project_type,
        }
    }

    pub fn conflicts(&self) -> ConflictSet {
        ConflictSet::from_pairs(self.excluded_pairs.iter().cloned())
    }
}
