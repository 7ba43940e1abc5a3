use crate::models::{
    Candidate, ConflictSet, OptimizerConfig, ProjectRequirement, SelectionStrategy, Team,
    TeamRecommendation,
};
use crate::core::{
    cost::{allocate_costs, MAX_BUDGET},
    explain::{confidence_score, count_local_members, explain_team},
    filters::filter_candidates,
    greedy::assemble_greedy,
    optimizer::PopulationOptimizer,
    rng::RandomSource,
    roles::RoleTable,
    scoring::score_candidates,
};
use thiserror::Error;

/// Failures surfaced to the caller; optimizer faults are recovered internally
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormationError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("No candidates available for the requested skills")]
    NoCandidatesAvailable,
}

/// Team formation orchestrator - implements the selection pipeline
///
/// # Pipeline Stages
/// 1. Request validation
/// 2. Skill/specialization filtering
/// 3. Scoring and ranking
/// 4. Greedy baseline assembly
/// 5. Evolutionary search seeded with the baseline (baseline on failure)
/// 6. Explanation, confidence and cost allocation
#[derive(Debug, Clone)]
pub struct TeamMatcher {
    optimizer: PopulationOptimizer,
    roles: RoleTable,
}

impl TeamMatcher {
    pub fn new(config: OptimizerConfig) -> Self {
        Self::with_roles(config, RoleTable::default())
    }

    pub fn with_roles(config: OptimizerConfig, roles: RoleTable) -> Self {
        Self {
            optimizer: PopulationOptimizer::new(config, roles.clone()),
            roles,
        }
    }

    pub fn with_default_config() -> Self {
        Self::new(OptimizerConfig::default())
    }

    pub fn config(&self) -> &OptimizerConfig {
        self.optimizer.config()
    }

    /// Recommend a team for a requirement
    ///
    /// # Arguments
    /// * `requirement` - The project's needs
    /// * `candidates` - Snapshot of every candidate from the repository
    /// * `conflicts` - Candidate pairs that may not share a team
    /// * `rng` - Random source for the evolutionary search
    ///
    /// # Returns
    /// TeamRecommendation, possibly with partial fulfillment, or the reason
    /// no team could be formed
    pub fn recommend<R: RandomSource + ?Sized>(
        &self,
        requirement: &ProjectRequirement,
        candidates: &[Candidate],
        conflicts: &ConflictSet,
        rng: &mut R,
    ) -> Result<TeamRecommendation, FormationError> {
        let capacity_needed = validate_requirement(requirement)?;

        let filtered = filter_candidates(candidates, requirement);
        tracing::debug!(
            "{} of {} candidates passed the skill filter",
            filtered.len(),
            candidates.len()
        );

        if filtered.is_empty() {
            return Err(FormationError::NoCandidatesAvailable);
        }

        let scored = score_candidates(&filtered, requirement);
        let baseline = assemble_greedy(
            &scored,
            capacity_needed,
            requirement.primary_specialization(),
            &self.roles,
            conflicts,
        );

        let (team, strategy) =
            match self
                .optimizer
                .optimize(&scored, capacity_needed, Some(&baseline), conflicts, rng)
            {
                Ok(team) if !team.is_empty() => (team, SelectionStrategy::Optimizer),
                Ok(_) => {
                    tracing::warn!("Optimizer produced an empty team, using greedy assembly");
                    (baseline, SelectionStrategy::GreedyFallback)
                }
                Err(e) => {
                    tracing::warn!("Optimizer failed ({}), falling back to greedy assembly", e);
                    (baseline, SelectionStrategy::GreedyFallback)
                }
            };

        Ok(build_recommendation(team, requirement, capacity_needed, strategy))
    }
}

impl Default for TeamMatcher {
    fn default() -> Self {
        Self::with_default_config()
    }
}

/// Reject requests the engine cannot work on; returns the capacity needed
pub fn validate_requirement(requirement: &ProjectRequirement) -> Result<u32, FormationError> {
    if requirement.location.trim().is_empty() {
        return Err(FormationError::InvalidRequest(
            "location is required".to_string(),
        ));
    }

    if requirement.capacity_needed <= 0 {
        return Err(FormationError::InvalidRequest(format!(
            "capacity_needed must be positive, got {}",
            requirement.capacity_needed
        )));
    }

    let capacity_needed = u32::try_from(requirement.capacity_needed).map_err(|_| {
        FormationError::InvalidRequest(format!(
            "capacity_needed {} is too large",
            requirement.capacity_needed
        ))
    })?;

    if !requirement.budget.is_finite() || requirement.budget < 0.0 {
        return Err(FormationError::InvalidRequest(format!(
            "budget must be a non-negative number, got {}",
            requirement.budget
        )));
    }

    if requirement.budget > MAX_BUDGET {
        return Err(FormationError::InvalidRequest(format!(
            "budget {} exceeds the maximum of {}",
            requirement.budget, MAX_BUDGET
        )));
    }

    Ok(capacity_needed)
}

fn build_recommendation(
    team: Team,
    requirement: &ProjectRequirement,
    capacity_needed: u32,
    strategy: SelectionStrategy,
) -> TeamRecommendation {
    let total_capacity = team.total_capacity();

    TeamRecommendation {
        explanation: explain_team(&team, requirement),
        estimated_cost: allocate_costs(&team, requirement.budget),
        confidence_score: confidence_score(&team, requirement),
        average_reputation: (team.average_reputation() * 10.0).round() / 10.0,
        local_members: count_local_members(&team, &requirement.location),
        partial_fulfillment: total_capacity < capacity_needed,
        total_capacity,
        capacity_needed,
        strategy,
        recommended_team: team,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::source_for;
    use crate::models::Specialization;

    fn create_candidate(id: &str, capacity: u32, specialization: Specialization, skills: &[&str]) -> Candidate {
        Candidate {
            id: id.to_string(),
            name: format!("Supplier {}", id),
            location: "Kibera".to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            capacity_numeric: capacity,
            reputation_score: 8.0,
            projects_completed: 6,
            specialization,
            total_earnings: 0.0,
        }
    }

    fn create_requirement(capacity: i64) -> ProjectRequirement {
        ProjectRequirement {
            location: "Kibera, Nairobi".to_string(),
            capacity_needed: capacity,
            budget: 12000.0,
            skills_required: vec!["Egg Supply".to_string()],
            project_type: None,
        }
    }

    fn candidates() -> Vec<Candidate> {
        vec![
            create_candidate("1", 4, Specialization::EggSupply, &["Egg Supply"]),
            create_candidate("2", 5, Specialization::EggSupply, &["Egg Supply"]),
            create_candidate("3", 3, Specialization::EggSupply, &["Egg Supply", "Transportation"]),
            create_candidate("4", 9, Specialization::Other, &["Tailoring"]),
        ]
    }

    #[test]
    fn test_recommend_basic() {
        let matcher = TeamMatcher::with_default_config();
        let result = matcher
            .recommend(&create_requirement(8), &candidates(), &ConflictSet::new(), &mut source_for(Some(1)))
            .unwrap();

        assert!(result.total_capacity >= 8);
        assert!(!result.partial_fulfillment);
        assert!(!result.recommended_team.contains("4"));
        assert_eq!(result.estimated_cost.iter().map(|c| c.share).sum::<i64>(), 12000);
        assert!(result.confidence_score <= 95);
    }

    #[test]
    fn test_invalid_capacity() {
        let matcher = TeamMatcher::with_default_config();
        let result = matcher.recommend(&create_requirement(0), &candidates(), &ConflictSet::new(), &mut source_for(Some(1)));

        assert!(matches!(result, Err(FormationError::InvalidRequest(_))));
    }

    #[test]
    fn test_missing_location() {
        let mut requirement = create_requirement(5);
        requirement.location = "  ".to_string();

        assert!(matches!(validate_requirement(&requirement), Err(FormationError::InvalidRequest(_))));
    }

    #[test]
    fn test_negative_budget() {
        let mut requirement = create_requirement(5);
        requirement.budget = -1.0;

        assert!(matches!(validate_requirement(&requirement), Err(FormationError::InvalidRequest(_))));
    }

    #[test]
    fn test_oversized_budget_rejected() {
        let matcher = TeamMatcher::with_default_config();
        let mut requirement = create_requirement(5);
        requirement.budget = 1e19;

        assert!(matches!(validate_requirement(&requirement), Err(FormationError::InvalidRequest(_))));
        let result = matcher.recommend(&requirement, &candidates(), &ConflictSet::new(), &mut source_for(Some(1)));
        assert!(matches!(result, Err(FormationError::InvalidRequest(_))));

        requirement.budget = MAX_BUDGET;
        assert!(validate_requirement(&requirement).is_ok());
    }

    #[test]
    fn test_no_candidates() {
        let matcher = TeamMatcher::with_default_config();
        let mut requirement = create_requirement(5);
        requirement.skills_required = vec!["Welding".to_string()];

        let result = matcher.recommend(&requirement, &candidates(), &ConflictSet::new(), &mut source_for(Some(1)));
        assert_eq!(result, Err(FormationError::NoCandidatesAvailable));
    }

    #[test]
    fn test_partial_fulfillment_reported() {
        let matcher = TeamMatcher::with_default_config();
        let result = matcher
            .recommend(&create_requirement(50), &candidates(), &ConflictSet::new(), &mut source_for(Some(1)))
            .unwrap();

        assert!(result.partial_fulfillment);
        assert_eq!(result.total_capacity, 12);
        assert_eq!(result.capacity_needed, 50);
    }

    #[test]
    fn test_low_scores_fall_back_to_greedy() {
        let config = OptimizerConfig {
            min_score: 101.0,
            ..OptimizerConfig::default()
        };
        let matcher = TeamMatcher::new(config);
        let result = matcher
            .recommend(&create_requirement(8), &candidates(), &ConflictSet::new(), &mut source_for(Some(1)))
            .unwrap();

        assert_eq!(result.strategy, SelectionStrategy::GreedyFallback);
        assert_eq!(result.recommended_team.ids(), vec!["2", "1"]);
    }
}
