use crate::models::{Candidate, ProjectRequirement, ScoredCandidate};
use crate::core::location::{locations_match, same_metro_area};
use std::cmp::Ordering;

const REPUTATION_WEIGHT: f64 = 40.0;
const LOCAL_BONUS: f64 = 25.0;
const METRO_BONUS: f64 = 15.0;
const CAPACITY_WEIGHT: f64 = 20.0;
const EXPERIENCE_WEIGHT: f64 = 15.0;

/// Projects after which experience stops adding to the score
pub const EXPERIENCE_SATURATION: f64 = 10.0;

/// Calculate a match score (0-100) for a candidate against a requirement
///
/// Scoring formula:
/// score = (
///     reputation / 10 * 40 +             # Reputation on a 0-10 scale
///     location bonus (25 | 15 | 0) +     # Same place, same metro area, elsewhere
///     min(capacity / needed, 1) * 20 +   # Capacity fit
///     min(projects / 10, 1) * 15         # Experience
/// )
pub fn calculate_match_score(candidate: &Candidate, requirement: &ProjectRequirement) -> f64 {
    let reputation_score = reputation_component(candidate.reputation_score);
    let location_score = location_component(&candidate.location, &requirement.location);
    let capacity_score = capacity_component(candidate.capacity_numeric, requirement.capacity_needed);
    let experience_score = experience_fraction(candidate.projects_completed) * EXPERIENCE_WEIGHT;

    round2(reputation_score + location_score + capacity_score + experience_score)
}

/// Score every candidate and order them for assembly: score descending, id ascending
pub fn score_candidates(candidates: &[Candidate], requirement: &ProjectRequirement) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .iter()
        .map(|candidate| ScoredCandidate {
            match_score: calculate_match_score(candidate, requirement),
            candidate: candidate.clone(),
        })
        .collect();

    scored.sort_by(rank_order);
    scored
}

/// Ranking comparator shared by the assemblers
pub fn rank_order(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    b.match_score
        .partial_cmp(&a.match_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.candidate.id.cmp(&b.candidate.id))
}

/// Fraction (0-1) of full experience credit
#[inline]
pub fn experience_fraction(projects_completed: u32) -> f64 {
    (projects_completed as f64 / EXPERIENCE_SATURATION).min(1.0)
}

#[inline]
fn reputation_component(reputation: f64) -> f64 {
    if !reputation.is_finite() {
        return 0.0;
    }
    (reputation.clamp(0.0, 10.0) / 10.0) * REPUTATION_WEIGHT
}

#[inline]
fn location_component(candidate_location: &str, project_location: &str) -> f64 {
    if locations_match(candidate_location, project_location) {
        LOCAL_BONUS
    } else if same_metro_area(candidate_location, project_location) {
        METRO_BONUS
    } else {
        0.0
    }
}

/// Zero when capacity_needed is not positive; such requests are rejected before scoring
#[inline]
fn capacity_component(capacity: u32, capacity_needed: i64) -> f64 {
    if capacity_needed <= 0 {
        return 0.0;
    }
    (capacity as f64 / capacity_needed as f64).min(1.0) * CAPACITY_WEIGHT
}

#[inline]
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Specialization;

    fn create_test_candidate(reputation: f64, capacity: u32, projects: u32, location: &str) -> Candidate {
        Candidate {
            id: "test_supplier".to_string(),
            name: "Test Supplier".to_string(),
            location: location.to_string(),
            skills: vec!["Egg Supply".to_string()],
            capacity_numeric: capacity,
            reputation_score: reputation,
            projects_completed: projects,
            specialization: Specialization::EggSupply,
            total_earnings: 0.0,
        }
    }

    fn create_test_requirement() -> ProjectRequirement {
        ProjectRequirement {
            location: "Kibera, Nairobi".to_string(),
            capacity_needed: 10,
            budget: 50000.0,
            skills_required: vec!["Egg Supply".to_string()],
            project_type: None,
        }
    }

    #[test]
    fn test_perfect_score() {
        let candidate = create_test_candidate(10.0, 10, 10, "Kibera");
        let score = calculate_match_score(&candidate, &create_test_requirement());

        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_component_breakdown() {
        // 8.5/10 * 40 = 34, metro bonus 15, 5/10 * 20 = 10, 3/10 * 15 = 4.5
        let candidate = create_test_candidate(8.5, 5, 3, "Westlands");
        let score = calculate_match_score(&candidate, &create_test_requirement());

        assert_eq!(score, 63.5);
    }

    #[test]
    fn test_distant_location_gets_no_bonus() {
        let local = create_test_candidate(7.0, 5, 5, "Kibera");
        let metro = create_test_candidate(7.0, 5, 5, "Eastlands");
        let distant = create_test_candidate(7.0, 5, 5, "Mombasa");
        let requirement = create_test_requirement();

        let local_score = calculate_match_score(&local, &requirement);
        let metro_score = calculate_match_score(&metro, &requirement);
        let distant_score = calculate_match_score(&distant, &requirement);

        assert_eq!(local_score - distant_score, 25.0);
        assert_eq!(metro_score - distant_score, 15.0);
    }

    #[test]
    fn test_non_positive_capacity_needed_zeroes_capacity_term() {
        let candidate = create_test_candidate(0.0, 50, 0, "Mombasa");
        let mut requirement = create_test_requirement();
        requirement.capacity_needed = 0;

        assert_eq!(calculate_match_score(&candidate, &requirement), 0.0);
    }

    #[test]
    fn test_score_rounded_to_two_decimals() {
        let candidate = create_test_candidate(7.77, 3, 1, "Mombasa");
        let score = calculate_match_score(&candidate, &create_test_requirement());

        assert_eq!(score, (score * 100.0).round() / 100.0);
    }

    #[test]
    fn test_monotonic_in_reputation() {
        let requirement = create_test_requirement();
        let mut previous = -1.0;
        for step in 0..=20 {
            let candidate = create_test_candidate(step as f64 * 0.5, 4, 2, "Westlands");
            let score = calculate_match_score(&candidate, &requirement);
            assert!(score >= previous, "score dropped at reputation {}", step as f64 * 0.5);
            previous = score;
        }
    }

    #[test]
    fn test_score_candidates_orders_by_score_then_id() {
        let requirement = create_test_requirement();
        let mut a = create_test_candidate(5.0, 5, 5, "Kibera");
        a.id = "b".to_string();
        let mut b = create_test_candidate(5.0, 5, 5, "Kibera");
        b.id = "a".to_string();
        let mut c = create_test_candidate(9.0, 5, 5, "Kibera");
        c.id = "c".to_string();

        let scored = score_candidates(&[a, b, c], &requirement);
        let ids: Vec<&str> = scored.iter().map(|s| s.candidate.id.as_str()).collect();

        assert_eq!(ids, vec!["c", "a", "b"]);
    }
}
