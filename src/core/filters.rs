use crate::models::{Candidate, ProjectRequirement};

/// Narrow the candidate pool to those plausibly relevant to the requirement
///
/// A candidate is kept when one of its skills contains (or is contained by)
/// a required skill, or when its specialization equals the project type.
pub fn filter_candidates(candidates: &[Candidate], requirement: &ProjectRequirement) -> Vec<Candidate> {
    candidates
        .iter()
        .filter(|candidate| is_relevant(candidate, requirement))
        .cloned()
        .collect()
}

#[inline]
pub fn is_relevant(candidate: &Candidate, requirement: &ProjectRequirement) -> bool {
    if requirement.project_type == Some(candidate.specialization) {
        return true;
    }

    matches_any_skill(&candidate.skills, &requirement.skills_required)
}

/// Case-insensitive containment in either direction between any pair of skills
#[inline]
pub fn matches_any_skill(skills: &[String], required: &[String]) -> bool {
    let required: Vec<String> = required
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .any(|skill| {
            required
                .iter()
                .any(|req| skill.contains(req.as_str()) || req.contains(skill.as_str()))
        })
}
