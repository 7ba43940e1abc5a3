use crate::models::{ProjectRequirement, Team, TeamMember};
use crate::core::location::locations_match;

const CONFIDENCE_CAP: f64 = 95.0;

/// Render a human-readable justification for the chosen team
///
/// Covers capacity against the requirement, average reputation, how many
/// members are local, and the most experienced specialist.
pub fn explain_team(team: &Team, requirement: &ProjectRequirement) -> String {
    if team.is_empty() {
        return "No team members could be selected for this request.".to_string();
    }

    let mut reasons = Vec::with_capacity(4);
    let size = team.len();
    let total = team.total_capacity() as i64;
    let needed = requirement.capacity_needed.max(0);

    if total >= needed {
        reasons.push(format!(
            "the team's combined capacity ({} units/day) meets your requirement of {} units/day",
            total, needed
        ));
    } else {
        let covered = ((total as f64 / needed as f64) * 100.0).round();
        reasons.push(format!(
            "the team's combined capacity ({} units/day) covers {}% of your requirement of {} units/day",
            total, covered, needed
        ));
    }

    let avg_reputation = team.average_reputation();
    let tier = if avg_reputation >= 8.5 {
        "excellent"
    } else if avg_reputation >= 7.5 {
        "strong"
    } else {
        "moderate"
    };
    reasons.push(format!(
        "members have {} reputation scores (average {:.1}/10)",
        tier, avg_reputation
    ));

    let local = count_local_members(team, &requirement.location);
    if local == size {
        reasons.push(format!("all members are based in {}", requirement.location));
    } else if local > 0 {
        reasons.push(format!(
            "{} of {} members are local to {}",
            local, size, requirement.location
        ));
    } else {
        reasons.push(format!("no member is based in {}", requirement.location));
    }

    if let Some(lead) = top_specialist(team, requirement) {
        let candidate = lead.candidate();
        reasons.push(format!(
            "{} brings {} specialization with {} completed projects",
            candidate.name,
            candidate.specialization.as_str().replace('_', " "),
            candidate.projects_completed
        ));
    }

    format!("Selected this {}-member team because {}.", size, reasons.join(", "))
}

/// Members whose location matches the project's
pub fn count_local_members(team: &Team, location: &str) -> usize {
    team.members
        .iter()
        .filter(|m| locations_match(&m.candidate().location, location))
        .count()
}

/// Most experienced member of the primary specialization, else of the whole team
fn top_specialist<'a>(team: &'a Team, requirement: &ProjectRequirement) -> Option<&'a TeamMember> {
    let primary = requirement.primary_specialization();
    let most_experienced = |members: Vec<&'a TeamMember>| {
        members
            .into_iter()
            .fold(None, |best: Option<&'a TeamMember>, member| match best {
                Some(b) if b.candidate().projects_completed >= member.candidate().projects_completed => Some(b),
                _ => Some(member),
            })
    };

    let specialists: Vec<&TeamMember> = team
        .members
        .iter()
        .filter(|m| m.candidate().specialization == primary)
        .collect();

    if specialists.is_empty() {
        most_experienced(team.members.iter().collect())
    } else {
        most_experienced(specialists)
    }
}

/// Confidence (0-95) that the team will deliver
///
/// confidence = min(capacity / needed, 1.2) * 40
///            + average reputation / 10 * 30
///            + team size fit * 20          # ideal size is ceil(needed / 3)
///            + local member ratio * 10
pub fn confidence_score(team: &Team, requirement: &ProjectRequirement) -> u8 {
    if team.is_empty() || requirement.capacity_needed <= 0 {
        return 0;
    }

    let needed = requirement.capacity_needed as f64;
    let size = team.len() as f64;

    let coverage = (team.total_capacity() as f64 / needed).min(1.2) * 40.0;
    let reputation = (team.average_reputation().clamp(0.0, 10.0) / 10.0) * 30.0;

    let ideal = (needed / 3.0).ceil().max(1.0);
    let size_fit = (1.0 - (size - ideal).abs() / ideal).max(0.0) * 20.0;

    let local = count_local_members(team, &requirement.location) as f64 / size * 10.0;

    (coverage + reputation + size_fit + local).round().min(CONFIDENCE_CAP) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Candidate, Role, ScoredCandidate, Specialization};

    fn member(name: &str, location: &str, reputation: f64, projects: u32, allocated: u32, specialization: Specialization) -> TeamMember {
        TeamMember {
            scored: ScoredCandidate {
                candidate: Candidate {
                    id: name.to_lowercase(),
                    name: name.to_string(),
                    location: location.to_string(),
                    skills: vec!["Egg Supply".to_string()],
                    capacity_numeric: allocated,
                    reputation_score: reputation,
                    projects_completed: projects,
                    specialization,
                    total_earnings: 0.0,
                },
                match_score: 70.0,
            },
            role: Role::PrimarySupplier,
            allocated_capacity: allocated,
        }
    }

    fn requirement(capacity: i64) -> ProjectRequirement {
        ProjectRequirement {
            location: "Kibera".to_string(),
            capacity_needed: capacity,
            budget: 1000.0,
            skills_required: vec!["Egg Supply".to_string()],
            project_type: None,
        }
    }

    #[test]
    fn test_explanation_met_capacity() {
        let team = Team::new(vec![
            member("Amina", "Kibera", 9.0, 12, 6, Specialization::EggSupply),
            member("Baraka", "Kibera", 8.6, 4, 4, Specialization::EggSupply),
        ]);
        let text = explain_team(&team, &requirement(10));

        assert!(text.contains("meets your requirement of 10 units/day"));
        assert!(text.contains("excellent reputation scores (average 8.8/10)"));
        assert!(text.contains("all members are based in Kibera"));
        assert!(text.contains("Amina brings egg supply specialization with 12 completed projects"));
    }

    #[test]
    fn test_explanation_partial_capacity() {
        let team = Team::new(vec![member("Chege", "Westlands", 7.0, 2, 5, Specialization::Logistics)]);
        let text = explain_team(&team, &requirement(20));

        assert!(text.contains("covers 25% of your requirement"));
        assert!(text.contains("moderate reputation"));
        assert!(text.contains("no member is based in Kibera"));
        assert!(text.contains("Chege brings logistics specialization"));
    }

    #[test]
    fn test_explanation_is_deterministic() {
        let team = Team::new(vec![member("Amina", "Kibera", 9.0, 12, 6, Specialization::EggSupply)]);
        assert_eq!(explain_team(&team, &requirement(6)), explain_team(&team, &requirement(6)));
    }

    #[test]
    fn test_empty_team_explanation() {
        let text = explain_team(&Team::default(), &requirement(5));
        assert!(text.starts_with("No team members"));
    }

    #[test]
    fn test_confidence_score() {
        // coverage 40 + reputation 27 + size fit (ideal 2) 20 + local 10 = 97 -> capped at 95
        let team = Team::new(vec![
            member("Amina", "Kibera", 9.0, 12, 3, Specialization::EggSupply),
            member("Baraka", "Kibera", 9.0, 4, 3, Specialization::EggSupply),
        ]);
        assert_eq!(confidence_score(&team, &requirement(6)), 95);

        // coverage 20 + reputation 21 + size fit (ideal 2) 10 + local 0 = 51
        let partial = Team::new(vec![member("Chege", "Westlands", 7.0, 2, 3, Specialization::Logistics)]);
        assert_eq!(confidence_score(&partial, &requirement(6)), 51);

        assert_eq!(confidence_score(&Team::default(), &requirement(6)), 0);
    }
}
