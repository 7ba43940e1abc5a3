use crate::models::{Candidate, Role, Specialization};

/// A single role assignment rule
#[derive(Debug, Clone, PartialEq)]
pub enum RoleRule {
    /// Candidates with this specialization take the role
    Specialization(Specialization, Role),
    /// Candidates with a skill containing this text (case-insensitive) take the role
    SkillContains(String, Role),
}

impl RoleRule {
    fn apply(&self, candidate: &Candidate) -> Option<Role> {
        match self {
            RoleRule::Specialization(kind, role) if candidate.specialization == *kind => Some(*role),
            RoleRule::SkillContains(needle, role) if candidate.has_skill_containing(needle) => Some(*role),
            _ => None,
        }
    }
}

/// Ordered role table; the first matching rule wins
///
/// Candidates no rule claims become suppliers, alternating between primary
/// and secondary with the team's current supplier count.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleTable {
    rules: Vec<RoleRule>,
}

impl RoleTable {
    pub fn new(rules: Vec<RoleRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[RoleRule] {
        &self.rules
    }

    pub fn assign(&self, candidate: &Candidate, supplier_count: usize) -> Role {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(candidate))
            .unwrap_or_else(|| supplier_role(supplier_count))
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::new(vec![
            RoleRule::Specialization(Specialization::Logistics, Role::LogisticsCoordinator),
            RoleRule::Specialization(Specialization::QualityControl, Role::QualityAssurance),
            RoleRule::SkillContains("transportation".to_string(), Role::TransportationSpecialist),
        ])
    }
}

#[inline]
pub fn supplier_role(supplier_count: usize) -> Role {
    if supplier_count % 2 == 0 {
        Role::PrimarySupplier
    } else {
        Role::SecondarySupplier
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_candidate(skills: &[&str], specialization: Specialization) -> Candidate {
        Candidate {
            id: "c1".to_string(),
            name: "Candidate".to_string(),
            location: "Kibera".to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            capacity_numeric: 3,
            reputation_score: 7.0,
            projects_completed: 2,
            specialization,
            total_earnings: 0.0,
        }
    }

    #[test]
    fn test_specialization_rules() {
        let table = RoleTable::default();

        let logistics = create_candidate(&["Logistics"], Specialization::Logistics);
        assert_eq!(table.assign(&logistics, 0), Role::LogisticsCoordinator);

        let qc = create_candidate(&["Quality Control"], Specialization::QualityControl);
        assert_eq!(table.assign(&qc, 0), Role::QualityAssurance);
    }

    #[test]
    fn test_transportation_skill_rule() {
        let table = RoleTable::default();
        let driver = create_candidate(&["Egg Transportation"], Specialization::Other);

        assert_eq!(table.assign(&driver, 3), Role::TransportationSpecialist);
    }

    #[test]
    fn test_rule_order_wins() {
        let table = RoleTable::default();
        let both = create_candidate(&["Transportation"], Specialization::Logistics);

        assert_eq!(table.assign(&both, 0), Role::LogisticsCoordinator);
    }

    #[test]
    fn test_suppliers_alternate() {
        let table = RoleTable::default();
        let supplier = create_candidate(&["Egg Supply"], Specialization::EggSupply);

        assert_eq!(table.assign(&supplier, 0), Role::PrimarySupplier);
        assert_eq!(table.assign(&supplier, 1), Role::SecondarySupplier);
        assert_eq!(table.assign(&supplier, 2), Role::PrimarySupplier);
    }

    #[test]
    fn test_custom_table() {
        let table = RoleTable::new(vec![RoleRule::SkillContains(
            "egg".to_string(),
            Role::QualityAssurance,
        )]);
        let supplier = create_candidate(&["Egg Supply"], Specialization::EggSupply);

        assert_eq!(table.assign(&supplier, 0), Role::QualityAssurance);
        assert_eq!(table.rules().len(), 1);
    }
}
