use crate::models::{ConflictSet, Role, ScoredCandidate, Specialization, Team, TeamMember};
use crate::core::roles::RoleTable;
use crate::core::scoring::rank_order;

/// Requirements at or above this size get a dedicated logistics coordinator
pub const LOGISTICS_THRESHOLD: u32 = 8;

/// Deterministic baseline team assembly
///
/// # Passes
/// 1. Specialists matching the primary specialization become primary/secondary suppliers
/// 2. Large requirements get the best logistics candidate as coordinator
/// 3. Remaining capacity is filled by rank, roles from the role table
///
/// A team that never reaches `capacity_needed` is still returned.
pub fn assemble_greedy(
    scored: &[ScoredCandidate],
    capacity_needed: u32,
    primary: Specialization,
    roles: &RoleTable,
    conflicts: &ConflictSet,
) -> Team {
    let mut ranked: Vec<&ScoredCandidate> = scored
        .iter()
        .filter(|s| s.candidate.capacity_numeric > 0)
        .collect();
    ranked.sort_by(|a, b| rank_order(a, b));

    let mut builder = TeamBuilder::new(capacity_needed, conflicts);

    // Pass 1: specialists
    let mut specialists = 0usize;
    for candidate in ranked.iter().filter(|s| s.candidate.specialization == primary) {
        if builder.is_filled() {
            break;
        }
        if !builder.can_add(candidate) {
            continue;
        }
        let role = if specialists == 0 {
            Role::PrimarySupplier
        } else {
            Role::SecondarySupplier
        };
        builder.push(candidate, role);
        specialists += 1;
    }

    // Pass 2: logistics coordinator
    if capacity_needed >= LOGISTICS_THRESHOLD && !builder.is_filled() {
        if let Some(coordinator) = ranked.iter().find(|s| {
            s.candidate.specialization == Specialization::Logistics && builder.can_add(s)
        }) {
            builder.push(coordinator, Role::LogisticsCoordinator);
        }
    }

    // Pass 3: fill by rank
    for candidate in &ranked {
        if builder.is_filled() {
            break;
        }
        if !builder.can_add(candidate) {
            continue;
        }
        let role = roles.assign(&candidate.candidate, builder.supplier_count());
        builder.push(candidate, role);
    }

    builder.finish()
}

/// Allocate capacity in member order and tag roles from the table
///
/// Members that would receive no capacity are dropped.
pub(crate) fn allocate_and_tag(ordered: &[&ScoredCandidate], capacity_needed: u32, roles: &RoleTable) -> Team {
    let empty = ConflictSet::new();
    let mut builder = TeamBuilder::new(capacity_needed, &empty);

    for candidate in ordered {
        if builder.is_filled() {
            break;
        }
        if candidate.candidate.capacity_numeric == 0 || builder.contains(&candidate.candidate.id) {
            continue;
        }
        let role = roles.assign(&candidate.candidate, builder.supplier_count());
        builder.push(candidate, role);
    }

    builder.finish()
}

struct TeamBuilder<'a> {
    members: Vec<TeamMember>,
    remaining: u32,
    conflicts: &'a ConflictSet,
}

impl<'a> TeamBuilder<'a> {
    fn new(capacity_needed: u32, conflicts: &'a ConflictSet) -> Self {
        Self {
            members: Vec::new(),
            remaining: capacity_needed,
            conflicts,
        }
    }

    fn is_filled(&self) -> bool {
        self.remaining == 0
    }

    fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|m| m.id() == id)
    }

    fn can_add(&self, candidate: &ScoredCandidate) -> bool {
        let id = candidate.candidate.id.as_str();
        !self.contains(id)
            && !self
                .conflicts
                .conflicts_with_any(id, self.members.iter().map(|m| m.id()))
    }

    fn supplier_count(&self) -> usize {
        self.members.iter().filter(|m| m.role.is_supplier()).count()
    }

    fn push(&mut self, candidate: &ScoredCandidate, role: Role) {
        let allocated = candidate.candidate.capacity_numeric.min(self.remaining);
        self.remaining -= allocated;
        self.members.push(TeamMember {
            scored: candidate.clone(),
            role,
            allocated_capacity: allocated,
        });
    }

    fn finish(self) -> Team {
        Team::new(self.members)
    }
}
