use crate::models::{CostShare, Team};

/// Largest budget accepted; every whole unit up to 2^53 is exact in f64
pub const MAX_BUDGET: f64 = 9_007_199_254_740_992.0;

/// Split the budget across members in proportion to allocated capacity
///
/// Shares are whole currency units and always sum to the rounded budget:
/// the rounding residual is settled on the largest-capacity member.
pub fn allocate_costs(team: &Team, budget: f64) -> Vec<CostShare> {
    if team.is_empty() {
        return Vec::new();
    }

    let budget_units = if budget.is_finite() && budget > 0.0 {
        budget.min(MAX_BUDGET).round() as i64
    } else {
        0
    };

    let capacities: Vec<u32> = team.members.iter().map(|m| m.allocated_capacity).collect();
    let total: u64 = capacities.iter().map(|&c| c as u64).sum();

    let mut shares: Vec<i64> = if total == 0 {
        vec![0; capacities.len()]
    } else {
        capacities
            .iter()
            .map(|&c| ((c as f64 / total as f64) * budget_units as f64).round() as i64)
            .collect()
    };

    if total > 0 {
        settle_residual(&mut shares, &capacities, budget_units);
    }

    team.members
        .iter()
        .zip(shares)
        .map(|(member, share)| CostShare {
            member_id: member.id().to_string(),
            share,
        })
        .collect()
}

/// Push the rounding residual onto the largest-capacity member
///
/// A negative residual is taken from members in descending capacity order
/// so no share drops below zero.
fn settle_residual(shares: &mut [i64], capacities: &[u32], target: i64) {
    let allocated: i128 = shares.iter().map(|&s| s as i128).sum();
    let mut residual = (target as i128 - allocated) as i64;
    if residual == 0 {
        return;
    }

    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by(|&a, &b| capacities[b].cmp(&capacities[a]).then(a.cmp(&b)));

    if residual > 0 {
        shares[order[0]] += residual;
        return;
    }

    for idx in order {
        if residual == 0 {
            break;
        }
        let take = shares[idx].min(-residual);
        shares[idx] -= take;
        residual += take;
    }
}
