use crate::core::ledger::DebtPosition;
use crate::policy::OrderingPolicy;

/// Highest annual interest rate first.
///
/// Rates are fixed for the life of a simulation, so the simulator computes
/// this order once and reuses it.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvalanchePolicy;

impl OrderingPolicy for AvalanchePolicy {
    fn name(&self) -> &str {
        "avalanche"
    }

    fn prioritize(&self, positions: &[DebtPosition], active: &mut [usize]) {
        active.sort_by(|a, b| {
            positions[*b]
                .annual_rate_percent
                .cmp(&positions[*a].annual_rate_percent)
        });
    }

    fn reorders_monthly(&self) -> bool {
        false
    }
}
