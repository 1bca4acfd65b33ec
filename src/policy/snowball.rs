use crate::core::ledger::DebtPosition;
use crate::policy::OrderingPolicy;

/// Smallest remaining balance first.
///
/// Balances move every month, so the order is recomputed each month.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnowballPolicy;

impl OrderingPolicy for SnowballPolicy {
    fn name(&self) -> &str {
        "snowball"
    }

    fn prioritize(&self, positions: &[DebtPosition], active: &mut [usize]) {
        active.sort_by(|a, b| positions[*a].remaining.cmp(&positions[*b].remaining));
    }
}
