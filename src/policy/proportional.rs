use crate::core::debt_set::checked_total;
use crate::core::ledger::DebtPosition;
use crate::core::money::floor_currency;
use crate::policy::{OrderingPolicy, SurplusAllocation};
use rust_decimal::Decimal;

/// Spreads the surplus over every open debt by share of total balance.
///
/// Each debt receives `surplus × remaining / total_remaining`, rounded down
/// to the cent, measured after this month's minimums. When the surplus
/// covers the whole outstanding total every debt is paid off. Priority order
/// is the input order; the surplus allocation mode does not apply.
///
/// An outstanding total outside the `Decimal` range allocates nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionalPolicy;

impl OrderingPolicy for ProportionalPolicy {
    fn name(&self) -> &str {
        "proportional"
    }

    fn prioritize(&self, _positions: &[DebtPosition], _active: &mut [usize]) {}

    fn reorders_monthly(&self) -> bool {
        false
    }

    fn allocate(
        &self,
        positions: &[DebtPosition],
        priority: &[usize],
        surplus: Decimal,
        _mode: SurplusAllocation,
    ) -> Vec<(usize, Decimal)> {
        let Some(total) = checked_total(priority.iter().map(|&i| positions[i].remaining)) else {
            return Vec::new();
        };
        if surplus <= Decimal::ZERO || total <= Decimal::ZERO {
            return Vec::new();
        }

        if surplus >= total {
            return priority
                .iter()
                .filter(|&&i| positions[i].remaining > Decimal::ZERO)
                .map(|&i| (i, positions[i].remaining))
                .collect();
        }

        priority
            .iter()
            .filter_map(|&i| {
                let remaining = positions[i].remaining;
                let weighted = surplus
                    .checked_mul(remaining)
                    .map(|product| product / total)
                    .unwrap_or_else(|| surplus * (remaining / total));
                let share = floor_currency(weighted).min(remaining);
                (share > Decimal::ZERO).then_some((i, share))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::test_support::position;
    use rust_decimal_macros::dec;

    #[test]
    fn test_shares_follow_balance_weights() {
        let positions = vec![
            position("a", dec!(300), dec!(5)),
            position("b", dec!(100), dec!(20)),
        ];
        let allocations =
            ProportionalPolicy.allocate(&positions, &[0, 1], dec!(100), SurplusAllocation::SingleTarget);
        assert_eq!(allocations, vec![(0, dec!(75)), (1, dec!(25))]);
    }

    #[test]
    fn test_shares_round_down_and_never_exceed_surplus() {
        let positions = vec![
            position("a", dec!(100), dec!(0)),
            position("b", dec!(100), dec!(0)),
            position("c", dec!(100), dec!(0)),
        ];
        let allocations =
            ProportionalPolicy.allocate(&positions, &[0, 1, 2], dec!(10), SurplusAllocation::Cascade);
        assert!(allocations.iter().all(|(_, amount)| *amount == dec!(3.33)));
        let spent: Decimal = allocations.iter().map(|(_, amount)| *amount).sum();
        assert!(spent <= dec!(10));
    }

    #[test]
    fn test_surplus_covering_total_clears_everything() {
        let positions = vec![
            position("a", dec!(30), dec!(0)),
            position("b", dec!(20), dec!(0)),
        ];
        let allocations =
            ProportionalPolicy.allocate(&positions, &[0, 1], dec!(80), SurplusAllocation::SingleTarget);
        assert_eq!(allocations, vec![(0, dec!(30)), (1, dec!(20))]);
    }

    #[test]
    fn test_unrepresentable_total_allocates_nothing() {
        let quarter = Decimal::MAX / dec!(4);
        let positions = vec![
            position("a", quarter, dec!(12)),
            position("b", quarter, dec!(12)),
            position("c", quarter, dec!(12)),
            position("d", quarter, dec!(12)),
            position("e", quarter, dec!(12)),
        ];
        let allocations = ProportionalPolicy.allocate(
            &positions,
            &[0, 1, 2, 3, 4],
            dec!(100),
            SurplusAllocation::SingleTarget,
        );
        assert!(allocations.is_empty());
    }

    #[test]
    fn test_order_is_left_untouched() {
        let positions = vec![position("a", dec!(900), dec!(1)), position("b", dec!(5), dec!(30))];
        let mut active = vec![0, 1];
        ProportionalPolicy.prioritize(&positions, &mut active);
        assert_eq!(active, vec![0, 1]);
    }
}
