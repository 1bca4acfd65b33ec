use crate::core::debt_id::DebtId;
use crate::core::debt_set::DebtSet;
use crate::core::ledger::{LedgerOverflow, PayoffLedger};
use crate::policy::OrderingPolicy;
use crate::simulation::config::SimulationConfig;
use crate::simulation::result::{
    DebtOutcome, MonthSnapshot, PayoffEntry, PayoffOutcome, SimulationResult,
};
use log::{debug, trace};
use rust_decimal::Decimal;
use thiserror::Error;

/// Failures that abort a simulation run.
///
/// Running out of budget is not one of them: that is reported through
/// [`PayoffOutcome::Unresolved`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("balance of debt {debt_id} overflowed in month {month}")]
    Overflow { month: u32, debt_id: DebtId },
    #[error("running totals overflowed in month {month}")]
    TotalOverflow { month: u32 },
}

impl SimulationError {
    fn from_ledger(ledger: &PayoffLedger, month: u32, overflow: LedgerOverflow) -> Self {
        match overflow {
            LedgerOverflow::Position(index) => SimulationError::Overflow {
                month,
                debt_id: ledger.position(index).debt_id.clone(),
            },
            LedgerOverflow::Total => SimulationError::TotalOverflow { month },
        }
    }
}

/// Month-by-month amortization of a [`DebtSet`] under one ordering policy.
///
/// # Algorithm
///
/// For each month up to the horizon:
///
/// 1. Accrue interest on every open debt, rounded to the cent.
/// 2. Surplus = budget minus the minimums of debts still open, floored at
///    zero. Minimums freed by cleared debts roll into the surplus.
/// 3. Ask the policy for this month's priority order.
/// 4. Pay every open debt its minimum (capped at its balance), then let the
///    policy allocate the surplus.
/// 5. Close debts at or below the payoff epsilon, in input order.
///
/// Minimums are always paid in full, even when they exceed the budget;
/// the shortfall is reported on the result instead.
///
/// The run is a pure function of its inputs.
///
/// # Examples
///
/// ```
/// use payoff_engine::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let debts = DebtSet::new(
///     vec![DebtRecord::new(DebtId::new("card"), dec!(1_200), dec!(0), dec!(100))],
///     dec!(100),
/// )
/// .unwrap();
///
/// let result = simulate(&debts, &SnowballPolicy).unwrap();
/// assert_eq!(result.total_months(), Some(12));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PayoffSimulator {
    config: SimulationConfig,
}

impl PayoffSimulator {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Run one simulation.
    pub fn run(
        &self,
        debts: &DebtSet,
        policy: &dyn OrderingPolicy,
    ) -> Result<SimulationResult, SimulationError> {
        let budget = debts.monthly_budget();
        let horizon = self.config.horizon_months;
        let mut ledger = PayoffLedger::open(debts);

        let fixed_order = if policy.reorders_monthly() {
            None
        } else {
            let mut order = ledger.active_indices();
            policy.prioritize(ledger.positions(), &mut order);
            Some(order)
        };

        let mut total_interest = Decimal::ZERO;
        let mut total_paid = Decimal::ZERO;
        let mut shortfall_months = 0;
        let mut payoff_schedule = Vec::with_capacity(debts.len());
        let mut timeline = Vec::new();
        let mut month = 0;

        while !ledger.is_cleared() && month < horizon {
            month += 1;

            let overflow = SimulationError::TotalOverflow { month };

            let interest = ledger
                .accrue_interest()
                .map_err(|o| SimulationError::from_ledger(&ledger, month, o))?;
            total_interest = total_interest
                .checked_add(interest)
                .ok_or_else(|| overflow.clone())?;
            // Policies sum open balances when allocating
            ledger
                .total_remaining()
                .map_err(|o| SimulationError::from_ledger(&ledger, month, o))?;

            let minimums = ledger
                .active_minimums()
                .map_err(|o| SimulationError::from_ledger(&ledger, month, o))?;
            if minimums > budget {
                shortfall_months += 1;
            }
            let surplus = (budget - minimums).max(Decimal::ZERO);

            let priority: Vec<usize> = match &fixed_order {
                Some(order) => order
                    .iter()
                    .copied()
                    .filter(|&i| ledger.position(i).is_active())
                    .collect(),
                None => {
                    let mut active = ledger.active_indices();
                    policy.prioritize(ledger.positions(), &mut active);
                    active
                }
            };

            let mut paid = Decimal::ZERO;
            for &index in &priority {
                let payment = ledger
                    .pay_minimum(index)
                    .map_err(|o| SimulationError::from_ledger(&ledger, month, o))?;
                paid = paid.checked_add(payment).ok_or_else(|| overflow.clone())?;
            }
            let allocations = policy.allocate(
                ledger.positions(),
                &priority,
                surplus,
                self.config.surplus_allocation,
            );
            for (index, amount) in allocations {
                let payment = ledger
                    .pay_extra(index, amount)
                    .map_err(|o| SimulationError::from_ledger(&ledger, month, o))?;
                paid = paid.checked_add(payment).ok_or_else(|| overflow.clone())?;
            }
            total_paid = total_paid.checked_add(paid).ok_or(overflow)?;

            for index in ledger.settle(month, self.config.payoff_epsilon) {
                let debt_id = ledger.position(index).debt_id.clone();
                trace!("{}: {} paid off in month {}", policy.name(), debt_id, month);
                payoff_schedule.push(PayoffEntry { debt_id, month });
            }

            if self.config.record_timeline {
                let remaining = ledger
                    .total_remaining()
                    .map_err(|o| SimulationError::from_ledger(&ledger, month, o))?;
                timeline.push(MonthSnapshot {
                    month,
                    interest,
                    paid,
                    remaining,
                });
            }
        }

        let outcome = if ledger.is_cleared() {
            PayoffOutcome::DebtFree { months: month }
        } else {
            PayoffOutcome::Unresolved { horizon }
        };
        debug!(
            "{}: {} debts, budget {}: {}, interest {}",
            policy.name(),
            debts.len(),
            budget,
            outcome,
            total_interest
        );

        Ok(SimulationResult {
            strategy: policy.name().to_string(),
            outcome,
            total_interest,
            total_paid,
            payoff_schedule,
            debts: ledger
                .into_positions()
                .into_iter()
                .map(DebtOutcome::from)
                .collect(),
            initial_shortfall: debts.budget_shortfall().unwrap_or(Decimal::ZERO),
            shortfall_months,
            timeline,
        })
    }
}

/// Simulate with the default configuration.
pub fn simulate(
    debts: &DebtSet,
    policy: &dyn OrderingPolicy,
) -> Result<SimulationResult, SimulationError> {
    PayoffSimulator::default().run(debts, policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::debt::DebtRecord;
    use crate::core::ledger::DebtPosition;
    use crate::policy::{AvalanchePolicy, ProportionalPolicy, SnowballPolicy, Strategy, SurplusAllocation};
    use rust_decimal_macros::dec;

    fn debt(id: &str, balance: Decimal, rate: Decimal, minimum: Decimal) -> DebtRecord {
        DebtRecord::new(DebtId::new(id), balance, rate, minimum)
    }

    fn set(debts: Vec<DebtRecord>, budget: Decimal) -> DebtSet {
        DebtSet::new(debts, budget).unwrap()
    }

    fn schedule(result: &SimulationResult) -> Vec<(&str, u32)> {
        result
            .payoff_schedule()
            .iter()
            .map(|e| (e.debt_id.as_str(), e.month))
            .collect()
    }

    #[test]
    fn test_single_interest_free_debt() {
        let debts = set(vec![debt("a", dec!(1200), dec!(0), dec!(100))], dec!(100));
        let result = simulate(&debts, &SnowballPolicy).unwrap();

        assert_eq!(result.outcome(), PayoffOutcome::DebtFree { months: 12 });
        assert_eq!(result.total_interest(), Decimal::ZERO);
        assert_eq!(result.total_paid(), dec!(1200));
        assert_eq!(schedule(&result), vec![("a", 12)]);
    }

    #[test]
    fn test_smallest_balance_and_highest_rate_diverge() {
        let debts = set(
            vec![
                debt("small", dec!(500), dec!(5), dec!(50)),
                debt("costly", dec!(2000), dec!(20), dec!(50)),
            ],
            dec!(300),
        );

        let snowball = simulate(&debts, &SnowballPolicy).unwrap();
        let avalanche = simulate(&debts, &AvalanchePolicy).unwrap();

        assert_eq!(schedule(&snowball), vec![("small", 3), ("costly", 10)]);
        assert_eq!(schedule(&avalanche), vec![("costly", 9), ("small", 10)]);
        assert_eq!(snowball.total_interest(), dec!(233.44));
        assert_eq!(avalanche.total_interest(), dec!(176.55));
        assert!(avalanche.total_interest() < snowball.total_interest());
    }

    #[test]
    fn test_freed_minimums_roll_over_for_every_policy() {
        let debts = set(
            vec![
                debt("a", dec!(100), dec!(0), dec!(50)),
                debt("b", dec!(1000), dec!(0), dec!(50)),
            ],
            dec!(100),
        );

        for strategy in Strategy::ALL {
            let result = simulate(&debts, strategy.policy()).unwrap();
            // a clears in month 2; b then receives 100 a month instead of 50
            assert_eq!(schedule(&result), vec![("a", 2), ("b", 11)], "{}", strategy);
        }
    }

    #[test]
    fn test_minimums_paid_every_active_month() {
        let debts = set(
            vec![
                debt("a", dec!(1000), dec!(12), dec!(50)),
                debt("b", dec!(400), dec!(0), dec!(40)),
            ],
            dec!(150),
        );
        let result = simulate(&debts, &AvalanchePolicy).unwrap();

        assert_eq!(result.total_months(), Some(10));
        for outcome in result.debts() {
            let record = debts.get(&outcome.debt_id).unwrap();
            assert_eq!(
                outcome.minimum_paid,
                record.minimum_monthly_payment() * Decimal::from(outcome.months_active)
            );
        }
    }

    #[test]
    fn test_zero_budget_without_minimums_is_unresolved() {
        let debts = set(vec![debt("a", dec!(100), dec!(5), dec!(0))], Decimal::ZERO);
        let result = simulate(&debts, &SnowballPolicy).unwrap();

        assert_eq!(result.outcome(), PayoffOutcome::Unresolved { horizon: 360 });
        assert_eq!(result.total_months(), None);
        assert!(result.payoff_schedule().is_empty());
        assert!(result.debts()[0].final_balance > dec!(100));
    }

    #[test]
    fn test_budget_below_minimums_reports_shortfall() {
        let debts = set(
            vec![
                debt("a", dec!(5000), dec!(18), dec!(150)),
                debt("b", dec!(3000), dec!(22), dec!(100)),
            ],
            dec!(100),
        );

        for strategy in Strategy::ALL {
            let result = simulate(&debts, strategy.policy()).unwrap();
            assert_eq!(result.initial_shortfall(), dec!(150));
            assert!(result.shortfall_months() > 0);
            assert!(result.debts().iter().all(|d| d.final_balance >= Decimal::ZERO));
            assert!(result.debts().iter().all(|d| d.extra_paid == Decimal::ZERO));
        }
    }

    #[test]
    fn test_empty_set_is_immediately_debt_free() {
        let debts = set(Vec::new(), dec!(250));
        let result = simulate(&debts, &ProportionalPolicy).unwrap();
        assert_eq!(result.outcome(), PayoffOutcome::DebtFree { months: 0 });
        assert_eq!(result.total_paid(), Decimal::ZERO);
    }

    #[test]
    fn test_cascade_finishes_sooner_than_single_target() {
        let debts = set(
            vec![
                debt("a", dec!(100), dec!(0), dec!(0)),
                debt("b", dec!(1000), dec!(0), dec!(0)),
            ],
            dec!(300),
        );

        let single = simulate(&debts, &SnowballPolicy).unwrap();
        let cascade = PayoffSimulator::new(
            SimulationConfig::default().with_surplus_allocation(SurplusAllocation::Cascade),
        )
        .run(&debts, &SnowballPolicy)
        .unwrap();

        assert_eq!(single.total_months(), Some(5));
        assert_eq!(cascade.total_months(), Some(4));
        assert_eq!(single.total_paid(), cascade.total_paid());
    }

    /// Avalanche ordering recomputed every month, for comparison with the cached order.
    struct MonthlyAvalanche;

    impl OrderingPolicy for MonthlyAvalanche {
        fn name(&self) -> &str {
            "avalanche"
        }

        fn prioritize(&self, positions: &[DebtPosition], active: &mut [usize]) {
            AvalanchePolicy.prioritize(positions, active);
        }
    }

    #[test]
    fn test_cached_avalanche_order_matches_monthly_resort() {
        let debts = set(
            vec![
                debt("a", dec!(300), dec!(5), dec!(25)),
                debt("b", dec!(800), dec!(6), dec!(30)),
                debt("c", dec!(1500), dec!(8), dec!(40)),
                debt("d", dec!(2500), dec!(9), dec!(60)),
            ],
            dec!(400),
        );

        let cached = simulate(&debts, &AvalanchePolicy).unwrap();
        let resorted = simulate(&debts, &MonthlyAvalanche).unwrap();
        assert_eq!(cached, resorted);
        // a and c clear in the same month: input order breaks the tie
        assert_eq!(
            schedule(&cached),
            vec![("d", 9), ("a", 13), ("c", 13), ("b", 15)]
        );
    }

    #[test]
    fn test_timeline_tracks_each_month() {
        let debts = set(vec![debt("a", dec!(1200), dec!(0), dec!(100))], dec!(100));
        let result = PayoffSimulator::new(SimulationConfig::default().with_timeline())
            .run(&debts, &SnowballPolicy)
            .unwrap();

        let timeline = result.timeline();
        assert_eq!(timeline.len(), 12);
        assert_eq!(timeline[0].remaining, dec!(1100));
        assert_eq!(timeline[11].remaining, Decimal::ZERO);
        assert!(timeline.iter().all(|m| m.paid == dec!(100)));
    }

    #[test]
    fn test_custom_horizon() {
        let debts = set(vec![debt("a", dec!(1200), dec!(0), dec!(100))], dec!(100));
        let result = PayoffSimulator::new(SimulationConfig::default().with_horizon(6))
            .run(&debts, &SnowballPolicy)
            .unwrap();
        assert_eq!(result.outcome(), PayoffOutcome::Unresolved { horizon: 6 });
        assert_eq!(result.debts()[0].final_balance, dec!(600));
    }

    #[test]
    fn test_runaway_balance_reports_overflow() {
        let debts = set(
            vec![debt("loan-shark", dec!(1000000), dec!(100000), dec!(0))],
            Decimal::ZERO,
        );
        let err = simulate(&debts, &SnowballPolicy).unwrap_err();
        assert!(matches!(err, SimulationError::Overflow { ref debt_id, .. } if debt_id.as_str() == "loan-shark"));
    }

    #[test]
    fn test_runaway_total_reports_overflow() {
        let quarter = Decimal::MAX / dec!(4);
        let debts = set(
            vec![
                debt("a", quarter, dec!(12), dec!(0)),
                debt("b", quarter, dec!(12), dec!(0)),
                debt("c", quarter, dec!(12), dec!(0)),
            ],
            Decimal::ZERO,
        );

        for strategy in Strategy::ALL {
            let err = simulate(&debts, strategy.policy()).unwrap_err();
            // 3/4 of the range grows past it after 29 months at 1% a month
            assert_eq!(err, SimulationError::TotalOverflow { month: 29 }, "{}", strategy);
        }
    }

    #[test]
    fn test_huge_minimums_fit_when_their_sum_does() {
        let third = Decimal::MAX / dec!(3);
        let debts = set(
            vec![
                debt("a", dec!(100), dec!(0), third),
                debt("b", dec!(100), dec!(0), third),
            ],
            dec!(10),
        );
        let result = simulate(&debts, &SnowballPolicy).unwrap();
        assert_eq!(result.total_months(), Some(1));
        assert_eq!(result.total_paid(), dec!(200));
    }
}
