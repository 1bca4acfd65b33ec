use crate::comparison::recommendation::{recommend, RecommendationReason};
use crate::core::debt_set::DebtSet;
use crate::policy::Strategy;
use crate::simulation::config::SimulationConfig;
use crate::simulation::result::SimulationResult;
use crate::simulation::simulator::{PayoffSimulator, SimulationError};
use log::debug;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Every built-in strategy simulated on the same debts, plus a pick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyComparison {
    pub snowball: SimulationResult,
    pub avalanche: SimulationResult,
    pub proportional: SimulationResult,
    pub recommended: Strategy,
    pub reason: RecommendationReason,
    pub reasoning: String,
}

impl StrategyComparison {
    pub fn result(&self, strategy: Strategy) -> &SimulationResult {
        match strategy {
            Strategy::Snowball => &self.snowball,
            Strategy::Avalanche => &self.avalanche,
            Strategy::Proportional => &self.proportional,
        }
    }

    pub fn recommended_result(&self) -> &SimulationResult {
        self.result(self.recommended)
    }

    /// Snowball interest minus Avalanche interest.
    pub fn interest_delta(&self) -> Decimal {
        self.snowball.total_interest() - self.avalanche.total_interest()
    }

    /// Avalanche savings as a percentage of Snowball interest.
    pub fn interest_savings_percent(&self) -> f64 {
        if self.snowball.total_interest() == Decimal::ZERO {
            return 0.0;
        }
        self.interest_delta()
            .checked_div(self.snowball.total_interest())
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
            .and_then(|pct| pct.to_f64())
            .unwrap_or(0.0)
    }

    /// Strategy reaching debt-free soonest. Unresolved runs rank last;
    /// ties go to the earlier strategy in [`Strategy::ALL`].
    pub fn fastest(&self) -> Strategy {
        Strategy::ALL
            .into_iter()
            .min_by_key(|s| self.result(*s).total_months().unwrap_or(u32::MAX))
            .unwrap_or(Strategy::Avalanche)
    }
}

/// Runs every built-in strategy and applies the recommendation heuristic.
#[derive(Debug, Clone, Default)]
pub struct StrategyComparator {
    simulator: PayoffSimulator,
}

impl StrategyComparator {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            simulator: PayoffSimulator::new(config),
        }
    }

    pub fn compare(&self, debts: &DebtSet) -> Result<StrategyComparison, SimulationError> {
        let snowball = self.simulator.run(debts, Strategy::Snowball.policy())?;
        let avalanche = self.simulator.run(debts, Strategy::Avalanche.policy())?;
        let proportional = self.simulator.run(debts, Strategy::Proportional.policy())?;

        let recommendation = recommend(debts, &snowball, &avalanche);
        debug!(
            "recommending {} for {} debts ({:?})",
            recommendation.strategy,
            debts.len(),
            recommendation.reason
        );

        Ok(StrategyComparison {
            snowball,
            avalanche,
            proportional,
            recommended: recommendation.strategy,
            reason: recommendation.reason,
            reasoning: recommendation.reasoning,
        })
    }
}

/// Compare with the default configuration.
pub fn compare(debts: &DebtSet) -> Result<StrategyComparison, SimulationError> {
    StrategyComparator::default().compare(debts)
}

impl std::fmt::Display for StrategyComparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Strategy Comparison ===")?;
        writeln!(f, "{:<14}{:>10}{:>16}{:>16}", "Strategy", "Months", "Interest", "Total Paid")?;
        for strategy in Strategy::ALL {
            let result = self.result(strategy);
            let months = result
                .total_months()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "never".to_string());
            writeln!(
                f,
                "{:<14}{:>10}{:>16}{:>16}",
                strategy.as_str(),
                months,
                result.total_interest(),
                result.total_paid()
            )?;
        }
        writeln!(f, "\nRecommended:    {}", self.recommended)?;
        writeln!(f, "Reasoning:      {}", self.reasoning)?;
        writeln!(f, "Avalanche vs Snowball: {:.1}% less interest", self.interest_savings_percent())?;
        Ok(())
    }
}
