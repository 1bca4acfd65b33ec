use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub use crate::policy::SurplusAllocation;

/// Maximum simulated duration before a run is reported unresolved.
pub const DEFAULT_HORIZON_MONTHS: u32 = 360;

/// Balances at or below this amount count as paid off.
pub const DEFAULT_PAYOFF_EPSILON: Decimal = dec!(0.01);

/// Knobs for a simulation run.
///
/// The defaults reproduce the reference behavior: a 30-year horizon, a
/// one-cent payoff threshold and single-target surplus allocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub horizon_months: u32,
    pub payoff_epsilon: Decimal,
    pub surplus_allocation: SurplusAllocation,
    /// Record a [`MonthSnapshot`](crate::simulation::result::MonthSnapshot) per month.
    pub record_timeline: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            horizon_months: DEFAULT_HORIZON_MONTHS,
            payoff_epsilon: DEFAULT_PAYOFF_EPSILON,
            surplus_allocation: SurplusAllocation::SingleTarget,
            record_timeline: false,
        }
    }
}

impl SimulationConfig {
    pub fn with_surplus_allocation(mut self, allocation: SurplusAllocation) -> Self {
        self.surplus_allocation = allocation;
        self
    }

    pub fn with_timeline(mut self) -> Self {
        self.record_timeline = true;
        self
    }

    pub fn with_horizon(mut self, months: u32) -> Self {
        self.horizon_months = months;
        self
    }
}
