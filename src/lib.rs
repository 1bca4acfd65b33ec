//! # payoff-engine
//!
//! Debt payoff simulation and strategy recommendation.
//!
//! Given a set of debts and a fixed monthly budget, this engine simulates
//! month-by-month repayment under different ordering policies and recommends
//! one of them.
//!
//! ## Architecture
//!
//! - **core**: Foundational types: debt records, validated debt sets, the payoff ledger
//! - **policy**: Ordering policies: Snowball, Avalanche, Proportional
//! - **simulation**: Monthly payoff simulation, results, caching, random portfolios
//! - **comparison**: Runs every strategy and applies the recommendation heuristic
//! - **advisory**: Optional text tips from an external model, never on the numeric path

pub mod advisory;
pub mod comparison;
pub mod core;
pub mod policy;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::comparison::comparator::{compare, StrategyComparator, StrategyComparison};
    pub use crate::comparison::recommendation::RecommendationReason;
    pub use crate::core::debt::DebtRecord;
    pub use crate::core::debt_id::DebtId;
    pub use crate::core::debt_set::{DebtSet, InvalidInputError};
    pub use crate::policy::avalanche::AvalanchePolicy;
    pub use crate::policy::proportional::ProportionalPolicy;
    pub use crate::policy::snowball::SnowballPolicy;
    pub use crate::policy::{OrderingPolicy, Strategy, SurplusAllocation};
    pub use crate::simulation::config::SimulationConfig;
    pub use crate::simulation::result::{PayoffOutcome, SimulationResult};
    pub use crate::simulation::simulator::{simulate, PayoffSimulator, SimulationError};
}
