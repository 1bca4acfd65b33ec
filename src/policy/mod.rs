//! Repayment ordering policies.
//!
//! A policy decides, each simulated month, which open debts receive the
//! budget left over after minimum payments. Snowball and Avalanche
//! concentrate that surplus on their top-priority debt; Proportional
//! spreads it across every open debt.

pub mod avalanche;
pub mod proportional;
pub mod snowball;

pub use avalanche::AvalanchePolicy;
pub use proportional::ProportionalPolicy;
pub use snowball::SnowballPolicy;

use crate::core::ledger::DebtPosition;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How a concentrating policy treats surplus its top debt cannot absorb.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurplusAllocation {
    /// The whole surplus targets the top-priority debt only; whatever it
    /// cannot absorb goes unused that month.
    #[default]
    SingleTarget,
    /// Leftover surplus flows down the priority list within the same month.
    Cascade,
}

/// A pluggable repayment ordering.
///
/// `prioritize` receives the open debts' ledger indices in input order and
/// must reorder them in place with a stable sort, so that debts equal under
/// the policy's key keep their input order.
pub trait OrderingPolicy: Send + Sync {
    /// Name reported in simulation results.
    fn name(&self) -> &str;

    /// Reorder `active` into this month's priority order.
    fn prioritize(&self, positions: &[DebtPosition], active: &mut [usize]);

    /// Whether the order can change from month to month. When `false` the
    /// simulator computes the order once per run and only drops closed debts.
    fn reorders_monthly(&self) -> bool {
        true
    }

    /// Split `surplus` over the debts in `priority` order.
    ///
    /// Returns `(ledger index, amount)` pairs. Amounts never exceed the
    /// debt's remaining balance and never sum past `surplus`.
    fn allocate(
        &self,
        positions: &[DebtPosition],
        priority: &[usize],
        surplus: Decimal,
        mode: SurplusAllocation,
    ) -> Vec<(usize, Decimal)> {
        concentrate(positions, priority, surplus, mode)
    }
}

/// Surplus allocation shared by Snowball and Avalanche.
pub fn concentrate(
    positions: &[DebtPosition],
    priority: &[usize],
    surplus: Decimal,
    mode: SurplusAllocation,
) -> Vec<(usize, Decimal)> {
    let mut left = surplus;
    let mut allocations = Vec::new();
    for &index in priority {
        if left <= Decimal::ZERO {
            break;
        }
        let payment = left.min(positions[index].remaining);
        if payment > Decimal::ZERO {
            allocations.push((index, payment));
            left -= payment;
        }
        if mode == SurplusAllocation::SingleTarget {
            break;
        }
    }
    allocations
}

/// The built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Snowball,
    Avalanche,
    Proportional,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Snowball, Strategy::Avalanche, Strategy::Proportional];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Snowball => "snowball",
            Strategy::Avalanche => "avalanche",
            Strategy::Proportional => "proportional",
        }
    }

    /// The policy implementing this strategy.
    pub fn policy(&self) -> &'static dyn OrderingPolicy {
        match self {
            Strategy::Snowball => &SnowballPolicy,
            Strategy::Avalanche => &AvalanchePolicy,
            Strategy::Proportional => &ProportionalPolicy,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown strategy '{0}' (expected snowball, avalanche or proportional)")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snowball" => Ok(Strategy::Snowball),
            "avalanche" => Ok(Strategy::Avalanche),
            "proportional" => Ok(Strategy::Proportional),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}
