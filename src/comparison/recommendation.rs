use crate::core::debt_set::DebtSet;
use crate::policy::Strategy;
use crate::simulation::result::SimulationResult;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Annual rate (percent) above which a debt counts as high-interest.
pub const HIGH_INTEREST_RATE: Decimal = dec!(10);

/// Interest savings above which Avalanche is worth recommending outright.
pub const SIGNIFICANT_SAVINGS: Decimal = dec!(100);

/// Debt count above which quick Snowball wins take precedence.
pub const MOMENTUM_DEBT_COUNT: usize = 3;

/// Which branch of the heuristic produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecommendationReason {
    /// High-rate debt present and Avalanche saves a significant amount.
    InterestSavings { amount: Decimal },
    /// Many debts: early payoffs keep the plan going.
    Momentum { debt_count: usize },
    /// Plain comparison of total interest.
    LowerInterest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub strategy: Strategy,
    pub reason: RecommendationReason,
    pub reasoning: String,
}

/// Pick between Snowball and Avalanche.
///
/// Evaluated in order:
///
/// 1. Any rate above [`HIGH_INTEREST_RATE`] and Avalanche saving more than
///    [`SIGNIFICANT_SAVINGS`] over Snowball → Avalanche.
/// 2. More than [`MOMENTUM_DEBT_COUNT`] debts → Snowball.
/// 3. Otherwise the one with less total interest; Avalanche on a tie.
///
/// Proportional is never recommended.
pub fn recommend(
    debts: &DebtSet,
    snowball: &SimulationResult,
    avalanche: &SimulationResult,
) -> Recommendation {
    let has_high_interest = debts.has_rate_above(HIGH_INTEREST_RATE);
    let interest_delta = snowball.total_interest() - avalanche.total_interest();

    if has_high_interest && interest_delta > SIGNIFICANT_SAVINGS {
        return Recommendation {
            strategy: Strategy::Avalanche,
            reason: RecommendationReason::InterestSavings {
                amount: interest_delta,
            },
            reasoning: format!(
                "Paying the highest-rate debts first saves {:.2} in interest compared to the snowball order.",
                interest_delta
            ),
        };
    }

    if debts.len() > MOMENTUM_DEBT_COUNT {
        return Recommendation {
            strategy: Strategy::Snowball,
            reason: RecommendationReason::Momentum {
                debt_count: debts.len(),
            },
            reasoning: format!(
                "With {} debts, clearing the smallest balances first gives frequent wins that keep the plan going.",
                debts.len()
            ),
        };
    }

    let (strategy, cheaper, dearer) = if snowball.total_interest() < avalanche.total_interest() {
        (Strategy::Snowball, snowball, avalanche)
    } else {
        (Strategy::Avalanche, avalanche, snowball)
    };
    Recommendation {
        strategy,
        reason: RecommendationReason::LowerInterest,
        reasoning: format!(
            "The {} strategy costs the least in interest: {} versus {}.",
            strategy,
            cheaper.total_interest(),
            dearer.total_interest()
        ),
    }
}
