//! Random debt portfolios for benchmarks and manual exploration.

use crate::core::debt::DebtRecord;
use crate::core::debt_id::DebtId;
use crate::core::debt_set::{DebtSet, InvalidInputError};
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Shape of a generated portfolio.
#[derive(Debug, Clone)]
pub struct PortfolioConfig {
    /// Number of debts to generate.
    pub debt_count: usize,
    /// Minimum starting balance.
    pub min_balance: Decimal,
    /// Maximum starting balance.
    pub max_balance: Decimal,
    /// Highest annual rate in percent; rates are drawn from `0..=max_rate_percent`.
    pub max_rate_percent: u32,
    /// Minimum payment as a whole-number percentage of the starting balance.
    pub minimum_payment_percent: u32,
    /// Budget as a whole-number percentage of the summed minimums.
    pub budget_percent_of_minimums: u32,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            debt_count: 5,
            min_balance: Decimal::from(200),
            max_balance: Decimal::from(15_000),
            max_rate_percent: 30,
            minimum_payment_percent: 3,
            budget_percent_of_minimums: 150,
        }
    }
}

/// Generate raw debt records with random balances and rates.
pub fn generate_random_debts(config: &PortfolioConfig) -> Vec<DebtRecord> {
    let mut rng = rand::thread_rng();
    let min_cents = cents(config.min_balance).max(1);
    let max_cents = cents(config.max_balance).max(min_cents + 1);

    (0..config.debt_count)
        .map(|i| {
            let balance = Decimal::new(rng.gen_range(min_cents..max_cents), 2);
            // rates in tenths of a percent
            let rate = Decimal::new(rng.gen_range(0..=config.max_rate_percent as i64 * 10), 1);
            let minimum = (balance * Decimal::from(config.minimum_payment_percent)
                / Decimal::from(100))
            .round_dp(2);
            DebtRecord::new(DebtId::generate(), balance, rate, minimum)
                .with_creditor(format!("Creditor {:02}", i + 1))
        })
        .collect()
}

/// Generate a full debt set, budget derived from the minimums.
pub fn generate_random_portfolio(config: &PortfolioConfig) -> Result<DebtSet, InvalidInputError> {
    let debts = generate_random_debts(config);
    let minimums: Decimal = debts.iter().map(|d| d.minimum_monthly_payment()).sum();
    let budget = (minimums * Decimal::from(config.budget_percent_of_minimums)
        / Decimal::from(100))
    .round_dp(2);
    DebtSet::new(debts, budget)
}

fn cents(amount: Decimal) -> i64 {
    (amount * Decimal::from(100))
        .trunc()
        .to_i64()
        .unwrap_or(i64::MAX / 2)
}
