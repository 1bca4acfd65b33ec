//! Strategy comparison example.
//!
//! Simulates Snowball, Avalanche and Proportional repayment on the same
//! household debts and shows how the recommendation shifts with the budget.

use payoff_engine::comparison::comparator::compare;
use payoff_engine::core::debt::DebtRecord;
use payoff_engine::core::debt_id::DebtId;
use payoff_engine::core::debt_set::DebtSet;
use payoff_engine::policy::{Strategy, SurplusAllocation};
use payoff_engine::simulation::config::SimulationConfig;
use payoff_engine::simulation::simulator::PayoffSimulator;
use rust_decimal_macros::dec;

fn main() {
    println!("╔══════════════════════════════════════════════╗");
    println!("║  payoff-engine: Snowball vs Avalanche        ║");
    println!("╚══════════════════════════════════════════════╝\n");

    let debts = DebtSet::new(
        vec![
            DebtRecord::new(DebtId::new("visa"), dec!(3200.50), dec!(22.9), dec!(95))
                .with_creditor("Visa"),
            DebtRecord::new(DebtId::new("store"), dec!(450), dec!(27), dec!(25))
                .with_creditor("Store Card"),
            DebtRecord::new(DebtId::new("car"), dec!(8400), dec!(6.5), dec!(240))
                .with_creditor("Credit Union"),
        ],
        dec!(600),
    )
    .unwrap();

    println!("Debts:");
    for debt in debts.debts() {
        println!(
            "  {:<14} {:>10}  {:>5}%  min {:>7}",
            debt.creditor_name(),
            debt.remaining_balance(),
            debt.annual_interest_rate_percent(),
            debt.minimum_monthly_payment()
        );
    }
    println!("Budget: {} / month\n", debts.monthly_budget());

    // --- Scenario 1: Full comparison ---
    println!("━━━ Scenario 1: Comparison ━━━\n");
    let comparison = compare(&debts).unwrap();
    println!("{}", comparison);

    println!("Recommended plan:\n");
    println!("{}", comparison.recommended_result());

    // --- Scenario 2: Budget sweep ---
    println!("━━━ Scenario 2: Budget Sweep ━━━\n");
    println!("{:>8}  {:>10}  {:>10}  {:<10}", "Budget", "Snowball", "Avalanche", "Pick");
    for budget in [dec!(400), dec!(600), dec!(900), dec!(1500)] {
        let set = debts.with_budget(budget).unwrap();
        let comparison = compare(&set).unwrap();
        let months = |s: Strategy| {
            comparison
                .result(s)
                .total_months()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "never".to_string())
        };
        println!(
            "{:>8}  {:>10}  {:>10}  {:<10}",
            budget,
            months(Strategy::Snowball),
            months(Strategy::Avalanche),
            comparison.recommended
        );
    }
    println!();

    // --- Scenario 3: Cascading surplus ---
    println!("━━━ Scenario 3: Cascading Surplus ━━━\n");
    let cascade = PayoffSimulator::new(
        SimulationConfig::default().with_surplus_allocation(SurplusAllocation::Cascade),
    );
    for strategy in [Strategy::Snowball, Strategy::Avalanche] {
        let single = comparison.result(strategy);
        let cascaded = cascade.run(&debts, strategy.policy()).unwrap();
        println!(
            "  {:<10} single-target: {:<14} cascade: {}",
            strategy,
            single.outcome().to_string(),
            cascaded.outcome()
        );
    }
}
