use payoff_engine::comparison::comparator::{compare, StrategyComparator};
use payoff_engine::comparison::recommendation::RecommendationReason;
use payoff_engine::core::debt::DebtRecord;
use payoff_engine::core::debt_id::DebtId;
use payoff_engine::core::debt_set::{DebtSet, InvalidInputError};
use payoff_engine::policy::{Strategy, SurplusAllocation};
use payoff_engine::simulation::cache::SimulationCache;
use payoff_engine::simulation::config::SimulationConfig;
use payoff_engine::simulation::result::{PayoffOutcome, SimulationResult};
use payoff_engine::simulation::scenario::{generate_random_portfolio, PortfolioConfig};
use payoff_engine::simulation::simulator::{simulate, PayoffSimulator};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn debt(id: &str, balance: Decimal, rate: Decimal, minimum: Decimal) -> DebtRecord {
    DebtRecord::new(DebtId::new(id), balance, rate, minimum)
}

fn schedule(result: &SimulationResult) -> Vec<(String, u32)> {
    result
        .payoff_schedule()
        .iter()
        .map(|e| (e.debt_id.to_string(), e.month))
        .collect()
}

/// Full pipeline: records → debt set → every strategy → recommendation.
#[test]
fn full_pipeline_household_scenario() {
    let debts = DebtSet::new(
        vec![
            debt("visa", dec!(3200.50), dec!(22.9), dec!(95)).with_creditor("Visa"),
            debt("car", dec!(8400), dec!(6.5), dec!(240)).with_creditor("Credit Union"),
            debt("store", dec!(450), dec!(27), dec!(25)).with_creditor("Store Card"),
            debt("student", dec!(12000), dec!(4.5), dec!(130)).with_creditor("Loan Servicer"),
            debt("paid", dec!(0), dec!(18), dec!(40)),
        ],
        dec!(900),
    )
    .unwrap();

    // Zero-balance record dropped at construction
    assert_eq!(debts.len(), 4);
    assert_eq!(debts.total_minimums(), dec!(490));
    assert!(debts.budget_shortfall().is_none());

    let comparison = compare(&debts).unwrap();

    for strategy in Strategy::ALL {
        let result = comparison.result(strategy);
        assert!(result.is_debt_free(), "{} should finish", strategy);
        assert_eq!(result.payoff_schedule().len(), 4);
        assert_eq!(result.strategy(), strategy.as_str());

        // Everything owed plus interest was paid, up to a cent forgiven per debt
        let owed = debts.total_balance() + result.total_interest();
        assert!(result.total_paid() <= owed);
        assert!(owed - result.total_paid() <= dec!(0.04));
        for outcome in result.debts() {
            assert_eq!(outcome.final_balance, Decimal::ZERO);
            let gap = outcome.starting_balance + outcome.interest_accrued - outcome.total_paid();
            assert!(gap >= Decimal::ZERO && gap <= dec!(0.01));
        }
    }

    // Four debts: momentum rule unless Avalanche saves a lot
    assert!(comparison.avalanche.total_interest() <= comparison.snowball.total_interest());
    match comparison.reason {
        RecommendationReason::InterestSavings { amount } => {
            assert_eq!(comparison.recommended, Strategy::Avalanche);
            assert_eq!(amount, comparison.interest_delta());
        }
        RecommendationReason::Momentum { debt_count } => {
            assert_eq!(comparison.recommended, Strategy::Snowball);
            assert_eq!(debt_count, 4);
        }
        RecommendationReason::LowerInterest => panic!("four debts never fall through"),
    }

    // Snowball clears the store card first
    assert_eq!(comparison.snowball.payoff_schedule()[0].debt_id, DebtId::new("store"));
}

#[test]
fn scenario_a_single_zero_rate_debt() {
    let debts = DebtSet::new(vec![debt("only", dec!(1200), dec!(0), dec!(100))], dec!(100)).unwrap();

    for strategy in Strategy::ALL {
        let result = simulate(&debts, strategy.policy()).unwrap();
        assert_eq!(result.total_months(), Some(12));
        assert_eq!(result.total_interest(), Decimal::ZERO);
        assert_eq!(schedule(&result), vec![("only".to_string(), 12)]);
    }
}

#[test]
fn scenario_b_same_first_target() {
    let debts = DebtSet::new(
        vec![
            debt("x", dec!(500), dec!(20), dec!(50)),
            debt("y", dec!(2000), dec!(5), dec!(50)),
        ],
        dec!(200),
    )
    .unwrap();

    let snowball = simulate(&debts, Strategy::Snowball.policy()).unwrap();
    let avalanche = simulate(&debts, Strategy::Avalanche.policy()).unwrap();

    // Smallest balance and highest rate coincide
    assert_eq!(snowball.payoff_schedule()[0].debt_id, DebtId::new("x"));
    assert_eq!(avalanche.payoff_schedule()[0].debt_id, DebtId::new("x"));
    assert!(snowball.payoff_month(&DebtId::new("x")) < snowball.payoff_month(&DebtId::new("y")));
    assert_eq!(snowball.total_interest(), avalanche.total_interest());
}

#[test]
fn scenario_b_divergent_ordering() {
    let debts = DebtSet::new(
        vec![
            debt("small", dec!(500), dec!(5), dec!(50)),
            debt("costly", dec!(2000), dec!(20), dec!(50)),
        ],
        dec!(300),
    )
    .unwrap();

    let snowball = simulate(&debts, Strategy::Snowball.policy()).unwrap();
    let avalanche = simulate(&debts, Strategy::Avalanche.policy()).unwrap();

    assert_eq!(
        schedule(&snowball),
        vec![("small".to_string(), 3), ("costly".to_string(), 10)]
    );
    assert_eq!(
        schedule(&avalanche),
        vec![("costly".to_string(), 9), ("small".to_string(), 10)]
    );
    assert_eq!(snowball.total_interest(), dec!(233.44));
    assert_eq!(avalanche.total_interest(), dec!(176.55));
}

#[test]
fn scenario_c_budget_below_minimums() {
    let debts = DebtSet::new(
        vec![
            debt("card", dec!(5000), dec!(18), dec!(150)),
            debt("store", dec!(3000), dec!(22), dec!(100)),
        ],
        dec!(100),
    )
    .unwrap();
    assert_eq!(debts.budget_shortfall(), Some(dec!(150)));

    for strategy in Strategy::ALL {
        let result = simulate(&debts, strategy.policy()).unwrap();
        assert_eq!(result.initial_shortfall(), dec!(150));
        assert!(result.shortfall_months() > 0);
        for outcome in result.debts() {
            assert!(outcome.final_balance >= Decimal::ZERO);
            assert_eq!(outcome.extra_paid, Decimal::ZERO);
        }
        if let PayoffOutcome::Unresolved { horizon } = result.outcome() {
            assert_eq!(horizon, 360);
        }
    }
}

#[test]
fn scenario_d_high_interest_savings_pick_avalanche() {
    let debts = DebtSet::new(
        vec![
            debt("card", dec!(1000), dec!(4), dec!(30)),
            debt("loan", dec!(6000), dec!(24), dec!(120)),
        ],
        dec!(400),
    )
    .unwrap();

    let comparison = compare(&debts).unwrap();

    assert!(debts.has_rate_above(dec!(10)));
    assert_eq!(comparison.interest_delta(), dec!(315.66));
    assert_eq!(comparison.recommended, Strategy::Avalanche);
    assert!(comparison.reasoning.contains("315.66"));
    assert_eq!(
        comparison.reason,
        RecommendationReason::InterestSavings { amount: dec!(315.66) }
    );
}

#[test]
fn invalid_input_rejected() {
    let negative = DebtSet::new(vec![debt("a", dec!(-1), dec!(5), dec!(10))], dec!(100));
    assert!(matches!(negative, Err(InvalidInputError::NegativeBalance { .. })));

    let budget = DebtSet::new(vec![debt("a", dec!(100), dec!(5), dec!(10))], dec!(-5));
    assert_eq!(budget, Err(InvalidInputError::NegativeBudget(dec!(-5))));

    let duplicate = DebtSet::new(
        vec![
            debt("a", dec!(100), dec!(5), dec!(10)),
            debt("a", dec!(200), dec!(5), dec!(10)),
        ],
        dec!(100),
    );
    assert_eq!(duplicate, Err(InvalidInputError::DuplicateId(DebtId::new("a"))));
}

#[test]
fn cascade_config_flows_through_comparator() {
    let debts = DebtSet::new(
        vec![
            debt("tiny", dec!(100), dec!(0), dec!(10)),
            debt("big", dec!(1000), dec!(0), dec!(10)),
        ],
        dec!(300),
    )
    .unwrap();

    let single = compare(&debts).unwrap();
    let cascade = StrategyComparator::new(
        SimulationConfig::default().with_surplus_allocation(SurplusAllocation::Cascade),
    )
    .compare(&debts)
    .unwrap();

    assert_eq!(single.snowball.total_months(), Some(5));
    assert_eq!(cascade.snowball.total_months(), Some(4));
}

#[test]
fn cache_reuses_results() {
    let debts = DebtSet::new(
        vec![
            debt("a", dec!(2500), dec!(19.99), dec!(75)),
            debt("b", dec!(900), dec!(9.5), dec!(30)),
        ],
        dec!(250),
    )
    .unwrap();

    let mut cache = SimulationCache::new(SimulationConfig::default());
    let first = cache.simulate(&debts, Strategy::Avalanche.policy()).unwrap();
    let again = cache.simulate(&debts, Strategy::Avalanche.policy()).unwrap();
    assert_eq!(first, again);
    assert_eq!(cache.hits(), 1);

    // A budget change is a different key
    let richer = debts.with_budget(dec!(300)).unwrap();
    let faster = cache.simulate(&richer, Strategy::Avalanche.policy()).unwrap();
    assert_eq!(cache.misses(), 2);
    assert!(faster.total_months() <= first.total_months());

    let direct = PayoffSimulator::default()
        .run(&debts, Strategy::Avalanche.policy())
        .unwrap();
    assert_eq!(*first, direct);
}

#[test]
fn result_json_shape() {
    let debts = DebtSet::new(vec![debt("only", dec!(1200), dec!(0), dec!(100))], dec!(100)).unwrap();
    let result = simulate(&debts, Strategy::Snowball.policy()).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["strategy"], "snowball");
    assert_eq!(json["outcome"]["status"], "debt_free");
    assert_eq!(json["outcome"]["months"], 12);
    assert_eq!(json["total_interest"], "0");
    assert_eq!(json["payoff_schedule"][0]["debt_id"], "only");
    assert!(json.get("timeline").is_none());

    let back: SimulationResult = serde_json::from_value(json).unwrap();
    assert_eq!(back, result);
}

#[test]
fn generated_portfolios_simulate_cleanly() {
    let config = PortfolioConfig {
        debt_count: 8,
        ..Default::default()
    };
    let debts = generate_random_portfolio(&config).unwrap();
    assert_eq!(debts.len(), 8);
    assert!(debts.budget_shortfall().is_none());

    let comparison = compare(&debts).unwrap();
    for strategy in Strategy::ALL {
        for outcome in comparison.result(strategy).debts() {
            assert!(outcome.final_balance >= Decimal::ZERO);
        }
    }
}
