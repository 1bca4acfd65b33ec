//! payoff-engine CLI
//!
//! Simulate and compare debt payoff strategies from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Simulate one strategy
//! payoff-engine simulate --input debts.json --strategy snowball
//!
//! # Compare all strategies, as JSON
//! payoff-engine compare --input debts.json --format json
//!
//! # Compare and ask a local Ollama model for tips
//! OLLAMA_HOST=http://localhost:11434 payoff-engine compare --input debts.json --advise
//!
//! # Generate a random debt set for testing
//! payoff-engine generate --debts 6 --budget 900
//! ```

use payoff_engine::advisory::{Advisory, AdvisoryEnricher, AdvisoryOutcome, OllamaGenerator};
use payoff_engine::comparison::comparator::{StrategyComparator, StrategyComparison};
use payoff_engine::core::debt::DebtRecord;
use payoff_engine::core::debt_id::DebtId;
use payoff_engine::core::debt_set::DebtSet;
use payoff_engine::policy::Strategy;
use payoff_engine::simulation::config::SimulationConfig;
use payoff_engine::simulation::scenario::{generate_random_portfolio, PortfolioConfig};
use payoff_engine::simulation::simulator::PayoffSimulator;
use rust_decimal::Decimal;
use std::fs;
use std::process;
use std::sync::Arc;

fn print_usage() {
    eprintln!(
        r#"payoff-engine: debt payoff strategy simulation

USAGE:
    payoff-engine <COMMAND> [OPTIONS]

COMMANDS:
    simulate    Simulate one repayment strategy
    compare     Compare snowball, avalanche and proportional, with a recommendation
    generate    Generate a random debt set (for testing)
    help        Show this message

OPTIONS (simulate, compare):
    --input <FILE>      Path to JSON debts file
    --format <FORMAT>   Output format: text (default) or json

OPTIONS (simulate):
    --strategy <NAME>   snowball, avalanche (default) or proportional

OPTIONS (compare):
    --advise            Ask an Ollama model for tips (needs OLLAMA_HOST; OLLAMA_MODEL optional)

OPTIONS (generate):
    --debts <N>         Number of debts (default: 5)
    --budget <AMOUNT>   Monthly budget (default: 150% of the minimums)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    payoff-engine simulate --input debts.json --strategy snowball
    payoff-engine compare --input debts.json --format json
    payoff-engine compare --input debts.json --advise
    payoff-engine generate --debts 8 --budget 1200 --output debts.json"#
    );
}

/// JSON schema for input debts.
#[derive(serde::Deserialize, serde::Serialize)]
struct DebtInput {
    id: String,
    #[serde(default)]
    creditor: String,
    balance: String,
    rate: String,
    minimum: String,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct DebtsFile {
    monthly_budget: String,
    debts: Vec<DebtInput>,
}

/// JSON output schema for `compare`.
#[derive(serde::Serialize)]
struct CompareOutput<'a> {
    #[serde(flatten)]
    comparison: &'a StrategyComparison,
    advisory: Option<Advisory>,
}

fn parse_amount(field: &str, raw: &str) -> Decimal {
    raw.trim().parse().unwrap_or_else(|e| {
        eprintln!("Invalid {} '{}': {}", field, raw, e);
        process::exit(1);
    })
}

fn load_debts(path: &str) -> DebtSet {
    let content = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
        process::exit(1);
    });

    let file: DebtsFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Error parsing JSON: {}", e);
        eprintln!("Expected format:");
        eprintln!(r#"{{
  "monthly_budget": "450",
  "debts": [
    {{ "id": "visa", "creditor": "Visa", "balance": "3200.50", "rate": "22.9", "minimum": "95" }}
  ]
}}"#);
        process::exit(1);
    });

    let budget = parse_amount("monthly_budget", &file.monthly_budget);
    let records: Vec<DebtRecord> = file
        .debts
        .iter()
        .map(|d| {
            DebtRecord::new(
                DebtId::new(&d.id),
                parse_amount("balance", &d.balance),
                parse_amount("rate", &d.rate),
                parse_amount("minimum", &d.minimum),
            )
            .with_creditor(d.creditor.clone())
        })
        .collect();

    DebtSet::new(records, budget).unwrap_or_else(|e| {
        eprintln!("Invalid debts: {}", e);
        process::exit(1);
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error serializing output: {}", e);
        process::exit(1);
    })
}

fn cmd_simulate(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut strategy = Strategy::Avalanche;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            "--strategy" => {
                i += 1;
                strategy = args
                    .get(i)
                    .map(|s| s.parse::<Strategy>())
                    .unwrap_or_else(|| {
                        eprintln!("--strategy requires a name");
                        process::exit(1);
                    })
                    .unwrap_or_else(|e| {
                        eprintln!("{}", e);
                        process::exit(1);
                    });
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let debts = load_debts(&path);
    let simulator = PayoffSimulator::new(SimulationConfig::default());
    let result = simulator.run(&debts, strategy.policy()).unwrap_or_else(|e| {
        eprintln!("Simulation failed: {}", e);
        process::exit(1);
    });

    if format == "json" {
        println!("{}", to_json(&result));
    } else {
        println!("{}", result);
    }
}

fn cmd_compare(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut advise = false;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--input requires a file path");
                    process::exit(1);
                }));
            }
            "--format" => {
                i += 1;
                format = args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--format requires 'text' or 'json'");
                    process::exit(1);
                });
            }
            "--advise" => advise = true,
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| {
        eprintln!("Error: --input <FILE> is required");
        process::exit(1);
    });

    let debts = load_debts(&path);
    let comparison = StrategyComparator::new(SimulationConfig::default())
        .compare(&debts)
        .unwrap_or_else(|e| {
            eprintln!("Simulation failed: {}", e);
            process::exit(1);
        });

    let advisory = if advise {
        request_advisory(&debts, &comparison)
    } else {
        None
    };

    if format == "json" {
        let output = CompareOutput {
            comparison: &comparison,
            advisory,
        };
        println!("{}", to_json(&output));
    } else {
        println!("{}", comparison);
        if let Some(advisory) = advisory {
            println!("=== Tips ===");
            for tip in &advisory.tips {
                println!("  - {}", tip);
            }
            if let Some(priority) = &advisory.priority {
                println!("Priority: {}", priority);
            }
            if let Some(warning) = &advisory.warning {
                println!("Warning:  {}", warning);
            }
        }
    }
}

fn request_advisory(debts: &DebtSet, comparison: &StrategyComparison) -> Option<Advisory> {
    let generator = match OllamaGenerator::from_env() {
        Some(generator) => generator,
        None => {
            eprintln!("--advise needs OLLAMA_HOST; continuing without tips");
            return None;
        }
    };

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Could not start async runtime: {}; continuing without tips", e);
            return None;
        }
    };

    let enricher = AdvisoryEnricher::new(Arc::new(generator));
    match runtime.block_on(enricher.enrich(debts, comparison)) {
        AdvisoryOutcome::Ready(advisory) => Some(advisory),
        AdvisoryOutcome::Unavailable(e) => {
            eprintln!("Tips unavailable: {}", e);
            None
        }
        AdvisoryOutcome::Stale => None,
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = PortfolioConfig::default();
    let mut budget: Option<Decimal> = None;
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--debts" => {
                i += 1;
                config.debt_count = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| {
                        eprintln!("--debts requires a number");
                        process::exit(1);
                    });
            }
            "--budget" => {
                i += 1;
                budget = Some(
                    args.get(i)
                        .and_then(|s| s.parse().ok())
                        .unwrap_or_else(|| {
                            eprintln!("--budget requires an amount");
                            process::exit(1);
                        }),
                );
            }
            "--output" => {
                i += 1;
                output_path = Some(args.get(i).cloned().unwrap_or_else(|| {
                    eprintln!("--output requires a file path");
                    process::exit(1);
                }));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let generated = generate_random_portfolio(&config)
        .and_then(|set| match budget {
            Some(amount) => set.with_budget(amount),
            None => Ok(set),
        })
        .unwrap_or_else(|e| {
            eprintln!("Could not generate debts: {}", e);
            process::exit(1);
        });

    let output = DebtsFile {
        monthly_budget: generated.monthly_budget().to_string(),
        debts: generated
            .debts()
            .iter()
            .map(|d| DebtInput {
                id: d.id().to_string(),
                creditor: d.creditor_name().to_string(),
                balance: d.remaining_balance().to_string(),
                rate: d.annual_interest_rate_percent().to_string(),
                minimum: d.minimum_monthly_payment().to_string(),
            })
            .collect(),
    };

    let json = to_json(&output);

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| {
            eprintln!("Error writing to '{}': {}", path, e);
            process::exit(1);
        });
        eprintln!(
            "Generated {} debts with a budget of {} → {}",
            generated.len(),
            generated.monthly_budget(),
            path
        );
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "simulate" => cmd_simulate(rest),
        "compare" => cmd_compare(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
