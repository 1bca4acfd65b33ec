//! Advisory enrichment example.
//!
//! Uses a local Ollama server when `OLLAMA_HOST` is set and falls back to a
//! scripted generator otherwise. Also shows that a superseded request is
//! discarded.

use payoff_engine::advisory::{
    AdvisoryConfig, AdvisoryEnricher, AdvisoryOutcome, OllamaGenerator, ScriptedGenerator,
    TextGenerator,
};
use payoff_engine::comparison::comparator::compare;
use payoff_engine::core::debt::DebtRecord;
use payoff_engine::core::debt_id::DebtId;
use payoff_engine::core::debt_set::DebtSet;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

const CANNED: &str = r#"{"tips": ["Set every minimum on autopay", "Send any raise straight to the personal loan"], "priority": "The 24% loan costs the most", "warning": null}"#;

#[tokio::main]
async fn main() {
    env_logger::init();

    println!("╔══════════════════════════════════════════╗");
    println!("║  payoff-engine: Advisory Tips Example    ║");
    println!("╚══════════════════════════════════════════╝\n");

    let debts = DebtSet::new(
        vec![
            DebtRecord::new(DebtId::new("card"), dec!(1000), dec!(4), dec!(30)),
            DebtRecord::new(DebtId::new("loan"), dec!(6000), dec!(24), dec!(120)),
        ],
        dec!(400),
    )
    .unwrap();
    let comparison = compare(&debts).unwrap();
    println!("{}", comparison);

    let generator: Arc<dyn TextGenerator> = match OllamaGenerator::from_env() {
        Some(ollama) => {
            println!("Asking Ollama ({})...\n", ollama.model());
            Arc::new(ollama)
        }
        None => {
            println!("OLLAMA_HOST not set; using canned replies.\n");
            Arc::new(ScriptedGenerator::new().reply(CANNED))
        }
    };

    let enricher = AdvisoryEnricher::new(generator);
    match enricher.enrich(&debts, &comparison).await {
        AdvisoryOutcome::Ready(advisory) => {
            println!("━━━ Tips ━━━\n");
            for tip in &advisory.tips {
                println!("  - {}", tip);
            }
            if let Some(priority) = &advisory.priority {
                println!("\nPriority: {}", priority);
            }
            if let Some(warning) = &advisory.warning {
                println!("Warning:  {}", warning);
            }
        }
        AdvisoryOutcome::Unavailable(e) => println!("No tips this time: {}", e),
        AdvisoryOutcome::Stale => println!("Superseded."),
    }

    // --- Last writer wins ---
    println!("\n━━━ Superseded Requests ━━━\n");
    let slow = Arc::new(
        ScriptedGenerator::new()
            .reply_after(Duration::from_millis(200), CANNED)
            .reply(r#"{"tips": ["Newest advice wins"]}"#),
    );
    let enricher = AdvisoryEnricher::with_config(slow, AdvisoryConfig::default());

    let first = {
        let enricher = enricher.clone();
        let debts = debts.clone();
        let comparison = comparison.clone();
        tokio::spawn(async move { enricher.enrich(&debts, &comparison).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    let second = enricher.enrich(&debts, &comparison).await;

    match first.await {
        Ok(outcome) => println!("  first request stale:  {}", outcome.is_stale()),
        Err(e) => println!("  first request panicked: {}", e),
    }
    if let Some(advisory) = second.into_advisory() {
        println!("  second request tips:  {:?}", advisory.tips);
    }
}
