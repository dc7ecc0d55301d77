use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{debug, info};

use flowco_rs::cli::Args;
use flowco_rs::utils::logger::init_cli_logger;
use flowco_rs::{EvaluationOrchestrator, EvaluationResult, LLMClient};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.into_config()?;
    init_cli_logger(config.verbose);

    let concept = args.load_concept()?;
    let client = Arc::new(LLMClient::new(&config)?);
    let orchestrator = EvaluationOrchestrator::new(client.clone(), config.clone());

    let result = orchestrator
        .evaluate_business_concept(&concept, args.options())
        .await?;
    print_summary(&result);

    let json = if args.website_copy {
        let copy = orchestrator.generate_website_copy(&result).await;
        let mut value = serde_json::to_value(&result)?;
        value["website_copy"] = serde_json::to_value(&copy)?;
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string_pretty(&result)?
    };

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, json)
                .await
                .context(format!("Failed to write result to {:?}", path))?;
            info!(path = %path.display(), "evaluation result written");
        }
        None => println!("{}", json),
    }

    if config.cache.enabled {
        let report = client.cache_report();
        debug!(
            hits = report.cache_hits,
            misses = report.cache_misses,
            writes = report.cache_writes,
            errors = report.cache_errors,
            hit_rate = report.hit_rate,
            "response cache statistics"
        );
    }

    Ok(())
}

fn print_summary(result: &EvaluationResult) {
    eprintln!("Evaluation of: {}", result.business_concept.concept_description);
    eprintln!("  Overall success:      {:>5.1}", result.overall_success_score());
    eprintln!("  Market demand:        {:>5.1}", result.market_demand_score());
    eprintln!("  Concept viability:    {:>5.1}", result.concept_viability_score());
    eprintln!("  Execution difficulty: {:>5.1}", result.execution_difficulty_score());
    eprintln!("  Confidence:           {:>5.1}", result.confidence_level());
    eprintln!("  Competition:          {}", result.market_insights.competition_level);
}
