//! `arbiter` — evaluate an explanation through adaptive deliberation.
//!
//! Routes the explanation through single-pass, iterative, or adversarial
//! deliberation depending on how much the three scoring perspectives
//! disagree about it. Scoring uses the built-in deterministic simulated
//! scorer; pass `--seed` to vary its behavior reproducibly.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use arbiter_core::{DeliberationResult, SimulatedScorer};
use arbiter_runtime::{CallUsage, DeliberationOrchestrator, RuntimeConfig, SyncBridge};

#[derive(Parser, Debug)]
#[command(name = "arbiter", version, about = "Adaptive deliberation over explanations")]
struct Args {
    /// Explanation text to evaluate.
    explanation: Option<String>,

    /// Read the explanation from a file instead.
    #[arg(long, conflicts_with = "explanation")]
    file: Option<PathBuf>,

    /// YAML runtime configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the simulated scorer.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Emit the full result as JSON.
    #[arg(long)]
    json: bool,

    /// Only print the final score.
    #[arg(long, short)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let explanation = match (&args.explanation, &args.file) {
        (Some(text), None) => text.clone(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("reading explanation from {}", path.display()))?,
        (None, None) => bail!("provide an explanation or --file"),
        (Some(_), Some(_)) => unreachable!("clap enforces the conflict"),
    };

    let config = match &args.config {
        Some(path) => RuntimeConfig::from_yaml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => RuntimeConfig::default(),
    };

    let provider = Arc::new(SyncBridge::new(
        SimulatedScorer::with_seed(args.seed),
        "simulated",
    ));
    let orchestrator =
        DeliberationOrchestrator::new(provider, config).context("building orchestrator")?;

    let outcome = orchestrator
        .evaluate(&explanation)
        .await
        .context("evaluation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.result)?);
    } else if args.quiet {
        println!("{:.4}", outcome.result.score);
    } else {
        print_summary(&outcome.result, &outcome.usage);
    }

    Ok(())
}

fn print_summary(result: &DeliberationResult, usage: &CallUsage) {
    println!(
        "complexity {:.2} (variance {:.4}) -> {} mode",
        result.complexity.value(),
        result.variance,
        result.mode
    );

    for record in &result.rounds {
        let label = match record.stance {
            Some(stance) => format!("{} pass", stance),
            None if record.round == 0 => "baseline".to_string(),
            None => format!("round {} (scope {})", record.round, record.scope),
        };
        let scores: Vec<String> = record
            .set
            .iter()
            .map(|(role, a)| format!("{role} {:.1}", a.score))
            .collect();
        println!("  {label}: {}", scores.join(", "));
    }

    println!(
        "final score {:.4} after {} scoring calls",
        result.score, usage.scoring_calls
    );
}
