//! Triage Eval - CLI Entry Point
//!
//! Runs one pipeline stage per invocation. Defaults come from env vars
//! (and `.env`), flags override them.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use triage_eval::constants::{APP_NAME, APP_VERSION};
use triage_eval::logic::alert::Label;
use triage_eval::logic::dataset::file_timestamp;
use triage_eval::logic::oracle::ChatCompletionsOracle;
use triage_eval::logic::orchestrator::ClassificationOrchestrator;
use triage_eval::logic::pipeline;
use triage_eval::logic::{EvalConfig, RejectedLine};

#[derive(Parser)]
#[command(name = "triage-eval", version, about = "Evaluate a SOC triage oracle against rule-derived ground truth")]
struct Cli {
    /// Directory for timestamped outputs (overrides TRIAGE_OUTPUT_DIR)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Raw alert export -> labeled, deduplicated records
    Preprocess {
        #[arg(long)]
        input: PathBuf,
        /// Ground truth for every alert in the file (TP or FP)
        #[arg(long)]
        label: Label,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Merge two preprocessed batches and shuffle
    Merge {
        #[arg(long)]
        first: PathBuf,
        #[arg(long)]
        second: PathBuf,
        /// Seed for a reproducible order
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Query the oracle for every record without a response
    Classify {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
        /// Oracle calls in flight (overrides ORACLE_MAX_IN_FLIGHT)
        #[arg(long)]
        max_in_flight: Option<usize>,
    },
    /// Repair formatting mismatches and audit priorities
    Postprocess {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Confusion matrices and metrics over a postprocessed batch
    Evaluate {
        #[arg(long)]
        input: PathBuf,
        /// JSON report path (default: next to the input)
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Flat CSV for spreadsheet review
    Export {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so RUST_LOG can come from it
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = EvalConfig::from_env();
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    log::info!("{} v{}", APP_NAME, APP_VERSION);

    match cli.command {
        Command::Preprocess { input, label, output } => {
            let output = output.unwrap_or_else(|| {
                pipeline::preprocess_output(&config.output_dir, label, &file_timestamp())
            });
            let summary = pipeline::preprocess(&input, label, &output)
                .with_context(|| format!("preprocessing {}", input.display()))?;

            print_list("Duplicate ids", &summary.duplicates);
            print_rejected(&summary.rejected);
            println!("{} records written to {}", summary.records, summary.output.display());
        }

        Command::Merge { first, second, seed, output } => {
            let output = output.unwrap_or_else(|| pipeline::merge_output(&config.output_dir, &file_timestamp()));
            let summary = pipeline::merge(&first, &second, seed, &output)
                .with_context(|| format!("merging {} and {}", first.display(), second.display()))?;

            print_list("Duplicate ids", &summary.duplicates);
            print_rejected(&summary.rejected);
            println!("{} records written to {}", summary.records, summary.output.display());
        }

        Command::Classify { input, output, max_in_flight } => {
            let client_config = config.oracle_client_config()?;
            let oracle = ChatCompletionsOracle::new(client_config).context("building oracle client")?;
            let orchestrator = ClassificationOrchestrator::new(Arc::new(oracle))
                .with_max_in_flight(max_in_flight.unwrap_or(config.max_in_flight));

            let output = output.unwrap_or_else(|| pipeline::classify_output(&config.output_dir, &file_timestamp()));
            let summary = pipeline::classify(&input, &output, &orchestrator)
                .await
                .with_context(|| format!("classifying {}", input.display()))?;

            print_rejected(&summary.rejected);
            println!("{}", summary.stats.summary_line());
            println!("Output written to {}", summary.output.display());
        }

        Command::Postprocess { input, output } => {
            let output = output.unwrap_or_else(|| pipeline::postprocess_output(&input));
            let summary = pipeline::postprocess(&input, &output)
                .with_context(|| format!("postprocessing {}", input.display()))?;

            print_rejected(&summary.rejected);
            print_list("Bad priorities", &summary.report.bad_priorities);
            println!(
                "{} repaired, {} real disagreements",
                summary.report.repaired_classifications, summary.report.classification_disagreements
            );
            println!("Output written to {}", summary.output.display());
        }

        Command::Evaluate { input, report } => {
            let report_path = report.unwrap_or_else(|| pipeline::report_output(&input));
            let report = pipeline::evaluate(&input, Some(&report_path))
                .with_context(|| format!("evaluating {}", input.display()))?;

            println!("{}", report);
            println!("Report written to {}", report_path.display());
        }

        Command::Export { input, output } => {
            let output = output.unwrap_or_else(|| pipeline::export_output(&input));
            let summary = pipeline::export(&input, &output)
                .with_context(|| format!("exporting {}", input.display()))?;

            println!("{} rows written to {}", summary.rows, summary.output.display());
        }
    }

    Ok(())
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{} ({}):", title, items.len());
    for item in items {
        println!("  {}", item);
    }
}

fn print_rejected(rejected: &[RejectedLine]) {
    if rejected.is_empty() {
        return;
    }
    println!("Rejected lines ({}):", rejected.len());
    for r in rejected {
        println!("  line {}: {} [{}]", r.line, r.reason, r.excerpt);
    }
}
