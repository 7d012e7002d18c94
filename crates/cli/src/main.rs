//! Troika command line entry point.
//!
//! A bare `troika` invocation scans the current working directory with the
//! default configuration; everything else is optional. The pipeline itself
//! is synchronous from the caller's point of view: one tokio runtime is
//! built here and the async stages are driven to completion on it.

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use troika_scanners::{OpenAIProvider, PipelineConfig, ScanPipeline};

#[derive(Parser)]
#[command(name = "troika")]
#[command(about = "Aggregated security scanning with model-assisted triage")]
#[command(version)]
struct Cli {
    /// Directory to scan; defaults to the current working directory.
    #[arg(value_name = "DIR", default_value = ".")]
    target: PathBuf,

    /// Pipeline configuration file (YAML).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Model to use for summaries, recommendations and duplicate judgments.
    #[arg(long)]
    model: Option<String>,

    /// Skip the model stages entirely.
    #[arg(long)]
    no_llm: bool,

    /// Where to write the combined newline-delimited JSON report.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the raw run header JSON in addition to the summary.
    #[arg(long)]
    print_header: bool,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run(cli))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_yaml_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => PipelineConfig::default(),
    }
    .apply_env();

    if let Some(model) = cli.model {
        config.generation.model = model;
    }
    if let Some(output) = cli.output {
        config.report_path = output;
    }

    let report_path = config.report_path.clone();
    let mut pipeline = ScanPipeline::new(config.clone());

    if cli.no_llm {
        info!("model stages disabled on the command line");
    } else {
        let provider = OpenAIProvider::new(Some(config.generation.model.clone()))
            .context("configuring the text-generation provider (use --no-llm to skip)")?
            .with_input_token_budget(config.generation.input_token_budget);
        pipeline = pipeline.with_generator(Arc::new(provider));
    }

    let report = pipeline.run(&cli.target).await?;

    report.write_ndjson(&report_path)?;

    if cli.print_header {
        println!("{}", serde_json::to_string_pretty(&report.header_json())?);
    }
    println!("{}", report.render_console());
    println!(
        "{} {}",
        "Report written to".bold(),
        report_path.display()
    );

    Ok(())
}
