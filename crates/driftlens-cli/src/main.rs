use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use driftlens_core::{AnalysisReport, Config, DriftMetric, HealthStatus, Severity};
use driftlens_engine::Analyzer;

mod loader;

/// DriftLens - Data drift analysis for tabular datasets
#[derive(Parser)]
#[command(name = "driftlens")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: driftlens.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Treat a CSV column as categorical even if it looks numeric (repeatable)
    #[arg(long = "categorical", value_name = "COLUMN", global = true)]
    categorical: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Profile every column of one dataset
    Profile {
        /// Dataset file (.csv or .json)
        dataset: PathBuf,

        /// Write profiles to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compute drift metrics between a baseline and a current dataset
    Drift {
        /// Baseline dataset (.csv or .json)
        #[arg(short, long)]
        baseline: PathBuf,

        /// Current dataset (.csv or .json)
        #[arg(short = 'n', long)]
        current: PathBuf,

        /// Write metrics to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Score a set of drift metrics
    Health {
        /// Drift metrics JSON (metric array or full report)
        #[arg(short, long)]
        drift: PathBuf,
    },

    /// Explain a set of drift metrics
    Explain {
        /// Drift metrics JSON (metric array or full report)
        #[arg(short, long)]
        drift: PathBuf,
    },

    /// Run the full analysis and write a report
    Analyze {
        /// Baseline dataset (.csv or .json)
        #[arg(short, long)]
        baseline: PathBuf,

        /// Current dataset (.csv or .json)
        #[arg(short = 'n', long)]
        current: PathBuf,

        /// Output file for report.json
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Also output markdown report
        #[arg(short, long)]
        markdown: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config = load_config(cli.config.as_deref(), cli.verbose)?;
    let analyzer = Analyzer::new(config);

    match cli.command {
        Commands::Profile { dataset, output } => {
            profile_command(&analyzer, &dataset, output.as_deref(), &cli.categorical)
        }
        Commands::Drift { baseline, current, output } => {
            drift_command(&analyzer, &baseline, &current, output.as_deref(), &cli.categorical)
        }
        Commands::Health { drift } => health_command(&analyzer, &drift),
        Commands::Explain { drift } => explain_command(&analyzer, &drift),
        Commands::Analyze { baseline, current, output, markdown } => analyze_command(
            &analyzer,
            &baseline,
            &current,
            &output,
            markdown.as_deref(),
            &cli.categorical,
        ),
    }
}

/// Log to stderr; `RUST_LOG` wins over the default level
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Explicit `--config`, else `driftlens.toml` in the working directory, else defaults
fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    let config = if let Some(config_path) = path {
        Config::from_file(config_path)?
    } else if Path::new("driftlens.toml").exists() {
        Config::from_file(Path::new("driftlens.toml"))?
    } else {
        if verbose {
            eprintln!("{}", "No config file found, using defaults".yellow());
        }
        Config::default()
    };

    if verbose {
        eprintln!(
            "{} {} histogram bins, KS exact up to {} values",
            "Using".cyan(),
            config.histogram_bins,
            config.ks_exact_limit
        );
    }

    Ok(config)
}

/// Profile command - summarize one dataset
fn profile_command(
    analyzer: &Analyzer,
    dataset_path: &Path,
    output: Option<&Path>,
    categorical: &[String],
) -> Result<()> {
    let dataset = loader::load_dataset(dataset_path, categorical)?;
    let profiles = analyzer.profile(&dataset)?;
    write_json(&profiles, output)
}

/// Drift command - compute drift metrics
fn drift_command(
    analyzer: &Analyzer,
    baseline_path: &Path,
    current_path: &Path,
    output: Option<&Path>,
    categorical: &[String],
) -> Result<()> {
    let baseline = loader::load_dataset(baseline_path, categorical)?;
    let current = loader::load_dataset(current_path, categorical)?;

    let metrics = analyzer.detect(&baseline, &current)?;
    write_json(&metrics, output)?;

    // Keep stdout machine-readable when the metrics went there.
    if output.is_some() {
        print_drift_summary(&metrics);
    }

    Ok(())
}

/// Health command - score previously computed metrics
fn health_command(analyzer: &Analyzer, drift_path: &Path) -> Result<()> {
    let metrics = loader::load_metrics(drift_path)?;
    let health = analyzer.score(&metrics)?;
    write_json(&health, None)
}

/// Explain command - explain previously computed metrics
fn explain_command(analyzer: &Analyzer, drift_path: &Path) -> Result<()> {
    let metrics = loader::load_metrics(drift_path)?;
    let health = analyzer.score(&metrics)?;
    let explanation = analyzer.explain(&metrics, &health)?;
    write_json(&explanation, None)
}

/// Analyze command - full pipeline with report output
fn analyze_command(
    analyzer: &Analyzer,
    baseline_path: &Path,
    current_path: &Path,
    output: &Path,
    markdown: Option<&Path>,
    categorical: &[String],
) -> Result<()> {
    let baseline = loader::load_dataset(baseline_path, categorical)?;
    let current = loader::load_dataset(current_path, categorical)?;

    let report = analyzer.analyze(&baseline, &current)?;

    report.save_to_file(output)?;
    tracing::info!(path = %output.display(), "report saved");

    if let Some(md_path) = markdown {
        std::fs::write(md_path, report.to_markdown())?;
        tracing::info!(path = %md_path.display(), "markdown report saved");
    }

    print_analysis_summary(&report);

    // Exit with error code if retraining is suggested
    if report.health.status == HealthStatus::RetrainingSuggested {
        std::process::exit(1);
    }

    Ok(())
}

/// Pretty JSON to a file, or to stdout when no file is given
fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            eprintln!("{} {}", "Saved to:".green(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn severity_label(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::High => "HIGH".red().bold(),
        Severity::Medium => "MEDIUM".yellow().bold(),
        Severity::Low => "LOW".green(),
    }
}

fn print_metric_lines(metrics: &[DriftMetric]) {
    let drifted: Vec<&DriftMetric> = metrics.iter().filter(|m| m.drift_detected).collect();

    if drifted.is_empty() {
        println!("{}", "✓ No drift detected!".green().bold());
        return;
    }

    println!("{}", "Drift Details:".bold());
    for metric in drifted {
        match metric.value {
            Some(value) => println!(
                "  [{}] {}: {} = {:.4}",
                severity_label(metric.severity),
                metric.feature_name,
                metric.metric_name,
                value
            ),
            None => println!(
                "  [{}] {}: {}",
                severity_label(metric.severity),
                metric.feature_name,
                metric.metric_name
            ),
        }
    }
}

/// Print drift detection summary
fn print_drift_summary(metrics: &[DriftMetric]) {
    let count = |severity: Severity| metrics.iter().filter(|m| m.severity == severity).count();

    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Data Drift Detection".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("{}", "Summary:".bold());
    println!("  Total metrics: {}", metrics.len());
    println!("  High:   {}", format!("{}", count(Severity::High)).red().bold());
    println!("  Medium: {}", format!("{}", count(Severity::Medium)).yellow());
    println!("  Low:    {}", count(Severity::Low));
    println!();

    print_metric_lines(metrics);

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

/// Print analysis report summary to stdout
fn print_analysis_summary(report: &AnalysisReport) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Data Drift Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    for (label, summary) in [("Baseline", &report.baseline), ("Current", &report.current)] {
        println!(
            "{}: {} ({} rows, {} columns)",
            label,
            summary.name.as_deref().unwrap_or("-"),
            summary.rows,
            summary.columns
        );
    }
    println!();

    let score = format!("{} ({})", report.health.score, report.health.status);
    let score = match report.health.status {
        HealthStatus::Safe => score.green().bold(),
        HealthStatus::Monitor => score.yellow().bold(),
        HealthStatus::RetrainingSuggested => score.red().bold(),
    };
    println!("{} {}", "Health score:".bold(), score);
    println!("{} {}", "Recommendation:".bold(), report.explanation.recommendation);
    println!();

    println!("{}", "Summary:".bold());
    println!("  Total metrics: {}", report.summary.total_metrics);
    println!("  High:   {}", format!("{}", report.summary.high).red().bold());
    println!("  Medium: {}", format!("{}", report.summary.medium).yellow());
    println!("  Low:    {}", report.summary.low);
    println!();

    print_metric_lines(&report.drift);

    println!();
    println!("{}", report.explanation.explanation_text);
    println!();
    println!("{}", "=".repeat(60).bright_blue());
}
