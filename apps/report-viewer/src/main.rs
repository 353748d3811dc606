//! Report Viewer Binary
//!
//! Loads a browser benchmark report, ranks its pages against a baseline
//! browser, and prints the comparison.

use anyhow::{bail, Context, Result};
use clap::Parser;
use report_compare::{compare, Config, OutputFormat, ReportTable, Reporter};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug, Default)]
#[command(name = "report-viewer")]
#[command(
    version,
    about = "Compare browser benchmark reports against a baseline browser"
)]
struct Args {
    /// Delimited report file (overrides [report] path)
    report: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Baseline browser name prefix
    #[arg(short, long)]
    baseline: Option<String>,

    /// Metric used to rank page groups
    #[arg(short, long)]
    sort_metric: Option<String>,

    /// Number of page groups to show, or "all"
    #[arg(short, long)]
    limit: Option<String>,

    /// Output format: json, json_pretty, console or markdown
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Field delimiter of the report file
    #[arg(short, long)]
    delimiter: Option<char>,
}

/// Apply command-line flags on top of the file configuration.
fn merge(args: &Args, mut config: Config) -> Config {
    if let Some(report) = &args.report {
        config.report.path = Some(report.clone());
    }
    if let Some(delimiter) = args.delimiter {
        config.report.delimiter = delimiter;
    }
    if let Some(baseline) = &args.baseline {
        config.view.baseline = baseline.clone();
    }
    if let Some(metric) = &args.sort_metric {
        config.view.sort_metric = Some(metric.clone());
    }
    if let Some(limit) = &args.limit {
        config.view.row_limit = Some(report_compare::config::LimitSetting::Text(limit.clone()));
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(output) = &args.output {
        config.output.path = Some(output.clone());
    }
    config
}

fn load_config(args: &Args) -> Result<Config> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    Ok(merge(args, config))
}

fn run(args: &Args) -> Result<()> {
    let config = load_config(args)?;

    let Some(path) = &config.report.path else {
        bail!("No report given. Pass a report path or set [report] path in the config file");
    };

    tracing::info!("Loading report {}", path.display());
    let table = ReportTable::from_path(path, config.report.delimiter)
        .with_context(|| format!("Failed to load report: {}", path.display()))?;

    let view = compare(&table, &config.view_config())?;
    for warning in &view.warnings {
        tracing::warn!("{}", warning);
    }

    let reporter = Reporter::new(config.output.format);
    match &config.output.path {
        Some(output) => {
            reporter.write_to_file(&view, output)?;
            tracing::info!("Wrote {} report to {}", config.output.format, output.display());
        }
        None => reporter.report(&view)?,
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Reports go to stdout, so logs stay on stderr
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("report-viewer v{}", env!("CARGO_PKG_VERSION"));

    run(&args)
}
