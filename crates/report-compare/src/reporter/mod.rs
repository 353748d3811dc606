//! Comparison view reporting
//!
//! Formats a [`ComparisonView`] for people or for an external chart
//! renderer.
//!
//! # Output Formats
//!
//! - **JSON**: the view plus one chart data table per metric, ready for a
//!   grouped bar chart with interval columns
//! - **Console**: per-metric ASCII tables
//! - **Markdown**: per-metric markdown tables
//!
//! # Example
//!
//! ```no_run
//! use report_compare::pipeline::ComparisonView;
//! use report_compare::reporter::{OutputFormat, Reporter};
//!
//! # fn example(view: ComparisonView) -> anyhow::Result<()> {
//! Reporter::new(OutputFormat::Console).report(&view)?;
//! Reporter::new(OutputFormat::Json).write_to_file(&view, "view.json")?;
//! # Ok(())
//! # }
//! ```

mod console;
mod json;
mod markdown;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::str::FromStr;

use crate::pipeline::ComparisonView;
use crate::reshape::Interval;

pub use console::ConsoleReporter;
pub use json::{ChartData, DataColumn, JsonReporter};
pub use markdown::MarkdownReporter;

/// Output format for comparison views
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// JSON format for machine parsing
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Console output with ASCII tables
    #[default]
    Console,
    /// Markdown format for documentation
    Markdown,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "json_pretty" | "json-pretty" => Ok(OutputFormat::JsonPretty),
            "console" => Ok(OutputFormat::Console),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => bail!("Unknown output format: {}", other),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Json => "json",
            OutputFormat::JsonPretty => "json_pretty",
            OutputFormat::Console => "console",
            OutputFormat::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

/// Reporter for comparison views
pub struct Reporter {
    format: OutputFormat,
}

impl Reporter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Report to stdout
    pub fn report(&self, view: &ComparisonView) -> Result<()> {
        let output = self.format_view(view)?;
        print!("{}", output);
        io::stdout().flush()?;
        Ok(())
    }

    pub fn write_to_file<P: AsRef<Path>>(&self, view: &ComparisonView, path: P) -> Result<()> {
        let output = self.format_view(view)?;
        fs::write(path, output)?;
        Ok(())
    }

    pub fn format_view(&self, view: &ComparisonView) -> Result<String> {
        match self.format {
            OutputFormat::Json => JsonReporter::format(view, false),
            OutputFormat::JsonPretty => JsonReporter::format(view, true),
            OutputFormat::Console => ConsoleReporter::format(view),
            OutputFormat::Markdown => MarkdownReporter::format(view),
        }
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(OutputFormat::default())
    }
}

/// `value [lower, upper]` with missing values shown as `-`.
pub(crate) fn format_interval(interval: &Interval) -> String {
    let fmt = |v: Option<f64>| match v {
        Some(v) => format_number(v),
        None => "-".to_string(),
    };
    match (interval.lower, interval.upper) {
        (None, None) => fmt(interval.value),
        _ => format!(
            "{} [{}, {}]",
            fmt(interval.value),
            fmt(interval.lower),
            fmt(interval.upper)
        ),
    }
}

pub(crate) fn format_number(v: f64) -> String {
    if v != 0.0 && v.abs() < 1.0 {
        format!("{:.4}", v)
    } else {
        format!("{:.2}", v)
    }
}

pub(crate) fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) if s.abs() < 1e-4 => format!("{:+.2e}", s),
        Some(s) => format!("{:+.4}", s),
        None => "n/a".to_string(),
    }
}
