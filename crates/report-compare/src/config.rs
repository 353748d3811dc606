//! Configuration parsing for report views
//!
//! A TOML file names the report to load and the view to compute from it, so a
//! comparison can be reproduced without passing every selector on the command
//! line.
//!
//! ```toml
//! [report]
//! path = "data/report.csv"
//! delimiter = ","
//!
//! [view]
//! baseline = "Firefox"
//! sort_metric = "Joules"
//! row_limit = 10
//!
//! [output]
//! format = "console"
//! ```

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::pipeline::{ViewConfig, DEFAULT_BASELINE};
use crate::reporter::OutputFormat;

/// Main configuration structure loaded from TOML files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub report: ReportSource,
    #[serde(default)]
    pub view: ViewSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is malformed.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use report_compare::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = Config::from_file("viewer.toml")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use report_compare::config::Config;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = Config::from_str(r#"
    ///     [view]
    ///     sort_metric = "Watts"
    ///     row_limit = "5"
    /// "#)?;
    /// assert_eq!(config.view.baseline, "Firefox");
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("Failed to parse TOML configuration")
    }

    pub fn view_config(&self) -> ViewConfig {
        self.view.to_view_config()
    }
}

/// Where the report comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSource {
    /// Path of the delimited report file
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Field delimiter (default: ',')
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for ReportSource {
    fn default() -> Self {
        Self {
            path: None,
            delimiter: default_delimiter(),
        }
    }
}

fn default_delimiter() -> char {
    ','
}

/// Selector values for the view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewSettings {
    /// Baseline browser name prefix (default: "Firefox")
    #[serde(default = "default_baseline")]
    pub baseline: String,
    #[serde(default)]
    pub sort_metric: Option<String>,
    /// Page groups to show, as a number or selector text
    #[serde(default)]
    pub row_limit: Option<LimitSetting>,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            baseline: default_baseline(),
            sort_metric: None,
            row_limit: None,
        }
    }
}

impl ViewSettings {
    pub fn to_view_config(&self) -> ViewConfig {
        ViewConfig {
            baseline: self.baseline.clone(),
            sort_metric: self.sort_metric.clone(),
            row_limit: self.row_limit.as_ref().map(LimitSetting::to_selector),
        }
    }
}

fn default_baseline() -> String {
    DEFAULT_BASELINE.to_string()
}

/// Row limit written either as `row_limit = 10` or `row_limit = "all"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LimitSetting {
    Count(i64),
    Text(String),
}

impl LimitSetting {
    pub fn to_selector(&self) -> String {
        match self {
            LimitSetting::Count(n) => n.to_string(),
            LimitSetting::Text(s) => s.clone(),
        }
    }
}

/// Report output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
    /// Write to this file instead of stdout
    #[serde(default)]
    pub path: Option<PathBuf>,
}
