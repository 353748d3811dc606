//! Browser benchmark report comparison
//!
//! This crate turns a benchmark report (one row per page and browser, with a
//! mean and confidence interval per metric) into a ranked comparison against
//! a baseline browser, ready to be drawn as grouped bar charts.
//!
//! # Features
//!
//! - **Significance**: two-sided t-tests of every browser against the
//!   baseline, recovered from means and 95% confidence intervals
//! - **Ranking**: page groups ordered by signed significance, then page and
//!   browser name
//! - **Row Limits**: truncation to the first N page groups
//! - **Plot Data**: per-metric `[page, value, lower, upper, ...]` matrices
//! - **Multiple Output Formats**: JSON chart tables, Console, and Markdown
//!
//! # Example
//!
//! ```no_run
//! use report_compare::{compare, Config, ReportTable, Reporter};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = Config::from_file("viewer.toml")?;
//! let table = ReportTable::from_path("report.csv", config.report.delimiter)?;
//!
//! let view = compare(&table, &config.view_config())?;
//! for warning in &view.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//!
//! Reporter::new(config.output.format).report(&view)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Report Format
//!
//! Reports are delimited text with a header row. `Page`, `Browser` and
//! `Iterations` are required; every other column is a metric, and
//! `<metric> CI` holds its confidence half-width:
//!
//! ```text
//! ,Page,Browser,OS,Iterations,Duration,Load,Load CI,Paint,Paint CI
//! 0,Home,Firefox,linux,30,12.5,100.0,2.0,40.0,1.0
//! 1,Home,Chrome,linux,30,11.9,120.0,3.0,35.0,1.5
//! ```

pub mod config;
pub mod error;
pub mod limit;
pub mod pipeline;
pub mod rank;
pub mod reporter;
pub mod reshape;
pub mod schema;
pub mod stats;
pub mod table;

// Re-export main types for convenience
pub use config::Config;
pub use error::{CompareError, CompareWarning, Result};
pub use limit::RowLimit;
pub use pipeline::{compare, ComparisonView, GroupScore, MetricChart, ViewConfig};
pub use reporter::{OutputFormat, Reporter};
pub use reshape::{PlotMatrix, PlotRow};
pub use schema::Schema;
pub use table::{ReportTable, Row};
