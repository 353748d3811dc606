//! In-memory benchmark report
//!
//! A [`ReportTable`] is an arena of [`Row`]s partitioned into page groups:
//! contiguous runs of one row per browser for a single page. The partition is
//! validated when the table is built, so later stages can rely on
//!
//! - the row count being a multiple of the group size,
//! - every group holding each browser exactly once,
//! - every group listing browsers in the same order.
//!
//! # Example
//!
//! ```
//! use report_compare::schema::Schema;
//! use report_compare::table::{ReportTable, Row};
//!
//! # fn example() -> report_compare::error::Result<()> {
//! let table = ReportTable::new(
//!     Schema::for_metrics(["Load"]),
//!     vec![
//!         Row::new("Home", "Firefox", 30).with_metric("Load", 100.0, 2.0),
//!         Row::new("Home", "Chrome", 30).with_metric("Load", 120.0, 3.0),
//!     ],
//! )?;
//! assert_eq!(table.group_size(), 2);
//! assert_eq!(table.groups().len(), 1);
//! # Ok(())
//! # }
//! ```

mod csv;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;

use crate::error::{CompareError, Result};
use crate::schema::{ci_column, Schema};

/// One measurement unit: a page loaded in a browser on an OS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub page: String,
    pub browser: String,
    #[serde(default)]
    pub os: String,
    /// Sample count behind every mean in this row
    pub iterations: Option<u32>,
    /// Numeric cells keyed by column name; absent keys are missing values
    #[serde(default)]
    pub values: BTreeMap<String, f64>,
}

impl Row {
    pub fn new(page: impl Into<String>, browser: impl Into<String>, iterations: u32) -> Self {
        Self {
            page: page.into(),
            browser: browser.into(),
            os: String::new(),
            iterations: Some(iterations),
            values: BTreeMap::new(),
        }
    }

    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }

    pub fn without_iterations(mut self) -> Self {
        self.iterations = None;
        self
    }

    /// Set the mean and CI half-width of `metric`.
    pub fn with_metric(mut self, metric: &str, mean: f64, ci: f64) -> Self {
        self.values.insert(metric.to_string(), mean);
        self.values.insert(ci_column(metric), ci);
        self
    }

    /// Set a single numeric cell.
    pub fn with_value(mut self, column: impl Into<String>, value: f64) -> Self {
        self.values.insert(column.into(), value);
        self
    }

    pub fn value(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied().filter(|v| v.is_finite())
    }

    pub fn mean(&self, metric: &str) -> Option<f64> {
        self.value(metric)
    }

    pub fn ci(&self, metric: &str) -> Option<f64> {
        self.value(&ci_column(metric))
    }
}

/// A contiguous block of rows, one per browser, for a single page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageGroup {
    pub page: String,
    pub rows: Range<usize>,
}

/// Validated report table
#[derive(Debug, Clone)]
pub struct ReportTable {
    schema: Schema,
    rows: Vec<Row>,
    browsers: Vec<String>,
    groups: Vec<PageGroup>,
}

impl ReportTable {
    /// Build a table and validate its page-group structure.
    ///
    /// # Errors
    ///
    /// Returns [`CompareError::MalformedTable`] if the table is empty, the row
    /// count is not a multiple of the number of browsers, or a group mixes
    /// pages, repeats a browser, misses one, or lists browsers in a different
    /// order than the first group.
    pub fn new(schema: Schema, rows: Vec<Row>) -> Result<Self> {
        if rows.is_empty() {
            return Err(CompareError::malformed("table has no rows"));
        }

        let mut browsers: Vec<String> = Vec::new();
        for row in &rows {
            if !browsers.iter().any(|b| b == &row.browser) {
                browsers.push(row.browser.clone());
            }
        }

        let group_size = browsers.len();
        if rows.len() % group_size != 0 {
            return Err(CompareError::malformed(format!(
                "{} rows is not a multiple of {} browsers",
                rows.len(),
                group_size
            )));
        }

        let mut groups = Vec::with_capacity(rows.len() / group_size);
        for (index, chunk) in rows.chunks(group_size).enumerate() {
            let start = index * group_size;
            let page = &chunk[0].page;

            if let Some(stray) = chunk.iter().find(|r| &r.page != page) {
                return Err(CompareError::malformed(format!(
                    "group {} mixes pages {:?} and {:?}",
                    index, page, stray.page
                )));
            }

            for (offset, row) in chunk.iter().enumerate() {
                if row.browser != browsers[offset] {
                    let reason = if chunk[..offset].iter().any(|r| r.browser == row.browser) {
                        format!("browser {:?} appears twice for page {:?}", row.browser, page)
                    } else {
                        format!(
                            "page {:?} lists {:?} where {:?} was expected",
                            page, row.browser, browsers[offset]
                        )
                    };
                    return Err(CompareError::malformed(reason));
                }
            }

            groups.push(PageGroup {
                page: page.clone(),
                rows: start..start + group_size,
            });
        }

        Ok(Self {
            schema,
            rows,
            browsers,
            groups,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> &Row {
        &self.rows[index]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Browser names in group order.
    pub fn browsers(&self) -> &[String] {
        &self.browsers
    }

    /// Number of rows per page group (the number of distinct browsers).
    pub fn group_size(&self) -> usize {
        self.browsers.len()
    }

    pub fn groups(&self) -> &[PageGroup] {
        &self.groups
    }

    pub fn group_rows(&self, group: &PageGroup) -> &[Row] {
        &self.rows[group.rows.clone()]
    }

    /// Offset inside every group of the first browser whose name starts with
    /// `prefix`.
    pub fn baseline_offset(&self, prefix: &str) -> Result<usize> {
        self.browsers
            .iter()
            .position(|b| b.starts_with(prefix))
            .ok_or_else(|| CompareError::BaselineNotFound {
                prefix: prefix.to_string(),
                page: self
                    .groups
                    .first()
                    .map(|g| g.page.clone())
                    .unwrap_or_default(),
            })
    }
}
