//! Column schema for benchmark reports
//!
//! A report header is classified once, when the table is loaded, into column
//! roles. Everything downstream asks the [`Schema`] which columns are
//! plottable metrics instead of re-deriving the naming rules.
//!
//! # Naming rules
//!
//! - `X`, `Page`, `Browser`, `OS`, `Iterations` and `Duration` are fixed
//!   identifier/bookkeeping columns
//! - a name ending in `CI` is the confidence interval half-width of the metric
//!   named by the rest of the column (`"Load CI"` belongs to `"Load"`)
//! - a name ending in `Impact` is a derived column and never plotted
//! - every other column is a metric

use serde::{Deserialize, Serialize};

use crate::error::{CompareError, Result};

pub const PAGE_COLUMN: &str = "Page";
pub const BROWSER_COLUMN: &str = "Browser";
pub const OS_COLUMN: &str = "OS";
pub const ITERATIONS_COLUMN: &str = "Iterations";
pub const DURATION_COLUMN: &str = "Duration";
pub const INDEX_COLUMN: &str = "X";

const CI_SUFFIX: &str = "CI";
const IMPACT_SUFFIX: &str = "Impact";

/// Role of a single report column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum ColumnRole {
    /// Row index written by the report generator (or an unnamed column)
    Index,
    Page,
    Browser,
    Os,
    Iterations,
    Duration,
    /// Plottable metric holding per-row means
    Metric,
    /// Confidence interval half-width for `metric`
    Interval { metric: String },
    Impact,
}

impl ColumnRole {
    /// Classify a column by name.
    ///
    /// ```
    /// use report_compare::schema::ColumnRole;
    ///
    /// assert_eq!(ColumnRole::classify("Load"), ColumnRole::Metric);
    /// assert_eq!(
    ///     ColumnRole::classify("Load CI"),
    ///     ColumnRole::Interval { metric: "Load".to_string() }
    /// );
    /// assert_eq!(ColumnRole::classify("Energy Impact"), ColumnRole::Impact);
    /// ```
    pub fn classify(name: &str) -> Self {
        match name {
            "" | INDEX_COLUMN => ColumnRole::Index,
            PAGE_COLUMN => ColumnRole::Page,
            BROWSER_COLUMN => ColumnRole::Browser,
            OS_COLUMN => ColumnRole::Os,
            ITERATIONS_COLUMN => ColumnRole::Iterations,
            DURATION_COLUMN => ColumnRole::Duration,
            _ => {
                if let Some(metric) = name.strip_suffix(CI_SUFFIX) {
                    ColumnRole::Interval {
                        metric: metric.trim_end().to_string(),
                    }
                } else if name.ends_with(IMPACT_SUFFIX) {
                    ColumnRole::Impact
                } else {
                    ColumnRole::Metric
                }
            }
        }
    }

    /// Whether cells of this column hold numbers.
    pub fn is_numeric(&self) -> bool {
        !matches!(
            self,
            ColumnRole::Index | ColumnRole::Page | ColumnRole::Browser | ColumnRole::Os
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(flatten)]
    pub role: ColumnRole,
}

/// Ordered set of classified report columns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Build a schema from header names, in header order.
    pub fn from_header<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let columns = names
            .into_iter()
            .map(|name| {
                let name = name.into();
                let role = ColumnRole::classify(&name);
                Column { name, role }
            })
            .collect();
        Self { columns }
    }

    /// Standard report layout: identifier columns followed by a mean and a
    /// `CI` column for each metric.
    ///
    /// ```
    /// use report_compare::schema::Schema;
    ///
    /// let schema = Schema::for_metrics(["Load", "Paint"]);
    /// assert_eq!(schema.metric_names(), vec!["Load", "Paint"]);
    /// assert!(schema.position("Paint CI").is_some());
    /// ```
    pub fn for_metrics<I, S>(metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = vec![
            PAGE_COLUMN.to_string(),
            BROWSER_COLUMN.to_string(),
            OS_COLUMN.to_string(),
            ITERATIONS_COLUMN.to_string(),
        ];
        for metric in metrics {
            let metric = metric.as_ref();
            names.push(metric.to_string());
            names.push(ci_column(metric));
        }
        Self::from_header(names)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Index of the first column with `role`.
    pub fn find_role(&self, role: &ColumnRole) -> Option<usize> {
        self.columns.iter().position(|c| &c.role == role)
    }

    pub(crate) fn require_role(&self, role: ColumnRole, name: &str) -> Result<usize> {
        self.find_role(&role).ok_or_else(|| CompareError::MissingColumn {
            name: name.to_string(),
        })
    }

    /// Plottable metrics in header order.
    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|c| c.role == ColumnRole::Metric)
            .map(|c| c.name.as_str())
    }

    pub fn metric_names(&self) -> Vec<&str> {
        self.metrics().collect()
    }

    pub fn is_metric(&self, name: &str) -> bool {
        self.metrics().any(|m| m == name)
    }

    /// Validate that `name` is a plottable metric.
    pub fn require_metric(&self, name: &str) -> Result<()> {
        if self.is_metric(name) {
            Ok(())
        } else {
            Err(CompareError::UnknownMetric {
                name: name.to_string(),
            })
        }
    }
}

/// Name of the confidence interval column paired with `metric`.
pub fn ci_column(metric: &str) -> String {
    format!("{} {}", metric, CI_SUFFIX)
}
