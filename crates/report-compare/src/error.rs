//! Error and warning types for report comparison.
//!
//! Fatal conditions abort the whole comparison and surface as [`CompareError`].
//! Recoverable conditions never abort: they are collected as
//! [`CompareWarning`] values next to the result and logged.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Malformed table: {reason}")]
    MalformedTable { reason: String },

    #[error("Baseline browser not found: no browser starting with {prefix:?} for page {page:?}")]
    BaselineNotFound { prefix: String, page: String },

    #[error("Unknown metric column: {name}")]
    UnknownMetric { name: String },

    #[error("Missing required column: {name}")]
    MissingColumn { name: String },

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompareError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        CompareError::MalformedTable {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CompareError>;

/// Non-fatal condition encountered while comparing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompareWarning {
    /// A mean, CI or iteration count needed for a page's score was absent.
    MissingMetricData { metric: String, page: String },
    /// Some rows could not be ordered by significance.
    UnrankedRows { count: usize },
    /// The row limit selector was not a positive integer; all rows are kept.
    UnparseableLimit { value: String },
}

impl fmt::Display for CompareWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareWarning::MissingMetricData { metric, page } => {
                write!(f, "missing {} data for page {}", metric, page)
            }
            CompareWarning::UnrankedRows { count } => write!(
                f,
                "pvalue sorting not possible for {} rows due to missing data",
                count
            ),
            CompareWarning::UnparseableLimit { value } => {
                write!(f, "row limit {:?} is not a positive integer, showing all", value)
            }
        }
    }
}
