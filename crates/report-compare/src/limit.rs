//! Page-group row limit
//!
//! The limit counts page groups, not rows, so truncation always lands on a
//! group boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;

use crate::error::CompareWarning;

/// Number of page groups to keep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowLimit {
    #[default]
    All,
    Groups(NonZeroUsize),
}

impl RowLimit {
    /// Parse the value of a row-limit selector.
    ///
    /// An empty value or "all"/"show all" (any case) means no limit. Any
    /// other value that is not a positive integer is rejected with
    /// [`CompareWarning::UnparseableLimit`]; callers fall back to
    /// [`RowLimit::All`].
    ///
    /// ```
    /// use report_compare::limit::RowLimit;
    ///
    /// assert_eq!(RowLimit::parse("3").unwrap().groups(), Some(3));
    /// assert_eq!(RowLimit::parse("Show all").unwrap(), RowLimit::All);
    /// assert!(RowLimit::parse("0").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self, CompareWarning> {
        let trimmed = value.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("all")
            || trimmed.eq_ignore_ascii_case("show all")
        {
            return Ok(RowLimit::All);
        }

        trimmed
            .parse::<NonZeroUsize>()
            .map(RowLimit::Groups)
            .map_err(|_| CompareWarning::UnparseableLimit {
                value: value.to_string(),
            })
    }

    /// Parse a selector value, treating anything unparseable as no limit.
    pub fn parse_lenient(value: &str) -> (Self, Option<CompareWarning>) {
        match Self::parse(value) {
            Ok(limit) => (limit, None),
            Err(warning) => (RowLimit::All, Some(warning)),
        }
    }

    pub fn groups(&self) -> Option<usize> {
        match self {
            RowLimit::All => None,
            RowLimit::Groups(n) => Some(n.get()),
        }
    }
}

impl fmt::Display for RowLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowLimit::All => write!(f, "all"),
            RowLimit::Groups(n) => write!(f, "{}", n),
        }
    }
}

/// Keep the first `limit` page groups of `ordered`.
///
/// Returns the prefix of length `k * group_size`, or all of `ordered` when it
/// is shorter, the limit is [`RowLimit::All`] or `group_size` is zero.
///
/// ```
/// use report_compare::limit::{limit, RowLimit};
///
/// let rows = [0, 1, 2, 3, 4, 5];
/// assert_eq!(limit(&rows, RowLimit::parse("1").unwrap(), 2), &[0, 1]);
/// assert_eq!(limit(&rows, RowLimit::All, 2), &rows);
/// ```
pub fn limit<T>(ordered: &[T], limit: RowLimit, group_size: usize) -> &[T] {
    match limit.groups() {
        Some(groups) if group_size > 0 => {
            let keep = groups.saturating_mul(group_size).min(ordered.len());
            &ordered[..keep]
        }
        _ => ordered,
    }
}
