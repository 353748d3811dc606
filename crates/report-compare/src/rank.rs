//! Row ordering by significance
//!
//! Rows are ordered by a key precomputed once per row:
//!
//! 1. significance score (baseline-lower scores first, then ascending signed
//!    score); rows without a score come after every scored row
//! 2. page name, ascending
//! 3. browser name, ascending
//!
//! The sort is stable, so rows equal on every key keep their input order.

use std::cmp::Ordering;
use tracing::warn;

use crate::error::{CompareError, Result};
use crate::stats::Significance;
use crate::table::Row;

/// Precomputed ordering key of one row
#[derive(Debug, Clone, Copy)]
pub struct RankKey<'a> {
    pub score: Option<Significance>,
    pub page: &'a str,
    pub browser: &'a str,
}

impl<'a> RankKey<'a> {
    pub fn new(row: &'a Row, score: Option<Significance>) -> Self {
        Self {
            score,
            page: &row.page,
            browser: &row.browser,
        }
    }

    pub fn compare(&self, other: &Self) -> Ordering {
        let by_score = match (&self.score, &other.score) {
            (Some(a), Some(b)) => a.rank_cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };

        by_score
            .then_with(|| self.page.cmp(other.page))
            .then_with(|| self.browser.cmp(other.browser))
    }
}

/// Order `rows` by their scores, returning a permutation of row indices.
///
/// # Errors
///
/// Returns [`CompareError::MalformedTable`] if `scores` does not have one
/// entry per row.
///
/// # Example
///
/// ```
/// use report_compare::rank::order;
/// use report_compare::table::Row;
///
/// let rows = vec![
///     Row::new("b", "Firefox", 5),
///     Row::new("a", "Firefox", 5),
/// ];
/// assert_eq!(order(&rows, &[None, None]).unwrap(), vec![1, 0]);
/// ```
pub fn order(rows: &[Row], scores: &[Option<Significance>]) -> Result<Vec<usize>> {
    if rows.len() != scores.len() {
        return Err(CompareError::malformed(format!(
            "{} scores for {} rows",
            scores.len(),
            rows.len()
        )));
    }

    let unscored = scores.iter().filter(|s| s.is_none()).count();
    if unscored > 0 {
        warn!(
            "pvalue sorting not possible for {} rows due to missing data",
            unscored
        );
    }

    let keys: Vec<RankKey<'_>> = rows
        .iter()
        .zip(scores)
        .map(|(row, score)| RankKey::new(row, *score))
        .collect();

    let mut indices: Vec<usize> = (0..rows.len()).collect();
    indices.sort_by(|&a, &b| keys[a].compare(&keys[b]));
    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::Direction;

    fn lower(p: f64) -> Option<Significance> {
        Some(Significance {
            direction: Direction::BaselineLower,
            p_value: p,
        })
    }

    fn higher(p: f64) -> Option<Significance> {
        Some(Significance {
            direction: Direction::BaselineHigher,
            p_value: p,
        })
    }

    fn rows(specs: &[(&str, &str)]) -> Vec<Row> {
        specs
            .iter()
            .map(|&(page, browser)| Row::new(page, browser, 10))
            .collect()
    }

    #[test]
    fn test_positive_scores_before_negative() {
        let rows = rows(&[("a", "x"), ("b", "x"), ("c", "x")]);
        let scores = vec![higher(0.001), lower(0.8), higher(0.5)];

        // +0.8, then -0.5, then -0.001
        assert_eq!(order(&rows, &scores).unwrap(), vec![1, 2, 0]);
    }

    #[test]
    fn test_smaller_positive_score_first() {
        let rows = rows(&[("a", "x"), ("b", "x"), ("c", "x")]);
        let scores = vec![lower(0.3), lower(0.01), lower(0.2)];

        assert_eq!(order(&rows, &scores).unwrap(), vec![1, 2, 0]);
    }

    #[test]
    fn test_ties_break_on_page_then_browser() {
        let rows = rows(&[("b", "Firefox"), ("a", "Firefox"), ("b", "Chrome"), ("a", "Chrome")]);
        let scores = vec![lower(0.1); 4];

        assert_eq!(order(&rows, &scores).unwrap(), vec![3, 1, 2, 0]);
    }

    #[test]
    fn test_unscored_rows_sort_last_by_page() {
        let rows = rows(&[("z", "x"), ("a", "x"), ("m", "x"), ("b", "x")]);
        let scores = vec![None, None, higher(0.2), None];

        assert_eq!(order(&rows, &scores).unwrap(), vec![2, 1, 3, 0]);
    }

    #[test]
    fn test_fully_tied_rows_keep_input_order() {
        let rows = rows(&[("a", "x"), ("a", "x"), ("a", "x")]);
        let scores = vec![lower(0.5); 3];

        assert_eq!(order(&rows, &scores).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_length_mismatch() {
        let rows = rows(&[("a", "x")]);
        assert!(matches!(
            order(&rows, &[]),
            Err(CompareError::MalformedTable { .. })
        ));
    }
}
