//! Baseline-relative significance scores
//!
//! Reports carry a mean and a 95% confidence interval half-width per metric,
//! not raw samples. The standard deviation is recovered from the interval
//! (assuming it was built as `mean ± t(0.975, n-1) * sd / sqrt(n)`) and every
//! browser of a page group is compared against the baseline browser with a
//! two-sided t-test.
//!
//! # Score
//!
//! For each non-baseline browser two t-tests are run, one using the baseline's
//! spread and one using the other browser's spread, and the larger p-value is
//! kept. The comparisons are split in two buckets:
//!
//! - **baseline lower**: the baseline mean is below the other browser's mean
//! - **baseline higher**: the baseline mean is at or above the other mean
//!
//! A group scores `+min(p)` over the baseline-lower bucket when it is not
//! empty, otherwise `-min(p)` over the baseline-higher bucket. Every row of the
//! group shares the group score.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use std::cmp::Ordering;
use tracing::{debug, instrument, warn};

use crate::error::{CompareWarning, Result};
use crate::table::{ReportTable, Row};

/// Confidence level the report intervals were built with.
pub const CONFIDENCE_LEVEL: f64 = 0.95;

/// Smallest standard deviation used in a t-test; keeps zero-width intervals
/// from dividing by zero.
pub const SD_FLOOR: f64 = 0.001;

fn students_t(n: u32) -> Option<StudentsT> {
    if n < 2 {
        return None;
    }
    StudentsT::new(0.0, 1.0, f64::from(n - 1)).ok()
}

/// Two-sided critical value of Student's t for `n` samples.
///
/// ```
/// use report_compare::stats::significance::t_critical;
///
/// let t = t_critical(0.95, 30).unwrap();
/// assert!((t - 2.045).abs() < 1e-3);
/// assert_eq!(t_critical(0.95, 1), None);
/// ```
pub fn t_critical(confidence: f64, n: u32) -> Option<f64> {
    let dist = students_t(n)?;
    Some(dist.inverse_cdf(1.0 - (1.0 - confidence) / 2.0))
}

/// Recover a standard deviation from a 95% CI half-width.
///
/// Computes `sqrt(n) * ci / t(0.975, n - 1)`, clamped to [`SD_FLOOR`].
/// Returns `None` when `ci` is not finite or `n < 2`.
///
/// ```
/// use report_compare::stats::significance::{std_from_ci, SD_FLOOR};
///
/// assert_eq!(std_from_ci(0.0, 30), Some(SD_FLOOR));
/// assert!(std_from_ci(2.0, 30).unwrap() > std_from_ci(1.0, 30).unwrap());
/// ```
pub fn std_from_ci(ci: f64, n: u32) -> Option<f64> {
    if !ci.is_finite() {
        return None;
    }
    let t = t_critical(CONFIDENCE_LEVEL, n)?;
    Some((f64::from(n).sqrt() * ci / t).max(SD_FLOOR))
}

/// Two-sided one-sample t-test of `value` against `mean`.
///
/// `t = (value - mean) / (sd / sqrt(n))` with `n - 1` degrees of freedom.
pub fn t_test(value: f64, mean: f64, sd: f64, n: u32) -> Option<f64> {
    if !(sd > 0.0) {
        return None;
    }
    let dist = students_t(n)?;
    let t = (value - mean) / (sd / f64::from(n).sqrt());
    if t.is_nan() {
        return None;
    }
    Some((2.0 * dist.sf(t.abs())).min(1.0))
}

/// Which side of the other browsers the baseline falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// The baseline mean is below at least one other browser's mean
    BaselineLower,
    /// The baseline mean is at or above every other browser's mean
    BaselineHigher,
}

/// Significance of a page group's deviation from the baseline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Significance {
    pub direction: Direction,
    /// Smallest p-value found in the direction's bucket
    pub p_value: f64,
}

impl Significance {
    /// Signed score: `+p` for [`Direction::BaselineLower`], `-p` otherwise.
    ///
    /// A baseline-higher p-value that underflowed to zero is reported as the
    /// smallest negative float so the sign stays visible.
    pub fn signed(&self) -> f64 {
        match self.direction {
            Direction::BaselineLower => self.p_value,
            Direction::BaselineHigher => -self.p_value.max(f64::MIN_POSITIVE),
        }
    }

    /// Ranking order: baseline-lower scores first, then ascending signed score.
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        match (self.direction, other.direction) {
            (Direction::BaselineLower, Direction::BaselineHigher) => Ordering::Less,
            (Direction::BaselineHigher, Direction::BaselineLower) => Ordering::Greater,
            _ => self.signed().total_cmp(&other.signed()),
        }
    }
}

/// Per-row scores for one metric
#[derive(Debug, Clone, Default)]
pub struct SignificanceScores {
    /// One entry per table row; `None` where no comparison was possible
    pub scores: Vec<Option<Significance>>,
    pub warnings: Vec<CompareWarning>,
}

impl SignificanceScores {
    /// Signed scores with `NaN` for unresolved rows.
    pub fn signed(&self) -> Vec<f64> {
        self.scores
            .iter()
            .map(|s| s.map_or(f64::NAN, |s| s.signed()))
            .collect()
    }

    pub fn unresolved(&self) -> usize {
        self.scores.iter().filter(|s| s.is_none()).count()
    }
}

/// Score every row of `table` for `metric` against the baseline browser.
///
/// # Errors
///
/// - [`crate::CompareError::UnknownMetric`] if `metric` is not plottable
/// - [`crate::CompareError::BaselineNotFound`] if no browser name starts with
///   `baseline_prefix`
///
/// Groups with missing data are left unresolved and reported as
/// [`CompareWarning::MissingMetricData`].
#[instrument(skip(table), fields(rows = table.len()))]
pub fn compute_significance(
    table: &ReportTable,
    metric: &str,
    baseline_prefix: &str,
) -> Result<SignificanceScores> {
    table.schema().require_metric(metric)?;
    let baseline = table.baseline_offset(baseline_prefix)?;
    debug!(
        "Baseline {} at offset {}",
        table.browsers()[baseline],
        baseline
    );

    let mut result = SignificanceScores {
        scores: vec![None; table.len()],
        warnings: Vec::new(),
    };

    for group in table.groups() {
        match group_significance(table.group_rows(group), baseline, metric) {
            Some(score) => {
                for index in group.rows.clone() {
                    result.scores[index] = Some(score);
                }
            }
            None => {
                warn!("No {} comparison possible for page {}", metric, group.page);
                result.warnings.push(CompareWarning::MissingMetricData {
                    metric: metric.to_string(),
                    page: group.page.clone(),
                });
            }
        }
    }

    Ok(result)
}

/// Score a single page group whose baseline row sits at `baseline`.
///
/// The sample count of the baseline row is used for every browser. Returns
/// `None` if any needed value is missing, the sample count is below two, or
/// the group has no browser besides the baseline.
pub fn group_significance(rows: &[Row], baseline: usize, metric: &str) -> Option<Significance> {
    let base = rows.get(baseline)?;
    let n = base.iterations?;
    let base_mean = base.mean(metric)?;
    let base_sd = std_from_ci(base.ci(metric)?, n)?;

    let mut lower: Option<f64> = None;
    let mut higher: Option<f64> = None;

    for (offset, row) in rows.iter().enumerate() {
        if offset == baseline {
            continue;
        }

        let mean = row.mean(metric)?;
        let sd = std_from_ci(row.ci(metric)?, n)?;
        let p = t_test(mean, base_mean, base_sd, n)?.max(t_test(base_mean, mean, sd, n)?);

        let bucket = if base_mean < mean {
            &mut lower
        } else {
            &mut higher
        };
        *bucket = Some(bucket.map_or(p, |best| best.min(p)));
    }

    match (lower, higher) {
        (Some(p_value), _) => Some(Significance {
            direction: Direction::BaselineLower,
            p_value,
        }),
        (None, Some(p_value)) => Some(Significance {
            direction: Direction::BaselineHigher,
            p_value,
        }),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    fn group(means: &[(&str, f64, f64)], n: u32) -> Vec<Row> {
        means
            .iter()
            .map(|&(browser, mean, ci)| Row::new("p", browser, n).with_metric("Load", mean, ci))
            .collect()
    }

    #[test]
    fn test_t_critical_known_values() {
        // t(0.975, 29) = 2.04523
        assert!((t_critical(0.95, 30).unwrap() - 2.045_23).abs() < 1e-4);
        // t(0.975, 9) = 2.26216
        assert!((t_critical(0.95, 10).unwrap() - 2.262_16).abs() < 1e-4);
    }

    #[test]
    fn test_std_from_ci_matches_formula() {
        let expected = 30f64.sqrt() * 2.0 / t_critical(0.95, 30).unwrap();
        assert!((std_from_ci(2.0, 30).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_std_from_ci_floor_and_invalid() {
        assert_eq!(std_from_ci(0.0, 5), Some(SD_FLOOR));
        assert_eq!(std_from_ci(-1.0, 5), Some(SD_FLOOR));
        assert_eq!(std_from_ci(f64::NAN, 5), None);
        assert_eq!(std_from_ci(1.0, 1), None);
        assert_eq!(std_from_ci(1.0, 0), None);
    }

    #[test]
    fn test_t_test_identical_means() {
        assert!((t_test(10.0, 10.0, 1.0, 20).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_t_test_symmetric_and_small_for_large_diff() {
        let a = t_test(12.0, 10.0, 1.0, 20).unwrap();
        let b = t_test(8.0, 10.0, 1.0, 20).unwrap();
        assert!((a - b).abs() < 1e-12);
        assert!(a < 1e-6);
        assert_eq!(t_test(1.0, 2.0, 0.0, 20), None);
    }

    #[test]
    fn test_baseline_lower_scores_positive() {
        let rows = group(&[("Firefox", 100.0, 2.0), ("Chrome", 120.0, 3.0)], 30);
        let score = group_significance(&rows, 0, "Load").unwrap();

        assert_eq!(score.direction, Direction::BaselineLower);
        assert!(score.signed() >= 0.0);

        let n = 30;
        let sd_f = std_from_ci(2.0, n).unwrap();
        let sd_c = std_from_ci(3.0, n).unwrap();
        let expected = t_test(120.0, 100.0, sd_f, n)
            .unwrap()
            .max(t_test(100.0, 120.0, sd_c, n).unwrap());
        assert_eq!(score.p_value, expected);
    }

    #[test]
    fn test_baseline_higher_scores_negative() {
        let rows = group(
            &[("Chrome", 90.0, 5.0), ("Firefox", 100.0, 5.0), ("Safari", 99.0, 5.0)],
            10,
        );
        let score = group_significance(&rows, 1, "Load").unwrap();

        assert_eq!(score.direction, Direction::BaselineHigher);
        assert!(score.signed() < 0.0);
    }

    #[test]
    fn test_lower_bucket_wins_when_mixed() {
        // Baseline beats Chrome by a lot but loses slightly to Safari
        let rows = group(
            &[("Firefox", 100.0, 1.0), ("Chrome", 200.0, 1.0), ("Safari", 99.0, 1.0)],
            10,
        );
        let score = group_significance(&rows, 0, "Load").unwrap();

        assert_eq!(score.direction, Direction::BaselineLower);
        assert!(score.p_value < 1e-6);
    }

    #[test]
    fn test_minimum_p_in_bucket() {
        let rows = group(
            &[("Firefox", 100.0, 5.0), ("Chrome", 101.0, 5.0), ("Safari", 130.0, 5.0)],
            10,
        );
        let score = group_significance(&rows, 0, "Load").unwrap();
        let chrome_only = group_significance(&rows[..2], 0, "Load").unwrap();

        assert!(score.p_value < chrome_only.p_value);
    }

    #[test]
    fn test_equal_means_go_to_higher_bucket() {
        let rows = group(&[("Firefox", 100.0, 5.0), ("Chrome", 100.0, 5.0)], 10);
        let score = group_significance(&rows, 0, "Load").unwrap();

        assert_eq!(score.direction, Direction::BaselineHigher);
        assert!((score.p_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_underflowed_p_keeps_sign() {
        let score = Significance {
            direction: Direction::BaselineHigher,
            p_value: 0.0,
        };
        assert!(score.signed() < 0.0);
    }

    #[test]
    fn test_missing_data_is_unresolved() {
        let mut rows = group(&[("Firefox", 100.0, 2.0), ("Chrome", 120.0, 3.0)], 30);
        rows[1].values.remove("Load CI");
        assert_eq!(group_significance(&rows, 0, "Load"), None);

        let rows = group(&[("Firefox", 100.0, 2.0), ("Chrome", 120.0, 3.0)], 1);
        assert_eq!(group_significance(&rows, 0, "Load"), None);

        let rows = group(&[("Firefox", 100.0, 2.0)], 30);
        assert_eq!(group_significance(&rows, 0, "Load"), None);
    }

    #[test]
    fn test_rank_cmp_orders_lower_before_higher() {
        let lower = Significance {
            direction: Direction::BaselineLower,
            p_value: 0.9,
        };
        let higher = Significance {
            direction: Direction::BaselineHigher,
            p_value: 0.01,
        };
        let weak_higher = Significance {
            direction: Direction::BaselineHigher,
            p_value: 0.5,
        };

        assert_eq!(lower.rank_cmp(&higher), Ordering::Less);
        assert_eq!(higher.rank_cmp(&lower), Ordering::Greater);
        // -0.5 < -0.01
        assert_eq!(weak_higher.rank_cmp(&higher), Ordering::Less);
    }

    #[test]
    fn test_compute_significance_fills_every_row_of_group() {
        let table = ReportTable::new(
            Schema::for_metrics(["Load"]),
            vec![
                Row::new("a", "Firefox", 30).with_metric("Load", 100.0, 2.0),
                Row::new("a", "Chrome", 30).with_metric("Load", 120.0, 3.0),
                Row::new("b", "Firefox", 30).with_metric("Load", 100.0, 2.0),
                Row::new("b", "Chrome", 30).with_value("Load", 80.0),
            ],
        )
        .unwrap();

        let result = compute_significance(&table, "Load", "Firefox").unwrap();

        assert_eq!(result.scores.len(), 4);
        assert_eq!(result.scores[0], result.scores[1]);
        assert!(result.scores[0].is_some());
        assert_eq!(result.scores[2], None);
        assert_eq!(result.scores[3], None);
        assert_eq!(result.unresolved(), 2);
        assert!(result.signed()[3].is_nan());
        assert_eq!(
            result.warnings,
            vec![CompareWarning::MissingMetricData {
                metric: "Load".to_string(),
                page: "b".to_string()
            }]
        );
    }

    #[test]
    fn test_compute_significance_fatal_errors() {
        let table = ReportTable::new(
            Schema::for_metrics(["Load"]),
            vec![
                Row::new("a", "Chrome", 30).with_metric("Load", 1.0, 0.1),
                Row::new("a", "Safari", 30).with_metric("Load", 1.0, 0.1),
            ],
        )
        .unwrap();

        assert!(matches!(
            compute_significance(&table, "Load", "Firefox"),
            Err(crate::CompareError::BaselineNotFound { .. })
        ));
        assert!(matches!(
            compute_significance(&table, "Paint", "Chrome"),
            Err(crate::CompareError::UnknownMetric { .. })
        ));
    }
}
