//! Comparison pipeline
//!
//! Runs the full view computation for one report:
//!
//! ```text
//! ReportTable ──► significance (sort metric) ──► order ──► limit ──► reshape (every metric)
//! ```
//!
//! Fatal problems abort with a
//! [`CompareError`](crate::error::CompareError). Recoverable ones are
//! collected in [`ComparisonView::warnings`] and logged.
//!
//! # Example
//!
//! ```
//! use report_compare::pipeline::{compare, ViewConfig};
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
//!
//! let view = compare(&table, &ViewConfig::default())?;
//! assert_eq!(view.sort_metric.as_deref(), Some("Load"));
//! assert_eq!(view.charts[0].matrix.rows.len(), 1);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::{CompareWarning, Result};
use crate::limit::{limit, RowLimit};
use crate::rank::order;
use crate::reshape::{reshape, PlotMatrix};
use crate::stats::{compute_significance, Significance};
use crate::table::{ReportTable, Row};

/// Browser name prefix used as the baseline when none is configured.
pub const DEFAULT_BASELINE: &str = "Firefox";

/// Selector state for one view of a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Prefix identifying the baseline browser
    pub baseline: String,
    /// Metric whose significance orders the rows; defaults to the first
    /// plottable metric
    pub sort_metric: Option<String>,
    /// Raw row-limit selector value (page groups); `None` shows all
    pub row_limit: Option<String>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            baseline: DEFAULT_BASELINE.to_string(),
            sort_metric: None,
            row_limit: None,
        }
    }
}

impl ViewConfig {
    pub fn with_baseline(mut self, baseline: impl Into<String>) -> Self {
        self.baseline = baseline.into();
        self
    }

    pub fn with_sort_metric(mut self, metric: impl Into<String>) -> Self {
        self.sort_metric = Some(metric.into());
        self
    }

    pub fn with_row_limit(mut self, limit: impl Into<String>) -> Self {
        self.row_limit = Some(limit.into());
        self
    }
}

/// Rank of a page group in the view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupScore {
    pub page: String,
    /// Signed significance; `None` if it could not be computed
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub significance: Option<Significance>,
}

/// Plot data for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricChart {
    pub metric: String,
    #[serde(flatten)]
    pub matrix: PlotMatrix,
}

/// Everything a renderer needs to draw a report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonView {
    pub sort_metric: Option<String>,
    pub baseline: String,
    pub row_limit: RowLimit,
    /// Browser labels, in the order intervals appear in every plot row
    pub browsers: Vec<String>,
    pub group_size: usize,
    /// Displayed page groups, best ranked first
    pub groups: Vec<GroupScore>,
    /// One chart per plottable metric, in column order
    pub charts: Vec<MetricChart>,
    pub warnings: Vec<CompareWarning>,
}

impl ComparisonView {
    pub fn chart(&self, metric: &str) -> Option<&MetricChart> {
        self.charts.iter().find(|c| c.metric == metric)
    }
}

/// Compute the ordered, limited plot data of every metric in `table`.
///
/// # Errors
///
/// - [`UnknownMetric`](crate::error::CompareError::UnknownMetric) if the
///   sort metric is not plottable
/// - [`BaselineNotFound`](crate::error::CompareError::BaselineNotFound) if no
///   browser matches the baseline
/// - [`MalformedTable`](crate::error::CompareError::MalformedTable) if
///   ordering splits a page group (two groups with the same page name)
#[instrument(skip(table, config), fields(rows = table.len(), sort_metric = tracing::field::Empty))]
pub fn compare(table: &ReportTable, config: &ViewConfig) -> Result<ComparisonView> {
    let mut warnings = Vec::new();
    let group_size = table.group_size();

    let sort_metric = match &config.sort_metric {
        Some(metric) => {
            table.schema().require_metric(metric)?;
            Some(metric.clone())
        }
        None => table.schema().metrics().next().map(str::to_string),
    };
    if let Some(metric) = &sort_metric {
        tracing::Span::current().record("sort_metric", metric.as_str());
    }

    let scores: Vec<Option<Significance>> = match &sort_metric {
        Some(metric) => {
            let result = compute_significance(table, metric, &config.baseline)?;
            warnings.extend(result.warnings);
            result.scores
        }
        None => {
            table.baseline_offset(&config.baseline)?;
            vec![None; table.len()]
        }
    };

    let unscored = scores.iter().filter(|s| s.is_none()).count();
    if unscored > 0 {
        warnings.push(CompareWarning::UnrankedRows { count: unscored });
    }

    let ordered = order(table.rows(), &scores)?;

    let row_limit = match &config.row_limit {
        Some(value) => {
            let (row_limit, warning) = RowLimit::parse_lenient(value);
            if let Some(warning) = warning {
                warn!("{}", warning);
                warnings.push(warning);
            }
            row_limit
        }
        None => RowLimit::All,
    };
    let shown = limit(&ordered, row_limit, group_size);
    debug!("Showing {} of {} rows", shown.len(), ordered.len());

    let shown_rows: Vec<&Row> = shown.iter().map(|&i| table.row(i)).collect();

    let mut charts = Vec::new();
    for metric in table.schema().metrics() {
        let matrix = reshape(shown_rows.iter().copied(), metric, group_size)?;
        charts.push(MetricChart {
            metric: metric.to_string(),
            matrix,
        });
    }

    let browsers = shown_rows
        .iter()
        .take(group_size)
        .map(|r| r.browser.clone())
        .collect();

    let groups = shown
        .chunks(group_size)
        .map(|chunk| {
            let first = chunk[0];
            GroupScore {
                page: table.row(first).page.clone(),
                score: scores[first].map(|s| s.signed()),
                significance: scores[first],
            }
        })
        .collect();

    info!(
        "Compared {} page groups across {} browsers",
        shown.len() / group_size,
        group_size
    );

    Ok(ComparisonView {
        sort_metric,
        baseline: config.baseline.clone(),
        row_limit,
        browsers,
        group_size,
        groups,
        charts,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompareError;
    use crate::schema::Schema;

    fn table() -> ReportTable {
        ReportTable::new(
            Schema::for_metrics(["Load", "Paint"]),
            vec![
                // a: baseline clearly slower than Chrome
                Row::new("a", "Firefox", 30)
                    .with_metric("Load", 150.0, 2.0)
                    .with_metric("Paint", 10.0, 1.0),
                Row::new("a", "Chrome", 30)
                    .with_metric("Load", 100.0, 2.0)
                    .with_metric("Paint", 12.0, 1.0),
                // b: baseline clearly faster
                Row::new("b", "Firefox", 30)
                    .with_metric("Load", 100.0, 2.0)
                    .with_metric("Paint", 10.0, 1.0),
                Row::new("b", "Chrome", 30)
                    .with_metric("Load", 150.0, 2.0)
                    .with_metric("Paint", 10.5, 1.0),
                // c: baseline slightly faster
                Row::new("c", "Firefox", 30)
                    .with_metric("Load", 100.0, 5.0)
                    .with_metric("Paint", 10.0, 1.0),
                Row::new("c", "Chrome", 30)
                    .with_metric("Load", 101.0, 5.0)
                    .with_metric("Paint", 30.0, 1.0),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_default_sort_metric_is_first_metric() {
        let view = compare(&table(), &ViewConfig::default()).unwrap();

        assert_eq!(view.sort_metric.as_deref(), Some("Load"));
        let pages: Vec<&str> = view.groups.iter().map(|g| g.page.as_str()).collect();
        assert_eq!(pages, vec!["b", "c", "a"]);
        assert!(view.warnings.is_empty());
    }

    #[test]
    fn test_rows_within_group_sorted_by_browser() {
        let view = compare(&table(), &ViewConfig::default()).unwrap();

        assert_eq!(view.browsers, vec!["Chrome", "Firefox"]);
        let load = view.chart("Load").unwrap();
        assert_eq!(load.matrix.rows[0].intervals[0].value, Some(150.0));
        assert_eq!(load.matrix.rows[0].intervals[1].value, Some(100.0));
    }

    #[test]
    fn test_sort_metric_changes_order() {
        let config = ViewConfig::default().with_sort_metric("Paint");
        let view = compare(&table(), &config).unwrap();

        let pages: Vec<&str> = view.groups.iter().map(|g| g.page.as_str()).collect();
        // c (+tiny p) before a (+larger p) before b
        assert_eq!(pages, vec!["c", "a", "b"]);
        assert_eq!(view.charts.len(), 2);
        assert_eq!(view.chart("Paint").unwrap().matrix.rows[0].page, "c");
    }

    #[test]
    fn test_row_limit_keeps_best_groups() {
        let config = ViewConfig::default().with_row_limit("1");
        let view = compare(&table(), &config).unwrap();

        assert_eq!(view.groups.len(), 1);
        assert_eq!(view.groups[0].page, "b");
        assert!(view.charts.iter().all(|c| c.matrix.rows.len() == 1));
    }

    #[test]
    fn test_unparseable_limit_warns_and_shows_all() {
        let config = ViewConfig::default().with_row_limit("a few");
        let view = compare(&table(), &config).unwrap();

        assert_eq!(view.row_limit, RowLimit::All);
        assert_eq!(view.groups.len(), 3);
        assert_eq!(
            view.warnings,
            vec![CompareWarning::UnparseableLimit {
                value: "a few".to_string()
            }]
        );
    }

    #[test]
    fn test_unknown_sort_metric_is_fatal() {
        let config = ViewConfig::default().with_sort_metric("Paint CI");
        assert!(matches!(
            compare(&table(), &config),
            Err(CompareError::UnknownMetric { .. })
        ));
    }

    #[test]
    fn test_missing_baseline_is_fatal() {
        let config = ViewConfig::default().with_baseline("Safari");
        assert!(matches!(
            compare(&table(), &config),
            Err(CompareError::BaselineNotFound { .. })
        ));
    }

    #[test]
    fn test_missing_data_falls_back_to_page_order() {
        let table = ReportTable::new(
            Schema::for_metrics(["Load"]),
            vec![
                Row::new("z", "Firefox", 30).with_value("Load", 1.0),
                Row::new("z", "Chrome", 30).with_value("Load", 2.0),
                Row::new("m", "Firefox", 30).with_value("Load", 1.0),
                Row::new("m", "Chrome", 30).with_value("Load", 2.0),
            ],
        )
        .unwrap();

        let view = compare(&table, &ViewConfig::default()).unwrap();
        let pages: Vec<&str> = view.groups.iter().map(|g| g.page.as_str()).collect();

        assert_eq!(pages, vec!["m", "z"]);
        assert!(view.groups.iter().all(|g| g.score.is_none()));
        assert!(view
            .warnings
            .contains(&CompareWarning::UnrankedRows { count: 4 }));
        assert_eq!(
            view.chart("Load").unwrap().matrix.rows[0].intervals[0].lower,
            None
        );
    }

    #[test]
    fn test_interleaved_duplicate_pages_are_rejected() {
        let table = ReportTable::new(
            Schema::for_metrics(["Load"]),
            vec![
                Row::new("a", "Firefox", 30).with_value("Load", 1.0),
                Row::new("a", "Chrome", 30).with_value("Load", 1.0),
                Row::new("a", "Firefox", 30).with_value("Load", 2.0),
                Row::new("a", "Chrome", 30).with_value("Load", 2.0),
            ],
        )
        .unwrap();

        // Both groups are unscored and share a page, so ordering pairs the
        // two Chrome rows together.
        assert!(matches!(
            compare(&table, &ViewConfig::default()),
            Err(CompareError::MalformedTable { .. })
        ));
    }

    #[test]
    fn test_table_without_metrics() {
        let table = ReportTable::new(
            Schema::from_header(["Page", "Browser", "Iterations"]),
            vec![Row::new("b", "Firefox", 3), Row::new("a", "Firefox", 3)],
        )
        .unwrap();

        let view = compare(&table, &ViewConfig::default()).unwrap();
        assert_eq!(view.sort_metric, None);
        assert!(view.charts.is_empty());
        assert_eq!(view.browsers, vec!["Firefox"]);
        assert_eq!(view.groups[0].page, "a");
    }
}
