//! Plot matrix for grouped bar charts
//!
//! Each page group of the ordered rows becomes one [`PlotRow`]: the page label
//! followed by a `(value, lower, upper)` interval per browser, in the order the
//! rows arrive. Flattened, a plot row reads
//! `[page, v1, lo1, hi1, ..., vB, loB, hiB]`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CompareError, Result};
use crate::table::Row;

/// One bar with its error interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub value: Option<f64>,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl Interval {
    /// `(mean, mean - ci, mean + ci)` of `metric` in `row`.
    pub fn from_row(row: &Row, metric: &str) -> Self {
        let value = row.mean(metric);
        let ci = row.ci(metric);
        let (lower, upper) = match (value, ci) {
            (Some(mean), Some(ci)) => (Some(mean - ci), Some(mean + ci)),
            _ => (None, None),
        };
        Self {
            value,
            lower,
            upper,
        }
    }
}

/// One page of a metric chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotRow {
    pub page: String,
    pub intervals: Vec<Interval>,
}

impl PlotRow {
    /// Number of flattened cells: the label plus three per browser.
    pub fn width(&self) -> usize {
        1 + 3 * self.intervals.len()
    }

    /// Flattened `[page, v1, lo1, hi1, ...]` cells; missing values are `null`.
    pub fn to_values(&self) -> Vec<Value> {
        let mut cells = Vec::with_capacity(self.width());
        cells.push(Value::from(self.page.clone()));
        for interval in &self.intervals {
            for v in [interval.value, interval.lower, interval.upper] {
                cells.push(v.map_or(Value::Null, Value::from));
            }
        }
        cells
    }
}

/// Plot rows of one metric plus the browser labels of their intervals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotMatrix {
    pub browsers: Vec<String>,
    pub rows: Vec<PlotRow>,
}

impl PlotMatrix {
    pub fn group_size(&self) -> usize {
        self.browsers.len()
    }
}

/// Reshape ordered rows into one plot row per page group.
///
/// `rows` must be complete page groups of `group_size` rows each. The browser
/// labels are taken from the first group; every other group must list its
/// browsers in the same order.
///
/// # Errors
///
/// Returns [`CompareError::MalformedTable`] if `group_size` is zero, the row
/// count is not a multiple of it, or a chunk mixes pages or browser orders.
///
/// # Example
///
/// ```
/// use report_compare::reshape::reshape;
/// use report_compare::table::Row;
///
/// let ff = Row::new("Home", "Firefox", 30).with_metric("Load", 100.0, 2.0);
/// let ch = Row::new("Home", "Chrome", 30).with_metric("Load", 120.0, 3.0);
/// let matrix = reshape([&ff, &ch], "Load", 2).unwrap();
///
/// assert_eq!(
///     matrix.rows[0].to_values(),
///     serde_json::json!(["Home", 100.0, 98.0, 102.0, 120.0, 117.0, 123.0])
///         .as_array()
///         .unwrap()
///         .clone()
/// );
/// ```
pub fn reshape<'a, I>(rows: I, metric: &str, group_size: usize) -> Result<PlotMatrix>
where
    I: IntoIterator<Item = &'a Row>,
{
    if group_size == 0 {
        return Err(CompareError::malformed("group size must be positive"));
    }

    let rows: Vec<&Row> = rows.into_iter().collect();
    if rows.len() % group_size != 0 {
        return Err(CompareError::malformed(format!(
            "{} rows do not form complete groups of {}",
            rows.len(),
            group_size
        )));
    }

    let mut matrix = PlotMatrix::default();
    if let Some(first) = rows.chunks(group_size).next() {
        matrix.browsers = first.iter().map(|r| r.browser.clone()).collect();
    }

    for chunk in rows.chunks(group_size) {
        let page = &chunk[0].page;
        let mut plot_row = PlotRow {
            page: page.clone(),
            intervals: Vec::with_capacity(group_size),
        };

        for (row, label) in chunk.iter().zip(&matrix.browsers) {
            if &row.page != page {
                return Err(CompareError::malformed(format!(
                    "page group {:?} is interleaved with {:?}",
                    page, row.page
                )));
            }
            if &row.browser != label {
                return Err(CompareError::malformed(format!(
                    "page {:?} lists {:?} where {:?} was expected",
                    page, row.browser, label
                )));
            }
            plot_row.intervals.push(Interval::from_row(row, metric));
        }

        matrix.rows.push(plot_row);
    }

    Ok(matrix)
}
