//! JSON reporter for comparison views
//!
//! Besides the view itself, each metric gets a chart data table: a string
//! `Browser` column followed by a value column and two interval columns per
//! browser, with one row per displayed page group.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pipeline::{ComparisonView, MetricChart};

/// Column descriptor of a chart data table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataColumn {
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl DataColumn {
    fn string(label: &str) -> Self {
        Self {
            kind: "string".to_string(),
            label: label.to_string(),
            role: None,
        }
    }

    fn number(label: &str) -> Self {
        Self {
            kind: "number".to_string(),
            label: label.to_string(),
            role: None,
        }
    }

    fn interval() -> Self {
        Self {
            kind: "number".to_string(),
            label: String::new(),
            role: Some("interval".to_string()),
        }
    }
}

/// Chart-ready table of one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub metric: String,
    pub cols: Vec<DataColumn>,
    pub rows: Vec<Vec<Value>>,
}

impl ChartData {
    pub fn from_chart(chart: &MetricChart) -> Self {
        let mut cols = vec![DataColumn::string("Browser")];
        for browser in &chart.matrix.browsers {
            cols.push(DataColumn::number(browser));
            cols.push(DataColumn::interval());
            cols.push(DataColumn::interval());
        }

        Self {
            metric: chart.metric.clone(),
            cols,
            rows: chart.matrix.rows.iter().map(|r| r.to_values()).collect(),
        }
    }
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    #[serde(flatten)]
    view: &'a ComparisonView,
    data_tables: Vec<ChartData>,
}

/// JSON format reporter
pub struct JsonReporter;

impl JsonReporter {
    /// Format a comparison view and its chart data tables as JSON
    pub fn format(view: &ComparisonView, pretty: bool) -> Result<String> {
        let document = JsonDocument {
            view,
            data_tables: view.charts.iter().map(ChartData::from_chart).collect(),
        };
        let output = if pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(output)
    }
}
