//! Summaries of raw iteration samples
//!
//! Turns the per-iteration measurements of one page/browser run into the
//! mean and 95% confidence interval half-width a report row carries.
//!
//! # Example
//!
//! ```
//! use report_compare::stats::summary::{MeasurementSet, SampleSummary};
//!
//! let summary = SampleSummary::from_samples(&[10.0, 12.0, 11.0, 13.0]).unwrap();
//! assert_eq!(summary.mean, 11.5);
//! assert!(summary.ci.unwrap() > 0.0);
//!
//! let mut run = MeasurementSet::new("Home", "Firefox").with_os("Linux");
//! run.extend("Load", [100.0, 102.0, 98.0]);
//! let row = run.summarize();
//! assert_eq!(row.mean("Load"), Some(100.0));
//! assert_eq!(row.iterations, Some(3));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::descriptive::{mean, sample_std_dev};
use super::outliers::OutlierResult;
use super::significance::{t_critical, CONFIDENCE_LEVEL};
use crate::schema::ci_column;
use crate::table::Row;

/// Mean and confidence interval of a sample after outlier rejection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    pub mean: f64,
    /// 95% CI half-width; `None` below two samples
    pub ci: Option<f64>,
    /// Samples left after outlier rejection
    pub count: usize,
    pub outliers_removed: usize,
}

impl SampleSummary {
    /// Summarize samples, rejecting outliers outside `median ± 5 MAD` first.
    ///
    /// Returns `None` for an empty slice or one containing non-finite values.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.iter().any(|v| !v.is_finite()) {
            return None;
        }
        let outliers = OutlierResult::detect(samples)?;
        let clean = outliers.clean_samples(samples);
        Self::from_retained(&clean, outliers.outlier_indices.len())
    }

    /// Summarize samples that were already filtered.
    pub fn from_retained(clean: &[f64], outliers_removed: usize) -> Option<Self> {
        if clean.iter().any(|v| !v.is_finite()) {
            return None;
        }
        let count = clean.len();

        let ci = sample_std_dev(clean).and_then(|sd| {
            let n = u32::try_from(count).ok()?;
            let sem = sd / (count as f64).sqrt();
            Some(sem * t_critical(CONFIDENCE_LEVEL, n)?)
        });

        Some(SampleSummary {
            mean: mean(clean)?,
            ci,
            count,
            outliers_removed,
        })
    }
}

/// Raw measurements of one page/browser run, keyed by metric
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSet {
    pub page: String,
    pub browser: String,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub samples: BTreeMap<String, Vec<f64>>,
}

impl MeasurementSet {
    pub fn new(page: impl Into<String>, browser: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            browser: browser.into(),
            ..Default::default()
        }
    }

    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }

    pub fn push(&mut self, metric: &str, value: f64) {
        self.samples.entry(metric.to_string()).or_default().push(value);
    }

    pub fn extend<I: IntoIterator<Item = f64>>(&mut self, metric: &str, values: I) {
        self.samples
            .entry(metric.to_string())
            .or_default()
            .extend(values);
    }

    /// Largest raw sample count across metrics.
    pub fn iterations(&self) -> usize {
        self.samples.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Indices of the iterations that survive outlier rejection.
    ///
    /// Metrics are visited in name order and each one narrows the surviving
    /// set: the `median ± 5 MAD` fence is computed over the iterations still
    /// kept, and an iteration outside it is dropped for every metric. A run
    /// of one iteration is never filtered.
    pub fn retained_iterations(&self) -> Vec<usize> {
        let total = self.iterations();
        let mut kept: Vec<usize> = (0..total).collect();
        if total <= 1 {
            return kept;
        }

        for samples in self.samples.values() {
            let present: Vec<usize> = kept
                .iter()
                .copied()
                .filter(|&i| i < samples.len())
                .collect();
            let values: Vec<f64> = present.iter().map(|&i| samples[i]).collect();

            let Some(outliers) = OutlierResult::detect(&values) else {
                continue;
            };
            if !outliers.has_outliers() {
                continue;
            }

            let rejected: Vec<usize> = outliers
                .outlier_indices
                .iter()
                .map(|&j| present[j])
                .collect();
            kept.retain(|i| !rejected.contains(i));
        }

        kept
    }

    /// Build a report row holding each metric's mean and CI.
    ///
    /// Every metric is summarized over the same retained iterations.
    /// `iterations` is the largest raw sample count across metrics. Metrics
    /// that cannot be summarized are left out of the row.
    pub fn summarize(&self) -> Row {
        let iterations = u32::try_from(self.iterations()).ok().filter(|&n| n > 0);
        let kept = self.retained_iterations();

        let mut row = Row {
            page: self.page.clone(),
            browser: self.browser.clone(),
            os: self.os.clone(),
            iterations,
            values: BTreeMap::new(),
        };

        for (metric, samples) in &self.samples {
            let clean: Vec<f64> = kept
                .iter()
                .filter_map(|&i| samples.get(i).copied())
                .collect();
            let removed = samples.len() - clean.len();
            if let Some(summary) = SampleSummary::from_retained(&clean, removed) {
                row.values.insert(metric.clone(), summary.mean);
                if let Some(ci) = summary.ci {
                    row.values.insert(ci_column(metric), ci);
                }
            }
        }

        row
    }
}
