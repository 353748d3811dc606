//! Outlier rejection for raw iteration samples.
//!
//! Samples are kept when they fall inside `median ± k * MAD`, where MAD is the
//! mean absolute deviation. Standard deviation is not used for the fence since
//! it is itself inflated by the outliers being looked for.

use super::descriptive::{mean_absolute_deviation, median};

/// Fence width in MADs.
pub const DEFAULT_MAD_MULTIPLIER: f64 = 5.0;

/// Result of median/MAD outlier detection
#[derive(Debug, Clone)]
pub struct OutlierResult {
    /// Indices of detected outliers in the original sample array
    pub outlier_indices: Vec<usize>,
    pub lower_fence: f64,
    pub upper_fence: f64,
    pub median: f64,
    pub mad: f64,
}

impl OutlierResult {
    /// Detect outliers with the default fence width.
    ///
    /// # Examples
    ///
    /// ```
    /// use report_compare::stats::outliers::OutlierResult;
    ///
    /// let mut data = vec![10.0; 20];
    /// data.push(500.0);
    /// let result = OutlierResult::detect(&data).unwrap();
    /// assert_eq!(result.outlier_indices, vec![20]);
    /// ```
    pub fn detect(samples: &[f64]) -> Option<Self> {
        Self::detect_with(samples, DEFAULT_MAD_MULTIPLIER)
    }

    /// Detect outliers outside `median ± multiplier * MAD`.
    ///
    /// Returns `None` for an empty slice. A single sample is never an outlier.
    pub fn detect_with(samples: &[f64], multiplier: f64) -> Option<Self> {
        let median = median(samples)?;

        if samples.len() < 2 {
            return Some(OutlierResult {
                outlier_indices: Vec::new(),
                lower_fence: f64::NEG_INFINITY,
                upper_fence: f64::INFINITY,
                median,
                mad: 0.0,
            });
        }

        let mad = mean_absolute_deviation(samples)?;
        let lower_fence = median - mad * multiplier;
        let upper_fence = median + mad * multiplier;

        let outlier_indices = samples
            .iter()
            .enumerate()
            .filter(|(_, &value)| value < lower_fence || value > upper_fence)
            .map(|(i, _)| i)
            .collect();

        Some(OutlierResult {
            outlier_indices,
            lower_fence,
            upper_fence,
            median,
            mad,
        })
    }

    /// Samples with outliers removed, original order preserved.
    pub fn clean_samples(&self, samples: &[f64]) -> Vec<f64> {
        samples
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.outlier_indices.contains(i))
            .map(|(_, &value)| value)
            .collect()
    }

    pub fn has_outliers(&self) -> bool {
        !self.outlier_indices.is_empty()
    }
}
