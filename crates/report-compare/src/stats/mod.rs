//! Statistical analysis of benchmark reports
//!
//! - [`significance`]: baseline-relative t-test scores from means and CIs
//! - [`summary`]: mean + CI from raw iteration samples
//! - [`outliers`]: median/MAD outlier rejection
//! - [`descriptive`]: median, mean and deviation helpers
//!
//! # Examples
//!
//! ```
//! use report_compare::stats::{std_from_ci, SampleSummary, SD_FLOOR};
//!
//! let summary = SampleSummary::from_samples(&[10.0, 11.0, 10.5, 11.5]).unwrap();
//! let sd = std_from_ci(summary.ci.unwrap(), summary.count as u32).unwrap();
//! assert!(sd > SD_FLOOR);
//! ```

pub mod descriptive;
pub mod outliers;
pub mod significance;
pub mod summary;

pub use outliers::OutlierResult;
pub use significance::{
    compute_significance, group_significance, std_from_ci, t_critical, t_test, Direction,
    Significance, SignificanceScores, SD_FLOOR,
};
pub use summary::{MeasurementSet, SampleSummary};
