//! Descriptive statistics over sample slices.

/// Middle value of the samples, averaging the two middle values of an
/// even-length slice. `None` if empty.
///
/// ```
/// use report_compare::stats::descriptive::median;
///
/// assert_eq!(median(&[5.0, 1.0, 3.0]), Some(3.0));
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
/// ```
pub fn median(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        None
    } else {
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }
}

/// Sample standard deviation (n - 1 denominator). `None` below two samples.
pub fn sample_std_dev(samples: &[f64]) -> Option<f64> {
    if samples.len() < 2 {
        return None;
    }
    let mean = mean(samples)?;
    let squared_diffs: f64 = samples.iter().map(|&x| (x - mean).powi(2)).sum();
    Some((squared_diffs / (samples.len() - 1) as f64).sqrt())
}

/// Mean absolute deviation around the mean.
pub fn mean_absolute_deviation(samples: &[f64]) -> Option<f64> {
    let mean = mean(samples)?;
    let total: f64 = samples.iter().map(|&x| (x - mean).abs()).sum();
    Some(total / samples.len() as f64)
}
