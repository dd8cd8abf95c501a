//! Reductions over scalar-or-grouped series.
//!
//! `max` and `upper_max` deliberately differ in how they reduce a group:
//! `max` looks at each group's average (what a plain bar shows) while
//! `upper_max` looks at each group's largest sample so the value axis never
//! clips an outlier. Every series-level reduction is clamped to `>= 0` because
//! bars never extend below the baseline.

use serde::{Deserialize, Serialize};

use crate::core::Sample;

/// Arithmetic mean. `NaN` for an empty slice.
#[must_use]
pub fn avg(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Largest value of a flat slice, clamped to `>= 0`.
#[must_use]
pub fn max_value(values: &[f64]) -> f64 {
    values.iter().copied().fold(0.0, f64::max)
}

/// Smallest entry of a series, groups reduced by their average.
#[must_use]
pub fn min(samples: &[Sample]) -> f64 {
    let mut reduced = samples.iter().map(Sample::mean);
    let Some(first) = reduced.next() else {
        return 0.0;
    };
    reduced.fold(first, f64::min).max(0.0)
}

/// Largest entry of a series, groups reduced by their average.
#[must_use]
pub fn max(samples: &[Sample]) -> f64 {
    samples.iter().map(Sample::mean).fold(0.0, f64::max)
}

/// Largest entry of a series, groups reduced by their largest sample.
#[must_use]
pub fn upper_max(samples: &[Sample]) -> f64 {
    samples.iter().map(Sample::peak).fold(0.0, f64::max)
}

/// Largest stack height of a series drawn as stacked segments.
#[must_use]
pub fn stacked_max(samples: &[Sample]) -> f64 {
    samples.iter().map(Sample::total).fold(0.0, f64::max)
}

/// Sample standard deviation (Bessel-corrected). 0 for fewer than two values.
#[must_use]
pub fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = avg(values);
    let squared: f64 = values.iter().map(|value| (value - mean).powi(2)).sum();
    (squared / (values.len() - 1) as f64).sqrt()
}

/// Standard error of the mean. 0 for fewer than two values.
#[must_use]
pub fn std_error(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    std_dev(values) / (values.len() as f64).sqrt()
}

/// Statistics derived once per data entry when content is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SampleStats {
    pub mean: f64,
    pub std_dev: f64,
    pub std_error: f64,
}

impl SampleStats {
    #[must_use]
    pub fn from_sample(sample: &Sample) -> Self {
        match sample {
            Sample::Scalar(value) => Self {
                mean: *value,
                std_dev: 0.0,
                std_error: 0.0,
            },
            Sample::Group(values) => Self {
                mean: sample.mean(),
                std_dev: std_dev(values),
                std_error: std_error(values),
            },
        }
    }

    /// Top of the error whisker.
    #[must_use]
    pub fn upper_bound(self) -> f64 {
        self.mean + self.std_error
    }
}
