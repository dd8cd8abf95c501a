use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::stats;

/// Inline capacity for grouped samples; most grouped bars hold a handful of
/// repeats or stack segments.
pub type SampleGroup = SmallVec<[f64; 4]>;

/// One data entry: a single value or a group of repeated samples/stack segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sample {
    Scalar(f64),
    Group(SampleGroup),
}

impl Sample {
    #[must_use]
    pub fn group(values: impl IntoIterator<Item = f64>) -> Self {
        Self::Group(values.into_iter().collect())
    }

    /// Flat view over the contained values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        match self {
            Self::Scalar(value) => std::slice::from_ref(value),
            Self::Group(values) => values,
        }
    }

    /// Value shown by a plain bar: the scalar, or the group average.
    ///
    /// An empty group reduces to 0.
    #[must_use]
    pub fn mean(&self) -> f64 {
        match self {
            Self::Scalar(value) => *value,
            Self::Group(values) if values.is_empty() => 0.0,
            Self::Group(values) => stats::avg(values),
        }
    }

    /// Largest contained value, used to keep outliers inside the scale.
    #[must_use]
    pub fn peak(&self) -> f64 {
        match self {
            Self::Scalar(value) => *value,
            Self::Group(values) => stats::max_value(values),
        }
    }

    /// Height of the full stack when the entry is drawn as stacked segments.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.values().iter().sum()
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.values().iter().all(|value| value.is_finite())
    }

    /// Applies `transform` to every contained value in place.
    pub fn map_in_place(&mut self, transform: impl Fn(f64) -> f64) {
        match self {
            Self::Scalar(value) => *value = transform(*value),
            Self::Group(values) => {
                for value in values.iter_mut() {
                    *value = transform(*value);
                }
            }
        }
    }
}

impl From<f64> for Sample {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl From<Vec<f64>> for Sample {
    fn from(values: Vec<f64>) -> Self {
        Self::Group(SampleGroup::from_vec(values))
    }
}
