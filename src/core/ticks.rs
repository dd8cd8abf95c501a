use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

const MAX_LABEL_DECIMALS: i32 = 12;

/// Rounds `range` to a "nice" value of the form `{1, 2, 5, 10} * 10^k`.
///
/// With `round` the fraction snaps to the nearest candidate using midpoint
/// thresholds (1.5, 3, 7); without it the fraction snaps up to the smallest
/// candidate that is not below it. Non-finite or non-positive ranges yield 0.
#[must_use]
pub fn nice_number(range: f64, round: bool) -> f64 {
    if !range.is_finite() || range <= 0.0 {
        return 0.0;
    }

    let exponent = range.log10().floor();
    let magnitude = 10f64.powf(exponent);
    let fraction = range / magnitude;

    let nice_fraction = if round {
        if fraction < 1.5 {
            1.0
        } else if fraction < 3.0 {
            2.0
        } else if fraction < 7.0 {
            5.0
        } else {
            10.0
        }
    } else if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice_fraction * magnitude
}

/// Human-readable tick axis covering a value range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTicks {
    pub start: f64,
    pub end: f64,
    pub spacing: f64,
}

impl LinearTicks {
    /// Number of ticks from `start` to `end` inclusive.
    #[must_use]
    pub fn count(self) -> usize {
        (((self.end - self.start) / self.spacing).round() as usize + 1).max(2)
    }

    /// Tick values stepping from `start` to `end` inclusive.
    ///
    /// Values are computed as `start + i * spacing` so accumulated floating
    /// point drift never drops the final tick.
    pub fn values(self) -> impl Iterator<Item = f64> {
        (0..self.count()).map(move |index| self.start + index as f64 * self.spacing)
    }

    /// Tick labels formatted with just enough decimals for `spacing`.
    #[must_use]
    pub fn labels(self) -> Vec<String> {
        self.values()
            .map(|value| format_tick_label(value, self.spacing))
            .collect()
    }
}

/// Generates a nice tick axis for `[min, max]` with at most about
/// `max_tick_count` ticks.
pub fn linear_ticks(min: f64, max: f64, max_tick_count: usize) -> ChartResult<LinearTicks> {
    if !min.is_finite() || !max.is_finite() {
        return Err(ChartError::InvalidData(
            "tick range must be finite".to_owned(),
        ));
    }
    if max <= min {
        return Err(ChartError::InvalidData(
            "tick range max must be > min".to_owned(),
        ));
    }
    if max_tick_count < 2 {
        return Err(ChartError::InvalidData(
            "max tick count must be >= 2".to_owned(),
        ));
    }

    let range = nice_number(max - min, false);
    let spacing = nice_number(range / (max_tick_count - 1) as f64, true);
    if spacing <= 0.0 {
        return Err(ChartError::InvalidData(
            "tick spacing collapsed to zero".to_owned(),
        ));
    }

    let mut start = (min / spacing).floor() * spacing;
    let mut end = (max / spacing).ceil() * spacing;
    if end - start < spacing {
        end = start + spacing;
    }
    if start == -0.0 {
        start = 0.0;
    }

    Ok(LinearTicks {
        start,
        end,
        spacing,
    })
}

/// Formats a tick value with the number of decimals implied by `spacing`.
#[must_use]
pub fn format_tick_label(value: f64, spacing: f64) -> String {
    let decimals = if spacing.is_finite() && spacing > 0.0 {
        (-spacing.log10().floor()).clamp(0.0, f64::from(MAX_LABEL_DECIMALS)) as usize
    } else {
        0
    };

    // Snap near-zero noise so `-0` or `0.000000001` never reach the axis.
    let threshold = if spacing.is_finite() && spacing > 0.0 {
        spacing * 1e-9
    } else {
        f64::EPSILON
    };
    let value = if value.abs() < threshold { 0.0 } else { value };

    format!("{value:.decimals$}")
}
