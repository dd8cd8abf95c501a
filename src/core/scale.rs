use crate::error::{ChartError, ChartResult};

/// Linear mapping between a value domain and a pixel extent.
///
/// Bars grow from `domain_start`, so `domain_to_pixel` returns the distance in
/// pixels from the baseline rather than an absolute surface coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    pub fn domain_to_pixel(self, value: f64, extent_px: f64) -> ChartResult<f64> {
        if !extent_px.is_finite() || extent_px < 0.0 {
            return Err(ChartError::InvalidData(
                "scale extent must be finite and >= 0".to_owned(),
            ));
        }
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        let normalized = (value - self.domain_start) / span;
        Ok(normalized * extent_px)
    }

    /// Rounded bar height for `value`, clamped to `[0, extent_px]`.
    ///
    /// Non-finite values collapse to an empty bar.
    #[must_use]
    pub fn bar_height(self, value: f64, extent_px: f64) -> f64 {
        match self.domain_to_pixel(value, extent_px) {
            Ok(pixel) => pixel.round().clamp(0.0, extent_px.max(0.0)),
            Err(_) => 0.0,
        }
    }
}
