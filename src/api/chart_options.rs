use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ChartError, ChartResult};
use crate::render::{Color, Font, FontWeight};

/// Value transform applied to every sample when content is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleStyle {
    #[default]
    Linear,
    Log2,
}

impl ScaleStyle {
    /// Transforms one raw sample. `log2` results that are not finite clamp to 0.
    #[must_use]
    pub fn transform(self, value: f64) -> f64 {
        match self {
            Self::Linear => value,
            Self::Log2 => {
                let transformed = value.log2();
                if transformed.is_finite() {
                    transformed
                } else {
                    0.0
                }
            }
        }
    }

    /// Maps a tick position back to the value it labels.
    #[must_use]
    pub fn tick_value(self, tick: f64) -> f64 {
        match self {
            Self::Linear => tick,
            Self::Log2 => tick.exp2(),
        }
    }
}

/// How a grouped data entry is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarStyle {
    /// One bar showing the group mean.
    #[default]
    #[serde(rename = "none")]
    Plain,
    /// Segments stacked to the group sum.
    Stacked,
    /// Mean bar with standard-error whiskers.
    Error,
}

/// Text roles with their own configured font size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Title,
    Axis,
    Ticks,
    Labels,
    DataTags,
    Legend,
    Hint,
}

/// Immutable rendering configuration, merged once when the engine is built.
///
/// Serialized keys are camelCase. Deserializing a partial object keeps the
/// defaults for every missing key and ignores keys it does not recognize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartOptions {
    pub font_family: String,
    pub font_weight: FontWeight,
    pub font_size_title: f64,
    pub font_size_axis: f64,
    pub font_size_ticks: f64,
    pub font_size_labels: f64,
    pub font_size_data_tags: f64,
    pub font_size_legend: f64,
    pub font_size_hint: f64,
    pub canvas_padding_px: f64,
    pub tick_padding_px: f64,
    pub bar_padding_percent: f64,
    pub max_value_padding: f64,
    pub max_tick_count: usize,
    pub background_color: Option<Color>,
    pub text_color: Color,
    pub axis_color: Color,
    pub grid_color: Color,
    pub bar_fill_color: Color,
    pub bar_stroke_color: Color,
    pub scale_style: ScaleStyle,
    pub bar_style: BarStyle,
    pub stacked_min_gap_px: f64,
    pub default_max_tick: f64,
    pub legend_swatch_px: f64,
    pub legend_swatch_stroke_color: Color,
    pub legend_padding_px: f64,
    pub hint_background_color: Color,
    pub hint_border_color: Color,
    pub hint_padding_px: f64,
    pub hint_offset_px: f64,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            font_family: "Helvetica".to_owned(),
            font_weight: FontWeight::Normal,
            font_size_title: 24.0,
            font_size_axis: 20.0,
            font_size_ticks: 18.0,
            font_size_labels: 18.0,
            font_size_data_tags: 14.0,
            font_size_legend: 16.0,
            font_size_hint: 14.0,
            canvas_padding_px: 20.0,
            tick_padding_px: 6.0,
            bar_padding_percent: 0.10,
            max_value_padding: 0.10,
            max_tick_count: 10,
            background_color: Some(Color::rgb8(220, 220, 220)),
            text_color: Color::BLACK,
            axis_color: Color::BLACK,
            grid_color: Color::rgba(0.0, 0.0, 0.0, 0.15),
            bar_fill_color: Color::rgb8(180, 180, 180),
            bar_stroke_color: Color::BLACK,
            scale_style: ScaleStyle::Linear,
            bar_style: BarStyle::Plain,
            stacked_min_gap_px: 3.0,
            default_max_tick: 1.0,
            legend_swatch_px: 12.0,
            legend_swatch_stroke_color: Color::BLACK,
            legend_padding_px: 8.0,
            hint_background_color: Color::rgba(1.0, 1.0, 1.0, 0.95),
            hint_border_color: Color::BLACK,
            hint_padding_px: 6.0,
            hint_offset_px: 8.0,
        }
    }
}

impl ChartOptions {
    /// Overlays a caller-supplied partial configuration onto the defaults.
    pub fn from_partial_json(value: &Value) -> ChartResult<Self> {
        if !value.is_object() {
            return Err(ChartError::InvalidData(
                "chart options must be a JSON object".to_owned(),
            ));
        }
        let options = Self::deserialize(value)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse chart options: {e}")))?;
        options.validate()?;
        Ok(options)
    }

    #[must_use]
    pub fn with_bar_style(mut self, bar_style: BarStyle) -> Self {
        self.bar_style = bar_style;
        self
    }

    #[must_use]
    pub fn with_scale_style(mut self, scale_style: ScaleStyle) -> Self {
        self.scale_style = scale_style;
        self
    }

    #[must_use]
    pub fn with_background_color(mut self, background_color: Option<Color>) -> Self {
        self.background_color = background_color;
        self
    }

    #[must_use]
    pub fn with_stacked_min_gap_px(mut self, stacked_min_gap_px: f64) -> Self {
        self.stacked_min_gap_px = stacked_min_gap_px;
        self
    }

    #[must_use]
    pub fn with_max_value_padding(mut self, max_value_padding: f64) -> Self {
        self.max_value_padding = max_value_padding;
        self
    }

    #[must_use]
    pub fn font_size(&self, role: TextRole) -> f64 {
        match role {
            TextRole::Title => self.font_size_title,
            TextRole::Axis => self.font_size_axis,
            TextRole::Ticks => self.font_size_ticks,
            TextRole::Labels => self.font_size_labels,
            TextRole::DataTags => self.font_size_data_tags,
            TextRole::Legend => self.font_size_legend,
            TextRole::Hint => self.font_size_hint,
        }
    }

    #[must_use]
    pub fn font(&self, role: TextRole) -> Font {
        Font::new(self.font_family.clone(), self.font_size(role), self.font_weight)
    }

    pub fn validate(&self) -> ChartResult<()> {
        for (name, size) in [
            ("fontSizeTitle", self.font_size_title),
            ("fontSizeAxis", self.font_size_axis),
            ("fontSizeTicks", self.font_size_ticks),
            ("fontSizeLabels", self.font_size_labels),
            ("fontSizeDataTags", self.font_size_data_tags),
            ("fontSizeLegend", self.font_size_legend),
            ("fontSizeHint", self.font_size_hint),
            ("legendSwatchPx", self.legend_swatch_px),
        ] {
            if !size.is_finite() || size <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "`{name}` must be finite and > 0"
                )));
            }
        }

        for (name, value) in [
            ("canvasPaddingPx", self.canvas_padding_px),
            ("tickPaddingPx", self.tick_padding_px),
            ("maxValuePadding", self.max_value_padding),
            ("stackedMinGapPx", self.stacked_min_gap_px),
            ("defaultMaxTick", self.default_max_tick),
            ("legendPaddingPx", self.legend_padding_px),
            ("hintPaddingPx", self.hint_padding_px),
            ("hintOffsetPx", self.hint_offset_px),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "`{name}` must be finite and >= 0"
                )));
            }
        }

        if !self.bar_padding_percent.is_finite() || !(0.0..1.0).contains(&self.bar_padding_percent)
        {
            return Err(ChartError::InvalidData(
                "`barPaddingPercent` must be in [0, 1)".to_owned(),
            ));
        }
        if self.max_tick_count < 2 {
            return Err(ChartError::InvalidData(
                "`maxTickCount` must be >= 2".to_owned(),
            ));
        }
        if self.font_family.trim().is_empty() {
            return Err(ChartError::InvalidData(
                "`fontFamily` must not be empty".to_owned(),
            ));
        }

        if let Some(background) = self.background_color {
            background.validate()?;
        }
        for color in [
            self.text_color,
            self.axis_color,
            self.grid_color,
            self.bar_fill_color,
            self.bar_stroke_color,
            self.legend_swatch_stroke_color,
            self.hint_background_color,
            self.hint_border_color,
        ] {
            color.validate()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{BarStyle, ChartOptions, ScaleStyle, TextRole};
    use crate::render::Color;

    #[test]
    fn partial_json_overrides_known_keys_and_ignores_unknown() {
        let options = ChartOptions::from_partial_json(&json!({
            "barStyle": "stacked",
            "scaleStyle": "log2",
            "fontSizeTitle": 30,
            "barFillColor": "rgb(255, 0, 0)",
            "somethingElse": { "nested": true }
        }))
        .expect("options");

        assert_eq!(options.bar_style, BarStyle::Stacked);
        assert_eq!(options.scale_style, ScaleStyle::Log2);
        assert_eq!(options.font_size(TextRole::Title), 30.0);
        assert_eq!(options.bar_fill_color, Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(options.font_size_axis, ChartOptions::default().font_size_axis);
    }

    #[test]
    fn bar_style_none_maps_to_plain() {
        let options = ChartOptions::from_partial_json(&json!({ "barStyle": "none" })).expect("options");
        assert_eq!(options.bar_style, BarStyle::Plain);
    }

    #[test]
    fn null_background_disables_fill() {
        let options =
            ChartOptions::from_partial_json(&json!({ "backgroundColor": null })).expect("options");
        assert_eq!(options.background_color, None);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(ChartOptions::from_partial_json(&json!([])).is_err());
        assert!(ChartOptions::from_partial_json(&json!({ "fontSizeTicks": 0 })).is_err());
        assert!(ChartOptions::from_partial_json(&json!({ "barPaddingPercent": 1.0 })).is_err());
        assert!(ChartOptions::from_partial_json(&json!({ "maxTickCount": 1 })).is_err());
        assert!(ChartOptions::from_partial_json(&json!({ "barStyle": "pie" })).is_err());
    }

    #[test]
    fn log2_transform_clamps_non_finite_results() {
        assert_eq!(ScaleStyle::Log2.transform(8.0), 3.0);
        assert_eq!(ScaleStyle::Log2.transform(0.0), 0.0);
        assert_eq!(ScaleStyle::Log2.transform(-2.0), 0.0);
        assert_eq!(ScaleStyle::Log2.tick_value(3.0), 8.0);
        assert_eq!(ScaleStyle::Linear.transform(-2.0), -2.0);
    }
}
