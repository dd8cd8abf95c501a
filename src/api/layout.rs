//! Space allocation for one draw pass.
//!
//! Regions are carved out of the full surface in a fixed order: top padding,
//! title, left padding, y-axis title, y tick labels, right padding, legend,
//! bottom padding, x-axis title, top labels, category labels. Whatever is left
//! becomes the plot area. All sizes clamp at zero so tiny surfaces degrade to
//! an empty plot rather than an error.

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::content::Content;
use crate::core::{LinearScale, LinearTicks, Rect, SampleStats, Viewport, linear_ticks, stats};
use crate::error::ChartResult;
use crate::render::{Color, TextMetrics};

use super::{BarStyle, ChartOptions, ScaleStyle, TextRole};

/// Block height multiplier for single-line text blocks.
const TEXT_BLOCK_RATIO: f64 = 1.25;
/// Row height multiplier for label rows.
const LABEL_ROW_RATIO: f64 = 1.5;
/// Largest scale maximum whose nice rounding stays finite.
pub const MAX_CHART_VALUE: f64 = f64::MAX / 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelOrientation {
    Horizontal,
    /// Rotated 90 degrees counter-clockwise, reading bottom to top.
    Rotated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendItemLayout {
    pub label: String,
    pub color: Color,
    pub swatch: Rect,
    /// Left edge of the label text, vertically centered on `label_y`.
    pub label_x: f64,
    pub label_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendLayout {
    pub frame: Rect,
    pub rows: usize,
    pub items: Vec<LegendItemLayout>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickLabel {
    /// Tick position in (possibly transformed) value space.
    pub value: f64,
    pub y: f64,
    pub text: String,
}

/// Resolved geometry for one draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartLayout {
    pub viewport: Viewport,
    /// Center x and alphabetic baseline of the title.
    pub title_anchor: Option<(f64, f64)>,
    /// Center x of the rotated y-axis title; it is centered on the plot vertically.
    pub y_axis_title_x: Option<f64>,
    /// Center of the x-axis title.
    pub x_axis_title_anchor: Option<(f64, f64)>,
    /// Center of the top axis title.
    pub top_axis_title_anchor: Option<(f64, f64)>,
    /// Vertical center of the per-bar top labels row.
    pub top_labels_y: Option<f64>,
    pub legend: Option<LegendLayout>,
    pub plot: Rect,
    pub slot_width: f64,
    pub bar_padding: f64,
    pub label_orientation: LabelOrientation,
    pub label_lines: usize,
    /// Right edge used to right-align y tick labels.
    pub tick_label_right: f64,
    pub tick_labels: Vec<TickLabel>,
    pub ticks: LinearTicks,
    pub max_chart_value: f64,
    scale: LinearScale,
}

impl ChartLayout {
    /// Horizontal span `(left, right)` of the bar drawn at `index`.
    #[must_use]
    pub fn bar_span(&self, index: usize) -> (f64, f64) {
        let slot_left = self.plot.x + index as f64 * self.slot_width;
        let left = slot_left + self.bar_padding;
        let right = (slot_left + self.slot_width - 1.0 - self.bar_padding).max(left);
        (left, right)
    }

    /// Center x of the slot at `index`.
    #[must_use]
    pub fn slot_center(&self, index: usize) -> f64 {
        self.plot.x + index as f64 * self.slot_width + self.slot_width / 2.0
    }

    /// Rounded pixel height of a bar reaching `value`.
    #[must_use]
    pub fn bar_height(&self, value: f64) -> f64 {
        self.scale.bar_height(value, self.plot.height)
    }

    /// Surface y coordinate for `value`, clamped to the plot.
    #[must_use]
    pub fn value_to_y(&self, value: f64) -> f64 {
        self.plot.bottom() - self.bar_height(value)
    }
}

/// Largest value the vertical scale has to show, before headroom.
#[must_use]
pub fn peak_chart_value(content: &Content, sample_stats: &[SampleStats], bar_style: BarStyle) -> f64 {
    match bar_style {
        BarStyle::Plain => stats::upper_max(&content.data),
        BarStyle::Stacked => stats::stacked_max(&content.data),
        BarStyle::Error => sample_stats
            .iter()
            .map(|stat| stat.upper_bound())
            .fold(stats::upper_max(&content.data), f64::max),
    }
}

/// Maximum chart value: peak raised to the configured floor, plus headroom.
///
/// Values beyond what the tick engine can round are clamped to
/// [`MAX_CHART_VALUE`]; an empty or all-zero scale falls back to 1.
#[must_use]
pub fn max_chart_value(content: &Content, sample_stats: &[SampleStats], options: &ChartOptions) -> f64 {
    let peak = peak_chart_value(content, sample_stats, options.bar_style).max(options.default_max_tick);
    let value = peak * (1.0 + options.max_value_padding);
    if value.is_nan() || value <= 0.0 {
        return 1.0;
    }
    if value > MAX_CHART_VALUE {
        warn!(
            peak,
            padding = options.max_value_padding,
            clamped_to = MAX_CHART_VALUE,
            "chart maximum exceeds the tick range, clamping"
        );
        return MAX_CHART_VALUE;
    }
    value
}

/// Computes the layout for `content` on a surface of `viewport` size.
pub fn compute_layout<M: TextMetrics + ?Sized>(
    viewport: Viewport,
    content: &Content,
    sample_stats: &[SampleStats],
    options: &ChartOptions,
    metrics: &M,
) -> ChartResult<ChartLayout> {
    let width = f64::from(viewport.width);
    let height = f64::from(viewport.height);
    let pad = options.canvas_padding_px;
    let axis_block = options.font_size_axis * TEXT_BLOCK_RATIO;
    let label_row = options.font_size_labels * LABEL_ROW_RATIO;

    let mut top = 0.0;
    let mut left = 0.0;
    let mut right = width;
    let mut bottom = height;

    top += pad;
    let title_anchor = content.title.as_ref().map(|_| {
        let anchor = (width / 2.0, top + options.font_size_title);
        top += options.font_size_title * TEXT_BLOCK_RATIO;
        anchor
    });

    left += pad;
    let y_axis_title_x = content.y_axis.as_ref().map(|_| {
        let center = left + axis_block / 2.0;
        left += axis_block;
        center
    });

    let max_chart_value = max_chart_value(content, sample_stats, options);
    let tick_count = tick_count_for_height(estimated_plot_height(content, options, height), options);
    let ticks = linear_ticks(0.0, max_chart_value, tick_count)?;
    let tick_texts = format_tick_labels(ticks, options.scale_style);
    let tick_font = options.font(TextRole::Ticks);
    let widest_tick = tick_texts
        .iter()
        .map(|text| metrics.measure_text(text, &tick_font))
        .fold(0.0, f64::max)
        .ceil();
    let tick_label_right = left + widest_tick;
    left += widest_tick + options.tick_padding_px;

    right -= pad;
    let plot_width = (right - left).max(0.0);

    let legend = (!content.legend.is_empty()).then(|| {
        let legend = layout_legend(content, options, metrics, left, top, plot_width);
        top += legend.frame.height + options.legend_padding_px;
        legend
    });

    let slot_width = if content.is_empty() {
        plot_width
    } else {
        plot_width / content.len() as f64
    };
    let bar_padding = (slot_width * options.bar_padding_percent / 2.0).floor();
    let label_font = options.font(TextRole::Labels);
    let widest_label = content
        .labels
        .iter()
        .flat_map(|label| label.lines())
        .map(|line| metrics.measure_text(line, &label_font))
        .fold(0.0, f64::max);
    let label_lines = content
        .labels
        .iter()
        .map(|label| label.line_count())
        .max()
        .unwrap_or(1)
        .max(1);
    let label_orientation = if widest_label <= slot_width - 2.0 * bar_padding {
        LabelOrientation::Horizontal
    } else {
        LabelOrientation::Rotated
    };

    // Rotated labels hang into the bottom padding, which shrinks to the tick gap.
    bottom -= match label_orientation {
        LabelOrientation::Horizontal => pad,
        LabelOrientation::Rotated => pad.min(options.tick_padding_px),
    };

    let x_axis_title_anchor = content.x_axis.as_ref().map(|_| {
        let anchor = (left + plot_width / 2.0, bottom - axis_block / 2.0);
        bottom -= axis_block;
        anchor
    });

    let top_axis_title_anchor = content.top_label.as_ref().map(|_| {
        let anchor = (left + plot_width / 2.0, top + axis_block / 2.0);
        top += axis_block;
        anchor
    });
    let top_labels_y = content.top_labels.iter().any(Option::is_some).then(|| {
        let center = top + label_row / 2.0;
        top += label_row;
        center
    });

    bottom -= match label_orientation {
        LabelOrientation::Horizontal => label_lines as f64 * label_row,
        LabelOrientation::Rotated => widest_label.ceil() + options.tick_padding_px,
    };

    let plot = Rect::new(left, top, plot_width, (bottom - top).max(0.0));
    let scale = LinearScale::new(0.0, ticks.end)?;
    let tick_labels = ticks
        .values()
        .zip(tick_texts)
        .map(|(value, text)| TickLabel {
            value,
            y: plot.bottom() - scale.bar_height(value, plot.height),
            text,
        })
        .collect();

    trace!(
        plot_x = plot.x,
        plot_y = plot.y,
        plot_width = plot.width,
        plot_height = plot.height,
        ?label_orientation,
        max_chart_value,
        tick_spacing = ticks.spacing,
        "computed bar chart layout"
    );

    Ok(ChartLayout {
        viewport,
        title_anchor,
        y_axis_title_x,
        x_axis_title_anchor,
        top_axis_title_anchor,
        top_labels_y,
        legend,
        plot,
        slot_width,
        bar_padding,
        label_orientation,
        label_lines,
        tick_label_right,
        tick_labels,
        ticks,
        max_chart_value,
        scale,
    })
}

/// Plot height before legend and category-label reservations are known.
///
/// The tick count has to be fixed before the tick label column is measured,
/// so it is bounded by this upper estimate of the final plot height.
fn estimated_plot_height(content: &Content, options: &ChartOptions, height: f64) -> f64 {
    let mut reserved = 2.0 * options.canvas_padding_px + options.font_size_labels * LABEL_ROW_RATIO;
    if content.title.is_some() {
        reserved += options.font_size_title * TEXT_BLOCK_RATIO;
    }
    if content.x_axis.is_some() {
        reserved += options.font_size_axis * TEXT_BLOCK_RATIO;
    }
    (height - reserved).max(0.0)
}

fn tick_count_for_height(plot_height: f64, options: &ChartOptions) -> usize {
    let per_tick = options.font_size_ticks * LABEL_ROW_RATIO;
    let fitting = (plot_height / per_tick).floor() as usize;
    fitting.clamp(2, options.max_tick_count.max(2))
}

fn format_tick_labels(ticks: LinearTicks, scale_style: ScaleStyle) -> Vec<String> {
    match scale_style {
        ScaleStyle::Linear => ticks.labels(),
        ScaleStyle::Log2 => {
            let precision = if ticks.spacing >= 1.0 { 1.0 } else { 0.01 };
            ticks
                .values()
                .map(|tick| crate::core::format_tick_label(scale_style.tick_value(tick), precision))
                .collect()
        }
    }
}

fn layout_legend<M: TextMetrics + ?Sized>(
    content: &Content,
    options: &ChartOptions,
    metrics: &M,
    left: f64,
    top: f64,
    available_width: f64,
) -> LegendLayout {
    let padding = options.legend_padding_px;
    let swatch = options.legend_swatch_px;
    let row_height = options.font_size_legend.max(swatch) * LABEL_ROW_RATIO;
    let inner_width = (available_width - 2.0 * padding).max(0.0);
    let font = options.font(TextRole::Legend);

    let mut items = Vec::with_capacity(content.legend.len());
    let mut row = 0usize;
    let mut cursor = 0.0;
    for entry in &content.legend {
        let item_width = swatch + padding / 2.0 + metrics.measure_text(&entry.label, &font);
        if cursor > 0.0 && cursor + item_width > inner_width {
            row += 1;
            cursor = 0.0;
        }

        let row_top = top + padding + row as f64 * row_height;
        let swatch_rect = Rect::new(
            left + padding + cursor,
            row_top + (row_height - swatch) / 2.0,
            swatch,
            swatch,
        );
        items.push(LegendItemLayout {
            label: entry.label.clone(),
            color: entry.color,
            swatch: swatch_rect,
            label_x: swatch_rect.right() + padding / 2.0,
            label_y: row_top + row_height / 2.0,
        });
        cursor += item_width + 2.0 * padding;
    }

    let rows = row + 1;
    LegendLayout {
        frame: Rect::new(
            left,
            top,
            available_width,
            rows as f64 * row_height + 2.0 * padding,
        ),
        rows,
        items,
    }
}
