use std::f64::consts::FRAC_PI_2;

use crate::content::{BarText, Content};
use crate::core::{Rect, Sample, SampleStats};
use crate::error::ChartResult;
use crate::render::{Color, DrawingSurface, TextBaseline, TextHAlign, TextStyle};

use super::hit_test::{HintBoxSize, place_hint_box, refresh_hint};
use super::{BarStyle, ChartLayout, ChartOptions, Hint, HitRegion, LabelOrientation, TextRole};

const LINE_WIDTH: f64 = 1.0;
const LINE_HEIGHT_RATIO: f64 = 1.25;
const LABEL_ROW_RATIO: f64 = 1.5;

/// Draws one full chart pass and returns the hit regions it registered.
///
/// `hint` is reconciled against the fresh regions before the hint box is
/// drawn, so a stale hint never outlives the bar it pointed at.
pub(super) fn render_chart<S: DrawingSurface + ?Sized>(
    surface: &mut S,
    layout: &ChartLayout,
    content: &Content,
    stats: &[SampleStats],
    options: &ChartOptions,
    hint: &mut Option<Hint>,
) -> ChartResult<Vec<HitRegion>> {
    let mut painter = Painter {
        surface,
        layout,
        content,
        stats,
        options,
        regions: Vec::new(),
    };

    painter.background()?;
    painter.title()?;
    painter.legend()?;
    painter.axis_titles()?;
    painter.top_labels()?;
    painter.category_labels()?;
    painter.plot_border()?;
    painter.y_axis_title()?;
    painter.ticks()?;
    for index in 0..content.len() {
        painter.bar(index)?;
    }

    refresh_hint(hint, &painter.regions);
    if let Some(active) = hint.as_ref() {
        painter.hint_box(active)?;
    }

    Ok(painter.regions)
}

struct Painter<'a, S: DrawingSurface + ?Sized> {
    surface: &'a mut S,
    layout: &'a ChartLayout,
    content: &'a Content,
    stats: &'a [SampleStats],
    options: &'a ChartOptions,
    regions: Vec<HitRegion>,
}

impl<S: DrawingSurface + ?Sized> Painter<'_, S> {
    fn style(&self, role: TextRole, h_align: TextHAlign, baseline: TextBaseline) -> TextStyle {
        TextStyle::new(self.options.font(role), self.options.text_color)
            .aligned(h_align)
            .with_baseline(baseline)
    }

    fn text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> ChartResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.surface.fill_text(text, x, y, style)
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Color) -> ChartResult<()> {
        self.surface.begin_path();
        self.surface.move_to(from.0, from.1);
        self.surface.line_to(to.0, to.1);
        self.surface.stroke_path(color, LINE_WIDTH)
    }

    fn background(&mut self) -> ChartResult<()> {
        let bounds = self.layout.viewport.bounds();
        self.surface.clear_rect(bounds)?;
        if let Some(color) = self.options.background_color {
            self.surface.fill_rect(bounds, color)?;
        }
        Ok(())
    }

    fn title(&mut self) -> ChartResult<()> {
        let content = self.content;
        let (Some(title), Some((x, y))) = (content.title.as_deref(), self.layout.title_anchor)
        else {
            return Ok(());
        };
        let style = self.style(TextRole::Title, TextHAlign::Center, TextBaseline::Alphabetic);
        self.text(title, x, y, &style)
    }

    fn legend(&mut self) -> ChartResult<()> {
        let layout = self.layout;
        let Some(legend) = layout.legend.as_ref() else {
            return Ok(());
        };
        self.surface
            .stroke_rect(legend.frame, self.options.axis_color, LINE_WIDTH)?;

        let style = self.style(TextRole::Legend, TextHAlign::Left, TextBaseline::Middle);
        for item in &legend.items {
            self.surface.fill_rect(item.swatch, item.color)?;
            self.surface.stroke_rect(
                item.swatch,
                self.options.legend_swatch_stroke_color,
                LINE_WIDTH,
            )?;
            self.text(&item.label, item.label_x, item.label_y, &style)?;
        }
        Ok(())
    }

    fn axis_titles(&mut self) -> ChartResult<()> {
        let content = self.content;
        let style = self.style(TextRole::Axis, TextHAlign::Center, TextBaseline::Middle);
        if let (Some(text), Some((x, y))) =
            (content.x_axis.as_deref(), self.layout.x_axis_title_anchor)
        {
            self.text(text, x, y, &style)?;
        }
        if let (Some(text), Some((x, y))) =
            (content.top_label.as_deref(), self.layout.top_axis_title_anchor)
        {
            self.text(text, x, y, &style)?;
        }
        Ok(())
    }

    fn top_labels(&mut self) -> ChartResult<()> {
        let Some(y) = self.layout.top_labels_y else {
            return Ok(());
        };
        let content = self.content;
        let style = self.style(TextRole::Labels, TextHAlign::Center, TextBaseline::Middle);
        for index in 0..content.len() {
            if let Some(text) = content.top_label_at(index) {
                self.text(text, self.layout.slot_center(index), y, &style)?;
            }
        }
        Ok(())
    }

    fn category_labels(&mut self) -> ChartResult<()> {
        let row = self.options.font_size_labels * LABEL_ROW_RATIO;
        let line_gap = self.options.font_size_labels * LINE_HEIGHT_RATIO;
        let plot_bottom = self.layout.plot.bottom();
        let content = self.content;

        match self.layout.label_orientation {
            LabelOrientation::Horizontal => {
                let style = self.style(TextRole::Labels, TextHAlign::Center, TextBaseline::Middle);
                for (index, label) in content.labels.iter().enumerate() {
                    let x = self.layout.slot_center(index);
                    for (line_index, line) in label.lines().into_iter().enumerate() {
                        let y = plot_bottom + (line_index as f64 + 0.5) * row;
                        self.text(line, x, y, &style)?;
                    }
                }
            }
            LabelOrientation::Rotated => {
                let style = self.style(TextRole::Labels, TextHAlign::Right, TextBaseline::Middle);
                for (index, label) in content.labels.iter().enumerate() {
                    let lines = label.lines();
                    let spread = (lines.len().saturating_sub(1)) as f64 / 2.0;
                    self.surface.save();
                    self.surface.translate(
                        self.layout.slot_center(index),
                        plot_bottom + self.options.tick_padding_px,
                    );
                    self.surface.rotate(-FRAC_PI_2);
                    let drawn = lines.into_iter().enumerate().try_for_each(|(line_index, line)| {
                        let offset = (line_index as f64 - spread) * line_gap;
                        self.text(line, 0.0, offset, &style)
                    });
                    self.surface.restore();
                    drawn?;
                }
            }
        }
        Ok(())
    }

    fn plot_border(&mut self) -> ChartResult<()> {
        let plot = self.layout.plot;
        self.surface.begin_path();
        self.surface.move_to(plot.x, plot.y);
        self.surface.line_to(plot.x, plot.bottom());
        self.surface.line_to(plot.right(), plot.bottom());
        self.surface.stroke_path(self.options.axis_color, LINE_WIDTH)
    }

    fn y_axis_title(&mut self) -> ChartResult<()> {
        let content = self.content;
        let (Some(text), Some(x)) = (content.y_axis.as_deref(), self.layout.y_axis_title_x)
        else {
            return Ok(());
        };
        let style = self.style(TextRole::Axis, TextHAlign::Center, TextBaseline::Middle);
        self.surface.save();
        self.surface.translate(x, self.layout.plot.center_y());
        self.surface.rotate(-FRAC_PI_2);
        let drawn = self.text(text, 0.0, 0.0, &style);
        self.surface.restore();
        drawn
    }

    fn ticks(&mut self) -> ChartResult<()> {
        let layout = self.layout;
        let plot = layout.plot;
        let style = self.style(TextRole::Ticks, TextHAlign::Right, TextBaseline::Middle);
        for tick in &layout.tick_labels {
            self.line((plot.x, tick.y), (plot.right(), tick.y), self.options.grid_color)?;
            self.text(&tick.text, layout.tick_label_right, tick.y, &style)?;
        }
        Ok(())
    }

    fn fill_color(&self, index: usize, segment: Option<usize>) -> Color {
        self.content
            .fill_color
            .as_ref()
            .and_then(|spec| spec.resolve(index, segment))
            .unwrap_or(self.options.bar_fill_color)
    }

    fn stroke_color(&self, index: usize, segment: Option<usize>) -> Color {
        self.content
            .stroke_color
            .as_ref()
            .and_then(|spec| spec.resolve(index, segment))
            .unwrap_or(self.options.bar_stroke_color)
    }

    fn bar_rect(&mut self, rect: Rect, fill: Color, stroke: Color) -> ChartResult<()> {
        self.surface.begin_path();
        self.surface.move_to(rect.x, rect.bottom());
        self.surface.line_to(rect.x, rect.y);
        self.surface.line_to(rect.right(), rect.y);
        self.surface.line_to(rect.right(), rect.bottom());
        self.surface.close_path();
        self.surface.fill_path(fill)?;
        self.surface.stroke_path(stroke, LINE_WIDTH)
    }

    fn bar(&mut self, index: usize) -> ChartResult<()> {
        let content = self.content;
        let top = match (&content.data[index], self.options.bar_style) {
            (Sample::Group(values), BarStyle::Stacked) => self.stacked_bar(index, values)?,
            (Sample::Group(values), BarStyle::Error) if values.len() >= 2 => {
                let bar_top = self.plain_bar(index)?;
                let whisker_top = self.error_whisker(index)?;
                bar_top.min(whisker_top)
            }
            _ => self.plain_bar(index)?,
        };

        if let Some(tooltip) = content.bar_tooltip(index) {
            let style = self.style(TextRole::DataTags, TextHAlign::Center, TextBaseline::Bottom);
            let y = (top - self.options.tick_padding_px / 2.0).max(0.0);
            self.text(tooltip, self.layout.slot_center(index), y, &style)?;
        }
        Ok(())
    }

    fn plain_bar(&mut self, index: usize) -> ChartResult<f64> {
        let content = self.content;
        let value = self
            .stats
            .get(index)
            .map_or_else(|| content.data[index].mean(), |stat| stat.mean);
        let bottom = self.layout.plot.bottom();
        let height = self.layout.bar_height(value);
        if height <= 0.0 {
            return Ok(bottom);
        }

        let (left, right) = self.layout.bar_span(index);
        let rect = Rect::from_corners(left, bottom - height, right, bottom);
        self.bar_rect(rect, self.fill_color(index, None), self.stroke_color(index, None))?;

        if let Some(text) = content.hint(index).and_then(BarText::for_bar) {
            self.regions.push(HitRegion::new(index, None, rect, &text));
        }
        if let Some(tag) = content.data_tag(index).and_then(BarText::for_bar) {
            let tag_font = self.options.font_size_data_tags;
            if height >= tag_font * 1.5 {
                let style = self.style(TextRole::DataTags, TextHAlign::Center, TextBaseline::Middle);
                let tag = tag.replace('\n', " ");
                self.text(&tag, rect.center_x(), rect.y + tag_font * 0.75, &style)?;
            }
        }
        Ok(rect.y)
    }

    /// Accumulates segments bottom-up; a segment adding less than the minimum
    /// gap is merged into the next one instead of drawn as a sliver.
    fn stacked_bar(&mut self, index: usize, values: &[f64]) -> ChartResult<f64> {
        let content = self.content;
        let bottom = self.layout.plot.bottom();
        let (left, right) = self.layout.bar_span(index);
        let last = values.len().saturating_sub(1);
        let tag_font = self.options.font_size_data_tags;

        let mut cumulative = 0.0;
        let mut drawn_height = 0.0;
        for (segment, value) in values.iter().enumerate() {
            cumulative += value;
            let height = self.layout.bar_height(cumulative);
            let added = height - drawn_height;
            if segment != last && added < self.options.stacked_min_gap_px {
                continue;
            }
            if added <= 0.0 {
                continue;
            }

            let rect = Rect::from_corners(left, bottom - height, right, bottom - drawn_height);
            self.bar_rect(
                rect,
                self.fill_color(index, Some(segment)),
                self.stroke_color(index, Some(segment)),
            )?;

            if let Some(text) = content.hint(index).and_then(|hint| hint.for_segment(segment)) {
                self.regions.push(HitRegion::new(index, Some(segment), rect, text));
            }
            if let Some(tag) = content.data_tag(index).and_then(|tag| tag.for_segment(segment)) {
                if added >= tag_font * LINE_HEIGHT_RATIO {
                    let style =
                        self.style(TextRole::DataTags, TextHAlign::Center, TextBaseline::Middle);
                    self.text(tag, rect.center_x(), rect.center_y(), &style)?;
                }
            }
            drawn_height = height;
        }

        Ok(bottom - drawn_height)
    }

    fn error_whisker(&mut self, index: usize) -> ChartResult<f64> {
        let Some(stat) = self.stats.get(index).copied() else {
            return Ok(self.layout.plot.bottom());
        };
        let (left, right) = self.layout.bar_span(index);
        let center = (left + right) / 2.0;
        let cap = (right - left) / 4.0;
        let high = self.layout.value_to_y(stat.mean + stat.std_error);
        let low = self.layout.value_to_y(stat.mean - stat.std_error);
        let stroke = self.stroke_color(index, None);

        self.surface.begin_path();
        self.surface.move_to(center, low);
        self.surface.line_to(center, high);
        self.surface.move_to(center - cap, high);
        self.surface.line_to(center + cap, high);
        self.surface.move_to(center - cap, low);
        self.surface.line_to(center + cap, low);
        self.surface.stroke_path(stroke, LINE_WIDTH)?;
        Ok(high)
    }

    fn hint_box(&mut self, hint: &Hint) -> ChartResult<()> {
        if hint.lines.is_empty() {
            return Ok(());
        }
        let font = self.options.font(TextRole::Hint);
        let padding = self.options.hint_padding_px;
        let line_height = font.size_px * LINE_HEIGHT_RATIO;
        let widest = hint
            .lines
            .iter()
            .map(|line| self.surface.measure_text(line, &font))
            .fold(0.0, f64::max);
        let size = HintBoxSize {
            width: widest + 2.0 * padding,
            height: hint.lines.len() as f64 * line_height + 2.0 * padding,
        };
        let frame = place_hint_box(
            hint.region,
            size,
            self.options.hint_offset_px,
            self.layout.viewport,
        );

        self.surface
            .fill_rect(frame, self.options.hint_background_color)?;
        self.surface
            .stroke_rect(frame, self.options.hint_border_color, LINE_WIDTH)?;
        let style = self.style(TextRole::Hint, TextHAlign::Left, TextBaseline::Middle);
        for (line_index, line) in hint.lines.iter().enumerate() {
            let y = frame.y + padding + (line_index as f64 + 0.5) * line_height;
            self.text(line, frame.x + padding, y, &style)?;
        }
        Ok(())
    }
}
