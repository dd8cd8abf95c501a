use crate::core::{Rect, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{Color, DrawingSurface, Font, TextMetrics, TextStyle};

/// Glyph advance as a fraction of the font size.
const GLYPH_ADVANCE_RATIO: f64 = 0.6;

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    ClearRect(Rect),
    FillRect { rect: Rect, color: Color },
    StrokeRect { rect: Rect, color: Color, line_width: f64 },
    BeginPath,
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    ClosePath,
    FillPath { color: Color },
    StrokePath { color: Color, line_width: f64 },
    FillText { text: String, x: f64, y: f64, style: TextStyle },
    Save,
    Restore,
    Translate { dx: f64, dy: f64 },
    Rotate { radians: f64 },
}

/// Headless surface used by tests and hosts that replay commands elsewhere.
///
/// Every call is validated and appended to an in-memory command list. Text is
/// measured with a fixed per-glyph advance so layout stays deterministic.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    viewport: Viewport,
    commands: Vec<DrawCommand>,
    save_depth: usize,
}

impl RecordingSurface {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            commands: Vec::new(),
            save_depth: 0,
        }
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Current `save` nesting depth; 0 after a balanced draw pass.
    #[must_use]
    pub fn save_depth(&self) -> usize {
        self.save_depth
    }

    /// Texts drawn so far, in call order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::FillText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Rectangles filled so far with `color`.
    pub fn filled_rects_with(&self, color: Color) -> impl Iterator<Item = Rect> + '_ {
        self.commands.iter().filter_map(move |command| match command {
            DrawCommand::FillRect { rect, color: fill } if *fill == color => Some(*rect),
            _ => None,
        })
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}

fn validate_point(x: f64, y: f64) -> ChartResult<()> {
    if !x.is_finite() || !y.is_finite() {
        return Err(ChartError::InvalidData(
            "draw coordinates must be finite".to_owned(),
        ));
    }
    Ok(())
}

fn validate_rect(rect: Rect) -> ChartResult<()> {
    if !rect.is_finite() || rect.width < 0.0 || rect.height < 0.0 {
        return Err(ChartError::InvalidData(
            "rectangle must be finite with non-negative size".to_owned(),
        ));
    }
    Ok(())
}

fn validate_line_width(line_width: f64) -> ChartResult<()> {
    if !line_width.is_finite() || line_width <= 0.0 {
        return Err(ChartError::InvalidData(
            "line width must be finite and > 0".to_owned(),
        ));
    }
    Ok(())
}

impl TextMetrics for RecordingSurface {
    fn measure_text(&self, text: &str, font: &Font) -> f64 {
        text.chars().count() as f64 * font.size_px * GLYPH_ADVANCE_RATIO
    }
}

impl DrawingSurface for RecordingSurface {
    fn size(&self) -> Viewport {
        self.viewport
    }

    fn clear_rect(&mut self, rect: Rect) -> ChartResult<()> {
        validate_rect(rect)?;
        self.push(DrawCommand::ClearRect(rect));
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> ChartResult<()> {
        validate_rect(rect)?;
        color.validate()?;
        self.push(DrawCommand::FillRect { rect, color });
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64) -> ChartResult<()> {
        validate_rect(rect)?;
        validate_line_width(line_width)?;
        color.validate()?;
        self.push(DrawCommand::StrokeRect {
            rect,
            color,
            line_width,
        });
        Ok(())
    }

    fn begin_path(&mut self) {
        self.push(DrawCommand::BeginPath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::LineTo { x, y });
    }

    fn close_path(&mut self) {
        self.push(DrawCommand::ClosePath);
    }

    fn fill_path(&mut self, color: Color) -> ChartResult<()> {
        color.validate()?;
        self.push(DrawCommand::FillPath { color });
        Ok(())
    }

    fn stroke_path(&mut self, color: Color, line_width: f64) -> ChartResult<()> {
        validate_line_width(line_width)?;
        color.validate()?;
        self.push(DrawCommand::StrokePath { color, line_width });
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> ChartResult<()> {
        if text.is_empty() {
            return Err(ChartError::InvalidData(
                "text must not be empty".to_owned(),
            ));
        }
        validate_point(x, y)?;
        if !style.font.size_px.is_finite() || style.font.size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        style.color.validate()?;
        self.push(DrawCommand::FillText {
            text: text.to_owned(),
            x,
            y,
            style: style.clone(),
        });
        Ok(())
    }

    fn save(&mut self) {
        self.save_depth += 1;
        self.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.save_depth = self.save_depth.saturating_sub(1);
        self.push(DrawCommand::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.push(DrawCommand::Translate { dx, dy });
    }

    fn rotate(&mut self, radians: f64) {
        self.push(DrawCommand::Rotate { radians });
    }
}

#[cfg(test)]
mod tests {
    use super::{DrawCommand, RecordingSurface};
    use crate::core::Rect;
    use crate::render::{Color, DrawingSurface, Font, FontWeight, TextMetrics, TextStyle};

    #[test]
    fn measures_text_with_fixed_glyph_advance() {
        let surface = RecordingSurface::new(100, 100);
        let font = Font::new("Helvetica", 10.0, FontWeight::Normal);
        assert_eq!(surface.measure_text("abcd", &font), 24.0);
    }

    #[test]
    fn rejects_invalid_geometry() {
        let mut surface = RecordingSurface::new(100, 100);
        assert!(surface.fill_rect(Rect::new(0.0, 0.0, -1.0, 4.0), Color::BLACK).is_err());
        assert!(surface.stroke_path(Color::BLACK, 0.0).is_err());
        let style = TextStyle::new(Font::new("Helvetica", 10.0, FontWeight::Normal), Color::BLACK);
        assert!(surface.fill_text("", 0.0, 0.0, &style).is_err());
        assert!(surface.fill_text("x", f64::NAN, 0.0, &style).is_err());
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn tracks_save_depth_and_commands() {
        let mut surface = RecordingSurface::new(10, 10);
        surface.save();
        surface.translate(2.0, 3.0);
        surface.restore();
        assert_eq!(surface.save_depth(), 0);
        assert_eq!(surface.take_commands(), vec![
            DrawCommand::Save,
            DrawCommand::Translate { dx: 2.0, dy: 3.0 },
            DrawCommand::Restore,
        ]);
        assert!(surface.commands().is_empty());
    }
}
