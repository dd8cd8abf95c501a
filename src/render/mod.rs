mod primitives;
mod recording_surface;

pub use primitives::{Color, Font, FontWeight, TextBaseline, TextHAlign, TextStyle};
pub use recording_surface::{DrawCommand, RecordingSurface};

use crate::core::{Rect, Viewport};
use crate::error::ChartResult;

/// Text measurement capability required by layout.
pub trait TextMetrics {
    /// Rendered advance width of `text` in pixels.
    fn measure_text(&self, text: &str, font: &Font) -> f64;
}

/// Contract implemented by any 2D drawing backend.
///
/// The engine issues immediate-mode commands in surface pixel space. Path
/// commands build a single current path consumed by `fill_path`/`stroke_path`;
/// `save`/`restore` bracket transform changes.
pub trait DrawingSurface: TextMetrics {
    fn size(&self) -> Viewport;

    fn clear_rect(&mut self, rect: Rect) -> ChartResult<()>;
    fn fill_rect(&mut self, rect: Rect, color: Color) -> ChartResult<()>;
    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64) -> ChartResult<()>;

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn close_path(&mut self);
    fn fill_path(&mut self, color: Color) -> ChartResult<()>;
    fn stroke_path(&mut self, color: Color, line_width: f64) -> ChartResult<()>;

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> ChartResult<()>;

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, radians: f64);
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{CairoRenderStats, CairoSurface};
