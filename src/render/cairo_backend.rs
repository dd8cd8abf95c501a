use std::io::Write;

use cairo::{Context, Format, ImageSurface, Operator};
use pango::{FontDescription, Layout, Weight};
use tracing::warn;

use crate::core::{Rect, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{
    Color, DrawingSurface, Font, FontWeight, TextBaseline, TextHAlign, TextMetrics, TextStyle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CairoRenderStats {
    pub rects_drawn: usize,
    pub paths_drawn: usize,
    pub texts_drawn: usize,
}

/// Cairo + Pango + PangoCairo drawing surface.
///
/// Two modes are supported:
/// - offscreen rendering into an owned `ImageSurface`, exportable as PNG
/// - in-place rendering on an external Cairo context, for example the one
///   handed to a GTK `DrawingArea` draw callback
#[derive(Debug)]
pub struct CairoSurface {
    context: Context,
    image: Option<ImageSurface>,
    viewport: Viewport,
    stats: CairoRenderStats,
}

impl CairoSurface {
    pub fn new(width: u32, height: u32) -> ChartResult<Self> {
        let viewport = Viewport::new(width, height);
        let (Ok(pixel_width), Ok(pixel_height)) = (i32::try_from(width), i32::try_from(height))
        else {
            return Err(ChartError::InvalidViewport { width, height });
        };
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport { width, height });
        }

        let image = ImageSurface::create(Format::ARgb32, pixel_width, pixel_height)
            .map_err(|err| map_backend_error("failed to create cairo surface", err))?;
        let context = Context::new(&image)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        Ok(Self {
            context,
            image: Some(image),
            viewport,
            stats: CairoRenderStats::default(),
        })
    }

    /// Retargets the surface at an external context, dropping any owned image.
    ///
    /// GTK hands out a fresh context on every draw callback, so adapters call
    /// this before each pass.
    pub fn attach_context(&mut self, context: Context, viewport: Viewport) {
        self.context = context;
        self.image = None;
        self.viewport = viewport;
    }

    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    #[must_use]
    pub fn image_surface(&self) -> Option<&ImageSurface> {
        self.image.as_ref()
    }

    #[must_use]
    pub fn stats(&self) -> CairoRenderStats {
        self.stats
    }

    /// Encodes the offscreen image as PNG.
    pub fn write_png<W: Write>(&self, writer: &mut W) -> ChartResult<()> {
        let Some(image) = self.image.as_ref() else {
            return Err(ChartError::Surface(
                "surface wraps an external context and owns no image".to_owned(),
            ));
        };
        image.flush();
        image
            .write_to_png(writer)
            .map_err(|err| ChartError::Surface(format!("failed to encode png: {err}")))
    }

    fn layout(&self, text: &str, font: &Font) -> Layout {
        let layout = pangocairo::functions::create_layout(&self.context);
        layout.set_font_description(Some(&font_description(font)));
        layout.set_text(text);
        layout
    }

    fn apply_color(&self, color: Color) {
        self.context
            .set_source_rgba(color.red, color.green, color.blue, color.alpha);
    }
}

impl TextMetrics for CairoSurface {
    fn measure_text(&self, text: &str, font: &Font) -> f64 {
        let (width, _height) = self.layout(text, font).pixel_size();
        f64::from(width)
    }
}

impl DrawingSurface for CairoSurface {
    fn size(&self) -> Viewport {
        self.viewport
    }

    fn clear_rect(&mut self, rect: Rect) -> ChartResult<()> {
        self.context
            .save()
            .map_err(|err| map_backend_error("failed to save cairo state", err))?;
        self.context.set_operator(Operator::Clear);
        self.context.new_path();
        self.context.rectangle(rect.x, rect.y, rect.width, rect.height);
        let filled = self
            .context
            .fill()
            .map_err(|err| map_backend_error("failed to clear rectangle", err));
        self.context
            .restore()
            .map_err(|err| map_backend_error("failed to restore cairo state", err))?;
        filled
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) -> ChartResult<()> {
        self.apply_color(color);
        self.context.new_path();
        self.context.rectangle(rect.x, rect.y, rect.width, rect.height);
        self.context
            .fill()
            .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
        self.stats.rects_drawn += 1;
        Ok(())
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f64) -> ChartResult<()> {
        self.apply_color(color);
        self.context.set_line_width(line_width);
        self.context.new_path();
        self.context.rectangle(rect.x, rect.y, rect.width, rect.height);
        self.context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke rectangle", err))?;
        self.stats.rects_drawn += 1;
        Ok(())
    }

    fn begin_path(&mut self) {
        self.context.new_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.context.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.context.line_to(x, y);
    }

    fn close_path(&mut self) {
        self.context.close_path();
    }

    /// Keeps the path so a following `stroke_path` outlines the same shape.
    fn fill_path(&mut self, color: Color) -> ChartResult<()> {
        self.apply_color(color);
        self.context
            .fill_preserve()
            .map_err(|err| map_backend_error("failed to fill path", err))?;
        self.stats.paths_drawn += 1;
        Ok(())
    }

    fn stroke_path(&mut self, color: Color, line_width: f64) -> ChartResult<()> {
        self.apply_color(color);
        self.context.set_line_width(line_width);
        self.context
            .stroke()
            .map_err(|err| map_backend_error("failed to stroke path", err))?;
        self.stats.paths_drawn += 1;
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) -> ChartResult<()> {
        let layout = self.layout(text, &style.font);
        let (width, height) = layout.pixel_size();
        let left = match style.h_align {
            TextHAlign::Left => x,
            TextHAlign::Center => x - f64::from(width) / 2.0,
            TextHAlign::Right => x - f64::from(width),
        };
        let top = match style.baseline {
            TextBaseline::Top => y,
            TextBaseline::Middle => y - f64::from(height) / 2.0,
            TextBaseline::Bottom => y - f64::from(height),
            TextBaseline::Alphabetic => y - f64::from(layout.baseline()) / f64::from(pango::SCALE),
        };

        self.apply_color(style.color);
        self.context.move_to(left, top);
        pangocairo::functions::show_layout(&self.context, &layout);
        self.context.new_path();
        self.stats.texts_drawn += 1;
        Ok(())
    }

    fn save(&mut self) {
        if let Err(err) = self.context.save() {
            warn!(error = %err, "failed to save cairo state");
        }
    }

    fn restore(&mut self) {
        if let Err(err) = self.context.restore() {
            warn!(error = %err, "failed to restore cairo state");
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.context.translate(dx, dy);
    }

    fn rotate(&mut self, radians: f64) {
        self.context.rotate(radians);
    }
}

fn font_description(font: &Font) -> FontDescription {
    let mut description = FontDescription::new();
    description.set_family(&font.family);
    description.set_absolute_size(font.size_px * f64::from(pango::SCALE));
    description.set_weight(match font.weight {
        FontWeight::Normal => Weight::Normal,
        FontWeight::Bold => Weight::Bold,
    });
    description
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ChartError {
    ChartError::Surface(format!("{prefix}: {err}"))
}
