use serde_json::Value;
use tracing::{debug, warn};

use crate::content::{Content, validate_content, validate_json};
use crate::core::SampleStats;
use crate::error::{ChartError, ChartResult};
use crate::render::DrawingSurface;

use super::hit_test::{HintTransition, apply_resolved_hint, hit_test};
use super::layout::{ChartLayout, compute_layout};
use super::renderer::render_chart;
use super::{ChartOptions, Hint, HitRegion, NoopScheduler, RedrawScheduler, ScaleStyle};

/// Bar chart facade consumed by host applications.
///
/// `BarChart` owns the drawing surface, the current content snapshot and the
/// hint cache. Mutations never draw directly: they set a pending flag and ask
/// the injected scheduler for a redraw, and the host answers with
/// [`render_if_pending`](Self::render_if_pending).
pub struct BarChart<S: DrawingSurface, D: RedrawScheduler = NoopScheduler> {
    surface: S,
    scheduler: D,
    options: ChartOptions,
    content: Content,
    stats: Vec<SampleStats>,
    layout: Option<ChartLayout>,
    hit_regions: Vec<HitRegion>,
    hint: Option<Hint>,
    pending_redraw: bool,
}

impl<S: DrawingSurface, D: RedrawScheduler> BarChart<S, D> {
    pub fn new(surface: S, options: ChartOptions, scheduler: D) -> ChartResult<Self> {
        let viewport = surface.size();
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        options.validate()?;

        Ok(Self {
            surface,
            scheduler,
            options,
            content: Content::default(),
            stats: Vec::new(),
            layout: None,
            hit_regions: Vec::new(),
            hint: None,
            pending_redraw: false,
        })
    }

    /// Replaces the content snapshot.
    ///
    /// Rejected content leaves every piece of stored state untouched and
    /// requests no redraw.
    pub fn update(&mut self, content: Content) -> ChartResult<()> {
        if let Err(err) = validate_content(&content) {
            warn!(error = %err, "rejected bar chart content");
            return Err(err.into());
        }
        self.accept(content);
        Ok(())
    }

    /// Validates and applies a JSON content descriptor.
    pub fn update_json(&mut self, value: &Value) -> ChartResult<()> {
        let content = validate_json(value).map_err(|err| {
            warn!(error = %err, "rejected bar chart content");
            ChartError::from(err)
        })?;
        self.accept(content);
        Ok(())
    }

    fn accept(&mut self, mut content: Content) {
        let scale_style = self.options.scale_style;
        if scale_style != ScaleStyle::Linear {
            for sample in &mut content.data {
                sample.map_in_place(|value| scale_style.transform(value));
            }
        }

        self.stats = content.derive_stats();
        self.content = content;
        debug!(
            bars = self.content.len(),
            ?scale_style,
            "accepted bar chart content"
        );
        self.request_redraw();
    }

    /// Resolves the hint under `(x, y)` against the regions of the last pass.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> HintTransition {
        let resolved = hit_test(&self.hit_regions, x, y).map(Hint::from);
        self.apply_hint(resolved)
    }

    /// Clears the active hint, if any, as when the pointer leaves the surface.
    pub fn pointer_leave(&mut self) -> HintTransition {
        self.apply_hint(None)
    }

    fn apply_hint(&mut self, resolved: Option<Hint>) -> HintTransition {
        let transition = apply_resolved_hint(&mut self.hint, resolved);
        if transition.needs_redraw() {
            debug!(
                ?transition,
                index = self.hint.as_ref().map(|hint| hint.index),
                segment = self.hint.as_ref().and_then(|hint| hint.segment),
                "hint changed"
            );
            self.request_redraw();
        }
        transition
    }

    pub fn request_redraw(&mut self) {
        self.pending_redraw = true;
        self.scheduler.schedule_redraw();
    }

    /// Draws a full pass and rebuilds the hit regions.
    pub fn render(&mut self) -> ChartResult<()> {
        let viewport = self.surface.size();
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        self.pending_redraw = false;
        let layout = compute_layout(
            viewport,
            &self.content,
            &self.stats,
            &self.options,
            &self.surface,
        )?;

        match render_chart(
            &mut self.surface,
            &layout,
            &self.content,
            &self.stats,
            &self.options,
            &mut self.hint,
        ) {
            Ok(regions) => {
                debug!(
                    width = viewport.width,
                    height = viewport.height,
                    regions = regions.len(),
                    hint_active = self.hint.is_some(),
                    "rendered bar chart"
                );
                self.hit_regions = regions;
                self.layout = Some(layout);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "bar chart render pass failed");
                self.hit_regions.clear();
                self.hint = None;
                Err(err)
            }
        }
    }

    /// Renders only when a redraw was requested since the last pass.
    ///
    /// Returns `true` when a frame was drawn.
    pub fn render_if_pending(&mut self) -> ChartResult<bool> {
        if !self.pending_redraw {
            return Ok(false);
        }
        self.render()?;
        Ok(true)
    }

    #[must_use]
    pub fn has_pending_redraw(&self) -> bool {
        self.pending_redraw
    }

    #[must_use]
    pub fn content(&self) -> &Content {
        &self.content
    }

    #[must_use]
    pub fn stats(&self) -> &[SampleStats] {
        &self.stats
    }

    #[must_use]
    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    #[must_use]
    pub fn hint(&self) -> Option<&Hint> {
        self.hint.as_ref()
    }

    #[must_use]
    pub fn hit_regions(&self) -> &[HitRegion] {
        &self.hit_regions
    }

    /// Layout of the last successful pass.
    #[must_use]
    pub fn layout(&self) -> Option<&ChartLayout> {
        self.layout.as_ref()
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access for hosts that resize or reset the surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[must_use]
    pub fn scheduler(&self) -> &D {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut D {
        &mut self.scheduler
    }

    #[must_use]
    pub fn into_surface(self) -> S {
        self.surface
    }
}
