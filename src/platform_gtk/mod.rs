//! GTK4 embedding: a `DrawingArea` driven by a [`BarChart`].

use std::cell::RefCell;
use std::rc::Rc;

use gtk4 as gtk;
use gtk::glib;
use gtk::prelude::*;
use serde_json::Value;
use tracing::warn;

use crate::api::{BarChart, ChartOptions, RedrawScheduler};
use crate::content::Content;
use crate::core::Viewport;
use crate::error::ChartResult;
use crate::render::CairoSurface;

/// Scheduler that queues a redraw of the drawing area on the GTK main loop.
///
/// Holds a weak reference so a dropped widget silently ignores requests.
#[derive(Clone)]
pub struct GtkRedrawScheduler {
    area: glib::WeakRef<gtk::DrawingArea>,
}

impl GtkRedrawScheduler {
    #[must_use]
    pub fn new(area: &gtk::DrawingArea) -> Self {
        Self {
            area: area.downgrade(),
        }
    }
}

impl RedrawScheduler for GtkRedrawScheduler {
    fn schedule_redraw(&mut self) {
        if let Some(area) = self.area.upgrade() {
            area.queue_draw();
        }
    }
}

pub type GtkBarChart = BarChart<CairoSurface, GtkRedrawScheduler>;

/// Drawing area wired to a bar chart: draws on demand and feeds pointer
/// motion into the hint cache.
pub struct BarChartArea {
    area: gtk::DrawingArea,
    chart: Rc<RefCell<GtkBarChart>>,
}

impl BarChartArea {
    pub fn new(options: ChartOptions) -> ChartResult<Self> {
        let area = gtk::DrawingArea::new();
        // Measurement-only surface until GTK hands over the first draw context.
        let surface = CairoSurface::new(1, 1)?;
        let chart = BarChart::new(surface, options, GtkRedrawScheduler::new(&area))?;
        let chart = Rc::new(RefCell::new(chart));

        let draw_chart = Rc::clone(&chart);
        area.set_draw_func(move |_area, context, width, height| {
            let viewport = Viewport::new(
                u32::try_from(width).unwrap_or(0),
                u32::try_from(height).unwrap_or(0),
            );
            if !viewport.is_valid() {
                return;
            }
            let mut chart = draw_chart.borrow_mut();
            chart.surface_mut().attach_context(context.clone(), viewport);
            if let Err(err) = chart.render() {
                warn!(error = %err, "gtk bar chart draw failed");
            }
        });

        let motion = gtk::EventControllerMotion::new();
        let motion_chart = Rc::clone(&chart);
        motion.connect_motion(move |_controller, x, y| {
            motion_chart.borrow_mut().pointer_move(x, y);
        });
        let leave_chart = Rc::clone(&chart);
        motion.connect_leave(move |_controller| {
            leave_chart.borrow_mut().pointer_leave();
        });
        area.add_controller(motion);

        Ok(Self { area, chart })
    }

    #[must_use]
    pub fn widget(&self) -> &gtk::DrawingArea {
        &self.area
    }

    pub fn update(&self, content: Content) -> ChartResult<()> {
        self.chart.borrow_mut().update(content)
    }

    pub fn update_json(&self, value: &Value) -> ChartResult<()> {
        self.chart.borrow_mut().update_json(value)
    }

    /// Read access to the chart, e.g. to inspect the active hint.
    pub fn with_chart<T>(&self, f: impl FnOnce(&GtkBarChart) -> T) -> T {
        f(&self.chart.borrow())
    }
}
