//! barchart-rs: bar chart layout, tick, render and hit-test engine.
//!
//! The engine draws through the [`render::DrawingSurface`] trait, so the same
//! chart logic runs headless against [`render::RecordingSurface`], against
//! cairo when the `cairo-backend` feature is enabled, or inside a GTK4
//! drawing area with `gtk4-adapter`.

pub mod api;
pub mod content;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

#[cfg(feature = "gtk4-adapter")]
pub mod platform_gtk;

pub use api::{BarChart, ChartOptions};
pub use content::Content;
pub use error::{ChartError, ChartResult, ValidationError};
