pub mod chart_options;
pub mod engine;
pub mod hit_test;
pub mod layout;
mod renderer;
pub mod scheduler;

pub use chart_options::{BarStyle, ChartOptions, ScaleStyle, TextRole};
pub use engine::BarChart;
pub use hit_test::{Hint, HintKey, HintTransition, HitRegion, hit_test};
pub use layout::{
    ChartLayout, LabelOrientation, LegendItemLayout, LegendLayout, TickLabel, compute_layout,
};
pub use scheduler::{ManualScheduler, NoopScheduler, RedrawScheduler};
