pub mod sample;
pub mod scale;
pub mod stats;
pub mod ticks;
pub mod types;

pub use sample::{Sample, SampleGroup};
pub use scale::LinearScale;
pub use stats::SampleStats;
pub use ticks::{LinearTicks, format_tick_label, linear_ticks, nice_number};
pub use types::{Rect, Viewport};
