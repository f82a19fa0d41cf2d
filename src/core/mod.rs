pub mod color;
pub mod extent;
pub mod path;
pub mod scale;
pub mod time_ticks;
pub mod types;

pub use color::{CATEGORY20C, Color, Palette};
pub use extent::{Y_HEADROOM, x_extent, y_extent};
pub use path::{PathVertex, SeriesGeometry};
pub use scale::{Scale, ScaleKind, linear_tick_step, linear_ticks};
pub use types::{DataPoint, Margin, MarginPatch, Series, Size, datetime_to_unix_seconds};
