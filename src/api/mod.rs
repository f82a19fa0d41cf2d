mod axis;
mod chart_handle;
mod dispatch;
mod linegraph;
mod linegraph_config;
mod render_context;
mod render_scheduler;
mod window;

pub use axis::{
    Axis, AxisOrient, DEFAULT_MINOR_TICK_SIZE, DEFAULT_OUTER_TICK_SIZE, DEFAULT_TICK_PADDING,
};
pub use chart_handle::{GraphHandle, GraphRegistry, RenderedChart};
pub use dispatch::{EventBus, RenderEvent};
pub use linegraph::{
    BACKGROUND_CLASS, DEFAULT_BACKGROUND, DEFAULT_HEIGHT, DEFAULT_TICKS, DEFAULT_WIDTH, LineGraph,
    WRAP_CLASS, X_AXIS_CLASS, Y_AXIS_CLASS, Y_AXIS_TICKS,
};
pub use linegraph_config::LineGraphConfig;
pub use render_context::{ContextOptions, RenderContext, RenderLogs};
pub use render_scheduler::{DEFAULT_STEP, GenerateChart, RenderScheduler, TaskFailure, TickReport};
pub use window::{ResizeEvent, WindowHost};
