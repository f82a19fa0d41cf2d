//! n3-charts: deferred render queue and line/area SVG chart configurator.
//!
//! A [`RenderContext`] owns the render queue, its lifecycle events and the
//! charts it has produced. Chart-generation tasks are drained in batches of
//! `step` per host-driven tick. [`LineGraph`] renders line/area charts with
//! gradient fills and time/linear axes into an in-memory SVG tree that any
//! [`render::Renderer`] backend can serialize.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{
    ContextOptions, EventBus, GraphHandle, LineGraph, LineGraphConfig, RenderContext,
    RenderEvent, RenderedChart, WindowHost,
};
pub use core::{Color, DataPoint, Margin, Series};
pub use error::{ChartError, ChartResult};
pub use render::{Selection, Surface, SvgRenderer};
