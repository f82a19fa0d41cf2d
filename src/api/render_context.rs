use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ChartResult;

use super::render_scheduler::DEFAULT_STEP;
use super::{
    EventBus, GenerateChart, GraphRegistry, RenderEvent, RenderScheduler, TaskFailure, TickReport,
    WindowHost,
};

/// Listener name used for the context's own listeners.
const CONTEXT_LISTENER: &str = "n3";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextOptions {
    /// Records and logs the wall-clock time of every render activation.
    pub debug: bool,
    /// Tasks run per scheduler tick.
    pub step: usize,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            debug: false,
            step: DEFAULT_STEP,
        }
    }
}

impl ContextOptions {
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn with_step(mut self, step: usize) -> Self {
        self.step = step;
        self
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        Ok(serde_json::from_str(input)?)
    }
}

/// Timing of the last render activation, kept in debug mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderLogs {
    pub start: Option<Instant>,
    pub end: Option<Instant>,
    pub total: Option<Duration>,
}

/// Owns everything a page of charts shares: the render queue, the event bus,
/// the rendered graphs and the debug render log.
///
/// `init` wires the built-in listeners (graph refresh on `update_graphs`,
/// timing in debug mode); `teardown` drains pending work and releases them.
#[derive(Debug)]
pub struct RenderContext {
    options: ContextOptions,
    bus: EventBus,
    graphs: GraphRegistry,
    scheduler: RenderScheduler,
    logs: Rc<RefCell<RenderLogs>>,
}

impl RenderContext {
    pub fn init(options: ContextOptions) -> ChartResult<Self> {
        let bus = EventBus::new();
        let graphs = GraphRegistry::new();
        let scheduler = RenderScheduler::new(options.step, bus.clone(), graphs.clone())?;
        let logs = Rc::new(RefCell::new(RenderLogs::default()));

        if options.debug {
            let start_logs = Rc::clone(&logs);
            bus.on(RenderEvent::RenderStart, CONTEXT_LISTENER, move |_| {
                start_logs.borrow_mut().start = Some(Instant::now());
            });
            let end_logs = Rc::clone(&logs);
            bus.on(RenderEvent::RenderEnd, CONTEXT_LISTENER, move |_| {
                let mut logs = end_logs.borrow_mut();
                let end = Instant::now();
                logs.end = Some(end);
                logs.total = logs.start.map(|start| end.duration_since(start));
                if let Some(total) = logs.total {
                    debug!(total_ms = total.as_millis() as u64, "total");
                }
            });
        }

        let refresh = graphs.clone();
        bus.on(RenderEvent::UpdateGraphs, CONTEXT_LISTENER, move |_| {
            let failures = refresh.refresh_all();
            if !failures.is_empty() {
                warn!(failed = failures.len(), "some graphs failed to refresh");
            }
        });

        debug!(debug = options.debug, step = options.step, "render context initialized");
        Ok(Self {
            options,
            bus,
            graphs,
            scheduler,
            logs,
        })
    }

    #[must_use]
    pub fn options(&self) -> ContextOptions {
        self.options
    }

    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    #[must_use]
    pub fn graphs(&self) -> &GraphRegistry {
        &self.graphs
    }

    #[must_use]
    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut RenderScheduler {
        &mut self.scheduler
    }

    #[must_use]
    pub fn render_logs(&self) -> RenderLogs {
        *self.logs.borrow()
    }

    /// Debug-only log line; a no-op unless `options.debug` is set.
    pub fn log(&self, message: &str) {
        if self.options.debug {
            debug!(target: "n3_charts::log", "{message}");
        }
    }

    /// Queues a chart-generation task; see [`RenderScheduler::enqueue`].
    pub fn add_graph(&mut self, task: impl GenerateChart + 'static) -> u64 {
        self.scheduler.enqueue(task)
    }

    pub fn tick(&mut self) -> Option<TickReport> {
        self.scheduler.tick()
    }

    pub fn run_until_idle(&mut self) -> Vec<TickReport> {
        self.scheduler.run_until_idle()
    }

    /// Drains the queue and fails with the first task error of the drain,
    /// if any. Other failures stay available through the scheduler.
    pub fn flush(&mut self) -> ChartResult<Vec<TickReport>> {
        let reports = self.scheduler.run_until_idle();
        let mut failures = self.scheduler.take_failures().into_iter();
        match failures.next() {
            Some(first) => {
                let rest: Vec<TaskFailure> = failures.collect();
                if !rest.is_empty() {
                    warn!(additional = rest.len(), "more render tasks failed");
                }
                Err(first.into_error())
            }
            None => Ok(reports),
        }
    }

    /// Re-renders every rendered graph against its recorded target.
    pub fn update_graphs(&self) {
        self.bus.emit(RenderEvent::UpdateGraphs);
    }

    /// Chains a resize handler onto `window` that signals `update_graphs`.
    pub fn bind_window(&self, window: &mut WindowHost) {
        let bus = self.bus.clone();
        window.window_resize(move |event| {
            debug!(width = event.width, height = event.height, "window resized");
            bus.emit(RenderEvent::UpdateGraphs);
        });
    }

    /// Runs every queued task, then drops all listeners and graphs.
    ///
    /// Returns how many graphs were released.
    pub fn teardown(mut self) -> usize {
        let drained = self.scheduler.run_until_idle();
        if !drained.is_empty() {
            debug!(ticks = drained.len(), "drained render queue during teardown");
        }
        self.bus.clear();
        let released = self.graphs.clear();
        debug!(released, "render context torn down");
        released
    }
}
