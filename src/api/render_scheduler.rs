use std::collections::VecDeque;
use std::fmt;

use tracing::{debug, trace, warn};

use crate::error::{ChartError, ChartResult};

use super::{EventBus, GraphHandle, GraphRegistry, RenderEvent};

/// Number of tasks run per tick unless configured otherwise.
pub const DEFAULT_STEP: usize = 1;

/// Deferred chart-generation work.
///
/// Closures returning `ChartResult<GraphHandle>` implement this directly, so
/// callers can enqueue either a closure or their own task type.
pub trait GenerateChart {
    fn generate(self: Box<Self>) -> ChartResult<GraphHandle>;
}

impl<F> GenerateChart for F
where
    F: FnOnce() -> ChartResult<GraphHandle>,
{
    fn generate(self: Box<Self>) -> ChartResult<GraphHandle> {
        (*self)()
    }
}

struct QueuedTask {
    sequence: u64,
    job: Box<dyn GenerateChart>,
}

/// A task whose `generate` returned an error.
#[derive(Debug)]
pub struct TaskFailure {
    pub sequence: u64,
    pub error: ChartError,
}

impl TaskFailure {
    #[must_use]
    pub fn into_error(self) -> ChartError {
        ChartError::TaskFailed {
            sequence: self.sequence,
            message: self.error.to_string(),
        }
    }
}

/// Outcome of one drain tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// Tasks run in this tick, failed ones included.
    pub executed: usize,
    pub failed: usize,
    /// Tasks still queued after this tick.
    pub remaining: usize,
    /// True when this tick emptied the queue and ended the activation.
    pub finished: bool,
}

/// FIFO render queue drained in batches of `step` tasks per tick.
///
/// The host drives ticks (`tick`/`run_until_idle`) from its event loop in
/// place of a zero-delay timer, so control returns to the host between
/// batches. One activation spans from the enqueue that found the scheduler
/// idle to the tick that empties the queue, and is bracketed by exactly one
/// `render_start` and one `render_end`.
///
/// A task that fails is logged and recorded in `failures`; the remaining
/// tasks of the batch still run.
pub struct RenderScheduler {
    queue: VecDeque<QueuedTask>,
    step: usize,
    active: bool,
    tick_pending: bool,
    next_sequence: u64,
    bus: EventBus,
    graphs: GraphRegistry,
    failures: Vec<TaskFailure>,
}

impl fmt::Debug for RenderScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderScheduler")
            .field("queued", &self.queue.len())
            .field("step", &self.step)
            .field("active", &self.active)
            .field("tick_pending", &self.tick_pending)
            .field("failures", &self.failures.len())
            .finish()
    }
}

impl RenderScheduler {
    pub fn new(step: usize, bus: EventBus, graphs: GraphRegistry) -> ChartResult<Self> {
        Ok(Self {
            queue: VecDeque::new(),
            step: validate_step(step)?,
            active: false,
            tick_pending: false,
            next_sequence: 0,
            bus,
            graphs,
            failures: Vec::new(),
        })
    }

    #[must_use]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Changes the batch size; applies from the next tick.
    pub fn set_step(&mut self, step: usize) -> ChartResult<()> {
        self.step = validate_step(step)?;
        Ok(())
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True when a tick has been requested and not yet run.
    #[must_use]
    pub fn has_pending_tick(&self) -> bool {
        self.tick_pending
    }

    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    #[must_use]
    pub fn failures(&self) -> &[TaskFailure] {
        &self.failures
    }

    pub fn take_failures(&mut self) -> Vec<TaskFailure> {
        std::mem::take(&mut self.failures)
    }

    /// Queues `task` and activates the scheduler if it was idle.
    ///
    /// Returns the task's sequence number (enqueue order, from 0).
    pub fn enqueue(&mut self, task: impl GenerateChart + 'static) -> u64 {
        self.enqueue_boxed(Box::new(task))
    }

    pub fn enqueue_boxed(&mut self, job: Box<dyn GenerateChart>) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.queue.push_back(QueuedTask { sequence, job });
        trace!(sequence, queued = self.queue.len(), "render task queued");

        if !self.active {
            self.active = true;
            self.tick_pending = true;
            debug!(queued = self.queue.len(), step = self.step, "render queue activated");
            self.bus.emit(RenderEvent::RenderStart);
        }
        sequence
    }

    /// Runs one batch if a tick is pending; `None` when idle.
    pub fn tick(&mut self) -> Option<TickReport> {
        if !self.tick_pending {
            return None;
        }

        let batch = self.step.min(self.queue.len());
        let mut failed = 0;
        for _ in 0..batch {
            let Some(task) = self.queue.pop_front() else {
                break;
            };
            match task.job.generate() {
                Ok(graph) => {
                    trace!(sequence = task.sequence, "render task generated");
                    self.graphs.push(graph);
                }
                Err(error) => {
                    warn!(sequence = task.sequence, error = %error, "render task failed");
                    failed += 1;
                    self.failures.push(TaskFailure {
                        sequence: task.sequence,
                        error,
                    });
                }
            }
        }

        let remaining = self.queue.len();
        let finished = remaining == 0;
        if finished {
            self.tick_pending = false;
            self.active = false;
            debug!(graphs = self.graphs.len(), "render queue drained");
            self.bus.emit(RenderEvent::RenderEnd);
        }

        Some(TickReport {
            executed: batch,
            failed,
            remaining,
            finished,
        })
    }

    /// Ticks until the scheduler is idle; returns one report per tick.
    pub fn run_until_idle(&mut self) -> Vec<TickReport> {
        let mut reports = Vec::new();
        while let Some(report) = self.tick() {
            reports.push(report);
        }
        reports
    }
}

fn validate_step(step: usize) -> ChartResult<usize> {
    if step == 0 {
        return Err(ChartError::InvalidConfig(
            "render step must be at least 1".to_owned(),
        ));
    }
    Ok(step)
}
