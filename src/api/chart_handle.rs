use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;

use crate::error::{ChartError, ChartResult};

/// A chart produced by a render task.
///
/// `refresh` re-renders the chart against the target it was last applied
/// to, without new input; it is what `update_graphs` calls.
pub trait RenderedChart {
    fn name(&self) -> &str;
    fn refresh(&mut self) -> ChartResult<()>;
}

/// Shared handle to a rendered chart.
pub type GraphHandle = Rc<RefCell<dyn RenderedChart>>;

/// Every chart rendered through one render context, in render order.
#[derive(Clone, Default)]
pub struct GraphRegistry {
    graphs: Rc<RefCell<Vec<GraphHandle>>>,
}

impl std::fmt::Debug for GraphRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphRegistry")
            .field("len", &self.len())
            .finish()
    }
}

impl GraphRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, graph: GraphHandle) {
        self.graphs.borrow_mut().push(graph);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.graphs.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graphs.borrow().is_empty()
    }

    /// Snapshot of the handles; the registry itself is not borrowed afterwards.
    #[must_use]
    pub fn handles(&self) -> Vec<GraphHandle> {
        self.graphs.borrow().clone()
    }

    /// Refreshes every graph in render order.
    ///
    /// A failing graph does not stop the others; the failures are returned.
    pub fn refresh_all(&self) -> Vec<ChartError> {
        let mut failures = Vec::new();
        for (index, graph) in self.handles().into_iter().enumerate() {
            let Ok(mut graph) = graph.try_borrow_mut() else {
                warn!(index, "skipping refresh of a graph that is already borrowed");
                continue;
            };
            if let Err(err) = graph.refresh() {
                warn!(index, graph = graph.name(), error = %err, "graph refresh failed");
                failures.push(err);
            }
        }
        failures
    }

    /// Drops every handle; returns how many were released.
    pub fn clear(&self) -> usize {
        let mut graphs = self.graphs.borrow_mut();
        let released = graphs.len();
        graphs.clear();
        released
    }
}
