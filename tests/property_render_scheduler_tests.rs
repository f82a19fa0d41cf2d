use std::cell::{Cell, RefCell};
use std::rc::Rc;

use n3_charts::api::{
    EventBus, GraphHandle, GraphRegistry, RenderEvent, RenderScheduler, RenderedChart,
};
use n3_charts::error::ChartResult;
use proptest::prelude::*;

struct Inert;

impl RenderedChart for Inert {
    fn name(&self) -> &str {
        "inert"
    }

    fn refresh(&mut self) -> ChartResult<()> {
        Ok(())
    }
}

proptest! {
    #[test]
    fn batches_preserve_order_and_size(step in 1usize..10, task_count in 0usize..50) {
        let bus = EventBus::new();
        let starts = Rc::new(Cell::new(0usize));
        let ends = Rc::new(Cell::new(0usize));
        let sink = Rc::clone(&starts);
        bus.on(RenderEvent::RenderStart, "count", move |_| sink.set(sink.get() + 1));
        let sink = Rc::clone(&ends);
        bus.on(RenderEvent::RenderEnd, "count", move |_| sink.set(sink.get() + 1));

        let mut scheduler = RenderScheduler::new(step, bus, GraphRegistry::new())
            .expect("valid step");
        let order = Rc::new(RefCell::new(Vec::new()));
        for index in 0..task_count {
            let order = Rc::clone(&order);
            scheduler.enqueue(move || {
                order.borrow_mut().push(index);
                let handle: GraphHandle = Rc::new(RefCell::new(Inert));
                Ok(handle)
            });
        }

        let reports = scheduler.run_until_idle();
        prop_assert_eq!(reports.len(), task_count.div_ceil(step));

        let mut remaining = task_count;
        for report in &reports {
            prop_assert_eq!(report.executed, step.min(remaining));
            remaining -= report.executed;
            prop_assert_eq!(report.remaining, remaining);
            prop_assert_eq!(report.finished, remaining == 0);
        }

        prop_assert_eq!(order.borrow().clone(), (0..task_count).collect::<Vec<_>>());
        let activations = usize::from(task_count > 0);
        prop_assert_eq!(starts.get(), activations);
        prop_assert_eq!(ends.get(), activations);
    }
}
