use std::cell::{Cell, RefCell};
use std::rc::Rc;

use n3_charts::api::{
    EventBus, GraphHandle, GraphRegistry, RenderEvent, RenderScheduler, RenderedChart, TickReport,
};
use n3_charts::error::{ChartError, ChartResult};

struct StubChart {
    refreshes: Rc<Cell<usize>>,
}

impl RenderedChart for StubChart {
    fn name(&self) -> &str {
        "stub"
    }

    fn refresh(&mut self) -> ChartResult<()> {
        self.refreshes.set(self.refreshes.get() + 1);
        Ok(())
    }
}

fn stub_chart() -> GraphHandle {
    Rc::new(RefCell::new(StubChart {
        refreshes: Rc::new(Cell::new(0)),
    }))
}

fn scheduler(step: usize) -> (RenderScheduler, EventBus, GraphRegistry) {
    let bus = EventBus::new();
    let graphs = GraphRegistry::new();
    let scheduler =
        RenderScheduler::new(step, bus.clone(), graphs.clone()).expect("valid render step");
    (scheduler, bus, graphs)
}

fn count_events(bus: &EventBus, event: RenderEvent) -> Rc<Cell<usize>> {
    let count = Rc::new(Cell::new(0));
    let sink = Rc::clone(&count);
    bus.on(event, "count", move |_| sink.set(sink.get() + 1));
    count
}

#[test]
fn tasks_run_in_enqueue_order() {
    let (mut scheduler, _bus, graphs) = scheduler(1);
    let order = Rc::new(RefCell::new(Vec::new()));

    for index in 0..5 {
        let order = Rc::clone(&order);
        scheduler.enqueue(move || {
            order.borrow_mut().push(index);
            Ok(stub_chart())
        });
    }

    assert_eq!(scheduler.queued(), 5);
    let reports = scheduler.run_until_idle();
    assert_eq!(reports.len(), 5);
    assert_eq!(*order.borrow(), vec![0, 1, 2, 3, 4]);
    assert_eq!(graphs.len(), 5);
}

#[test]
fn step_two_drains_five_tasks_in_three_batches() {
    let (mut scheduler, _bus, _graphs) = scheduler(2);
    for _ in 0..5 {
        scheduler.enqueue(|| Ok(stub_chart()));
    }

    let reports = scheduler.run_until_idle();
    assert_eq!(
        reports,
        vec![
            TickReport {
                executed: 2,
                failed: 0,
                remaining: 3,
                finished: false,
            },
            TickReport {
                executed: 2,
                failed: 0,
                remaining: 1,
                finished: false,
            },
            TickReport {
                executed: 1,
                failed: 0,
                remaining: 0,
                finished: true,
            },
        ]
    );
    assert!(!scheduler.is_active());
}

#[test]
fn one_start_and_one_end_per_activation() {
    let (mut scheduler, bus, _graphs) = scheduler(1);
    let starts = count_events(&bus, RenderEvent::RenderStart);
    let ends = count_events(&bus, RenderEvent::RenderEnd);

    scheduler.enqueue(|| Ok(stub_chart()));
    assert_eq!(starts.get(), 1, "start fires synchronously on activation");
    assert!(scheduler.is_active());
    assert!(scheduler.has_pending_tick());

    scheduler.enqueue(|| Ok(stub_chart()));
    scheduler.enqueue(|| Ok(stub_chart()));
    assert_eq!(starts.get(), 1, "enqueue while active does not restart");

    let first = scheduler.tick().expect("tick pending");
    assert!(!first.finished);
    assert_eq!(ends.get(), 0);

    scheduler.run_until_idle();
    assert_eq!(ends.get(), 1);
    assert!(!scheduler.has_pending_tick());

    scheduler.enqueue(|| Ok(stub_chart()));
    scheduler.run_until_idle();
    assert_eq!(starts.get(), 2);
    assert_eq!(ends.get(), 2);
}

#[test]
fn idle_scheduler_has_nothing_to_tick() {
    let (mut scheduler, bus, _graphs) = scheduler(3);
    let ends = count_events(&bus, RenderEvent::RenderEnd);

    assert_eq!(scheduler.tick(), None);
    assert!(scheduler.run_until_idle().is_empty());
    assert_eq!(ends.get(), 0);
}

#[test]
fn failing_task_does_not_stop_its_batch() {
    let (mut scheduler, bus, graphs) = scheduler(3);
    let ends = count_events(&bus, RenderEvent::RenderEnd);

    scheduler.enqueue(|| Ok(stub_chart()));
    scheduler.enqueue(|| -> ChartResult<GraphHandle> {
        Err(ChartError::InvalidData("broken series".to_owned()))
    });
    scheduler.enqueue(|| Ok(stub_chart()));

    let report = scheduler.tick().expect("tick pending");
    assert_eq!(report.executed, 3);
    assert_eq!(report.failed, 1);
    assert!(report.finished);
    assert_eq!(ends.get(), 1);
    assert_eq!(graphs.len(), 2);

    let failures = scheduler.take_failures();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].sequence, 1);
    assert!(matches!(
        failures.into_iter().next().map(|failure| failure.into_error()),
        Some(ChartError::TaskFailed { sequence: 1, .. })
    ));
    assert!(scheduler.failures().is_empty());
}

#[test]
fn zero_step_is_rejected() {
    let result = RenderScheduler::new(0, EventBus::new(), GraphRegistry::new());
    assert!(matches!(result, Err(ChartError::InvalidConfig(_))));

    let (mut scheduler, _bus, _graphs) = scheduler(1);
    assert!(scheduler.set_step(0).is_err());
    assert_eq!(scheduler.step(), 1);
}

#[test]
fn step_change_applies_from_next_tick() {
    let (mut scheduler, _bus, _graphs) = scheduler(1);
    for _ in 0..4 {
        scheduler.enqueue(|| Ok(stub_chart()));
    }

    assert_eq!(scheduler.tick().map(|report| report.executed), Some(1));
    scheduler.set_step(3).expect("valid step");
    let report = scheduler.tick().expect("tick pending");
    assert_eq!(report.executed, 3);
    assert!(report.finished);
}

#[test]
fn sequences_count_up_across_activations() {
    let (mut scheduler, _bus, _graphs) = scheduler(1);
    assert_eq!(scheduler.enqueue(|| Ok(stub_chart())), 0);
    scheduler.run_until_idle();
    assert_eq!(scheduler.enqueue(|| Ok(stub_chart())), 1);
}
