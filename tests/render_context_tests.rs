use std::cell::{Cell, RefCell};
use std::rc::Rc;

use n3_charts::api::{
    BACKGROUND_CLASS, ContextOptions, GraphHandle, LineGraph, RenderContext, RenderEvent,
    RenderedChart, WindowHost,
};
use n3_charts::core::{DataPoint, Series};
use n3_charts::error::{ChartError, ChartResult};
use n3_charts::render::{Selection, Surface};

struct CountingChart {
    refreshes: Rc<Cell<usize>>,
}

impl RenderedChart for CountingChart {
    fn name(&self) -> &str {
        "counting"
    }

    fn refresh(&mut self) -> ChartResult<()> {
        self.refreshes.set(self.refreshes.get() + 1);
        Ok(())
    }
}

fn counting_chart(refreshes: &Rc<Cell<usize>>) -> GraphHandle {
    Rc::new(RefCell::new(CountingChart {
        refreshes: Rc::clone(refreshes),
    }))
}

#[test]
fn init_uses_default_options() {
    let context = RenderContext::init(ContextOptions::default()).expect("init");
    assert_eq!(context.options().step, 1);
    assert!(!context.options().debug);
    assert!(context.graphs().is_empty());
    assert!(!context.scheduler().is_active());
    assert!(context.bus().has_listener(RenderEvent::UpdateGraphs, "n3"));
    assert!(!context.bus().has_listener(RenderEvent::RenderEnd, "n3"));
}

#[test]
fn options_parse_from_json() {
    let options = ContextOptions::from_json_str(r#"{"debug": true}"#).expect("valid json");
    assert_eq!(options, ContextOptions::default().with_debug(true));

    let zero = ContextOptions::from_json_str(r#"{"step": 0}"#).expect("valid json");
    assert!(matches!(
        RenderContext::init(zero),
        Err(ChartError::InvalidConfig(_))
    ));
}

#[test]
fn added_graphs_are_recorded_after_their_tick() {
    let mut context = RenderContext::init(ContextOptions::default().with_step(2)).expect("init");
    let refreshes = Rc::new(Cell::new(0));

    for _ in 0..3 {
        let refreshes = Rc::clone(&refreshes);
        context.add_graph(move || Ok(counting_chart(&refreshes)));
    }
    assert!(context.graphs().is_empty(), "nothing runs before the first tick");

    let first = context.tick().expect("tick pending");
    assert_eq!(first.executed, 2);
    assert_eq!(context.graphs().len(), 2);

    context.run_until_idle();
    assert_eq!(context.graphs().len(), 3);
}

#[test]
fn update_graphs_refreshes_every_graph() {
    let mut context = RenderContext::init(ContextOptions::default()).expect("init");
    let first = Rc::new(Cell::new(0));
    let second = Rc::new(Cell::new(0));
    {
        let first = Rc::clone(&first);
        context.add_graph(move || Ok(counting_chart(&first)));
    }
    {
        let second = Rc::clone(&second);
        context.add_graph(move || Ok(counting_chart(&second)));
    }
    context.run_until_idle();

    context.update_graphs();
    context.update_graphs();
    assert_eq!(first.get(), 2);
    assert_eq!(second.get(), 2);
}

#[test]
fn window_resize_chains_onto_the_host_handler() {
    let mut context = RenderContext::init(ContextOptions::default()).expect("init");
    let refreshes = Rc::new(Cell::new(0));
    {
        let refreshes = Rc::clone(&refreshes);
        context.add_graph(move || Ok(counting_chart(&refreshes)));
    }
    context.run_until_idle();

    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut window = WindowHost::new();
    let log = Rc::clone(&calls);
    window.set_on_resize(move |_| log.borrow_mut().push("host"));
    context.bind_window(&mut window);
    let log = Rc::clone(&calls);
    context
        .bus()
        .on(RenderEvent::UpdateGraphs, "stub", move |_| {
            log.borrow_mut().push("update");
        });

    window.resize(1024.0, 768.0);
    assert_eq!(*calls.borrow(), vec!["host", "update"]);
    assert_eq!(refreshes.get(), 1);
}

#[test]
fn resize_rerenders_linegraphs_at_the_new_size() {
    let mut context = RenderContext::init(ContextOptions::default()).expect("init");
    let surface = Surface::new().with_rendered_size(500.0, 300.0).into_shared();
    let selection = Selection::single(surface.clone());
    selection.bind(&[Series::new(vec![
        DataPoint::new(0.0, 1.0),
        DataPoint::new(1.0, 3.0),
    ])]);

    context.add_graph(move || -> ChartResult<GraphHandle> {
        let mut graph = LineGraph::new();
        graph.apply(&selection)?;
        Ok(graph.into_shared())
    });
    context.flush().expect("render succeeds");

    let mut window = WindowHost::new();
    context.bind_window(&mut window);
    surface.borrow_mut().set_rendered_size(800.0, 300.0);
    window.resize(800.0, 300.0);

    let surface = surface.borrow();
    let background = surface.root().select(BACKGROUND_CLASS).expect("background");
    assert_eq!(background.attr("width"), Some("800"));
}

#[test]
fn flush_reports_the_first_failed_task() {
    let mut context = RenderContext::init(ContextOptions::default().with_step(4)).expect("init");
    let refreshes = Rc::new(Cell::new(0));
    {
        let refreshes = Rc::clone(&refreshes);
        context.add_graph(move || Ok(counting_chart(&refreshes)));
    }
    context.add_graph(|| -> ChartResult<GraphHandle> {
        Err(ChartError::EmptyData { axis: "x" })
    });
    context.add_graph(|| -> ChartResult<GraphHandle> {
        Err(ChartError::InvalidData("nan".to_owned()))
    });

    let err = context.flush().expect_err("two tasks failed");
    match err {
        ChartError::TaskFailed { sequence, message } => {
            assert_eq!(sequence, 1);
            assert!(message.contains("x domain"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(context.graphs().len(), 1);
    assert!(context.scheduler().failures().is_empty());
    context.flush().expect("nothing left to fail");
}

#[test]
fn debug_mode_records_render_timing() {
    let mut context =
        RenderContext::init(ContextOptions::default().with_debug(true)).expect("init");
    assert!(context.render_logs().total.is_none());

    let refreshes = Rc::new(Cell::new(0));
    context.add_graph(move || Ok(counting_chart(&refreshes)));
    assert!(context.render_logs().start.is_some());
    assert!(context.render_logs().end.is_none());

    context.run_until_idle();
    let logs = context.render_logs();
    assert!(logs.end.is_some());
    assert!(logs.total.is_some());
    context.log("render finished");
}

#[test]
fn timing_is_not_recorded_outside_debug_mode() {
    let mut context = RenderContext::init(ContextOptions::default()).expect("init");
    let refreshes = Rc::new(Cell::new(0));
    context.add_graph(move || Ok(counting_chart(&refreshes)));
    context.run_until_idle();
    assert_eq!(context.render_logs().total, None);
}

#[test]
fn teardown_drains_pending_work_and_releases_graphs() {
    let mut context = RenderContext::init(ContextOptions::default()).expect("init");
    let refreshes = Rc::new(Cell::new(0));
    for _ in 0..2 {
        let refreshes = Rc::clone(&refreshes);
        context.add_graph(move || Ok(counting_chart(&refreshes)));
    }

    let bus = context.bus().clone();
    assert_eq!(context.teardown(), 2);
    assert_eq!(bus.listener_count(RenderEvent::UpdateGraphs), 0);
    assert_eq!(bus.emit(RenderEvent::UpdateGraphs), 0);
    assert_eq!(refreshes.get(), 0);
}
