//! End-to-end checks through the crate's public API: viewport, graph,
//! connection engine and compiler used together the way the editor uses
//! them.
//!
//! Run with: cargo test --test canvas_scenarios

use workflow_canvas::canvas::geometry::{connection_paths, CubicBezier, NodeMetrics};
use workflow_canvas::catalog::TaskCatalog;
use workflow_canvas::compiler::{self, InstructionCompiler};
use workflow_canvas::config::{CompileOrder, EditorConfig};
use workflow_canvas::connection::{ConnectOutcome, ConnectionEngine};
use workflow_canvas::drag::DragState;
use workflow_canvas::error::CompileError;
use workflow_canvas::graph::WorkflowGraph;
use workflow_canvas::models::{ConnectionType, Point};
use workflow_canvas::viewport::CanvasViewport;

fn catalog_graph() -> (WorkflowGraph, String, String, String) {
    let catalog = TaskCatalog::default();
    let mut graph = WorkflowGraph::new();
    let search = graph.add_node(catalog.get("search").unwrap(), Point::new(0.0, 0.0));
    let analyze = graph.add_node(catalog.get("analyze").unwrap(), Point::new(300.0, 0.0));
    let notify = graph.add_node(catalog.get("notify").unwrap(), Point::new(600.0, 0.0));
    (graph, search, analyze, notify)
}

#[test]
fn drop_placement_uses_inverse_transform() {
    let mut viewport = CanvasViewport::new();
    viewport.pan(Point::new(40.0, 25.0));
    viewport.zoom_by(0.9, None);

    let screen = Point::new(100.0, 50.0);
    let position = viewport.to_canvas(screen);
    let catalog = TaskCatalog::default();
    let mut graph = WorkflowGraph::new();
    let id = graph.add_node(catalog.get("summarize").unwrap(), position);

    let node = graph.node(&id).unwrap();
    assert_eq!(node.position, position);
    let back = viewport.to_screen(node.position);
    assert!(back.distance_to(screen) < 1e-9);
}

#[test]
fn engine_gesture_then_compile() {
    let (mut graph, search, analyze, notify) = catalog_graph();
    let metrics = NodeMetrics::default();
    let viewport = CanvasViewport::new();
    let engine = ConnectionEngine::default();

    for (source, target) in [(&search, &analyze), (&analyze, &notify)] {
        let mut drag = DragState::Idle;
        assert!(engine.begin(&mut drag, &graph, &metrics, source));
        let input = metrics.input_anchor(graph.node(target).unwrap().position);
        engine.track(&mut drag, &mut graph, &viewport, input, Some(target.as_str()));
        match engine.finish(&mut drag, &mut graph, Some(target.as_str())) {
            ConnectOutcome::Connected { target_id, .. } => assert_eq!(&target_id, target),
            ConnectOutcome::Cancelled => panic!("expected a connection"),
        }
        assert!(drag.is_idle());
    }

    assert_eq!(
        compiler::compile(&graph),
        "Create a workflow that: \
         Search: Search the web for relevant information → \
         Analyze: Analyze the collected data and extract insights (using data from: Search) → \
         Notify: Send the result to a channel (using data from: Analyze)"
    );
}

#[test]
fn self_loop_gesture_is_silently_cancelled() {
    let (mut graph, search, _, _) = catalog_graph();
    let engine = ConnectionEngine::default();
    let mut drag = DragState::Idle;
    engine.begin(&mut drag, &graph, &NodeMetrics::default(), &search);

    let outcome = engine.finish(&mut drag, &mut graph, Some(search.as_str()));
    assert_eq!(outcome, ConnectOutcome::Cancelled);
    assert!(graph.connections().is_empty());
    assert!(drag.is_idle());
}

#[test]
fn rendered_paths_follow_live_positions() {
    let (mut graph, search, analyze, _) = catalog_graph();
    let metrics = NodeMetrics::default();
    graph
        .add_connection(&search, &analyze, ConnectionType::Data)
        .unwrap();

    let before = connection_paths(&graph, &metrics, None)[0].curve;
    graph.move_node(&analyze, Point::new(300.0, 200.0));
    let after = connection_paths(&graph, &metrics, None)[0].curve;

    assert_eq!(before.start, after.start);
    assert_eq!(after.end, Point::new(300.0, 250.0));
    assert_eq!(
        after,
        CubicBezier::between(Point::new(200.0, 50.0), Point::new(300.0, 250.0))
    );
}

#[test]
fn topological_order_lists_sources_first() {
    let catalog = TaskCatalog::default();
    let mut graph = WorkflowGraph::new();
    // Inserted target-first.
    let notify = graph.add_node(catalog.get("notify").unwrap(), Point::new(600.0, 0.0));
    let search = graph.add_node(catalog.get("search").unwrap(), Point::new(0.0, 0.0));
    graph
        .add_connection(&search, &notify, ConnectionType::Data)
        .unwrap();

    let insertion = InstructionCompiler::default().compile(&graph).unwrap();
    assert!(insertion.starts_with("Create a workflow that: Notify"));

    let config = EditorConfig::from_json(r#"{"compileOrder": "topological"}"#).unwrap();
    let topo = InstructionCompiler::new(config.compile_order)
        .compile(&graph)
        .unwrap();
    assert!(topo.starts_with("Create a workflow that: Search"));
    assert!(topo.ends_with("(using data from: Search)"));
}

#[test]
fn topological_order_reports_cycles() {
    let (mut graph, search, analyze, notify) = catalog_graph();
    graph.add_connection(&search, &analyze, ConnectionType::Data);
    graph.add_connection(&analyze, &search, ConnectionType::Control);
    graph.add_connection(&analyze, &notify, ConnectionType::Data);

    let err = InstructionCompiler::new(CompileOrder::Topological)
        .compile(&graph)
        .unwrap_err();
    assert_eq!(err, CompileError::Cycle(vec![search, analyze]));
}

#[test]
fn cascade_delete_keeps_unrelated_connections() {
    let (mut graph, search, analyze, notify) = catalog_graph();
    graph.add_connection(&search, &analyze, ConnectionType::Data);
    let kept = graph
        .add_connection(&search, &notify, ConnectionType::Error)
        .unwrap();

    graph.delete_node(&analyze);
    assert_eq!(graph.len(), 2);
    assert_eq!(graph.connections().len(), 1);
    assert_eq!(graph.connections()[0].id, kept);
}
