//! Tests for structural change notification

#[path = "testutils/mod.rs"]
mod testutils;

use parking_lot::Mutex;
use std::sync::Arc;
use testutils::event_recorder::{Event, EventRecorder};
use testutils::graph_fixture::GraphFixture;
use typegraph::{Graph, GraphStructureListener, Vertex};

/// Appends its name to a log shared with other listeners
struct NamedListener {
    name: &'static str,
    log: Arc<Mutex<Vec<(&'static str, Vertex)>>>,
}

impl GraphStructureListener for NamedListener {
    fn vertex_added(&self, _graph: &Graph, vertex: Vertex) {
        self.log.lock().push((self.name, vertex));
    }
}

#[test]
fn test_creation_events_in_order() {
    let mut fixture = GraphFixture::new();
    let recorder = Arc::new(EventRecorder::default());
    fixture.graph.add_listener(&recorder);

    let v = fixture.stations(2);
    let e = fixture.track(v[0], v[1]);

    assert_eq!(
        recorder.events(),
        vec![
            Event::VertexAdded(v[0]),
            Event::VertexAdded(v[1]),
            Event::EdgeAdded(e),
        ]
    );
}

#[test]
fn test_growth_is_announced_before_the_new_element() {
    let mut fixture = GraphFixture::small();
    let recorder = Arc::new(EventRecorder::default());
    let v = fixture.stations(4);
    fixture.graph.add_listener(&recorder);

    let fifth = fixture.graph.create_vertex(fixture.station).unwrap();
    let max = fixture.graph.max_v_count();
    assert!(max > 4);
    assert_eq!(
        recorder.events(),
        vec![Event::MaxVertexCount(max), Event::VertexAdded(fifth)]
    );

    recorder.clear();
    for i in 0..4 {
        fixture.track(v[i], fifth);
    }
    assert!(recorder.events().iter().all(|e| matches!(e, Event::EdgeAdded(_))));
    fixture.track(fifth, v[0]);
    assert!(matches!(recorder.events()[4], Event::MaxEdgeCount(_)));
    assert_eq!(recorder.events().len(), 6);
}

#[test]
fn test_vertex_deletion_order_and_validity() {
    let mut fixture = GraphFixture::new();
    let v = fixture.stations(3);
    let e1 = fixture.track(v[0], v[1]);
    let e2 = fixture.track(v[2], v[0]);
    let e3 = fixture.track(v[0], v[0]);

    let recorder = Arc::new(EventRecorder::default());
    fixture.graph.add_listener(&recorder);
    fixture.graph.delete_vertex(v[0]).unwrap();

    assert_eq!(
        recorder.events(),
        vec![
            Event::VertexDeleted(v[0]),
            Event::EdgeDeleted(e1),
            Event::EdgeDeleted(e2),
            Event::EdgeDeleted(e3),
        ]
    );
    assert_eq!(recorder.valid_during_delete(), vec![true; 4]);
    assert!(!fixture.graph.is_valid_vertex(v[0]));
    assert_eq!(fixture.graph.e_count(), 0);
}

#[test]
fn test_edge_deletion_reports_normal_view() {
    let mut fixture = GraphFixture::new();
    let v = fixture.stations(2);
    let e = fixture.track(v[0], v[1]);
    let recorder = Arc::new(EventRecorder::default());
    fixture.graph.add_listener(&recorder);

    fixture.graph.delete_edge(e.reversed()).unwrap();
    assert_eq!(recorder.events(), vec![Event::EdgeDeleted(e)]);
    assert_eq!(recorder.valid_during_delete(), vec![true]);
}

#[test]
fn test_dropped_listener_is_pruned() {
    let mut fixture = GraphFixture::new();
    let kept = Arc::new(EventRecorder::default());
    let dropped = Arc::new(EventRecorder::default());
    fixture.graph.add_listener(&kept);
    fixture.graph.add_listener(&dropped);
    assert_eq!(fixture.graph.listener_count(), 2);

    drop(dropped);
    assert_eq!(fixture.graph.listener_count(), 1);

    fixture.stations(1);
    assert_eq!(fixture.graph.listener_count(), 1);
    assert_eq!(kept.events().len(), 1);
}

#[test]
fn test_remove_listener() {
    let mut fixture = GraphFixture::new();
    let recorder = Arc::new(EventRecorder::default());
    let handle = fixture.graph.add_listener(&recorder);
    fixture.stations(1);

    assert!(fixture.graph.remove_listener(handle));
    assert!(!fixture.graph.remove_listener(handle));
    fixture.stations(1);
    assert_eq!(recorder.events().len(), 1);
    assert_eq!(fixture.graph.listener_count(), 0);

    fixture.graph.add_listener(&recorder);
    fixture.graph.clear_listeners();
    fixture.stations(1);
    assert_eq!(recorder.events().len(), 1);
}

#[test]
fn test_failed_operations_are_silent() {
    let mut fixture = GraphFixture::new();
    let v = fixture.stations(1);
    let recorder = Arc::new(EventRecorder::default());
    fixture.graph.add_listener(&recorder);

    let _ = fixture.graph.create_edge(fixture.express, v[0], v[0]);
    fixture.graph.delete_vertex(v[0]).unwrap();
    let _ = fixture.graph.delete_vertex(v[0]);

    assert_eq!(recorder.events(), vec![Event::VertexDeleted(v[0])]);
}

#[test]
fn test_listeners_called_in_registration_order() {
    let mut fixture = GraphFixture::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let named = |name| {
        Arc::new(NamedListener {
            name,
            log: Arc::clone(&log),
        })
    };
    let first = named("first");
    let second = named("second");
    let third = named("third");
    fixture.graph.add_listener(&first);
    let second_handle = fixture.graph.add_listener(&second);
    fixture.graph.add_listener(&third);

    let v = fixture.stations(1)[0];
    assert_eq!(
        log.lock().clone(),
        vec![("first", v), ("second", v), ("third", v)]
    );

    log.lock().clear();
    fixture.graph.remove_listener(second_handle);
    let fourth = named("fourth");
    fixture.graph.add_listener(&fourth);

    let w = fixture.stations(1)[0];
    assert_eq!(
        log.lock().clone(),
        vec![("first", w), ("third", w), ("fourth", w)]
    );
}
