//! Listener that records structural events

use parking_lot::Mutex;
use typegraph::{Edge, Graph, GraphStructureListener, Vertex};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    VertexAdded(Vertex),
    VertexDeleted(Vertex),
    EdgeAdded(Edge),
    EdgeDeleted(Edge),
    MaxVertexCount(u32),
    MaxEdgeCount(u32),
}

/// Records every event; also notes whether deleted elements were still valid
#[derive(Default)]
pub struct EventRecorder {
    events: Mutex<Vec<Event>>,
    valid_during_delete: Mutex<Vec<bool>>,
}

impl EventRecorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn valid_during_delete(&self) -> Vec<bool> {
        self.valid_during_delete.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
        self.valid_during_delete.lock().clear();
    }
}

impl GraphStructureListener for EventRecorder {
    fn vertex_added(&self, _graph: &Graph, vertex: Vertex) {
        self.events.lock().push(Event::VertexAdded(vertex));
    }

    fn vertex_deleted(&self, graph: &Graph, vertex: Vertex) {
        self.valid_during_delete
            .lock()
            .push(graph.is_valid_vertex(vertex));
        self.events.lock().push(Event::VertexDeleted(vertex));
    }

    fn edge_added(&self, _graph: &Graph, edge: Edge) {
        self.events.lock().push(Event::EdgeAdded(edge));
    }

    fn edge_deleted(&self, graph: &Graph, edge: Edge) {
        self.valid_during_delete.lock().push(graph.is_valid_edge(edge));
        self.events.lock().push(Event::EdgeDeleted(edge));
    }

    fn max_vertex_count_increased(&self, _graph: &Graph, new_max: u32) {
        self.events.lock().push(Event::MaxVertexCount(new_max));
    }

    fn max_edge_count_increased(&self, _graph: &Graph, new_max: u32) {
        self.events.lock().push(Event::MaxEdgeCount(new_max));
    }
}
