//! Shared schema and graph builders for integration tests

use std::sync::Arc;
use typegraph::{
    Edge, EdgeTypeDefinition, EdgeTypeId, Graph, GraphConfig, Schema, SchemaDefinition, Value,
    Vertex, VertexTypeDefinition, VertexTypeId,
};

/// Transit schema: stations and hubs joined by tracks and express lines
pub fn transit_schema() -> Arc<Schema> {
    let schema = SchemaDefinition::new("Transit")
        .vertex_type(
            VertexTypeDefinition::new("Station").attribute("name", Value::String(String::new())),
        )
        .vertex_type(
            VertexTypeDefinition::new("Hub")
                .extends("Station")
                .attribute("platforms", Value::Number(1.0)),
        )
        .edge_type(
            EdgeTypeDefinition::new("Track", "Station", "Station")
                .attribute("length", Value::Number(0.0)),
        )
        .edge_type(EdgeTypeDefinition::new("Express", "Hub", "Hub").extends("Track"))
        .build()
        .expect("transit schema is valid");
    Arc::new(schema)
}

/// A graph over the transit schema with the type ids resolved
pub struct GraphFixture {
    pub graph: Graph,
    pub station: VertexTypeId,
    pub hub: VertexTypeId,
    pub track: EdgeTypeId,
    pub express: EdgeTypeId,
}

impl GraphFixture {
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    /// Small initial capacities so tests exercise growth
    pub fn small() -> Self {
        Self::with_config(GraphConfig::with_capacities(4, 4))
    }

    pub fn with_config(config: GraphConfig) -> Self {
        let schema = transit_schema();
        let station = schema.vertex_type_id("Station").expect("Station");
        let hub = schema.vertex_type_id("Hub").expect("Hub");
        let track = schema.edge_type_id("Track").expect("Track");
        let express = schema.edge_type_id("Express").expect("Express");
        Self {
            graph: Graph::with_config(schema, config),
            station,
            hub,
            track,
            express,
        }
    }

    pub fn stations(&mut self, count: usize) -> Vec<Vertex> {
        (0..count)
            .map(|_| self.graph.create_vertex(self.station).expect("create station"))
            .collect()
    }

    pub fn track(&mut self, from: Vertex, to: Vertex) -> Edge {
        self.graph
            .create_edge(self.track, from, to)
            .expect("create track")
    }

    /// `count` stations joined in a ring: edge `i` runs from `v{i}` to `v{i % count + 1}`
    pub fn ring(count: usize) -> (Self, Vec<Vertex>, Vec<Edge>) {
        let mut fixture = Self::new();
        let stations = fixture.stations(count);
        let edges = (0..count)
            .map(|i| fixture.track(stations[i], stations[(i + 1) % count]))
            .collect();
        (fixture, stations, edges)
    }
}

/// Edge sequence as "e1 e2 ..."
pub fn edge_sequence(graph: &Graph) -> String {
    graph
        .edges()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Vertex sequence as "v1 v2 ..."
pub fn vertex_sequence(graph: &Graph) -> String {
    graph
        .vertices()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Signed incidence ids of `v` from first to last
pub fn incidence_ids(graph: &Graph, v: Vertex) -> Vec<i32> {
    graph
        .incidences(v)
        .expect("valid vertex")
        .map(|e| e.id())
        .collect()
}

/// Signed incidence ids of `v` walked from last to first, returned in forward order
pub fn incidence_ids_backward(graph: &Graph, v: Vertex) -> Vec<i32> {
    let mut ids = Vec::new();
    let mut cur = graph.last_incidence(v).expect("valid vertex");
    while let Some(e) = cur {
        ids.push(e.id());
        cur = graph.prev_incidence(e).expect("valid edge");
    }
    ids.reverse();
    ids
}
