// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Borrowing iterators over sequences and incidence lists

use crate::schema::{EdgeTypeId, VertexTypeId};
use crate::storage::element::{Edge, Vertex};
use crate::storage::graph::Graph;
use crate::storage::incidence::IncidenceFilter;
use crate::storage::types::GraphError;

/// Vertices in sequence order, optionally restricted to a type
pub struct VertexIter<'g> {
    graph: &'g Graph,
    next: u32,
    filter: Option<(VertexTypeId, bool)>,
}

impl Iterator for VertexIter<'_> {
    type Item = Vertex;

    fn next(&mut self) -> Option<Vertex> {
        let graph = self.graph;
        while let Some(record) = graph.vertices.get(self.next) {
            let id = self.next;
            self.next = record.next;
            let matches = self
                .filter
                .map_or(true, |(wanted, exact)| graph.vertex_type_matches(record.type_id, wanted, exact));
            if matches {
                return Some(Vertex::new(graph.uid, id));
            }
        }
        None
    }
}

/// Edges in sequence order as normal views
pub struct EdgeIter<'g> {
    graph: &'g Graph,
    next: u32,
    filter: Option<(EdgeTypeId, bool)>,
}

impl Iterator for EdgeIter<'_> {
    type Item = Edge;

    fn next(&mut self) -> Option<Edge> {
        let graph = self.graph;
        while let Some(record) = graph.edges.get(self.next) {
            let id = self.next;
            self.next = record.next;
            let matches = self
                .filter
                .map_or(true, |(wanted, exact)| graph.edge_type_matches(record.type_id, wanted, exact));
            if matches {
                return Some(Edge::new(graph.uid, id as i32));
            }
        }
        None
    }
}

/// Incidences of one vertex in list order
pub struct IncidenceIter<'g> {
    graph: &'g Graph,
    next: i32,
    filter: IncidenceFilter,
}

impl Iterator for IncidenceIter<'_> {
    type Item = Edge;

    fn next(&mut self) -> Option<Edge> {
        if self.next == 0 {
            return None;
        }
        match self.graph.scan_forward(self.next, &self.filter) {
            Some(found) => {
                self.next = self.graph.incidence_next(found.id());
                Some(found)
            }
            None => {
                self.next = 0;
                None
            }
        }
    }
}

impl Graph {
    pub fn vertices(&self) -> VertexIter<'_> {
        VertexIter {
            graph: self,
            next: self.vertex_seq.first(),
            filter: None,
        }
    }

    pub fn vertices_of_type(&self, type_id: VertexTypeId, exact: bool) -> VertexIter<'_> {
        VertexIter {
            graph: self,
            next: self.vertex_seq.first(),
            filter: Some((type_id, exact)),
        }
    }

    pub fn edges(&self) -> EdgeIter<'_> {
        EdgeIter {
            graph: self,
            next: self.edge_seq.first(),
            filter: None,
        }
    }

    pub fn edges_of_type(&self, type_id: EdgeTypeId, exact: bool) -> EdgeIter<'_> {
        EdgeIter {
            graph: self,
            next: self.edge_seq.first(),
            filter: Some((type_id, exact)),
        }
    }

    pub fn incidences(&self, v: Vertex) -> Result<IncidenceIter<'_>, GraphError> {
        self.incidences_matching(v, IncidenceFilter::any())
    }

    pub fn incidences_matching(&self, v: Vertex, filter: IncidenceFilter) -> Result<IncidenceIter<'_>, GraphError> {
        Ok(IncidenceIter {
            graph: self,
            next: self.vertex_record(v)?.first_incidence,
            filter,
        })
    }
}
