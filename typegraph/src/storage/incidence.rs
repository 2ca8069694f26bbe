// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Per-vertex incidence lists
//!
//! An incidence is identified by a signed edge id: `+n` sits in the list of
//! edge `n`'s alpha vertex, `-n` in the list of its omega vertex. The links are
//! stored in the edge record, so a list costs two ids per vertex plus four per
//! edge. A self-loop appears twice in the same list.

use crate::config::ReorderMode;
use crate::schema::EdgeTypeId;
use crate::storage::element::{Edge, EdgeDirection, EdgeEnd, Vertex};
use crate::storage::graph::Graph;
use crate::storage::types::GraphError;
use log::debug;
use std::cmp::Ordering;

/// Direction and type filter for incidence traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IncidenceFilter {
    pub direction: EdgeDirection,
    pub edge_type: Option<EdgeTypeId>,
    /// Match only `edge_type` itself, not its subtypes
    pub exact: bool,
}

impl IncidenceFilter {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn direction(direction: EdgeDirection) -> Self {
        Self {
            direction,
            ..Self::default()
        }
    }

    /// Edges of `edge_type` or any of its subtypes
    pub fn of_type(edge_type: EdgeTypeId) -> Self {
        Self {
            edge_type: Some(edge_type),
            ..Self::default()
        }
    }

    pub fn of_exact_type(edge_type: EdgeTypeId) -> Self {
        Self {
            edge_type: Some(edge_type),
            exact: true,
            ..Self::default()
        }
    }

    pub fn with_direction(mut self, direction: EdgeDirection) -> Self {
        self.direction = direction;
        self
    }
}

impl Graph {
    // ==================== Link primitives ====================

    pub(crate) fn incidence_next(&self, inc: i32) -> i32 {
        self.edges
            .get(inc.unsigned_abs())
            .map_or(0, |r| r.next_incidence(inc > 0))
    }

    pub(crate) fn incidence_prev(&self, inc: i32) -> i32 {
        self.edges
            .get(inc.unsigned_abs())
            .map_or(0, |r| r.prev_incidence(inc > 0))
    }

    fn set_incidence_next(&mut self, inc: i32, next: i32) {
        if let Some(record) = self.edges.get_mut(inc.unsigned_abs()) {
            record.set_next_incidence(inc > 0, next);
        }
    }

    fn set_incidence_prev(&mut self, inc: i32, prev: i32) {
        if let Some(record) = self.edges.get_mut(inc.unsigned_abs()) {
            record.set_prev_incidence(inc > 0, prev);
        }
    }

    fn set_first_incidence(&mut self, v: u32, inc: i32) {
        if let Some(record) = self.vertices.get_mut(v) {
            record.first_incidence = inc;
        }
    }

    fn set_last_incidence(&mut self, v: u32, inc: i32) {
        if let Some(record) = self.vertices.get_mut(v) {
            record.last_incidence = inc;
        }
    }

    /// Vertex whose list holds the incidence
    pub(crate) fn incidence_vertex(&self, inc: i32) -> u32 {
        self.edges
            .get(inc.unsigned_abs())
            .map_or(0, |r| r.this_vertex(inc > 0))
    }

    pub(crate) fn append_incidence(&mut self, v: u32, inc: i32) {
        let last = self.vertices.get(v).map_or(0, |r| r.last_incidence);
        self.set_incidence_prev(inc, last);
        self.set_incidence_next(inc, 0);
        if last == 0 {
            self.set_first_incidence(v, inc);
        } else {
            self.set_incidence_next(last, inc);
        }
        self.set_last_incidence(v, inc);
    }

    pub(crate) fn remove_incidence(&mut self, v: u32, inc: i32) {
        let prev = self.incidence_prev(inc);
        let next = self.incidence_next(inc);
        if prev == 0 {
            self.set_first_incidence(v, next);
        } else {
            self.set_incidence_next(prev, next);
        }
        if next == 0 {
            self.set_last_incidence(v, prev);
        } else {
            self.set_incidence_prev(next, prev);
        }
        self.set_incidence_prev(inc, 0);
        self.set_incidence_next(inc, 0);
    }

    fn insert_incidence_before(&mut self, v: u32, inc: i32, anchor: i32) {
        let prev = self.incidence_prev(anchor);
        self.set_incidence_prev(inc, prev);
        self.set_incidence_next(inc, anchor);
        self.set_incidence_prev(anchor, inc);
        if prev == 0 {
            self.set_first_incidence(v, inc);
        } else {
            self.set_incidence_next(prev, inc);
        }
    }

    fn insert_incidence_after(&mut self, v: u32, inc: i32, anchor: i32) {
        let next = self.incidence_next(anchor);
        self.set_incidence_prev(inc, anchor);
        self.set_incidence_next(inc, next);
        self.set_incidence_next(anchor, inc);
        if next == 0 {
            self.set_last_incidence(v, inc);
        } else {
            self.set_incidence_prev(next, inc);
        }
    }

    /// Bump the incidence version of `v`; the graph version is bumped by the caller
    pub(crate) fn incidence_list_modified(&mut self, v: u32) {
        if let Some(record) = self.vertices.get_mut(v) {
            record.incidence_version += 1;
        }
    }

    /// Rebuild the list of `v` in the given order
    pub(crate) fn relink_incidences(&mut self, v: u32, order: &[i32]) {
        self.set_first_incidence(v, 0);
        self.set_last_incidence(v, 0);
        for &inc in order {
            self.append_incidence(v, inc);
        }
    }

    fn incidence_matches(&self, inc: i32, filter: &IncidenceFilter) -> bool {
        let Some(record) = self.edges.get(inc.unsigned_abs()) else {
            return false;
        };
        let direction_ok = match filter.direction {
            EdgeDirection::Out => inc > 0,
            EdgeDirection::In => inc < 0,
            EdgeDirection::InOut => true,
        };
        direction_ok
            && filter
                .edge_type
                .map_or(true, |wanted| self.edge_type_matches(record.type_id, wanted, filter.exact))
    }

    /// First incidence at or after `inc` that passes `filter`
    pub(crate) fn scan_forward(&self, mut inc: i32, filter: &IncidenceFilter) -> Option<Edge> {
        while inc != 0 {
            if self.incidence_matches(inc, filter) {
                return self.edge_handle(inc);
            }
            inc = self.incidence_next(inc);
        }
        None
    }

    fn scan_backward(&self, mut inc: i32, filter: &IncidenceFilter) -> Option<Edge> {
        while inc != 0 {
            if self.incidence_matches(inc, filter) {
                return self.edge_handle(inc);
            }
            inc = self.incidence_prev(inc);
        }
        None
    }

    // ==================== Traversal ====================

    pub fn first_incidence(&self, v: Vertex) -> Result<Option<Edge>, GraphError> {
        Ok(self.edge_handle(self.vertex_record(v)?.first_incidence))
    }

    pub fn last_incidence(&self, v: Vertex) -> Result<Option<Edge>, GraphError> {
        Ok(self.edge_handle(self.vertex_record(v)?.last_incidence))
    }

    /// Next incidence in the list of `this(e)`
    pub fn next_incidence(&self, e: Edge) -> Result<Option<Edge>, GraphError> {
        self.edge_record(e)?;
        Ok(self.edge_handle(self.incidence_next(e.id())))
    }

    pub fn prev_incidence(&self, e: Edge) -> Result<Option<Edge>, GraphError> {
        self.edge_record(e)?;
        Ok(self.edge_handle(self.incidence_prev(e.id())))
    }

    pub fn first_incidence_matching(&self, v: Vertex, filter: &IncidenceFilter) -> Result<Option<Edge>, GraphError> {
        let first = self.vertex_record(v)?.first_incidence;
        Ok(self.scan_forward(first, filter))
    }

    pub fn last_incidence_matching(&self, v: Vertex, filter: &IncidenceFilter) -> Result<Option<Edge>, GraphError> {
        let last = self.vertex_record(v)?.last_incidence;
        Ok(self.scan_backward(last, filter))
    }

    pub fn next_incidence_matching(&self, e: Edge, filter: &IncidenceFilter) -> Result<Option<Edge>, GraphError> {
        self.edge_record(e)?;
        Ok(self.scan_forward(self.incidence_next(e.id()), filter))
    }

    pub fn prev_incidence_matching(&self, e: Edge, filter: &IncidenceFilter) -> Result<Option<Edge>, GraphError> {
        self.edge_record(e)?;
        Ok(self.scan_backward(self.incidence_prev(e.id()), filter))
    }

    /// Number of incidences at `v`; a self-loop counts twice
    pub fn degree(&self, v: Vertex) -> Result<usize, GraphError> {
        self.degree_with(v, &IncidenceFilter::any())
    }

    pub fn degree_in_direction(&self, v: Vertex, direction: EdgeDirection) -> Result<usize, GraphError> {
        self.degree_with(v, &IncidenceFilter::direction(direction))
    }

    pub fn degree_with(&self, v: Vertex, filter: &IncidenceFilter) -> Result<usize, GraphError> {
        let mut count = 0;
        let mut inc = self.vertex_record(v)?.first_incidence;
        while inc != 0 {
            if self.incidence_matches(inc, filter) {
                count += 1;
            }
            inc = self.incidence_next(inc);
        }
        Ok(count)
    }

    // ==================== Reordering ====================

    fn common_vertex(&self, x: Edge, y: Edge) -> Result<u32, GraphError> {
        self.edge_record(x)?;
        self.edge_record(y)?;
        let vertex = self.incidence_vertex(x.id());
        if vertex != self.incidence_vertex(y.id()) {
            return Err(GraphError::IncidenceMismatch {
                edge: x.to_string(),
                other: y.to_string(),
            });
        }
        Ok(vertex)
    }

    /// Move incidence `x` directly before `y`; both must be at the same vertex
    pub fn put_incidence_before(&mut self, x: Edge, y: Edge) -> Result<(), GraphError> {
        let v = self.common_vertex(x, y)?;
        if x.id() == y.id() || self.incidence_next(x.id()) == y.id() {
            return Ok(());
        }
        self.remove_incidence(v, x.id());
        self.insert_incidence_before(v, x.id(), y.id());
        self.incidence_list_modified(v);
        self.versions.graph_modified();
        debug!("{}: moved incidence {} before {} at v{}", self.uid, x, y, v);
        Ok(())
    }

    pub fn put_incidence_after(&mut self, x: Edge, y: Edge) -> Result<(), GraphError> {
        let v = self.common_vertex(x, y)?;
        if x.id() == y.id() || self.incidence_prev(x.id()) == y.id() {
            return Ok(());
        }
        self.remove_incidence(v, x.id());
        self.insert_incidence_after(v, x.id(), y.id());
        self.incidence_list_modified(v);
        self.versions.graph_modified();
        debug!("{}: moved incidence {} after {} at v{}", self.uid, x, y, v);
        Ok(())
    }

    pub fn is_before_incidence(&self, x: Edge, y: Edge) -> Result<bool, GraphError> {
        self.common_vertex(x, y)?;
        if x.id() == y.id() {
            return Ok(false);
        }
        let mut forward = self.incidence_next(x.id());
        let mut backward = self.incidence_prev(x.id());
        while forward != 0 || backward != 0 {
            if forward == y.id() {
                return Ok(true);
            }
            if backward == y.id() {
                return Ok(false);
            }
            if forward != 0 {
                forward = self.incidence_next(forward);
            }
            if backward != 0 {
                backward = self.incidence_prev(backward);
            }
        }
        Ok(false)
    }

    pub fn is_after_incidence(&self, x: Edge, y: Edge) -> Result<bool, GraphError> {
        if x.id() == y.id() {
            self.common_vertex(x, y)?;
            return Ok(false);
        }
        self.is_before_incidence(y, x)
    }

    /// Stable sort of the incidence list of `v`
    ///
    /// Returns whether the order changed; the incidence version is bumped only
    /// in that case. Fails while the graph is in [`ReorderMode::AppendOnly`].
    pub fn sort_incidences<F>(&mut self, v: Vertex, mut compare: F) -> Result<bool, GraphError>
    where
        F: FnMut(&Graph, Edge, Edge) -> Ordering,
    {
        if self.reorder_mode == ReorderMode::AppendOnly {
            return Err(GraphError::UnsupportedOperation(
                "sorting incidences is not allowed in append-only mode".to_string(),
            ));
        }
        let original: Vec<Edge> = self.incidences(v)?.collect();
        let mut sorted = original.clone();
        {
            let graph: &Graph = self;
            sorted.sort_by(|a, b| compare(graph, *a, *b));
        }
        if sorted == original {
            return Ok(false);
        }

        let order: Vec<i32> = sorted.iter().map(|e| e.id()).collect();
        self.relink_incidences(v.id(), &order);
        self.incidence_list_modified(v.id());
        self.versions.graph_modified();
        debug!("{}: sorted {} incidences at {}", self.uid, order.len(), v);
        Ok(true)
    }

    // ==================== Endpoint changes ====================

    /// Make `v` the start vertex of the view `e`
    pub fn set_alpha(&mut self, e: Edge, v: Vertex) -> Result<(), GraphError> {
        let end = if e.is_normal() { EdgeEnd::Alpha } else { EdgeEnd::Omega };
        self.move_end(e, end, v)
    }

    /// Make `v` the end vertex of the view `e`
    pub fn set_omega(&mut self, e: Edge, v: Vertex) -> Result<(), GraphError> {
        let end = if e.is_normal() { EdgeEnd::Omega } else { EdgeEnd::Alpha };
        self.move_end(e, end, v)
    }

    /// Move the incidence `e` itself to `v`
    pub fn set_this(&mut self, e: Edge, v: Vertex) -> Result<(), GraphError> {
        self.set_alpha(e, v)
    }

    /// Move the far side of the incidence `e` to `v`
    pub fn set_that(&mut self, e: Edge, v: Vertex) -> Result<(), GraphError> {
        self.set_omega(e, v)
    }

    /// Reattach one end of the edge record; the moved incidence goes to the
    /// end of the new vertex's list
    fn move_end(&mut self, e: Edge, end: EdgeEnd, v: Vertex) -> Result<(), GraphError> {
        let (type_id, old) = {
            let record = self.edge_record(e)?;
            let old = match end {
                EdgeEnd::Alpha => record.alpha,
                EdgeEnd::Omega => record.omega,
            };
            (record.type_id, old)
        };
        let vertex_type = self.vertex_record(v)?.type_id;
        self.check_end(type_id, end, vertex_type)?;
        if old == v.id() {
            return Ok(());
        }

        let id = e.normal_id();
        let inc = match end {
            EdgeEnd::Alpha => id as i32,
            EdgeEnd::Omega => -(id as i32),
        };
        self.remove_incidence(old, inc);
        if let Some(record) = self.edges.get_mut(id) {
            match end {
                EdgeEnd::Alpha => record.alpha = v.id(),
                EdgeEnd::Omega => record.omega = v.id(),
            }
        }
        self.append_incidence(v.id(), inc);
        self.incidence_list_modified(old);
        self.incidence_list_modified(v.id());
        self.versions.graph_modified();
        debug!("{}: moved {} of e{} from v{} to {}", self.uid, end, id, old, v);
        Ok(())
    }
}
