// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! The graph: element stores, allocators, sequences, versions and listeners
//!
//! Incidence list operations live in [`crate::storage::incidence`], iterators
//! in [`crate::storage::iter`] and snapshot support in
//! [`crate::storage::snapshot`]; all of them are further `impl Graph` blocks
//! over the state defined here.

use crate::config::{GraphConfig, ReorderMode};
use crate::schema::{EdgeTypeId, Schema, VertexTypeId};
use crate::storage::element::{Edge, EdgeEnd, GraphUid, Vertex};
use crate::storage::element_store::{EdgeRecord, ElementStore, VertexRecord};
use crate::storage::free_index_list::{FreeIndexList, MAX_CAPACITY};
use crate::storage::listener::{GraphStructureListener, ListenerHandle, ListenerRegistry};
use crate::storage::sequence::GlobalSequence;
use crate::storage::types::GraphError;
use crate::storage::value::Value;
use crate::storage::version::VersionTracker;
use log::{debug, info, trace};
use std::cmp::Ordering;
use std::fmt;
use std::sync::{Arc, Weak};

/// Largest number of slots a store can reach; edge ids must fit an `i32`
pub const MAX_ELEMENT_COUNT: u32 = MAX_CAPACITY;

/// Typed graph with array-backed vertex and edge storage
pub struct Graph {
    pub(crate) uid: GraphUid,
    pub(crate) schema: Arc<Schema>,
    pub(crate) config: GraphConfig,
    pub(crate) reorder_mode: ReorderMode,
    pub(crate) vertices: ElementStore<VertexRecord>,
    pub(crate) edges: ElementStore<EdgeRecord>,
    pub(crate) free_vertices: FreeIndexList,
    pub(crate) free_edges: FreeIndexList,
    pub(crate) vertex_seq: GlobalSequence,
    pub(crate) edge_seq: GlobalSequence,
    pub(crate) versions: VersionTracker,
    pub(crate) listeners: ListenerRegistry,
}

impl Graph {
    /// Create an empty graph with the default configuration
    pub fn new(schema: Arc<Schema>) -> Self {
        Self::with_config(schema, GraphConfig::default())
    }

    /// Create an empty graph with explicit capacities and policies
    pub fn with_config(schema: Arc<Schema>, config: GraphConfig) -> Self {
        let vertex_capacity = config.initial_vertex_capacity.min(MAX_ELEMENT_COUNT);
        let edge_capacity = config.initial_edge_capacity.min(MAX_ELEMENT_COUNT);
        let run_slots = config.min_run_slots.max(1);
        let uid = GraphUid::next();

        info!(
            "Created {} for schema '{}' ({} vertex slots, {} edge slots)",
            uid,
            schema.name(),
            vertex_capacity,
            edge_capacity
        );

        Self {
            uid,
            reorder_mode: config.reorder_mode,
            vertices: ElementStore::with_capacity(vertex_capacity),
            edges: ElementStore::with_capacity(edge_capacity),
            free_vertices: FreeIndexList::with_run_slots(vertex_capacity, run_slots),
            free_edges: FreeIndexList::with_run_slots(edge_capacity, run_slots),
            vertex_seq: GlobalSequence::default(),
            edge_seq: GlobalSequence::default(),
            versions: VersionTracker::default(),
            listeners: ListenerRegistry::default(),
            schema,
            config,
        }
    }

    pub fn uid(&self) -> GraphUid {
        self.uid
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn reorder_mode(&self) -> ReorderMode {
        self.reorder_mode
    }

    /// Switch the reordering policy, typically on transaction begin/end
    pub fn set_reorder_mode(&mut self, mode: ReorderMode) {
        if self.reorder_mode != mode {
            debug!("{}: reorder mode {:?} -> {:?}", self.uid, self.reorder_mode, mode);
            self.reorder_mode = mode;
        }
    }

    // ==================== Counts and versions ====================

    pub fn v_count(&self) -> u32 {
        self.vertex_seq.len()
    }

    pub fn e_count(&self) -> u32 {
        self.edge_seq.len()
    }

    /// Current vertex capacity; ids range over `1..=max_v_count()`
    pub fn max_v_count(&self) -> u32 {
        self.vertices.capacity()
    }

    pub fn max_e_count(&self) -> u32 {
        self.edges.capacity()
    }

    pub fn versions(&self) -> VersionTracker {
        self.versions
    }

    pub fn graph_version(&self) -> u64 {
        self.versions.graph_version()
    }

    pub fn is_graph_modified(&self, old: u64) -> bool {
        self.versions.is_graph_modified(old)
    }

    pub fn vertex_list_version(&self) -> u64 {
        self.versions.vertex_list_version()
    }

    pub fn is_vertex_list_modified(&self, old: u64) -> bool {
        self.versions.is_vertex_list_modified(old)
    }

    pub fn edge_list_version(&self) -> u64 {
        self.versions.edge_list_version()
    }

    pub fn is_edge_list_modified(&self, old: u64) -> bool {
        self.versions.is_edge_list_modified(old)
    }

    pub fn incidence_list_version(&self, v: Vertex) -> Result<u64, GraphError> {
        Ok(self.vertex_record(v)?.incidence_version)
    }

    pub fn is_incidence_list_modified(&self, v: Vertex, old: u64) -> Result<bool, GraphError> {
        Ok(self.incidence_list_version(v)? != old)
    }

    // ==================== Validity and lookup ====================

    /// Whether `v` belongs to this graph and its slot is occupied
    pub fn is_valid_vertex(&self, v: Vertex) -> bool {
        v.graph_uid() == self.uid && self.vertices.contains(v.id())
    }

    pub fn is_valid_edge(&self, e: Edge) -> bool {
        e.graph_uid() == self.uid && self.edges.contains(e.normal_id())
    }

    /// Handle for vertex id `id`, if that slot is occupied
    pub fn vertex(&self, id: u32) -> Option<Vertex> {
        self.vertices.contains(id).then(|| Vertex::new(self.uid, id))
    }

    /// Handle for signed edge id `id`, preserving its direction
    pub fn edge(&self, id: i32) -> Option<Edge> {
        self.edges
            .contains(id.unsigned_abs())
            .then(|| Edge::new(self.uid, id))
    }

    pub fn vertex_type(&self, v: Vertex) -> Result<VertexTypeId, GraphError> {
        Ok(self.vertex_record(v)?.type_id)
    }

    pub fn edge_type(&self, e: Edge) -> Result<EdgeTypeId, GraphError> {
        Ok(self.edge_record(e)?.type_id)
    }

    pub(crate) fn vertex_record(&self, v: Vertex) -> Result<&VertexRecord, GraphError> {
        if v.graph_uid() != self.uid {
            return Err(GraphError::ForeignElement {
                element: v.to_string(),
                graph: self.uid,
            });
        }
        self.vertices
            .get(v.id())
            .ok_or(GraphError::InvalidVertex(v.id()))
    }

    pub(crate) fn edge_record(&self, e: Edge) -> Result<&EdgeRecord, GraphError> {
        if e.graph_uid() != self.uid {
            return Err(GraphError::ForeignElement {
                element: e.to_string(),
                graph: self.uid,
            });
        }
        self.edges
            .get(e.normal_id())
            .ok_or(GraphError::InvalidEdge(e.id()))
    }

    pub(crate) fn edge_handle(&self, id: i32) -> Option<Edge> {
        (id != 0).then(|| Edge::new(self.uid, id))
    }

    pub(crate) fn vertex_handle(&self, id: u32) -> Option<Vertex> {
        (id != 0).then(|| Vertex::new(self.uid, id))
    }

    pub(crate) fn vertex_type_matches(&self, actual: VertexTypeId, wanted: VertexTypeId, exact: bool) -> bool {
        if exact {
            actual == wanted
        } else {
            self.schema.is_vertex_subtype(actual, wanted)
        }
    }

    pub(crate) fn edge_type_matches(&self, actual: EdgeTypeId, wanted: EdgeTypeId, exact: bool) -> bool {
        if exact {
            actual == wanted
        } else {
            self.schema.is_edge_subtype(actual, wanted)
        }
    }

    // ==================== Endpoints ====================

    /// Start vertex of the view `e`; for a reversed view this is the record's omega
    pub fn alpha(&self, e: Edge) -> Result<Vertex, GraphError> {
        let record = self.edge_record(e)?;
        Ok(Vertex::new(self.uid, record.this_vertex(e.is_normal())))
    }

    /// End vertex of the view `e`
    pub fn omega(&self, e: Edge) -> Result<Vertex, GraphError> {
        let record = self.edge_record(e)?;
        Ok(Vertex::new(self.uid, record.that_vertex(e.is_normal())))
    }

    /// Vertex whose incidence list holds `e`
    pub fn this(&self, e: Edge) -> Result<Vertex, GraphError> {
        self.alpha(e)
    }

    /// Vertex at the far side of the incidence `e`
    pub fn that(&self, e: Edge) -> Result<Vertex, GraphError> {
        self.omega(e)
    }

    // ==================== Creation ====================

    /// Create a vertex of a concrete type at the lowest free id
    pub fn create_vertex(&mut self, type_id: VertexTypeId) -> Result<Vertex, GraphError> {
        let defaults = self.vertex_defaults(type_id)?;
        let id = match self.free_vertices.allocate() {
            Some(id) => id,
            None => {
                self.grow_vertex_storage(self.max_v_count().saturating_add(1))?;
                self.free_vertices
                    .allocate()
                    .ok_or(GraphError::CapacityExhausted(self.max_v_count()))?
            }
        };
        Ok(self.insert_vertex(type_id, id, defaults))
    }

    /// Create a vertex at a caller-chosen id, growing capacity if needed
    pub fn create_vertex_with_id(&mut self, type_id: VertexTypeId, id: u32) -> Result<Vertex, GraphError> {
        let defaults = self.vertex_defaults(type_id)?;
        if id == 0 || id > MAX_ELEMENT_COUNT {
            return Err(GraphError::IdOutOfRange(id as i64));
        }
        if self.vertices.contains(id) {
            return Err(GraphError::IdInUse(id as i64));
        }
        if id > self.max_v_count() {
            self.grow_vertex_storage(id)?;
        }
        self.free_vertices.allocate_index(id)?;
        Ok(self.insert_vertex(type_id, id, defaults))
    }

    /// Create an edge from `alpha` to `omega`, appended to the edge sequence
    /// and to the end of both endpoints' incidence lists
    pub fn create_edge(&mut self, type_id: EdgeTypeId, alpha: Vertex, omega: Vertex) -> Result<Edge, GraphError> {
        let defaults = self.edge_defaults(type_id, alpha, omega)?;
        let id = match self.free_edges.allocate() {
            Some(id) => id,
            None => {
                self.grow_edge_storage(self.max_e_count().saturating_add(1))?;
                self.free_edges
                    .allocate()
                    .ok_or(GraphError::CapacityExhausted(self.max_e_count()))?
            }
        };
        Ok(self.insert_edge(type_id, id, alpha.id(), omega.id(), defaults))
    }

    /// Create an edge at a caller-chosen positive id
    pub fn create_edge_with_id(
        &mut self,
        type_id: EdgeTypeId,
        id: u32,
        alpha: Vertex,
        omega: Vertex,
    ) -> Result<Edge, GraphError> {
        let defaults = self.edge_defaults(type_id, alpha, omega)?;
        if id == 0 || id > MAX_ELEMENT_COUNT {
            return Err(GraphError::IdOutOfRange(id as i64));
        }
        if self.edges.contains(id) {
            return Err(GraphError::IdInUse(id as i64));
        }
        if id > self.max_e_count() {
            self.grow_edge_storage(id)?;
        }
        self.free_edges.allocate_index(id)?;
        Ok(self.insert_edge(type_id, id, alpha.id(), omega.id(), defaults))
    }

    fn vertex_defaults(&self, type_id: VertexTypeId) -> Result<Vec<Value>, GraphError> {
        let vertex_type = self
            .schema
            .vertex_type(type_id)
            .ok_or_else(|| GraphError::UnknownVertexType(format!("{:?}", type_id)))?;
        if vertex_type.is_abstract() {
            return Err(GraphError::AbstractType(vertex_type.name().to_string()));
        }
        Ok(vertex_type
            .attributes()
            .iter()
            .map(|a| a.default_value.clone())
            .collect())
    }

    fn edge_defaults(&self, type_id: EdgeTypeId, alpha: Vertex, omega: Vertex) -> Result<Vec<Value>, GraphError> {
        let edge_type = self
            .schema
            .edge_type(type_id)
            .ok_or_else(|| GraphError::UnknownEdgeType(format!("{:?}", type_id)))?;
        if edge_type.is_abstract() {
            return Err(GraphError::AbstractType(edge_type.name().to_string()));
        }
        let alpha_type = self.vertex_record(alpha)?.type_id;
        let omega_type = self.vertex_record(omega)?.type_id;
        self.check_end(type_id, EdgeEnd::Alpha, alpha_type)?;
        self.check_end(type_id, EdgeEnd::Omega, omega_type)?;
        Ok(edge_type
            .attributes()
            .iter()
            .map(|a| a.default_value.clone())
            .collect())
    }

    /// Fails unless `vertex_type` may sit at `end` of edges of `edge_type`
    pub(crate) fn check_end(
        &self,
        edge_type: EdgeTypeId,
        end: EdgeEnd,
        vertex_type: VertexTypeId,
    ) -> Result<(), GraphError> {
        let accepted = match end {
            EdgeEnd::Alpha => self.schema.accepts_alpha(edge_type, vertex_type),
            EdgeEnd::Omega => self.schema.accepts_omega(edge_type, vertex_type),
        };
        if accepted {
            return Ok(());
        }
        let type_name = |found: Option<&str>| found.unwrap_or("?").to_string();
        Err(GraphError::TypeConstraintViolation {
            edge_type: type_name(self.schema.edge_type(edge_type).map(|t| t.name())),
            end,
            vertex_type: type_name(self.schema.vertex_type(vertex_type).map(|t| t.name())),
        })
    }

    fn insert_vertex(&mut self, type_id: VertexTypeId, id: u32, attributes: Vec<Value>) -> Vertex {
        self.vertices.insert(id, VertexRecord::new(type_id, attributes));
        self.vertex_seq.append(&mut self.vertices, id);
        self.versions.vertex_list_modified();

        let vertex = Vertex::new(self.uid, id);
        trace!("{}: created vertex {} of type {:?}", self.uid, vertex, type_id);
        self.notify(|listener, graph| listener.vertex_added(graph, vertex));
        vertex
    }

    fn insert_edge(&mut self, type_id: EdgeTypeId, id: u32, alpha: u32, omega: u32, attributes: Vec<Value>) -> Edge {
        let signed = id as i32;
        self.edges.insert(id, EdgeRecord::new(type_id, alpha, omega, attributes));
        self.edge_seq.append(&mut self.edges, id);
        self.append_incidence(alpha, signed);
        self.append_incidence(omega, -signed);
        self.incidence_list_modified(alpha);
        if omega != alpha {
            self.incidence_list_modified(omega);
        }
        self.versions.edge_list_modified();

        let edge = Edge::new(self.uid, signed);
        trace!("{}: created edge {} (v{} -> v{}) of type {:?}", self.uid, edge, alpha, omega, type_id);
        self.notify(|listener, graph| listener.edge_added(graph, edge));
        edge
    }

    // ==================== Capacity ====================

    fn grown_capacity(&self, current: u32, min_capacity: u32) -> Result<u32, GraphError> {
        if min_capacity > MAX_ELEMENT_COUNT || current >= MAX_ELEMENT_COUNT {
            return Err(GraphError::CapacityExhausted(current));
        }
        let target = current
            .saturating_mul(2)
            .max(current.saturating_add(self.config.min_growth.max(1)))
            .max(min_capacity)
            .min(MAX_ELEMENT_COUNT);
        Ok(target)
    }

    fn grow_vertex_storage(&mut self, min_capacity: u32) -> Result<(), GraphError> {
        let current = self.max_v_count();
        let new_capacity = self.grown_capacity(current, min_capacity)?;
        self.free_vertices.expand(new_capacity - current)?;
        self.vertices.grow(new_capacity);
        debug!("{}: vertex capacity {} -> {}", self.uid, current, new_capacity);
        self.notify(|listener, graph| listener.max_vertex_count_increased(graph, new_capacity));
        Ok(())
    }

    fn grow_edge_storage(&mut self, min_capacity: u32) -> Result<(), GraphError> {
        let current = self.max_e_count();
        let new_capacity = self.grown_capacity(current, min_capacity)?;
        self.free_edges.expand(new_capacity - current)?;
        self.edges.grow(new_capacity);
        debug!("{}: edge capacity {} -> {}", self.uid, current, new_capacity);
        self.notify(|listener, graph| listener.max_edge_count_increased(graph, new_capacity));
        Ok(())
    }

    // ==================== Deletion ====================

    /// Delete a vertex together with every incident edge
    ///
    /// Listeners see `vertex_deleted` first, then `edge_deleted` for each
    /// incident edge in incidence order, each while the element is still valid.
    pub fn delete_vertex(&mut self, v: Vertex) -> Result<(), GraphError> {
        self.vertex_record(v)?;
        self.notify(|listener, graph| listener.vertex_deleted(graph, v));

        loop {
            let first = self.vertices.get(v.id()).map_or(0, |r| r.first_incidence);
            if first == 0 {
                break;
            }
            let edge = Edge::new(self.uid, first).normal();
            self.notify(|listener, graph| listener.edge_deleted(graph, edge));
            self.unlink_edge(edge.normal_id())?;
        }

        self.vertex_seq.remove(&mut self.vertices, v.id());
        self.vertices.remove(v.id());
        self.free_vertices.release(v.id())?;
        self.versions.vertex_list_modified();
        trace!("{}: deleted vertex {}", self.uid, v);
        Ok(())
    }

    /// Delete an edge; either view may be passed
    pub fn delete_edge(&mut self, e: Edge) -> Result<(), GraphError> {
        self.edge_record(e)?;
        let edge = e.normal();
        self.notify(|listener, graph| listener.edge_deleted(graph, edge));
        self.unlink_edge(edge.normal_id())
    }

    fn unlink_edge(&mut self, id: u32) -> Result<(), GraphError> {
        let Some((alpha, omega)) = self.edges.get(id).map(|r| (r.alpha, r.omega)) else {
            return Err(GraphError::InvalidEdge(id as i32));
        };
        let signed = id as i32;
        self.remove_incidence(alpha, signed);
        self.remove_incidence(omega, -signed);
        self.incidence_list_modified(alpha);
        if omega != alpha {
            self.incidence_list_modified(omega);
        }
        self.edge_seq.remove(&mut self.edges, id);
        self.edges.remove(id);
        self.free_edges.release(id)?;
        self.versions.edge_list_modified();
        trace!("{}: deleted edge e{}", self.uid, id);
        Ok(())
    }

    // ==================== Vertex sequence ====================

    pub fn first_vertex(&self) -> Option<Vertex> {
        self.vertex_handle(self.vertex_seq.first())
    }

    pub fn last_vertex(&self) -> Option<Vertex> {
        self.vertex_handle(self.vertex_seq.last())
    }

    pub fn next_vertex(&self, v: Vertex) -> Result<Option<Vertex>, GraphError> {
        self.vertex_record(v)?;
        Ok(self.vertex_handle(self.vertex_seq.next(&self.vertices, v.id())))
    }

    pub fn prev_vertex(&self, v: Vertex) -> Result<Option<Vertex>, GraphError> {
        self.vertex_record(v)?;
        Ok(self.vertex_handle(self.vertex_seq.prev(&self.vertices, v.id())))
    }

    /// First vertex of `type_id` (or a subtype unless `exact`)
    pub fn first_vertex_of_type(&self, type_id: VertexTypeId, exact: bool) -> Option<Vertex> {
        self.vertices_of_type(type_id, exact).next()
    }

    pub fn next_vertex_of_type(
        &self,
        v: Vertex,
        type_id: VertexTypeId,
        exact: bool,
    ) -> Result<Option<Vertex>, GraphError> {
        self.vertex_record(v)?;
        let mut cur = self.vertex_seq.next(&self.vertices, v.id());
        while let Some(record) = self.vertices.get(cur) {
            if self.vertex_type_matches(record.type_id, type_id, exact) {
                return Ok(self.vertex_handle(cur));
            }
            cur = record.next;
        }
        Ok(None)
    }

    /// Move `x` directly before `y` in the vertex sequence
    pub fn put_vertex_before(&mut self, x: Vertex, y: Vertex) -> Result<(), GraphError> {
        self.vertex_record(x)?;
        self.vertex_record(y)?;
        if self.vertex_seq.put_before(&mut self.vertices, x.id(), y.id()) {
            self.versions.vertex_list_modified();
            debug!("{}: moved {} before {}", self.uid, x, y);
        }
        Ok(())
    }

    /// Move `x` directly after `y` in the vertex sequence
    pub fn put_vertex_after(&mut self, x: Vertex, y: Vertex) -> Result<(), GraphError> {
        self.vertex_record(x)?;
        self.vertex_record(y)?;
        if self.vertex_seq.put_after(&mut self.vertices, x.id(), y.id()) {
            self.versions.vertex_list_modified();
            debug!("{}: moved {} after {}", self.uid, x, y);
        }
        Ok(())
    }

    pub fn is_vertex_before(&self, x: Vertex, y: Vertex) -> Result<bool, GraphError> {
        Ok(self.compare_vertices(x, y)? == Ordering::Less)
    }

    pub fn is_vertex_after(&self, x: Vertex, y: Vertex) -> Result<bool, GraphError> {
        self.vertex_record(x)?;
        self.vertex_record(y)?;
        Ok(self.vertex_seq.is_after(&self.vertices, x.id(), y.id()))
    }

    /// Order of two vertices in the vertex sequence
    pub fn compare_vertices(&self, x: Vertex, y: Vertex) -> Result<Ordering, GraphError> {
        self.vertex_record(x)?;
        self.vertex_record(y)?;
        if x.id() == y.id() {
            return Ok(Ordering::Equal);
        }
        if self.vertex_seq.is_before(&self.vertices, x.id(), y.id()) {
            Ok(Ordering::Less)
        } else {
            Ok(Ordering::Greater)
        }
    }

    // ==================== Edge sequence ====================

    /// First edge in the edge sequence, as its normal view
    pub fn first_edge(&self) -> Option<Edge> {
        self.edge_handle(self.edge_seq.first() as i32)
    }

    pub fn last_edge(&self) -> Option<Edge> {
        self.edge_handle(self.edge_seq.last() as i32)
    }

    /// Successor of `e` in the edge sequence; the direction of `e` is ignored
    pub fn next_edge(&self, e: Edge) -> Result<Option<Edge>, GraphError> {
        self.edge_record(e)?;
        Ok(self.edge_handle(self.edge_seq.next(&self.edges, e.normal_id()) as i32))
    }

    pub fn prev_edge(&self, e: Edge) -> Result<Option<Edge>, GraphError> {
        self.edge_record(e)?;
        Ok(self.edge_handle(self.edge_seq.prev(&self.edges, e.normal_id()) as i32))
    }

    pub fn first_edge_of_type(&self, type_id: EdgeTypeId, exact: bool) -> Option<Edge> {
        self.edges_of_type(type_id, exact).next()
    }

    pub fn next_edge_of_type(&self, e: Edge, type_id: EdgeTypeId, exact: bool) -> Result<Option<Edge>, GraphError> {
        self.edge_record(e)?;
        let mut cur = self.edge_seq.next(&self.edges, e.normal_id());
        while let Some(record) = self.edges.get(cur) {
            if self.edge_type_matches(record.type_id, type_id, exact) {
                return Ok(self.edge_handle(cur as i32));
            }
            cur = record.next;
        }
        Ok(None)
    }

    /// Move the record of `x` directly before the record of `y` in the edge
    /// sequence; both views of one edge share a position, so that case is a no-op
    pub fn put_edge_before_in_graph(&mut self, x: Edge, y: Edge) -> Result<(), GraphError> {
        self.edge_record(x)?;
        self.edge_record(y)?;
        if self.edge_seq.put_before(&mut self.edges, x.normal_id(), y.normal_id()) {
            self.versions.edge_list_modified();
            debug!("{}: moved {} before {} in edge sequence", self.uid, x.normal(), y.normal());
        }
        Ok(())
    }

    pub fn put_edge_after_in_graph(&mut self, x: Edge, y: Edge) -> Result<(), GraphError> {
        self.edge_record(x)?;
        self.edge_record(y)?;
        if self.edge_seq.put_after(&mut self.edges, x.normal_id(), y.normal_id()) {
            self.versions.edge_list_modified();
            debug!("{}: moved {} after {} in edge sequence", self.uid, x.normal(), y.normal());
        }
        Ok(())
    }

    pub fn is_edge_before_in_graph(&self, x: Edge, y: Edge) -> Result<bool, GraphError> {
        Ok(self.compare_edges(x, y)? == Ordering::Less)
    }

    pub fn is_edge_after_in_graph(&self, x: Edge, y: Edge) -> Result<bool, GraphError> {
        Ok(self.compare_edges(x, y)? == Ordering::Greater)
    }

    /// Order of two edge views: by sequence position, then normal before reversed
    pub fn compare_edges(&self, x: Edge, y: Edge) -> Result<Ordering, GraphError> {
        self.edge_record(x)?;
        self.edge_record(y)?;
        if x.normal_id() == y.normal_id() {
            return Ok(y.is_normal().cmp(&x.is_normal()));
        }
        if self.edge_seq.is_before(&self.edges, x.normal_id(), y.normal_id()) {
            Ok(Ordering::Less)
        } else {
            Ok(Ordering::Greater)
        }
    }

    // ==================== Attributes ====================

    pub fn vertex_attribute(&self, v: Vertex, name: &str) -> Result<&Value, GraphError> {
        let record = self.vertex_record(v)?;
        let index = self.vertex_attribute_index(record.type_id, name)?;
        record.attributes.get(index).ok_or_else(|| self.missing_vertex_attribute(record.type_id, name))
    }

    /// Overwrite a vertex attribute; bumps only the graph version
    pub fn set_vertex_attribute(&mut self, v: Vertex, name: &str, value: impl Into<Value>) -> Result<(), GraphError> {
        let type_id = self.vertex_record(v)?.type_id;
        let index = self.vertex_attribute_index(type_id, name)?;
        let missing = self.missing_vertex_attribute(type_id, name);
        let slot = self
            .vertices
            .get_mut(v.id())
            .and_then(|r| r.attributes.get_mut(index))
            .ok_or(missing)?;
        *slot = value.into();
        self.versions.graph_modified();
        Ok(())
    }

    /// Attribute of the edge record; both views read the same value
    pub fn edge_attribute(&self, e: Edge, name: &str) -> Result<&Value, GraphError> {
        let record = self.edge_record(e)?;
        let index = self.edge_attribute_index(record.type_id, name)?;
        record.attributes.get(index).ok_or_else(|| self.missing_edge_attribute(record.type_id, name))
    }

    pub fn set_edge_attribute(&mut self, e: Edge, name: &str, value: impl Into<Value>) -> Result<(), GraphError> {
        let type_id = self.edge_record(e)?.type_id;
        let index = self.edge_attribute_index(type_id, name)?;
        let missing = self.missing_edge_attribute(type_id, name);
        let slot = self
            .edges
            .get_mut(e.normal_id())
            .and_then(|r| r.attributes.get_mut(index))
            .ok_or(missing)?;
        *slot = value.into();
        self.versions.graph_modified();
        Ok(())
    }

    fn vertex_attribute_index(&self, type_id: VertexTypeId, name: &str) -> Result<usize, GraphError> {
        self.schema
            .vertex_type(type_id)
            .filter(|_| !name.is_empty())
            .and_then(|t| t.attribute_index(name))
            .ok_or_else(|| self.missing_vertex_attribute(type_id, name))
    }

    fn edge_attribute_index(&self, type_id: EdgeTypeId, name: &str) -> Result<usize, GraphError> {
        self.schema
            .edge_type(type_id)
            .filter(|_| !name.is_empty())
            .and_then(|t| t.attribute_index(name))
            .ok_or_else(|| self.missing_edge_attribute(type_id, name))
    }

    fn missing_vertex_attribute(&self, type_id: VertexTypeId, name: &str) -> GraphError {
        GraphError::NoSuchAttribute {
            type_name: self
                .schema
                .vertex_type(type_id)
                .map_or_else(|| format!("{:?}", type_id), |t| t.name().to_string()),
            attribute: name.to_string(),
        }
    }

    fn missing_edge_attribute(&self, type_id: EdgeTypeId, name: &str) -> GraphError {
        GraphError::NoSuchAttribute {
            type_name: self
                .schema
                .edge_type(type_id)
                .map_or_else(|| format!("{:?}", type_id), |t| t.name().to_string()),
            attribute: name.to_string(),
        }
    }

    // ==================== Listeners ====================

    /// Register a listener; the graph keeps only a weak reference
    pub fn add_listener<L>(&mut self, listener: &Arc<L>) -> ListenerHandle
    where
        L: GraphStructureListener + 'static,
    {
        let shared: Arc<dyn GraphStructureListener> = listener.clone();
        let weak: Weak<dyn GraphStructureListener> = Arc::downgrade(&shared);
        self.listeners.add(weak)
    }

    pub fn remove_listener(&mut self, handle: ListenerHandle) -> bool {
        self.listeners.remove(handle)
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Number of registered listeners that are still alive
    pub fn listener_count(&self) -> usize {
        self.listeners.live_count()
    }

    pub(crate) fn notify<F>(&mut self, event: F)
    where
        F: Fn(&dyn GraphStructureListener, &Graph),
    {
        let live = self.listeners.collect_live();
        for listener in &live {
            event(listener.as_ref(), self);
        }
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("uid", &self.uid)
            .field("schema", &self.schema.name())
            .field("v_count", &self.v_count())
            .field("e_count", &self.e_count())
            .field("max_v_count", &self.max_v_count())
            .field("max_e_count", &self.max_e_count())
            .field("versions", &self.versions)
            .field("listeners", &self.listeners)
            .finish()
    }
}
