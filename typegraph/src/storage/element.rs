// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Vertex and edge handles
//!
//! Handles are plain copyable values: an index into the owning graph's stores
//! plus the uid of that graph. An edge handle carries a signed id; `+n` is the
//! normal view of edge record `n` and `-n` is its reversed view. Both views are
//! first-class handles to the same record.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of one graph instance, used to reject elements of foreign graphs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GraphUid(u64);

impl GraphUid {
    pub(crate) fn next() -> Self {
        static NEXT_UID: AtomicU64 = AtomicU64::new(1);
        GraphUid(NEXT_UID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for GraphUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "graph_{}", self.0)
    }
}

/// Handle to a vertex slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vertex {
    graph: GraphUid,
    id: u32,
}

impl Vertex {
    pub(crate) fn new(graph: GraphUid, id: u32) -> Self {
        Self { graph, id }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn graph_uid(&self) -> GraphUid {
        self.graph
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.id)
    }
}

/// Handle to one directed view of an edge record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    graph: GraphUid,
    id: i32,
}

impl Edge {
    pub(crate) fn new(graph: GraphUid, id: i32) -> Self {
        Self { graph, id }
    }

    /// Signed id: positive for the normal view, negative for the reversed view
    pub fn id(&self) -> i32 {
        self.id
    }

    /// Id of the backing record
    pub fn normal_id(&self) -> u32 {
        self.id.unsigned_abs()
    }

    pub fn graph_uid(&self) -> GraphUid {
        self.graph
    }

    pub fn is_normal(&self) -> bool {
        self.id > 0
    }

    /// The normal view of this edge
    pub fn normal(&self) -> Edge {
        Edge {
            graph: self.graph,
            id: self.id.abs(),
        }
    }

    /// The opposite view of this edge
    pub fn reversed(&self) -> Edge {
        Edge {
            graph: self.graph,
            id: -self.id,
        }
    }

    /// Direction of this view as seen from its `this` vertex
    pub fn direction(&self) -> EdgeDirection {
        if self.is_normal() {
            EdgeDirection::Out
        } else {
            EdgeDirection::In
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_normal() {
            write!(f, "e{}", self.id)
        } else {
            write!(f, "-e{}", self.normal_id())
        }
    }
}

/// Direction filter for incidences at a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EdgeDirection {
    /// Edges starting at the vertex (normal views)
    Out,
    /// Edges ending at the vertex (reversed views)
    In,
    /// Either direction
    #[default]
    InOut,
}

impl EdgeDirection {
    pub fn matches(&self, edge: Edge) -> bool {
        match self {
            EdgeDirection::Out => edge.is_normal(),
            EdgeDirection::In => !edge.is_normal(),
            EdgeDirection::InOut => true,
        }
    }
}

/// One end of an edge record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeEnd {
    Alpha,
    Omega,
}

impl fmt::Display for EdgeEnd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeEnd::Alpha => write!(f, "alpha"),
            EdgeEnd::Omega => write!(f, "omega"),
        }
    }
}
