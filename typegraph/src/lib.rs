// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! TypeGraph - array-backed storage core for typed graphs
//!
//! TypeGraph keeps vertices and edges as densely packed, index-addressed
//! records. Every vertex owns an ordered incidence list, every edge is a single
//! record seen through two signed handles (normal and reversed), and a set of
//! version counters lets callers detect changes without snapshots.
//!
//! # Features
//!
//! - **Run-length index allocation**: lowest-free-first id reuse in O(runs) space
//! - **Global sequences**: reorderable graph-wide order of vertices and of edges
//! - **Incidence lists**: per-vertex doubly linked, filterable by direction and type
//! - **Edge duality**: `+n` and `-n` address the same stored edge
//! - **Versioning**: graph, vertex-list, edge-list and per-vertex incidence versions
//! - **Structure listeners**: weakly held, pruned automatically
//!
//! # Usage
//!
//! ```ignore
//! use typegraph::{Graph, SchemaDefinition, VertexTypeDefinition, EdgeTypeDefinition};
//!
//! let schema = SchemaDefinition::new("Roads")
//!     .vertex_type(VertexTypeDefinition::new("City"))
//!     .edge_type(EdgeTypeDefinition::new("Road", "City", "City"))
//!     .build()?;
//! let city = schema.vertex_type_id("City").unwrap();
//! let road = schema.edge_type_id("Road").unwrap();
//!
//! let mut graph = Graph::new(schema.into());
//! let a = graph.create_vertex(city)?;
//! let b = graph.create_vertex(city)?;
//! let e = graph.create_edge(road, a, b)?;
//! assert_eq!(graph.alpha(e.reversed())?, b);
//! ```

pub mod config;
pub mod schema;
pub mod storage;

pub use config::{ConfigError, GraphConfig, ReorderMode};
pub use schema::{
    AttributeDefinition, EdgeType, EdgeTypeDefinition, EdgeTypeId, Schema, SchemaDefinition,
    SchemaError, VertexType, VertexTypeDefinition, VertexTypeId,
};
pub use storage::{
    AllocError, Edge, EdgeDirection, EdgeEnd, FreeIndexList, Graph, GraphError, GraphSnapshot,
    GraphStructureListener, GraphUid, IncidenceFilter, ListenerHandle, Value, VersionTracker,
    Vertex, MAX_ELEMENT_COUNT,
};

/// TypeGraph version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// TypeGraph crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
