// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for graph operations
//!
//! Every failing operation leaves the graph untouched: validation happens
//! before any link, record or counter changes.

use crate::schema::SchemaError;
use crate::storage::element::{EdgeEnd, GraphUid};
use crate::storage::free_index_list::AllocError;
use thiserror::Error;

/// Error types for graph operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Vertex {0} is not valid")]
    InvalidVertex(u32),

    #[error("Edge {0} is not valid")]
    InvalidEdge(i32),

    #[error("Element {element} does not belong to {graph}")]
    ForeignElement { element: String, graph: GraphUid },

    #[error("Unknown vertex type: {0}")]
    UnknownVertexType(String),

    #[error("Unknown edge type: {0}")]
    UnknownEdgeType(String),

    #[error("Cannot instantiate abstract type '{0}'")]
    AbstractType(String),

    #[error("Vertex type '{vertex_type}' is not allowed at the {end} of edge type '{edge_type}'")]
    TypeConstraintViolation {
        edge_type: String,
        end: EdgeEnd,
        vertex_type: String,
    },

    #[error("Type '{type_name}' has no attribute '{attribute}'")]
    NoSuchAttribute { type_name: String, attribute: String },

    #[error("Operation not supported: {0}")]
    UnsupportedOperation(String),

    #[error("Incidences {edge} and {other} are not at the same vertex")]
    IncidenceMismatch { edge: String, other: String },

    #[error("Element id {0} is out of range")]
    IdOutOfRange(i64),

    #[error("Element id {0} is already in use")]
    IdInUse(i64),

    #[error("Element capacity exhausted at {0} slots")]
    CapacityExhausted(u32),

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Allocator error: {0}")]
    Allocation(#[from] AllocError),
}
