// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Schema contract used by the storage core
//!
//! The storage core only needs three things from a schema: small integer type
//! tags, "is-a" answers for filtered traversal, and the vertex types accepted
//! at each end of an edge type. Attribute declarations ride along so elements
//! can be created with their default values.

pub mod graph_schema;
pub mod types;

pub use graph_schema::{EdgeType, Schema, VertexType};
pub use types::{
    AttributeDefinition, EdgeTypeDefinition, EdgeTypeId, SchemaDefinition, SchemaError,
    VertexTypeDefinition, VertexTypeId,
};
