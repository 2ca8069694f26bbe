// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Storage core: element stores, sequences, incidence lists and change tracking

pub mod element;
pub(crate) mod element_store;
pub mod free_index_list;
pub mod graph;
pub mod incidence;
pub mod iter;
pub mod listener;
pub(crate) mod sequence;
pub mod snapshot;
pub mod types;
pub mod value;
pub mod version;

pub use element::{Edge, EdgeDirection, EdgeEnd, GraphUid, Vertex};
pub use free_index_list::{AllocError, FreeIndexList};
pub use graph::{Graph, MAX_ELEMENT_COUNT};
pub use incidence::IncidenceFilter;
pub use iter::{EdgeIter, IncidenceIter, VertexIter};
pub use listener::{GraphStructureListener, ListenerHandle};
pub use snapshot::{EdgeEntry, GraphSnapshot, VertexEntry};
pub use types::GraphError;
pub use value::Value;
pub use version::VersionTracker;
