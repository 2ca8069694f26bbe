// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Modification counters for optimistic change detection
//!
//! Counters only ever grow. A caller remembers a value and later asks whether
//! the structure moved on since then; magnitudes carry no further meaning.
//! Per-vertex incidence versions live in the vertex records.

use serde::{Deserialize, Serialize};

/// Graph-wide version counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionTracker {
    graph: u64,
    vertex_list: u64,
    edge_list: u64,
}

impl VersionTracker {
    pub fn graph_version(&self) -> u64 {
        self.graph
    }

    pub fn vertex_list_version(&self) -> u64 {
        self.vertex_list
    }

    pub fn edge_list_version(&self) -> u64 {
        self.edge_list
    }

    pub fn is_graph_modified(&self, old: u64) -> bool {
        self.graph != old
    }

    pub fn is_vertex_list_modified(&self, old: u64) -> bool {
        self.vertex_list != old
    }

    pub fn is_edge_list_modified(&self, old: u64) -> bool {
        self.edge_list != old
    }

    /// Any change, including attribute writes and incidence reorders
    pub(crate) fn graph_modified(&mut self) {
        self.graph += 1;
    }

    /// Vertex creation, deletion or reorder in the vertex sequence
    pub(crate) fn vertex_list_modified(&mut self) {
        self.vertex_list += 1;
        self.graph += 1;
    }

    /// Edge creation, deletion or reorder in the edge sequence
    pub(crate) fn edge_list_modified(&mut self) {
        self.edge_list += 1;
        self.graph += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_versions_are_independent() {
        let mut versions = VersionTracker::default();
        let start = versions;

        versions.edge_list_modified();
        assert!(versions.is_edge_list_modified(start.edge_list_version()));
        assert!(!versions.is_vertex_list_modified(start.vertex_list_version()));
        assert!(versions.is_graph_modified(start.graph_version()));

        let before_attr = versions;
        versions.graph_modified();
        assert!(versions.is_graph_modified(before_attr.graph_version()));
        assert_eq!(versions.edge_list_version(), before_attr.edge_list_version());
    }
}
