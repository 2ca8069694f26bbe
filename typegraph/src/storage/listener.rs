// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Structural change notification
//!
//! The graph only holds listeners weakly. A listener stays registered while
//! its owner keeps the `Arc` alive; dead entries are dropped the next time a
//! notification goes out, and [`ListenerRegistry::live_count`] never counts
//! them.

use crate::storage::element::{Edge, Vertex};
use crate::storage::graph::Graph;
use log::trace;
use std::fmt;
use std::sync::{Arc, Weak};

/// Observer of structural graph changes
///
/// Every method has an empty default, so implementors override only the
/// events they care about. Calls are synchronous and happen in registration
/// order. `vertex_deleted` and `edge_deleted` arrive while the element is still
/// valid.
pub trait GraphStructureListener: Send + Sync {
    fn vertex_added(&self, _graph: &Graph, _vertex: Vertex) {}

    fn vertex_deleted(&self, _graph: &Graph, _vertex: Vertex) {}

    fn edge_added(&self, _graph: &Graph, _edge: Edge) {}

    fn edge_deleted(&self, _graph: &Graph, _edge: Edge) {}

    fn max_vertex_count_increased(&self, _graph: &Graph, _new_max: u32) {}

    fn max_edge_count_increased(&self, _graph: &Graph, _new_max: u32) {}
}

/// Registration token returned by [`Graph::add_listener`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

#[derive(Default)]
pub(crate) struct ListenerRegistry {
    entries: Vec<(ListenerHandle, Weak<dyn GraphStructureListener>)>,
    next_handle: u64,
}

impl ListenerRegistry {
    pub(crate) fn add(&mut self, listener: Weak<dyn GraphStructureListener>) -> ListenerHandle {
        self.next_handle += 1;
        let handle = ListenerHandle(self.next_handle);
        self.entries.push((handle, listener));
        handle
    }

    pub(crate) fn remove(&mut self, handle: ListenerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(h, _)| *h != handle);
        self.entries.len() != before
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn live_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, weak)| weak.strong_count() > 0)
            .count()
    }

    /// Upgrade live listeners in registration order and prune dead ones
    pub(crate) fn collect_live(&mut self) -> Vec<Arc<dyn GraphStructureListener>> {
        let registered = self.entries.len();
        let mut live = Vec::with_capacity(registered);
        self.entries.retain(|(_, weak)| match weak.upgrade() {
            Some(listener) => {
                live.push(listener);
                true
            }
            None => false,
        });
        if live.len() < registered {
            trace!("Pruned {} dropped listener(s)", registered - live.len());
        }
        live
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("entries", &self.entries.len())
            .field("live", &self.live_count())
            .finish()
    }
}
