// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Slot arrays for vertex and edge records
//!
//! Slot 0 is never used so that 0 can stand for "no element" in every link
//! field. A slot holds a record exactly while its index is marked used in the
//! matching [`crate::storage::FreeIndexList`].

use crate::schema::{EdgeTypeId, VertexTypeId};
use crate::storage::value::Value;

/// Prev/next links in a global sequence
pub(crate) trait SequenceLinks {
    fn seq_prev(&self) -> u32;
    fn seq_next(&self) -> u32;
    fn set_seq_prev(&mut self, id: u32);
    fn set_seq_next(&mut self, id: u32);
}

/// Structural fields of one vertex
#[derive(Debug, Clone)]
pub(crate) struct VertexRecord {
    pub(crate) type_id: VertexTypeId,
    pub(crate) prev: u32,
    pub(crate) next: u32,
    /// Signed edge ids of the first and last incidence, 0 when empty
    pub(crate) first_incidence: i32,
    pub(crate) last_incidence: i32,
    pub(crate) incidence_version: u64,
    pub(crate) attributes: Vec<Value>,
}

impl VertexRecord {
    pub(crate) fn new(type_id: VertexTypeId, attributes: Vec<Value>) -> Self {
        Self {
            type_id,
            prev: 0,
            next: 0,
            first_incidence: 0,
            last_incidence: 0,
            incidence_version: 0,
            attributes,
        }
    }
}

impl SequenceLinks for VertexRecord {
    fn seq_prev(&self) -> u32 {
        self.prev
    }

    fn seq_next(&self) -> u32 {
        self.next
    }

    fn set_seq_prev(&mut self, id: u32) {
        self.prev = id;
    }

    fn set_seq_next(&mut self, id: u32) {
        self.next = id;
    }
}

/// Structural fields of one edge, shared by its normal and reversed views
///
/// The alpha links chain incidence `+n` through the alpha vertex's list, the
/// omega links chain incidence `-n` through the omega vertex's list.
#[derive(Debug, Clone)]
pub(crate) struct EdgeRecord {
    pub(crate) type_id: EdgeTypeId,
    pub(crate) alpha: u32,
    pub(crate) omega: u32,
    pub(crate) prev: u32,
    pub(crate) next: u32,
    alpha_prev: i32,
    alpha_next: i32,
    omega_prev: i32,
    omega_next: i32,
    pub(crate) attributes: Vec<Value>,
}

impl EdgeRecord {
    pub(crate) fn new(type_id: EdgeTypeId, alpha: u32, omega: u32, attributes: Vec<Value>) -> Self {
        Self {
            type_id,
            alpha,
            omega,
            prev: 0,
            next: 0,
            alpha_prev: 0,
            alpha_next: 0,
            omega_prev: 0,
            omega_next: 0,
            attributes,
        }
    }

    /// Vertex whose incidence list holds the given view
    pub(crate) fn this_vertex(&self, normal: bool) -> u32 {
        if normal {
            self.alpha
        } else {
            self.omega
        }
    }

    pub(crate) fn that_vertex(&self, normal: bool) -> u32 {
        self.this_vertex(!normal)
    }

    pub(crate) fn next_incidence(&self, normal: bool) -> i32 {
        if normal {
            self.alpha_next
        } else {
            self.omega_next
        }
    }

    pub(crate) fn prev_incidence(&self, normal: bool) -> i32 {
        if normal {
            self.alpha_prev
        } else {
            self.omega_prev
        }
    }

    pub(crate) fn set_next_incidence(&mut self, normal: bool, id: i32) {
        if normal {
            self.alpha_next = id;
        } else {
            self.omega_next = id;
        }
    }

    pub(crate) fn set_prev_incidence(&mut self, normal: bool, id: i32) {
        if normal {
            self.alpha_prev = id;
        } else {
            self.omega_prev = id;
        }
    }
}

impl SequenceLinks for EdgeRecord {
    fn seq_prev(&self) -> u32 {
        self.prev
    }

    fn seq_next(&self) -> u32 {
        self.next
    }

    fn set_seq_prev(&mut self, id: u32) {
        self.prev = id;
    }

    fn set_seq_next(&mut self, id: u32) {
        self.next = id;
    }
}

/// Growable slot array indexed by element id
#[derive(Debug, Clone)]
pub(crate) struct ElementStore<R> {
    slots: Vec<Option<R>>,
}

impl<R> ElementStore<R> {
    pub(crate) fn with_capacity(capacity: u32) -> Self {
        let mut slots = Vec::with_capacity(capacity as usize + 1);
        slots.resize_with(capacity as usize + 1, || None);
        Self { slots }
    }

    pub(crate) fn capacity(&self) -> u32 {
        (self.slots.len() - 1) as u32
    }

    /// Grow to `new_capacity` slots; never shrinks
    pub(crate) fn grow(&mut self, new_capacity: u32) {
        if new_capacity > self.capacity() {
            self.slots.resize_with(new_capacity as usize + 1, || None);
        }
    }

    pub(crate) fn get(&self, id: u32) -> Option<&R> {
        self.slots.get(id as usize)?.as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: u32) -> Option<&mut R> {
        self.slots.get_mut(id as usize)?.as_mut()
    }

    pub(crate) fn contains(&self, id: u32) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn insert(&mut self, id: u32, record: R) {
        if id == 0 {
            return;
        }
        if let Some(slot) = self.slots.get_mut(id as usize) {
            *slot = Some(record);
        }
    }

    pub(crate) fn remove(&mut self, id: u32) -> Option<R> {
        self.slots.get_mut(id as usize)?.take()
    }
}
