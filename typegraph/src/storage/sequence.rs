// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph-wide ordered sequence of vertices or edges
//!
//! The sequence is a doubly linked list threaded through the records of an
//! [`ElementStore`]; this type only owns the head, tail and length.

use crate::storage::element_store::{ElementStore, SequenceLinks};

#[derive(Debug, Clone, Default)]
pub(crate) struct GlobalSequence {
    first: u32,
    last: u32,
    len: u32,
}

impl GlobalSequence {
    pub(crate) fn first(&self) -> u32 {
        self.first
    }

    pub(crate) fn last(&self) -> u32 {
        self.last
    }

    pub(crate) fn len(&self) -> u32 {
        self.len
    }

    pub(crate) fn next<R: SequenceLinks>(&self, store: &ElementStore<R>, id: u32) -> u32 {
        store.get(id).map_or(0, |r| r.seq_next())
    }

    pub(crate) fn prev<R: SequenceLinks>(&self, store: &ElementStore<R>, id: u32) -> u32 {
        store.get(id).map_or(0, |r| r.seq_prev())
    }

    pub(crate) fn append<R: SequenceLinks>(&mut self, store: &mut ElementStore<R>, id: u32) {
        let last = self.last;
        if let Some(record) = store.get_mut(id) {
            record.set_seq_prev(last);
            record.set_seq_next(0);
        }
        if last == 0 {
            self.first = id;
        } else if let Some(record) = store.get_mut(last) {
            record.set_seq_next(id);
        }
        self.last = id;
        self.len += 1;
    }

    /// Unlink `id`, reconnecting its neighbours
    pub(crate) fn remove<R: SequenceLinks>(&mut self, store: &mut ElementStore<R>, id: u32) {
        let Some((prev, next)) = store.get(id).map(|r| (r.seq_prev(), r.seq_next())) else {
            return;
        };
        if prev == 0 {
            self.first = next;
        } else if let Some(record) = store.get_mut(prev) {
            record.set_seq_next(next);
        }
        if next == 0 {
            self.last = prev;
        } else if let Some(record) = store.get_mut(next) {
            record.set_seq_prev(prev);
        }
        if let Some(record) = store.get_mut(id) {
            record.set_seq_prev(0);
            record.set_seq_next(0);
        }
        self.len -= 1;
    }

    /// Move `x` directly before `y`; returns whether the order changed
    pub(crate) fn put_before<R: SequenceLinks>(
        &mut self,
        store: &mut ElementStore<R>,
        x: u32,
        y: u32,
    ) -> bool {
        if x == y || self.next(store, x) == y {
            return false;
        }
        self.remove(store, x);

        let prev = self.prev(store, y);
        if let Some(record) = store.get_mut(x) {
            record.set_seq_prev(prev);
            record.set_seq_next(y);
        }
        if let Some(record) = store.get_mut(y) {
            record.set_seq_prev(x);
        }
        if prev == 0 {
            self.first = x;
        } else if let Some(record) = store.get_mut(prev) {
            record.set_seq_next(x);
        }
        self.len += 1;
        true
    }

    /// Move `x` directly after `y`; returns whether the order changed
    pub(crate) fn put_after<R: SequenceLinks>(
        &mut self,
        store: &mut ElementStore<R>,
        x: u32,
        y: u32,
    ) -> bool {
        if x == y || self.prev(store, x) == y {
            return false;
        }
        self.remove(store, x);

        let next = self.next(store, y);
        if let Some(record) = store.get_mut(x) {
            record.set_seq_prev(y);
            record.set_seq_next(next);
        }
        if let Some(record) = store.get_mut(y) {
            record.set_seq_next(x);
        }
        if next == 0 {
            self.last = x;
        } else if let Some(record) = store.get_mut(next) {
            record.set_seq_prev(x);
        }
        self.len += 1;
        true
    }

    /// Whether `x` precedes `y`.
    ///
    /// Walks outwards from `x` in both directions at once, so the cost is
    /// bounded by twice the distance between the two elements.
    pub(crate) fn is_before<R: SequenceLinks>(&self, store: &ElementStore<R>, x: u32, y: u32) -> bool {
        if x == y {
            return false;
        }
        let mut forward = self.next(store, x);
        let mut backward = self.prev(store, x);
        while forward != 0 || backward != 0 {
            if forward == y {
                return true;
            }
            if backward == y {
                return false;
            }
            if forward != 0 {
                forward = self.next(store, forward);
            }
            if backward != 0 {
                backward = self.prev(store, backward);
            }
        }
        false
    }

    pub(crate) fn is_after<R: SequenceLinks>(&self, store: &ElementStore<R>, x: u32, y: u32) -> bool {
        x != y && self.is_before(store, y, x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::VertexTypeId;
    use crate::storage::element_store::VertexRecord;

    fn filled(count: u32) -> (GlobalSequence, ElementStore<VertexRecord>) {
        let mut store = ElementStore::with_capacity(count);
        let mut seq = GlobalSequence::default();
        for id in 1..=count {
            store.insert(id, VertexRecord::new(VertexTypeId(0), Vec::new()));
            seq.append(&mut store, id);
        }
        (seq, store)
    }

    fn order(seq: &GlobalSequence, store: &ElementStore<VertexRecord>) -> Vec<u32> {
        let mut ids = Vec::new();
        let mut cur = seq.first();
        while cur != 0 {
            ids.push(cur);
            cur = seq.next(store, cur);
        }
        let mut back = Vec::new();
        let mut cur = seq.last();
        while cur != 0 {
            back.push(cur);
            cur = seq.prev(store, cur);
        }
        back.reverse();
        assert_eq!(ids, back, "forward and backward links disagree");
        assert_eq!(ids.len() as u32, seq.len());
        ids
    }

    #[test]
    fn test_append_and_remove() {
        let (mut seq, mut store) = filled(4);
        assert_eq!(order(&seq, &store), vec![1, 2, 3, 4]);
        seq.remove(&mut store, 1);
        seq.remove(&mut store, 4);
        assert_eq!(order(&seq, &store), vec![2, 3]);
        assert_eq!(seq.first(), 2);
        assert_eq!(seq.last(), 3);
    }

    #[test]
    fn test_put_before_and_after() {
        let (mut seq, mut store) = filled(5);
        assert!(!seq.put_before(&mut store, 2, 3));
        assert!(seq.put_before(&mut store, 5, 1));
        assert_eq!(order(&seq, &store), vec![5, 1, 2, 3, 4]);
        assert!(seq.put_after(&mut store, 5, 4));
        assert_eq!(order(&seq, &store), vec![1, 2, 3, 4, 5]);
        assert!(!seq.put_after(&mut store, 5, 4));
        assert!(!seq.put_before(&mut store, 3, 3));
    }

    #[test]
    fn test_is_before() {
        let (seq, store) = filled(6);
        assert!(seq.is_before(&store, 1, 6));
        assert!(seq.is_before(&store, 4, 5));
        assert!(!seq.is_before(&store, 5, 4));
        assert!(!seq.is_before(&store, 3, 3));
        assert!(seq.is_after(&store, 6, 1));
        assert!(!seq.is_after(&store, 1, 6));
        assert!(!seq.is_after(&store, 2, 2));
    }
}
