// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Run-length encoded index allocator
//!
//! Tracks which slots of `[1, capacity]` are in use as an array of signed runs.
//! A positive run of length `n` covers `n` free indices, a negative run covers
//! `n` used indices. Adjacent runs always have opposite signs and the absolute
//! values always sum to the capacity.
//!
//! Allocation always hands out the lowest free index, so ids are reused
//! lowest-first after releases.

use log::debug;
use thiserror::Error;

/// Largest capacity an allocator can track (indices double as signed edge ids)
pub const MAX_CAPACITY: u32 = i32::MAX as u32;

/// Minimum number of run slots kept in the backing array
pub const DEFAULT_MIN_RUN_SLOTS: usize = 16;

/// Errors reported by [`FreeIndexList`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    #[error("Index {index} is outside the allocator range 1..={capacity}")]
    OutOfRange { index: u32, capacity: u32 },

    #[error("Index {0} is already free")]
    AlreadyFree(u32),

    #[error("Index {0} is already in use")]
    AlreadyUsed(u32),

    #[error("Allocator capacity cannot exceed {0}")]
    CapacityOverflow(u32),
}

/// Free/used tracker for one family of element indices
#[derive(Debug, Clone)]
pub struct FreeIndexList {
    /// Run array; entries at `run_count..` are zero
    runs: Vec<i32>,
    run_count: usize,
    min_run_slots: usize,
    used: u32,
    free: u32,
}

impl FreeIndexList {
    /// Create an allocator whose indices `1..=capacity` are all free
    pub fn new(capacity: u32) -> Self {
        Self::with_run_slots(capacity, DEFAULT_MIN_RUN_SLOTS)
    }

    /// Create an allocator with an explicit minimum run-array size
    pub fn with_run_slots(capacity: u32, min_run_slots: usize) -> Self {
        let capacity = capacity.min(MAX_CAPACITY);
        let min_run_slots = min_run_slots.max(1);
        let mut runs = vec![0; min_run_slots];
        let run_count = if capacity > 0 {
            runs[0] = capacity as i32;
            1
        } else {
            0
        };
        Self {
            runs,
            run_count,
            min_run_slots,
            used: 0,
            free: capacity,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.used + self.free
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn free(&self) -> u32 {
        self.free
    }

    /// The live part of the run array
    pub fn runs(&self) -> &[i32] {
        &self.runs[..self.run_count]
    }

    pub fn run_count(&self) -> usize {
        self.run_count
    }

    /// Number of allocated run slots, including the zero-filled tail
    pub fn run_slots(&self) -> usize {
        self.runs.len()
    }

    /// Lowest free index, if any
    pub fn first_free(&self) -> Option<u32> {
        let mut start = 1u32;
        for &run in self.runs() {
            if run > 0 {
                return Some(start);
            }
            start += run.unsigned_abs();
        }
        None
    }

    /// Check whether `index` is currently handed out
    pub fn is_used(&self, index: u32) -> bool {
        match self.locate(index) {
            Ok((run, _, _)) => self.runs[run] < 0,
            Err(_) => false,
        }
    }

    /// Allocate the lowest free index, or `None` when every index is in use
    pub fn allocate(&mut self) -> Option<u32> {
        let index = self.first_free()?;
        match self.mark(index, true) {
            Ok(()) => Some(index),
            Err(_) => None,
        }
    }

    /// Claim a specific free index
    pub fn allocate_index(&mut self, index: u32) -> Result<(), AllocError> {
        self.mark(index, true)
    }

    /// Return a used index to the free pool
    pub fn release(&mut self, index: u32) -> Result<(), AllocError> {
        self.mark(index, false)
    }

    /// Grow the tracked range by `delta` free indices
    pub fn expand(&mut self, delta: u32) -> Result<(), AllocError> {
        if delta == 0 {
            return Ok(());
        }
        let new_capacity = self
            .capacity()
            .checked_add(delta)
            .filter(|capacity| *capacity <= MAX_CAPACITY)
            .ok_or(AllocError::CapacityOverflow(MAX_CAPACITY))?;

        if self.run_count > 0 && self.runs[self.run_count - 1] > 0 {
            self.runs[self.run_count - 1] += delta as i32;
        } else {
            self.insert_run(self.run_count, delta as i32);
        }
        self.free += delta;
        debug!(
            "Free index list expanded to {} (used {}, free {})",
            new_capacity, self.used, self.free
        );
        Ok(())
    }

    /// Find the run holding `index`: (run position, offset in run, run length)
    fn locate(&self, index: u32) -> Result<(usize, u32, u32), AllocError> {
        let capacity = self.capacity();
        if index == 0 || index > capacity {
            return Err(AllocError::OutOfRange { index, capacity });
        }
        let mut start = 1u32;
        for (position, run) in self.runs().iter().enumerate() {
            let len = run.unsigned_abs();
            if index < start + len {
                return Ok((position, index - start, len));
            }
            start += len;
        }
        Err(AllocError::OutOfRange { index, capacity })
    }

    /// Flip the status of a single index, keeping runs maximal.
    ///
    /// Allocation and release are the same operation with opposite signs: a
    /// one-element run flips and merges with both neighbours, a boundary index
    /// moves into the neighbouring run, an interior index splits its run in
    /// three.
    fn mark(&mut self, index: u32, to_used: bool) -> Result<(), AllocError> {
        let (run, offset, len) = self.locate(index)?;
        let run_is_used = self.runs[run] < 0;
        if run_is_used == to_used {
            return Err(if to_used {
                AllocError::AlreadyUsed(index)
            } else {
                AllocError::AlreadyFree(index)
            });
        }

        // Unit steps in the target sign and in the sign of the run being cut.
        let target: i32 = if to_used { -1 } else { 1 };
        let own: i32 = -target;

        if len == 1 {
            self.runs[run] = target;
            self.merge_around(run);
        } else if offset == 0 {
            self.runs[run] -= own;
            if run > 0 {
                self.runs[run - 1] += target;
            } else {
                self.insert_run(0, target);
            }
        } else if offset == len - 1 {
            self.runs[run] -= own;
            if run + 1 < self.run_count {
                self.runs[run + 1] += target;
            } else {
                self.insert_run(run + 1, target);
            }
        } else {
            self.runs[run] = own * offset as i32;
            self.insert_run(run + 1, target);
            self.insert_run(run + 2, own * (len - offset - 1) as i32);
        }

        if to_used {
            self.used += 1;
            self.free -= 1;
        } else {
            self.used -= 1;
            self.free += 1;
        }
        Ok(())
    }

    /// Merge the run at `position` with same-signed neighbours
    fn merge_around(&mut self, position: usize) {
        if position + 1 < self.run_count
            && same_sign(self.runs[position], self.runs[position + 1])
        {
            self.runs[position] += self.runs[position + 1];
            self.remove_run(position + 1);
        }
        if position > 0 && same_sign(self.runs[position - 1], self.runs[position]) {
            self.runs[position - 1] += self.runs[position];
            self.remove_run(position);
        }
    }

    fn insert_run(&mut self, position: usize, value: i32) {
        if self.run_count == self.runs.len() {
            self.grow_runs();
        }
        self.runs.copy_within(position..self.run_count, position + 1);
        self.runs[position] = value;
        self.run_count += 1;
    }

    fn remove_run(&mut self, position: usize) {
        self.runs.copy_within(position + 1..self.run_count, position);
        self.run_count -= 1;
        self.runs[self.run_count] = 0;
    }

    fn grow_runs(&mut self) {
        let new_len = (self.runs.len() * 2).max(self.min_run_slots);
        debug!(
            "Growing free index run array from {} to {} slots",
            self.runs.len(),
            new_len
        );
        self.runs.resize(new_len, 0);
    }
}

fn same_sign(a: i32, b: i32) -> bool {
    (a < 0) == (b < 0)
}
