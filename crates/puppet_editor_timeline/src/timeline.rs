// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tick index over the part sequence.
//!
//! Maps a global playback tick to the part that owns it. The index is derived
//! from the parts list and never persisted; every structural edit rebuilds it
//! in one pass.

use crate::part::Part;

/// Cumulative start ticks of each part plus the total duration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimelineIndex {
    /// Start tick of each part, `indexes[0] == 0`
    indexes: Vec<u32>,
    /// Sum of all part lengths
    max_tick: u32,
}

impl TimelineIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index for the given parts
    pub fn from_parts(parts: &[Part]) -> Self {
        let mut index = Self::new();
        index.rebuild(parts, None);
        index
    }

    /// Recompute start ticks and total duration in a single forward scan.
    ///
    /// When `preserve` names a part, its new start tick is returned so the
    /// caller can keep the view pinned to that part. Totals past `u32::MAX`
    /// saturate; [`PlaybackController`](crate::PlaybackController) rejects
    /// such edits before they reach the index.
    pub fn rebuild(&mut self, parts: &[Part], preserve: Option<usize>) -> Option<u32> {
        self.indexes.clear();
        self.indexes.reserve(parts.len());
        self.max_tick = 0;

        let mut preserved = None;
        for (i, part) in parts.iter().enumerate() {
            if preserve == Some(i) {
                preserved = Some(self.max_tick);
            }
            self.indexes.push(self.max_tick);
            self.max_tick = self.max_tick.saturating_add(part.len());
        }

        preserved
    }

    /// Append one part of `length` ticks, returning its start tick
    pub fn push(&mut self, length: u32) -> u32 {
        let start = self.max_tick;
        self.indexes.push(start);
        self.max_tick = self.max_tick.saturating_add(length);
        start
    }

    /// Find the part owning `tick`.
    ///
    /// Defined for `0 <= tick < max_tick`; returns `None` outside that range.
    pub fn locate(&self, tick: u32) -> Option<usize> {
        if tick >= self.max_tick {
            return None;
        }
        if tick == 0 {
            return Some(0);
        }
        Some(self.part_at_or_before(tick))
    }

    /// Index of the last part starting at or before `tick`.
    ///
    /// Zero for an empty index.
    pub fn part_at_or_before(&self, tick: u32) -> usize {
        self.indexes
            .partition_point(|&start| start <= tick)
            .saturating_sub(1)
    }

    /// Incrementally track the current part from the previously known one.
    ///
    /// Tick zero always resolves to part zero, which resynchronises any drift.
    /// Otherwise the walk moves at most one part forward or backward; if that
    /// does not land on the owning part the full lookup is used.
    pub fn resolve(&self, previous: usize, tick: u32) -> Option<usize> {
        if self.indexes.is_empty() {
            return None;
        }
        if tick == 0 {
            return Some(0);
        }

        let last = self.indexes.len() - 1;
        let previous = previous.min(last);
        let stepped = if previous < last && tick >= self.indexes[previous + 1] {
            previous + 1
        } else if previous > 0 && tick < self.indexes[previous] {
            previous - 1
        } else {
            previous
        };

        if self.contains(stepped, tick) {
            Some(stepped)
        } else {
            self.locate(tick)
        }
    }

    /// Whether part `part` owns `tick`
    pub fn contains(&self, part: usize, tick: u32) -> bool {
        let Some(&start) = self.indexes.get(part) else {
            return false;
        };
        let end = self.indexes.get(part + 1).copied().unwrap_or(self.max_tick);
        start <= tick && tick < end
    }

    /// Start tick of part `part`
    pub fn start_of(&self, part: usize) -> Option<u32> {
        self.indexes.get(part).copied()
    }

    /// Start ticks of every part
    pub fn indexes(&self) -> &[u32] {
        &self.indexes
    }

    /// Total duration in ticks
    pub fn max_tick(&self) -> u32 {
        self.max_tick
    }
}
