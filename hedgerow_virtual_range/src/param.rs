// Copyright 2025 the Hedgerow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracker configuration and partial live updates.

use alloc::vec::Vec;

/// Configuration for a [`RangeTracker`](crate::RangeTracker).
///
/// All fields are public and may be freely set before the tracker is
/// initialized. Once installed, fields are replaced one at a time through
/// [`RangeTracker::update_param`](crate::RangeTracker::update_param) so the
/// tracker can react to the change (notably pruning stale measurements when
/// the identifier sequence is swapped out).
///
/// `K` is the item identifier type — whatever the host's key extraction
/// produces, typically a string or integer key. The tracker never mutates
/// `unique_ids` in place; the host replaces the whole sequence when the
/// backing collection changes.
#[derive(Clone, Debug)]
pub struct TrackerParam<K> {
    /// Number of items to keep materialized at once. Must be greater than
    /// zero.
    pub keeps: usize,
    /// Assumed per-item size before any measurement exists.
    pub estimate_size: f64,
    /// Hysteresis margin, in item count, before the range is allowed to shift
    /// again.
    pub buffer: usize,
    /// Size of non-item content preceding the list.
    pub slot_header_size: f64,
    /// Size of non-item content following the list.
    pub slot_footer_size: f64,
    /// Ordered item identifiers, one per collection entry.
    pub unique_ids: Vec<K>,
}

impl<K> TrackerParam<K> {
    /// Creates a configuration with the given window size and size estimate.
    ///
    /// The hysteresis buffer defaults to [`recommended_buffer`], and the
    /// header/footer sizes to zero.
    ///
    /// [`recommended_buffer`]: Self::recommended_buffer
    #[must_use]
    pub fn new(keeps: usize, estimate_size: f64) -> Self {
        Self {
            keeps,
            estimate_size,
            buffer: Self::recommended_buffer(keeps),
            slot_header_size: 0.0,
            slot_footer_size: 0.0,
            unique_ids: Vec::new(),
        }
    }

    /// Replaces the identifier sequence, returning `self` for chaining.
    #[must_use]
    pub fn with_unique_ids(mut self, unique_ids: Vec<K>) -> Self {
        self.unique_ids = unique_ids;
        self
    }

    /// Recommended hysteresis buffer for a given window size.
    ///
    /// A third of `keeps`, rounded to nearest: enough pre-rendered slack that
    /// the window is corrected well before the visible edge runs out of
    /// items, without re-rendering on every minor scroll.
    #[must_use]
    pub fn recommended_buffer(keeps: usize) -> usize {
        // Integer form of `round(keeps / 3)`.
        (keeps + 1) / 3
    }
}

/// A single-field configuration update.
///
/// Mirrors the fields of [`TrackerParam`] so hosts can forward changes
/// blindly, one at a time, without rebuilding the whole configuration.
#[derive(Clone, Debug)]
pub enum ParamUpdate<K> {
    /// Replace [`TrackerParam::keeps`].
    Keeps(usize),
    /// Replace [`TrackerParam::estimate_size`].
    EstimateSize(f64),
    /// Replace [`TrackerParam::buffer`].
    Buffer(usize),
    /// Replace [`TrackerParam::slot_header_size`].
    SlotHeaderSize(f64),
    /// Replace [`TrackerParam::slot_footer_size`].
    SlotFooterSize(f64),
    /// Replace [`TrackerParam::unique_ids`], pruning measurements for
    /// identifiers no longer present.
    UniqueIds(Vec<K>),
}

#[cfg(test)]
mod tests {
    use super::TrackerParam;

    #[test]
    fn recommended_buffer_rounds_a_third_of_keeps() {
        assert_eq!(TrackerParam::<u32>::recommended_buffer(30), 10);
        assert_eq!(TrackerParam::<u32>::recommended_buffer(10), 3);
        // 8 / 3 = 2.67 rounds up.
        assert_eq!(TrackerParam::<u32>::recommended_buffer(8), 3);
        assert_eq!(TrackerParam::<u32>::recommended_buffer(1), 0);
    }

    #[test]
    fn new_applies_recommended_buffer_and_zero_slots() {
        let param = TrackerParam::<u32>::new(30, 50.0);
        assert_eq!(param.keeps, 30);
        assert_eq!(param.buffer, 10);
        assert_eq!(param.slot_header_size, 0.0);
        assert_eq!(param.slot_footer_size, 0.0);
        assert!(param.unique_ids.is_empty());
    }
}
