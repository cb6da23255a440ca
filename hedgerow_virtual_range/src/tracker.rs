// Copyright 2025 the Hedgerow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The range tracker: scroll offsets in, committed ranges out.

use alloc::boxed::Box;
use core::fmt;
use core::hash::Hash;

use crate::ledger::{CalcKind, SizeLedger};
use crate::param::{ParamUpdate, TrackerParam};
use crate::range::{Range, ScrollDirection};

/// Callback invoked with a snapshot whenever the committed range changes.
///
/// Invocation is synchronous, inside the tracker call that caused the change,
/// and happens at most once per call. The snapshot is a copy; mutating the
/// tracker from inside the callback is unrepresentable because the tracker is
/// exclusively borrowed for the duration of the call.
pub type RangeChangedFn = Box<dyn FnMut(Range)>;

/// Index slack applied ahead of the current start when a forced recompute
/// re-anchors the range. Kept at zero: forced recomputes re-anchor at the
/// current start and leave directional bias to the scroll-driven buffer.
const LEADING_BUFFER: usize = 0;

/// Tracks which contiguous index window of a large ordered collection should
/// be materialized, and how much phantom space surrounds it.
///
/// One tracker owns all state for one list. The host feeds it scroll offsets,
/// measured item sizes, and configuration changes; the tracker answers with
/// [`Range`] snapshots through the registered callback whenever the committed
/// window moves. All calls run to completion synchronously — there are no
/// timers, no background work, and no locking.
///
/// A destroyed tracker (see [`destroy`](Self::destroy)) keeps accepting every
/// call as a safe no-op; only scroll bookkeeping (offset and direction) still
/// updates, so a later re-initialization resumes from the right position.
pub struct RangeTracker<K> {
    param: Option<TrackerParam<K>>,
    on_range_changed: Option<RangeChangedFn>,
    ledger: SizeLedger<K>,
    offset: f64,
    direction: Option<ScrollDirection>,
    range: Option<Range>,
}

impl<K: fmt::Debug> fmt::Debug for RangeTracker<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeTracker")
            .field("param", &self.param)
            .field("ledger", &self.ledger)
            .field("offset", &self.offset)
            .field("direction", &self.direction)
            .field("range", &self.range)
            .finish_non_exhaustive()
    }
}

impl<K> RangeTracker<K>
where
    K: Clone + Eq + Hash,
{
    /// Creates a tracker and commits the initial range.
    ///
    /// The callback fires once before this returns, with the window anchored
    /// at index 0.
    #[must_use]
    pub fn new(param: TrackerParam<K>, on_range_changed: RangeChangedFn) -> Self {
        let mut tracker = Self {
            param: None,
            on_range_changed: None,
            ledger: SizeLedger::new(),
            offset: 0.0,
            direction: None,
            range: None,
        };
        tracker.initialize(param, on_range_changed);
        tracker
    }

    /// Resets all state, installs a new configuration and callback, and
    /// commits the initial range.
    ///
    /// Equivalent to [`destroy`](Self::destroy) followed by construction,
    /// reusing the same instance.
    pub fn initialize(&mut self, param: TrackerParam<K>, on_range_changed: RangeChangedFn) {
        self.reset();
        let initial_end = param.keeps.saturating_sub(1);
        self.param = Some(param);
        self.on_range_changed = Some(on_range_changed);
        self.check_range(0, initial_end);
    }

    /// Resets to the uninitialized state.
    ///
    /// Every subsequent call that touches configuration becomes a no-op until
    /// [`initialize`](Self::initialize) runs again.
    pub fn destroy(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.param = None;
        self.on_range_changed = None;
        self.ledger.clear();
        self.offset = 0.0;
        self.direction = None;
        self.range = None;
    }

    /// Current committed range, or `None` when uninitialized.
    #[must_use]
    pub fn range(&self) -> Option<Range> {
        self.range
    }

    /// Installed configuration, or `None` when uninitialized.
    #[must_use]
    pub fn param(&self) -> Option<&TrackerParam<K>> {
        self.param.as_ref()
    }

    /// Last scroll offset fed into [`handle_scroll`](Self::handle_scroll).
    ///
    /// Hosts use this to restore the scroll position when a detached view is
    /// re-attached.
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.offset
    }

    /// Direction of the most recent scroll, or `None` before the first one.
    #[must_use]
    pub fn direction(&self) -> Option<ScrollDirection> {
        self.direction
    }

    /// Returns `true` if the most recent scroll moved toward index 0.
    #[must_use]
    pub fn is_front(&self) -> bool {
        self.direction == Some(ScrollDirection::Front)
    }

    /// Returns `true` if the most recent scroll moved toward the tail.
    #[must_use]
    pub fn is_behind(&self) -> bool {
        self.direction == Some(ScrollDirection::Behind)
    }

    /// Current sizing classification of the collection.
    #[must_use]
    pub fn calc_kind(&self) -> CalcKind {
        self.ledger.kind()
    }

    /// Recorded measurement for `id`, if any.
    #[must_use]
    pub fn size_of(&self, id: &K) -> Option<f64> {
        self.ledger.get(id)
    }

    /// Number of items with a recorded measurement.
    #[must_use]
    pub fn measured_len(&self) -> usize {
        self.ledger.len()
    }

    /// Per-item size assumed for unmeasured items.
    ///
    /// The uniform size for fixed collections, the frozen first-window
    /// average for dynamic ones, or the configured estimate while neither is
    /// known yet. Zero when uninitialized.
    #[must_use]
    pub fn estimate_size(&self) -> f64 {
        let configured = self.param.as_ref().map_or(0.0, |p| p.estimate_size);
        self.ledger.estimate(configured)
    }

    /// Estimated total extent of the scroll surface.
    ///
    /// Header plus footer plus the estimated content extent: measured items
    /// contribute their measurement, unmeasured ones the current estimate.
    /// The cost is proportional to the number of *measured* items. Like the
    /// pads, this is an approximation whose error shrinks as measurements
    /// accumulate.
    #[must_use]
    pub fn total_size_estimate(&self) -> f64 {
        let Some(param) = self.param.as_ref() else {
            return 0.0;
        };
        let total = param.unique_ids.len();
        let content = match self.ledger.fixed_size() {
            Some(fixed) => fixed * total as f64,
            None => {
                let unmeasured = total.saturating_sub(self.ledger.len());
                self.ledger.measured_total()
                    + unmeasured as f64 * self.ledger.estimate(param.estimate_size)
            }
        };
        param.slot_header_size + param.slot_footer_size + content
    }

    /// Absolute scroll offset at which `index` starts.
    ///
    /// Used by hosts to implement scroll-to-index. Includes the header size;
    /// zero when uninitialized.
    #[must_use]
    pub fn offset_at(&self, index: usize) -> f64 {
        let Some(param) = self.param.as_ref() else {
            return 0.0;
        };
        let leading = if index < 1 { 0.0 } else { self.index_offset(index) };
        leading + param.slot_header_size
    }

    /// Applies a single-field configuration update.
    ///
    /// Replacing the identifier sequence additionally prunes measurements for
    /// identifiers that left the collection. No range recompute happens here;
    /// hosts follow up with [`handle_data_sources_change`] or
    /// [`handle_slot_size_change`] when the change warrants one.
    ///
    /// [`handle_data_sources_change`]: Self::handle_data_sources_change
    /// [`handle_slot_size_change`]: Self::handle_slot_size_change
    pub fn update_param(&mut self, update: ParamUpdate<K>) {
        let Some(param) = self.param.as_mut() else {
            return;
        };
        match update {
            ParamUpdate::Keeps(keeps) => param.keeps = keeps,
            ParamUpdate::EstimateSize(estimate_size) => param.estimate_size = estimate_size,
            ParamUpdate::Buffer(buffer) => param.buffer = buffer,
            ParamUpdate::SlotHeaderSize(size) => param.slot_header_size = size,
            ParamUpdate::SlotFooterSize(size) => param.slot_footer_size = size,
            ParamUpdate::UniqueIds(unique_ids) => {
                self.ledger.retain_ids(&unique_ids);
                param.unique_ids = unique_ids;
            }
        }
    }

    /// Records a measured item size.
    ///
    /// Hosts call this once per item as soon as its on-screen size is known,
    /// and again whenever it changes. See [`SizeLedger::record`] for how
    /// measurements drive the sizing classification and the frozen estimate.
    pub fn save_size(&mut self, id: K, size: f64) {
        let Some(param) = self.param.as_ref() else {
            return;
        };
        let window_len = param.keeps.min(param.unique_ids.len());
        self.ledger.record(id, size, window_len);
    }

    /// Recomputes the range from a new absolute scroll offset.
    ///
    /// Classifies the scroll direction, then runs the matching adjustment.
    /// Thanks to the hysteresis buffer most calls are no-ops; the callback
    /// fires only when the committed window actually moves. Direction and
    /// offset bookkeeping update even on a destroyed tracker.
    pub fn handle_scroll(&mut self, offset: f64) {
        self.direction = Some(if offset < self.offset || offset == 0.0 {
            ScrollDirection::Front
        } else {
            ScrollDirection::Behind
        });
        self.offset = offset;

        if self.param.is_none() {
            return;
        }
        if self.is_front() {
            self.handle_front();
        } else if self.is_behind() {
            self.handle_behind();
        }
    }

    /// Forces a range recompute after the backing collection's length
    /// changed.
    ///
    /// Unlike scroll handling this always commits (and notifies): the pads
    /// and the window tail depend on the collection length even when the
    /// start stays put. The window is re-anchored at the current start,
    /// nudged by [`LEADING_BUFFER`] in the current scroll direction, then
    /// corrected against the new bounds.
    pub fn handle_data_sources_change(&mut self) {
        let Some(current) = self.range else {
            return;
        };
        let start = match self.direction {
            Some(ScrollDirection::Front) => current.start.saturating_sub(LEADING_BUFFER),
            Some(ScrollDirection::Behind) => current.start + LEADING_BUFFER,
            None => current.start,
        };
        let end = self.end_by_start(start);
        let (start, end) = self.corrected(start, end);
        self.update_range(start, end);
    }

    /// Forces a range recompute after the header or footer size changed.
    pub fn handle_slot_size_change(&mut self) {
        self.handle_data_sources_change();
    }

    /// Index the current scroll offset has passed.
    ///
    /// The greatest index whose cumulative leading offset does not exceed the
    /// current offset (header excluded). Fixed collections answer in O(1);
    /// dynamic ones binary-search the cumulative offsets, which stay
    /// monotonic because item sizes are non-negative.
    #[must_use]
    pub fn scroll_overs(&self) -> usize {
        let Some(param) = self.param.as_ref() else {
            return 0;
        };
        let offset = self.offset - param.slot_header_size;
        if offset <= 0.0 {
            return 0;
        }

        if let Some(fixed) = self.ledger.fixed_size()
            && fixed > 0.0
        {
            return floor_to_index(offset / fixed);
        }

        // `high` may drop below zero when the first item already exceeds the
        // target, hence the signed bounds.
        let mut low: isize = 0;
        let mut high = param.unique_ids.len() as isize;
        while low <= high {
            let middle = low + (high - low) / 2;
            let middle_offset = self.index_offset(middle as usize);
            if middle_offset == offset {
                return middle as usize;
            } else if middle_offset < offset {
                low = middle + 1;
            } else {
                high = middle - 1;
            }
        }

        // No exact hit: `low` overshot the target by one. The caller wants
        // the last index whose offset is still <= the target.
        if low > 0 { (low - 1) as usize } else { 0 }
    }

    // ----- internal: range calculation -----

    fn handle_front(&mut self) {
        let overs = self.scroll_overs();
        let Some(current) = self.range else {
            return;
        };
        // The window already starts at or before the passed index; within
        // hysteresis, nothing to do.
        if overs > current.start {
            return;
        }

        let buffer = self.param.as_ref().map_or(0, |p| p.buffer);
        let start = overs.saturating_sub(buffer);
        self.check_range(start, self.end_by_start(start));
    }

    fn handle_behind(&mut self) {
        let overs = self.scroll_overs();
        let Some(current) = self.range else {
            return;
        };
        let buffer = self.param.as_ref().map_or(0, |p| p.buffer);
        // Still within the pre-rendered buffer past the window start.
        if overs < current.start + buffer {
            return;
        }

        self.check_range(overs, self.end_by_start(overs));
    }

    /// Corrects a proposed range against the current bounds, then commits it
    /// if the start actually moved.
    fn check_range(&mut self, start: usize, end: usize) {
        let (start, end) = self.corrected(start, end);
        if self.range.is_none_or(|current| current.start != start) {
            self.update_range(start, end);
        }
    }

    /// Range correction: render everything when the collection fits in the
    /// window, and re-anchor short spans near the tail on their end.
    fn corrected(&self, start: usize, end: usize) -> (usize, usize) {
        let Some(param) = self.param.as_ref() else {
            return (start, end);
        };
        let keeps = param.keeps;
        if param.unique_ids.len() <= keeps {
            (0, self.last_index())
        } else if (end + 1).saturating_sub(start) < keeps {
            ((end + 1).saturating_sub(keeps), end)
        } else {
            (start, end)
        }
    }

    /// Commits a range: recomputes both pads, stores the snapshot, and
    /// notifies the host. The only path by which the callback fires.
    fn update_range(&mut self, start: usize, end: usize) {
        let range = Range {
            start,
            end,
            pad_front: self.pad_front(start),
            pad_behind: self.pad_behind(end),
        };
        self.range = Some(range);
        if let Some(on_range_changed) = self.on_range_changed.as_mut() {
            on_range_changed(range);
        }
    }

    fn end_by_start(&self, start: usize) -> usize {
        let keeps = self.param.as_ref().map_or(0, |p| p.keeps);
        let theory_end = start + keeps.saturating_sub(1);
        theory_end.min(self.last_index())
    }

    fn last_index(&self) -> usize {
        self.param
            .as_ref()
            .map_or(0, |p| p.unique_ids.len().saturating_sub(1))
    }

    // ----- internal: offsets and pads -----

    /// Cumulative size of all items strictly before `index`.
    ///
    /// An O(index) summation: measured items contribute their measurement,
    /// the rest the current estimate. Only ever invoked for window-boundary
    /// indices and binary-search probes, never scanned across the whole
    /// collection per scroll tick.
    fn index_offset(&self, index: usize) -> f64 {
        let Some(param) = self.param.as_ref() else {
            return 0.0;
        };
        let estimate = self.ledger.estimate(param.estimate_size);
        let mut offset = 0.0;
        for id in param.unique_ids.iter().take(index) {
            offset += self.ledger.get(id).unwrap_or(estimate);
        }
        offset
    }

    fn pad_front(&self, start: usize) -> f64 {
        match self.ledger.fixed_size() {
            Some(fixed) => fixed * start as f64,
            None => self.index_offset(start),
        }
    }

    fn pad_behind(&self, end: usize) -> f64 {
        let remaining = self.last_index().saturating_sub(end) as f64;
        match self.ledger.fixed_size() {
            Some(fixed) => remaining * fixed,
            None => remaining * self.estimate_size(),
        }
    }
}

/// Floors a positive offset ratio to an index.
fn floor_to_index(value: f64) -> usize {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Callers pass positive finite ratios; the float-to-int cast saturates"
    )]
    {
        value.floor() as usize
    }
}
