// Copyright 2025 the Hedgerow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Range snapshots and scroll direction classification.

use core::ops::RangeInclusive;

/// The committed render window plus the phantom padding around it.
///
/// `start` and `end` are inclusive indices into the host's collection; items
/// in `start..=end` are the ones the host should materialize. `pad_front` and
/// `pad_behind` are *sizes* (not counts): the space the unrendered leading and
/// trailing items would occupy, used to keep the scroll surface's total
/// extent correct while most items stay unmounted.
///
/// Snapshots are plain values. The one handed to the range-changed callback is
/// a copy of the tracker's state at commit time and never changes afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Range {
    /// First materialized index (inclusive).
    pub start: usize,
    /// Last materialized index (inclusive).
    pub end: usize,
    /// Size of the unrendered leading region.
    pub pad_front: f64,
    /// Size of the unrendered trailing region.
    pub pad_behind: f64,
}

impl Range {
    /// Returns the materialized indices as an inclusive range.
    ///
    /// When the backing collection is empty the tracker commits a degenerate
    /// `0..=0` window; hosts iterate the intersection of this range with the
    /// indices that actually exist.
    #[must_use]
    pub fn indices(&self) -> RangeInclusive<usize> {
        self.start..=self.end
    }
}

/// Which way the most recent scroll moved.
///
/// `Front` is toward index 0 (up, or left for horizontal lists); `Behind` is
/// toward the tail. A scroll offset of exactly zero always classifies as
/// `Front` so that snapping back to the top re-runs the front adjustment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScrollDirection {
    /// Scrolling toward the start of the collection.
    Front,
    /// Scrolling toward the end of the collection.
    Behind,
}
