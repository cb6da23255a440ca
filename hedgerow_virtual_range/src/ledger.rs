// Copyright 2025 the Hedgerow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Measured-size ledger and sizing-behavior detection.

use core::hash::Hash;

use hashbrown::{HashMap, HashSet};

/// Classification of the collection's sizing behavior.
///
/// Every collection starts as [`Init`](Self::Init). The first recorded
/// measurement moves it to [`Fixed`](Self::Fixed) on the assumption that the
/// list is uniform; the first measurement that disagrees moves it to
/// [`Dynamic`](Self::Dynamic). The transition is one-directional — once
/// dynamic, the collection never reverts, no matter what is measured later.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum CalcKind {
    /// No measurement recorded yet.
    #[default]
    Init,
    /// All measurements so far are equal.
    Fixed,
    /// At least two measurements disagreed.
    Dynamic,
}

/// Per-identifier measured sizes plus the derived sizing estimate.
///
/// The ledger records the host's measurements as they arrive and maintains
/// two pieces of derived knowledge:
///
/// - the [`CalcKind`] classification, which lets the rest of the tracker pick
///   O(1) arithmetic over binary search when the list turns out uniform, and
/// - a running average of the first few measurements, used as the fallback
///   size for items that have not been measured yet.
///
/// The running average only accumulates while fewer than `window_len`
/// measurements exist (the tracker passes `min(keeps, total)`). Once that
/// many items have been measured the average freezes permanently. Freezing
/// keeps the estimate stable: far-away items measured much later would
/// otherwise keep shifting the assumed size of everything still unmeasured,
/// which shows up as padding jitter while scrolling.
#[derive(Clone, Debug)]
pub struct SizeLedger<K> {
    sizes: HashMap<K, f64>,
    kind: CalcKind,
    fixed_size: f64,
    /// Running total over the first window; `None` once the average froze.
    window_total: Option<f64>,
    window_average: f64,
}

impl<K> Default for SizeLedger<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> SizeLedger<K> {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sizes: HashMap::new(),
            kind: CalcKind::Init,
            fixed_size: 0.0,
            window_total: Some(0.0),
            window_average: 0.0,
        }
    }

    /// Returns the current sizing classification.
    #[must_use]
    pub fn kind(&self) -> CalcKind {
        self.kind
    }

    /// Returns the uniform item size, if the collection is still classified
    /// as fixed.
    #[must_use]
    pub fn fixed_size(&self) -> Option<f64> {
        (self.kind == CalcKind::Fixed).then_some(self.fixed_size)
    }

    /// Number of identifiers with a recorded measurement.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Returns `true` if no measurement has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Sum of all recorded measurements.
    #[must_use]
    pub fn measured_total(&self) -> f64 {
        self.sizes.values().sum()
    }

    /// The per-item size to assume for unmeasured items.
    ///
    /// Fixed collections use the uniform size. Dynamic collections use the
    /// frozen first-window average when one was computed, falling back to
    /// `configured` (the host's up-front estimate) before enough measurements
    /// exist.
    #[must_use]
    pub fn estimate(&self, configured: f64) -> f64 {
        if self.kind == CalcKind::Fixed {
            self.fixed_size
        } else if self.window_average > 0.0 {
            self.window_average
        } else {
            configured
        }
    }

    /// Drops every recorded measurement and resets the derived state.
    pub fn clear(&mut self) {
        self.sizes.clear();
        self.kind = CalcKind::Init;
        self.fixed_size = 0.0;
        self.window_total = Some(0.0);
        self.window_average = 0.0;
    }
}

impl<K> SizeLedger<K>
where
    K: Eq + Hash,
{
    /// Returns the recorded measurement for `id`, if any.
    #[must_use]
    pub fn get(&self, id: &K) -> Option<f64> {
        self.sizes.get(id).copied()
    }

    /// Records a measurement, overwriting any previous one for the same id.
    ///
    /// `window_len` bounds the running-average window; see the type docs for
    /// how the window fills and freezes. Re-measurements of an already-known
    /// id count as new recordings for classification purposes, so an id that
    /// changes size flips a fixed collection to dynamic.
    pub fn record(&mut self, id: K, size: f64, window_len: usize) {
        self.sizes.insert(id, size);

        match self.kind {
            CalcKind::Init => {
                // Assume uniform sizing until a measurement disagrees.
                self.fixed_size = size;
                self.kind = CalcKind::Fixed;
            }
            CalcKind::Fixed if self.fixed_size != size => {
                self.kind = CalcKind::Dynamic;
                self.fixed_size = 0.0;
            }
            _ => {}
        }

        // The average tracks non-uniform collections only, and only while the
        // first window is still open.
        if self.kind == CalcKind::Fixed || self.window_total.is_none() {
            return;
        }
        if self.sizes.len() < window_len {
            let total = self.measured_total();
            self.window_total = Some(total);
            self.window_average = (total / self.sizes.len() as f64).round();
        } else {
            self.window_total = None;
        }
    }

    /// Removes measurements whose identifier is not in `ids`.
    ///
    /// Called when the host replaces the identifier sequence, so the ledger
    /// never holds entries for items that left the collection.
    pub fn retain_ids(&mut self, ids: &[K]) {
        let keep: HashSet<&K> = ids.iter().collect();
        self.sizes.retain(|id, _| keep.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::{CalcKind, SizeLedger};

    #[test]
    fn first_measurement_classifies_as_fixed() {
        let mut ledger = SizeLedger::new();
        assert_eq!(ledger.kind(), CalcKind::Init);
        assert_eq!(ledger.fixed_size(), None);

        ledger.record(0_u32, 50.0, 10);
        assert_eq!(ledger.kind(), CalcKind::Fixed);
        assert_eq!(ledger.fixed_size(), Some(50.0));
        assert_eq!(ledger.estimate(80.0), 50.0);
    }

    #[test]
    fn differing_measurement_flips_to_dynamic_permanently() {
        let mut ledger = SizeLedger::new();
        ledger.record(0_u32, 50.0, 10);
        ledger.record(1, 70.0, 10);
        assert_eq!(ledger.kind(), CalcKind::Dynamic);
        assert_eq!(ledger.fixed_size(), None);

        // Matching sizes afterwards never restore the fixed classification.
        ledger.record(2, 50.0, 10);
        ledger.record(3, 50.0, 10);
        assert_eq!(ledger.kind(), CalcKind::Dynamic);
    }

    #[test]
    fn remeasuring_an_id_with_a_new_size_flips_to_dynamic() {
        let mut ledger = SizeLedger::new();
        ledger.record(0_u32, 50.0, 10);
        ledger.record(0, 60.0, 10);
        assert_eq!(ledger.kind(), CalcKind::Dynamic);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn average_accumulates_while_window_open_then_freezes() {
        let mut ledger = SizeLedger::new();
        // Alternating sizes go dynamic on the second recording.
        ledger.record(0_u32, 100.0, 4);
        ledger.record(1, 50.0, 4);
        assert_eq!(ledger.estimate(999.0), 75.0);

        ledger.record(2, 100.0, 4);
        // (100 + 50 + 100) / 3 = 83.33, rounded.
        assert_eq!(ledger.estimate(999.0), 83.0);

        // Fourth recording fills the window: the average freezes at the value
        // computed over the first three.
        ledger.record(3, 700.0, 4);
        assert_eq!(ledger.estimate(999.0), 83.0);

        // Later measurements no longer move it.
        ledger.record(4, 700.0, 4);
        assert_eq!(ledger.estimate(999.0), 83.0);
    }

    #[test]
    fn uniform_run_keeps_window_open_until_sizes_diverge() {
        let mut ledger = SizeLedger::new();
        // While fixed, the averaging block is skipped but the window stays
        // open, so a late divergence resumes averaging over everything
        // recorded so far.
        ledger.record(0_u32, 50.0, 10);
        ledger.record(1, 50.0, 10);
        ledger.record(2, 80.0, 10);
        assert_eq!(ledger.kind(), CalcKind::Dynamic);
        // (50 + 50 + 80) / 3 = 60.
        assert_eq!(ledger.estimate(999.0), 60.0);
    }

    #[test]
    fn estimate_falls_back_to_configured_before_any_average() {
        let ledger = SizeLedger::<u32>::new();
        assert_eq!(ledger.estimate(42.0), 42.0);
    }

    #[test]
    fn retain_ids_drops_departed_identifiers() {
        let mut ledger = SizeLedger::new();
        ledger.record("a", 10.0, 10);
        ledger.record("b", 20.0, 10);
        ledger.record("c", 30.0, 10);

        ledger.retain_ids(&["a", "c"]);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.get(&"a"), Some(10.0));
        assert_eq!(ledger.get(&"b"), None);
        assert_eq!(ledger.get(&"c"), Some(30.0));
    }

    #[test]
    fn clear_resets_classification_and_average() {
        let mut ledger = SizeLedger::new();
        ledger.record(0_u32, 100.0, 4);
        ledger.record(1, 50.0, 4);
        ledger.clear();

        assert!(ledger.is_empty());
        assert_eq!(ledger.kind(), CalcKind::Init);
        assert_eq!(ledger.estimate(42.0), 42.0);

        // The window reopens after a clear.
        ledger.record(0, 30.0, 4);
        ledger.record(1, 60.0, 4);
        assert_eq!(ledger.estimate(999.0), 45.0);
    }
}
