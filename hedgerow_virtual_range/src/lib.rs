// Copyright 2025 the Hedgerow Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=hedgerow_virtual_range --heading-base-level=0

//! Hedgerow Virtual Range: scroll-driven range tracking for virtualized lists.
//!
//! This crate provides a small, renderer-agnostic core for deciding which
//! contiguous slice of a very large ordered collection should be materialized
//! while the scroll surface keeps the size of the full collection. It is
//! intended to be shared across UI stacks: anything that can feed in scroll
//! offsets and measured item sizes can drive it.
//!
//! The core concepts are:
//!
//! - [`RangeTracker`]: the owning component. Scroll offsets, measurements,
//!   and configuration changes go in; [`Range`] snapshots come out through a
//!   single callback whenever the committed window moves.
//! - [`TrackerParam`] / [`ParamUpdate`]: the configuration (window size,
//!   hysteresis buffer, size estimate, header/footer sizes, and the ordered
//!   identifier sequence) and its single-field live updates.
//! - [`SizeLedger`] / [`CalcKind`]: per-identifier measured sizes, plus the
//!   inference of whether the collection is uniform (`Fixed`) or variable
//!   (`Dynamic`). Uniform collections get O(1) offset arithmetic; variable
//!   ones binary-search their cumulative offsets.
//! - [`Range`]: the committed `[start, end]` window together with the phantom
//!   `pad_front`/`pad_behind` sizes standing in for everything unrendered.
//!
//! This crate deliberately does **not** know about widgets, display trees, or
//! any particular UI framework, and it never measures anything itself. Host
//! frameworks are responsible for:
//!
//! - Mounting the items in `start..=end` and measuring their on-screen size.
//! - Calling [`RangeTracker::save_size`] for every item once its size is
//!   known (and again if it changes).
//! - Calling [`RangeTracker::handle_scroll`] with an absolute offset on every
//!   scroll tick.
//! - Replacing the identifier sequence (via
//!   [`ParamUpdate::UniqueIds`] + [`RangeTracker::handle_data_sources_change`])
//!   whenever the backing collection changes.
//! - Treating the callback's range as authoritative — never rendering outside
//!   `[start, end]`.
//!
//! ## Minimal example
//!
//! A uniform 1000-item list driven by hand:
//!
//! ```rust
//! use hedgerow_virtual_range::{RangeTracker, TrackerParam};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! // 1000 items, a window of 10, hysteresis buffer of 3.
//! let mut param = TrackerParam::new(10, 40.0);
//! param.buffer = 3;
//! param.unique_ids = (0..1000_u32).collect();
//!
//! let committed = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&committed);
//! let mut tracker = RangeTracker::new(
//!     param,
//!     Box::new(move |range| sink.borrow_mut().push(range)),
//! );
//!
//! // The initial range is committed synchronously at construction.
//! let initial = tracker.range().unwrap();
//! assert_eq!((initial.start, initial.end), (0, 9));
//!
//! // The host measures rendered items as they mount...
//! for id in 0..10_u32 {
//!     tracker.save_size(id, 40.0);
//! }
//! // ...and feeds scroll offsets in. Crossing the buffer moves the window.
//! tracker.handle_scroll(400.0);
//! let moved = tracker.range().unwrap();
//! assert_eq!((moved.start, moved.end), (10, 19));
//! assert_eq!(moved.pad_front, 400.0);
//! assert_eq!(committed.borrow().len(), 2);
//! ```
//!
//! For variable item sizes nothing changes on the host side: keep calling
//! [`RangeTracker::save_size`] as measurements arrive. The tracker notices
//! the first differing measurement, switches to binary search over cumulative
//! offsets, and freezes an average of the first window of measurements as the
//! fallback size for everything not yet measured. Pads for far-away items are
//! estimates by design; the error shrinks as more items get measured.
//!
//! All sizes and offsets live in a caller-chosen 1D coordinate space
//! (typically logical pixels) and are expected to be finite and non-negative.
//! This crate is `no_std` and uses `alloc`.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod ledger;
mod param;
mod range;
mod tracker;

pub use ledger::{CalcKind, SizeLedger};
pub use param::{ParamUpdate, TrackerParam};
pub use range::{Range, ScrollDirection};
pub use tracker::{RangeChangedFn, RangeTracker};
