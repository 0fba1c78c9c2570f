// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! HeadsUp uses multi-channel dirty tracking (via [`understory_dirty`]) to
//! remember what changed between evaluation passes. Each channel represents
//! an independent category of change.
//!
//! - **Per-entity**: [`OBJECT`] and [`MATERIAL`] are keyed by the packed
//!   generational handle of the entity. They are marked with the default
//!   (local-only) policy; nothing propagates between entities.
//!
//! - **Coarse**: [`TOPOLOGY`], [`COMPOSITOR`] and [`FULL_RESCAN`] carry a
//!   single [`GLOBAL`] key. They act as flags: any mark means "recompute the
//!   whole category on the next pass".
//!
//! # Consumption
//!
//! Nothing outside [`tracker`](crate::tracker) reads the channels.
//! [`DirtySetTracker::consume`](crate::tracker::DirtySetTracker::consume)
//! drains all of them at the start of a pass and returns the
//! [`WorkingSets`](crate::tracker::WorkingSets) the rules run against.

use understory_dirty::Channel;

/// An object's data, transform, flags or name changed.
pub const OBJECT: Channel = Channel::new(0);

/// A material's node tree or name changed.
pub const MATERIAL: Channel = Channel::new(1);

/// Collection graph or exclusion changed; triggers a visibility rebuild.
pub const TOPOLOGY: Channel = Channel::new(2);

/// Compositor graph or compositing toggles changed.
pub const COMPOSITOR: Channel = Channel::new(3);

/// Every entity must be rescanned.
pub const FULL_RESCAN: Channel = Channel::new(4);

/// Key used on the coarse channels.
pub const GLOBAL: u64 = 0;
