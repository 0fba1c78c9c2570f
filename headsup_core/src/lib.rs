// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Incremental rule engine that flags risky scene configurations.
//!
//! `headsup_core` watches a mutable 3D scene document and keeps an ordered,
//! deduplicated list of warnings for the 46 built-in "risky configuration"
//! rules plus one user-authored custom rule. It never mutates the document.
//!
//! # Architecture
//!
//! Every host notification becomes one evaluation pass:
//!
//! ```text
//!   ChangeEvent ──► DirtySetTracker::consume() ──► WorkingSets
//!                                                      │
//!                 ┌────────────────────────────────────┘
//!                 ▼
//!   VisibilityIndex::rebuild() ──► RULES (1..=46, custom)
//!                                      │
//!                 ┌────────────────────┘
//!                 ▼
//!   WarningRecord list ──► Presenter::apply() / set_border_color()
//! ```
//!
//! **[`document`]**: The read-only [`Document`](document::Document) contract
//! and [`SceneStore`](document::SceneStore), an in-memory implementation that
//! records change events.
//!
//! **[`dirty`]** and **[`tracker`]**: Multi-channel dirty tracking via
//! `understory_dirty`. Per-entity channels hold objects and materials; coarse
//! channels flag collection topology, the compositor graph and full rescans.
//!
//! **[`visibility`]**: View layer to visible collection index, rebuilt on
//! topology change.
//!
//! **[`rule`]**: The static rule table and the rule bodies.
//!
//! **[`engine`]**: The [`Engine`](engine::Engine) that runs passes, isolates
//! faults and decides when presenters hear about changes.
//!
//! **[`area`]**: Routing of area-scoped records to their viewport, plus a
//! string codec for hosts that cannot carry structured records.
//!
//! **[`presenter`]**: The [`Presenter`](presenter::Presenter) trait hosts
//! implement.
//!
//! **[`config`]**: Preferences with TOML round-tripping.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! pass instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! Human-readable diagnostics go through the `tracing` facade; the crate
//! never installs a subscriber.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod area;
pub mod config;
pub mod dirty;
pub mod document;
pub mod engine;
pub mod error;
pub mod presenter;
pub mod rule;
pub mod time;
pub mod trace;
pub mod tracker;
pub mod visibility;
pub mod warning;

pub use config::Config;
pub use engine::{Engine, PassInput, PassReport, PassStatus};
pub use presenter::{PassOutput, Presenter, ThemeColors};
pub use rule::RuleId;
pub use warning::WarningRecord;
