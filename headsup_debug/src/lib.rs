// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and JSON-lines trace sinks for HeadsUp diagnostics.
//!
//! This crate provides [`TraceSink`](headsup_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`jsonl::JsonLinesSink`]: one JSON object per event, for tooling.

pub mod jsonl;
pub mod pretty;
