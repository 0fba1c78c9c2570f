// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structured instrumentation for evaluation passes.
//!
//! This module provides a [`TraceSink`] trait with one method per pass event.
//! All method bodies default to no-ops, so implementing only the events you
//! care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! Trace events complement the `tracing` log lines the engine emits: logs are
//! for people, sinks are for tools that want typed data per pass.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use crate::engine::PassReport;
use crate::error::RuleError;
use crate::rule::RuleId;
use crate::time::HostTime;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Why a pass was skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeferReason {
    /// A modal operator is running.
    ModalRunning,
    /// Timeline playback is running.
    AnimationPlaying,
}

/// Emitted when a pass starts, before the guard clauses.
#[derive(Clone, Copy, Debug)]
pub struct PassBeginEvent {
    /// Monotonic pass counter, deferred passes included.
    pub pass_index: u64,
    /// Host time supplied with the pass.
    pub now: HostTime,
    /// Number of change events delivered with the pass.
    pub events: usize,
}

/// Emitted when a guard clause skips the pass.
#[derive(Clone, Copy, Debug)]
pub struct PassDeferredEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// Host time supplied with the pass.
    pub now: HostTime,
    /// Which guard fired.
    pub reason: DeferReason,
}

/// Emitted when one rule fails; the pass continues without its output.
#[derive(Clone, Debug)]
pub struct RuleFaultEvent {
    /// Pass counter.
    pub pass_index: u64,
    /// The failing rule.
    pub rule: RuleId,
    /// What went wrong.
    pub error: RuleError,
}

/// Emitted once at the end of every pass that was not deferred.
#[derive(Clone, Copy, Debug)]
pub struct PassSummary {
    /// Pass counter.
    pub pass_index: u64,
    /// Host time supplied with the pass.
    pub now: HostTime,
    /// The report returned to the caller.
    pub report: PassReport,
    /// Records published after the pass.
    pub records: usize,
    /// Rules that failed during the pass.
    pub rule_faults: usize,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a pass starts.
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        _ = e;
    }

    /// Called when a pass is deferred by a guard clause.
    fn on_pass_deferred(&mut self, e: &PassDeferredEvent) {
        _ = e;
    }

    /// Called when a rule fails.
    fn on_rule_fault(&mut self, e: &RuleFaultEvent) {
        _ = e;
    }

    /// Called with the per-pass summary.
    fn on_pass_summary(&mut self, s: &PassSummary) {
        _ = s;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PassBeginEvent`].
    #[inline]
    pub fn pass_begin(&mut self, e: &PassBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassDeferredEvent`].
    #[inline]
    pub fn pass_deferred(&mut self, e: &PassDeferredEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_pass_deferred(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`RuleFaultEvent`].
    #[inline]
    pub fn rule_fault(&mut self, e: &RuleFaultEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_rule_fault(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PassSummary`].
    #[inline]
    pub fn pass_summary(&mut self, s: &PassSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_pass_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
