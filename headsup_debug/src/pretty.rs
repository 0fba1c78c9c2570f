// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Host times
//! are printed in milliseconds.

use std::io::Write;

use headsup_core::engine::PassStatus;
use headsup_core::time::HostTime;
use headsup_core::trace::{
    DeferReason, PassBeginEvent, PassDeferredEvent, PassSummary, RuleFaultEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[expect(
    clippy::cast_precision_loss,
    reason = "millisecond display does not need nanosecond precision"
)]
fn millis(t: HostTime) -> f64 {
    t.nanos() as f64 / 1_000_000.0
}

fn status_name(status: PassStatus) -> &'static str {
    match status {
        PassStatus::Completed => "completed",
        PassStatus::Deferred => "deferred",
        PassStatus::Failed => "FAILED",
    }
}

fn reason_name(reason: DeferReason) -> &'static str {
    match reason {
        DeferReason::ModalRunning => "modal",
        DeferReason::AnimationPlaying => "playback",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[pass:begin] pass={} at {:.1}ms events={}",
            e.pass_index,
            millis(e.now),
            e.events,
        );
    }

    fn on_pass_deferred(&mut self, e: &PassDeferredEvent) {
        let _ = writeln!(
            self.writer,
            "[pass:deferred] pass={} reason={}",
            e.pass_index,
            reason_name(e.reason),
        );
    }

    fn on_rule_fault(&mut self, e: &RuleFaultEvent) {
        let _ = writeln!(
            self.writer,
            "[rule:fault] pass={} rule={} error={}",
            e.pass_index, e.rule, e.error,
        );
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        let report = &s.report;
        let scan = if report.full_rescan { "full" } else { "incremental" };
        let _ = writeln!(
            self.writer,
            "[summary] pass={} {} scan={scan} objects={} materials={} \
             records={} faults={} changed={} forced={}",
            s.pass_index,
            status_name(report.status),
            report.objects_scanned,
            report.materials_scanned,
            s.records,
            s.rule_faults,
            report.changed,
            report.forced,
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
