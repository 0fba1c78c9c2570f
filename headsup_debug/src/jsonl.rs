// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON-lines trace output.
//!
//! [`JsonLinesSink`] writes one JSON object per event, newline separated.
//! Every object carries an `"event"` discriminator and the pass counter;
//! host times are raw nanoseconds.

use std::io::Write;

use serde_json::{Value, json};

use headsup_core::trace::{
    PassBeginEvent, PassDeferredEvent, PassSummary, RuleFaultEvent, TraceSink,
};

/// Writes one JSON object per trace event.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for JsonLinesSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesSink").finish_non_exhaustive()
    }
}

impl<W: Write> JsonLinesSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the destination.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, value: &Value) {
        // Write errors are dropped; tracing never fails a pass.
        if serde_json::to_writer(&mut self.writer, value).is_ok() {
            let _ = self.writer.write_all(b"\n");
        }
    }
}

impl<W: Write> TraceSink for JsonLinesSink<W> {
    fn on_pass_begin(&mut self, e: &PassBeginEvent) {
        self.emit(&json!({
            "event": "pass_begin",
            "pass": e.pass_index,
            "now_ns": e.now.nanos(),
            "events": e.events,
        }));
    }

    fn on_pass_deferred(&mut self, e: &PassDeferredEvent) {
        self.emit(&json!({
            "event": "pass_deferred",
            "pass": e.pass_index,
            "now_ns": e.now.nanos(),
            "reason": format!("{:?}", e.reason),
        }));
    }

    fn on_rule_fault(&mut self, e: &RuleFaultEvent) {
        self.emit(&json!({
            "event": "rule_fault",
            "pass": e.pass_index,
            "rule": e.rule.to_string(),
            "error": e.error.to_string(),
        }));
    }

    fn on_pass_summary(&mut self, s: &PassSummary) {
        let report = &s.report;
        self.emit(&json!({
            "event": "pass_summary",
            "pass": s.pass_index,
            "now_ns": s.now.nanos(),
            "status": format!("{:?}", report.status),
            "full_rescan": report.full_rescan,
            "objects_scanned": report.objects_scanned,
            "materials_scanned": report.materials_scanned,
            "changed": report.changed,
            "forced": report.forced,
            "records": s.records,
            "rule_faults": s.rule_faults,
        }));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
