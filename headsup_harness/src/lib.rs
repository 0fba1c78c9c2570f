// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scenario driver for HeadsUp integration tests.
//!
//! A [`Scenario`] owns a [`SceneStore`], an [`Engine`] and a
//! [`RecordingPresenter`], and advances a fake host clock by a fixed tick on
//! every pass. Edits go through [`Scenario::edit`]; the store's recorded
//! change events are delivered with the next [`Scenario::pass`], the way a
//! host forwards its notifications.
//!
//! [`Scenario::fresh_evaluation`] runs a brand-new engine over the same
//! document. Comparing it with the scenario's own output is how the suites
//! check that incremental passes never drift from a full rescan.

use headsup_core::config::Rgb;
use headsup_core::document::{AreaId, SceneStore, ViewportEnumerator};
use headsup_core::engine::STARTUP_GRACE;
use headsup_core::time::{Duration, HostTime};
use headsup_core::trace::{TraceSink, Tracer};
use headsup_core::warning::{DetailLists, WarningRecord};
use headsup_core::{
    Config, Engine, PassInput, PassOutput, PassReport, PassStatus, Presenter, ThemeColors,
};
use headsup_render::{AreaContext, OverlayModel, compose_overlay};

/// Time between two passes of a scenario.
pub const TICK: Duration = Duration::from_millis(100);

/// Theme reported by a [`RecordingPresenter`] unless overridden.
pub const DEFAULT_THEME: ThemeColors = ThemeColors {
    border: Rgb([0.24, 0.24, 0.24]),
    text_highlight: Rgb([1.0, 1.0, 1.0]),
};

/// One [`Presenter::apply`] call as seen by the presenter.
#[derive(Clone, Debug, PartialEq)]
pub struct AppliedOutput {
    /// Record messages in order.
    pub messages: Vec<String>,
    /// Warn state at the time of the call.
    pub warn_state: bool,
    /// The file had just been saved.
    pub saved_just_now: bool,
}

/// Presenter that records every call.
#[derive(Clone, Debug)]
pub struct RecordingPresenter {
    theme: ThemeColors,
    /// Every `apply` call, oldest first.
    pub applied: Vec<AppliedOutput>,
    /// Every border color, oldest first.
    pub borders: Vec<Rgb>,
}

impl Default for RecordingPresenter {
    fn default() -> Self {
        Self::with_theme(DEFAULT_THEME)
    }
}

impl RecordingPresenter {
    /// A presenter reporting `theme` as the host theme.
    #[must_use]
    pub fn with_theme(theme: ThemeColors) -> Self {
        Self {
            theme,
            applied: Vec::new(),
            borders: Vec::new(),
        }
    }

    /// The most recent `apply` call.
    #[must_use]
    pub fn last(&self) -> Option<&AppliedOutput> {
        self.applied.last()
    }
}

impl Presenter for RecordingPresenter {
    fn theme(&self) -> ThemeColors {
        self.theme
    }

    fn set_border_color(&mut self, color: Rgb) {
        self.borders.push(color);
    }

    fn apply(&mut self, output: &PassOutput<'_>) {
        self.applied.push(AppliedOutput {
            messages: output.records.iter().map(|r| r.message.clone()).collect(),
            warn_state: output.warn_state,
            saved_just_now: output.saved_just_now,
        });
    }
}

/// Running counts over pass reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassTally {
    /// Passes observed.
    pub passes: u64,
    /// Passes that published output.
    pub completed: u64,
    /// Passes skipped by a guard.
    pub deferred: u64,
    /// Passes that failed.
    pub failed: u64,
    /// Completed passes that scanned the whole document.
    pub full_rescans: u64,
    /// Completed passes whose record list changed.
    pub changed: u64,
}

impl PassTally {
    /// Counts one report.
    pub fn observe(&mut self, report: &PassReport) {
        self.passes = self.passes.saturating_add(1);
        match report.status {
            PassStatus::Completed => {
                self.completed += 1;
                if report.full_rescan {
                    self.full_rescans += 1;
                }
                if report.changed {
                    self.changed += 1;
                }
            }
            PassStatus::Deferred => self.deferred += 1,
            PassStatus::Failed => self.failed += 1,
        }
    }
}

/// A document, an engine and a presenter driven together.
#[derive(Debug)]
pub struct Scenario {
    /// The document. Mutate it through [`edit`](Self::edit) so changes are
    /// delivered, or directly to simulate missed notifications.
    pub store: SceneStore,
    /// The engine under test.
    pub engine: Engine,
    /// Records what the engine published.
    pub presenter: RecordingPresenter,
    now: HostTime,
    tally: PassTally,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario {
    /// Empty document, default preferences, startup grace already over.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Empty document with the given preferences, startup grace already
    /// over.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            store: SceneStore::new(),
            engine: Engine::new(config, HostTime(0)),
            presenter: RecordingPresenter::default(),
            now: HostTime(0) + STARTUP_GRACE + Duration::from_secs(1),
            tally: PassTally::default(),
        }
    }

    /// Empty document with the engine created "now", so the first passes
    /// fall inside the startup grace period.
    #[must_use]
    pub fn at_startup() -> Self {
        Self {
            store: SceneStore::new(),
            engine: Engine::new(Config::default(), HostTime(0)),
            presenter: RecordingPresenter::default(),
            now: HostTime(0),
            tally: PassTally::default(),
        }
    }

    /// Applies `f` to the document. Its change events go out with the next
    /// pass.
    pub fn edit(&mut self, f: impl FnOnce(&mut SceneStore)) -> &mut Self {
        f(&mut self.store);
        self
    }

    /// Advances the clock by one tick and runs a pass with the pending
    /// change events.
    pub fn pass(&mut self) -> PassReport {
        self.pass_with(&mut Tracer::none())
    }

    /// Like [`pass`](Self::pass), reporting to `sink`.
    pub fn pass_traced(&mut self, sink: &mut dyn TraceSink) -> PassReport {
        self.pass_with(&mut Tracer::new(sink))
    }

    fn pass_with(&mut self, tracer: &mut Tracer<'_>) -> PassReport {
        self.now = self.now + TICK;
        let events = self.store.take_changes();
        let report = self.engine.run_pass_traced(
            PassInput {
                host: &self.store,
                events: &events,
                now: self.now,
            },
            &mut self.presenter,
            tracer,
        );
        self.tally.observe(&report);
        report
    }

    /// Advances the clock by `by` and polls the startup timer.
    pub fn wait(&mut self, by: Duration) -> bool {
        self.now = self.now + by;
        self.engine.poll_startup(self.now, &mut self.presenter)
    }

    /// Current host time.
    #[must_use]
    pub fn now(&self) -> HostTime {
        self.now
    }

    /// Counts of every pass run so far.
    #[must_use]
    pub fn tally(&self) -> PassTally {
        self.tally
    }

    /// Published messages in order.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.engine
            .records()
            .iter()
            .map(|r| r.message.as_str())
            .collect()
    }

    /// Records and detail lists of a fresh engine, with the same
    /// preferences, after one full pass over the current document.
    ///
    /// Pending change events stay with the scenario.
    #[must_use]
    pub fn fresh_evaluation(&self) -> (Vec<WarningRecord>, DetailLists) {
        let mut engine = Engine::new(self.engine.config().clone(), HostTime(0));
        let mut presenter = RecordingPresenter::default();
        let _ = engine.run_pass(
            PassInput {
                host: &self.store,
                events: &[],
                now: self.now,
            },
            &mut presenter,
        );
        (engine.records().to_vec(), engine.details().clone())
    }

    /// What viewport `area` draws for the published output, or `None` when
    /// the area does not exist or never draws warnings.
    #[must_use]
    pub fn overlay(&self, area: AreaId) -> Option<OverlayModel> {
        let viewport = self.store.viewports().iter().find(|v| v.id == area)?;
        let context = AreaContext::from_viewport(viewport)?;
        Some(compose_overlay(&self.engine.output(), &context))
    }
}

/// Installs a formatting subscriber for test output.
///
/// The filter comes from `RUST_LOG` and defaults to `headsup_core=debug`.
/// Safe to call from every test; only the first call installs anything.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("headsup_core=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_counts_by_status() {
        let mut tally = PassTally::default();
        let completed = PassReport {
            status: PassStatus::Completed,
            full_rescan: true,
            objects_scanned: 3,
            materials_scanned: 0,
            changed: true,
            forced: true,
        };
        tally.observe(&completed);
        tally.observe(&PassReport {
            status: PassStatus::Deferred,
            ..completed
        });
        tally.observe(&PassReport {
            full_rescan: false,
            changed: false,
            ..completed
        });
        assert_eq!(
            tally,
            PassTally {
                passes: 3,
                completed: 2,
                deferred: 1,
                failed: 0,
                full_rescans: 1,
                changed: 1,
            }
        );
    }

    #[test]
    fn scenario_clock_advances_per_pass() {
        let mut scenario = Scenario::new();
        let start = scenario.now();
        let _ = scenario.pass();
        let _ = scenario.pass();
        assert_eq!(scenario.now() - start, Duration::from_millis(200));
        assert_eq!(scenario.tally().passes, 2);
    }
}
