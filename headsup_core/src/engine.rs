// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The evaluation scheduler.
//!
//! [`Engine`] owns everything that lives across passes: the configuration,
//! the dirty-set tracker, the visibility index, the published records and
//! detail lists, and the lifecycle latches. Hosts call
//! [`run_pass`](Engine::run_pass) for every change notification and after a
//! file load.
//!
//! A pass runs these steps:
//!
//! 1. **Guards**: a running modal operator or animation playback defers the
//!    pass. Nothing is evaluated; the call's events are queued for the next
//!    pass that runs.
//! 2. **Invalidation**: a scene switch or any change to the view layers'
//!    names, order or enabled flags arms a full rescan.
//! 3. **Working sets**: queued and delivered events are folded into the
//!    tracker, which is then consumed.
//! 4. **Visibility**: the index is rebuilt when topology changed.
//! 5. **Rules**: every enabled rule runs in id order. A failing rule is
//!    logged and skipped; the others still run.
//! 6. **Publish**: re-arm sets go back into the tracker, detail updates are
//!    applied, and the record list replaces the previous one if it differs.
//!    The presenter hears about it on a change, on a warn-state transition,
//!    or at a forced checkpoint.
//!
//! Steps 2 to 5 run inside a fault boundary. A failure there leaves the
//! published output untouched and arms a full rescan, so no dirty entity is
//! lost.

use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::document::{ChangeEvent, Document, Host, SceneId};
use crate::error::{PassError, RuleError, panic_message};
use crate::presenter::{PassOutput, Presenter};
use crate::rule::{RULES, Rearm, RuleContext, RuleId, RuleOutcome};
use crate::time::{Duration, HostTime};
use crate::trace::{
    DeferReason, PassBeginEvent, PassDeferredEvent, PassSummary, RuleFaultEvent, Tracer,
};
use crate::tracker::{DirtySetTracker, WorkingSets};
use crate::visibility::VisibilityIndex;
use crate::warning::{DetailLists, DetailUpdate, FiredRules, WarningRecord};

/// Time after engine creation during which every pass re-emits.
pub const STARTUP_GRACE: Duration = Duration::from_secs(2);

/// Inputs of one pass.
#[derive(Clone, Copy)]
pub struct PassInput<'a> {
    /// The host document, screen and activity state.
    pub host: &'a dyn Host,
    /// Change notifications delivered with this call.
    pub events: &'a [ChangeEvent],
    /// Current host time.
    pub now: HostTime,
}

impl core::fmt::Debug for PassInput<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PassInput")
            .field("events", &self.events)
            .field("now", &self.now)
            .finish_non_exhaustive()
    }
}

/// How a pass ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PassStatus {
    /// Rules ran and the output was published.
    Completed,
    /// A guard clause skipped the pass.
    Deferred,
    /// The pass failed; the previous output is still published.
    Failed,
}

/// Summary of one pass, returned to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PassReport {
    /// How the pass ended.
    pub status: PassStatus,
    /// The pass covered the whole document.
    pub full_rescan: bool,
    /// Objects in the working set.
    pub objects_scanned: usize,
    /// Materials in the working set.
    pub materials_scanned: usize,
    /// The record list differs from the previous pass.
    pub changed: bool,
    /// The pass was a forced checkpoint.
    pub forced: bool,
}

impl PassReport {
    const fn skipped(status: PassStatus) -> Self {
        Self {
            status,
            full_rescan: false,
            objects_scanned: 0,
            materials_scanned: 0,
            changed: false,
            forced: false,
        }
    }
}

/// Output of steps 2 to 5, not yet published.
#[derive(Debug)]
struct Evaluation {
    records: Vec<WarningRecord>,
    rearm: Rearm,
    details: Vec<DetailUpdate>,
    full_rescan: bool,
    objects_scanned: usize,
    materials_scanned: usize,
    rule_faults: usize,
}

impl Evaluation {
    fn new(sets: &WorkingSets) -> Self {
        Self {
            records: Vec::new(),
            rearm: Rearm::default(),
            details: Vec::new(),
            full_rescan: sets.full_rescan,
            objects_scanned: sets.objects.len(),
            materials_scanned: sets.materials.len(),
            rule_faults: 0,
        }
    }

    fn absorb(&mut self, rule: RuleId, outcome: RuleOutcome) {
        self.records
            .extend(outcome.messages.into_iter().map(|m| WarningRecord {
                rule,
                area: m.area,
                message: m.text,
            }));
        self.rearm.merge(&outcome.rearm);
        self.details.extend(outcome.details);
    }
}

/// The incremental warning engine.
pub struct Engine {
    config: Config,
    tracker: DirtySetTracker,
    visibility: VisibilityIndex,

    // -- Published output --
    records: Vec<WarningRecord>,
    details: DetailLists,
    fired: FiredRules,
    warn_state: bool,

    // -- Lifecycle --
    started_at: HostTime,
    startup_done: bool,
    emit_pending: bool,
    saved_just_now: bool,

    // -- Host snapshots --
    scene: Option<SceneId>,
    layers: Option<Vec<(String, bool)>>,

    queued: Vec<ChangeEvent>,
    pass_index: u64,
}

impl core::fmt::Debug for Engine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("records", &self.records.len())
            .field("warn_state", &self.warn_state)
            .field("startup_done", &self.startup_done)
            .field("pass_index", &self.pass_index)
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Creates an engine. The first pass is a full rescan and a forced
    /// checkpoint; passes re-emit until [`STARTUP_GRACE`] after `started_at`.
    #[must_use]
    pub fn new(config: Config, started_at: HostTime) -> Self {
        Self {
            config,
            tracker: DirtySetTracker::new(),
            visibility: VisibilityIndex::new(),
            records: Vec::new(),
            details: DetailLists::default(),
            fired: FiredRules::default(),
            warn_state: false,
            started_at,
            startup_done: false,
            emit_pending: true,
            saved_just_now: false,
            scene: None,
            layers: None,
            queued: Vec::new(),
            pass_index: 0,
        }
    }

    // -- Notification API --

    /// Queues a change notification for the next pass.
    pub fn notify(&mut self, event: ChangeEvent) {
        self.queued.push(event);
    }

    /// A document was loaded: rescan everything and re-emit.
    pub fn on_load(&mut self) {
        self.queued.clear();
        self.tracker.force_full_rescan();
        self.emit_pending = true;
        self.saved_just_now = false;
    }

    /// The document was saved: the version warning no longer applies.
    pub fn on_save(&mut self) {
        self.tracker.force_full_rescan();
        self.emit_pending = true;
        self.saved_just_now = true;
    }

    // -- Accessors --

    /// Preferences.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable preferences. Any change may switch rules on, so the next pass
    /// is a full rescan and a forced checkpoint.
    pub fn config_mut(&mut self) -> &mut Config {
        self.tracker.force_full_rescan();
        self.emit_pending = true;
        &mut self.config
    }

    /// Published records, in rule order.
    #[must_use]
    pub fn records(&self) -> &[WarningRecord] {
        &self.records
    }

    /// Whether any warning is published.
    #[must_use]
    pub fn warn_state(&self) -> bool {
        self.warn_state
    }

    /// Published detail lists.
    #[must_use]
    pub fn details(&self) -> &DetailLists {
        &self.details
    }

    /// Rules that produced a record in the latest completed pass.
    #[must_use]
    pub fn fired(&self) -> &FiredRules {
        &self.fired
    }

    /// Whether the startup grace period is over.
    #[must_use]
    pub fn startup_done(&self) -> bool {
        self.startup_done
    }

    /// Everything a presenter needs.
    #[must_use]
    pub fn output(&self) -> PassOutput<'_> {
        PassOutput {
            records: &self.records,
            warn_state: self.warn_state,
            details: &self.details,
            fired: &self.fired,
            config: &self.config,
            saved_just_now: self.saved_just_now,
        }
    }

    // -- Passes --

    /// Runs one pass without a trace sink.
    pub fn run_pass(&mut self, input: PassInput<'_>, presenter: &mut dyn Presenter) -> PassReport {
        self.run_pass_traced(input, presenter, &mut Tracer::none())
    }

    /// Runs one pass, reporting events to `tracer`.
    pub fn run_pass_traced(
        &mut self,
        input: PassInput<'_>,
        presenter: &mut dyn Presenter,
        tracer: &mut Tracer<'_>,
    ) -> PassReport {
        self.pass_index += 1;
        let pass_index = self.pass_index;
        tracer.pass_begin(&PassBeginEvent {
            pass_index,
            now: input.now,
            events: input.events.len(),
        });

        if let Some(reason) = defer_reason(input.host) {
            debug!(pass = pass_index, ?reason, "pass deferred");
            tracer.pass_deferred(&PassDeferredEvent {
                pass_index,
                now: input.now,
                reason,
            });
            self.queued.extend_from_slice(input.events);
            return PassReport::skipped(PassStatus::Deferred);
        }

        let result = catch_unwind(AssertUnwindSafe(|| {
            self.evaluate(input.host, input.events, pass_index, tracer)
        }))
        .unwrap_or_else(|payload| Err(PassError::Panicked(panic_message(&*payload))));

        let (report, rule_faults) = match result {
            Ok(evaluation) => {
                let rule_faults = evaluation.rule_faults;
                (self.publish(evaluation, input.now, presenter), rule_faults)
            }
            Err(err) => {
                error!(pass = pass_index, error = %err, "pass failed; keeping previous warnings");
                self.tracker.force_full_rescan();
                (PassReport::skipped(PassStatus::Failed), 0)
            }
        };
        tracer.pass_summary(&PassSummary {
            pass_index,
            now: input.now,
            report,
            records: self.records.len(),
            rule_faults,
        });
        report
    }

    /// Re-emits once the startup grace period has elapsed, even if no pass
    /// runs. Returns `true` on the call that ends the grace period.
    pub fn poll_startup(&mut self, now: HostTime, presenter: &mut dyn Presenter) -> bool {
        if self.startup_done || !self.grace_elapsed(now) {
            return false;
        }
        self.finish_startup();
        presenter.apply(&self.output());
        true
    }

    fn evaluate(
        &mut self,
        host: &dyn Host,
        events: &[ChangeEvent],
        pass_index: u64,
        tracer: &mut Tracer<'_>,
    ) -> Result<Evaluation, PassError> {
        let doc: &dyn Document = host;

        let scene = doc.scene_id();
        if self.scene.replace(scene) != Some(scene) {
            debug!(?scene, "scene changed; rescanning");
            self.tracker.force_full_rescan();
        }
        if self.view_layers_changed(doc) {
            debug!("view layers changed; rescanning");
            self.tracker.force_full_rescan();
        }

        for event in core::mem::take(&mut self.queued).iter().chain(events) {
            self.tracker.record(event, doc);
        }
        let sets = self.tracker.consume(doc);
        if sets.topology_changed {
            self.visibility.rebuild(doc)?;
        }

        let ctx = RuleContext {
            doc,
            viewports: host.viewports(),
            config: &self.config,
            visibility: &self.visibility,
            objects: &sets.objects,
            materials: &sets.materials,
            collections_dirty: sets.topology_changed,
            compositor_dirty: sets.compositor_changed,
            saved_just_now: self.saved_just_now,
            previous: &self.details,
        };
        let mut evaluation = Evaluation::new(&sets);
        for desc in RULES.iter().filter(|d| d.is_enabled(&self.config)) {
            let scoped = ctx.for_scope(desc.scope);
            let result = catch_unwind(AssertUnwindSafe(|| (desc.evaluate)(&scoped)))
                .unwrap_or_else(|payload| Err(RuleError::from_panic(&*payload)));
            match result {
                Ok(outcome) => evaluation.absorb(desc.id, outcome),
                Err(err) => {
                    warn!(rule = %desc.id, error = %err, "rule failed; skipping its warnings");
                    tracer.rule_fault(&RuleFaultEvent {
                        pass_index,
                        rule: desc.id,
                        error: err,
                    });
                    evaluation.rule_faults += 1;
                }
            }
        }
        Ok(evaluation)
    }

    fn publish(
        &mut self,
        evaluation: Evaluation,
        now: HostTime,
        presenter: &mut dyn Presenter,
    ) -> PassReport {
        self.tracker.rearm(&evaluation.rearm);

        let mut details = self.details.clone();
        for update in evaluation.details {
            details.apply(update);
        }
        let details_changed = details != self.details;
        self.details = details;

        let changed = evaluation.records != self.records;
        if changed {
            self.fired = FiredRules::from_records(&evaluation.records);
            self.records = evaluation.records;
        }

        let warn_state = !self.records.is_empty();
        let forced = self.emit_pending || !self.startup_done;
        let signal = forced || warn_state != self.warn_state;
        self.warn_state = warn_state;
        self.emit_pending = false;
        if !self.startup_done && self.grace_elapsed(now) {
            self.finish_startup();
        }

        if signal {
            self.signal_warn_state(presenter);
        }
        if changed || details_changed || signal {
            presenter.apply(&self.output());
        }

        debug!(
            pass = self.pass_index,
            full_rescan = evaluation.full_rescan,
            objects = evaluation.objects_scanned,
            materials = evaluation.materials_scanned,
            records = self.records.len(),
            changed,
            forced,
            "pass completed"
        );
        PassReport {
            status: PassStatus::Completed,
            full_rescan: evaluation.full_rescan,
            objects_scanned: evaluation.objects_scanned,
            materials_scanned: evaluation.materials_scanned,
            changed,
            forced,
        }
    }

    /// Snapshots the view layers' names and enabled flags; reports whether
    /// the snapshot differs from the previous pass.
    fn view_layers_changed(&mut self, doc: &dyn Document) -> bool {
        let current: Vec<(String, bool)> = doc
            .view_layers()
            .iter()
            .map(|layer| (layer.name.clone(), layer.enabled))
            .collect();
        self.layers.replace(current.clone()) != Some(current)
    }

    /// Snapshots the theme on the first signal, then swaps the border color.
    fn signal_warn_state(&mut self, presenter: &mut dyn Presenter) {
        let presentation = &mut self.config.presentation;
        if !presentation.first_setup_done {
            let theme = presenter.theme();
            presentation.original_theme_color = theme.border;
            presentation.highlight_color = theme.text_highlight;
            presentation.first_setup_done = true;
            info!("stored current theme color");
            return;
        }
        let color = if self.warn_state && !presentation.text_only {
            presentation.warn_color
        } else {
            presentation.original_theme_color
        };
        presenter.set_border_color(color);
    }

    fn grace_elapsed(&self, now: HostTime) -> bool {
        now.saturating_duration_since(self.started_at) > STARTUP_GRACE
    }

    fn finish_startup(&mut self) {
        self.startup_done = true;
        info!("startup grace period elapsed");
    }
}

fn defer_reason(host: &dyn Host) -> Option<DeferReason> {
    if host.is_modal_running() {
        Some(DeferReason::ModalRunning)
    } else if host.is_animation_playing() {
        Some(DeferReason::AnimationPlaying)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Rgb;
    use crate::document::{
        CompositorNodeKind, FileInfo, InteractionMode, Object, ObjectKind, SceneStore, ShapeKey,
        Version,
    };
    use crate::presenter::ThemeColors;
    use pretty_assertions::assert_eq;

    const THEME_BORDER: Rgb = Rgb([0.2, 0.2, 0.2]);
    const THEME_HIGHLIGHT: Rgb = Rgb([0.9, 0.9, 0.5]);

    #[derive(Debug, Default)]
    struct Recorder {
        applied: Vec<Vec<String>>,
        borders: Vec<Rgb>,
    }

    impl Presenter for Recorder {
        fn theme(&self) -> ThemeColors {
            ThemeColors {
                border: THEME_BORDER,
                text_highlight: THEME_HIGHLIGHT,
            }
        }

        fn set_border_color(&mut self, color: Rgb) {
            self.borders.push(color);
        }

        fn apply(&mut self, output: &PassOutput<'_>) {
            self.applied
                .push(output.records.iter().map(|r| r.message.clone()).collect());
        }
    }

    /// An engine whose startup grace is already over, so passes are only
    /// forced by lifecycle events.
    fn settled() -> Engine {
        let mut engine = Engine::new(Config::default(), HostTime(0));
        engine.finish_startup();
        engine
    }

    fn pass(engine: &mut Engine, store: &mut SceneStore, presenter: &mut Recorder) -> PassReport {
        let events = store.take_changes();
        engine.run_pass(
            PassInput {
                host: &*store,
                events: &events,
                now: HostTime(10_000_000_000),
            },
            presenter,
        )
    }

    fn messages(engine: &Engine) -> Vec<&str> {
        engine.records().iter().map(|r| r.message.as_str()).collect()
    }

    #[test]
    fn fresh_document_is_clean() {
        let mut store = SceneStore::new();
        let mut engine = settled();
        let mut presenter = Recorder::default();
        let report = pass(&mut engine, &mut store, &mut presenter);
        assert_eq!(report.status, PassStatus::Completed);
        assert!(report.full_rescan, "first pass scans everything");
        assert!(report.forced, "first pass is a checkpoint");
        assert!(engine.records().is_empty(), "{:?}", engine.records());
        assert!(!engine.warn_state());
        assert_eq!(presenter.applied, vec![Vec::<String>::new()]);
    }

    #[test]
    fn second_pass_without_edits_is_quiet() {
        let mut store = SceneStore::new();
        store.update_tool_settings(|t| t.use_keyframe_insert_auto = true);
        let mut engine = settled();
        let mut presenter = Recorder::default();
        let _ = pass(&mut engine, &mut store, &mut presenter);
        let first = engine.records().to_vec();

        let report = pass(&mut engine, &mut store, &mut presenter);
        assert!(!report.changed, "no edits, no change");
        assert!(!report.forced, "only the first pass is forced");
        assert!(!report.full_rescan, "second pass is incremental");
        assert_eq!(engine.records(), first.as_slice());
        assert_eq!(presenter.applied.len(), 1, "presenter is not called again");
    }

    #[test]
    fn theme_is_snapshotted_before_the_border_swaps() {
        let mut store = SceneStore::new();
        let mut engine = settled();
        let mut presenter = Recorder::default();
        let _ = pass(&mut engine, &mut store, &mut presenter);
        let presentation = &engine.config().presentation;
        assert!(presentation.first_setup_done, "latched on first signal");
        assert_eq!(presentation.original_theme_color, THEME_BORDER);
        assert_eq!(presentation.highlight_color, THEME_HIGHLIGHT);
        assert!(presenter.borders.is_empty(), "snapshot pass leaves the border");

        store.update_tool_settings(|t| t.use_keyframe_insert_auto = true);
        let _ = pass(&mut engine, &mut store, &mut presenter);
        store.update_tool_settings(|t| t.use_keyframe_insert_auto = false);
        let _ = pass(&mut engine, &mut store, &mut presenter);
        let warn = engine.config().presentation.warn_color;
        assert_eq!(presenter.borders, vec![warn, THEME_BORDER]);
    }

    #[test]
    fn text_only_mode_keeps_the_theme_border() {
        let mut store = SceneStore::new();
        let mut engine = settled();
        engine.config_mut().presentation.text_only = true;
        let mut presenter = Recorder::default();
        let _ = pass(&mut engine, &mut store, &mut presenter);

        store.update_tool_settings(|t| t.use_keyframe_insert_auto = true);
        let _ = pass(&mut engine, &mut store, &mut presenter);
        assert!(engine.warn_state());
        assert_eq!(presenter.borders, vec![THEME_BORDER]);
    }

    #[test]
    fn deferred_pass_touches_nothing() {
        let mut store = SceneStore::new();
        let mut engine = settled();
        let mut presenter = Recorder::default();
        let _ = pass(&mut engine, &mut store, &mut presenter);

        store.update_tool_settings(|t| t.use_keyframe_insert_auto = true);
        store.set_modal_running(true);
        let report = pass(&mut engine, &mut store, &mut presenter);
        assert_eq!(report.status, PassStatus::Deferred);
        assert!(engine.records().is_empty(), "nothing published while modal");
        assert_eq!(presenter.applied.len(), 1, "presenter untouched");

        store.set_modal_running(false);
        store.set_animation_playing(true);
        assert_eq!(
            pass(&mut engine, &mut store, &mut presenter).status,
            PassStatus::Deferred
        );

        store.set_animation_playing(false);
        let report = pass(&mut engine, &mut store, &mut presenter);
        assert_eq!(report.status, PassStatus::Completed);
        assert!(!report.full_rescan, "deferral does not arm a rescan");
        assert_eq!(messages(&engine), vec!["[Auto Keying] is ON!"]);
    }

    #[test]
    fn deferred_pass_keeps_its_events_for_the_next_pass() {
        let mut store = SceneStore::new();
        let cube = store.add_object(Object::new("Cube", ObjectKind::Mesh));
        store.link_object(store.scene_collection(), cube);
        let mut engine = settled();
        let mut presenter = Recorder::default();
        let _ = pass(&mut engine, &mut store, &mut presenter);

        store.set_animation_playing(true);
        store.update_object(cube, |o| o.hide_render = true);
        let report = pass(&mut engine, &mut store, &mut presenter);
        assert_eq!(report.status, PassStatus::Deferred);
        assert!(store.take_changes().is_empty(), "events went to the engine");

        store.set_animation_playing(false);
        let report = pass(&mut engine, &mut store, &mut presenter);
        assert_eq!(report.status, PassStatus::Completed);
        assert_eq!(report.objects_scanned, 1, "the deferred edit is scanned");
        assert_eq!(
            messages(&engine),
            vec!["[Object Render/Viewport Mismatch] check HeadsUp SidePanel"]
        );
    }

    #[test]
    fn failing_rule_does_not_block_the_others() {
        let mut store = SceneStore::new();
        let mut cube = Object::new("Cube", ObjectKind::Mesh);
        if let Some(mesh) = cube.mesh.as_mut() {
            mesh.shape_keys = vec![ShapeKey {
                name: "Basis".into(),
                value: 1.0,
            }];
            mesh.active_shape_key = 4;
        }
        let cube = store.add_object(cube);
        store.link_object(store.scene_collection(), cube);
        store.set_active_object(Some(cube));
        store.set_mode(InteractionMode::Sculpt);
        store.update_scene_settings(|s| s.use_autopack = true);

        let mut engine = settled();
        let mut presenter = Recorder::default();
        let report = pass(&mut engine, &mut store, &mut presenter);
        assert_eq!(report.status, PassStatus::Completed);
        assert!(!engine.fired().contains(RuleId::Numbered(3)), "rule 3 failed");
        assert!(engine.fired().contains(RuleId::Numbered(19)), "rule 19 still ran");
    }

    #[test]
    fn collection_cycle_fails_the_pass_and_keeps_output() {
        let mut store = SceneStore::new();
        store.update_tool_settings(|t| t.use_keyframe_insert_auto = true);
        let mut engine = settled();
        let mut presenter = Recorder::default();
        let _ = pass(&mut engine, &mut store, &mut presenter);
        let before = engine.records().to_vec();

        let outer = store.add_collection("Outer");
        let inner = store.add_collection_under(outer, "Inner");
        store.link_collection(inner, outer);
        store.update_tool_settings(|t| t.use_keyframe_insert_auto = false);
        let report = pass(&mut engine, &mut store, &mut presenter);
        assert_eq!(report.status, PassStatus::Failed);
        assert_eq!(engine.records(), before.as_slice(), "output kept");

        let report = pass(&mut engine, &mut store, &mut presenter);
        assert_eq!(report.status, PassStatus::Failed, "cycle still present");
    }

    #[test]
    fn incremental_pass_scans_only_the_edited_object() {
        let mut store = SceneStore::new();
        let a = store.add_object(Object::new("A", ObjectKind::Mesh));
        let b = store.add_object(Object::new("B", ObjectKind::Mesh));
        store.link_object(store.scene_collection(), a);
        store.link_object(store.scene_collection(), b);
        let mut engine = settled();
        let mut presenter = Recorder::default();
        assert_eq!(pass(&mut engine, &mut store, &mut presenter).objects_scanned, 2);

        store.update_object(b, |o| o.scale = [2.0, 2.0, 2.0]);
        let report = pass(&mut engine, &mut store, &mut presenter);
        assert!(!report.full_rescan);
        assert_eq!(report.objects_scanned, 1);
    }

    #[test]
    fn deleted_offender_leaves_the_mismatch_list() {
        let mut store = SceneStore::new();
        let odd = store.add_object(Object::new("Odd", ObjectKind::Mesh));
        store.link_object(store.scene_collection(), odd);
        store.set_object_visibility(odd, false, true);
        let mut engine = settled();
        let mut presenter = Recorder::default();
        let _ = pass(&mut engine, &mut store, &mut presenter);
        assert_eq!(engine.details().object_mismatches.len(), 1);

        store.remove_object(odd);
        let report = pass(&mut engine, &mut store, &mut presenter);
        assert_eq!(report.objects_scanned, 0, "the stale handle is dropped");
        assert!(engine.records().is_empty(), "{:?}", engine.records());
        assert!(engine.details().object_mismatches.is_empty());
        assert_eq!(presenter.applied.last(), Some(&Vec::new()));
    }

    #[test]
    fn view_layer_flip_forces_full_rescan() {
        let mut store = SceneStore::new();
        let second = store.add_view_layer("Shadows");
        let mut engine = settled();
        let mut presenter = Recorder::default();
        let _ = pass(&mut engine, &mut store, &mut presenter);

        store.update_view_layer(second, |l| l.enabled = false);
        assert!(pass(&mut engine, &mut store, &mut presenter).full_rescan);
        assert!(!pass(&mut engine, &mut store, &mut presenter).full_rescan);

        let _ = store.add_view_layer("Extra");
        assert!(pass(&mut engine, &mut store, &mut presenter).full_rescan, "count changed");
    }

    #[test]
    fn view_layer_rename_forces_full_rescan() {
        let mut store = SceneStore::new();
        store.update_scene_settings(|s| s.use_nodes = true);
        store.update_compositor(|tree| {
            let _ = tree.add_node(
                "Render Layers",
                CompositorNodeKind::RenderLayers {
                    layer: "ViewLayer".into(),
                },
            );
        });
        let mut engine = settled();
        let mut presenter = Recorder::default();
        let _ = pass(&mut engine, &mut store, &mut presenter);
        assert!(engine.records().is_empty(), "{:?}", engine.records());

        store.update_view_layer(0, |l| l.name = "Beauty".into());
        let report = pass(&mut engine, &mut store, &mut presenter);
        assert!(report.full_rescan, "same count, new name");
        assert_eq!(
            messages(&engine),
            vec!["[Compositor]: Renderlayer Node(s) missing"]
        );
        assert!(!pass(&mut engine, &mut store, &mut presenter).full_rescan);
    }

    #[test]
    fn scene_switch_forces_full_rescan() {
        let mut store = SceneStore::new();
        let mut engine = settled();
        let mut presenter = Recorder::default();
        let _ = pass(&mut engine, &mut store, &mut presenter);
        store.switch_scene(SceneId(2));
        assert!(pass(&mut engine, &mut store, &mut presenter).full_rescan);
    }

    #[test]
    fn save_suppresses_the_version_warning_until_load() {
        let mut store = SceneStore::new();
        store.set_file_info(FileInfo {
            filepath: "/proj/shot.blend".into(),
            file_version: Version::new(4, 1),
            runtime_version: Version::new(4, 2),
        });
        let mut engine = settled();
        let mut presenter = Recorder::default();
        let _ = pass(&mut engine, &mut store, &mut presenter);
        assert_eq!(
            messages(&engine),
            vec!["[Blender Version] File was last saved with Blender 4.1!"]
        );
        assert_eq!(engine.details().outdated_file_version, Some(Version::new(4, 1)));

        engine.on_save();
        let report = pass(&mut engine, &mut store, &mut presenter);
        assert!(report.forced && report.full_rescan, "save is a checkpoint");
        assert!(engine.records().is_empty());
        assert_eq!(engine.details().outdated_file_version, None);

        engine.on_load();
        let _ = pass(&mut engine, &mut store, &mut presenter);
        assert_eq!(engine.records().len(), 1, "load clears the saved flag");
    }

    #[test]
    fn startup_grace_forces_every_pass_until_elapsed() {
        let mut store = SceneStore::new();
        let mut engine = Engine::new(Config::default(), HostTime(0));
        let mut presenter = Recorder::default();
        let at = |secs: u64| HostTime(0) + Duration::from_secs(secs);

        for now in [at(0), at(1), at(3)] {
            let events = store.take_changes();
            let report = engine.run_pass(
                PassInput {
                    host: &store,
                    events: &events,
                    now,
                },
                &mut presenter,
            );
            assert!(report.forced, "pass at {now:?} is inside or ends the grace");
        }
        assert!(engine.startup_done());
        assert!(!pass(&mut engine, &mut store, &mut presenter).forced);
        assert_eq!(presenter.applied.len(), 3);
    }

    #[test]
    fn poll_startup_emits_once() {
        let mut engine = Engine::new(Config::default(), HostTime(0));
        let mut presenter = Recorder::default();
        assert!(!engine.poll_startup(HostTime(0) + Duration::from_secs(1), &mut presenter));
        assert!(engine.poll_startup(HostTime(0) + Duration::from_secs(3), &mut presenter));
        assert!(!engine.poll_startup(HostTime(0) + Duration::from_secs(4), &mut presenter));
        assert_eq!(presenter.applied.len(), 1);
    }

    #[test]
    fn config_change_rescans_and_reemits() {
        let mut store = SceneStore::new();
        store.update_render_settings(|r| r.film_transparent = false);
        let mut engine = settled();
        let mut presenter = Recorder::default();
        let _ = pass(&mut engine, &mut store, &mut presenter);
        assert!(engine.records().is_empty());

        engine.config_mut().rules.set(RuleId::Numbered(38), true);
        let report = pass(&mut engine, &mut store, &mut presenter);
        assert!(report.full_rescan && report.forced);
        assert!(engine.fired().contains(RuleId::Numbered(38)));
    }
}
