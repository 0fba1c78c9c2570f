// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end scenarios through [`Scenario`].

use headsup_core::PassStatus;
use headsup_core::document::{
    EditorKind, FileInfo, InteractionMode, Object, ObjectId, ObjectKind, SceneStore, Version,
};
use headsup_core::time::Duration;
use headsup_debug::jsonl::JsonLinesSink;
use headsup_harness::{Scenario, init_tracing};
use pretty_assertions::assert_eq;
use serde_json::Value;

/// Adds a mesh linked into a fresh, visible collection.
fn linked_mesh(store: &mut SceneStore, collection: &str, name: &str) -> ObjectId {
    let parent = store.add_collection(collection);
    let id = store.add_object(Object::new(name, ObjectKind::Mesh));
    store.link_object(parent, id);
    id
}

#[test]
fn fresh_document_has_no_warnings() {
    init_tracing();
    let mut scenario = Scenario::new();
    let report = scenario.pass();

    assert_eq!(report.status, PassStatus::Completed);
    assert!(scenario.engine.records().is_empty());
    assert!(!scenario.engine.warn_state());
    let last = scenario.presenter.last().unwrap();
    assert!(!last.warn_state);
}

#[test]
fn auto_keying_warns_in_object_mode() {
    init_tracing();
    let mut scenario = Scenario::new();
    scenario.edit(|s| {
        let cube = linked_mesh(s, "Props", "Cube");
        s.set_active_object(Some(cube));
        s.set_mode(InteractionMode::Object);
        s.update_tool_settings(|t| t.use_keyframe_insert_auto = true);
    });
    let _ = scenario.pass();

    assert!(scenario.messages().contains(&"[Auto Keying] is ON!"));
    assert!(scenario.engine.warn_state());
    assert!(scenario.presenter.last().unwrap().warn_state);
}

#[test]
fn one_mismatched_object_gives_one_summary() {
    init_tracing();
    let mut scenario = Scenario::new();
    scenario.edit(|s| {
        let parent = s.add_collection("Props");
        let hidden = s.add_object(Object::new("Hidden", ObjectKind::Mesh));
        let plain = s.add_object(Object::new("Plain", ObjectKind::Mesh));
        s.link_object(parent, hidden);
        s.link_object(parent, plain);
        s.set_object_visibility(hidden, false, true);
    });
    let _ = scenario.pass();

    let details = scenario.engine.details();
    assert_eq!(details.object_mismatches.len(), 1);
    assert_eq!(details.object_mismatches[0].name, "Hidden");
    assert_eq!(
        scenario.messages(),
        vec!["[Object Render/Viewport Mismatch] check HeadsUp SidePanel"]
    );
}

#[test]
fn older_file_version_warns_until_saved() {
    init_tracing();
    let mut scenario = Scenario::new();
    scenario.edit(|s| {
        s.set_file_info(FileInfo {
            filepath: "/projects/shot_010.blend".into(),
            file_version: Version::new(4, 1),
            runtime_version: Version::new(4, 2),
        });
    });
    let _ = scenario.pass();
    assert_eq!(
        scenario.messages(),
        vec!["[Blender Version] File was last saved with Blender 4.1!"]
    );

    scenario.engine.on_save();
    let report = scenario.pass();
    assert!(report.forced);
    assert!(scenario.messages().is_empty());
    assert!(scenario.presenter.last().unwrap().saved_just_now);
}

#[test]
fn modal_operator_defers_without_losing_marks() {
    init_tracing();
    let mut scenario = Scenario::new();
    let mut cube = None;
    scenario.edit(|s| cube = Some(linked_mesh(s, "Props", "Cube")));
    let cube = cube.unwrap();
    let _ = scenario.pass();
    let applied = scenario.presenter.applied.len();

    // The host queues the edit's notification while a modal operator runs.
    scenario.edit(|s| {
        s.set_modal_running(true);
        s.update_object(cube, |o| o.hide_render = true);
    });
    for event in scenario.store.take_changes() {
        scenario.engine.notify(event);
    }
    let report = scenario.pass();
    assert_eq!(report.status, PassStatus::Deferred);
    assert!(scenario.engine.records().is_empty());
    assert_eq!(scenario.presenter.applied.len(), applied, "nothing published");

    scenario.edit(|s| s.set_modal_running(false));
    let report = scenario.pass();
    assert_eq!(report.status, PassStatus::Completed);
    assert!(!report.full_rescan);
    assert_eq!(report.objects_scanned, 1, "the queued object is still marked");
    assert_eq!(
        scenario.messages(),
        vec!["[Object Render/Viewport Mismatch] check HeadsUp SidePanel"]
    );
}

#[test]
fn playback_defers_edits_delivered_with_the_pass() {
    init_tracing();
    let mut scenario = Scenario::new();
    let mut cube = None;
    scenario.edit(|s| cube = Some(linked_mesh(s, "Props", "Cube")));
    let cube = cube.unwrap();
    let _ = scenario.pass();

    scenario.edit(|s| {
        s.set_animation_playing(true);
        s.update_object(cube, |o| o.hide_render = true);
    });
    assert_eq!(scenario.pass().status, PassStatus::Deferred);

    scenario.edit(|s| s.set_animation_playing(false));
    let report = scenario.pass();
    assert_eq!(report.status, PassStatus::Completed);
    assert_eq!(report.objects_scanned, 1);
    let (records, _) = scenario.fresh_evaluation();
    assert_eq!(scenario.engine.records(), records.as_slice());
    assert_eq!(
        scenario.messages(),
        vec!["[Object Render/Viewport Mismatch] check HeadsUp SidePanel"]
    );
}

#[test]
fn deleting_a_mismatched_object_clears_the_summary() {
    init_tracing();
    let mut scenario = Scenario::new();
    let mut odd = None;
    scenario.edit(|s| {
        let id = linked_mesh(s, "Props", "Odd");
        s.set_object_visibility(id, false, true);
        odd = Some(id);
    });
    let odd = odd.unwrap();
    let _ = scenario.pass();
    assert_eq!(scenario.engine.details().object_mismatches.len(), 1);

    scenario.edit(|s| s.remove_object(odd));
    let _ = scenario.pass();
    assert!(scenario.messages().is_empty());
    assert!(scenario.engine.details().object_mismatches.is_empty());
    assert!(scenario.fresh_evaluation().0.is_empty(), "a fresh engine agrees");
    assert!(!scenario.presenter.last().unwrap().warn_state);
}

#[test]
fn startup_grace_re_emits_once_when_idle() {
    init_tracing();
    let mut scenario = Scenario::at_startup();
    let _ = scenario.pass();
    let _ = scenario.pass();
    assert_eq!(scenario.presenter.applied.len(), 2, "every grace pass re-emits");

    assert!(!scenario.wait(Duration::from_millis(500)));
    assert!(scenario.wait(Duration::from_secs(2)));
    assert!(!scenario.wait(Duration::from_secs(1)), "fires once");
    assert_eq!(scenario.presenter.applied.len(), 3);
    assert!(scenario.engine.startup_done());
}

#[test]
fn area_warning_reaches_only_its_viewport() {
    init_tracing();
    let mut scenario = Scenario::new();
    let mut areas = None;
    scenario.edit(|s| {
        let locked = s.add_viewport(EditorKind::View3d);
        let plain = s.add_viewport(EditorKind::View3d);
        s.update_viewport(locked, |v| {
            if let Some(view) = v.view3d.as_mut() {
                view.lock_camera = true;
            }
        });
        s.update_tool_settings(|t| t.use_snap = true);
        areas = Some((locked, plain));
    });
    let (locked, plain) = areas.unwrap();
    let _ = scenario.pass();

    let own = scenario.overlay(locked).unwrap();
    assert_eq!(
        own.text(),
        "HeadsUp: [Camera to View] is ON! , [Snapping] is ON!"
    );
    let other = scenario.overlay(plain).unwrap();
    assert_eq!(other.text(), "HeadsUp: [Snapping] is ON!");
}

#[test]
fn trace_sink_sees_every_pass() {
    init_tracing();
    let mut scenario = Scenario::new();
    let mut sink = JsonLinesSink::new(Vec::new());
    let _ = scenario.pass_traced(&mut sink);
    scenario.edit(|s| s.set_modal_running(true));
    let _ = scenario.pass_traced(&mut sink);

    let text = String::from_utf8(sink.into_inner()).unwrap();
    let events: Vec<Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    let kinds: Vec<&str> = events
        .iter()
        .map(|e| e["event"].as_str().unwrap())
        .collect();
    assert_eq!(
        kinds,
        vec!["pass_begin", "pass_summary", "pass_begin", "pass_deferred"]
    );
    assert_eq!(events[1]["full_rescan"], true);
    assert_eq!(events[3]["reason"], "ModalRunning");
}
