// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests over generated documents and edit sequences.

use headsup_core::area::{encode_tagged, filter_tagged};
use headsup_core::document::{
    AreaId, CollectionId, InteractionMode, Material, MaterialId, Object, ObjectId, ObjectKind,
    ShaderNode,
};
use headsup_core::{PassStatus, RuleId, WarningRecord};
use headsup_harness::Scenario;
use proptest::prelude::*;

const SCALES: [[f32; 3]; 5] = [
    [1.0, 1.0, 1.0],
    [2.0, 2.0, 2.0],
    [-1.0, -1.0, -1.0],
    [1.0, 2.0, 1.0],
    [1.0, 0.0, 1.0],
];

#[derive(Clone, Debug)]
struct ObjectSpec {
    mesh: bool,
    hide_viewport: bool,
    hide_render: bool,
    scale: usize,
}

/// Handles minted by [`build`], kept in sync with deletions.
#[derive(Debug)]
struct Fixture {
    objects: Vec<ObjectId>,
    materials: Vec<MaterialId>,
    set: CollectionId,
}

impl Fixture {
    fn object(&self, i: usize) -> Option<ObjectId> {
        (!self.objects.is_empty()).then(|| self.objects[i % self.objects.len()])
    }
}

/// A single-entity or scene-level edit.
#[derive(Clone, Debug)]
enum Edit {
    /// Flag edit with the host's visibility notification.
    Visibility {
        object: usize,
        hide_viewport: bool,
        hide_render: bool,
    },
    /// Render flag written as a plain object update.
    RenderFlag { object: usize, hide_render: bool },
    Scale { object: usize, scale: usize },
    Activate(Option<usize>),
    AutoKey(bool),
    Snap(bool),
    Mode(bool),
    RemoveObject(usize),
    RemoveMaterial(usize),
    /// Flags and exclusion of the collection holding every object.
    CollectionFlags {
        hide_viewport: bool,
        hide_render: bool,
        excluded: bool,
    },
    /// Visibility edit delivered to a pass deferred by playback.
    DeferredVisibility {
        object: usize,
        hide_viewport: bool,
        hide_render: bool,
    },
}

fn object_spec() -> impl Strategy<Value = ObjectSpec> {
    (any::<bool>(), any::<bool>(), any::<bool>(), 0..SCALES.len()).prop_map(
        |(mesh, hide_viewport, hide_render, scale)| ObjectSpec {
            mesh,
            hide_viewport,
            hide_render,
            scale,
        },
    )
}

/// Edits that target one object.
fn object_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (any::<usize>(), any::<bool>(), any::<bool>()).prop_map(
            |(object, hide_viewport, hide_render)| Edit::Visibility {
                object,
                hide_viewport,
                hide_render,
            }
        ),
        (any::<usize>(), any::<bool>())
            .prop_map(|(object, hide_render)| Edit::RenderFlag { object, hide_render }),
        (any::<usize>(), 0..SCALES.len()).prop_map(|(object, scale)| Edit::Scale { object, scale }),
        any::<usize>().prop_map(Edit::RemoveObject),
        (any::<usize>(), any::<bool>(), any::<bool>()).prop_map(
            |(object, hide_viewport, hide_render)| Edit::DeferredVisibility {
                object,
                hide_viewport,
                hide_render,
            }
        ),
    ]
}

/// Edits to scene state, materials and collections.
fn scene_edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        proptest::option::of(any::<usize>()).prop_map(Edit::Activate),
        any::<bool>().prop_map(Edit::AutoKey),
        any::<bool>().prop_map(Edit::Snap),
        any::<bool>().prop_map(Edit::Mode),
        any::<usize>().prop_map(Edit::RemoveMaterial),
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(hide_viewport, hide_render, excluded)| Edit::CollectionFlags {
                hide_viewport,
                hide_render,
                excluded,
            }
        ),
    ]
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![object_edit(), scene_edit()]
}

/// Builds the document and runs the first, full pass.
///
/// Each entry of `materials` adds a material; `true` gives it an undefined
/// node.
fn build(specs: &[ObjectSpec], materials: &[bool]) -> (Scenario, Fixture) {
    let mut scenario = Scenario::new();
    let mut fixture = None;
    scenario.edit(|s| {
        let set = s.add_collection("Set");
        let mut objects = Vec::new();
        for (i, shape) in specs.iter().enumerate() {
            let kind = if shape.mesh {
                ObjectKind::Mesh
            } else {
                ObjectKind::Empty
            };
            let mut object = Object::new(format!("Obj{i}"), kind);
            object.hide_viewport = shape.hide_viewport;
            object.hide_render = shape.hide_render;
            object.scale = SCALES[shape.scale];
            let id = s.add_object(object);
            s.link_object(set, id);
            objects.push(id);
        }
        let materials = materials
            .iter()
            .enumerate()
            .map(|(i, &undefined)| {
                let mut material = Material::new(format!("Mat{i}"));
                let idname = if undefined {
                    "NodeUndefined"
                } else {
                    "ShaderNodeBsdfPrincipled"
                };
                material.nodes.push(ShaderNode::new(idname));
                s.add_material(material)
            })
            .collect();
        fixture = Some(Fixture {
            objects,
            materials,
            set,
        });
    });
    let _ = scenario.pass();
    (scenario, fixture.unwrap())
}

fn apply(scenario: &mut Scenario, fixture: &mut Fixture, edit: &Edit) {
    match *edit {
        Edit::Visibility {
            object,
            hide_viewport,
            hide_render,
        } => {
            if let Some(id) = fixture.object(object) {
                scenario.edit(|s| s.set_object_visibility(id, hide_viewport, hide_render));
            }
        }
        Edit::RenderFlag {
            object,
            hide_render,
        } => {
            if let Some(id) = fixture.object(object) {
                scenario.edit(|s| s.update_object(id, |o| o.hide_render = hide_render));
            }
        }
        Edit::Scale { object, scale } => {
            if let Some(id) = fixture.object(object) {
                scenario.edit(|s| s.update_object(id, |o| o.scale = SCALES[scale]));
            }
        }
        Edit::Activate(object) => {
            let id = object.and_then(|i| fixture.object(i));
            scenario.edit(|s| s.set_active_object(id));
        }
        Edit::AutoKey(on) => {
            scenario.edit(|s| s.update_tool_settings(|t| t.use_keyframe_insert_auto = on));
        }
        Edit::Snap(on) => {
            scenario.edit(|s| s.update_tool_settings(|t| t.use_snap = on));
        }
        Edit::Mode(edit_mode) => {
            let mode = if edit_mode {
                InteractionMode::EditMesh
            } else {
                InteractionMode::Object
            };
            scenario.edit(|s| s.set_mode(mode));
        }
        Edit::RemoveObject(i) => {
            if !fixture.objects.is_empty() {
                let id = fixture.objects.remove(i % fixture.objects.len());
                scenario.edit(|s| s.remove_object(id));
            }
        }
        Edit::RemoveMaterial(i) => {
            if !fixture.materials.is_empty() {
                let id = fixture.materials.remove(i % fixture.materials.len());
                scenario.edit(|s| s.remove_material(id));
            }
        }
        Edit::CollectionFlags {
            hide_viewport,
            hide_render,
            excluded,
        } => {
            let set = fixture.set;
            scenario.edit(|s| {
                s.update_collection(set, |c| {
                    c.hide_viewport = hide_viewport;
                    c.hide_render = hide_render;
                });
                s.set_excluded(0, set, excluded);
            });
        }
        Edit::DeferredVisibility {
            object,
            hide_viewport,
            hide_render,
        } => {
            let Some(id) = fixture.object(object) else {
                return;
            };
            scenario.edit(|s| {
                s.set_animation_playing(true);
                s.set_object_visibility(id, hide_viewport, hide_render);
            });
            assert_eq!(scenario.pass().status, PassStatus::Deferred);
            scenario.edit(|s| s.set_animation_playing(false));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn repeated_pass_is_identical(
        specs in prop::collection::vec(object_spec(), 0..8),
        materials in prop::collection::vec(any::<bool>(), 0..4),
    ) {
        let (mut scenario, _) = build(&specs, &materials);
        let first = scenario.engine.records().to_vec();
        let report = scenario.pass();
        prop_assert_eq!(report.status, PassStatus::Completed);
        prop_assert!(!report.changed);
        prop_assert_eq!(scenario.engine.records(), first.as_slice());
    }

    #[test]
    fn incremental_passes_match_a_fresh_engine(
        specs in prop::collection::vec(object_spec(), 1..6),
        materials in prop::collection::vec(any::<bool>(), 0..4),
        edits in prop::collection::vec(edit(), 1..12),
    ) {
        let (mut scenario, mut fixture) = build(&specs, &materials);
        for edit in &edits {
            apply(&mut scenario, &mut fixture, edit);
            let report = scenario.pass();
            prop_assert_eq!(report.status, PassStatus::Completed);
            let (records, details) = scenario.fresh_evaluation();
            prop_assert_eq!(scenario.engine.records(), records.as_slice(), "after {:?}", edit);
            prop_assert_eq!(scenario.engine.details(), &details, "after {:?}", edit);
        }
    }

    #[test]
    fn full_rescan_recovers_missed_notifications(
        specs in prop::collection::vec(object_spec(), 1..6),
        materials in prop::collection::vec(any::<bool>(), 0..4),
        edits in prop::collection::vec(edit(), 1..8),
    ) {
        let (mut scenario, mut fixture) = build(&specs, &materials);
        for edit in &edits {
            apply(&mut scenario, &mut fixture, edit);
        }
        // The host lost every notification.
        let _ = scenario.store.take_changes();
        scenario.engine.on_load();
        let report = scenario.pass();
        prop_assert!(report.full_rescan);

        let (records, details) = scenario.fresh_evaluation();
        prop_assert_eq!(scenario.engine.records(), records.as_slice());
        prop_assert_eq!(scenario.engine.details(), &details);
    }

    #[test]
    fn tagged_text_reaches_only_its_area(
        message in "[A-Za-z0-9 '!\\[\\]]{1,40}",
        own in 0_u64..1_000_000,
        other in 0_u64..1_000_000,
    ) {
        prop_assume!(own != other);
        let record = WarningRecord::in_area(RuleId::Numbered(1), AreaId(own), message.clone());
        let lines = [encode_tagged(&record)];

        let mine = filter_tagged(&lines, AreaId(own));
        prop_assert_eq!(mine.messages, vec![message.trim()]);
        prop_assert!(mine.area_scoped_found);

        let theirs = filter_tagged(&lines, AreaId(other));
        prop_assert!(theirs.messages.is_empty());
        prop_assert!(!theirs.area_scoped_found);
    }

    #[test]
    fn one_render_toggle_gives_one_entry_and_one_summary(
        count in 1_usize..8,
        pick in any::<usize>(),
    ) {
        let specs = vec![
            ObjectSpec { mesh: true, hide_viewport: false, hide_render: false, scale: 0 };
            count
        ];
        let (mut scenario, fixture) = build(&specs, &[]);
        prop_assert!(scenario.engine.records().is_empty());

        let target = fixture.objects[pick % fixture.objects.len()];
        scenario.edit(|s| s.set_object_visibility(target, false, true));
        let _ = scenario.pass();

        let mismatches = &scenario.engine.details().object_mismatches;
        prop_assert_eq!(mismatches.len(), 1);
        prop_assert_eq!(mismatches[0].object, target);
        let summaries = scenario
            .engine
            .records()
            .iter()
            .filter(|r| r.rule == RuleId::Numbered(2))
            .count();
        prop_assert_eq!(summaries, 1);
    }
}
