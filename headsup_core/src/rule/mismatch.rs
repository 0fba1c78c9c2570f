// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render/viewport mismatch rules.
//!
//! Both rules report a single summary line and leave the per-entity detail in
//! [`DetailLists`](crate::warning::DetailLists). Mismatched entities are
//! re-armed so the next incremental pass checks them again even when nothing
//! about them changed; that is what keeps the detail lists complete without
//! a full rescan.

use std::collections::BTreeSet;

use super::{RuleContext, RuleOutcome};
use crate::config::ModifierScope;
use crate::document::{CollectionId, Document, Object, ObjectKind};
use crate::error::RuleResult;
use crate::visibility::VisibilityIndex;
use crate::warning::{CollectionMismatch, DetailUpdate, ModifierMismatch, ObjectMismatch};

/// Object types whose render/viewport flags are routinely different on
/// purpose.
const OBJECT_SKIPPED: [ObjectKind; 5] = [
    ObjectKind::Camera,
    ObjectKind::Empty,
    ObjectKind::Lattice,
    ObjectKind::Armature,
    ObjectKind::Speaker,
];

/// Object types whose modifier stacks are checked.
const MODIFIER_CHECKED: [ObjectKind; 5] = [
    ObjectKind::Mesh,
    ObjectKind::Curve,
    ObjectKind::Lattice,
    ObjectKind::Font,
    ObjectKind::GreasePencil,
];

/// Names of the view layers in which `object` is visible through one of its
/// collections.
fn visible_layers(visibility: &VisibilityIndex, object: &Object) -> Vec<String> {
    visibility
        .layers_showing(&object.collections)
        .map(str::to_owned)
        .collect()
}

pub(super) fn visibility_mismatch(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();

    // An empty working set leaves the previous object list standing, minus
    // the objects deleted since.
    let objects: Vec<ObjectMismatch> = if ctx.objects.is_empty() {
        ctx.previous
            .object_mismatches
            .iter()
            .filter(|m| ctx.doc.object(m.object).is_some())
            .cloned()
            .collect()
    } else {
        object_mismatches(ctx)
    };
    out.details.push(DetailUpdate::ObjectMismatches(objects.clone()));
    out.rearm.objects.extend(objects.iter().map(|m| m.object));

    let collections = if ctx.collections_dirty {
        let list = collection_mismatches(ctx.doc);
        out.details
            .push(DetailUpdate::CollectionMismatches(list.clone()));
        list
    } else {
        ctx.previous.collection_mismatches.clone()
    };
    // Collections stay armed for as long as any of them mismatches.
    out.rearm.collections = !collections.is_empty();

    match (objects.is_empty(), collections.is_empty()) {
        (true, false) => {
            out.warn("[Collection Render/Viewport Mismatch] check HeadsUp SidePanel");
        }
        (false, true) => {
            out.warn("[Object Render/Viewport Mismatch] check HeadsUp SidePanel");
        }
        (false, false) => {
            out.warn("[Object & Collection Render/Viewport Mismatches] check HeadsUp SidePanel");
        }
        (true, true) => {}
    }
    Ok(out)
}

fn object_mismatches(ctx: &RuleContext<'_>) -> Vec<ObjectMismatch> {
    ctx.objects
        .iter()
        .filter_map(|&id| ctx.doc.object(id).map(|object| (id, object)))
        .filter(|(_, object)| !OBJECT_SKIPPED.contains(&object.kind))
        .filter(|(_, object)| object.hide_render != object.hide_viewport)
        .filter_map(|(id, object)| {
            let view_layers = visible_layers(ctx.visibility, object);
            (!view_layers.is_empty()).then(|| ObjectMismatch {
                object: id,
                name: object.name.clone(),
                hide_render: object.hide_render,
                hide_viewport: object.hide_viewport,
                view_layers,
            })
        })
        .collect()
}

/// Walks every view layer's collection tree, disabled layers included.
///
/// Excluded collections are not reported for that layer, but their children
/// are still visited. Entries are in first-seen order.
fn collection_mismatches(doc: &dyn Document) -> Vec<CollectionMismatch> {
    let mut found: Vec<CollectionMismatch> = Vec::new();
    for layer in doc.view_layers() {
        let mut path = Vec::new();
        walk_collections(
            doc,
            doc.scene_collection(),
            &layer.excluded,
            &mut path,
            &mut |id, hide_render, hide_viewport, name| {
                if let Some(entry) = found.iter_mut().find(|m| m.collection == id) {
                    entry.view_layers.push(layer.name.clone());
                } else {
                    found.push(CollectionMismatch {
                        collection: id,
                        name: name.to_owned(),
                        hide_render,
                        hide_viewport,
                        view_layers: vec![layer.name.clone()],
                    });
                }
            },
        );
    }
    found
}

fn walk_collections(
    doc: &dyn Document,
    id: CollectionId,
    excluded: &BTreeSet<CollectionId>,
    path: &mut Vec<CollectionId>,
    report: &mut dyn FnMut(CollectionId, bool, bool, &str),
) {
    // Cycles are reported by the visibility rebuild; here they just stop.
    if path.contains(&id) {
        return;
    }
    let Some(collection) = doc.collection(id) else {
        return;
    };
    if !excluded.contains(&id) && collection.hide_render != collection.hide_viewport {
        report(
            id,
            collection.hide_render,
            collection.hide_viewport,
            &collection.name,
        );
    }
    path.push(id);
    for &child in &collection.children {
        walk_collections(doc, child, excluded, path, report);
    }
    path.pop();
}

pub(super) fn modifier_mismatch(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if !ctx.in_object_mode() {
        // Skipped passes must not lose track of known offenders.
        out.rearm
            .objects
            .extend(ctx.previous.modifier_mismatches.iter().map(|m| m.object));
        return Ok(out);
    }
    match ctx.config.options.modifier_scope {
        ModifierScope::ActiveOnly => {
            let Some((_, object)) = ctx.active_object()? else {
                return Ok(out);
            };
            if object.hide_render || object.hide_viewport {
                return Ok(out);
            }
            let mut names = mismatched_modifiers(object);
            if !names.is_empty() {
                names.sort_unstable();
                out.warn(format!(
                    "[Modifier Visibility Mismatch] for [{}]",
                    names.join(" & ")
                ));
            }
        }
        ModifierScope::AllObjects => {
            let list = modifier_mismatches(ctx);
            out.rearm.objects.extend(list.iter().map(|m| m.object));
            if !list.is_empty() {
                out.warn("[Modifier Render/Viewport Mismatch] check HeadsUp SidePanel");
            }
            out.details.push(DetailUpdate::ModifierMismatches(list));
        }
    }
    Ok(out)
}

fn mismatched_modifiers(object: &Object) -> Vec<&str> {
    object
        .modifiers
        .iter()
        .filter(|m| m.show_viewport != m.show_render)
        .map(|m| m.name.as_str())
        .collect()
}

fn modifier_mismatches(ctx: &RuleContext<'_>) -> Vec<ModifierMismatch> {
    let mut list = Vec::new();
    for &id in ctx.objects {
        let Some(object) = ctx.doc.object(id) else {
            continue;
        };
        if !MODIFIER_CHECKED.contains(&object.kind) || (object.hide_viewport && object.hide_render)
        {
            continue;
        }
        let modifiers = mismatched_modifiers(object);
        if modifiers.is_empty() {
            continue;
        }
        let view_layers = visible_layers(ctx.visibility, object);
        if view_layers.is_empty() {
            continue;
        }
        list.push(ModifierMismatch {
            object: id,
            name: object.name.clone(),
            modifiers: modifiers.into_iter().map(str::to_owned).collect(),
            view_layers,
        });
    }
    list
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::document::{InteractionMode, Modifier, ModifierKind, ObjectId, SceneStore};
    use crate::rule::RuleId;
    use crate::rule::tests::{run_rule, run_rule_with, texts};
    use crate::warning::DetailLists;

    fn linked(store: &mut SceneStore, name: &str, kind: ObjectKind) -> ObjectId {
        let root = store.scene_collection();
        let id = store.add_object(Object::new(name, kind));
        store.link_object(root, id);
        id
    }

    #[test]
    fn one_mismatched_object_gives_one_entry() {
        let mut store = SceneStore::new();
        let _fine = linked(&mut store, "Fine", ObjectKind::Mesh);
        let odd = linked(&mut store, "Odd", ObjectKind::Mesh);
        store.set_object_visibility(odd, false, true);

        let out = run_rule(&store, &Config::default(), RuleId::Numbered(2));
        assert_eq!(
            texts(&out),
            vec!["[Object Render/Viewport Mismatch] check HeadsUp SidePanel"]
        );
        let mut details = DetailLists::default();
        for update in out.details {
            details.apply(update);
        }
        assert_eq!(details.object_mismatches.len(), 1);
        assert_eq!(details.object_mismatches[0].object, odd);
        assert_eq!(details.object_mismatches[0].view_layers, vec!["ViewLayer"]);
        assert!(out.rearm.objects.contains(&odd), "offender is re-armed");
    }

    #[test]
    fn cameras_and_unlinked_objects_are_ignored() {
        let mut store = SceneStore::new();
        let cam = linked(&mut store, "Cam", ObjectKind::Camera);
        store.set_object_visibility(cam, true, false);
        let loose = store.add_object(Object::new("Loose", ObjectKind::Mesh));
        store.set_object_visibility(loose, true, false);

        let out = run_rule(&store, &Config::default(), RuleId::Numbered(2));
        assert!(out.messages.is_empty());
    }

    #[test]
    fn collection_mismatch_skips_excluded_but_walks_children() {
        let mut store = SceneStore::new();
        let parent = store.add_collection("Parent");
        let child = store.add_collection_under(parent, "Child");
        store.update_collection(parent, |c| c.hide_viewport = true);
        store.update_collection(child, |c| c.hide_viewport = true);
        store.set_excluded(0, parent, true);

        let out = run_rule(&store, &Config::default(), RuleId::Numbered(2));
        assert_eq!(
            texts(&out),
            vec!["[Collection Render/Viewport Mismatch] check HeadsUp SidePanel"]
        );
        assert!(out.rearm.collections, "stays armed while mismatched");
        let Some(DetailUpdate::CollectionMismatches(list)) = out.details.last() else {
            panic!("collection list not updated: {:?}", out.details);
        };
        let names: Vec<&str> = list.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Child"]);
    }

    #[test]
    fn both_kinds_use_the_combined_summary() {
        let mut store = SceneStore::new();
        let props = store.add_collection("Props");
        store.update_collection(props, |c| c.hide_viewport = true);
        let odd = linked(&mut store, "Odd", ObjectKind::Mesh);
        store.set_object_visibility(odd, true, false);

        let out = run_rule(&store, &Config::default(), RuleId::Numbered(2));
        assert_eq!(
            texts(&out),
            vec!["[Object & Collection Render/Viewport Mismatches] check HeadsUp SidePanel"]
        );
    }

    #[test]
    fn previous_collection_list_is_used_when_not_armed() {
        use crate::document::ViewportEnumerator;
        use crate::rule::descriptor;

        let store = SceneStore::new();
        let previous = DetailLists {
            collection_mismatches: vec![CollectionMismatch {
                collection: CollectionId(3),
                name: "Old".into(),
                hide_render: true,
                hide_viewport: false,
                view_layers: vec!["ViewLayer".into()],
            }],
            ..DetailLists::default()
        };
        let config = Config::default();
        let visibility = VisibilityIndex::new();
        let ctx = RuleContext {
            doc: &store,
            viewports: store.viewports(),
            config: &config,
            visibility: &visibility,
            objects: &[],
            materials: &[],
            collections_dirty: false,
            compositor_dirty: false,
            saved_just_now: false,
            previous: &previous,
        };
        let out = (descriptor(RuleId::Numbered(2)).unwrap().evaluate)(&ctx).unwrap();
        assert!(out.details.is_empty(), "nothing recomputed");
        assert!(out.rearm.collections);
        assert_eq!(out.messages.len(), 1);
    }

    #[test]
    fn active_only_modifier_names_are_sorted() {
        let mut store = SceneStore::new();
        let mut cube = Object::new("Cube", ObjectKind::Mesh);
        let mut bevel = Modifier::new("Bevel", ModifierKind::Other);
        bevel.show_render = false;
        let mut array = Modifier::new("Array", ModifierKind::Array { relative_offset: false });
        array.show_viewport = false;
        cube.modifiers = vec![bevel, array];
        let id = store.add_object(cube);
        store.set_active_object(Some(id));

        let out = run_rule(&store, &Config::default(), RuleId::Numbered(25));
        assert_eq!(
            texts(&out),
            vec!["[Modifier Visibility Mismatch] for [Array & Bevel]"]
        );
    }

    #[test]
    fn all_objects_mode_fills_the_side_panel() {
        let mut store = SceneStore::new();
        let id = linked(&mut store, "Cube", ObjectKind::Mesh);
        store.update_object(id, |o| {
            let mut m = Modifier::new("Subdivision", ModifierKind::Other);
            m.show_render = false;
            o.modifiers.push(m);
        });
        let mut config = Config::default();
        config.options.modifier_scope = ModifierScope::AllObjects;

        let out = run_rule(&store, &config, RuleId::Numbered(25));
        assert_eq!(
            texts(&out),
            vec!["[Modifier Render/Viewport Mismatch] check HeadsUp SidePanel"]
        );
        assert!(out.rearm.objects.contains(&id));
        assert!(matches!(
            out.details.as_slice(),
            [DetailUpdate::ModifierMismatches(list)] if list[0].modifiers == vec!["Subdivision"]
        ));
    }

    #[test]
    fn outside_object_mode_previous_offenders_stay_armed() {
        let mut store = SceneStore::new();
        store.set_mode(InteractionMode::EditMesh);
        let id = linked(&mut store, "Cube", ObjectKind::Mesh);
        let previous = DetailLists {
            modifier_mismatches: vec![ModifierMismatch {
                object: id,
                name: "Cube".into(),
                modifiers: vec!["Bevel".into()],
                view_layers: vec!["ViewLayer".into()],
            }],
            ..DetailLists::default()
        };
        let mut config = Config::default();
        config.options.modifier_scope = ModifierScope::AllObjects;
        let out = run_rule_with(&store, &config, RuleId::Numbered(25), &previous);
        assert!(out.messages.is_empty());
        assert!(out.details.is_empty(), "previous list is left standing");
        assert!(out.rearm.objects.contains(&id));
    }
}
