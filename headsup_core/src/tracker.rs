// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-set tracking between evaluation passes.
//!
//! [`DirtySetTracker`] turns [`ChangeEvent`]s into dirty marks and, at the
//! start of each pass, into the [`WorkingSets`] the rules run against. A
//! fresh tracker starts with a full rescan armed, so the first pass after
//! construction (or after [`force_full_rescan`](DirtySetTracker::force_full_rescan))
//! sees every scene object and every local material.

use understory_dirty::{CycleHandling, DirtyTracker};

use crate::dirty;
use crate::document::{ChangeEvent, Document, MaterialId, ObjectId};
use crate::rule::Rearm;

/// Entities and flags one pass must look at.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkingSets {
    /// Objects to scan, deduplicated, in handle order.
    pub objects: Vec<ObjectId>,
    /// Materials to scan, deduplicated, in handle order.
    pub materials: Vec<MaterialId>,
    /// This pass covers the whole document.
    pub full_rescan: bool,
    /// Collection topology changed; the visibility index must be rebuilt.
    pub topology_changed: bool,
    /// The compositor graph must be re-checked.
    pub compositor_changed: bool,
}

/// Accumulates dirty marks between passes.
pub struct DirtySetTracker {
    dirty: DirtyTracker<u64>,
}

impl core::fmt::Debug for DirtySetTracker {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DirtySetTracker").finish_non_exhaustive()
    }
}

impl Default for DirtySetTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl DirtySetTracker {
    /// Creates a tracker with a full rescan pending.
    #[must_use]
    pub fn new() -> Self {
        let mut tracker = Self {
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
        };
        tracker.force_full_rescan();
        tracker
    }

    // -- Marking API --

    /// Marks one object.
    pub fn mark_object(&mut self, id: ObjectId) {
        self.dirty.mark(id.key(), dirty::OBJECT);
    }

    /// Marks one material.
    pub fn mark_material(&mut self, id: MaterialId) {
        self.dirty.mark(id.key(), dirty::MATERIAL);
    }

    /// Marks collection topology as changed.
    ///
    /// Collection membership drives per-object visibility, so every object in
    /// the scene is marked too.
    pub fn mark_collection_topology(&mut self, doc: &dyn Document) {
        self.dirty.mark(dirty::GLOBAL, dirty::TOPOLOGY);
        for id in doc.scene_objects() {
            self.mark_object(id);
        }
    }

    /// Marks the compositor graph as changed.
    pub fn mark_compositor(&mut self) {
        self.dirty.mark(dirty::GLOBAL, dirty::COMPOSITOR);
    }

    /// Requests that the next pass scan the whole document.
    pub fn force_full_rescan(&mut self) {
        self.dirty.mark(dirty::GLOBAL, dirty::FULL_RESCAN);
    }

    /// Translates a change notification into dirty marks.
    pub fn record(&mut self, event: &ChangeEvent, doc: &dyn Document) {
        match *event {
            ChangeEvent::Object(id) => self.mark_object(id),
            ChangeEvent::Material(id) => self.mark_material(id),
            ChangeEvent::Collection(_) => self.mark_collection_topology(doc),
            ChangeEvent::ObjectVisibility => {
                for id in doc.scene_objects() {
                    self.mark_object(id);
                }
            }
            ChangeEvent::MaterialRename => {
                for id in doc.materials() {
                    if doc.material(id).is_some_and(|m| m.library.is_none()) {
                        self.mark_material(id);
                    }
                }
            }
            ChangeEvent::Compositor => self.mark_compositor(),
            ChangeEvent::Scene => {}
        }
    }

    /// Carries still-problematic entities over to the next pass.
    pub fn rearm(&mut self, rearm: &Rearm) {
        for &id in &rearm.objects {
            self.mark_object(id);
        }
        for &id in &rearm.materials {
            self.mark_material(id);
        }
        if rearm.collections {
            self.dirty.mark(dirty::GLOBAL, dirty::TOPOLOGY);
        }
        if rearm.compositor {
            self.mark_compositor();
        }
    }

    // -- Consumption --

    /// Drains every channel and resolves the marks against `doc`.
    ///
    /// Handles that no longer resolve (the entity was deleted after it was
    /// marked) are dropped silently.
    pub fn consume(&mut self, doc: &dyn Document) -> WorkingSets {
        let full_rescan = !self.drain(dirty::FULL_RESCAN).is_empty();
        let topology_changed = !self.drain(dirty::TOPOLOGY).is_empty();
        let compositor_changed = !self.drain(dirty::COMPOSITOR).is_empty();
        let object_keys = self.drain(dirty::OBJECT);
        let material_keys = self.drain(dirty::MATERIAL);

        if full_rescan {
            let mut objects = doc.scene_objects();
            objects.sort_unstable();
            let mut materials: Vec<MaterialId> = doc
                .materials()
                .into_iter()
                .filter(|&id| doc.material(id).is_some_and(|m| m.library.is_none()))
                .collect();
            materials.sort_unstable();
            return WorkingSets {
                objects,
                materials,
                full_rescan: true,
                topology_changed: true,
                compositor_changed: true,
            };
        }

        let mut objects: Vec<ObjectId> = object_keys
            .into_iter()
            .map(ObjectId::from_key)
            .filter(|&id| doc.object(id).is_some())
            .collect();
        objects.sort_unstable();
        objects.dedup();

        let mut materials: Vec<MaterialId> = material_keys
            .into_iter()
            .map(MaterialId::from_key)
            .filter(|&id| doc.material(id).is_some())
            .collect();
        materials.sort_unstable();
        materials.dedup();

        WorkingSets {
            objects,
            materials,
            full_rescan: false,
            topology_changed,
            compositor_changed,
        }
    }

    fn drain(&mut self, channel: understory_dirty::Channel) -> Vec<u64> {
        self.dirty.drain(channel).deterministic().run().collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Material, Object, ObjectKind, SceneStore};

    fn store_with_two_objects() -> (SceneStore, ObjectId, ObjectId) {
        let mut store = SceneStore::new();
        let a = store.add_object(Object::new("A", ObjectKind::Mesh));
        let b = store.add_object(Object::new("B", ObjectKind::Mesh));
        (store, a, b)
    }

    #[test]
    fn fresh_tracker_requests_full_rescan() {
        let (store, a, b) = store_with_two_objects();
        let mut tracker = DirtySetTracker::new();
        let sets = tracker.consume(&store);
        assert!(sets.full_rescan, "first pass must be a full rescan");
        assert!(sets.topology_changed, "full rescan implies topology");
        assert_eq!(sets.objects, vec![a, b]);
    }

    #[test]
    fn consume_clears_marks() {
        let (store, a, _) = store_with_two_objects();
        let mut tracker = DirtySetTracker::new();
        let _ = tracker.consume(&store);

        tracker.mark_object(a);
        assert_eq!(tracker.consume(&store).objects, vec![a]);
        assert_eq!(tracker.consume(&store), WorkingSets::default());
    }

    #[test]
    fn deleted_entities_are_dropped() {
        let (mut store, a, b) = store_with_two_objects();
        let mut tracker = DirtySetTracker::new();
        let _ = tracker.consume(&store);

        tracker.mark_object(a);
        tracker.mark_object(b);
        store.remove_object(a);
        assert_eq!(tracker.consume(&store).objects, vec![b]);
    }

    #[test]
    fn collection_change_marks_all_objects_and_topology() {
        let (store, a, b) = store_with_two_objects();
        let mut tracker = DirtySetTracker::new();
        let _ = tracker.consume(&store);

        tracker.record(&ChangeEvent::Collection(store.scene_collection()), &store);
        let sets = tracker.consume(&store);
        assert!(sets.topology_changed, "collection change is topological");
        assert!(!sets.full_rescan, "but not a full rescan");
        assert_eq!(sets.objects, vec![a, b]);
    }

    #[test]
    fn full_rescan_skips_linked_materials() {
        let mut store = SceneStore::new();
        let local = store.add_material(Material::new("Local"));
        let mut linked = Material::new("Linked");
        linked.library = Some("//lib.blend".into());
        let _ = store.add_material(linked);

        let mut tracker = DirtySetTracker::new();
        assert_eq!(tracker.consume(&store).materials, vec![local]);
    }

    #[test]
    fn rearm_carries_entities_to_next_pass() {
        let (store, a, _) = store_with_two_objects();
        let mut tracker = DirtySetTracker::new();
        let _ = tracker.consume(&store);

        let mut rearm = Rearm::default();
        rearm.objects.insert(a);
        rearm.compositor = true;
        tracker.rearm(&rearm);

        let sets = tracker.consume(&store);
        assert_eq!(sets.objects, vec![a]);
        assert!(sets.compositor_changed, "compositor flag re-armed");
    }
}
