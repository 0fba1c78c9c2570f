// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory document with generational handles and change recording.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::id::{AreaId, CollectionId, MaterialId, ObjectId, SceneId};
use super::model::{
    ChangeEvent, Collection, EditorKind, FileInfo, Image, InteractionMode, Library, Material,
    NodeTree, Object, RenderSettings, SceneSettings, Strip, TextBlock, ToolSettings, ViewLayer,
    Viewport,
};
use super::{Document, HostActivity, ViewportEnumerator};

/// Slot storage with a free list and per-slot generation counters.
#[derive(Debug)]
struct Slots<T> {
    items: Vec<Option<T>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
}

impl<T> Slots<T> {
    const fn new() -> Self {
        Self {
            items: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Inserts `item`, returning `(idx, generation)`.
    fn insert(&mut self, item: T) -> (u32, u32) {
        if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            self.generation[idx as usize] += 1;
            self.items[idx as usize] = Some(item);
            (idx, self.generation[idx as usize])
        } else {
            let idx = u32::try_from(self.items.len()).unwrap_or(u32::MAX);
            self.items.push(Some(item));
            self.generation.push(0);
            (idx, 0)
        }
    }

    fn get(&self, idx: u32, generation: u32) -> Option<&T> {
        if self.generation.get(idx as usize) != Some(&generation) {
            return None;
        }
        self.items.get(idx as usize)?.as_ref()
    }

    fn get_mut(&mut self, idx: u32, generation: u32) -> Option<&mut T> {
        if self.generation.get(idx as usize) != Some(&generation) {
            return None;
        }
        self.items.get_mut(idx as usize)?.as_mut()
    }

    fn remove(&mut self, idx: u32, generation: u32) -> Option<T> {
        if self.generation.get(idx as usize) != Some(&generation) {
            return None;
        }
        let item = self.items.get_mut(idx as usize)?.take()?;
        // Bump generation so old handles immediately fail lookups.
        self.generation[idx as usize] += 1;
        self.free_list.push(idx);
        Some(item)
    }

    fn live(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.items
            .iter()
            .zip(&self.generation)
            .enumerate()
            .filter(|(_, (item, _))| item.is_some())
            .filter_map(|(idx, (_, generation))| Some((u32::try_from(idx).ok()?, *generation)))
    }
}

/// In-memory [`Document`] for tests, demos and hosts that mirror their data
/// into a plain model.
///
/// Objects and materials are addressed by generational handles: deleting an
/// entity bumps its slot's generation, so handles held elsewhere (for
/// example in a dirty set) resolve to `None` afterwards. Collections are
/// never freed.
///
/// Every mutation records the [`ChangeEvent`]s a host would emit for it.
/// Drain them with [`take_changes`](Self::take_changes) and hand them to the
/// engine.
#[derive(Debug)]
pub struct SceneStore {
    scene_id: SceneId,

    // -- Entities --
    objects: Slots<Object>,
    materials: Slots<Material>,
    collections: Vec<Collection>,
    view_layers: Vec<ViewLayer>,
    active_object: Option<ObjectId>,

    // -- Scene state --
    mode: InteractionMode,
    tool_settings: ToolSettings,
    render: RenderSettings,
    scene: SceneSettings,
    compositor: Option<NodeTree>,
    strips: Vec<Strip>,

    // -- File state --
    texts: Vec<TextBlock>,
    images: Vec<Image>,
    libraries: Vec<Library>,
    file_info: FileInfo,
    existing_paths: BTreeSet<PathBuf>,

    // -- Screen --
    viewports: Vec<Viewport>,
    next_area: u64,
    modal_running: bool,
    animation_playing: bool,

    // -- Change recording --
    pending: Vec<ChangeEvent>,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneStore {
    /// Creates a document with one scene collection and one view layer named
    /// `ViewLayer`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scene_id: SceneId(1),
            objects: Slots::new(),
            materials: Slots::new(),
            collections: vec![Collection::new("Scene Collection")],
            view_layers: vec![ViewLayer::new("ViewLayer")],
            active_object: None,
            mode: InteractionMode::Object,
            tool_settings: ToolSettings::default(),
            render: RenderSettings::default(),
            scene: SceneSettings::default(),
            compositor: None,
            strips: Vec::new(),
            texts: Vec::new(),
            images: Vec::new(),
            libraries: Vec::new(),
            file_info: FileInfo::default(),
            existing_paths: BTreeSet::new(),
            viewports: Vec::new(),
            next_area: 1,
            modal_running: false,
            animation_playing: false,
            pending: Vec::new(),
        }
    }

    /// Drains the change events recorded since the last call.
    pub fn take_changes(&mut self) -> Vec<ChangeEvent> {
        core::mem::take(&mut self.pending)
    }

    /// Switches to another scene. Engines treat this like opening a new
    /// document and rescan everything.
    pub fn switch_scene(&mut self, scene: SceneId) {
        self.scene_id = scene;
        self.pending.push(ChangeEvent::Scene);
    }

    // -- Object API --

    /// Adds an object. Link it into a collection with
    /// [`link_object`](Self::link_object) to make it visible anywhere.
    pub fn add_object(&mut self, object: Object) -> ObjectId {
        let (idx, generation) = self.objects.insert(object);
        let id = ObjectId { idx, generation };
        self.pending.push(ChangeEvent::Object(id));
        id
    }

    /// Deletes an object. Outstanding handles become stale.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove_object(&mut self, id: ObjectId) {
        assert!(
            self.objects.remove(id.idx, id.generation).is_some(),
            "stale ObjectId"
        );
        if self.active_object == Some(id) {
            self.active_object = None;
        }
        self.pending.push(ChangeEvent::Scene);
    }

    /// Applies `f` to an object and records the change.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn update_object(&mut self, id: ObjectId, f: impl FnOnce(&mut Object)) {
        let object = self
            .objects
            .get_mut(id.idx, id.generation)
            .unwrap_or_else(|| panic!("stale ObjectId"));
        f(object);
        self.pending.push(ChangeEvent::Object(id));
    }

    /// Sets an object's visibility flags. Besides the object change this
    /// records the visibility notification hosts send for flag edits.
    pub fn set_object_visibility(&mut self, id: ObjectId, hide_viewport: bool, hide_render: bool) {
        self.update_object(id, |o| {
            o.hide_viewport = hide_viewport;
            o.hide_render = hide_render;
        });
        self.pending.push(ChangeEvent::ObjectVisibility);
    }

    /// Links `object` into `collection`.
    pub fn link_object(&mut self, collection: CollectionId, object: ObjectId) {
        self.update_object(object, |o| {
            if !o.collections.contains(&collection) {
                o.collections.push(collection);
            }
        });
        self.pending.push(ChangeEvent::Collection(collection));
    }

    /// Makes `id` the active object.
    pub fn set_active_object(&mut self, id: Option<ObjectId>) {
        self.active_object = id;
        self.pending.push(ChangeEvent::Scene);
    }

    // -- Material API --

    /// Adds a material.
    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let (idx, generation) = self.materials.insert(material);
        let id = MaterialId { idx, generation };
        self.pending.push(ChangeEvent::Material(id));
        self.pending.push(ChangeEvent::MaterialRename);
        id
    }

    /// Applies `f` to a material and records the change.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn update_material(&mut self, id: MaterialId, f: impl FnOnce(&mut Material)) {
        let material = self
            .materials
            .get_mut(id.idx, id.generation)
            .unwrap_or_else(|| panic!("stale MaterialId"));
        f(material);
        self.pending.push(ChangeEvent::Material(id));
    }

    /// Deletes a material. Outstanding handles become stale.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove_material(&mut self, id: MaterialId) {
        assert!(
            self.materials.remove(id.idx, id.generation).is_some(),
            "stale MaterialId"
        );
        self.pending.push(ChangeEvent::MaterialRename);
    }

    // -- Collection API --

    /// Creates a collection as the last child of the scene collection.
    pub fn add_collection(&mut self, name: impl Into<String>) -> CollectionId {
        let root = self.scene_collection();
        self.add_collection_under(root, name)
    }

    /// Creates a collection as the last child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not exist.
    pub fn add_collection_under(
        &mut self,
        parent: CollectionId,
        name: impl Into<String>,
    ) -> CollectionId {
        let id = CollectionId(u32::try_from(self.collections.len()).unwrap_or(u32::MAX));
        self.collections.push(Collection::new(name));
        self.link_collection(parent, id);
        id
    }

    /// Links `child` under `parent`. Linking is not checked for cycles;
    /// visibility rebuilds report them.
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not exist.
    pub fn link_collection(&mut self, parent: CollectionId, child: CollectionId) {
        let node = self
            .collections
            .get_mut(parent.0 as usize)
            .unwrap_or_else(|| panic!("unknown CollectionId"));
        node.children.push(child);
        self.pending.push(ChangeEvent::Collection(child));
    }

    /// Applies `f` to a collection and records the change.
    ///
    /// # Panics
    ///
    /// Panics if the collection does not exist.
    pub fn update_collection(&mut self, id: CollectionId, f: impl FnOnce(&mut Collection)) {
        let node = self
            .collections
            .get_mut(id.0 as usize)
            .unwrap_or_else(|| panic!("unknown CollectionId"));
        f(node);
        self.pending.push(ChangeEvent::Collection(id));
    }

    // -- View layer API --

    /// Adds a view layer and returns its index.
    pub fn add_view_layer(&mut self, name: impl Into<String>) -> usize {
        self.view_layers.push(ViewLayer::new(name));
        self.pending.push(ChangeEvent::Scene);
        self.view_layers.len() - 1
    }

    /// Applies `f` to the view layer at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn update_view_layer(&mut self, index: usize, f: impl FnOnce(&mut ViewLayer)) {
        f(&mut self.view_layers[index]);
        self.pending.push(ChangeEvent::Scene);
    }

    /// Excludes or includes `collection` in the view layer at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set_excluded(&mut self, index: usize, collection: CollectionId, excluded: bool) {
        let layer = &mut self.view_layers[index];
        if excluded {
            layer.excluded.insert(collection);
        } else {
            layer.excluded.remove(&collection);
        }
        self.pending.push(ChangeEvent::Collection(collection));
    }

    // -- Scene settings API --

    /// Sets the interaction mode.
    pub fn set_mode(&mut self, mode: InteractionMode) {
        self.mode = mode;
        self.pending.push(ChangeEvent::Scene);
    }

    /// Applies `f` to the tool settings.
    pub fn update_tool_settings(&mut self, f: impl FnOnce(&mut ToolSettings)) {
        f(&mut self.tool_settings);
        self.pending.push(ChangeEvent::Scene);
    }

    /// Applies `f` to the render settings. Also records a compositor change,
    /// since compositing is toggled here.
    pub fn update_render_settings(&mut self, f: impl FnOnce(&mut RenderSettings)) {
        f(&mut self.render);
        self.pending.push(ChangeEvent::Scene);
        self.pending.push(ChangeEvent::Compositor);
    }

    /// Applies `f` to the scene settings. Also records a compositor change,
    /// since "Use Nodes" lives here.
    pub fn update_scene_settings(&mut self, f: impl FnOnce(&mut SceneSettings)) {
        f(&mut self.scene);
        self.pending.push(ChangeEvent::Scene);
        self.pending.push(ChangeEvent::Compositor);
    }

    /// Applies `f` to the compositor tree, creating an empty one first if
    /// the scene has none.
    pub fn update_compositor(&mut self, f: impl FnOnce(&mut NodeTree)) {
        f(self.compositor.get_or_insert_with(NodeTree::default));
        self.pending.push(ChangeEvent::Compositor);
    }

    /// Adds a sequencer strip.
    pub fn add_strip(&mut self, strip: Strip) {
        self.strips.push(strip);
        self.pending.push(ChangeEvent::Scene);
    }

    // -- File API --

    /// Adds a text datablock.
    pub fn add_text(&mut self, name: impl Into<String>, body: impl Into<String>) {
        self.texts.push(TextBlock {
            name: name.into(),
            body: body.into(),
        });
        self.pending.push(ChangeEvent::Scene);
    }

    /// Adds an image datablock.
    pub fn add_image(&mut self, image: Image) {
        self.images.push(image);
        self.pending.push(ChangeEvent::Scene);
    }

    /// Adds a linked library.
    pub fn add_library(&mut self, library: Library) {
        self.libraries.push(library);
        self.pending.push(ChangeEvent::Scene);
    }

    /// Replaces the file metadata.
    pub fn set_file_info(&mut self, info: FileInfo) {
        self.file_info = info;
        self.pending.push(ChangeEvent::Scene);
    }

    /// Declares that `path` exists on disk.
    pub fn add_existing_path(&mut self, path: impl Into<PathBuf>) {
        self.existing_paths.insert(path.into());
    }

    // -- Screen API --

    /// Opens an editor area and returns its id.
    pub fn add_viewport(&mut self, kind: EditorKind) -> AreaId {
        let id = AreaId(self.next_area);
        self.next_area += 1;
        self.viewports.push(Viewport::new(id, kind));
        id
    }

    /// Applies `f` to the area `id`. Returns `false` if no such area is open.
    pub fn update_viewport(&mut self, id: AreaId, f: impl FnOnce(&mut Viewport)) -> bool {
        match self.viewports.iter_mut().find(|v| v.id == id) {
            Some(viewport) => {
                f(viewport);
                true
            }
            None => false,
        }
    }

    /// Closes the area `id`.
    pub fn remove_viewport(&mut self, id: AreaId) {
        self.viewports.retain(|v| v.id != id);
    }

    /// Sets the modal-operator flag.
    pub fn set_modal_running(&mut self, running: bool) {
        self.modal_running = running;
    }

    /// Sets the playback flag.
    pub fn set_animation_playing(&mut self, playing: bool) {
        self.animation_playing = playing;
    }
}

impl Document for SceneStore {
    fn scene_id(&self) -> SceneId {
        self.scene_id
    }

    fn scene_objects(&self) -> Vec<ObjectId> {
        self.objects
            .live()
            .map(|(idx, generation)| ObjectId { idx, generation })
            .collect()
    }

    fn object(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(id.idx, id.generation)
    }

    fn active_object(&self) -> Option<ObjectId> {
        self.active_object
    }

    fn materials(&self) -> Vec<MaterialId> {
        self.materials
            .live()
            .map(|(idx, generation)| MaterialId { idx, generation })
            .collect()
    }

    fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.idx, id.generation)
    }

    fn scene_collection(&self) -> CollectionId {
        CollectionId(0)
    }

    fn collection(&self, id: CollectionId) -> Option<&Collection> {
        self.collections.get(id.0 as usize)
    }

    fn view_layers(&self) -> &[ViewLayer] {
        &self.view_layers
    }

    fn mode(&self) -> InteractionMode {
        self.mode
    }

    fn tool_settings(&self) -> &ToolSettings {
        &self.tool_settings
    }

    fn render_settings(&self) -> &RenderSettings {
        &self.render
    }

    fn scene_settings(&self) -> &SceneSettings {
        &self.scene
    }

    fn compositor(&self) -> Option<&NodeTree> {
        self.compositor.as_ref()
    }

    fn strips(&self) -> &[Strip] {
        &self.strips
    }

    fn texts(&self) -> &[TextBlock] {
        &self.texts
    }

    fn images(&self) -> &[Image] {
        &self.images
    }

    fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    fn file_info(&self) -> &FileInfo {
        &self.file_info
    }

    fn path_exists(&self, path: &Path) -> bool {
        self.existing_paths.contains(path)
    }
}

impl ViewportEnumerator for SceneStore {
    fn viewports(&self) -> &[Viewport] {
        &self.viewports
    }
}

impl HostActivity for SceneStore {
    fn is_modal_running(&self) -> bool {
        self.modal_running
    }

    fn is_animation_playing(&self) -> bool {
        self.animation_playing
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ObjectKind;

    #[test]
    fn removed_object_handle_goes_stale() {
        let mut store = SceneStore::new();
        let id = store.add_object(Object::new("Cube", ObjectKind::Mesh));
        store.remove_object(id);
        assert!(store.object(id).is_none(), "stale handle must not resolve");

        let reused = store.add_object(Object::new("Sphere", ObjectKind::Mesh));
        assert_eq!(reused.index(), id.index(), "slot should be recycled");
        assert_ne!(reused, id, "recycled slot must get a new generation");
        assert!(store.object(id).is_none(), "old handle stays stale");
        assert_eq!(store.object(reused).map(|o| o.name.as_str()), Some("Sphere"));
    }

    #[test]
    #[should_panic(expected = "stale ObjectId")]
    fn update_on_stale_handle_panics() {
        let mut store = SceneStore::new();
        let id = store.add_object(Object::new("Cube", ObjectKind::Mesh));
        store.remove_object(id);
        store.update_object(id, |o| o.show_in_front = true);
    }

    #[test]
    fn mutations_record_change_events() {
        let mut store = SceneStore::new();
        let coll = store.add_collection("Props");
        let obj = store.add_object(Object::new("Chair", ObjectKind::Mesh));
        let _ = store.take_changes();

        store.set_object_visibility(obj, true, false);
        store.link_object(coll, obj);
        assert_eq!(
            store.take_changes(),
            vec![
                ChangeEvent::Object(obj),
                ChangeEvent::ObjectVisibility,
                ChangeEvent::Object(obj),
                ChangeEvent::Collection(coll),
            ]
        );
        assert!(store.take_changes().is_empty(), "changes drain once");
    }

    #[test]
    fn scene_objects_lists_live_objects_only() {
        let mut store = SceneStore::new();
        let a = store.add_object(Object::new("A", ObjectKind::Empty));
        let b = store.add_object(Object::new("B", ObjectKind::Empty));
        store.remove_object(a);
        assert_eq!(store.scene_objects(), vec![b]);
    }

    #[test]
    fn viewports_are_addressable_by_area() {
        let mut store = SceneStore::new();
        let area = store.add_viewport(EditorKind::View3d);
        assert!(store.update_viewport(area, |v| {
            if let Some(state) = v.view3d.as_mut() {
                state.local_view = true;
            }
        }));
        assert!(!store.update_viewport(AreaId(999), |_| {}), "unknown area");
        assert!(
            store.viewports()[0]
                .view3d
                .as_ref()
                .is_some_and(|s| s.local_view),
            "update should stick"
        );
    }
}
