// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Document model contract.
//!
//! The engine never walks host data structures directly. Everything it reads
//! goes through three narrow capabilities:
//!
//! - [`Document`]: typed, read-only queries over the scene: objects,
//!   materials, collections, view layers, settings and file metadata.
//!   Lookups by id return `Option` so that handles gone stale since the last
//!   notification are visible to the caller.
//! - [`ViewportEnumerator`]: the editor areas currently on screen. Area-scoped
//!   rules use this instead of reaching into the host's window manager.
//! - [`HostActivity`]: the two guard queries that defer a pass.
//!
//! [`SceneStore`] is an in-memory implementation of all three. It records a
//! [`ChangeEvent`] for every mutation, mirroring the notification stream a
//! real host would deliver.

mod id;
mod model;
mod store;

use std::path::Path;

pub use id::{AreaId, CollectionId, MaterialId, ObjectId, SceneId};
pub use model::{
    ChangeEvent, Collection, ComputeDevice, CompositorNode, CompositorNodeKind, EditorKind,
    FileFormat, FileInfo, Image, ImageTexture, InteractionMode, Library, Material, MeshData,
    Modifier, ModifierKind, NodeTree, Object, ObjectKind, ObjectTypeFilter, PosePosition,
    RenderBorder, RenderEngine, RenderSettings, SceneSettings, ShaderNode, ShapeKey, Strip,
    StripKind, TextBlock, ToolSettings, Version, View3dState, ViewLayer, Viewport,
};
pub use store::SceneStore;

/// Read-only queries over the active scene and its file.
pub trait Document {
    /// Identity of the active scene.
    fn scene_id(&self) -> SceneId;

    /// Every object linked into the active scene.
    fn scene_objects(&self) -> Vec<ObjectId>;

    /// Looks up an object; `None` when the handle is stale.
    fn object(&self, id: ObjectId) -> Option<&Object>;

    /// The active object, if any.
    fn active_object(&self) -> Option<ObjectId>;

    /// Every material datablock in the file, linked ones included.
    fn materials(&self) -> Vec<MaterialId>;

    /// Looks up a material; `None` when the handle is stale.
    fn material(&self, id: MaterialId) -> Option<&Material>;

    /// Root collection of the active scene.
    fn scene_collection(&self) -> CollectionId;

    /// Looks up a collection.
    fn collection(&self, id: CollectionId) -> Option<&Collection>;

    /// View layers of the active scene, in display order.
    fn view_layers(&self) -> &[ViewLayer];

    /// Current interaction mode.
    fn mode(&self) -> InteractionMode;

    /// Tool settings of the active scene.
    fn tool_settings(&self) -> &ToolSettings;

    /// Render settings of the active scene.
    fn render_settings(&self) -> &RenderSettings;

    /// Frame range and node settings of the active scene.
    fn scene_settings(&self) -> &SceneSettings;

    /// Compositor node tree, when the scene has one.
    fn compositor(&self) -> Option<&NodeTree>;

    /// Sequencer strips, empty when there is no sequence editor.
    fn strips(&self) -> &[Strip];

    /// Text datablocks.
    fn texts(&self) -> &[TextBlock];

    /// Image datablocks.
    fn images(&self) -> &[Image];

    /// Linked libraries.
    fn libraries(&self) -> &[Library];

    /// File metadata.
    fn file_info(&self) -> &FileInfo;

    /// Whether `path` exists on disk.
    fn path_exists(&self, path: &Path) -> bool;
}

/// Enumerates the editor areas currently on screen.
pub trait ViewportEnumerator {
    /// All open areas, in a stable order.
    fn viewports(&self) -> &[Viewport];
}

/// Transient interaction state that defers evaluation.
pub trait HostActivity {
    /// A modal operator (grab, rotate, knife, ...) is running.
    fn is_modal_running(&self) -> bool;

    /// Timeline playback is running.
    fn is_animation_playing(&self) -> bool;
}

/// Everything a pass needs from the host.
pub trait Host: Document + ViewportEnumerator + HostActivity {}

impl<T: Document + ViewportEnumerator + HostActivity> Host for T {}
