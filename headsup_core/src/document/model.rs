// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plain data records returned by [`Document`](super::Document) queries.

use std::collections::BTreeSet;

use super::id::{AreaId, CollectionId, MaterialId, ObjectId};

/// The editor's current interaction mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum InteractionMode {
    /// Object mode.
    #[default]
    Object,
    /// Mesh edit mode.
    EditMesh,
    /// Edit mode on anything other than a mesh (curves, armatures, ...).
    EditOther,
    /// Pose mode.
    Pose,
    /// Sculpt mode.
    Sculpt,
    /// Any paint mode (vertex, weight, texture).
    Paint,
}

/// Object type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[expect(missing_docs, reason = "variant names are the object types")]
pub enum ObjectKind {
    Mesh,
    Curve,
    Surface,
    Meta,
    Font,
    Curves,
    PointCloud,
    Volume,
    GreasePencil,
    Armature,
    Lattice,
    Empty,
    Light,
    LightProbe,
    Camera,
    Speaker,
}

/// Pose position of an armature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PosePosition {
    /// Posed.
    #[default]
    Pose,
    /// Rest position.
    Rest,
}

/// A modifier on an object's stack.
#[derive(Clone, Debug, PartialEq)]
pub struct Modifier {
    /// Display name.
    pub name: String,
    /// Modifier type and type-specific settings.
    pub kind: ModifierKind,
    /// Shown in the viewport.
    pub show_viewport: bool,
    /// Shown in renders.
    pub show_render: bool,
}

impl Modifier {
    /// Creates a modifier that is visible in both viewport and render.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ModifierKind) -> Self {
        Self {
            name: name.into(),
            kind,
            show_viewport: true,
            show_render: true,
        }
    }
}

/// Modifier type with the settings rules care about.
#[derive(Clone, Debug, PartialEq)]
pub enum ModifierKind {
    /// Array modifier.
    Array {
        /// Relative offset enabled.
        relative_offset: bool,
    },
    /// Subdivision surface.
    Subsurf {
        /// Viewport levels.
        levels: u8,
        /// Render levels.
        render_levels: u8,
    },
    /// Multiresolution.
    Multires {
        /// Viewport levels.
        levels: u8,
        /// Render levels.
        render_levels: u8,
    },
    /// Corrective smooth.
    CorrectiveSmooth,
    /// Anything else.
    Other,
}

/// A shape key on a mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeKey {
    /// Key name.
    pub name: String,
    /// Blend value.
    pub value: f32,
}

/// Mesh data attached to a mesh object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// Mirror editing on X.
    pub use_mirror_x: bool,
    /// Mirror editing on Y.
    pub use_mirror_y: bool,
    /// Mirror editing on Z.
    pub use_mirror_z: bool,
    /// Topology mirror.
    pub use_mirror_topology: bool,
    /// Shape keys, basis first.
    pub shape_keys: Vec<ShapeKey>,
    /// Index of the active shape key.
    pub active_shape_key: usize,
}

/// One object in the document.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    /// Object name.
    pub name: String,
    /// Object type.
    pub kind: ObjectKind,
    /// Disabled in renders.
    pub hide_render: bool,
    /// Disabled in viewports.
    pub hide_viewport: bool,
    /// Collections that directly link this object.
    pub collections: Vec<CollectionId>,
    /// Local scale.
    pub scale: [f32; 3],
    /// Locked location axes.
    pub lock_location: [bool; 3],
    /// Locked rotation axes.
    pub lock_rotation: [bool; 3],
    /// Locked scale axes.
    pub lock_scale: [bool; 3],
    /// Shadow catcher.
    pub is_shadow_catcher: bool,
    /// Holdout.
    pub is_holdout: bool,
    /// Drawn in front of other objects.
    pub show_in_front: bool,
    /// Modifier stack, first applied first.
    pub modifiers: Vec<Modifier>,
    /// Mesh data, for mesh objects.
    pub mesh: Option<MeshData>,
    /// Pose position, for armatures.
    pub pose_position: Option<PosePosition>,
}

impl Object {
    /// Creates an object with default settings and unit scale.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            hide_render: false,
            hide_viewport: false,
            collections: Vec::new(),
            scale: [1.0; 3],
            lock_location: [false; 3],
            lock_rotation: [false; 3],
            lock_scale: [false; 3],
            is_shadow_catcher: false,
            is_holdout: false,
            show_in_front: false,
            modifiers: Vec::new(),
            mesh: (kind == ObjectKind::Mesh).then(MeshData::default),
            pose_position: (kind == ObjectKind::Armature).then_some(PosePosition::Pose),
        }
    }
}

/// A collection node. The same collection may be linked under several parents.
#[derive(Clone, Debug, PartialEq)]
pub struct Collection {
    /// Collection name.
    pub name: String,
    /// Disabled in renders.
    pub hide_render: bool,
    /// Disabled in viewports.
    pub hide_viewport: bool,
    /// Child collections in display order.
    pub children: Vec<CollectionId>,
}

impl Collection {
    /// Creates an empty, visible collection.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hide_render: false,
            hide_viewport: false,
            children: Vec::new(),
        }
    }
}

/// A view layer of the active scene.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewLayer {
    /// View layer name.
    pub name: String,
    /// Whether the layer is used for rendering.
    pub enabled: bool,
    /// Sample override (0 means "use scene samples").
    pub samples: u32,
    /// Material override, by material name.
    pub material_override: Option<String>,
    /// World override, by world name.
    pub world_override: Option<String>,
    /// Collections excluded from this layer.
    pub excluded: BTreeSet<CollectionId>,
}

impl ViewLayer {
    /// Creates an enabled view layer with no overrides.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            samples: 0,
            material_override: None,
            world_override: None,
            excluded: BTreeSet::new(),
        }
    }
}

/// Transform and editing tool toggles of the active scene.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[expect(missing_docs, reason = "fields mirror the host's tool toggles one to one")]
pub struct ToolSettings {
    pub use_keyframe_insert_auto: bool,
    pub use_proportional_edit: bool,
    pub use_proportional_edit_objects: bool,
    pub use_proportional_fcurve: bool,
    pub use_proportional_action: bool,
    pub use_transform_data_origin: bool,
    pub use_transform_pivot_point_align: bool,
    pub use_transform_skip_children: bool,
    pub use_snap: bool,
    pub use_snap_uv: bool,
    pub use_mesh_automerge: bool,
    pub use_uv_select_sync: bool,
    pub use_edge_path_live_unwrap: bool,
    pub use_transform_correct_face_attributes: bool,
}

/// Render engine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[expect(missing_docs, reason = "variant names are the engines")]
pub enum RenderEngine {
    #[default]
    Eevee,
    EeveeNext,
    Cycles,
    Workbench,
    Other,
}

/// Cycles compute device.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ComputeDevice {
    /// CPU rendering.
    #[default]
    Cpu,
    /// GPU compute.
    Gpu,
}

/// Render output file format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[expect(missing_docs, reason = "variant names are the formats")]
pub enum FileFormat {
    #[default]
    Png,
    Jpeg,
    OpenExr,
    Tiff,
    Ffmpeg,
    AviRaw,
    AviJpeg,
}

impl FileFormat {
    /// The host's identifier for this format.
    #[must_use]
    pub const fn identifier(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::OpenExr => "OPEN_EXR",
            Self::Tiff => "TIFF",
            Self::Ffmpeg => "FFMPEG",
            Self::AviRaw => "AVI_RAW",
            Self::AviJpeg => "AVI_JPEG",
        }
    }

    /// Whether the format writes a movie file instead of an image sequence.
    #[must_use]
    pub const fn is_video(self) -> bool {
        matches!(self, Self::Ffmpeg | Self::AviRaw | Self::AviJpeg)
    }
}

/// Normalized render border, each edge in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[expect(missing_docs, reason = "edge names are self-explanatory")]
pub struct RenderBorder {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

impl Default for RenderBorder {
    fn default() -> Self {
        Self {
            min_x: 0.0,
            max_x: 1.0,
            min_y: 0.0,
            max_y: 1.0,
        }
    }
}

/// Render and output settings of the active scene.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSettings {
    /// Active render engine.
    pub engine: RenderEngine,
    /// Resolution scale in percent.
    pub resolution_percentage: u32,
    /// Simplify enabled.
    pub use_simplify: bool,
    /// Simplify max subdivision, viewport.
    pub simplify_subdivision: u32,
    /// Simplify max subdivision, render.
    pub simplify_subdivision_render: u32,
    /// Sequencer enabled in the post-processing options.
    pub use_sequencer: bool,
    /// Compositing enabled in the post-processing options.
    pub use_compositing: bool,
    /// Render border enabled.
    pub use_border: bool,
    /// Crop output to the render border.
    pub use_crop_to_border: bool,
    /// Border rectangle.
    pub border: RenderBorder,
    /// Cycles pixel filter width.
    pub cycles_filter_width: f32,
    /// EEVEE pixel filter size.
    pub filter_size: f32,
    /// Cycles render samples.
    pub cycles_samples: u32,
    /// EEVEE render samples.
    pub eevee_samples: u32,
    /// Cycles compute device.
    pub cycles_device: ComputeDevice,
    /// Output file format.
    pub file_format: FileFormat,
    /// Film transparent.
    pub film_transparent: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            engine: RenderEngine::Eevee,
            resolution_percentage: 100,
            use_simplify: false,
            simplify_subdivision: 6,
            simplify_subdivision_render: 6,
            use_sequencer: true,
            use_compositing: true,
            use_border: false,
            use_crop_to_border: false,
            border: RenderBorder::default(),
            cycles_filter_width: 1.5,
            filter_size: 1.5,
            cycles_samples: 4096,
            eevee_samples: 64,
            cycles_device: ComputeDevice::Cpu,
            file_format: FileFormat::Png,
            film_transparent: false,
        }
    }
}

/// Frame range and node settings of the active scene.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneSettings {
    /// First frame.
    pub frame_start: i32,
    /// Last frame.
    pub frame_end: i32,
    /// Preview range enabled.
    pub use_preview_range: bool,
    /// First preview frame.
    pub frame_preview_start: i32,
    /// Last preview frame.
    pub frame_preview_end: i32,
    /// Compositor "Use Nodes".
    pub use_nodes: bool,
    /// Automatically pack external resources on save.
    pub use_autopack: bool,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            frame_start: 1,
            frame_end: 250,
            use_preview_range: false,
            frame_preview_start: 1,
            frame_preview_end: 250,
            use_nodes: false,
            use_autopack: false,
        }
    }
}

/// Compositor node type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompositorNodeKind {
    /// Render Layers input, bound to a view layer by name.
    RenderLayers {
        /// The view layer this node reads.
        layer: String,
    },
    /// File Output node.
    FileOutput,
    /// Anything else.
    Other,
}

/// One compositor node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositorNode {
    /// Node name.
    pub name: String,
    /// Node type.
    pub kind: CompositorNodeKind,
    /// Muted.
    pub mute: bool,
}

/// The scene's compositor graph. Links are `(from, to)` node indices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeTree {
    /// Nodes.
    pub nodes: Vec<CompositorNode>,
    /// Directed links between node indices.
    pub links: Vec<(usize, usize)>,
}

impl NodeTree {
    /// Adds a node and returns its index.
    pub fn add_node(&mut self, name: impl Into<String>, kind: CompositorNodeKind) -> usize {
        self.nodes.push(CompositorNode {
            name: name.into(),
            kind,
            mute: false,
        });
        self.nodes.len() - 1
    }

    /// Connects `from` to `to`.
    pub fn link(&mut self, from: usize, to: usize) {
        self.links.push((from, to));
    }

    /// Indices of nodes fed by `node`.
    pub fn downstream(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.links
            .iter()
            .filter(move |(from, _)| *from == node)
            .map(|(_, to)| *to)
    }
}

/// Image texture reference inside a shader node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageTexture {
    /// Name of the referenced image datablock.
    pub image: String,
    /// The image is an image sequence.
    pub is_sequence: bool,
    /// Sequence start frame.
    pub frame_start: i32,
    /// Sequence frame offset.
    pub frame_offset: i32,
    /// Sequence frame count.
    pub frame_duration: i32,
}

/// One shader node in a material.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderNode {
    /// Node type identifier, e.g. `ShaderNodeTexImage`.
    pub idname: String,
    /// Image texture settings, for image texture nodes.
    pub texture: Option<ImageTexture>,
}

impl ShaderNode {
    /// Creates a node without texture settings.
    #[must_use]
    pub fn new(idname: impl Into<String>) -> Self {
        Self {
            idname: idname.into(),
            texture: None,
        }
    }
}

/// A material datablock.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Material name.
    pub name: String,
    /// Number of users.
    pub users: u32,
    /// Uses a node tree.
    pub use_nodes: bool,
    /// Linked from this library path, if any.
    pub library: Option<String>,
    /// Shader nodes.
    pub nodes: Vec<ShaderNode>,
}

impl Material {
    /// Creates a local node material with one user.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            users: 1,
            use_nodes: true,
            library: None,
            nodes: Vec::new(),
        }
    }

    /// Whether the material is part of the local file and used by something.
    #[must_use]
    pub fn is_scannable(&self) -> bool {
        self.users > 0 && self.use_nodes && self.library.is_none()
    }
}

/// Sequencer strip type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[expect(missing_docs, reason = "variant names are the strip types")]
pub enum StripKind {
    Sound,
    Movie,
    Image,
    Scene,
    Effect,
}

/// A sequencer strip.
#[derive(Clone, Debug, PartialEq)]
pub struct Strip {
    /// Strip name.
    pub name: String,
    /// Strip type.
    pub kind: StripKind,
    /// Volume (sound strips).
    pub volume: f32,
}

/// A text datablock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextBlock {
    /// Text name.
    pub name: String,
    /// Full contents.
    pub body: String,
}

/// An image datablock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    /// Image name.
    pub name: String,
    /// File path, possibly blend-relative (`//`) and possibly containing `<UDIM>`.
    pub filepath: String,
    /// Packed into the file.
    pub packed: bool,
    /// Number of users.
    pub users: u32,
}

/// A linked library.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Library {
    /// Library name.
    pub name: String,
    /// File path, possibly blend-relative.
    pub filepath: String,
}

/// A `major.minor` application version.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    /// Major version.
    pub major: u16,
    /// Minor version.
    pub minor: u16,
}

impl Version {
    /// Creates a version.
    #[must_use]
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

/// File-level metadata.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileInfo {
    /// Absolute path of the open file, empty when never saved.
    pub filepath: String,
    /// Version that last wrote the file.
    pub file_version: Version,
    /// Version of the running application.
    pub runtime_version: Version,
}

/// Object type groups the 3D viewport can hide or make unselectable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[expect(missing_docs, reason = "variant names are the object type groups")]
pub enum ObjectTypeFilter {
    Armatures,
    Cameras,
    Curves,
    HairCurves,
    Empties,
    Fonts,
    GreasePencil,
    Lattices,
    Lights,
    LightProbes,
    Meshes,
    MetaBalls,
    Pointclouds,
    Speakers,
    Surfaces,
    Volumes,
}

impl ObjectTypeFilter {
    /// Label shown to the user.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Armatures => "Armatures",
            Self::Cameras => "Cameras",
            Self::Curves => "Curves",
            Self::HairCurves => "Hair Curves",
            Self::Empties => "Empties",
            Self::Fonts => "Fonts",
            Self::GreasePencil => "Grease Pencil",
            Self::Lattices => "Lattices",
            Self::Lights => "Lights",
            Self::LightProbes => "Light Probes",
            Self::Meshes => "Meshes",
            Self::MetaBalls => "Meta Balls",
            Self::Pointclouds => "Pointclouds",
            Self::Speakers => "Speakers",
            Self::Surfaces => "Surfaces",
            Self::Volumes => "Volumes",
        }
    }
}

/// Editor type of an area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EditorKind {
    /// 3D viewport.
    View3d,
    /// Graph editor.
    GraphEditor,
    /// Dope sheet.
    DopeSheet,
    /// Compositor node editor.
    Compositor,
    /// Any other editor.
    Other,
}

/// State of a 3D viewport that area-scoped rules inspect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct View3dState {
    /// Camera locked to view.
    pub lock_camera: bool,
    /// In local view.
    pub local_view: bool,
    /// Clipping region active.
    pub clip_planes: bool,
    /// Overlays shown.
    pub show_overlays: bool,
    /// Object types hidden in this viewport.
    pub hidden_types: BTreeSet<ObjectTypeFilter>,
    /// Object types that cannot be selected in this viewport.
    pub unselectable_types: BTreeSet<ObjectTypeFilter>,
}

impl Default for View3dState {
    fn default() -> Self {
        Self {
            lock_camera: false,
            local_view: false,
            clip_planes: false,
            show_overlays: true,
            hidden_types: BTreeSet::new(),
            unselectable_types: BTreeSet::new(),
        }
    }
}

/// One editor area on screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Viewport {
    /// Area identity.
    pub id: AreaId,
    /// Editor type.
    pub kind: EditorKind,
    /// 3D viewport state, for [`EditorKind::View3d`].
    pub view3d: Option<View3dState>,
}

impl Viewport {
    /// Creates an area of the given type; 3D viewports get default state.
    #[must_use]
    pub fn new(id: AreaId, kind: EditorKind) -> Self {
        Self {
            id,
            kind,
            view3d: (kind == EditorKind::View3d).then(View3dState::default),
        }
    }
}

/// Mutation notification delivered to the engine.
///
/// Hosts translate their own change streams into these events and feed them
/// through one subscription point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChangeEvent {
    /// An object's data or transform changed.
    Object(ObjectId),
    /// A material changed.
    Material(MaterialId),
    /// A collection changed (visibility, exclusion, rename, linking).
    Collection(CollectionId),
    /// Some object's visibility flags or name changed.
    ObjectVisibility,
    /// Some material was renamed or created.
    MaterialRename,
    /// The compositor graph or a compositing toggle changed.
    Compositor,
    /// Scene-level settings changed; nothing to mark, the pass reads them fresh.
    Scene,
}
