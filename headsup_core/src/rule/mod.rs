// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The rule table.
//!
//! Each rule is a [`RuleDescriptor`]: an id, a display title, a scope, an
//! enable predicate over the [`Config`], and a pure evaluation function. The
//! table is static and ordered; the engine runs enabled rules in ascending
//! id order, with [`RuleId::Custom`] last.
//!
//! Evaluation functions receive a [`RuleContext`] and return a
//! [`RuleOutcome`]. Rules never mutate the document or any shared state.
//! Everything they want to carry to the next pass goes back through
//! [`Rearm`]; everything the side panels show goes back through
//! [`DetailUpdate`]s.
//!
//! # Scope
//!
//! [`Scope`] tells the engine which entity slice a rule consumes. Rules
//! scoped to [`Scope::AllObjects`] or [`Scope::AllMaterials`] see the pass's
//! working set (every entity on a full rescan, the dirty ones otherwise);
//! every other scope sees empty entity slices and reads document state
//! directly.

mod compositor;
mod data;
mod mismatch;
mod object;
mod render;
mod tools;
mod viewport;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::document::{
    AreaId, Document, InteractionMode, MaterialId, Object, ObjectId, Viewport,
};
use crate::error::{ConfigError, RuleError, RuleResult};
use crate::visibility::VisibilityIndex;
use crate::warning::{DetailLists, DetailUpdate};

/// Number of numbered rules.
pub const NUMBERED_RULES: u8 = 46;

/// Identifies a rule.
///
/// Numbered rules order before [`Custom`](Self::Custom).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RuleId {
    /// One of the built-in rules, `1..=46`.
    Numbered(u8),
    /// The user-authored text rule.
    Custom,
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numbered(n) => write!(f, "{n}"),
            Self::Custom => f.write_str("custom"),
        }
    }
}

impl FromStr for RuleId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("custom") {
            return Ok(Self::Custom);
        }
        match s.parse::<u8>() {
            Ok(n) if (1..=NUMBERED_RULES).contains(&n) => Ok(Self::Numbered(n)),
            _ => Err(ConfigError::UnknownRule(s.to_owned())),
        }
    }
}

impl TryFrom<String> for RuleId {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RuleId> for String {
    fn from(id: RuleId) -> Self {
        id.to_string()
    }
}

/// Which entities a rule consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Editor or tool state only.
    None,
    /// The active object.
    ActiveObject,
    /// The objects of the pass's working set.
    AllObjects,
    /// The materials of the pass's working set.
    AllMaterials,
    /// Scene-wide settings and datablock lists.
    Global,
}

/// How a rule decides whether it runs.
#[derive(Clone, Copy, Debug)]
pub enum EnablePredicate {
    /// The rule's own toggle in [`Config::rules`].
    Toggle,
    /// A custom predicate, for rules with more than one switch.
    Custom(fn(&Config) -> bool),
}

/// Signature of a rule body.
pub type EvaluateFn = fn(&RuleContext<'_>) -> RuleResult<RuleOutcome>;

/// One entry of the rule table.
#[derive(Clone, Copy)]
pub struct RuleDescriptor {
    /// Rule id.
    pub id: RuleId,
    /// Short label for the side panel.
    pub title: &'static str,
    /// Entities the rule consumes.
    pub scope: Scope,
    /// Enable predicate.
    pub enabled: EnablePredicate,
    /// Rule body.
    pub evaluate: EvaluateFn,
}

impl fmt::Debug for RuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDescriptor")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

impl RuleDescriptor {
    /// Whether the rule runs under `config`.
    #[must_use]
    pub fn is_enabled(&self, config: &Config) -> bool {
        match self.enabled {
            EnablePredicate::Toggle => config.is_enabled(self.id),
            EnablePredicate::Custom(predicate) => predicate(config),
        }
    }
}

/// Entities to carry over to the next pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rearm {
    /// Objects that are still problematic.
    pub objects: std::collections::BTreeSet<ObjectId>,
    /// Materials that are still problematic.
    pub materials: std::collections::BTreeSet<MaterialId>,
    /// Collection mismatches must be recomputed next pass.
    pub collections: bool,
    /// The compositor graph must be re-checked next pass.
    pub compositor: bool,
}

impl Rearm {
    /// Merges `other` into `self`.
    pub fn merge(&mut self, other: &Self) {
        self.objects.extend(other.objects.iter().copied());
        self.materials.extend(other.materials.iter().copied());
        self.collections |= other.collections;
        self.compositor |= other.compositor;
    }
}

/// A message produced by a rule, before the engine stamps the rule id on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// Viewport the message belongs to, if any.
    pub area: Option<AreaId>,
    /// Rendered text.
    pub text: String,
}

/// Result of evaluating one rule.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuleOutcome {
    /// Messages, in emission order.
    pub messages: Vec<Message>,
    /// Entities to re-check next pass.
    pub rearm: Rearm,
    /// Detail-list replacements.
    pub details: Vec<DetailUpdate>,
}

impl RuleOutcome {
    /// An outcome with no messages.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message shown in every viewport.
    pub fn warn(&mut self, text: impl Into<String>) {
        self.messages.push(Message {
            area: None,
            text: text.into(),
        });
    }

    /// Adds a message shown only in `area`.
    pub fn warn_in(&mut self, area: AreaId, text: impl Into<String>) {
        self.messages.push(Message {
            area: Some(area),
            text: text.into(),
        });
    }

    /// Builder form of [`warn`](Self::warn) for single-message rules.
    #[must_use]
    pub fn with(mut self, text: impl Into<String>) -> Self {
        self.warn(text);
        self
    }
}

/// Everything a rule may read during one pass.
#[derive(Clone, Copy)]
pub struct RuleContext<'a> {
    /// The document.
    pub doc: &'a dyn Document,
    /// Open editor areas.
    pub viewports: &'a [Viewport],
    /// Preferences.
    pub config: &'a Config,
    /// Visibility index as of this pass.
    pub visibility: &'a VisibilityIndex,
    /// Objects in scope (empty unless the rule is scoped to objects).
    pub objects: &'a [ObjectId],
    /// Materials in scope (empty unless the rule is scoped to materials).
    pub materials: &'a [MaterialId],
    /// Collection mismatches must be recomputed.
    pub collections_dirty: bool,
    /// The compositor graph must be re-checked.
    pub compositor_dirty: bool,
    /// The file was saved since the last load.
    pub saved_just_now: bool,
    /// Detail lists published by the previous pass.
    pub previous: &'a DetailLists,
}

impl fmt::Debug for RuleContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleContext")
            .field("objects", &self.objects.len())
            .field("materials", &self.materials.len())
            .field("collections_dirty", &self.collections_dirty)
            .field("compositor_dirty", &self.compositor_dirty)
            .finish_non_exhaustive()
    }
}

impl<'a> RuleContext<'a> {
    /// Narrows the entity slices to what `scope` allows.
    #[must_use]
    pub fn for_scope(&self, scope: Scope) -> Self {
        let mut ctx = *self;
        if scope != Scope::AllObjects {
            ctx.objects = &[];
        }
        if scope != Scope::AllMaterials {
            ctx.materials = &[];
        }
        ctx
    }

    /// Current interaction mode.
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.doc.mode()
    }

    /// Whether the editor is in object mode.
    #[must_use]
    pub fn in_object_mode(&self) -> bool {
        self.doc.mode() == InteractionMode::Object
    }

    /// The active object, if any.
    ///
    /// An active handle that no longer resolves is a rule error rather than
    /// "no active object", so the inconsistency shows up in the logs.
    pub fn active_object(&self) -> RuleResult<Option<(ObjectId, &'a Object)>> {
        let Some(id) = self.doc.active_object() else {
            return Ok(None);
        };
        self.doc
            .object(id)
            .map(|object| Some((id, object)))
            .ok_or(RuleError::StaleActiveObject(id))
    }

    /// Iterates the 3D viewports with their state.
    pub fn views_3d(&self) -> impl Iterator<Item = (AreaId, &'a crate::document::View3dState)> {
        self.viewports
            .iter()
            .filter_map(|v| v.view3d.as_ref().map(|state| (v.id, state)))
    }
}

/// Formats a float the way the original add-on prints numbers: shortest
/// representation, but with a trailing `.0` for integral values.
#[must_use]
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Rounds to `digits` decimal places.
#[must_use]
pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10_f64.powi(digits);
    (value * scale).round() / scale
}

// ---------------------------------------------------------------------------
// Rule table
// ---------------------------------------------------------------------------

const fn rule(n: u8, title: &'static str, scope: Scope, evaluate: EvaluateFn) -> RuleDescriptor {
    RuleDescriptor {
        id: RuleId::Numbered(n),
        title,
        scope,
        enabled: EnablePredicate::Toggle,
        evaluate,
    }
}

fn samples_enabled(config: &Config) -> bool {
    config.is_enabled(RuleId::Numbered(27)) || config.options.high_samples
}

/// All rules in evaluation order.
pub static RULES: [RuleDescriptor; 47] = [
    rule(1, "Viewport: Lock Camera to View", Scope::None, viewport::camera_to_view),
    rule(2, "Viewport/Render: Visibility Mismatch", Scope::AllObjects, mismatch::visibility_mismatch),
    rule(3, "Sculpt: Shapekey Value not 1", Scope::ActiveObject, object::shape_key_value),
    rule(4, "Animation: Auto Keying", Scope::None, tools::auto_keying),
    rule(5, "General: Proportional Editing", Scope::None, tools::proportional_editing),
    rule(6, "General: Affect Only", Scope::None, tools::affect_only),
    rule(7, "General: Snapping", Scope::None, tools::snapping),
    rule(8, "Active Object: Scaling Issues", Scope::ActiveObject, object::scale),
    rule(9, "Edit: Mirror Options", Scope::ActiveObject, object::mirror),
    rule(10, "Render: Simplify", Scope::Global, render::simplify),
    rule(11, "Sequencer: Sequencer contains Strips", Scope::Global, render::sequencer_strips),
    rule(12, "Render: Render Region", Scope::Global, render::render_border),
    rule(13, "Edit: Auto-Merge Vertices", Scope::None, tools::automerge),
    rule(14, "UV: Select Sync", Scope::None, tools::uv_select_sync),
    rule(15, "UV: Live Unwrap", Scope::None, tools::live_unwrap),
    rule(16, "UV: Correct Face Attributes", Scope::None, tools::correct_face_attributes),
    rule(17, "Shader: Img-Sequence not unique", Scope::AllMaterials, data::image_sequences),
    rule(18, "Sculpt: Corrective Smooth active", Scope::ActiveObject, object::corrective_smooth),
    rule(19, "General: Autopack Ressources", Scope::Global, data::autopack),
    rule(20, "Viewport: Local View", Scope::None, viewport::local_view),
    rule(21, "Viewport: Clipping Border", Scope::None, viewport::clipping_border),
    rule(22, "Active Object: Shadow Catcher/Holdout", Scope::ActiveObject, object::shadow_catcher_holdout),
    rule(23, "Render: Resolution not 100%", Scope::Global, render::resolution_percentage),
    rule(24, "Render: Filter Size", Scope::Global, render::pixel_filter),
    rule(25, "Viewport/Render: Modifier Mismatch", Scope::AllObjects, mismatch::modifier_mismatch),
    rule(26, "Render: Sample Override", Scope::Global, render::sample_override),
    RuleDescriptor {
        id: RuleId::Numbered(27),
        title: "Render: Samples lower than threshold",
        scope: Scope::Global,
        enabled: EnablePredicate::Custom(samples_enabled),
        evaluate: render::samples,
    },
    rule(28, "Active Object: Relative Array", Scope::ActiveObject, object::relative_array),
    rule(29, "Viewport: Hidden Object Types", Scope::None, viewport::hidden_types),
    rule(30, "Viewport: Unselectable Object Types", Scope::None, viewport::unselectable_types),
    rule(31, "Render: Use Preview Range", Scope::Global, render::preview_range),
    rule(32, "Cycles: Render Device", Scope::Global, render::render_device),
    rule(33, "Active Object: Locked Transforms", Scope::ActiveObject, object::locked_transforms),
    rule(34, "Active Object: Rig in Rest Position", Scope::ActiveObject, object::rest_position),
    rule(35, "Render: Material Override", Scope::Global, render::layer_overrides),
    rule(36, "Compositing: 'Use Nodes' OFF", Scope::Global, render::compositor_use_nodes),
    rule(37, "Render: Output to Video", Scope::Global, render::video_output),
    rule(38, "Render: Film Transparent", Scope::Global, render::film_transparent),
    rule(39, "Sequencer: Loud Audio", Scope::Global, render::loud_audio),
    rule(40, "SubSurf: Render < Viewport", Scope::ActiveObject, object::render_subdivisions),
    rule(41, "Shader: 'Undefined' Nodes'", Scope::AllMaterials, data::undefined_nodes),
    rule(42, "Data: Missing Textures", Scope::Global, data::missing_textures),
    rule(43, "Data: Missing Libraries", Scope::Global, data::missing_libraries),
    rule(44, "Data: Blender Version", Scope::Global, data::file_version),
    rule(45, "Compositing: Renderlayer Node Issue", Scope::Global, compositor::render_layer_nodes),
    rule(46, "Active Object: In Front", Scope::ActiveObject, object::in_front),
    RuleDescriptor {
        id: RuleId::Custom,
        title: "CUSTOM Warning",
        scope: Scope::Global,
        enabled: EnablePredicate::Toggle,
        evaluate: data::custom_text,
    },
];

/// Looks up the descriptor for `id`.
#[must_use]
pub fn descriptor(id: RuleId) -> Option<&'static RuleDescriptor> {
    RULES.iter().find(|d| d.id == id)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
