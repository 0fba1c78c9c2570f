// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Published warning records and the side-panel detail lists.

use std::collections::BTreeSet;
use std::fmt;

use crate::document::{AreaId, CollectionId, MaterialId, ObjectId, Version};
use crate::rule::RuleId;

/// One line of output.
///
/// Records are rebuilt from scratch on every pass and compared structurally
/// against the previous pass, so identical state always yields identical
/// records in identical order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WarningRecord {
    /// Rule that produced the record.
    pub rule: RuleId,
    /// Viewport the record belongs to; `None` shows it everywhere.
    pub area: Option<AreaId>,
    /// Rendered text. `[...]` spans are highlighted by presenters.
    pub message: String,
}

impl WarningRecord {
    /// A record shown in every viewport.
    #[must_use]
    pub fn global(rule: RuleId, message: impl Into<String>) -> Self {
        Self {
            rule,
            area: None,
            message: message.into(),
        }
    }

    /// A record shown only in `area`.
    #[must_use]
    pub fn in_area(rule: RuleId, area: AreaId, message: impl Into<String>) -> Self {
        Self {
            rule,
            area: Some(area),
            message: message.into(),
        }
    }
}

impl fmt::Display for WarningRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// An object whose render and viewport visibility disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectMismatch {
    /// The object.
    pub object: ObjectId,
    /// Object name at scan time.
    pub name: String,
    /// Disabled in renders.
    pub hide_render: bool,
    /// Disabled in viewports.
    pub hide_viewport: bool,
    /// View layers in which the object is visible through a collection.
    pub view_layers: Vec<String>,
}

/// A collection whose render and viewport visibility disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CollectionMismatch {
    /// The collection.
    pub collection: CollectionId,
    /// Collection name at scan time.
    pub name: String,
    /// Disabled in renders.
    pub hide_render: bool,
    /// Disabled in viewports.
    pub hide_viewport: bool,
    /// View layers in which the collection is not excluded.
    pub view_layers: Vec<String>,
}

/// An object with modifiers that are shown in only one of viewport/render.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModifierMismatch {
    /// The object.
    pub object: ObjectId,
    /// Object name at scan time.
    pub name: String,
    /// Names of the disagreeing modifiers, in stack order.
    pub modifiers: Vec<String>,
    /// View layers in which the object is visible through a collection.
    pub view_layers: Vec<String>,
}

/// A material containing nodes the running version does not know.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndefinedNodes {
    /// The material.
    pub material: MaterialId,
    /// Material name at scan time.
    pub name: String,
    /// Number of undefined nodes.
    pub count: usize,
}

/// Detail data behind the "check HeadsUp SidePanel" summaries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetailLists {
    /// Objects with render/viewport mismatch.
    pub object_mismatches: Vec<ObjectMismatch>,
    /// Collections with render/viewport mismatch.
    pub collection_mismatches: Vec<CollectionMismatch>,
    /// Objects with modifier visibility mismatch.
    pub modifier_mismatches: Vec<ModifierMismatch>,
    /// Materials with undefined nodes.
    pub undefined_nodes: Vec<UndefinedNodes>,
    /// Version that last saved the file, when it differs from the runtime.
    pub outdated_file_version: Option<Version>,
}

/// Replacement for one of the [`DetailLists`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DetailUpdate {
    /// Replace the object mismatch list.
    ObjectMismatches(Vec<ObjectMismatch>),
    /// Replace the collection mismatch list.
    CollectionMismatches(Vec<CollectionMismatch>),
    /// Replace the modifier mismatch list.
    ModifierMismatches(Vec<ModifierMismatch>),
    /// Replace the undefined-node list.
    UndefinedNodes(Vec<UndefinedNodes>),
    /// Replace the outdated file version.
    OutdatedFileVersion(Option<Version>),
}

impl DetailLists {
    /// Applies one replacement.
    pub fn apply(&mut self, update: DetailUpdate) {
        match update {
            DetailUpdate::ObjectMismatches(list) => self.object_mismatches = list,
            DetailUpdate::CollectionMismatches(list) => self.collection_mismatches = list,
            DetailUpdate::ModifierMismatches(list) => self.modifier_mismatches = list,
            DetailUpdate::UndefinedNodes(list) => self.undefined_nodes = list,
            DetailUpdate::OutdatedFileVersion(version) => self.outdated_file_version = version,
        }
    }
}

/// Rule ids that produced at least one record in the latest pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FiredRules(BTreeSet<RuleId>);

impl FiredRules {
    /// Builds the set from a record list.
    #[must_use]
    pub fn from_records(records: &[WarningRecord]) -> Self {
        Self(records.iter().map(|r| r.rule).collect())
    }

    /// Whether `id` fired.
    #[must_use]
    pub fn contains(&self, id: RuleId) -> bool {
        self.0.contains(&id)
    }

    /// Fired rule ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.0.iter().copied()
    }

    /// Whether nothing fired.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
