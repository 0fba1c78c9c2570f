// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Side-panel models.
//!
//! The summaries that say "check HeadsUp SidePanel" point here. Each panel
//! is a heading plus rows; hosts add icons and buttons.
//!
//! Mismatch panels split their rows by view layer. An entry visible in the
//! layer the user is looking at lands in [`MismatchPanel::current_layer`]
//! and can be selected from the panel. Entries visible only elsewhere land
//! in [`MismatchPanel::other_layers`]. Entries visible nowhere are dropped.

use headsup_core::config::{Config, ModifierScope};
use headsup_core::document::{CollectionId, ObjectId};
use headsup_core::rule::descriptor;
use headsup_core::warning::DetailLists;
use headsup_core::{PassOutput, RuleId};

const MISMATCH_RULE: RuleId = RuleId::Numbered(2);
const MODIFIER_RULE: RuleId = RuleId::Numbered(25);
const UNDEFINED_RULE: RuleId = RuleId::Numbered(41);

/// The entity a panel row acts on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelEntity {
    /// Select the object.
    Object(ObjectId),
    /// Highlight the collection in the outliner.
    Collection(CollectionId),
}

/// What a row shows after its label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowDetail {
    /// Viewport and render visibility toggles.
    Visibility {
        /// Disabled in viewports.
        hide_viewport: bool,
        /// Disabled in renders.
        hide_render: bool,
    },
    /// Names of the disagreeing modifiers.
    Modifiers(Vec<String>),
}

/// One entry of a mismatch panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PanelRow {
    /// Entity name.
    pub label: String,
    /// Target of the row's action.
    pub entity: PanelEntity,
    /// Icons or extra text.
    pub detail: RowDetail,
    /// The row's action button is enabled.
    pub selectable: bool,
}

/// An object, collection or modifier mismatch panel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MismatchPanel {
    /// Line above the groups, or the reason the panel is empty.
    pub heading: &'static str,
    /// Entries visible in the current view layer.
    pub current_layer: Vec<PanelRow>,
    /// Entries visible only in other view layers.
    pub other_layers: Vec<PanelRow>,
}

struct Entry<'a> {
    label: &'a str,
    entity: PanelEntity,
    detail: RowDetail,
    view_layers: &'a [String],
}

impl MismatchPanel {
    /// Objects whose render and viewport visibility disagree.
    #[must_use]
    pub fn objects(details: &DetailLists, config: &Config, current_layer: &str) -> Self {
        if !config.is_enabled(MISMATCH_RULE) {
            return Self::disabled("Mismatch Checks disabled in Preferences");
        }
        let entries = details.object_mismatches.iter().map(|m| Entry {
            label: &m.name,
            entity: PanelEntity::Object(m.object),
            detail: RowDetail::Visibility {
                hide_viewport: m.hide_viewport,
                hide_render: m.hide_render,
            },
            view_layers: &m.view_layers,
        });
        Self::split(entries, current_layer, "No Object Mismatches")
    }

    /// Collections whose render and viewport visibility disagree.
    #[must_use]
    pub fn collections(details: &DetailLists, config: &Config, current_layer: &str) -> Self {
        if !config.is_enabled(MISMATCH_RULE) {
            return Self::disabled("Mismatch Checks disabled in Preferences");
        }
        let entries = details.collection_mismatches.iter().map(|m| Entry {
            label: &m.name,
            entity: PanelEntity::Collection(m.collection),
            detail: RowDetail::Visibility {
                hide_viewport: m.hide_viewport,
                hide_render: m.hide_render,
            },
            view_layers: &m.view_layers,
        });
        Self::split(entries, current_layer, "No Collection Mismatches")
    }

    /// Objects with modifiers shown in only one of viewport and render.
    ///
    /// With the active-only modifier check the result is reported inline in
    /// the viewport and the panel stays empty.
    #[must_use]
    pub fn modifiers(details: &DetailLists, config: &Config, current_layer: &str) -> Self {
        if config.options.modifier_scope == ModifierScope::ActiveOnly {
            return Self::disabled("'Active Only' reports to 3d viewport");
        }
        if !config.is_enabled(MODIFIER_RULE) {
            return Self::disabled("Modifier Checks disabled in Preferences");
        }
        let entries = details.modifier_mismatches.iter().map(|m| Entry {
            label: &m.name,
            entity: PanelEntity::Object(m.object),
            detail: RowDetail::Modifiers(m.modifiers.clone()),
            view_layers: &m.view_layers,
        });
        Self::split(entries, current_layer, "No Modifier Mismatches")
    }

    fn disabled(heading: &'static str) -> Self {
        Self {
            heading,
            ..Self::default()
        }
    }

    fn split<'a>(
        entries: impl Iterator<Item = Entry<'a>>,
        current_layer: &str,
        empty: &'static str,
    ) -> Self {
        let mut current = Vec::new();
        let mut other = Vec::new();
        for entry in entries {
            let in_current = entry.view_layers.iter().any(|l| l == current_layer);
            let anywhere = entry.view_layers.iter().any(|l| !l.is_empty());
            let row = PanelRow {
                label: entry.label.to_owned(),
                entity: entry.entity,
                detail: entry.detail,
                selectable: in_current,
            };
            if in_current {
                current.push(row);
            } else if anywhere {
                other.push(row);
            }
        }
        sort_rows(&mut current);
        sort_rows(&mut other);

        let heading = if current.is_empty() && other.is_empty() {
            empty
        } else {
            "Viewport/Rendering Mismatch:"
        };
        Self {
            heading,
            current_layer: current,
            other_layers: other,
        }
    }

    /// Whether both groups are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current_layer.is_empty() && self.other_layers.is_empty()
    }
}

fn sort_rows(rows: &mut [PanelRow]) {
    rows.sort_by(|a, b| {
        a.label
            .to_lowercase()
            .cmp(&b.label.to_lowercase())
            .then_with(|| a.label.cmp(&b.label))
    });
}

/// The materials containing undefined nodes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UndefinedNodesPanel {
    /// Line above the list, or the reason it is empty.
    pub heading: &'static str,
    /// Material name and number of undefined nodes, in scan order.
    pub materials: Vec<(String, usize)>,
}

/// Builds the undefined-nodes panel.
#[must_use]
pub fn undefined_nodes(details: &DetailLists, config: &Config) -> UndefinedNodesPanel {
    if !config.is_enabled(UNDEFINED_RULE) {
        return UndefinedNodesPanel {
            heading: "Check for 'Undefined' nodes disabled in Preferences",
            materials: Vec::new(),
        };
    }
    if details.undefined_nodes.is_empty() {
        return UndefinedNodesPanel {
            heading: "No 'Undefined' nodes found",
            materials: Vec::new(),
        };
    }
    UndefinedNodesPanel {
        heading: "Materials contain 'Undefined' nodes:",
        materials: details
            .undefined_nodes
            .iter()
            .map(|entry| (entry.name.clone(), entry.count))
            .collect(),
    }
}

/// One fired rule in the warnings panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FiredWarningRow {
    /// The rule.
    pub rule: RuleId,
    /// The rule's title.
    pub title: &'static str,
}

/// Lists the rules that produced a record, numbered rules first.
///
/// Returns an empty list when the output carries no warnings; hosts then
/// show "No warnings to display :)".
#[must_use]
pub fn fired_warnings(output: &PassOutput<'_>) -> Vec<FiredWarningRow> {
    if !output.warn_state {
        return Vec::new();
    }
    output
        .fired
        .iter()
        .filter_map(|rule| {
            descriptor(rule).map(|d| FiredWarningRow {
                rule,
                title: d.title,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
