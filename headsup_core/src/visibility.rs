// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-view-layer collection visibility.
//!
//! The index maps every enabled view layer to the collections visible in
//! it. It is rebuilt wholesale whenever collection topology changes; there
//! is no partial update path.

use std::collections::{BTreeMap, BTreeSet};

use crate::document::{CollectionId, Document};
use crate::error::VisibilityError;

/// Depth past which a collection walk is treated as a cycle.
const MAX_DEPTH: usize = 1024;

/// Visible collections per enabled view layer, keyed by view layer name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibilityIndex {
    layers: BTreeMap<String, BTreeSet<CollectionId>>,
}

impl VisibilityIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes the index from scratch.
    ///
    /// For each enabled view layer, walks the collection tree depth-first
    /// from the scene collection:
    ///
    /// - a render-hidden collection prunes its whole subtree;
    /// - an excluded collection is not visible itself, but its children are
    ///   still walked.
    ///
    /// On error the previous contents are kept.
    pub fn rebuild(&mut self, doc: &dyn Document) -> Result<(), VisibilityError> {
        let mut layers = BTreeMap::new();
        for layer in doc.view_layers().iter().filter(|l| l.enabled) {
            let mut visible = BTreeSet::new();
            let mut path = Vec::new();
            walk(
                doc,
                doc.scene_collection(),
                &layer.excluded,
                &mut visible,
                &mut path,
            )?;
            layers.insert(layer.name.clone(), visible);
        }
        self.layers = layers;
        Ok(())
    }

    /// Collections visible in `view_layer`, or `None` when the layer is
    /// disabled or unknown.
    #[must_use]
    pub fn visible_collections(&self, view_layer: &str) -> Option<&BTreeSet<CollectionId>> {
        self.layers.get(view_layer)
    }

    /// Names of the view layers in which any of `collections` is visible, in
    /// name order.
    pub fn layers_showing<'a>(
        &'a self,
        collections: &'a [CollectionId],
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.layers
            .iter()
            .filter(|(_, visible)| collections.iter().any(|c| visible.contains(c)))
            .map(|(name, _)| name.as_str())
    }

    /// Iterates `(view layer, visible collections)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<CollectionId>)> + '_ {
        self.layers.iter().map(|(name, set)| (name.as_str(), set))
    }
}

fn walk(
    doc: &dyn Document,
    id: CollectionId,
    excluded: &BTreeSet<CollectionId>,
    visible: &mut BTreeSet<CollectionId>,
    path: &mut Vec<CollectionId>,
) -> Result<(), VisibilityError> {
    if path.contains(&id) || path.len() >= MAX_DEPTH {
        return Err(VisibilityError::CollectionCycle(id));
    }
    let Some(collection) = doc.collection(id) else {
        return Err(VisibilityError::UnknownCollection(id));
    };
    if collection.hide_render {
        return Ok(());
    }
    if !excluded.contains(&id) {
        visible.insert(id);
    }
    path.push(id);
    for &child in &collection.children {
        walk(doc, child, excluded, visible, path)?;
    }
    path.pop();
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
