// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compositor graph rule.

use std::collections::BTreeSet;

use super::{RuleContext, RuleOutcome};
use crate::document::{CompositorNodeKind, NodeTree};
use crate::error::RuleResult;

const MISSING: &str = "Renderlayer Node(s) missing";
const MUTED: &str = "Renderlayer Node(s) muted";
const OUTPUT_MUTED: &str = "File Output Node(s) muted";

/// Checks that every enabled view layer has a live Render Layers node and
/// that the file output it feeds is not muted.
///
/// The graph is only walked while the compositor is armed. A graph with
/// issues re-arms itself, so the warning persists until the issue is fixed.
pub(super) fn render_layer_nodes(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if !ctx.compositor_dirty {
        return Ok(out);
    }
    let Some(tree) = ctx.doc.compositor() else {
        return Ok(out);
    };
    if !ctx.doc.render_settings().use_compositing || !ctx.doc.scene_settings().use_nodes {
        return Ok(out);
    }

    let mut issues: Vec<&str> = Vec::new();
    let mut note = |issue: &'static str| {
        if !issues.contains(&issue) {
            issues.push(issue);
        }
    };
    for layer in ctx.doc.view_layers().iter().filter(|l| l.enabled) {
        let node = tree.nodes.iter().position(|n| {
            matches!(&n.kind, CompositorNodeKind::RenderLayers { layer: name } if *name == layer.name)
        });
        let Some(node) = node else {
            note(MISSING);
            continue;
        };
        if tree.nodes[node].mute {
            note(MUTED);
        }
        if file_output_downstream(tree, node, &mut BTreeSet::new()) == Some(true) {
            note(OUTPUT_MUTED);
        }
    }

    if !issues.is_empty() {
        out.warn(format!("[Compositor]: {}", issues.join(", ")));
        out.rearm.compositor = true;
    }
    Ok(out)
}

/// Depth-first search for the first File Output node fed by `node`.
/// Returns its mute flag, or `None` when no output is reachable.
fn file_output_downstream(
    tree: &NodeTree,
    node: usize,
    visited: &mut BTreeSet<usize>,
) -> Option<bool> {
    if !visited.insert(node) {
        return None;
    }
    let current = tree.nodes.get(node)?;
    if current.kind == CompositorNodeKind::FileOutput {
        return Some(current.mute);
    }
    tree.downstream(node)
        .find_map(|next| file_output_downstream(tree, next, visited))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
