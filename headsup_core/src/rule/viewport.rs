// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Area-scoped rules over 3D viewport state.
//!
//! Every record produced here is tagged with the viewport's [`AreaId`], so a
//! viewport only shows the warnings about itself.
//!
//! [`AreaId`]: crate::document::AreaId

use std::collections::BTreeSet;

use super::{RuleContext, RuleOutcome};
use crate::document::ObjectTypeFilter;
use crate::error::RuleResult;

pub(super) fn camera_to_view(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    for (area, view) in ctx.views_3d() {
        if view.lock_camera {
            out.warn_in(area, "[Camera to View] is ON!");
        }
    }
    Ok(out)
}

pub(super) fn local_view(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    for (area, view) in ctx.views_3d() {
        if view.local_view {
            out.warn_in(area, "[Local View] is ON!");
        }
    }
    Ok(out)
}

pub(super) fn clipping_border(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    for (area, view) in ctx.views_3d() {
        if view.clip_planes {
            out.warn_in(area, "[Clipping Border] is ON! Alt+B to reset");
        }
    }
    Ok(out)
}

pub(super) fn hidden_types(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    for (area, view) in ctx.views_3d() {
        if let Some(list) = type_list(&view.hidden_types) {
            out.warn_in(area, format!("[Viewport doesn't show: {list}]"));
        }
    }
    Ok(out)
}

pub(super) fn unselectable_types(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    for (area, view) in ctx.views_3d() {
        if let Some(list) = type_list(&view.unselectable_types) {
            out.warn_in(area, format!("[Viewport can't select: {list}]"));
        }
    }
    Ok(out)
}

/// Labels sorted alphabetically and comma-joined; `None` when empty.
fn type_list(types: &BTreeSet<ObjectTypeFilter>) -> Option<String> {
    if types.is_empty() {
        return None;
    }
    let mut labels: Vec<&str> = types.iter().map(|t| t.label()).collect();
    labels.sort_unstable();
    Some(labels.join(", "))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
