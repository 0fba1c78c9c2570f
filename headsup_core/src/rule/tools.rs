// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tool-setting rules. These read the scene's tool settings and the current
//! interaction mode only.

use super::{RuleContext, RuleOutcome};
use crate::document::{EditorKind, InteractionMode};
use crate::error::RuleResult;

pub(super) fn auto_keying(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if matches!(ctx.mode(), InteractionMode::Object | InteractionMode::Pose)
        && ctx.doc.tool_settings().use_keyframe_insert_auto
    {
        out.warn("[Auto Keying] is ON!");
    }
    Ok(out)
}

pub(super) fn proportional_editing(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let tools = ctx.doc.tool_settings();
    let mut out = RuleOutcome::new();
    match ctx.mode() {
        InteractionMode::EditMesh if tools.use_proportional_edit => {
            out.warn("[Proportional Editing (Edit Mode/UV)] is ON!");
        }
        InteractionMode::Object if tools.use_proportional_edit_objects => {
            out.warn("[Proportional Editing (Object Mode)] is ON!");
        }
        _ => {}
    }
    // Editors are checked once each, however many are open.
    let has_editor = |kind: EditorKind| ctx.viewports.iter().any(|v| v.kind == kind);
    if tools.use_proportional_fcurve && has_editor(EditorKind::GraphEditor) {
        out.warn("[Proportional Editing (Graph Editor)] is ON!");
    }
    if tools.use_proportional_action && has_editor(EditorKind::DopeSheet) {
        out.warn("[Proportional Editing (Dopesheet)] is ON!");
    }
    Ok(out)
}

pub(super) fn affect_only(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if !ctx.in_object_mode() {
        return Ok(out);
    }
    let tools = ctx.doc.tool_settings();
    if tools.use_transform_data_origin {
        out.warn("[Affect Only >Origins<] is ON!");
    }
    if tools.use_transform_pivot_point_align {
        out.warn("[Affect Only >Locations<] is ON!");
    }
    if tools.use_transform_skip_children {
        out.warn("[Affect Only >Parents<] is ON!");
    }
    Ok(out)
}

pub(super) fn snapping(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let tools = ctx.doc.tool_settings();
    let mode = ctx.mode();
    let mut out = RuleOutcome::new();
    if matches!(mode, InteractionMode::Object | InteractionMode::EditMesh) && tools.use_snap {
        out.warn("[Snapping] is ON!");
    }
    if mode == InteractionMode::EditMesh && tools.use_snap_uv {
        out.warn("[Snapping (UV)] is ON!");
    }
    Ok(out)
}

/// Shared shape of the edit-mesh-only toggles.
fn edit_mesh_flag(ctx: &RuleContext<'_>, flag: bool, message: &str) -> RuleOutcome {
    let mut out = RuleOutcome::new();
    if ctx.mode() == InteractionMode::EditMesh && flag {
        out.warn(message);
    }
    out
}

pub(super) fn automerge(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let flag = ctx.doc.tool_settings().use_mesh_automerge;
    Ok(edit_mesh_flag(ctx, flag, "[Automerge Vertices] is ON!"))
}

pub(super) fn uv_select_sync(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let flag = ctx.doc.tool_settings().use_uv_select_sync;
    Ok(edit_mesh_flag(ctx, flag, "[UV Sync Selection] is ON!"))
}

pub(super) fn live_unwrap(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let flag = ctx.doc.tool_settings().use_edge_path_live_unwrap;
    Ok(edit_mesh_flag(ctx, flag, "[Live Unwrap] is ON!"))
}

pub(super) fn correct_face_attributes(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let flag = ctx.doc.tool_settings().use_transform_correct_face_attributes;
    Ok(edit_mesh_flag(
        ctx,
        flag,
        "[Correct Face Attributes] is ON!(UVs change with Editmode Transforms)!",
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
