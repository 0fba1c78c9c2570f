// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rules about the active object.

use super::{RuleContext, RuleOutcome, format_float, round_to};
use crate::document::{
    InteractionMode, MeshData, ModifierKind, Object, ObjectKind, PosePosition,
};
use crate::error::{RuleError, RuleResult};

/// Object types for which non-uniform or non-unit scale is meaningless.
const SCALE_EXEMPT: [ObjectKind; 4] = [
    ObjectKind::Light,
    ObjectKind::Meta,
    ObjectKind::Camera,
    ObjectKind::LightProbe,
];

/// Mesh data of a mesh object; a mesh without data is a dangling reference.
fn mesh_data(object: &Object) -> RuleResult<Option<&MeshData>> {
    if object.kind != ObjectKind::Mesh {
        return Ok(None);
    }
    object
        .mesh
        .as_ref()
        .map(Some)
        .ok_or_else(|| RuleError::DanglingReference {
            entity: object.name.clone(),
            what: "mesh data",
        })
}

pub(super) fn shape_key_value(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if ctx.mode() != InteractionMode::Sculpt {
        return Ok(out);
    }
    let Some((_, object)) = ctx.active_object()? else {
        return Ok(out);
    };
    let Some(mesh) = mesh_data(object)? else {
        return Ok(out);
    };
    if mesh.shape_keys.is_empty() || mesh.active_shape_key == 0 {
        return Ok(out);
    }
    let key = mesh
        .shape_keys
        .get(mesh.active_shape_key)
        .ok_or_else(|| RuleError::DanglingReference {
            entity: object.name.clone(),
            what: "active shape key",
        })?;
    let value = round_to(f64::from(key.value), 3);
    if value != 1.0 {
        out.warn(format!(
            "Active [Shape Key] is not 1.0! Set to: {}!",
            format_float(value)
        ));
    }
    Ok(out)
}

pub(super) fn scale(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    let Some((_, object)) = ctx.active_object()? else {
        return Ok(out);
    };
    let options = &ctx.config.options;
    let exempt = SCALE_EXEMPT.contains(&object.kind);
    let [x, y, z] = object.scale.map(f64::from);
    let uniform = round_to(x, 3) == round_to(y, 3) && round_to(y, 3) == round_to(z, 3);

    if !uniform {
        if [x, y, z].iter().any(|axis| *axis <= 0.0) {
            if options.scale_negative {
                out.warn("[Non-Uniform Scale (Zero or Negative Axis!)] for active Object!");
            }
        } else if options.scale_non_uniform && !exempt {
            out.warn("[Non-Uniform Scale] for active Object!");
        }
    } else if x != 1.0 {
        if x < 0.0 {
            if options.scale_negative {
                out.warn("[Negative Scale] for active Object!");
            }
        } else if options.scale_not_one && !exempt {
            out.warn("[Scale is not 1] for active Object!");
        }
    }
    Ok(out)
}

pub(super) fn mirror(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if ctx.in_object_mode() {
        return Ok(out);
    }
    let Some((_, object)) = ctx.active_object()? else {
        return Ok(out);
    };
    let Some(mesh) = mesh_data(object)? else {
        return Ok(out);
    };
    let axes: Vec<&str> = [
        (mesh.use_mirror_x, "'X'"),
        (mesh.use_mirror_y, "'Y'"),
        (mesh.use_mirror_z, "'Z'"),
        (mesh.use_mirror_topology, "'Topology'"),
    ]
    .into_iter()
    .filter_map(|(on, label)| on.then_some(label))
    .collect();
    if !axes.is_empty() {
        out.warn(format!("[Mirror {}] is ON!", axes.join(", ")));
    }
    Ok(out)
}

pub(super) fn corrective_smooth(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if ctx.mode() != InteractionMode::Sculpt {
        return Ok(out);
    }
    let Some((_, object)) = ctx.active_object()? else {
        return Ok(out);
    };
    if object.kind == ObjectKind::Mesh
        && object
            .modifiers
            .iter()
            .any(|m| m.kind == ModifierKind::CorrectiveSmooth && m.show_viewport)
    {
        out.warn("Sculpting with an active [Corrective Smooth] modifier!");
    }
    Ok(out)
}

pub(super) fn shadow_catcher_holdout(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if !ctx.in_object_mode() {
        return Ok(out);
    }
    let Some((_, object)) = ctx.active_object()? else {
        return Ok(out);
    };
    if object.kind != ObjectKind::Mesh {
        return Ok(out);
    }
    match (object.is_shadow_catcher, object.is_holdout) {
        (true, false) => out.warn("Active Object is [Shadow Catcher]"),
        (false, true) => out.warn("Active Object is [Holdout]"),
        (true, true) => out.warn("Active Object is [Holdout & Shadow Catcher]"),
        (false, false) => {}
    }
    Ok(out)
}

pub(super) fn relative_array(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if !ctx.in_object_mode() {
        return Ok(out);
    }
    let Some((_, object)) = ctx.active_object()? else {
        return Ok(out);
    };
    // One record per offending modifier.
    for (index, modifier) in object.modifiers.iter().enumerate() {
        if index != 0
            && matches!(
                modifier.kind,
                ModifierKind::Array {
                    relative_offset: true
                }
            )
        {
            out.warn("Modifiers before [Array] with Relative Offset!");
        }
    }
    Ok(out)
}

pub(super) fn locked_transforms(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if !ctx.in_object_mode() {
        return Ok(out);
    }
    let Some((_, object)) = ctx.active_object()? else {
        return Ok(out);
    };
    let groups: Vec<String> = [
        ("Scale", object.lock_scale),
        ("Location", object.lock_location),
        ("Rotation", object.lock_rotation),
    ]
    .into_iter()
    .filter_map(|(label, locks)| {
        let axes: Vec<&str> = ["X", "Y", "Z"]
            .into_iter()
            .zip(locks)
            .filter_map(|(axis, locked)| locked.then_some(axis))
            .collect();
        (!axes.is_empty()).then(|| format!("{label}({})", axes.join(",")))
    })
    .collect();
    if !groups.is_empty() {
        out.warn(format!("[Lock {}] for Active Object", groups.join(", ")));
    }
    Ok(out)
}

pub(super) fn rest_position(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    let Some((_, object)) = ctx.active_object()? else {
        return Ok(out);
    };
    if object.kind == ObjectKind::Armature && object.pose_position == Some(PosePosition::Rest) {
        out.warn("Active Rig is in [Rest Position]");
    }
    Ok(out)
}

pub(super) fn render_subdivisions(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if !ctx.in_object_mode() {
        return Ok(out);
    }
    let Some((_, object)) = ctx.active_object()? else {
        return Ok(out);
    };
    for modifier in object.modifiers.iter().filter(|m| m.show_render) {
        let lower = match modifier.kind {
            ModifierKind::Subsurf {
                levels,
                render_levels,
            }
            | ModifierKind::Multires {
                levels,
                render_levels,
            } => render_levels < levels,
            _ => false,
        };
        if lower {
            out.warn(format!(
                "[{}] Render subdivisions lower than viewport",
                modifier.name
            ));
        }
    }
    Ok(out)
}

pub(super) fn in_front(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if let Some((_, object)) = ctx.active_object()?
        && object.show_in_front
    {
        out.warn("Active Object is [In Front]");
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
