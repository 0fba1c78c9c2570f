// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render, output, sequencer and frame-range rules.

use super::{RuleContext, RuleId, RuleOutcome, format_float, round_to};
use crate::config::{FilmTransparencyWarning, PreferredDevice};
use crate::document::{ComputeDevice, RenderEngine, StripKind, ViewLayer};
use crate::error::RuleResult;

pub(super) fn simplify(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    let render = ctx.doc.render_settings();
    if !ctx.in_object_mode() || !render.use_simplify {
        return Ok(out);
    }
    let thresholds = &ctx.config.thresholds;
    let viewport = render.simplify_subdivision;
    let final_render = render.simplify_subdivision_render;
    let render_low = final_render <= thresholds.simplify_render;
    if !ctx.config.options.simplify_render_only
        && viewport <= thresholds.simplify_viewport
        && !render_low
    {
        out.warn(format!(
            "[Simplify] is ON! Viewport: {viewport}, Render: {final_render}"
        ));
    }
    if render_low {
        out.warn(format!(
            "[Simplify] is ON! Render Subdivision is low: {final_render}!"
        ));
    }
    Ok(out)
}

pub(super) fn sequencer_strips(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if ctx.in_object_mode()
        && ctx.doc.render_settings().use_sequencer
        && ctx.doc.strips().iter().any(|s| s.kind != StripKind::Sound)
    {
        out.warn("[Sequencer] is ON and contains Data!");
    }
    Ok(out)
}

pub(super) fn render_border(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    let render = ctx.doc.render_settings();
    if !ctx.in_object_mode() || !render.use_border {
        return Ok(out);
    }
    let width = render.border.max_x - render.border.min_x;
    let height = render.border.max_y - render.border.min_y;
    if width != 1.0 || height != 1.0 {
        if render.use_crop_to_border {
            out.warn("[Render Border with Crop] is ON!");
        } else {
            out.warn("[Render Border] is ON!");
        }
    }
    Ok(out)
}

pub(super) fn resolution_percentage(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    let percentage = ctx.doc.render_settings().resolution_percentage;
    if ctx.in_object_mode() && percentage != 100 {
        out.warn(format!(
            "[Render Resolution Percentage] is: {percentage}%!"
        ));
    }
    Ok(out)
}

pub(super) fn pixel_filter(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if !ctx.in_object_mode() {
        return Ok(out);
    }
    let render = ctx.doc.render_settings();
    match render.engine {
        RenderEngine::Cycles if render.cycles_filter_width != 1.5 => {
            let width = format_float(round_to(f64::from(render.cycles_filter_width), 2));
            out.warn(format!(
                "[Pixel Filter(Cycles)]: {width} px!(Default 1.5px)"
            ));
        }
        RenderEngine::Eevee | RenderEngine::EeveeNext if render.filter_size != 1.5 => {
            let size = format_float(round_to(f64::from(render.filter_size), 2));
            out.warn(format!("[Pixel Filter(EEVEE):] {size} px!(Default 1.5px)"));
        }
        _ => {}
    }
    Ok(out)
}

pub(super) fn sample_override(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if !ctx.in_object_mode() || ctx.doc.render_settings().engine != RenderEngine::Cycles {
        return Ok(out);
    }
    let layers: Vec<String> = ctx
        .doc
        .view_layers()
        .iter()
        .filter(|l| l.samples != 0)
        .map(|l| format!("'{}': {}", l.name, l.samples))
        .collect();
    if !layers.is_empty() {
        out.warn(format!(
            "[Sample Override] for ViewLayer(s): {}",
            layers.join(" | ")
        ));
    }
    Ok(out)
}

/// Low-sample checks follow the rule's own toggle; high-sample checks follow
/// their sub-option. The descriptor runs this when either is on.
pub(super) fn samples(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if !ctx.in_object_mode() {
        return Ok(out);
    }
    let render = ctx.doc.render_settings();
    let (label, count) = match render.engine {
        RenderEngine::Cycles => ("Cycles", render.cycles_samples),
        RenderEngine::Eevee => ("EEVEE", render.eevee_samples),
        _ => return Ok(out),
    };
    let thresholds = &ctx.config.thresholds;
    if ctx.config.is_enabled(RuleId::Numbered(27)) && count <= thresholds.sample_limit_lower {
        out.warn(format!("[Low Samples({label})]: {count} samples!"));
    }
    if ctx.config.options.high_samples && count >= thresholds.sample_limit_upper {
        out.warn(format!("[High Samples({label})]: {count} samples!"));
    }
    Ok(out)
}

pub(super) fn preview_range(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    let scene = ctx.doc.scene_settings();
    if scene.use_preview_range
        && (scene.frame_preview_start != scene.frame_start
            || scene.frame_preview_end != scene.frame_end)
    {
        out.warn(format!(
            "[Preview Range]: {}-{}!",
            scene.frame_preview_start, scene.frame_preview_end
        ));
    }
    Ok(out)
}

pub(super) fn render_device(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    let render = ctx.doc.render_settings();
    if !ctx.in_object_mode() || render.engine != RenderEngine::Cycles {
        return Ok(out);
    }
    match (ctx.config.options.preferred_device, render.cycles_device) {
        (PreferredDevice::Gpu, ComputeDevice::Cpu) => out.warn("[Cycles not using GPU]"),
        (PreferredDevice::Cpu, ComputeDevice::Gpu) => out.warn("[Cycles not using CPU]"),
        _ => {}
    }
    Ok(out)
}

pub(super) fn layer_overrides(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if ctx.doc.render_settings().engine != RenderEngine::Cycles || !ctx.in_object_mode() {
        return Ok(out);
    }
    let layers = ctx.doc.view_layers();
    let materials = quoted_layers(layers, |l| l.material_override.is_some());
    if !materials.is_empty() {
        out.warn(format!(
            "[Material Override] for ViewLayer(s): {}",
            materials.join(" | ")
        ));
    }
    let worlds = quoted_layers(layers, |l| l.world_override.is_some());
    if !worlds.is_empty() {
        out.warn(format!(
            "[World Override] for ViewLayer(s): {}",
            worlds.join(" | ")
        ));
    }
    Ok(out)
}

fn quoted_layers(layers: &[ViewLayer], pick: impl Fn(&ViewLayer) -> bool) -> Vec<String> {
    layers
        .iter()
        .filter(|l| pick(l))
        .map(|l| format!("'{}'", l.name))
        .collect()
}

pub(super) fn compositor_use_nodes(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if !ctx.in_object_mode() {
        return Ok(out);
    }
    let has_nodes = ctx.doc.compositor().is_some_and(|tree| !tree.nodes.is_empty());
    if !has_nodes {
        return Ok(out);
    }
    let compositing = ctx.doc.render_settings().use_compositing;
    let use_nodes = ctx.doc.scene_settings().use_nodes;
    if compositing && !use_nodes {
        out.warn("[Compositor]: 'Use Nodes' is OFF, but contains nodes!");
    }
    if !compositing && use_nodes {
        out.warn("[Compositor]: 'Use Nodes' is ON, but Postprocessing is OFF!");
    }
    Ok(out)
}

pub(super) fn video_output(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    let format = ctx.doc.render_settings().file_format;
    if ctx.in_object_mode() && format.is_video() {
        out.warn(format!(
            "[File Output] is set to {} video!",
            format.identifier()
        ));
    }
    Ok(out)
}

pub(super) fn film_transparent(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if !ctx.in_object_mode() {
        return Ok(out);
    }
    let transparent = ctx.doc.render_settings().film_transparent;
    match ctx.config.options.film_transparency {
        FilmTransparencyWarning::Off if !transparent => {
            out.warn("[Film 'Transparent'] is OFF!");
        }
        FilmTransparencyWarning::On if transparent => {
            out.warn("[Film 'Transparent'] is ON!");
        }
        _ => {}
    }
    Ok(out)
}

pub(super) fn loud_audio(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    let limit = ctx.config.thresholds.loud_volume;
    if ctx
        .doc
        .strips()
        .iter()
        .any(|s| s.kind == StripKind::Sound && s.volume > limit)
    {
        out.warn("[Sequencer] contains LOUD audio strip(s)!");
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
