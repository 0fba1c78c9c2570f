// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Datablock rules: materials, external files, file version and the
//! user-authored custom warnings.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use super::{RuleContext, RuleOutcome};
use crate::document::{Document, ImageTexture, Material, MaterialId};
use crate::error::RuleResult;
use crate::warning::{DetailUpdate, UndefinedNodes};

/// Prefix of blend-file-relative paths.
const RELATIVE_PREFIX: &str = "//";

/// Case-insensitive marker that turns a text block into a custom warning.
const CUSTOM_MARKER: &str = "headsup:";

/// Resolves a datablock path to an absolute one.
///
/// `//`-prefixed paths are relative to the directory of the open file, and
/// the `<UDIM>` token is replaced by the first tile, `1001`.
#[must_use]
pub(crate) fn resolve_path(doc: &dyn Document, path: &str) -> PathBuf {
    let path = path.replace("<UDIM>", "1001");
    match path.strip_prefix(RELATIVE_PREFIX) {
        Some(rest) => {
            let file = PathBuf::from(&doc.file_info().filepath);
            file.parent()
                .map_or_else(|| PathBuf::from(rest), |dir| dir.join(rest))
        }
        None => PathBuf::from(path),
    }
}

fn is_undefined(idname: &str) -> bool {
    idname.to_ascii_lowercase().contains("undefined")
}

/// Frame settings that must agree between nodes sharing a sequence.
type SequenceSettings = (i32, i32, i32);

fn sequence_nodes(material: &Material) -> impl Iterator<Item = &ImageTexture> + '_ {
    material
        .nodes
        .iter()
        .filter(|node| !is_undefined(&node.idname))
        .filter_map(|node| node.texture.as_ref())
        .filter(|texture| texture.is_sequence)
}

pub(super) fn image_sequences(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if ctx.materials.is_empty() {
        return Ok(out);
    }
    // Compare against every local material, not just the working set: a
    // conflict is between two users of the same image.
    let mut by_image: BTreeMap<&str, BTreeMap<SequenceSettings, BTreeSet<MaterialId>>> =
        BTreeMap::new();
    for id in ctx.doc.materials() {
        let Some(material) = ctx.doc.material(id).filter(|m| m.is_scannable()) else {
            continue;
        };
        for texture in sequence_nodes(material) {
            by_image
                .entry(texture.image.as_str())
                .or_default()
                .entry((
                    texture.frame_start,
                    texture.frame_offset,
                    texture.frame_duration,
                ))
                .or_default()
                .insert(id);
        }
    }
    let mut fired = false;
    for variants in by_image.values().filter(|v| v.len() > 1) {
        let involved: BTreeSet<MaterialId> = variants.values().flatten().copied().collect();
        if involved.iter().any(|id| ctx.materials.contains(id)) {
            fired = true;
            out.rearm.materials.extend(involved);
        }
    }
    if fired {
        out.warn(
            "Several [Image Sequence] nodes with different settings refer to the same datablock, expect issues!",
        );
    }
    Ok(out)
}

pub(super) fn autopack(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    if ctx.doc.scene_settings().use_autopack {
        out.warn("[Autopack Ressources] is ON!");
    }
    Ok(out)
}

pub(super) fn undefined_nodes(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    let mut list = Vec::new();
    for &id in ctx.materials {
        let Some(material) = ctx.doc.material(id).filter(|m| m.is_scannable()) else {
            continue;
        };
        let count = material
            .nodes
            .iter()
            .filter(|node| is_undefined(&node.idname))
            .count();
        if count > 0 {
            list.push(UndefinedNodes {
                material: id,
                name: material.name.clone(),
                count,
            });
            out.rearm.materials.insert(id);
        }
    }
    if !list.is_empty() && ctx.in_object_mode() {
        out.warn("[Undefined Nodes found] check HeadsUp SidePanel");
    }
    out.details.push(DetailUpdate::UndefinedNodes(list));
    Ok(out)
}

pub(super) fn missing_textures(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    let missing = ctx
        .doc
        .images()
        .iter()
        .filter(|image| !image.packed && image.users > 0 && !image.filepath.is_empty())
        .any(|image| !ctx.doc.path_exists(&resolve_path(ctx.doc, &image.filepath)));
    if missing {
        out.warn("[Missing Textures] found");
    }
    Ok(out)
}

pub(super) fn missing_libraries(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    let missing = ctx
        .doc
        .libraries()
        .iter()
        .any(|library| !ctx.doc.path_exists(&resolve_path(ctx.doc, &library.filepath)));
    if missing {
        out.warn("[Missing Libraries] found");
    }
    Ok(out)
}

pub(super) fn file_version(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    let info = ctx.doc.file_info();
    let outdated = (!ctx.saved_just_now
        && !info.filepath.is_empty()
        && info.file_version != info.runtime_version)
        .then_some(info.file_version);
    if let Some(version) = outdated {
        out.warn(format!(
            "[Blender Version] File was last saved with Blender {}.{}!",
            version.major, version.minor
        ));
    }
    out.details.push(DetailUpdate::OutdatedFileVersion(outdated));
    Ok(out)
}

/// One `[CUSTOM]` record per text block whose first line carries the marker.
pub(super) fn custom_text(ctx: &RuleContext<'_>) -> RuleResult<RuleOutcome> {
    let mut out = RuleOutcome::new();
    for text in ctx.doc.texts() {
        let first = text.body.lines().next().unwrap_or_default().trim();
        let marked = first
            .get(..CUSTOM_MARKER.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(CUSTOM_MARKER));
        if marked {
            let message = first[CUSTOM_MARKER.len()..].trim();
            out.warn(format!("[CUSTOM] {message}"));
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
