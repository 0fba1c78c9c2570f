// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-area overlay composition.
//!
//! [`compose_overlay`] decides everything one editor area shows for a
//! published [`PassOutput`]:
//!
//! - the `HeadsUp: a , b` line, routed to the area and split into
//!   [`TextRun`]s so `[...]` spans stand out in the highlight color
//! - the highlight border that replaces hidden overlay text in a viewport
//!   with area warnings
//! - the auto-keying badge
//! - the centered splash for files saved by a different version
//!
//! Placement lives in [`layout`](crate::layout); this module only decides
//! content and color.

use headsup_core::area::filter_for_area;
use headsup_core::config::Rgb;
use headsup_core::document::{AreaId, EditorKind, Version, Viewport};
use headsup_core::{PassOutput, RuleId};

use crate::border::BorderSpec;

const PREFIX: &str = "HeadsUp: ";
const REC_LABEL: &str = "[REC] (Auto-Keyframe)";
const SPLASH_TITLE_SIZE: u32 = 33;
const SPLASH_HINT_SIZE: u32 = 15;

/// Kind of editor an overlay is drawn into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlaySurface {
    /// A 3D viewport.
    Viewport3d,
    /// A node editor showing the compositor tree.
    Compositor,
    /// A node editor showing any other tree.
    OtherNodeTree,
}

/// The editor area being drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AreaContext {
    /// Host identity of the area, matched against area-scoped records.
    pub area: AreaId,
    /// Editor kind.
    pub editor: OverlaySurface,
    /// The area's overlays are switched on.
    pub overlays_shown: bool,
}

impl AreaContext {
    /// Context for a document viewport, or `None` for editors that never
    /// draw warnings.
    ///
    /// Compositor areas always count as showing overlays.
    #[must_use]
    pub fn from_viewport(viewport: &Viewport) -> Option<Self> {
        let (surface, overlays_shown) = match viewport.kind {
            EditorKind::View3d => (
                OverlaySurface::Viewport3d,
                viewport.view3d.as_ref().is_none_or(|v| v.show_overlays),
            ),
            EditorKind::Compositor => (OverlaySurface::Compositor, true),
            EditorKind::GraphEditor | EditorKind::DopeSheet | EditorKind::Other => return None,
        };
        Some(Self {
            area: viewport.id,
            editor: surface,
            overlays_shown,
        })
    }
}

/// A span of overlay text in one color.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRun {
    /// Text, drawn left to right after the previous run.
    pub text: String,
    /// Fill color.
    pub color: Rgb,
}

/// The auto-keying indicator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecBadge {
    /// Label drawn next to the dot.
    pub label: &'static str,
    /// Label color.
    pub label_color: Rgb,
    /// Dot and label are drawn; only the border remains while overlays are
    /// hidden.
    pub show_dot: bool,
    /// Region border.
    pub border: BorderSpec,
}

/// One line of the version splash.
#[derive(Clone, Debug, PartialEq)]
pub struct SplashLine {
    /// Text, horizontally centered.
    pub text: String,
    /// Fill color.
    pub color: Rgb,
    /// Unscaled point size.
    pub size: u32,
    /// Baseline offset from the region center, y up.
    pub offset_y: f64,
}

/// Centered notice for a file last saved by another version.
#[derive(Clone, Debug, PartialEq)]
pub struct VersionSplash {
    /// The version that saved the file.
    pub file_version: Version,
    /// Lines from top to bottom.
    pub lines: [SplashLine; 3],
}

impl VersionSplash {
    fn new(file_version: Version, warn: Rgb, highlight: Rgb) -> Self {
        Self {
            file_version,
            lines: [
                SplashLine {
                    text: "Attention:".into(),
                    color: warn,
                    size: SPLASH_TITLE_SIZE,
                    offset_y: 35.0,
                },
                SplashLine {
                    text: format!(
                        "File created in Blender {}.{}",
                        file_version.major, file_version.minor
                    ),
                    color: highlight,
                    size: SPLASH_TITLE_SIZE,
                    offset_y: 0.0,
                },
                SplashLine {
                    text: "HeadsUp: Save file to confirm and remove the warning.".into(),
                    color: highlight,
                    size: SPLASH_HINT_SIZE,
                    offset_y: -20.0,
                },
            ],
        }
    }
}

/// Everything one area draws for the current output.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlayModel {
    /// Warning line, empty when nothing is shown.
    pub runs: Vec<TextRun>,
    /// Border marking area warnings while overlays are hidden.
    pub highlight_border: Option<BorderSpec>,
    /// Auto-keying indicator.
    pub rec_badge: Option<RecBadge>,
    /// Version notice.
    pub splash: Option<VersionSplash>,
    /// Darken the region edges behind the version notice.
    pub vignette: bool,
}

impl OverlayModel {
    /// Whether the area draws nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
            && self.highlight_border.is_none()
            && self.rec_badge.is_none()
            && self.splash.is_none()
            && !self.vignette
    }

    /// The warning line as plain text.
    #[must_use]
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

/// Splits `message` into runs: brackets and bracketed text in `highlight`,
/// everything else in `warn`.
///
/// Brackets do not nest; an unmatched `]` just switches back to `warn`.
#[must_use]
pub fn colored_runs(message: &str, warn: Rgb, highlight: Rgb) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut current = String::new();
    let mut inside = false;

    for ch in message.chars() {
        match ch {
            '[' => {
                flush(&mut runs, &mut current, warn);
                runs.push(TextRun {
                    text: "[".into(),
                    color: highlight,
                });
                inside = true;
            }
            ']' => {
                flush(&mut runs, &mut current, highlight);
                runs.push(TextRun {
                    text: "]".into(),
                    color: highlight,
                });
                inside = false;
            }
            _ => current.push(ch),
        }
    }
    let tail = if inside { highlight } else { warn };
    flush(&mut runs, &mut current, tail);
    runs
}

fn flush(runs: &mut Vec<TextRun>, text: &mut String, color: Rgb) {
    if !text.is_empty() {
        runs.push(TextRun {
            text: std::mem::take(text),
            color,
        });
    }
}

/// Composes the overlay of one area.
///
/// Nothing is drawn without an active warn state. The text is dropped when
/// the area hides its overlays and `toggle_with_overlays` is set; in a 3D
/// viewport the highlight border then takes its place if the area has
/// warnings of its own.
#[must_use]
pub fn compose_overlay(output: &PassOutput<'_>, area: &AreaContext) -> OverlayModel {
    let presentation = &output.config.presentation;
    if !output.warn_state {
        return OverlayModel::default();
    }
    if area.editor != OverlaySurface::Viewport3d && !presentation.compositor_warnings {
        return OverlayModel::default();
    }

    let warn = presentation.warn_color;
    let highlight = presentation.highlight_color;
    let hidden = !area.overlays_shown && presentation.toggle_with_overlays;
    let view = filter_for_area(output.records, area.area);

    let mut model = OverlayModel::default();

    let text = match area.editor {
        OverlaySurface::OtherNodeTree => String::new(),
        OverlaySurface::Viewport3d | OverlaySurface::Compositor => {
            let joined = view.joined();
            if joined.trim().is_empty() {
                String::new()
            } else {
                format!("{PREFIX}{joined}")
            }
        }
    };
    if !hidden {
        model.runs = colored_runs(&text, warn, highlight);
    }

    if area.editor == OverlaySurface::Viewport3d {
        if view.area_scoped_found
            && presentation.viewport_highlighting
            && presentation.toggle_with_overlays
            && !area.overlays_shown
        {
            model.highlight_border = Some(BorderSpec::highlight(highlight));
        }

        if output.fired.contains(RuleId::Numbered(4)) && output.config.options.rec_indicator {
            model.rec_badge = Some(RecBadge {
                label: REC_LABEL,
                label_color: highlight,
                show_dot: area.overlays_shown,
                border: BorderSpec::RECORDING,
            });
        }

        model.vignette = output.fired.contains(RuleId::Numbered(44));
    }

    if output.fired.contains(RuleId::Numbered(44))
        && output.config.options.version_splash
        && !output.saved_just_now
        && let Some(version) = output.details.outdated_file_version
    {
        model.splash = Some(VersionSplash::new(version, warn, highlight));
    }

    model
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
