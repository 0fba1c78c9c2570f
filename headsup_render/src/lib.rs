// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation models for HeadsUp warnings.
//!
//! This crate sits between [`headsup_core`]'s published
//! [`PassOutput`](headsup_core::PassOutput) and a host's drawing code. It
//! makes every "what to draw" decision and leaves the "how" to the host:
//!
//! - [`overlay`]: per-area overlay text split into colored runs, plus the
//!   highlight border, the auto-keying badge and the version splash
//! - [`layout`]: anchor points for overlay elements inside a region
//! - [`border`]: rounded border geometry as a [`kurbo::RoundedRect`]
//! - [`panel`]: side-panel models for mismatch lists, undefined nodes and
//!   the fired-warnings list
//!
//! Nothing here touches a GPU or a font; hosts translate the models into
//! their own draw calls.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod border;
pub mod layout;
pub mod overlay;
pub mod panel;

pub use border::{BorderSpec, Rgba, border_shape};
pub use layout::RegionChrome;
pub use overlay::{
    AreaContext, OverlayModel, OverlaySurface, RecBadge, TextRun, VersionSplash, colored_runs,
    compose_overlay,
};
pub use panel::{
    FiredWarningRow, MismatchPanel, PanelEntity, PanelRow, RowDetail, UndefinedNodesPanel,
    fired_warnings, undefined_nodes,
};

/// Point size used for overlay text.
///
/// `text_size` is the user preference, `pixel_size` the host's display
/// density factor and `ui_scale` the interface scale. The product is
/// rounded half away from zero.
#[must_use]
#[expect(
    clippy::cast_possible_truncation,
    reason = "text sizes are small positive values; `as` saturates out-of-range floats"
)]
pub fn text_size(text_size: u32, pixel_size: f32, ui_scale: f32) -> u32 {
    let scaled = f64::from(text_size) * f64::from(pixel_size) * f64::from(ui_scale);
    scaled.round().max(0.0) as u32
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
