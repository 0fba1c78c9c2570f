// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Output contract for hosts.
//!
//! The engine pushes results through a [`Presenter`]. A presenter owns
//! whatever the host draws with: overlay text, the editor border, side
//! panels. The engine only tells it *what* to show.
//!
//! Two kinds of call reach a presenter:
//!
//! - [`Presenter::apply`] whenever the published output changed, or at a
//!   forced checkpoint (first pass after load or save, startup grace).
//! - [`Presenter::set_border_color`] when the warn state flips or at a forced
//!   checkpoint, once the theme snapshot exists. Text-only mode always
//!   receives the original theme color.
//!
//! `headsup_render` turns a [`PassOutput`] into concrete draw models.

use crate::config::{Config, Rgb};
use crate::warning::{DetailLists, FiredRules, WarningRecord};

/// Theme colors the engine snapshots on its first warn-state signal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThemeColors {
    /// Current editor border color.
    pub border: Rgb,
    /// Current highlighted-text color of the 3D viewport.
    pub text_highlight: Rgb,
}

/// Everything published after a pass.
#[derive(Clone, Copy, Debug)]
pub struct PassOutput<'a> {
    /// Warning records in rule order.
    pub records: &'a [WarningRecord],
    /// Whether any warning is present.
    pub warn_state: bool,
    /// Side-panel detail lists.
    pub details: &'a DetailLists,
    /// Rules that produced a record.
    pub fired: &'a FiredRules,
    /// Preferences, including the theme snapshot.
    pub config: &'a Config,
    /// The file was saved since it was loaded.
    pub saved_just_now: bool,
}

/// Applies engine output to a host's presentation surfaces.
///
/// Implementations exist for real hosts and for test doubles; the engine is
/// generic over neither and takes `&mut dyn Presenter`.
pub trait Presenter {
    /// Reports the host's current theme colors.
    fn theme(&self) -> ThemeColors;

    /// Recolors the editor border.
    fn set_border_color(&mut self, color: Rgb);

    /// Shows the published output.
    fn apply(&mut self, output: &PassOutput<'_>);
}
