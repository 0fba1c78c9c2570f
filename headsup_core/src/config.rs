// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! User preferences.
//!
//! The engine only reads the configuration, with two exceptions recorded by
//! the first warn-state signal: [`Presentation::first_setup_done`] and
//! [`Presentation::original_theme_color`].
//!
//! Configurations round-trip through TOML. Every section and field has a
//! default, so a partial file (or an empty one) is valid:
//!
//! ```toml
//! [rules]
//! 38 = true
//! custom = false
//!
//! [thresholds]
//! sample_limit_lower = 32
//!
//! [presentation]
//! text_size = 14
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::rule::RuleId;

/// Linear RGB color with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    /// Pure white.
    pub const WHITE: Self = Self([1.0, 1.0, 1.0]);
    /// Black; also the "no snapshot taken yet" value of the theme color.
    pub const BLACK: Self = Self([0.0, 0.0, 0.0]);
}

/// Complete preference set.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-rule enable flags.
    pub rules: RuleToggles,
    /// Sub-options of individual rules.
    pub options: RuleOptions,
    /// Numeric limits used by rules.
    pub thresholds: Thresholds,
    /// Overlay and border settings.
    pub presentation: Presentation,
}

impl Config {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Serializes the configuration to TOML text.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Whether rule `id` is switched on.
    #[must_use]
    pub fn is_enabled(&self, id: RuleId) -> bool {
        self.rules.is_enabled(id)
    }
}

/// Rule enable flags.
///
/// Only explicit settings are stored; everything else falls back to the
/// built-in default (on for every rule except 38).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleToggles(BTreeMap<RuleId, bool>);

impl RuleToggles {
    /// Whether rule `id` is switched on.
    #[must_use]
    pub fn is_enabled(&self, id: RuleId) -> bool {
        self.0
            .get(&id)
            .copied()
            .unwrap_or_else(|| Self::default_for(id))
    }

    /// Switches rule `id` on or off.
    pub fn set(&mut self, id: RuleId, enabled: bool) {
        self.0.insert(id, enabled);
    }

    /// Built-in default for rule `id`.
    #[must_use]
    pub fn default_for(id: RuleId) -> bool {
        id != RuleId::Numbered(38)
    }
}

/// Which objects the modifier-visibility check looks at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierScope {
    /// Only the active object, reported inline.
    #[default]
    ActiveOnly,
    /// Every scanned object, reported in the side panel.
    AllObjects,
}

/// Compute device the user expects Cycles to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferredDevice {
    /// Warn when Cycles renders on the CPU.
    #[default]
    Gpu,
    /// Warn when Cycles renders on the GPU.
    Cpu,
}

/// Film transparency state that should trigger a warning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilmTransparencyWarning {
    /// Warn when transparency is off.
    #[default]
    Off,
    /// Warn when transparency is on.
    On,
}

/// Sub-options of individual rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleOptions {
    /// Show a `[REC]` badge and red border while auto keying is on.
    pub rec_indicator: bool,
    /// Scale: warn about zero or negative axes.
    pub scale_negative: bool,
    /// Scale: warn about non-uniform scale.
    pub scale_non_uniform: bool,
    /// Scale: warn about uniform scale other than 1.
    pub scale_not_one: bool,
    /// Simplify: only warn about the render subdivision limit.
    pub simplify_render_only: bool,
    /// Modifier visibility: which objects to check.
    pub modifier_scope: ModifierScope,
    /// Samples: also warn about very high sample counts.
    pub high_samples: bool,
    /// Cycles device preference.
    pub preferred_device: PreferredDevice,
    /// Film transparency state to warn about.
    pub film_transparency: FilmTransparencyWarning,
    /// Version: show a full-viewport splash besides the overlay line.
    pub version_splash: bool,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            rec_indicator: true,
            scale_negative: true,
            scale_non_uniform: false,
            scale_not_one: false,
            simplify_render_only: true,
            modifier_scope: ModifierScope::ActiveOnly,
            high_samples: true,
            preferred_device: PreferredDevice::Gpu,
            film_transparency: FilmTransparencyWarning::Off,
            version_splash: true,
        }
    }
}

/// Numeric limits used by rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Sample counts at or below this are "low".
    pub sample_limit_lower: u32,
    /// Sample counts at or above this are "high".
    pub sample_limit_upper: u32,
    /// Simplify render subdivision at or below this is flagged.
    pub simplify_render: u32,
    /// Simplify viewport subdivision at or below this is flagged.
    pub simplify_viewport: u32,
    /// Sound strips louder than this are flagged.
    pub loud_volume: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            sample_limit_lower: 16,
            sample_limit_upper: 4097,
            simplify_render: 3,
            simplify_viewport: 0,
            loud_volume: 1.0,
        }
    }
}

/// Overlay and border settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Presentation {
    /// Color of plain warning text and of the warning border.
    pub warn_color: Rgb,
    /// Color of `[bracketed]` spans.
    pub highlight_color: Rgb,
    /// Overlay font size before UI scaling, `6..=72`.
    pub text_size: u32,
    /// Only draw text; never recolor the editor border.
    pub text_only: bool,
    /// Hide the overlay text while viewport overlays are off.
    pub toggle_with_overlays: bool,
    /// Also draw warnings in the compositor.
    pub compositor_warnings: bool,
    /// Outline viewports that carry area-scoped warnings.
    pub viewport_highlighting: bool,
    /// Border color of the theme before the first warning recolored it.
    pub original_theme_color: Rgb,
    /// The theme snapshot has been taken.
    pub first_setup_done: bool,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            warn_color: Rgb([1.0, 0.618_573, 0.274_545]),
            highlight_color: Rgb::WHITE,
            text_size: 11,
            text_only: false,
            toggle_with_overlays: true,
            compositor_warnings: true,
            viewport_highlighting: true,
            original_theme_color: Rgb::BLACK,
            first_setup_done: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
