// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rounded region borders.
//!
//! Two borders exist: the highlight border that marks a viewport carrying
//! area warnings while its overlays are hidden, and the translucent red
//! border of the auto-keying badge. Both share the same shape.

use headsup_core::config::Rgb;
use kurbo::{Point, Rect, RoundedRect};

/// Corner radius of every border, in region pixels.
pub const CORNER_RADIUS: f64 = 8.0;

/// Stroke width of every border, in region pixels.
pub const BORDER_THICKNESS: f64 = 8.0;

/// Straight-alpha RGBA color with components in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba(pub [f32; 4]);

impl Rgba {
    /// Opaque version of an [`Rgb`].
    #[must_use]
    pub const fn opaque(rgb: Rgb) -> Self {
        let [r, g, b] = rgb.0;
        Self([r, g, b, 1.0])
    }
}

/// How a border is stroked.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderSpec {
    /// Stroke color.
    pub color: Rgba,
    /// Stroke width in region pixels.
    pub thickness: f64,
}

impl BorderSpec {
    /// The auto-keying border: half-transparent red.
    pub const RECORDING: Self = Self {
        color: Rgba([1.0, 0.0, 0.0, 0.5]),
        thickness: BORDER_THICKNESS,
    };

    /// The area-warning border, in the user's highlight color.
    #[must_use]
    pub const fn highlight(color: Rgb) -> Self {
        Self {
            color: Rgba::opaque(color),
            thickness: BORDER_THICKNESS,
        }
    }
}

/// Border shape covering a `width` × `height` region.
///
/// The rectangle starts at the region origin. Regions smaller than twice the
/// corner radius get proportionally smaller corners.
#[must_use]
pub fn border_shape(width: f64, height: f64) -> RoundedRect {
    RoundedRect::from_rect(Rect::new(0.0, 0.0, width, height), CORNER_RADIUS)
}

/// Chamfered outline of the border as a closed loop of eight points.
///
/// Hosts that can only draw line loops stroke this instead of
/// [`border_shape`]. Points run counterclockwise from the bottom-left corner
/// with the origin at the bottom-left.
#[must_use]
pub fn border_outline(width: f64, height: f64) -> [Point; 8] {
    let r = CORNER_RADIUS;
    [
        Point::new(0.0, r),
        Point::new(r, 0.0),
        Point::new(width - r, 0.0),
        Point::new(width, r),
        Point::new(width, height - r),
        Point::new(width - r, height),
        Point::new(r, height),
        Point::new(0.0, height - r),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
