// Copyright 2026 the HeadsUp Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor points for overlay elements.
//!
//! Coordinates are region pixels with the origin at the bottom-left, y up.
//! Offsets are authored at a UI scale of 1 and multiplied by
//! [`RegionChrome::ui_scale`].

use kurbo::{Circle, Point};

/// Margin between the region edge and the warning text.
const TEXT_MARGIN: f64 = 10.0;
/// Margin used instead of [`TEXT_MARGIN`] when a toolbar is present.
const TOOLBAR_MARGIN: f64 = 9.0;
/// Height of a region header.
const HEADER_HEIGHT: f64 = 27.0;
/// Lift applied while the last-operator panel is open.
const HUD_LIFT: f64 = 25.0;
/// Radius of the recording dot.
const REC_DOT_RADIUS: f64 = 9.0;

/// Visible chrome of a 3D viewport region that overlay elements avoid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RegionChrome {
    /// Interface scale.
    pub ui_scale: f64,
    /// Region width.
    pub width: f64,
    /// Region height.
    pub height: f64,
    /// Width of the left toolbar, when shown.
    pub toolbar_width: Option<f64>,
    /// The header is shown.
    pub header_visible: bool,
    /// The header sits at the bottom of the area.
    pub header_bottom: bool,
    /// The tool settings header is shown.
    pub tool_header_visible: bool,
    /// Height of the asset shelf, when shown.
    pub asset_shelf_height: Option<f64>,
    /// The last-operator panel is open to the right of the toolbar.
    pub hud_open: bool,
    /// The viewport's own text info overlay is shown.
    pub text_info_visible: bool,
    /// The statistics overlay is shown.
    pub stats_visible: bool,
    /// The view is orthographic.
    pub orthographic: bool,
    /// The viewport shows a path-traced render preview.
    pub render_preview: bool,
}

impl Default for RegionChrome {
    fn default() -> Self {
        Self {
            ui_scale: 1.0,
            width: 0.0,
            height: 0.0,
            toolbar_width: None,
            header_visible: true,
            header_bottom: false,
            tool_header_visible: true,
            asset_shelf_height: None,
            hud_open: false,
            text_info_visible: false,
            stats_visible: false,
            orthographic: false,
            render_preview: false,
        }
    }
}

impl RegionChrome {
    /// Baseline origin of the warning text, bottom-left aligned.
    #[must_use]
    pub fn text_origin(&self) -> Point {
        let s = self.ui_scale;
        let x = match self.toolbar_width {
            Some(toolbar) => TOOLBAR_MARGIN * s + toolbar,
            None => TEXT_MARGIN * s,
        };
        let mut y = TEXT_MARGIN * s;
        if self.header_bottom && self.header_visible {
            y += HEADER_HEIGHT * s;
        }
        if let Some(shelf) = self.asset_shelf_height
            && shelf > 1.0
        {
            y += shelf + HEADER_HEIGHT * s;
        }
        if self.hud_open && self.toolbar_width.is_some() {
            y += HUD_LIFT * s;
        }
        Point::new(x, y)
    }

    /// The recording dot, top-left below the viewport's own text overlays.
    #[must_use]
    pub fn rec_dot(&self) -> Circle {
        let s = self.ui_scale;
        let radius = REC_DOT_RADIUS * s;
        let x = TEXT_MARGIN * s + radius + self.toolbar_width.unwrap_or(0.0);
        let mut y = self.height - 40.0 * s - radius - 25.0 * s;
        if !self.header_visible || !self.tool_header_visible {
            y += 25.0 * s;
        }
        if self.text_info_visible {
            y -= 35.0 * s;
        }
        if self.stats_visible {
            y -= 100.0 * s;
        }
        if self.orthographic {
            y -= 16.0 * s;
        }
        if self.render_preview {
            y -= 16.0 * s;
        }
        if self.header_bottom {
            y += HEADER_HEIGHT * s;
        }
        Circle::new((x, y), radius)
    }

    /// Baseline origin of the recording label, right of the dot.
    #[must_use]
    pub fn rec_label_origin(&self) -> Point {
        let dot = self.rec_dot();
        Point::new(
            dot.center.x + dot.radius + 4.0 * self.ui_scale,
            dot.center.y - 3.0 * self.ui_scale,
        )
    }

    /// Center of the region, where the version splash is anchored.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> RegionChrome {
        RegionChrome {
            width: 1000.0,
            height: 800.0,
            ..RegionChrome::default()
        }
    }

    #[test]
    fn bare_region_uses_plain_margins() {
        assert_eq!(viewport().text_origin(), Point::new(10.0, 10.0));
    }

    #[test]
    fn toolbar_and_bottom_header_shift_the_text() {
        let chrome = RegionChrome {
            ui_scale: 2.0,
            toolbar_width: Some(40.0),
            header_bottom: true,
            ..viewport()
        };
        assert_eq!(chrome.text_origin(), Point::new(58.0, 74.0));
    }

    #[test]
    fn asset_shelf_and_hud_lift_the_text() {
        let chrome = RegionChrome {
            toolbar_width: Some(30.0),
            asset_shelf_height: Some(100.0),
            hud_open: true,
            ..viewport()
        };
        assert_eq!(chrome.text_origin(), Point::new(39.0, 10.0 + 127.0 + 25.0));

        let collapsed = RegionChrome {
            asset_shelf_height: Some(1.0),
            ..viewport()
        };
        assert_eq!(collapsed.text_origin().y, 10.0);
    }

    #[test]
    fn rec_dot_sits_below_viewport_text() {
        let plain = viewport().rec_dot();
        assert_eq!(plain.radius, 9.0);
        assert_eq!(plain.center, Point::new(19.0, 800.0 - 40.0 - 9.0 - 25.0));

        let busy = RegionChrome {
            text_info_visible: true,
            stats_visible: true,
            ..viewport()
        }
        .rec_dot();
        assert_eq!(busy.center.y, plain.center.y - 135.0);

        let label = viewport().rec_label_origin();
        assert_eq!(label, Point::new(19.0 + 9.0 + 4.0, plain.center.y - 3.0));
    }
}
