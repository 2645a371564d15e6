//! Geometry, style, and viewport types for the page model.

use serde::{Deserialize, Serialize};

/// Viewport state for coordinate calculations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportInfo {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Scroll X offset in document coordinates.
    pub scroll_x: f64,
    /// Scroll Y offset in document coordinates.
    pub scroll_y: f64,
}

impl Default for ViewportInfo {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

/// Bounding rectangle in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Check if a point is inside this rect.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Get the center point of this rect.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if this rect intersects another.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }

    /// Check if any part of this rect is inside the current viewport box.
    pub fn is_visible_in_viewport(&self, viewport: &ViewportInfo) -> bool {
        let vp = Rect {
            x: viewport.scroll_x,
            y: viewport.scroll_y,
            width: viewport.width as f64,
            height: viewport.height as f64,
        };
        self.intersects(&vp)
    }
}

/// Computed style snapshot for one element, as resolved by the host's
/// rendering engine. The serializer treats this as a black-box oracle; an
/// element with no style snapshot resolves as not visible.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub display: String,
    pub visibility: String,
    pub opacity: f64,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: "block".to_string(),
            visibility: "visible".to_string(),
            opacity: 1.0,
        }
    }
}

impl ComputedStyle {
    /// Style for an element hidden via `display: none`.
    pub fn display_none() -> Self {
        Self {
            display: "none".to_string(),
            ..Self::default()
        }
    }

    /// Style for an element hidden via `visibility: hidden`.
    pub fn hidden() -> Self {
        Self {
            visibility: "hidden".to_string(),
            ..Self::default()
        }
    }
}

/// One event dispatched into the page, recorded in arrival order. The host
/// drains the log to replay `input` / `change` / `click` notifications into
/// its engine so page-side reactive logic observes mutations.
#[derive(Debug, Clone, PartialEq)]
pub struct PageEvent {
    pub target: super::NodeId,
    pub kind: String,
}
