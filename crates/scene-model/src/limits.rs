//! The region a camera is allowed to look at.

use serde::{Deserialize, Serialize};

use crate::geometry::{Point2D, Rect};

/// Smallest allowed width/height of camera limits.
pub const MINIMUM_LIMITS_SIZE: f64 = 1.0;

/// Bounds for everything a camera shows. The camera view, the action rect
/// and clamped positions never leave this rect.
///
/// Width and height are at least [`MINIMUM_LIMITS_SIZE`]; undersized input
/// grows from the minimum corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Rect", into = "Rect")]
pub struct CameraLimits {
    rect: Rect,
}

impl CameraLimits {
    pub fn new(rect: Rect) -> Self {
        let width = rect.width().max(MINIMUM_LIMITS_SIZE);
        let height = rect.height().max(MINIMUM_LIMITS_SIZE);
        Self {
            rect: Rect::from_xywh(rect.x_min, rect.y_min, width, height),
        }
    }

    /// Limits from the bottom-left corner and size.
    pub fn from_xywh(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Rect::from_xywh(x, y, width, height))
    }

    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    pub fn size(&self) -> Point2D {
        self.rect.size()
    }

    /// Clamp a point into the limits.
    pub fn clamp_point(&self, p: Point2D) -> Point2D {
        self.rect.clamp_point(p)
    }

    /// Pad `rect` on all sides, then clamp each edge into the limits.
    pub fn pad_and_clamp(&self, rect: &Rect, padding: f64) -> Rect {
        rect.expand(padding).clamp_edges_into(&self.rect)
    }
}

impl Default for CameraLimits {
    fn default() -> Self {
        Self::from_xywh(-500.0, -500.0, 1000.0, 1000.0)
    }
}

impl From<Rect> for CameraLimits {
    fn from(rect: Rect) -> Self {
        CameraLimits::new(rect)
    }
}

impl From<CameraLimits> for Rect {
    fn from(limits: CameraLimits) -> Self {
        limits.rect
    }
}
