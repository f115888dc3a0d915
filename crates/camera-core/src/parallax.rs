//! Parallax layers that trail camera movement.

use eyeframe_scene_model::geometry::Point2D;

/// Fraction of the remaining distance covered per second, before clamping
/// to one per frame.
pub const PARALLAX_LERP_SPEED: f64 = 20.0;

/// A layer displaced by a fraction of the camera's displacement.
///
/// Influence `(0, 0)` pins the layer in the world; `(1, 1)` moves it with
/// the camera (infinitely far background).
#[derive(Debug, Clone, PartialEq)]
pub struct Parallax {
    influence: Point2D,
    origin: Point2D,
    camera_origin: Point2D,
    position: Point2D,
}

impl Parallax {
    /// Layer at `position` while the camera is at `camera_position`.
    pub fn new(position: Point2D, camera_position: Point2D, influence: Point2D) -> Self {
        Self {
            influence,
            origin: position,
            camera_origin: camera_position,
            position,
        }
    }

    pub fn position(&self) -> Point2D {
        self.position
    }

    pub fn influence(&self) -> Point2D {
        self.influence
    }

    pub fn set_influence(&mut self, influence: Point2D) {
        self.influence = influence;
    }

    /// Where the layer settles for a camera at `camera_position`.
    pub fn target(&self, camera_position: Point2D) -> Point2D {
        self.origin + (camera_position - self.camera_origin).scale(&self.influence)
    }

    /// Ease towards the target for this frame.
    pub fn update(&mut self, camera_position: Point2D, delta_secs: f64) -> Point2D {
        let t = (PARALLAX_LERP_SPEED * delta_secs).min(1.0);
        self.position = Point2D::lerp(&self.position, &self.target(camera_position), t);
        self.position
    }

    /// Snap to the target, e.g. after a camera cut.
    pub fn snap(&mut self, camera_position: Point2D) {
        self.position = self.target(camera_position);
    }
}
