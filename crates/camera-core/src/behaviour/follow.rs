//! Position-driving behaviours.

use eyeframe_scene_model::geometry::Point2D;
use eyeframe_scene_model::scene::SmoothFollowConfig;

use super::CameraBehaviour;
use crate::controller::CameraController;
use crate::focus::FocusScene;
use crate::frame::Frame;

/// Snaps the camera onto the action rect centre every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedFollow;

impl CameraBehaviour for FixedFollow {
    fn name(&self) -> &'static str {
        "fixed_follow"
    }

    fn late_update(&mut self, camera: &mut CameraController, scene: &FocusScene, frame: &Frame<'_>) {
        let target = camera.action_rect(scene, frame).center();
        camera.set_position(target);
    }
}

/// Eases the camera towards the action rect centre.
///
/// The camera stays put while the centre is within the still threshold
/// (x scaled by the aspect ratio), unless it was still moving faster than
/// the moving threshold last frame. Uses unscaled time so slow motion
/// doesn't slow the camera.
#[derive(Debug, Clone)]
pub struct SmoothFollow {
    config: SmoothFollowConfig,
    /// Absolute camera velocity produced last frame.
    last_motion: Point2D,
}

impl SmoothFollow {
    pub fn new(config: SmoothFollowConfig) -> Self {
        Self {
            config,
            last_motion: Point2D::ZERO,
        }
    }

    pub fn config(&self) -> &SmoothFollowConfig {
        &self.config
    }

    /// Still threshold for a camera with `aspect`.
    pub fn still_threshold(&self, aspect: f64) -> Point2D {
        Point2D::new(
            self.config.still_threshold.x * aspect,
            self.config.still_threshold.y,
        )
    }

    /// Whether the camera moved faster than the moving threshold last frame.
    pub fn is_moving(&self) -> bool {
        self.last_motion.x > self.config.moving_threshold.x
            || self.last_motion.y > self.config.moving_threshold.y
    }
}

impl Default for SmoothFollow {
    fn default() -> Self {
        Self::new(SmoothFollowConfig::default())
    }
}

impl CameraBehaviour for SmoothFollow {
    fn name(&self) -> &'static str {
        "smooth_follow"
    }

    fn late_update(&mut self, camera: &mut CameraController, scene: &FocusScene, frame: &Frame<'_>) {
        let dt = frame.unscaled_delta_secs();
        let offset = camera.action_rect(scene, frame).center() - camera.position();
        let still = self.still_threshold(camera.aspect());

        let outside = offset.x.abs() > still.x || offset.y.abs() > still.y;
        if dt <= 0.0 || !(outside || self.is_moving()) {
            self.last_motion = Point2D::ZERO;
            return;
        }

        let before = camera.position();
        camera.set_position(before + offset.scale(&self.config.speed) * dt);
        self.last_motion = ((camera.position() - before) * (1.0 / dt)).abs();
    }
}

#[cfg(test)]
mod tests {
    use eyeframe_common::clock::{FrameClock, ManualClock};

    use super::*;
    use crate::focus::{Focus, FocusKind};
    use crate::input::StaticInput;

    fn scene_with_focus(x: f64, y: f64) -> (FocusScene, CameraController) {
        let mut scene = FocusScene::new();
        let id = scene.insert(
            Focus::new(
                "target",
                FocusKind::Transform {
                    offset: Point2D::ZERO,
                },
            )
            .at(Point2D::new(x, y)),
        );
        let mut camera = CameraController::new().with_aspect(1.0).with_padding(0.0);
        camera.add_focus(id);
        (scene, camera)
    }

    #[test]
    fn test_fixed_follow_snaps_to_centre() {
        let (scene, mut camera) = scene_with_focus(40.0, -12.0);
        let input = StaticInput::new();
        let mut clock = ManualClock::new(60.0);
        clock.advance();
        FixedFollow.late_update(&mut camera, &scene, &Frame::new(clock.now(), &input));
        assert_eq!(camera.position(), Point2D::new(40.0, -12.0));
    }

    #[test]
    fn test_smooth_follow_holds_inside_still_zone() {
        let (scene, mut camera) = scene_with_focus(2.0, 4.0);
        let input = StaticInput::new();
        let mut clock = ManualClock::new(60.0);
        clock.advance();
        let mut follow = SmoothFollow::default();
        follow.late_update(&mut camera, &scene, &Frame::new(clock.now(), &input));
        assert_eq!(camera.position(), Point2D::ZERO);
        assert!(!follow.is_moving());
    }

    #[test]
    fn test_smooth_follow_moves_proportionally() {
        let (scene, mut camera) = scene_with_focus(100.0, 0.0);
        let input = StaticInput::new();
        let mut clock = ManualClock::new(10.0);
        clock.advance();
        let mut follow = SmoothFollow::default();
        follow.late_update(&mut camera, &scene, &Frame::new(clock.now(), &input));
        // offset 100 * speed 2 * dt 0.1
        assert!((camera.position().x - 20.0).abs() < 1e-9);
        assert!(follow.is_moving());
    }

    #[test]
    fn test_smooth_follow_keeps_moving_inside_still_zone() {
        let (mut scene, mut camera) = scene_with_focus(100.0, 0.0);
        let input = StaticInput::new();
        let mut clock = ManualClock::new(10.0);
        let mut follow = SmoothFollow::default();
        clock.advance();
        follow.late_update(&mut camera, &scene, &Frame::new(clock.now(), &input));

        // Target jumps inside the still zone; momentum carries the camera.
        let id = camera.focuses()[0];
        if let Some(focus) = scene.get_mut(id) {
            focus.position = Point2D::new(22.0, 0.0);
        }
        clock.advance();
        follow.late_update(&mut camera, &scene, &Frame::new(clock.now(), &input));
        assert!((camera.position().x - 20.4).abs() < 1e-9);
    }

    #[test]
    fn test_still_threshold_scales_with_aspect() {
        let follow = SmoothFollow::default();
        assert_eq!(follow.still_threshold(2.0), Point2D::new(6.0, 5.0));
    }
}
