//! Impact-driven camera shake.
//!
//! A shake is started by an impact force. Forces below `min_force` are
//! ignored; the rest scale both magnitude (`base_amount`) and duration
//! (`base_time`). Each frame the offset gains random jitter proportional to
//! zoom, then decays with the remaining time. When the timer runs out the
//! accumulated offset is subtracted from the camera position.

use eyeframe_scene_model::geometry::Point2D;
use eyeframe_scene_model::scene::ShakeConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::CameraBehaviour;
use crate::controller::CameraController;
use crate::focus::FocusScene;
use crate::frame::Frame;

#[derive(Debug, Clone)]
pub struct Shake {
    config: ShakeConfig,
    rng: StdRng,
    timer: f64,
    original_timer: f64,
    magnitude: f64,
    offset: Point2D,
}

impl Shake {
    /// Shake seeded from the config, or randomly when it has no seed.
    pub fn new(config: ShakeConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: ShakeConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            timer: 0.0,
            original_timer: 0.0,
            magnitude: 0.0,
            offset: Point2D::ZERO,
        }
    }

    pub fn is_shaking(&self) -> bool {
        self.timer > 0.0
    }

    /// Displacement currently applied to the camera.
    pub fn offset(&self) -> Point2D {
        self.offset
    }

    /// Start a shake from an impact of `force`. Returns whether it started.
    ///
    /// A shake weaker than the current offset doesn't interrupt it.
    pub fn shake(&mut self, force: f64) -> bool {
        let base = force - self.config.min_force;
        let magnitude = base * self.config.base_amount;
        if magnitude < 0.0 || magnitude < self.offset.length() {
            return false;
        }
        self.magnitude = magnitude;
        self.timer = self.config.base_time * base;
        self.original_timer = self.timer;
        tracing::debug!(force, magnitude, secs = self.timer, "Camera shake started");
        true
    }

    /// Start a shake from a directional impact. The camera is also knocked
    /// away from the impact direction immediately.
    pub fn shake_directional(&mut self, camera: &mut CameraController, force: Point2D) -> bool {
        if !self.shake(force.length()) {
            return false;
        }
        if let Some(direction) = force.normalized() {
            let knock = -direction * (self.magnitude * camera.zoom());
            camera.set_position(camera.position() + knock);
            self.offset += knock;
        }
        true
    }

    /// Stop shaking and remove the accumulated offset from the camera.
    pub fn end_shake(&mut self, camera: &mut CameraController) {
        self.timer = 0.0;
        camera.set_position(camera.position() - self.offset);
        self.offset = Point2D::ZERO;
    }

    fn inside_unit_circle(&mut self) -> Point2D {
        loop {
            let p = Point2D::new(
                self.rng.gen_range(-1.0..=1.0),
                self.rng.gen_range(-1.0..=1.0),
            );
            if p.dot(&p) <= 1.0 {
                return p;
            }
        }
    }
}

impl Default for Shake {
    fn default() -> Self {
        Self::new(ShakeConfig::default())
    }
}

impl CameraBehaviour for Shake {
    fn name(&self) -> &'static str {
        "shake"
    }

    fn late_update(&mut self, camera: &mut CameraController, _scene: &FocusScene, frame: &Frame<'_>) {
        if self.is_shaking() {
            let original = camera.position() - self.offset;
            let jitter = self.inside_unit_circle() * (self.magnitude * camera.zoom());
            self.offset += jitter;
            self.offset = self.offset * (self.timer / self.original_timer);
            self.timer -= frame.unscaled_delta_secs();

            camera.set_position(original + self.offset);
            // Limits may have clamped the shaken position.
            self.offset = camera.position() - original;
        } else if self.offset != Point2D::ZERO {
            self.end_shake(camera);
        }
    }

    fn as_shake_mut(&mut self) -> Option<&mut Shake> {
        Some(self)
    }
}
