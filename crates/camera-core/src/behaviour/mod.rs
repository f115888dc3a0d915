//! Camera behaviours run in the late phase of every frame.
//!
//! A behaviour reads the camera's action rect and writes position or zoom
//! through the [`CameraController`], which clamps every write. Behaviours
//! of one camera run in declaration order.

pub mod follow;
pub mod shake;
pub mod zoom;

use std::fmt::Debug;

use eyeframe_scene_model::scene::BehaviourSpec;

use crate::controller::CameraController;
use crate::focus::FocusScene;
use crate::frame::Frame;

pub use follow::{FixedFollow, SmoothFollow};
pub use shake::Shake;
pub use zoom::{ScrollZoom, SmoothScrollZoom, ZoomToFit};

/// A per-frame camera driver.
pub trait CameraBehaviour: Debug {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Late phase: runs after every focus has updated this frame.
    fn late_update(&mut self, camera: &mut CameraController, scene: &FocusScene, frame: &Frame<'_>);

    /// Downcast for hosts that trigger shakes.
    fn as_shake_mut(&mut self) -> Option<&mut Shake> {
        None
    }
}

/// Build a behaviour from its scene description. `seed` is used by
/// behaviours with randomness when their config carries no seed.
pub fn from_spec(spec: &BehaviourSpec, seed: u64) -> Box<dyn CameraBehaviour> {
    match spec {
        BehaviourSpec::FixedFollow => Box::new(FixedFollow),
        BehaviourSpec::SmoothFollow(config) => Box::new(SmoothFollow::new(config.clone())),
        BehaviourSpec::ZoomToFit(config) => Box::new(ZoomToFit::new(config.clone())),
        BehaviourSpec::ScrollZoom(config) => Box::new(ScrollZoom::new(config.clone())),
        BehaviourSpec::SmoothScrollZoom(config) => {
            Box::new(SmoothScrollZoom::new(config.clone()))
        }
        BehaviourSpec::Shake(config) => {
            Box::new(Shake::with_seed(config.clone(), config.seed.unwrap_or(seed)))
        }
    }
}
