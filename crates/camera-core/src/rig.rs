//! The frame loop.
//!
//! A [`CameraRig`] owns the focus scene, the cameras with their behaviours,
//! triggers, pending transitions and parallax layers. [`CameraRig::step`]
//! runs one frame:
//!
//! 1. Gameplay phase: focuses update, delayed triggers fire, transitions
//!    advance.
//! 2. Late phase: every enabled camera runs its behaviours in order.
//! 3. Parallax layers follow the cameras' final positions.
//!
//! Action rects are therefore always computed from this frame's focus
//! positions.

use eyeframe_common::clock::FrameClock;
use eyeframe_common::config::CameraDefaults;
use eyeframe_common::error::{EyeframeError, EyeframeResult};
use eyeframe_scene_model::geometry::{Point2D, Rect};
use eyeframe_scene_model::limits::CameraLimits;
use eyeframe_scene_model::scene::SceneFile;
use serde::Serialize;

use crate::behaviour::{self, CameraBehaviour};
use crate::controller::CameraController;
use crate::focus::FocusScene;
use crate::frame::Frame;
use crate::input::InputSource;
use crate::parallax::Parallax;
use crate::trigger::{FocusListSwap, FocusTrigger, LimitsTransition, TriggerAction, ZoomTransition};

/// Handle to a camera in a [`CameraRig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CameraId(pub usize);

/// Handle to a trigger in a [`CameraRig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TriggerId(pub usize);

/// Handle to a parallax layer in a [`CameraRig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerId(pub usize);

/// A camera with its behaviours.
#[derive(Debug)]
pub struct RigCamera {
    pub name: String,
    pub controller: CameraController,
    behaviours: Vec<Box<dyn CameraBehaviour>>,
}

impl RigCamera {
    pub fn new(name: impl Into<String>, controller: CameraController) -> Self {
        Self {
            name: name.into(),
            controller,
            behaviours: Vec::new(),
        }
    }

    pub fn push_behaviour(&mut self, behaviour: Box<dyn CameraBehaviour>) {
        self.behaviours.push(behaviour);
    }

    pub fn behaviour_names(&self) -> Vec<&'static str> {
        self.behaviours.iter().map(|b| b.name()).collect()
    }

    fn late_update(&mut self, scene: &FocusScene, frame: &Frame<'_>) {
        for behaviour in &mut self.behaviours {
            behaviour.late_update(&mut self.controller, scene, frame);
        }
    }

    /// Start a shake on the first shake behaviour. Returns whether a shake
    /// started.
    pub fn shake(&mut self, force: f64) -> bool {
        self.behaviours
            .iter_mut()
            .find_map(|b| b.as_shake_mut())
            .is_some_and(|shake| shake.shake(force))
    }

    /// Start a directional shake on the first shake behaviour.
    pub fn shake_directional(&mut self, force: Point2D) -> bool {
        let controller = &mut self.controller;
        self.behaviours
            .iter_mut()
            .find_map(|b| b.as_shake_mut())
            .is_some_and(|shake| shake.shake_directional(controller, force))
    }
}

/// Camera state after a frame, as reported to hosts and tools.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraState {
    pub name: String,
    pub position: Point2D,
    pub zoom: f64,
    pub enabled: bool,
    pub action_rect: Rect,
    pub view_rect: Rect,
}

#[derive(Debug, Default)]
pub struct CameraRig {
    scene: FocusScene,
    cameras: Vec<RigCamera>,
    triggers: Vec<FocusTrigger>,
    zoom_transitions: Vec<ZoomTransition>,
    limits_transitions: Vec<LimitsTransition>,
    layers: Vec<(CameraId, Parallax)>,
}

impl CameraRig {
    pub fn new(scene: FocusScene) -> Self {
        Self {
            scene,
            ..Self::default()
        }
    }

    /// Build a rig from a scene description.
    ///
    /// Camera fields missing from the scene fall back to `defaults`.
    /// Behaviours without their own seed are seeded from `seed`.
    pub fn from_scene(file: &SceneFile, defaults: &CameraDefaults, seed: u64) -> EyeframeResult<Self> {
        let mut rig = Self::new(FocusScene::from_specs(&file.focuses)?);

        for spec in &file.cameras {
            if rig.camera_id(&spec.name).is_some() {
                return Err(EyeframeError::scene(format!(
                    "duplicate camera name '{}'",
                    spec.name
                )));
            }

            let mut controller = CameraController::from_defaults(defaults);
            if let Some(aspect) = spec.aspect {
                controller.set_aspect(aspect);
            }
            if let Some(limits) = spec.limits {
                controller.set_limits(limits);
            }
            if let Some(zoom) = spec.zoom {
                controller.set_zoom(zoom);
            }
            if let Some(padding) = spec.padding {
                controller.set_padding(padding);
            }
            controller.set_position(spec.position);

            for name in &spec.focuses {
                let id = rig
                    .scene
                    .id_of(name)
                    .ok_or_else(|| EyeframeError::unknown_focus(name.clone()))?;
                controller.add_focus(id);
            }

            let mut camera = RigCamera::new(spec.name.clone(), controller);
            for (index, behaviour) in spec.behaviours.iter().enumerate() {
                let behaviour_seed = seed.wrapping_add(rig.cameras.len() as u64 * 1000 + index as u64);
                camera.push_behaviour(behaviour::from_spec(behaviour, behaviour_seed));
            }
            tracing::debug!(
                camera = %camera.name,
                focuses = camera.controller.focuses().len(),
                behaviours = ?camera.behaviour_names(),
                "Camera added"
            );
            rig.cameras.push(camera);
        }

        tracing::info!(
            cameras = rig.cameras.len(),
            focuses = rig.scene.len(),
            "Camera rig built"
        );
        Ok(rig)
    }

    pub fn scene(&self) -> &FocusScene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut FocusScene {
        &mut self.scene
    }

    pub fn add_camera(&mut self, camera: RigCamera) -> CameraId {
        self.cameras.push(camera);
        CameraId(self.cameras.len() - 1)
    }

    pub fn camera(&self, id: CameraId) -> Option<&RigCamera> {
        self.cameras.get(id.0)
    }

    pub fn camera_mut(&mut self, id: CameraId) -> Option<&mut RigCamera> {
        self.cameras.get_mut(id.0)
    }

    pub fn camera_id(&self, name: &str) -> Option<CameraId> {
        self.cameras
            .iter()
            .position(|c| c.name == name)
            .map(CameraId)
    }

    pub fn cameras(&self) -> impl Iterator<Item = (CameraId, &RigCamera)> {
        self.cameras.iter().enumerate().map(|(i, c)| (CameraId(i), c))
    }

    /// Disabled cameras skip their behaviours and keep their last action
    /// rect.
    pub fn set_camera_enabled(&mut self, id: CameraId, enabled: bool) -> EyeframeResult<()> {
        self.require_camera(id)?.controller.set_enabled(enabled);
        Ok(())
    }

    // Triggers and transitions

    pub fn add_trigger(&mut self, trigger: FocusTrigger) -> TriggerId {
        self.triggers.push(trigger);
        TriggerId(self.triggers.len() - 1)
    }

    pub fn trigger(&self, id: TriggerId) -> Option<&FocusTrigger> {
        self.triggers.get(id.0)
    }

    /// A tracked object entered a trigger.
    pub fn trigger_enter(&mut self, id: TriggerId) -> EyeframeResult<()> {
        let trigger = self
            .triggers
            .get_mut(id.0)
            .ok_or_else(|| EyeframeError::scene(format!("unknown trigger {}", id.0)))?;
        if let Some(action) = trigger.enter() {
            apply_action(&mut self.cameras, trigger.cameras(), action);
        }
        Ok(())
    }

    /// A tracked object left a trigger.
    pub fn trigger_exit(&mut self, id: TriggerId) -> EyeframeResult<()> {
        let trigger = self
            .triggers
            .get_mut(id.0)
            .ok_or_else(|| EyeframeError::scene(format!("unknown trigger {}", id.0)))?;
        if let Some(action) = trigger.exit() {
            apply_action(&mut self.cameras, trigger.cameras(), action);
        }
        Ok(())
    }

    /// Move a camera's zoom to `target` over `secs` seconds of scaled time.
    /// Replaces any zoom transition already running on that camera.
    pub fn zoom_to(&mut self, id: CameraId, target: f64, secs: f64) -> EyeframeResult<()> {
        let controller = &mut self.require_camera(id)?.controller;
        let from = controller.zoom();
        if secs <= 0.0 {
            controller.set_zoom(target);
        }
        self.zoom_transitions.retain(|t| t.camera != id);
        if secs > 0.0 {
            self.zoom_transitions
                .push(ZoomTransition::new(id, from, target, secs));
        }
        Ok(())
    }

    /// Move a camera's limits to `target` over `secs` seconds of scaled
    /// time.
    pub fn transition_limits(
        &mut self,
        id: CameraId,
        target: CameraLimits,
        secs: f64,
    ) -> EyeframeResult<()> {
        let controller = &mut self.require_camera(id)?.controller;
        let from = *controller.limits();
        if secs <= 0.0 {
            controller.set_limits(target);
        }
        self.limits_transitions.retain(|t| t.camera != id);
        if secs > 0.0 {
            self.limits_transitions
                .push(LimitsTransition::new(id, from, target, secs));
        }
        Ok(())
    }

    /// Replace a camera's tracked focuses.
    pub fn swap_focus_list(&mut self, swap: &FocusListSwap) -> EyeframeResult<()> {
        swap.apply(&mut self.require_camera(swap.camera)?.controller);
        Ok(())
    }

    // Shake and parallax

    pub fn shake(&mut self, id: CameraId, force: f64) -> EyeframeResult<bool> {
        Ok(self.require_camera(id)?.shake(force))
    }

    pub fn shake_directional(&mut self, id: CameraId, force: Point2D) -> EyeframeResult<bool> {
        Ok(self.require_camera(id)?.shake_directional(force))
    }

    /// Attach a parallax layer to a camera.
    pub fn add_parallax(&mut self, id: CameraId, layer: Parallax) -> EyeframeResult<LayerId> {
        self.require_camera(id)?;
        self.layers.push((id, layer));
        Ok(LayerId(self.layers.len() - 1))
    }

    pub fn parallax(&self, id: LayerId) -> Option<&Parallax> {
        self.layers.get(id.0).map(|(_, layer)| layer)
    }

    // Frame loop

    /// Run one frame at the clock's current time.
    pub fn step(&mut self, clock: &dyn FrameClock, input: &dyn InputSource) {
        let frame = Frame::new(clock.now(), input);
        let dt = frame.delta_secs();

        // Gameplay phase
        self.scene.update(&frame);
        for trigger in &mut self.triggers {
            if let Some(action) = trigger.update(dt) {
                apply_action(&mut self.cameras, trigger.cameras(), action);
            }
        }
        let cameras = &mut self.cameras;
        self.zoom_transitions.retain_mut(|t| match cameras.get_mut(t.camera.0) {
            Some(camera) => !t.step(&mut camera.controller, dt),
            None => false,
        });
        self.limits_transitions.retain_mut(|t| match cameras.get_mut(t.camera.0) {
            Some(camera) => !t.step(&mut camera.controller, dt),
            None => false,
        });

        // Late phase
        for camera in self.cameras.iter_mut().filter(|c| c.controller.enabled()) {
            camera.late_update(&self.scene, &frame);
        }

        for (id, layer) in &mut self.layers {
            if let Some(camera) = self.cameras.get(id.0) {
                layer.update(camera.controller.position(), dt);
            }
        }

        tracing::trace!(tick = frame.tick().0, "Rig stepped");
    }

    /// Current state of every camera.
    pub fn states(&self) -> Vec<CameraState> {
        self.cameras
            .iter()
            .map(|c| CameraState {
                name: c.name.clone(),
                position: c.controller.position(),
                zoom: c.controller.zoom(),
                enabled: c.controller.enabled(),
                action_rect: c.controller.last_action_rect(),
                view_rect: c.controller.view_rect(),
            })
            .collect()
    }

    fn require_camera(&mut self, id: CameraId) -> EyeframeResult<&mut RigCamera> {
        self.cameras
            .get_mut(id.0)
            .ok_or_else(|| EyeframeError::camera(format!("unknown camera {}", id.0)))
    }
}

fn apply_action(cameras: &mut [RigCamera], targets: &[CameraId], action: TriggerAction) {
    for id in targets {
        match cameras.get_mut(id.0) {
            Some(camera) => action.apply(&mut camera.controller),
            None => tracing::warn!(camera = id.0, ?action, "Trigger targets unknown camera"),
        }
    }
}

#[cfg(test)]
mod tests {
    use eyeframe_common::clock::ManualClock;
    use eyeframe_scene_model::scene::ShakeConfig;

    use super::*;
    use crate::behaviour::{FixedFollow, Shake};
    use crate::focus::{Focus, FocusKind};
    use crate::input::StaticInput;

    fn runner_rig() -> (CameraRig, CameraId) {
        let mut scene = FocusScene::new();
        let runner = scene.insert(
            Focus::new(
                "runner",
                FocusKind::Transform {
                    offset: Point2D::ZERO,
                },
            )
            .with_velocity(Point2D::new(60.0, 0.0)),
        );
        let mut rig = CameraRig::new(scene);
        let mut controller = CameraController::new().with_aspect(1.0).with_padding(0.0);
        controller.add_focus(runner);
        let mut camera = RigCamera::new("main", controller);
        camera.push_behaviour(Box::new(FixedFollow));
        let id = rig.add_camera(camera);
        (rig, id)
    }

    #[test]
    fn test_focus_updates_before_camera() {
        let (mut rig, id) = runner_rig();
        let mut clock = ManualClock::new(60.0);
        let input = StaticInput::new();

        clock.advance();
        rig.step(&clock, &input);
        // The camera sees the runner's position from this frame, not the last.
        let camera = rig.camera(id).unwrap();
        assert!((camera.controller.position().x - 1.0).abs() < 1e-9);

        clock.advance();
        rig.step(&clock, &input);
        let state = &rig.states()[0];
        assert!((state.position.x - 2.0).abs() < 1e-9);
        assert_eq!(state.name, "main");
    }

    #[test]
    fn test_disabled_camera_holds_still() {
        let (mut rig, id) = runner_rig();
        let mut clock = ManualClock::new(60.0);
        let input = StaticInput::new();
        rig.set_camera_enabled(id, false).unwrap();
        clock.advance();
        rig.step(&clock, &input);
        assert_eq!(rig.camera(id).unwrap().controller.position(), Point2D::ZERO);
        assert!(rig.set_camera_enabled(CameraId(9), true).is_err());
    }

    #[test]
    fn test_trigger_adds_focus_to_camera() {
        let (mut rig, id) = runner_rig();
        let beacon = rig.scene_mut().insert(
            Focus::new(
                "beacon",
                FocusKind::Transform {
                    offset: Point2D::ZERO,
                },
            )
            .at(Point2D::new(0.0, 40.0)),
        );
        let trigger = rig.add_trigger(FocusTrigger::new(beacon, vec![id]).with_remove_on_exit(true));

        rig.trigger_enter(trigger).unwrap();
        assert!(rig.camera(id).unwrap().controller.contains_focus(beacon));
        rig.trigger_exit(trigger).unwrap();
        assert!(!rig.camera(id).unwrap().controller.contains_focus(beacon));
        assert!(rig.trigger_enter(TriggerId(5)).is_err());
    }

    #[test]
    fn test_delayed_trigger_fires_during_step() {
        let (mut rig, id) = runner_rig();
        let beacon = rig.scene_mut().insert(Focus::new(
            "beacon",
            FocusKind::Transform {
                offset: Point2D::ZERO,
            },
        ));
        let trigger = rig.add_trigger(FocusTrigger::new(beacon, vec![id]).with_activation_delay(0.5));
        rig.trigger_enter(trigger).unwrap();
        assert!(!rig.camera(id).unwrap().controller.contains_focus(beacon));

        let mut clock = ManualClock::new(2.0);
        let input = StaticInput::new();
        clock.advance();
        rig.step(&clock, &input);
        assert!(rig.camera(id).unwrap().controller.contains_focus(beacon));
    }

    #[test]
    fn test_zoom_transition_runs_in_step() {
        let mut rig = CameraRig::new(FocusScene::new());
        let id = rig.add_camera(RigCamera::new(
            "main",
            CameraController::new().with_aspect(1.0).with_zoom(5.0),
        ));
        rig.zoom_to(id, 15.0, 1.0).unwrap();

        let mut clock = ManualClock::new(2.0);
        let input = StaticInput::new();
        clock.advance();
        rig.step(&clock, &input);
        assert!((rig.camera(id).unwrap().controller.zoom() - 10.0).abs() < 1e-9);
        clock.advance();
        rig.step(&clock, &input);
        assert!((rig.camera(id).unwrap().controller.zoom() - 15.0).abs() < 1e-9);

        rig.zoom_to(id, 7.0, 0.0).unwrap();
        assert_eq!(rig.camera(id).unwrap().controller.zoom(), 7.0);
    }

    #[test]
    fn test_limits_transition_and_focus_swap() {
        let (mut rig, id) = runner_rig();
        let other = rig.scene_mut().insert(Focus::new(
            "other",
            FocusKind::Transform {
                offset: Point2D::ZERO,
            },
        ));
        rig.swap_focus_list(&FocusListSwap::new(id, vec![other])).unwrap();
        assert_eq!(rig.camera(id).unwrap().controller.focuses(), &[other]);

        let target = CameraLimits::from_xywh(-20.0, -20.0, 40.0, 40.0);
        rig.transition_limits(id, target, 0.0).unwrap();
        assert_eq!(rig.camera(id).unwrap().controller.limits(), &target);
    }

    #[test]
    fn test_shake_through_rig() {
        let (mut rig, id) = runner_rig();
        assert!(!rig.shake(id, 500.0).unwrap());

        rig.camera_mut(id)
            .unwrap()
            .push_behaviour(Box::new(Shake::with_seed(ShakeConfig::default(), 9)));
        assert!(rig.shake(id, 500.0).unwrap());
        assert!(!rig.shake(id, 10.0).unwrap());
    }

    #[test]
    fn test_parallax_follows_camera() {
        let (mut rig, id) = runner_rig();
        let layer = rig
            .add_parallax(id, Parallax::new(Point2D::ZERO, Point2D::ZERO, Point2D::new(0.5, 0.5)))
            .unwrap();
        let mut clock = ManualClock::new(10.0);
        let input = StaticInput::new();
        for _ in 0..30 {
            clock.advance();
            rig.step(&clock, &input);
        }
        let camera_x = rig.camera(id).unwrap().controller.position().x;
        let layer_x = rig.parallax(layer).unwrap().position().x;
        assert!(layer_x > 0.0 && layer_x <= camera_x * 0.5 + 1e-9);
    }

    #[test]
    fn test_from_scene_builds_cameras() {
        let file = SceneFile::parse(
            r#"{
                "focuses": [
                    {"name": "a", "type": "transform", "position": {"x": -10.0, "y": 0.0}},
                    {"name": "b", "type": "transform", "position": {"x": 10.0, "y": 0.0}}
                ],
                "cameras": [
                    {"name": "main", "padding": 5.0, "aspect": 1.0, "focuses": ["a", "b"],
                     "behaviours": [{"type": "fixed_follow"}, {"type": "shake"}]}
                ]
            }"#,
        )
        .unwrap();
        let mut rig = CameraRig::from_scene(&file, &CameraDefaults::default(), 1).unwrap();
        let id = rig.camera_id("main").unwrap();
        assert_eq!(
            rig.camera(id).unwrap().behaviour_names(),
            ["fixed_follow", "shake"]
        );

        let mut clock = ManualClock::new(60.0);
        clock.advance();
        rig.step(&clock, &StaticInput::new());
        let state = &rig.states()[0];
        assert_eq!(state.action_rect, Rect::from_min_max(-15.0, -5.0, 15.0, 5.0));
        assert_eq!(state.position, Point2D::ZERO);
    }

    #[test]
    fn test_from_scene_rejects_unknown_focus() {
        let file = SceneFile::parse(
            r#"{"cameras": [{"name": "main", "focuses": ["ghost"]}]}"#,
        )
        .unwrap();
        let err = CameraRig::from_scene(&file, &CameraDefaults::default(), 1).unwrap_err();
        assert!(matches!(err, EyeframeError::UnknownFocus { name } if name == "ghost"));
    }
}
