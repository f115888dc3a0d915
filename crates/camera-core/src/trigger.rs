//! Trigger-driven changes to cameras.
//!
//! Collision detection belongs to the host: it calls
//! [`FocusTrigger::enter`] / [`FocusTrigger::exit`] when a tracked object
//! crosses the trigger volume and applies the returned [`TriggerAction`].
//! Transitions interpolate a camera property over scaled time.

use eyeframe_scene_model::geometry::Rect;
use eyeframe_scene_model::limits::CameraLimits;

use crate::controller::CameraController;
use crate::focus::FocusId;
use crate::rig::CameraId;

/// Focus-set change requested by a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerAction {
    AddFocus(FocusId),
    RemoveFocus(FocusId),
}

impl TriggerAction {
    /// Apply to one camera.
    pub fn apply(&self, camera: &mut CameraController) {
        match *self {
            TriggerAction::AddFocus(id) => {
                camera.add_focus(id);
            }
            TriggerAction::RemoveFocus(id) => {
                camera.remove_focus(id);
            }
        }
    }
}

/// Adds a focus to cameras once enough objects are inside the trigger.
///
/// With an activation delay, both adding and removing wait for the delay;
/// a change that reverts during the delay cancels it.
#[derive(Debug, Clone)]
pub struct FocusTrigger {
    focus: FocusId,
    cameras: Vec<CameraId>,
    minimum_inside: u32,
    remove_on_exit: bool,
    activation_delay: f64,
    inside: u32,
    triggered: bool,
    timer: Option<f64>,
}

impl FocusTrigger {
    pub fn new(focus: FocusId, cameras: Vec<CameraId>) -> Self {
        Self {
            focus,
            cameras,
            minimum_inside: 1,
            remove_on_exit: false,
            activation_delay: 0.0,
            inside: 0,
            triggered: false,
            timer: None,
        }
    }

    /// Objects required inside before the focus is added (at least 1).
    pub fn with_minimum_inside(mut self, minimum: u32) -> Self {
        self.minimum_inside = minimum.max(1);
        self
    }

    pub fn with_remove_on_exit(mut self, remove: bool) -> Self {
        self.remove_on_exit = remove;
        self
    }

    /// Seconds between activation and the focus change.
    pub fn with_activation_delay(mut self, secs: f64) -> Self {
        self.activation_delay = secs.max(0.0);
        self
    }

    pub fn focus(&self) -> FocusId {
        self.focus
    }

    pub fn cameras(&self) -> &[CameraId] {
        &self.cameras
    }

    pub fn inside(&self) -> u32 {
        self.inside
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// A tracked object entered.
    pub fn enter(&mut self) -> Option<TriggerAction> {
        if self.cameras.is_empty() {
            return None;
        }
        self.inside += 1;
        if self.inside == self.minimum_inside {
            self.activate()
        } else {
            None
        }
    }

    /// A tracked object left.
    pub fn exit(&mut self) -> Option<TriggerAction> {
        self.inside = self.inside.saturating_sub(1);
        if self.remove_on_exit && self.inside < self.minimum_inside {
            self.undo()
        } else {
            None
        }
    }

    /// Advance a pending delayed change by `delta_secs` of scaled time.
    pub fn update(&mut self, delta_secs: f64) -> Option<TriggerAction> {
        let remaining = self.timer? - delta_secs;
        if remaining > 0.0 {
            self.timer = Some(remaining);
            return None;
        }
        self.timer = None;
        if self.inside < self.minimum_inside {
            Some(TriggerAction::RemoveFocus(self.focus))
        } else {
            Some(TriggerAction::AddFocus(self.focus))
        }
    }

    fn activate(&mut self) -> Option<TriggerAction> {
        if self.triggered {
            return None;
        }
        self.triggered = true;
        self.schedule(TriggerAction::AddFocus(self.focus))
    }

    fn undo(&mut self) -> Option<TriggerAction> {
        if !self.triggered {
            return None;
        }
        self.triggered = false;
        self.schedule(TriggerAction::RemoveFocus(self.focus))
    }

    fn schedule(&mut self, action: TriggerAction) -> Option<TriggerAction> {
        if self.activation_delay == 0.0 {
            return Some(action);
        }
        if self.timer.take().is_none() {
            self.timer = Some(self.activation_delay);
        }
        None
    }
}

/// Progress of a timed transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    elapsed: f64,
    duration: f64,
}

impl Transition {
    pub fn new(duration: f64) -> Self {
        Self {
            elapsed: 0.0,
            duration: duration.max(0.0),
        }
    }

    /// Advance and return progress in `[0, 1]`.
    pub fn advance(&mut self, delta_secs: f64) -> f64 {
        self.elapsed += delta_secs.max(0.0);
        self.progress()
    }

    pub fn progress(&self) -> f64 {
        if self.duration == 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn is_done(&self) -> bool {
        self.progress() >= 1.0
    }
}

/// Moves a camera's zoom to a target over time.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoomTransition {
    pub camera: CameraId,
    from: f64,
    to: f64,
    transition: Transition,
}

impl ZoomTransition {
    pub fn new(camera: CameraId, from: f64, to: f64, duration: f64) -> Self {
        Self {
            camera,
            from,
            to,
            transition: Transition::new(duration),
        }
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    /// Advance and write the interpolated zoom. Returns `true` when done.
    pub fn step(&mut self, camera: &mut CameraController, delta_secs: f64) -> bool {
        let t = self.transition.advance(delta_secs);
        camera.set_zoom(self.from + (self.to - self.from) * t);
        self.transition.is_done()
    }
}

/// Moves a camera's limits to a target over time.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitsTransition {
    pub camera: CameraId,
    from: Rect,
    to: Rect,
    transition: Transition,
}

impl LimitsTransition {
    pub fn new(camera: CameraId, from: CameraLimits, to: CameraLimits, duration: f64) -> Self {
        Self {
            camera,
            from: *from.rect(),
            to: *to.rect(),
            transition: Transition::new(duration),
        }
    }

    /// Advance and write the interpolated limits. Returns `true` when done.
    pub fn step(&mut self, camera: &mut CameraController, delta_secs: f64) -> bool {
        let t = self.transition.advance(delta_secs);
        camera.set_limits(CameraLimits::new(Rect::lerp(&self.from, &self.to, t)));
        self.transition.is_done()
    }
}

/// Replaces a camera's tracked focuses.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusListSwap {
    pub camera: CameraId,
    pub focuses: Vec<FocusId>,
}

impl FocusListSwap {
    pub fn new(camera: CameraId, focuses: Vec<FocusId>) -> Self {
        Self { camera, focuses }
    }

    pub fn apply(&self, camera: &mut CameraController) {
        camera.set_focuses(self.focuses.iter().copied());
    }
}

#[cfg(test)]
mod tests {
    use eyeframe_scene_model::geometry::Point2D;

    use super::*;

    const FOCUS: FocusId = FocusId(3);

    fn trigger() -> FocusTrigger {
        FocusTrigger::new(FOCUS, vec![CameraId(0)])
    }

    #[test]
    fn test_minimum_inside() {
        let mut t = trigger().with_minimum_inside(2).with_remove_on_exit(true);
        assert_eq!(t.enter(), None);
        assert_eq!(t.enter(), Some(TriggerAction::AddFocus(FOCUS)));
        assert_eq!(t.enter(), None);
        assert_eq!(t.exit(), None);
        assert_eq!(t.exit(), Some(TriggerAction::RemoveFocus(FOCUS)));
        assert!(!t.is_triggered());
    }

    #[test]
    fn test_exit_without_remove_keeps_focus() {
        let mut t = trigger();
        assert_eq!(t.enter(), Some(TriggerAction::AddFocus(FOCUS)));
        assert_eq!(t.exit(), None);
        assert!(t.is_triggered());
        // Already triggered, re-entering adds nothing.
        assert_eq!(t.enter(), None);
    }

    #[test]
    fn test_no_cameras_never_fires() {
        let mut t = FocusTrigger::new(FOCUS, Vec::new());
        assert_eq!(t.enter(), None);
        assert_eq!(t.inside(), 0);
    }

    #[test]
    fn test_delayed_activation() {
        let mut t = trigger().with_activation_delay(1.0).with_remove_on_exit(true);
        assert_eq!(t.enter(), None);
        assert_eq!(t.update(0.5), None);
        assert_eq!(t.update(0.6), Some(TriggerAction::AddFocus(FOCUS)));
        assert_eq!(t.update(5.0), None);
    }

    #[test]
    fn test_delayed_change_cancelled_by_revert() {
        let mut t = trigger().with_activation_delay(1.0).with_remove_on_exit(true);
        t.enter();
        t.update(0.5);
        // Leaving during the delay cancels the pending add.
        assert_eq!(t.exit(), None);
        assert_eq!(t.update(2.0), None);
    }

    #[test]
    fn test_zoom_transition() {
        let mut camera = CameraController::new().with_zoom(5.0);
        let mut zoom = ZoomTransition::new(CameraId(0), 5.0, 15.0, 2.0);
        assert!(!zoom.step(&mut camera, 1.0));
        assert!((camera.zoom() - 10.0).abs() < 1e-9);
        assert!(zoom.step(&mut camera, 1.5));
        assert!((camera.zoom() - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_duration_transition_is_instant() {
        let mut camera = CameraController::new().with_zoom(5.0);
        let mut zoom = ZoomTransition::new(CameraId(0), 5.0, 8.0, 0.0);
        assert!(zoom.step(&mut camera, 0.0));
        assert_eq!(camera.zoom(), 8.0);
    }

    #[test]
    fn test_limits_transition() {
        let mut camera = CameraController::new().with_aspect(1.0).with_zoom(5.0);
        let from = *camera.limits();
        let to = CameraLimits::from_xywh(0.0, 0.0, 100.0, 100.0);
        let mut limits = LimitsTransition::new(CameraId(0), from, to, 4.0);

        limits.step(&mut camera, 2.0);
        assert_eq!(*camera.limits().rect(), Rect::from_min_max(-250.0, -250.0, 300.0, 300.0));
        assert!(limits.step(&mut camera, 2.0));
        assert_eq!(camera.limits(), &to);
        assert!(camera.limits().rect().contains(camera.position()));
        assert_eq!(camera.position(), Point2D::new(5.0, 5.0));
    }

    #[test]
    fn test_focus_list_swap() {
        let mut camera = CameraController::new();
        camera.add_focus(FocusId(0));
        FocusListSwap::new(CameraId(0), vec![FocusId(1), FocusId(2)]).apply(&mut camera);
        assert_eq!(camera.focuses(), &[FocusId(1), FocusId(2)]);
    }

    #[test]
    fn test_action_apply() {
        let mut camera = CameraController::new();
        TriggerAction::AddFocus(FOCUS).apply(&mut camera);
        assert!(camera.contains_focus(FOCUS));
        TriggerAction::RemoveFocus(FOCUS).apply(&mut camera);
        assert!(!camera.contains_focus(FOCUS));
    }
}
