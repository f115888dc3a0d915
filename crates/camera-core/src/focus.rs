//! Points of interest.
//!
//! A [`Focus`] is a source polled once per frame for a [`FocusPoint`].
//! Focuses live in a [`FocusScene`] and are referenced by [`FocusId`];
//! cameras keep sets of ids and never own focuses.
//!
//! Every focus goes through two phases per frame:
//! 1. [`FocusScene::update`] (gameplay phase): scripted motion, velocity
//!    estimation, cursor input, rail travel.
//! 2. [`FocusScene::sample`] (late phase): the point a camera frames.

use eyeframe_common::error::{EyeframeError, EyeframeResult};
use eyeframe_scene_model::geometry::{Point2D, Rect};
use eyeframe_scene_model::scene::{FocusKindSpec, FocusSpec, RailSpec};

use crate::frame::Frame;
use crate::input::InputSource;
use crate::rail::BezierRail;
use crate::rail_focus::{FollowRail, TimedRail};

/// Input axes nudging a [`CursorFocus`].
pub const CURSOR_X_AXIS: &str = "mouse_x";
pub const CURSOR_Y_AXIS: &str = "mouse_y";

/// Largest dead zone of a viewport cursor (half the viewport).
pub const MAX_CURSOR_THRESHOLD: f64 = 0.5;

/// How many follow-rail links are resolved before giving up.
pub const MAX_FOLLOW_DEPTH: usize = 16;

/// Handle to a focus in a [`FocusScene`]. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FocusId(pub usize);

/// A sampled point of interest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusPoint {
    pub point: Point2D,
    /// Per-axis weight in `[0, 1]`.
    pub influence: Point2D,
    pub enabled: bool,
}

impl FocusPoint {
    /// Enabled point with full influence.
    pub fn new(point: Point2D) -> Self {
        Self {
            point,
            influence: Point2D::ONE,
            enabled: true,
        }
    }

    pub fn with_influence(mut self, influence: Point2D) -> Self {
        self.influence = clamp_influence(influence);
        self
    }
}

/// World-space cursor moved by input deltas.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorFocus {
    pub sensitivity: f64,
    /// Maximum distance from the focus position.
    pub leash: Option<f64>,
    offset: Point2D,
}

impl CursorFocus {
    pub fn new(sensitivity: f64, leash: Option<f64>) -> Self {
        Self {
            sensitivity,
            leash: leash.map(|l| l.max(0.0)),
            offset: Point2D::ZERO,
        }
    }

    /// Cursor offset from the focus position.
    pub fn offset(&self) -> Point2D {
        self.offset
    }

    /// Move the cursor by raw input `delta`.
    pub fn nudge(&mut self, delta: Point2D) {
        self.offset += delta * self.sensitivity;
        if let Some(leash) = self.leash {
            let distance = self.offset.length();
            if distance > leash {
                self.offset = self.offset * (leash / distance);
            }
        }
    }
}

/// How a focus derives its point.
#[derive(Debug, Clone, PartialEq)]
pub enum FocusKind {
    /// Position plus a fixed offset.
    Transform { offset: Point2D },
    /// Leads ahead of the measured movement direction.
    Moving {
        offset: Point2D,
        velocity_to_offset: Point2D,
        /// Velocity measured during the last update.
        velocity: Point2D,
        last_position: Point2D,
    },
    /// Leads ahead of the host-supplied velocity ([`Focus::velocity`]).
    Body {
        offset: Point2D,
        velocity_to_offset: Point2D,
    },
    Cursor(CursorFocus),
    /// Looks towards the screen cursor outside a central dead zone.
    ViewportCursor { threshold: f64 },
    TimedRail(TimedRail),
    FollowRail(FollowRail),
}

impl FocusKind {
    /// Short name used in logs and CLI output.
    pub fn label(&self) -> &'static str {
        match self {
            FocusKind::Transform { .. } => "transform",
            FocusKind::Moving { .. } => "moving",
            FocusKind::Body { .. } => "body",
            FocusKind::Cursor(_) => "cursor",
            FocusKind::ViewportCursor { .. } => "viewport_cursor",
            FocusKind::TimedRail(_) => "timed_rail",
            FocusKind::FollowRail(_) => "follow_rail",
        }
    }

    /// The rail this focus moves on, if any.
    pub fn rail(&self) -> Option<&BezierRail> {
        match self {
            FocusKind::TimedRail(timed) => Some(timed.rail()),
            FocusKind::FollowRail(follow) => Some(follow.rail()),
            _ => None,
        }
    }
}

/// A point-of-interest source.
#[derive(Debug, Clone, PartialEq)]
pub struct Focus {
    pub name: String,
    pub position: Point2D,
    pub influence: Point2D,
    pub enabled: bool,
    /// Scripted velocity applied every update; the physics velocity for
    /// [`FocusKind::Body`].
    pub velocity: Point2D,
    pub kind: FocusKind,
}

impl Focus {
    pub fn new(name: impl Into<String>, kind: FocusKind) -> Self {
        Self {
            name: name.into(),
            position: Point2D::ZERO,
            influence: Point2D::ONE,
            enabled: true,
            velocity: Point2D::ZERO,
            kind,
        }
    }

    /// Place the focus. Resets the movement history of moving focuses.
    pub fn at(mut self, position: Point2D) -> Self {
        self.position = position;
        if let FocusKind::Moving { last_position, .. } = &mut self.kind {
            *last_position = position;
        }
        self
    }

    pub fn with_influence(mut self, influence: Point2D) -> Self {
        self.influence = clamp_influence(influence);
        self
    }

    pub fn with_velocity(mut self, velocity: Point2D) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Build a focus from its scene description. Follow targets are left
    /// unresolved; [`FocusScene::from_specs`] links them.
    pub fn from_spec(spec: &FocusSpec) -> Self {
        let kind = match &spec.kind {
            FocusKindSpec::Transform { offset } => FocusKind::Transform { offset: *offset },
            FocusKindSpec::Moving {
                offset,
                velocity_to_offset,
            } => FocusKind::Moving {
                offset: *offset,
                velocity_to_offset: *velocity_to_offset,
                velocity: Point2D::ZERO,
                last_position: spec.position,
            },
            FocusKindSpec::Body {
                offset,
                velocity_to_offset,
            } => FocusKind::Body {
                offset: *offset,
                velocity_to_offset: *velocity_to_offset,
            },
            FocusKindSpec::Cursor { sensitivity, leash } => {
                FocusKind::Cursor(CursorFocus::new(*sensitivity, *leash))
            }
            FocusKindSpec::ViewportCursor { threshold } => FocusKind::ViewportCursor {
                threshold: threshold.clamp(0.0, MAX_CURSOR_THRESHOLD),
            },
            FocusKindSpec::TimedRail {
                rail,
                time_to_finish,
                looping,
                progress,
            } => FocusKind::TimedRail(
                TimedRail::new(rail_from_spec(&spec.name, rail), *time_to_finish)
                    .with_looping(*looping)
                    .with_progress(*progress),
            ),
            FocusKindSpec::FollowRail { rail, axis, .. } => {
                FocusKind::FollowRail(FollowRail::new(rail_from_spec(&spec.name, rail), None, *axis))
            }
        };

        Focus::new(spec.name.clone(), kind)
            .at(spec.position)
            .with_influence(spec.influence)
            .with_velocity(spec.velocity)
            .with_enabled(spec.enabled)
    }

    /// Gameplay phase for this focus.
    pub fn update(&mut self, frame: &Frame<'_>) {
        if !self.enabled {
            return;
        }
        let dt = frame.delta_secs();
        self.position += self.velocity * dt;

        match &mut self.kind {
            FocusKind::Moving {
                velocity,
                last_position,
                ..
            } => {
                if dt > 0.0 {
                    *velocity = (self.position - *last_position) * (1.0 / dt);
                }
                *last_position = self.position;
            }
            FocusKind::Cursor(cursor) => {
                let delta = Point2D::new(
                    frame.input.axis(CURSOR_X_AXIS),
                    frame.input.axis(CURSOR_Y_AXIS),
                );
                cursor.nudge(delta);
            }
            FocusKind::TimedRail(timed) => timed.advance(dt),
            FocusKind::Transform { .. }
            | FocusKind::Body { .. }
            | FocusKind::ViewportCursor { .. }
            | FocusKind::FollowRail(_) => {}
        }
    }
}

fn rail_from_spec(focus: &str, spec: &RailSpec) -> BezierRail {
    let rail = BezierRail::from_points(spec.points.clone()).with_origin(spec.origin);
    if rail.len() != spec.points.len() {
        tracing::warn!(
            focus,
            declared = spec.points.len(),
            repaired = rail.len(),
            "Rail repaired while loading focus"
        );
    }
    rail
}

fn clamp_influence(influence: Point2D) -> Point2D {
    Point2D::new(influence.x.clamp(0.0, 1.0), influence.y.clamp(0.0, 1.0))
}

/// World point a viewport cursor looks at.
///
/// Per axis the cursor's offset from the viewport centre is reduced by
/// `threshold` (never below zero), then mapped back into `view`. Without
/// a cursor the view centre is returned.
pub fn viewport_cursor_point(cursor: Option<Point2D>, threshold: f64, view: &Rect) -> Point2D {
    let Some(cursor) = cursor else {
        return view.center();
    };
    let threshold = threshold.clamp(0.0, MAX_CURSOR_THRESHOLD);
    let reduce = |v: f64| {
        let from_center = v.clamp(0.0, 1.0) - 0.5;
        if from_center == 0.0 {
            0.0
        } else {
            (from_center.abs() - threshold).max(0.0) * from_center.signum()
        }
    };
    let offset = Point2D::new(reduce(cursor.x), reduce(cursor.y));
    view.center() + offset.scale(&view.size())
}

/// Registry of all focuses.
#[derive(Debug, Clone, Default)]
pub struct FocusScene {
    slots: Vec<Option<Focus>>,
}

impl FocusScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every focus of a scene, linking follow-rail targets by name.
    pub fn from_specs(specs: &[FocusSpec]) -> EyeframeResult<Self> {
        let mut scene = Self::new();
        for spec in specs {
            if scene.id_of(&spec.name).is_some() {
                return Err(EyeframeError::scene(format!(
                    "duplicate focus name '{}'",
                    spec.name
                )));
            }
            scene.insert(Focus::from_spec(spec));
        }

        for spec in specs {
            let FocusKindSpec::FollowRail {
                follows: Some(target),
                ..
            } = &spec.kind
            else {
                continue;
            };
            if *target == spec.name {
                return Err(EyeframeError::scene(format!(
                    "focus '{}' follows itself",
                    spec.name
                )));
            }
            let target_id = scene
                .id_of(target)
                .ok_or_else(|| EyeframeError::unknown_focus(target.clone()))?;
            let own_id = scene
                .id_of(&spec.name)
                .ok_or_else(|| EyeframeError::unknown_focus(spec.name.clone()))?;
            if let Some(Focus {
                kind: FocusKind::FollowRail(follow),
                ..
            }) = scene.get_mut(own_id)
            {
                follow.set_follows(Some(target_id));
            }
        }

        tracing::debug!(focuses = scene.len(), "Focus scene built");
        Ok(scene)
    }

    pub fn insert(&mut self, focus: Focus) -> FocusId {
        self.slots.push(Some(focus));
        FocusId(self.slots.len() - 1)
    }

    /// Remove a focus. Cameras still holding the id skip it from then on.
    pub fn remove(&mut self, id: FocusId) -> Option<Focus> {
        self.slots.get_mut(id.0).and_then(Option::take)
    }

    pub fn get(&self, id: FocusId) -> Option<&Focus> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: FocusId) -> Option<&mut Focus> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: FocusId) -> bool {
        self.get(id).is_some()
    }

    /// Look up a focus by name.
    pub fn id_of(&self, name: &str) -> Option<FocusId> {
        self.iter()
            .find(|(_, focus)| focus.name == name)
            .map(|(id, _)| id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FocusId, &Focus)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|focus| (FocusId(i), focus)))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Gameplay phase: update every focus.
    pub fn update(&mut self, frame: &Frame<'_>) {
        for focus in self.slots.iter_mut().flatten() {
            focus.update(frame);
        }
    }

    /// Sample one focus as seen by a camera showing `view`.
    pub fn sample(&self, id: FocusId, view: &Rect, input: &dyn InputSource) -> Option<FocusPoint> {
        self.sample_at_depth(id, view, input, 0)
    }

    /// Sample every live focus in `ids`, skipping stale ids.
    pub fn sample_all(
        &self,
        ids: &[FocusId],
        view: &Rect,
        input: &dyn InputSource,
    ) -> Vec<FocusPoint> {
        ids.iter()
            .filter_map(|&id| self.sample(id, view, input))
            .collect()
    }

    fn sample_at_depth(
        &self,
        id: FocusId,
        view: &Rect,
        input: &dyn InputSource,
        depth: usize,
    ) -> Option<FocusPoint> {
        let focus = self.get(id)?;
        let point = match &focus.kind {
            FocusKind::Transform { offset } => focus.position + *offset,
            FocusKind::Moving {
                offset,
                velocity_to_offset,
                velocity,
                ..
            } => focus.position + *offset + velocity.scale(velocity_to_offset),
            FocusKind::Body {
                offset,
                velocity_to_offset,
            } => focus.position + *offset + focus.velocity.scale(velocity_to_offset),
            FocusKind::Cursor(cursor) => focus.position + cursor.offset(),
            FocusKind::ViewportCursor { threshold } => {
                viewport_cursor_point(input.cursor_viewport(), *threshold, view)
            }
            FocusKind::TimedRail(timed) => timed.focus_point(),
            FocusKind::FollowRail(follow) => {
                self.follow_rail_point(focus, follow, view, input, depth)
            }
        };

        Some(FocusPoint {
            point,
            influence: focus.influence,
            enabled: focus.enabled,
        })
    }

    fn follow_rail_point(
        &self,
        focus: &Focus,
        follow: &FollowRail,
        view: &Rect,
        input: &dyn InputSource,
        depth: usize,
    ) -> Point2D {
        let Some(target) = follow.follows() else {
            return focus.position;
        };
        if depth >= MAX_FOLLOW_DEPTH {
            tracing::warn!(focus = %focus.name, depth, "Follow rail chain too deep, using own position");
            return focus.position;
        }
        match self.sample_at_depth(target, view, input, depth + 1) {
            Some(followed) => follow.project(followed.point),
            None => focus.position,
        }
    }
}
