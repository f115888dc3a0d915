//! Focuses constrained to a [`BezierRail`].

use eyeframe_scene_model::geometry::Point2D;
use eyeframe_scene_model::scene::RailAxis;

use crate::focus::FocusId;
use crate::rail::BezierRail;

/// Shortest allowed traversal time, seconds.
pub const MIN_TIME_TO_FINISH: f64 = 0.0001;

/// A focus travelling the whole rail in `time_to_finish` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedRail {
    rail: BezierRail,
    time_to_finish: f64,
    looping: bool,
    progress: f64,
}

impl TimedRail {
    pub fn new(rail: BezierRail, time_to_finish: f64) -> Self {
        Self {
            rail,
            time_to_finish: time_to_finish.max(MIN_TIME_TO_FINISH),
            looping: false,
            progress: 0.0,
        }
    }

    /// Restart from the beginning after reaching the end.
    pub fn with_looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    pub fn with_progress(mut self, progress: f64) -> Self {
        self.set_progress(progress);
        self
    }

    pub fn rail(&self) -> &BezierRail {
        &self.rail
    }

    pub fn rail_mut(&mut self) -> &mut BezierRail {
        &mut self.rail
    }

    pub fn time_to_finish(&self) -> f64 {
        self.time_to_finish
    }

    pub fn set_time_to_finish(&mut self, secs: f64) {
        self.time_to_finish = secs.max(MIN_TIME_TO_FINISH);
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Position along the rail in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn set_progress(&mut self, progress: f64) {
        self.progress = progress.clamp(0.0, 1.0);
    }

    /// Whether a non-looping rail reached its end.
    pub fn is_finished(&self) -> bool {
        !self.looping && self.progress >= 1.0
    }

    /// Move along the rail by `delta_secs` of scaled time.
    pub fn advance(&mut self, delta_secs: f64) {
        if self.progress >= 1.0 {
            return;
        }
        self.set_progress(self.progress + delta_secs / self.time_to_finish);
        if self.looping && self.progress >= 1.0 {
            self.progress = 0.0;
        }
    }

    /// Current point on the rail, world space.
    pub fn focus_point(&self) -> Point2D {
        self.rail.point_at_progress(self.progress)
    }
}

/// A focus that projects another focus onto a rail.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowRail {
    rail: BezierRail,
    follows: Option<FocusId>,
    axis: RailAxis,
}

impl FollowRail {
    pub fn new(rail: BezierRail, follows: Option<FocusId>, axis: RailAxis) -> Self {
        Self {
            rail,
            follows,
            axis,
        }
    }

    pub fn rail(&self) -> &BezierRail {
        &self.rail
    }

    pub fn rail_mut(&mut self) -> &mut BezierRail {
        &mut self.rail
    }

    /// The focus being projected, if any.
    pub fn follows(&self) -> Option<FocusId> {
        self.follows
    }

    pub fn set_follows(&mut self, follows: Option<FocusId>) {
        self.follows = follows;
    }

    pub fn axis(&self) -> RailAxis {
        self.axis
    }

    pub fn set_axis(&mut self, axis: RailAxis) {
        self.axis = axis;
    }

    /// Clamp `target` onto the rail along the configured axis.
    pub fn project(&self, target: Point2D) -> Point2D {
        match self.axis {
            RailAxis::Both => self.rail.nearest_point(target),
            RailAxis::X => self.rail.nearest_point_by_x(target.x),
            RailAxis::Y => self.rail.nearest_point_by_y(target.y),
        }
    }
}
