//! Piecewise cubic Bezier rails.
//!
//! A rail holds `3k + 1` control points. Segment `i` uses points
//! `3i ..= 3i + 3`; neighbouring segments share their boundary point.
//! Points are stored in rail-local space and translated by `origin` on
//! the way out.
//!
//! # Nearest point
//!
//! Projection onto the rail is an approximation that camera framing is
//! tuned against:
//!
//! 1. Find the nearest control point (first one wins ties).
//! 2. Pick the segment that control point belongs to. A shared boundary
//!    point picks whichever neighbouring segment has its far endpoint
//!    closer to the query.
//! 3. Project the query onto the segment's chord (start → end) to get `t`.
//! 4. Evaluate the curve at `t`.
//!
//! Step 3 projects onto the chord, not the curve, so strongly bent
//! segments return points that are not the true nearest point.

use eyeframe_common::error::{EyeframeError, EyeframeResult};
use eyeframe_scene_model::geometry::Point2D;

/// Distance between points added when extending or repairing a rail.
pub const ADDED_POINT_SPACING: f64 = 10.0;

/// Control points of a freshly created rail.
pub const DEFAULT_RAIL_POINTS: [Point2D; 4] = [
    Point2D::new(-15.0, 0.0),
    Point2D::new(-5.0, 0.0),
    Point2D::new(5.0, 0.0),
    Point2D::new(15.0, 0.0),
];

/// Minimum number of control points (one segment).
pub const MIN_RAIL_POINTS: usize = 4;

/// A piecewise cubic Bezier curve.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierRail {
    points: Vec<Point2D>,
    origin: Point2D,
}

impl BezierRail {
    /// Build a rail, padding the control points to `3k + 1` if needed.
    pub fn from_points(points: Vec<Point2D>) -> Self {
        let mut rail = Self {
            points: Vec::new(),
            origin: Point2D::ZERO,
        };
        rail.set_points(points);
        rail
    }

    /// Build a rail, rejecting point counts that are not `3k + 1`, `k >= 1`.
    pub fn try_from_points(points: Vec<Point2D>) -> EyeframeResult<Self> {
        if !is_valid_count(points.len()) {
            return Err(EyeframeError::InvalidRail {
                count: points.len(),
            });
        }
        Ok(Self {
            points,
            origin: Point2D::ZERO,
        })
    }

    /// Place the rail's local origin in world space.
    pub fn with_origin(mut self, origin: Point2D) -> Self {
        self.origin = origin;
        self
    }

    pub fn origin(&self) -> Point2D {
        self.origin
    }

    pub fn set_origin(&mut self, origin: Point2D) {
        self.origin = origin;
    }

    /// Control points in rail-local space.
    pub fn points(&self) -> &[Point2D] {
        &self.points
    }

    /// Number of control points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a rail keeps at least one segment.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn segment_count(&self) -> usize {
        (self.points.len() - 1) / 3
    }

    /// Replace the control points, padding to `3k + 1`. Returns the number
    /// of points added by the repair.
    pub fn set_points(&mut self, points: Vec<Point2D>) -> usize {
        self.points = points;
        let added = repair_points(&mut self.points);
        if added > 0 {
            tracing::warn!(
                added,
                count = self.points.len(),
                "Rail control points padded to 3k+1"
            );
        }
        added
    }

    /// Move a single control point (local space).
    pub fn set_point(&mut self, index: usize, point: Point2D) -> EyeframeResult<()> {
        let count = self.points.len();
        let slot = self.points.get_mut(index).ok_or_else(|| {
            EyeframeError::rail(format!(
                "control point {index} out of range ({count} points)"
            ))
        })?;
        *slot = point;
        Ok(())
    }

    /// Evaluate segment `segment` at `t` (world space).
    ///
    /// `t` is clamped to `[0, 1]` and `segment` to the last segment.
    pub fn point_at(&self, t: f64, segment: usize) -> Point2D {
        let segment = segment.min(self.segment_count() - 1);
        self.point_at_index(t.clamp(0.0, 1.0), segment * 3)
    }

    /// Evaluate the rail at `progress` in `[0, 1]` across all segments,
    /// each segment taking an equal share.
    pub fn point_at_progress(&self, progress: f64) -> Point2D {
        let progress = progress.clamp(0.0, 1.0);
        if progress >= 1.0 {
            return self.point_at_index(1.0, self.points.len() - MIN_RAIL_POINTS);
        }
        let scaled = progress * self.segment_count() as f64;
        let segment = scaled.floor();
        self.point_at_index(scaled - segment, segment as usize * 3)
    }

    /// Approximate nearest point on the rail to `query` (world space).
    pub fn nearest_point(&self, query: Point2D) -> Point2D {
        let local = query - self.origin;
        let start = self.nearest_segment_start(|p| p.distance_to(&local));

        let chord = self.points[start + 3] - self.points[start];
        let to_query = local - self.points[start];
        let t = if chord == Point2D::ZERO {
            0.5
        } else {
            // cos(angle) * |to_query| / |chord|
            (chord.dot(&to_query) / chord.dot(&chord)).clamp(0.0, 1.0)
        };
        self.point_at_index(t, start)
    }

    /// Point on the rail whose segment best matches world x coordinate `x`.
    pub fn nearest_point_by_x(&self, x: f64) -> Point2D {
        let local = x - self.origin.x;
        self.nearest_point_on_axis(local, |p| p.x)
    }

    /// Point on the rail whose segment best matches world y coordinate `y`.
    pub fn nearest_point_by_y(&self, y: f64) -> Point2D {
        let local = y - self.origin.y;
        self.nearest_point_on_axis(local, |p| p.y)
    }

    /// Prepend a segment continuing the start tangent.
    pub fn add_segment_at_start(&mut self) {
        let first = self.points[0];
        let direction = start_direction(&self.points);
        let added = [3.0, 2.0, 1.0].map(|k| first + direction * (ADDED_POINT_SPACING * k));
        self.points.splice(0..0, added);
    }

    /// Append a segment continuing the end tangent.
    pub fn add_segment_at_end(&mut self) {
        for _ in 0..3 {
            push_extrapolated(&mut self.points);
        }
    }

    /// Remove the first segment. Fails when only one segment is left.
    pub fn remove_segment_from_start(&mut self) -> EyeframeResult<()> {
        self.ensure_removable()?;
        self.points.drain(0..3);
        Ok(())
    }

    /// Remove the last segment. Fails when only one segment is left.
    pub fn remove_segment_from_end(&mut self) -> EyeframeResult<()> {
        self.ensure_removable()?;
        self.points.truncate(self.points.len() - 3);
        Ok(())
    }

    /// Polyline through the rail with `per_segment` steps per segment
    /// (world space). Shared boundary points appear once.
    pub fn sample(&self, per_segment: usize) -> Vec<Point2D> {
        let per_segment = per_segment.max(1);
        let mut samples = Vec::with_capacity(self.segment_count() * per_segment + 1);
        samples.push(self.point_at_index(0.0, 0));
        for segment in 0..self.segment_count() {
            for step in 1..=per_segment {
                let t = step as f64 / per_segment as f64;
                samples.push(self.point_at_index(t, segment * 3));
            }
        }
        samples
    }

    fn ensure_removable(&self) -> EyeframeResult<()> {
        if self.points.len() <= MIN_RAIL_POINTS {
            return Err(EyeframeError::RailTooShort {
                count: self.points.len(),
            });
        }
        Ok(())
    }

    /// Cubic Bezier through `points[start ..= start + 3]`, world space.
    fn point_at_index(&self, t: f64, start: usize) -> Point2D {
        let p = &self.points[start..start + 4];
        let inv = 1.0 - t;
        let inv2 = inv * inv;
        let t2 = t * t;
        let local = p[0] * (inv2 * inv)
            + p[1] * (3.0 * inv2 * t)
            + p[2] * (3.0 * inv * t2)
            + p[3] * (t2 * t);
        local + self.origin
    }

    /// Index of the first control point of the segment nearest under
    /// `distance`.
    fn nearest_segment_start(&self, distance: impl Fn(&Point2D) -> f64) -> usize {
        let mut index = 0;
        let mut best = distance(&self.points[0]);
        for (i, p) in self.points.iter().enumerate().skip(1) {
            let d = distance(p);
            if d < best {
                best = d;
                index = i;
            }
        }

        if index == 0 {
            return 0;
        }
        if index % 3 == 0 {
            let no_following_segment = index + 3 >= self.points.len();
            if no_following_segment
                || distance(&self.points[index - 3]) < distance(&self.points[index + 3])
            {
                index - 3
            } else {
                index
            }
        } else {
            index / 3 * 3
        }
    }

    fn nearest_point_on_axis(&self, value: f64, axis: impl Fn(&Point2D) -> f64) -> Point2D {
        let start = self.nearest_segment_start(|p| (axis(p) - value).abs());
        let from = axis(&self.points[start]);
        let to = axis(&self.points[start + 3]);
        let t = if to == from {
            0.5
        } else {
            ((value - from) / (to - from)).clamp(0.0, 1.0)
        };
        self.point_at_index(t, start)
    }
}

impl Default for BezierRail {
    fn default() -> Self {
        Self {
            points: DEFAULT_RAIL_POINTS.to_vec(),
            origin: Point2D::ZERO,
        }
    }
}

fn is_valid_count(count: usize) -> bool {
    count >= MIN_RAIL_POINTS && (count - 1) % 3 == 0
}

/// Pad `points` to `3k + 1` with extrapolated points. Returns how many
/// points were added.
fn repair_points(points: &mut Vec<Point2D>) -> usize {
    if points.is_empty() {
        points.extend_from_slice(&DEFAULT_RAIL_POINTS);
        return DEFAULT_RAIL_POINTS.len();
    }

    let before = points.len();
    let target = if before < MIN_RAIL_POINTS {
        MIN_RAIL_POINTS
    } else {
        before + (3 - (before - 1) % 3) % 3
    };
    while points.len() < target {
        push_extrapolated(points);
    }
    target - before
}

fn push_extrapolated(points: &mut Vec<Point2D>) {
    let direction = end_direction(points);
    if let Some(&last) = points.last() {
        points.push(last + direction * ADDED_POINT_SPACING);
    }
}

/// Unit tangent leaving the last point; +x when undefined.
fn end_direction(points: &[Point2D]) -> Point2D {
    match points {
        [.., before, last] => (*last - *before).normalized(),
        _ => None,
    }
    .unwrap_or(Point2D::new(1.0, 0.0))
}

/// Unit tangent leaving the first point backwards; -x when undefined.
fn start_direction(points: &[Point2D]) -> Point2D {
    match points {
        [first, after, ..] => (*first - *after).normalized(),
        _ => None,
    }
    .unwrap_or(Point2D::new(-1.0, 0.0))
}
