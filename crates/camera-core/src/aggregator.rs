//! Action rect aggregation.
//!
//! Folds every enabled focus point into the smallest axis-aligned rect
//! that covers them, after scaling each point's offset from the camera by
//! its influence. The result is padded and clamped into the camera limits.
//!
//! # Caching
//!
//! The rect is recomputed at most once per frame tick. [`ActionRectCache`]
//! is a two-state machine: `Stale` until the first read of a tick, then
//! `Fresh(tick)` until the tick advances or [`ActionRectCache::invalidate`]
//! forces it stale again.

use eyeframe_common::clock::FrameTick;
use eyeframe_scene_model::geometry::{Point2D, Rect};
use eyeframe_scene_model::limits::CameraLimits;

use crate::focus::FocusPoint;

/// Where a focus point lands in the action rect.
///
/// Influence `(1, 1)` keeps the focus point, `(0, 0)` collapses it onto
/// the camera position, and anything else scales the focus' offset from
/// the camera per axis.
pub fn influenced_point(point: Point2D, influence: Point2D, camera: Point2D) -> Point2D {
    if influence == Point2D::ONE {
        point
    } else if influence == Point2D::ZERO {
        camera
    } else {
        camera + (point - camera).scale(&influence)
    }
}

/// Unpadded action rect over the enabled focus points.
///
/// Without any enabled point the rect collapses to the camera position.
pub fn compute_action_rect<'a>(
    points: impl IntoIterator<Item = &'a FocusPoint>,
    camera: Point2D,
) -> Rect {
    points
        .into_iter()
        .filter(|p| p.enabled)
        .map(|p| influenced_point(p.point, p.influence, camera))
        .fold(None, |rect: Option<Rect>, p| {
            Some(match rect {
                None => Rect::at_point(p),
                Some(rect) => rect.include(p),
            })
        })
        .unwrap_or_else(|| Rect::at_point(camera))
}

/// Full pipeline: aggregate, pad on all sides, clamp into limits.
pub fn padded_action_rect<'a>(
    points: impl IntoIterator<Item = &'a FocusPoint>,
    camera: Point2D,
    padding: f64,
    limits: &CameraLimits,
) -> Rect {
    limits.pad_and_clamp(&compute_action_rect(points, camera), padding)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CacheState {
    Stale,
    Fresh(FrameTick),
}

/// Once-per-tick memo of the action rect.
#[derive(Debug, Clone)]
pub struct ActionRectCache {
    state: CacheState,
    rect: Rect,
}

impl ActionRectCache {
    /// A stale cache holding `initial` until the first computation.
    pub fn new(initial: Rect) -> Self {
        Self {
            state: CacheState::Stale,
            rect: initial,
        }
    }

    /// Whether the cached rect was computed during `tick`.
    pub fn is_fresh(&self, tick: FrameTick) -> bool {
        self.state == CacheState::Fresh(tick)
    }

    /// Return the rect for `tick`, computing it on the first read.
    pub fn get_or_compute(&mut self, tick: FrameTick, compute: impl FnOnce() -> Rect) -> Rect {
        if !self.is_fresh(tick) {
            self.rect = compute();
            self.state = CacheState::Fresh(tick);
        }
        self.rect
    }

    /// Store a rect computed outside the cache as fresh for `tick`.
    pub fn store(&mut self, tick: FrameTick, rect: Rect) {
        self.rect = rect;
        self.state = CacheState::Fresh(tick);
    }

    /// Force the next read to recompute.
    pub fn invalidate(&mut self) {
        self.state = CacheState::Stale;
    }

    /// Last computed rect, fresh or not.
    pub fn last(&self) -> Rect {
        self.rect
    }
}

impl Default for ActionRectCache {
    fn default() -> Self {
        Self::new(Rect::default())
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn focus(x: f64, y: f64) -> FocusPoint {
        FocusPoint::new(Point2D::new(x, y))
    }

    #[test]
    fn test_no_points_collapses_to_camera() {
        let camera = Point2D::new(3.0, 4.0);
        let rect = compute_action_rect(&[], camera);
        assert_eq!(rect, Rect::at_point(camera));
    }

    #[test]
    fn test_disabled_points_are_ignored() {
        let camera = Point2D::new(1.0, 1.0);
        let mut hidden = focus(100.0, 100.0);
        hidden.enabled = false;
        let rect = compute_action_rect(&[hidden], camera);
        assert_eq!(rect, Rect::at_point(camera));
    }

    #[test]
    fn test_single_point_full_influence() {
        let rect = compute_action_rect(&[focus(7.0, -2.0)], Point2D::ZERO);
        assert_eq!(rect, Rect::at_point(Point2D::new(7.0, -2.0)));
        assert_eq!(rect.size(), Point2D::ZERO);
    }

    #[test]
    fn test_zero_influence_uses_camera() {
        let camera = Point2D::new(-5.0, 2.0);
        let p = focus(40.0, 40.0).with_influence(Point2D::ZERO);
        let rect = compute_action_rect(&[p], camera);
        assert_eq!(rect, Rect::at_point(camera));
    }

    #[test]
    fn test_partial_influence_scales_offset() {
        let camera = Point2D::new(10.0, 0.0);
        let p = focus(20.0, 8.0).with_influence(Point2D::new(0.5, 0.25));
        let rect = compute_action_rect(&[p], camera);
        assert_eq!(rect, Rect::at_point(Point2D::new(15.0, 2.0)));
    }

    #[test]
    fn test_two_points_with_padding() {
        let points = [focus(-10.0, 0.0), focus(10.0, 0.0)];
        let unpadded = compute_action_rect(&points, Point2D::ZERO);
        assert_eq!(unpadded, Rect::from_min_max(-10.0, 0.0, 10.0, 0.0));

        let padded =
            padded_action_rect(&points, Point2D::ZERO, 5.0, &CameraLimits::default());
        assert_eq!(padded, Rect::from_min_max(-15.0, -5.0, 15.0, 5.0));
    }

    #[test]
    fn test_padding_clamped_into_limits() {
        let limits = CameraLimits::from_xywh(-12.0, -12.0, 24.0, 24.0);
        let points = [focus(-10.0, 0.0), focus(10.0, 0.0)];
        let rect = padded_action_rect(&points, Point2D::ZERO, 5.0, &limits);
        assert_eq!(rect, Rect::from_min_max(-12.0, -5.0, 12.0, 5.0));
    }

    #[test]
    fn test_cache_state_machine() {
        let mut cache = ActionRectCache::default();
        let mut calls = 0;

        let a = cache.get_or_compute(FrameTick(1), || {
            calls += 1;
            Rect::at_point(Point2D::new(1.0, 1.0))
        });
        let b = cache.get_or_compute(FrameTick(1), || {
            calls += 1;
            Rect::at_point(Point2D::new(2.0, 2.0))
        });
        assert_eq!(a, b);
        assert_eq!(calls, 1);

        cache.invalidate();
        assert!(!cache.is_fresh(FrameTick(1)));
        let c = cache.get_or_compute(FrameTick(1), || Rect::at_point(Point2D::new(3.0, 3.0)));
        assert_eq!(c.center(), Point2D::new(3.0, 3.0));

        let d = cache.get_or_compute(FrameTick(2), || Rect::at_point(Point2D::new(4.0, 4.0)));
        assert_eq!(d.center(), Point2D::new(4.0, 4.0));
    }

    fn arb_focus() -> impl Strategy<Value = FocusPoint> {
        (
            -1000.0..1000.0f64,
            -1000.0..1000.0f64,
            0.0..=1.0f64,
            0.0..=1.0f64,
            any::<bool>(),
        )
            .prop_map(|(x, y, ix, iy, enabled)| FocusPoint {
                point: Point2D::new(x, y),
                influence: Point2D::new(ix, iy),
                enabled,
            })
    }

    proptest! {
        #[test]
        fn prop_rect_is_tightest_cover(
            points in prop::collection::vec(arb_focus(), 1..12),
            cx in -100.0..100.0f64,
            cy in -100.0..100.0f64,
        ) {
            let camera = Point2D::new(cx, cy);
            let rect = compute_action_rect(&points, camera);
            let adjusted: Vec<Point2D> = points
                .iter()
                .filter(|p| p.enabled)
                .map(|p| influenced_point(p.point, p.influence, camera))
                .collect();

            for p in &adjusted {
                prop_assert!(rect.contains(*p));
            }
            if !adjusted.is_empty() {
                // Every edge is touched by some point.
                prop_assert!(adjusted.iter().any(|p| p.x == rect.x_min));
                prop_assert!(adjusted.iter().any(|p| p.x == rect.x_max));
                prop_assert!(adjusted.iter().any(|p| p.y == rect.y_min));
                prop_assert!(adjusted.iter().any(|p| p.y == rect.y_max));
            }
        }

        #[test]
        fn prop_recompute_is_idempotent(points in prop::collection::vec(arb_focus(), 0..8)) {
            let first = compute_action_rect(&points, Point2D::ZERO);
            let second = compute_action_rect(&points, Point2D::ZERO);
            prop_assert_eq!(first, second);
        }
    }
}
