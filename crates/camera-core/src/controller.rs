//! Orthographic camera state.
//!
//! Every write is clamped so the camera never looks outside its limits:
//! - position keeps the whole view (`zoom * aspect` by `zoom` half extents)
//!   inside the limits
//! - zoom is capped so the view fits the limits, then position is re-clamped
//! - new limits re-apply zoom (and so position)

use eyeframe_common::config::CameraDefaults;
use eyeframe_scene_model::geometry::{Point2D, Rect};
use eyeframe_scene_model::limits::CameraLimits;

use crate::aggregator::{padded_action_rect, ActionRectCache};
use crate::focus::{FocusId, FocusScene};
use crate::frame::Frame;

/// Smallest orthographic half-height.
pub const MIN_ZOOM: f64 = 0.01;

/// Camera position, zoom, limits and tracked focuses.
#[derive(Debug, Clone)]
pub struct CameraController {
    position: Point2D,
    zoom: f64,
    aspect: f64,
    limits: CameraLimits,
    padding: f64,
    enabled: bool,
    focuses: Vec<FocusId>,
    cache: ActionRectCache,
}

impl CameraController {
    pub fn new() -> Self {
        Self::from_defaults(&CameraDefaults::default())
    }

    /// Controller at the origin using configured defaults.
    pub fn from_defaults(defaults: &CameraDefaults) -> Self {
        let [x, y, width, height] = defaults.limits;
        let mut camera = Self {
            position: Point2D::ZERO,
            zoom: defaults.zoom,
            aspect: 1.0,
            limits: CameraLimits::from_xywh(x, y, width, height),
            padding: defaults.padding.max(0.0),
            enabled: true,
            focuses: Vec::new(),
            cache: ActionRectCache::default(),
        };
        camera.set_aspect(defaults.aspect);
        camera
    }

    pub fn with_position(mut self, position: Point2D) -> Self {
        self.set_position(position);
        self
    }

    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.set_zoom(zoom);
        self
    }

    pub fn with_aspect(mut self, aspect: f64) -> Self {
        self.set_aspect(aspect);
        self
    }

    pub fn with_limits(mut self, limits: CameraLimits) -> Self {
        self.set_limits(limits);
        self
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.set_padding(padding);
        self
    }

    pub fn position(&self) -> Point2D {
        self.position
    }

    /// Move the camera, keeping the view inside the limits.
    pub fn set_position(&mut self, position: Point2D) {
        if !position.is_finite() {
            tracing::warn!(?position, "Ignoring non-finite camera position");
            return;
        }
        self.position = self.limits.rect().clamp_center(position, self.half_view());
    }

    /// Orthographic half-height.
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set the zoom, capped so the view fits the limits.
    pub fn set_zoom(&mut self, zoom: f64) {
        if !zoom.is_finite() {
            tracing::warn!(zoom, "Ignoring non-finite camera zoom");
            return;
        }
        // The fit cap wins over the floor on very small limits.
        self.zoom = zoom
            .max(MIN_ZOOM)
            .min(self.maximum_zoom(self.limits.size()));
        self.set_position(self.position);
    }

    /// Viewport width / height.
    pub fn aspect(&self) -> f64 {
        self.aspect
    }

    pub fn set_aspect(&mut self, aspect: f64) {
        if !(aspect > 0.0 && aspect.is_finite()) {
            tracing::warn!(aspect, "Ignoring non-positive camera aspect");
            return;
        }
        self.aspect = aspect;
        self.set_zoom(self.zoom);
    }

    pub fn limits(&self) -> &CameraLimits {
        &self.limits
    }

    /// Replace the limits and re-apply zoom and position.
    pub fn set_limits(&mut self, limits: CameraLimits) {
        self.limits = limits;
        self.set_zoom(self.zoom);
        self.cache.invalidate();
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    pub fn set_padding(&mut self, padding: f64) {
        self.padding = padding.max(0.0);
        self.cache.invalidate();
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// A disabled controller keeps returning its last action rect.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Half extents of the view.
    pub fn half_view(&self) -> Point2D {
        Point2D::new(self.zoom * self.aspect, self.zoom)
    }

    /// Largest zoom whose view fits inside an area of `size`.
    pub fn maximum_zoom(&self, size: Point2D) -> f64 {
        (size.x / 2.0 / self.aspect).min(size.y / 2.0)
    }

    /// Smallest zoom whose view covers an area of `size`.
    pub fn world_to_zoom(&self, size: Point2D) -> f64 {
        (size.x / 2.0 / self.aspect).max(size.y / 2.0)
    }

    /// The area currently visible, world space.
    pub fn view_rect(&self) -> Rect {
        Rect::from_center(self.position, self.half_view())
    }

    pub fn clamp_to_limits(&self, point: Point2D) -> Point2D {
        self.limits.clamp_point(point)
    }

    /// Centre for `rect` that keeps it inside the limits. A rect larger than
    /// the limits is treated as the size of the limits.
    pub fn clamp_rect_to_limits(&self, rect: &Rect) -> Point2D {
        clamp_rect_center(rect, self.limits.rect())
    }

    pub fn clamp_to_view(&self, point: Point2D) -> Point2D {
        self.view_rect().clamp_point(point)
    }

    /// Centre for `rect` that keeps it inside the current view.
    pub fn clamp_rect_to_view(&self, rect: &Rect) -> Point2D {
        clamp_rect_center(rect, &self.view_rect())
    }

    // Focus set

    pub fn focuses(&self) -> &[FocusId] {
        &self.focuses
    }

    pub fn contains_focus(&self, id: FocusId) -> bool {
        self.focuses.contains(&id)
    }

    /// Track a focus. Returns `false` if it was already tracked.
    pub fn add_focus(&mut self, id: FocusId) -> bool {
        if self.contains_focus(id) {
            return false;
        }
        self.focuses.push(id);
        self.cache.invalidate();
        true
    }

    pub fn add_focuses(&mut self, ids: impl IntoIterator<Item = FocusId>) {
        for id in ids {
            self.add_focus(id);
        }
    }

    /// Stop tracking a focus. Returns `false` if it wasn't tracked.
    pub fn remove_focus(&mut self, id: FocusId) -> bool {
        let before = self.focuses.len();
        self.focuses.retain(|f| *f != id);
        let removed = self.focuses.len() != before;
        if removed {
            self.cache.invalidate();
        }
        removed
    }

    pub fn remove_focuses(&mut self, ids: impl IntoIterator<Item = FocusId>) {
        for id in ids {
            self.remove_focus(id);
        }
    }

    pub fn clear_focuses(&mut self) {
        self.focuses.clear();
        self.cache.invalidate();
    }

    /// Replace the tracked focuses.
    pub fn set_focuses(&mut self, ids: impl IntoIterator<Item = FocusId>) {
        self.clear_focuses();
        self.add_focuses(ids);
    }

    /// Drop ids whose focus no longer exists. Returns how many were dropped.
    pub fn clean_focuses(&mut self, scene: &FocusScene) -> usize {
        let before = self.focuses.len();
        self.focuses.retain(|id| scene.contains(*id));
        let dropped = before - self.focuses.len();
        if dropped > 0 {
            tracing::debug!(dropped, "Dropped stale focus ids");
            self.cache.invalidate();
        }
        dropped
    }

    // Action rect

    /// The padded action rect for this frame, computed on first read.
    pub fn action_rect(&mut self, scene: &FocusScene, frame: &Frame<'_>) -> Rect {
        if !self.enabled {
            return self.cache.last();
        }

        let view = self.view_rect();
        let position = self.position;
        let padding = self.padding;
        let limits = &self.limits;
        let focuses = &self.focuses;
        self.cache.get_or_compute(frame.tick(), || {
            let points = scene.sample_all(focuses, &view, frame.input);
            let rect = padded_action_rect(&points, position, padding, limits);
            tracing::trace!(
                tick = frame.tick().0,
                points = points.len(),
                ?rect,
                "Action rect recomputed"
            );
            rect
        })
    }

    /// Last computed action rect, without recomputing.
    pub fn last_action_rect(&self) -> Rect {
        self.cache.last()
    }

    /// Force the next [`CameraController::action_rect`] read to recompute.
    pub fn invalidate_action_rect(&mut self) {
        self.cache.invalidate();
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}

fn clamp_rect_center(rect: &Rect, bounds: &Rect) -> Point2D {
    let size = rect.size();
    let bounds_size = bounds.size();
    let half = Point2D::new(size.x.min(bounds_size.x), size.y.min(bounds_size.y)) * 0.5;
    bounds.clamp_center(rect.center(), half)
}
