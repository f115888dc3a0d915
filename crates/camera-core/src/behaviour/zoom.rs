//! Zoom-driving behaviours.

use eyeframe_scene_model::geometry::clamp_lenient;
use eyeframe_scene_model::scene::{ScrollZoomConfig, SmoothScrollZoomConfig, ZoomToFitConfig};

use super::CameraBehaviour;
use crate::controller::CameraController;
use crate::focus::FocusScene;
use crate::frame::Frame;

/// Zoom difference below which smooth scroll zoom stops adjusting.
pub const SCROLL_ZOOM_THRESHOLD: f64 = 0.1;

/// Zooms so the whole action rect is visible.
///
/// Adjusts only once the ideal zoom drifts past the still threshold, then
/// keeps adjusting while the last step was larger than `speed`.
#[derive(Debug, Clone)]
pub struct ZoomToFit {
    config: ZoomToFitConfig,
    last_distance: f64,
}

impl ZoomToFit {
    pub fn new(config: ZoomToFitConfig) -> Self {
        Self {
            config,
            last_distance: 0.0,
        }
    }

    pub fn config(&self) -> &ZoomToFitConfig {
        &self.config
    }
}

impl Default for ZoomToFit {
    fn default() -> Self {
        Self::new(ZoomToFitConfig::default())
    }
}

impl CameraBehaviour for ZoomToFit {
    fn name(&self) -> &'static str {
        "zoom_to_fit"
    }

    fn late_update(&mut self, camera: &mut CameraController, scene: &FocusScene, frame: &Frame<'_>) {
        let action = camera.action_rect(scene, frame);
        let perfect = camera.world_to_zoom(action.size());
        let zoom = camera.zoom();

        if (perfect - zoom).abs() > self.config.still_threshold
            || self.last_distance.abs() > self.config.speed
        {
            self.last_distance = perfect.max(self.config.minimum_zoom) - zoom;
            let step = (self.config.speed * frame.unscaled_delta_secs()).min(1.0);
            camera.set_zoom(zoom + self.last_distance * step);
        } else {
            self.last_distance = 0.0;
        }
    }
}

/// Zooms by the scroll axis each frame, within bounds.
#[derive(Debug, Clone)]
pub struct ScrollZoom {
    config: ScrollZoomConfig,
}

impl ScrollZoom {
    pub fn new(config: ScrollZoomConfig) -> Self {
        Self { config }
    }
}

impl Default for ScrollZoom {
    fn default() -> Self {
        Self::new(ScrollZoomConfig::default())
    }
}

impl CameraBehaviour for ScrollZoom {
    fn name(&self) -> &'static str {
        "scroll_zoom"
    }

    fn late_update(&mut self, camera: &mut CameraController, _scene: &FocusScene, frame: &Frame<'_>) {
        let scroll = frame.input.axis(&self.config.axis);
        camera.set_zoom(clamp_lenient(
            camera.zoom() - scroll,
            self.config.minimum_zoom,
            self.config.maximum_zoom,
        ));
    }
}

/// Scroll zoom that eases towards the scrolled-to zoom.
#[derive(Debug, Clone)]
pub struct SmoothScrollZoom {
    config: SmoothScrollZoomConfig,
    /// Target zoom; taken from the camera on the first frame.
    desired: Option<f64>,
}

impl SmoothScrollZoom {
    pub fn new(config: SmoothScrollZoomConfig) -> Self {
        Self {
            config,
            desired: None,
        }
    }

    pub fn desired_zoom(&self) -> Option<f64> {
        self.desired
    }
}

impl Default for SmoothScrollZoom {
    fn default() -> Self {
        Self::new(SmoothScrollZoomConfig::default())
    }
}

impl CameraBehaviour for SmoothScrollZoom {
    fn name(&self) -> &'static str {
        "smooth_scroll_zoom"
    }

    fn late_update(&mut self, camera: &mut CameraController, _scene: &FocusScene, frame: &Frame<'_>) {
        let scroll = frame.input.axis(&self.config.axis);
        let current = self.desired.unwrap_or_else(|| camera.zoom());
        let desired = clamp_lenient(
            current - scroll,
            self.config.minimum_zoom,
            self.config.maximum_zoom,
        );
        self.desired = Some(desired);

        let difference = desired - camera.zoom();
        if difference.abs() > SCROLL_ZOOM_THRESHOLD {
            camera.set_zoom(camera.zoom() + difference * self.config.speed * frame.delta_secs());
        }
    }
}
