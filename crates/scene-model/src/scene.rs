//! Serializable scene description.
//!
//! A scene file (`scene.json`) declares focuses, cameras, and the
//! behaviours driving each camera. The camera runtime builds a live rig
//! from it; tools validate and simulate it.

use std::collections::HashSet;
use std::path::Path;

use eyeframe_common::error::{EyeframeError, EyeframeResult};
use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;
use crate::limits::CameraLimits;

/// Current scene schema version.
pub const SCENE_SCHEMA_VERSION: &str = "1.0";

/// Top-level scene file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneFile {
    /// Schema version.
    #[serde(default = "default_version")]
    pub version: String,

    /// Points of interest, referenced by name.
    #[serde(default)]
    pub focuses: Vec<FocusSpec>,

    /// Cameras and their behaviours.
    #[serde(default)]
    pub cameras: Vec<CameraSpec>,
}

/// A camera in the scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSpec {
    pub name: String,

    /// Initial position (clamped into limits on load).
    #[serde(default)]
    pub position: Point2D,

    /// Orthographic half-height. Falls back to the configured default.
    #[serde(default)]
    pub zoom: Option<f64>,

    /// Viewport width / height.
    #[serde(default)]
    pub aspect: Option<f64>,

    #[serde(default)]
    pub limits: Option<CameraLimits>,

    /// Space added to the action rect on all sides.
    #[serde(default)]
    pub padding: Option<f64>,

    /// Names of the focuses framed by this camera.
    #[serde(default)]
    pub focuses: Vec<String>,

    /// Behaviours run each frame, in order.
    #[serde(default)]
    pub behaviours: Vec<BehaviourSpec>,
}

/// A point of interest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusSpec {
    pub name: String,

    #[serde(default)]
    pub position: Point2D,

    /// Per-axis weight in `[0, 1]` of the focus' offset from the camera.
    #[serde(default = "default_influence")]
    pub influence: Point2D,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Scripted constant velocity applied during simulation. For `body`
    /// focuses it is also the reported physics velocity.
    #[serde(default)]
    pub velocity: Point2D,

    #[serde(flatten)]
    pub kind: FocusKindSpec,
}

/// How a focus derives its point each frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FocusKindSpec {
    /// Position plus a fixed offset.
    Transform {
        #[serde(default)]
        offset: Point2D,
    },

    /// Leads the focus point in the direction of measured movement.
    Moving {
        #[serde(default)]
        offset: Point2D,
        #[serde(default = "default_velocity_to_offset")]
        velocity_to_offset: Point2D,
    },

    /// Leads the focus point using a physics velocity.
    Body {
        #[serde(default)]
        offset: Point2D,
        #[serde(default = "default_velocity_to_offset")]
        velocity_to_offset: Point2D,
    },

    /// World-space cursor moved by input axes, optionally leashed to its
    /// starting position.
    Cursor {
        #[serde(default = "default_sensitivity")]
        sensitivity: f64,
        #[serde(default)]
        leash: Option<f64>,
    },

    /// Looks towards the screen cursor once it leaves a central dead zone.
    ViewportCursor {
        #[serde(default = "default_cursor_threshold")]
        threshold: f64,
    },

    /// Travels along a rail over a fixed duration.
    TimedRail {
        rail: RailSpec,
        #[serde(default = "default_time_to_finish")]
        time_to_finish: f64,
        #[serde(default)]
        looping: bool,
        #[serde(default)]
        progress: f64,
    },

    /// Projects another focus onto a rail.
    FollowRail {
        rail: RailSpec,
        #[serde(default)]
        follows: Option<String>,
        #[serde(default)]
        axis: RailAxis,
    },
}

/// Control points of a rail in local space, plus the local origin in
/// world space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RailSpec {
    pub points: Vec<Point2D>,
    #[serde(default)]
    pub origin: Point2D,
}

/// Which coordinates a follow rail uses to project the followed focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RailAxis {
    /// Nearest point in the plane.
    #[default]
    Both,
    /// Match the followed focus' x coordinate only.
    X,
    /// Match the followed focus' y coordinate only.
    Y,
}

/// Camera behaviour with its configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BehaviourSpec {
    FixedFollow,
    SmoothFollow(SmoothFollowConfig),
    ZoomToFit(ZoomToFitConfig),
    ScrollZoom(ScrollZoomConfig),
    SmoothScrollZoom(SmoothScrollZoomConfig),
    Shake(ShakeConfig),
}

/// Smooth follow tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothFollowConfig {
    /// Fraction of the remaining offset covered per second, per axis.
    pub speed: Point2D,
    /// Offset from the action centre tolerated before moving. The x value
    /// is multiplied by the aspect ratio.
    pub still_threshold: Point2D,
    /// Speed above which the camera keeps moving even inside the still zone.
    pub moving_threshold: Point2D,
}

impl Default for SmoothFollowConfig {
    fn default() -> Self {
        Self {
            speed: Point2D::new(2.0, 2.0),
            still_threshold: Point2D::new(3.0, 5.0),
            moving_threshold: Point2D::new(3.0, 5.0),
        }
    }
}

/// Zoom-to-fit tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomToFitConfig {
    pub speed: f64,
    /// Zoom difference tolerated before adjusting.
    pub still_threshold: f64,
    /// Zoom never goes below this while fitting.
    pub minimum_zoom: f64,
}

impl Default for ZoomToFitConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            still_threshold: 3.0,
            minimum_zoom: 5.0,
        }
    }
}

/// Scroll zoom tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollZoomConfig {
    pub minimum_zoom: f64,
    pub maximum_zoom: f64,
    /// Input axis providing the scroll delta.
    pub axis: String,
}

impl Default for ScrollZoomConfig {
    fn default() -> Self {
        Self {
            minimum_zoom: 5.0,
            maximum_zoom: 20.0,
            axis: "scroll".to_string(),
        }
    }
}

/// Smooth scroll zoom tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothScrollZoomConfig {
    pub minimum_zoom: f64,
    pub maximum_zoom: f64,
    pub axis: String,
    /// Fraction of the remaining zoom difference covered per second.
    pub speed: f64,
}

impl Default for SmoothScrollZoomConfig {
    fn default() -> Self {
        let scroll = ScrollZoomConfig::default();
        Self {
            minimum_zoom: scroll.minimum_zoom,
            maximum_zoom: scroll.maximum_zoom,
            axis: scroll.axis,
            speed: 1.0,
        }
    }
}

/// Camera shake tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    /// Impacts weaker than this don't shake.
    pub min_force: f64,
    /// Shake magnitude per unit of force above `min_force`.
    pub base_amount: f64,
    /// Shake duration (seconds) per unit of force above `min_force`.
    pub base_time: f64,
    /// RNG seed for reproducible jitter. Random when absent.
    pub seed: Option<u64>,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            min_force: 30.0,
            base_amount: 0.01,
            base_time: 0.004,
            seed: None,
        }
    }
}

/// Severity of a scene validation finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    /// The scene loads but something gets repaired or ignored.
    Warning,
    /// The scene cannot be loaded.
    Error,
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneIssue {
    pub severity: IssueSeverity,
    pub message: String,
}

impl SceneIssue {
    fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            message: message.into(),
        }
    }
}

impl SceneFile {
    /// Parse a scene from JSON.
    pub fn parse(json: &str) -> EyeframeResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a scene file from disk.
    pub fn load(path: &Path) -> EyeframeResult<Self> {
        if !path.exists() {
            return Err(EyeframeError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Look up a focus by name.
    pub fn focus(&self, name: &str) -> Option<&FocusSpec> {
        self.focuses.iter().find(|f| f.name == name)
    }

    /// Check the scene for problems.
    pub fn validate(&self) -> Vec<SceneIssue> {
        let mut issues = Vec::new();

        if self.version != SCENE_SCHEMA_VERSION {
            issues.push(SceneIssue::warning(format!(
                "scene version {} differs from supported {}",
                self.version, SCENE_SCHEMA_VERSION
            )));
        }

        let mut names = HashSet::new();
        for focus in &self.focuses {
            if !names.insert(focus.name.as_str()) {
                issues.push(SceneIssue::error(format!(
                    "duplicate focus name '{}'",
                    focus.name
                )));
            }
            if !(0.0..=1.0).contains(&focus.influence.x)
                || !(0.0..=1.0).contains(&focus.influence.y)
            {
                issues.push(SceneIssue::warning(format!(
                    "focus '{}' influence {:?} outside [0, 1]",
                    focus.name, focus.influence
                )));
            }
            match &focus.kind {
                FocusKindSpec::TimedRail { rail, .. } => {
                    check_rail(&focus.name, rail, &mut issues);
                }
                FocusKindSpec::FollowRail { rail, follows, .. } => {
                    check_rail(&focus.name, rail, &mut issues);
                    match follows {
                        Some(target) if target == &focus.name => {
                            issues.push(SceneIssue::error(format!(
                                "focus '{}' follows itself",
                                focus.name
                            )));
                        }
                        Some(target) if self.focus(target).is_none() => {
                            issues.push(SceneIssue::error(format!(
                                "focus '{}' follows unknown focus '{}'",
                                focus.name, target
                            )));
                        }
                        None => issues.push(SceneIssue::warning(format!(
                            "follow rail '{}' has no followed focus",
                            focus.name
                        ))),
                        _ => {}
                    }
                }
                _ => {}
            }
        }

        let mut camera_names = HashSet::new();
        for camera in &self.cameras {
            if !camera_names.insert(camera.name.as_str()) {
                issues.push(SceneIssue::error(format!(
                    "duplicate camera name '{}'",
                    camera.name
                )));
            }
            if camera.zoom.is_some_and(|z| z <= 0.0) {
                issues.push(SceneIssue::error(format!(
                    "camera '{}' zoom must be positive",
                    camera.name
                )));
            }
            if camera.aspect.is_some_and(|a| a <= 0.0) {
                issues.push(SceneIssue::error(format!(
                    "camera '{}' aspect must be positive",
                    camera.name
                )));
            }
            for name in &camera.focuses {
                if self.focus(name).is_none() {
                    issues.push(SceneIssue::error(format!(
                        "camera '{}' references unknown focus '{}'",
                        camera.name, name
                    )));
                }
            }
            if camera.focuses.is_empty() {
                issues.push(SceneIssue::warning(format!(
                    "camera '{}' tracks no focuses",
                    camera.name
                )));
            }
        }

        issues
    }

    /// Whether validation found any errors.
    pub fn has_errors(&self) -> bool {
        self.validate()
            .iter()
            .any(|i| i.severity == IssueSeverity::Error)
    }
}

fn check_rail(focus: &str, rail: &RailSpec, issues: &mut Vec<SceneIssue>) {
    let count = rail.points.len();
    if count < 4 || (count - 1) % 3 != 0 {
        issues.push(SceneIssue::warning(format!(
            "rail of focus '{}' has {} points; it will be padded to 3k+1",
            focus, count
        )));
    }
}

fn default_version() -> String {
    SCENE_SCHEMA_VERSION.to_string()
}

fn default_influence() -> Point2D {
    Point2D::ONE
}

fn default_true() -> bool {
    true
}

fn default_velocity_to_offset() -> Point2D {
    Point2D::new(0.6, 0.1)
}

fn default_sensitivity() -> f64 {
    1.0
}

fn default_cursor_threshold() -> f64 {
    0.4
}

fn default_time_to_finish() -> f64 {
    10.0
}
