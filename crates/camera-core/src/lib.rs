//! Eyeframe Camera Core: the framing runtime
//!
//! Drives an orthographic 2D camera from weighted points of interest:
//! - **Focus:** Point-of-interest sources polled once per frame
//! - **Aggregator:** Folds enabled focuses into the padded "action rect"
//! - **Rail:** Piecewise cubic Bezier curves with nearest-point projection
//! - **Controller:** Camera position/zoom clamped to the camera limits
//! - **Behaviours:** Follow, zoom-to-fit, scroll zoom, and shake
//! - **Rig:** Frame loop running focus updates before camera behaviours
//!
//! This crate is pure computation with no rendering, physics or I/O.
//! The host supplies a frame clock and input; it reads back camera state.

pub mod aggregator;
pub mod behaviour;
pub mod controller;
pub mod focus;
pub mod frame;
pub mod input;
pub mod parallax;
pub mod rail;
pub mod rail_focus;
pub mod rig;
pub mod trigger;

pub use aggregator::{compute_action_rect, influenced_point, ActionRectCache};
pub use controller::CameraController;
pub use focus::{Focus, FocusId, FocusKind, FocusPoint, FocusScene};
pub use frame::Frame;
pub use input::{InputSource, StaticInput};
pub use rail::BezierRail;
pub use rig::{CameraId, CameraRig, CameraState, RigCamera};
