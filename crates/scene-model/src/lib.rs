//! Eyeframe Scene Model
//!
//! Defines the core data contracts shared by the camera runtime and tools:
//! - **Geometry:** 2D points/vectors and axis-aligned rectangles
//! - **Limits:** The region a camera is allowed to look at
//! - **Scene:** Serializable description of cameras, focuses, and behaviours
//!
//! All coordinates are world units with +y pointing up.

pub mod geometry;
pub mod limits;
pub mod scene;

pub use geometry::*;
pub use limits::*;
pub use scene::*;
