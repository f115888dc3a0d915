//! Eyeframe Common Utilities
//!
//! Shared infrastructure for all Eyeframe crates:
//! - Error types and result aliases
//! - Frame clock used to gate per-frame caches and scale motion
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
