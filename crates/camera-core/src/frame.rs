//! Per-frame context handed to focus updates and camera behaviours.

use eyeframe_common::clock::{FrameTick, FrameTime};

use crate::input::InputSource;

/// Everything a frame step may read: timing and input.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    pub time: FrameTime,
    pub input: &'a dyn InputSource,
}

impl<'a> Frame<'a> {
    pub fn new(time: FrameTime, input: &'a dyn InputSource) -> Self {
        Self { time, input }
    }

    pub fn tick(&self) -> FrameTick {
        self.time.tick
    }

    /// Scaled seconds since the previous frame.
    pub fn delta_secs(&self) -> f64 {
        self.time.delta_secs
    }

    /// Real seconds since the previous frame.
    pub fn unscaled_delta_secs(&self) -> f64 {
        self.time.unscaled_delta_secs
    }
}
