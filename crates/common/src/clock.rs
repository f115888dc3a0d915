//! Frame clock utilities.
//!
//! Every camera computation happens inside a frame. The clock supplies:
//! - A monotonically increasing frame tick (used to gate per-frame caches)
//! - Scaled delta time (gameplay motion, affected by slow-motion)
//! - Unscaled delta time (camera smoothing, unaffected by slow-motion)

use std::time::Instant;

/// Monotonic frame counter. Two reads within the same frame see the
/// same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FrameTick(pub u64);

impl FrameTick {
    /// The tick following this one.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Timing snapshot for a single frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    pub tick: FrameTick,
    /// Scaled seconds since the previous frame.
    pub delta_secs: f64,
    /// Real seconds since the previous frame.
    pub unscaled_delta_secs: f64,
    /// Scaled seconds since the clock started.
    pub time_secs: f64,
}

/// Source of per-frame timing.
pub trait FrameClock {
    /// Timing of the current frame.
    fn now(&self) -> FrameTime;

    fn tick(&self) -> FrameTick {
        self.now().tick
    }

    fn delta_secs(&self) -> f64 {
        self.now().delta_secs
    }

    fn unscaled_delta_secs(&self) -> f64 {
        self.now().unscaled_delta_secs
    }

    fn time_secs(&self) -> f64 {
        self.now().time_secs
    }
}

/// Deterministic clock stepped by the caller (simulation, tests).
#[derive(Debug, Clone)]
pub struct ManualClock {
    frame: FrameTime,
    step_secs: f64,
    time_scale: f64,
}

impl ManualClock {
    /// Create a clock that advances `1 / fps` seconds per step.
    pub fn new(fps: f64) -> Self {
        Self {
            frame: FrameTime {
                tick: FrameTick(0),
                delta_secs: 0.0,
                unscaled_delta_secs: 0.0,
                time_secs: 0.0,
            },
            step_secs: 1.0 / fps.max(1.0),
            time_scale: 1.0,
        }
    }

    /// Advance one frame at the configured rate.
    pub fn advance(&mut self) -> FrameTime {
        self.advance_by(self.step_secs)
    }

    /// Advance one frame that lasted `real_secs` of real time.
    pub fn advance_by(&mut self, real_secs: f64) -> FrameTime {
        let real_secs = real_secs.max(0.0);
        let scaled = real_secs * self.time_scale;
        self.frame = FrameTime {
            tick: self.frame.tick.next(),
            delta_secs: scaled,
            unscaled_delta_secs: real_secs,
            time_secs: self.frame.time_secs + scaled,
        };
        self.frame
    }

    /// Scale applied to gameplay time (1.0 = realtime, 0.0 = paused).
    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = scale.max(0.0);
    }

    pub fn step_secs(&self) -> f64 {
        self.step_secs
    }
}

impl FrameClock for ManualClock {
    fn now(&self) -> FrameTime {
        self.frame
    }
}

/// Wall-clock driven frame clock.
#[derive(Debug, Clone)]
pub struct RealtimeClock {
    epoch: Instant,
    /// Wall-clock time at epoch (ISO 8601 string).
    epoch_wall: String,
    last_frame: Instant,
    frame: FrameTime,
    time_scale: f64,
}

impl RealtimeClock {
    /// Create a new clock anchored to now.
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            epoch: now,
            epoch_wall: chrono::Utc::now().to_rfc3339(),
            last_frame: now,
            frame: FrameTime {
                tick: FrameTick(0),
                delta_secs: 0.0,
                unscaled_delta_secs: 0.0,
                time_secs: 0.0,
            },
            time_scale: 1.0,
        }
    }

    /// Mark the start of a new frame.
    pub fn begin_frame(&mut self) -> FrameTime {
        let now = Instant::now();
        let real_secs = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;
        let scaled = real_secs * self.time_scale;
        self.frame = FrameTime {
            tick: self.frame.tick.next(),
            delta_secs: scaled,
            unscaled_delta_secs: real_secs,
            time_secs: self.frame.time_secs + scaled,
        };
        self.frame
    }

    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = scale.max(0.0);
    }

    /// Real seconds elapsed since the clock started.
    pub fn elapsed_secs(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    /// Wall-clock time at clock start.
    pub fn epoch_wall(&self) -> &str {
        &self.epoch_wall
    }
}

impl FrameClock for RealtimeClock {
    fn now(&self) -> FrameTime {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_steps() {
        let mut clock = ManualClock::new(60.0);
        assert_eq!(clock.tick(), FrameTick(0));

        let frame = clock.advance();
        assert_eq!(frame.tick, FrameTick(1));
        assert!((frame.delta_secs - 1.0 / 60.0).abs() < 1e-12);
        assert!((clock.time_secs() - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_time_scale_only_affects_scaled_time() {
        let mut clock = ManualClock::new(10.0);
        clock.set_time_scale(0.5);
        let frame = clock.advance();
        assert!((frame.delta_secs - 0.05).abs() < 1e-12);
        assert!((frame.unscaled_delta_secs - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_realtime_clock_ticks() {
        let mut clock = RealtimeClock::start();
        let first = clock.begin_frame();
        let second = clock.begin_frame();
        assert_eq!(first.tick, FrameTick(1));
        assert_eq!(second.tick, FrameTick(2));
        assert!(second.unscaled_delta_secs >= 0.0);
        assert!(!clock.epoch_wall().is_empty());
    }
}
