//! Frame clock
//!
//! The scheduler consumes one `FrameTime` per tick. Where it comes from is
//! up to the host: a wall clock for real-time loops, a fixed step for
//! deterministic simulation, or an engine's own delta values via
//! `Scheduler::advance`.

use std::time::Instant;

use horologe_types::SchedulerConfig;

/// Elapsed time for one frame, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Game time: affected by time scale (0 while the game is paused)
    pub scaled: f32,
    /// Real time: ignores time scale
    pub unscaled: f32,
}

impl FrameTime {
    pub const ZERO: FrameTime = FrameTime {
        scaled: 0.0,
        unscaled: 0.0,
    };

    pub fn new(scaled: f32, unscaled: f32) -> Self {
        Self { scaled, unscaled }
    }

    /// Same delta on both channels (time scale 1)
    pub fn uniform(dt: f32) -> Self {
        Self::new(dt, dt)
    }

    /// Delta for a timer running on the given channel
    pub fn delta(&self, unscaled: bool) -> f32 {
        if unscaled { self.unscaled } else { self.scaled }
    }
}

/// Source of per-frame deltas for `Scheduler::tick`
pub trait FrameClock {
    /// Elapsed time since the previous call
    fn next_frame(&mut self) -> FrameTime;

    /// Change the multiplier applied to the scaled channel
    fn set_time_scale(&mut self, _scale: f32) {}

    /// Restart measurement from now (e.g. after the loop was suspended)
    fn reset(&mut self) {}
}

/// Measures real elapsed time between frames.
#[derive(Debug, Clone)]
pub struct WallClock {
    last: Instant,
    time_scale: f32,
    max_delta: f32,
}

impl WallClock {
    pub fn new(time_scale: f32, max_delta: f32) -> Self {
        Self {
            last: Instant::now(),
            time_scale: time_scale.max(0.0),
            max_delta: max_delta.max(0.0),
        }
    }

    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::new(config.time_scale, config.max_frame_delta_secs)
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::from_config(&SchedulerConfig::default())
    }
}

impl FrameClock for WallClock {
    fn next_frame(&mut self) -> FrameTime {
        let now = Instant::now();
        let raw = now.duration_since(self.last).as_secs_f32();
        self.last = now;

        let unscaled = raw.min(self.max_delta);
        FrameTime::new(unscaled * self.time_scale, unscaled)
    }

    fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    fn reset(&mut self) {
        self.last = Instant::now();
    }
}

/// Returns the same step every frame.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    step: FrameTime,
}

impl FixedClock {
    pub fn new(step: FrameTime) -> Self {
        Self { step }
    }

    pub fn uniform(dt: f32) -> Self {
        Self::new(FrameTime::uniform(dt))
    }
}

impl FrameClock for FixedClock {
    fn next_frame(&mut self) -> FrameTime {
        self.step
    }

    fn set_time_scale(&mut self, scale: f32) {
        self.step.scaled = self.step.unscaled * scale.max(0.0);
    }
}
