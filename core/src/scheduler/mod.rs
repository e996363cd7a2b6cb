//! Tick driver
//!
//! `Scheduler` owns the three timer tables and advances them once per frame:
//!
//! ```text
//!            tick() / advance(frame)
//!                      │
//!      ┌───────────────┼────────────────┐
//!      ▼               ▼                ▼
//!  named timers   nameless timers   chronometer decay
//!  (registry)     (one-shot set)    (lapse untriggered)
//! ```
//!
//! There is one scheduler per process (or per world), created at startup
//! and passed by reference to whatever drives the frame loop. All calls,
//! including ticking, happen on one thread.
//!
//! Callbacks receive `&mut Scheduler` and may freely arm, cancel or query
//! timers. Each pass iterates a snapshot of keys taken at its start and
//! defers removals to the end of the pass, so changes made by a callback
//! never invalidate the iteration.

mod owned;
mod snapshot;


use std::fmt;

use horologe_types::SchedulerConfig;

use crate::callback::{CallbackError, FailureSink, LogFailures, guard};
use crate::chronometer::Chronometers;
use crate::clock::{FrameClock, FrameTime, WallClock};
use crate::ident::{OwnerId, TimerKey};
use crate::nameless::NamelessTimers;
use crate::owner::OwnerLiveness;
use crate::timers::registry::{Settle, Step};
use crate::timers::{Arming, SetTimerResult, Timer, TimerOptions, TimerRegistry};

/// Named timers, nameless timers and chronometers, advanced together.
pub struct Scheduler {
    timers: TimerRegistry,
    nameless: NamelessTimers,
    chronometers: Chronometers,

    clock: Box<dyn FrameClock>,
    failures: Box<dyn FailureSink>,

    /// Frame most recently processed
    frame: FrameTime,
    frame_count: u64,
    ticking: bool,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(WallClock::default())
    }
}

impl Scheduler {
    pub fn new(clock: impl FrameClock + 'static) -> Self {
        Self {
            timers: TimerRegistry::new(),
            nameless: NamelessTimers::new(),
            chronometers: Chronometers::new(),
            clock: Box::new(clock),
            failures: Box::new(LogFailures),
            frame: FrameTime::ZERO,
            frame_count: 0,
            ticking: false,
        }
    }

    /// Wall-clock scheduler using the configured time scale and delta clamp
    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::new(WallClock::from_config(config))
    }

    /// Replace the sink that receives callback failures
    pub fn with_failure_sink(mut self, sink: impl FailureSink + 'static) -> Self {
        self.failures = Box::new(sink);
        self
    }

    pub fn set_failure_sink(&mut self, sink: impl FailureSink + 'static) {
        self.failures = Box::new(sink);
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.clock.set_time_scale(scale);
    }

    /// Restart the clock's measurement, so the next `tick` does not see the idle gap
    pub fn reset_clock(&mut self) {
        self.clock.reset();
    }

    pub fn last_frame(&self) -> FrameTime {
        self.frame
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ticking
    // ─────────────────────────────────────────────────────────────────────────

    /// Advance everything by the clock's next frame. Call exactly once per frame.
    pub fn tick(&mut self, owners: &dyn OwnerLiveness) {
        let frame = self.clock.next_frame();
        self.advance(frame, owners);
    }

    /// Advance everything by an explicit frame delta.
    pub fn advance(&mut self, frame: FrameTime, owners: &dyn OwnerLiveness) {
        if self.ticking {
            tracing::warn!("scheduler advanced from inside a callback, ignoring");
            return;
        }
        self.ticking = true;
        self.frame = frame;
        self.frame_count += 1;

        self.tick_timers(frame, owners);
        self.tick_nameless(frame.scaled);
        self.chronometers.decay(frame.scaled);

        self.ticking = false;
    }

    fn tick_timers(&mut self, frame: FrameTime, owners: &dyn OwnerLiveness) {
        let keys = self.timers.keys();
        let mut expired: Vec<(TimerKey, Arming)> = Vec::new();

        for key in keys {
            match self.timers.step(key, frame, owners) {
                Step::Missing | Step::Frozen | Step::Idle => {}
                Step::OwnerGone(arming) => {
                    tracing::debug!(%key, "owner destroyed, dropping timer");
                    expired.push((key, arming));
                }
                Step::Advanced {
                    arming,
                    report,
                    completed,
                } => {
                    if let Some((time_left, duration)) = report {
                        self.run_on_tick(key, time_left, duration);
                    }
                    if completed {
                        self.run_on_complete(key, arming);
                        if self.timers.settle(key, arming) == Settle::Expired {
                            expired.push((key, arming));
                        }
                    }
                }
            }
        }

        for (key, arming) in expired {
            self.timers.purge(key, arming);
        }
    }

    fn run_on_tick(&mut self, key: TimerKey, time_left: f32, duration: f32) {
        let Some(timer) = self.timers.get_mut(key) else {
            return;
        };
        let Some(callback) = timer.on_tick.as_mut() else {
            return;
        };
        if let Err(message) = guard(|| callback(time_left, duration)) {
            let error = CallbackError::Tick {
                key,
                name: timer.name.clone(),
                message,
            };
            self.failures.report(&error);
        }
    }

    fn run_on_complete(&mut self, key: TimerKey, arming: Arming) {
        let Some(mut callback) = self.timers.take_on_complete(key) else {
            return;
        };
        let name = self
            .timers
            .get(key)
            .map(|t| t.name.clone())
            .unwrap_or_default();

        if let Err(message) = guard(|| callback(&mut *self)) {
            let error = CallbackError::Completion { key, name, message };
            self.failures.report(&error);
        }
        self.timers.restore_on_complete(key, arming, callback);
    }

    fn tick_nameless(&mut self, dt: f32) {
        let due = self.nameless.advance(dt);
        for id in due {
            let Some(callback) = self.nameless.take_callback(id) else {
                continue;
            };
            if let Err(message) = guard(|| callback(&mut *self)) {
                self.failures.report(&CallbackError::Nameless { message });
            }
        }
        self.nameless.sweep();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Named Timers
    // ─────────────────────────────────────────────────────────────────────────

    /// Create or re-arm the timer under `key`
    pub fn set_timer(&mut self, key: TimerKey, duration: f32, options: TimerOptions) -> SetTimerResult {
        self.timers.set(key, duration, options)
    }

    /// Declare an inert, preserved slot to be armed later with `set_timer`
    pub fn register(&mut self, key: TimerKey, options: TimerOptions) {
        self.timers.register(key, options);
    }

    /// Seconds remaining, 0 if absent
    pub fn time_left(&self, key: TimerKey) -> f32 {
        self.timers.time_left(key)
    }

    /// Read-only view of a timer
    pub fn timer(&self, key: TimerKey) -> Option<&Timer> {
        self.timers.get(key)
    }

    pub fn has_timer(&self, key: TimerKey) -> bool {
        self.timers.contains(key)
    }

    /// Remove a timer immediately. Returns whether one existed.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.timers.cancel(key)
    }

    /// Bind an existing timer to `owner`
    pub fn bind(&mut self, owner: OwnerId, key: TimerKey) -> bool {
        self.timers.bind(owner, key)
    }

    /// Remove every timer keyed under `owner`. Returns the count.
    pub fn clear_owner(&mut self, owner: OwnerId) -> usize {
        self.timers.clear_owner(owner)
    }

    pub fn set_paused(&mut self, key: TimerKey, paused: bool) -> bool {
        self.timers.set_paused(key, paused)
    }

    /// Sorted snapshot of current timer keys
    pub fn keys(&self) -> Vec<TimerKey> {
        self.timers.keys()
    }

    pub fn timers(&self) -> &TimerRegistry {
        &self.timers
    }

    /// Remove every named timer, leaving nameless timers and chronometers
    pub fn clear_all(&mut self) {
        self.timers.clear();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Nameless Timers & Chronometers
    // ─────────────────────────────────────────────────────────────────────────

    /// Run `callback` once, `delay` seconds of scaled time from now
    pub fn add_nameless(&mut self, delay: f32, callback: impl FnOnce(&mut Scheduler) + 'static) {
        self.nameless.add(delay, Box::new(callback));
    }

    pub fn nameless_len(&self) -> usize {
        self.nameless.len()
    }

    pub fn clear_nameless(&mut self) {
        self.nameless.clear();
    }

    /// Report that the condition behind `key` holds this frame.
    ///
    /// Returns `true` once, on the frame the condition has been held for
    /// longer than `target` seconds.
    pub fn trigger_chronometer(&mut self, key: TimerKey, target: f32) -> bool {
        self.chronometers.trigger(key, target)
    }

    pub fn chronometer_progress(&self, key: TimerKey) -> Option<f32> {
        self.chronometers.progress(key)
    }

    pub fn clear_chronometers(&mut self) {
        self.chronometers.clear();
    }

    /// Drop every timer, nameless timer and chronometer
    pub fn clear(&mut self) {
        tracing::debug!(
            timers = self.timers.len(),
            nameless = self.nameless.len(),
            chronometers = self.chronometers.len(),
            "clearing scheduler"
        );
        self.timers.clear();
        self.nameless.clear();
        self.chronometers.clear();
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("timers", &self.timers.len())
            .field("nameless", &self.nameless.len())
            .field("chronometers", &self.chronometers.len())
            .field("frame", &self.frame)
            .field("frame_count", &self.frame_count)
            .finish_non_exhaustive()
    }
}
