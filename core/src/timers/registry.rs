//! Named timer registry
//!
//! Owns the key → `Timer` table and the per-timer half of the tick state
//! machine. Callback invocation lives in the scheduler, which needs to hand
//! itself to completion callbacks; the registry exposes the steps it drives.

use hashbrown::HashMap;

use crate::clock::FrameTime;
use crate::ident::{OwnerId, TimerKey};
use crate::owner::OwnerLiveness;

use super::active::{Arming, CompleteFn, SetTimerResult, Timer, TimerOptions};

/// Result of advancing one timer by one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Step {
    /// Key no longer present
    Missing,
    /// Bound owner was destroyed; purge at end of pass
    OwnerGone(Arming),
    /// Paused, or bound owner inactive
    Frozen,
    /// Zero delta on this timer's channel
    Idle,
    Advanced {
        arming: Arming,
        /// `(time_left, duration)` for the tick callback, if one should run
        report: Option<(f32, f32)>,
        /// Countdown reached zero this frame; completion callback due
        completed: bool,
    },
}

/// What happened to a timer after its completion callback ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Settle {
    /// Cancelled, replaced or re-armed from inside the callback
    Untouched,
    /// Restarted for another loop
    Looped,
    /// Preserved at zero
    Kept,
    /// Purge at end of pass
    Expired,
}

/// Key → timer table
#[derive(Debug, Default)]
pub struct TimerRegistry {
    timers: HashMap<TimerKey, Timer>,
    next_serial: u64,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_serial(&mut self) -> u64 {
        self.next_serial += 1;
        self.next_serial
    }

    /// Create a timer, or re-arm the existing one under `key`.
    ///
    /// Re-arming resets the countdown to `duration` and clears the fired flag.
    /// The stored completion callback is replaced only when `options`
    /// carries one; other options of an existing timer are left alone.
    pub fn set(&mut self, key: TimerKey, duration: f32, options: TimerOptions) -> SetTimerResult {
        let duration = sanitize_duration(key, duration);

        if let Some(timer) = self.timers.get_mut(&key) {
            timer.rearm(duration);
            if let Some(name) = options.name.filter(|_| timer.name.is_empty()) {
                timer.name = name;
            }
            if options.on_tick.is_some() {
                timer.on_tick = options.on_tick;
            }
            return match options.on_complete {
                Some(callback) => {
                    timer.on_complete = Some(callback);
                    SetTimerResult::CallbackReplaced
                }
                None => SetTimerResult::TimeLeftChanged,
            };
        }

        let serial = self.next_serial();
        let timer = Timer::new(key, duration, options, serial);
        tracing::debug!(%key, name = %timer.name, duration, "timer created");
        self.timers.insert(key, timer);
        SetTimerResult::NewTimer
    }

    /// Declare a preserved slot without arming it.
    ///
    /// The slot reports zero time left and stays inert until `set` re-arms
    /// it. Replaces any timer already under `key`.
    pub fn register(&mut self, key: TimerKey, options: TimerOptions) {
        let serial = self.next_serial();
        let mut timer = Timer::new(key, 1.0, options, serial);
        timer.time_left = 0.0;
        timer.preserve = true;
        timer.fired = true;
        self.timers.insert(key, timer);
    }

    /// Seconds remaining, 0 if absent
    pub fn time_left(&self, key: TimerKey) -> f32 {
        self.timers.get(&key).map_or(0.0, Timer::time_left)
    }

    pub fn get(&self, key: TimerKey) -> Option<&Timer> {
        self.timers.get(&key)
    }

    pub fn contains(&self, key: TimerKey) -> bool {
        self.timers.contains_key(&key)
    }

    /// Remove a timer. Returns whether one existed.
    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.timers.remove(&key).is_some()
    }

    /// Bind an existing timer to `owner`. Does not create the timer.
    pub fn bind(&mut self, owner: OwnerId, key: TimerKey) -> bool {
        match self.timers.get_mut(&key) {
            Some(timer) => {
                timer.binding.owner = Some(owner);
                true
            }
            None => false,
        }
    }

    /// Pause or resume an existing timer
    pub fn set_paused(&mut self, key: TimerKey, paused: bool) -> bool {
        match self.timers.get_mut(&key) {
            Some(timer) => {
                timer.paused = paused;
                true
            }
            None => false,
        }
    }

    /// Keys whose owner component is `owner`
    pub fn keys_for_owner(&self, owner: OwnerId) -> Vec<TimerKey> {
        let mut keys: Vec<_> = self
            .timers
            .keys()
            .filter(|key| key.owner() == Some(owner))
            .copied()
            .collect();
        keys.sort_unstable();
        keys
    }

    /// Remove every timer whose key belongs to `owner`. Returns the count.
    pub fn clear_owner(&mut self, owner: OwnerId) -> usize {
        let before = self.timers.len();
        self.timers.retain(|key, _| key.owner() != Some(owner));
        let removed = before - self.timers.len();
        if removed > 0 {
            tracing::debug!(%owner, removed, "cleared owner timers");
        }
        removed
    }

    /// Point-in-time list of all keys, sorted
    pub fn keys(&self) -> Vec<TimerKey> {
        let mut keys: Vec<_> = self.timers.keys().copied().collect();
        keys.sort_unstable();
        keys
    }

    pub fn iter(&self) -> impl Iterator<Item = &Timer> {
        self.timers.values()
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tick Steps (driven by Scheduler)
    // ─────────────────────────────────────────────────────────────────────────

    pub(crate) fn get_mut(&mut self, key: TimerKey) -> Option<&mut Timer> {
        self.timers.get_mut(&key)
    }

    /// Advance one timer by one frame.
    pub(crate) fn step(
        &mut self,
        key: TimerKey,
        frame: FrameTime,
        owners: &dyn OwnerLiveness,
    ) -> Step {
        let Some(timer) = self.timers.get_mut(&key) else {
            return Step::Missing;
        };

        if let Some(owner) = timer.binding.owner {
            if !owners.is_alive(owner) {
                return Step::OwnerGone(timer.arming);
            }
            if !owners.is_active(owner) {
                return Step::Frozen;
            }
        }

        if timer.paused {
            return Step::Frozen;
        }

        let dt = frame.delta(timer.unscaled);
        if dt <= 0.0 {
            return Step::Idle;
        }

        if timer.time_left > 0.0 {
            timer.time_left -= dt;
        }

        let report = (timer.on_tick.is_some() && !timer.fired)
            .then(|| (timer.time_left.max(0.0), timer.duration));

        let completed = timer.time_left <= 0.0 && !timer.fired;
        if completed {
            timer.time_left = 0.0;
            timer.fired = true;
        }

        Step::Advanced {
            arming: timer.arming,
            report,
            completed,
        }
    }

    /// Take the completion callback out for invocation
    pub(crate) fn take_on_complete(&mut self, key: TimerKey) -> Option<CompleteFn> {
        self.timers.get_mut(&key)?.on_complete.take()
    }

    /// Put a completion callback back after invocation.
    ///
    /// Dropped if the record was replaced or cancelled meanwhile, or if a
    /// new callback was installed from inside the old one.
    pub(crate) fn restore_on_complete(&mut self, key: TimerKey, arming: Arming, callback: CompleteFn) {
        if let Some(timer) = self.timers.get_mut(&key) {
            if timer.arming.serial == arming.serial && timer.on_complete.is_none() {
                timer.on_complete = Some(callback);
            }
        }
    }

    /// Apply loop / preserve / expire rules after a completion.
    pub(crate) fn settle(&mut self, key: TimerKey, arming: Arming) -> Settle {
        let Some(timer) = self.timers.get_mut(&key) else {
            return Settle::Untouched;
        };
        if timer.arming != arming {
            return Settle::Untouched;
        }

        if timer.loop_forever || timer.loops_remaining > 0 {
            if !timer.loop_forever {
                timer.loops_remaining -= 1;
            }
            timer.time_left = timer.duration;
            timer.fired = false;
            Settle::Looped
        } else if timer.preserve {
            Settle::Kept
        } else {
            Settle::Expired
        }
    }

    /// Remove `key` if it still holds the arming that was marked for removal
    pub(crate) fn purge(&mut self, key: TimerKey, arming: Arming) -> bool {
        let stale = self
            .timers
            .get(&key)
            .is_some_and(|timer| timer.arming == arming);
        if stale {
            self.timers.remove(&key);
        }
        stale
    }
}

fn sanitize_duration(key: TimerKey, duration: f32) -> f32 {
    if duration >= 0.0 {
        return duration;
    }
    tracing::warn!(%key, duration, "invalid timer duration, clamping to zero");
    0.0
}
