//! Named timer records (runtime state)
//!
//! A `Timer` is one countdown living in the registry under a `TimerKey`.
//!
//! # Lifecycle
//!
//! 1. `set` creates the timer (or re-arms an existing one)
//! 2. Each tick decrements `time_left` unless paused or its owner is inactive
//! 3. On reaching zero the completion callback fires once
//! 4. Looping timers re-arm; preserved timers stay inert; others are removed

use std::fmt;

use crate::ident::{OwnerId, TimerKey};
use crate::scheduler::Scheduler;

/// Completion callback. Receives the scheduler so it can arm, cancel or
/// query other timers.
pub type CompleteFn = Box<dyn FnMut(&mut Scheduler)>;

/// Progress callback: `(time_left, duration)`, called every tick until completion
pub type TickFn = Box<dyn FnMut(f32, f32)>;

/// Outcome of `Scheduler::set_timer`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetTimerResult {
    /// No timer existed under the key
    NewTimer,
    /// Existing timer re-armed, callback kept
    TimeLeftChanged,
    /// Existing timer re-armed and its completion callback replaced
    CallbackReplaced,
}

/// Options for creating or re-arming a timer.
///
/// Built with chained setters:
///
/// ```ignore
/// TimerOptions::default().looping(2).unscaled().on_complete(|s| { ... })
/// ```
#[derive(Default)]
pub struct TimerOptions {
    /// Repeat forever after each completion
    pub loop_forever: bool,
    /// Extra runs after the first completion
    pub loops: u32,
    /// Count down on the unscaled (real time) channel
    pub unscaled: bool,
    /// Keep the timer (at zero, inert) after it completes
    pub preserve: bool,
    /// Create the timer paused
    pub paused: bool,
    /// Display name for debug output
    pub name: Option<String>,
    /// Skip binding to the owner in owner-scoped `set_on*` calls
    pub no_auto_bind: bool,
    pub on_complete: Option<CompleteFn>,
    pub on_tick: Option<TickFn>,
}

impl TimerOptions {
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn looping(mut self, loops: u32) -> Self {
        self.loops = loops;
        self
    }

    pub fn loop_forever(mut self) -> Self {
        self.loop_forever = true;
        self
    }

    pub fn unscaled(mut self) -> Self {
        self.unscaled = true;
        self
    }

    pub fn preserve(mut self) -> Self {
        self.preserve = true;
        self
    }

    pub fn paused(mut self) -> Self {
        self.paused = true;
        self
    }

    pub fn no_auto_bind(mut self) -> Self {
        self.no_auto_bind = true;
        self
    }

    pub fn on_complete(mut self, f: impl FnMut(&mut Scheduler) + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    pub fn on_tick(mut self, f: impl FnMut(f32, f32) + 'static) -> Self {
        self.on_tick = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for TimerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerOptions")
            .field("loop_forever", &self.loop_forever)
            .field("loops", &self.loops)
            .field("unscaled", &self.unscaled)
            .field("preserve", &self.preserve)
            .field("paused", &self.paused)
            .field("name", &self.name)
            .field("no_auto_bind", &self.no_auto_bind)
            .field("on_complete", &self.on_complete.is_some())
            .field("on_tick", &self.on_tick.is_some())
            .finish()
    }
}

/// Association of a timer with an owning entity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnerBinding {
    pub auto_bind_disabled: bool,
    /// Bound owner handle. Never keeps the owner alive.
    pub owner: Option<OwnerId>,
}

impl OwnerBinding {
    pub fn is_bound(&self) -> bool {
        self.owner.is_some()
    }
}

/// Identifies one arming of one timer record.
///
/// `serial` changes when the record is replaced, `generation` when it is re-armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Arming {
    pub serial: u64,
    pub generation: u64,
}

/// A named countdown
pub struct Timer {
    pub(crate) key: TimerKey,
    pub(crate) time_left: f32,
    pub(crate) duration: f32,

    // ─── Options ────────────────────────────────────────────────────────────
    pub(crate) loop_forever: bool,
    pub(crate) loops_remaining: u32,
    pub(crate) unscaled: bool,
    pub(crate) preserve: bool,
    pub(crate) paused: bool,
    pub(crate) name: String,
    pub(crate) binding: OwnerBinding,

    // ─── Callbacks ──────────────────────────────────────────────────────────
    pub(crate) on_complete: Option<CompleteFn>,
    pub(crate) on_tick: Option<TickFn>,
    /// Set when the current completion has fired; cleared on re-arm or loop
    pub(crate) fired: bool,

    pub(crate) arming: Arming,
}

impl Timer {
    pub(crate) fn new(key: TimerKey, duration: f32, options: TimerOptions, serial: u64) -> Self {
        Self {
            key,
            time_left: duration,
            duration,
            loop_forever: options.loop_forever,
            loops_remaining: options.loops,
            unscaled: options.unscaled,
            preserve: options.preserve,
            paused: options.paused,
            name: options.name.unwrap_or_default(),
            binding: OwnerBinding {
                auto_bind_disabled: options.no_auto_bind,
                owner: None,
            },
            on_complete: options.on_complete,
            on_tick: options.on_tick,
            fired: false,
            arming: Arming {
                serial,
                generation: 0,
            },
        }
    }

    pub fn key(&self) -> TimerKey {
        self.key
    }

    /// Seconds remaining, never negative
    pub fn time_left(&self) -> f32 {
        self.time_left.max(0.0)
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_looping(&self) -> bool {
        self.loop_forever || self.loops_remaining > 0
    }

    pub fn loops_forever(&self) -> bool {
        self.loop_forever
    }

    pub fn loops_remaining(&self) -> u32 {
        self.loops_remaining
    }

    pub fn is_unscaled(&self) -> bool {
        self.unscaled
    }

    pub fn is_preserved(&self) -> bool {
        self.preserve
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn binding(&self) -> OwnerBinding {
        self.binding
    }

    /// Has the current countdown completed (and not been re-armed)?
    pub fn has_fired(&self) -> bool {
        self.fired
    }

    pub fn has_on_complete(&self) -> bool {
        self.on_complete.is_some()
    }

    /// Restart the countdown from `duration`
    pub(crate) fn rearm(&mut self, duration: f32) {
        self.time_left = duration;
        self.duration = duration;
        self.fired = false;
        self.arming.generation += 1;
    }
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("time_left", &self.time_left)
            .field("duration", &self.duration)
            .field("loop_forever", &self.loop_forever)
            .field("loops_remaining", &self.loops_remaining)
            .field("unscaled", &self.unscaled)
            .field("preserve", &self.preserve)
            .field("paused", &self.paused)
            .field("binding", &self.binding)
            .field("fired", &self.fired)
            .finish_non_exhaustive()
    }
}
