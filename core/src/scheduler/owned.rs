//! Name- and owner-scoped shortcuts
//!
//! Most callers address timers by name rather than raw key. Global names map
//! to `TimerKey::global`; owner-scoped names pack the owner id into the high
//! half of the key, so every timer an owner creates can be found and cleared
//! together.

use crate::ident::{OwnerId, TimerKey};
use crate::timers::{SetTimerResult, TimerOptions};

use super::Scheduler;

impl Scheduler {
    // ─── Global names ───────────────────────────────────────────────────────

    /// Create or re-arm a global timer addressed by name
    pub fn set_named(&mut self, name: &str, duration: f32, options: TimerOptions) -> SetTimerResult {
        self.set_timer(TimerKey::global(name), duration, options.named(name))
    }

    pub fn time_left_named(&self, name: &str) -> f32 {
        self.time_left(TimerKey::global(name))
    }

    pub fn cancel_named(&mut self, name: &str) -> bool {
        self.cancel(TimerKey::global(name))
    }

    pub fn register_named(&mut self, name: &str, options: TimerOptions) {
        self.register(TimerKey::global(name), options.named(name));
    }

    pub fn trigger_named(&mut self, name: &str, target: f32) -> bool {
        self.trigger_chronometer(TimerKey::global(name), target)
    }

    // ─── Owner-scoped names ─────────────────────────────────────────────────

    /// Create or re-arm a timer owned by `owner`.
    ///
    /// Binds the timer to the owner unless `options.no_auto_bind` is set, so
    /// it freezes while the owner is inactive and dies with it.
    pub fn set_on(
        &mut self,
        owner: OwnerId,
        name: &str,
        duration: f32,
        options: TimerOptions,
    ) -> SetTimerResult {
        self.set_on_key(owner, TimerKey::owned(owner, name), duration, options.named(name))
    }

    /// Same as [`Scheduler::set_on`] for a caller-chosen local id
    pub fn set_on_id(
        &mut self,
        owner: OwnerId,
        local_id: u32,
        duration: f32,
        options: TimerOptions,
    ) -> SetTimerResult {
        self.set_on_key(owner, TimerKey::owned_id(owner, local_id), duration, options)
    }

    fn set_on_key(
        &mut self,
        owner: OwnerId,
        key: TimerKey,
        duration: f32,
        options: TimerOptions,
    ) -> SetTimerResult {
        let auto_bind = !options.no_auto_bind;
        let result = self.set_timer(key, duration, options);
        if auto_bind {
            self.bind(owner, key);
        }
        result
    }

    pub fn time_left_on(&self, owner: OwnerId, name: &str) -> f32 {
        self.time_left(TimerKey::owned(owner, name))
    }

    pub fn cancel_on(&mut self, owner: OwnerId, name: &str) -> bool {
        self.cancel(TimerKey::owned(owner, name))
    }

    /// Declare an inert slot owned by `owner`, bound unless auto-bind is disabled
    pub fn register_on(&mut self, owner: OwnerId, name: &str, options: TimerOptions) {
        let key = TimerKey::owned(owner, name);
        let auto_bind = !options.no_auto_bind;
        self.register(key, options.named(name));
        if auto_bind {
            self.bind(owner, key);
        }
    }

    pub fn trigger_on(&mut self, owner: OwnerId, name: &str, target: f32) -> bool {
        self.trigger_chronometer(TimerKey::owned(owner, name), target)
    }

    /// Keys of every timer created under `owner`
    pub fn timers_for_owner(&self, owner: OwnerId) -> Vec<TimerKey> {
        self.timers.keys_for_owner(owner)
    }
}
