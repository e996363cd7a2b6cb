//! Chronometers
//!
//! Answers "has this condition been true, every tick, for at least X seconds?"
//!
//! The caller triggers the chronometer on every frame the condition holds.
//! Hold time accrues in the end-of-frame pass, for chronometers that were
//! triggered during that frame, so the first trigger always sees zero. Once
//! the hold time exceeds the target the trigger returns `true` exactly once,
//! then latches. A frame without a trigger resets both the accumulation and
//! the latch.

use hashbrown::HashMap;

use crate::ident::TimerKey;

#[derive(Debug, Clone, Copy, Default)]
struct Chronometer {
    accumulated: f32,
    triggered: bool,
    finished: bool,
}

#[derive(Debug, Default)]
pub struct Chronometers {
    entries: HashMap<TimerKey, Chronometer>,
}

impl Chronometers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report the condition as held this frame.
    ///
    /// Returns `true` on the one call where the hold time first exceeds `target`.
    pub fn trigger(&mut self, key: TimerKey, target: f32) -> bool {
        let chrono = self.entries.entry(key).or_default();
        chrono.triggered = true;

        if chrono.finished {
            return false;
        }

        if chrono.accumulated > target {
            chrono.accumulated = 0.0;
            chrono.finished = true;
            return true;
        }
        false
    }

    /// Hold time accumulated so far, if the chronometer exists
    pub fn progress(&self, key: TimerKey) -> Option<f32> {
        self.entries.get(&key).map(|c| c.accumulated)
    }

    /// Has the chronometer fired and not lapsed since?
    pub fn is_finished(&self, key: TimerKey) -> bool {
        self.entries.get(&key).is_some_and(|c| c.finished)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// End-of-frame pass: add `dt` to the hold time of every chronometer
    /// triggered this frame, drop the ones that were not.
    pub(crate) fn decay(&mut self, dt: f32) {
        self.entries.retain(|_, chrono| chrono.triggered);
        for chrono in self.entries.values_mut() {
            if !chrono.finished {
                chrono.accumulated += dt;
            }
            chrono.triggered = false;
        }
    }
}
