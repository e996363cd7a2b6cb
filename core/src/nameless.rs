//! Nameless timers
//!
//! Anonymous one-shot delayed callbacks. No handle is returned, so they
//! cannot be queried or cancelled once added; only a bulk clear removes
//! them early.

use std::fmt;

use hashbrown::HashMap;

use crate::scheduler::Scheduler;

/// Callback of a nameless timer
pub type NamelessFn = Box<dyn FnOnce(&mut Scheduler)>;

struct NamelessTimer {
    time_left: f32,
    /// Taken when the timer fires
    callback: Option<NamelessFn>,
    remove: bool,
}

/// Set of pending nameless timers.
///
/// Entries are keyed by an internal serial so entries added while a pass is
/// firing are never confused with the ones being fired.
#[derive(Default)]
pub struct NamelessTimers {
    entries: HashMap<u64, NamelessTimer>,
    next_id: u64,
}

impl NamelessTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `callback` to run once `delay` seconds have elapsed.
    ///
    /// Negative or NaN delays are treated as zero, so the entry fires on the
    /// next frame that advances time.
    pub fn add(&mut self, delay: f32, callback: NamelessFn) {
        let delay = if delay >= 0.0 {
            delay
        } else {
            tracing::warn!(delay, "invalid nameless timer delay, clamping to zero");
            0.0
        };
        self.next_id += 1;
        self.entries.insert(
            self.next_id,
            NamelessTimer {
                time_left: delay,
                callback: Some(callback),
                remove: false,
            },
        );
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

    /// Decrement every entry and flag the ones that crossed below zero.
    ///
    /// Returns the ids due to fire, in creation order.
    pub(crate) fn advance(&mut self, dt: f32) -> Vec<u64> {
        let mut due = Vec::new();
        for (&id, timer) in self.entries.iter_mut() {
            if timer.remove {
                continue;
            }
            timer.time_left -= dt;
            if timer.time_left < 0.0 {
                timer.remove = true;
                due.push(id);
            }
        }
        due.sort_unstable();
        due
    }

    pub(crate) fn take_callback(&mut self, id: u64) -> Option<NamelessFn> {
        self.entries.get_mut(&id)?.callback.take()
    }

    /// Drop every fired entry
    pub(crate) fn sweep(&mut self) {
        self.entries.retain(|_, timer| !timer.remove);
    }
}

impl fmt::Debug for NamelessTimers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamelessTimers")
            .field("pending", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> NamelessFn {
        Box::new(|_: &mut Scheduler| {})
    }

    #[test]
    fn fires_only_after_crossing_below_zero() {
        let mut set = NamelessTimers::new();
        set.add(1.0, noop());

        assert!(set.advance(0.5).is_empty());
        assert!(set.advance(0.5).is_empty(), "exactly zero has not crossed yet");
        assert_eq!(set.advance(0.1).len(), 1);
    }

    #[test]
    fn fired_entries_are_swept_once() {
        let mut set = NamelessTimers::new();
        set.add(0.0, noop());
        set.add(5.0, noop());

        let due = set.advance(0.1);
        assert_eq!(due.len(), 1);
        assert!(set.take_callback(due[0]).is_some());
        assert!(set.take_callback(due[0]).is_none());

        set.sweep();
        assert_eq!(set.len(), 1);
        assert!(set.advance(0.1).is_empty());
    }

    #[test]
    fn zero_delta_never_fires_zero_delay() {
        let mut set = NamelessTimers::new();
        set.add(0.0, noop());
        assert!(set.advance(0.0).is_empty());
    }

    #[test]
    fn invalid_delays_clamp_to_zero() {
        let mut set = NamelessTimers::new();
        set.add(-1.0, noop());
        set.add(f32::NAN, noop());

        assert!(set.advance(0.0).is_empty(), "a zero delta fires nothing");
        assert_eq!(set.advance(0.1).len(), 2);
        set.sweep();
        assert!(set.is_empty());
    }
}
