//! Read-only timer snapshots for debug display

use horologe_types::{OwnerState, TimerSnapshot};

use crate::owner::OwnerLiveness;
use crate::timers::Timer;

use super::Scheduler;

impl Scheduler {
    /// Snapshot every named timer, sorted by key
    pub fn snapshot(&self, owners: &dyn OwnerLiveness) -> Vec<TimerSnapshot> {
        let mut rows: Vec<_> = self
            .timers
            .iter()
            .map(|timer| snapshot_timer(timer, owners))
            .collect();
        rows.sort_unstable_by_key(|row| row.key);
        rows
    }
}

fn snapshot_timer(timer: &Timer, owners: &dyn OwnerLiveness) -> TimerSnapshot {
    let bound = timer.binding().owner;
    // Fall back to the key's owner so unbound owner-scoped timers still show it
    let owner = bound.or(timer.key().owner());
    let owner_state = match (bound, owner) {
        (Some(o), _) => owners.state(o),
        (None, Some(_)) => OwnerState::Unbound,
        (None, None) => OwnerState::Global,
    };
    TimerSnapshot {
        key: timer.key().raw(),
        name: timer.name().to_string(),
        time_left: timer.time_left(),
        duration: timer.duration(),
        owner: owner.map(|o| o.raw()),
        owner_state,
        preserve: timer.is_preserved(),
        loop_forever: timer.loops_forever(),
        loops_remaining: timer.loops_remaining(),
        unscaled: timer.is_unscaled(),
        paused: timer.is_paused(),
    }
}
