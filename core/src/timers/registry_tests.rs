//! Tests for TimerRegistry table operations and single-timer steps
//!
//! Callback invocation and full tick passes are covered by the scheduler tests.

use crate::clock::FrameTime;
use crate::ident::{OwnerId, TimerKey};
use crate::owner::{NoOwners, OwnerTable};

use super::registry::{Settle, Step};
use super::{SetTimerResult, TimerOptions, TimerRegistry};

const KEY: TimerKey = TimerKey::from_raw(42);

fn step(registry: &mut TimerRegistry, dt: f32) -> Step {
    registry.step(KEY, FrameTime::uniform(dt), &NoOwners)
}

// ═══════════════════════════════════════════════════════════════════════════
// Set / Register / Query
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn set_creates_new_timer() {
    let mut registry = TimerRegistry::new();
    let result = registry.set(KEY, 5.0, TimerOptions::default());

    assert_eq!(result, SetTimerResult::NewTimer);
    assert_eq!(registry.time_left(KEY), 5.0);
    assert_eq!(registry.get(KEY).unwrap().duration(), 5.0);
}

#[test]
fn reset_without_callback_changes_time_left() {
    let mut registry = TimerRegistry::new();
    registry.set(KEY, 5.0, TimerOptions::default().on_complete(|_| {}));

    let result = registry.set(KEY, 2.0, TimerOptions::default());
    assert_eq!(result, SetTimerResult::TimeLeftChanged);
    assert_eq!(registry.time_left(KEY), 2.0);
    assert!(
        registry.get(KEY).unwrap().has_on_complete(),
        "omitting a callback keeps the stored one"
    );
}

#[test]
fn reset_with_callback_replaces_it() {
    let mut registry = TimerRegistry::new();
    registry.set(KEY, 5.0, TimerOptions::default());

    let result = registry.set(KEY, 3.0, TimerOptions::default().on_complete(|_| {}));
    assert_eq!(result, SetTimerResult::CallbackReplaced);
    assert_eq!(registry.time_left(KEY), 3.0);
    assert!(registry.get(KEY).unwrap().has_on_complete());
}

#[test]
fn reset_keeps_existing_flags() {
    let mut registry = TimerRegistry::new();
    registry.set(KEY, 5.0, TimerOptions::default().preserve().named("slot"));
    registry.set(KEY, 1.0, TimerOptions::default().named("other"));

    let timer = registry.get(KEY).unwrap();
    assert!(timer.is_preserved());
    assert_eq!(timer.name(), "slot");
}

#[test]
fn absent_timer_queries_return_sentinels() {
    let mut registry = TimerRegistry::new();
    assert_eq!(registry.time_left(KEY), 0.0);
    assert!(registry.get(KEY).is_none());
    assert!(!registry.cancel(KEY));
    assert!(!registry.bind(OwnerId(1), KEY));
    assert!(!registry.set_paused(KEY, true));
}

#[test]
fn cancel_removes_immediately() {
    let mut registry = TimerRegistry::new();
    registry.set(KEY, 5.0, TimerOptions::default());

    assert!(registry.cancel(KEY));
    assert!(!registry.contains(KEY));
    assert!(!registry.cancel(KEY));
}

#[test]
fn register_creates_inert_preserved_slot() {
    let mut registry = TimerRegistry::new();
    registry.register(KEY, TimerOptions::default().on_complete(|_| {}));

    let timer = registry.get(KEY).unwrap();
    assert_eq!(timer.time_left(), 0.0);
    assert_eq!(timer.duration(), 1.0);
    assert!(timer.is_preserved());

    // Ticking never fires an unarmed slot
    match step(&mut registry, 1.0) {
        Step::Advanced { completed, .. } => assert!(!completed),
        other => panic!("unexpected step {other:?}"),
    }
    assert!(registry.contains(KEY));
}

#[test]
fn register_then_set_arms_slot() {
    let mut registry = TimerRegistry::new();
    registry.register(KEY, TimerOptions::default());

    assert_eq!(registry.set(KEY, 4.0, TimerOptions::default()), SetTimerResult::TimeLeftChanged);
    assert_eq!(registry.time_left(KEY), 4.0);
}

#[test]
fn negative_duration_clamps_to_zero() {
    let mut registry = TimerRegistry::new();
    registry.set(KEY, -3.0, TimerOptions::default());
    assert_eq!(registry.time_left(KEY), 0.0);

    registry.set(KEY, f32::NAN, TimerOptions::default());
    assert_eq!(registry.time_left(KEY), 0.0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Owners
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn bind_marks_binding() {
    let mut registry = TimerRegistry::new();
    registry.set(KEY, 1.0, TimerOptions::default());

    assert!(registry.bind(OwnerId(7), KEY));
    let binding = registry.get(KEY).unwrap().binding();
    assert!(binding.is_bound());
    assert_eq!(binding.owner, Some(OwnerId(7)));
}

#[test]
fn clear_owner_uses_key_owner_component() {
    let mut registry = TimerRegistry::new();
    let owner = OwnerId(3);
    registry.set(TimerKey::owned(owner, "a"), 1.0, TimerOptions::default());
    registry.set(TimerKey::owned(owner, "b"), 1.0, TimerOptions::default());
    registry.set(TimerKey::owned(OwnerId(4), "a"), 1.0, TimerOptions::default());
    registry.set(TimerKey::global("a"), 1.0, TimerOptions::default());

    assert_eq!(registry.keys_for_owner(owner).len(), 2);
    assert_eq!(registry.clear_owner(owner), 2);
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.clear_owner(owner), 0);
}

#[test]
fn dead_owner_step_reports_gone() {
    let mut registry = TimerRegistry::new();
    let mut owners = OwnerTable::new();
    let owner = owners.spawn("crate").unwrap();

    registry.set(KEY, 1.0, TimerOptions::default());
    registry.bind(owner, KEY);
    owners.despawn(owner);

    let step = registry.step(KEY, FrameTime::uniform(0.5), &owners);
    assert!(matches!(step, Step::OwnerGone(_)));
    assert_eq!(registry.time_left(KEY), 1.0);
}

#[test]
fn inactive_owner_freezes() {
    let mut registry = TimerRegistry::new();
    let mut owners = OwnerTable::new();
    let owner = owners.spawn("crate").unwrap();

    registry.set(KEY, 1.0, TimerOptions::default());
    registry.bind(owner, KEY);
    owners.set_active(owner, false);

    let step = registry.step(KEY, FrameTime::uniform(0.5), &owners);
    assert_eq!(step, Step::Frozen);
    assert_eq!(registry.time_left(KEY), 1.0);
}

// ═══════════════════════════════════════════════════════════════════════════
// Steps
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn paused_timer_is_frozen() {
    let mut registry = TimerRegistry::new();
    registry.set(KEY, 1.0, TimerOptions::default().paused());

    assert_eq!(step(&mut registry, 0.5), Step::Frozen);
    assert!(registry.set_paused(KEY, false));
    assert!(matches!(step(&mut registry, 0.5), Step::Advanced { .. }));
    assert_eq!(registry.time_left(KEY), 0.5);
}

#[test]
fn zero_delta_is_idle() {
    let mut registry = TimerRegistry::new();
    registry.set(KEY, 0.0, TimerOptions::default());
    assert_eq!(step(&mut registry, 0.0), Step::Idle);
    assert!(!registry.get(KEY).unwrap().has_fired());
}

#[test]
fn unscaled_timer_uses_unscaled_channel() {
    let mut registry = TimerRegistry::new();
    registry.set(KEY, 1.0, TimerOptions::default().unscaled());

    let paused_game = FrameTime::new(0.0, 0.25);
    registry.step(KEY, paused_game, &NoOwners);
    assert_eq!(registry.time_left(KEY), 0.75);
}

#[test]
fn completion_clamps_and_sets_fired() {
    let mut registry = TimerRegistry::new();
    registry.set(KEY, 1.0, TimerOptions::default().on_tick(|_, _| {}));

    match step(&mut registry, 1.5) {
        Step::Advanced {
            report, completed, ..
        } => {
            assert!(completed);
            assert_eq!(report, Some((0.0, 1.0)), "tick report never goes negative");
        }
        other => panic!("unexpected step {other:?}"),
    }
    let timer = registry.get(KEY).unwrap();
    assert_eq!(timer.time_left(), 0.0);
    assert!(timer.has_fired());

    // Already fired: no second completion, no more tick reports
    assert_eq!(
        step(&mut registry, 1.0),
        Step::Advanced {
            arming: registry.get(KEY).unwrap().arming,
            report: None,
            completed: false,
        }
    );
}

#[test]
fn settle_applies_loop_preserve_expire() {
    let mut registry = TimerRegistry::new();

    registry.set(KEY, 2.0, TimerOptions::default().looping(1));
    step(&mut registry, 2.0);
    let arming = registry.get(KEY).unwrap().arming;
    assert_eq!(registry.settle(KEY, arming), Settle::Looped);
    assert_eq!(registry.time_left(KEY), 2.0);
    assert_eq!(registry.get(KEY).unwrap().loops_remaining(), 0);

    step(&mut registry, 2.0);
    assert_eq!(registry.settle(KEY, arming), Settle::Expired);
    assert!(registry.purge(KEY, arming));
    assert!(!registry.contains(KEY));

    registry.set(KEY, 1.0, TimerOptions::default().preserve());
    step(&mut registry, 1.0);
    let arming = registry.get(KEY).unwrap().arming;
    assert_eq!(registry.settle(KEY, arming), Settle::Kept);
}

#[test]
fn rearm_invalidates_pending_purge() {
    let mut registry = TimerRegistry::new();
    registry.set(KEY, 1.0, TimerOptions::default());
    step(&mut registry, 1.0);
    let arming = registry.get(KEY).unwrap().arming;

    registry.set(KEY, 3.0, TimerOptions::default());
    assert_eq!(registry.settle(KEY, arming), Settle::Untouched);
    assert!(!registry.purge(KEY, arming));
    assert_eq!(registry.time_left(KEY), 3.0);
}
