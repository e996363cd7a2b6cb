//! Named timers
//!
//! This module provides:
//! - **Records**: `Timer`, the runtime state of one named countdown
//! - **Options**: `TimerOptions`, looping/preserve/unscaled flags and callbacks
//! - **Registry**: `TimerRegistry`, the key → timer table and its tick steps
//!
//! # Per-tick state machine
//!
//! ```text
//!  owner destroyed? ──yes──► purge at end of pass
//!        │no
//!  owner inactive / paused? ──yes──► frozen
//!        │no
//!  time_left -= dt ──► on_tick(time_left, duration)
//!        │
//!  time_left <= 0 and not fired? ──yes──► on_complete
//!                                            │
//!                      looping? re-arm : preserve? keep : purge
//! ```

mod active;
pub(crate) mod registry;

#[cfg(test)]
mod registry_tests;

pub(crate) use active::Arming;
pub use active::{CompleteFn, OwnerBinding, SetTimerResult, TickFn, Timer, TimerOptions};
pub use registry::TimerRegistry;
