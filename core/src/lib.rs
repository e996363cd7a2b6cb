pub mod callback;
pub mod chronometer;
pub mod clock;
pub mod context;
pub mod ident;
pub mod math;
pub mod nameless;
pub mod owner;
pub mod scheduler;
pub mod timers;

// Re-exports for convenience
pub use callback::{CallbackError, FailureSink, LogFailures};
pub use chronometer::Chronometers;
pub use clock::{FixedClock, FrameClock, FrameTime, WallClock};
pub use context::{ConfigError, SchedulerConfig, SchedulerConfigExt};
pub use ident::{OwnerId, TimerKey, hash_name};
pub use nameless::{NamelessFn, NamelessTimers};
pub use owner::{NoOwners, OwnerLiveness, OwnerTable};
pub use scheduler::Scheduler;
pub use timers::{SetTimerResult, Timer, TimerOptions, TimerRegistry};
pub use horologe_types::{OwnerState, TimerSnapshot};
