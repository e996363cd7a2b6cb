//! Callback isolation
//!
//! User callbacks run inside the tick pass. A panicking callback must not
//! abort the pass, so each invocation is wrapped in `catch_unwind` and the
//! failure is handed to a `FailureSink` instead.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use thiserror::Error;

use crate::ident::TimerKey;

/// A user callback failed during a tick pass
#[derive(Debug, Clone, Error)]
pub enum CallbackError {
    #[error("completion callback of timer '{name}' ({key}) panicked: {message}")]
    Completion {
        key: TimerKey,
        name: String,
        message: String,
    },

    #[error("tick callback of timer '{name}' ({key}) panicked: {message}")]
    Tick {
        key: TimerKey,
        name: String,
        message: String,
    },

    #[error("nameless timer callback panicked: {message}")]
    Nameless { message: String },
}

impl CallbackError {
    pub fn message(&self) -> &str {
        match self {
            CallbackError::Completion { message, .. }
            | CallbackError::Tick { message, .. }
            | CallbackError::Nameless { message } => message,
        }
    }
}

/// Observability collaborator receiving callback failures
pub trait FailureSink {
    fn report(&self, error: &CallbackError);
}

/// Default sink: logs through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFailures;

impl FailureSink for LogFailures {
    fn report(&self, error: &CallbackError) {
        tracing::error!(%error, "timer callback failed");
    }
}

impl<F> FailureSink for F
where
    F: Fn(&CallbackError),
{
    fn report(&self, error: &CallbackError) {
        self(error)
    }
}

/// Run `f`, converting a panic into its message
pub(crate) fn guard<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(panic_message)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_passes_value_through() {
        assert_eq!(guard(|| 7), Ok(7));
    }

    #[test]
    fn guard_captures_panic_message() {
        let err = guard(|| -> () { panic!("boom {}", 3) }).unwrap_err();
        assert_eq!(err, "boom 3");

        let err = guard(|| -> () { panic!("static") }).unwrap_err();
        assert_eq!(err, "static");
    }

    #[test]
    fn error_display_names_timer() {
        let err = CallbackError::Completion {
            key: TimerKey::from_raw(1),
            name: "wave".to_string(),
            message: "bad".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("'wave'"));
        assert!(text.ends_with("panicked: bad"));
        assert_eq!(err.message(), "bad");
    }
}
