//! Shared configuration and snapshot types for horologe
//!
//! This crate contains serializable types that are shared between the
//! scheduler core (horologe-core) and anything that displays or persists
//! its state (the CLI, debug overlays).

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Scheduler Configuration
// ─────────────────────────────────────────────────────────────────────────────

fn default_time_scale() -> f32 {
    1.0
}

fn default_max_frame_delta() -> f32 {
    1.0 / 3.0
}

fn default_frame_rate() -> u32 {
    60
}

/// Scheduler configuration, persisted as TOML.
///
/// Every field has a default so partial files load cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Multiplier applied to the scaled delta channel (0 freezes scaled timers)
    #[serde(default = "default_time_scale")]
    pub time_scale: f32,

    /// Upper bound for a single frame's delta, in seconds.
    /// A hitch longer than this is treated as one frame of this length.
    #[serde(default = "default_max_frame_delta")]
    pub max_frame_delta_secs: f32,

    /// Frame cadence used by real-time drivers
    #[serde(default = "default_frame_rate")]
    pub target_frame_rate: u32,

    /// Raise horologe crates to debug level when logging is initialized
    #[serde(default)]
    pub debug_logging: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            time_scale: default_time_scale(),
            max_frame_delta_secs: default_max_frame_delta(),
            target_frame_rate: default_frame_rate(),
            debug_logging: false,
        }
    }
}

impl SchedulerConfig {
    /// Seconds between frames at the target frame rate
    pub fn frame_interval_secs(&self) -> f32 {
        1.0 / self.target_frame_rate.max(1) as f32
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Debug Snapshot Types
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle state of the owner a timer is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerState {
    /// Global key, not bound to any owner
    #[default]
    Global,
    /// Key scoped to an owner but not bound - timer ignores the owner's state
    Unbound,
    /// Owner alive and active - timer counts down
    Alive,
    /// Owner alive but inactive - timer frozen
    Inactive,
    /// Owner destroyed - timer is purged on the next tick
    Destroyed,
}

impl OwnerState {
    pub fn label(&self) -> &'static str {
        match self {
            OwnerState::Global => "Global",
            OwnerState::Unbound => "Unbound",
            OwnerState::Alive => "Alive",
            OwnerState::Inactive => "Inactive",
            OwnerState::Destroyed => "Destroyed",
        }
    }
}

/// Read-only view of one named timer for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    /// Raw 64-bit key
    pub key: u64,
    /// Display name (empty when the timer was armed by raw key)
    pub name: String,
    /// Seconds remaining, never negative
    pub time_left: f32,
    pub duration: f32,

    /// Bound owner, or the key's owner component for unbound scoped timers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<u32>,
    #[serde(default)]
    pub owner_state: OwnerState,

    pub preserve: bool,
    pub loop_forever: bool,
    pub loops_remaining: u32,
    pub unscaled: bool,
    pub paused: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let config: SchedulerConfig = toml::from_str("time_scale = 0.5").unwrap();
        assert_eq!(config.time_scale, 0.5);
        assert_eq!(config.target_frame_rate, 60);
        assert!(!config.debug_logging);
    }

    #[test]
    fn empty_config_matches_default() {
        let config: SchedulerConfig = toml::from_str("").unwrap();
        assert_eq!(config, SchedulerConfig::default());
    }

    #[test]
    fn frame_interval_guards_zero_rate() {
        let config = SchedulerConfig {
            target_frame_rate: 0,
            ..Default::default()
        };
        assert_eq!(config.frame_interval_secs(), 1.0);
    }

    #[test]
    fn owner_state_serializes_snake_case() {
        let snap = TimerSnapshot {
            key: 7,
            name: "spawn".to_string(),
            time_left: 1.5,
            duration: 3.0,
            owner: None,
            owner_state: OwnerState::Destroyed,
            preserve: false,
            loop_forever: false,
            loops_remaining: 0,
            unscaled: false,
            paused: false,
        };
        let text = toml::to_string(&snap).unwrap();
        assert!(text.contains("owner_state = \"destroyed\""));
        assert!(!text.contains("owner ="));
    }
}
