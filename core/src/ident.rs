//! Timer identity
//!
//! Maps a human-readable name (and optional owner) to a compact 64-bit key.
//!
//! ```text
//!   63            32 31             0
//!  ┌────────────────┬────────────────┐
//!  │    owner id    │    local id    │
//!  └────────────────┴────────────────┘
//! ```
//!
//! Global timers have an owner id of 0. The local id is usually the FNV-1a
//! hash of the timer name, so two names that hash alike share a timer.
//! Collisions are not detected.

use std::fmt;

use serde::{Deserialize, Serialize};

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// 32-bit FNV-1a hash of a timer name.
///
/// Folds over UTF-16 code units so keys match across hosts that hash
/// UTF-16 strings. Deterministic across runs and builds.
pub fn hash_name(name: &str) -> u32 {
    name.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Pack an owner id and a local id into the high/low halves of a key
pub fn combine_key(owner_id: u32, local_id: u32) -> u64 {
    (u64::from(owner_id) << 32) | u64::from(local_id)
}

/// Low half of a packed key
pub fn extract_local_id(key: u64) -> u32 {
    (key & 0xFFFF_FFFF) as u32
}

/// High half of a packed key
pub fn extract_owner_id(key: u64) -> u32 {
    (key >> 32) as u32
}

/// Stable identity of an owning entity.
///
/// A plain handle: holding one never keeps the entity alive.
/// Id 0 is reserved for global (unowned) keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerId(pub u32);

impl OwnerId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Key identifying one named timer or chronometer.
///
/// Equal keys are the same logical timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerKey(u64);

impl TimerKey {
    /// Wrap a caller-chosen integer id
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Global key derived from a name
    pub fn global(name: &str) -> Self {
        Self(u64::from(hash_name(name)))
    }

    /// Owner-scoped key derived from a name
    pub fn owned(owner: OwnerId, name: &str) -> Self {
        Self::owned_id(owner, hash_name(name))
    }

    /// Owner-scoped key from a caller-chosen local id (constants)
    pub fn owned_id(owner: OwnerId, local_id: u32) -> Self {
        Self(combine_key(owner.0, local_id))
    }

    pub fn raw(self) -> u64 {
        self.0
    }

    /// Owner component, `None` for global keys
    pub fn owner(self) -> Option<OwnerId> {
        match extract_owner_id(self.0) {
            0 => None,
            id => Some(OwnerId(id)),
        }
    }

    pub fn local_id(self) -> u32 {
        extract_local_id(self.0)
    }
}

impl From<u64> for TimerKey {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for TimerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
