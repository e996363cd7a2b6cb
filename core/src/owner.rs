//! Owner liveness
//!
//! Timers may be bound to an owning entity. The scheduler never holds the
//! entity itself, only its `OwnerId`, and asks the host's entity system two
//! questions about it every tick.

use hashbrown::HashMap;
use horologe_types::OwnerState;

use crate::ident::OwnerId;

/// Capability the host entity system exposes to the scheduler
pub trait OwnerLiveness {
    /// Is the handle still valid (entity not destroyed)?
    fn is_alive(&self, owner: OwnerId) -> bool;

    /// Is the entity currently active? Inactive owners freeze their timers.
    fn is_active(&self, owner: OwnerId) -> bool;

    /// Optional human-readable label for debug display
    fn label(&self, _owner: OwnerId) -> Option<String> {
        None
    }

    fn state(&self, owner: OwnerId) -> OwnerState {
        if !self.is_alive(owner) {
            OwnerState::Destroyed
        } else if self.is_active(owner) {
            OwnerState::Alive
        } else {
            OwnerState::Inactive
        }
    }
}

/// Liveness provider for hosts with no entity system: every owner is alive and active.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOwners;

impl OwnerLiveness for NoOwners {
    fn is_alive(&self, _owner: OwnerId) -> bool {
        true
    }

    fn is_active(&self, _owner: OwnerId) -> bool {
        true
    }
}

#[derive(Debug, Clone)]
struct OwnerEntry {
    label: String,
    active: bool,
}

/// Minimal in-memory entity table.
///
/// Hands out non-zero ids that are never reused, so a stale handle to a
/// despawned owner stays dead. Once the id space is exhausted `spawn`
/// refuses further owners.
#[derive(Debug, Clone)]
pub struct OwnerTable {
    owners: HashMap<OwnerId, OwnerEntry>,
    /// `None` once `u32::MAX` has been handed out
    next_id: Option<u32>,
}

impl Default for OwnerTable {
    fn default() -> Self {
        Self {
            owners: HashMap::new(),
            next_id: Some(1),
        }
    }
}

impl OwnerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a new active owner. Returns `None` when no unused id is left.
    pub fn spawn(&mut self, label: impl Into<String>) -> Option<OwnerId> {
        let Some(raw) = self.next_id else {
            tracing::warn!("owner ids exhausted, refusing to spawn");
            return None;
        };
        let id = OwnerId(raw);
        self.next_id = raw.checked_add(1);
        self.owners.insert(
            id,
            OwnerEntry {
                label: label.into(),
                active: true,
            },
        );
        Some(id)
    }

    /// Destroy an owner. Returns false if it was already gone.
    pub fn despawn(&mut self, owner: OwnerId) -> bool {
        self.owners.remove(&owner).is_some()
    }

    /// Activate or deactivate an owner. Returns false if it does not exist.
    pub fn set_active(&mut self, owner: OwnerId, active: bool) -> bool {
        match self.owners.get_mut(&owner) {
            Some(entry) => {
                entry.active = active;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Live owners sorted by id
    pub fn ids(&self) -> Vec<OwnerId> {
        let mut ids: Vec<_> = self.owners.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl OwnerLiveness for OwnerTable {
    fn is_alive(&self, owner: OwnerId) -> bool {
        self.owners.contains_key(&owner)
    }

    fn is_active(&self, owner: OwnerId) -> bool {
        self.owners.get(&owner).is_some_and(|e| e.active)
    }

    fn label(&self, owner: OwnerId) -> Option<String> {
        self.owners.get(&owner).map(|e| e.label.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawned_owner_is_alive_and_active() {
        let mut table = OwnerTable::new();
        let id = table.spawn("goblin").unwrap();
        assert_ne!(id.raw(), 0);
        assert_eq!(table.state(id), OwnerState::Alive);
        assert_eq!(table.label(id).as_deref(), Some("goblin"));
    }

    #[test]
    fn deactivate_then_despawn() {
        let mut table = OwnerTable::new();
        let id = table.spawn("door").unwrap();

        assert!(table.set_active(id, false));
        assert_eq!(table.state(id), OwnerState::Inactive);

        assert!(table.despawn(id));
        assert_eq!(table.state(id), OwnerState::Destroyed);
        assert!(!table.despawn(id));
        assert!(!table.set_active(id, true));
    }

    #[test]
    fn ids_are_not_reused() {
        let mut table = OwnerTable::new();
        let first = table.spawn("a").unwrap();
        table.despawn(first);
        let second = table.spawn("b").unwrap();
        assert_ne!(first, second);
        assert!(!table.is_alive(first));
    }

    #[test]
    fn exhausted_id_space_refuses_spawn() {
        let mut table = OwnerTable::new();
        table.next_id = Some(u32::MAX);

        let last = table.spawn("last").unwrap();
        assert_eq!(last.raw(), u32::MAX);
        table.despawn(last);

        assert_eq!(table.spawn("overflow"), None);
        assert!(table.is_empty());
        assert!(!table.is_alive(OwnerId(1)), "ids never wrap back to the start");
    }
}
