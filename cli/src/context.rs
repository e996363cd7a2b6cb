use horologe_core::{OwnerId, OwnerTable, Scheduler, SchedulerConfig, TimerKey};

/// A condition the user asked to hold; its chronometer is triggered every frame.
#[derive(Debug, Clone)]
pub struct Hold {
    pub name: String,
    pub key: TimerKey,
    pub target: f32,
}

/// Holds all state for the CLI session.
///
/// The scheduler is single-threaded, so this lives on the main task and is
/// passed by `&mut` to each command.
pub struct CliContext {
    pub scheduler: Scheduler,
    pub owners: OwnerTable,
    pub config: SchedulerConfig,
    pub holds: Vec<Hold>,
}

impl CliContext {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            scheduler: Scheduler::from_config(&config),
            owners: OwnerTable::new(),
            config,
            holds: Vec::new(),
        }
    }

    /// Key for `name`, scoped to `owner` when given
    pub fn key_for(owner: Option<OwnerId>, name: &str) -> TimerKey {
        match owner {
            Some(owner) => TimerKey::owned(owner, name),
            None => TimerKey::global(name),
        }
    }

    /// Trigger every held condition against the frame just processed
    pub fn trigger_holds(&mut self) -> Vec<String> {
        let mut reached = Vec::new();
        for hold in &self.holds {
            if self.scheduler.trigger_chronometer(hold.key, hold.target) {
                reached.push(hold.name.clone());
            }
        }
        reached
    }
}
