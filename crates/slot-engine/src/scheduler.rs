//! The scheduling façade shared by the availability, booking and block modules.

use crate::config::SchedulerConfig;
use crate::error::Result;
use crate::store::Store;

/// Entry point for every exposed scheduling operation.
///
/// The scheduler holds no mutable state of its own; all state lives in the store
/// and every operation is one read or one serialisable write against it.
#[derive(Debug)]
pub struct Scheduler<S> {
    store: S,
    config: SchedulerConfig,
}

impl<S: Store> Scheduler<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: SchedulerConfig::default(),
        }
    }

    /// Build a scheduler with explicit settings, rejecting invalid ones.
    pub fn with_config(store: S, config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }
}
