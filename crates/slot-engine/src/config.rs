//! Scheduler tuning knobs.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::interval::DAY_MINUTES;

/// Default advance step between consecutive slot starts.
pub const DEFAULT_SLOT_STEP_MINUTES: u32 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Minutes between consecutive candidate slot starts.
    pub slot_step_minutes: u32,
    /// Block creation also checks active appointments, not only other blocks.
    pub unified_block_conflicts: bool,
    /// Restrict status updates to [`AppointmentStatus::can_transition_to`].
    ///
    /// [`AppointmentStatus::can_transition_to`]: crate::model::AppointmentStatus::can_transition_to
    pub strict_status_transitions: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            slot_step_minutes: DEFAULT_SLOT_STEP_MINUTES,
            unified_block_conflicts: false,
            strict_status_transitions: false,
        }
    }
}

impl SchedulerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.slot_step_minutes == 0 || self.slot_step_minutes > DAY_MINUTES {
            return Err(ScheduleError::validation(format!(
                "slot_step_minutes must be between 1 and {DAY_MINUTES}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_step(slot_step_minutes: u32) -> SchedulerConfig {
        SchedulerConfig {
            slot_step_minutes,
            ..SchedulerConfig::default()
        }
    }

    #[test]
    fn step_must_fit_in_a_day() {
        assert!(with_step(1).validate().is_ok());
        assert!(with_step(DAY_MINUTES).validate().is_ok());
        assert!(matches!(with_step(0).validate(), Err(ScheduleError::Validation(_))));
        assert!(matches!(with_step(DAY_MINUTES + 1).validate(), Err(ScheduleError::Validation(_))));
        assert!(matches!(with_step(u32::MAX).validate(), Err(ScheduleError::Validation(_))));
    }
}
