//! Error types for slot-engine operations.

use thiserror::Error;
use uuid::Uuid;

/// What kind of existing occupancy a candidate interval collided with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    Block,
    Appointment,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConflictKind::Block => f.write_str("block"),
            ConflictKind::Appointment => f.write_str("appointment"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ScheduleError {
    /// Malformed timestamps, `end <= start`, duration mismatch, bad template.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Cross-tenant reference or provider self-service boundary violation.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Temporal overlap with an existing block or active appointment.
    #[error("Conflict with {kind} {id}")]
    Conflict { kind: ConflictKind, id: Uuid },

    /// Entity absent or outside the caller's tenant.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    /// The backing store could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl ScheduleError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        ScheduleError::Validation(message.into())
    }

    pub(crate) fn forbidden(message: impl Into<String>) -> Self {
        ScheduleError::Forbidden(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
