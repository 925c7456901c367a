//! Detect overlaps between a candidate interval and existing occupancy.
//!
//! The detector is storage-agnostic: callers hand it a snapshot of [`Busy`]
//! intervals (blocks and/or appointments already filtered by tenant, provider and
//! status) and a candidate `[start, end)`. Adjacent intervals, where one ends
//! exactly when the other starts, are NOT conflicts.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{ConflictKind, Result, ScheduleError};
use crate::model::{Appointment, Block};

/// An existing interval that occupies a provider's time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Busy {
    pub kind: ConflictKind,
    pub id: Uuid,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl From<&Block> for Busy {
    fn from(block: &Block) -> Self {
        Self {
            kind: ConflictKind::Block,
            id: block.id,
            start: block.start_at,
            end: block.end_at,
        }
    }
}

impl From<&Appointment> for Busy {
    fn from(appt: &Appointment) -> Self {
        Self {
            kind: ConflictKind::Appointment,
            id: appt.id,
            start: appt.start_at,
            end: appt.end_at,
        }
    }
}

/// A detected overlap between the candidate and one busy interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub busy: Busy,
    pub overlap_minutes: i64,
}

/// Half-open overlap test: `a.start < b.end && b.start < a.end`.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Find every busy interval the candidate `[start, end)` overlaps.
///
/// Results keep the order of `existing`. The overlap duration is
/// `min(end, busy.end) - max(start, busy.start)`.
pub fn find_conflicts(start: DateTime<Utc>, end: DateTime<Utc>, existing: &[Busy]) -> Vec<Conflict> {
    existing
        .iter()
        .filter(|busy| overlaps(start, end, busy.start, busy.end))
        .map(|busy| Conflict {
            busy: busy.clone(),
            overlap_minutes: (end.min(busy.end) - start.max(busy.start)).num_minutes(),
        })
        .collect()
}

/// The first busy interval the candidate overlaps, if any.
pub fn first_conflict<'a>(start: DateTime<Utc>, end: DateTime<Utc>, existing: &'a [Busy]) -> Option<&'a Busy> {
    existing.iter().find(|busy| overlaps(start, end, busy.start, busy.end))
}

/// `Ok(())` when the candidate is free, otherwise the first conflict as an error.
pub fn ensure_free(start: DateTime<Utc>, end: DateTime<Utc>, existing: &[Busy]) -> Result<()> {
    match first_conflict(start, end, existing) {
        Some(busy) => Err(ScheduleError::Conflict {
            kind: busy.kind,
            id: busy.id,
        }),
        None => Ok(()),
    }
}
