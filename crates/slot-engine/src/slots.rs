//! Fixed-duration bookable slots derived from free time.
//!
//! Within each free interval a slot starts at the interval's start and every
//! `step` minutes after it, for as long as the slot still ends inside the
//! interval. Slots from one interval may overlap when `step < duration`; they are
//! alternative start times, and booking re-validates whichever one is chosen.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::availability::plan_day;
use crate::day::at_minute;
use crate::error::{Result, ScheduleError};
use crate::interval::MinuteRange;
use crate::scheduler::Scheduler;
use crate::store::Store;
use crate::template::Weekday;

/// One bookable candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

/// Bookable slots for a provider, service and day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySlots {
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub duration_min: u32,
    pub step_min: u32,
    pub slots: Vec<Slot>,
}

/// Day-relative slot ranges of `duration` minutes, advancing by `step`.
///
/// Returns nothing when `duration` or `step` is zero.
pub fn generate_slots(free: &[MinuteRange], duration: u32, step: u32) -> Vec<MinuteRange> {
    if duration == 0 || step == 0 {
        return Vec::new();
    }

    let mut slots = Vec::new();
    for range in free {
        let Some(last_start) = range.end.checked_sub(duration) else {
            continue;
        };
        let mut start = range.start;
        while start <= last_start {
            slots.push(MinuteRange::new(start, start + duration));
            match start.checked_add(step) {
                Some(next) => start = next,
                None => break,
            }
        }
    }
    slots
}

impl<S: Store> Scheduler<S> {
    /// Bookable slots for `service_id` with `provider_id` on `date` (UTC).
    pub fn get_day_slots(
        &self,
        tenant_id: Uuid,
        provider_id: Uuid,
        service_id: Uuid,
        date: NaiveDate,
    ) -> Result<DaySlots> {
        let step = self.config().slot_step_minutes;

        let (plan, duration) = self.store().read(|tables| {
            let service = tables.service(tenant_id, service_id).ok_or(ScheduleError::NotFound {
                entity: "service",
                id: service_id,
            })?;
            if !service.active {
                return Err(ScheduleError::validation(format!("service {service_id} is inactive")));
            }
            let plan = plan_day(tables, tenant_id, provider_id, date)?;
            Ok((plan, service.duration_min))
        })?;

        let slots: Vec<Slot> = generate_slots(&plan.free, duration, step)
            .into_iter()
            .map(|r| Slot {
                start_at: at_minute(plan.day_start, r.start),
                end_at: at_minute(plan.day_start, r.end),
            })
            .collect();
        debug!(%provider_id, %service_id, %date, slots = slots.len(), "generated day slots");

        Ok(DaySlots {
            provider_id,
            service_id,
            date,
            weekday: plan.weekday,
            duration_min: duration,
            step_min: step,
            slots,
        })
    }
}
