//! Free time for one provider on one UTC day.
//!
//! The provider's template ranges for the weekday are the starting free set. Every
//! block and every non-cancelled appointment that touches the day is converted to
//! day-relative minutes (clipped at 00:00 and 24:00), the occupied ranges are
//! merged, and the merged set is subtracted from the template.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::day::{day_bounds, to_day_minutes};
use crate::error::{Result, ScheduleError};
use crate::interval::{format_hhmm, merge, subtract, MinuteRange};
use crate::scheduler::Scheduler;
use crate::store::{Store, Tables};
use crate::template::Weekday;

/// A free interval rendered as `HH:MM` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeInterval {
    pub start: String,
    pub end: String,
}

impl From<MinuteRange> for FreeInterval {
    fn from(range: MinuteRange) -> Self {
        Self {
            start: format_hhmm(range.start),
            end: format_hhmm(range.end),
        }
    }
}

/// Free time for a provider-day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAvailability {
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub weekday: Weekday,
    /// Ascending, pairwise-disjoint free intervals.
    pub intervals: Vec<FreeInterval>,
}

/// Intermediate result shared with slot generation.
#[derive(Debug, Clone)]
pub(crate) struct DayPlan {
    pub provider_id: Uuid,
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub day_start: DateTime<Utc>,
    pub free: Vec<MinuteRange>,
}

/// Subtract merged occupancy from template ranges.
///
/// `template` must already be disjoint (guaranteed by `WeeklyTemplate`). The
/// result is sorted ascending and pairwise disjoint.
pub fn free_intervals(template: &[MinuteRange], occupied: &[MinuteRange]) -> Vec<MinuteRange> {
    let mut free = subtract(template, &merge(occupied));
    free.sort_by_key(|r| r.start);
    free
}

/// Day-relative occupied minutes for a list of `[start, end)` instants.
pub fn occupied_minutes<I>(day_start: DateTime<Utc>, ranges: I) -> Vec<MinuteRange>
where
    I: IntoIterator<Item = (DateTime<Utc>, DateTime<Utc>)>,
{
    ranges
        .into_iter()
        .filter_map(|(start, end)| to_day_minutes(day_start, start, end))
        .collect()
}

/// Compute free minutes for a provider-day from a snapshot of the tables.
pub(crate) fn plan_day(tables: &Tables, tenant_id: Uuid, provider_id: Uuid, date: NaiveDate) -> Result<DayPlan> {
    let provider = tables.provider(tenant_id, provider_id).ok_or(ScheduleError::NotFound {
        entity: "provider",
        id: provider_id,
    })?;
    if !provider.active {
        return Err(ScheduleError::validation(format!("provider {provider_id} is inactive")));
    }

    let (day_start, day_end) = day_bounds(date);
    let weekday = Weekday::from(date.weekday());
    let template = provider.weekday_template.day(weekday);

    if template.is_empty() {
        debug!(%provider_id, %date, %weekday, "no template entry for weekday");
        return Ok(DayPlan {
            provider_id,
            date,
            weekday,
            day_start,
            free: Vec::new(),
        });
    }

    let blocks = tables
        .blocks_in_window(tenant_id, provider_id, day_start, day_end)
        .into_iter()
        .map(|b| (b.start_at, b.end_at));
    let appointments = tables
        .appointments_in_window(tenant_id, provider_id, day_start, day_end)
        .into_iter()
        .map(|a| (a.start_at, a.end_at));
    let occupied = occupied_minutes(day_start, blocks.chain(appointments));

    let free = free_intervals(template, &occupied);
    debug!(
        %provider_id,
        %date,
        template = template.len(),
        occupied = occupied.len(),
        free = free.len(),
        "computed day availability"
    );

    Ok(DayPlan {
        provider_id,
        date,
        weekday,
        day_start,
        free,
    })
}

impl<S: Store> Scheduler<S> {
    /// Free intervals for `provider_id` on `date` (UTC).
    ///
    /// A weekday without template ranges yields an empty list, not an error. An
    /// inactive provider is refused.
    pub fn get_day_availability(&self, tenant_id: Uuid, provider_id: Uuid, date: NaiveDate) -> Result<DayAvailability> {
        let plan = self.store().read(|tables| plan_day(tables, tenant_id, provider_id, date))?;
        Ok(DayAvailability {
            provider_id: plan.provider_id,
            date: plan.date,
            weekday: plan.weekday,
            intervals: plan.free.into_iter().map(FreeInterval::from).collect(),
        })
    }
}
