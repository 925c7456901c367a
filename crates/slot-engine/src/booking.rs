//! Appointment lifecycle: create, reschedule, status update, cancel.
//!
//! Every mutation runs as one serialisable store transaction: the conflict check
//! sees exactly the state the write will be applied to, and any failed check
//! discards the transaction without touching stored rows.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use crate::conflict::ensure_free;
use crate::day::day_bounds;
use crate::error::{Result, ScheduleError};
use crate::model::{Actor, Appointment, AppointmentStatus, NewAppointment, Reschedule};
use crate::scheduler::Scheduler;
use crate::store::{Store, Tables};

fn appointment_not_found(id: Uuid) -> ScheduleError {
    ScheduleError::NotFound {
        entity: "appointment",
        id,
    }
}

/// Check `[start, end)` against the provider's blocks and time-holding
/// appointments, skipping `exclude`.
fn ensure_provider_free(
    tables: &Tables,
    tenant_id: Uuid,
    provider_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude: Option<Uuid>,
) -> Result<()> {
    ensure_free(start, end, &tables.busy_blocks(tenant_id, provider_id, None))?;
    ensure_free(
        start,
        end,
        &tables.busy_appointments(tenant_id, provider_id, exclude, AppointmentStatus::occupies_time),
    )
}

fn ensure_duration(start: DateTime<Utc>, end: DateTime<Utc>, duration_min: u32) -> Result<()> {
    if end - start != Duration::minutes(i64::from(duration_min)) {
        return Err(ScheduleError::validation(format!(
            "appointment must last exactly {duration_min} minutes"
        )));
    }
    Ok(())
}

impl<S: Store> Scheduler<S> {
    /// Book a new appointment in state `scheduled`.
    pub fn create_appointment(&self, actor: &Actor, req: NewAppointment) -> Result<Appointment> {
        let tenant_id = actor.tenant_id;
        if req.end_at <= req.start_at {
            return Err(ScheduleError::validation("endAt must be after startAt"));
        }
        if req.client_name.trim().is_empty() || req.client_phone.trim().is_empty() {
            return Err(ScheduleError::validation("client name and phone are required"));
        }

        let result = self.store().write(|tables| {
            if tables.provider(tenant_id, req.provider_id).is_none() {
                return Err(ScheduleError::forbidden(format!(
                    "provider {} is not valid for this tenant",
                    req.provider_id
                )));
            }
            let service = tables.service(tenant_id, req.service_id).ok_or_else(|| {
                ScheduleError::forbidden(format!("service {} is not valid for this tenant", req.service_id))
            })?;
            ensure_duration(req.start_at, req.end_at, service.duration_min)?;
            ensure_provider_free(tables, tenant_id, req.provider_id, req.start_at, req.end_at, None)?;

            let appointment = Appointment {
                id: Uuid::new_v4(),
                tenant_id,
                provider_id: req.provider_id,
                service_id: req.service_id,
                start_at: req.start_at,
                end_at: req.end_at,
                client_name: req.client_name.clone(),
                client_phone: req.client_phone.clone(),
                status: AppointmentStatus::Scheduled,
                created_by_id: actor.user_id,
            };
            tables.insert_appointment(appointment.clone());
            Ok(appointment)
        });

        match &result {
            Ok(appt) => info!(appointment_id = %appt.id, provider_id = %appt.provider_id, start = %appt.start_at, "appointment created"),
            Err(err) => warn!(provider_id = %req.provider_id, start = %req.start_at, error = %err, "appointment refused"),
        }
        result
    }

    /// Appointments of every status starting on `date` (UTC), ordered by start.
    pub fn list_appointments_for_day(
        &self,
        tenant_id: Uuid,
        date: NaiveDate,
        provider_id: Option<Uuid>,
    ) -> Result<Vec<Appointment>> {
        let (day_start, day_end) = day_bounds(date);
        self.store()
            .read(|tables| Ok(tables.appointments_starting_in(tenant_id, provider_id, day_start, day_end)))
    }

    /// Move an appointment to a new time range. Status is left untouched.
    ///
    /// When only the start is given the existing duration is kept. The new range
    /// must still match the service duration and must not overlap any block or
    /// other time-holding appointment of the provider.
    pub fn reschedule_appointment(&self, tenant_id: Uuid, id: Uuid, req: Reschedule) -> Result<Appointment> {
        if req.start_at.is_none() && req.end_at.is_none() {
            return Err(ScheduleError::validation("startAt and/or endAt is required to reschedule"));
        }

        let result = self.store().write(|tables| {
            let current = tables.appointment(tenant_id, id).ok_or_else(|| appointment_not_found(id))?;
            let duration = current.end_at - current.start_at;
            let start_at = req.start_at.unwrap_or(current.start_at);
            let end_at = match (req.start_at, req.end_at) {
                (_, Some(end)) => end,
                (Some(start), None) => start + duration,
                (None, None) => current.end_at,
            };
            if end_at <= start_at {
                return Err(ScheduleError::validation("endAt must be after startAt"));
            }

            let service = tables.service(tenant_id, current.service_id).ok_or(ScheduleError::NotFound {
                entity: "service",
                id: current.service_id,
            })?;
            ensure_duration(start_at, end_at, service.duration_min)?;
            ensure_provider_free(tables, tenant_id, current.provider_id, start_at, end_at, Some(id))?;

            let appt = tables.appointment_mut(tenant_id, id).ok_or_else(|| appointment_not_found(id))?;
            appt.start_at = start_at;
            appt.end_at = end_at;
            Ok(appt.clone())
        });

        match &result {
            Ok(appt) => info!(appointment_id = %id, start = %appt.start_at, end = %appt.end_at, "appointment rescheduled"),
            Err(err) => warn!(appointment_id = %id, error = %err, "reschedule refused"),
        }
        result
    }

    /// Set the status of an appointment.
    ///
    /// Any state may follow any other unless `strict_status_transitions` is on.
    /// Reviving a cancelled appointment re-checks its time range, since a
    /// cancelled row no longer holds it.
    pub fn update_appointment_status(&self, tenant_id: Uuid, id: Uuid, status: AppointmentStatus) -> Result<Appointment> {
        let strict = self.config().strict_status_transitions;

        let result = self.store().write(|tables| {
            let current = tables.appointment(tenant_id, id).ok_or_else(|| appointment_not_found(id))?;
            if strict && !current.status.can_transition_to(status) {
                return Err(ScheduleError::validation(format!(
                    "cannot move appointment from {} to {status}",
                    current.status
                )));
            }
            if !current.status.occupies_time() && status.occupies_time() {
                ensure_provider_free(tables, tenant_id, current.provider_id, current.start_at, current.end_at, Some(id))?;
            }

            let appt = tables.appointment_mut(tenant_id, id).ok_or_else(|| appointment_not_found(id))?;
            appt.status = status;
            Ok(appt.clone())
        });

        if result.is_ok() {
            info!(appointment_id = %id, %status, "appointment status updated");
        }
        result
    }

    /// Logical delete: mark the appointment `cancelled`.
    ///
    /// Cancelling an already-cancelled appointment returns it unchanged.
    pub fn cancel_appointment(&self, tenant_id: Uuid, id: Uuid) -> Result<Appointment> {
        let (appt, changed) = self.store().write(|tables| {
            let appt = tables.appointment_mut(tenant_id, id).ok_or_else(|| appointment_not_found(id))?;
            let changed = appt.status != AppointmentStatus::Cancelled;
            appt.status = AppointmentStatus::Cancelled;
            Ok((appt.clone(), changed))
        })?;

        if changed {
            info!(appointment_id = %id, "appointment cancelled");
        }
        Ok(appt)
    }
}
