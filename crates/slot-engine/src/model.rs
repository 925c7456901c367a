//! Domain records and request shapes.
//!
//! `Provider` and `Service` are owned by external CRUD and are only read here.
//! `Block` and `Appointment` are owned by the scheduling core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::template::WeeklyTemplate;

/// A bookable staff member with a weekly template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: Uuid,
    pub tenant_id: Uuid,
    /// The login identity that represents this provider, if any.
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub weekday_template: WeeklyTemplate,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Something a provider offers, with a fixed duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub duration_min: u32,
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

/// An explicit unavailability window for a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub provider_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Appointment lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    InService,
    Done,
    NoShow,
    Cancelled,
}

impl AppointmentStatus {
    /// Whether an appointment in this state still holds its time range.
    pub fn occupies_time(self) -> bool {
        self != AppointmentStatus::Cancelled
    }

    /// `scheduled` or `in_service`: the states block updates are checked against.
    pub fn is_active(self) -> bool {
        matches!(self, AppointmentStatus::Scheduled | AppointmentStatus::InService)
    }

    /// The explicit allow-list used when strict transitions are enabled.
    /// Re-entering the same state is always allowed.
    pub fn can_transition_to(self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        self == next
            || matches!(
                (self, next),
                (Scheduled, InService) | (Scheduled, NoShow) | (Scheduled, Cancelled) | (InService, Done) | (InService, Cancelled)
            )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::InService => "in_service",
            AppointmentStatus::Done => "done",
            AppointmentStatus::NoShow => "no_show",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = crate::error::ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            "in_service" => Ok(AppointmentStatus::InService),
            "done" => Ok(AppointmentStatus::Done),
            "no_show" => Ok(AppointmentStatus::NoShow),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(crate::error::ScheduleError::validation(format!(
                "unknown appointment status '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub client_name: String,
    pub client_phone: String,
    pub status: AppointmentStatus,
    pub created_by_id: Uuid,
}

/// Role of the calling identity within its tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    Attendant,
    Provider,
}

/// Caller identity supplied by the upstream authentication layer. Trusted as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub provider_id: Uuid,
    pub service_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub client_name: String,
    pub client_phone: String,
}

/// New start and/or end for an existing appointment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reschedule {
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBlock {
    pub provider_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Partial block update; omitted fields keep their current values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPatch {
    pub start_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_frees_time_but_done_does_not() {
        assert!(!AppointmentStatus::Cancelled.occupies_time());
        assert!(AppointmentStatus::Done.occupies_time());
        assert!(!AppointmentStatus::Done.is_active());
        assert!(AppointmentStatus::InService.is_active());
    }

    #[test]
    fn status_parses_wire_names() {
        assert_eq!("no_show".parse::<AppointmentStatus>().unwrap(), AppointmentStatus::NoShow);
        assert!("noshow".parse::<AppointmentStatus>().is_err());
        assert_eq!(serde_json::to_string(&AppointmentStatus::InService).unwrap(), "\"in_service\"");
    }

    #[test]
    fn allow_list_rejects_reopening_done() {
        assert!(AppointmentStatus::Scheduled.can_transition_to(AppointmentStatus::InService));
        assert!(!AppointmentStatus::Done.can_transition_to(AppointmentStatus::Scheduled));
        assert!(AppointmentStatus::Cancelled.can_transition_to(AppointmentStatus::Cancelled));
    }
}
