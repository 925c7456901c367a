//! Shared fixture: one tenant, one provider open Monday 09:00-12:00, one
//! 30-minute service, and a second tenant that must never leak in.

#![allow(dead_code)]

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use slot_engine::model::{Actor, NewAppointment, NewBlock, Provider, Role, Service};
use slot_engine::template::{Weekday, WeeklyTemplate};
use slot_engine::{MemoryStore, Scheduler, SchedulerConfig, Tables};
use uuid::Uuid;

pub struct Fixture {
    pub scheduler: Scheduler<MemoryStore>,
    pub tenant: Uuid,
    pub provider: Uuid,
    pub provider_user: Uuid,
    pub service: Uuid,
    pub admin: Actor,
    pub other_tenant: Uuid,
    pub other_provider: Uuid,
    pub other_service: Uuid,
}

/// Monday 2026-03-16.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 16).unwrap()
}

/// An instant on Monday 2026-03-16.
pub fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, hour, min, 0).unwrap()
}

pub fn fixture() -> Fixture {
    fixture_with(SchedulerConfig::default())
}

pub fn fixture_with(config: SchedulerConfig) -> Fixture {
    let tenant = Uuid::new_v4();
    let other_tenant = Uuid::new_v4();
    let provider_user = Uuid::new_v4();
    let template = WeeklyTemplate::new()
        .with_day(Weekday::Mon, &[("09:00", "12:00")])
        .unwrap();

    let provider = Provider {
        id: Uuid::new_v4(),
        tenant_id: tenant,
        user_id: Some(provider_user),
        name: "Rafa".to_string(),
        weekday_template: template.clone(),
        active: true,
    };
    let other_provider = Provider {
        id: Uuid::new_v4(),
        tenant_id: other_tenant,
        user_id: None,
        name: "Elsewhere".to_string(),
        weekday_template: template,
        active: true,
    };
    let service = Service {
        id: Uuid::new_v4(),
        tenant_id: tenant,
        name: "Haircut".to_string(),
        duration_min: 30,
        active: true,
    };
    let other_service = Service {
        id: Uuid::new_v4(),
        tenant_id: other_tenant,
        name: "Haircut".to_string(),
        duration_min: 30,
        active: true,
    };

    let mut tables = Tables::new();
    tables.upsert_provider(provider.clone());
    tables.upsert_provider(other_provider.clone());
    tables.upsert_service(service.clone());
    tables.upsert_service(other_service.clone());

    Fixture {
        scheduler: Scheduler::with_config(MemoryStore::new(tables), config).unwrap(),
        tenant,
        provider: provider.id,
        provider_user,
        service: service.id,
        admin: Actor {
            tenant_id: tenant,
            user_id: Uuid::new_v4(),
            role: Role::Admin,
        },
        other_tenant,
        other_provider: other_provider.id,
        other_service: other_service.id,
    }
}

impl Fixture {
    pub fn booking(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> NewAppointment {
        NewAppointment {
            provider_id: self.provider,
            service_id: self.service,
            start_at: start,
            end_at: end,
            client_name: "João Silva".to_string(),
            client_phone: "+351910000000".to_string(),
        }
    }

    pub fn block_req(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> NewBlock {
        NewBlock {
            provider_id: self.provider,
            start_at: start,
            end_at: end,
            reason: None,
        }
    }

    pub fn provider_actor(&self) -> Actor {
        Actor {
            tenant_id: self.tenant,
            user_id: self.provider_user,
            role: Role::Provider,
        }
    }

    /// Free intervals for Monday as `(start, end)` string pairs.
    pub fn free_monday(&self) -> Vec<(String, String)> {
        self.scheduler
            .get_day_availability(self.tenant, self.provider, monday())
            .unwrap()
            .intervals
            .into_iter()
            .map(|i| (i.start, i.end))
            .collect()
    }
}

pub fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected.iter().map(|(s, e)| (s.to_string(), e.to_string())).collect()
}
