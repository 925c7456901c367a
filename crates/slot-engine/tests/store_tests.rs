//! Tests for the transactional stores.

use chrono::{TimeZone, Utc};
use slot_engine::model::{Actor, NewAppointment, Provider, Role, Service};
use slot_engine::template::{Weekday, WeeklyTemplate};
use slot_engine::{FileStore, MemoryStore, ScheduleError, Scheduler, Store, Tables};
use uuid::Uuid;

fn seeded_tables(tenant: Uuid) -> (Tables, Uuid, Uuid) {
    let provider = Provider {
        id: Uuid::new_v4(),
        tenant_id: tenant,
        user_id: None,
        name: "Rafa".to_string(),
        weekday_template: WeeklyTemplate::new()
            .with_day(Weekday::Mon, &[("09:00", "12:00")])
            .unwrap(),
        active: true,
    };
    let service = Service {
        id: Uuid::new_v4(),
        tenant_id: tenant,
        name: "Haircut".to_string(),
        duration_min: 30,
        active: true,
    };
    let mut tables = Tables::new();
    tables.upsert_provider(provider.clone());
    tables.upsert_service(service.clone());
    (tables, provider.id, service.id)
}

#[test]
fn failed_memory_write_discards_all_changes() {
    let tenant = Uuid::new_v4();
    let (tables, provider_id, _) = seeded_tables(tenant);
    let store = MemoryStore::new(tables.clone());

    let result: Result<(), ScheduleError> = store.write(|t| {
        let mut provider = t.provider(tenant, provider_id).cloned().unwrap();
        provider.name = "renamed".to_string();
        t.upsert_provider(provider);
        Err(ScheduleError::Validation("abort".to_string()))
    });

    assert!(result.is_err());
    assert_eq!(store.snapshot().unwrap(), tables);
}

#[test]
fn file_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let tenant = Uuid::new_v4();
    let (tables, provider_id, service_id) = seeded_tables(tenant);

    FileStore::open(&path)
        .write(|t| {
            *t = tables.clone();
            Ok(())
        })
        .unwrap();

    let scheduler = Scheduler::new(FileStore::open(&path));
    let actor = Actor {
        tenant_id: tenant,
        user_id: Uuid::new_v4(),
        role: Role::Attendant,
    };
    let appt = scheduler
        .create_appointment(
            &actor,
            NewAppointment {
                provider_id,
                service_id,
                start_at: Utc.with_ymd_and_hms(2026, 3, 16, 9, 0, 0).unwrap(),
                end_at: Utc.with_ymd_and_hms(2026, 3, 16, 9, 30, 0).unwrap(),
                client_name: "Ana".to_string(),
                client_phone: "+351910000001".to_string(),
            },
        )
        .unwrap();

    let reopened = FileStore::open(&path);
    let found = reopened.read(|t| Ok(t.appointment(tenant, appt.id).cloned())).unwrap();
    assert_eq!(found, Some(appt));
}

#[test]
fn failed_file_write_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let (tables, _, _) = seeded_tables(Uuid::new_v4());
    let store = FileStore::open(&path);
    store
        .write(|t| {
            *t = tables.clone();
            Ok(())
        })
        .unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    let result: Result<(), ScheduleError> = store.write(|t| {
        *t = Tables::new();
        Err(ScheduleError::Validation("abort".to_string()))
    });

    assert!(result.is_err());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn missing_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path().join("absent.json"));

    let tables = store.read(|t| Ok(t.clone())).unwrap();

    assert_eq!(tables, Tables::new());
}

#[test]
fn first_write_creates_missing_state_dir() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("tenants").join("acme");
    let path = nested.join("state.json");
    let store = FileStore::open(&path);

    assert_eq!(store.read(|t| Ok(t.clone())).unwrap(), Tables::new());
    assert!(!nested.exists(), "reading must not create directories");

    let (tables, _, _) = seeded_tables(Uuid::new_v4());
    store
        .write(|t| {
            *t = tables.clone();
            Ok(())
        })
        .unwrap();

    assert!(path.exists());
    assert_eq!(store.read(|t| Ok(t.clone())).unwrap(), tables);
}

#[test]
fn corrupt_file_is_a_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = FileStore::open(&path).read(|_| Ok(())).unwrap_err();

    assert!(matches!(err, ScheduleError::Storage(_)));
}

#[test]
fn state_file_uses_row_lists_and_template_json() {
    let (tables, _, _) = seeded_tables(Uuid::new_v4());

    let json = serde_json::to_value(&tables).unwrap();

    assert!(json["providers"].is_array());
    assert_eq!(
        json["providers"][0]["weekday_template"]["mon"],
        serde_json::json!([["09:00", "12:00"]])
    );
    let back: Tables = serde_json::from_value(json).unwrap();
    assert_eq!(back, tables);
}
