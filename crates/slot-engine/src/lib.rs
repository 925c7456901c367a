//! # slot-engine
//!
//! Scheduling core for a multi-tenant appointment-booking backend.
//!
//! The engine derives a provider's free time for a UTC day from a weekly template
//! minus blocks and booked appointments, turns free time into fixed-duration
//! bookable slots, and guards every appointment and block mutation with a single
//! overlap rule: half-open intervals, where touching is not overlapping.
//!
//! ## Modules
//!
//! - [`interval`] — minute-range `subtract` / `merge` and `HH:MM` conversion
//! - [`template`] — validated weekly templates keyed by weekday
//! - [`day`] — UTC day windows, instant parsing, clipping to day minutes
//! - [`availability`] — free intervals for a provider-day
//! - [`slots`] — bookable slots from free intervals
//! - [`conflict`] — storage-agnostic overlap detection
//! - [`booking`] — appointment create / reschedule / status / cancel
//! - [`blocks`] — block create / update / remove
//! - [`store`] — tables plus serialisable in-memory and JSON-file stores
//! - [`config`] — scheduler settings
//! - [`error`] — error taxonomy
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use slot_engine::model::Provider;
//! use slot_engine::template::{Weekday, WeeklyTemplate};
//! use slot_engine::{MemoryStore, Scheduler, Tables};
//! use uuid::Uuid;
//!
//! let tenant = Uuid::new_v4();
//! let provider = Provider {
//!     id: Uuid::new_v4(),
//!     tenant_id: tenant,
//!     user_id: None,
//!     name: "Rafa".into(),
//!     weekday_template: WeeklyTemplate::new().with_day(Weekday::Mon, &[("09:00", "12:00")]).unwrap(),
//!     active: true,
//! };
//! let mut tables = Tables::new();
//! tables.upsert_provider(provider.clone());
//!
//! let scheduler = Scheduler::new(MemoryStore::new(tables));
//! let monday = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
//! let day = scheduler.get_day_availability(tenant, provider.id, monday).unwrap();
//! assert_eq!(day.intervals[0].start, "09:00");
//! assert_eq!(day.intervals[0].end, "12:00");
//! ```

pub mod availability;
pub mod blocks;
pub mod booking;
pub mod config;
pub mod conflict;
pub mod day;
pub mod error;
pub mod interval;
pub mod model;
pub mod scheduler;
pub mod slots;
pub mod store;
pub mod template;

pub use availability::{free_intervals, DayAvailability, FreeInterval};
pub use config::SchedulerConfig;
pub use conflict::{find_conflicts, first_conflict, Busy, Conflict};
pub use day::{parse_day, parse_instant};
pub use error::{ConflictKind, ScheduleError};
pub use interval::{merge, subtract, MinuteRange};
pub use scheduler::Scheduler;
pub use slots::{generate_slots, DaySlots, Slot};
pub use store::{FileStore, MemoryStore, Store, Tables};
