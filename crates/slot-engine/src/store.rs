//! Persisted scheduling state and the transaction seam around it.
//!
//! Every mutating operation runs its conflict check and its write inside one
//! [`Store::write`] call. `write` is serialisable: the closure sees a private copy
//! of the tables taken under an exclusive lock, and the copy replaces the stored
//! state only when the closure returns `Ok`. Two concurrent bookings for the same
//! window therefore cannot both observe "no conflict", and a failed check never
//! leaves a partial update behind.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::conflict::{overlaps, Busy};
use crate::error::{Result, ScheduleError};
use crate::model::{Appointment, AppointmentStatus, Block, Provider, Service};

fn storage_err(context: &str, err: impl std::fmt::Display) -> ScheduleError {
    ScheduleError::Storage(format!("{context}: {err}"))
}

/// Row-oriented serialised form of [`Tables`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct TableRows {
    #[serde(default)]
    providers: Vec<Provider>,
    #[serde(default)]
    services: Vec<Service>,
    #[serde(default)]
    blocks: Vec<Block>,
    #[serde(default)]
    appointments: Vec<Appointment>,
}

/// All scheduling rows, keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "TableRows", into = "TableRows")]
pub struct Tables {
    providers: BTreeMap<Uuid, Provider>,
    services: BTreeMap<Uuid, Service>,
    blocks: BTreeMap<Uuid, Block>,
    appointments: BTreeMap<Uuid, Appointment>,
}

impl From<TableRows> for Tables {
    fn from(rows: TableRows) -> Self {
        Self {
            providers: rows.providers.into_iter().map(|p| (p.id, p)).collect(),
            services: rows.services.into_iter().map(|s| (s.id, s)).collect(),
            blocks: rows.blocks.into_iter().map(|b| (b.id, b)).collect(),
            appointments: rows.appointments.into_iter().map(|a| (a.id, a)).collect(),
        }
    }
}

impl From<Tables> for TableRows {
    fn from(tables: Tables) -> Self {
        Self {
            providers: tables.providers.into_values().collect(),
            services: tables.services.into_values().collect(),
            blocks: tables.blocks.into_values().collect(),
            appointments: tables.appointments.into_values().collect(),
        }
    }
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Reference data (seeded by external CRUD) ────────────────────────────

    pub fn upsert_provider(&mut self, provider: Provider) {
        self.providers.insert(provider.id, provider);
    }

    pub fn upsert_service(&mut self, service: Service) {
        self.services.insert(service.id, service);
    }

    /// Tenant-scoped provider lookup.
    pub fn provider(&self, tenant_id: Uuid, id: Uuid) -> Option<&Provider> {
        self.providers.get(&id).filter(|p| p.tenant_id == tenant_id)
    }

    /// Tenant-scoped service lookup.
    pub fn service(&self, tenant_id: Uuid, id: Uuid) -> Option<&Service> {
        self.services.get(&id).filter(|s| s.tenant_id == tenant_id)
    }

    // ── Blocks ──────────────────────────────────────────────────────────────

    pub fn block(&self, tenant_id: Uuid, id: Uuid) -> Option<&Block> {
        self.blocks.get(&id).filter(|b| b.tenant_id == tenant_id)
    }

    pub fn block_mut(&mut self, tenant_id: Uuid, id: Uuid) -> Option<&mut Block> {
        self.blocks.get_mut(&id).filter(|b| b.tenant_id == tenant_id)
    }

    pub fn insert_block(&mut self, block: Block) {
        self.blocks.insert(block.id, block);
    }

    pub fn remove_block(&mut self, tenant_id: Uuid, id: Uuid) -> Option<Block> {
        self.block(tenant_id, id)?;
        self.blocks.remove(&id)
    }

    /// Blocks of one provider overlapping `[start, end)`, ordered by start.
    pub fn blocks_in_window(
        &self,
        tenant_id: Uuid,
        provider_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<&Block> {
        let mut found: Vec<&Block> = self
            .blocks
            .values()
            .filter(|b| b.tenant_id == tenant_id && b.provider_id == provider_id)
            .filter(|b| overlaps(b.start_at, b.end_at, start, end))
            .collect();
        found.sort_by_key(|b| (b.start_at, b.id));
        found
    }

    /// Every block of one provider as conflict-detector input.
    pub fn busy_blocks(&self, tenant_id: Uuid, provider_id: Uuid, exclude: Option<Uuid>) -> Vec<Busy> {
        self.blocks
            .values()
            .filter(|b| b.tenant_id == tenant_id && b.provider_id == provider_id)
            .filter(|b| Some(b.id) != exclude)
            .map(Busy::from)
            .collect()
    }

    // ── Appointments ────────────────────────────────────────────────────────

    pub fn appointment(&self, tenant_id: Uuid, id: Uuid) -> Option<&Appointment> {
        self.appointments.get(&id).filter(|a| a.tenant_id == tenant_id)
    }

    pub fn appointment_mut(&mut self, tenant_id: Uuid, id: Uuid) -> Option<&mut Appointment> {
        self.appointments.get_mut(&id).filter(|a| a.tenant_id == tenant_id)
    }

    pub fn insert_appointment(&mut self, appointment: Appointment) {
        self.appointments.insert(appointment.id, appointment);
    }

    /// Time-holding appointments of one provider overlapping `[start, end)`.
    pub fn appointments_in_window(
        &self,
        tenant_id: Uuid,
        provider_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<&Appointment> {
        let mut found: Vec<&Appointment> = self
            .appointments
            .values()
            .filter(|a| a.tenant_id == tenant_id && a.provider_id == provider_id)
            .filter(|a| a.status.occupies_time())
            .filter(|a| overlaps(a.start_at, a.end_at, start, end))
            .collect();
        found.sort_by_key(|a| (a.start_at, a.id));
        found
    }

    /// Appointments of any status whose start lies in `[start, end)`.
    pub fn appointments_starting_in(
        &self,
        tenant_id: Uuid,
        provider_id: Option<Uuid>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Appointment> {
        let mut found: Vec<Appointment> = self
            .appointments
            .values()
            .filter(|a| a.tenant_id == tenant_id)
            .filter(|a| provider_id.is_none_or(|p| a.provider_id == p))
            .filter(|a| a.start_at >= start && a.start_at < end)
            .cloned()
            .collect();
        found.sort_by_key(|a| (a.start_at, a.id));
        found
    }

    /// Appointments of one provider whose status passes `holds_time`, as
    /// conflict-detector input.
    pub fn busy_appointments(
        &self,
        tenant_id: Uuid,
        provider_id: Uuid,
        exclude: Option<Uuid>,
        holds_time: fn(AppointmentStatus) -> bool,
    ) -> Vec<Busy> {
        self.appointments
            .values()
            .filter(|a| a.tenant_id == tenant_id && a.provider_id == provider_id)
            .filter(|a| Some(a.id) != exclude && holds_time(a.status))
            .map(Busy::from)
            .collect()
    }
}

/// Transactional access to [`Tables`].
pub trait Store: Send + Sync {
    /// Run `f` against a consistent snapshot.
    fn read<T>(&self, f: impl FnOnce(&Tables) -> Result<T>) -> Result<T>;

    /// Run `f` as a serialisable transaction; its changes commit only on `Ok`.
    fn write<T>(&self, f: impl FnOnce(&mut Tables) -> Result<T>) -> Result<T>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Process-local store guarded by a reader/writer lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new(tables: Tables) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> Result<Tables> {
        self.read(|tables| Ok(tables.clone()))
    }
}

impl Store for MemoryStore {
    fn read<T>(&self, f: impl FnOnce(&Tables) -> Result<T>) -> Result<T> {
        let guard = self.tables.read().map_err(|e| storage_err("read lock", e))?;
        f(&guard)
    }

    fn write<T>(&self, f: impl FnOnce(&mut Tables) -> Result<T>) -> Result<T> {
        let mut guard = self.tables.write().map_err(|e| storage_err("write lock", e))?;
        let mut draft = guard.clone();
        let out = f(&mut draft)?;
        *guard = draft;
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// JSON file on disk, serialised across processes with an advisory lock on a
/// sidecar `<file>.lock`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FileStore {
    /// Open (without creating) the state file at `path`. A missing file reads as
    /// empty tables and is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut lock_path = path.clone().into_os_string();
        lock_path.push(".lock");
        Self {
            path,
            lock_path: PathBuf::from(lock_path),
        }
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn lock_file(&self) -> Result<File> {
        OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)
            .map_err(|e| storage_err("open lock file", e))
    }

    fn load(&self) -> Result<Tables> {
        if !self.path.exists() {
            return Ok(Tables::new());
        }
        let file = File::open(&self.path).map_err(|e| storage_err("open state file", e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| storage_err("parse state file", e))
    }

    fn save(&self, tables: &Tables) -> Result<()> {
        let tmp = NamedTempFile::new_in(self.dir()).map_err(|e| storage_err("create temp file", e))?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, tables).map_err(|e| storage_err("encode state", e))?;
            writer.flush().map_err(|e| storage_err("write state", e))?;
        }
        tmp.persist(&self.path).map_err(|e| storage_err("replace state file", e))?;
        Ok(())
    }
}

impl Store for FileStore {
    fn read<T>(&self, f: impl FnOnce(&Tables) -> Result<T>) -> Result<T> {
        if !self.dir().exists() {
            return f(&Tables::new());
        }
        let lock = self.lock_file()?;
        FileExt::lock_shared(&lock).map_err(|e| storage_err("shared lock", e))?;
        let tables = self.load()?;
        f(&tables)
    }

    fn write<T>(&self, f: impl FnOnce(&mut Tables) -> Result<T>) -> Result<T> {
        fs::create_dir_all(self.dir()).map_err(|e| storage_err("create state dir", e))?;
        let lock = self.lock_file()?;
        FileExt::lock_exclusive(&lock).map_err(|e| storage_err("exclusive lock", e))?;
        let mut tables = self.load()?;
        let out = f(&mut tables)?;
        self.save(&tables)?;
        Ok(out)
    }
}
