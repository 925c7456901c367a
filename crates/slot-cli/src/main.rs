//! `slotctl` CLI — run scheduling operations against a JSON state file.
//!
//! ## Usage
//!
//! ```sh
//! # Free time for a provider on a day
//! slotctl --state state.json --tenant $T availability --provider $P --date 2026-03-16
//!
//! # Bookable slots for a service
//! slotctl --state state.json --tenant $T slots --provider $P --service $S --date 2026-03-16
//!
//! # Book, reschedule, cancel
//! slotctl --state state.json --tenant $T --user $U book --provider $P --service $S \
//!     --start 2026-03-16T09:00:00Z --end 2026-03-16T09:30:00Z --client-name Ana --client-phone +351910000001
//! slotctl --state state.json --tenant $T reschedule --id $A --start 2026-03-16T10:00:00Z
//! slotctl --state state.json --tenant $T cancel --id $A
//!
//! # Blocks
//! slotctl --state state.json --tenant $T --user $U block create --provider $P \
//!     --start 2026-03-16T12:00:00Z --end 2026-03-16T13:00:00Z --reason lunch
//! ```
//!
//! Results are printed to stdout as pretty JSON. Logs go to stderr; set
//! `RUST_LOG` or pass `--verbose` for more detail.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use slot_engine::model::{Actor, AppointmentStatus, BlockPatch, NewAppointment, NewBlock, Reschedule, Role};
use slot_engine::{parse_day, parse_instant, FileStore, Scheduler};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "slotctl", version, about = "Appointment scheduling engine CLI")]
struct Cli {
    /// JSON state file holding providers, services, blocks and appointments
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// TOML file with scheduler settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Tenant the caller belongs to
    #[arg(long, global = true)]
    tenant: Option<Uuid>,

    /// Calling user (required for commands that record or check the actor)
    #[arg(long, global = true)]
    user: Option<Uuid>,

    /// Role of the calling user
    #[arg(long, global = true, value_enum, default_value_t = RoleArg::Admin)]
    role: RoleArg,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Owner,
    Admin,
    Attendant,
    Provider,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Owner => Role::Owner,
            RoleArg::Admin => Role::Admin,
            RoleArg::Attendant => Role::Attendant,
            RoleArg::Provider => Role::Provider,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Free intervals for a provider on a UTC day
    Availability {
        #[arg(long)]
        provider: Uuid,
        /// Day as YYYY-MM-DD
        #[arg(long, value_parser = parse_day)]
        date: NaiveDate,
    },
    /// Bookable slots for a provider and service on a UTC day
    Slots {
        #[arg(long)]
        provider: Uuid,
        #[arg(long)]
        service: Uuid,
        #[arg(long, value_parser = parse_day)]
        date: NaiveDate,
    },
    /// Book an appointment
    Book {
        #[arg(long)]
        provider: Uuid,
        #[arg(long)]
        service: Uuid,
        #[arg(long, value_parser = parse_instant)]
        start: DateTime<Utc>,
        #[arg(long, value_parser = parse_instant)]
        end: DateTime<Utc>,
        #[arg(long)]
        client_name: String,
        #[arg(long)]
        client_phone: String,
    },
    /// List appointments starting on a UTC day
    List {
        #[arg(long, value_parser = parse_day)]
        date: NaiveDate,
        #[arg(long)]
        provider: Option<Uuid>,
    },
    /// Move an appointment; a lone --start keeps the current duration
    Reschedule {
        #[arg(long)]
        id: Uuid,
        #[arg(long, value_parser = parse_instant)]
        start: Option<DateTime<Utc>>,
        #[arg(long, value_parser = parse_instant)]
        end: Option<DateTime<Utc>>,
    },
    /// Set an appointment's status
    Status {
        #[arg(long)]
        id: Uuid,
        /// scheduled, in_service, done, no_show or cancelled
        #[arg(long)]
        status: AppointmentStatus,
    },
    /// Cancel an appointment (idempotent)
    Cancel {
        #[arg(long)]
        id: Uuid,
    },
    /// Manage provider blocks
    #[command(subcommand)]
    Block(BlockCommands),
}

#[derive(Subcommand)]
enum BlockCommands {
    /// Block a window on a provider's calendar
    Create {
        #[arg(long)]
        provider: Uuid,
        #[arg(long, value_parser = parse_instant)]
        start: DateTime<Utc>,
        #[arg(long, value_parser = parse_instant)]
        end: DateTime<Utc>,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Move, resize or relabel a block
    Update {
        #[arg(long)]
        id: Uuid,
        #[arg(long, value_parser = parse_instant)]
        start: Option<DateTime<Utc>>,
        #[arg(long, value_parser = parse_instant)]
        end: Option<DateTime<Utc>>,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Delete a block
    Remove {
        #[arg(long)]
        id: Uuid,
    },
    /// Blocks touching a UTC day
    List {
        #[arg(long)]
        provider: Uuid,
        #[arg(long, value_parser = parse_day)]
        date: NaiveDate,
    },
}

#[derive(Serialize)]
struct Deleted {
    deleted: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    config::init_logging(cli.verbose);

    let state = cli.state.clone().context("--state <file> is required")?;
    let settings = config::load(cli.config.as_deref())?;
    let scheduler = Scheduler::with_config(FileStore::open(state), settings).context("Invalid scheduler settings")?;
    let tenant = cli.tenant.context("--tenant <uuid> is required")?;

    match cli.command {
        Commands::Availability { provider, date } => {
            print_json(&scheduler.get_day_availability(tenant, provider, date)?)?;
        }
        Commands::Slots {
            provider,
            service,
            date,
        } => {
            print_json(&scheduler.get_day_slots(tenant, provider, service, date)?)?;
        }
        Commands::Book {
            provider,
            service,
            start,
            end,
            client_name,
            client_phone,
        } => {
            let actor = actor(cli.user, tenant, cli.role)?;
            let req = NewAppointment {
                provider_id: provider,
                service_id: service,
                start_at: start,
                end_at: end,
                client_name,
                client_phone,
            };
            print_json(&scheduler.create_appointment(&actor, req)?)?;
        }
        Commands::List { date, provider } => {
            print_json(&scheduler.list_appointments_for_day(tenant, date, provider)?)?;
        }
        Commands::Reschedule { id, start, end } => {
            let req = Reschedule {
                start_at: start,
                end_at: end,
            };
            print_json(&scheduler.reschedule_appointment(tenant, id, req)?)?;
        }
        Commands::Status { id, status } => {
            print_json(&scheduler.update_appointment_status(tenant, id, status)?)?;
        }
        Commands::Cancel { id } => {
            print_json(&scheduler.cancel_appointment(tenant, id)?)?;
        }
        Commands::Block(BlockCommands::Create {
            provider,
            start,
            end,
            reason,
        }) => {
            let actor = actor(cli.user, tenant, cli.role)?;
            let req = NewBlock {
                provider_id: provider,
                start_at: start,
                end_at: end,
                reason,
            };
            print_json(&scheduler.create_block(&actor, req)?)?;
        }
        Commands::Block(BlockCommands::Update { id, start, end, reason }) => {
            let patch = BlockPatch {
                start_at: start,
                end_at: end,
                reason,
            };
            print_json(&scheduler.update_block(tenant, id, patch)?)?;
        }
        Commands::Block(BlockCommands::Remove { id }) => {
            scheduler.remove_block(tenant, id)?;
            print_json(&Deleted { deleted: true })?;
        }
        Commands::Block(BlockCommands::List { provider, date }) => {
            print_json(&scheduler.list_blocks_for_day(tenant, provider, date)?)?;
        }
    }

    Ok(())
}

fn actor(user: Option<Uuid>, tenant_id: Uuid, role: RoleArg) -> Result<Actor> {
    let user_id = user.context("--user <uuid> is required for this command")?;
    Ok(Actor {
        tenant_id,
        user_id,
        role: role.into(),
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value).context("Failed to encode result")?;
    println!("{}", pretty);
    Ok(())
}
