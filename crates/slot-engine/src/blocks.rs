//! Provider unavailability windows.

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::conflict::ensure_free;
use crate::day::day_bounds;
use crate::error::{Result, ScheduleError};
use crate::model::{Actor, AppointmentStatus, Block, BlockPatch, NewBlock, Role};
use crate::scheduler::Scheduler;
use crate::store::Store;

fn block_not_found(id: Uuid) -> ScheduleError {
    ScheduleError::NotFound { entity: "block", id }
}

impl<S: Store> Scheduler<S> {
    /// Create a block for a provider of the actor's tenant.
    ///
    /// An actor with the `provider` role may only block its own calendar. The new
    /// window is checked against the provider's other blocks, and also against
    /// active appointments when `unified_block_conflicts` is on.
    pub fn create_block(&self, actor: &Actor, req: NewBlock) -> Result<Block> {
        let tenant_id = actor.tenant_id;
        let check_appointments = self.config().unified_block_conflicts;

        let result = self.store().write(|tables| {
            let provider = tables.provider(tenant_id, req.provider_id).ok_or_else(|| {
                ScheduleError::forbidden(format!("provider {} is not valid for this tenant", req.provider_id))
            })?;
            if actor.role == Role::Provider && provider.user_id != Some(actor.user_id) {
                return Err(ScheduleError::forbidden("a provider may only block its own calendar"));
            }
            if req.start_at >= req.end_at {
                return Err(ScheduleError::validation("startAt must be before endAt"));
            }

            ensure_free(req.start_at, req.end_at, &tables.busy_blocks(tenant_id, req.provider_id, None))?;
            if check_appointments {
                let active = tables.busy_appointments(tenant_id, req.provider_id, None, AppointmentStatus::is_active);
                ensure_free(req.start_at, req.end_at, &active)?;
            }

            let block = Block {
                id: Uuid::new_v4(),
                tenant_id,
                provider_id: req.provider_id,
                start_at: req.start_at,
                end_at: req.end_at,
                reason: req.reason.clone(),
            };
            tables.insert_block(block.clone());
            Ok(block)
        });

        match &result {
            Ok(block) => info!(block_id = %block.id, provider_id = %block.provider_id, start = %block.start_at, end = %block.end_at, "block created"),
            Err(err) => warn!(provider_id = %req.provider_id, error = %err, "block refused"),
        }
        result
    }

    /// Move, resize or relabel a block. Omitted fields keep their current values.
    ///
    /// The effective window must not overlap an active appointment or another
    /// block of the same provider.
    pub fn update_block(&self, tenant_id: Uuid, id: Uuid, patch: BlockPatch) -> Result<Block> {
        let result = self.store().write(|tables| {
            let existing = tables.block(tenant_id, id).ok_or_else(|| block_not_found(id))?;
            let provider_id = existing.provider_id;
            let start_at = patch.start_at.unwrap_or(existing.start_at);
            let end_at = patch.end_at.unwrap_or(existing.end_at);
            if start_at >= end_at {
                return Err(ScheduleError::validation("startAt must be before endAt"));
            }

            let active = tables.busy_appointments(tenant_id, provider_id, None, AppointmentStatus::is_active);
            ensure_free(start_at, end_at, &active)?;
            ensure_free(start_at, end_at, &tables.busy_blocks(tenant_id, provider_id, Some(id)))?;

            let block = tables.block_mut(tenant_id, id).ok_or_else(|| block_not_found(id))?;
            block.start_at = start_at;
            block.end_at = end_at;
            if let Some(reason) = &patch.reason {
                block.reason = Some(reason.clone());
            }
            Ok(block.clone())
        });

        match &result {
            Ok(block) => info!(block_id = %id, start = %block.start_at, end = %block.end_at, "block updated"),
            Err(err) => warn!(block_id = %id, error = %err, "block update refused"),
        }
        result
    }

    /// Physically delete a block. No conflict check is needed to free time.
    pub fn remove_block(&self, tenant_id: Uuid, id: Uuid) -> Result<()> {
        self.store().write(|tables| {
            tables.remove_block(tenant_id, id).ok_or_else(|| block_not_found(id))?;
            Ok(())
        })?;
        info!(block_id = %id, "block removed");
        Ok(())
    }

    /// Blocks of a provider that touch `date` (UTC), ordered by start.
    pub fn list_blocks_for_day(&self, tenant_id: Uuid, provider_id: Uuid, date: NaiveDate) -> Result<Vec<Block>> {
        let (day_start, day_end) = day_bounds(date);
        self.store().read(|tables| {
            Ok(tables
                .blocks_in_window(tenant_id, provider_id, day_start, day_end)
                .into_iter()
                .cloned()
                .collect())
        })
    }
}
