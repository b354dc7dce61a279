use std::sync::Arc;

use store_layer::{Entity, Repository, StoreError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{SchedulingError, SchedulingResult};
use crate::models::{Slot, SlotQuery, SlotStatus};

/// Tracks slot status transitions.
///
/// Slots are never deleted, only status-transitioned:
/// available -> held -> booked -> completed | cancelled.
#[derive(Clone)]
pub struct SlotLedger {
    slots: Arc<dyn Repository<Slot>>,
}

impl SlotLedger {
    pub fn new(slots: Arc<dyn Repository<Slot>>) -> Self {
        Self { slots }
    }

    /// Register a slot from a center's schedule import.
    pub async fn import(&self, slot: Slot) -> SchedulingResult<Slot> {
        self.slots.insert(slot.clone()).await?;
        debug!(slot_id = %slot.id, center_id = %slot.center_id, "slot imported");
        Ok(slot)
    }

    /// Fetch a slot, failing if it does not exist.
    pub async fn require(&self, slot_id: Uuid) -> SchedulingResult<Slot> {
        self.slots
            .get(slot_id)
            .await?
            .ok_or_else(|| {
                SchedulingError::Store(StoreError::NotFound {
                    entity: Slot::KIND,
                    id: slot_id,
                })
            })
    }

    /// Transition an available slot to held.
    pub async fn mark_held(&self, slot_id: Uuid, hold_id: Uuid) -> SchedulingResult<Slot> {
        let mut slot = self.require(slot_id).await?;
        if slot.status != SlotStatus::Available {
            warn!(%slot_id, status = ?slot.status, "refusing to hold slot");
            return Err(SchedulingError::SlotUnavailable {
                slot_id,
                status: slot.status,
            });
        }
        slot.status = SlotStatus::Held;
        self.slots.update(slot.clone()).await?;
        debug!(%slot_id, %hold_id, "slot held");
        Ok(slot)
    }

    /// Transition a slot to booked. Accepts held slots (confirmation flow)
    /// and available slots (direct booking flow).
    pub async fn mark_booked(&self, slot_id: Uuid) -> SchedulingResult<Slot> {
        let mut slot = self.require(slot_id).await?;
        if !matches!(slot.status, SlotStatus::Held | SlotStatus::Available) {
            return Err(SchedulingError::SlotUnavailable {
                slot_id,
                status: slot.status,
            });
        }
        slot.status = SlotStatus::Booked;
        self.slots.update(slot.clone()).await?;
        info!(%slot_id, "slot booked");
        Ok(slot)
    }

    /// Return a held or booked slot to available. Idempotent: releasing an
    /// already-available slot is a no-op, as is releasing a terminal slot.
    pub async fn release(&self, slot_id: Uuid) -> SchedulingResult<Slot> {
        let mut slot = self.require(slot_id).await?;
        match slot.status {
            SlotStatus::Held | SlotStatus::Booked => {
                slot.status = SlotStatus::Available;
                self.slots.update(slot.clone()).await?;
                debug!(%slot_id, "slot released");
            }
            SlotStatus::Available | SlotStatus::Completed | SlotStatus::Cancelled => {}
        }
        Ok(slot)
    }

    /// Mark a booked slot completed.
    pub async fn mark_completed(&self, slot_id: Uuid) -> SchedulingResult<Slot> {
        self.transition_from_booked(slot_id, SlotStatus::Completed)
            .await
    }

    /// Mark a booked slot cancelled.
    pub async fn mark_cancelled(&self, slot_id: Uuid) -> SchedulingResult<Slot> {
        self.transition_from_booked(slot_id, SlotStatus::Cancelled)
            .await
    }

    async fn transition_from_booked(
        &self,
        slot_id: Uuid,
        to: SlotStatus,
    ) -> SchedulingResult<Slot> {
        let mut slot = self.require(slot_id).await?;
        if slot.status != SlotStatus::Booked {
            return Err(SchedulingError::SlotUnavailable {
                slot_id,
                status: slot.status,
            });
        }
        slot.status = to;
        self.slots.update(slot.clone()).await?;
        info!(%slot_id, status = ?to, "slot transitioned");
        Ok(slot)
    }

    /// List slots matching the query filters, ordered by start time.
    pub async fn find_slots(&self, query: &SlotQuery) -> SchedulingResult<Vec<Slot>> {
        let mut slots: Vec<Slot> = self
            .slots
            .list()
            .await?
            .into_iter()
            .filter(|slot| {
                query.center_id.map_or(true, |id| slot.center_id == id)
                    && query.modality.map_or(true, |m| slot.modality == m)
                    && query.status.map_or(true, |s| slot.status == s)
                    && query.from.map_or(true, |from| slot.start_time >= from)
                    && query.to.map_or(true, |to| slot.start_time <= to)
            })
            .collect();
        slots.sort_by_key(|slot| slot.start_time);
        Ok(slots)
    }
}
