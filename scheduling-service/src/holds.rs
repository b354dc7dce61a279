use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use store_layer::{Entity, Repository, StoreError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{SchedulingError, SchedulingResult};
use crate::models::{Hold, SlotStatus};
use crate::referrals::ReferralLifecycle;
use crate::rules::SchedulingRules;
use crate::slots::SlotLedger;

/// Time-boxed slot reservation that must be confirmed into a booking or it
/// silently expires.
///
/// Expiration is cooperative: there is no background timer. Every operation
/// that inspects a hold first compares `now` against `expires_at` and, if
/// exceeded, releases the slot before signaling `HoldExpired`.
#[derive(Clone)]
pub struct BookingHoldService {
    holds: Arc<dyn Repository<Hold>>,
    slots: SlotLedger,
    referrals: ReferralLifecycle,
    rules: SchedulingRules,
}

impl BookingHoldService {
    pub fn new(
        holds: Arc<dyn Repository<Hold>>,
        slots: SlotLedger,
        referrals: ReferralLifecycle,
        rules: SchedulingRules,
    ) -> Self {
        Self {
            holds,
            slots,
            referrals,
            rules,
        }
    }

    /// Place a hold on an available slot for an eligible referral.
    pub async fn place(
        &self,
        slot_id: Uuid,
        referral_id: Uuid,
        duration_minutes: i64,
    ) -> SchedulingResult<Hold> {
        self.place_at(slot_id, referral_id, duration_minutes, Utc::now())
            .await
    }

    /// Place a hold, evaluated at an explicit instant.
    pub async fn place_at(
        &self,
        slot_id: Uuid,
        referral_id: Uuid,
        duration_minutes: i64,
        now: DateTime<Utc>,
    ) -> SchedulingResult<Hold> {
        if !self.rules.hold_duration_valid(duration_minutes) {
            return Err(SchedulingError::Validation(format!(
                "hold duration must be between {} and {} minutes, got {}",
                self.rules.min_hold_minutes, self.rules.max_hold_minutes, duration_minutes
            )));
        }

        self.referrals.require_bookable(referral_id).await?;

        let slot = self.slots.require(slot_id).await?;
        if slot.status != SlotStatus::Available {
            return Err(SchedulingError::SlotUnavailable {
                slot_id,
                status: slot.status,
            });
        }

        let hold = Hold {
            id: Uuid::new_v4(),
            slot_id,
            referral_id,
            duration_minutes,
            created_at: now,
            expires_at: now + Duration::minutes(duration_minutes),
        };
        self.holds.insert(hold.clone()).await?;
        self.slots.mark_held(slot_id, hold.id).await?;
        info!(hold_id = %hold.id, %slot_id, %referral_id, expires_at = %hold.expires_at, "hold placed");
        Ok(hold)
    }

    /// Fetch a hold, enforcing lazy expiration: an expired hold is removed,
    /// its slot released, and `HoldExpired` returned.
    pub async fn inspect_at(&self, hold_id: Uuid, now: DateTime<Utc>) -> SchedulingResult<Hold> {
        let hold = self.holds.get(hold_id).await?.ok_or_else(|| {
            SchedulingError::Store(StoreError::NotFound {
                entity: Hold::KIND,
                id: hold_id,
            })
        })?;

        if hold.is_expired(now) {
            warn!(%hold_id, expired_at = %hold.expires_at, "hold expired, releasing slot");
            self.expire(&hold).await?;
            return Err(SchedulingError::HoldExpired {
                hold_id,
                expired_at: hold.expires_at,
            });
        }
        Ok(hold)
    }

    pub async fn inspect(&self, hold_id: Uuid) -> SchedulingResult<Hold> {
        self.inspect_at(hold_id, Utc::now()).await
    }

    /// Find the hold currently reserving a slot, if any.
    pub async fn find_for_slot(&self, slot_id: Uuid) -> SchedulingResult<Option<Hold>> {
        Ok(self
            .holds
            .list()
            .await?
            .into_iter()
            .find(|hold| hold.slot_id == slot_id))
    }

    /// Destroy a hold after its slot has been booked. The slot is not touched.
    pub async fn discard(&self, hold_id: Uuid) -> SchedulingResult<()> {
        self.holds.remove(hold_id).await?;
        debug!(%hold_id, "hold discarded");
        Ok(())
    }

    /// Give up a hold and return its slot to available. Idempotent: releasing
    /// a hold that already expired or never existed reports `false`.
    pub async fn release(&self, hold_id: Uuid) -> SchedulingResult<bool> {
        match self.holds.get(hold_id).await? {
            Some(hold) => {
                self.expire(&hold).await?;
                info!(%hold_id, slot_id = %hold.slot_id, "hold released");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Proactively release every expired hold so stale reservations do not
    /// block slot discovery. Returns the number of holds released.
    pub async fn sweep_expired_at(&self, now: DateTime<Utc>) -> SchedulingResult<usize> {
        let mut released = 0;
        for hold in self.holds.list().await? {
            if hold.is_expired(now) {
                self.expire(&hold).await?;
                released += 1;
            }
        }
        if released > 0 {
            info!(released, "expired holds swept");
        }
        Ok(released)
    }

    pub async fn sweep_expired(&self) -> SchedulingResult<usize> {
        self.sweep_expired_at(Utc::now()).await
    }

    async fn expire(&self, hold: &Hold) -> SchedulingResult<()> {
        self.slots.release(hold.slot_id).await?;
        self.holds.remove(hold.id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Modality, Referral, ReferralStatus, SafetyScreening, Slot, SlotQuery,
    };
    use store_layer::MemoryRepository;

    struct Fixture {
        holds: BookingHoldService,
        slots: SlotLedger,
        slot_id: Uuid,
        referral_id: Uuid,
    }

    async fn fixture(slot_status: SlotStatus, referral_status: ReferralStatus) -> Fixture {
        let now = Utc::now();
        let slot = Slot {
            id: Uuid::new_v4(),
            center_id: Uuid::new_v4(),
            modality: Modality::Mri,
            body_part: "right knee".to_string(),
            start_time: now + Duration::days(5),
            end_time: now + Duration::days(5) + Duration::minutes(30),
            price: rust_decimal::Decimal::new(975_00, 2),
            status: slot_status,
        };
        let referral = Referral {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            referrer_id: Uuid::new_v4(),
            modality: Modality::Mri,
            body_part: "right knee".to_string(),
            status: referral_status,
            safety_screening: SafetyScreening::default(),
            created_at: now,
            updated_at: now,
        };

        let slot_repo = Arc::new(MemoryRepository::new());
        slot_repo.insert(slot.clone()).await.unwrap();
        let referral_repo = Arc::new(MemoryRepository::new());
        referral_repo.insert(referral.clone()).await.unwrap();

        let slots = SlotLedger::new(slot_repo);
        let referrals = ReferralLifecycle::new(referral_repo);
        let holds = BookingHoldService::new(
            Arc::new(MemoryRepository::new()),
            slots.clone(),
            referrals,
            SchedulingRules::default(),
        );

        Fixture {
            holds,
            slots,
            slot_id: slot.id,
            referral_id: referral.id,
        }
    }

    #[tokio::test]
    async fn place_hold_on_available_slot() {
        let fx = fixture(SlotStatus::Available, ReferralStatus::Pending).await;
        let now = Utc::now();

        let hold = fx
            .holds
            .place_at(fx.slot_id, fx.referral_id, 15, now)
            .await
            .unwrap();
        assert_eq!(hold.expires_at, now + Duration::minutes(15));

        let slot = fx.slots.require(fx.slot_id).await.unwrap();
        assert_eq!(slot.status, SlotStatus::Held);
    }

    #[tokio::test]
    async fn place_hold_on_non_available_slot_fails() {
        for status in [SlotStatus::Held, SlotStatus::Booked, SlotStatus::Cancelled] {
            let fx = fixture(status, ReferralStatus::Approved).await;
            let err = fx
                .holds
                .place(fx.slot_id, fx.referral_id, 15)
                .await
                .unwrap_err();
            assert!(matches!(err, SchedulingError::SlotUnavailable { .. }));
        }
    }

    #[tokio::test]
    async fn place_hold_for_terminal_referral_fails() {
        let fx = fixture(SlotStatus::Available, ReferralStatus::Cancelled).await;
        let err = fx
            .holds
            .place(fx.slot_id, fx.referral_id, 15)
            .await
            .unwrap_err();
        assert!(matches!(err, SchedulingError::ReferralNotEligible { .. }));
    }

    #[tokio::test]
    async fn hold_duration_out_of_bounds_fails() {
        let fx = fixture(SlotStatus::Available, ReferralStatus::Pending).await;
        for minutes in [4, 61, 0, -10] {
            let err = fx
                .holds
                .place(fx.slot_id, fx.referral_id, minutes)
                .await
                .unwrap_err();
            assert!(matches!(err, SchedulingError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn expired_hold_is_released_on_inspect() {
        let fx = fixture(SlotStatus::Available, ReferralStatus::Pending).await;
        let placed_at = Utc::now();
        let hold = fx
            .holds
            .place_at(fx.slot_id, fx.referral_id, 15, placed_at)
            .await
            .unwrap();

        // Sixteen minutes later the hold is past its window.
        let later = placed_at + Duration::minutes(16);
        let err = fx.holds.inspect_at(hold.id, later).await.unwrap_err();
        assert!(matches!(err, SchedulingError::HoldExpired { .. }));

        let slot = fx.slots.require(fx.slot_id).await.unwrap();
        assert_eq!(slot.status, SlotStatus::Available);
    }

    #[tokio::test]
    async fn inspect_within_window_returns_hold() {
        let fx = fixture(SlotStatus::Available, ReferralStatus::Pending).await;
        let placed_at = Utc::now();
        let hold = fx
            .holds
            .place_at(fx.slot_id, fx.referral_id, 30, placed_at)
            .await
            .unwrap();

        let found = fx
            .holds
            .inspect_at(hold.id, placed_at + Duration::minutes(29))
            .await
            .unwrap();
        assert_eq!(found.id, hold.id);
    }

    #[tokio::test]
    async fn release_returns_slot_to_available() {
        let fx = fixture(SlotStatus::Available, ReferralStatus::Pending).await;
        let hold = fx.holds.place(fx.slot_id, fx.referral_id, 20).await.unwrap();

        assert!(fx.holds.release(hold.id).await.unwrap());
        let slot = fx.slots.require(fx.slot_id).await.unwrap();
        assert_eq!(slot.status, SlotStatus::Available);

        // Releasing again is a quiet no-op.
        assert!(!fx.holds.release(hold.id).await.unwrap());
    }

    #[tokio::test]
    async fn sweep_releases_only_expired_holds() {
        let fx = fixture(SlotStatus::Available, ReferralStatus::Pending).await;
        let placed_at = Utc::now();
        fx.holds
            .place_at(fx.slot_id, fx.referral_id, 10, placed_at)
            .await
            .unwrap();

        let swept = fx
            .holds
            .sweep_expired_at(placed_at + Duration::minutes(5))
            .await
            .unwrap();
        assert_eq!(swept, 0);

        let swept = fx
            .holds
            .sweep_expired_at(placed_at + Duration::minutes(11))
            .await
            .unwrap();
        assert_eq!(swept, 1);

        let available = fx
            .slots
            .find_slots(&SlotQuery {
                status: Some(SlotStatus::Available),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(available.len(), 1);
    }
}
