use std::sync::Arc;

use chrono::Utc;
use store_layer::{Entity, Repository, StoreError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{SchedulingError, SchedulingResult};
use crate::models::{Referral, ReferralStatus};

/// Tracks referral status and its eligibility to progress to booking.
#[derive(Clone)]
pub struct ReferralLifecycle {
    referrals: Arc<dyn Repository<Referral>>,
}

impl ReferralLifecycle {
    pub fn new(referrals: Arc<dyn Repository<Referral>>) -> Self {
        Self { referrals }
    }

    /// Booking is permitted only before the referral reaches a terminal state.
    pub fn is_bookable(status: ReferralStatus) -> bool {
        matches!(status, ReferralStatus::Pending | ReferralStatus::Approved)
    }

    /// All valid next statuses for a given current status.
    pub fn valid_transitions(current: ReferralStatus) -> Vec<ReferralStatus> {
        match current {
            ReferralStatus::Pending => vec![
                ReferralStatus::Approved,
                ReferralStatus::Completed,
                ReferralStatus::Cancelled,
            ],
            ReferralStatus::Approved => {
                vec![ReferralStatus::Completed, ReferralStatus::Cancelled]
            }
            // Terminal states - no transitions allowed
            ReferralStatus::Completed | ReferralStatus::Cancelled => vec![],
        }
    }

    pub fn validate_transition(
        from: ReferralStatus,
        to: ReferralStatus,
    ) -> SchedulingResult<()> {
        if !Self::valid_transitions(from).contains(&to) {
            warn!(?from, ?to, "invalid referral transition attempted");
            return Err(SchedulingError::InvalidReferralTransition { from, to });
        }
        Ok(())
    }

    /// Fetch a referral, failing if it does not exist.
    pub async fn require(&self, referral_id: Uuid) -> SchedulingResult<Referral> {
        self.referrals.get(referral_id).await?.ok_or_else(|| {
            SchedulingError::Store(StoreError::NotFound {
                entity: Referral::KIND,
                id: referral_id,
            })
        })
    }

    /// Register a new referral in pending status.
    pub async fn intake(&self, referral: Referral) -> SchedulingResult<Referral> {
        self.referrals.insert(referral.clone()).await?;
        info!(referral_id = %referral.id, patient_id = %referral.patient_id, "referral received");
        Ok(referral)
    }

    /// Approve a pending referral. Safety screening must be completed first.
    pub async fn approve(&self, referral_id: Uuid) -> SchedulingResult<Referral> {
        let referral = self.require(referral_id).await?;
        Self::validate_transition(referral.status, ReferralStatus::Approved)?;
        if !referral.safety_screening.completed {
            return Err(SchedulingError::Validation(format!(
                "referral {} cannot be approved before safety screening is completed",
                referral_id
            )));
        }
        self.set_status(referral, ReferralStatus::Approved).await
    }

    /// Cancel a referral. Terminal, no further transitions.
    pub async fn cancel(&self, referral_id: Uuid) -> SchedulingResult<Referral> {
        let referral = self.require(referral_id).await?;
        Self::validate_transition(referral.status, ReferralStatus::Cancelled)?;
        self.set_status(referral, ReferralStatus::Cancelled).await
    }

    /// Advance a referral to completed when its report is finalized.
    /// No-op if the referral already reached a terminal state.
    pub async fn complete_if_active(&self, referral_id: Uuid) -> SchedulingResult<Referral> {
        let referral = self.require(referral_id).await?;
        if referral.status.is_terminal() {
            debug!(%referral_id, status = ?referral.status, "referral already terminal");
            return Ok(referral);
        }
        self.set_status(referral, ReferralStatus::Completed).await
    }

    /// Ensure a referral may still yield a booking.
    pub async fn require_bookable(&self, referral_id: Uuid) -> SchedulingResult<Referral> {
        let referral = self.require(referral_id).await?;
        if !Self::is_bookable(referral.status) {
            return Err(SchedulingError::ReferralNotEligible {
                referral_id,
                status: referral.status,
            });
        }
        Ok(referral)
    }

    async fn set_status(
        &self,
        mut referral: Referral,
        status: ReferralStatus,
    ) -> SchedulingResult<Referral> {
        info!(referral_id = %referral.id, from = ?referral.status, to = ?status, "referral transitioned");
        referral.status = status;
        referral.updated_at = Utc::now();
        self.referrals.update(referral.clone()).await?;
        Ok(referral)
    }
}
