use std::sync::Arc;

use chrono::{DateTime, Utc};
use store_layer::{Entity, Repository, StoreError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{SchedulingError, SchedulingResult};
use crate::holds::BookingHoldService;
use crate::models::{
    Appointment, AppointmentQuery, AppointmentStatus, Hold, Referral, Slot, SlotQuery, SlotStatus,
};
use crate::referrals::ReferralLifecycle;
use crate::rules::SchedulingRules;
use crate::slots::SlotLedger;

/// Creates, cancels, and reschedules appointments.
///
/// Every mutation validates fully before any write: referral eligibility,
/// slot availability, the patient conflict check, and the change-window
/// guard all pass before the first record is touched.
#[derive(Clone)]
pub struct AppointmentScheduler {
    appointments: Arc<dyn Repository<Appointment>>,
    slots: SlotLedger,
    holds: BookingHoldService,
    referrals: ReferralLifecycle,
    rules: SchedulingRules,
}

impl AppointmentScheduler {
    pub fn new(
        appointments: Arc<dyn Repository<Appointment>>,
        slots: SlotLedger,
        holds: BookingHoldService,
        referrals: ReferralLifecycle,
        rules: SchedulingRules,
    ) -> Self {
        Self {
            appointments,
            slots,
            holds,
            referrals,
            rules,
        }
    }

    /// All valid next statuses for a given current status.
    pub fn valid_transitions(current: AppointmentStatus) -> Vec<AppointmentStatus> {
        match current {
            AppointmentStatus::Confirmed => vec![
                AppointmentStatus::InProgress,
                AppointmentStatus::Cancelled,
                AppointmentStatus::NoShow,
            ],
            AppointmentStatus::InProgress => {
                vec![AppointmentStatus::Completed, AppointmentStatus::Cancelled]
            }
            // Terminal states - no transitions allowed
            AppointmentStatus::Completed
            | AppointmentStatus::Cancelled
            | AppointmentStatus::NoShow => vec![],
        }
    }

    pub fn validate_transition(
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> SchedulingResult<()> {
        if !Self::valid_transitions(from).contains(&to) {
            warn!(?from, ?to, "invalid appointment transition attempted");
            return Err(SchedulingError::InvalidAppointmentTransition { from, to });
        }
        Ok(())
    }

    /// Fetch an appointment, failing if it does not exist.
    pub async fn require(&self, appointment_id: Uuid) -> SchedulingResult<Appointment> {
        self.appointments.get(appointment_id).await?.ok_or_else(|| {
            SchedulingError::Store(StoreError::NotFound {
                entity: Appointment::KIND,
                id: appointment_id,
            })
        })
    }

    /// Book an appointment directly against a slot.
    ///
    /// The slot must be available, or held by an unexpired hold belonging to
    /// the same referral (in which case the hold is consumed).
    pub async fn create(&self, referral_id: Uuid, slot_id: Uuid) -> SchedulingResult<Appointment> {
        self.create_at(referral_id, slot_id, Utc::now()).await
    }

    pub async fn create_at(
        &self,
        referral_id: Uuid,
        slot_id: Uuid,
        now: DateTime<Utc>,
    ) -> SchedulingResult<Appointment> {
        let referral = self.referrals.require_bookable(referral_id).await?;
        let slot = self.slots.require(slot_id).await?;

        let consumed_hold = match slot.status {
            SlotStatus::Available => None,
            SlotStatus::Held => {
                let hold = self.hold_for_slot(slot_id, now).await?;
                if hold.referral_id != referral_id {
                    return Err(SchedulingError::SlotUnavailable {
                        slot_id,
                        status: SlotStatus::Held,
                    });
                }
                Some(hold)
            }
            status => {
                return Err(SchedulingError::SlotUnavailable { slot_id, status });
            }
        };

        self.check_conflicts(referral.patient_id, &slot, None).await?;

        let appointment = self.build_appointment(&referral, &slot, now);
        self.appointments.insert(appointment.clone()).await?;
        self.slots.mark_booked(slot_id).await?;
        if let Some(hold) = consumed_hold {
            self.holds.discard(hold.id).await?;
        }
        info!(
            appointment_id = %appointment.id,
            %referral_id,
            %slot_id,
            patient_id = %appointment.patient_id,
            "appointment created"
        );
        Ok(appointment)
    }

    /// Confirm a hold into a booked appointment.
    ///
    /// Fails with `HoldExpired` past `expires_at` (the slot returns to
    /// available); otherwise books the slot and destroys the hold.
    pub async fn confirm_hold(&self, hold_id: Uuid) -> SchedulingResult<Appointment> {
        self.confirm_hold_at(hold_id, Utc::now()).await
    }

    pub async fn confirm_hold_at(
        &self,
        hold_id: Uuid,
        now: DateTime<Utc>,
    ) -> SchedulingResult<Appointment> {
        let hold = self.holds.inspect_at(hold_id, now).await?;
        let referral = self.referrals.require_bookable(hold.referral_id).await?;
        let slot = self.slots.require(hold.slot_id).await?;

        self.check_conflicts(referral.patient_id, &slot, None).await?;

        let appointment = self.build_appointment(&referral, &slot, now);
        self.appointments.insert(appointment.clone()).await?;
        self.slots.mark_booked(slot.id).await?;
        self.holds.discard(hold_id).await?;
        info!(appointment_id = %appointment.id, %hold_id, "hold confirmed into appointment");
        Ok(appointment)
    }

    /// Cancel an appointment, refusing changes inside the 24-hour window.
    pub async fn cancel(
        &self,
        appointment_id: Uuid,
        reason: impl Into<String>,
    ) -> SchedulingResult<Appointment> {
        self.cancel_at(appointment_id, reason, Utc::now()).await
    }

    pub async fn cancel_at(
        &self,
        appointment_id: Uuid,
        reason: impl Into<String>,
        now: DateTime<Utc>,
    ) -> SchedulingResult<Appointment> {
        let mut appointment = self.require(appointment_id).await?;
        Self::validate_transition(appointment.status, AppointmentStatus::Cancelled)?;
        self.check_change_window(&appointment, now)?;

        appointment.status = AppointmentStatus::Cancelled;
        appointment.cancellation_reason = Some(reason.into());
        appointment.updated_at = now;
        self.appointments.update(appointment.clone()).await?;
        self.slots.release(appointment.slot_id).await?;
        info!(%appointment_id, "appointment cancelled");
        Ok(appointment)
    }

    /// Move an appointment to a new slot, preserving the referral linkage.
    ///
    /// Subject to the same 24-hour guard as cancellation. The original
    /// record is untouched if any check on the new slot fails.
    pub async fn reschedule(
        &self,
        appointment_id: Uuid,
        new_slot_id: Uuid,
    ) -> SchedulingResult<Appointment> {
        self.reschedule_at(appointment_id, new_slot_id, Utc::now())
            .await
    }

    pub async fn reschedule_at(
        &self,
        appointment_id: Uuid,
        new_slot_id: Uuid,
        now: DateTime<Utc>,
    ) -> SchedulingResult<Appointment> {
        let mut appointment = self.require(appointment_id).await?;
        Self::validate_transition(appointment.status, AppointmentStatus::Cancelled)?;
        self.check_change_window(&appointment, now)?;

        let new_slot = self.slots.require(new_slot_id).await?;
        if new_slot.status != SlotStatus::Available {
            return Err(SchedulingError::SlotUnavailable {
                slot_id: new_slot_id,
                status: new_slot.status,
            });
        }
        let referral = self.referrals.require(appointment.referral_id).await?;
        self.check_conflicts(appointment.patient_id, &new_slot, Some(appointment_id))
            .await?;

        // All checks passed; swap the slot linkage.
        appointment.status = AppointmentStatus::Cancelled;
        appointment.cancellation_reason = Some("rescheduled".to_string());
        appointment.updated_at = now;
        self.appointments.update(appointment.clone()).await?;
        self.slots.release(appointment.slot_id).await?;

        let replacement = self.build_appointment(&referral, &new_slot, now);
        self.appointments.insert(replacement.clone()).await?;
        self.slots.mark_booked(new_slot_id).await?;
        info!(
            old_appointment_id = %appointment_id,
            new_appointment_id = %replacement.id,
            %new_slot_id,
            "appointment rescheduled"
        );
        Ok(replacement)
    }

    /// Mark a confirmed appointment as underway.
    pub async fn start(&self, appointment_id: Uuid) -> SchedulingResult<Appointment> {
        self.transition(appointment_id, AppointmentStatus::InProgress)
            .await
    }

    /// Complete an in-progress appointment; the slot is marked completed.
    pub async fn complete(&self, appointment_id: Uuid) -> SchedulingResult<Appointment> {
        let appointment = self
            .transition(appointment_id, AppointmentStatus::Completed)
            .await?;
        self.slots.mark_completed(appointment.slot_id).await?;
        Ok(appointment)
    }

    /// Mark a confirmed appointment as a no-show; the elapsed slot is cancelled.
    pub async fn mark_no_show(&self, appointment_id: Uuid) -> SchedulingResult<Appointment> {
        let appointment = self
            .transition(appointment_id, AppointmentStatus::NoShow)
            .await?;
        self.slots.mark_cancelled(appointment.slot_id).await?;
        Ok(appointment)
    }

    /// List appointments by patient and date range, ordered by start time.
    pub async fn find_appointments(
        &self,
        query: &AppointmentQuery,
    ) -> SchedulingResult<Vec<Appointment>> {
        let mut found: Vec<Appointment> = self
            .appointments
            .list()
            .await?
            .into_iter()
            .filter(|appt| {
                query.patient_id.map_or(true, |id| appt.patient_id == id)
                    && query.from.map_or(true, |from| appt.start_time >= from)
                    && query.to.map_or(true, |to| appt.start_time <= to)
            })
            .collect();
        found.sort_by_key(|appt| appt.start_time);
        Ok(found)
    }

    /// List slots for discovery, sweeping expired holds first so a stale
    /// hold never hides a slot that should be available again.
    pub async fn find_slots(&self, query: &SlotQuery) -> SchedulingResult<Vec<Slot>> {
        self.find_slots_at(query, Utc::now()).await
    }

    pub async fn find_slots_at(
        &self,
        query: &SlotQuery,
        now: DateTime<Utc>,
    ) -> SchedulingResult<Vec<Slot>> {
        self.holds.sweep_expired_at(now).await?;
        self.slots.find_slots(query).await
    }

    async fn transition(
        &self,
        appointment_id: Uuid,
        to: AppointmentStatus,
    ) -> SchedulingResult<Appointment> {
        let mut appointment = self.require(appointment_id).await?;
        Self::validate_transition(appointment.status, to)?;
        appointment.status = to;
        appointment.updated_at = Utc::now();
        self.appointments.update(appointment.clone()).await?;
        info!(%appointment_id, status = ?to, "appointment transitioned");
        Ok(appointment)
    }

    fn check_change_window(
        &self,
        appointment: &Appointment,
        now: DateTime<Utc>,
    ) -> SchedulingResult<()> {
        if appointment.start_time <= now + self.rules.change_window() {
            debug!(
                appointment_id = %appointment.id,
                start_time = %appointment.start_time,
                "change refused inside window"
            );
            return Err(SchedulingError::ChangeWindowClosed {
                appointment_id: appointment.id,
                start_time: appointment.start_time,
            });
        }
        Ok(())
    }

    /// No double-booking for a patient: verified against live appointment
    /// records, never fixture data.
    async fn check_conflicts(
        &self,
        patient_id: Uuid,
        slot: &Slot,
        exclude: Option<Uuid>,
    ) -> SchedulingResult<()> {
        let conflict = self
            .appointments
            .list()
            .await?
            .into_iter()
            .find(|appt| {
                appt.patient_id == patient_id
                    && appt.status.is_active()
                    && exclude != Some(appt.id)
                    && appt.overlaps(slot.start_time, slot.end_time)
            });

        if let Some(existing) = conflict {
            warn!(
                %patient_id,
                conflicting = %existing.id,
                "overlapping appointment detected"
            );
            return Err(SchedulingError::ConflictingAppointment {
                patient_id,
                appointment_id: existing.id,
            });
        }
        Ok(())
    }

    async fn hold_for_slot(&self, slot_id: Uuid, now: DateTime<Utc>) -> SchedulingResult<Hold> {
        let hold = self
            .holds
            .find_for_slot(slot_id)
            .await?
            .ok_or(SchedulingError::SlotUnavailable {
                slot_id,
                status: SlotStatus::Held,
            })?;
        // Route through inspect so an expired hold releases the slot.
        self.holds.inspect_at(hold.id, now).await
    }

    fn build_appointment(
        &self,
        referral: &Referral,
        slot: &Slot,
        now: DateTime<Utc>,
    ) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            referral_id: referral.id,
            slot_id: slot.id,
            patient_id: referral.patient_id,
            center_id: slot.center_id,
            status: AppointmentStatus::Confirmed,
            start_time: slot.start_time,
            end_time: slot.end_time,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        }
    }
}
