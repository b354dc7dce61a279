use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AppointmentStatus, ReferralStatus, ReportStatus, SlotStatus};

/// Expected, recoverable scheduling failures surfaced to the caller.
///
/// Nothing here is fatal; the worst case is a rejected action with an
/// explanatory reason.
#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Slot {slot_id} is not available (status: {status:?})")]
    SlotUnavailable { slot_id: Uuid, status: SlotStatus },

    #[error("Hold {hold_id} expired at {expired_at}")]
    HoldExpired {
        hold_id: Uuid,
        expired_at: DateTime<Utc>,
    },

    #[error("Referral {referral_id} is not eligible for booking (status: {status:?})")]
    ReferralNotEligible {
        referral_id: Uuid,
        status: ReferralStatus,
    },

    #[error("Appointment {appointment_id} starting at {start_time} is within the change window")]
    ChangeWindowClosed {
        appointment_id: Uuid,
        start_time: DateTime<Utc>,
    },

    #[error("Patient {patient_id} already has appointment {appointment_id} in that time range")]
    ConflictingAppointment {
        patient_id: Uuid,
        appointment_id: Uuid,
    },

    #[error("Invalid appointment status transition: {from:?} -> {to:?}")]
    InvalidAppointmentTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("Invalid referral status transition: {from:?} -> {to:?}")]
    InvalidReferralTransition {
        from: ReferralStatus,
        to: ReferralStatus,
    },

    #[error("Invalid report status transition: {from:?} -> {to:?}")]
    InvalidReportTransition { from: ReportStatus, to: ReportStatus },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] store_layer::StoreError),
}

pub type SchedulingResult<T> = Result<T, SchedulingError>;
