use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use store_layer::Entity;
use uuid::Uuid;

/// Imaging modality offered by a center
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    Mri,
    Ct,
    Xray,
    Ultrasound,
    PetCt,
    Mammography,
}

/// A bookable time window at an imaging center
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub id: Uuid,
    pub center_id: Uuid,
    pub modality: Modality,
    pub body_part: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub price: Decimal,
    pub status: SlotStatus,
}

/// Slot status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Available,
    Held,
    Booked,
    Completed,
    Cancelled,
}

impl SlotStatus {
    /// Terminal slot statuses never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SlotStatus::Completed | SlotStatus::Cancelled)
    }
}

/// Short-lived reservation on a slot pending confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hold {
    pub id: Uuid,
    pub slot_id: Uuid,
    pub referral_id: Uuid,
    pub duration_minutes: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Hold {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Physician-issued request for a patient to receive imaging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Referral {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub referrer_id: Uuid,
    pub modality: Modality,
    pub body_part: String,
    pub status: ReferralStatus,
    pub safety_screening: SafetyScreening,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Referral status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferralStatus {
    Pending,
    Approved,
    Completed,
    Cancelled,
}

impl ReferralStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReferralStatus::Completed | ReferralStatus::Cancelled)
    }
}

/// Pre-imaging safety screening attached to a referral
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SafetyScreening {
    pub completed: bool,
    pub questions: Vec<ScreeningQuestion>,
}

/// Single safety screening question and answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningQuestion {
    pub question: String,
    pub answer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Scheduled imaging appointment linking a referral to a slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub referral_id: Uuid,
    pub slot_id: Uuid,
    pub patient_id: Uuid,
    pub center_id: Uuid,
    pub status: AppointmentStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Appointment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// Active appointments count toward the patient double-booking check.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Confirmed | AppointmentStatus::InProgress
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::NoShow
        )
    }
}

impl Appointment {
    /// Whether this appointment occupies [start, end) against another range.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && start < self.end_time
    }
}

/// Radiology report for a completed or in-progress appointment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub status: ReportStatus,
    pub impression: String,
    pub findings: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finalized_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Report status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Draft,
    InProgress,
    Finalized,
    Amended,
    Cancelled,
}

impl ReportStatus {
    /// Report body may only change while drafting.
    pub fn is_editable(&self) -> bool {
        matches!(self, ReportStatus::Draft | ReportStatus::InProgress)
    }
}

/// Filters for slot discovery
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modality: Option<Modality>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SlotStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

/// Filters for appointment listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,
}

impl Entity for Slot {
    const KIND: &'static str = "slot";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entity for Hold {
    const KIND: &'static str = "hold";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entity for Referral {
    const KIND: &'static str = "referral";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entity for Appointment {
    const KIND: &'static str = "appointment";

    fn id(&self) -> Uuid {
        self.id
    }
}

impl Entity for Report {
    const KIND: &'static str = "report";

    fn id(&self) -> Uuid {
        self.id
    }
}
