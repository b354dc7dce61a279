//! End-to-end booking flow scenarios: hold placement and confirmation,
//! lazy hold expiry, the 24-hour change window, double-booking protection,
//! and report finalization driving the referral lifecycle.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use scheduling_service::{
    Appointment, AppointmentQuery, AppointmentScheduler, AppointmentStatus, BookingHoldService,
    Hold, Modality, Referral, ReferralLifecycle, ReferralStatus, Report, ReportService,
    SafetyScreening, SchedulingError, SchedulingRules, Slot, SlotLedger, SlotQuery, SlotStatus,
};
use store_layer::{MemoryRepository, Repository};
use uuid::Uuid;

struct Portal {
    slots: SlotLedger,
    holds: BookingHoldService,
    referrals: ReferralLifecycle,
    scheduler: AppointmentScheduler,
    reports: ReportService,
    slot_repo: Arc<MemoryRepository<Slot>>,
    referral_repo: Arc<MemoryRepository<Referral>>,
}

fn portal() -> Portal {
    let slot_repo = Arc::new(MemoryRepository::<Slot>::new());
    let hold_repo: Arc<MemoryRepository<Hold>> = Arc::new(MemoryRepository::new());
    let referral_repo = Arc::new(MemoryRepository::<Referral>::new());
    let appointment_repo: Arc<MemoryRepository<Appointment>> = Arc::new(MemoryRepository::new());
    let report_repo: Arc<MemoryRepository<Report>> = Arc::new(MemoryRepository::new());

    let slots = SlotLedger::new(slot_repo.clone());
    let referrals = ReferralLifecycle::new(referral_repo.clone());
    let rules = SchedulingRules::default();
    let holds = BookingHoldService::new(
        hold_repo,
        slots.clone(),
        referrals.clone(),
        rules.clone(),
    );
    let scheduler = AppointmentScheduler::new(
        appointment_repo.clone(),
        slots.clone(),
        holds.clone(),
        referrals.clone(),
        rules,
    );
    let reports = ReportService::new(report_repo, appointment_repo, referrals.clone());

    Portal {
        slots,
        holds,
        referrals,
        scheduler,
        reports,
        slot_repo,
        referral_repo,
    }
}

async fn seed_slot(portal: &Portal, start: DateTime<Utc>) -> Slot {
    let slot = Slot {
        id: Uuid::new_v4(),
        center_id: Uuid::new_v4(),
        modality: Modality::Mri,
        body_part: "lumbar spine".to_string(),
        start_time: start,
        end_time: start + Duration::minutes(45),
        price: Decimal::new(1250_00, 2),
        status: SlotStatus::Available,
    };
    portal.slot_repo.insert(slot.clone()).await.unwrap();
    slot
}

async fn seed_referral(portal: &Portal, status: ReferralStatus) -> Referral {
    let now = Utc::now();
    let referral = Referral {
        id: Uuid::new_v4(),
        patient_id: Uuid::new_v4(),
        referrer_id: Uuid::new_v4(),
        modality: Modality::Mri,
        body_part: "lumbar spine".to_string(),
        status,
        safety_screening: SafetyScreening {
            completed: true,
            questions: vec![],
        },
        created_at: now,
        updated_at: now,
    };
    portal.referral_repo.insert(referral.clone()).await.unwrap();
    referral
}

#[tokio::test]
async fn hold_then_confirm_books_the_slot() {
    let portal = portal();
    let slot = seed_slot(&portal, Utc::now() + Duration::days(3)).await;
    let referral = seed_referral(&portal, ReferralStatus::Pending).await;

    let now = Utc::now();
    let hold = portal
        .holds
        .place_at(slot.id, referral.id, 15, now)
        .await
        .unwrap();
    assert_eq!(
        portal.slots.require(slot.id).await.unwrap().status,
        SlotStatus::Held
    );

    let appointment = portal
        .scheduler
        .confirm_hold_at(hold.id, now + Duration::minutes(10))
        .await
        .unwrap();
    assert_eq!(appointment.status, AppointmentStatus::Confirmed);
    assert_eq!(appointment.referral_id, referral.id);
    assert_eq!(
        portal.slots.require(slot.id).await.unwrap().status,
        SlotStatus::Booked
    );

    // The hold is destroyed on confirmation.
    let err = portal
        .scheduler
        .confirm_hold_at(hold.id, now + Duration::minutes(11))
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulingError::Store(_)));
}

#[tokio::test]
async fn confirm_after_expiry_fails_and_frees_the_slot() {
    let portal = portal();
    let slot = seed_slot(&portal, Utc::now() + Duration::days(3)).await;
    let referral = seed_referral(&portal, ReferralStatus::Approved).await;

    let placed_at = Utc::now();
    let hold = portal
        .holds
        .place_at(slot.id, referral.id, 15, placed_at)
        .await
        .unwrap();

    let err = portal
        .scheduler
        .confirm_hold_at(hold.id, placed_at + Duration::minutes(16))
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulingError::HoldExpired { .. }));
    assert_eq!(
        portal.slots.require(slot.id).await.unwrap().status,
        SlotStatus::Available
    );
}

#[tokio::test]
async fn cancel_inside_24_hours_is_refused() {
    let portal = portal();
    let now = Utc::now();
    let slot = seed_slot(&portal, now + Duration::hours(23)).await;
    let referral = seed_referral(&portal, ReferralStatus::Approved).await;

    let appointment = portal
        .scheduler
        .create_at(referral.id, slot.id, now)
        .await
        .unwrap();

    let err = portal
        .scheduler
        .cancel_at(appointment.id, "patient request", now)
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulingError::ChangeWindowClosed { .. }));

    // Nothing was mutated.
    let unchanged = portal.scheduler.require(appointment.id).await.unwrap();
    assert_eq!(unchanged.status, AppointmentStatus::Confirmed);
    assert_eq!(
        portal.slots.require(slot.id).await.unwrap().status,
        SlotStatus::Booked
    );
}

#[tokio::test]
async fn cancel_outside_24_hours_releases_the_slot() {
    let portal = portal();
    let now = Utc::now();
    let slot = seed_slot(&portal, now + Duration::hours(25)).await;
    let referral = seed_referral(&portal, ReferralStatus::Approved).await;

    let appointment = portal
        .scheduler
        .create_at(referral.id, slot.id, now)
        .await
        .unwrap();

    let cancelled = portal
        .scheduler
        .cancel_at(appointment.id, "patient request", now)
        .await
        .unwrap();
    assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    assert_eq!(cancelled.cancellation_reason.as_deref(), Some("patient request"));
    assert_eq!(
        portal.slots.require(slot.id).await.unwrap().status,
        SlotStatus::Available
    );
}

#[tokio::test]
async fn patient_cannot_be_double_booked() {
    let portal = portal();
    let now = Utc::now();
    let start = now + Duration::days(4);
    let slot_a = seed_slot(&portal, start).await;
    let slot_b = seed_slot(&portal, start + Duration::minutes(15)).await; // overlaps slot_a
    let referral = seed_referral(&portal, ReferralStatus::Approved).await;

    portal
        .scheduler
        .create_at(referral.id, slot_a.id, now)
        .await
        .unwrap();

    let err = portal
        .scheduler
        .create_at(referral.id, slot_b.id, now)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SchedulingError::ConflictingAppointment { .. }
    ));

    // A non-overlapping slot for the same patient is fine.
    let slot_c = seed_slot(&portal, start + Duration::days(1)).await;
    assert!(portal
        .scheduler
        .create_at(referral.id, slot_c.id, now)
        .await
        .is_ok());
}

#[tokio::test]
async fn reschedule_moves_booking_and_preserves_referral() {
    let portal = portal();
    let now = Utc::now();
    let old_slot = seed_slot(&portal, now + Duration::days(3)).await;
    let new_slot = seed_slot(&portal, now + Duration::days(5)).await;
    let referral = seed_referral(&portal, ReferralStatus::Approved).await;

    let original = portal
        .scheduler
        .create_at(referral.id, old_slot.id, now)
        .await
        .unwrap();

    let replacement = portal
        .scheduler
        .reschedule_at(original.id, new_slot.id, now)
        .await
        .unwrap();
    assert_eq!(replacement.referral_id, referral.id);
    assert_eq!(replacement.slot_id, new_slot.id);
    assert_eq!(replacement.status, AppointmentStatus::Confirmed);

    let old = portal.scheduler.require(original.id).await.unwrap();
    assert_eq!(old.status, AppointmentStatus::Cancelled);
    assert_eq!(
        portal.slots.require(old_slot.id).await.unwrap().status,
        SlotStatus::Available
    );
    assert_eq!(
        portal.slots.require(new_slot.id).await.unwrap().status,
        SlotStatus::Booked
    );
}

#[tokio::test]
async fn reschedule_inside_24_hours_is_refused() {
    let portal = portal();
    let now = Utc::now();
    let slot = seed_slot(&portal, now + Duration::hours(20)).await;
    let new_slot = seed_slot(&portal, now + Duration::days(2)).await;
    let referral = seed_referral(&portal, ReferralStatus::Approved).await;

    let appointment = portal
        .scheduler
        .create_at(referral.id, slot.id, now)
        .await
        .unwrap();

    let err = portal
        .scheduler
        .reschedule_at(appointment.id, new_slot.id, now)
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulingError::ChangeWindowClosed { .. }));
    assert_eq!(
        portal.slots.require(new_slot.id).await.unwrap().status,
        SlotStatus::Available
    );
}

#[tokio::test]
async fn completed_referral_cannot_book_again() {
    let portal = portal();
    let now = Utc::now();
    let slot = seed_slot(&portal, now + Duration::days(2)).await;
    let referral = seed_referral(&portal, ReferralStatus::Completed).await;

    let err = portal
        .scheduler
        .create_at(referral.id, slot.id, now)
        .await
        .unwrap_err();
    assert!(matches!(err, SchedulingError::ReferralNotEligible { .. }));
}

#[tokio::test]
async fn imaging_visit_runs_through_report_finalization() {
    let portal = portal();
    let now = Utc::now();
    let slot = seed_slot(&portal, now + Duration::days(2)).await;
    let referral = seed_referral(&portal, ReferralStatus::Approved).await;

    let appointment = portal
        .scheduler
        .create_at(referral.id, slot.id, now)
        .await
        .unwrap();
    portal.scheduler.start(appointment.id).await.unwrap();
    portal.scheduler.complete(appointment.id).await.unwrap();
    assert_eq!(
        portal.slots.require(slot.id).await.unwrap().status,
        SlotStatus::Completed
    );

    let report = portal.reports.create_draft(appointment.id).await.unwrap();
    portal
        .reports
        .update(
            report.id,
            "Disc protrusion at L4-L5.",
            "Posterior disc protrusion with mild thecal sac effacement.",
        )
        .await
        .unwrap();
    portal.reports.finalize(report.id).await.unwrap();

    let closed = portal.referrals.require(referral.id).await.unwrap();
    assert_eq!(closed.status, ReferralStatus::Completed);
}

#[tokio::test]
async fn slot_discovery_sweeps_expired_holds() {
    let portal = portal();
    let placed_at = Utc::now();
    let slot = seed_slot(&portal, placed_at + Duration::days(3)).await;
    let referral = seed_referral(&portal, ReferralStatus::Pending).await;

    portal
        .holds
        .place_at(slot.id, referral.id, 10, placed_at)
        .await
        .unwrap();

    // While the hold is live, the slot is hidden from availability.
    let query = SlotQuery {
        status: Some(SlotStatus::Available),
        ..Default::default()
    };
    let visible = portal
        .scheduler
        .find_slots_at(&query, placed_at + Duration::minutes(5))
        .await
        .unwrap();
    assert!(visible.is_empty());

    // After expiry, discovery sweeps the hold and shows the slot again.
    let visible = portal
        .scheduler
        .find_slots_at(&query, placed_at + Duration::minutes(11))
        .await
        .unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id, slot.id);
}

#[tokio::test]
async fn appointments_query_filters_by_patient_and_range() {
    let portal = portal();
    let now = Utc::now();
    let slot_a = seed_slot(&portal, now + Duration::days(2)).await;
    let slot_b = seed_slot(&portal, now + Duration::days(9)).await;
    let referral = seed_referral(&portal, ReferralStatus::Approved).await;
    let other = seed_referral(&portal, ReferralStatus::Approved).await;

    portal
        .scheduler
        .create_at(referral.id, slot_a.id, now)
        .await
        .unwrap();
    portal
        .scheduler
        .create_at(other.id, slot_b.id, now)
        .await
        .unwrap();

    let query = AppointmentQuery {
        patient_id: Some(referral.patient_id),
        from: Some(now),
        to: Some(now + Duration::days(7)),
    };
    let found = portal.scheduler.find_appointments(&query).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].patient_id, referral.patient_id);
}
