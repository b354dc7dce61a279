pub mod paths;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::{
    handlers::{appointments, health, holds, referrals, reports, slots},
    server::PortalServer,
};

/// Create health check routes
pub fn health_routes() -> Router<PortalServer> {
    Router::new()
        .route(paths::health::HEALTH, get(health::health_check))
        .route(paths::health::VERSION, get(health::version_info))
}

/// Create slot discovery and import routes
pub fn slot_routes() -> Router<PortalServer> {
    Router::new()
        .route(paths::slots::SLOTS, get(slots::list_slots))
        .route(paths::slots::SLOTS, post(slots::import_slot))
        .route(paths::slots::SLOT_BY_ID, get(slots::get_slot))
}

/// Create booking hold routes
pub fn hold_routes() -> Router<PortalServer> {
    Router::new()
        .route(paths::holds::HOLDS, post(holds::place_hold))
        .route(paths::holds::HOLD_BY_ID, get(holds::get_hold))
        .route(paths::holds::HOLD_BY_ID, axum::routing::delete(holds::release_hold))
        .route(paths::holds::HOLD_CONFIRM, post(holds::confirm_hold))
        .route(paths::holds::HOLDS_SWEEP, post(holds::sweep_holds))
}

/// Create referral management routes
pub fn referral_routes() -> Router<PortalServer> {
    Router::new()
        .route(paths::referrals::REFERRALS, post(referrals::create_referral))
        .route(paths::referrals::REFERRAL_BY_ID, get(referrals::get_referral))
        .route(paths::referrals::REFERRAL_APPROVE, post(referrals::approve_referral))
        .route(paths::referrals::REFERRAL_CANCEL, post(referrals::cancel_referral))
}

/// Create appointment scheduling routes
pub fn appointment_routes() -> Router<PortalServer> {
    Router::new()
        .route(paths::appointments::APPOINTMENTS, get(appointments::list_appointments))
        .route(paths::appointments::APPOINTMENTS, post(appointments::create_appointment))
        .route(paths::appointments::APPOINTMENT_BY_ID, get(appointments::get_appointment))
        .route(paths::appointments::APPOINTMENT_CANCEL, post(appointments::cancel_appointment))
        .route(
            paths::appointments::APPOINTMENT_RESCHEDULE,
            post(appointments::reschedule_appointment),
        )
        .route(paths::appointments::APPOINTMENT_START, post(appointments::start_appointment))
        .route(
            paths::appointments::APPOINTMENT_COMPLETE,
            post(appointments::complete_appointment),
        )
        .route(
            paths::appointments::APPOINTMENT_NO_SHOW,
            post(appointments::mark_no_show),
        )
}

/// Create radiology report routes
pub fn report_routes() -> Router<PortalServer> {
    Router::new()
        .route(paths::reports::REPORTS, post(reports::create_report))
        .route(paths::reports::REPORT_BY_ID, get(reports::get_report))
        .route(paths::reports::REPORT_BY_ID, put(reports::update_report))
        .route(paths::reports::REPORT_FINALIZE, post(reports::finalize_report))
        .route(paths::reports::REPORT_AMEND, post(reports::amend_report))
        .route(paths::reports::REPORT_CANCEL, post(reports::cancel_report))
}

/// Merge all route groups into the application router.
pub fn create_routes() -> Router<PortalServer> {
    Router::new()
        .merge(health_routes())
        .merge(slot_routes())
        .merge(hold_routes())
        .merge(referral_routes())
        .merge(appointment_routes())
        .merge(report_routes())
}
