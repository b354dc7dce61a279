//! Route path constants, grouped per domain.

pub mod health {
    pub const HEALTH: &str = "/health";
    pub const VERSION: &str = "/version";
}

pub mod slots {
    pub const SLOTS: &str = "/api/v1/slots";
    pub const SLOT_BY_ID: &str = "/api/v1/slots/:id";
}

pub mod holds {
    pub const HOLDS: &str = "/api/v1/holds";
    pub const HOLD_BY_ID: &str = "/api/v1/holds/:id";
    pub const HOLD_CONFIRM: &str = "/api/v1/holds/:id/confirm";
    pub const HOLDS_SWEEP: &str = "/api/v1/holds/sweep";
}

pub mod referrals {
    pub const REFERRALS: &str = "/api/v1/referrals";
    pub const REFERRAL_BY_ID: &str = "/api/v1/referrals/:id";
    pub const REFERRAL_APPROVE: &str = "/api/v1/referrals/:id/approve";
    pub const REFERRAL_CANCEL: &str = "/api/v1/referrals/:id/cancel";
}

pub mod appointments {
    pub const APPOINTMENTS: &str = "/api/v1/appointments";
    pub const APPOINTMENT_BY_ID: &str = "/api/v1/appointments/:id";
    pub const APPOINTMENT_CANCEL: &str = "/api/v1/appointments/:id/cancel";
    pub const APPOINTMENT_RESCHEDULE: &str = "/api/v1/appointments/:id/reschedule";
    pub const APPOINTMENT_START: &str = "/api/v1/appointments/:id/start";
    pub const APPOINTMENT_COMPLETE: &str = "/api/v1/appointments/:id/complete";
    pub const APPOINTMENT_NO_SHOW: &str = "/api/v1/appointments/:id/no-show";
}

pub mod reports {
    pub const REPORTS: &str = "/api/v1/reports";
    pub const REPORT_BY_ID: &str = "/api/v1/reports/:id";
    pub const REPORT_FINALIZE: &str = "/api/v1/reports/:id/finalize";
    pub const REPORT_AMEND: &str = "/api/v1/reports/:id/amend";
    pub const REPORT_CANCEL: &str = "/api/v1/reports/:id/cancel";
}
