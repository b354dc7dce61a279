use std::sync::Arc;

use scheduling_service::{
    Appointment, AppointmentScheduler, BookingHoldService, Hold, Referral, ReferralLifecycle,
    Report, ReportService, SchedulingRules, Slot, SlotLedger,
};
use store_layer::MemoryRepository;
use tracing::info;

/// Server configuration, read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub name: String,
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        let host = std::env::var("PORTAL_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORTAL_PORT")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(8080);
        Self {
            name: "ImagePortal Engine".to_string(),
            host,
            port,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "ImagePortal Engine".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Application state: configuration plus the scheduling services, wired with
/// explicit dependency injection (no ambient global store).
#[derive(Clone)]
pub struct PortalServer {
    pub config: ServerConfig,
    pub slots: SlotLedger,
    pub holds: BookingHoldService,
    pub referrals: ReferralLifecycle,
    pub scheduler: AppointmentScheduler,
    pub reports: ReportService,
}

impl PortalServer {
    /// Build the full service graph over in-memory repositories.
    pub fn new(config: ServerConfig) -> Self {
        let slot_repo = Arc::new(MemoryRepository::<Slot>::new());
        let hold_repo = Arc::new(MemoryRepository::<Hold>::new());
        let referral_repo = Arc::new(MemoryRepository::<Referral>::new());
        let appointment_repo = Arc::new(MemoryRepository::<Appointment>::new());
        let report_repo = Arc::new(MemoryRepository::<Report>::new());

        let rules = SchedulingRules::default();
        let slots = SlotLedger::new(slot_repo);
        let referrals = ReferralLifecycle::new(referral_repo);
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

        info!(name = %config.name, "portal services initialized");
        Self {
            config,
            slots,
            holds,
            referrals,
            scheduler,
            reports,
        }
    }
}
