use std::sync::Arc;

use chrono::{DateTime, Utc};
use store_layer::{Entity, Repository, StoreError};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{SchedulingError, SchedulingResult};
use crate::models::{Appointment, AppointmentStatus, Report, ReportStatus};
use crate::referrals::ReferralLifecycle;

/// Manages radiology report drafting, finalization, and amendment.
///
/// Finalization requires a non-empty impression and findings; once finalized
/// the report body is immutable and may only gain addenda through `amend`.
#[derive(Clone)]
pub struct ReportService {
    reports: Arc<dyn Repository<Report>>,
    appointments: Arc<dyn Repository<Appointment>>,
    referrals: ReferralLifecycle,
}

impl ReportService {
    pub fn new(
        reports: Arc<dyn Repository<Report>>,
        appointments: Arc<dyn Repository<Appointment>>,
        referrals: ReferralLifecycle,
    ) -> Self {
        Self {
            reports,
            appointments,
            referrals,
        }
    }

    /// All valid next statuses for a given current status.
    pub fn valid_transitions(current: ReportStatus) -> Vec<ReportStatus> {
        match current {
            ReportStatus::Draft => vec![
                ReportStatus::InProgress,
                ReportStatus::Finalized,
                ReportStatus::Cancelled,
            ],
            ReportStatus::InProgress => {
                vec![ReportStatus::Finalized, ReportStatus::Cancelled]
            }
            ReportStatus::Finalized => vec![ReportStatus::Amended],
            // Terminal states - no transitions allowed
            ReportStatus::Amended | ReportStatus::Cancelled => vec![],
        }
    }

    pub fn validate_transition(from: ReportStatus, to: ReportStatus) -> SchedulingResult<()> {
        if !Self::valid_transitions(from).contains(&to) {
            warn!(?from, ?to, "invalid report transition attempted");
            return Err(SchedulingError::InvalidReportTransition { from, to });
        }
        Ok(())
    }

    /// Fetch a report, failing if it does not exist.
    pub async fn require(&self, report_id: Uuid) -> SchedulingResult<Report> {
        self.reports.get(report_id).await?.ok_or_else(|| {
            SchedulingError::Store(StoreError::NotFound {
                entity: Report::KIND,
                id: report_id,
            })
        })
    }

    /// Open a draft report for an appointment that is not cancelled.
    pub async fn create_draft(&self, appointment_id: Uuid) -> SchedulingResult<Report> {
        let appointment = self
            .appointments
            .get(appointment_id)
            .await?
            .ok_or_else(|| {
                SchedulingError::Store(StoreError::NotFound {
                    entity: Appointment::KIND,
                    id: appointment_id,
                })
            })?;
        if appointment.status == AppointmentStatus::Cancelled {
            return Err(SchedulingError::Validation(format!(
                "cannot draft a report for cancelled appointment {}",
                appointment_id
            )));
        }

        let now = Utc::now();
        let report = Report {
            id: Uuid::new_v4(),
            appointment_id,
            status: ReportStatus::Draft,
            impression: String::new(),
            findings: String::new(),
            finalized_at: None,
            created_at: now,
            updated_at: now,
        };
        self.reports.insert(report.clone()).await?;
        info!(report_id = %report.id, %appointment_id, "report draft opened");
        Ok(report)
    }

    /// Update the report body. Allowed only while drafting; a draft moves to
    /// in-progress on first edit.
    pub async fn update(
        &self,
        report_id: Uuid,
        impression: impl Into<String>,
        findings: impl Into<String>,
    ) -> SchedulingResult<Report> {
        let mut report = self.require(report_id).await?;
        if !report.status.is_editable() {
            return Err(SchedulingError::InvalidReportTransition {
                from: report.status,
                to: ReportStatus::InProgress,
            });
        }
        report.status = ReportStatus::InProgress;
        report.impression = impression.into();
        report.findings = findings.into();
        report.updated_at = Utc::now();
        self.reports.update(report.clone()).await?;
        Ok(report)
    }

    /// Finalize a report and advance its referral to completed.
    pub async fn finalize(&self, report_id: Uuid) -> SchedulingResult<Report> {
        self.finalize_at(report_id, Utc::now()).await
    }

    pub async fn finalize_at(
        &self,
        report_id: Uuid,
        now: DateTime<Utc>,
    ) -> SchedulingResult<Report> {
        let mut report = self.require(report_id).await?;
        Self::validate_transition(report.status, ReportStatus::Finalized)?;
        if report.impression.trim().is_empty() {
            return Err(SchedulingError::Validation(
                "report impression must not be empty".to_string(),
            ));
        }
        if report.findings.trim().is_empty() {
            return Err(SchedulingError::Validation(
                "report findings must not be empty".to_string(),
            ));
        }

        report.status = ReportStatus::Finalized;
        report.finalized_at = Some(now);
        report.updated_at = now;
        self.reports.update(report.clone()).await?;
        info!(%report_id, "report finalized");

        // A finalized report closes out the originating referral.
        if let Some(appointment) = self.appointments.get(report.appointment_id).await? {
            self.referrals
                .complete_if_active(appointment.referral_id)
                .await?;
        }
        Ok(report)
    }

    /// Attach an addendum to a finalized report. The finalized body stays
    /// intact; the addendum is appended and the status becomes amended.
    pub async fn amend(
        &self,
        report_id: Uuid,
        addendum_impression: &str,
        addendum_findings: &str,
    ) -> SchedulingResult<Report> {
        let mut report = self.require(report_id).await?;
        Self::validate_transition(report.status, ReportStatus::Amended)?;
        if addendum_impression.trim().is_empty() && addendum_findings.trim().is_empty() {
            return Err(SchedulingError::Validation(
                "amendment must include impression or findings text".to_string(),
            ));
        }

        if !addendum_impression.trim().is_empty() {
            report.impression = format!("{}\n\nAddendum: {}", report.impression, addendum_impression);
        }
        if !addendum_findings.trim().is_empty() {
            report.findings = format!("{}\n\nAddendum: {}", report.findings, addendum_findings);
        }
        report.status = ReportStatus::Amended;
        report.updated_at = Utc::now();
        self.reports.update(report.clone()).await?;
        info!(%report_id, "report amended");
        Ok(report)
    }

    /// Cancel an unfinalized report.
    pub async fn cancel(&self, report_id: Uuid) -> SchedulingResult<Report> {
        let mut report = self.require(report_id).await?;
        Self::validate_transition(report.status, ReportStatus::Cancelled)?;
        report.status = ReportStatus::Cancelled;
        report.updated_at = Utc::now();
        self.reports.update(report.clone()).await?;
        Ok(report)
    }
}
