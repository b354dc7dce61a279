//! Scheduling Service for Diagnostic Imaging
//!
//! Provides the slot, referral, appointment, and report lifecycle:
//! - Slot status ledger (available/held/booked/completed/cancelled)
//! - Time-boxed booking holds with lazy expiration
//! - Referral lifecycle gating booking eligibility
//! - Appointment creation, cancellation, and rescheduling with the
//!   24-hour change window
//! - Report drafting, finalization, and amendment

pub mod error;
pub mod holds;
pub mod models;
pub mod referrals;
pub mod reports;
pub mod rules;
pub mod scheduler;
pub mod slots;

pub use error::*;
pub use holds::*;
pub use models::*;
pub use referrals::*;
pub use reports::*;
pub use rules::*;
pub use scheduler::*;
pub use slots::*;
