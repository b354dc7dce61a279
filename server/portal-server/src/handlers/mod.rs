pub mod appointments;
pub mod health;
pub mod holds;
pub mod referrals;
pub mod reports;
pub mod slots;
