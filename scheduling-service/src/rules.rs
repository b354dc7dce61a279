use chrono::Duration;

/// Business rules governing holds and appointment changes
#[derive(Debug, Clone)]
pub struct SchedulingRules {
    /// Shortest hold a caller may place, in minutes.
    pub min_hold_minutes: i64,
    /// Longest hold a caller may place, in minutes.
    pub max_hold_minutes: i64,
    /// Cancellations and reschedules must happen this many hours before start.
    pub change_window_hours: i64,
}

impl SchedulingRules {
    /// The cutoff before an appointment's start time after which changes are refused.
    pub fn change_window(&self) -> Duration {
        Duration::hours(self.change_window_hours)
    }

    pub fn hold_duration_valid(&self, minutes: i64) -> bool {
        minutes >= self.min_hold_minutes && minutes <= self.max_hold_minutes
    }
}

impl Default for SchedulingRules {
    fn default() -> Self {
        Self {
            min_hold_minutes: 5,
            max_hold_minutes: 60,
            change_window_hours: 24,
        }
    }
}
