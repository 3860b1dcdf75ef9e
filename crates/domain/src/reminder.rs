use crate::notification::NotificationType;
use chrono::{DateTime, Duration, Utc};

/// The reminders sent to participants before an event starts.
///
/// Each reminder owns a half-open window `[from, to)` over the time left
/// until the event starts. The reminder job runs every minute and every
/// window is one hour wide, so a reminder is picked up even when a tick is
/// missed, while the dedup key keeps it from being sent twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderType {
    /// Sent when the event starts in `[23h, 24h)`
    OneDay,
    /// Sent when the event starts in `[1h, 2h)`
    OneHour,
}

impl ReminderType {
    /// Evaluation order of the windows, the first match wins
    pub const ALL: [ReminderType; 2] = [ReminderType::OneDay, ReminderType::OneHour];

    /// The window as `(inclusive lower bound, exclusive upper bound)`
    pub fn window(&self) -> (Duration, Duration) {
        match self {
            Self::OneDay => (Duration::hours(23), Duration::hours(24)),
            Self::OneHour => (Duration::hours(1), Duration::hours(2)),
        }
    }

    pub fn contains(&self, time_until_start: Duration) -> bool {
        let (from, to) = self.window();
        from <= time_until_start && time_until_start < to
    }

    /// Classifies the time left until an event starts into the reminder that
    /// should be sent for it, if any.
    pub fn for_time_until_start(time_until_start: Duration) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|reminder| reminder.contains(time_until_start))
    }
}

impl From<ReminderType> for NotificationType {
    fn from(reminder: ReminderType) -> Self {
        match reminder {
            ReminderType::OneDay => NotificationType::Reminder1d,
            ReminderType::OneHour => NotificationType::Reminder1h,
        }
    }
}

/// Classifies an event starting at `event_start` as seen at `now`
pub fn classify_window(event_start: DateTime<Utc>, now: DateTime<Utc>) -> Option<ReminderType> {
    ReminderType::for_time_until_start(event_start - now)
}
