use crate::{
    event::Event,
    reminder::ReminderType,
    shared::entity::{Entity, ID},
};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NotificationType {
    #[serde(rename = "reminder_1d")]
    Reminder1d,
    #[serde(rename = "reminder_1h")]
    Reminder1h,
    #[serde(rename = "cancel")]
    Cancel,
    #[serde(rename = "reschedule")]
    Reschedule,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reminder1d => "reminder_1d",
            Self::Reminder1h => "reminder_1h",
            Self::Cancel => "cancel",
            Self::Reschedule => "reschedule",
        }
    }

    /// Reminders are delivered at most once per user and event, while every
    /// cancel or reschedule action produces a new notification.
    pub fn as_reminder(&self) -> Option<ReminderType> {
        match self {
            Self::Reminder1d => Some(ReminderType::OneDay),
            Self::Reminder1h => Some(ReminderType::OneHour),
            Self::Cancel | Self::Reschedule => None,
        }
    }

    pub fn is_deduplicated(&self) -> bool {
        self.as_reminder().is_some()
    }
}

impl Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown notification type: `{0}`")]
pub struct InvalidNotificationTypeError(pub String);

impl FromStr for NotificationType {
    type Err = InvalidNotificationTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reminder_1d" => Ok(Self::Reminder1d),
            "reminder_1h" => Ok(Self::Reminder1h),
            "cancel" => Ok(Self::Cancel),
            "reschedule" => Ok(Self::Reschedule),
            _ => Err(InvalidNotificationTypeError(s.to_string())),
        }
    }
}

/// A delivered notification for a `User` about an `Event`
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: ID,
    pub user_id: ID,
    pub event_id: ID,
    pub notification_type: NotificationType,
    pub created: DateTime<Utc>,
}

impl Entity for Notification {
    fn id(&self) -> &ID {
        &self.id
    }
}

/// The message a client should render for a `Notification`.
///
/// Only the selection is made here, turning a template into localized text
/// is up to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "template", rename_all = "camelCase")]
pub enum NotificationTemplate {
    EventTomorrow,
    EventInOneHour,
    EventCancelled,
    #[serde(rename_all = "camelCase")]
    EventRescheduled {
        /// Start of the event after the change, `None` if the new wall clock
        /// time does not exist in the reference timezone
        starts_at: Option<DateTime<Utc>>,
    },
}

impl NotificationTemplate {
    pub fn select(notification_type: NotificationType, event: &Event, tz: &Tz) -> Self {
        match notification_type {
            NotificationType::Reminder1d => Self::EventTomorrow,
            NotificationType::Reminder1h => Self::EventInOneHour,
            NotificationType::Cancel => Self::EventCancelled,
            NotificationType::Reschedule => Self::EventRescheduled {
                starts_at: event.start_instant(tz),
            },
        }
    }
}
