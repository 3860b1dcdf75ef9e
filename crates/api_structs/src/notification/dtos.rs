use chrono::{DateTime, Utc};
use eventhub_domain::{Notification, NotificationTemplate, NotificationType, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDTO {
    pub id: ID,
    pub user_id: ID,
    pub event_id: ID,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub created: DateTime<Utc>,
}

impl NotificationDTO {
    pub fn new(notification: Notification) -> Self {
        Self {
            id: notification.id,
            user_id: notification.user_id,
            event_id: notification.event_id,
            notification_type: notification.notification_type,
            created: notification.created,
        }
    }
}

/// A `Notification` together with what the client should render for it
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserNotificationDTO {
    pub notification: NotificationDTO,
    pub event_title: String,
    pub message: NotificationTemplate,
}

impl UserNotificationDTO {
    pub fn new(
        notification: Notification,
        event_title: String,
        message: NotificationTemplate,
    ) -> Self {
        Self {
            notification: NotificationDTO::new(notification),
            event_title,
            message,
        }
    }
}
