use crate::dtos::{NotificationDTO, UserNotificationDTO};
use eventhub_domain::ID;
use serde::{Deserialize, Serialize};

pub mod dispatch_notification {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
        pub event_id: ID,
        pub notification_type: String,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// `None` when the reminder had already been delivered
        pub notification: Option<NotificationDTO>,
    }
}

pub mod get_user_notifications {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub notifications: Vec<UserNotificationDTO>,
    }
}
