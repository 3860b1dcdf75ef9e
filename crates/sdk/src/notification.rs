use crate::{APIResponse, BaseClient, ID};
use eventhub_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct NotificationClient {
    base: Arc<BaseClient>,
}

pub struct DispatchNotificationInput {
    pub user_id: ID,
    pub event_id: ID,
    /// Sent as is so that the server decides whether the type is valid
    pub notification_type: String,
}

pub struct GetUserNotificationsInput {
    pub user_id: ID,
}

impl NotificationClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn dispatch(
        &self,
        input: DispatchNotificationInput,
    ) -> APIResponse<dispatch_notification::APIResponse> {
        self.base
            .post(
                (),
                format!(
                    "users/{}/events/{}/notifications/{}",
                    input.user_id, input.event_id, input.notification_type
                ),
                StatusCode::OK,
            )
            .await
    }

    pub async fn get_by_user(
        &self,
        input: GetUserNotificationsInput,
    ) -> APIResponse<get_user_notifications::APIResponse> {
        self.base
            .get(
                format!("users/{}/notifications", input.user_id),
                StatusCode::OK,
            )
            .await
    }
}
