mod base;
mod event;
mod notification;
mod status;

use event::EventClient;
use notification::NotificationClient;
use status::StatusClient;
use std::sync::Arc;

pub(crate) use base::{APIResponse, BaseClient};

pub use base::APIError;
pub use event::{CreateEventInput, GetEventInput, UpdateEventInput, UserEventInput};
pub use eventhub_api_structs::dtos::*;
pub use eventhub_api_structs::update_event::RequestBody as UpdateEventBody;
pub use eventhub_domain::{EventStatus, NotificationTemplate, NotificationType, ID};
pub use notification::{DispatchNotificationInput, GetUserNotificationsInput};
pub use reqwest::StatusCode;

/// Eventhub Server SDK
///
/// The SDK contains methods for interacting with the Eventhub server
/// API.
#[derive(Clone)]
pub struct EventHubSDK {
    pub event: EventClient,
    pub notification: NotificationClient,
    pub status: StatusClient,
}

impl EventHubSDK {
    /// `address` is the base url of the api, e.g. `http://localhost:5000/api/v1`
    pub fn new(address: String) -> Self {
        let base = Arc::new(BaseClient::new(address));
        let event = EventClient::new(base.clone());
        let notification = NotificationClient::new(base.clone());
        let status = StatusClient::new(base);

        Self {
            event,
            notification,
            status,
        }
    }
}
