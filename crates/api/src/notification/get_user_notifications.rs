use crate::error::EventHubError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use eventhub_api_structs::dtos::UserNotificationDTO;
use eventhub_api_structs::get_user_notifications::*;
use eventhub_domain::{Event, NotificationTemplate, ID};
use eventhub_infra::EventHubContext;
use std::collections::HashMap;
use tracing::warn;

pub async fn get_user_notifications_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<EventHubContext>,
) -> Result<HttpResponse, EventHubError> {
    let usecase = GetUserNotificationsUseCase {
        user_id: path_params.user_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|notifications| HttpResponse::Ok().json(APIResponse { notifications }))
        .map_err(EventHubError::from)
}

#[derive(Debug)]
pub struct GetUserNotificationsUseCase {
    pub user_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

impl From<UseCaseError> for EventHubError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetUserNotificationsUseCase {
    type Response = Vec<UserNotificationDTO>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetUserNotifications";

    async fn execute(&mut self, ctx: &EventHubContext) -> Result<Self::Response, Self::Error> {
        let notifications = ctx
            .repos
            .notifications
            .find_all_by_user(&self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        let mut events: HashMap<ID, Event> = HashMap::new();
        let mut res = Vec::with_capacity(notifications.len());
        for notification in notifications {
            if !events.contains_key(&notification.event_id) {
                match ctx.repos.events.find(&notification.event_id).await {
                    Ok(Some(event)) => {
                        events.insert(event.id, event);
                    }
                    Ok(None) => {
                        warn!(
                            "Notification {} refers to missing event {}",
                            notification.id, notification.event_id
                        );
                        continue;
                    }
                    Err(_) => return Err(UseCaseError::StorageError),
                }
            }
            if let Some(event) = events.get(&notification.event_id) {
                let message = NotificationTemplate::select(
                    notification.notification_type,
                    event,
                    &ctx.config.timezone,
                );
                res.push(UserNotificationDTO::new(
                    notification,
                    event.title.clone(),
                    message,
                ));
            }
        }

        Ok(res)
    }
}
