use super::subscribers::SyncSearchIndexOnEventDeleted;
use crate::error::EventHubError;
use crate::notification::dispatch_notification::DispatchNotificationUseCase;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use eventhub_api_structs::delete_event::*;
use eventhub_domain::{Event, EventStatus, NotificationType, ID};
use eventhub_infra::EventHubContext;

pub async fn delete_event_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<EventHubContext>,
) -> Result<HttpResponse, EventHubError> {
    let usecase = DeleteEventUseCase {
        user_id: path_params.user_id,
        event_id: path_params.event_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(EventHubError::from)
}

/// Deletes an active `Event` on behalf of its creator.
///
/// Participants are sent a cancel notification before the status changes,
/// since notifications can not be dispatched for deleted events.
#[derive(Debug)]
pub struct DeleteEventUseCase {
    pub user_id: ID,
    pub event_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    NotCreator(ID),
    NotActive(EventStatus),
    StorageError,
}

impl From<UseCaseError> for EventHubError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
            UseCaseError::NotCreator(user_id) => Self::Forbidden(format!(
                "The user with id: {}, did not create the event",
                user_id
            )),
            UseCaseError::NotActive(status) => {
                Self::Conflict(format!("The event is {} and can not be deleted", status))
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DeleteEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "DeleteEvent";

    async fn execute(&mut self, ctx: &EventHubContext) -> Result<Self::Response, Self::Error> {
        let mut e = match ctx.repos.events.find(&self.event_id).await {
            Ok(Some(e)) if e.status != EventStatus::Deleted => e,
            Ok(_) => return Err(UseCaseError::NotFound(self.event_id)),
            Err(_) => return Err(UseCaseError::StorageError),
        };
        if e.creator_id != self.user_id {
            return Err(UseCaseError::NotCreator(self.user_id));
        }
        if !e.is_active() {
            return Err(UseCaseError::NotActive(e.status));
        }

        let participants = ctx
            .repos
            .events
            .get_participants(&e.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        for user_id in participants {
            let usecase = DispatchNotificationUseCase {
                user_id,
                event_id: e.id,
                notification_type: NotificationType::Cancel,
            };
            execute(usecase, ctx)
                .await
                .map_err(|_| UseCaseError::StorageError)?;
        }

        let updated = ctx
            .repos
            .events
            .bulk_set_status(&[e.id], EventStatus::Deleted)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if updated.is_empty() {
            // Completed while the participants were notified
            return Err(UseCaseError::NotActive(EventStatus::Completed));
        }
        e.status = EventStatus::Deleted;

        Ok(e)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SyncSearchIndexOnEventDeleted)]
    }
}
