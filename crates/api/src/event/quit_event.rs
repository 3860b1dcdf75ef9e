use crate::error::EventHubError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use eventhub_api_structs::quit_event::*;
use eventhub_domain::{Event, EventStatus, ID};
use eventhub_infra::EventHubContext;

pub async fn quit_event_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<EventHubContext>,
) -> Result<HttpResponse, EventHubError> {
    let usecase = QuitEventUseCase {
        user_id: path_params.user_id,
        event_id: path_params.event_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(EventHubError::from)
}

#[derive(Debug)]
pub struct QuitEventUseCase {
    pub user_id: ID,
    pub event_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    NotJoined,
    StorageError,
}

impl From<UseCaseError> for EventHubError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
            UseCaseError::NotJoined => {
                Self::NotFound("The user is not a participant of the event".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for QuitEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "QuitEvent";

    async fn execute(&mut self, ctx: &EventHubContext) -> Result<Self::Response, Self::Error> {
        let e = match ctx.repos.events.find(&self.event_id).await {
            Ok(Some(e)) if e.status != EventStatus::Deleted => e,
            Ok(_) => return Err(UseCaseError::NotFound(self.event_id)),
            Err(_) => return Err(UseCaseError::StorageError),
        };

        let removed = ctx
            .repos
            .events
            .remove_participant(&e.id, &self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if !removed {
            return Err(UseCaseError::NotJoined);
        }

        Ok(e)
    }
}
