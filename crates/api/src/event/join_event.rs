use crate::error::EventHubError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use eventhub_api_structs::join_event::*;
use eventhub_domain::{Event, EventStatus, ID};
use eventhub_infra::EventHubContext;

pub async fn join_event_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<EventHubContext>,
) -> Result<HttpResponse, EventHubError> {
    let usecase = JoinEventUseCase {
        user_id: path_params.user_id,
        event_id: path_params.event_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Created().json(APIResponse::new(event)))
        .map_err(EventHubError::from)
}

#[derive(Debug)]
pub struct JoinEventUseCase {
    pub user_id: ID,
    pub event_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    NotActive(EventStatus),
    AlreadyJoined,
    StorageError,
}

impl From<UseCaseError> for EventHubError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
            UseCaseError::NotActive(status) => {
                Self::Conflict(format!("The event is {} and can not be joined", status))
            }
            UseCaseError::AlreadyJoined => {
                Self::Conflict("The user has already joined the event".into())
            }
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for JoinEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "JoinEvent";

    async fn execute(&mut self, ctx: &EventHubContext) -> Result<Self::Response, Self::Error> {
        let e = match ctx.repos.events.find(&self.event_id).await {
            Ok(Some(e)) if e.status != EventStatus::Deleted => e,
            Ok(_) => return Err(UseCaseError::NotFound(self.event_id)),
            Err(_) => return Err(UseCaseError::StorageError),
        };
        if !e.is_active() {
            return Err(UseCaseError::NotActive(e.status));
        }

        let added = ctx
            .repos
            .events
            .add_participant(&e.id, &self.user_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if !added {
            return Err(UseCaseError::AlreadyJoined);
        }

        Ok(e)
    }
}
