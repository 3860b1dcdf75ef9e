use crate::error::EventHubError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use eventhub_api_structs::get_event::*;
use eventhub_domain::{Event, EventStatus, ID};
use eventhub_infra::EventHubContext;

pub async fn get_event_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<EventHubContext>,
) -> Result<HttpResponse, EventHubError> {
    let usecase = GetEventUseCase {
        event_id: path_params.event_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|(event, participants)| {
            HttpResponse::Ok().json(APIResponse::new(event, participants))
        })
        .map_err(EventHubError::from)
}

#[derive(Debug)]
pub struct GetEventUseCase {
    pub event_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

impl From<UseCaseError> for EventHubError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetEventUseCase {
    type Response = (Event, Vec<ID>);

    type Error = UseCaseError;

    const NAME: &'static str = "GetEvent";

    async fn execute(&mut self, ctx: &EventHubContext) -> Result<Self::Response, Self::Error> {
        let event = match ctx.repos.events.find(&self.event_id).await {
            Ok(Some(e)) if e.status != EventStatus::Deleted => e,
            Ok(_) => return Err(UseCaseError::NotFound(self.event_id)),
            Err(_) => return Err(UseCaseError::StorageError),
        };
        let participants = ctx
            .repos
            .events
            .get_participants(&event.id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok((event, participants))
    }
}
