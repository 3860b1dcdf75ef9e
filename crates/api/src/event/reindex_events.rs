use crate::error::EventHubError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use eventhub_api_structs::reindex_events::*;
use eventhub_infra::EventHubContext;
use tracing::info;

pub async fn reindex_events_controller(
    ctx: web::Data<EventHubContext>,
) -> Result<HttpResponse, EventHubError> {
    execute(ReindexEventsUseCase, &ctx)
        .await
        .map(|queued| HttpResponse::Accepted().json(APIResponse { queued }))
        .map_err(EventHubError::from)
}

/// Queues every stored `Event` for the search index, whatever its status.
///
/// Completes once everything is queued, the index calls themselves are not awaited.
#[derive(Debug)]
pub struct ReindexEventsUseCase;

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
impl UseCase for ReindexEventsUseCase {
    type Response = usize;

    type Error = UseCaseError;

    const NAME: &'static str = "ReindexEvents";

    async fn execute(&mut self, ctx: &EventHubContext) -> Result<Self::Response, Self::Error> {
        let events = ctx
            .repos
            .events
            .find_all()
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        let total = events.len();

        let queued = ctx.search_index.sync_all(events).await;
        info!("Queued {} of {} events for reindexing", queued, total);

        Ok(queued)
    }
}
