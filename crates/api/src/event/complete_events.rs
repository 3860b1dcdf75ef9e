use super::subscribers::SyncSearchIndexOnEventsCompleted;
use crate::shared::usecase::{Subscriber, UseCase};
use eventhub_domain::{Event, EventStatus};
use eventhub_infra::EventHubContext;
use tracing::{debug, error};

/// One pass of the status updater, completing every active event that has ended.
///
/// Responds with the events as they are after the pass.
#[derive(Debug)]
pub struct CompleteEventsUseCase;

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for CompleteEventsUseCase {
    type Response = Vec<Event>;

    type Error = UseCaseError;

    const NAME: &'static str = "CompleteEvents";

    async fn execute(&mut self, ctx: &EventHubContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let mut ended = ctx
            .repos
            .events
            .find_active_ending_before(now)
            .await
            .map_err(|e| {
                error!("Unable to fetch ended events: {:?}", e);
                UseCaseError::StorageError
            })?;
        if ended.is_empty() {
            return Ok(ended);
        }

        let ids = ended.iter().map(|e| e.id).collect::<Vec<_>>();
        let updated = ctx
            .repos
            .events
            .bulk_set_status(&ids, EventStatus::Completed)
            .await
            .map_err(|e| {
                error!("Unable to complete ended events: {:?}", e);
                UseCaseError::StorageError
            })?;
        debug!("Completed {} ended events", updated.len());

        // Events deleted since they were fetched are left out
        ended.retain(|e| updated.contains(&e.id));
        for e in ended.iter_mut() {
            e.status = EventStatus::Completed;
        }
        Ok(ended)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SyncSearchIndexOnEventsCompleted)]
    }
}
