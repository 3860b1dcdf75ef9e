use super::{
    complete_events::CompleteEventsUseCase, create_event::CreateEventUseCase,
    delete_event::DeleteEventUseCase, update_event::UpdateEventUseCase,
};
use crate::notification::dispatch_notification::DispatchNotificationUseCase;
use crate::shared::usecase::{execute, Subscriber};
use eventhub_domain::{Event, NotificationType};
use eventhub_infra::EventHubContext;
use tracing::error;

pub struct SyncSearchIndexOnEventCreated;

#[async_trait::async_trait(?Send)]
impl Subscriber<CreateEventUseCase> for SyncSearchIndexOnEventCreated {
    async fn notify(&self, e: &Event, ctx: &EventHubContext) {
        ctx.search_index.sync(e.clone());
    }
}

pub struct SyncSearchIndexOnEventUpdated;

#[async_trait::async_trait(?Send)]
impl Subscriber<UpdateEventUseCase> for SyncSearchIndexOnEventUpdated {
    async fn notify(&self, e: &Event, ctx: &EventHubContext) {
        ctx.search_index.sync(e.clone());
    }
}

pub struct NotifyParticipantsOnEventUpdated;

#[async_trait::async_trait(?Send)]
impl Subscriber<UpdateEventUseCase> for NotifyParticipantsOnEventUpdated {
    async fn notify(&self, e: &Event, ctx: &EventHubContext) {
        let participants = match ctx.repos.events.get_participants(&e.id).await {
            Ok(participants) => participants,
            Err(err) => {
                error!(
                    "Unable to notify participants of event {} about the update: {:?}",
                    e.id, err
                );
                return;
            }
        };

        for user_id in participants {
            let usecase = DispatchNotificationUseCase {
                user_id,
                event_id: e.id,
                notification_type: NotificationType::Reschedule,
            };
            // Sideeffect, ignore result
            let _ = execute(usecase, ctx).await;
        }
    }
}

pub struct SyncSearchIndexOnEventDeleted;

#[async_trait::async_trait(?Send)]
impl Subscriber<DeleteEventUseCase> for SyncSearchIndexOnEventDeleted {
    async fn notify(&self, e: &Event, ctx: &EventHubContext) {
        ctx.search_index.sync(e.clone());
    }
}

pub struct SyncSearchIndexOnEventsCompleted;

#[async_trait::async_trait(?Send)]
impl Subscriber<CompleteEventsUseCase> for SyncSearchIndexOnEventsCompleted {
    async fn notify(&self, events: &Vec<Event>, ctx: &EventHubContext) {
        for e in events {
            ctx.search_index.sync(e.clone());
        }
    }
}
