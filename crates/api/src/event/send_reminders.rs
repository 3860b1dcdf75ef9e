use crate::notification::dispatch_notification::{DispatchNotificationUseCase, DispatchOutcome};
use crate::shared::usecase::{execute, UseCase};
use eventhub_domain::{classify_window, EventStatus};
use eventhub_infra::EventHubContext;
use tracing::{debug, error, warn};

/// One pass of the reminder scheduler.
///
/// Looks at every event starting within the lookahead and sends each
/// participant the reminder matching the time left until the start. A
/// reminder already delivered is not sent again, so running the pass more
/// often than once a minute only costs lookups.
#[derive(Debug)]
pub struct SendRemindersUseCase;

#[derive(Debug, Default, PartialEq)]
pub struct RemindersSent {
    pub events_checked: usize,
    pub reminders_sent: usize,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendRemindersUseCase {
    type Response = RemindersSent;

    type Error = UseCaseError;

    const NAME: &'static str = "SendReminders";

    async fn execute(&mut self, ctx: &EventHubContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let tz = ctx.config.timezone;
        let events = ctx
            .repos
            .events
            .find_upcoming(now, ctx.config.reminder_lookahead)
            .await
            .map_err(|e| {
                error!("Unable to fetch upcoming events: {:?}", e);
                UseCaseError::StorageError
            })?;

        let mut res = RemindersSent::default();
        for event in events {
            match event.status {
                EventStatus::Active => {}
                EventStatus::Completed | EventStatus::Deleted => continue,
            }
            res.events_checked += 1;

            let start = match event.start_instant(&tz) {
                Some(start) => start,
                None => {
                    warn!(
                        "Event {} starts at a time that does not exist in {}",
                        event.id,
                        tz.name()
                    );
                    continue;
                }
            };
            let reminder = match classify_window(start, now) {
                Some(reminder) => reminder,
                None => continue,
            };

            let participants = match ctx.repos.events.get_participants(&event.id).await {
                Ok(participants) => participants,
                Err(e) => {
                    error!(
                        "Unable to fetch participants of event {}: {:?}",
                        event.id, e
                    );
                    continue;
                }
            };

            for user_id in participants {
                let usecase = DispatchNotificationUseCase {
                    user_id,
                    event_id: event.id,
                    notification_type: reminder.into(),
                };
                // Failures are logged by the usecase and retried on the next tick
                if let Ok(DispatchOutcome::Created(_)) = execute(usecase, ctx).await {
                    res.reminders_sent += 1;
                }
            }
        }

        debug!(
            "Sent {} reminders for {} upcoming events",
            res.reminders_sent, res.events_checked
        );

        Ok(res)
    }
}
