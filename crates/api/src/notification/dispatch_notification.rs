use crate::error::EventHubError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use eventhub_api_structs::dispatch_notification::*;
use eventhub_api_structs::dtos::NotificationDTO;
use eventhub_domain::{EventStatus, Notification, NotificationType, ID};
use eventhub_infra::EventHubContext;
use tracing::{error, info};

pub async fn dispatch_notification_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<EventHubContext>,
) -> Result<HttpResponse, EventHubError> {
    let usecase = DispatchNotificationUseCase::parse(
        path_params.user_id,
        path_params.event_id,
        &path_params.notification_type,
    )
    .map_err(EventHubError::from)?;

    execute(usecase, &ctx)
        .await
        .map(|outcome| {
            let notification = match outcome {
                DispatchOutcome::Created(n) => Some(NotificationDTO::new(n)),
                DispatchOutcome::AlreadySent => None,
            };
            HttpResponse::Ok().json(APIResponse { notification })
        })
        .map_err(EventHubError::from)
}

/// Records a notification for a participant of an `Event`.
///
/// Reminders are recorded at most once per user, event and reminder type,
/// and only while the event is active. Cancel and reschedule notifications
/// are recorded every time.
#[derive(Debug)]
pub struct DispatchNotificationUseCase {
    pub user_id: ID,
    pub event_id: ID,
    pub notification_type: NotificationType,
}

impl DispatchNotificationUseCase {
    /// Builds the usecase from an untyped notification type as received over the wire
    pub fn parse(
        user_id: ID,
        event_id: ID,
        notification_type: &str,
    ) -> Result<Self, UseCaseError> {
        let notification_type = notification_type
            .parse::<NotificationType>()
            .map_err(|e| UseCaseError::InvalidNotificationType(e.0))?;
        Ok(Self {
            user_id,
            event_id,
            notification_type,
        })
    }
}

#[derive(Debug, PartialEq)]
pub enum DispatchOutcome {
    Created(Notification),
    /// The reminder had already been delivered, nothing was recorded
    AlreadySent,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidNotificationType(String),
    EventNotFound(ID),
    EventNotActive(ID, EventStatus),
    StorageError,
}

impl From<UseCaseError> for EventHubError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidNotificationType(notification_type) => {
                Self::BadClientData(format!(
                    "Unknown notification type: `{}`. Expected one of reminder_1d, reminder_1h, cancel or reschedule",
                    notification_type
                ))
            }
            UseCaseError::EventNotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
            UseCaseError::EventNotActive(event_id, status) => Self::Conflict(format!(
                "The event with id: {}, is {} and does not get reminders",
                event_id, status
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for DispatchNotificationUseCase {
    type Response = DispatchOutcome;

    type Error = UseCaseError;

    const NAME: &'static str = "DispatchNotification";

    async fn execute(&mut self, ctx: &EventHubContext) -> Result<Self::Response, Self::Error> {
        let event = ctx
            .repos
            .events
            .find(&self.event_id)
            .await
            .map_err(|e| {
                error!("Unable to look up event {}: {:?}", self.event_id, e);
                UseCaseError::StorageError
            })?;
        let status = match event {
            Some(e) if e.status != EventStatus::Deleted => e.status,
            _ => return Err(UseCaseError::EventNotFound(self.event_id)),
        };

        if self.notification_type.is_deduplicated() {
            if status != EventStatus::Active {
                return Err(UseCaseError::EventNotActive(self.event_id, status));
            }

            let already_sent = ctx
                .repos
                .notifications
                .exists(&self.event_id, &self.user_id, self.notification_type)
                .await
                .map_err(|e| {
                    error!("Unable to look up previous notifications: {:?}", e);
                    UseCaseError::StorageError
                })?;
            if already_sent {
                return Ok(DispatchOutcome::AlreadySent);
            }
        }

        let created = ctx
            .repos
            .notifications
            .insert(
                &self.user_id,
                &self.event_id,
                self.notification_type,
                ctx.sys.now(),
            )
            .await
            .map_err(|e| {
                error!("Unable to store notification: {:?}", e);
                UseCaseError::StorageError
            })?;

        match created {
            Some(notification) => {
                info!(
                    "Sent {} notification to user {} for event {}",
                    self.notification_type, self.user_id, self.event_id
                );
                Ok(DispatchOutcome::Created(notification))
            }
            // Lost a race against a concurrent dispatch of the same reminder
            None => Ok(DispatchOutcome::AlreadySent),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use eventhub_domain::Event;

    async fn insert_event(ctx: &EventHubContext) -> Event {
        let event = Event {
            id: Default::default(),
            title: "Board games".into(),
            description: Default::default(),
            category: "games".into(),
            location: "Library".into(),
            is_public: true,
            status: EventStatus::Active,
            date: NaiveDate::from_ymd_opt(2021, 2, 21).unwrap(),
            start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            organization_id: ID::new(1),
            creator_id: ID::new(2),
        };
        ctx.repos.events.insert(&event).await.unwrap()
    }

    fn usecase(
        event: &Event,
        user_id: i64,
        notification_type: NotificationType,
    ) -> DispatchNotificationUseCase {
        DispatchNotificationUseCase {
            user_id: ID::new(user_id),
            event_id: event.id,
            notification_type,
        }
    }

    #[test]
    fn rejects_unknown_notification_type() {
        let res = DispatchNotificationUseCase::parse(ID::new(1), ID::new(1), "reminder_2d");
        assert_eq!(
            res.unwrap_err(),
            UseCaseError::InvalidNotificationType("reminder_2d".into())
        );
    }

    #[actix_web::test]
    async fn rejects_missing_event() {
        let ctx = EventHubContext::create_inmemory();
        let mut usecase = DispatchNotificationUseCase {
            user_id: ID::new(1),
            event_id: ID::new(404),
            notification_type: NotificationType::Cancel,
        };
        let res = usecase.execute(&ctx).await;
        assert_eq!(res.unwrap_err(), UseCaseError::EventNotFound(ID::new(404)));
    }

    #[actix_web::test]
    async fn rejects_deleted_event() {
        let ctx = EventHubContext::create_inmemory();
        let event = insert_event(&ctx).await;
        ctx.repos
            .events
            .bulk_set_status(&[event.id], EventStatus::Deleted)
            .await
            .unwrap();

        let res = usecase(&event, 1, NotificationType::Reminder1h)
            .execute(&ctx)
            .await;
        assert_eq!(res.unwrap_err(), UseCaseError::EventNotFound(event.id));
    }

    #[actix_web::test]
    async fn rejects_reminders_for_completed_event() {
        let ctx = EventHubContext::create_inmemory();
        let event = insert_event(&ctx).await;
        ctx.repos
            .events
            .bulk_set_status(&[event.id], EventStatus::Completed)
            .await
            .unwrap();

        for notification_type in [NotificationType::Reminder1d, NotificationType::Reminder1h] {
            let res = usecase(&event, 1, notification_type).execute(&ctx).await;
            assert_eq!(
                res.unwrap_err(),
                UseCaseError::EventNotActive(event.id, EventStatus::Completed)
            );
        }
        assert!(ctx
            .repos
            .notifications
            .find_all_by_user(&ID::new(1))
            .await
            .unwrap()
            .is_empty());
    }

    #[actix_web::test]
    async fn sends_reminder_only_once() {
        let ctx = EventHubContext::create_inmemory();
        let event = insert_event(&ctx).await;

        let first = usecase(&event, 1, NotificationType::Reminder1d)
            .execute(&ctx)
            .await
            .unwrap();
        assert!(matches!(first, DispatchOutcome::Created(_)));
        let second = usecase(&event, 1, NotificationType::Reminder1d)
            .execute(&ctx)
            .await
            .unwrap();
        assert_eq!(second, DispatchOutcome::AlreadySent);

        // Other reminder types and other users are unaffected
        let other_type = usecase(&event, 1, NotificationType::Reminder1h)
            .execute(&ctx)
            .await
            .unwrap();
        assert!(matches!(other_type, DispatchOutcome::Created(_)));
        let other_user = usecase(&event, 2, NotificationType::Reminder1d)
            .execute(&ctx)
            .await
            .unwrap();
        assert!(matches!(other_user, DispatchOutcome::Created(_)));

        let notifications = ctx
            .repos
            .notifications
            .find_all_by_user(&ID::new(1))
            .await
            .unwrap();
        assert_eq!(notifications.len(), 2);
    }

    #[actix_web::test]
    async fn cancel_and_reschedule_are_never_deduplicated() {
        let ctx = EventHubContext::create_inmemory();
        let event = insert_event(&ctx).await;

        for notification_type in [NotificationType::Cancel, NotificationType::Reschedule] {
            for _ in 0..2 {
                let res = usecase(&event, 1, notification_type)
                    .execute(&ctx)
                    .await
                    .unwrap();
                assert!(matches!(res, DispatchOutcome::Created(_)));
            }
        }
        let notifications = ctx
            .repos
            .notifications
            .find_all_by_user(&ID::new(1))
            .await
            .unwrap();
        assert_eq!(notifications.len(), 4);
    }
}
