mod helpers;

use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use eventhub_domain::{Event, EventStatus, ID};
use eventhub_sdk::{
    APIError, CreateEventInput, DispatchNotificationInput, EventHubSDK, GetEventInput,
    GetUserNotificationsInput, NotificationTemplate, NotificationType, UpdateEventBody,
    UpdateEventInput, UserEventInput,
};
use eventhub_sdk::StatusCode;
use helpers::setup::{spawn_app, TestApp};

const CREATOR: i64 = 100;

fn create_event_input() -> CreateEventInput {
    CreateEventInput {
        title: "Summer party".into(),
        description: "Bring a friend".into(),
        category: "social".into(),
        location: "Rooftop".into(),
        is_public: true,
        date: NaiveDate::from_ymd_opt(2099, 6, 1).unwrap(),
        start_time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
        organization_id: ID::new(1),
        creator_id: ID::new(CREATOR),
    }
}

async fn create_event(sdk: &EventHubSDK) -> ID {
    sdk.event
        .create(create_event_input())
        .await
        .expect("Expected to create event")
        .event
        .id
}

async fn join(sdk: &EventHubSDK, event_id: ID, user_id: i64) {
    sdk.event
        .join(UserEventInput {
            user_id: ID::new(user_id),
            event_id,
        })
        .await
        .expect("Expected to join event");
}

async fn notification_types(sdk: &EventHubSDK, user_id: i64) -> Vec<NotificationType> {
    sdk.notification
        .get_by_user(GetUserNotificationsInput {
            user_id: ID::new(user_id),
        })
        .await
        .expect("Expected to get notifications")
        .notifications
        .into_iter()
        .map(|n| n.notification.notification_type)
        .collect()
}

/// Stores an event directly, bypassing the validation of the api
async fn insert_event(
    app: &TestApp,
    start: chrono::DateTime<Utc>,
    status: EventStatus,
) -> Event {
    let event = Event {
        id: Default::default(),
        title: "Stored".into(),
        description: Default::default(),
        category: Default::default(),
        location: Default::default(),
        is_public: true,
        status,
        date: start.date_naive(),
        start_time: start.time(),
        end_time: (start + Duration::minutes(1)).time(),
        organization_id: ID::new(1),
        creator_id: ID::new(CREATOR),
    };
    app.ctx.repos.events.insert(&event).await.unwrap()
}

async fn eventually<F, Fut>(mut condition: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..100 {
        if condition().await {
            return true;
        }
        actix_web::rt::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    false
}

#[actix_web::test]
async fn test_status_ok() {
    let (_, sdk) = spawn_app().await;
    assert!(sdk.status.check_health().await.is_ok());
}

#[actix_web::test]
async fn test_create_and_get_event() {
    let (app, sdk) = spawn_app().await;
    let event_id = create_event(&sdk).await;
    join(&sdk, event_id, 1).await;

    let res = sdk
        .event
        .get(GetEventInput { event_id })
        .await
        .expect("Expected to get event");
    assert_eq!(res.event.title, "Summer party");
    assert_eq!(res.event.status, EventStatus::Active);
    assert_eq!(res.participants, vec![ID::new(1)]);

    let index = &app.index;
    assert!(
        eventually(|| async move { index.get(&event_id).is_some() }).await,
        "Expected the event to be mirrored into the search index"
    );
}

#[actix_web::test]
async fn test_create_event_validates_schedule() {
    let (_, sdk) = spawn_app().await;

    let mut input = create_event_input();
    input.end_time = input.start_time;
    assert_eq!(
        sdk.event.create(input).await.err(),
        Some(APIError::UnexpectedStatusCode(StatusCode::BAD_REQUEST))
    );

    let mut input = create_event_input();
    input.date = NaiveDate::from_ymd_opt(2001, 1, 1).unwrap();
    assert_eq!(
        sdk.event.create(input).await.err(),
        Some(APIError::UnexpectedStatusCode(StatusCode::BAD_REQUEST))
    );
}

#[actix_web::test]
async fn test_get_missing_event() {
    let (_, sdk) = spawn_app().await;
    let res = sdk
        .event
        .get(GetEventInput {
            event_id: ID::new(12345),
        })
        .await;
    assert_eq!(
        res.err(),
        Some(APIError::UnexpectedStatusCode(StatusCode::NOT_FOUND))
    );
}

#[actix_web::test]
async fn test_join_and_quit_event() {
    let (_, sdk) = spawn_app().await;
    let event_id = create_event(&sdk).await;
    let input = || UserEventInput {
        user_id: ID::new(7),
        event_id,
    };

    assert!(sdk.event.join(input()).await.is_ok());
    assert_eq!(
        sdk.event.join(input()).await.err(),
        Some(APIError::UnexpectedStatusCode(StatusCode::CONFLICT))
    );
    assert!(sdk.event.quit(input()).await.is_ok());
    assert_eq!(
        sdk.event.quit(input()).await.err(),
        Some(APIError::UnexpectedStatusCode(StatusCode::NOT_FOUND))
    );
}

#[actix_web::test]
async fn test_dispatch_notification() {
    let (_, sdk) = spawn_app().await;
    let event_id = create_event(&sdk).await;
    let input = |notification_type: &str| DispatchNotificationInput {
        user_id: ID::new(3),
        event_id,
        notification_type: notification_type.into(),
    };

    let first = sdk.notification.dispatch(input("reminder_1h")).await.unwrap();
    assert!(first.notification.is_some());
    let second = sdk.notification.dispatch(input("reminder_1h")).await.unwrap();
    assert!(second.notification.is_none());

    assert!(sdk
        .notification
        .dispatch(input("cancel"))
        .await
        .unwrap()
        .notification
        .is_some());
    assert_eq!(
        notification_types(&sdk, 3).await,
        vec![NotificationType::Cancel, NotificationType::Reminder1h]
    );
}

#[actix_web::test]
async fn test_dispatch_notification_errors() {
    let (app, sdk) = spawn_app().await;
    let event_id = create_event(&sdk).await;

    let res = sdk
        .notification
        .dispatch(DispatchNotificationInput {
            user_id: ID::new(3),
            event_id,
            notification_type: "reminder_2d".into(),
        })
        .await;
    assert_eq!(
        res.err(),
        Some(APIError::UnexpectedStatusCode(StatusCode::BAD_REQUEST))
    );

    let res = sdk
        .notification
        .dispatch(DispatchNotificationInput {
            user_id: ID::new(3),
            event_id: ID::new(12345),
            notification_type: "cancel".into(),
        })
        .await;
    assert_eq!(
        res.err(),
        Some(APIError::UnexpectedStatusCode(StatusCode::NOT_FOUND))
    );

    app.ctx
        .repos
        .events
        .bulk_set_status(&[event_id], EventStatus::Completed)
        .await
        .unwrap();
    let res = sdk
        .notification
        .dispatch(DispatchNotificationInput {
            user_id: ID::new(3),
            event_id,
            notification_type: "reminder_1d".into(),
        })
        .await;
    assert_eq!(
        res.err(),
        Some(APIError::UnexpectedStatusCode(StatusCode::CONFLICT))
    );
}

#[actix_web::test]
async fn test_update_event_notifies_participants() {
    let (_, sdk) = spawn_app().await;
    let event_id = create_event(&sdk).await;
    join(&sdk, event_id, 1).await;
    join(&sdk, event_id, 2).await;

    let body = || UpdateEventBody {
        start_time: Some(NaiveTime::from_hms_opt(19, 0, 0).unwrap()),
        ..Default::default()
    };
    let res = sdk
        .event
        .update(UpdateEventInput {
            user_id: ID::new(1),
            event_id,
            body: body(),
        })
        .await;
    assert_eq!(
        res.err(),
        Some(APIError::UnexpectedStatusCode(StatusCode::FORBIDDEN))
    );

    let res = sdk
        .event
        .update(UpdateEventInput {
            user_id: ID::new(CREATOR),
            event_id,
            body: body(),
        })
        .await
        .expect("Expected to update event");
    assert_eq!(
        res.event.start_time,
        NaiveTime::from_hms_opt(19, 0, 0).unwrap()
    );

    for user_id in [1, 2] {
        assert_eq!(
            notification_types(&sdk, user_id).await,
            vec![NotificationType::Reschedule]
        );
    }
    let feed = sdk
        .notification
        .get_by_user(GetUserNotificationsInput { user_id: ID::new(1) })
        .await
        .unwrap();
    assert!(matches!(
        feed.notifications[0].message,
        NotificationTemplate::EventRescheduled { starts_at: Some(_) }
    ));
}

#[actix_web::test]
async fn test_delete_event_cancels_for_participants() {
    let (app, sdk) = spawn_app().await;
    let event_id = create_event(&sdk).await;
    for user_id in 1..=5 {
        join(&sdk, event_id, user_id).await;
    }

    let res = sdk
        .event
        .delete(UserEventInput {
            user_id: ID::new(CREATOR),
            event_id,
        })
        .await
        .expect("Expected to delete event");
    assert_eq!(res.event.status, EventStatus::Deleted);

    for user_id in 1..=5 {
        assert_eq!(
            notification_types(&sdk, user_id).await,
            vec![NotificationType::Cancel]
        );
    }
    assert_eq!(
        sdk.event.get(GetEventInput { event_id }).await.err(),
        Some(APIError::UnexpectedStatusCode(StatusCode::NOT_FOUND))
    );
    let index = &app.index;
    assert!(
        eventually(|| async move {
            matches!(index.get(&event_id), Some(doc) if doc.status == "deleted")
        })
        .await
    );
}

#[actix_web::test]
async fn test_reminder_job_sends_reminders_once() {
    let (app, sdk) = spawn_app().await;
    let start = Utc::now() + Duration::minutes(90);
    let event = insert_event(&app, start, EventStatus::Active).await;
    for user_id in [1, 2] {
        app.ctx
            .repos
            .events
            .add_participant(&event.id, &ID::new(user_id))
            .await
            .unwrap();
    }

    let sdk = &sdk;
    assert!(
        eventually(|| async move { notification_types(sdk, 2).await.len() == 1 }).await,
        "Expected the reminder job to send a reminder"
    );
    // Let the job tick a few more times
    actix_web::rt::time::sleep(std::time::Duration::from_millis(200)).await;
    for user_id in [1, 2] {
        assert_eq!(
            notification_types(sdk, user_id).await,
            vec![NotificationType::Reminder1h]
        );
    }
}

#[actix_web::test]
async fn test_status_job_completes_ended_events() {
    let (app, sdk) = spawn_app().await;
    let start = Utc::now() - Duration::days(1);
    let ended = insert_event(&app, start, EventStatus::Active).await;

    let sdk = &sdk;
    let event_id = ended.id;
    assert!(
        eventually(|| async move {
            match sdk.event.get(GetEventInput { event_id }).await {
                Ok(res) => res.event.status == EventStatus::Completed,
                Err(_) => false,
            }
        })
        .await,
        "Expected the status job to complete the event"
    );
}

#[actix_web::test]
async fn test_reindex_events() {
    let (app, sdk) = spawn_app().await;
    assert_eq!(sdk.event.reindex().await.unwrap().queued, 0);

    let start = Utc::now() + Duration::days(3);
    let deleted = insert_event(&app, start, EventStatus::Deleted).await;
    create_event(&sdk).await;

    assert_eq!(sdk.event.reindex().await.unwrap().queued, 2);
    let index = &app.index;
    let deleted_id = deleted.id;
    assert!(
        eventually(|| async move {
            matches!(index.get(&deleted_id), Some(doc) if doc.status == "deleted")
        })
        .await
    );
}

#[actix_web::test]
async fn test_stop_application() {
    let (app, sdk) = spawn_app().await;
    assert!(sdk.status.check_health().await.is_ok());

    app.handle.stop().await;
    assert_eq!(sdk.status.check_health().await.err(), Some(APIError::Network));
}
