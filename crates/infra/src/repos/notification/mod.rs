mod inmemory;
mod postgres;

use chrono::{DateTime, Utc};
use eventhub_domain::{Notification, NotificationType, ID};
pub use inmemory::InMemoryNotificationRepo;
pub use postgres::PostgresNotificationRepo;

#[async_trait::async_trait]
pub trait INotificationRepo: Send + Sync {
    async fn exists(
        &self,
        event_id: &ID,
        user_id: &ID,
        notification_type: NotificationType,
    ) -> anyhow::Result<bool>;
    /// Stores a new `Notification`.
    ///
    /// Returns `None` when the notification is a reminder that already exists
    /// for the user and event, which can happen when two dispatches race past
    /// the existence check.
    async fn insert(
        &self,
        user_id: &ID,
        event_id: &ID,
        notification_type: NotificationType,
        created: DateTime<Utc>,
    ) -> anyhow::Result<Option<Notification>>;
    /// All notifications of a user, newest first
    async fn find_all_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Notification>>;
}

#[cfg(test)]
mod tests {
    use crate::EventHubContext;
    use chrono::{prelude::*, Duration};
    use eventhub_domain::{NotificationType, ID};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 2, 21, 10, 0, 0).unwrap()
    }

    #[actix_web::test]
    async fn insert_and_check_existence() {
        let ctx = EventHubContext::create_inmemory();
        let repo = &ctx.repos.notifications;
        let (user, event) = (ID::new(1), ID::new(2));

        assert!(!repo
            .exists(&event, &user, NotificationType::Reminder1d)
            .await
            .unwrap());
        let n = repo
            .insert(&user, &event, NotificationType::Reminder1d, now())
            .await
            .unwrap()
            .expect("To insert notification");
        assert_eq!(n.user_id, user);
        assert_eq!(n.event_id, event);
        assert!(repo
            .exists(&event, &user, NotificationType::Reminder1d)
            .await
            .unwrap());
        assert!(!repo
            .exists(&event, &user, NotificationType::Reminder1h)
            .await
            .unwrap());
    }

    #[actix_web::test]
    async fn reminders_are_unique_per_user_and_event() {
        let ctx = EventHubContext::create_inmemory();
        let repo = &ctx.repos.notifications;
        let (user, event) = (ID::new(1), ID::new(2));

        assert!(repo
            .insert(&user, &event, NotificationType::Reminder1h, now())
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .insert(&user, &event, NotificationType::Reminder1h, now())
            .await
            .unwrap()
            .is_none());
        // Other users and events have their own reminders
        assert!(repo
            .insert(&ID::new(3), &event, NotificationType::Reminder1h, now())
            .await
            .unwrap()
            .is_some());
        assert!(repo
            .insert(&user, &ID::new(4), NotificationType::Reminder1h, now())
            .await
            .unwrap()
            .is_some());
    }

    #[actix_web::test]
    async fn cancel_and_reschedule_are_never_deduplicated() {
        let ctx = EventHubContext::create_inmemory();
        let repo = &ctx.repos.notifications;
        let (user, event) = (ID::new(1), ID::new(2));

        for _ in 0..2 {
            for t in [NotificationType::Cancel, NotificationType::Reschedule] {
                assert!(repo.insert(&user, &event, t, now()).await.unwrap().is_some());
            }
        }
        assert_eq!(repo.find_all_by_user(&user).await.unwrap().len(), 4);
    }

    #[actix_web::test]
    async fn finds_notifications_of_user_newest_first() {
        let ctx = EventHubContext::create_inmemory();
        let repo = &ctx.repos.notifications;
        let user = ID::new(1);

        repo.insert(&user, &ID::new(2), NotificationType::Reminder1d, now())
            .await
            .unwrap();
        repo.insert(
            &user,
            &ID::new(2),
            NotificationType::Reminder1h,
            now() + Duration::hours(22),
        )
        .await
        .unwrap();
        repo.insert(&ID::new(9), &ID::new(2), NotificationType::Reminder1d, now())
            .await
            .unwrap();

        let res = repo.find_all_by_user(&user).await.unwrap();
        assert_eq!(res.len(), 2);
        assert_eq!(res[0].notification_type, NotificationType::Reminder1h);
        assert_eq!(res[1].notification_type, NotificationType::Reminder1d);
    }
}
