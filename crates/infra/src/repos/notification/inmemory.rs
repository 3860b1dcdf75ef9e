use super::INotificationRepo;
use crate::repos::shared::inmemory_repo::*;
use chrono::{DateTime, Utc};
use eventhub_domain::{Notification, NotificationType, ID};
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Mutex,
};

pub struct InMemoryNotificationRepo {
    notifications: Mutex<Vec<Notification>>,
    next_id: AtomicI64,
}

impl InMemoryNotificationRepo {
    pub fn new() -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

fn is_same_key(
    n: &Notification,
    event_id: &ID,
    user_id: &ID,
    notification_type: NotificationType,
) -> bool {
    n.event_id == *event_id && n.user_id == *user_id && n.notification_type == notification_type
}

#[async_trait::async_trait]
impl INotificationRepo for InMemoryNotificationRepo {
    async fn exists(
        &self,
        event_id: &ID,
        user_id: &ID,
        notification_type: NotificationType,
    ) -> anyhow::Result<bool> {
        let notifications = lock(&self.notifications)?;
        Ok(notifications
            .iter()
            .any(|n| is_same_key(n, event_id, user_id, notification_type)))
    }

    async fn insert(
        &self,
        user_id: &ID,
        event_id: &ID,
        notification_type: NotificationType,
        created: DateTime<Utc>,
    ) -> anyhow::Result<Option<Notification>> {
        // Check and insert under the same lock, like the unique index does in postgres
        let mut notifications = lock(&self.notifications)?;
        if notification_type.is_deduplicated()
            && notifications
                .iter()
                .any(|n| is_same_key(n, event_id, user_id, notification_type))
        {
            return Ok(None);
        }

        let notification = Notification {
            id: ID::new(self.next_id.fetch_add(1, Ordering::SeqCst)),
            user_id: *user_id,
            event_id: *event_id,
            notification_type,
            created,
        };
        notifications.push(notification.clone());
        Ok(Some(notification))
    }

    async fn find_all_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Notification>> {
        let mut res = find_by(&self.notifications, |n| n.user_id == *user_id)?;
        res.sort_by(|a, b| b.created.cmp(&a.created).then(b.id.cmp(&a.id)));
        Ok(res)
    }
}
