use super::INotificationRepo;
use anyhow::Context;
use chrono::{DateTime, Utc};
use eventhub_domain::{Notification, NotificationType, ID};
use sqlx::{FromRow, PgPool};
use std::convert::TryFrom;

pub struct PostgresNotificationRepo {
    pool: PgPool,
}

impl PostgresNotificationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct NotificationRaw {
    notification_id: i64,
    user_id: i64,
    event_id: i64,
    notification_type: String,
    created: DateTime<Utc>,
}

impl TryFrom<NotificationRaw> for Notification {
    type Error = anyhow::Error;

    fn try_from(n: NotificationRaw) -> Result<Self, Self::Error> {
        let notification_type = n
            .notification_type
            .parse::<NotificationType>()
            .with_context(|| format!("Notification {} has a malformed type", n.notification_id))?;
        Ok(Notification {
            id: n.notification_id.into(),
            user_id: n.user_id.into(),
            event_id: n.event_id.into(),
            notification_type,
            created: n.created,
        })
    }
}

#[async_trait::async_trait]
impl INotificationRepo for PostgresNotificationRepo {
    async fn exists(
        &self,
        event_id: &ID,
        user_id: &ID,
        notification_type: NotificationType,
    ) -> anyhow::Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM notifications AS n
                WHERE n.user_id = $1 AND n.event_id = $2 AND n.notification_type = $3
            )
            "#,
        )
        .bind(user_id.inner())
        .bind(event_id.inner())
        .bind(notification_type.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert(
        &self,
        user_id: &ID,
        event_id: &ID,
        notification_type: NotificationType,
        created: DateTime<Utc>,
    ) -> anyhow::Result<Option<Notification>> {
        // The partial unique index on reminders turns a duplicate reminder into no row
        let row = sqlx::query_as::<_, NotificationRaw>(
            r#"
            INSERT INTO notifications(user_id, event_id, notification_type, created)
            VALUES($1, $2, $3, $4)
            ON CONFLICT DO NOTHING
            RETURNING *
            "#,
        )
        .bind(user_id.inner())
        .bind(event_id.inner())
        .bind(notification_type.as_str())
        .bind(created)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Notification::try_from).transpose()
    }

    async fn find_all_by_user(&self, user_id: &ID) -> anyhow::Result<Vec<Notification>> {
        let rows = sqlx::query_as::<_, NotificationRaw>(
            r#"
            SELECT * FROM notifications AS n
            WHERE n.user_id = $1
            ORDER BY n.created DESC, n.notification_id DESC
            "#,
        )
        .bind(user_id.inner())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(Notification::try_from).collect()
    }
}
