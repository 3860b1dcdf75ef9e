use super::IEventRepo;
use anyhow::Context;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use eventhub_domain::{Event, EventStatus, ID};
use sqlx::{FromRow, PgPool};
use std::convert::TryFrom;

pub struct PostgresEventRepo {
    pool: PgPool,
    timezone: Tz,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool, timezone: Tz) -> Self {
        Self { pool, timezone }
    }
}

#[derive(Debug, FromRow)]
struct EventRaw {
    event_id: i64,
    title: String,
    description: String,
    category: String,
    location: String,
    is_public: bool,
    status: String,
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    organization_id: i64,
    creator_id: i64,
}

impl TryFrom<EventRaw> for Event {
    type Error = anyhow::Error;

    fn try_from(e: EventRaw) -> Result<Self, Self::Error> {
        let status = e
            .status
            .parse::<EventStatus>()
            .with_context(|| format!("Event {} has a malformed status", e.event_id))?;
        Ok(Event {
            id: e.event_id.into(),
            title: e.title,
            description: e.description,
            category: e.category,
            location: e.location,
            is_public: e.is_public,
            status,
            date: e.date,
            start_time: e.start_time,
            end_time: e.end_time,
            organization_id: e.organization_id.into(),
            creator_id: e.creator_id.into(),
        })
    }
}

fn into_events(rows: Vec<EventRaw>) -> anyhow::Result<Vec<Event>> {
    rows.into_iter().map(Event::try_from).collect()
}

#[async_trait::async_trait]
impl IEventRepo for PostgresEventRepo {
    async fn insert(&self, e: &Event) -> anyhow::Result<Event> {
        let row = sqlx::query_as::<_, EventRaw>(
            r#"
            INSERT INTO events(
                title,
                description,
                category,
                location,
                is_public,
                status,
                date,
                start_time,
                end_time,
                organization_id,
                creator_id
            )
            VALUES($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(&e.title)
        .bind(&e.description)
        .bind(&e.category)
        .bind(&e.location)
        .bind(e.is_public)
        .bind(e.status.as_str())
        .bind(e.date)
        .bind(e.start_time)
        .bind(e.end_time)
        .bind(e.organization_id.inner())
        .bind(e.creator_id.inner())
        .fetch_one(&self.pool)
        .await?;

        Event::try_from(row)
    }

    async fn save(&self, e: &Event) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE events SET
                title = $2,
                description = $3,
                category = $4,
                location = $5,
                is_public = $6,
                date = $7,
                start_time = $8,
                end_time = $9
            WHERE event_id = $1 AND status = 'active'
            "#,
        )
        .bind(e.id.inner())
        .bind(&e.title)
        .bind(&e.description)
        .bind(&e.category)
        .bind(&e.location)
        .bind(e.is_public)
        .bind(e.date)
        .bind(e.start_time)
        .bind(e.end_time)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<Event>> {
        let row = sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT * FROM events AS e
            WHERE e.event_id = $1
            "#,
        )
        .bind(event_id.inner())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Event::try_from).transpose()
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRaw>("SELECT * FROM events")
            .fetch_all(&self.pool)
            .await?;
        into_events(rows)
    }

    async fn find_upcoming(
        &self,
        now: DateTime<Utc>,
        horizon: Duration,
    ) -> anyhow::Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT * FROM events AS e
            WHERE ((e.date + e.start_time) AT TIME ZONE $3) BETWEEN $1 AND $2
            "#,
        )
        .bind(now)
        .bind(now + horizon)
        .bind(self.timezone.name())
        .fetch_all(&self.pool)
        .await?;
        into_events(rows)
    }

    async fn find_active_ending_before(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRaw>(
            r#"
            SELECT * FROM events AS e
            WHERE e.status = 'active'
                AND ((e.date + e.end_time) AT TIME ZONE $2) <= $1
            "#,
        )
        .bind(now)
        .bind(self.timezone.name())
        .fetch_all(&self.pool)
        .await?;
        into_events(rows)
    }

    async fn bulk_set_status(
        &self,
        event_ids: &[ID],
        status: EventStatus,
    ) -> anyhow::Result<Vec<ID>> {
        let from_statuses = [
            EventStatus::Active,
            EventStatus::Completed,
            EventStatus::Deleted,
        ]
        .iter()
        .filter(|s| s.can_transition_to(status))
        .map(|s| s.as_str().to_string())
        .collect::<Vec<_>>();
        if event_ids.is_empty() || from_statuses.is_empty() {
            return Ok(Vec::new());
        }
        let ids = event_ids.iter().map(|id| id.inner()).collect::<Vec<_>>();

        let updated = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE events SET status = $1
            WHERE event_id = ANY($2) AND status = ANY($3)
            RETURNING event_id
            "#,
        )
        .bind(status.as_str())
        .bind(&ids)
        .bind(&from_statuses)
        .fetch_all(&self.pool)
        .await?;
        Ok(updated.into_iter().map(ID::from).collect())
    }

    async fn get_participants(&self, event_id: &ID) -> anyhow::Result<Vec<ID>> {
        let user_ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT p.user_id FROM event_participants AS p
            WHERE p.event_id = $1
            "#,
        )
        .bind(event_id.inner())
        .fetch_all(&self.pool)
        .await?;
        Ok(user_ids.into_iter().map(ID::from).collect())
    }

    async fn add_participant(&self, event_id: &ID, user_id: &ID) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO event_participants(event_id, user_id)
            VALUES($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(event_id.inner())
        .bind(user_id.inner())
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn remove_participant(&self, event_id: &ID, user_id: &ID) -> anyhow::Result<bool> {
        let res = sqlx::query(
            r#"
            DELETE FROM event_participants AS p
            WHERE p.event_id = $1 AND p.user_id = $2
            "#,
        )
        .bind(event_id.inner())
        .bind(user_id.inner())
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }
}
