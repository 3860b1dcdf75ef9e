mod inmemory;
mod postgres;

use chrono::{DateTime, Duration, Utc};
use eventhub_domain::{Event, EventStatus, ID};
pub use inmemory::InMemoryEventRepo;
pub use postgres::PostgresEventRepo;

#[async_trait::async_trait]
pub trait IEventRepo: Send + Sync {
    /// Stores a new `Event` and returns it with the id assigned by the store
    async fn insert(&self, e: &Event) -> anyhow::Result<Event>;
    /// Writes every field of `e` except its status, as long as the stored
    /// event is still active. Returns `false` if it is not.
    async fn save(&self, e: &Event) -> anyhow::Result<bool>;
    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<Event>>;
    async fn find_all(&self) -> anyhow::Result<Vec<Event>>;
    /// Events starting in `[now, now + horizon]`, in any status
    async fn find_upcoming(
        &self,
        now: DateTime<Utc>,
        horizon: Duration,
    ) -> anyhow::Result<Vec<Event>>;
    /// Active events that ended at or before `now`
    async fn find_active_ending_before(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Event>>;
    /// Moves the given events to `status`. Events that are not allowed to
    /// transition to `status` are left untouched. Returns the ids of the
    /// updated events.
    async fn bulk_set_status(
        &self,
        event_ids: &[ID],
        status: EventStatus,
    ) -> anyhow::Result<Vec<ID>>;
    async fn get_participants(&self, event_id: &ID) -> anyhow::Result<Vec<ID>>;
    /// Returns `false` if the user had already joined the event
    async fn add_participant(&self, event_id: &ID, user_id: &ID) -> anyhow::Result<bool>;
    /// Returns `false` if the user had not joined the event
    async fn remove_participant(&self, event_id: &ID, user_id: &ID) -> anyhow::Result<bool>;
}

#[cfg(test)]
mod tests {
    use crate::EventHubContext;
    use chrono::{prelude::*, Duration};
    use eventhub_domain::{Event, EventStatus, ID};

    fn generate_event(start: DateTime<Utc>, minutes: i64) -> Event {
        let end = start + Duration::minutes(minutes);
        Event {
            id: Default::default(),
            title: "Meetup".into(),
            description: Default::default(),
            category: "tech".into(),
            location: "Oslo".into(),
            is_public: true,
            status: EventStatus::Active,
            date: start.date_naive(),
            start_time: start.time(),
            end_time: end.time(),
            organization_id: ID::new(1),
            creator_id: ID::new(2),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 2, 21, 10, 0, 0).unwrap()
    }

    #[actix_web::test]
    async fn insert_assigns_ids_and_find_returns_event() {
        let ctx = EventHubContext::create_inmemory();

        let e1 = ctx
            .repos
            .events
            .insert(&generate_event(now(), 60))
            .await
            .unwrap();
        let e2 = ctx
            .repos
            .events
            .insert(&generate_event(now(), 60))
            .await
            .unwrap();
        assert_ne!(e1.id, e2.id);

        let found = ctx.repos.events.find(&e1.id).await.unwrap();
        assert_eq!(found, Some(e1.clone()));
        assert!(ctx.repos.events.find(&ID::new(9999)).await.unwrap().is_none());
        assert_eq!(ctx.repos.events.find_all().await.unwrap().len(), 2);
    }

    #[actix_web::test]
    async fn deleting_only_changes_status() {
        let ctx = EventHubContext::create_inmemory();
        let e = ctx
            .repos
            .events
            .insert(&generate_event(now(), 60))
            .await
            .unwrap();

        let updated = ctx
            .repos
            .events
            .bulk_set_status(&[e.id], EventStatus::Deleted)
            .await
            .unwrap();
        assert_eq!(updated, vec![e.id]);
        // Still stored, deletion is only a status
        let stored = ctx.repos.events.find(&e.id).await.unwrap().unwrap();
        assert_eq!(stored.status, EventStatus::Deleted);
    }

    #[actix_web::test]
    async fn bulk_set_status_never_moves_backwards() {
        let ctx = EventHubContext::create_inmemory();
        let e = ctx
            .repos
            .events
            .insert(&generate_event(now(), 60))
            .await
            .unwrap();

        let events = &ctx.repos.events;
        assert_eq!(
            events
                .bulk_set_status(&[e.id], EventStatus::Completed)
                .await
                .unwrap(),
            vec![e.id]
        );
        assert!(events
            .bulk_set_status(&[e.id], EventStatus::Deleted)
            .await
            .unwrap()
            .is_empty());
        assert!(events
            .bulk_set_status(&[e.id], EventStatus::Active)
            .await
            .unwrap()
            .is_empty());
        let e = events.find(&e.id).await.unwrap().unwrap();
        assert_eq!(e.status, EventStatus::Completed);
    }

    #[actix_web::test]
    async fn bulk_set_status_returns_only_updated_ids() {
        let ctx = EventHubContext::create_inmemory();
        let events = &ctx.repos.events;
        let active = events.insert(&generate_event(now(), 60)).await.unwrap();
        let deleted = events.insert(&generate_event(now(), 60)).await.unwrap();
        events
            .bulk_set_status(&[deleted.id], EventStatus::Deleted)
            .await
            .unwrap();

        let updated = events
            .bulk_set_status(
                &[active.id, deleted.id, ID::new(9999)],
                EventStatus::Completed,
            )
            .await
            .unwrap();
        assert_eq!(updated, vec![active.id]);
    }

    #[actix_web::test]
    async fn save_updates_fields_of_active_events_only() {
        let ctx = EventHubContext::create_inmemory();
        let events = &ctx.repos.events;
        let e = events.insert(&generate_event(now(), 60)).await.unwrap();

        let mut renamed = e.clone();
        renamed.title = "Renamed".into();
        assert!(events.save(&renamed).await.unwrap());
        assert_eq!(events.find(&e.id).await.unwrap(), Some(renamed.clone()));

        // A copy read before the event completed
        let mut stale = renamed.clone();
        stale.title = "Too late".into();
        events
            .bulk_set_status(&[e.id], EventStatus::Completed)
            .await
            .unwrap();
        assert!(!events.save(&stale).await.unwrap());

        let stored = events.find(&e.id).await.unwrap().unwrap();
        assert_eq!(stored.status, EventStatus::Completed);
        assert_eq!(stored.title, "Renamed");
    }

    #[actix_web::test]
    async fn save_never_changes_status() {
        let ctx = EventHubContext::create_inmemory();
        let events = &ctx.repos.events;
        let e = events.insert(&generate_event(now(), 60)).await.unwrap();

        let mut deleted = e.clone();
        deleted.status = EventStatus::Deleted;
        assert!(events.save(&deleted).await.unwrap());
        assert_eq!(
            events.find(&e.id).await.unwrap().unwrap().status,
            EventStatus::Active
        );
    }

    #[actix_web::test]
    async fn finds_upcoming_events_within_horizon() {
        let ctx = EventHubContext::create_inmemory();
        let events = &ctx.repos.events;
        let past = events
            .insert(&generate_event(now() - Duration::hours(1), 30))
            .await
            .unwrap();
        let soon = events
            .insert(&generate_event(now() + Duration::hours(2), 30))
            .await
            .unwrap();
        let at_horizon = events
            .insert(&generate_event(now() + Duration::hours(48), 30))
            .await
            .unwrap();
        let too_far = events
            .insert(&generate_event(now() + Duration::hours(49), 30))
            .await
            .unwrap();

        let upcoming = events
            .find_upcoming(now(), Duration::hours(48))
            .await
            .unwrap();
        let ids: Vec<_> = upcoming.iter().map(|e| e.id).collect();
        assert!(ids.contains(&soon.id));
        assert!(ids.contains(&at_horizon.id));
        assert!(!ids.contains(&past.id));
        assert!(!ids.contains(&too_far.id));
    }

    #[actix_web::test]
    async fn finds_active_events_that_ended() {
        let ctx = EventHubContext::create_inmemory();
        let events = &ctx.repos.events;
        let ended = events
            .insert(&generate_event(now() - Duration::hours(2), 60))
            .await
            .unwrap();
        let ends_now = events
            .insert(&generate_event(now() - Duration::hours(1), 60))
            .await
            .unwrap();
        let running = events
            .insert(&generate_event(now() - Duration::minutes(30), 60))
            .await
            .unwrap();
        let deleted = events
            .insert(&generate_event(now() - Duration::hours(3), 60))
            .await
            .unwrap();
        events
            .bulk_set_status(&[deleted.id], EventStatus::Deleted)
            .await
            .unwrap();

        let res = events.find_active_ending_before(now()).await.unwrap();
        let ids: Vec<_> = res.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&ended.id));
        assert!(ids.contains(&ends_now.id));
        assert!(!ids.contains(&running.id));
    }

    #[actix_web::test]
    async fn participants_are_unique_per_event() {
        let ctx = EventHubContext::create_inmemory();
        let events = &ctx.repos.events;
        let e = events.insert(&generate_event(now(), 60)).await.unwrap();
        let user = ID::new(5);

        assert!(events.add_participant(&e.id, &user).await.unwrap());
        assert!(!events.add_participant(&e.id, &user).await.unwrap());
        assert!(events.add_participant(&e.id, &ID::new(6)).await.unwrap());
        assert_eq!(events.get_participants(&e.id).await.unwrap().len(), 2);

        assert!(events.remove_participant(&e.id, &user).await.unwrap());
        assert!(!events.remove_participant(&e.id, &user).await.unwrap());
        assert_eq!(
            events.get_participants(&e.id).await.unwrap(),
            vec![ID::new(6)]
        );
    }
}
