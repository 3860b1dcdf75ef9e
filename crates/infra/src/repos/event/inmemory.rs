use super::IEventRepo;
use crate::repos::shared::inmemory_repo::*;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use eventhub_domain::{Event, EventStatus, ID};
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Mutex,
};

pub struct InMemoryEventRepo {
    events: Mutex<Vec<Event>>,
    participants: Mutex<Vec<(ID, ID)>>,
    next_id: AtomicI64,
    timezone: Tz,
}

impl InMemoryEventRepo {
    pub fn new(timezone: Tz) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            participants: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            timezone,
        }
    }
}

#[async_trait::async_trait]
impl IEventRepo for InMemoryEventRepo {
    async fn insert(&self, e: &Event) -> anyhow::Result<Event> {
        let mut event = e.clone();
        event.id = ID::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        insert(&event, &self.events)?;
        Ok(event)
    }

    async fn save(&self, e: &Event) -> anyhow::Result<bool> {
        let updated = update_many(
            &self.events,
            |stored| stored.id == e.id && stored.is_active(),
            |stored| {
                let status = stored.status;
                *stored = e.clone();
                stored.status = status;
            },
        )?;
        Ok(!updated.is_empty())
    }

    async fn find(&self, event_id: &ID) -> anyhow::Result<Option<Event>> {
        find(event_id, &self.events)
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Event>> {
        find_by(&self.events, |_| true)
    }

    async fn find_upcoming(
        &self,
        now: DateTime<Utc>,
        horizon: Duration,
    ) -> anyhow::Result<Vec<Event>> {
        let limit = now + horizon;
        find_by(&self.events, |e| match e.start_instant(&self.timezone) {
            Some(start) => start >= now && start <= limit,
            None => false,
        })
    }

    async fn find_active_ending_before(&self, now: DateTime<Utc>) -> anyhow::Result<Vec<Event>> {
        find_by(&self.events, |e| {
            e.is_active() && e.has_ended(now, &self.timezone)
        })
    }

    async fn bulk_set_status(
        &self,
        event_ids: &[ID],
        status: EventStatus,
    ) -> anyhow::Result<Vec<ID>> {
        update_many(
            &self.events,
            |e| event_ids.contains(&e.id) && e.status.can_transition_to(status),
            |e| e.status = status,
        )
    }

    async fn get_participants(&self, event_id: &ID) -> anyhow::Result<Vec<ID>> {
        let participants = lock(&self.participants)?;
        Ok(participants
            .iter()
            .filter(|(e_id, _)| e_id == event_id)
            .map(|(_, user_id)| *user_id)
            .collect())
    }

    async fn add_participant(&self, event_id: &ID, user_id: &ID) -> anyhow::Result<bool> {
        let mut participants = lock(&self.participants)?;
        let link = (*event_id, *user_id);
        if participants.contains(&link) {
            return Ok(false);
        }
        participants.push(link);
        Ok(true)
    }

    async fn remove_participant(&self, event_id: &ID, user_id: &ID) -> anyhow::Result<bool> {
        let mut participants = lock(&self.participants)?;
        let link = (*event_id, *user_id);
        let len_before = participants.len();
        participants.retain(|l| *l != link);
        Ok(participants.len() != len_before)
    }
}
