use chrono::{NaiveDate, NaiveTime};
use eventhub_domain::{Event, EventStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EventDTO {
    pub id: ID,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub is_public: bool,
    pub status: EventStatus,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub organization_id: ID,
    pub creator_id: ID,
}

impl EventDTO {
    pub fn new(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            category: event.category,
            location: event.location,
            is_public: event.is_public,
            status: event.status,
            date: event.date,
            start_time: event.start_time,
            end_time: event.end_time,
            organization_id: event.organization_id,
            creator_id: event.creator_id,
        }
    }
}
