use crate::dtos::EventDTO;
use chrono::{NaiveDate, NaiveTime};
use eventhub_domain::{Event, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub event: EventDTO,
}

impl EventResponse {
    pub fn new(event: Event) -> Self {
        Self {
            event: EventDTO::new(event),
        }
    }
}

pub mod create_event {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: String,
        #[serde(default)]
        pub description: String,
        #[serde(default)]
        pub category: String,
        #[serde(default)]
        pub location: String,
        #[serde(default)]
        pub is_public: bool,
        pub date: NaiveDate,
        pub start_time: NaiveTime,
        pub end_time: NaiveTime,
        pub organization_id: ID,
        pub creator_id: ID,
    }

    pub type APIResponse = EventResponse;
}

pub mod get_event {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub event_id: ID,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub event: EventDTO,
        pub participants: Vec<ID>,
    }

    impl APIResponse {
        pub fn new(event: Event, participants: Vec<ID>) -> Self {
            Self {
                event: EventDTO::new(event),
                participants,
            }
        }
    }
}

pub mod update_event {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
        pub event_id: ID,
    }

    #[derive(Serialize, Deserialize, Default)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: Option<String>,
        pub description: Option<String>,
        pub category: Option<String>,
        pub location: Option<String>,
        pub is_public: Option<bool>,
        pub date: Option<NaiveDate>,
        pub start_time: Option<NaiveTime>,
        pub end_time: Option<NaiveTime>,
    }

    pub type APIResponse = EventResponse;
}

pub mod delete_event {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
        pub event_id: ID,
    }

    pub type APIResponse = EventResponse;
}

pub mod join_event {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
        pub event_id: ID,
    }

    pub type APIResponse = EventResponse;
}

pub mod quit_event {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: ID,
        pub event_id: ID,
    }

    pub type APIResponse = EventResponse;
}

pub mod reindex_events {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// Number of events queued for the search index
        pub queued: usize,
    }
}
