use crate::{APIResponse, BaseClient, ID};
use eventhub_api_structs::*;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct EventClient {
    base: Arc<BaseClient>,
}

pub type CreateEventInput = create_event::RequestBody;

pub struct GetEventInput {
    pub event_id: ID,
}

pub struct UpdateEventInput {
    pub user_id: ID,
    pub event_id: ID,
    pub body: update_event::RequestBody,
}

/// Identifies an event on behalf of a user, used by delete, join and quit
pub struct UserEventInput {
    pub user_id: ID,
    pub event_id: ID,
}

impl EventClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(&self, input: CreateEventInput) -> APIResponse<create_event::APIResponse> {
        self.base
            .post(input, "events".into(), StatusCode::CREATED)
            .await
    }

    pub async fn get(&self, input: GetEventInput) -> APIResponse<get_event::APIResponse> {
        self.base
            .get(format!("events/{}", input.event_id), StatusCode::OK)
            .await
    }

    pub async fn update(&self, input: UpdateEventInput) -> APIResponse<update_event::APIResponse> {
        self.base
            .put(
                input.body,
                format!("users/{}/events/{}", input.user_id, input.event_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn delete(&self, input: UserEventInput) -> APIResponse<delete_event::APIResponse> {
        self.base
            .delete(
                format!("users/{}/events/{}", input.user_id, input.event_id),
                StatusCode::OK,
            )
            .await
    }

    pub async fn join(&self, input: UserEventInput) -> APIResponse<join_event::APIResponse> {
        self.base
            .post(
                (),
                format!(
                    "users/{}/events/{}/participants",
                    input.user_id, input.event_id
                ),
                StatusCode::CREATED,
            )
            .await
    }

    pub async fn quit(&self, input: UserEventInput) -> APIResponse<quit_event::APIResponse> {
        self.base
            .delete(
                format!(
                    "users/{}/events/{}/participants",
                    input.user_id, input.event_id
                ),
                StatusCode::OK,
            )
            .await
    }

    pub async fn reindex(&self) -> APIResponse<reindex_events::APIResponse> {
        self.base
            .post((), "reindex".into(), StatusCode::ACCEPTED)
            .await
    }
}
