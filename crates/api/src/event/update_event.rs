use super::subscribers::{NotifyParticipantsOnEventUpdated, SyncSearchIndexOnEventUpdated};
use crate::error::EventHubError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, NaiveTime};
use eventhub_api_structs::update_event::*;
use eventhub_domain::{Event, EventStatus, ID};
use eventhub_infra::EventHubContext;

pub async fn update_event_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<EventHubContext>,
) -> Result<HttpResponse, EventHubError> {
    let body = body.0;
    let usecase = UpdateEventUseCase {
        user_id: path_params.user_id,
        event_id: path_params.event_id,
        title: body.title,
        description: body.description,
        category: body.category,
        location: body.location,
        is_public: body.is_public,
        date: body.date,
        start_time: body.start_time,
        end_time: body.end_time,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Ok().json(APIResponse::new(event)))
        .map_err(EventHubError::from)
}

/// Changes an active `Event` on behalf of its creator.
///
/// Every participant receives a reschedule notification once the change is stored.
#[derive(Debug, Default)]
pub struct UpdateEventUseCase {
    pub user_id: ID,
    pub event_id: ID,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub is_public: Option<bool>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    NotCreator(ID),
    NotActive(EventStatus),
    DateInPast(NaiveDate),
    InvalidTimespan,
    StorageError,
}

impl From<UseCaseError> for EventHubError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(event_id) => Self::NotFound(format!(
                "The event with id: {}, was not found.",
                event_id
            )),
            UseCaseError::NotCreator(user_id) => Self::Forbidden(format!(
                "The user with id: {}, did not create the event",
                user_id
            )),
            UseCaseError::NotActive(status) => {
                Self::Conflict(format!("The event is {} and can not be changed", status))
            }
            UseCaseError::DateInPast(date) => {
                Self::BadClientData(format!("The event date {} is in the past", date))
            }
            UseCaseError::InvalidTimespan => Self::BadClientData(
                "The event must end after it starts on the same day".into(),
            ),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for UpdateEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "UpdateEvent";

    async fn execute(&mut self, ctx: &EventHubContext) -> Result<Self::Response, Self::Error> {
        let mut e = match ctx.repos.events.find(&self.event_id).await {
            Ok(Some(e)) if e.status != EventStatus::Deleted => e,
            Ok(_) => return Err(UseCaseError::NotFound(self.event_id)),
            Err(_) => return Err(UseCaseError::StorageError),
        };
        if e.creator_id != self.user_id {
            return Err(UseCaseError::NotCreator(self.user_id));
        }
        if !e.is_active() {
            return Err(UseCaseError::NotActive(e.status));
        }

        if let Some(title) = &self.title {
            e.title = title.clone();
        }
        if let Some(description) = &self.description {
            e.description = description.clone();
        }
        if let Some(category) = &self.category {
            e.category = category.clone();
        }
        if let Some(location) = &self.location {
            e.location = location.clone();
        }
        if let Some(is_public) = self.is_public {
            e.is_public = is_public;
        }
        if let Some(date) = self.date {
            let tz = ctx.config.timezone;
            let today = ctx.sys.now().with_timezone(&tz).date_naive();
            if date < today {
                return Err(UseCaseError::DateInPast(date));
            }
            e.date = date;
        }
        if let Some(start_time) = self.start_time {
            e.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            e.end_time = end_time;
        }
        if !e.has_valid_timespan() || !e.has_valid_instants(&ctx.config.timezone) {
            return Err(UseCaseError::InvalidTimespan);
        }

        let saved = ctx
            .repos
            .events
            .save(&e)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        if !saved {
            // Completed or deleted after it was read
            return match ctx.repos.events.find(&e.id).await {
                Ok(Some(current)) if current.status != EventStatus::Deleted => {
                    Err(UseCaseError::NotActive(current.status))
                }
                Ok(_) => Err(UseCaseError::NotFound(self.event_id)),
                Err(_) => Err(UseCaseError::StorageError),
            };
        }

        Ok(e)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![
            Box::new(SyncSearchIndexOnEventUpdated),
            Box::new(NotifyParticipantsOnEventUpdated),
        ]
    }
}
