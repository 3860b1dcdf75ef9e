use super::subscribers::SyncSearchIndexOnEventCreated;
use crate::error::EventHubError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, NaiveTime};
use eventhub_api_structs::create_event::*;
use eventhub_domain::{Event, EventStatus, ID};
use eventhub_infra::EventHubContext;

pub async fn create_event_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<EventHubContext>,
) -> Result<HttpResponse, EventHubError> {
    let body = body.0;
    let usecase = CreateEventUseCase {
        title: body.title,
        description: body.description,
        category: body.category,
        location: body.location,
        is_public: body.is_public,
        date: body.date,
        start_time: body.start_time,
        end_time: body.end_time,
        organization_id: body.organization_id,
        creator_id: body.creator_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|event| HttpResponse::Created().json(APIResponse::new(event)))
        .map_err(EventHubError::from)
}

#[derive(Debug)]
pub struct CreateEventUseCase {
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub is_public: bool,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub organization_id: ID,
    pub creator_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    DateInPast(NaiveDate),
    InvalidTimespan,
    StorageError,
}

impl From<UseCaseError> for EventHubError {
    fn from(e: UseCaseError) -> Self {
        match e {
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
impl UseCase for CreateEventUseCase {
    type Response = Event;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateEvent";

    async fn execute(&mut self, ctx: &EventHubContext) -> Result<Self::Response, Self::Error> {
        let tz = ctx.config.timezone;
        let today = ctx.sys.now().with_timezone(&tz).date_naive();
        if self.date < today {
            return Err(UseCaseError::DateInPast(self.date));
        }

        let e = Event {
            id: Default::default(),
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            location: self.location.clone(),
            is_public: self.is_public,
            status: EventStatus::Active,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            organization_id: self.organization_id,
            creator_id: self.creator_id,
        };
        if !e.has_valid_timespan() || !e.has_valid_instants(&tz) {
            return Err(UseCaseError::InvalidTimespan);
        }

        ctx.repos
            .events
            .insert(&e)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(SyncSearchIndexOnEventCreated)]
    }
}
