use crate::shared::entity::{Entity, ID};
use chrono::{prelude::*, Duration};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Lifecycle of an `Event`.
///
/// `Active` is the only non-terminal status. An event is never moved
/// backwards: `Completed` and `Deleted` are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Active,
    Completed,
    Deleted,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Deleted => "deleted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Active => false,
            Self::Completed | Self::Deleted => true,
        }
    }

    pub fn can_transition_to(&self, next: EventStatus) -> bool {
        match (self, next) {
            (Self::Active, Self::Completed) | (Self::Active, Self::Deleted) => true,
            (Self::Active, Self::Active)
            | (Self::Completed, _)
            | (Self::Deleted, _) => false,
        }
    }
}

impl Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Unknown event status: `{0}`")]
pub struct InvalidEventStatusError(pub String);

impl FromStr for EventStatus {
    type Err = InvalidEventStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "deleted" => Ok(Self::Deleted),
            _ => Err(InvalidEventStatusError(s.to_string())),
        }
    }
}

/// An event hosted by an organization.
///
/// `date`, `start_time` and `end_time` are wall clock values in the
/// service reference timezone. Use `start_instant` / `end_instant` to
/// get absolute points in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
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

impl Entity for Event {
    fn id(&self) -> &ID {
        &self.id
    }
}

fn to_instant(date: NaiveDate, time: NaiveTime, tz: &Tz) -> Option<DateTime<Utc>> {
    // A wall clock time skipped by a DST jump has no instant, an ambiguous one
    // resolves to the earliest.
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

impl Event {
    pub fn start_instant(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        to_instant(self.date, self.start_time, tz)
    }

    pub fn end_instant(&self, tz: &Tz) -> Option<DateTime<Utc>> {
        to_instant(self.date, self.end_time, tz)
    }

    pub fn time_until_start(&self, now: DateTime<Utc>, tz: &Tz) -> Option<Duration> {
        self.start_instant(tz).map(|start| start - now)
    }

    /// Whether both the start and the end exist as instants in `tz`
    pub fn has_valid_instants(&self, tz: &Tz) -> bool {
        self.start_instant(tz).is_some() && self.end_instant(tz).is_some()
    }

    pub fn has_ended(&self, now: DateTime<Utc>, tz: &Tz) -> bool {
        match self.end_instant(tz) {
            Some(end) => end <= now,
            // The end was skipped by a DST jump, it has passed once the wall clock is beyond it
            None => now.with_timezone(tz).naive_local() >= self.date.and_time(self.end_time),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == EventStatus::Active
    }

    /// Whether the time fields describe a valid slot: the end must be after
    /// the start on the same day.
    pub fn has_valid_timespan(&self) -> bool {
        self.end_time > self.start_time
    }
}
