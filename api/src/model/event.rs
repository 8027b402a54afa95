use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use kernel::model::{
    event::{event::CreateEvent, Event},
    id::{EventId, UserId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub name: String,
    pub time: DateTime<Utc>,
    pub location: String,
    pub description: String,
    #[serde(default)]
    pub attendees: BTreeSet<UserId>,
}

impl From<CreateEventRequest> for CreateEvent {
    fn from(value: CreateEventRequest) -> Self {
        let CreateEventRequest {
            name,
            time,
            location,
            description,
            attendees,
        } = value;
        CreateEvent {
            name,
            time,
            location,
            description,
            attendees,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventKeyResponse {
    pub id: EventId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: EventId,
    pub name: String,
    pub time: DateTime<Utc>,
    pub location: String,
    pub description: String,
    pub attendees: BTreeSet<UserId>,
}

impl From<Event> for EventResponse {
    fn from(value: Event) -> Self {
        let Event {
            id,
            name,
            time,
            location,
            description,
            attendees,
        } = value;
        Self {
            id,
            name,
            time,
            location,
            description,
            attendees,
        }
    }
}
