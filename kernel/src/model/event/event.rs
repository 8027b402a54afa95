use crate::model::id::{EventId, UserId};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct CreateEvent {
    pub name: String,
    pub time: DateTime<Utc>,
    pub location: String,
    pub description: String,
    pub attendees: BTreeSet<UserId>,
}

/// Replaces the stored attendee set of one event wholesale.
#[derive(Debug, Clone)]
pub struct AddAttendees {
    pub event_id: EventId,
    pub attendees: BTreeSet<UserId>,
}
