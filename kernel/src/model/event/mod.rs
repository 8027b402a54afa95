use crate::model::id::{EventId, UserId};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

pub mod event;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub time: DateTime<Utc>,
    pub location: String,
    pub description: String,
    /// User ids attending this event. Empty when nobody registered yet;
    /// referential integrity against the users table is not enforced.
    pub attendees: BTreeSet<UserId>,
}
