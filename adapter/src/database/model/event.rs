use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use kernel::database::row::{Row, Value};
use kernel::model::{
    event::Event,
    id::{EventId, UserId},
};
use shared::error::{AppError, AppResult};

pub fn event_from_row(row: &Row) -> AppResult<Event> {
    // A missing or NULL attendees column reads as the empty set, never as
    // an error; the repositories always write at least the empty string.
    let attendees = match row.get("attendees") {
        Some(Value::Text(encoded)) => decode_attendees(encoded)?,
        _ => BTreeSet::new(),
    };

    Ok(Event {
        id: EventId::new(row.integer("id")?),
        name: row.text("name")?.into(),
        time: decode_time(row.text("time")?)?,
        location: row.text("location")?.into(),
        description: row.text("description")?.into(),
        attendees,
    })
}

pub fn encode_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339()
}

fn decode_time(encoded: &str) -> AppResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(encoded)
        .map(|time| time.with_timezone(&Utc))
        .map_err(|e| AppError::ConversionEntityError(format!("invalid event time {encoded}: {e}")))
}

/// Serializes the attendee set as a comma-joined list of user ids. The
/// set's ordering makes the encoding deterministic.
pub fn encode_attendees(attendees: &BTreeSet<UserId>) -> String {
    attendees
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

pub fn decode_attendees(encoded: &str) -> AppResult<BTreeSet<UserId>> {
    if encoded.is_empty() {
        return Ok(BTreeSet::new());
    }
    encoded
        .split(',')
        .map(|part| {
            part.trim().parse::<i64>().map(UserId::new).map_err(|_| {
                AppError::ConversionEntityError(format!("invalid attendee id: {part}"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attendees_round_trip_sorted_and_deduplicated() -> anyhow::Result<()> {
        let attendees: BTreeSet<UserId> = [123, 42, 9000, 0, 42].map(UserId::new).into();

        let encoded = encode_attendees(&attendees);
        assert_eq!(encoded, "0,42,123,9000");
        assert_eq!(decode_attendees(&encoded)?, attendees);
        Ok(())
    }

    #[test]
    fn test_empty_attendees_encode_to_empty_string() -> anyhow::Result<()> {
        let empty = BTreeSet::new();
        assert_eq!(encode_attendees(&empty), "");
        assert_eq!(decode_attendees("")?, empty);
        Ok(())
    }

    #[test]
    fn test_garbage_attendees_are_rejected() {
        assert!(decode_attendees("1,foo,3").is_err());
    }
}
