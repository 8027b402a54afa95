use std::sync::Arc;

use derive_new::new;
use kernel::database::row::{Row, Value};
use kernel::database::Database;
use kernel::model::event::{
    event::{AddAttendees, CreateEvent},
    Event,
};
use kernel::model::id::EventId;
use shared::error::AppResult;

use crate::database::model::event::{encode_attendees, encode_time, event_from_row};

const TABLE_NAME: &str = "Events";
const SCHEMA: &str = "name TEXT NOT NULL, time TEXT NOT NULL, location TEXT NOT NULL, \
                      description TEXT NOT NULL, attendees TEXT";

#[derive(new, Clone)]
pub struct EventRepository {
    db: Arc<dyn Database>,
}

impl EventRepository {
    pub async fn create_repository(&self) -> AppResult<()> {
        self.db.create_table_if_not_exists(TABLE_NAME, SCHEMA).await
    }

    pub async fn create_event(&self, event: CreateEvent) -> AppResult<EventId> {
        let row = Row::new()
            .with("name", event.name)
            .with("time", encode_time(&event.time))
            .with("location", event.location)
            .with("description", event.description)
            .with("attendees", encode_attendees(&event.attendees));

        let id = self.db.insert_data(TABLE_NAME, row).await?;
        Ok(EventId::new(id))
    }

    pub async fn get_event(&self, id: EventId) -> AppResult<Option<Event>> {
        let rows = self
            .db
            .select_all_data_by_key_and_value(TABLE_NAME, "id", Value::Integer(id.raw()))
            .await?;

        match rows.first() {
            Some(row) => Ok(Some(event_from_row(row)?)),
            None => Ok(None),
        }
    }

    /// Rewrites the event row with the supplied attendee set. The new set
    /// replaces the stored one wholesale; it is not merged. Returns
    /// `false` when no such event exists.
    ///
    /// Read and rewrite are two separate calls, so two concurrent updates
    /// for the same event can lose one of the sets.
    pub async fn add_attendees_to_event(&self, event: AddAttendees) -> AppResult<bool> {
        let Some(current) = self.get_event(event.event_id).await? else {
            return Ok(false);
        };

        let row = Row::new()
            .with("id", current.id.raw())
            .with("name", current.name)
            .with("time", encode_time(&current.time))
            .with("location", current.location)
            .with("description", current.description)
            .with("attendees", encode_attendees(&event.attendees));

        self.db.replace_data(TABLE_NAME, row).await?;
        Ok(true)
    }

    pub async fn delete_event(&self, id: EventId) -> AppResult<()> {
        self.db
            .delete_data_by_key_and_value(TABLE_NAME, "id", Value::Integer(id.raw()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::{TimeZone, Utc};
    use kernel::model::id::UserId;

    use super::*;
    use crate::database::sqlite::SqliteDatabase;

    async fn repository() -> anyhow::Result<EventRepository> {
        let db: Arc<dyn Database> = Arc::new(SqliteDatabase::new(":memory:"));
        db.connect().await?;
        let repo = EventRepository::new(db);
        repo.create_repository().await?;
        Ok(repo)
    }

    fn partytime() -> CreateEvent {
        CreateEvent {
            name: "Partytime".into(),
            time: Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap(),
            location: "Reeperbahn".into(),
            description: "Dance and drink".into(),
            attendees: BTreeSet::new(),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() -> anyhow::Result<()> {
        let repo = repository().await?;

        let id = repo.create_event(partytime()).await?;
        assert_eq!(id, EventId::new(1));

        let event = repo.get_event(id).await?.unwrap();
        assert_eq!(event.id, id);
        assert_eq!(event.name, "Partytime");
        assert_eq!(event.time, Utc.with_ymd_and_hms(2024, 5, 1, 20, 0, 0).unwrap());
        assert_eq!(event.location, "Reeperbahn");
        assert_eq!(event.description, "Dance and drink");
        // No attendees yet reads back as the empty set, not as an error.
        assert!(event.attendees.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_ids_are_contiguous_from_one() -> anyhow::Result<()> {
        let repo = repository().await?;
        for expected in 1..=4 {
            let id = repo.create_event(partytime()).await?;
            assert_eq!(id, EventId::new(expected));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_add_attendees_replaces_the_set() -> anyhow::Result<()> {
        let repo = repository().await?;
        let id = repo.create_event(partytime()).await?;

        let first: BTreeSet<UserId> = [123, 42, 9000, 0].map(UserId::new).into();
        assert!(
            repo.add_attendees_to_event(AddAttendees {
                event_id: id,
                attendees: first.clone(),
            })
            .await?
        );

        let event = repo.get_event(id).await?.unwrap();
        assert_eq!(event.attendees, first);

        // A second call does not merge; the previous set is gone.
        let second: BTreeSet<UserId> = [7].map(UserId::new).into();
        assert!(
            repo.add_attendees_to_event(AddAttendees {
                event_id: id,
                attendees: second.clone(),
            })
            .await?
        );

        let event = repo.get_event(id).await?.unwrap();
        assert_eq!(event.attendees, second);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_attendees_to_missing_event_fails() -> anyhow::Result<()> {
        let repo = repository().await?;

        let succeeded = repo
            .add_attendees_to_event(AddAttendees {
                event_id: EventId::new(99),
                attendees: [1].map(UserId::new).into(),
            })
            .await?;
        assert!(!succeeded);

        // The failed update must not have created a row.
        assert!(repo.get_event(EventId::new(99)).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_then_get_returns_none() -> anyhow::Result<()> {
        let repo = repository().await?;
        let id = repo.create_event(partytime()).await?;

        repo.delete_event(id).await?;
        assert!(repo.get_event(id).await?.is_none());

        // Deleting again is a silent no-op.
        repo.delete_event(id).await?;
        Ok(())
    }
}
