use std::sync::Arc;

use derive_new::new;
use kernel::database::row::{Row, Value};
use kernel::database::Database;
use kernel::model::id::UserId;
use kernel::model::user::{event::CreateUser, User};
use shared::error::AppResult;

use crate::database::model::user::user_from_row;

const TABLE_NAME: &str = "Users";
const SCHEMA: &str = "first_name TEXT NOT NULL, last_name TEXT NOT NULL, email TEXT NOT NULL";

/// Mediates between the typed `User` domain object and generic row
/// storage. Storage-agnostic: works against any `Database` backend.
#[derive(new, Clone)]
pub struct UserRepository {
    db: Arc<dyn Database>,
}

impl UserRepository {
    pub async fn create_repository(&self) -> AppResult<()> {
        self.db.create_table_if_not_exists(TABLE_NAME, SCHEMA).await
    }

    pub async fn create_user(&self, event: CreateUser) -> AppResult<UserId> {
        let row = Row::new()
            .with("first_name", event.first_name)
            .with("last_name", event.last_name)
            .with("email", event.email);

        let id = self.db.insert_data(TABLE_NAME, row).await?;
        Ok(UserId::new(id))
    }

    pub async fn get_user(&self, id: UserId) -> AppResult<Option<User>> {
        let rows = self
            .db
            .select_all_data_by_key_and_value(TABLE_NAME, "id", Value::Integer(id.raw()))
            .await?;

        // Primary-key uniqueness is assumed, never enforced here.
        match rows.first() {
            Some(row) => Ok(Some(user_from_row(row)?)),
            None => Ok(None),
        }
    }

    pub async fn delete_user(&self, id: UserId) -> AppResult<()> {
        self.db
            .delete_data_by_key_and_value(TABLE_NAME, "id", Value::Integer(id.raw()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::sqlite::SqliteDatabase;

    async fn repository() -> anyhow::Result<UserRepository> {
        let db: Arc<dyn Database> = Arc::new(SqliteDatabase::new(":memory:"));
        db.connect().await?;
        let repo = UserRepository::new(db);
        repo.create_repository().await?;
        Ok(repo)
    }

    #[tokio::test]
    async fn test_user_lifecycle() -> anyhow::Result<()> {
        let repo = repository().await?;

        let id = repo
            .create_user(CreateUser {
                first_name: "Son".into(),
                last_name: "Goku".into(),
                email: "SonGoku@email.com".into(),
            })
            .await?;
        assert_eq!(id, UserId::new(1));

        let user = repo.get_user(id).await?.unwrap();
        assert_eq!(
            user,
            User {
                id,
                first_name: "Son".into(),
                last_name: "Goku".into(),
                email: "SonGoku@email.com".into(),
            }
        );

        repo.delete_user(id).await?;
        assert!(repo.get_user(id).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_ids_are_contiguous_from_one() -> anyhow::Result<()> {
        let repo = repository().await?;

        for expected in 1..=4 {
            let id = repo
                .create_user(CreateUser {
                    first_name: format!("first-{expected}"),
                    last_name: format!("last-{expected}"),
                    email: format!("user{expected}@email.com"),
                })
                .await?;
            assert_eq!(id, UserId::new(expected));
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_user_returns_none() -> anyhow::Result<()> {
        let repo = repository().await?;
        assert!(repo.get_user(UserId::new(42)).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_user_succeeds() -> anyhow::Result<()> {
        let repo = repository().await?;
        repo.delete_user(UserId::new(42)).await?;
        Ok(())
    }
}
