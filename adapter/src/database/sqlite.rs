use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteRow};
use sqlx::{Column, Connection, Row as _, SqliteConnection, TypeInfo, ValueRef};
use tokio::sync::Mutex;

use kernel::database::row::{Row, Value};
use kernel::database::Database;
use shared::error::{AppError, AppResult};

/// Embedded backend: a single connection to a local file or an in-memory
/// instance (`:memory:`). The connection mutex serializes concurrent
/// writers at the backend level.
pub struct SqliteDatabase {
    path: String,
    conn: Mutex<Option<SqliteConnection>>,
    connected: AtomicBool,
}

impl SqliteDatabase {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            conn: Mutex::new(None),
            connected: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Database for SqliteDatabase {
    async fn connect(&self) -> AppResult<()> {
        let options = SqliteConnectOptions::from_str(&self.path)
            .map_err(AppError::SpecificOperationError)?
            .create_if_missing(true);
        let conn = SqliteConnection::connect_with(&options).await?;
        *self.conn.lock().await = Some(conn);
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn disconnect(&self) -> AppResult<()> {
        if let Some(conn) = self.conn.lock().await.take() {
            conn.close().await?;
        }
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn create_table_if_not_exists(&self, table_name: &str, schema: &str) -> AppResult<()> {
        let query = format!(
            "CREATE TABLE IF NOT EXISTS {table_name} \
             (id INTEGER NOT NULL PRIMARY KEY AUTOINCREMENT, {schema});"
        );

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(AppError::DatabaseNotConnected)?;
        sqlx::query(&query).execute(&mut *conn).await?;
        Ok(())
    }

    async fn insert_data(&self, table_name: &str, data: Row) -> AppResult<i64> {
        let columns = data.columns().collect::<Vec<_>>().join(", ");
        let placeholders = vec!["?"; data.len()].join(", ");
        let query = format!("INSERT INTO {table_name} ({columns}) VALUES ({placeholders});");

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(AppError::DatabaseNotConnected)?;

        let mut insert = sqlx::query(&query);
        for value in data.values() {
            insert = bind_value(insert, value);
        }
        // The generated rowid is read off the same connection, within the
        // same logical unit of work as the insert.
        let result = insert.execute(&mut *conn).await?;
        Ok(result.last_insert_rowid())
    }

    async fn replace_data(&self, table_name: &str, data: Row) -> AppResult<()> {
        let columns = data.columns().collect::<Vec<_>>().join(", ");
        let placeholders = vec!["?"; data.len()].join(", ");
        let query =
            format!("INSERT OR REPLACE INTO {table_name} ({columns}) VALUES ({placeholders});");

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(AppError::DatabaseNotConnected)?;

        let mut replace = sqlx::query(&query);
        for value in data.values() {
            replace = bind_value(replace, value);
        }
        replace.execute(&mut *conn).await?;
        Ok(())
    }

    async fn delete_data_by_key_and_value(
        &self,
        table_name: &str,
        key: &str,
        value: Value,
    ) -> AppResult<()> {
        let query = format!("DELETE FROM {table_name} WHERE {key} = ?;");

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(AppError::DatabaseNotConnected)?;
        bind_value(sqlx::query(&query), &value)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    async fn select_all_data(&self, table_name: &str) -> AppResult<Vec<Row>> {
        let query = format!("SELECT * FROM {table_name};");

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(AppError::DatabaseNotConnected)?;
        let rows = sqlx::query(&query).fetch_all(&mut *conn).await?;
        rows.iter().map(row_from_sqlite).collect()
    }

    async fn select_all_data_by_key_and_value(
        &self,
        table_name: &str,
        key: &str,
        value: Value,
    ) -> AppResult<Vec<Row>> {
        let query = format!("SELECT * FROM {table_name} WHERE {key} = ?;");

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or(AppError::DatabaseNotConnected)?;
        let rows = bind_value(sqlx::query(&query), &value)
            .fetch_all(&mut *conn)
            .await?;
        rows.iter().map(row_from_sqlite).collect()
    }
}

fn bind_value<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    value: &Value,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    match value {
        Value::Integer(v) => query.bind(*v),
        Value::Text(v) => query.bind(v.clone()),
        Value::Null => query.bind(Option::<String>::None),
    }
}

fn row_from_sqlite(row: &SqliteRow) -> AppResult<Row> {
    let mut out = Row::new();
    for (i, column) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(i)?;
        let value = if raw.is_null() {
            Value::Null
        } else if raw.type_info().name() == "INTEGER" {
            Value::Integer(row.try_get(i)?)
        } else {
            Value::Text(row.try_get(i)?)
        };
        out.push(column.name(), value);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = "name TEXT NOT NULL, note TEXT";

    async fn connected() -> anyhow::Result<SqliteDatabase> {
        let db = SqliteDatabase::new(":memory:");
        db.connect().await?;
        db.create_table_if_not_exists("Things", SCHEMA).await?;
        Ok(db)
    }

    #[tokio::test]
    async fn test_connect_and_disconnect() -> anyhow::Result<()> {
        let db = SqliteDatabase::new(":memory:");
        assert!(!db.is_connected());

        db.connect().await?;
        assert!(db.is_connected());

        db.disconnect().await?;
        assert!(!db.is_connected());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_table_is_idempotent() -> anyhow::Result<()> {
        let db = connected().await?;
        db.create_table_if_not_exists("Things", SCHEMA).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_keys() -> anyhow::Result<()> {
        let db = connected().await?;

        for expected in 1..=4 {
            let row = Row::new().with("name", format!("thing-{expected}"));
            let id = db.insert_data("Things", row).await?;
            assert_eq!(id, expected);
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_replace_overwrites_the_full_row() -> anyhow::Result<()> {
        let db = connected().await?;
        let id = db
            .insert_data("Things", Row::new().with("name", "before").with("note", "x"))
            .await?;

        let replacement = Row::new()
            .with("id", id)
            .with("name", "after")
            .with("note", "y");
        db.replace_data("Things", replacement).await?;

        let rows = db
            .select_all_data_by_key_and_value("Things", "id", Value::Integer(id))
            .await?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text("name")?, "after");
        assert_eq!(rows[0].text("note")?, "y");
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_by_key_and_value() -> anyhow::Result<()> {
        let db = connected().await?;
        let id = db
            .insert_data("Things", Row::new().with("name", "gone"))
            .await?;

        db.delete_data_by_key_and_value("Things", "id", Value::Integer(id))
            .await?;
        assert!(db.select_all_data("Things").await?.is_empty());

        // Deleting an already-absent row is a silent no-op.
        db.delete_data_by_key_and_value("Things", "id", Value::Integer(id))
            .await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_select_filters_by_value() -> anyhow::Result<()> {
        let db = connected().await?;
        db.insert_data("Things", Row::new().with("name", "a")).await?;
        db.insert_data("Things", Row::new().with("name", "b")).await?;
        db.insert_data("Things", Row::new().with("name", "a")).await?;

        let rows = db
            .select_all_data_by_key_and_value("Things", "name", Value::Text("a".into()))
            .await?;
        assert_eq!(rows.len(), 2);

        let all = db.select_all_data("Things").await?;
        assert_eq!(all.len(), 3);
        Ok(())
    }

    #[tokio::test]
    async fn test_null_columns_round_trip() -> anyhow::Result<()> {
        let db = connected().await?;
        let id = db
            .insert_data("Things", Row::new().with("name", "solo"))
            .await?;

        let rows = db
            .select_all_data_by_key_and_value("Things", "id", Value::Integer(id))
            .await?;
        assert_eq!(rows[0].get("note"), Some(&Value::Null));
        Ok(())
    }

    #[tokio::test]
    async fn test_data_operation_before_connect_fails() {
        let db = SqliteDatabase::new(":memory:");
        let res = db.select_all_data("Things").await;
        assert!(matches!(res, Err(AppError::DatabaseNotConnected)));
    }
}
