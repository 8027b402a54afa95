use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgRow};
use sqlx::{Column, PgPool, Row as _, TypeInfo, ValueRef};
use tokio::sync::RwLock;

use kernel::database::row::{Row, Value};
use kernel::database::Database;
use shared::config::PostgresConfig;
use shared::error::{AppError, AppResult};

/// Client-server backend: a pooled connection to PostgreSQL. Every data
/// operation acquires a pooled connection and releases it afterwards;
/// concurrency is bounded by the pool size.
pub struct PostgresDatabase {
    options: PgConnectOptions,
    pool: RwLock<Option<PgPool>>,
    connected: AtomicBool,
}

impl PostgresDatabase {
    pub fn new(cfg: &PostgresConfig) -> Self {
        let options = PgConnectOptions::new()
            .host(&cfg.host)
            .port(cfg.port)
            .username(&cfg.user_name)
            .password(&cfg.password)
            .database(&cfg.db_name);
        Self {
            options,
            pool: RwLock::new(None),
            connected: AtomicBool::new(false),
        }
    }

    async fn pool(&self) -> AppResult<PgPool> {
        self.pool
            .read()
            .await
            .clone()
            .ok_or(AppError::DatabaseNotConnected)
    }
}

#[async_trait]
impl Database for PostgresDatabase {
    async fn connect(&self) -> AppResult<()> {
        let pool = PgPool::connect_with(self.options.clone()).await?;
        *self.pool.write().await = Some(pool);
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn disconnect(&self) -> AppResult<()> {
        if let Some(pool) = self.pool.write().await.take() {
            pool.close().await;
        }
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn create_table_if_not_exists(&self, table_name: &str, schema: &str) -> AppResult<()> {
        let query = format!(
            "CREATE TABLE IF NOT EXISTS {table_name} (id BIGSERIAL PRIMARY KEY, {schema});"
        );
        sqlx::query(&query).execute(&self.pool().await?).await?;
        Ok(())
    }

    async fn insert_data(&self, table_name: &str, data: Row) -> AppResult<i64> {
        let columns = data.columns().collect::<Vec<_>>().join(", ");
        let placeholders = placeholders(data.len());
        // The generated key comes straight back from the insert statement.
        let query =
            format!("INSERT INTO {table_name} ({columns}) VALUES ({placeholders}) RETURNING id;");

        let mut insert = sqlx::query_scalar::<_, i64>(&query);
        for value in data.values() {
            insert = bind_scalar(insert, value);
        }
        Ok(insert.fetch_one(&self.pool().await?).await?)
    }

    async fn replace_data(&self, table_name: &str, data: Row) -> AppResult<()> {
        let columns = data.columns().collect::<Vec<_>>().join(", ");
        let placeholders = placeholders(data.len());
        let assignments = data
            .columns()
            .filter(|column| *column != "id")
            .map(|column| format!("{column} = EXCLUDED.{column}"))
            .collect::<Vec<_>>()
            .join(", ");
        let query = format!(
            "INSERT INTO {table_name} ({columns}) VALUES ({placeholders}) \
             ON CONFLICT (id) DO UPDATE SET {assignments};"
        );

        let mut replace = sqlx::query(&query);
        for value in data.values() {
            replace = bind_value(replace, value);
        }
        replace.execute(&self.pool().await?).await?;
        Ok(())
    }

    async fn delete_data_by_key_and_value(
        &self,
        table_name: &str,
        key: &str,
        value: Value,
    ) -> AppResult<()> {
        let query = format!("DELETE FROM {table_name} WHERE {key} = $1;");
        bind_value(sqlx::query(&query), &value)
            .execute(&self.pool().await?)
            .await?;
        Ok(())
    }

    async fn select_all_data(&self, table_name: &str) -> AppResult<Vec<Row>> {
        let query = format!("SELECT * FROM {table_name};");
        let rows = sqlx::query(&query).fetch_all(&self.pool().await?).await?;
        rows.iter().map(row_from_postgres).collect()
    }

    async fn select_all_data_by_key_and_value(
        &self,
        table_name: &str,
        key: &str,
        value: Value,
    ) -> AppResult<Vec<Row>> {
        let query = format!("SELECT * FROM {table_name} WHERE {key} = $1;");
        let rows = bind_value(sqlx::query(&query), &value)
            .fetch_all(&self.pool().await?)
            .await?;
        rows.iter().map(row_from_postgres).collect()
    }
}

fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn bind_value<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    value: &Value,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    match value {
        Value::Integer(v) => query.bind(*v),
        Value::Text(v) => query.bind(v.clone()),
        Value::Null => query.bind(Option::<String>::None),
    }
}

fn bind_scalar<'q>(
    query: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    value: &Value,
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    match value {
        Value::Integer(v) => query.bind(*v),
        Value::Text(v) => query.bind(v.clone()),
        Value::Null => query.bind(Option::<String>::None),
    }
}

fn row_from_postgres(row: &PgRow) -> AppResult<Row> {
    let mut out = Row::new();
    for (i, column) in row.columns().iter().enumerate() {
        let raw = row.try_get_raw(i)?;
        let value = if raw.is_null() {
            Value::Null
        } else {
            match raw.type_info().name() {
                "INT8" => Value::Integer(row.try_get::<i64, _>(i)?),
                "INT4" => Value::Integer(i64::from(row.try_get::<i32, _>(i)?)),
                "INT2" => Value::Integer(i64::from(row.try_get::<i16, _>(i)?)),
                _ => Value::Text(row.try_get(i)?),
            }
        };
        out.push(column.name(), value);
    }
    Ok(out)
}
