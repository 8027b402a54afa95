use async_trait::async_trait;
use shared::error::AppResult;

pub mod row;

use crate::database::row::{Row, Value};

/// Capability set any storage backend must satisfy.
///
/// All data operations assume `connect` has completed; callers check
/// `is_connected` first. The backend never retries on its own, and a
/// failed driver call propagates to the caller unchanged.
#[async_trait]
pub trait Database: Send + Sync {
    /// Establishes the underlying connection or pool.
    async fn connect(&self) -> AppResult<()>;

    /// Cheap, non-blocking connection-state query.
    fn is_connected(&self) -> bool;

    /// Releases the underlying resources.
    async fn disconnect(&self) -> AppResult<()>;

    /// Idempotent DDL. `schema` holds the scalar column definitions only;
    /// the backend prepends its own auto-increment integer primary key
    /// named `id`.
    async fn create_table_if_not_exists(&self, table_name: &str, schema: &str) -> AppResult<()>;

    /// Inserts one row and returns the store-assigned primary key.
    async fn insert_data(&self, table_name: &str, data: Row) -> AppResult<i64>;

    /// Upserts one full row identified by the `id` column already present
    /// in `data`. No partial-column update semantics.
    async fn replace_data(&self, table_name: &str, data: Row) -> AppResult<()>;

    /// Deletes all rows matching an equality predicate on one column.
    /// A delete that matches nothing still succeeds.
    async fn delete_data_by_key_and_value(
        &self,
        table_name: &str,
        key: &str,
        value: Value,
    ) -> AppResult<()>;

    /// Full scan, order unspecified beyond the store default.
    async fn select_all_data(&self, table_name: &str) -> AppResult<Vec<Row>>;

    /// Equality-filtered scan.
    async fn select_all_data_by_key_and_value(
        &self,
        table_name: &str,
        key: &str,
        value: Value,
    ) -> AppResult<Vec<Row>>;
}
