//! InteractionStore trait definition.
//!
//! The store is an external key-value table keyed by
//! (`session_id`, `timestamp`). Writes target unique generated keys, so
//! concurrent sessions need no coordination. The concrete implementation
//! lives in `haven-infra` (`DynamoStore`).

use haven_types::error::StoreError;
use haven_types::record::{InteractionRecord, TableStatus};
use uuid::Uuid;

/// Trait for the persisted interaction log.
pub trait InteractionStore: Send + Sync {
    /// Write one record. Write-once; records are never updated or deleted.
    fn put(
        &self,
        record: &InteractionRecord,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Most recent records for one session, descending by timestamp.
    fn recent_for_session(
        &self,
        session_id: &Uuid,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<InteractionRecord>, StoreError>> + Send;

    /// Unordered scan. `Some(limit)` reads a single bounded page;
    /// `None` walks the entire table.
    fn scan(
        &self,
        limit: Option<u32>,
    ) -> impl std::future::Future<Output = Result<Vec<InteractionRecord>, StoreError>> + Send;

    /// Declare the log table (two-part string key, on-demand billing).
    /// Fails with the service's table-exists error when re-run.
    fn create_log_table(
        &self,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Current lifecycle status of the log table.
    fn table_status(
        &self,
    ) -> impl std::future::Future<Output = Result<TableStatus, StoreError>> + Send;
}
