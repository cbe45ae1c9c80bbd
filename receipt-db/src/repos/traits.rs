//! Receipt Repository Trait

use async_trait::async_trait;
use receipt_core::{Receipt, ReceiptPatch, ReceiptStatus};
use uuid::Uuid;

use crate::error::DbResult;

/// Durable store for receipt records
///
/// Every mutation targets one record by id and is a single atomic statement,
/// so handlers need no locking of their own.
#[async_trait]
pub trait ReceiptRepository: Send + Sync {
    /// Insert a freshly created receipt
    async fn create(&self, receipt: &Receipt) -> DbResult<Receipt>;

    /// Get receipt by id
    async fn get(&self, id: Uuid) -> DbResult<Option<Receipt>>;

    /// All receipts, newest first
    async fn list(&self) -> DbResult<Vec<Receipt>>;

    /// Overwrite the status of one receipt
    ///
    /// Fails with `DbError::NotFound` if the id is unknown.
    async fn set_status(&self, id: Uuid, status: ReceiptStatus) -> DbResult<Receipt>;

    /// Apply a validated partial update
    ///
    /// Fails with `DbError::NotFound` if the id is unknown.
    async fn update(&self, id: Uuid, patch: &ReceiptPatch) -> DbResult<Receipt>;

    /// Backend identifier for health output
    fn backend_name(&self) -> &'static str;

    /// Health check
    async fn health_check(&self) -> DbResult<()>;
}
