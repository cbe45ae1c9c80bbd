//! In-memory receipt repository
//!
//! Used when no database URL is configured and throughout the HTTP tests.
//! Contents are lost on restart.

use async_trait::async_trait;
use receipt_core::{Receipt, ReceiptPatch, ReceiptStatus};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::traits::ReceiptRepository;
use crate::error::{DbError, DbResult};

#[derive(Default)]
pub struct InMemoryReceiptRepository {
    receipts: RwLock<HashMap<Uuid, Receipt>>,
}

impl InMemoryReceiptRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReceiptRepository for InMemoryReceiptRepository {
    async fn create(&self, receipt: &Receipt) -> DbResult<Receipt> {
        let mut receipts = self.receipts.write().await;
        if receipts.contains_key(&receipt.id) {
            return Err(DbError::InvalidUpdate(format!(
                "receipt {} already exists",
                receipt.id
            )));
        }
        receipts.insert(receipt.id, receipt.clone());
        Ok(receipt.clone())
    }

    async fn get(&self, id: Uuid) -> DbResult<Option<Receipt>> {
        Ok(self.receipts.read().await.get(&id).cloned())
    }

    async fn list(&self) -> DbResult<Vec<Receipt>> {
        let mut all: Vec<Receipt> = self.receipts.read().await.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn set_status(&self, id: Uuid, status: ReceiptStatus) -> DbResult<Receipt> {
        let mut receipts = self.receipts.write().await;
        let receipt = receipts.get_mut(&id).ok_or(DbError::NotFound(id))?;
        receipt.set_status(status);
        Ok(receipt.clone())
    }

    async fn update(&self, id: Uuid, patch: &ReceiptPatch) -> DbResult<Receipt> {
        if patch.is_empty() {
            return Err(DbError::InvalidUpdate("patch contains no fields".into()));
        }
        let mut receipts = self.receipts.write().await;
        let receipt = receipts.get_mut(&id).ok_or(DbError::NotFound(id))?;
        receipt.apply_patch(patch);
        Ok(receipt.clone())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn health_check(&self) -> DbResult<()> {
        Ok(())
    }
}
