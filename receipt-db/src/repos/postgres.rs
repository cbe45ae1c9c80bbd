//! PostgreSQL receipt repository

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use receipt_core::{HeaderFields, Receipt, ReceiptPatch, ReceiptStatus};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::{FromRow, Postgres, QueryBuilder};
use tracing::{debug, info};
use uuid::Uuid;

use super::traits::ReceiptRepository;
use crate::error::{DbError, DbResult};

const RECEIPT_COLUMNS: &str = "id, file_locator, vendor_name, receipt_date, grand_total, \
                               status, header_fields, created_at, updated_at";

/// Row shape of the `receipts` table
#[derive(Debug, FromRow)]
struct ReceiptRow {
    id: Uuid,
    file_locator: String,
    vendor_name: Option<String>,
    receipt_date: Option<NaiveDate>,
    grand_total: Option<Decimal>,
    status: String,
    header_fields: Option<Json<HeaderFields>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ReceiptRow> for Receipt {
    type Error = DbError;

    fn try_from(row: ReceiptRow) -> Result<Self, Self::Error> {
        let status: ReceiptStatus = row
            .status
            .parse()
            .map_err(|e| DbError::CorruptRow(format!("receipt {}: {}", row.id, e)))?;

        Ok(Receipt {
            id: row.id,
            file_locator: row.file_locator,
            vendor_name: row.vendor_name,
            date: row.receipt_date,
            grand_total: row.grand_total,
            status,
            header_fields: row.header_fields.map(|Json(fields)| fields),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Receipt repository over a shared connection pool
pub struct PgReceiptRepository {
    pool: PgPool,
}

impl PgReceiptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `database_url`
    pub async fn connect(database_url: &str, max_connections: u32) -> DbResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        info!(max_connections, "Connected to PostgreSQL");
        Ok(Self::new(pool))
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> DbResult<()> {
        crate::MIGRATOR.run(&self.pool).await?;
        info!("Database schema is up to date");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ReceiptRepository for PgReceiptRepository {
    async fn create(&self, receipt: &Receipt) -> DbResult<Receipt> {
        let query = format!(
            "INSERT INTO receipts ({cols}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {cols}",
            cols = RECEIPT_COLUMNS
        );

        let row: ReceiptRow = sqlx::query_as(&query)
            .bind(receipt.id)
            .bind(&receipt.file_locator)
            .bind(&receipt.vendor_name)
            .bind(receipt.date)
            .bind(receipt.grand_total)
            .bind(receipt.status.as_str())
            .bind(receipt.header_fields.clone().map(Json))
            .bind(receipt.created_at)
            .bind(receipt.updated_at)
            .fetch_one(&self.pool)
            .await?;

        debug!(receipt_id = %row.id, "Inserted receipt");
        row.try_into()
    }

    async fn get(&self, id: Uuid) -> DbResult<Option<Receipt>> {
        let query = format!("SELECT {} FROM receipts WHERE id = $1", RECEIPT_COLUMNS);

        let row: Option<ReceiptRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Receipt::try_from).transpose()
    }

    async fn list(&self) -> DbResult<Vec<Receipt>> {
        let query = format!(
            "SELECT {} FROM receipts ORDER BY created_at DESC",
            RECEIPT_COLUMNS
        );

        let rows: Vec<ReceiptRow> = sqlx::query_as(&query).fetch_all(&self.pool).await?;
        rows.into_iter().map(Receipt::try_from).collect()
    }

    async fn set_status(&self, id: Uuid, status: ReceiptStatus) -> DbResult<Receipt> {
        let query = format!(
            "UPDATE receipts SET status = $1, updated_at = now() WHERE id = $2 RETURNING {}",
            RECEIPT_COLUMNS
        );

        let row: Option<ReceiptRow> = sqlx::query_as(&query)
            .bind(status.as_str())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or(DbError::NotFound(id))?.try_into()
    }

    async fn update(&self, id: Uuid, patch: &ReceiptPatch) -> DbResult<Receipt> {
        if patch.is_empty() {
            return Err(DbError::InvalidUpdate("patch contains no fields".into()));
        }

        let mut builder: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE receipts SET updated_at = now()");

        if let Some(vendor_name) = &patch.vendor_name {
            builder.push(", vendor_name = ").push_bind(vendor_name.clone());
        }
        if let Some(date) = patch.date {
            builder.push(", receipt_date = ").push_bind(date);
        }
        if let Some(grand_total) = patch.grand_total {
            builder.push(", grand_total = ").push_bind(grand_total);
        }
        if let Some(header_fields) = &patch.header_fields {
            builder
                .push(", header_fields = ")
                .push_bind(header_fields.clone().map(Json));
        }
        if let Some(status) = patch.status {
            builder.push(", status = ").push_bind(status.as_str());
        }

        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(RECEIPT_COLUMNS);

        let row: Option<ReceiptRow> = builder
            .build_query_as()
            .fetch_optional(&self.pool)
            .await?;

        row.ok_or(DbError::NotFound(id))?.try_into()
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
