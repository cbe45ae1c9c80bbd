//! ReceiptFlow Database Layer
//!
//! Persists receipt records in PostgreSQL via sqlx. The structured header is
//! stored as a `JSONB` column next to the resolved vendor, date and total.
//!
//! # Usage
//!
//! ```ignore
//! use receipt_db::{PgReceiptRepository, ReceiptRepository};
//!
//! async fn example() -> receipt_db::DbResult<()> {
//!     let repo = PgReceiptRepository::connect("postgres://localhost/receiptflow", 5).await?;
//!     repo.migrate().await?;
//!     let latest = repo.list().await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod repos;

pub use error::{DbError, DbResult};
pub use repos::{InMemoryReceiptRepository, PgReceiptRepository, ReceiptRepository};

/// Embedded schema migrations from `migrations/`
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
