//! Receipt Database Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Query error: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Receipt not found: {0}")]
    NotFound(uuid::Uuid),

    #[error("Corrupt row: {0}")]
    CorruptRow(String),

    #[error("Invalid update: {0}")]
    InvalidUpdate(String),
}

pub type DbResult<T> = Result<T, DbError>;
