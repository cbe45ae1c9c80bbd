//! Receipt Domain Types
//!
//! - Receipt records and their lifecycle status
//! - Structured header fields shared by every extraction layer
//! - Uploader hints
//! - Partial updates

pub mod header_fields;
pub mod hints;
pub mod patch;
pub mod receipt;

pub use header_fields::HeaderFields;
pub use hints::ReceiptHints;
pub use patch::ReceiptPatch;
pub use receipt::{Receipt, ReceiptStatus};
