//! ReceiptFlow Core
//!
//! Domain types and the header reconciliation pipeline for the receipt
//! management service.
//!
//! # Header Reconciliation
//!
//! A receipt header is assembled from up to three sources, in ascending
//! precedence:
//!
//! 1. **Hints**: vendor name, date and total as typed by the uploader
//! 2. **Heuristics**: the hints normalized into [`HeaderFields`] shape
//!    (amount cleaning, separator normalization, rounding)
//! 3. **AI extraction**: fields returned by the vision model, which overwrite
//!    the lower layers field by field
//!
//! ```text
//!   ReceiptHints ──► HeaderFields::from_hints ──┐
//!                                               ├─► merge ──► Reconciled
//!   model output ──► parse_model_output ────────┘
//! ```
//!
//! The AI layer is optional everywhere: [`reconcile`] takes an
//! `Option<HeaderFields>` and produces a complete record either way.
//!
//! # Core Types
//!
//! - [`Receipt`]: persisted receipt record
//! - [`ReceiptStatus`]: `DRAFT` → `APPROVED` | `REJECTED`
//! - [`HeaderFields`]: structured header extraction record
//! - [`ReceiptHints`]: uploader-supplied hints
//! - [`ReceiptPatch`]: partial update of an existing receipt

pub mod error;
pub mod header;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use header::{
    build_prompt, parse_amount, parse_model_output, parse_receipt_date, reconcile, Reconciled,
    HEADER_KEYS,
};
pub use types::{HeaderFields, Receipt, ReceiptHints, ReceiptPatch, ReceiptStatus};
