//! Header Reconciliation Pipeline
//!
//! Pure functions that turn uploader hints and optional model output into a
//! single normalized header:
//!
//! - [`parse_amount`]: heuristic cleaning of typed totals
//! - [`parse_receipt_date`]: strict `dd.mm.yyyy`, then generic formats
//! - [`build_prompt`]: the extraction prompt sent with the image
//! - [`parse_model_output`]: lenient reading of the model's JSON
//! - [`reconcile`]: precedence merge and final value resolution

mod amount;
mod date;
mod model_output;
mod prompt;
mod reconcile;

pub use amount::parse_amount;
pub use date::parse_receipt_date;
pub use model_output::parse_model_output;
pub use prompt::{build_prompt, HEADER_KEYS};
pub use reconcile::{reconcile, Reconciled};
