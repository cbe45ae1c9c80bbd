//! Receipt API Handlers

pub mod ai;
pub mod exports;
pub mod health;
pub mod receipts;
pub mod uploads;

pub use ai::*;
pub use exports::*;
pub use health::*;
pub use receipts::*;
pub use uploads::*;
