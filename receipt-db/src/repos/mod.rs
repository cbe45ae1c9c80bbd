//! Receipt repositories

pub mod memory;
pub mod postgres;
pub mod traits;

pub use memory::InMemoryReceiptRepository;
pub use postgres::PgReceiptRepository;
pub use traits::ReceiptRepository;
