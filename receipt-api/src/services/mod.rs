//! Use-case services behind the HTTP handlers

pub mod analysis;
pub mod ingestion;
pub mod media;

pub use analysis::{extract_header, run_model, AiExtraction, ImageAcquirer, ImageSource};
pub use ingestion::{ingest, UploadRequest, UploadedFile};
