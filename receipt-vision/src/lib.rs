//! ReceiptFlow Vision Client
//!
//! Wraps the remote multimodal model used for header extraction. The model
//! is an opaque black box: it receives an image and a prompt and returns
//! text that is expected, but not guaranteed, to be JSON.
//!
//! Callers treat every failure here as "no AI contribution".

pub mod error;
pub mod extractor;
pub mod gemini;

pub use error::{VisionError, VisionResult};
pub use extractor::{MockVisionExtractor, VisionExtractor, VisionImage};
pub use gemini::{GeminiClient, GeminiConfig};
