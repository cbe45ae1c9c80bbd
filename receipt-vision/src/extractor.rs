//! Vision Extractor Trait

use async_trait::async_trait;
use std::sync::Mutex;

use crate::error::{VisionError, VisionResult};

/// Image payload sent to the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionImage {
    /// MIME type, e.g. `image/jpeg`
    pub mime_type: String,
    /// Raw image bytes
    pub bytes: Vec<u8>,
}

impl VisionImage {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// Remote multimodal model call
///
/// Takes an image and a prompt and returns the model's free text, which the
/// caller expects (but cannot rely on) to be JSON.
#[async_trait]
pub trait VisionExtractor: Send + Sync {
    async fn extract(&self, image: VisionImage, prompt: &str) -> VisionResult<String>;

    /// Model identifier for logs
    fn model_name(&self) -> &str;
}

/// Canned-response extractor for tests and local development
pub struct MockVisionExtractor {
    response: Result<String, String>,
    calls: Mutex<Vec<(VisionImage, String)>>,
}

impl MockVisionExtractor {
    /// Always reply with `raw`
    pub fn replying(raw: impl Into<String>) -> Self {
        Self {
            response: Ok(raw.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always fail with `VisionError::Unavailable`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Number of calls seen so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|calls| calls.len()).unwrap_or(0)
    }

    /// Last image and prompt received
    pub fn last_call(&self) -> Option<(VisionImage, String)> {
        self.calls.lock().ok().and_then(|calls| calls.last().cloned())
    }
}

#[async_trait]
impl VisionExtractor for MockVisionExtractor {
    async fn extract(&self, image: VisionImage, prompt: &str) -> VisionResult<String> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((image, prompt.to_string()));
        }
        self.response.clone().map_err(VisionError::Unavailable)
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}
