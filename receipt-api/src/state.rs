//! Application State
//!
//! Shared state for the receipt API. Built once at startup and cloned into
//! every handler; all members are cheap `Arc` handles.

use std::sync::Arc;
use tracing::{info, warn};

use receipt_db::{InMemoryReceiptRepository, PgReceiptRepository, ReceiptRepository};
use receipt_storage::{BlobStore, LocalBlobStore, S3BlobStore};
use receipt_vision::{GeminiClient, VisionExtractor};

use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};

/// Application state
#[derive(Clone)]
pub struct AppState {
    /// Receipt repository
    pub repository: Arc<dyn ReceiptRepository>,
    /// Blob store that receives new uploads
    pub blob_store: Arc<dyn BlobStore>,
    /// Local upload directory served under `/uploads`
    pub uploads: Arc<LocalBlobStore>,
    /// Vision extractor, absent when no API key is configured
    pub vision: Option<Arc<dyn VisionExtractor>>,
    /// Shared client for fetching remote receipt images
    pub http: reqwest::Client,
    /// Configuration
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create state from explicit components
    pub fn new(
        config: AppConfig,
        repository: Arc<dyn ReceiptRepository>,
        blob_store: Arc<dyn BlobStore>,
        uploads: Arc<LocalBlobStore>,
        vision: Option<Arc<dyn VisionExtractor>>,
    ) -> Self {
        Self {
            repository,
            blob_store,
            uploads,
            vision,
            http: reqwest::Client::new(),
            config: Arc::new(config),
        }
    }

    /// Connect every backend selected by `config`
    ///
    /// - `DATABASE_URL` set: PostgreSQL (migrations applied), else in-memory
    /// - S3 credentials set: S3 bucket, else the local upload directory
    /// - Gemini key set: AI extraction enabled, else disabled
    pub async fn from_config(config: AppConfig) -> ApiResult<Self> {
        let repository: Arc<dyn ReceiptRepository> = match &config.database_url {
            Some(url) => {
                let repo = PgReceiptRepository::connect(url, config.database_max_connections).await?;
                repo.migrate().await?;
                Arc::new(repo)
            }
            None => {
                warn!("DATABASE_URL not set, receipts are kept in memory only");
                Arc::new(InMemoryReceiptRepository::new())
            }
        };

        let uploads = Arc::new(LocalBlobStore::new(&config.uploads_dir).await?);

        let blob_store: Arc<dyn BlobStore> = match &config.s3 {
            Some(s3) => Arc::new(S3BlobStore::new(s3.clone()).await?),
            None => uploads.clone() as Arc<dyn BlobStore>,
        };

        let vision: Option<Arc<dyn VisionExtractor>> = match &config.gemini {
            Some(gemini) => {
                let client = GeminiClient::new(gemini.clone())?;
                info!(model = %gemini.model, "AI header extraction enabled");
                Some(Arc::new(client))
            }
            None => {
                info!("GEMINI_API_KEY not set, AI header extraction disabled");
                None
            }
        };

        let http = reqwest::Client::builder()
            .timeout(config.ai_timeout)
            .build()
            .map_err(|e| ApiError::Internal(format!("HTTP client error: {}", e)))?;

        info!(
            repository = repository.backend_name(),
            blob_store = %blob_store.backend_type(),
            "Application state ready"
        );

        Ok(Self {
            repository,
            blob_store,
            uploads,
            vision,
            http,
            config: Arc::new(config),
        })
    }
}
