//! Service Configuration
//!
//! Read once at startup from the process environment (after loading an
//! optional `.env` file). Every option has a default except credentials.

use receipt_storage::S3Config;
use receipt_vision::GeminiConfig;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_UPLOADS_DIR: &str = "./public/uploads";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// API configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// PostgreSQL URL; `None` selects the in-memory repository
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    /// Directory for local uploads, also served under `/uploads`
    pub uploads_dir: PathBuf,
    /// Present when both AWS credentials are configured
    pub s3: Option<S3Config>,
    /// Present when a Gemini API key is configured
    pub gemini: Option<GeminiConfig>,
    /// Upper bound for one AI extraction
    pub ai_timeout: Duration,
    pub max_upload_bytes: usize,
    pub enable_cors: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            database_url: None,
            database_max_connections: 5,
            uploads_dir: PathBuf::from(DEFAULT_UPLOADS_DIR),
            s3: None,
            gemini: None,
            ai_timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            enable_cors: true,
        }
    }
}

impl AppConfig {
    /// Load from the environment, reading `.env` first if present
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; blank values count as unset
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let s3 = match (get("AWS_ACCESS_KEY_ID"), get("AWS_SECRET_ACCESS_KEY")) {
            (Some(access_key_id), Some(secret_access_key)) => Some(S3Config {
                endpoint: get("AWS_S3_ENDPOINT"),
                region: get("AWS_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                bucket: get("AWS_S3_BUCKET").unwrap_or_else(|| "receiptflow-uploads".to_string()),
                access_key_id,
                secret_access_key,
            }),
            _ => None,
        };

        let ai_timeout_secs = parse_or("AI_TIMEOUT_SECS", get("AI_TIMEOUT_SECS"), DEFAULT_AI_TIMEOUT_SECS)?;

        let gemini = get("GEMINI_API_KEY").map(|api_key| {
            let mut config = GeminiConfig::new(api_key).with_timeout(ai_timeout_secs);
            if let Some(model) = get("GEMINI_MODEL") {
                config = config.with_model(model);
            }
            if let Some(base_url) = get("GEMINI_BASE_URL") {
                config = config.with_base_url(base_url);
            }
            config
        });

        Ok(Self {
            host: get("RECEIPTFLOW_BIND_ADDR").unwrap_or(defaults.host),
            port: parse_or("RECEIPTFLOW_PORT", get("RECEIPTFLOW_PORT"), defaults.port)?,
            database_url: get("DATABASE_URL"),
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                get("DATABASE_MAX_CONNECTIONS"),
                defaults.database_max_connections,
            )?,
            uploads_dir: get("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.uploads_dir),
            s3,
            gemini,
            ai_timeout: Duration::from_secs(ai_timeout_secs),
            max_upload_bytes: parse_or(
                "MAX_UPLOAD_BYTES",
                get("MAX_UPLOAD_BYTES"),
                defaults.max_upload_bytes,
            )?,
            enable_cors: parse_bool("RECEIPTFLOW_CORS", get("RECEIPTFLOW_CORS"), defaults.enable_cors)?,
        })
    }

    /// Socket address string, `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        Some(v) => v.parse().map_err(|_| ConfigError::Invalid { key, value: v }),
        None => Ok(default),
    }
}

fn parse_bool(key: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let lowered = value.as_deref().map(str::to_ascii_lowercase);
    match lowered.as_deref() {
        None => Ok(default),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(_) => Err(ConfigError::Invalid {
            key,
            value: value.unwrap_or_default(),
        }),
    }
}
