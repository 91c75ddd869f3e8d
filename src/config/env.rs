use std::time::Duration;

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directories: DirectoryConfig,
    pub logging: LoggingConfig,
    pub ocr: OcrConfig,
    pub timezone: chrono_tz::Tz,
    pub seed_samples: bool,
}

#[derive(Debug, Clone)]
pub struct DirectoryConfig {
    pub logs_dir: String,
    pub data_dir: String,
    pub db_filename: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Text-from-image service. Image scanning is unavailable when unset.
    pub endpoint: Option<Url>,
    pub api_key: Option<String>,
    pub language: String,
    pub timeout: Duration,
    pub max_image_bytes: u64,
    pub concurrency: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("{var} must be an http(s) URL, got {value}")]
    UnsupportedScheme { var: &'static str, value: String },
    #[error("unknown timezone in {var}: {value}")]
    InvalidTimezone { var: &'static str, value: String },
}
