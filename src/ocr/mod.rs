//! Text extraction from images, provided by an external OCR service.

mod client;
mod upload;

pub use client::OcrClient;
pub use upload::ImageUpload;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrOutput {
    pub text: String,
    /// 0-100.
    pub confidence: f32,
}

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR_ENDPOINT must be configured to scan images")]
    NotConfigured,
    #[error("{0} is not a supported image type")]
    UnsupportedMedia(String),
    #[error("{file_name} is {size} bytes, above the {limit} byte limit")]
    TooLarge {
        file_name: String,
        size: u64,
        limit: u64,
    },
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),
    #[error("OCR request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("OCR service returned an unexpected body: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

pub trait TextExtractor: Send + Sync {
    fn extract<'a>(&'a self, image: &'a ImageUpload) -> BoxFuture<'a, Result<OcrOutput, OcrError>>;
}
