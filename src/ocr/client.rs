use futures::future::BoxFuture;
use reqwest::{Client, header::CONTENT_TYPE};
use serde::Deserialize;

use crate::config::OcrConfig;

use super::{ImageUpload, OcrError, OcrOutput, TextExtractor};

#[derive(Clone)]
pub struct OcrClient {
    http: Client,
    config: OcrConfig,
}

impl OcrClient {
    pub fn new(http: Client, config: OcrConfig) -> Self {
        Self { http, config }
    }

    pub async fn recognize(&self, image: &ImageUpload) -> Result<OcrOutput, OcrError> {
        let endpoint = self.config.endpoint.as_ref().ok_or(OcrError::NotConfigured)?;

        let mut request = self
            .http
            .post(endpoint.clone())
            .query(&[("language", self.config.language.as_str())])
            .header(CONTENT_TYPE, image.content_type)
            .timeout(self.config.timeout)
            .body(image.bytes.clone());
        if let Some(api_key) = &self.config.api_key {
            request = request.bearer_auth(api_key);
        }

        let body = request.send().await?.error_for_status()?.text().await?;
        let output = parse_response(&body)?;

        tracing::info!(
            target: "ocr",
            file = %image.file_name,
            confidence = output.confidence,
            chars = output.text.chars().count(),
            "text extracted"
        );
        Ok(output)
    }
}

impl TextExtractor for OcrClient {
    fn extract<'a>(&'a self, image: &'a ImageUpload) -> BoxFuture<'a, Result<OcrOutput, OcrError>> {
        Box::pin(self.recognize(image))
    }
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    text: String,
    #[serde(default)]
    confidence: f32,
}

pub fn parse_response(body: &str) -> Result<OcrOutput, OcrError> {
    let response: RecognizeResponse = serde_json::from_str(body)?;
    let confidence = if response.confidence.is_finite() {
        response.confidence.clamp(0.0, 100.0)
    } else {
        0.0
    };
    Ok(OcrOutput {
        text: response.text,
        confidence,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn parses_and_clamps_confidence() {
        let output = parse_response(r#"{"text":"FREE CASH","confidence":104.2}"#).expect("valid body");
        assert_eq!(output.text, "FREE CASH");
        assert_eq!(output.confidence, 100.0);

        let output = parse_response(r#"{"text":""}"#).expect("confidence is optional");
        assert_eq!(output.confidence, 0.0);
    }

    #[test]
    fn rejects_bodies_without_text() {
        assert!(matches!(
            parse_response(r#"{"confidence":50}"#),
            Err(OcrError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn missing_endpoint_is_reported() {
        let client = OcrClient::new(
            Client::new(),
            OcrConfig {
                endpoint: None,
                api_key: None,
                language: "eng".into(),
                timeout: Duration::from_secs(1),
                max_image_bytes: 1024,
                concurrency: 1,
            },
        );
        let upload = ImageUpload::new("a.png", vec![1, 2, 3]).expect("png upload");
        assert!(matches!(
            client.extract(&upload).await,
            Err(OcrError::NotConfigured)
        ));
    }
}
