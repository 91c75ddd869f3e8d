use anyhow::Result;
use futures::{StreamExt, stream};
use thiserror::Error;

use crate::{
    db::emails::EmailRepository,
    detection::{self, Marker},
    domain::{Email, EmailDraft, Folder, NewEmail, ScanReport, ScanSource},
    ocr::{ImageUpload, OcrError, TextExtractor},
};

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to extract text from image {file_name}")]
    ExtractionFailed {
        file_name: String,
        #[source]
        source: OcrError,
    },
}

/// Runs submissions through OCR (for images) and the detector.
pub struct Scanner<E> {
    extractor: E,
    concurrency: usize,
    marker: Marker,
}

impl<E: TextExtractor> Scanner<E> {
    pub fn new(extractor: E, concurrency: usize) -> Self {
        Self {
            extractor,
            concurrency: concurrency.max(1),
            marker: Marker::HTML,
        }
    }

    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.marker = marker;
        self
    }

    pub fn scan_text(&self, text: &str) -> ScanReport {
        let analysis = detection::analyze_with(text, self.marker);
        tracing::info!(
            target: "pipeline",
            source = "text",
            score = analysis.score,
            keywords = analysis.keywords.len(),
            "text analysed"
        );
        ScanReport::new(ScanSource::Text, analysis, None)
    }

    /// Extracts text from `upload` and scores it. An extraction failure is
    /// returned as is; nothing gets scored in that case.
    pub async fn scan_image(&self, upload: &ImageUpload) -> Result<ScanReport, ScanError> {
        let output = self.extractor.extract(upload).await.map_err(|source| {
            tracing::warn!(
                target: "pipeline",
                file = %upload.file_name,
                error = %source,
                "text extraction failed"
            );
            ScanError::ExtractionFailed {
                file_name: upload.file_name.clone(),
                source,
            }
        })?;

        let analysis = detection::analyze_with(&output.text, self.marker);
        tracing::info!(
            target: "pipeline",
            source = "image",
            file = %upload.file_name,
            confidence = output.confidence,
            score = analysis.score,
            keywords = analysis.keywords.len(),
            "image analysed"
        );
        Ok(ScanReport::new(
            ScanSource::Image,
            analysis,
            Some(output.confidence),
        ))
    }

    /// Scans several images with at most `concurrency` extractions in flight.
    /// Results keep the order of `uploads`.
    pub async fn scan_images(&self, uploads: &[ImageUpload]) -> Vec<Result<ScanReport, ScanError>> {
        stream::iter(uploads)
            .map(|upload| self.scan_image(upload))
            .buffered(self.concurrency)
            .collect()
            .await
    }
}

/// Scores an incoming message and stores it in the spam or inbox folder.
/// `attachment_text` is OCR output of an image attachment, scored along with
/// the subject and body.
pub async fn file_email(
    repo: &EmailRepository,
    draft: EmailDraft,
    attachment_text: Option<&str>,
) -> Result<Email> {
    let mut body = format!("{}\n{}", draft.subject, draft.content);
    if let Some(extra) = attachment_text.filter(|text| !text.trim().is_empty()) {
        body.push('\n');
        body.push_str(extra);
    }
    let assessment = detection::score(&body);
    let folder = Folder::for_verdict(assessment.is_spam);

    let email = NewEmail {
        subject: draft.subject,
        sender: draft.sender,
        recipient: draft.recipient,
        content: draft.content,
        is_read: false,
        is_spam: assessment.is_spam,
        spam_score: assessment.score,
        folder,
        has_attachment: draft.attachment.is_some(),
        attachment_type: draft.attachment.as_ref().map(|attachment| attachment.kind),
        attachment_url: draft.attachment.map(|attachment| attachment.url),
    };

    let stored = repo.insert(email).await?;
    tracing::info!(
        target: "pipeline",
        id = %stored.id,
        folder = %stored.folder,
        score = stored.spam_score,
        "email filed"
    );
    Ok(stored)
}
