use std::fmt;

use serde::{Deserialize, Serialize};

use crate::detection::{SPAM_THRESHOLD, SUSPICIOUS_THRESHOLD};

/// Output of one analysis. `highlighted_text` carries the triggering spans
/// wrapped in a marker; stripping the marker yields `text` again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub is_spam: bool,
    pub score: u32,
    pub text: String,
    pub highlighted_text: String,
    pub keywords: Vec<String>,
}

impl AnalysisResult {
    pub fn verdict(&self) -> Verdict {
        Verdict::from_score(self.score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Clean,
    Suspicious,
    Spam,
}

impl Verdict {
    pub fn from_score(score: u32) -> Self {
        if score >= SPAM_THRESHOLD {
            Verdict::Spam
        } else if score >= SUSPICIOUS_THRESHOLD {
            Verdict::Suspicious
        } else {
            Verdict::Clean
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Clean => "Clean",
            Verdict::Suspicious => "Suspicious",
            Verdict::Spam => "Spam Detected",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanSource {
    Text,
    Image,
}

/// What a user gets back for one submitted text or image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub source: ScanSource,
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ocr_confidence: Option<f32>,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
}

impl ScanReport {
    pub fn new(source: ScanSource, analysis: AnalysisResult, ocr_confidence: Option<f32>) -> Self {
        Self {
            source,
            verdict: analysis.verdict(),
            ocr_confidence,
            analysis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_bands() {
        assert_eq!(Verdict::from_score(0), Verdict::Clean);
        assert_eq!(Verdict::from_score(29), Verdict::Clean);
        assert_eq!(Verdict::from_score(30), Verdict::Suspicious);
        assert_eq!(Verdict::from_score(69), Verdict::Suspicious);
        assert_eq!(Verdict::from_score(70), Verdict::Spam);
        assert_eq!(Verdict::Spam.to_string(), "Spam Detected");
    }

    #[test]
    fn report_serializes_flat_camel_case() {
        let analysis = AnalysisResult {
            is_spam: false,
            score: 30,
            text: "free gift".into(),
            highlighted_text: "free gift".into(),
            keywords: vec!["free gift".into()],
        };
        let report = ScanReport::new(ScanSource::Image, analysis, Some(88.5));
        let json = serde_json::to_value(&report).expect("serializable report");
        assert_eq!(json["source"], "image");
        assert_eq!(json["verdict"], "suspicious");
        assert_eq!(json["isSpam"], false);
        assert_eq!(json["highlightedText"], "free gift");
        assert_eq!(json["ocrConfidence"], 88.5);
    }
}
