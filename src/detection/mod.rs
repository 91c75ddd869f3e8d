//! Lexical spam scoring: a phrase lexicon, structural regex patterns and a few
//! shape heuristics combined into a 0-100 score.

pub mod heuristics;
pub mod highlight;
pub mod lexicon;
pub mod patterns;
pub mod scorer;

pub use highlight::Marker;
pub use scorer::{score, SPAM_THRESHOLD, SUSPICIOUS_THRESHOLD};

use crate::domain::AnalysisResult;

pub fn analyze(text: &str) -> AnalysisResult {
    analyze_with(text, Marker::HTML)
}

pub fn analyze_with(text: &str, marker: Marker) -> AnalysisResult {
    if text.is_empty() {
        return AnalysisResult::default();
    }

    let assessment = scorer::score(text);
    let highlighted_text = highlight::render(text, &assessment.spans, marker);

    AnalysisResult {
        is_spam: assessment.is_spam,
        score: assessment.score,
        text: text.to_string(),
        highlighted_text,
        keywords: assessment.keywords,
    }
}
