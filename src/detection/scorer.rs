use super::{heuristics, highlight::Span, lexicon, patterns};

pub const SUSPICIOUS_THRESHOLD: u32 = 30;
pub const SPAM_THRESHOLD: u32 = 70;
/// Minimum score for any text with at least one recognised token.
pub const KEYWORD_FLOOR: u32 = 30;
pub const MAX_SCORE: u32 = 100;
pub const MAX_KEYWORDS: usize = 10;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub score: u32,
    pub is_spam: bool,
    /// Lexicon hits first, then pattern hits, capped at [`MAX_KEYWORDS`].
    pub keywords: Vec<String>,
    pub spans: Vec<Span>,
}

pub fn score(text: &str) -> Assessment {
    if text.is_empty() {
        return Assessment::default();
    }

    let lexicon = lexicon::scan(text);
    let mut keywords = lexicon.keywords;
    let patterns = patterns::scan(text, &mut keywords);
    let shape = heuristics::scan(text);

    let raw = lexicon.score + patterns.score + shape.score();
    let score = finalize(raw, !keywords.is_empty());

    tracing::debug!(
        target: "detection",
        raw,
        score,
        keywords = keywords.len(),
        "text scored"
    );

    keywords.truncate(MAX_KEYWORDS);
    let mut spans = lexicon.spans;
    spans.extend(patterns.spans);

    Assessment {
        score,
        is_spam: score >= SPAM_THRESHOLD,
        keywords,
        spans,
    }
}

pub fn finalize(raw: u32, has_keywords: bool) -> u32 {
    let floored = if has_keywords {
        raw.max(KEYWORD_FLOOR)
    } else {
        raw
    };
    floored.min(MAX_SCORE)
}
