use once_cell::sync::Lazy;
use regex::Regex;

use super::highlight::Span;

pub const MATCH_WEIGHT: u32 = 5;

// Word boundaries and case folding are ASCII-only.
const RULES: &[(&str, &str)] = &[
    ("phone", r"[0-9]{3}-[0-9]{3}-[0-9]{4}"),
    ("currency", r"\$[0-9]+(?:,[0-9]{3})*(?:\.[0-9]{2})?"),
    ("email", r"(?-u)\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"),
    (
        "url",
        r"(?-u)https?://(?:www\.)?[-a-zA-Z0-9@:%._+~#=]{1,256}\.[a-zA-Z0-9()]{1,6}\b(?:[-a-zA-Z0-9()@:%_+.~#?&/=]*)",
    ),
    ("free", r"(?i-u)\bfree\b"),
    ("guarantee", r"(?i-u)\bguarantee\b"),
    ("hundred_percent", r"(?-u)\b100%"),
    ("no_obligation", r"(?i-u)\bno obligation\b"),
    ("instant", r"(?i-u)\binstant\b"),
    ("repeated_punctuation", r"[!?]{2,}"),
    ("dollar_signs", r"\$\$\$"),
    ("cash", r"(?-u)\bCASH\b"),
    ("urgent", r"(?i-u)\burgent\b"),
    ("act_now", r"(?i-u)\bact now\b"),
    ("buy_now", r"(?i-u)\bbuy now\b"),
    ("click_here", r"(?i-u)\bclick here\b"),
    ("order_now", r"(?i-u)\border now\b"),
    ("limited_time", r"(?i-u)\blimited time\b"),
    ("special_offer", r"(?i-u)\bspecial offer\b"),
    ("winner", r"(?i-u)\bwinner\b"),
];

pub struct Pattern {
    pub label: &'static str,
    regex: Regex,
}

static PATTERNS: Lazy<Vec<Pattern>> = Lazy::new(|| {
    RULES
        .iter()
        .map(|&(label, source)| Pattern {
            label,
            regex: Regex::new(source).expect("valid spam pattern"),
        })
        .collect()
});

pub fn patterns() -> &'static [Pattern] {
    &PATTERNS
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PatternScan {
    pub score: u32,
    pub spans: Vec<Span>,
}

/// Matched substrings not already present in `keywords` are appended to it.
pub fn scan(text: &str, keywords: &mut Vec<String>) -> PatternScan {
    let mut out = PatternScan::default();

    for pattern in patterns() {
        let mut count = 0u32;
        for found in pattern.regex.find_iter(text) {
            count += 1;
            out.spans.push(Span::from(found));
            if !keywords.iter().any(|known| known == found.as_str()) {
                keywords.push(found.as_str().to_string());
            }
        }
        if count == 0 {
            continue;
        }

        let points = count * MATCH_WEIGHT;
        out.score += points;
        tracing::debug!(
            target: "detection",
            pattern = pattern.label,
            matches = count,
            points,
            "pattern hit"
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found(text: &str) -> Vec<String> {
        let mut keywords = Vec::new();
        scan(text, &mut keywords);
        keywords
    }

    #[test]
    fn scores_every_match() {
        let mut keywords = Vec::new();
        let scan = scan("free, FREE and free again", &mut keywords);
        assert_eq!(scan.score, 15);
        assert_eq!(scan.spans.len(), 3);
        assert_eq!(keywords, vec!["free".to_string(), "FREE".to_string()]);
    }

    #[test]
    fn structural_shapes() {
        assert_eq!(found("call 555-123-4567 today"), vec!["555-123-4567"]);
        assert_eq!(found("only $1,299.99"), vec!["$1,299.99"]);
        assert_eq!(found("mail deals@shop.example"), vec!["deals@shop.example"]);
        assert_eq!(
            found("see https://www.example.com/path?a=1 now"),
            vec!["https://www.example.com/path?a=1"]
        );
        assert_eq!(found("what?!?"), vec!["?!?"]);
        assert_eq!(found("$$$ inside"), vec!["$$$"]);
    }

    #[test]
    fn cash_is_case_sensitive() {
        assert_eq!(found("fast CASH"), vec!["CASH"]);
        assert!(found("fast cash").is_empty());
    }

    #[test]
    fn words_respect_boundaries() {
        assert!(found("freedom and instantly").is_empty());
        assert_eq!(found("Act Now"), vec!["Act Now"]);
        assert_eq!(found("100% organic"), vec!["100%"]);
    }

    #[test]
    fn non_ascii_letters_are_not_word_characters() {
        assert_eq!(found("éfree"), vec!["free"]);
        assert_eq!(found("WİNNER"), Vec::<String>::new());
    }

    #[test]
    fn existing_keywords_are_not_duplicated() {
        let mut keywords = vec!["winner".to_string()];
        let scan = scan("winner", &mut keywords);
        assert_eq!(scan.score, 5);
        assert_eq!(keywords, vec!["winner".to_string()]);
    }
}
