//! Signals about the shape of a text rather than its wording. They add to the
//! score but never produce keywords or highlight spans.

use once_cell::sync::Lazy;
use regex::Regex;

pub const CAPS_RUN_WEIGHT: u32 = 5;
pub const PUNCTUATION_RUN_WEIGHT: u32 = 3;
pub const DENSE_LINKS_WEIGHT: u32 = 15;

static CAPS_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Z]{5,}").expect("valid caps regex"));
static PUNCTUATION_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[!?]{3,}").expect("valid punctuation regex"));
static URL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+").expect("valid url regex"));

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HeuristicScan {
    pub caps_runs: usize,
    pub punctuation_runs: usize,
    pub urls: usize,
    pub dense_links: bool,
}

impl HeuristicScan {
    pub fn score(&self) -> u32 {
        let mut score = self.caps_runs as u32 * CAPS_RUN_WEIGHT
            + self.punctuation_runs as u32 * PUNCTUATION_RUN_WEIGHT;
        if self.dense_links {
            score += DENSE_LINKS_WEIGHT;
        }
        score
    }
}

/// Maximal runs of five or more ASCII capitals. Any other character breaks a run.
pub fn caps_runs(text: &str) -> usize {
    CAPS_RUN.find_iter(text).count()
}

pub fn punctuation_runs(text: &str) -> usize {
    PUNCTUATION_RUN.find_iter(text).count()
}

pub fn url_count(text: &str) -> usize {
    URL_SHAPE.find_iter(text).count()
}

/// More than one URL per hundred characters of text.
pub fn link_density_exceeded(urls: usize, text_len: usize) -> bool {
    urls > 0 && urls * 100 > text_len
}

pub fn scan(text: &str) -> HeuristicScan {
    let urls = url_count(text);
    let scan = HeuristicScan {
        caps_runs: caps_runs(text),
        punctuation_runs: punctuation_runs(text),
        urls,
        dense_links: link_density_exceeded(urls, text.chars().count()),
    };
    if scan.score() > 0 {
        tracing::debug!(
            target: "detection",
            caps_runs = scan.caps_runs,
            punctuation_runs = scan.punctuation_runs,
            urls = scan.urls,
            dense_links = scan.dense_links,
            points = scan.score(),
            "shape signals"
        );
    }
    scan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_runs_only_count_letter_runs() {
        assert_eq!(caps_runs("BUY NOW TODAY"), 1);
        assert_eq!(caps_runs("FREEMONEY NOW"), 1);
        assert_eq!(caps_runs("ABCDEFGHIJKLMNO"), 1);
        assert_eq!(caps_runs("ABCD EFGH"), 0);
    }

    #[test]
    fn punctuation_runs_mix_marks() {
        assert_eq!(punctuation_runs("what?!? no!!! ok!!"), 2);
    }

    #[test]
    fn dense_links_in_short_text() {
        let text = "see http://a.example and http://b.example now";
        assert!(text.chars().count() < 50);
        let scan = scan(text);
        assert_eq!(scan.urls, 2);
        assert!(scan.dense_links);
        assert_eq!(scan.score(), DENSE_LINKS_WEIGHT);
    }

    #[test]
    fn single_link_in_long_text_is_not_dense() {
        let mut text = "plain words ".repeat(41);
        text.push_str("http://a.example");
        assert!(text.chars().count() >= 500);
        let scan = scan(&text);
        assert_eq!(scan.urls, 1);
        assert!(!scan.dense_links);
        assert_eq!(scan.score(), 0);
    }

    #[test]
    fn density_threshold() {
        assert!(link_density_exceeded(2, 50));
        assert!(!link_density_exceeded(1, 500));
        assert!(!link_density_exceeded(1, 100));
        assert!(!link_density_exceeded(0, 10));
    }
}
