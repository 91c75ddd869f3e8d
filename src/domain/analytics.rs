use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::email::SpamStatistics;

/// Terms counted across the spam folder, matched as whole words ignoring ASCII case.
pub const SPAM_TERMS: &[&str] = &[
    "free",
    "win",
    "congratulations",
    "prize",
    "money",
    "urgent",
    "act now",
    "limited",
    "offer",
    "exclusive",
    "verify",
    "account",
    "click",
    "link",
    "suspended",
];

pub const TOP_KEYWORDS: usize = 6;

const BUCKETS: [(&str, u32); 5] = [
    ("0-20", 20),
    ("21-40", 40),
    ("41-60", 60),
    ("61-80", 80),
    ("81-100", u32::MAX),
];

static TERM_MATCHERS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    SPAM_TERMS
        .iter()
        .map(|&term| {
            let source = format!(r"(?i-u)\b{}\b", regex::escape(term));
            (term, Regex::new(&source).expect("valid spam term pattern"))
        })
        .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KeywordCount {
    pub keyword: &'static str,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBucket {
    pub label: &'static str,
    pub count: u64,
}

/// Mailbox overview shown by `stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpamAnalytics {
    #[serde(flatten)]
    pub statistics: SpamStatistics,
    pub unread_inbox: u64,
    pub score_distribution: Vec<ScoreBucket>,
    pub top_spam_keywords: Vec<KeywordCount>,
}

/// Counts [`SPAM_TERMS`] over `texts` and keeps the [`TOP_KEYWORDS`] most
/// frequent. Ties keep the order in which terms were first seen.
pub fn keyword_frequency<'a, I>(texts: I) -> Vec<KeywordCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: Vec<KeywordCount> = Vec::new();
    for text in texts {
        for (term, matcher) in TERM_MATCHERS.iter() {
            let hits = matcher.find_iter(text).count() as u64;
            if hits == 0 {
                continue;
            }
            match counts.iter_mut().find(|entry| entry.keyword == *term) {
                Some(entry) => entry.count += hits,
                None => counts.push(KeywordCount {
                    keyword: term,
                    count: hits,
                }),
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(TOP_KEYWORDS);
    counts
}

/// Five fixed-width buckets, always all present.
pub fn score_distribution<I>(scores: I) -> Vec<ScoreBucket>
where
    I: IntoIterator<Item = u32>,
{
    let mut buckets: Vec<ScoreBucket> = BUCKETS
        .iter()
        .map(|&(label, _)| ScoreBucket { label, count: 0 })
        .collect();
    for score in scores {
        if let Some(index) = BUCKETS.iter().position(|&(_, upper)| score <= upper) {
            buckets[index].count += 1;
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(buckets: &[ScoreBucket]) -> Vec<u64> {
        buckets.iter().map(|bucket| bucket.count).collect()
    }

    #[test]
    fn buckets_are_inclusive_at_the_top() {
        let buckets = score_distribution([0, 20, 21, 40, 41, 60, 61, 80, 81, 100]);
        assert_eq!(counts(&buckets), vec![2, 2, 2, 2, 2]);
        assert_eq!(buckets[4].label, "81-100");
        assert_eq!(counts(&score_distribution(Vec::new())), vec![0; 5]);
    }

    #[test]
    fn terms_match_whole_words_only() {
        let top = keyword_frequency(["You are a WINNER, win win! Free freedom"]);
        assert_eq!(
            top,
            vec![
                KeywordCount { keyword: "win", count: 2 },
                KeywordCount { keyword: "free", count: 1 },
            ]
        );
    }

    #[test]
    fn sorted_by_count_and_capped() {
        let texts = [
            "free win congratulations prize money urgent act now",
            "verify account account click link",
        ];
        let top = keyword_frequency(texts);
        assert_eq!(top.len(), TOP_KEYWORDS);
        assert_eq!(top[0], KeywordCount { keyword: "account", count: 2 });
        assert!(top.windows(2).all(|pair| pair[0].count >= pair[1].count));
        assert_eq!(top[1].keyword, "free");
    }

    #[test]
    fn ascii_word_boundaries() {
        let top = keyword_frequency(["éfree offer"]);
        let words: Vec<_> = top.iter().map(|entry| entry.keyword).collect();
        assert_eq!(words, vec!["free", "offer"]);
    }

    #[test]
    fn analytics_serialize_flat() {
        let analytics = SpamAnalytics {
            statistics: SpamStatistics::from_counts(2, 1),
            unread_inbox: 1,
            score_distribution: score_distribution([0, 90]),
            top_spam_keywords: vec![KeywordCount { keyword: "free", count: 3 }],
        };
        let json = serde_json::to_value(&analytics).expect("json");
        assert_eq!(json["totalEmails"], 2);
        assert_eq!(json["unreadInbox"], 1);
        assert_eq!(json["scoreDistribution"][4]["count"], 1);
        assert_eq!(json["topSpamKeywords"][0]["keyword"], "free");
    }
}
