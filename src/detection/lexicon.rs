use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use super::highlight::Span;

/// Literal phrases that indicate spam. Matched as plain substrings ignoring
/// ASCII case, so `cost` also fires inside `costume`.
pub const LEXICON: &[&str] = &[
    // financial scams
    "congratulations",
    "winner",
    "claim",
    "prize",
    "free money",
    "get rich",
    "make money",
    "earn cash",
    "work from home",
    "millionaire",
    "investment opportunity",
    "double your income",
    "no risk",
    // urgency
    "urgent",
    "act now",
    "limited time",
    "don't miss out",
    "final notice",
    "hurry",
    "only for today",
    "immediate response",
    "risk-free",
    "exclusive deal",
    // phishing
    "account suspended",
    "verify",
    "update payment",
    "security alert",
    "unusual login",
    "confirm identity",
    "reset password",
    "account risk",
    "unauthorized access",
    "billing issue",
    // giveaways
    "free gift",
    "free trial",
    "free iphone",
    "100% free",
    "no cost",
    "complimentary",
    "special promotion",
    "bonus offer",
    "free access",
    "free membership",
    // shopping
    "best price",
    "huge discount",
    "buy now",
    "lowest price",
    "discount code",
    "sale ends",
    "act fast",
    "limited stock",
    "today only",
    // health
    "miracle cure",
    "weight loss",
    "burn fat",
    "anti-aging",
    "erectile dysfunction",
    "hair loss",
    "instant results",
    "guaranteed success",
    "no doctor",
    // call-to-action
    "click here",
    "open attachment",
    "exclusive offer",
    "no obligation",
    "special deal",
    "hidden charges",
    "get started now",
    "order now",
    // general
    "viagra",
    "cialis",
    "xanax",
    "rolex",
    "replica",
    "lottery",
    "nigerian",
    "inheritance",
    "bank transfer",
    "account number",
    "money back",
    "cost",
    "price",
    "casino",
    "bitcoin",
    "cash bonus",
    "credit",
    "password",
    "social security",
    "SSN",
    "bank account",
    "PayPal",
    "pharmacy",
    "cheap",
    "prescription",
    "medication",
    "enlargement",
    "diet",
];

struct Entry {
    phrase: &'static str,
    matcher: Regex,
}

static ENTRIES: Lazy<Vec<Entry>> = Lazy::new(|| {
    LEXICON
        .iter()
        .map(|&phrase| Entry {
            phrase,
            matcher: RegexBuilder::new(&regex::escape(phrase))
                .case_insensitive(true)
                .unicode(false)
                .build()
                .expect("escaped lexicon phrase is a valid regex"),
        })
        .collect()
});

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LexiconScan {
    pub score: u32,
    /// Lexicon phrases in table order, each at most once.
    pub keywords: Vec<String>,
    pub spans: Vec<Span>,
}

pub fn weight(phrase: &str) -> u32 {
    if phrase.chars().count() > 5 {
        10
    } else {
        5
    }
}

pub fn scan(text: &str) -> LexiconScan {
    let mut out = LexiconScan::default();

    for entry in ENTRIES.iter() {
        let before = out.spans.len();
        out.spans.extend(entry.matcher.find_iter(text).map(Span::from));
        let occurrences = out.spans.len() - before;
        if occurrences == 0 {
            continue;
        }

        let weight = weight(entry.phrase);
        out.score += weight;
        out.keywords.push(entry.phrase.to_string());
        tracing::debug!(
            target: "detection",
            keyword = entry.phrase,
            occurrences,
            weight,
            "lexicon hit"
        );
    }

    out
}
