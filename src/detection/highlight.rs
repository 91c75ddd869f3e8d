#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl From<regex::Match<'_>> for Span {
    fn from(found: regex::Match<'_>) -> Self {
        Self {
            start: found.start(),
            end: found.end(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub open: &'static str,
    pub close: &'static str,
}

impl Marker {
    pub const HTML: Marker = Marker {
        open: r#"<span class="spam-highlight">"#,
        close: "</span>",
    };

    pub const ANSI: Marker = Marker {
        open: "\x1b[1;31m",
        close: "\x1b[0m",
    };
}

/// Sorts spans and folds overlapping or touching ones together.
pub fn merge(spans: &[Span]) -> Vec<Span> {
    let mut sorted: Vec<Span> = spans.iter().copied().filter(|s| !s.is_empty()).collect();
    sorted.sort_unstable();

    let mut merged: Vec<Span> = Vec::with_capacity(sorted.len());
    for span in sorted {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

pub fn render(text: &str, spans: &[Span], marker: Marker) -> String {
    let merged = merge(spans);
    if merged.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(
        text.len() + merged.len() * (marker.open.len() + marker.close.len()),
    );
    let mut cursor = 0;
    for span in merged {
        out.push_str(&text[cursor..span.start]);
        out.push_str(marker.open);
        out.push_str(&text[span.start..span.end]);
        out.push_str(marker.close);
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// Inverse of [`render`] for texts that do not contain the marker strings themselves.
pub fn strip(markup: &str, marker: Marker) -> String {
    markup.replace(marker.open, "").replace(marker.close, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, end: usize) -> Span {
        Span { start, end }
    }

    #[test]
    fn merge_folds_overlaps_and_neighbours() {
        let merged = merge(&[span(10, 12), span(0, 4), span(2, 6), span(6, 8), span(3, 3)]);
        assert_eq!(merged, vec![span(0, 8), span(10, 12)]);
    }

    #[test]
    fn render_wraps_nested_match_once() {
        let text = "a free gift";
        let out = render(text, &[span(2, 11), span(2, 6)], Marker::HTML);
        assert_eq!(out, r#"a <span class="spam-highlight">free gift</span>"#);
    }

    #[test]
    fn render_without_spans_is_identity() {
        assert_eq!(render("nothing here", &[], Marker::HTML), "nothing here");
    }

    #[test]
    fn strip_restores_plain_text() {
        let text = "Win a prize - claim it now";
        let spans = [span(6, 11), span(14, 19)];
        for marker in [Marker::HTML, Marker::ANSI] {
            let out = render(text, &spans, marker);
            assert_ne!(out, text);
            assert_eq!(strip(&out, marker), text);
        }
    }
}
