//! Pattern rules and the matcher seam.
//!
//! Extractors never embed pattern literals in their scan loops: each entity
//! kind declares an ordered table of [`PatternRule`]s, and the orchestration
//! only sees the [`Matcher`] interface. Rules are tried in declared order
//! and the first successful match wins per scan position; there is no
//! semantic disambiguation.

use regex::Regex;

/// One match produced by a rule scan.
#[derive(Debug, Clone)]
pub struct MatchSpan {
    /// Byte offset where the matched header begins.
    pub start: usize,
    /// Byte offset just past the matched header.
    pub end: usize,
    /// Captured entity name (capture group `name`), if the rule has one.
    pub name: String,
    /// The full matched header text.
    pub header: String,
    /// Captured signature text (capture group `sig`), if the rule has one.
    pub signature: Option<String>,
}

/// The seam every rule sits behind. Rules can be added, tested, and swapped
/// without touching extractor orchestration.
pub trait Matcher: Send + Sync {
    fn scan(&self, text: &str) -> Vec<MatchSpan>;
}

/// A regex-backed pattern rule. The regex should expose a `name` capture
/// group and may expose a `sig` group for the parameter list.
pub struct PatternRule {
    pub id: &'static str,
    pub regex: &'static Regex,
}

impl Matcher for PatternRule {
    fn scan(&self, text: &str) -> Vec<MatchSpan> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps
                    .name("name")
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();
                let signature = caps.name("sig").map(|m| m.as_str().to_string());
                Some(MatchSpan {
                    start: whole.start(),
                    end: whole.end(),
                    name,
                    header: whole.as_str().to_string(),
                    signature,
                })
            })
            .collect()
    }
}

/// Apply an ordered rule list with first-wins overlap resolution.
///
/// A match whose start falls inside a span already claimed by an
/// earlier-declared rule is dropped. Surviving matches come back sorted by
/// position so downstream records stay in file order.
pub fn scan_ordered(rules: &[PatternRule], text: &str) -> Vec<MatchSpan> {
    let mut claimed: Vec<(usize, usize)> = Vec::new();
    let mut spans: Vec<MatchSpan> = Vec::new();

    for rule in rules {
        for span in rule.scan(text) {
            let overlaps = claimed
                .iter()
                .any(|&(s, e)| span.start >= s && span.start < e);
            if overlaps {
                continue;
            }
            claimed.push((span.start, span.end));
            spans.push(span);
        }
    }

    spans.sort_by_key(|s| s.start);
    spans
}

/// Header-flag helpers shared by every extractor: flags are derived by
/// substring presence in the matched header, nothing deeper.
pub fn header_is_exported(header: &str) -> bool {
    header.contains("export ") || header.contains("module.exports")
}

pub fn header_is_async(header: &str) -> bool {
    header.contains("async ")
}
