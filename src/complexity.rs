//! Cyclomatic-style complexity approximation.
//!
//! Start at 1 and add 1 for each branching or logical token: `if`, `else`,
//! `for`, `while`, `case`, `catch`, `&&`, `||`, and the ternary `?`. This is
//! a deterministic token count, not a control-flow-graph computation; it is
//! intentionally cheap and tolerates arbitrary input.

use once_cell::sync::Lazy;
use regex::Regex;

static BRANCH_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:if|else|for|while|case|catch)\b").unwrap());

/// Compute the approximate complexity of an extracted body.
///
/// Empty input yields 1 (the baseline path).
pub fn complexity_of(body: &str) -> u32 {
    let mut score = 1u32;

    score += BRANCH_KEYWORDS.find_iter(body).count() as u32;
    score += body.matches("&&").count() as u32;
    score += body.matches("||").count() as u32;
    score += ternary_count(body);

    score
}

/// Count ternary `?` occurrences, excluding optional chaining (`?.`) and
/// nullish coalescing (`??`).
fn ternary_count(body: &str) -> u32 {
    let bytes = body.as_bytes();
    let mut count = 0u32;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'?' {
            let next = bytes.get(i + 1).copied();
            if next == Some(b'?') {
                i += 2;
                continue;
            }
            if next != Some(b'.') {
                count += 1;
            }
        }
        i += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_one() {
        assert_eq!(complexity_of(""), 1);
    }

    #[test]
    fn test_straight_line_is_one() {
        assert_eq!(complexity_of("const a = 1;\nreturn a + 2;"), 1);
    }

    #[test]
    fn test_three_ifs_and_one_and() {
        let body = r#"
            if (a) { x(); }
            if (b) { y(); }
            if (c && d) { z(); }
        "#;
        assert_eq!(complexity_of(body), 5);
    }

    #[test]
    fn test_keywords_need_word_boundary() {
        // "iffy" and "catchall" must not count.
        assert_eq!(complexity_of("const iffy = catchall;"), 1);
    }

    #[test]
    fn test_ternary_counted_chaining_excluded() {
        assert_eq!(complexity_of("const v = a ? b : c;"), 2);
        assert_eq!(complexity_of("const v = a?.b;"), 1);
        assert_eq!(complexity_of("const v = a ?? b;"), 1);
    }

    #[test]
    fn test_loop_and_switch_tokens() {
        let body = r#"
            for (let i = 0; i < n; i++) {
                while (pending) {
                    switch (kind) {
                        case 1: break;
                        case 2: break;
                    }
                }
            }
        "#;
        // for + while + 2x case = 4, plus baseline 1.
        assert_eq!(complexity_of(body), 5);
    }
}
