//! Brace-balanced block extraction and signature parsing.
//!
//! These are the shared primitives every entity extractor builds on: given
//! the byte offset where a construct's header begins, [`extract_block`]
//! bounds its `{}`-delimited body, and [`parse_parameters`] /
//! [`parse_properties`] pull structured fields out of the captured signature
//! text. All of them are best-effort on malformed input and never error.

use crate::extract::types::{Parameter, PropertyRecord};

/// Slice length returned when no opening brace exists after the start
/// offset. Bounds the cost of malformed input instead of scanning to EOF.
pub const BLOCK_FALLBACK_LEN: usize = 200;

/// Hard ceiling on bytes examined by a single extraction, for content with
/// an opening brace that never closes.
pub const MAX_SCAN_BYTES: usize = 512 * 1024;

/// Extract the delimiter-balanced block starting at `start`.
///
/// Finds the first `{` at or after `start`, tracks nesting depth, and
/// returns the slice from `start` through the matching `}`. Brace characters
/// inside string literals and line comments are ignored. If no opening brace
/// is found, or depth never returns to zero, a bounded fallback slice is
/// returned instead.
pub fn extract_block(content: &str, start: usize) -> &str {
    let start = floor_char_boundary(content, start.min(content.len()));
    let rest = &content[start..];

    let Some(open_rel) = find_opening_brace(rest) else {
        return clamp_slice(rest, BLOCK_FALLBACK_LEN);
    };

    let mut depth = 0usize;
    let mut in_string: Option<u8> = None;
    let mut escaped = false;
    let mut in_line_comment = false;
    let bytes = rest.as_bytes();
    let limit = bytes.len().min(open_rel + MAX_SCAN_BYTES);

    let mut i = open_rel;
    while i < limit {
        let b = bytes[i];

        if in_line_comment {
            if b == b'\n' {
                in_line_comment = false;
            }
            i += 1;
            continue;
        }

        if let Some(q) = in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == q {
                in_string = None;
            }
            i += 1;
            continue;
        }

        match b {
            b'"' | b'\'' | b'`' => in_string = Some(b),
            b'/' if i + 1 < limit && bytes[i + 1] == b'/' => in_line_comment = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    let end = ceil_char_boundary(rest, i + 1);
                    return &rest[..end];
                }
            }
            _ => {}
        }
        i += 1;
    }

    // Unbalanced: return what we saw up to the ceiling.
    clamp_slice(rest, limit.max(BLOCK_FALLBACK_LEN))
}

/// Find the first `{` that is not inside a string literal, within a bounded
/// lookahead from the start of `rest`.
fn find_opening_brace(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let limit = bytes.len().min(MAX_SCAN_BYTES);
    let mut in_string: Option<u8> = None;
    let mut escaped = false;
    let mut saw_terminator = false;
    for (i, &b) in bytes[..limit].iter().enumerate() {
        if let Some(q) = in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == q {
                in_string = None;
            }
            continue;
        }
        match b {
            b'"' | b'\'' | b'`' => in_string = Some(b),
            b'{' => return Some(i),
            b';' => saw_terminator = true,
            // A statement terminator before any brace means the construct
            // has no block body (e.g. a type alias or expression arrow).
            b'\n' if saw_terminator => return None,
            _ => {}
        }
    }
    None
}

fn clamp_slice(s: &str, max: usize) -> &str {
    if s.len() <= max {
        s
    } else {
        &s[..floor_char_boundary(s, max)]
    }
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    idx = idx.min(s.len());
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(s: &str, mut idx: usize) -> usize {
    while idx < s.len() && !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx.min(s.len())
}

/// 1-based line number of a byte offset.
pub fn line_of_offset(content: &str, offset: usize) -> usize {
    let offset = offset.min(content.len());
    content[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}

/// Truncate a snippet to `max` bytes at a char boundary.
pub fn cap_snippet(code: &str, max: usize) -> String {
    if code.len() <= max {
        code.to_string()
    } else {
        code[..floor_char_boundary(code, max)].to_string()
    }
}

/// Parse a parenthesized parameter list out of a signature fragment.
///
/// Accepts either the full `(a: string, b = 3)` text or the inner list.
/// Splits at top-level commas only, respecting nested `()`, `[]`, `{}`, `<>`
/// and string literals. Each entry yields a name, an optional `: type`
/// annotation, an optional `= default`, and a `?` optionality marker.
/// Malformed text produces a best-effort (possibly empty) list.
pub fn parse_parameters(signature: &str) -> Vec<Parameter> {
    let inner = match (signature.find('('), signature.rfind(')')) {
        (Some(open), Some(close)) if close > open => &signature[open + 1..close],
        _ => signature,
    };
    split_top_level(inner)
        .into_iter()
        .filter_map(parse_single_parameter)
        .collect()
}

fn parse_single_parameter(raw: &str) -> Option<Parameter> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let (decl, default_value) = match split_once_default(raw) {
        Some((lhs, rhs)) => (lhs.trim(), Some(rhs.trim().to_string())),
        None => (raw, None),
    };

    let (name_part, param_type) = match split_once_top_level(decl, ':') {
        Some((lhs, rhs)) => (lhs.trim(), Some(rhs.trim().to_string())),
        None => (decl, None),
    };

    let optional = name_part.ends_with('?') || default_value.is_some();
    let name = name_part
        .trim_end_matches('?')
        .trim_start_matches("...")
        .trim()
        .to_string();
    if name.is_empty() {
        return None;
    }

    Some(Parameter {
        name,
        param_type,
        default_value,
        optional,
    })
}

/// Parse interface-body property lines into records.
///
/// Expects the text between the interface's braces; each line of the form
/// `name?: Type;` becomes a property. Methods, comments, and nested blocks
/// are skipped.
pub fn parse_properties(body: &str) -> Vec<PropertyRecord> {
    let mut props = Vec::new();
    for line in body.lines() {
        let line = line.trim().trim_end_matches([';', ',']);
        if line.is_empty()
            || line.starts_with("//")
            || line.starts_with('*')
            || line.starts_with("/*")
            || line == "{"
            || line == "}"
        {
            continue;
        }
        // Methods have a parameter list before the colon.
        if line.split(':').next().is_some_and(|head| head.contains('(')) {
            continue;
        }
        let Some((name_part, type_part)) = split_once_top_level(line, ':') else {
            continue;
        };
        let name_part = strip_modifiers(name_part.trim());
        let optional = name_part.ends_with('?');
        let name = name_part.trim_end_matches('?').to_string();
        if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$') {
            continue;
        }
        props.push(PropertyRecord {
            name,
            prop_type: Some(type_part.trim().to_string()),
            optional,
        });
    }
    props
}

/// Strip leading TypeScript member modifiers from a property name.
fn strip_modifiers(mut s: &str) -> &str {
    loop {
        let mut stripped = false;
        for modifier in ["readonly ", "public ", "private ", "protected ", "static "] {
            if let Some(rest) = s.strip_prefix(modifier) {
                s = rest.trim_start();
                stripped = true;
            }
        }
        if !stripped {
            return s;
        }
    }
}

/// Split at top-level commas, respecting bracket nesting and strings.
fn split_top_level(s: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut angle = 0i32;
    let mut in_string: Option<char> = None;
    let mut escaped = false;
    let mut start = 0;

    for (i, ch) in s.char_indices() {
        if let Some(q) = in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                in_string = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' | '`' => in_string = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            '<' => angle += 1,
            '>' => angle = (angle - 1).max(0),
            ',' if depth == 0 && angle == 0 => {
                parts.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}

/// Split at the first top-level `=` that introduces a default value. A `=`
/// that is part of `=>`, `==`, `>=`, `<=`, or `!=` (arrow types, comparisons
/// inside defaults) does not count.
fn split_once_default(s: &str) -> Option<(&str, &str)> {
    let mut depth = 0i32;
    let mut angle = 0i32;
    let mut in_string: Option<char> = None;
    let mut escaped = false;
    let bytes = s.as_bytes();

    for (i, ch) in s.char_indices() {
        if let Some(q) = in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                in_string = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' | '`' => in_string = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            '<' => angle += 1,
            '>' => angle = (angle - 1).max(0),
            '=' if depth == 0 && angle == 0 => {
                let prev = i.checked_sub(1).map(|p| bytes[p]);
                let next = bytes.get(i + 1).copied();
                if matches!(prev, Some(b'!' | b'<' | b'>' | b'='))
                    || matches!(next, Some(b'>' | b'='))
                {
                    continue;
                }
                return Some((&s[..i], &s[i + 1..]));
            }
            _ => {}
        }
    }
    None
}

/// Split at the first top-level occurrence of `sep`, if any.
fn split_once_top_level(s: &str, sep: char) -> Option<(&str, &str)> {
    let mut depth = 0i32;
    let mut angle = 0i32;
    let mut in_string: Option<char> = None;
    let mut escaped = false;

    for (i, ch) in s.char_indices() {
        if let Some(q) = in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                in_string = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' | '`' => in_string = Some(ch),
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            '<' => angle += 1,
            '>' => angle = (angle - 1).max(0),
            c if c == sep && depth == 0 && angle == 0 => {
                return Some((&s[..i], &s[i + 1..]));
            }
            _ => {}
        }
    }
    None
}
