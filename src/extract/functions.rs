//! Function extraction.
//!
//! Covers the declaration forms the JavaScript/TypeScript family actually
//! uses: `function` declarations, arrow-function assignments, and anonymous
//! function expressions bound to a name. Generator `*` markers and TypeScript
//! return annotations are tolerated in the header.

use lazy_static::lazy_static;
use regex::Regex;

use crate::complexity::complexity_of;
use crate::config::Config;
use crate::extract::block::{cap_snippet, extract_block, line_of_offset, parse_parameters};
use crate::extract::calls::calls_in_body;
use crate::extract::rules::{header_is_async, header_is_exported, scan_ordered, PatternRule};
use crate::extract::types::FunctionRecord;
use crate::files::SourceFile;

lazy_static! {
    static ref FN_DECLARATION: Regex = Regex::new(
        r"(?m)^[ \t]*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*(?P<name>[A-Za-z_$][\w$]*)\s*(?P<sig>\([^)]*\))(?:\s*:\s*[^{\n]+)?"
    )
    .unwrap();
    static ref ARROW_ASSIGNMENT: Regex = Regex::new(
        r"(?m)^[ \t]*(?:export\s+)?(?:const|let|var)\s+(?P<name>[A-Za-z_$][\w$]*)\s*(?::\s*[^=\n]+)?=\s*(?:async\s+)?(?P<sig>\([^)]*\)|[A-Za-z_$][\w$]*)\s*(?::\s*[^=\n{]+)?=>"
    )
    .unwrap();
    static ref FN_EXPRESSION: Regex = Regex::new(
        r"(?m)^[ \t]*(?:export\s+)?(?:const|let|var)\s+(?P<name>[A-Za-z_$][\w$]*)\s*=\s*(?:async\s+)?function\s*\*?\s*[A-Za-z_$]?[\w$]*\s*(?P<sig>\([^)]*\))(?:\s*:\s*[^{\n]+)?"
    )
    .unwrap();
    static ref RETURN_ANNOTATION: Regex =
        Regex::new(r"\)\s*:\s*(?P<ret>[^={]+?)\s*(?:\{|=>|$)").unwrap();
}

/// Ordered function rules; declaration forms take precedence over
/// assignment forms when headers overlap.
pub fn function_rules() -> Vec<PatternRule> {
    vec![
        PatternRule {
            id: "function-declaration",
            regex: &FN_DECLARATION,
        },
        PatternRule {
            id: "arrow-assignment",
            regex: &ARROW_ASSIGNMENT,
        },
        PatternRule {
            id: "function-expression",
            regex: &FN_EXPRESSION,
        },
    ]
}

/// Extract every function in a file.
pub fn extract_functions(file: &SourceFile, config: &Config) -> Vec<FunctionRecord> {
    let rules = function_rules();
    scan_ordered(&rules, &file.content)
        .into_iter()
        .map(|span| {
            build_function(
                &file.path,
                &file.content,
                span.start,
                &span.name,
                &span.header,
                span.signature.as_deref().unwrap_or(""),
                config,
            )
        })
        .collect()
}

/// Build a [`FunctionRecord`] from a matched header. Shared with the class
/// (method) and layer extractors.
pub fn build_function(
    file_path: &str,
    content: &str,
    start: usize,
    name: &str,
    header: &str,
    signature: &str,
    config: &Config,
) -> FunctionRecord {
    let line_start = line_of_offset(content, start);
    let block = extract_block(content, start);
    let line_end = line_start + block.trim_end().matches('\n').count();
    // Complexity over the body only: the header's own tokens (optional `?`
    // markers in particular) must not count.
    let body = match block.find('{') {
        Some(open) => &block[open..],
        None => block,
    };

    FunctionRecord {
        name: name.to_string(),
        file_path: file_path.to_string(),
        line_start,
        line_end,
        code: cap_snippet(block, config.max_snippet_len),
        parameters: parse_parameters(signature),
        return_type: return_annotation(header),
        is_async: header_is_async(header),
        is_exported: header_is_exported(header),
        complexity: complexity_of(body),
        calls_to: calls_in_body(body, name),
        called_by: Vec::new(),
    }
}

/// Pull a TypeScript return annotation out of a matched header, if present.
fn return_annotation(header: &str) -> Option<String> {
    RETURN_ANNOTATION
        .captures(header)
        .and_then(|caps| caps.name("ret"))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}
