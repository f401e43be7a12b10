//! Call-site scanning and the cross-reference pass.
//!
//! `calls_to` comes from raw text scanning of an extracted body: every
//! `identifier(` occurrence that is not a language keyword or well-known
//! builtin. This deliberately tolerates false positives. `called_by` is
//! filled in afterwards by inverting the map over all extracted functions.

use lazy_static::lazy_static;
use phf::phf_set;
use regex::Regex;
use std::collections::HashMap;

use crate::extract::types::FunctionRecord;

/// Keywords and builtins that look like call sites but aren't interesting.
static CALL_FILTER: phf::Set<&'static str> = phf_set! {
    // Keywords
    "if", "else", "for", "while", "switch", "catch", "return", "function",
    "typeof", "new", "await", "async", "do", "try", "throw", "delete",
    "void", "in", "of", "instanceof", "yield", "super", "constructor",
    // Ubiquitous builtins
    "require", "import", "console", "parseInt", "parseFloat", "isNaN",
    "String", "Number", "Boolean", "Array", "Object", "Promise", "Set",
    "Map", "Symbol", "JSON", "Math", "Date", "RegExp", "Error", "TypeError",
    "setTimeout", "setInterval", "clearTimeout", "clearInterval", "fetch",
    "encodeURIComponent", "decodeURIComponent", "structuredClone",
};

lazy_static! {
    static ref CALL_SITE: Regex = Regex::new(r"\b([A-Za-z_$][\w$]*)\s*\(").unwrap();
}

/// Collect call-site names from a body, first-seen order, deduplicated.
/// `self_name` is excluded so simple recursion doesn't self-reference.
pub fn calls_in_body(body: &str, self_name: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for caps in CALL_SITE.captures_iter(body) {
        let name = &caps[1];
        if CALL_FILTER.contains(name) || name == self_name {
            continue;
        }
        if !seen.iter().any(|s| s == name) {
            seen.push(name.to_string());
        }
    }
    seen
}

/// Populate `called_by` across a full function list by inverting `calls_to`.
///
/// Callers are recorded in extraction order and deduplicated. Names that
/// resolve to more than one function (same name in different files) all
/// receive the caller; the pass has no cross-file resolution.
pub fn cross_reference(functions: &mut [FunctionRecord]) {
    let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, f) in functions.iter().enumerate() {
        by_name.entry(f.name.clone()).or_default().push(idx);
    }

    let edges: Vec<(usize, String)> = functions
        .iter()
        .flat_map(|f| {
            let caller = f.name.clone();
            f.calls_to
                .iter()
                .filter_map(|callee| by_name.get(callee))
                .flatten()
                .map(move |&callee_idx| (callee_idx, caller.clone()))
                .collect::<Vec<_>>()
        })
        .collect();

    for (callee_idx, caller) in edges {
        let called_by = &mut functions[callee_idx].called_by;
        if !called_by.iter().any(|c| c == &caller) {
            called_by.push(caller);
        }
    }
}
