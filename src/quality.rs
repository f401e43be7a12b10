//! Framework/architecture pattern detection and quality scoring.
//!
//! Patterns come from presence-testing fixed marker strings across the whole
//! file set (plus `package.json` dependency names when a manifest is
//! present and parseable). The score starts at 100, takes fixed penalties
//! for complexity and size smells, earns fixed bonuses for detected
//! hygiene, and is clamped to [0,100].

use std::collections::BTreeSet;

use crate::config::Config;
use crate::extract::{layer_of_path, FunctionRecord, ModuleKind};
use crate::files::{Language, SourceFile};

/// Penalty and bonus values.
mod points {
    pub const AVG_COMPLEXITY_WARN: i32 = 10;
    pub const AVG_COMPLEXITY_HIGH: i32 = 25;
    pub const PER_LONG_FUNCTION: i32 = 2;
    pub const LONG_FUNCTION_CAP: i32 = 20;
    pub const PER_DEEP_FILE: i32 = 2;
    pub const DEEP_FILE_CAP: i32 = 10;
    pub const TYPE_SYSTEM_BONUS: i32 = 5;
    pub const TESTS_BONUS: i32 = 5;
    pub const VALIDATION_BONUS: i32 = 5;
    pub const MIDDLEWARE_BONUS: i32 = 3;
}

/// Content markers tested per file; first hit anywhere in the set tags the
/// pattern. Path markers are handled separately.
const CONTENT_MARKERS: &[(&str, &str)] = &[
    ("react", "from \"react\""),
    ("react", "from 'react'"),
    ("nextjs", "next/server"),
    ("nextjs", "next/router"),
    ("express", "require('express')"),
    ("express", "from 'express'"),
    ("express", "from \"express\""),
    ("prisma", "@prisma/client"),
    ("tailwindcss", "tailwindcss"),
    ("zod-validation", "from 'zod'"),
    ("zod-validation", "from \"zod\""),
    ("zod-validation", "z.object("),
];

/// `package.json` dependency names mapped to pattern tags.
const DEPENDENCY_MARKERS: &[(&str, &str)] = &[
    ("react", "react"),
    ("nextjs", "next"),
    ("express", "express"),
    ("prisma", "@prisma/client"),
    ("tailwindcss", "tailwindcss"),
    ("zod-validation", "zod"),
];

/// Detect architecture/framework pattern tags across the file set.
pub fn detect_patterns(files: &[SourceFile]) -> BTreeSet<String> {
    let mut patterns = BTreeSet::new();

    for file in files {
        let lang = file.language();
        if lang.is_typescript() {
            patterns.insert("typescript".to_string());
        }
        if lang == Language::Prisma {
            patterns.insert("prisma".to_string());
        }

        let lower_path = file.path.to_lowercase();
        if lower_path.contains(".test.")
            || lower_path.contains(".spec.")
            || lower_path.contains("__tests__")
        {
            patterns.insert("testing".to_string());
        }
        match layer_of_path(&file.path) {
            Some(ModuleKind::Service) => {
                patterns.insert("service-layer".to_string());
            }
            Some(ModuleKind::Controller) => {
                patterns.insert("controller-layer".to_string());
            }
            Some(ModuleKind::Middleware) => {
                patterns.insert("middleware-layer".to_string());
            }
            _ => {}
        }

        for (tag, marker) in CONTENT_MARKERS {
            if file.content.contains(marker) {
                patterns.insert((*tag).to_string());
            }
        }

        if lower_path.ends_with("package.json") {
            collect_manifest_patterns(file, &mut patterns);
        }
    }

    patterns
}

/// Read dependency names out of a `package.json`. A malformed manifest
/// contributes nothing; the analysis proceeds without it.
fn collect_manifest_patterns(file: &SourceFile, patterns: &mut BTreeSet<String>) {
    let parsed: serde_json::Value = match serde_json::from_str(&file.content) {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!(file = %file.path, error = %err, "unreadable dependency manifest, skipping");
            return;
        }
    };
    for section in ["dependencies", "devDependencies"] {
        let Some(deps) = parsed.get(section).and_then(|d| d.as_object()) else {
            continue;
        };
        for (tag, dep) in DEPENDENCY_MARKERS {
            if deps.contains_key(*dep) {
                patterns.insert((*tag).to_string());
            }
        }
    }
}

/// Compute the quality score for a file set.
pub fn quality_score(
    files: &[SourceFile],
    functions: &[FunctionRecord],
    patterns: &BTreeSet<String>,
    config: &Config,
) -> u32 {
    let mut score: i32 = 100;

    if !functions.is_empty() {
        let total: u64 = functions.iter().map(|f| u64::from(f.complexity)).sum();
        let avg = total as f64 / functions.len() as f64;
        if avg > f64::from(config.complexity_high) {
            score -= points::AVG_COMPLEXITY_HIGH;
        } else if avg > f64::from(config.complexity_warn) {
            score -= points::AVG_COMPLEXITY_WARN;
        }
    }

    let long_functions = functions
        .iter()
        .filter(|f| f.line_end.saturating_sub(f.line_start) > config.long_function_lines)
        .count() as i32;
    score -= (long_functions * points::PER_LONG_FUNCTION).min(points::LONG_FUNCTION_CAP);

    let deep_files = files
        .iter()
        .filter(|f| has_deep_nesting(&f.content, config.deep_nesting_columns))
        .count() as i32;
    score -= (deep_files * points::PER_DEEP_FILE).min(points::DEEP_FILE_CAP);

    if patterns.contains("typescript") {
        score += points::TYPE_SYSTEM_BONUS;
    }
    if patterns.contains("testing") {
        score += points::TESTS_BONUS;
    }
    if patterns.contains("zod-validation") {
        score += points::VALIDATION_BONUS;
    }
    if patterns.contains("middleware-layer") {
        score += points::MIDDLEWARE_BONUS;
    }

    score.clamp(0, 100) as u32
}

/// Whether any line's leading whitespace reaches the nesting threshold.
/// Tabs count as four columns.
fn has_deep_nesting(content: &str, threshold_columns: usize) -> bool {
    content.lines().any(|line| {
        let mut columns = 0;
        for ch in line.chars() {
            match ch {
                ' ' => columns += 1,
                '\t' => columns += 4,
                _ => break,
            }
        }
        columns >= threshold_columns && !line.trim().is_empty()
    })
}
