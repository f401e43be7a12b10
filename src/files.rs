//! Input file model and language classification.
//!
//! The engine never touches the filesystem: callers hand it a list of
//! already-decoded [`SourceFile`]s. Classification tags each file with a
//! [`Language`] and decides whether structural extraction applies.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single input file, owned by the caller and read-only to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
    /// Pre-detected language tag, if the caller has one. When `None`, the
    /// language is derived from the path extension.
    pub language: Option<String>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            language: None,
        }
    }

    /// The effective language for this file: the caller-provided tag when
    /// present, otherwise derived from the extension.
    pub fn language(&self) -> Language {
        match &self.language {
            Some(tag) => Language::from_tag(tag),
            None => Language::from_path(&self.path),
        }
    }
}

/// Recognized languages. Unknown extensions map to `Other` and are simply
/// excluded from structural extraction; this never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    TypeScript,
    Tsx,
    JavaScript,
    Jsx,
    Python,
    Go,
    Rust,
    Java,
    Ruby,
    Php,
    Prisma,
    Css,
    Html,
    Json,
    Yaml,
    Markdown,
    Sql,
    Shell,
    Other,
}

impl Language {
    /// Derive the language from a file path's extension.
    pub fn from_path(path: &str) -> Self {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        match ext {
            "ts" | "mts" | "cts" => Language::TypeScript,
            "tsx" => Language::Tsx,
            "js" | "mjs" | "cjs" => Language::JavaScript,
            "jsx" => Language::Jsx,
            "py" => Language::Python,
            "go" => Language::Go,
            "rs" => Language::Rust,
            "java" => Language::Java,
            "rb" => Language::Ruby,
            "php" => Language::Php,
            "prisma" => Language::Prisma,
            "css" | "scss" | "sass" | "less" => Language::Css,
            "html" | "htm" => Language::Html,
            "json" => Language::Json,
            "yaml" | "yml" => Language::Yaml,
            "md" | "mdx" => Language::Markdown,
            "sql" => Language::Sql,
            "sh" | "bash" | "zsh" => Language::Shell,
            _ => Language::Other,
        }
    }

    /// Map a caller-provided language tag to a [`Language`].
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "typescript" | "ts" => Language::TypeScript,
            "tsx" => Language::Tsx,
            "javascript" | "js" => Language::JavaScript,
            "jsx" => Language::Jsx,
            "python" | "py" => Language::Python,
            "go" | "golang" => Language::Go,
            "rust" | "rs" => Language::Rust,
            "java" => Language::Java,
            "ruby" | "rb" => Language::Ruby,
            "php" => Language::Php,
            "prisma" => Language::Prisma,
            "css" | "scss" => Language::Css,
            "html" => Language::Html,
            "json" => Language::Json,
            "yaml" | "yml" => Language::Yaml,
            "markdown" | "md" => Language::Markdown,
            "sql" => Language::Sql,
            "shell" | "sh" | "bash" => Language::Shell,
            _ => Language::Other,
        }
    }

    /// Whether the general-purpose entity extractors (functions, classes,
    /// interfaces, routes, hooks, components) apply. Only the
    /// JavaScript/TypeScript family carries the constructs those extractors
    /// look for.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Language::TypeScript | Language::Tsx | Language::JavaScript | Language::Jsx
        )
    }

    /// Whether TypeScript-only constructs (interfaces, type aliases) apply.
    pub fn is_typescript(&self) -> bool {
        matches!(self, Language::TypeScript | Language::Tsx)
    }

    /// Stable lowercase name, used as the stats histogram key.
    pub fn name(&self) -> &'static str {
        match self {
            Language::TypeScript => "typescript",
            Language::Tsx => "tsx",
            Language::JavaScript => "javascript",
            Language::Jsx => "jsx",
            Language::Python => "python",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Java => "java",
            Language::Ruby => "ruby",
            Language::Php => "php",
            Language::Prisma => "prisma",
            Language::Css => "css",
            Language::Html => "html",
            Language::Json => "json",
            Language::Yaml => "yaml",
            Language::Markdown => "markdown",
            Language::Sql => "sql",
            Language::Shell => "shell",
            Language::Other => "other",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Line counts for one file, split by kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineCounts {
    pub total: usize,
    pub code: usize,
    pub comment: usize,
    pub blank: usize,
}

/// Count code, comment, and blank lines. Comment detection is line-oriented:
/// `//`, `#`, `*`, `/*`, and `<!--` prefixes count as comments. Block-comment
/// interiors that don't start with `*` are counted as code; the metric is
/// approximate on purpose.
pub fn count_lines(content: &str) -> LineCounts {
    let mut counts = LineCounts::default();
    for line in content.lines() {
        counts.total += 1;
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            counts.blank += 1;
        } else if trimmed.starts_with("//")
            || trimmed.starts_with('#')
            || trimmed.starts_with("/*")
            || trimmed.starts_with('*')
            || trimmed.starts_with("<!--")
        {
            counts.comment += 1;
        } else {
            counts.code += 1;
        }
    }
    counts
}
