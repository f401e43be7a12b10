//! Analyzer configuration.
//!
//! Every knob has a default, so `Config::default()` is a complete, working
//! configuration; a YAML file only needs the keys it wants to change. The
//! engine itself never reads the filesystem — loading is for the CLI.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parsing config file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Tunable thresholds and caps for one analysis run.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Byte cap for stored code snippets.
    pub max_snippet_len: usize,
    /// Body line count above which a function is penalized as too long.
    pub long_function_lines: usize,
    /// Leading-whitespace column count that marks a deeply nested file.
    pub deep_nesting_columns: usize,
    /// Average complexity above this costs a quality penalty.
    pub complexity_warn: u32,
    /// Average complexity above this costs the larger penalty.
    pub complexity_high: u32,
    /// Lines inspected on each side of a match by false-positive filters.
    /// A policy knob, not a correctness bound.
    pub suppress_window: usize,
    /// Glob patterns excluded from the CLI walk (the library never walks).
    pub exclude: Vec<String>,
    /// Whether the CLI walk includes test files.
    pub include_tests: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_snippet_len: 1200,
            long_function_lines: 50,
            deep_nesting_columns: 24,
            complexity_warn: 10,
            complexity_high: 20,
            suppress_window: 8,
            exclude: Vec::new(),
            include_tests: false,
        }
    }
}

impl Config {
    /// Parse a configuration from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Check whether a path matches any exclusion glob.
    pub fn is_path_excluded(&self, path: &Path) -> bool {
        if self.exclude.is_empty() {
            return false;
        }
        let path_str = path.to_string_lossy();
        for pattern in &self.exclude {
            if let Ok(glob) = globset::Glob::new(pattern) {
                if glob.compile_matcher().is_match(&*path_str) {
                    return true;
                }
            }
        }
        false
    }
}
