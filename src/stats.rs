//! Aggregate codebase statistics.
//!
//! A pure reduction over the file set and the extracted functions. BTree
//! containers and explicit sorts keep the output identical regardless of
//! input order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::extract::FunctionRecord;
use crate::files::{count_lines, SourceFile};

/// How many entries the top-N lists keep.
const TOP_N: usize = 10;

/// One entry in the largest-files list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSize {
    pub path: String,
    pub lines: usize,
}

/// One entry in the most-complex-functions list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionComplexity {
    pub name: String,
    pub file_path: String,
    pub complexity: u32,
}

/// Aggregate statistics for one analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodebaseStats {
    pub total_files: usize,
    pub total_lines: usize,
    pub code_lines: usize,
    pub comment_lines: usize,
    pub blank_lines: usize,
    pub files_by_language: BTreeMap<String, usize>,
    /// Ten largest files by line count.
    pub largest_files: Vec<FileSize>,
    /// Ten highest-complexity functions.
    pub most_complex: Vec<FunctionComplexity>,
}

/// Reduce a file set and function list into stats. An empty input yields
/// all-zero stats.
pub fn compute_stats(files: &[SourceFile], functions: &[FunctionRecord]) -> CodebaseStats {
    let mut stats = CodebaseStats {
        total_files: files.len(),
        ..Default::default()
    };

    let mut sizes: Vec<FileSize> = Vec::with_capacity(files.len());
    for file in files {
        let counts = count_lines(&file.content);
        stats.total_lines += counts.total;
        stats.code_lines += counts.code;
        stats.comment_lines += counts.comment;
        stats.blank_lines += counts.blank;
        *stats
            .files_by_language
            .entry(file.language().name().to_string())
            .or_insert(0) += 1;
        sizes.push(FileSize {
            path: file.path.clone(),
            lines: counts.total,
        });
    }

    sizes.sort_by(|a, b| b.lines.cmp(&a.lines).then_with(|| a.path.cmp(&b.path)));
    sizes.truncate(TOP_N);
    stats.largest_files = sizes;

    let mut complex: Vec<FunctionComplexity> = functions
        .iter()
        .map(|f| FunctionComplexity {
            name: f.name.clone(),
            file_path: f.file_path.clone(),
            complexity: f.complexity,
        })
        .collect();
    complex.sort_by(|a, b| {
        b.complexity
            .cmp(&a.complexity)
            .then_with(|| a.file_path.cmp(&b.file_path))
            .then_with(|| a.name.cmp(&b.name))
    });
    complex.truncate(TOP_N);
    stats.most_complex = complex;

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    fn func(name: &str, file: &str, complexity: u32) -> FunctionRecord {
        FunctionRecord {
            name: name.to_string(),
            file_path: file.to_string(),
            line_start: 1,
            line_end: 2,
            code: String::new(),
            parameters: vec![],
            return_type: None,
            is_async: false,
            is_exported: false,
            complexity,
            calls_to: vec![],
            called_by: vec![],
        }
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let stats = compute_stats(&[], &[]);
        assert_eq!(stats.total_files, 0);
        assert_eq!(stats.total_lines, 0);
        assert!(stats.files_by_language.is_empty());
        assert!(stats.largest_files.is_empty());
        assert!(stats.most_complex.is_empty());
    }

    #[test]
    fn test_line_and_language_counts() {
        let files = vec![
            SourceFile::new("a.ts", "code();\n\n// note\n"),
            SourceFile::new("b.ts", "more();\n"),
            SourceFile::new("c.py", "pass\n"),
        ];
        let stats = compute_stats(&files, &[]);
        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.total_lines, 5);
        assert_eq!(stats.code_lines, 3);
        assert_eq!(stats.comment_lines, 1);
        assert_eq!(stats.blank_lines, 1);
        assert_eq!(stats.files_by_language["typescript"], 2);
        assert_eq!(stats.files_by_language["python"], 1);
    }

    #[test]
    fn test_top_lists_bounded_and_sorted() {
        let files: Vec<_> = (0..15)
            .map(|i| SourceFile::new(format!("f{:02}.ts", i), "x();\n".repeat(i + 1)))
            .collect();
        let functions: Vec<_> = (0..15)
            .map(|i| func(&format!("fn{:02}", i), "a.ts", i as u32))
            .collect();
        let stats = compute_stats(&files, &functions);

        assert_eq!(stats.largest_files.len(), 10);
        assert_eq!(stats.largest_files[0].lines, 15);
        assert!(stats.largest_files.windows(2).all(|w| w[0].lines >= w[1].lines));

        assert_eq!(stats.most_complex.len(), 10);
        assert_eq!(stats.most_complex[0].complexity, 14);
    }

    #[test]
    fn test_order_insensitive() {
        let a = SourceFile::new("a.ts", "one();\n");
        let b = SourceFile::new("b.py", "two\nthree\n");
        let forward = compute_stats(&[a.clone(), b.clone()], &[]);
        let reversed = compute_stats(&[b, a], &[]);
        assert_eq!(forward.total_lines, reversed.total_lines);
        assert_eq!(forward.files_by_language, reversed.files_by_language);
        assert_eq!(forward.largest_files, reversed.largest_files);
    }
}
