//! The analysis assembler.
//!
//! [`Analyzer`] is a plain value constructed per call (or per worker);
//! there is no process-wide state and no accessor singleton. `analyze` runs
//! the per-file extractors and the security scan under a rayon fork-join,
//! merges the per-file results in input order, runs the cross-reference
//! pass, and assembles the one immutable [`ComprehensiveAnalysis`]. It does
//! no parsing of its own.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::Config;
use crate::extract::{
    collect_env_vars, cross_reference, extract_file, ClassRecord, ComponentRecord,
    DataModelRecord, EnvVarMap, FileExtraction, FunctionRecord, HookRecord, InterfaceRecord,
    ModuleRecord, RouteRecord, TypeAliasRecord,
};
use crate::quality::{detect_patterns, quality_score};
use crate::security::{self, SecurityIssue, SecurityReport, Vulnerability};
use crate::stats::{compute_stats, CodebaseStats};
use crate::files::SourceFile;

/// The immutable result of one `analyze` call.
///
/// Entity lists are flat and insertion-ordered (input file order, declared
/// rule order within a file). Re-analysis replaces the whole value; nothing
/// mutates it afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComprehensiveAnalysis {
    pub functions: Vec<FunctionRecord>,
    pub classes: Vec<ClassRecord>,
    pub interfaces: Vec<InterfaceRecord>,
    pub type_aliases: Vec<TypeAliasRecord>,
    pub routes: Vec<RouteRecord>,
    pub modules: Vec<ModuleRecord>,
    pub data_models: Vec<DataModelRecord>,
    pub hooks: Vec<HookRecord>,
    pub components: Vec<ComponentRecord>,
    pub env_vars: EnvVarMap,
    pub security_issues: Vec<SecurityIssue>,
    pub vulnerabilities: Vec<Vulnerability>,
    /// 0-100, higher is better.
    pub security_score: u32,
    /// 0-100, higher is better.
    pub quality_score: u32,
    pub patterns: BTreeSet<String>,
    pub stats: CodebaseStats,
}

/// The engine. Holds only configuration; every call builds fresh
/// accumulators.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: Config,
}

impl Analyzer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Analyze a file set. Synchronous, no I/O, always returns a result:
    /// failures degrade per file and per entity kind, never abort the run.
    pub fn analyze(&self, files: &[SourceFile]) -> ComprehensiveAnalysis {
        // Per-file work is embarrassingly parallel; the indexed collect
        // keeps merge order equal to input order, so completion order never
        // shows in the output.
        let per_file: Vec<(FileExtraction, Vec<SecurityIssue>, EnvVarMap)> = files
            .par_iter()
            .map(|file| {
                let extraction = extract_file(file, &self.config);
                let issues = security::scan_file(file, &self.config);
                let mut env = EnvVarMap::new();
                collect_env_vars(file, &mut env);
                (extraction, issues, env)
            })
            .collect();

        let mut analysis = ComprehensiveAnalysis::default();
        let mut raw_issues = Vec::new();
        for (extraction, issues, env) in per_file {
            analysis.functions.extend(extraction.functions);
            analysis.classes.extend(extraction.classes);
            analysis.interfaces.extend(extraction.interfaces);
            analysis.type_aliases.extend(extraction.type_aliases);
            analysis.routes.extend(extraction.routes);
            analysis.modules.extend(extraction.modules);
            analysis.data_models.extend(extraction.models);
            analysis.hooks.extend(extraction.hooks);
            analysis.components.extend(extraction.components);
            raw_issues.extend(issues);
            for (name, referencing) in env {
                analysis.env_vars.entry(name).or_default().extend(referencing);
            }
        }

        cross_reference(&mut analysis.functions);

        let SecurityReport {
            issues,
            vulnerabilities,
            score,
        } = security::build_report(raw_issues);
        analysis.security_issues = issues;
        analysis.vulnerabilities = vulnerabilities;
        analysis.security_score = score;

        analysis.patterns = detect_patterns(files);
        analysis.quality_score = quality_score(
            files,
            &analysis.functions,
            &analysis.patterns,
            &self.config,
        );
        analysis.stats = compute_stats(files, &analysis.functions);

        tracing::debug!(
            files = files.len(),
            functions = analysis.functions.len(),
            issues = analysis.security_issues.len(),
            security_score = analysis.security_score,
            quality_score = analysis.quality_score,
            "analysis complete"
        );
        analysis
    }
}

/// Analyze with the default configuration. The library's front door.
pub fn analyze(files: &[SourceFile]) -> ComprehensiveAnalysis {
    Analyzer::default().analyze(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let analysis = analyze(&[]);
        assert_eq!(analysis.stats.total_files, 0);
        assert_eq!(analysis.quality_score, 100);
        assert_eq!(analysis.security_score, 100);
        assert!(analysis.functions.is_empty());
        assert!(analysis.routes.is_empty());
        assert!(analysis.env_vars.is_empty());
    }

    #[test]
    fn test_determinism() {
        let files = vec![
            SourceFile::new("src/a.ts", "export function a() { return b(); }\n"),
            SourceFile::new("src/b.ts", "export function b() { return 1; }\n"),
        ];
        let first = analyze(&files);
        let second = analyze(&files);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_shuffle_invariance() {
        let a = SourceFile::new("src/a.ts", "export function alpha() { return 1; }\n");
        let b = SourceFile::new(
            "src/b.ts",
            "const KEY_SECRET = \"abcdefgh12345678\";\nexport function beta() { return 2; }\n",
        );
        let forward = analyze(&[a.clone(), b.clone()]);
        let reversed = analyze(&[b, a]);

        let names = |r: &ComprehensiveAnalysis| {
            let mut v: Vec<String> = r.functions.iter().map(|f| f.name.clone()).collect();
            v.sort();
            v
        };
        assert_eq!(names(&forward), names(&reversed));
        assert_eq!(forward.security_score, reversed.security_score);
        assert_eq!(forward.quality_score, reversed.quality_score);
        assert_eq!(forward.stats.total_lines, reversed.stats.total_lines);
        assert_eq!(forward.stats.files_by_language, reversed.stats.files_by_language);
        assert_eq!(forward.env_vars, reversed.env_vars);
    }

    #[test]
    fn test_cross_reference_populated() {
        let files = vec![SourceFile::new(
            "src/flow.ts",
            "function callee() { return 1; }\nfunction caller() { return callee(); }\n",
        )];
        let analysis = analyze(&files);
        let callee = analysis
            .functions
            .iter()
            .find(|f| f.name == "callee")
            .unwrap();
        assert_eq!(callee.called_by, vec!["caller"]);
    }
}
