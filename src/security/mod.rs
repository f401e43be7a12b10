//! Security pattern matching.
//!
//! Every line of every eligible file is tested against the fixed rule table
//! in [`rules`]. Matches pass through the rule's false-positive predicate
//! (inspecting a bounded window of surrounding lines), findings are
//! deduplicated, and the aggregate score is `100 - Σ severity weight`,
//! clamped to [0,100]. The scan never modifies content and is linear in
//! input size: one pass per rule per line.

mod rules;

pub use rules::{weights, IssueCategory, SecurityRule, Severity, SuppressIf, LINE_RULES};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::Config;
use crate::extract::{
    first_handler_offset, has_auth_marker, has_rate_limit_marker, is_route_file, line_of_offset,
};
use crate::files::{Language, SourceFile};

/// A single security finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityIssue {
    pub category: IssueCategory,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub file_path: String,
    pub line: usize,
    pub recommendation: String,
}

/// A vulnerability-class finding with a CWE mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vulnerability {
    pub name: String,
    pub severity: Severity,
    pub description: String,
    pub file_path: String,
    pub line: usize,
    pub recommendation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwe_id: Option<String>,
}

/// Everything the matcher produces for one file set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SecurityReport {
    pub issues: Vec<SecurityIssue>,
    pub vulnerabilities: Vec<Vulnerability>,
    /// `clamp(100 - Σ severity weight, 0, 100)`.
    pub score: u32,
}

/// Whether a file participates in the line scan. Prose and markup formats
/// are skipped; everything else (including config formats, which do carry
/// secrets) is scanned.
fn is_eligible(language: Language) -> bool {
    !matches!(language, Language::Markdown | Language::Html)
}

/// Scan a full file set and produce the aggregate report.
pub fn scan_files(files: &[SourceFile], config: &Config) -> SecurityReport {
    let mut issues = Vec::new();
    for file in files {
        issues.extend(scan_file(file, config));
    }
    build_report(issues)
}

/// Assemble a report (dedup, vulnerabilities, score) from raw findings.
pub fn build_report(raw: Vec<SecurityIssue>) -> SecurityReport {
    let mut seen: HashSet<(IssueCategory, String, usize, String)> = HashSet::new();
    let mut issues = Vec::new();
    for issue in raw {
        let key = (
            issue.category,
            issue.file_path.clone(),
            issue.line,
            issue.title.clone(),
        );
        if seen.insert(key) {
            issues.push(issue);
        }
    }

    let vulnerabilities = issues
        .iter()
        .filter_map(|issue| {
            let cwe = cwe_for_category(issue.category)?;
            Some(Vulnerability {
                name: issue.title.clone(),
                severity: issue.severity,
                description: issue.message.clone(),
                file_path: issue.file_path.clone(),
                line: issue.line,
                recommendation: issue.recommendation.clone(),
                cwe_id: Some(cwe.to_string()),
            })
        })
        .collect();

    let penalty: u32 = issues.iter().map(|i| i.severity.weight()).sum();
    SecurityReport {
        issues,
        vulnerabilities,
        score: 100u32.saturating_sub(penalty),
    }
}

/// CWE id for a category, where the rule table defines one.
fn cwe_for_category(category: IssueCategory) -> Option<&'static str> {
    LINE_RULES
        .iter()
        .find(|r| r.category == category)
        .and_then(|r| r.cwe_id)
}

/// Scan one file: line rules plus the route-handler heuristics.
pub fn scan_file(file: &SourceFile, config: &Config) -> Vec<SecurityIssue> {
    if !is_eligible(file.language()) {
        return Vec::new();
    }

    let lines: Vec<&str> = file.content.lines().collect();
    let mut findings = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        for rule in LINE_RULES.iter() {
            if !rule.pattern.is_match(line) {
                continue;
            }
            if let Some(predicate) = &rule.suppress {
                let lo = idx.saturating_sub(config.suppress_window);
                let hi = (idx + config.suppress_window + 1).min(lines.len());
                if predicate.suppresses(line, &lines[lo..hi]) {
                    continue;
                }
            }
            findings.push(SecurityIssue {
                category: rule.category,
                severity: rule.severity,
                title: rule.title.to_string(),
                message: format!("{} ({})", rule.description, rule.id),
                file_path: file.path.clone(),
                line: idx + 1,
                recommendation: rule.recommendation.to_string(),
            });
        }
    }

    findings.extend(route_heuristics(file));
    findings
}

/// Missing-auth and missing-rate-limit heuristics for route files.
fn route_heuristics(file: &SourceFile) -> Vec<SecurityIssue> {
    if !file.language().is_structural() || !is_route_file(&file.path) {
        return Vec::new();
    }
    let Some(offset) = first_handler_offset(&file.content) else {
        return Vec::new();
    };
    let line = line_of_offset(&file.content, offset);
    let mut findings = Vec::new();

    if !has_auth_marker(&file.content) {
        findings.push(SecurityIssue {
            category: IssueCategory::MissingAuth,
            severity: Severity::Medium,
            title: "Route handler without authentication check".to_string(),
            message: "No known auth-check identifier appears in this route file.".to_string(),
            file_path: file.path.clone(),
            line,
            recommendation: "Verify the session or token before handling the request."
                .to_string(),
        });
    }
    if !has_rate_limit_marker(&file.content) {
        findings.push(SecurityIssue {
            category: IssueCategory::MissingRateLimit,
            severity: Severity::Info,
            title: "Route handler without rate limiting".to_string(),
            message: "No rate-limit identifier appears in this route file.".to_string(),
            file_path: file.path.clone(),
            line,
            recommendation: "Apply a rate limiter to public endpoints.".to_string(),
        });
    }
    findings
}
