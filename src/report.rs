//! Output formatting for analysis results.
//!
//! Three formats:
//! - Pretty: colored terminal summary for human readability
//! - JSON: the full analysis plus a summary envelope, for programmatic use
//! - SARIF: security findings in Static Analysis Results Interchange Format
//!   for IDE/CI integration

use colored::*;
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::analyzer::ComprehensiveAnalysis;
use crate::security::{SecurityIssue, Severity};

// =============================================================================
// JSON Format
// =============================================================================

/// Envelope around the serialized analysis.
#[derive(Serialize, Deserialize)]
pub struct JsonReport {
    pub version: String,
    pub path: String,
    pub files_scanned: usize,
    pub security_score: u32,
    pub quality_score: u32,
    pub entity_counts: EntityCounts,
    pub analysis: ComprehensiveAnalysis,
}

/// Per-kind entity totals for quick consumption.
#[derive(Serialize, Deserialize)]
pub struct EntityCounts {
    pub functions: usize,
    pub classes: usize,
    pub interfaces: usize,
    pub type_aliases: usize,
    pub routes: usize,
    pub modules: usize,
    pub data_models: usize,
    pub hooks: usize,
    pub components: usize,
}

impl EntityCounts {
    fn of(analysis: &ComprehensiveAnalysis) -> Self {
        Self {
            functions: analysis.functions.len(),
            classes: analysis.classes.len(),
            interfaces: analysis.interfaces.len(),
            type_aliases: analysis.type_aliases.len(),
            routes: analysis.routes.len(),
            modules: analysis.modules.len(),
            data_models: analysis.data_models.len(),
            hooks: analysis.hooks.len(),
            components: analysis.components.len(),
        }
    }
}

/// Write the JSON report to a writer.
pub fn write_json<W: Write>(
    out: &mut W,
    path: &str,
    analysis: &ComprehensiveAnalysis,
) -> anyhow::Result<()> {
    let report = JsonReport {
        version: env!("CARGO_PKG_VERSION").to_string(),
        path: path.to_string(),
        files_scanned: analysis.stats.total_files,
        security_score: analysis.security_score,
        quality_score: analysis.quality_score,
        entity_counts: EntityCounts::of(analysis),
        analysis: analysis.clone(),
    };
    let json = serde_json::to_string_pretty(&report)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write the colored terminal summary.
pub fn write_pretty(path: &str, analysis: &ComprehensiveAnalysis) {
    println!();
    println!("{} {}", "Analyzed".bold(), path.bold());
    println!(
        "  {} files, {} lines ({} code / {} comment / {} blank)",
        analysis.stats.total_files,
        analysis.stats.total_lines,
        analysis.stats.code_lines,
        analysis.stats.comment_lines,
        analysis.stats.blank_lines,
    );
    println!();

    println!("{}", "Entities".bold());
    let counts = EntityCounts::of(analysis);
    print_count("functions", counts.functions);
    print_count("classes", counts.classes);
    print_count("interfaces", counts.interfaces);
    print_count("type aliases", counts.type_aliases);
    print_count("API routes", counts.routes);
    print_count("modules", counts.modules);
    print_count("data models", counts.data_models);
    print_count("hooks", counts.hooks);
    print_count("components", counts.components);
    print_count("env vars", analysis.env_vars.len());
    println!();

    if !analysis.patterns.is_empty() {
        let tags: Vec<&str> = analysis.patterns.iter().map(String::as_str).collect();
        println!("{} {}", "Patterns".bold(), tags.join(", ").dimmed());
        println!();
    }

    if !analysis.security_issues.is_empty() {
        println!("{}", "Security findings".bold());
        for issue in &analysis.security_issues {
            println!(
                "  {} {} {}:{}",
                severity_label(issue.severity),
                issue.title,
                issue.file_path.dimmed(),
                issue.line,
            );
        }
        println!();
    }

    println!(
        "{} {}    {} {}",
        "Security score:".bold(),
        score_label(analysis.security_score),
        "Quality score:".bold(),
        score_label(analysis.quality_score),
    );
    println!();
}

fn print_count(label: &str, count: usize) {
    if count > 0 {
        println!("  {:>5}  {}", count, label);
    }
}

fn severity_label(severity: Severity) -> ColoredString {
    let text = format!("[{}]", severity.as_str());
    match severity {
        Severity::Critical => text.red().bold(),
        Severity::High => text.red(),
        Severity::Medium => text.yellow(),
        Severity::Low => text.cyan(),
        Severity::Info => text.dimmed(),
    }
}

fn score_label(score: u32) -> ColoredString {
    let text = format!("{}/100", score);
    match score {
        80..=100 => text.green(),
        50..=79 => text.yellow(),
        _ => text.red(),
    }
}

// =============================================================================
// SARIF Format
// =============================================================================

const SARIF_VERSION: &str = "2.1.0";
const SARIF_SCHEMA: &str = "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json";
const TOOL_NAME: &str = "codescope";
const INFO_URI: &str = "https://github.com/zen-systems/codescope";

#[derive(Serialize, Deserialize)]
struct SarifReport {
    version: String,
    #[serde(rename = "$schema")]
    schema: String,
    runs: Vec<SarifRun>,
}

#[derive(Serialize, Deserialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize, Deserialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize, Deserialize)]
struct SarifDriver {
    name: String,
    version: String,
    #[serde(rename = "informationUri")]
    information_uri: String,
}

#[derive(Serialize, Deserialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Serialize, Deserialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize, Deserialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize, Deserialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifact,
    region: SarifRegion,
}

#[derive(Serialize, Deserialize)]
struct SarifArtifact {
    uri: String,
}

#[derive(Serialize, Deserialize)]
struct SarifRegion {
    #[serde(rename = "startLine")]
    start_line: usize,
}

fn sarif_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical | Severity::High => "error",
        Severity::Medium | Severity::Low => "warning",
        Severity::Info => "note",
    }
}

fn issue_to_sarif(issue: &SecurityIssue) -> SarifResult {
    SarifResult {
        rule_id: issue.category.as_str().to_string(),
        level: sarif_level(issue.severity).to_string(),
        message: SarifMessage {
            text: format!("{}: {}", issue.title, issue.message),
        },
        locations: vec![SarifLocation {
            physical_location: SarifPhysicalLocation {
                artifact_location: SarifArtifact {
                    uri: issue.file_path.clone(),
                },
                region: SarifRegion {
                    start_line: issue.line.max(1),
                },
            },
        }],
    }
}

/// Write the security findings as SARIF.
pub fn write_sarif<W: Write>(out: &mut W, analysis: &ComprehensiveAnalysis) -> anyhow::Result<()> {
    let report = SarifReport {
        version: SARIF_VERSION.to_string(),
        schema: SARIF_SCHEMA.to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: TOOL_NAME.to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    information_uri: INFO_URI.to_string(),
                },
            },
            results: analysis.security_issues.iter().map(issue_to_sarif).collect(),
        }],
    };
    let json = serde_json::to_string_pretty(&report)?;
    writeln!(out, "{}", json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::files::SourceFile;

    #[test]
    fn test_json_report_roundtrip() {
        let analysis = analyze(&[SourceFile::new(
            "src/a.ts",
            "export function a() { return 1; }\n",
        )]);
        let mut buf = Vec::new();
        write_json(&mut buf, "src", &analysis).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed["files_scanned"], 1);
        assert_eq!(parsed["entity_counts"]["functions"], 1);
        assert!(parsed["analysis"]["functions"].is_array());
    }

    #[test]
    fn test_sarif_output_shape() {
        let analysis = analyze(&[SourceFile::new(
            "src/auth.ts",
            "const JWT_SECRET = \"abcdef0123456789ABCDEF\";\n",
        )]);
        let mut buf = Vec::new();
        write_sarif(&mut buf, &analysis).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed["version"], "2.1.0");
        let results = parsed["runs"][0]["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["ruleId"], "hardcoded-secret");
        assert_eq!(results[0]["level"], "error");
        assert_eq!(
            results[0]["locations"][0]["physicalLocation"]["region"]["startLine"],
            1
        );
    }
}
