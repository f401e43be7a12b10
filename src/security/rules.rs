//! The security rule set.
//!
//! One fixed, ordered table of line rules. Each rule is a pattern plus
//! metadata (category, severity, remediation, optional CWE) and an optional
//! false-positive predicate. Rules are data; the scan loop in the parent
//! module never special-cases any of them.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Finding severity. Weights feed the security score; critical is heaviest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

/// Per-severity score weights.
pub mod weights {
    pub const CRITICAL: u32 = 25;
    pub const HIGH: u32 = 15;
    pub const MEDIUM: u32 = 8;
    pub const LOW: u32 = 3;
    pub const INFO: u32 = 1;
}

impl Severity {
    pub fn weight(&self) -> u32 {
        match self {
            Severity::Critical => weights::CRITICAL,
            Severity::High => weights::HIGH,
            Severity::Medium => weights::MEDIUM,
            Severity::Low => weights::LOW,
            Severity::Info => weights::INFO,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Vulnerability classes the rules detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCategory {
    HardcodedSecret,
    SqlInjection,
    NosqlInjection,
    XssSink,
    DynamicEval,
    PathTraversal,
    WeakHash,
    WeakRandom,
    PermissiveCors,
    MissingAuth,
    MissingRateLimit,
}

impl IssueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::HardcodedSecret => "hardcoded-secret",
            IssueCategory::SqlInjection => "sql-injection",
            IssueCategory::NosqlInjection => "nosql-injection",
            IssueCategory::XssSink => "xss-sink",
            IssueCategory::DynamicEval => "dynamic-eval",
            IssueCategory::PathTraversal => "path-traversal",
            IssueCategory::WeakHash => "weak-hash",
            IssueCategory::WeakRandom => "weak-random",
            IssueCategory::PermissiveCors => "permissive-cors",
            IssueCategory::MissingAuth => "missing-auth",
            IssueCategory::MissingRateLimit => "missing-rate-limit",
        }
    }
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A false-positive predicate attached to a rule. Explicit and composable
/// so it can be unit-tested apart from the scan loop.
#[derive(Debug, Clone, Copy)]
pub enum SuppressIf {
    /// Any marker appears on the matched line itself.
    LineContains(&'static [&'static str]),
    /// Any marker appears within the configured window around the match.
    WindowContains(&'static [&'static str]),
}

impl SuppressIf {
    /// Evaluate the predicate. `line` is the matched line; `window` is the
    /// surrounding slice including the line itself.
    pub fn suppresses(&self, line: &str, window: &[&str]) -> bool {
        match self {
            SuppressIf::LineContains(markers) => {
                markers.iter().any(|m| line.contains(m))
            }
            SuppressIf::WindowContains(markers) => window
                .iter()
                .any(|candidate| markers.iter().any(|m| candidate.contains(m))),
        }
    }
}

/// One line rule.
pub struct SecurityRule {
    pub id: &'static str,
    pub category: IssueCategory,
    pub severity: Severity,
    pub pattern: &'static Regex,
    pub title: &'static str,
    pub description: &'static str,
    pub recommendation: &'static str,
    /// Present for vulnerability-class rules; these also emit a
    /// `Vulnerability` record.
    pub cwe_id: Option<&'static str>,
    pub suppress: Option<SuppressIf>,
}

lazy_static! {
    static ref HARDCODED_SECRET: Regex = Regex::new(
        r#"(?i)\b[a-z_]*(?:api[_-]?key|apikey|secret|password|passwd|token|private[_-]?key)[a-z0-9_]*\s*[:=]\s*["'][^"']{8,}["']"#
    )
    .unwrap();
    static ref SQL_CONCAT: Regex = Regex::new(
        r#"(?i)["'][^"'\n]*\b(?:select|insert|update|delete)\b[^"'\n]*["']\s*\+"#
    )
    .unwrap();
    static ref SQL_TEMPLATE: Regex = Regex::new(
        r"(?i)`[^`\n]*\b(?:select|insert|update|delete)\b[^`\n]*\$\{"
    )
    .unwrap();
    static ref NOSQL_INJECTION: Regex = Regex::new(
        r#"\$where\s*:\s*["'`]|\.(?:find|findOne|deleteMany|updateMany)\s*\(\s*req\.(?:body|query|params)"#
    )
    .unwrap();
    static ref XSS_SINK: Regex = Regex::new(
        r"\.(?:innerHTML|outerHTML)\s*=|document\.write\s*\("
    )
    .unwrap();
    static ref DANGEROUS_HTML: Regex = Regex::new(r"dangerouslySetInnerHTML").unwrap();
    static ref DYNAMIC_EVAL: Regex =
        Regex::new(r"\beval\s*\(|new\s+Function\s*\(").unwrap();
    static ref PATH_TRAVERSAL: Regex = Regex::new(
        r"(?:readFile|writeFile|createReadStream|createWriteStream|unlink|rm)\w*\s*\([^)\n]*req\.(?:params|query|body)"
    )
    .unwrap();
    static ref WEAK_HASH: Regex =
        Regex::new(r#"createHash\s*\(\s*["'](?:md5|sha1)["']"#).unwrap();
    static ref WEAK_RANDOM: Regex = Regex::new(
        r"(?i)(?:token|secret|password|otp|nonce|session)\w*\s*=[^\n]*Math\.random"
    )
    .unwrap();
    static ref PERMISSIVE_CORS: Regex = Regex::new(
        r#"(?i)access-control-allow-origin["']?\s*[,:]\s*["']\*|\borigin\s*:\s*["']\*["']"#
    )
    .unwrap();

    /// The fixed rule table, in declared order.
    pub static ref LINE_RULES: Vec<SecurityRule> = vec![
        SecurityRule {
            id: "hardcoded-secret-literal",
            category: IssueCategory::HardcodedSecret,
            severity: Severity::Critical,
            pattern: &HARDCODED_SECRET,
            title: "Hardcoded secret literal",
            description: "A credential-like identifier is assigned a string literal.",
            recommendation: "Move the value to an environment variable or secret manager.",
            cwe_id: Some("CWE-798"),
            suppress: Some(SuppressIf::LineContains(&[
                "process.env",
                "example",
                "placeholder",
                "your-",
                "changeme",
                "xxxx",
                "${",
            ])),
        },
        SecurityRule {
            id: "sql-string-concat",
            category: IssueCategory::SqlInjection,
            severity: Severity::High,
            pattern: &SQL_CONCAT,
            title: "SQL built by string concatenation",
            description: "A SQL statement is assembled with `+` from runtime values.",
            recommendation: "Use parameterized queries or a query builder.",
            cwe_id: Some("CWE-89"),
            suppress: Some(SuppressIf::WindowContains(&["$1", "prepare", "sql.identifier"])),
        },
        SecurityRule {
            id: "sql-template-interpolation",
            category: IssueCategory::SqlInjection,
            severity: Severity::High,
            pattern: &SQL_TEMPLATE,
            title: "SQL built by template interpolation",
            description: "A SQL template literal interpolates runtime values directly.",
            recommendation: "Use parameterized queries; never interpolate user input into SQL.",
            cwe_id: Some("CWE-89"),
            suppress: Some(SuppressIf::WindowContains(&["$1", "prepare", "sql.identifier"])),
        },
        SecurityRule {
            id: "nosql-unfiltered-query",
            category: IssueCategory::NosqlInjection,
            severity: Severity::High,
            pattern: &NOSQL_INJECTION,
            title: "NoSQL query built from raw request data",
            description: "Request data flows into a NoSQL operator or query object unchecked.",
            recommendation: "Validate and whitelist fields before building the query.",
            cwe_id: Some("CWE-943"),
            suppress: None,
        },
        SecurityRule {
            id: "html-injection-sink",
            category: IssueCategory::XssSink,
            severity: Severity::High,
            pattern: &XSS_SINK,
            title: "Unescaped HTML sink",
            description: "Content is written to an HTML sink without escaping.",
            recommendation: "Escape or sanitize content before it reaches the DOM.",
            cwe_id: Some("CWE-79"),
            suppress: Some(SuppressIf::WindowContains(&["DOMPurify", "sanitize", "escapeHtml"])),
        },
        SecurityRule {
            id: "react-dangerous-html",
            category: IssueCategory::XssSink,
            severity: Severity::Medium,
            pattern: &DANGEROUS_HTML,
            title: "dangerouslySetInnerHTML usage",
            description: "Raw HTML is injected through dangerouslySetInnerHTML.",
            recommendation: "Sanitize the HTML or render structured content instead.",
            cwe_id: Some("CWE-79"),
            suppress: Some(SuppressIf::WindowContains(&["DOMPurify", "sanitize"])),
        },
        SecurityRule {
            id: "dynamic-code-eval",
            category: IssueCategory::DynamicEval,
            severity: Severity::High,
            pattern: &DYNAMIC_EVAL,
            title: "Dynamic code evaluation",
            description: "Code is evaluated from a runtime string.",
            recommendation: "Remove eval/new Function; use data, not code.",
            cwe_id: Some("CWE-95"),
            suppress: None,
        },
        SecurityRule {
            id: "path-from-request",
            category: IssueCategory::PathTraversal,
            severity: Severity::High,
            pattern: &PATH_TRAVERSAL,
            title: "File operation on request-derived path",
            description: "A filesystem path is built from request data.",
            recommendation: "Resolve against a fixed base directory and reject traversal segments.",
            cwe_id: Some("CWE-22"),
            suppress: Some(SuppressIf::WindowContains(&["basename", "normalize"])),
        },
        SecurityRule {
            id: "weak-hash-algorithm",
            category: IssueCategory::WeakHash,
            severity: Severity::Medium,
            pattern: &WEAK_HASH,
            title: "Weak hash algorithm",
            description: "MD5/SHA-1 are unsuitable for security-sensitive hashing.",
            recommendation: "Use SHA-256 or stronger; bcrypt/argon2 for passwords.",
            cwe_id: Some("CWE-328"),
            suppress: Some(SuppressIf::WindowContains(&["checksum", "etag", "non-cryptographic"])),
        },
        SecurityRule {
            id: "weak-random-secret",
            category: IssueCategory::WeakRandom,
            severity: Severity::Medium,
            pattern: &WEAK_RANDOM,
            title: "Security value from Math.random",
            description: "A security-sensitive value is produced by a non-cryptographic RNG.",
            recommendation: "Use crypto.randomBytes or crypto.randomUUID.",
            cwe_id: Some("CWE-338"),
            suppress: None,
        },
        SecurityRule {
            id: "wildcard-cors-origin",
            category: IssueCategory::PermissiveCors,
            severity: Severity::Medium,
            pattern: &PERMISSIVE_CORS,
            title: "Permissive CORS origin",
            description: "Cross-origin requests are allowed from any origin.",
            recommendation: "Restrict allowed origins to known hosts.",
            cwe_id: None,
            suppress: None,
        },
    ];
}
