//! Integration tests for the security pattern matcher over the fixture app.

use std::path::PathBuf;

use codescope::{analyze, IssueCategory, Severity, SourceFile};

fn fixture(rel: &str) -> SourceFile {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata");
    let content = std::fs::read_to_string(root.join(rel))
        .unwrap_or_else(|e| panic!("reading fixture {rel}: {e}"));
    SourceFile::new(rel, content)
}

#[test]
fn test_insecure_module_findings() {
    let analysis = analyze(&[fixture("src/lib/insecure.ts")]);

    let find = |category: IssueCategory| {
        analysis
            .security_issues
            .iter()
            .find(|i| i.category == category)
            .unwrap_or_else(|| panic!("missing {category} finding"))
    };

    let secret = find(IssueCategory::HardcodedSecret);
    assert_eq!(secret.severity, Severity::Critical);
    assert_eq!(secret.line, 3);

    let sql = find(IssueCategory::SqlInjection);
    assert_eq!(sql.severity, Severity::High);
    assert_eq!(sql.line, 6);

    let xss = find(IssueCategory::XssSink);
    assert_eq!(xss.line, 10);

    let weak_hash = find(IssueCategory::WeakHash);
    assert_eq!(weak_hash.line, 14);

    let weak_random = find(IssueCategory::WeakRandom);
    assert_eq!(weak_random.line, 18);

    assert_eq!(analysis.security_issues.len(), 5);
}

#[test]
fn test_vulnerabilities_carry_cwe_ids() {
    let analysis = analyze(&[fixture("src/lib/insecure.ts")]);
    assert_eq!(analysis.vulnerabilities.len(), 5);
    assert!(analysis
        .vulnerabilities
        .iter()
        .all(|v| v.cwe_id.is_some()));
    assert!(analysis
        .vulnerabilities
        .iter()
        .any(|v| v.cwe_id.as_deref() == Some("CWE-798")));
    assert!(analysis
        .vulnerabilities
        .iter()
        .any(|v| v.cwe_id.as_deref() == Some("CWE-89")));
}

#[test]
fn test_security_score_reflects_weights() {
    let analysis = analyze(&[fixture("src/lib/insecure.ts")]);
    // critical 25 + high 15 + high 15 + medium 8 + medium 8 = 71 penalty.
    assert_eq!(analysis.security_score, 29);
}

#[test]
fn test_unauthenticated_route_flagged() {
    let analysis = analyze(&[fixture("app/api/status/route.ts")]);
    let categories: Vec<IssueCategory> = analysis
        .security_issues
        .iter()
        .map(|i| i.category)
        .collect();
    assert!(categories.contains(&IssueCategory::MissingAuth));
    assert!(categories.contains(&IssueCategory::MissingRateLimit));
    assert_eq!(analysis.security_score, 100 - 8 - 1);
}

#[test]
fn test_authenticated_route_clean() {
    let analysis = analyze(&[fixture("app/api/users/route.ts")]);
    assert!(analysis.security_issues.is_empty());
    assert_eq!(analysis.security_score, 100);
}

#[test]
fn test_full_fixture_score() {
    let files: Vec<SourceFile> = [
        "app/api/users/route.ts",
        "app/api/status/route.ts",
        "src/services/userService.ts",
        "src/lib/db.ts",
        "src/lib/insecure.ts",
        "src/types.ts",
        "src/hooks/useProfile.ts",
        "src/components/Avatar.tsx",
        "prisma/schema.prisma",
        "package.json",
    ]
    .iter()
    .map(|rel| fixture(rel))
    .collect();
    let analysis = analyze(&files);

    // insecure.ts (71) + status route (8 + 1).
    assert_eq!(analysis.security_score, 20);
    assert_eq!(analysis.security_issues.len(), 7);
}

#[test]
fn test_secret_monotonicity_end_to_end() {
    let clean = SourceFile::new("src/a.ts", "export function ok() { return 1; }\n");
    let baseline = analyze(std::slice::from_ref(&clean));

    let mut leaky = clean.clone();
    leaky
        .content
        .push_str("const STRIPE_SECRET = \"sk_live_4242424242424242\";\n");
    let degraded = analyze(&[leaky]);

    assert_eq!(
        degraded.security_issues.len(),
        baseline.security_issues.len() + 1
    );
    assert!(degraded.security_score < baseline.security_score);
    assert_eq!(
        degraded.security_issues[0].category,
        IssueCategory::HardcodedSecret
    );
    assert_eq!(degraded.security_issues[0].line, 2);
}
