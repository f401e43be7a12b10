//! Integration tests for the full analysis pipeline.
//!
//! These tests run the engine against the testdata fixture project (a small
//! Next.js-style app) and validate entity extraction, derived metrics, and
//! the invariants the aggregate result guarantees to consumers.

use std::path::PathBuf;

use codescope::extract::{HttpMethod, ModuleKind};
use codescope::{analyze, ComprehensiveAnalysis, SourceFile};

/// Relative fixture paths, loaded in a fixed order.
const FIXTURES: &[&str] = &[
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
];

fn fixture_files() -> Vec<SourceFile> {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata");
    FIXTURES
        .iter()
        .map(|rel| {
            let content = std::fs::read_to_string(root.join(rel))
                .unwrap_or_else(|e| panic!("reading fixture {rel}: {e}"));
            SourceFile::new(*rel, content)
        })
        .collect()
}

fn run() -> ComprehensiveAnalysis {
    analyze(&fixture_files())
}

#[test]
fn test_entity_inventory() {
    let analysis = run();

    let names: Vec<&str> = analysis.functions.iter().map(|f| f.name.as_str()).collect();
    for expected in [
        "GET",
        "POST",
        "findUser",
        "formatUser",
        "findById",
        "renderBanner",
        "legacyDigest",
        "sessionToken",
        "useProfile",
        "Avatar",
    ] {
        assert!(names.contains(&expected), "missing function {expected}");
    }

    assert_eq!(analysis.classes.len(), 1);
    assert_eq!(analysis.classes[0].name, "UserCache");
    assert_eq!(analysis.classes[0].methods.len(), 2);

    assert_eq!(analysis.interfaces.len(), 1);
    assert_eq!(analysis.interfaces[0].name, "User");
    assert_eq!(analysis.interfaces[0].properties.len(), 3);

    assert_eq!(analysis.type_aliases.len(), 1);
    assert_eq!(analysis.type_aliases[0].name, "UserId");

    assert_eq!(analysis.data_models.len(), 2);
    assert_eq!(analysis.data_models[0].name, "User");
    assert_eq!(analysis.data_models[1].name, "Post");

    assert_eq!(analysis.hooks.len(), 1);
    assert_eq!(analysis.hooks[0].name, "useProfile");
    assert_eq!(analysis.hooks[0].dependencies, vec!["useState", "useEffect"]);

    assert_eq!(analysis.components.len(), 1);
    assert_eq!(analysis.components[0].name, "Avatar");
    assert_eq!(analysis.components[0].hooks_used, vec!["useProfile"]);
}

#[test]
fn test_routes_and_protection() {
    let analysis = run();
    assert_eq!(analysis.routes.len(), 3);

    let users: Vec<_> = analysis
        .routes
        .iter()
        .filter(|r| r.file_path == "app/api/users/route.ts")
        .collect();
    assert_eq!(users.len(), 2);
    assert!(users.iter().all(|r| r.is_protected));
    assert!(users.iter().all(|r| r.path == "/api/users"));
    assert!(users.iter().any(|r| r.method == HttpMethod::Get));
    assert!(users.iter().any(|r| r.method == HttpMethod::Post));

    let status = analysis
        .routes
        .iter()
        .find(|r| r.file_path == "app/api/status/route.ts")
        .expect("status route");
    assert_eq!(status.method, HttpMethod::Get);
    assert_eq!(status.path, "/api/status");
    assert!(!status.is_protected);
}

#[test]
fn test_layer_modules() {
    let analysis = run();
    assert_eq!(analysis.modules.len(), 3);

    let service = analysis
        .modules
        .iter()
        .find(|m| m.kind == ModuleKind::Service)
        .expect("service module");
    assert_eq!(service.name, "userService");
    assert!(service.functions.iter().any(|f| f.name == "findUser"));

    let utilities: Vec<_> = analysis
        .modules
        .iter()
        .filter(|m| m.kind == ModuleKind::Utility)
        .collect();
    assert_eq!(utilities.len(), 2);
}

#[test]
fn test_env_vars() {
    let analysis = run();
    assert_eq!(analysis.env_vars.len(), 1);
    let referencing = &analysis.env_vars["DATABASE_URL"];
    assert_eq!(referencing.len(), 1);
    assert!(referencing.contains("src/lib/db.ts"));
}

#[test]
fn test_patterns() {
    let analysis = run();
    for expected in [
        "typescript",
        "react",
        "nextjs",
        "prisma",
        "tailwindcss",
        "zod-validation",
        "service-layer",
    ] {
        assert!(
            analysis.patterns.contains(expected),
            "missing pattern {expected}"
        );
    }
    assert!(!analysis.patterns.contains("express"));
}

#[test]
fn test_scores_within_bounds() {
    let analysis = run();
    assert!(analysis.security_score <= 100);
    assert!(analysis.quality_score <= 100);
    // The fixture app is small and typed; only the insecure module and the
    // unauthenticated status route cost security points.
    assert!(analysis.security_score < 100);
    assert_eq!(analysis.quality_score, 100);
}

#[test]
fn test_cross_reference_over_files() {
    let analysis = run();
    // useProfile's effect calls findUser, defined in the service file.
    let find_user = analysis
        .functions
        .iter()
        .find(|f| f.name == "findUser")
        .expect("findUser record");
    assert!(find_user.called_by.contains(&"useProfile".to_string()));
}

#[test]
fn test_containment_invariants() {
    let analysis = run();
    let cap = codescope::Config::default().max_snippet_len;

    for f in &analysis.functions {
        assert!(f.line_start <= f.line_end, "{} line range", f.name);
        assert!(f.code.len() <= cap, "{} snippet cap", f.name);
        assert!(f.complexity >= 1);
    }
    for c in &analysis.classes {
        assert!(c.line_start <= c.line_end);
        assert!(c.code.len() <= cap);
    }
    for r in &analysis.routes {
        assert!(r.code.len() <= cap);
    }
}

#[test]
fn test_determinism() {
    let first = run();
    let second = run();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_shuffle_invariance() {
    let forward = analyze(&fixture_files());

    let mut reversed_files = fixture_files();
    reversed_files.reverse();
    let reversed = analyze(&reversed_files);

    let sorted_names = |a: &ComprehensiveAnalysis| {
        let mut names: Vec<String> = a.functions.iter().map(|f| f.name.clone()).collect();
        names.sort();
        names
    };
    assert_eq!(sorted_names(&forward), sorted_names(&reversed));
    assert_eq!(forward.security_score, reversed.security_score);
    assert_eq!(forward.quality_score, reversed.quality_score);
    assert_eq!(forward.stats.total_files, reversed.stats.total_files);
    assert_eq!(forward.stats.total_lines, reversed.stats.total_lines);
    assert_eq!(
        forward.stats.files_by_language,
        reversed.stats.files_by_language
    );
    assert_eq!(forward.env_vars, reversed.env_vars);
    assert_eq!(forward.patterns, reversed.patterns);
}

#[test]
fn test_stats_shape() {
    let analysis = run();
    assert_eq!(analysis.stats.total_files, FIXTURES.len());
    assert!(analysis.stats.total_lines > 0);
    assert_eq!(analysis.stats.files_by_language["typescript"], 7);
    assert_eq!(analysis.stats.files_by_language["tsx"], 1);
    assert_eq!(analysis.stats.files_by_language["prisma"], 1);
    assert_eq!(analysis.stats.files_by_language["json"], 1);
    assert!(!analysis.stats.largest_files.is_empty());
    assert!(!analysis.stats.most_complex.is_empty());
    assert!(analysis.stats.largest_files.len() <= 10);
    assert!(analysis.stats.most_complex.len() <= 10);
}
