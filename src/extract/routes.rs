//! API route extraction.
//!
//! Two handler styles are recognized: file-system-routed handler exports
//! (`export async function GET(...)` in a file under an `/api/` path or
//! named `route.ts`), and declarative router registrations
//! (`app.get('/users', ...)`, `router.post(...)`). Protection is a file-wide
//! heuristic: the presence of a known auth-check identifier anywhere in the
//! enclosing file.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use crate::config::Config;
use crate::extract::block::{cap_snippet, extract_block, line_of_offset, parse_parameters};
use crate::extract::types::{HttpMethod, Parameter, RouteRecord};
use crate::files::SourceFile;

/// Identifiers whose presence marks a file as carrying an auth check.
pub const AUTH_IDENTIFIERS: &[&str] = &[
    "getServerSession",
    "requireAuth",
    "authenticate",
    "verifyToken",
    "withAuth",
    "jwt.verify",
    "auth()",
    "isAuthenticated",
    "checkPermission",
];

/// Identifiers whose presence marks a file as rate limited.
pub const RATE_LIMIT_IDENTIFIERS: &[&str] =
    &["rateLimit", "rateLimiter", "Ratelimit", "throttle", "slowDown"];

lazy_static! {
    static ref HANDLER_EXPORT: Regex = Regex::new(
        r"(?m)^[ \t]*export\s+(?:async\s+)?function\s+(?P<method>GET|POST|PUT|PATCH|DELETE|HEAD|OPTIONS)\s*(?P<sig>\([^)]*\))"
    )
    .unwrap();
    static ref HANDLER_CONST: Regex = Regex::new(
        r"(?m)^[ \t]*export\s+const\s+(?P<method>GET|POST|PUT|PATCH|DELETE|HEAD|OPTIONS)\s*=\s*(?:async\s+)?(?P<sig>\([^)]*\))?"
    )
    .unwrap();
    static ref ROUTER_CALL: Regex = Regex::new(
        r#"\b(?:app|router|server|api|fastify)\s*\.\s*(?P<method>get|post|put|patch|delete|head|options)\s*\(\s*["'`](?P<path>[^"'`]+)["'`]"#
    )
    .unwrap();
}

/// Whether a file path follows the API-route convention.
pub fn is_route_file(path: &str) -> bool {
    let normalized = path.replace('\\', "/").to_lowercase();
    let stem = Path::new(&normalized)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("");
    normalized.contains("/api/") || normalized.starts_with("api/") || stem == "route"
}

/// Whether the file carries any known auth-check identifier.
pub fn has_auth_marker(content: &str) -> bool {
    AUTH_IDENTIFIERS.iter().any(|id| content.contains(id))
}

/// Whether the file carries any known rate-limit identifier.
pub fn has_rate_limit_marker(content: &str) -> bool {
    RATE_LIMIT_IDENTIFIERS.iter().any(|id| content.contains(id))
}

/// Byte offset of the first route handler in a file, if any. Used by the
/// route-heuristic security checks, which need a line to anchor findings to.
pub fn first_handler_offset(content: &str) -> Option<usize> {
    [
        HANDLER_EXPORT.find(content).map(|m| m.start()),
        HANDLER_CONST.find(content).map(|m| m.start()),
        ROUTER_CALL.find(content).map(|m| m.start()),
    ]
    .into_iter()
    .flatten()
    .min()
}

/// Derive the URL path for a file-system-routed handler from its file path:
/// `app/api/users/[id]/route.ts` becomes `/api/users/[id]`.
fn route_path_from_file(path: &str) -> String {
    let normalized = path.replace('\\', "/");
    let lower = normalized.to_lowercase();
    let from_api = match lower.find("/api/") {
        Some(idx) => &normalized[idx..],
        None if lower.starts_with("api/") => &normalized[..],
        None => &normalized[..],
    };
    let mut route = from_api.trim_start_matches('/').to_string();
    for suffix in [".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs"] {
        if let Some(stripped) = route.strip_suffix(suffix) {
            route = stripped.to_string();
            break;
        }
    }
    for suffix in ["/route", "/index"] {
        if let Some(stripped) = route.strip_suffix(suffix) {
            route = stripped.to_string();
            break;
        }
    }
    format!("/{}", route)
}

/// Extract every API route in a file.
pub fn extract_routes(file: &SourceFile, config: &Config) -> Vec<RouteRecord> {
    let mut routes = Vec::new();
    let protected = has_auth_marker(&file.content);

    if is_route_file(&file.path) {
        let route_path = route_path_from_file(&file.path);
        for caps in HANDLER_EXPORT
            .captures_iter(&file.content)
            .chain(HANDLER_CONST.captures_iter(&file.content))
        {
            let Some(method) = caps.name("method").and_then(|m| HttpMethod::parse(m.as_str()))
            else {
                continue;
            };
            let whole = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            let parameters = caps
                .name("sig")
                .map(|m| parse_parameters(m.as_str()))
                .unwrap_or_default();
            routes.push(build_route(
                file,
                method,
                route_path.clone(),
                whole.start(),
                parameters,
                protected,
                config,
            ));
        }
    }

    for caps in ROUTER_CALL.captures_iter(&file.content) {
        let Some(method) = caps.name("method").and_then(|m| HttpMethod::parse(m.as_str()))
        else {
            continue;
        };
        let whole = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        routes.push(build_route(
            file,
            method,
            caps["path"].to_string(),
            whole.start(),
            Vec::new(),
            protected,
            config,
        ));
    }

    routes.sort_by_key(|r| r.line_start);
    routes
}

fn build_route(
    file: &SourceFile,
    method: HttpMethod,
    path: String,
    start: usize,
    parameters: Vec<Parameter>,
    protected: bool,
    config: &Config,
) -> RouteRecord {
    let block = extract_block(&file.content, start);
    RouteRecord {
        method,
        path,
        file_path: file.path.clone(),
        line_start: line_of_offset(&file.content, start),
        code: cap_snippet(block, config.max_snippet_len),
        parameters,
        is_protected: protected,
    }
}
