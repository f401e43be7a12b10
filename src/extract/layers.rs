//! Service, controller, middleware, and utility module extraction.
//!
//! These records are keyed purely off path-naming convention combined with
//! the generic function extraction for the file. No semantic check is made
//! that a `*service*` file actually behaves like a service.

use std::path::Path;

use crate::config::Config;
use crate::extract::functions::extract_functions;
use crate::extract::types::{ModuleKind, ModuleRecord};
use crate::files::SourceFile;

/// Classify a path into an architectural layer, if its name matches one.
/// The first matching convention wins, in the declared order below.
pub fn layer_of_path(path: &str) -> Option<ModuleKind> {
    let lower = path.replace('\\', "/").to_lowercase();
    if lower.contains("service") {
        Some(ModuleKind::Service)
    } else if lower.contains("controller") {
        Some(ModuleKind::Controller)
    } else if lower.contains("middleware") {
        Some(ModuleKind::Middleware)
    } else if lower.contains("util") || lower.contains("helper") || lower.contains("/lib/") {
        Some(ModuleKind::Utility)
    } else {
        None
    }
}

/// Produce a module record for a file whose path matches a layer
/// convention; `None` for files outside any layer.
pub fn extract_module(file: &SourceFile, config: &Config) -> Option<ModuleRecord> {
    let kind = layer_of_path(&file.path)?;
    let name = Path::new(&file.path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&file.path)
        .to_string();
    Some(ModuleRecord {
        name,
        file_path: file.path.clone(),
        kind,
        functions: extract_functions(file, config),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_of_path() {
        assert_eq!(
            layer_of_path("src/services/userService.ts"),
            Some(ModuleKind::Service)
        );
        assert_eq!(
            layer_of_path("src/controllers/auth.controller.ts"),
            Some(ModuleKind::Controller)
        );
        assert_eq!(
            layer_of_path("src/middleware/logging.ts"),
            Some(ModuleKind::Middleware)
        );
        assert_eq!(
            layer_of_path("src/utils/format.ts"),
            Some(ModuleKind::Utility)
        );
        assert_eq!(
            layer_of_path("src/lib/dates.ts"),
            Some(ModuleKind::Utility)
        );
        assert_eq!(layer_of_path("src/components/Button.tsx"), None);
    }

    #[test]
    fn test_extract_module() {
        let file = SourceFile::new(
            "src/services/billing.ts",
            "export function charge(amount: number) {\n    return gateway.charge(amount);\n}\n",
        );
        let module = extract_module(&file, &Config::default()).unwrap();
        assert_eq!(module.name, "billing");
        assert_eq!(module.kind, ModuleKind::Service);
        assert_eq!(module.functions.len(), 1);
        assert_eq!(module.functions[0].name, "charge");
    }

    #[test]
    fn test_non_layer_file() {
        let file = SourceFile::new("src/pages/index.tsx", "export default function Home() {}\n");
        assert!(extract_module(&file, &Config::default()).is_none());
    }
}
