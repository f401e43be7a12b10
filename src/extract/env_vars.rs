//! Environment-variable reference extraction.
//!
//! Scans every file for the fixed `process.env.VAR_NAME` access pattern and
//! produces a deduplicated map of variable name to the set of referencing
//! files. BTree containers keep the output deterministic regardless of
//! input order.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};

use crate::files::SourceFile;

lazy_static! {
    static ref ENV_ACCESS: Regex =
        Regex::new(r"process\.env\.(?P<name>[A-Z][A-Z0-9_]*)").unwrap();
}

/// Map of environment-variable name to the set of files referencing it.
pub type EnvVarMap = BTreeMap<String, BTreeSet<String>>;

/// Collect env-var references for one file into the shared map.
pub fn collect_env_vars(file: &SourceFile, map: &mut EnvVarMap) {
    for caps in ENV_ACCESS.captures_iter(&file.content) {
        map.entry(caps["name"].to_string())
            .or_default()
            .insert(file.path.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_env_vars() {
        let mut map = EnvVarMap::new();
        let a = SourceFile::new(
            "src/db.ts",
            "const url = process.env.DATABASE_URL;\nconst dup = process.env.DATABASE_URL;\n",
        );
        let b = SourceFile::new(
            "src/auth.ts",
            "const secret = process.env.JWT_SECRET ?? process.env.DATABASE_URL;\n",
        );
        collect_env_vars(&a, &mut map);
        collect_env_vars(&b, &mut map);

        assert_eq!(map.len(), 2);
        assert_eq!(map["DATABASE_URL"].len(), 2);
        assert_eq!(map["JWT_SECRET"].len(), 1);
        assert!(map["JWT_SECRET"].contains("src/auth.ts"));
    }

    #[test]
    fn test_lowercase_access_ignored() {
        let mut map = EnvVarMap::new();
        let file = SourceFile::new("src/a.ts", "const x = process.env.path;\n");
        collect_env_vars(&file, &mut map);
        assert!(map.is_empty());
    }
}
