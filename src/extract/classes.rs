//! Class, interface, and type-alias extraction.
//!
//! Classes get their methods and properties pulled from the bounded body;
//! interfaces and type aliases are lighter records that keep raw text only,
//! with no semantic resolution.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::Config;
use crate::extract::block::{
    cap_snippet, extract_block, line_of_offset, parse_properties,
};
use crate::extract::functions::build_function;
use crate::extract::rules::{header_is_exported, scan_ordered, PatternRule};
use crate::extract::types::{ClassRecord, InterfaceRecord, TypeAliasRecord};
use crate::files::SourceFile;

lazy_static! {
    static ref CLASS_HEADER: Regex = Regex::new(
        r"(?m)^[ \t]*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?class\s+(?P<name>[A-Za-z_$][\w$]*)[^{\n]*\{"
    )
    .unwrap();
    static ref EXTENDS: Regex = Regex::new(r"\bextends\s+(?P<base>[\w$.]+)").unwrap();
    static ref IMPLEMENTS: Regex = Regex::new(r"\bimplements\s+(?P<list>[\w$.,\s]+?)\s*\{").unwrap();
    static ref METHOD_HEADER: Regex = Regex::new(
        r"(?m)^[ \t]+(?:public\s+|private\s+|protected\s+|static\s+|override\s+)*(?:async\s+)?(?:get\s+|set\s+)?(?P<name>[A-Za-z_$][\w$]*)\s*(?P<sig>\([^)]*\))(?:\s*:\s*[^{\n]+)?\s*\{"
    )
    .unwrap();
    static ref INTERFACE_HEADER: Regex = Regex::new(
        r"(?m)^[ \t]*(?:export\s+)?interface\s+(?P<name>[A-Za-z_$][\w$]*)[^{\n]*\{"
    )
    .unwrap();
    static ref TYPE_ALIAS: Regex = Regex::new(
        r"(?m)^[ \t]*(?:export\s+)?type\s+(?P<name>[A-Za-z_$][\w$]*)(?:<[^=\n]*>)?\s*=\s*(?P<def>[^\n]+)"
    )
    .unwrap();
    /// Method names that are really control-flow keywords caught by the
    /// loose method pattern inside a class body.
    static ref NOT_A_METHOD: Regex = Regex::new(r"^(?:if|for|while|switch|catch|return)$").unwrap();
}

/// Extract every class in a file, with methods and properties.
pub fn extract_classes(file: &SourceFile, config: &Config) -> Vec<ClassRecord> {
    let rules = [PatternRule {
        id: "class-header",
        regex: &CLASS_HEADER,
    }];
    scan_ordered(&rules, &file.content)
        .into_iter()
        .map(|span| {
            let line_start = line_of_offset(&file.content, span.start);
            let block = extract_block(&file.content, span.start);
            let line_end = line_start + block.trim_end().matches('\n').count();
            let body = match block.find('{') {
                Some(open) => &block[open..],
                None => block,
            };

            let methods = METHOD_HEADER
                .captures_iter(body)
                .filter_map(|caps| {
                    let whole = caps.get(0)?;
                    let name = caps.name("name")?.as_str();
                    if NOT_A_METHOD.is_match(name) {
                        return None;
                    }
                    // Offsets inside `body` are relative; rebase onto the file.
                    let abs = span.start + (block.len() - body.len()) + whole.start();
                    Some(build_function(
                        &file.path,
                        &file.content,
                        abs,
                        name,
                        whole.as_str(),
                        caps.name("sig").map(|m| m.as_str()).unwrap_or(""),
                        config,
                    ))
                })
                .collect();

            ClassRecord {
                name: span.name.clone(),
                file_path: file.path.clone(),
                line_start,
                line_end,
                code: cap_snippet(block, config.max_snippet_len),
                methods,
                properties: parse_properties(body),
                extends: EXTENDS
                    .captures(&span.header)
                    .map(|c| c["base"].to_string()),
                implements: IMPLEMENTS
                    .captures(&span.header)
                    .map(|c| {
                        c["list"]
                            .split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
                is_exported: header_is_exported(&span.header),
            }
        })
        .collect()
}

/// Extract TypeScript interfaces (raw properties, no resolution).
pub fn extract_interfaces(file: &SourceFile, _config: &Config) -> Vec<InterfaceRecord> {
    let rules = [PatternRule {
        id: "interface-header",
        regex: &INTERFACE_HEADER,
    }];
    scan_ordered(&rules, &file.content)
        .into_iter()
        .map(|span| {
            let line_start = line_of_offset(&file.content, span.start);
            let block = extract_block(&file.content, span.start);
            let line_end = line_start + block.trim_end().matches('\n').count();
            let body = match block.find('{') {
                Some(open) => &block[open..],
                None => block,
            };
            InterfaceRecord {
                name: span.name.clone(),
                file_path: file.path.clone(),
                line_start,
                line_end,
                properties: parse_properties(body),
                is_exported: header_is_exported(&span.header),
            }
        })
        .collect()
}

/// Extract TypeScript type aliases. The definition is the raw right-hand
/// side, truncated at the snippet cap.
pub fn extract_type_aliases(file: &SourceFile, config: &Config) -> Vec<TypeAliasRecord> {
    TYPE_ALIAS
        .captures_iter(&file.content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let header = whole.as_str();
            let def = caps.name("def")?.as_str().trim().trim_end_matches(';');
            Some(TypeAliasRecord {
                name: caps.name("name")?.as_str().to_string(),
                file_path: file.path.clone(),
                line_start: line_of_offset(&file.content, whole.start()),
                definition: cap_snippet(def, config.max_snippet_len),
                is_exported: header_is_exported(header),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_extract_class_full() {
        let file = SourceFile::new(
            "src/user.ts",
            indoc! {r#"
                export class UserService extends BaseService implements Disposable, Resettable {
                    private cache: Map<string, User>;
                    retries = 3;

                    async findUser(id: string): Promise<User | null> {
                        if (this.cache.has(id)) {
                            return this.cache.get(id);
                        }
                        return null;
                    }

                    dispose() {
                        this.cache.clear();
                    }
                }
            "#},
        );
        let classes = extract_classes(&file, &Config::default());
        assert_eq!(classes.len(), 1);
        let c = &classes[0];
        assert_eq!(c.name, "UserService");
        assert!(c.is_exported);
        assert_eq!(c.extends.as_deref(), Some("BaseService"));
        assert_eq!(c.implements, vec!["Disposable", "Resettable"]);
        assert_eq!(c.methods.len(), 2);
        assert_eq!(c.methods[0].name, "findUser");
        assert!(c.methods[0].is_async);
        assert_eq!(c.methods[1].name, "dispose");
        assert!(c.properties.iter().any(|p| p.name == "cache"));
        assert!(c.line_start <= c.line_end);
    }

    #[test]
    fn test_method_lines_are_file_relative() {
        let file = SourceFile::new(
            "src/a.ts",
            "class A {\n    run() {\n        go();\n    }\n}\n",
        );
        let classes = extract_classes(&file, &Config::default());
        assert_eq!(classes[0].methods[0].line_start, 2);
        assert_eq!(classes[0].methods[0].line_end, 4);
    }

    #[test]
    fn test_extract_interface() {
        let file = SourceFile::new(
            "src/types.ts",
            indoc! {r#"
                export interface Profile {
                    id: string;
                    email?: string;
                    refresh(): Promise<void>;
                }
            "#},
        );
        let interfaces = extract_interfaces(&file, &Config::default());
        assert_eq!(interfaces.len(), 1);
        assert_eq!(interfaces[0].name, "Profile");
        assert!(interfaces[0].is_exported);
        assert_eq!(interfaces[0].properties.len(), 2);
        assert!(interfaces[0].properties[1].optional);
    }

    #[test]
    fn test_extract_type_alias() {
        let file = SourceFile::new(
            "src/types.ts",
            "export type UserId = string;\ntype Pair<T> = [T, T];\n",
        );
        let aliases = extract_type_aliases(&file, &Config::default());
        assert_eq!(aliases.len(), 2);
        assert_eq!(aliases[0].name, "UserId");
        assert_eq!(aliases[0].definition, "string");
        assert!(aliases[0].is_exported);
        assert_eq!(aliases[1].name, "Pair");
        assert!(!aliases[1].is_exported);
    }
}
