//! Hook and UI component extraction.
//!
//! Hooks follow the `use`-prefixed camelCase naming convention. Components
//! are upper-case-named functions that return markup; the markup check is a
//! cheap `<` heuristic on the body, with `.jsx`/`.tsx` files trusted on the
//! name convention alone.

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::Config;
use crate::extract::block::{cap_snippet, extract_block, line_of_offset, parse_parameters};
use crate::extract::rules::{header_is_exported, scan_ordered, PatternRule};
use crate::extract::types::{ComponentRecord, HookRecord};
use crate::files::{Language, SourceFile};

lazy_static! {
    static ref HOOK_DECLARATION: Regex = Regex::new(
        r"(?m)^[ \t]*(?:export\s+)?function\s+(?P<name>use[A-Z][\w$]*)\s*(?P<sig>\([^)]*\))"
    )
    .unwrap();
    static ref HOOK_ARROW: Regex = Regex::new(
        r"(?m)^[ \t]*(?:export\s+)?(?:const|let)\s+(?P<name>use[A-Z][\w$]*)\s*=\s*(?:async\s+)?(?P<sig>\([^)]*\))\s*(?::[^=\n{]+)?=>"
    )
    .unwrap();
    static ref COMPONENT_DECLARATION: Regex = Regex::new(
        r"(?m)^[ \t]*(?:export\s+)?(?:default\s+)?function\s+(?P<name>[A-Z][\w$]*)\s*(?P<sig>\([^)]*\))"
    )
    .unwrap();
    static ref COMPONENT_ARROW: Regex = Regex::new(
        r"(?m)^[ \t]*(?:export\s+)?(?:const|let)\s+(?P<name>[A-Z][\w$]*)\s*(?::\s*[^=\n]+)?=\s*(?P<sig>\([^)]*\))\s*(?::[^=\n{]+)?=>"
    )
    .unwrap();
    static ref HOOK_CALL: Regex = Regex::new(r"\b(use[A-Z][\w$]*)\s*\(").unwrap();
}

/// Extract hooks (`use`-prefixed functions) from a file.
pub fn extract_hooks(file: &SourceFile, config: &Config) -> Vec<HookRecord> {
    let rules = [
        PatternRule {
            id: "hook-declaration",
            regex: &HOOK_DECLARATION,
        },
        PatternRule {
            id: "hook-arrow",
            regex: &HOOK_ARROW,
        },
    ];
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
            HookRecord {
                name: span.name.clone(),
                file_path: file.path.clone(),
                line_start,
                line_end,
                code: cap_snippet(block, config.max_snippet_len),
                dependencies: hooks_called(body, &span.name),
            }
        })
        .collect()
}

/// Extract UI components from a file.
pub fn extract_components(file: &SourceFile, config: &Config) -> Vec<ComponentRecord> {
    let jsx_file = matches!(file.language(), Language::Tsx | Language::Jsx);
    let rules = [
        PatternRule {
            id: "component-declaration",
            regex: &COMPONENT_DECLARATION,
        },
        PatternRule {
            id: "component-arrow",
            regex: &COMPONENT_ARROW,
        },
    ];
    scan_ordered(&rules, &file.content)
        .into_iter()
        .filter_map(|span| {
            let line_start = line_of_offset(&file.content, span.start);
            let block = extract_block(&file.content, span.start);
            let body = match block.find('{') {
                Some(open) => &block[open..],
                None => block,
            };
            // In plain .ts/.js files an upper-case name alone is not enough;
            // the body must actually produce markup.
            if !jsx_file && !returns_markup(body) {
                return None;
            }
            let line_end = line_start + block.trim_end().matches('\n').count();
            Some(ComponentRecord {
                name: span.name.clone(),
                file_path: file.path.clone(),
                line_start,
                line_end,
                code: cap_snippet(block, config.max_snippet_len),
                props: span
                    .signature
                    .as_deref()
                    .map(parse_parameters)
                    .unwrap_or_default(),
                hooks_used: hooks_called(body, ""),
                is_exported: header_is_exported(&span.header),
            })
        })
        .collect()
}

/// Hook call sites inside a body, first-seen order, excluding `self_name`.
fn hooks_called(body: &str, self_name: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for caps in HOOK_CALL.captures_iter(body) {
        let name = &caps[1];
        if name == self_name {
            continue;
        }
        if !seen.iter().any(|s| s == name) {
            seen.push(name.to_string());
        }
    }
    seen
}

/// Cheap markup heuristic: a `return <` or a parenthesized multi-line
/// return with a tag in the body.
fn returns_markup(body: &str) -> bool {
    body.contains("return <") || (body.contains("return (\n") && body.contains('<'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_extract_hook_with_dependencies() {
        let file = SourceFile::new(
            "src/hooks/useProfile.ts",
            indoc! {r#"
                export function useProfile(id: string) {
                    const [profile, setProfile] = useState(null);
                    useEffect(() => {
                        fetchProfile(id).then(setProfile);
                    }, [id]);
                    return profile;
                }
            "#},
        );
        let hooks = extract_hooks(&file, &Config::default());
        assert_eq!(hooks.len(), 1);
        assert_eq!(hooks[0].name, "useProfile");
        assert_eq!(hooks[0].dependencies, vec!["useState", "useEffect"]);
        assert_eq!(hooks[0].line_start, 1);
        assert_eq!(hooks[0].line_end, 7);
    }

    #[test]
    fn test_hook_arrow_form() {
        let file = SourceFile::new(
            "src/hooks/useToggle.ts",
            "export const useToggle = (initial: boolean) => {\n    const [on, setOn] = useState(initial);\n    return [on, () => setOn(!on)];\n};\n",
        );
        let hooks = extract_hooks(&file, &Config::default());
        assert_eq!(hooks.len(), 1);
        assert_eq!(hooks[0].name, "useToggle");
    }

    #[test]
    fn test_extract_component_tsx() {
        let file = SourceFile::new(
            "src/components/Avatar.tsx",
            indoc! {r#"
                export function Avatar({ src, alt }: AvatarProps) {
                    const theme = useTheme();
                    return <img src={src} alt={alt} className={theme.avatar} />;
                }
            "#},
        );
        let components = extract_components(&file, &Config::default());
        assert_eq!(components.len(), 1);
        let c = &components[0];
        assert_eq!(c.name, "Avatar");
        assert!(c.is_exported);
        assert_eq!(c.hooks_used, vec!["useTheme"]);
    }

    #[test]
    fn test_uppercase_non_component_in_plain_ts() {
        // Upper-case-named function in a .ts file that returns no markup is
        // not a component.
        let file = SourceFile::new(
            "src/lib/Builder.ts",
            "export function BuildAll(): void {\n    run();\n}\n",
        );
        let components = extract_components(&file, &Config::default());
        assert!(components.is_empty());
    }

    #[test]
    fn test_hooks_not_reported_as_components() {
        // `use`-prefixed names are lower-case-initial, so the component
        // rules never see them.
        let file = SourceFile::new(
            "src/hooks/useThing.tsx",
            "export function useThing() {\n    return <div />;\n}\n",
        );
        let components = extract_components(&file, &Config::default());
        assert!(components.is_empty());
    }
}
