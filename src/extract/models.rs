//! Data-model extraction from schema-definition files.
//!
//! Prisma-style schema syntax (`model Name { field Type @attr }`) follows
//! neither function nor class grammar, so it gets a dedicated line-oriented
//! parser instead of the generic pattern rules. `enum`, `generator`, and
//! `datasource` blocks are tolerated and skipped.

use lazy_static::lazy_static;
use regex::Regex;

use crate::extract::block::{extract_block, line_of_offset};
use crate::extract::types::{DataModelRecord, ModelField};
use crate::files::{Language, SourceFile};

lazy_static! {
    static ref MODEL_HEADER: Regex =
        Regex::new(r"(?m)^[ \t]*model\s+(?P<name>[A-Za-z_][\w]*)\s*\{").unwrap();
}

/// Extract every `model` block from a schema file. Non-schema files yield
/// nothing.
pub fn extract_models(file: &SourceFile) -> Vec<DataModelRecord> {
    if file.language() != Language::Prisma {
        return Vec::new();
    }

    MODEL_HEADER
        .captures_iter(&file.content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let block = extract_block(&file.content, whole.start());
            let body = match block.find('{') {
                Some(open) => &block[open + 1..],
                None => return None,
            };
            Some(DataModelRecord {
                name: caps["name"].to_string(),
                file_path: file.path.clone(),
                line_start: line_of_offset(&file.content, whole.start()),
                fields: parse_fields(body),
            })
        })
        .collect()
}

/// Parse `name Type @attr...` field lines out of a model body. Block
/// directives (`@@index` etc.), comments, and blank lines are skipped.
fn parse_fields(body: &str) -> Vec<ModelField> {
    let mut fields = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") || line.starts_with("@@") || line == "}" {
            continue;
        }
        let mut parts = line.split_whitespace();
        let (Some(name), Some(field_type)) = (parts.next(), parts.next()) else {
            continue;
        };
        if !name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_')
        {
            continue;
        }
        fields.push(ModelField {
            name: name.to_string(),
            field_type: field_type.to_string(),
            attributes: parts.map(|s| s.to_string()).collect(),
        });
    }
    fields
}
