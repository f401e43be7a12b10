//! Entity extraction over a single file.
//!
//! Each extractor owns an ordered pattern-rule list and shares the block,
//! signature, and call-site primitives. A failure inside one extractor is
//! contained to that extractor and file: the panic guard logs it and the
//! file is simply excluded from that entity kind's results, while all other
//! extractors and files proceed unaffected.

mod block;
mod calls;
mod classes;
mod components;
mod env_vars;
mod functions;
mod layers;
mod models;
mod routes;
mod rules;
mod types;

pub use block::{
    cap_snippet, extract_block, line_of_offset, parse_parameters, parse_properties,
    BLOCK_FALLBACK_LEN, MAX_SCAN_BYTES,
};
pub use calls::{calls_in_body, cross_reference};
pub use classes::{extract_classes, extract_interfaces, extract_type_aliases};
pub use components::{extract_components, extract_hooks};
pub use env_vars::{collect_env_vars, EnvVarMap};
pub use functions::extract_functions;
pub use layers::{extract_module, layer_of_path};
pub use models::extract_models;
pub use routes::{
    extract_routes, first_handler_offset, has_auth_marker, has_rate_limit_marker, is_route_file,
    AUTH_IDENTIFIERS,
};
pub use rules::{header_is_async, header_is_exported, scan_ordered, MatchSpan, Matcher, PatternRule};
pub use types::{
    ClassRecord, ComponentRecord, DataModelRecord, FunctionRecord, HookRecord, HttpMethod,
    InterfaceRecord, ModelField, ModuleKind, ModuleRecord, Parameter, PropertyRecord, RouteRecord,
    TypeAliasRecord,
};

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::config::Config;
use crate::files::SourceFile;

/// Everything one file contributed to the inventory.
#[derive(Debug, Clone, Default)]
pub struct FileExtraction {
    pub functions: Vec<FunctionRecord>,
    pub classes: Vec<ClassRecord>,
    pub interfaces: Vec<InterfaceRecord>,
    pub type_aliases: Vec<TypeAliasRecord>,
    pub routes: Vec<RouteRecord>,
    pub modules: Vec<ModuleRecord>,
    pub models: Vec<DataModelRecord>,
    pub hooks: Vec<HookRecord>,
    pub components: Vec<ComponentRecord>,
}

/// Run every applicable extractor over one file.
///
/// Structural extractors only run for languages that carry the constructs
/// they look for; the schema extractor has its own language gate. This never
/// fails: a misbehaving extractor costs its own results only.
pub fn extract_file(file: &SourceFile, config: &Config) -> FileExtraction {
    let mut out = FileExtraction::default();
    let lang = file.language();

    if lang.is_structural() {
        out.functions = guarded("functions", file, || extract_functions(file, config));
        out.classes = guarded("classes", file, || extract_classes(file, config));
        out.routes = guarded("routes", file, || extract_routes(file, config));
        out.hooks = guarded("hooks", file, || extract_hooks(file, config));
        out.components = guarded("components", file, || extract_components(file, config));
        out.modules = guarded("modules", file, || {
            extract_module(file, config).into_iter().collect()
        });
        if lang.is_typescript() {
            out.interfaces = guarded("interfaces", file, || extract_interfaces(file, config));
            out.type_aliases =
                guarded("type_aliases", file, || extract_type_aliases(file, config));
        }
    }

    out.models = guarded("models", file, || extract_models(file));

    out
}

/// Contain a single extractor failure to this file and entity kind.
fn guarded<T>(kind: &str, file: &SourceFile, run: impl FnOnce() -> Vec<T>) -> Vec<T> {
    match catch_unwind(AssertUnwindSafe(run)) {
        Ok(records) => records,
        Err(_) => {
            tracing::warn!(file = %file.path, extractor = kind, "extractor failed, skipping file for this entity kind");
            Vec::new()
        }
    }
}
