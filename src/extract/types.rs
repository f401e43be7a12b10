//! Entity records produced by the extractors.
//!
//! Every record is a plain serializable value. Optionality is encoded in the
//! types; nothing here is a property bag. Records keep `line_start <=
//! line_end` and snippet caps as invariants enforced at construction sites.

use serde::{Deserialize, Serialize};

/// One parsed parameter from a signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

/// One property of a class or interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyRecord {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prop_type: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

/// An extracted function or method.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionRecord {
    pub name: String,
    pub file_path: String,
    pub line_start: usize,
    pub line_end: usize,
    /// Body snippet, capped at the configured byte budget.
    pub code: String,
    pub parameters: Vec<Parameter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    pub is_async: bool,
    pub is_exported: bool,
    pub complexity: u32,
    /// Raw call-site names found in the body, keywords filtered. May include
    /// false positives.
    #[serde(default)]
    pub calls_to: Vec<String>,
    /// Populated only by the cross-reference pass; empty until then.
    #[serde(default)]
    pub called_by: Vec<String>,
}

/// An extracted class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRecord {
    pub name: String,
    pub file_path: String,
    pub line_start: usize,
    pub line_end: usize,
    pub code: String,
    pub methods: Vec<FunctionRecord>,
    pub properties: Vec<PropertyRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
    #[serde(default)]
    pub implements: Vec<String>,
    pub is_exported: bool,
}

/// An extracted TypeScript interface. Raw property text only, no semantic
/// resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterfaceRecord {
    pub name: String,
    pub file_path: String,
    pub line_start: usize,
    pub line_end: usize,
    pub properties: Vec<PropertyRecord>,
    pub is_exported: bool,
}

/// An extracted TypeScript type alias.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeAliasRecord {
    pub name: String,
    pub file_path: String,
    pub line_start: usize,
    /// Raw right-hand-side text of the alias.
    pub definition: String,
    pub is_exported: bool,
}

/// HTTP methods recognized by the route extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            "HEAD" => Some(HttpMethod::Head),
            "OPTIONS" => Some(HttpMethod::Options),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An extracted API route handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRecord {
    pub method: HttpMethod,
    pub path: String,
    pub file_path: String,
    pub line_start: usize,
    pub code: String,
    pub parameters: Vec<Parameter>,
    /// Heuristic: a known auth-check identifier appears somewhere in the
    /// enclosing file. Not a per-handler guarantee.
    pub is_protected: bool,
}

/// Architectural layer a module record belongs to, derived from its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    Service,
    Controller,
    Middleware,
    Utility,
}

impl ModuleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKind::Service => "service",
            ModuleKind::Controller => "controller",
            ModuleKind::Middleware => "middleware",
            ModuleKind::Utility => "utility",
        }
    }
}

/// A service/controller/middleware/utility module and its functions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub name: String,
    pub file_path: String,
    pub kind: ModuleKind,
    pub functions: Vec<FunctionRecord>,
}

/// One field of a schema data model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelField {
    pub name: String,
    pub field_type: String,
    #[serde(default)]
    pub attributes: Vec<String>,
}

/// A data model parsed from a schema-definition file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataModelRecord {
    pub name: String,
    pub file_path: String,
    pub line_start: usize,
    pub fields: Vec<ModelField>,
}

/// An extracted React-style hook (a `use`-prefixed function).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookRecord {
    pub name: String,
    pub file_path: String,
    pub line_start: usize,
    pub line_end: usize,
    pub code: String,
    /// Other hooks this hook's body calls.
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// An extracted UI component (upper-case-named function returning markup).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub name: String,
    pub file_path: String,
    pub line_start: usize,
    pub line_end: usize,
    pub code: String,
    pub props: Vec<Parameter>,
    #[serde(default)]
    pub hooks_used: Vec<String>,
    pub is_exported: bool,
}
