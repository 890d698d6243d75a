//! OpenAPI / Swagger dialect detection.
//!
//! The resolver and analyzer are dialect-agnostic; only the few places that
//! locate named schemas need to know whether they live under `definitions`
//! (Swagger 2.0) or `components.schemas` (OpenAPI 3.x).

use serde_json::Value;

use crate::document::NodeRef;
use crate::document::pointer::pointer_from_tokens;

/// Specification dialect of a root document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Swagger2,
    OpenApi30,
    OpenApi31,
    OpenApi32,
    Unknown,
}

impl Dialect {
    /// Detect the dialect from the `swagger` / `openapi` version field.
    pub fn detect(root: &Value) -> Self {
        if let Some(version) = root.get("swagger").and_then(Value::as_str) {
            return if version.starts_with("2.") {
                Dialect::Swagger2
            } else {
                Dialect::Unknown
            };
        }
        match root.get("openapi").and_then(Value::as_str) {
            Some(v) if v.starts_with("3.0") => Dialect::OpenApi30,
            Some(v) if v.starts_with("3.1") => Dialect::OpenApi31,
            Some(v) if v.starts_with("3.2") => Dialect::OpenApi32,
            _ => Dialect::Unknown,
        }
    }

    /// Whether the document declares itself an OpenAPI/Swagger root document.
    pub fn is_root_document(root: &Value) -> bool {
        root.get("openapi").is_some() || root.get("swagger").is_some()
    }

    /// JSON-Schema 2020-12 keywords (`$dynamicRef`, `$anchor`, ...) are meaningful.
    pub fn supports_dynamic_refs(self) -> bool {
        matches!(self, Dialect::OpenApi31 | Dialect::OpenApi32)
    }

    /// Pointer tokens of the container holding named schemas.
    pub fn schemas_path(self) -> &'static [&'static str] {
        match self {
            Dialect::Swagger2 => &["definitions"],
            _ => &["components", "schemas"],
        }
    }

    /// JSON Pointer fragment of the named schema, e.g. `/components/schemas/Pet`.
    pub fn schema_pointer(self, name: &str) -> String {
        let mut tokens: Vec<&str> = self.schemas_path().to_vec();
        tokens.push(name);
        pointer_from_tokens(tokens)
    }
}

/// The named-schema container of a root document, if present.
pub fn component_schemas(root: &NodeRef) -> Option<NodeRef> {
    let dialect = Dialect::detect(root.value());
    let mut node = root.clone();
    for token in dialect.schemas_path() {
        node = node.get(token)?;
    }
    Some(node)
}
