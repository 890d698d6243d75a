//! Cross-document checks run after loading.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::cache::DocumentCache;
use crate::dialect::Dialect;
use crate::document::NodeRef;
use crate::error::{OasError, Result};

/// HTTP methods that may carry an operation on a Path Item.
const PATH_ITEM_METHODS: [&str; 9] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace", "query",
];

/// Validate every loaded OpenAPI/Swagger root document.
///
/// Fails if any `operationId` is declared more than once across all documents.
pub fn validate_documents(cache: &DocumentCache) -> Result<()> {
    let mut seen: HashMap<String, Vec<String>> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for document in cache.documents() {
        let root = document.value();
        if !Dialect::is_root_document(root) {
            continue;
        }
        let uri = document.document().retrieval_uri();
        let dialect = Dialect::detect(root);
        if dialect == Dialect::Unknown {
            warn!(%uri, "Unrecognized OpenAPI/Swagger version, continuing with best effort.");
        } else if !dialect.supports_dynamic_refs() && contains_key(root, "$dynamicRef") {
            warn!(%uri, ?dialect, "$dynamicRef used in a dialect that does not define it.");
        }

        for (context, operation) in operations_of(document) {
            let Some(operation_id) = operation.str_field("operationId") else {
                continue;
            };
            let location = format!("{uri}::{context}");
            let locations = seen.entry(operation_id.to_string()).or_default();
            if locations.is_empty() {
                order.push(operation_id.to_string());
            }
            locations.push(location);
        }
    }

    for operation_id in order {
        if let Some(locations) = seen.remove(&operation_id)
            && locations.len() > 1
        {
            return Err(OasError::DuplicateOperationId {
                operation_id,
                locations,
            });
        }
    }

    debug!(documents = cache.documents().len(), "Validated loaded documents.");
    Ok(())
}

/// Every operation of a root document, with a human-readable context path.
fn operations_of(document: &NodeRef) -> Vec<(String, NodeRef)> {
    let mut operations = Vec::new();

    if let Some(paths) = document.get("paths") {
        collect_path_items(&paths, "paths", &mut operations);
    }
    if let Some(webhooks) = document.get("webhooks") {
        collect_path_items(&webhooks, "webhooks", &mut operations);
    }
    if let Some(components) = document.get("components") {
        for section in ["pathItems", "webhooks"] {
            if let Some(items) = components.get(section) {
                collect_path_items(&items, &format!("components.{section}"), &mut operations);
            }
        }
        if let Some(callbacks) = components.get("callbacks") {
            for (name, callback) in callbacks.entries() {
                collect_path_items(
                    &callback,
                    &format!("components.callbacks.{name}"),
                    &mut operations,
                );
            }
        }
    }

    operations
}

/// Collect operations from a map of name → Path Item.
fn collect_path_items(items: &NodeRef, prefix: &str, out: &mut Vec<(String, NodeRef)>) {
    for (name, item) in items.entries() {
        // Referenced path items are checked in the document that defines them.
        if item.has("$ref") {
            continue;
        }
        for method in PATH_ITEM_METHODS {
            if let Some(operation) = item.get(method) {
                out.push((format!("{prefix}.{name}.{method}"), operation));
            }
        }
        if let Some(additional) = item.get("additionalOperations") {
            for (method, operation) in additional.entries() {
                out.push((format!("{prefix}.{name}.{method}"), operation));
            }
        }
    }
}

fn contains_key(value: &serde_json::Value, key: &str) -> bool {
    match value {
        serde_json::Value::Object(obj) => {
            obj.contains_key(key) || obj.values().any(|v| contains_key(v, key))
        }
        serde_json::Value::Array(items) => items.iter().any(|v| contains_key(v, key)),
        _ => false,
    }
}
