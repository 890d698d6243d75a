//! Building [`FormResource`]s from schemas.

use std::collections::HashSet;

use tracing::{debug, warn};

use super::model::{FormProperty, FormResource};
use crate::dialect::Dialect;
use crate::document::{NodeKey, NodeRef};
use crate::error::{OasError, Result};
use crate::resolver::Resolver;

impl FormResource {
    /// Collect the properties of `schema`, including those inherited through `allOf`.
    pub fn from_schema(resolver: &Resolver<'_>, model_name: &str, schema: &NodeRef) -> Self {
        let resolved = resolver.resolve(schema);
        if resolved.is_none() {
            warn!(model = model_name, "Model schema could not be resolved, building an empty form.");
        }
        let properties = resolved
            .as_ref()
            .map(|node| merged_properties(resolver, node))
            .unwrap_or_default();
        Self {
            model_name: model_name.to_string(),
            properties,
            schema: resolved,
        }
    }

    /// Look up a named schema of the entry document (`components.schemas` or
    /// `definitions`).
    pub fn from_component(resolver: &Resolver<'_>, dialect: Dialect, name: &str) -> Result<Self> {
        let pointer = dialect.schema_pointer(name);
        let schema = resolver
            .resolve_pointer(&pointer)
            .ok_or_else(|| OasError::SchemaNotFound {
                name: name.to_string(),
            })?;
        Ok(Self::from_schema(resolver, name, &schema))
    }
}

/// Own `properties` of `schema` followed by those of its `allOf` members,
/// transitively. Own properties win over inherited ones of the same name;
/// unresolvable members are skipped.
pub fn merged_properties(resolver: &Resolver<'_>, schema: &NodeRef) -> Vec<FormProperty> {
    let mut properties: Vec<FormProperty> = Vec::new();
    let mut required: Vec<String> = Vec::new();
    let mut seen: HashSet<NodeKey> = HashSet::new();
    let mut stack: Vec<NodeRef> = vec![schema.clone()];

    while let Some(node) = stack.pop() {
        let Some(resolved) = resolver.resolve(&node) else {
            debug!(pointer = node.pointer(), "Skipping unresolvable allOf member.");
            continue;
        };
        if let Some(key) = resolved.key()
            && !seen.insert(key)
        {
            continue;
        }

        if let Some(own) = resolved.get("properties") {
            for (name, property) in own.entries() {
                if !properties.iter().any(|p| p.name == name) {
                    properties.push(FormProperty {
                        name,
                        schema: property,
                        required: false,
                    });
                }
            }
        }
        if let Some(names) = resolved.value().get("required").and_then(|r| r.as_array()) {
            required.extend(names.iter().filter_map(|n| n.as_str()).map(str::to_string));
        }
        if let Some(all_of) = resolved.get("allOf") {
            stack.extend(all_of.items().into_iter().rev());
        }
    }

    for property in &mut properties {
        property.required = required.contains(&property.name);
    }
    properties
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::cache::DocumentCache;
    use serde_json::json;

    fn cache() -> DocumentCache {
        let mut cache = DocumentCache::new();
        cache.register_document(
            "file:///api.yaml",
            json!({
                "openapi": "3.1.0",
                "components": {
                    "schemas": {
                        "Base": {
                            "required": ["name"],
                            "properties": { "name": { "type": "string" }, "kind": { "type": "string" } }
                        },
                        "Cat": {
                            "allOf": [{ "$ref": "#/components/schemas/Base" }, { "$ref": "#/components/schemas/Missing" }],
                            "required": ["kind"],
                            "properties": { "kind": { "enum": ["cat"] }, "meow": { "type": "boolean" } }
                        },
                        "Loop": {
                            "allOf": [{ "$ref": "#/components/schemas/Loop" }],
                            "properties": { "x": { "type": "integer" } }
                        }
                    }
                }
            }),
        );
        cache
    }

    #[test]
    fn test_own_properties_win_and_required_merges() {
        let cache = cache();
        let resolver = Resolver::new(&cache, "file:///api.yaml");
        let resource = FormResource::from_component(&resolver, Dialect::OpenApi31, "Cat").unwrap();
        let names: Vec<_> = resource.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["kind", "meow", "name"]);

        let kind = &resource.properties[0];
        assert!(kind.required);
        assert_eq!(kind.schema.value()["enum"][0], "cat");
        assert!(!resource.properties[1].required);
        assert!(resource.properties[2].required);
    }

    #[test]
    fn test_self_inheritance_terminates() {
        let cache = cache();
        let resolver = Resolver::new(&cache, "file:///api.yaml");
        let resource = FormResource::from_component(&resolver, Dialect::OpenApi31, "Loop").unwrap();
        assert_eq!(resource.properties.len(), 1);
    }

    #[test]
    fn test_missing_component() {
        let cache = cache();
        let resolver = Resolver::new(&cache, "file:///api.yaml");
        let err = FormResource::from_component(&resolver, Dialect::OpenApi31, "Nope").unwrap_err();
        assert!(matches!(err, OasError::SchemaNotFound { .. }));
    }
}
