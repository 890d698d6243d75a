//! Schema → TypeScript type conversion.

use serde_json::Value;
use tracing::warn;

use super::{Emit, TsPrimitive, TsProp, TsType};
use crate::document::NodeRef;
use crate::keywords::SchemaKeywords;
use crate::resolver::Resolver;
use crate::utils::{pascal_case, ref_tail};

/// Nesting depth after which a schema is rendered as `unknown`.
pub const MAX_TYPE_DEPTH: usize = 16;

/// TypeScript type of `schema` as source text, e.g. `Pet[]` or `"a" | "b" | null`.
pub fn schema_type_string(resolver: &Resolver<'_>, schema: &NodeRef) -> String {
    schema_ts_type(resolver, schema).emit()
}

/// TypeScript type model of `schema`, before rendering.
pub fn schema_ts_type(resolver: &Resolver<'_>, schema: &NodeRef) -> TsType {
    convert(resolver, schema, 0)
}

fn convert(resolver: &Resolver<'_>, schema: &NodeRef, depth: usize) -> TsType {
    if depth > MAX_TYPE_DEPTH {
        return TsType::UNKNOWN;
    }
    if !schema.is_object() {
        // `true` / `{}` accept anything; `false` accepts nothing worth typing.
        return TsType::UNKNOWN;
    }

    let keywords = SchemaKeywords::of(schema);

    // Named schemas are emitted by name, not inlined.
    if let Some(ref_path) = &keywords.ref_path {
        return TsType::Ref(pascal_case(&ref_tail(ref_path)));
    }
    if keywords.dynamic_ref.is_some() {
        return match resolver.resolve(schema) {
            Some(resolved) => convert(resolver, &resolved, depth + 1),
            None => {
                warn!(pointer = schema.pointer(), "Unresolvable $dynamicRef rendered as unknown.");
                TsType::UNKNOWN
            }
        };
    }

    let ty = if let Some(value) = &keywords.const_value {
        TsType::literal(value)
    } else if let Some(values) = &keywords.enum_values {
        TsType::union(values.iter().map(TsType::literal))
    } else if let Some(all_of) = schema.get("allOf") {
        TsType::intersection(
            all_of
                .items()
                .iter()
                .map(|member| convert(resolver, member, depth + 1))
                .collect(),
        )
    } else if let Some(branches) = schema.get("anyOf").or_else(|| schema.get("oneOf")) {
        TsType::union(
            branches
                .items()
                .iter()
                .map(|branch| convert(resolver, branch, depth + 1)),
        )
    } else {
        from_declared_types(resolver, schema, &keywords, depth)
    };

    if keywords.is_nullable() { ty.nullable() } else { ty }
}

fn from_declared_types(
    resolver: &Resolver<'_>,
    schema: &NodeRef,
    keywords: &SchemaKeywords,
    depth: usize,
) -> TsType {
    let declared = keywords.non_null_types();
    if declared.is_empty() {
        if keywords.has_type("null") {
            return TsType::NULL;
        }
        // Untyped schemas are inferred from their structural keywords.
        if is_object_like(schema) {
            return object_type(resolver, schema, keywords, depth);
        }
        if schema.has("items") {
            return array_type(resolver, schema, depth);
        }
        return TsType::UNKNOWN;
    }
    TsType::union(
        declared
            .into_iter()
            .map(|name| named_type(resolver, name, schema, keywords, depth)),
    )
}

fn named_type(
    resolver: &Resolver<'_>,
    name: &str,
    schema: &NodeRef,
    keywords: &SchemaKeywords,
    depth: usize,
) -> TsType {
    match name {
        "string" if is_binary(keywords) => TsType::Primitive(TsPrimitive::File),
        "string" => TsType::Primitive(TsPrimitive::String),
        "file" => TsType::Primitive(TsPrimitive::File),
        "integer" | "number" => TsType::Primitive(TsPrimitive::Number),
        "boolean" => TsType::Primitive(TsPrimitive::Boolean),
        "null" => TsType::NULL,
        "array" => array_type(resolver, schema, depth),
        "object" => object_type(resolver, schema, keywords, depth),
        _ => TsType::UNKNOWN,
    }
}

fn array_type(resolver: &Resolver<'_>, schema: &NodeRef, depth: usize) -> TsType {
    let item = schema
        .get("items")
        .map_or(TsType::UNKNOWN, |items| convert(resolver, &items, depth + 1));
    TsType::Array(Box::new(item))
}

fn object_type(
    resolver: &Resolver<'_>,
    schema: &NodeRef,
    keywords: &SchemaKeywords,
    depth: usize,
) -> TsType {
    let required = keywords.required.as_deref().unwrap_or_default();
    let props: Option<Vec<TsProp>> = schema.get("properties").map(|properties| {
        properties
            .entries()
            .into_iter()
            .map(|(name, property)| TsProp {
                ty: convert(resolver, &property, depth + 1),
                optional: !required.contains(&name),
                name,
            })
            .collect()
    });
    let additional = additional_value_type(resolver, schema, depth);

    match (props, additional) {
        (Some(props), Some(record)) if !props.is_empty() => TsType::Intersection(vec![
            TsType::Object(props),
            TsType::string_record(record),
        ]),
        (_, Some(record)) => TsType::string_record(record),
        (Some(props), None) => TsType::Object(props),
        (None, None) if forbids_additional(schema) => TsType::Object(Vec::new()),
        (None, None) => TsType::string_record(TsType::UNKNOWN),
    }
}

/// Value type of dynamically named members, if the object admits any.
fn additional_value_type(resolver: &Resolver<'_>, schema: &NodeRef, depth: usize) -> Option<TsType> {
    if let Some(patterns) = schema.get("patternProperties")
        && let Some((_, first)) = patterns.entries().into_iter().next()
    {
        return Some(convert(resolver, &first, depth + 1));
    }
    for keyword in ["additionalProperties", "unevaluatedProperties"] {
        match schema.get(keyword) {
            Some(node) if node.is_object() => return Some(convert(resolver, &node, depth + 1)),
            Some(node) if node.value().as_bool() == Some(true) => return Some(TsType::UNKNOWN),
            _ => {}
        }
    }
    None
}

fn forbids_additional(schema: &NodeRef) -> bool {
    schema
        .value()
        .get("additionalProperties")
        .and_then(Value::as_bool)
        == Some(false)
}

fn is_object_like(schema: &NodeRef) -> bool {
    ["properties", "additionalProperties", "patternProperties", "unevaluatedProperties"]
        .iter()
        .any(|keyword| schema.has(keyword))
}

/// Binary payloads bind to `File` inputs.
fn is_binary(keywords: &SchemaKeywords) -> bool {
    if keywords.format.as_deref() == Some("binary") {
        return true;
    }
    keywords
        .content_media_type
        .as_deref()
        .is_some_and(|media| !media.contains("json") && !media.starts_with("text/"))
}
