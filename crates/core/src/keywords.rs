//! Typed view of one schema node's keywords.
//!
//! Subschemas (`properties`, `items`, `oneOf`, ...) are walked through
//! [`NodeRef`] so they keep their identity; this struct only captures the
//! scalar keywords that drive type strings and validation rules.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::warn;

use crate::document::NodeRef;

/// Scalar keywords of a JSON Schema / OpenAPI Schema Object.
///
/// Every keyword is read on its own: a value of the wrong shape leaves that
/// keyword unset and keeps the others.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchemaKeywords {
    /// The type of the schema (string, number, integer, boolean, object, array).
    #[serde(rename = "type", deserialize_with = "lenient")]
    pub schema_type: Option<SchemaType>,

    #[serde(rename = "$ref", deserialize_with = "lenient")]
    pub ref_path: Option<String>,

    #[serde(rename = "$dynamicRef", deserialize_with = "lenient")]
    pub dynamic_ref: Option<String>,

    /// Format hint (e.g., date-time, email, binary).
    #[serde(deserialize_with = "lenient")]
    pub format: Option<String>,

    #[serde(deserialize_with = "lenient")]
    pub content_media_type: Option<String>,

    /// Constant value. `const: null` is kept as `Some(Value::Null)`.
    #[serde(rename = "const", deserialize_with = "present")]
    pub const_value: Option<Value>,

    #[serde(deserialize_with = "present")]
    pub default: Option<Value>,

    #[serde(rename = "enum", deserialize_with = "lenient")]
    pub enum_values: Option<Vec<Value>>,

    /// OpenAPI 3.0 nullable flag (3.1 uses type arrays instead).
    #[serde(deserialize_with = "lenient")]
    pub nullable: Option<bool>,

    /// Required property names for object types.
    #[serde(deserialize_with = "lenient")]
    pub required: Option<Vec<String>>,

    /// Object form (OAS 3.x) or a bare property name (Swagger 2.0).
    #[serde(deserialize_with = "discriminator")]
    pub discriminator: Option<Discriminator>,

    // --- Validation keywords ---
    #[serde(deserialize_with = "lenient")]
    pub pattern: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub minimum: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub maximum: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub exclusive_minimum: Option<ExclusiveBound>,
    #[serde(deserialize_with = "lenient")]
    pub exclusive_maximum: Option<ExclusiveBound>,
    #[serde(deserialize_with = "lenient")]
    pub multiple_of: Option<f64>,
    #[serde(deserialize_with = "count")]
    pub min_length: Option<u64>,
    #[serde(deserialize_with = "count")]
    pub max_length: Option<u64>,
    #[serde(deserialize_with = "count")]
    pub min_items: Option<u64>,
    #[serde(deserialize_with = "count")]
    pub max_items: Option<u64>,
    #[serde(deserialize_with = "lenient")]
    pub unique_items: Option<bool>,
    #[serde(deserialize_with = "count")]
    pub min_properties: Option<u64>,
    #[serde(deserialize_with = "count")]
    pub max_properties: Option<u64>,
    pub contains: Option<Value>,
    #[serde(deserialize_with = "count")]
    pub min_contains: Option<u64>,
    #[serde(deserialize_with = "count")]
    pub max_contains: Option<u64>,
    pub not: Option<Value>,
}

/// `exclusiveMinimum`/`exclusiveMaximum`: a bound in OAS 3.1, a flag
/// modifying `minimum`/`maximum` in OAS 3.0 and Swagger 2.0.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ExclusiveBound {
    Flag(bool),
    Value(f64),
}

/// Schema type can be a single type or an array of types (for nullable).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

impl SchemaType {
    /// Declared type names, in order.
    pub fn names(&self) -> Vec<&str> {
        match self {
            SchemaType::Single(name) => vec![name.as_str()],
            SchemaType::Multiple(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

/// Discriminator for polymorphic `oneOf` schemas.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
    /// The property name that contains the discriminator value.
    pub property_name: String,
    /// Discriminator value → schema `$ref` (or schema name), in document order.
    #[serde(default)]
    pub mapping: Map<String, Value>,
    /// OAS 3.2: branch to use when the payload carries no discriminator value.
    pub default_mapping: Option<String>,
}

/// `discriminator` as written in the document.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DiscriminatorForm {
    PropertyName(String),
    Object(Discriminator),
}

impl From<DiscriminatorForm> for Discriminator {
    fn from(form: DiscriminatorForm) -> Self {
        match form {
            DiscriminatorForm::PropertyName(property_name) => Self {
                property_name,
                mapping: Map::new(),
                default_mapping: None,
            },
            DiscriminatorForm::Object(discriminator) => discriminator,
        }
    }
}

impl Discriminator {
    /// Mapping entries whose targets are strings, in document order.
    pub fn mapping_entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.mapping
            .iter()
            .filter_map(|(key, target)| Some((key.as_str(), target.as_str()?)))
    }
}

impl SchemaKeywords {
    /// Read the keywords of `node`; a non-object node has none.
    pub fn of(node: &NodeRef) -> Self {
        if !node.is_object() {
            return Self::default();
        }
        match Self::deserialize(node.value()) {
            Ok(keywords) => keywords,
            Err(err) => {
                warn!(
                    pointer = node.pointer(),
                    uri = node.document().retrieval_uri(),
                    error = %err,
                    "Schema keywords are malformed, ignoring them."
                );
                Self::default()
            }
        }
    }

    /// Whether the schema declares `name` among its types.
    pub fn has_type(&self, name: &str) -> bool {
        self.schema_type
            .as_ref()
            .is_some_and(|types| types.names().contains(&name))
    }

    /// Whether `null` is an accepted value (`type: [.., "null"]` or `nullable: true`).
    pub fn is_nullable(&self) -> bool {
        self.nullable == Some(true) || self.has_type("null")
    }

    /// Declared types other than `null`.
    pub fn non_null_types(&self) -> Vec<&str> {
        self.schema_type
            .as_ref()
            .map(|types| types.names().into_iter().filter(|t| *t != "null").collect())
            .unwrap_or_default()
    }
}

/// Deserialize a keyword that may legitimately be `null` as `Some(Value::Null)`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Read a keyword as `T`, or leave it unset if its value has another shape.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// Non-negative integer keyword; whole floats such as `1e6` are accepted.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n < u64::MAX as f64)
            .map(|n| n as u64)
    }))
}

fn discriminator<'de, D>(deserializer: D) -> Result<Option<Discriminator>, D::Error>
where
    D: Deserializer<'de>,
{
    let form: Option<DiscriminatorForm> = lenient(deserializer)?;
    Ok(form.map(Discriminator::from))
}
