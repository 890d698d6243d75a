//! TypeScript type IR used to render schema type strings.
//!
//! - [`TsType`]: types (primitives, arrays, unions, objects, records, literals)
//! - [`Emit`]: rendering of IR nodes to TypeScript source text
//! - [`schema_type_string`]: the schema → type string conversion

mod convert;
mod emit;

pub use convert::{MAX_TYPE_DEPTH, schema_ts_type, schema_type_string};
pub use emit::Emit;

use serde_json::Value;

/// TypeScript type representation
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    Primitive(TsPrimitive),
    /// Array type: T[]
    Array(Box<TsType>),
    /// Union type: A | B | C
    Union(Vec<TsType>),
    /// Intersection type: A & B
    Intersection(Vec<TsType>),
    /// Object type: { foo: string; bar?: number }
    Object(Vec<TsProp>),
    /// Record<K, V>
    Record {
        key: Box<TsType>,
        value: Box<TsType>,
    },
    Literal(TsLiteral),
    /// Named type reference
    Ref(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TsPrimitive {
    String,
    Number,
    Boolean,
    Null,
    Unknown,
    /// Browser `File`, for binary uploads.
    File,
}

/// Object property definition
#[derive(Debug, Clone, PartialEq)]
pub struct TsProp {
    pub name: String,
    pub ty: TsType,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TsLiteral {
    String(String),
    Int(i64),
    Number(f64),
    Bool(bool),
}

impl TsType {
    pub const UNKNOWN: TsType = TsType::Primitive(TsPrimitive::Unknown);
    pub const NULL: TsType = TsType::Primitive(TsPrimitive::Null);

    /// Union of `types`, flattening nested unions and dropping duplicates.
    /// A single member is returned as-is.
    pub fn union(types: impl IntoIterator<Item = TsType>) -> TsType {
        let mut members: Vec<TsType> = Vec::new();
        for ty in types {
            let flattened = match ty {
                TsType::Union(inner) => inner,
                other => vec![other],
            };
            for member in flattened {
                if !members.contains(&member) {
                    members.push(member);
                }
            }
        }
        match members.len() {
            0 => TsType::UNKNOWN,
            1 => members.remove(0),
            _ => TsType::Union(members),
        }
    }

    /// Intersection of `types`; a single member is returned as-is.
    pub fn intersection(mut types: Vec<TsType>) -> TsType {
        match types.len() {
            0 => TsType::UNKNOWN,
            1 => types.remove(0),
            _ => TsType::Intersection(types),
        }
    }

    /// `Record<string, value>`.
    pub fn string_record(value: TsType) -> TsType {
        TsType::Record {
            key: Box::new(TsType::Primitive(TsPrimitive::String)),
            value: Box::new(value),
        }
    }

    /// `T | null`, unless `T` already admits `null`.
    pub fn nullable(self) -> TsType {
        TsType::union([self, TsType::NULL])
    }

    /// Literal type of a JSON scalar; structured values become `unknown`.
    pub fn literal(value: &Value) -> TsType {
        let literal = match value {
            Value::Null => return TsType::NULL,
            Value::Bool(b) => TsLiteral::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => TsLiteral::Int(i),
                None => TsLiteral::Number(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => TsLiteral::String(s.clone()),
            Value::Array(_) | Value::Object(_) => return TsType::UNKNOWN,
        };
        TsType::Literal(literal)
    }
}
