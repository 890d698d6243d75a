//! TypeScript rendering via the Emit trait.

use super::{TsLiteral, TsPrimitive, TsProp, TsType};
use crate::utils::quote_if_needed;

/// Render an IR node as TypeScript source text.
pub trait Emit {
    fn emit(&self) -> String;
}

impl Emit for TsPrimitive {
    fn emit(&self) -> String {
        match self {
            TsPrimitive::String => "string",
            TsPrimitive::Number => "number",
            TsPrimitive::Boolean => "boolean",
            TsPrimitive::Null => "null",
            TsPrimitive::Unknown => "unknown",
            TsPrimitive::File => "File",
        }
        .to_string()
    }
}

impl Emit for TsLiteral {
    fn emit(&self) -> String {
        match self {
            TsLiteral::String(s) => format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            TsLiteral::Int(i) => i.to_string(),
            TsLiteral::Number(n) => n.to_string(),
            TsLiteral::Bool(b) => b.to_string(),
        }
    }
}

impl Emit for TsProp {
    fn emit(&self) -> String {
        let optional = if self.optional { "?" } else { "" };
        format!("{}{optional}: {}", quote_if_needed(&self.name), self.ty.emit())
    }
}

impl Emit for TsType {
    fn emit(&self) -> String {
        match self {
            TsType::Primitive(p) => p.emit(),
            TsType::Array(inner) => match **inner {
                TsType::Union(_) | TsType::Intersection(_) => format!("({})[]", inner.emit()),
                _ => format!("{}[]", inner.emit()),
            },
            TsType::Union(types) => join(types, " | ", |_| false),
            TsType::Intersection(types) => join(types, " & ", |t| matches!(t, TsType::Union(_))),
            TsType::Object(props) if props.is_empty() => "{}".to_string(),
            TsType::Object(props) => {
                let body: Vec<String> = props.iter().map(Emit::emit).collect();
                format!("{{ {} }}", body.join("; "))
            }
            TsType::Record { key, value } => format!("Record<{}, {}>", key.emit(), value.emit()),
            TsType::Literal(literal) => literal.emit(),
            TsType::Ref(name) => name.clone(),
        }
    }
}

fn join(types: &[TsType], separator: &str, needs_parens: impl Fn(&TsType) -> bool) -> String {
    types
        .iter()
        .map(|t| {
            if needs_parens(t) {
                format!("({})", t.emit())
            } else {
                t.emit()
            }
        })
        .collect::<Vec<_>>()
        .join(separator)
}
