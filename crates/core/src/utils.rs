//! Naming helpers shared by the type-string function and the form analyzer.

use std::collections::HashSet;
use std::sync::LazyLock;

use convert_case::{Case, Casing};

use crate::document::pointer::{is_json_pointer, pointer_tokens, split_reference};

/// TypeScript reserved words that cannot be used as identifiers.
pub static TS_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete",
        "do", "else", "enum", "export", "extends", "false", "finally", "for", "function", "if",
        "import", "in", "instanceof", "new", "null", "return", "super", "switch", "this", "throw",
        "true", "try", "typeof", "var", "void", "while", "with", "yield", "let", "static",
        "implements", "interface", "package", "private", "protected", "public", "await", "async",
    ])
});

/// Whether a property name must be quoted to be used as an object key.
pub fn needs_quoting(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return true;
    };
    let is_ident = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '$';
    !(first.is_ascii_alphabetic() || first == '_' || first == '$') || !chars.all(is_ident)
}

/// Quote a property key if it is not a valid identifier.
pub fn quote_if_needed(name: &str) -> String {
    if needs_quoting(name) {
        format!("\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        name.to_string()
    }
}

/// Turn an arbitrary property name into a usable TypeScript identifier.
///
/// `-`, `.` and spaces act as word separators (`foo-bar` → `fooBar`); any other
/// character that cannot appear in an identifier is dropped. Names starting
/// with a digit and reserved words get a `_` prefix.
pub fn sanitize_ts_identifier(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if matches!(c, '-' | '.' | ' ') {
            upper_next = !result.is_empty();
        } else if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
            if upper_next {
                result.push(c.to_ascii_uppercase());
                upper_next = false;
            } else {
                result.push(c);
            }
        }
    }

    if result.is_empty() {
        return "_empty".to_string();
    }
    if result.starts_with(|c: char| c.is_ascii_digit())
        || TS_RESERVED_WORDS.contains(result.as_str())
    {
        result.insert(0, '_');
    }
    result
}

/// `pet_owner` → `PetOwner`.
pub fn pascal_case(name: &str) -> String {
    name.to_case(Case::Pascal)
}

/// `pet_owner` → `petOwner`.
pub fn camel_case(name: &str) -> String {
    name.to_case(Case::Camel)
}

/// Naive English singular of a plural property name (`categories` → `category`).
pub fn singularize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if lower.ends_with("ies") && word.len() > 3 {
        format!("{}y", &word[..word.len() - 3])
    } else if ["sses", "xes", "ches", "shes", "zes"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        word[..word.len() - 2].to_string()
    } else if lower.ends_with('s') && !lower.ends_with("ss") && word.len() > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

/// Name a reference points at: the last pointer token, the anchor name, or
/// the file stem when there is no fragment.
///
/// `#/components/schemas/Cat` → `Cat`, `pets.yaml#Dog` → `Dog`, `pet.yaml` → `pet`.
pub fn ref_tail(reference: &str) -> String {
    let (file_path, fragment) = split_reference(reference);
    if is_json_pointer(&fragment) {
        if let Some(last) = pointer_tokens(&fragment).pop() {
            return last;
        }
    } else if !fragment.is_empty() {
        return fragment;
    }
    let segment = file_path.rsplit('/').next().unwrap_or(file_path);
    segment
        .split_once('.')
        .map_or(segment, |(stem, _)| stem)
        .to_string()
}
