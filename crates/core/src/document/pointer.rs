//! JSON Pointer (RFC 6901) and reference-string helpers.

use percent_encoding::percent_decode_str;

/// Escape one reference token for use inside a JSON Pointer.
pub fn escape_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

/// Undo [`escape_token`]. `~1` is replaced before `~0` so `~01` stays `~1`.
pub fn unescape_token(token: &str) -> String {
    token.replace("~1", "/").replace("~0", "~")
}

/// Split a reference into its file part and its percent-decoded fragment.
///
/// `"other.yaml#/components/schemas/Pet"` → `("other.yaml", "/components/schemas/Pet")`,
/// `"#Node"` → `("", "Node")`, `"other.yaml"` → `("other.yaml", "")`.
pub fn split_reference(reference: &str) -> (&str, String) {
    match reference.split_once('#') {
        Some((file_path, fragment)) => (file_path, decode_fragment(fragment)),
        None => (reference, String::new()),
    }
}

/// Percent-decode a fragment, keeping the raw text if it is not valid UTF-8.
pub fn decode_fragment(fragment: &str) -> String {
    percent_decode_str(fragment)
        .decode_utf8()
        .map_or_else(|_| fragment.to_string(), |decoded| decoded.into_owned())
}

/// Whether a fragment addresses a node by JSON Pointer rather than by anchor name.
pub fn is_json_pointer(fragment: &str) -> bool {
    fragment.starts_with('/')
}

/// Split a JSON Pointer fragment into unescaped reference tokens.
pub fn pointer_tokens(fragment: &str) -> Vec<String> {
    if fragment.is_empty() {
        return Vec::new();
    }
    fragment
        .strip_prefix('/')
        .unwrap_or(fragment)
        .split('/')
        .map(unescape_token)
        .collect()
}

/// Build a JSON Pointer from unescaped tokens.
pub fn pointer_from_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>) -> String {
    tokens
        .into_iter()
        .map(|token| format!("/{}", escape_token(token)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_roundtrip_special_characters() {
        assert_eq!(escape_token("a/b~c"), "a~1b~0c");
        assert_eq!(unescape_token("a~1b~0c"), "a/b~c");
        assert_eq!(unescape_token("~01"), "~1");
    }

    #[test]
    fn test_split_reference() {
        assert_eq!(
            split_reference("other.yaml#/components/schemas/Pet"),
            ("other.yaml", "/components/schemas/Pet".to_string())
        );
        assert_eq!(split_reference("#node"), ("", "node".to_string()));
        assert_eq!(split_reference("other.yaml"), ("other.yaml", String::new()));
        assert_eq!(
            split_reference("#/paths/~1pets%7Bid%7D"),
            ("", "/paths/~1pets{id}".to_string())
        );
    }

    #[test]
    fn test_pointer_tokens() {
        assert!(pointer_tokens("").is_empty());
        assert_eq!(
            pointer_tokens("/paths/~1pets/get"),
            vec!["paths".to_string(), "/pets".to_string(), "get".to_string()]
        );
        assert_eq!(pointer_tokens("/"), vec![String::new()]);
    }

    #[test]
    fn test_pointer_from_tokens() {
        assert_eq!(
            pointer_from_tokens(["components", "schemas", "a/b"]),
            "/components/schemas/a~1b"
        );
        assert_eq!(pointer_from_tokens(Vec::<&str>::new()), "");
    }

    #[test]
    fn test_is_json_pointer() {
        assert!(is_json_pointer("/components"));
        assert!(!is_json_pointer("node"));
        assert!(!is_json_pointer(""));
    }
}
