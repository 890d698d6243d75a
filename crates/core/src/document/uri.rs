//! URI normalization for cache keys.
//!
//! Every cache key goes through [`url::Url`] serialization so that equal URIs
//! compare equal as strings (`https://x` and `https://x/` map to the same key).

use std::path::Path;

use url::Url;

use crate::error::{OasError, Result};

/// Normalize an entry argument (local path or URL) to an absolute URI.
pub fn to_absolute_uri(input: &str) -> Result<String> {
    if looks_like_url(input) {
        return Url::parse(input)
            .map(|url| url.to_string())
            .map_err(|source| OasError::InvalidUri {
                input: input.to_string(),
                source,
            });
    }
    let absolute = std::path::absolute(Path::new(input)).map_err(|source| OasError::Io {
        uri: input.to_string(),
        source,
    })?;
    Url::from_file_path(&absolute)
        .map(|url| url.to_string())
        .map_err(|()| OasError::UnsupportedScheme {
            uri: absolute.display().to_string(),
        })
}

/// Whether the input carries a URL scheme rather than being a filesystem path.
///
/// Single-letter schemes are treated as Windows drive letters.
fn looks_like_url(input: &str) -> bool {
    match input.split_once("://") {
        Some((scheme, _)) => {
            scheme.len() > 1
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-' || c == '.')
        }
        None => input.starts_with("urn:"),
    }
}

/// Resolve `reference` against `base` (RFC 3986).
///
/// Falls back to parsing `reference` on its own when `base` is not a valid
/// absolute URI. Returns `None` if neither works.
pub fn resolve_uri(base: &str, reference: &str) -> Option<String> {
    match Url::parse(base) {
        Ok(base_url) => base_url.join(reference).ok().map(|url| url.to_string()),
        Err(_) => Url::parse(reference).ok().map(|url| url.to_string()),
    }
}

/// The part of a URI before the first `#`.
pub fn strip_fragment(uri: &str) -> &str {
    uri.split_once('#').map_or(uri, |(base, _)| base)
}

/// File extension of the last path segment, lowercased.
pub fn uri_extension(uri: &str) -> Option<String> {
    let without_query = strip_fragment(uri).split('?').next().unwrap_or_default();
    let segment = without_query.rsplit('/').next()?;
    let (_, extension) = segment.rsplit_once('.')?;
    Some(extension.to_ascii_lowercase())
}
