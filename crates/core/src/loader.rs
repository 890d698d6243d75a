//! Document loading.
//!
//! Reads the entry document from disk or over HTTP, then walks every
//! `$ref` / `$dynamicRef` / `operationRef` it contains and loads each referenced
//! document once, depth-first. Each document is indexed as soon as it is
//! registered so later discovery sees its `$id` bases.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;

use crate::cache::{DocumentCache, logical_base_uri};
use crate::config::LoaderConfig;
use crate::document::NodeRef;
use crate::document::pointer::split_reference;
use crate::document::uri::{resolve_uri, strip_fragment, to_absolute_uri, uri_extension};
use crate::error::{OasError, Result};
use crate::validate::validate_documents;

/// Keywords whose values locate other documents.
const LOCATOR_KEYWORDS: [&str; 3] = ["$ref", "$dynamicRef", "operationRef"];

/// A fully loaded and validated document set.
#[derive(Debug)]
pub struct LoadedSpec {
    /// Root of the entry document.
    pub entry: NodeRef,
    /// Absolute retrieval URI of the entry document.
    pub entry_uri: String,
    pub cache: DocumentCache,
}

impl LoadedSpec {
    /// Wrap an already populated cache, validating every root document in it.
    pub fn from_cache(cache: DocumentCache, entry_uri: &str) -> Result<Self> {
        let entry = cache
            .get(entry_uri)
            .cloned()
            .ok_or_else(|| OasError::NotFound {
                uri: entry_uri.to_string(),
            })?;
        validate_documents(&cache)?;
        Ok(Self {
            entry,
            entry_uri: entry_uri.to_string(),
            cache,
        })
    }
}

/// Parse a single in-memory document. External references are not followed.
pub fn load_from_str(uri: &str, content: &str) -> Result<LoadedSpec> {
    let uri = to_absolute_uri(uri)?;
    let root = parse_document(&uri, content)?;
    let mut cache = DocumentCache::new();
    cache.register_document(&uri, root);
    LoadedSpec::from_cache(cache, &uri)
}

/// Loads document sets from local files and HTTP(S) URLs.
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    client: reqwest::Client,
    config: LoaderConfig,
}

impl DocumentLoader {
    /// Build a loader with its HTTP client.
    pub fn new(config: LoaderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(OasError::Client)?;
        Ok(Self { client, config })
    }

    /// Load `entry` (path or URL) and everything it transitively references.
    ///
    /// The entry document must load. A referenced document that does not exist
    /// is skipped with a warning; any other failure aborts the load.
    pub async fn load(&self, entry: &str) -> Result<LoadedSpec> {
        let entry_uri = to_absolute_uri(entry)?;
        info!(uri = %entry_uri, "Loading OpenAPI document");

        let root = self.fetch_document(&entry_uri).await?;
        let mut cache = DocumentCache::new();
        let entry_node = cache.register_document(&entry_uri, root);

        let mut visited: HashSet<String> = HashSet::from([entry_uri.clone()]);
        let mut pending: Vec<String> = external_targets(&cache, &entry_node);
        pending.reverse();

        while let Some(uri) = pending.pop() {
            if cache.contains(&uri) || !visited.insert(uri.clone()) {
                continue;
            }
            let root = match self.fetch_document(&uri).await {
                Ok(root) => root,
                Err(err) if err.is_not_found() || matches!(err, OasError::UnsupportedScheme { .. }) => {
                    warn!(uri = %uri, error = %err, "Referenced document could not be loaded, skipping.");
                    continue;
                }
                Err(err) => return Err(err),
            };
            let node = cache.register_document(&uri, root);
            debug!(uri = %uri, "Loaded referenced document.");

            let mut discovered = external_targets(&cache, &node);
            discovered.reverse();
            pending.extend(discovered);
        }

        debug!(
            documents = cache.documents().len(),
            keys = cache.len(),
            "Document set loaded."
        );
        LoadedSpec::from_cache(cache, &entry_uri)
    }

    async fn fetch_document(&self, uri: &str) -> Result<Value> {
        let url = Url::parse(uri).map_err(|source| OasError::InvalidUri {
            input: uri.to_string(),
            source,
        })?;
        let content = match url.scheme() {
            "file" => read_local(&url, uri).await?,
            "http" | "https" => {
                fetch_with_retry(&self.config, uri, || self.fetch_remote(uri)).await?
            }
            _ => {
                return Err(OasError::UnsupportedScheme {
                    uri: uri.to_string(),
                });
            }
        };
        parse_document(uri, &content)
    }

    async fn fetch_remote(&self, uri: &str) -> Result<String> {
        let http_error = |source| OasError::Http {
            uri: uri.to_string(),
            source,
        };
        let response = self.client.get(uri).send().await.map_err(http_error)?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(OasError::NotFound {
                uri: uri.to_string(),
            });
        }
        if !status.is_success() {
            return Err(OasError::HttpStatus {
                uri: uri.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().await.map_err(http_error)
    }
}

async fn read_local(url: &Url, uri: &str) -> Result<String> {
    let path = url
        .to_file_path()
        .map_err(|()| OasError::UnsupportedScheme {
            uri: uri.to_string(),
        })?;
    tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => OasError::NotFound {
                uri: uri.to_string(),
            },
            _ => OasError::Io {
                uri: uri.to_string(),
                source,
            },
        })
}

/// Run `operation` with exponential backoff. Only transport errors and 5xx
/// responses are retried.
async fn fetch_with_retry<T, F, Fut>(config: &LoaderConfig, uri: &str, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = config.max_retries.max(1);
    let mut attempt = 0;
    loop {
        attempt += 1;
        match operation().await {
            Ok(result) => return Ok(result),
            Err(err) if attempt < attempts && is_retryable(&err) => {
                let factor = 1u64.checked_shl(attempt - 1).unwrap_or(u64::MAX);
                let delay = config.initial_retry_delay_ms.saturating_mul(factor);
                warn!(
                    attempt,
                    max_retries = attempts,
                    delay_ms = delay,
                    uri,
                    error = %err,
                    "HTTP request failed, retrying"
                );
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            Err(err) => return Err(err),
        }
    }
}

fn is_retryable(err: &OasError) -> bool {
    match err {
        OasError::Http { .. } => true,
        OasError::HttpStatus { status, .. } => *status >= 500,
        _ => false,
    }
}

/// Parse document text, choosing the format from the URI extension.
///
/// Without a `.json`/`.yaml`/`.yml` extension JSON is tried first, then YAML.
pub fn parse_document(uri: &str, content: &str) -> Result<Value> {
    let parse_error = |json: String, yaml: String| OasError::Parse {
        uri: uri.to_string(),
        json,
        yaml,
    };
    match uri_extension(uri).as_deref() {
        Some("json") => serde_json::from_str(content)
            .map_err(|e| parse_error(e.to_string(), "not attempted for .json".to_string())),
        Some("yaml" | "yml") => serde_yaml::from_str(content)
            .map_err(|e| parse_error("not attempted for .yaml".to_string(), e.to_string())),
        _ => match serde_json::from_str(content) {
            Ok(value) => Ok(value),
            Err(json_err) => serde_yaml::from_str(content)
                .map_err(|yaml_err| parse_error(json_err.to_string(), yaml_err.to_string())),
        },
    }
}

/// Distinct document URIs referenced from `document`, in document order.
///
/// Each reference is resolved against the base URI recorded for the node
/// carrying it, so references under a nested `$id` resolve against that `$id`.
fn external_targets(cache: &DocumentCache, document: &NodeRef) -> Vec<String> {
    let fallback_base = logical_base_uri(document, document.document().retrieval_uri());
    let mut targets: Vec<String> = Vec::new();
    let mut stack = vec![document.clone()];

    while let Some(node) = stack.pop() {
        if let Some(obj) = node.as_object() {
            for keyword in LOCATOR_KEYWORDS {
                let Some(Value::String(reference)) = obj.get(keyword) else {
                    continue;
                };
                let (file_path, _) = split_reference(reference);
                if file_path.is_empty() {
                    continue;
                }
                let base = cache
                    .provenance(&node)
                    .map_or(fallback_base.as_str(), |p| p.base_uri.as_str());
                match resolve_uri(base, file_path) {
                    Some(uri) => {
                        let uri = strip_fragment(&uri).to_string();
                        if !targets.contains(&uri) {
                            targets.push(uri);
                        }
                    }
                    None => warn!(reference, base, "Reference cannot be resolved to a URI."),
                }
            }
        }
        let mut children = node.children();
        children.retain(|child| child.value().is_object() || child.value().is_array());
        stack.extend(children.into_iter().rev());
    }

    targets
}
