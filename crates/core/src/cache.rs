//! Per-run document cache.
//!
//! Maps every known URI (retrieval URI, `$self` alias, `$id` bases, anchor URIs)
//! to a node, and holds the provenance side table filled in by indexing. One
//! cache is created per generation run and never shared between runs.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::document::uri::{resolve_uri, strip_fragment};
use crate::document::{DocumentId, NodeKey, NodeRef};
use crate::index::index_schema_ids;

/// Where a node came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provenance {
    /// Nearest enclosing `$id`, or the document's logical URI.
    pub base_uri: String,
    /// Retrieval URI of the document that physically defines the node.
    pub document_uri: String,
}

/// URI-keyed cache of loaded documents and indexed nodes.
#[derive(Debug, Default)]
pub struct DocumentCache {
    entries: HashMap<String, NodeRef>,
    documents: Vec<NodeRef>,
    provenance: HashMap<NodeKey, Provenance>,
}

impl DocumentCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Node registered under `uri` (retrieval URI, alias, `$id` or anchor).
    pub fn get(&self, uri: &str) -> Option<&NodeRef> {
        self.entries.get(uri)
    }

    /// Whether anything is registered under `uri`.
    pub fn contains(&self, uri: &str) -> bool {
        self.entries.contains_key(uri)
    }

    /// Number of registered URIs, aliases included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no URI is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All cache keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<_> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Root nodes of every loaded document, in load order.
    pub fn documents(&self) -> &[NodeRef] {
        &self.documents
    }

    /// Where `node` was found while indexing, if it was indexed.
    pub fn provenance(&self, node: &NodeRef) -> Option<&Provenance> {
        self.provenance.get(&node.key()?)
    }

    /// Register `node` under `uri` unless the key is taken. First writer wins.
    pub fn insert_if_absent(&mut self, uri: String, node: NodeRef) -> bool {
        if self.entries.contains_key(&uri) {
            return false;
        }
        self.entries.insert(uri, node);
        true
    }

    pub(crate) fn record_provenance(&mut self, key: NodeKey, provenance: Provenance) {
        self.provenance.entry(key).or_insert(provenance);
    }

    /// Store a parsed document under its retrieval URI, alias it under its
    /// `$self` URI, and index its `$id`/`$anchor`/`$dynamicAnchor` keywords.
    ///
    /// Returns the document root. Registering a URI that is already present
    /// returns the existing root untouched.
    pub fn register_document(&mut self, retrieval_uri: &str, root: Value) -> NodeRef {
        if let Some(existing) = self.entries.get(retrieval_uri) {
            return existing.clone();
        }

        let id = DocumentId(self.documents.len());
        let node = NodeRef::loaded(id, retrieval_uri, root);
        self.entries.insert(retrieval_uri.to_string(), node.clone());
        self.documents.push(node.clone());

        let base_uri = logical_base_uri(&node, retrieval_uri);
        if base_uri != retrieval_uri {
            debug!(
                retrieval_uri,
                self_uri = %base_uri,
                "Aliasing document under its $self URI."
            );
            self.insert_if_absent(base_uri.clone(), node.clone());
        }

        index_schema_ids(self, &node, &base_uri, retrieval_uri);
        node
    }
}

/// `$self` of a document resolved against its retrieval URI, or the retrieval
/// URI itself when `$self` is absent or unusable.
pub fn logical_base_uri(document: &NodeRef, retrieval_uri: &str) -> String {
    document
        .str_field("$self")
        .and_then(|self_uri| resolve_uri(retrieval_uri, self_uri))
        .map_or_else(
            || retrieval_uri.to_string(),
            |resolved| strip_fragment(&resolved).to_string(),
        )
}
