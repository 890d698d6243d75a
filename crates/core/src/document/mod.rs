//! Loaded documents and handles to the nodes inside them.
//!
//! A [`NodeRef`] names one node as `(document, JSON pointer)`. Handles are cheap
//! to clone and give every node a stable identity ([`NodeKey`]) that the
//! provenance side table is keyed by.

pub mod pointer;
pub mod uri;

use std::sync::Arc;

use serde_json::{Map, Value};

use pointer::escape_token;

static NULL: Value = Value::Null;

/// Synthetic id assigned to each loaded document, in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub(crate) usize);

/// Identity of a node: the document it lives in and its JSON pointer.
pub type NodeKey = (DocumentId, String);

/// A parsed document.
#[derive(Debug)]
pub struct Document {
    /// `None` for synthetic values that were never loaded into a cache.
    id: Option<DocumentId>,
    retrieval_uri: String,
    root: Value,
    /// Set on override copies; identity is borrowed from this node.
    origin: Option<NodeRef>,
}

impl Document {
    /// Cache-assigned identity; `None` for detached and derived documents.
    pub fn id(&self) -> Option<DocumentId> {
        self.id
    }

    /// URI the document was physically read from. Ignores `$self`.
    pub fn retrieval_uri(&self) -> &str {
        &self.retrieval_uri
    }

    /// The whole parsed document.
    pub fn root(&self) -> &Value {
        &self.root
    }
}

/// Handle to one node of a [`Document`].
#[derive(Debug, Clone)]
pub struct NodeRef {
    document: Arc<Document>,
    pointer: String,
}

impl NodeRef {
    pub(crate) fn loaded(id: DocumentId, retrieval_uri: &str, root: Value) -> Self {
        Self {
            document: Arc::new(Document {
                id: Some(id),
                retrieval_uri: retrieval_uri.to_string(),
                root,
                origin: None,
            }),
            pointer: String::new(),
        }
    }

    /// Wrap a value that does not belong to any loaded document.
    ///
    /// Detached nodes have no provenance; the resolver treats them as living in
    /// the entry document.
    pub fn detached(value: Value) -> Self {
        Self {
            document: Arc::new(Document {
                id: None,
                retrieval_uri: String::new(),
                root: value,
                origin: None,
            }),
            pointer: String::new(),
        }
    }

    /// A modified copy of `origin` that keeps `origin`'s identity for provenance.
    pub(crate) fn derived(origin: &NodeRef, value: Value) -> Self {
        Self {
            document: Arc::new(Document {
                id: None,
                retrieval_uri: origin.document.retrieval_uri.clone(),
                root: value,
                origin: Some(origin.clone()),
            }),
            pointer: String::new(),
        }
    }

    /// The JSON value at this node, or `null` if the pointer no longer matches.
    pub fn value(&self) -> &Value {
        self.document.root.pointer(&self.pointer).unwrap_or(&NULL)
    }

    /// JSON pointer of this node within its document (`""` for the root).
    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    /// The document this node belongs to.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Stable identity of this node, if it belongs to a loaded document.
    pub fn key(&self) -> Option<NodeKey> {
        if let Some(id) = self.document.id {
            return Some((id, self.pointer.clone()));
        }
        let origin = self.document.origin.as_ref()?;
        let (id, base) = origin.key()?;
        Some((id, format!("{base}{}", self.pointer)))
    }

    /// Whether two handles name the same node of the same document instance.
    pub fn same_node(&self, other: &NodeRef) -> bool {
        Arc::ptr_eq(&self.document, &other.document) && self.pointer == other.pointer
    }

    /// The node as a JSON object, if it is one.
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.value().as_object()
    }

    /// Whether the node is a JSON object.
    pub fn is_object(&self) -> bool {
        self.value().is_object()
    }

    /// Whether this node is a Reference Object (`$ref` or `$dynamicRef`).
    pub fn is_reference(&self) -> bool {
        self.as_object()
            .is_some_and(|obj| obj.contains_key("$ref") || obj.contains_key("$dynamicRef"))
    }

    /// Whether the node is an object with member `key`.
    pub fn has(&self, key: &str) -> bool {
        self.as_object().is_some_and(|obj| obj.contains_key(key))
    }

    /// String member `key`, if present and a string.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.value().get(key).and_then(Value::as_str)
    }

    /// Child of an object by key.
    pub fn get(&self, key: &str) -> Option<NodeRef> {
        if !self.has(key) {
            return None;
        }
        Some(self.child_unchecked(key))
    }

    /// Child by pointer token: object key, or index for arrays.
    pub fn child(&self, token: &str) -> Option<NodeRef> {
        match self.value() {
            Value::Object(obj) if obj.contains_key(token) => Some(self.child_unchecked(token)),
            Value::Array(items) => {
                let index: usize = token.parse().ok()?;
                (index < items.len()).then(|| self.child_unchecked(token))
            }
            _ => None,
        }
    }

    /// Key/child pairs of an object, in document order.
    pub fn entries(&self) -> Vec<(String, NodeRef)> {
        self.as_object()
            .map(|obj| {
                obj.keys()
                    .map(|key| (key.clone(), self.child_unchecked(key)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Elements of an array, in order.
    pub fn items(&self) -> Vec<NodeRef> {
        self.value()
            .as_array()
            .map(|items| {
                (0..items.len())
                    .map(|index| self.child_unchecked(&index.to_string()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Object entries or array elements; empty for scalars.
    pub fn children(&self) -> Vec<NodeRef> {
        match self.value() {
            Value::Object(_) => self.entries().into_iter().map(|(_, node)| node).collect(),
            Value::Array(_) => self.items(),
            _ => Vec::new(),
        }
    }

    fn child_unchecked(&self, token: &str) -> NodeRef {
        NodeRef {
            document: Arc::clone(&self.document),
            pointer: format!("{}/{}", self.pointer, escape_token(token)),
        }
    }
}
