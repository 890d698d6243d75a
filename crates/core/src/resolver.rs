//! `$ref` / `$dynamicRef` resolution over a [`DocumentCache`].
//!
//! Resolution never fails loudly: an unresolvable reference logs a warning
//! and yields `None`, and callers omit whatever the reference described.
//!
//! The resolution scope is an ordered list of full URIs visited while chasing
//! a chain of references. It is extended by copying, so sibling resolutions
//! never observe each other's scope.

use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::DocumentCache;
use crate::document::NodeRef;
use crate::document::pointer::{is_json_pointer, pointer_tokens, split_reference};
use crate::document::uri::{resolve_uri, strip_fragment};
use crate::loader::LoadedSpec;

/// How a reference participates in dynamic scoping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefKind {
    /// `$ref`: lexical resolution only.
    Static,
    /// `$dynamicRef`: the outermost scope defining the anchor wins.
    Dynamic,
}

/// Resolves references against one run's document cache.
#[derive(Debug, Clone)]
pub struct Resolver<'c> {
    cache: &'c DocumentCache,
    entry_uri: String,
}

impl<'c> Resolver<'c> {
    /// Resolver rooted at `entry_uri`.
    pub fn new(cache: &'c DocumentCache, entry_uri: impl Into<String>) -> Self {
        Self {
            cache,
            entry_uri: entry_uri.into(),
        }
    }

    /// Resolver over a loaded spec, rooted at its entry document.
    pub fn for_spec(spec: &'c LoadedSpec) -> Self {
        Self::new(&spec.cache, spec.entry_uri.clone())
    }

    /// The cache this resolver reads from.
    pub fn cache(&self) -> &'c DocumentCache {
        self.cache
    }

    /// Base URI for detached nodes.
    pub fn entry_uri(&self) -> &str {
        &self.entry_uri
    }

    /// Effective base URI of a node, or the entry URI for unindexed nodes.
    pub fn base_uri_of(&self, node: &NodeRef) -> String {
        self.cache
            .provenance(node)
            .map_or_else(|| self.entry_uri.clone(), |p| p.base_uri.clone())
    }

    /// Resolve a node with a fresh scope. Non-references are returned as-is.
    pub fn resolve(&self, node: &NodeRef) -> Option<NodeRef> {
        self.resolve_in_scope(node, &[])
    }

    /// Resolve a node within an existing resolution scope.
    pub fn resolve_in_scope(&self, node: &NodeRef, scope: &[String]) -> Option<NodeRef> {
        let base = self.base_uri_of(node);
        self.resolve_node(node, &base, scope)
    }

    /// Resolve a reference string relative to `current_doc_uri`.
    ///
    /// Anchor fragments are first looked up through the dynamic scope, as for
    /// `$dynamicRef`.
    pub fn resolve_reference(
        &self,
        reference: &str,
        current_doc_uri: &str,
        scope: &[String],
    ) -> Option<NodeRef> {
        self.resolve_target(reference, RefKind::Dynamic, current_doc_uri, scope)
    }

    /// Resolve a `#/...` pointer against the entry document.
    pub fn resolve_pointer(&self, pointer: &str) -> Option<NodeRef> {
        let reference = format!("#{pointer}");
        self.resolve_target(&reference, RefKind::Static, &self.entry_uri, &[])
    }

    /// Resolve `node`, chasing it as a reference relative to `base` if it is one.
    fn resolve_node(&self, node: &NodeRef, base: &str, scope: &[String]) -> Option<NodeRef> {
        let Some(obj) = node.as_object() else {
            return Some(node.clone());
        };
        let (target, kind) = if let Some(target) = obj.get("$ref") {
            (target, RefKind::Static)
        } else if let Some(target) = obj.get("$dynamicRef") {
            (target, RefKind::Dynamic)
        } else {
            return Some(node.clone());
        };

        let Value::String(reference) = target else {
            warn!(
                pointer = node.pointer(),
                value = %target,
                "Reference value is not a string, nothing to resolve."
            );
            return None;
        };

        let resolved = self.resolve_target(reference, kind, base, scope)?;
        Some(apply_overrides(node, resolved))
    }

    fn resolve_target(
        &self,
        reference: &str,
        kind: RefKind,
        current_doc_uri: &str,
        scope: &[String],
    ) -> Option<NodeRef> {
        let (file_path, fragment) = split_reference(reference);
        let logical_base = self.logical_base(current_doc_uri);

        let target_uri = if file_path.is_empty() {
            logical_base
        } else {
            match resolve_uri(&logical_base, file_path) {
                Some(uri) => strip_fragment(&uri).to_string(),
                None => {
                    warn!(reference, base = %logical_base, "Reference cannot be resolved to a URI.");
                    return None;
                }
            }
        };

        if kind == RefKind::Dynamic
            && !fragment.is_empty()
            && !is_json_pointer(&fragment)
            && let Some(hit) = self.dynamic_lookup(&fragment, scope)
        {
            return Some(hit);
        }

        let full_uri = if fragment.is_empty() {
            target_uri.clone()
        } else {
            format!("{target_uri}#{fragment}")
        };
        if let Some(hit) = self.cache.get(&full_uri) {
            return Some(hit.clone());
        }

        let Some(document) = self.cache.get(&target_uri) else {
            if !file_path.is_empty() {
                warn!(reference, %target_uri, "Referenced document is not loaded.");
            }
            return None;
        };

        let resolved = if fragment.is_empty() {
            document.clone()
        } else if is_json_pointer(&fragment) {
            walk_pointer(document, &fragment, reference)?
        } else {
            warn!(reference, %target_uri, anchor = %fragment, "Anchor not found.");
            return None;
        };

        if !resolved.is_reference() {
            return Some(resolved);
        }

        if scope.iter().any(|visited| visited == &full_uri) {
            warn!(reference, %full_uri, "Circular reference chain, giving up.");
            return None;
        }
        let mut next_scope = scope.to_vec();
        next_scope.push(full_uri);
        let next_base = self
            .cache
            .provenance(&resolved)
            .map_or(target_uri, |p| p.base_uri.clone());
        debug!(reference, next_base = %next_base, depth = next_scope.len(), "Following nested reference.");
        self.resolve_node(&resolved, &next_base, &next_scope)
    }

    /// First scope entry, outermost first, whose resource defines the anchor.
    fn dynamic_lookup(&self, anchor: &str, scope: &[String]) -> Option<NodeRef> {
        scope.iter().find_map(|scope_uri| {
            let candidate = format!("{}#{anchor}", strip_fragment(scope_uri));
            self.cache.get(&candidate).cloned()
        })
    }

    /// `$self` of the current document resolved against its URI, if declared.
    fn logical_base(&self, current_doc_uri: &str) -> String {
        let doc_uri = strip_fragment(current_doc_uri);
        if let Some(document) = self.cache.get(doc_uri)
            && let Some(self_uri) = document.str_field("$self")
            && let Some(resolved) = resolve_uri(doc_uri, self_uri)
        {
            return strip_fragment(&resolved).to_string();
        }
        doc_uri.to_string()
    }
}

fn walk_pointer(document: &NodeRef, fragment: &str, reference: &str) -> Option<NodeRef> {
    let mut current = document.clone();
    for token in pointer_tokens(fragment) {
        match current.child(&token) {
            Some(next) => current = next,
            None => {
                warn!(reference, missing = %token, at = current.pointer(), "JSON Pointer segment not found.");
                return None;
            }
        }
    }
    Some(current)
}

/// Reference-site `summary`/`description` take precedence over the target's.
fn apply_overrides(reference: &NodeRef, resolved: NodeRef) -> NodeRef {
    let summary = reference.value().get("summary").filter(|v| v.is_string());
    let description = reference.value().get("description").filter(|v| v.is_string());
    if summary.is_none() && description.is_none() {
        return resolved;
    }
    let Some(target) = resolved.as_object() else {
        return resolved;
    };

    let mut copy = target.clone();
    if let Some(summary) = summary {
        copy.insert("summary".to_string(), summary.clone());
    }
    if let Some(description) = description {
        copy.insert("description".to_string(), description.clone());
    }
    NodeRef::derived(&resolved, Value::Object(copy))
}
