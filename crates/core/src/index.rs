//! `$id` / `$anchor` / `$dynamicAnchor` indexing.
//!
//! One depth-first pass per document. Every object node gets a [`Provenance`]
//! entry, `$id` nodes are registered under their rebased URI, and anchors under
//! `<effective base>#<anchor>`. All registrations are first-writer-wins.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::cache::{DocumentCache, Provenance};
use crate::document::uri::{resolve_uri, strip_fragment};
use crate::document::{NodeKey, NodeRef};

const ANCHOR_KEYWORDS: [&str; 2] = ["$anchor", "$dynamicAnchor"];

/// Index `node` and everything beneath it.
///
/// `base_uri` is the running base for relative `$id` values; `document_uri` is
/// the retrieval URI recorded as every node's physical origin.
pub fn index_schema_ids(
    cache: &mut DocumentCache,
    node: &NodeRef,
    base_uri: &str,
    document_uri: &str,
) {
    let mut visited: HashSet<NodeKey> = HashSet::new();
    let mut stack: Vec<(NodeRef, String)> = vec![(node.clone(), base_uri.to_string())];

    while let Some((current, base)) = stack.pop() {
        if current.is_object() {
            let key = current.key();
            if let Some(key) = &key
                && !visited.insert(key.clone())
            {
                continue;
            }

            let base = rebase_on_id(cache, &current, base);

            if let Some(key) = key {
                cache.record_provenance(
                    key,
                    Provenance {
                        base_uri: base.clone(),
                        document_uri: document_uri.to_string(),
                    },
                );
            }

            for keyword in ANCHOR_KEYWORDS {
                if let Some(anchor) = current.str_field(keyword) {
                    let anchor_uri = format!("{base}#{anchor}");
                    if cache.insert_if_absent(anchor_uri.clone(), current.clone()) {
                        debug!(%anchor_uri, keyword, "Indexed anchor.");
                    }
                }
            }

            push_children(&mut stack, &current, &base);
        } else if current.value().is_array() {
            push_children(&mut stack, &current, &base);
        }
    }
}

/// Apply a node's `$id`, registering the node under the new URI.
fn rebase_on_id(cache: &mut DocumentCache, node: &NodeRef, base: String) -> String {
    let Some(id) = node.str_field("$id") else {
        return base;
    };
    let Some(resolved) = resolve_uri(&base, id) else {
        warn!(id, base = %base, "Ignoring $id that cannot be resolved against its base URI.");
        return base;
    };
    let new_base = strip_fragment(&resolved).to_string();
    if cache.insert_if_absent(resolved.clone(), node.clone()) {
        debug!(id_uri = %resolved, "Indexed $id.");
    }
    if new_base != resolved {
        cache.insert_if_absent(new_base.clone(), node.clone());
    }
    new_base
}

/// Push children in reverse so they pop in document order.
fn push_children(stack: &mut Vec<(NodeRef, String)>, node: &NodeRef, base: &str) {
    for child in node.children().into_iter().rev() {
        stack.push((child, base.to_string()));
    }
}
