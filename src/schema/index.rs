// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The schema index (C2): a memoizing lookup from class name to
//! `managedObject` node, shared read-mostly across decoder workers.
//!
//! Follows the same read-check-then-write-insert pattern the corpus uses for
//! its descriptor caches: a [`std::sync::RwLock`] guarding a `HashMap`, with
//! a read lock taken first and a write lock (re-checking for a racing
//! insert) taken only on a miss.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::core::error::DecodeError;
use crate::schema::document::SchemaDocument;
use crate::schema::node::SchemaNode;

/// Memoizing class-name -> `managedObject` lookup over two schema documents.
///
/// Holds its own `Arc` handles to the schema documents rather than borrowing
/// them, so a new index can be built and swapped in whenever a `META` frame
/// replaces the schemas, without tying its lifetime to wherever the caller
/// happens to store the previous generation of documents.
pub struct SchemaIndex {
    schema_a: Arc<SchemaDocument>,
    schema_b: Arc<SchemaDocument>,
    cache: RwLock<HashMap<String, Arc<SchemaNode>>>,
}

impl SchemaIndex {
    pub fn new(schema_a: Arc<SchemaDocument>, schema_b: Arc<SchemaDocument>) -> Self {
        SchemaIndex {
            schema_a,
            schema_b,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Look up the `managedObject` node for `class_name`, memoizing the
    /// result across calls. Concurrent misses on the same key converge on a
    /// single cached value (§4.2, §8 property 4).
    pub fn lookup(&self, class_name: &str) -> Result<Arc<SchemaNode>, DecodeError> {
        if let Some(node) = self.cache.read().expect("schema index lock poisoned").get(class_name) {
            return Ok(node.clone());
        }

        // Re-check under the write lock before scanning: the write lock
        // serializes concurrent misses on the same key, so whichever thread
        // gets here first does the scan and every other thread just reads
        // back what it inserted.
        let mut cache = self.cache.write().expect("schema index lock poisoned");
        if let Some(node) = cache.get(class_name) {
            return Ok(node.clone());
        }

        let found = self
            .schema_a
            .document_element()
            .and_then(|root| root.find_descendant("managedObject", "class", class_name))
            .or_else(|| {
                self.schema_b
                    .document_element()
                    .and_then(|root| root.find_descendant("managedObject", "class", class_name))
            })
            .ok_or_else(|| DecodeError::unknown_class(class_name))?;

        let node = cache
            .entry(class_name.to_string())
            .or_insert(found)
            .clone();
        Ok(node)
    }

    /// Number of classes memoized so far. Exposed for tests verifying that
    /// repeated lookups perform at most one scan.
    pub fn cached_len(&self) -> usize {
        self.cache.read().expect("schema index lock poisoned").len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::document::parse_document;

    fn docs(xml_a: &str, xml_b: &str) -> (Arc<SchemaDocument>, Arc<SchemaDocument>) {
        (
            Arc::new(parse_document("a", xml_a).unwrap()),
            Arc::new(parse_document("b", xml_b).unwrap()),
        )
    }

    #[test]
    fn lookup_finds_class_in_schema_a_first() {
        let (a, b) = docs(
            r#"<root><managedObject class="Cell"/></root>"#,
            r#"<root><managedObject class="Other"/></root>"#,
        );
        let index = SchemaIndex::new(a, b);
        let node = index.lookup("Cell").unwrap();
        assert_eq!(node.attr("class"), Some("Cell"));
    }

    #[test]
    fn lookup_falls_back_to_schema_b() {
        let (a, b) = docs(
            r#"<root><managedObject class="Other"/></root>"#,
            r#"<root><managedObject class="Cell"/></root>"#,
        );
        let index = SchemaIndex::new(a, b);
        let node = index.lookup("Cell").unwrap();
        assert_eq!(node.attr("class"), Some("Cell"));
    }

    #[test]
    fn lookup_fails_with_unknown_class() {
        let (a, b) = docs(r#"<root/>"#, r#"<root/>"#);
        let index = SchemaIndex::new(a, b);
        let err = index.lookup("Ghost").unwrap_err();
        assert!(matches!(err, DecodeError::UnknownClass { .. }));
    }

    #[test]
    fn repeated_lookups_memoize_a_single_entry() {
        let (a, b) = docs(r#"<root><managedObject class="Cell"/></root>"#, r#"<root/>"#);
        let index = SchemaIndex::new(a, b);
        for _ in 0..10 {
            index.lookup("Cell").unwrap();
        }
        assert_eq!(index.cached_len(), 1);
    }

    #[test]
    fn concurrent_misses_on_the_same_key_converge_on_one_cached_node() {
        let (a, b) = docs(r#"<root><managedObject class="Cell"/></root>"#, r#"<root/>"#);
        let index = SchemaIndex::new(a, b);

        let nodes: Vec<Arc<SchemaNode>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..16)
                .map(|_| scope.spawn(|| index.lookup("Cell").unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(index.cached_len(), 1);
        let first_ptr = Arc::as_ptr(&nodes[0]);
        assert!(nodes.iter().all(|n| Arc::as_ptr(n) == first_ptr));
    }
}
