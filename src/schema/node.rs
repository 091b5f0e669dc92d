// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The schema tree node type (§3, §6).
//!
//! A [`SchemaNode`] is the minimal capability set the core requires of an
//! XML tree: a tag name, an attribute map, and an ordered child list. Order
//! is semantically load-bearing (the sibling convention for composite types,
//! §3), so children are stored in document order and never reordered.

use std::collections::HashMap;
use std::sync::Arc;

/// One node of a parsed schema document.
///
/// Children are wrapped in `Arc` so the schema index (C2) can memoize
/// references to `managedObject` subtrees without cloning the tree or
/// fighting the borrow checker across worker threads.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub children: Vec<Arc<SchemaNode>>,
}

impl SchemaNode {
    pub fn new(tag: impl Into<String>) -> Self {
        SchemaNode {
            tag: tag.into(),
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The first direct child with the given tag name and attribute value.
    pub fn find_child(&self, tag: &str, attr_name: &str, attr_value: &str) -> Option<&Arc<SchemaNode>> {
        self.children
            .iter()
            .find(|c| c.tag == tag && c.attr(attr_name) == Some(attr_value))
    }

    /// The first descendant (any depth) with the given tag name and attribute value.
    pub fn find_descendant(
        &self,
        tag: &str,
        attr_name: &str,
        attr_value: &str,
    ) -> Option<Arc<SchemaNode>> {
        for child in &self.children {
            if child.tag == tag && child.attr(attr_name) == Some(attr_value) {
                return Some(child.clone());
            }
            if let Some(found) = child.find_descendant(tag, attr_name, attr_value) {
                return Some(found);
            }
        }
        None
    }

    /// Index of `child` among `self.children`, compared by pointer identity.
    pub fn index_of(&self, child: &Arc<SchemaNode>) -> Option<usize> {
        self.children
            .iter()
            .position(|c| Arc::ptr_eq(c, child))
    }
}
