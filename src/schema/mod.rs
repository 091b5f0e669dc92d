// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The schema layer: the XML tree node type (§3), document parsing (§6),
//! the memoizing schema index (C2, §4.2), and the field resolver (C3, §4.3).

pub mod document;
pub mod index;
pub mod node;
pub mod resolver;

pub use document::{parse_document, SchemaDocument};
pub use index::SchemaIndex;
pub use node::SchemaNode;
pub use resolver::{resolve, FieldClassification, ResolvedField, ScalarKind};

/// The meta-version (§3, glossary): 1 when Schema B's first root child is an
/// XML-declaration pseudo-node, else 0. Governs nothing in the field
/// resolver directly (that logic is purely structural, §4.3) but is exposed
/// for diagnostics and for documents that want to assert dialect shape.
pub fn meta_version(schema_b: &SchemaDocument) -> u8 {
    u8::from(schema_b.has_xml_declaration)
}
