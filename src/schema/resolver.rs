// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The field resolver (C3): maps a decoded tag's field number to a
//! field-descriptor node and classifies its wire handling.

use std::sync::Arc;

use crate::core::error::DecodeError;
use crate::schema::node::SchemaNode;

/// The integer-or-boolean distinction carried alongside `SimpleScalar` and
/// `PackedInteger`; both decode identically (varint -> u64) but the kind is
/// preserved for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Int,
    Bool,
}

/// The field classification table (§4.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldClassification {
    SimpleScalar(ScalarKind),
    SimpleDouble,
    PackedInteger(ScalarKind),
    PackedDouble,
    String,
    /// The preceding sibling's `enum` children resolve this field's integer
    /// value to a name.
    Enum { sibling: Arc<SchemaNode> },
    /// The preceding sibling is the nested message's own descriptor.
    Nested { sibling: Arc<SchemaNode> },
}

/// A resolved field: its descriptor node, its position among its parent's
/// children (needed for the sibling lookup), and its classification.
#[derive(Debug, Clone)]
pub struct ResolvedField {
    pub descriptor: Arc<SchemaNode>,
    pub index_in_parent: usize,
    pub name: String,
    pub recurrence_repeated: bool,
    pub classification: FieldClassification,
}

/// Scan `parent`'s children for the `p`/`action` descriptor whose field
/// number equals `field_number`, then classify it.
pub fn resolve(
    class_name: &str,
    parent: &Arc<SchemaNode>,
    field_number: u64,
) -> Result<ResolvedField, DecodeError> {
    for (index, child) in parent.children.iter().enumerate() {
        if child.tag != "p" && child.tag != "action" {
            continue;
        }
        let (candidate_number, proto) = descriptor_field_number(child)?;
        if candidate_number != field_number {
            continue;
        }

        let name = child.attr("name").unwrap_or_default().to_string();
        let repeated = child.attr("recurrence") == Some("repeated");
        let packed = match &proto {
            Some(proto) => proto.attr("packed") == Some("true") && repeated,
            None => repeated,
        };

        let classification = classify(class_name, parent, child, index, repeated, packed)?;

        return Ok(ResolvedField {
            descriptor: child.clone(),
            index_in_parent: index,
            name,
            recurrence_repeated: repeated,
            classification,
        });
    }

    Err(DecodeError::unknown_field(class_name, field_number))
}

/// Determine a `p`/`action` descriptor's field number per §4.3: the `index`
/// attribute of its last `proto` child, or (dialect fallback) its own `id`
/// attribute when no `proto` child is present.
fn descriptor_field_number(
    descriptor: &Arc<SchemaNode>,
) -> Result<(u64, Option<Arc<SchemaNode>>), DecodeError> {
    let proto = descriptor
        .children
        .last()
        .filter(|c| c.tag == "proto")
        .cloned();

    match &proto {
        Some(proto) => {
            let index = proto
                .attr("index")
                .and_then(|v| v.parse::<u64>().ok())
                .ok_or_else(|| {
                    DecodeError::schema_dialect_error(
                        descriptor.attr("name").unwrap_or("<unnamed>"),
                    )
                })?;
            Ok((index, Some(proto.clone())))
        }
        None => {
            let id = descriptor
                .attr("id")
                .and_then(|v| v.parse::<u64>().ok())
                .ok_or_else(|| {
                    DecodeError::schema_dialect_error(
                        descriptor.attr("name").unwrap_or("<unnamed>"),
                    )
                })?;
            Ok((id, None))
        }
    }
}

fn classify(
    class_name: &str,
    parent: &Arc<SchemaNode>,
    descriptor: &Arc<SchemaNode>,
    index: usize,
    repeated: bool,
    packed: bool,
) -> Result<FieldClassification, DecodeError> {
    let field_name = descriptor.attr("name").unwrap_or("<unnamed>").to_string();

    match descriptor.attr("type") {
        Some("integer") if packed => Ok(FieldClassification::PackedInteger(ScalarKind::Int)),
        Some("boolean") if packed => Ok(FieldClassification::PackedInteger(ScalarKind::Bool)),
        Some("integer") => Ok(FieldClassification::SimpleScalar(ScalarKind::Int)),
        Some("boolean") => Ok(FieldClassification::SimpleScalar(ScalarKind::Bool)),
        Some("double") if packed => Ok(FieldClassification::PackedDouble),
        Some("double") => Ok(FieldClassification::SimpleDouble),
        Some("string") => Ok(FieldClassification::String),
        Some(_user_type) => {
            let _ = repeated;
            if index == 0 {
                return Err(DecodeError::missing_sibling_descriptor(
                    class_name, field_name,
                ));
            }
            let sibling = parent.children[index - 1].clone();
            if sibling.tag == "enumeration" {
                Ok(FieldClassification::Enum { sibling })
            } else {
                Ok(FieldClassification::Nested { sibling })
            }
        }
        None => Err(DecodeError::schema_dialect_error(field_name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::document::parse_document;

    fn managed_object(xml: &str) -> Arc<SchemaNode> {
        let doc = parse_document("test", xml).unwrap();
        doc.document_element().unwrap().clone()
    }

    #[test]
    fn resolves_simple_scalar_via_proto_index() {
        let mo = managed_object(
            r#"<managedObject class="Cell"><p name="a" type="integer"><proto index="1"/></p></managedObject>"#,
        );
        let resolved = resolve("Cell", &mo, 1).unwrap();
        assert_eq!(resolved.name, "a");
        assert_eq!(
            resolved.classification,
            FieldClassification::SimpleScalar(ScalarKind::Int)
        );
    }

    #[test]
    fn resolves_via_dialect_fallback_id_attribute() {
        let mo = managed_object(
            r#"<managedObject class="Cell"><p id="3" name="xs" type="integer" recurrence="repeated"/></managedObject>"#,
        );
        let resolved = resolve("Cell", &mo, 3).unwrap();
        assert_eq!(
            resolved.classification,
            FieldClassification::PackedInteger(ScalarKind::Int)
        );
    }

    #[test]
    fn packed_requires_both_packed_attribute_and_repeated() {
        let mo = managed_object(
            r#"<managedObject class="Cell"><p name="xs" type="integer" recurrence="repeated"><proto index="3" packed="true"/></p></managedObject>"#,
        );
        let resolved = resolve("Cell", &mo, 3).unwrap();
        assert_eq!(
            resolved.classification,
            FieldClassification::PackedInteger(ScalarKind::Int)
        );
    }

    #[test]
    fn unknown_field_number_fails() {
        let mo = managed_object(
            r#"<managedObject class="Cell"><p name="a" type="integer"><proto index="1"/></p></managedObject>"#,
        );
        let err = resolve("Cell", &mo, 99).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownField { .. }));
    }

    #[test]
    fn enum_field_classifies_via_preceding_sibling() {
        let mo = managed_object(
            r#"<managedObject class="Cell">
                <enumeration><enum value="0" name="OFF"/><enum value="1" name="ON"/></enumeration>
                <p name="state" type="MyEnum"><proto index="1"/></p>
            </managedObject>"#,
        );
        let resolved = resolve("Cell", &mo, 1).unwrap();
        assert!(matches!(resolved.classification, FieldClassification::Enum { .. }));
    }

    #[test]
    fn nested_field_classifies_via_preceding_struct_sibling() {
        let mo = managed_object(
            r#"<managedObject class="Cell">
                <struct><p name="inner" type="integer"><proto index="1"/></p></struct>
                <p name="n" type="MyStruct"><proto index="2"/></p>
            </managedObject>"#,
        );
        let resolved = resolve("Cell", &mo, 2).unwrap();
        assert!(matches!(resolved.classification, FieldClassification::Nested { .. }));
    }

    #[test]
    fn composite_field_with_no_preceding_sibling_fails() {
        let mo = managed_object(
            r#"<managedObject class="GNSS"><p name="n" type="MyStruct"><proto index="1"/></p></managedObject>"#,
        );
        let err = resolve("GNSS", &mo, 1).unwrap_err();
        assert!(matches!(err, DecodeError::MissingSiblingDescriptor { .. }));
    }
}
