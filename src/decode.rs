// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The message decoder (C4): drives the wire reader (C1) and field resolver
//! (C3) to turn a payload byte range into a [`FieldMap`] (§4.4).

use std::sync::Arc;

use crate::core::error::DecodeError;
use crate::core::value::{FieldMap, FieldValue};
use crate::schema::node::SchemaNode;
use crate::schema::resolver::{resolve, FieldClassification};
use crate::wire::{WireReader, WireType};

/// Decodes `payload` against `descriptor` (a `managedObject` or nested
/// `struct`-like node), producing a field map.
pub fn decode_message(
    class_name: &str,
    descriptor: &Arc<SchemaNode>,
    payload: &[u8],
) -> Result<FieldMap, DecodeError> {
    let mut reader = WireReader::new(payload);
    let mut map = FieldMap::new();

    while !reader.is_empty() {
        let (wire_type, field_number) = reader.decode_tag()?;
        if matches!(wire_type, WireType::I32 | WireType::Unknown(_)) {
            return Err(DecodeError::unsupported_wire_type(wire_type.raw()));
        }

        let field = resolve(class_name, descriptor, field_number)?;
        let repeated = field.recurrence_repeated;

        match &field.classification {
            FieldClassification::SimpleScalar(_) => {
                let v = reader.decode_varint()?;
                merge(&mut map, field.name.clone(), FieldValue::UInt64(v), repeated);
            }
            FieldClassification::SimpleDouble => {
                let bits = reader.decode_fixed64()?;
                merge(
                    &mut map,
                    field.name.clone(),
                    FieldValue::Float64(f64::from_bits(bits)),
                    repeated,
                );
            }
            FieldClassification::String => {
                let len = reader.decode_varint()? as usize;
                let bytes = reader.read_bytes(len)?;
                let value = match std::str::from_utf8(bytes) {
                    Ok(s) => FieldValue::String(s.to_string()),
                    Err(_) => FieldValue::Bytes(bytes.to_vec()),
                };
                merge(&mut map, field.name.clone(), value, repeated);
            }
            FieldClassification::PackedInteger(_) => {
                let len = reader.decode_varint()? as usize;
                let bytes = reader.read_bytes(len)?;
                let mut sub = WireReader::new(bytes);
                let mut values = Vec::new();
                while !sub.is_empty() {
                    values.push(sub.decode_varint()?);
                }
                merge(
                    &mut map,
                    field.name.clone(),
                    FieldValue::UInt64Seq(values),
                    repeated,
                );
            }
            FieldClassification::PackedDouble => {
                let len = reader.decode_varint()? as usize;
                let bytes = reader.read_bytes(len)?;
                let mut sub = WireReader::new(bytes);
                let mut values = Vec::new();
                while !sub.is_empty() {
                    values.push(f64::from_bits(sub.decode_fixed64()?));
                }
                merge(
                    &mut map,
                    field.name.clone(),
                    FieldValue::Float64Seq(values),
                    repeated,
                );
            }
            FieldClassification::Enum { sibling } => match wire_type {
                WireType::Len => {
                    let len = reader.decode_varint()? as usize;
                    let bytes = reader.read_bytes(len)?;
                    let mut sub = WireReader::new(bytes);
                    let mut names = Vec::new();
                    while !sub.is_empty() {
                        let v = sub.decode_varint()?;
                        names.push(enum_name(sibling, v)?);
                    }
                    merge(
                        &mut map,
                        field.name.clone(),
                        FieldValue::StringSeq(names),
                        repeated,
                    );
                }
                _ => {
                    let v = reader.decode_varint()?;
                    let name = enum_name(sibling, v)?;
                    merge(&mut map, field.name.clone(), FieldValue::String(name), repeated);
                }
            },
            FieldClassification::Nested { sibling } => {
                let len = reader.decode_varint()? as usize;
                let bytes = reader.read_bytes(len)?;
                let nested_class = format!("{class_name}.{}", field.name);
                let nested = decode_message(&nested_class, sibling, bytes)?;
                merge(&mut map, field.name.clone(), FieldValue::Struct(nested), repeated);
            }
        }
    }

    Ok(map)
}

/// Resolves an enum integer to its name via the preceding-sibling
/// `enumeration` node's `enum` children (§4.4.1).
fn enum_name(sibling: &Arc<SchemaNode>, value: u64) -> Result<String, DecodeError> {
    let value_str = value.to_string();
    sibling
        .children
        .iter()
        .find(|c| c.tag == "enum" && c.attr("value") == Some(value_str.as_str()))
        .map(|c| c.attr("name").unwrap_or("VALUE_NOT_FOUND").to_string())
        .ok_or_else(|| DecodeError::unknown_enum_value(value))
}

/// Applies the merge/coalescing rule (§4.4.2).
fn merge(map: &mut FieldMap, name: String, value: FieldValue, repeated: bool) {
    match (repeated, value) {
        (true, FieldValue::UInt64(v)) => match map.get_mut(&name) {
            Some(FieldValue::UInt64Seq(seq)) => seq.push(v),
            _ => {
                map.insert(name, FieldValue::UInt64Seq(vec![v]));
            }
        },
        (true, FieldValue::Float64(v)) => match map.get_mut(&name) {
            Some(FieldValue::Float64Seq(seq)) => seq.push(v),
            _ => {
                map.insert(name, FieldValue::Float64Seq(vec![v]));
            }
        },
        (true, FieldValue::String(v)) => match map.get_mut(&name) {
            Some(FieldValue::StringSeq(seq)) => seq.push(v),
            _ => {
                map.insert(name, FieldValue::StringSeq(vec![v]));
            }
        },
        // Nested field maps always overwrite; packed sequences (already
        // built as *Seq values) always overwrite; non-repeated scalars
        // overwrite. All three fall through to a plain insert (§4.4.2).
        (_, other) => {
            map.insert(name, other);
        }
    }
}
