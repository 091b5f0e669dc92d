// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The decoded field value model (§3 of the data model).
//!
//! A [`FieldValue`] is whatever a single wire tag ultimately resolves to once
//! the field resolver (C3) and message decoder (C4) have classified it: a
//! scalar, a sequence, or a nested [`FieldMap`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A mapping from field name to decoded value for one decoded message.
///
/// Each field name appears at most once; see the field map invariants in §3.
pub type FieldMap = HashMap<String, FieldValue>;

/// One decoded field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum FieldValue {
    /// An unsigned 64-bit integer (VARINT scalar, or a resolved but
    /// untranslatable enum discriminant never reaches this variant - enums
    /// are always stored as strings once resolved).
    UInt64(u64),
    /// An IEEE 754 64-bit float.
    Float64(f64),
    /// A UTF-8 string, or the lossy-decoded form of an opaque byte sequence.
    String(String),
    /// An opaque byte sequence for LEN payloads that did not validate as UTF-8.
    Bytes(Vec<u8>),
    /// An ordered sequence of strings (repeated string field, or resolved enum names).
    StringSeq(Vec<String>),
    /// An ordered sequence of unsigned 64-bit integers (repeated or packed integer field).
    UInt64Seq(Vec<u64>),
    /// An ordered sequence of 64-bit floats (repeated or packed double field).
    Float64Seq(Vec<f64>),
    /// A nested field map (recursively decoded message).
    Struct(FieldMap),
}

impl FieldValue {
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::UInt64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            FieldValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_string_seq(&self) -> Option<&[String]> {
        match self {
            FieldValue::StringSeq(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_u64_seq(&self) -> Option<&[u64]> {
        match self {
            FieldValue::UInt64Seq(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64_seq(&self) -> Option<&[f64]> {
        match self {
            FieldValue::Float64Seq(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&FieldMap> {
        match self {
            FieldValue::Struct(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_sequence(&self) -> bool {
        matches!(
            self,
            FieldValue::StringSeq(_) | FieldValue::UInt64Seq(_) | FieldValue::Float64Seq(_)
        )
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::UInt64(_) => "uint64",
            FieldValue::Float64(_) => "float64",
            FieldValue::String(_) => "string",
            FieldValue::Bytes(_) => "bytes",
            FieldValue::StringSeq(_) => "string[]",
            FieldValue::UInt64Seq(_) => "uint64[]",
            FieldValue::Float64Seq(_) => "float64[]",
            FieldValue::Struct(_) => "struct",
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::UInt64(v) => write!(f, "{v}"),
            FieldValue::Float64(v) => write!(f, "{v}"),
            FieldValue::String(s) => write!(f, "{s}"),
            FieldValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            FieldValue::StringSeq(v) => write!(f, "{v:?}"),
            FieldValue::UInt64Seq(v) => write!(f, "{v:?}"),
            FieldValue::Float64Seq(v) => write!(f, "{v:?}"),
            FieldValue::Struct(_) => write!(f, "{{...}}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_accessors_return_none_for_mismatched_variant() {
        let v = FieldValue::UInt64(42);
        assert_eq!(v.as_u64(), Some(42));
        assert_eq!(v.as_f64(), None);
        assert_eq!(v.as_str(), None);
    }

    #[test]
    fn is_sequence_matches_only_sequence_variants() {
        assert!(FieldValue::UInt64Seq(vec![1, 2]).is_sequence());
        assert!(!FieldValue::UInt64(1).is_sequence());
        assert!(!FieldValue::Struct(FieldMap::new()).is_sequence());
    }

    #[test]
    fn display_renders_scalars_directly() {
        assert_eq!(FieldValue::UInt64(7).to_string(), "7");
        assert_eq!(FieldValue::String("hi".into()).to_string(), "hi");
    }

    #[test]
    fn serde_round_trip_preserves_variant() {
        let v = FieldValue::Float64Seq(vec![1.0, 2.5]);
        let json = serde_json::to_string(&v).unwrap();
        let back: FieldValue = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }
}
