// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Diagnostics (F5): a human-readable field-map dump, four spaces per
//! nesting level, grounded in the original collaborator's `printFields`
//! debug output (§6.5).

use crate::core::value::{FieldMap, FieldValue};

/// Renders `map` as an indented `FieldName: <name> FieldValue: <value>` dump.
pub fn render_field_map(map: &FieldMap) -> String {
    let mut out = String::new();
    render_at(map, 0, &mut out);
    out
}

fn render_at(map: &FieldMap, depth: usize, out: &mut String) {
    let mut names: Vec<&String> = map.keys().collect();
    names.sort();

    for name in names {
        let value = &map[name];
        render_field(name, value, depth, out);
    }
}

fn render_field(name: &str, value: &FieldValue, depth: usize, out: &mut String) {
    let indent = "    ".repeat(depth);

    match value {
        FieldValue::StringSeq(items) => {
            for item in items {
                out.push_str(&format!("{indent}FieldName: {name} FieldValue: {item}\n"));
            }
        }
        FieldValue::UInt64Seq(items) => {
            for item in items {
                out.push_str(&format!("{indent}FieldName: {name} FieldValue: {item}\n"));
            }
        }
        FieldValue::Float64Seq(items) => {
            for item in items {
                out.push_str(&format!("{indent}FieldName: {name} FieldValue: {item}\n"));
            }
        }
        FieldValue::Struct(nested) => {
            out.push_str(&format!("{indent}FieldName: {name} FieldValue:\n"));
            render_at(nested, depth + 1, out);
        }
        scalar => {
            out.push_str(&format!("{indent}FieldName: {name} FieldValue: {scalar}\n"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_scalar_fields() {
        let mut map = FieldMap::new();
        map.insert("a".to_string(), FieldValue::UInt64(42));
        let out = render_field_map(&map);
        assert_eq!(out, "FieldName: a FieldValue: 42\n");
    }

    #[test]
    fn renders_sequence_element_by_element_at_same_depth() {
        let mut map = FieldMap::new();
        map.insert("xs".to_string(), FieldValue::UInt64Seq(vec![1, 2, 3]));
        let out = render_field_map(&map);
        assert_eq!(
            out,
            "FieldName: xs FieldValue: 1\nFieldName: xs FieldValue: 2\nFieldName: xs FieldValue: 3\n"
        );
    }

    #[test]
    fn nested_struct_recurses_one_level_deeper() {
        let mut inner = FieldMap::new();
        inner.insert("b".to_string(), FieldValue::UInt64(7));
        let mut outer = FieldMap::new();
        outer.insert("a".to_string(), FieldValue::Struct(inner));

        let out = render_field_map(&outer);
        assert_eq!(out, "FieldName: a FieldValue:\n    FieldName: b FieldValue: 7\n");
    }
}
