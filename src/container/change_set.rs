// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Change-set extraction (F3): per-change name/kind/payload parsing, the
//! GNSS/CLOCK external skip rule, and class-name extraction (§6.2).

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

use crate::core::error::Error;
use crate::core::value::FieldMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    CreateOrUpdate,
    Deleted,
    Unknown(u8),
}

impl ChangeKind {
    fn from_raw(raw: u8) -> Self {
        match raw {
            0 => ChangeKind::CreateOrUpdate,
            1 => ChangeKind::Deleted,
            other => ChangeKind::Unknown(other),
        }
    }
}

/// One change record within a change-set frame.
#[derive(Debug, Clone)]
pub struct SingleChange {
    pub name: String,
    pub kind: ChangeKind,
    /// The class name extracted from `name` (§6.2), `None` when the change
    /// carries no payload or was skipped by the GNSS/CLOCK rule.
    pub class_name: Option<String>,
    /// The raw protobuf-compatible payload, retained until C5 decodes it.
    pub payload: Option<Vec<u8>>,
    /// Filled in after dispatch (C5) resolves this change's payload.
    pub fields: Option<FieldMap>,
}

/// A decoded (but not yet field-resolved) change-set body.
#[derive(Debug, Clone)]
pub struct ChangeSetData {
    pub timestamp: u64,
    pub changes: Vec<SingleChange>,
}

/// Parses a change-set body: `timestamp` (two BE `u32` halves), then
/// `number_of_changes: u32` (BE) change records (§6.2).
pub fn parse_change_set<R: Read>(reader: &mut R) -> Result<ChangeSetData, Error> {
    let high = reader
        .read_u32::<BigEndian>()
        .map_err(|e| Error::io("change-set timestamp high", e))? as u64;
    let low = reader
        .read_u32::<BigEndian>()
        .map_err(|e| Error::io("change-set timestamp low", e))? as u64;
    let timestamp = (high << 32) | low;

    let number_of_changes = reader
        .read_u32::<BigEndian>()
        .map_err(|e| Error::io("change-set count", e))?;

    let mut changes = Vec::with_capacity(number_of_changes as usize);
    for _ in 0..number_of_changes {
        changes.push(read_single_change(reader)?);
    }

    Ok(ChangeSetData { timestamp, changes })
}

fn read_single_change<R: Read>(reader: &mut R) -> Result<SingleChange, Error> {
    let name_len = reader
        .read_u16::<BigEndian>()
        .map_err(|e| Error::io("change name length", e))? as usize;
    let mut name_bytes = vec![0u8; name_len];
    reader
        .read_exact(&mut name_bytes)
        .map_err(|e| Error::io("change name", e))?;
    let name = String::from_utf8_lossy(&name_bytes).into_owned();

    let kind_raw = reader
        .read_u8()
        .map_err(|e| Error::io("change kind", e))?;
    let kind = ChangeKind::from_raw(kind_raw);

    if kind != ChangeKind::CreateOrUpdate {
        return Ok(SingleChange {
            name,
            kind,
            class_name: None,
            payload: None,
            fields: None,
        });
    }

    let payload_len = reader
        .read_u32::<BigEndian>()
        .map_err(|e| Error::io("change payload length", e))? as usize;
    let mut payload = vec![0u8; payload_len];
    reader
        .read_exact(&mut payload)
        .map_err(|e| Error::io("change payload", e))?;

    if is_externally_skipped(&name) {
        return Ok(SingleChange {
            name,
            kind,
            class_name: None,
            payload: None,
            fields: None,
        });
    }

    let class_name = extract_class_name(&name);
    Ok(SingleChange {
        name,
        kind,
        class_name,
        payload: Some(payload),
        fields: None,
    })
}

/// The GNSS/CLOCK external skip rule (§6.2): these classes violate the
/// sibling-descriptor invariant and are filtered out before reaching the core.
fn is_externally_skipped(name: &str) -> bool {
    name.contains("GNSS") || name.contains("CLOCK")
}

/// Extracts the class name: the substring of `name` strictly between the
/// last `/` (exclusive) and the last `-` (exclusive).
fn extract_class_name(name: &str) -> Option<String> {
    let slash = name.rfind('/')?;
    let dash = name.rfind('-')?;
    if dash <= slash + 1 {
        return None;
    }
    Some(name[slash + 1..dash].to_string())
}
