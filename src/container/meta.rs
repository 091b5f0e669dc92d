// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! META-frame extraction: the frame body is a zip archive holding the two
//! schema documents at `bm/meta.xml` (Schema A) and `lte/meta.xml` (Schema B)
//! (§6.1). The archive is never itself gzip-wrapped, regardless of the
//! frame's own compression field.

use std::io::{Cursor, Read};

use zip::ZipArchive;

use crate::core::error::Error;
use crate::schema::document::{parse_document, SchemaDocument};

/// Extracts and parses both schema documents from a META frame body.
pub fn extract_schemas(frame_body: &[u8]) -> Result<(SchemaDocument, SchemaDocument), Error> {
    let mut archive = ZipArchive::new(Cursor::new(frame_body))
        .map_err(|e| Error::archive("meta.zip", e.to_string()))?;

    let schema_a = read_entry(&mut archive, "bm/meta.xml")?;
    let schema_b = read_entry(&mut archive, "lte/meta.xml")?;

    Ok((
        parse_document("bm/meta.xml", &schema_a)?,
        parse_document("lte/meta.xml", &schema_b)?,
    ))
}

fn read_entry<R: Read + std::io::Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<String, Error> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::archive(path, e.to_string()))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| Error::io(path, e))?;
    Ok(contents)
}
