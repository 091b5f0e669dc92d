// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The file header: version, reserved bytes, and an additional-info string
//! (§6.1). All multi-byte integers in the outer container are big-endian.

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

use crate::core::error::Error;

/// The fixed preamble at the start of a container file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub version: u32,
    pub additional_info: String,
}

/// Reads the header: `version: u32` (BE), 4 reserved bytes, then
/// `additional_info_size: u32` (BE) followed by that many raw bytes.
pub fn read_header<R: Read>(reader: &mut R) -> Result<Header, Error> {
    let version = reader
        .read_u32::<BigEndian>()
        .map_err(|e| Error::io("header version", e))?;

    let mut reserved = [0u8; 4];
    reader
        .read_exact(&mut reserved)
        .map_err(|e| Error::io("header reserved bytes", e))?;

    let info_size = reader
        .read_u32::<BigEndian>()
        .map_err(|e| Error::io("header additional_info_size", e))? as usize;

    let mut info_bytes = vec![0u8; info_size];
    reader
        .read_exact(&mut info_bytes)
        .map_err(|e| Error::io("header additional_info", e))?;
    let additional_info = String::from_utf8_lossy(&info_bytes).into_owned();

    Ok(Header {
        version,
        additional_info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_version_reserved_and_additional_info() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&7u32.to_be_bytes());
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes.extend_from_slice(&5u32.to_be_bytes());
        bytes.extend_from_slice(b"hello");

        let mut cursor = Cursor::new(bytes);
        let header = read_header(&mut cursor).unwrap();
        assert_eq!(header.version, 7);
        assert_eq!(header.additional_info, "hello");
    }

    #[test]
    fn truncated_header_is_an_io_error() {
        let mut cursor = Cursor::new(vec![0u8; 2]);
        let err = read_header(&mut cursor).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
