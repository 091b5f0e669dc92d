// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Magic-delimited frame headers (§6.1). A mismatch on the 12-byte magic is a
//! hard read error — the corpus never resynchronizes mid-stream.

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

use crate::core::error::Error;

/// The 12-byte magic expected at the start of every frame.
pub const FRAME_MAGIC: [u8; 12] = [
    0xe9, 0x11, 0x00, 0xa8, 0x43, 0xa0, 0x41, 0x2d, 0x94, 0xb3, 0x06, 0xda,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    ChangeSet,
    Reset,
    Meta,
    NodeDetection,
    Unknown(u32),
}

impl FrameKind {
    fn from_raw(raw: u32) -> Self {
        match raw {
            0 => FrameKind::ChangeSet,
            1 => FrameKind::Reset,
            2 => FrameKind::Meta,
            3 => FrameKind::NodeDetection,
            other => FrameKind::Unknown(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionKind {
    None,
    Gzip,
    Unknown(u32),
}

impl CompressionKind {
    fn from_raw(raw: u32) -> Self {
        match raw {
            0 => CompressionKind::None,
            1 => CompressionKind::Gzip,
            other => CompressionKind::Unknown(other),
        }
    }
}

/// The fixed-size prefix preceding every frame body: magic, type, compression, size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub kind: FrameKind,
    pub compression: CompressionKind,
    pub size: u32,
}

/// Reads one frame header. `offset` is the byte position of the magic, used
/// only to attribute a `BadMagic` failure.
pub fn read_frame_header<R: Read>(reader: &mut R, offset: u64) -> Result<Option<FrameHeader>, Error> {
    let mut first = [0u8; 1];
    let n = reader
        .read(&mut first)
        .map_err(|e| Error::io("frame magic", e))?;
    if n == 0 {
        return Ok(None);
    }

    let mut rest = [0u8; 11];
    reader
        .read_exact(&mut rest)
        .map_err(|e| Error::io("frame magic", e))?;
    let mut magic = [0u8; 12];
    magic[0] = first[0];
    magic[1..].copy_from_slice(&rest);

    if magic != FRAME_MAGIC {
        return Err(Error::bad_magic(offset));
    }

    let frame_type = reader
        .read_u32::<BigEndian>()
        .map_err(|e| Error::io("frame type", e))?;
    let compression = reader
        .read_u32::<BigEndian>()
        .map_err(|e| Error::io("frame compression", e))?;
    let size = reader
        .read_u32::<BigEndian>()
        .map_err(|e| Error::io("frame size", e))?;

    Ok(Some(FrameHeader {
        kind: FrameKind::from_raw(frame_type),
        compression: CompressionKind::from_raw(compression),
        size,
    }))
}
