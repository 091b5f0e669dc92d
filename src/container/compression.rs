// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The compression bridge (F2): gzip inflation of `CHANGE_SET` frame bodies.

use std::io::Read;

use flate2::read::GzDecoder;
use tracing::warn;

use crate::container::frame::CompressionKind;
use crate::core::error::Error;

/// Inflates a frame body according to its declared compression kind.
/// `Unknown` compression is not a hard error: it is logged at `warn` and the
/// frame is treated as unreadable by the caller (`Ok(None)`), mirroring the
/// skip-and-continue behavior used for unrecognized frame types (§6.3).
pub fn inflate_frame_body(compression: CompressionKind, raw: &[u8]) -> Result<Option<Vec<u8>>, Error> {
    match compression {
        CompressionKind::None => Ok(Some(raw.to_vec())),
        CompressionKind::Gzip => {
            let mut decoder = GzDecoder::new(raw);
            let mut out = Vec::new();
            decoder
                .read_to_end(&mut out)
                .map_err(|e| Error::io("gzip inflate", e))?;
            Ok(Some(out))
        }
        CompressionKind::Unknown(raw_kind) => {
            warn!(compression = raw_kind, "unhandled compression kind, skipping frame body");
            Ok(None)
        }
    }
}
