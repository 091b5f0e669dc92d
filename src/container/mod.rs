// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The outer framed-file container: header parsing, magic-delimited frame
//! dispatch (F1), the compression bridge (F2), and change-set extraction
//! (F3), wired together with the schema index (C2) and dispatcher (C5).

pub mod change_set;
pub mod compression;
pub mod frame;
pub mod header;
pub mod meta;

use std::io::Read;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::container::change_set::{parse_change_set, ChangeSetData};
use crate::container::compression::inflate_frame_body;
use crate::container::frame::{read_frame_header, FrameKind};
use crate::container::header::{read_header, Header};
use crate::container::meta::extract_schemas;
use crate::core::error::Error;
use crate::dispatch::{decode_batch, DispatchJob};
use crate::schema::index::SchemaIndex;

/// One frame's outcome after dispatch.
pub enum ProcessedFrame {
    Meta,
    ChangeSet(ChangeSetData),
    /// `RESET`, `NODE_DETECTION`, or any unrecognized frame type: recognized
    /// but not decoded further (§6.1).
    Skipped { kind: FrameKind },
}

/// The full result of decoding one container file.
pub struct DecodeReport {
    pub header: Header,
    pub frames: Vec<ProcessedFrame>,
}

/// Wraps a reader to track the cumulative byte offset, used only to
/// attribute `BadMagic` failures to a position in the stream.
struct CountingReader<R> {
    inner: R,
    offset: u64,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.offset += n as u64;
        Ok(n)
    }
}

/// Decodes an entire container: the header, then every frame in sequence,
/// resolving `CHANGE_SET` payloads against the most recently seen META
/// schemas (§6.1-6.2).
///
/// The schema index is built once per META frame and lives for every
/// `CHANGE_SET` frame that follows, so memoization (§4.2, §8 property 4)
/// holds across the whole file rather than resetting every frame.
pub fn decode_container<R: Read>(reader: R) -> Result<DecodeReport, Error> {
    let mut reader = CountingReader { inner: reader, offset: 0 };
    let header = read_header(&mut reader)?;

    let mut frames = Vec::new();
    let mut index: Option<SchemaIndex> = None;

    loop {
        let frame_offset = reader.offset;
        let Some(frame_header) = read_frame_header(&mut reader, frame_offset)? else {
            break;
        };

        let mut body = vec![0u8; frame_header.size as usize];
        reader
            .read_exact(&mut body)
            .map_err(|e| Error::io("frame body", e))?;

        match frame_header.kind {
            FrameKind::Meta => {
                let (schema_a, schema_b) = extract_schemas(&body)?;
                index = Some(SchemaIndex::new(Arc::new(schema_a), Arc::new(schema_b)));
                frames.push(ProcessedFrame::Meta);
            }
            FrameKind::ChangeSet => {
                let Some(inflated) = inflate_frame_body(frame_header.compression, &body)? else {
                    frames.push(ProcessedFrame::Skipped {
                        kind: frame_header.kind,
                    });
                    continue;
                };
                let mut change_set = parse_change_set(&mut inflated.as_slice())?;
                if let Some(index) = &index {
                    resolve_change_set(index, &mut change_set);
                } else {
                    warn!("change-set frame arrived before any META frame; leaving fields unresolved");
                }
                frames.push(ProcessedFrame::ChangeSet(change_set));
            }
            FrameKind::Reset | FrameKind::NodeDetection => {
                debug!(kind = ?frame_header.kind, "skipping recognized-but-unsupported frame");
                frames.push(ProcessedFrame::Skipped {
                    kind: frame_header.kind,
                });
            }
            FrameKind::Unknown(raw) => {
                warn!(frame_type = raw, "skipping frame of unrecognized type");
                frames.push(ProcessedFrame::Skipped {
                    kind: frame_header.kind,
                });
            }
        }
    }

    Ok(DecodeReport { header, frames })
}

/// Batches every surviving `CreateOrUpdate` change in `change_set` and
/// writes the decoded field maps back in submission order (§6.2).
fn resolve_change_set(index: &SchemaIndex, change_set: &mut ChangeSetData) {
    let mut job_positions = Vec::new();
    let mut jobs = Vec::new();
    for (position, change) in change_set.changes.iter().enumerate() {
        if let (Some(class_name), Some(payload)) = (&change.class_name, &change.payload) {
            job_positions.push(position);
            jobs.push(DispatchJob::new(class_name.clone(), payload.clone()));
        }
    }

    let results = decode_batch(index, &jobs);
    for (position, result) in job_positions.into_iter().zip(results) {
        match result {
            Ok(fields) => change_set.changes[position].fields = Some(fields),
            Err(err) => {
                warn!(change = %change_set.changes[position].name, error = %err, "change decode failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_container() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes.extend_from_slice(&0u32.to_be_bytes());

        // META frame.
        let mut archive_bytes = Vec::new();
        {
            let mut writer = zip::ZipWriter::new(std::io::Cursor::new(&mut archive_bytes));
            let options = zip::write::SimpleFileOptions::default();
            writer.start_file("bm/meta.xml", options).unwrap();
            writer
                .write_all(
                    br#"<root><managedObject class="Cell"><p name="a" type="integer"><proto index="1"/></p></managedObject></root>"#,
                )
                .unwrap();
            writer.start_file("lte/meta.xml", options).unwrap();
            writer.write_all(b"<root/>").unwrap();
            writer.finish().unwrap();
        }
        bytes.extend_from_slice(&frame::FRAME_MAGIC);
        bytes.extend_from_slice(&2u32.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(&(archive_bytes.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&archive_bytes);

        // CHANGE_SET frame, uncompressed, one change.
        let mut change_set_body = Vec::new();
        change_set_body.extend_from_slice(&0u32.to_be_bytes());
        change_set_body.extend_from_slice(&0u32.to_be_bytes());
        change_set_body.extend_from_slice(&1u32.to_be_bytes());
        let name = "ManagedElement=1/Cell-1";
        change_set_body.extend_from_slice(&(name.len() as u16).to_be_bytes());
        change_set_body.extend_from_slice(name.as_bytes());
        change_set_body.push(0);
        change_set_body.extend_from_slice(&2u32.to_be_bytes());
        change_set_body.extend_from_slice(&[0x08, 0x2A]);

        bytes.extend_from_slice(&frame::FRAME_MAGIC);
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(&(change_set_body.len() as u32).to_be_bytes());
        bytes.extend_from_slice(&change_set_body);

        bytes
    }

    #[test]
    fn decodes_meta_then_change_set_end_to_end() {
        let report = decode_container(std::io::Cursor::new(sample_container())).unwrap();
        assert_eq!(report.frames.len(), 2);
        match &report.frames[1] {
            ProcessedFrame::ChangeSet(data) => {
                assert_eq!(data.changes.len(), 1);
                let fields = data.changes[0].fields.as_ref().unwrap();
                assert_eq!(fields.get("a").unwrap().as_u64(), Some(42));
            }
            _ => panic!("expected change-set frame"),
        }
    }

    #[test]
    fn schema_index_persists_and_memoizes_across_change_set_frames() {
        use crate::schema::document::parse_document;

        let schema_a = Arc::new(
            parse_document(
                "a",
                r#"<root><managedObject class="Cell"><p name="a" type="integer"><proto index="1"/></p></managedObject></root>"#,
            )
            .unwrap(),
        );
        let schema_b = Arc::new(parse_document("b", "<root/>").unwrap());
        let index = SchemaIndex::new(schema_a, schema_b);

        fn change(name: &str, payload: Vec<u8>) -> change_set::SingleChange {
            change_set::SingleChange {
                name: name.to_string(),
                kind: change_set::ChangeKind::CreateOrUpdate,
                class_name: Some("Cell".to_string()),
                payload: Some(payload),
                fields: None,
            }
        }

        let mut first = ChangeSetData {
            timestamp: 0,
            changes: vec![change("a/Cell-1", vec![0x08, 0x01])],
        };
        let mut second = ChangeSetData {
            timestamp: 0,
            changes: vec![change("a/Cell-2", vec![0x08, 0x02])],
        };

        resolve_change_set(&index, &mut first);
        resolve_change_set(&index, &mut second);

        assert_eq!(first.changes[0].fields.as_ref().unwrap().get("a").unwrap().as_u64(), Some(1));
        assert_eq!(second.changes[0].fields.as_ref().unwrap().get("a").unwrap().as_u64(), Some(2));
        assert_eq!(index.cached_len(), 1);
    }

    #[test]
    fn bad_magic_in_frame_loop_is_reported_with_offset() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&1u32.to_be_bytes());
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes.extend_from_slice(&0u32.to_be_bytes());
        bytes.extend_from_slice(&[0u8; 12]);

        let err = decode_container(std::io::Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, Error::BadMagic { offset: 12 }));
    }
}
