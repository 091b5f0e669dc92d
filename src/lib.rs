// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # redacted-decoder
//!
//! Schema-directed decoder for telecom change-log container files.
//!
//! The crate is organized around the pipeline described in its design
//! document: an outer framed-file reader unwraps header/META/CHANGE_SET
//! frames, an XML managed-object schema is indexed and consulted field by
//! field, and a protobuf-compatible wire decoder turns each change's payload
//! into a [`FieldMap`] using a worker pool for independent changes.
//!
//! - **[`wire::WireReader`]** - varint/fixed64/tag decoding over a byte buffer
//! - **[`schema`]** - XML schema tree, memoizing class index, field resolver
//! - **[`decode::decode_message`]** - drives the wire reader and resolver to build a [`FieldMap`]
//! - **[`dispatch::decode_batch`]** - parallel fan-out over independent changes
//! - **[`container`]** - header, magic-framing, compression, and change-set extraction
//! - **[`diagnostics`]** - human-readable field-map dump
//!
//! ## Example: decoding a container file
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::fs::File;
//! use redacted_decoder::container::decode_container;
//!
//! let file = File::open("changes.bin")?;
//! let report = decode_container(file)?;
//! println!("frames decoded: {}", report.frames.len());
//! # Ok(())
//! # }
//! ```

// Core types: crate-wide error taxonomy and the decoded value model.
pub mod core;

pub use core::{DecodeError, DecodeResult, Error, Result};
pub use core::{FieldMap, FieldValue};

// The wire reader (C1).
pub mod wire;

// Schema tree, index (C2), and field resolver (C3).
pub mod schema;

// The message decoder (C4).
pub mod decode;

// The parallel dispatcher (C5).
pub mod dispatch;

// The outer framed-file container: header, frame dispatch (F1), compression
// bridge (F2), and change-set extraction (F3).
pub mod container;

// Diagnostic field-map rendering (F5).
pub mod diagnostics;
