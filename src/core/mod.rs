// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout the decoder.
//!
//! - [`Error`] / [`DecodeError`] - crate-wide and core-only error taxonomies
//! - [`FieldValue`] / [`FieldMap`] - the decoded value model (§3)

pub mod error;
pub mod value;

pub use error::{DecodeError, DecodeResult, Error, Result};
pub use value::{FieldMap, FieldValue};
