// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! The parallel dispatcher (C5): fans independent change decode jobs out
//! across a worker pool while preserving input order (§4.5).

use rayon::prelude::*;

use crate::core::error::Error;
use crate::core::value::FieldMap;
use crate::decode::decode_message;
use crate::schema::index::SchemaIndex;

/// One change awaiting decode: the resolved class name and its raw payload.
pub struct DispatchJob {
    pub class_name: String,
    pub payload: Vec<u8>,
}

impl DispatchJob {
    pub fn new(class_name: impl Into<String>, payload: Vec<u8>) -> Self {
        DispatchJob {
            class_name: class_name.into(),
            payload,
        }
    }
}

/// Decodes every job against `schema_index`, using rayon's work-stealing pool.
/// A failure in one job never aborts the batch - it is carried as an `Err` at
/// that job's position, so callers can report per-change failures without
/// losing the changes that decoded successfully (§4.5, §8 property 5).
pub fn decode_batch(schema_index: &SchemaIndex, jobs: &[DispatchJob]) -> Vec<Result<FieldMap, Error>> {
    jobs.par_iter()
        .map(|job| decode_one(schema_index, job))
        .collect()
}

fn decode_one(schema_index: &SchemaIndex, job: &DispatchJob) -> Result<FieldMap, Error> {
    let descriptor = schema_index
        .lookup(&job.class_name)
        .map_err(|e| Error::decode(job.class_name.clone(), e))?;
    decode_message(&job.class_name, &descriptor, &job.payload)
        .map_err(|e| Error::decode(job.class_name.clone(), e))
}
