// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Decode command - run F1-F3/C5 to completion and print a summary.

use std::fs::File;
use std::path::PathBuf;

use clap::Args;

use redacted_decoder::container::{decode_container, ProcessedFrame};

type Result<T = ()> = anyhow::Result<T>;

/// Decode a container file and report a frame/change/error summary.
#[derive(Args)]
pub struct DecodeCmd {
    /// Container file to decode.
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

impl DecodeCmd {
    pub fn run(self) -> Result<()> {
        let file = File::open(&self.input)?;
        let report = decode_container(file)?;

        println!("version: {}", report.header.version);
        if !report.header.additional_info.is_empty() {
            println!("additional_info: {}", report.header.additional_info);
        }
        println!("frames: {}", report.frames.len());

        for (index, frame) in report.frames.iter().enumerate() {
            match frame {
                ProcessedFrame::Meta => println!("  [{index}] META"),
                ProcessedFrame::ChangeSet(data) => {
                    let decoded = data.changes.iter().filter(|c| c.fields.is_some()).count();
                    let failed = data
                        .changes
                        .iter()
                        .filter(|c| c.class_name.is_some() && c.fields.is_none())
                        .count();
                    println!(
                        "  [{index}] CHANGE_SET changes={} decoded={decoded} errors={failed}",
                        data.changes.len()
                    );
                }
                ProcessedFrame::Skipped { kind } => println!("  [{index}] skipped ({kind:?})"),
            }
        }

        Ok(())
    }
}
