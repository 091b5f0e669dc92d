// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Inspect command - print the diagnostic field-map dump for one change.

use std::fs::File;
use std::path::PathBuf;

use clap::Args;

use redacted_decoder::container::{decode_container, ProcessedFrame};
use redacted_decoder::diagnostics::render_field_map;

type Result<T = ()> = anyhow::Result<T>;

/// Print the field-map dump for a single decoded change, addressed by frame
/// index and change index within that frame (§6.4).
#[derive(Args)]
pub struct InspectCmd {
    /// Container file to decode.
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Index of the frame to inspect.
    #[arg(long)]
    frame: usize,

    /// Index of the change within that frame.
    #[arg(long)]
    change: usize,
}

impl InspectCmd {
    pub fn run(self) -> Result<()> {
        let file = File::open(&self.input)?;
        let report = decode_container(file)?;

        let frame = report
            .frames
            .get(self.frame)
            .ok_or_else(|| anyhow::anyhow!("no frame at index {}", self.frame))?;

        let ProcessedFrame::ChangeSet(data) = frame else {
            anyhow::bail!("frame {} is not a CHANGE_SET frame", self.frame);
        };

        let change = data
            .changes
            .get(self.change)
            .ok_or_else(|| anyhow::anyhow!("no change at index {} in frame {}", self.change, self.frame))?;

        println!("name: {}", change.name);
        match &change.fields {
            Some(fields) => print!("{}", render_field_map(fields)),
            None => println!("(no fields - deleted, unknown, or skipped change)"),
        }

        Ok(())
    }
}
