// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # redacted-decoder CLI
//!
//! ## Usage
//!
//! ```sh
//! # Decode a container file and print a summary.
//! redacted-decoder decode changes.bin
//!
//! # Print the field-map dump for one change.
//! redacted-decoder inspect changes.bin --frame 1 --change 0
//! ```

mod cmd;

use std::process;

use clap::{Parser, Subcommand};
use cmd::{DecodeCmd, InspectCmd};

type Result<T = ()> = anyhow::Result<T>;

/// redacted-decoder - telecom change-log container decoder
#[derive(Parser)]
#[command(name = "redacted-decoder")]
#[command(about = "Schema-directed decoder for telecom change-log container files", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "ArcheBase")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a container file and report a frame/change/error summary.
    Decode(DecodeCmd),

    /// Print the diagnostic field-map dump for a single change.
    Inspect(InspectCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decode(cmd) => cmd.run(),
        Commands::Inspect(cmd) => cmd.run(),
    }
}

fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
