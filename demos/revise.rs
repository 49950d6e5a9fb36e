//! Command-line tool for accepting or rejecting all tracked changes in a
//! Word document.
//!
//! # Usage
//!
//! Accept every change:
//! ```sh
//! cargo run --example revise -- accept review.docx final.docx
//! ```
//!
//! Reject every change, one part at a time, with progress logging:
//! ```sh
//! RUST_LOG=redline=debug cargo run --example revise -- reject review.docx original.docx --sequential
//! ```

use clap::{Parser, ValueEnum};
use redline::ooxml::docx::Package;
use redline::{Mode, RevisionOptions};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Action {
    /// Finalize every edit
    Accept,
    /// Revert every edit
    Reject,
}

impl From<Action> for Mode {
    fn from(action: Action) -> Self {
        match action {
            Action::Accept => Mode::Accept,
            Action::Reject => Mode::Reject,
        }
    }
}

/// Accept or reject all tracked changes in a .docx file
#[derive(Parser, Debug)]
#[command(name = "revise", version)]
struct Args {
    /// What to do with the revisions
    #[arg(value_enum)]
    action: Action,

    /// Input .docx file
    #[arg(value_name = "IN")]
    input: PathBuf,

    /// Output .docx file
    #[arg(value_name = "OUT")]
    output: PathBuf,

    /// Process parts one at a time instead of in parallel
    #[arg(long)]
    sequential: bool,

    /// Skip the check for leftover revision markup
    #[arg(long)]
    no_validate: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if !args.input.is_file() {
        eprintln!("Error: Input file does not exist: {}", args.input.display());
        std::process::exit(1);
    }

    let package = Package::open(&args.input)?;
    if !package.has_revisions() {
        println!("{}: no tracked changes", args.input.display());
    }

    let options = RevisionOptions::new()
        .with_parallel(!args.sequential)
        .with_validate(!args.no_validate);
    let mode = Mode::from(args.action);

    match package.process(mode, &options) {
        Ok(processed) => {
            processed.save(&args.output)?;
            println!("✓ {} -> {} ({})", args.input.display(), args.output.display(), mode);
            Ok(())
        },
        Err(e) => {
            eprintln!("✗ {}: {}", args.input.display(), e);
            std::process::exit(1);
        },
    }
}
