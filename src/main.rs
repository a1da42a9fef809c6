//! # Rotate Symlink CLI
//!
//! This is the binary entry point for the `rotate-symlink` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging and output styling.
//! - Executing the appropriate command and turning errors into a non-zero exit.
//!
//! The rotation logic lives in the `rotate_symlink` library crate; the binary
//! is a thin wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
