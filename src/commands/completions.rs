//! # Completions Command Implementation
//!
//! Prints a shell completion script for `rotate-symlink` to stdout, generated
//! with `clap_complete` from the CLI definition.
//!
//! ```bash
//! rotate-symlink completions bash > ~/.local/share/bash-completion/completions/rotate-symlink
//! rotate-symlink completions zsh > ~/.zfunc/_rotate-symlink
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io::{self, Write};

use crate::cli::Cli;

/// Generate shell completion scripts
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// The shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the `completions` command.
pub fn execute(args: CompletionsArgs) -> Result<()> {
    write_completions(args.shell, &mut io::stdout())
}

fn write_completions<W: Write>(shell: Shell, out: &mut W) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
    Ok(())
}
