//! # List Command Implementation
//!
//! This module implements the `list` subcommand, which shows the ordered
//! candidate set of a symbolic link and marks the entry it currently points
//! at. The indices shown are the ones `rotate` steps through.
//!
//! This command is a safe, read-only operation that does not modify any files.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use rotate_symlink::candidates::{self, Listing};
use rotate_symlink::config::{CandidateRule, SortKey};
use rotate_symlink::output::{emoji, highlight, OutputConfig};

/// List the rotation candidates of a symbolic link
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Path of the symbolic link.
    #[arg(value_name = "LINK")]
    pub link: PathBuf,

    /// Candidate ordering: name, creation, or modification.
    #[arg(long, value_name = "KEY", default_value = "name")]
    pub sort: String,

    /// Which siblings are candidates: subdirectories or listing.
    #[arg(long, value_name = "RULE", default_value = "subdirectories")]
    pub candidates: String,

    /// Print the listing as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the `list` command.
pub fn execute(args: ListArgs, output: &OutputConfig) -> Result<()> {
    let sort: SortKey = args.sort.parse()?;
    let rule: CandidateRule = args.candidates.parse()?;

    let listing = candidates::list(&args.link, sort, rule)
        .with_context(|| format!("Failed to list candidates of {}", args.link.display()))?;

    if args.json {
        println!("{}", to_json(&listing));
    } else {
        print_listing(&listing, output);
    }

    Ok(())
}

fn to_json(listing: &Listing) -> serde_json::Value {
    let entries: Vec<_> = listing
        .candidates
        .iter()
        .enumerate()
        .map(|(index, candidate)| {
            serde_json::json!({
                "index": index,
                "name": candidate.display_name(),
                "path": candidate.path,
                "is_dir": candidate.is_dir,
            })
        })
        .collect();

    serde_json::json!({
        "link": listing.link,
        "target": listing.target,
        "root": listing.root,
        "current": listing.current,
        "candidates": entries,
    })
}

fn print_listing(listing: &Listing, output: &OutputConfig) {
    println!(
        "{} {} -> {}",
        emoji(output, "📂", "[ROOT]"),
        listing.link.display(),
        listing.root.display()
    );

    let width = listing.last_index().to_string().len();
    for (index, candidate) in listing.candidates.iter().enumerate() {
        let name = candidate.display_name();
        if index == listing.current {
            println!("* {:>width$}  {}", index, highlight(output, &name));
        } else {
            println!("  {:>width$}  {}", index, name);
        }
    }
}
