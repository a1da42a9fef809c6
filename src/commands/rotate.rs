//! # Rotate Command Implementation
//!
//! This module implements the `rotate` subcommand, which moves a symbolic link
//! a number of steps through the sibling directories of its target.
//!
//! ## Functionality
//!
//! - **Single rotation**: `--link` plus flags describe one rotation.
//! - **Job file**: `--config` (or `ROTATE_SYMLINK_CONFIG`) runs every rotation
//!   listed in a YAML file, in order, stopping at the first failure.
//! - **Dry run**: `--dry-run` computes and reports the rotation without
//!   touching the filesystem.
//! - **JSON output**: `--json` prints one result object per rotation, and a
//!   `{"failed": true, ...}` object when a rotation fails.

use anyhow::Result;
use clap::Args;
use std::path::{Path, PathBuf};

use rotate_symlink::config::{self, CandidateRule, RangePolicy, RotateOptions, SortKey};
use rotate_symlink::error::Error;
use rotate_symlink::output::{emoji, failure, highlight, OutputConfig};
use rotate_symlink::rotate::{self, RotationResult};

/// Rotate a symbolic link to another sibling directory
#[derive(Args, Debug)]
pub struct RotateArgs {
    /// Path of the symbolic link to rotate.
    #[arg(short, long, value_name = "PATH")]
    pub link: Option<PathBuf>,

    /// Number of candidates to move by. Negative values move backward.
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    pub step: i64,

    /// Candidate ordering: name, creation, or modification.
    #[arg(long, value_name = "KEY", default_value = "name")]
    pub sort: String,

    /// Delete the candidates skipped over by the rotation.
    #[arg(short, long)]
    pub prune: bool,

    /// Fail instead of clamping when the step leaves the candidate set.
    #[arg(long)]
    pub strict: bool,

    /// Clamp out-of-range steps even with --strict.
    #[arg(short, long)]
    pub force: bool,

    /// Which siblings are candidates: subdirectories, or listing (every entry
    /// except the link's own name).
    #[arg(long, value_name = "RULE", default_value = "subdirectories")]
    pub candidates: String,

    /// YAML job file listing rotations to run. Ignored when --link is given.
    #[arg(short, long, value_name = "FILE", env = "ROTATE_SYMLINK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Show what would change without changing anything.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print results as JSON.
    #[arg(long)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the `rotate` command.
pub fn execute(args: RotateArgs, output: &OutputConfig) -> Result<()> {
    let jobs = match jobs(&args) {
        Ok(jobs) => jobs,
        Err(e) => return Err(fail(&args, e, None)),
    };

    if args.dry_run && !args.quiet && !args.json {
        println!(
            "{} DRY RUN MODE - No changes will be made",
            emoji(output, "🔎", "[DRY RUN]")
        );
        println!();
    }

    for options in &jobs {
        let outcome = if args.dry_run {
            rotate::plan(options).map(|plan| (plan.preview(), plan.clamped_from()))
        } else {
            rotate::rotate(options).map(|result| (result, None))
        };

        match outcome {
            Ok((result, clamped_from)) => report(&result, clamped_from, &args, output)?,
            Err(e) => return Err(fail(&args, e, Some(options.link.as_path()))),
        }
    }

    Ok(())
}

/// Build the rotations requested on the command line or in the job file.
fn jobs(args: &RotateArgs) -> rotate_symlink::error::Result<Vec<RotateOptions>> {
    if let Some(link) = &args.link {
        let options = RotateOptions::new(link)
            .step(args.step)
            .sort(args.sort.parse::<SortKey>()?)
            .prune(args.prune)
            .range(if args.strict {
                RangePolicy::Strict
            } else {
                RangePolicy::Clamp
            })
            .force(args.force)
            .candidates(args.candidates.parse::<CandidateRule>()?);
        return Ok(vec![options]);
    }

    match &args.config {
        Some(path) => config::from_file(path),
        None => Err(Error::InvalidInput {
            message: "No link to rotate".to_string(),
            hint: Some("Pass --link PATH, or --config FILE with a list of rotations".to_string()),
        }),
    }
}

/// Report a failed rotation and turn it into the command's error.
fn fail(args: &RotateArgs, error: Error, link: Option<&Path>) -> anyhow::Error {
    if args.json {
        let report = serde_json::json!({
            "failed": true,
            "kind": error.kind().as_str(),
            "msg": error.to_string(),
        });
        println!("{}", report);
    }

    let error = anyhow::Error::new(error);
    match link {
        Some(link) => error.context(format!("Failed to rotate {}", link.display())),
        None => error,
    }
}

fn report(
    result: &RotationResult,
    clamped_from: Option<i64>,
    args: &RotateArgs,
    output: &OutputConfig,
) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string(result)?);
        return Ok(());
    }

    for failed in &result.prune_failures {
        eprintln!(
            "{} {}",
            emoji(output, "❌", "[FAIL]"),
            failure(
                output,
                &format!("Could not prune {}: {}", failed.path.display(), failed.error)
            )
        );
    }

    if args.quiet {
        return Ok(());
    }

    let link = highlight(output, &result.link.display().to_string());
    if result.changed {
        println!(
            "{} {}: {} -> {} (index {} -> {})",
            emoji(output, "🔗", "[LINK]"),
            link,
            result.old_link.display(),
            highlight(output, &result.new_link.display().to_string()),
            result.old_index,
            result.final_index
        );
    } else {
        let pruning = result.deleted.as_ref().is_some_and(|d| !d.is_empty());
        println!(
            "{} {} already at {} (index {}){}",
            emoji(output, "✅", "[OK]"),
            link,
            result.new_link.display(),
            result.final_index,
            if pruning { "" } else { ", nothing to do" }
        );
    }

    if let Some(raw) = clamped_from {
        println!(
            "   Index {} is out of range, clamped to {}",
            raw, result.final_index
        );
    }

    if let Some(deleted) = &result.deleted {
        let verb = if args.dry_run { "Would prune" } else { "Pruned" };
        for path in deleted {
            println!("   {} {}", verb, path.display());
        }
    }

    Ok(())
}
