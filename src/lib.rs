//! # Rotate Symlink Library
//!
//! This library rotates a symbolic link through the sibling directories of its
//! target. It is designed to be used by the `rotate-symlink` command-line tool
//! but can also be called directly from deployment tooling that keeps releases
//! side by side and points a `current` link at one of them.
//!
//! ## Quick Example
//!
//! ```no_run
//! use rotate_symlink::config::{RotateOptions, SortKey};
//! use rotate_symlink::rotate;
//!
//! // Move `current` one release forward by modification time and
//! // delete the releases it leaves behind.
//! let options = RotateOptions::new("/srv/app/current")
//!     .step(1)
//!     .sort(SortKey::Modification)
//!     .prune(true);
//!
//! let result = rotate::rotate(&options).unwrap();
//! println!("now pointing at {}", result.new_link.display());
//! ```
//!
//! ## Core Concepts
//!
//! - **Options (`config`)**: What to rotate and how: step, ordering, range
//!   policy, candidate rule, pruning. Also parses YAML job files.
//! - **Candidates (`candidates`)**: The ordered set of sibling entries the link
//!   can point at, and the link's current position in it.
//! - **Rotation (`rotate`)**: Index resolution, the link swap, and pruning.
//! - **Filesystem (`filesystem`)**: The mutating operations a rotation
//!   performs, behind a trait.
//!
//! ## Execution Flow
//!
//! 1.  **Validate**: The link must be a symbolic link and the step nonzero.
//! 2.  **Enumerate**: List and order the candidates under the target's parent.
//! 3.  **Resolve**: Apply the step, clamping or failing when out of range.
//! 4.  **Relink**: Replace the link with one pointing at the new candidate.
//! 5.  **Prune**: Optionally delete the candidates skipped over.

pub mod candidates;
pub mod config;
pub mod error;
pub mod filesystem;
pub mod output;
pub mod rotate;

#[cfg(test)]
mod rotate_proptest;
