//! # Link Rotation
//!
//! Moves a symbolic link a signed number of steps through its ordered
//! candidate set, and optionally prunes the candidates it skipped over.
//!
//! A rotation runs in two stages:
//!
//! 1. **Planning** ([`plan`]): validate the options, build the candidate set,
//!    resolve the target index under the range policy and select what would be
//!    pruned. Nothing on disk changes.
//! 2. **Execution** ([`Rotator::execute`]): swap the link, then prune.
//!
//! The swap is a remove followed by a create. If the create fails the link is
//! gone and [`Error::LinkLost`] is returned; that state needs manual repair and
//! is never retried. Pruning continues past individual deletion failures and
//! reports them in [`RotationResult::prune_failures`].
//!
//! When clamping absorbs the whole step, so the final index equals the current
//! one, the link is left alone. Pruning still follows the direction of travel:
//! a forward step at the newest candidate drops everything older, a backward
//! step at the oldest drops nothing.

use crate::candidates::{self, Candidate, Listing};
use crate::config::{RangePolicy, RotateOptions};
use crate::error::{Error, Result};
use crate::filesystem::{Filesystem, RealFs};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Where `current + step` lands relative to the candidate set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    InRange(usize),
    /// Raw index below zero
    Before(i64),
    /// Raw index past the last candidate
    After(i64),
}

impl Landing {
    /// Bound the landing to a valid index of a set of `len` candidates.
    pub fn clamp(self, len: usize) -> usize {
        match self {
            Landing::InRange(index) => index,
            Landing::Before(_) => 0,
            Landing::After(_) => len.saturating_sub(1),
        }
    }
}

/// Apply `step` to `current` within a set of `len` candidates.
pub fn land(current: usize, step: i64, len: usize) -> Landing {
    let raw = i64::try_from(current).unwrap_or(i64::MAX).saturating_add(step);
    if raw < 0 {
        Landing::Before(raw)
    } else if usize::try_from(raw).map_or(true, |index| index >= len) {
        Landing::After(raw)
    } else {
        Landing::InRange(raw as usize)
    }
}

/// A computed rotation, ready to execute
#[derive(Debug, Clone)]
pub struct RotationPlan {
    pub listing: Listing,
    pub step: i64,
    pub landing: Landing,
    pub final_index: usize,
    pub prune: bool,
}

impl RotationPlan {
    /// Whether executing the plan moves the link.
    pub fn changed(&self) -> bool {
        self.final_index != self.listing.current
    }

    pub fn new_target(&self) -> &Candidate {
        &self.listing.candidates[self.final_index]
    }

    /// The out-of-range index the step asked for, when it was clamped.
    pub fn clamped_from(&self) -> Option<i64> {
        match self.landing {
            Landing::InRange(_) => None,
            Landing::Before(raw) | Landing::After(raw) => Some(raw),
        }
    }

    /// Candidates deleted by pruning, in candidate order.
    ///
    /// Moving forward drops everything before the new target; moving backward
    /// drops everything after it. A backward step that stays put drops nothing.
    pub fn prune_targets(&self) -> &[Candidate] {
        if !self.prune {
            return &[];
        }
        let candidates = &self.listing.candidates;
        if self.step > 0 {
            &candidates[..self.final_index]
        } else if self.changed() {
            &candidates[self.final_index + 1..]
        } else {
            &[]
        }
    }

    /// The result executing this plan would produce if every step succeeded.
    pub fn preview(&self) -> RotationResult {
        RotationResult {
            changed: self.changed(),
            link: self.listing.link.clone(),
            old_link: self.listing.target.clone(),
            new_link: self.new_target().path.clone(),
            old_index: self.listing.current,
            final_index: self.final_index,
            deleted: self
                .prune
                .then(|| self.prune_targets().iter().map(|c| c.path.clone()).collect()),
            prune_failures: Vec::new(),
        }
    }
}

/// A candidate that could not be deleted during pruning
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PruneFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RotationResult {
    pub changed: bool,
    /// The rotated link
    pub link: PathBuf,
    /// Target before the rotation
    pub old_link: PathBuf,
    /// Target after the rotation
    pub new_link: PathBuf,
    pub old_index: usize,
    pub final_index: usize,
    /// Deleted candidates; `None` when pruning was not requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted: Option<Vec<PathBuf>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prune_failures: Vec<PruneFailure>,
}

/// Compute a rotation without touching the filesystem.
pub fn plan(options: &RotateOptions) -> Result<RotationPlan> {
    options.validate()?;

    let listing = candidates::list(&options.link, options.sort, options.candidates)?;
    let len = listing.candidates.len();
    let landing = land(listing.current, options.step, len);

    debug!(
        "current index {} ({}), step {}, landing {:?}",
        listing.current,
        listing.current_candidate().display_name(),
        options.step,
        landing
    );

    let final_index = match landing {
        Landing::InRange(index) => index,
        Landing::Before(raw) | Landing::After(raw) => {
            let direction = if matches!(landing, Landing::Before(_)) {
                "backward"
            } else {
                "forward"
            };
            if options.range == RangePolicy::Strict && !options.force {
                return Err(Error::OutOfRange {
                    direction,
                    index: raw,
                    current: listing.current_candidate().display_name(),
                    candidates: listing.names(),
                });
            }
            let clamped = landing.clamp(len);
            warn!(
                "Unable to move {} to index {}, clamping to {}",
                direction, raw, clamped
            );
            clamped
        }
    };

    Ok(RotationPlan {
        listing,
        step: options.step,
        landing,
        final_index,
        prune: options.prune,
    })
}

/// Rotate a link on the host filesystem.
pub fn rotate(options: &RotateOptions) -> Result<RotationResult> {
    Rotator::new().rotate(options)
}

/// Executes rotations against a [`Filesystem`]
#[derive(Debug, Clone, Default)]
pub struct Rotator<F = RealFs> {
    fs: F,
}

impl Rotator<RealFs> {
    pub fn new() -> Self {
        Self { fs: RealFs }
    }
}

impl<F: Filesystem> Rotator<F> {
    pub fn with_filesystem(fs: F) -> Self {
        Self { fs }
    }

    /// Plan and execute a rotation.
    pub fn rotate(&self, options: &RotateOptions) -> Result<RotationResult> {
        let plan = plan(options)?;
        self.execute(&plan)
    }

    /// Swap the link and prune, as computed by `plan`.
    pub fn execute(&self, plan: &RotationPlan) -> Result<RotationResult> {
        let mut result = plan.preview();

        if plan.changed() {
            self.relink(&result.link, &result.new_link)?;
            info!(
                "Relinked {} from {} to {}",
                result.link.display(),
                result.old_link.display(),
                result.new_link.display()
            );
        } else {
            info!(
                "{} already points at {}, leaving it unchanged",
                result.link.display(),
                result.new_link.display()
            );
        }

        if let Some(deleted) = result.deleted.as_mut() {
            deleted.clear();
            for candidate in plan.prune_targets() {
                match self.remove(candidate) {
                    Ok(()) => {
                        info!("Pruned {}", candidate.path.display());
                        deleted.push(candidate.path.clone());
                    }
                    Err(e) => {
                        warn!("Unable to prune {}: {}", candidate.path.display(), e);
                        result.prune_failures.push(PruneFailure {
                            path: candidate.path.clone(),
                            error: e.to_string(),
                        });
                    }
                }
            }
        }

        Ok(result)
    }

    fn relink(&self, link: &Path, target: &Path) -> Result<()> {
        self.fs
            .remove_link(link)
            .map_err(|source| Error::Filesystem {
                operation: "remove link",
                path: link.to_path_buf(),
                source,
            })?;

        self.fs.create_link(target, link).map_err(|source| {
            error!(
                "Link {} removed but not recreated; it must be restored by hand",
                link.display()
            );
            Error::LinkLost {
                link: link.to_path_buf(),
                target: target.to_path_buf(),
                source,
            }
        })
    }

    fn remove(&self, candidate: &Candidate) -> std::io::Result<()> {
        if candidate.is_dir {
            self.fs.remove_dir_all(&candidate.path)
        } else {
            self.fs.remove_file(&candidate.path)
        }
    }
}
