//! # Rotation Options and Job Files
//!
//! This module defines the typed options of a rotation and the YAML job file
//! format used to run several rotations in one invocation.
//!
//! ## Key Components
//!
//! - **`SortKey`**: How candidates are ordered (`name`, `creation`,
//!   `modification`).
//! - **`RangePolicy`**: What happens when `current + step` leaves the
//!   candidate set (`clamp` or `strict`).
//! - **`CandidateRule`**: Which sibling entries are candidates
//!   (`subdirectories` or `listing`).
//! - **`RotateOptions`**: The full set of options for one rotation.
//!
//! ## Job File Format
//!
//! A job file is either a single rotation mapping or a list of them:
//!
//! ```yaml
//! - link: /srv/app/current
//!   step: 1
//!   sort: modification
//!   prune: true
//! - link: /srv/worker/current
//!   step: -1
//!   strict: true
//! ```
//!
//! Textual values are kept as strings during deserialization and converted
//! afterwards, so an unknown sort key reports the accepted values instead of a
//! serde variant error.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Ordering applied to the candidate set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Lexical order of the entry name
    #[default]
    Name,
    /// Filesystem creation time, oldest first
    Creation,
    /// Filesystem modification time, oldest first
    Modification,
}

impl SortKey {
    pub const VARIANTS: &'static [&'static str] = &["name", "creation", "modification"];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Creation => "creation",
            SortKey::Modification => "modification",
        }
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(SortKey::Name),
            "creation" => Ok(SortKey::Creation),
            "modification" => Ok(SortKey::Modification),
            other => Err(unknown_value("sort", other, Self::VARIANTS)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Behavior when the computed index falls outside the candidate set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    /// Bound the index to the first or last candidate
    #[default]
    Clamp,
    /// Fail with an out-of-range error unless forced
    Strict,
}

impl RangePolicy {
    pub const VARIANTS: &'static [&'static str] = &["clamp", "strict"];

    pub fn as_str(self) -> &'static str {
        match self {
            RangePolicy::Clamp => "clamp",
            RangePolicy::Strict => "strict",
        }
    }
}

impl FromStr for RangePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "clamp" => Ok(RangePolicy::Clamp),
            "strict" => Ok(RangePolicy::Strict),
            other => Err(unknown_value("range policy", other, Self::VARIANTS)),
        }
    }
}

/// Rule used to build the candidate set from the link's root directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateRule {
    /// Real subdirectories only; nested symlinks and files are skipped
    #[default]
    Subdirectories,
    /// Every entry of the root except the one named like the link itself
    Listing,
}

impl CandidateRule {
    pub const VARIANTS: &'static [&'static str] = &["subdirectories", "listing"];

    pub fn as_str(self) -> &'static str {
        match self {
            CandidateRule::Subdirectories => "subdirectories",
            CandidateRule::Listing => "listing",
        }
    }
}

impl FromStr for CandidateRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "subdirectories" => Ok(CandidateRule::Subdirectories),
            "listing" => Ok(CandidateRule::Listing),
            other => Err(unknown_value("candidate rule", other, Self::VARIANTS)),
        }
    }
}

fn unknown_value(what: &str, value: &str, accepted: &[&str]) -> Error {
    Error::InvalidInput {
        message: format!("Unknown {} '{}'", what, value),
        hint: Some(format!("Use one of: {}", accepted.join(", "))),
    }
}

/// Options for a single rotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RotateOptions {
    /// Path of the symbolic link to rotate
    pub link: PathBuf,
    /// Signed, nonzero offset applied to the current index
    pub step: i64,
    pub sort: SortKey,
    /// Delete the candidates skipped over by the rotation
    pub prune: bool,
    pub range: RangePolicy,
    /// Clamp instead of failing under [`RangePolicy::Strict`]
    pub force: bool,
    pub candidates: CandidateRule,
}

impl RotateOptions {
    /// Options with the defaults: one step forward, by name, clamped, no pruning.
    pub fn new<P: Into<PathBuf>>(link: P) -> Self {
        Self {
            link: link.into(),
            step: 1,
            sort: SortKey::default(),
            prune: false,
            range: RangePolicy::default(),
            force: false,
            candidates: CandidateRule::default(),
        }
    }

    pub fn step(mut self, step: i64) -> Self {
        self.step = step;
        self
    }

    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn prune(mut self, prune: bool) -> Self {
        self.prune = prune;
        self
    }

    pub fn range(mut self, range: RangePolicy) -> Self {
        self.range = range;
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn candidates(mut self, candidates: CandidateRule) -> Self {
        self.candidates = candidates;
        self
    }

    /// Check the options that can be verified without touching the filesystem.
    pub fn validate(&self) -> Result<()> {
        if self.step == 0 {
            return Err(Error::invalid_input(
                "The step parameter must be different than 0",
            ));
        }
        if self.link.as_os_str().is_empty() {
            return Err(Error::invalid_input("The link parameter must not be empty"));
        }
        Ok(())
    }
}

/// One entry of a job file, before its textual values are checked
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRotation {
    link: PathBuf,
    #[serde(default = "default_step")]
    step: i64,
    #[serde(default)]
    sort: Option<String>,
    #[serde(default)]
    prune: bool,
    #[serde(default)]
    strict: bool,
    #[serde(default)]
    force: bool,
    #[serde(default)]
    candidates: Option<String>,
}

fn default_step() -> i64 {
    1
}

impl TryFrom<RawRotation> for RotateOptions {
    type Error = Error;

    fn try_from(raw: RawRotation) -> Result<Self> {
        let sort = raw.sort.as_deref().map(SortKey::from_str).transpose()?;
        let candidates = raw
            .candidates
            .as_deref()
            .map(CandidateRule::from_str)
            .transpose()?;

        let options = RotateOptions::new(raw.link)
            .step(raw.step)
            .sort(sort.unwrap_or_default())
            .prune(raw.prune)
            .range(if raw.strict {
                RangePolicy::Strict
            } else {
                RangePolicy::Clamp
            })
            .force(raw.force)
            .candidates(candidates.unwrap_or_default());
        options.validate()?;
        Ok(options)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JobDocument {
    Many(Vec<RawRotation>),
    One(RawRotation),
}

/// Parse a job file from a YAML string.
///
/// Accepts a list of rotations or a single rotation mapping. An empty list is
/// rejected because it would silently do nothing.
pub fn parse(yaml: &str) -> Result<Vec<RotateOptions>> {
    let document: JobDocument = serde_yaml::from_str(yaml)?;

    let raw = match document {
        JobDocument::Many(list) => list,
        JobDocument::One(single) => vec![single],
    };

    if raw.is_empty() {
        return Err(Error::ConfigParse {
            message: "The job file does not define any rotation".to_string(),
        });
    }

    raw.into_iter()
        .enumerate()
        .map(|(i, entry)| {
            RotateOptions::try_from(entry).map_err(|e| match e {
                Error::InvalidInput { message, hint } => Error::InvalidInput {
                    message: format!("rotation #{}: {}", i + 1, message),
                    hint,
                },
                other => other,
            })
        })
        .collect()
}

/// Read and parse a job file from disk.
pub fn from_file(path: &Path) -> Result<Vec<RotateOptions>> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Filesystem {
        operation: "read job file",
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content)
}
