//! # Candidate Set
//!
//! Enumerates and orders the sibling entries a link can rotate through.
//!
//! The candidate set lives in the link's *root*: the parent directory of the
//! link's canonical target. Which entries of the root count as candidates is
//! decided by a [`CandidateRule`]:
//!
//! - `Subdirectories` keeps real directories only. Nested symbolic links and
//!   regular files are skipped, and the current target is matched by its full
//!   canonical path.
//! - `Listing` keeps every entry except the one sharing the link's basename,
//!   and the current target is matched by name.
//!
//! The two rules agree on a root that holds nothing but release directories
//! and the link itself. They disagree when the root contains files, nested
//! links, or a real directory named like the link.

use crate::config::{CandidateRule, SortKey};
use crate::error::{Error, Result};
use log::debug;
use std::ffi::{OsStr, OsString};
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

/// One entry of the candidate set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Absolute path of the entry
    pub path: PathBuf,
    /// File name of the entry within the root
    pub name: OsString,
    /// Whether the entry is a real directory (not a link to one)
    pub is_dir: bool,
    pub created: Option<SystemTime>,
    pub modified: Option<SystemTime>,
}

impl Candidate {
    pub fn display_name(&self) -> String {
        self.name.to_string_lossy().into_owned()
    }
}

/// The ordered candidate set of a link together with its current position
#[derive(Debug, Clone)]
pub struct Listing {
    /// The link, as given by the caller
    pub link: PathBuf,
    /// Canonical path the link currently resolves to
    pub target: PathBuf,
    /// Parent directory of `target`
    pub root: PathBuf,
    pub candidates: Vec<Candidate>,
    /// Index of `target` in `candidates`
    pub current: usize,
}

impl Listing {
    pub fn last_index(&self) -> usize {
        self.candidates.len() - 1
    }

    pub fn current_candidate(&self) -> &Candidate {
        &self.candidates[self.current]
    }

    /// Comma-separated candidate names, in order.
    pub fn names(&self) -> String {
        self.candidates
            .iter()
            .map(Candidate::display_name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Build the ordered candidate set for `link` and locate its current target.
///
/// Fails with `InvalidInput` when `link` is not a symbolic link, and with
/// `NotFound` when the resolved target is not a member of the set (including
/// a dangling link).
pub fn list(link: &Path, sort: SortKey, rule: CandidateRule) -> Result<Listing> {
    let target = resolve_link(link)?;
    let root = target
        .parent()
        .ok_or_else(|| {
            Error::invalid_input(format!(
                "Link ({}) resolves to a filesystem root, which has no siblings",
                link.display()
            ))
        })?
        .to_path_buf();

    let link_name = link.file_name().unwrap_or_default();
    let mut candidates = enumerate(&root, rule, link_name)?;
    order(&mut candidates, sort)?;

    debug!(
        "{} candidate(s) under {} sorted by {}",
        candidates.len(),
        root.display(),
        sort
    );

    let current = position(&candidates, &target, rule).ok_or_else(|| Error::NotFound {
        target: target.clone(),
        root: root.clone(),
    })?;

    Ok(Listing {
        link: link.to_path_buf(),
        target,
        root,
        candidates,
        current,
    })
}

/// Check that `link` is a symbolic link and return its canonical target.
fn resolve_link(link: &Path) -> Result<PathBuf> {
    let is_link = std::fs::symlink_metadata(link)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false);
    if !is_link {
        return Err(Error::invalid_input(format!(
            "Link parameter ({}) must be a valid symbolic link.",
            link.display()
        )));
    }

    match std::fs::canonicalize(link) {
        Ok(target) => Ok(target),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let raw = std::fs::read_link(link).map_err(|source| Error::Filesystem {
                operation: "read link",
                path: link.to_path_buf(),
                source,
            })?;
            let target = match link.parent() {
                Some(dir) if raw.is_relative() => dir.join(raw),
                _ => raw,
            };
            let root = target.parent().map(Path::to_path_buf).unwrap_or_default();
            Err(Error::NotFound { target, root })
        }
        Err(source) => Err(Error::Filesystem {
            operation: "resolve link",
            path: link.to_path_buf(),
            source,
        }),
    }
}

/// List the immediate children of `root` that `rule` admits, in enumeration order.
pub fn enumerate(root: &Path, rule: CandidateRule, link_name: &OsStr) -> Result<Vec<Candidate>> {
    let mut candidates = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
    {
        let entry = entry?;
        let file_type = entry.file_type();

        let admitted = match rule {
            CandidateRule::Subdirectories => file_type.is_dir(),
            CandidateRule::Listing => entry.file_name() != link_name,
        };
        if !admitted {
            continue;
        }

        let metadata = entry.metadata()?;
        candidates.push(Candidate {
            path: entry.path().to_path_buf(),
            name: entry.file_name().to_os_string(),
            is_dir: file_type.is_dir(),
            created: creation_time(&metadata).ok(),
            modified: metadata.modified().ok(),
        });
    }

    Ok(candidates)
}

/// Creation time of an entry.
///
/// Falls back to the inode status-change time on Unix filesystems that do not
/// record a birth time.
pub fn creation_time(metadata: &Metadata) -> io::Result<SystemTime> {
    match metadata.created() {
        Ok(time) => Ok(time),
        #[cfg(unix)]
        Err(_) => {
            use std::os::unix::fs::MetadataExt;
            use std::time::{Duration, UNIX_EPOCH};

            let secs = u64::try_from(metadata.ctime())
                .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "ctime before epoch"))?;
            let nanos = u32::try_from(metadata.ctime_nsec()).unwrap_or(0);
            Ok(UNIX_EPOCH + Duration::new(secs, nanos))
        }
        #[cfg(not(unix))]
        Err(e) => Err(e),
    }
}

/// Stable sort of the candidate set by `sort`.
///
/// Entries with equal keys keep their enumeration order.
pub fn order(candidates: &mut [Candidate], sort: SortKey) -> Result<()> {
    match sort {
        SortKey::Name => candidates.sort_by(|a, b| a.name.cmp(&b.name)),
        SortKey::Creation => {
            require_timestamp(candidates, sort, |c| c.created)?;
            candidates.sort_by_key(|c| c.created);
        }
        SortKey::Modification => {
            require_timestamp(candidates, sort, |c| c.modified)?;
            candidates.sort_by_key(|c| c.modified);
        }
    }
    Ok(())
}

fn require_timestamp<F>(candidates: &[Candidate], sort: SortKey, key: F) -> Result<()>
where
    F: Fn(&Candidate) -> Option<SystemTime>,
{
    match candidates.iter().find(|c| key(c).is_none()) {
        Some(missing) => Err(Error::InvalidInput {
            message: format!(
                "The filesystem does not report a {} time for {}",
                sort,
                missing.path.display()
            ),
            hint: Some("Use --sort name instead".to_string()),
        }),
        None => Ok(()),
    }
}

/// Index of `target` in an ordered candidate set.
pub fn position(candidates: &[Candidate], target: &Path, rule: CandidateRule) -> Option<usize> {
    match rule {
        CandidateRule::Subdirectories => candidates.iter().position(|c| c.path == target),
        CandidateRule::Listing => {
            let name = target.file_name()?;
            candidates.iter().position(|c| c.name == name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::time::{Duration, UNIX_EPOCH};
    use tempfile::TempDir;

    fn candidate(name: &str, created: u64, modified: u64) -> Candidate {
        Candidate {
            path: PathBuf::from("/releases").join(name),
            name: OsString::from(name),
            is_dir: true,
            created: Some(UNIX_EPOCH + Duration::from_secs(created)),
            modified: Some(UNIX_EPOCH + Duration::from_secs(modified)),
        }
    }

    fn names(candidates: &[Candidate]) -> Vec<String> {
        candidates.iter().map(Candidate::display_name).collect()
    }

    #[test]
    fn test_order_by_name() {
        let mut set = vec![
            candidate("c", 1, 1),
            candidate("a", 3, 3),
            candidate("b", 2, 2),
        ];
        order(&mut set, SortKey::Name).unwrap();
        assert_eq!(names(&set), ["a", "b", "c"]);
    }

    #[test]
    fn test_order_by_name_is_bytewise() {
        let mut set = vec![
            candidate("b", 0, 0),
            candidate("B", 0, 0),
            candidate("a10", 0, 0),
            candidate("a9", 0, 0),
        ];
        order(&mut set, SortKey::Name).unwrap();
        assert_eq!(names(&set), ["B", "a10", "a9", "b"]);
    }

    #[test]
    fn test_order_by_creation_and_modification() {
        let mut set = vec![
            candidate("a", 30, 10),
            candidate("b", 10, 30),
            candidate("c", 20, 20),
        ];
        order(&mut set, SortKey::Creation).unwrap();
        assert_eq!(names(&set), ["b", "c", "a"]);

        order(&mut set, SortKey::Modification).unwrap();
        assert_eq!(names(&set), ["a", "c", "b"]);
    }

    #[test]
    fn test_order_ties_keep_enumeration_order() {
        let mut set = vec![
            candidate("z", 5, 5),
            candidate("m", 1, 1),
            candidate("a", 5, 5),
        ];
        order(&mut set, SortKey::Modification).unwrap();
        assert_eq!(names(&set), ["m", "z", "a"]);
    }

    #[test]
    fn test_order_missing_timestamp() {
        let mut set = vec![candidate("a", 1, 1), candidate("b", 2, 2)];
        set[1].created = None;
        let err = order(&mut set, SortKey::Creation).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("creation time"));
        // Name ordering does not need timestamps
        order(&mut set, SortKey::Name).unwrap();
    }

    #[test]
    fn test_position_by_rule() {
        let set = vec![candidate("a", 0, 0), candidate("b", 0, 0)];
        assert_eq!(
            position(&set, Path::new("/releases/b"), CandidateRule::Subdirectories),
            Some(1)
        );
        assert_eq!(
            position(&set, Path::new("/elsewhere/b"), CandidateRule::Subdirectories),
            None
        );
        assert_eq!(
            position(&set, Path::new("/elsewhere/b"), CandidateRule::Listing),
            Some(1)
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_enumerate_subdirectories_skips_files_and_links() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir(root.join("v1")).unwrap();
        std::fs::create_dir(root.join("v2")).unwrap();
        std::fs::write(root.join("notes.txt"), "x").unwrap();
        std::os::unix::fs::symlink(root.join("v1"), root.join("alias")).unwrap();
        std::os::unix::fs::symlink(root.join("v2"), root.join("current")).unwrap();

        let mut set = enumerate(root, CandidateRule::Subdirectories, OsStr::new("current")).unwrap();
        order(&mut set, SortKey::Name).unwrap();
        assert_eq!(names(&set), ["v1", "v2"]);
        assert!(set.iter().all(|c| c.is_dir));
    }

    #[cfg(unix)]
    #[test]
    fn test_enumerate_listing_keeps_everything_but_link_name() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir(root.join("v1")).unwrap();
        std::fs::write(root.join("notes.txt"), "x").unwrap();
        std::os::unix::fs::symlink(root.join("v1"), root.join("alias")).unwrap();
        std::os::unix::fs::symlink(root.join("v1"), root.join("current")).unwrap();

        let mut set = enumerate(root, CandidateRule::Listing, OsStr::new("current")).unwrap();
        order(&mut set, SortKey::Name).unwrap();
        assert_eq!(names(&set), ["alias", "notes.txt", "v1"]);
        assert!(!set[0].is_dir, "nested links are not directories");
    }

    #[cfg(unix)]
    #[test]
    fn test_list_locates_current_target() {
        let temp = TempDir::new().unwrap();
        let releases = temp.path().join("releases");
        for name in ["a", "b", "c"] {
            std::fs::create_dir_all(releases.join(name)).unwrap();
        }
        let link = temp.path().join("current");
        std::os::unix::fs::symlink(releases.join("b"), &link).unwrap();

        let listing = list(&link, SortKey::Name, CandidateRule::Subdirectories).unwrap();
        assert_eq!(listing.current, 1);
        assert_eq!(listing.current_candidate().display_name(), "b");
        assert_eq!(listing.names(), "a, b, c");
        assert_eq!(listing.last_index(), 2);
        assert_eq!(listing.root, std::fs::canonicalize(&releases).unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_list_by_creation_uses_filesystem_timestamps() {
        let temp = TempDir::new().unwrap();
        let releases = temp.path().join("releases");
        // Created in reverse name order so creation and name sorts disagree
        std::fs::create_dir_all(releases.join("b")).unwrap();
        std::thread::sleep(std::time::Duration::from_millis(50));
        std::fs::create_dir_all(releases.join("a")).unwrap();
        let link = temp.path().join("current");
        std::os::unix::fs::symlink(releases.join("b"), &link).unwrap();

        let listing = list(&link, SortKey::Creation, CandidateRule::Subdirectories).unwrap();
        assert_eq!(listing.names(), "b, a");
        assert_eq!(listing.current, 0);
        assert!(listing.candidates.iter().all(|c| c.created.is_some()));

        let by_name = list(&link, SortKey::Name, CandidateRule::Subdirectories).unwrap();
        assert_eq!(by_name.names(), "a, b");
        assert_eq!(by_name.current, 1);
    }

    #[test]
    fn test_list_rejects_regular_file() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("current");
        std::fs::write(&file, "not a link").unwrap();

        let err = list(&file, SortKey::Name, CandidateRule::Subdirectories).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(err.to_string().contains("must be a valid symbolic link"));
    }

    #[test]
    fn test_list_rejects_missing_path() {
        let temp = TempDir::new().unwrap();
        let err = list(
            &temp.path().join("missing"),
            SortKey::Name,
            CandidateRule::Subdirectories,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[cfg(unix)]
    #[test]
    fn test_list_dangling_link_is_not_found() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("a")).unwrap();
        let link = temp.path().join("current");
        std::os::unix::fs::symlink(temp.path().join("deleted"), &link).unwrap();

        let err = list(&link, SortKey::Name, CandidateRule::Subdirectories).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn test_list_target_that_is_a_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("a")).unwrap();
        std::fs::write(temp.path().join("file"), "x").unwrap();
        let link = temp.path().join("current");
        std::os::unix::fs::symlink(temp.path().join("file"), &link).unwrap();

        let err = list(&link, SortKey::Name, CandidateRule::Subdirectories).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        // The listing rule admits files, so the same link is locatable there
        let listing = list(&link, SortKey::Name, CandidateRule::Listing).unwrap();
        assert_eq!(listing.current_candidate().display_name(), "file");
    }
}
