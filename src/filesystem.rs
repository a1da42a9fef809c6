//! Filesystem mutations performed by a rotation
//!
//! Reads (link resolution, directory listing, metadata) go straight to
//! `std::fs`. The operations that change the tree go through the
//! [`Filesystem`] trait so a rotation can be run against an instrumented
//! implementation.

use std::io;
use std::path::Path;

/// Mutating filesystem operations used by the rotator
pub trait Filesystem {
    /// Remove the symbolic link itself, not its target.
    fn remove_link(&self, link: &Path) -> io::Result<()>;

    /// Create a symbolic link at `link` pointing to the directory `target`.
    fn create_link(&self, target: &Path, link: &Path) -> io::Result<()>;

    /// Recursively delete a directory.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Delete a single non-directory entry.
    fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// The host filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct RealFs;

impl Filesystem for RealFs {
    fn remove_link(&self, link: &Path) -> io::Result<()> {
        std::fs::remove_file(link)
    }

    #[cfg(unix)]
    fn create_link(&self, target: &Path, link: &Path) -> io::Result<()> {
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    fn create_link(&self, target: &Path, link: &Path) -> io::Result<()> {
        std::os::windows::fs::symlink_dir(target, link)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }
}

impl<F: Filesystem + ?Sized> Filesystem for &F {
    fn remove_link(&self, link: &Path) -> io::Result<()> {
        (**self).remove_link(link)
    }

    fn create_link(&self, target: &Path, link: &Path) -> io::Result<()> {
        (**self).create_link(target, link)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        (**self).remove_dir_all(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        (**self).remove_file(path)
    }
}
