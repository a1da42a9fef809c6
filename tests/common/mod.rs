//! Shared test utilities for the CLI end-to-end tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = ReleaseFixture::new()
//!         .with_releases(&["v1", "v2"])
//!         .with_link("v1");
//!     fixture.command().args(["rotate", "--link", "current"]).assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    pub use super::ReleaseFixture;
}

/// Name of the link every fixture creates.
pub const LINK: &str = "current";

/// A temporary directory holding `releases/<name>` directories and a
/// `current` link pointing at one of them.
pub struct ReleaseFixture {
    temp_dir: assert_fs::TempDir,
}

impl ReleaseFixture {
    /// Create a new fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add one release directory per name, each holding a `VERSION` file.
    pub fn with_releases(self, names: &[&str]) -> Self {
        for name in names {
            self.temp_dir
                .child("releases")
                .child(name)
                .child("VERSION")
                .write_str(name)
                .expect("Failed to write release");
        }
        self
    }

    /// Point the `current` link at `releases/<name>`.
    pub fn with_link(self, name: &str) -> Self {
        std::os::unix::fs::symlink(self.release(name), self.link()).expect("Failed to create link");
        self
    }

    /// Add a file with the given path and content.
    #[allow(dead_code)]
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of the `current` link.
    pub fn link(&self) -> PathBuf {
        self.path().join(LINK)
    }

    /// Canonical path of `releases/<name>`, as the CLI reports it.
    pub fn release(&self, name: &str) -> PathBuf {
        std::fs::canonicalize(self.path().join("releases"))
            .expect("releases directory missing")
            .join(name)
    }

    /// Where the `current` link points now.
    pub fn target(&self) -> PathBuf {
        std::fs::read_link(self.link()).expect("link missing")
    }

    /// Create a command running in this fixture's directory.
    ///
    /// Colors, inherited job files and backtraces are disabled so output is
    /// stable.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("rotate-symlink");
        cmd.current_dir(self.path())
            .env("NO_COLOR", "1")
            .env_remove("ROTATE_SYMLINK_CONFIG")
            .env_remove("RUST_LOG")
            .env_remove("RUST_BACKTRACE")
            .env_remove("RUST_LIB_BACKTRACE");
        cmd
    }
}

impl Default for ReleaseFixture {
    fn default() -> Self {
        Self::new()
    }
}
