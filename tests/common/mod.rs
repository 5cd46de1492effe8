//! Shared test utilities for integration and E2E tests.
//!
//! This module provides common fixtures, helper functions and plan snippets
//! to reduce duplication across test files.
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
//!     let fixture = TestFixture::new()
//!         .with_plan(plans::MINIMAL)
//!         .with_source_file("config.xml", xml::JOB);
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    #[allow(unused_imports)]
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::plans;
    #[allow(unused_imports)]
    pub use super::xml;
    pub use super::TestFixture;
}

/// Replication plan snippets. Roots are relative to the fixture directory.
#[allow(dead_code)]
pub mod plans {
    /// Copy the primary document without edits.
    pub const MINIMAL: &str = r#"
source: template
destination: copy
"#;

    /// Rename the job and disable it, plus copy every XML file.
    pub const RENAME_AND_DISABLE: &str = r#"
source: template
destination: copy
operations:
  - replace:
      from: "${FROM}"
      expand-from: true
      to: "${TO}"
      expand-to: true
  - disable: {}
filesets:
  - includes: "**/*.xml"
    excludes: "builds/**"
    operations:
      - replace: { from: "${FROM}", expand-from: true, to: "${TO}", expand-to: true }
vars:
  FROM: template
"#;

    /// A fileset without includes, which always fails.
    pub const BLANK_INCLUDES: &str = r#"
source: template
destination: copy
filesets:
  - excludes: "builds/**"
"#;

    /// Invalid YAML for error testing.
    pub const INVALID_YAML: &str = "source: [unclosed";
}

/// Document snippets.
#[allow(dead_code)]
pub mod xml {
    pub const JOB: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<project>
  <description>template job</description>
  <disabled>false</disabled>
  <builders>
    <shell>echo template</shell>
  </builders>
</project>
"#;

    pub const VIEW: &str = "<view><name>template view</name></view>";
}

/// A temporary directory holding a plan, a `template/` source root and a
/// `copy/` destination root.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_plan(plans::MINIMAL)
///     .with_source_file("config.xml", xml::JOB);
///
/// fixture.command("copy").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `confclone.yaml` with the given content.
    pub fn with_plan(self, content: &str) -> Self {
        self.temp_dir
            .child("confclone.yaml")
            .write_str(content)
            .expect("Failed to write plan file");
        self
    }

    /// Add a file below the source root.
    pub fn with_source_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child("template")
            .child(path)
            .write_str(content)
            .expect("Failed to write source file");
        self
    }

    /// Add a file below the destination root.
    #[allow(dead_code)]
    pub fn with_destination_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child("copy")
            .child(path)
            .write_str(content)
            .expect("Failed to write destination file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Get the path to the plan file.
    pub fn plan_path(&self) -> PathBuf {
        self.temp_dir.path().join("confclone.yaml")
    }

    /// Path below the source root.
    #[allow(dead_code)]
    pub fn source(&self, path: &str) -> PathBuf {
        self.temp_dir.path().join("template").join(path)
    }

    /// Path below the destination root.
    pub fn destination(&self, path: &str) -> PathBuf {
        self.temp_dir.path().join("copy").join(path)
    }

    /// Read a destination file as text.
    #[allow(dead_code)]
    pub fn read_destination(&self, path: &str) -> String {
        std::fs::read_to_string(self.destination(path)).expect("Failed to read destination file")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    /// Create a command for `subcommand`, run in this fixture's directory with
    /// its plan file.
    #[allow(dead_code)]
    pub fn command(&self, subcommand: &str) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("confclone");
        cmd.current_dir(self.path())
            .env_remove("CONFCLONE_CONFIG")
            .arg(subcommand)
            .arg("--config")
            .arg(self.plan_path());
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_plan() {
        let fixture = TestFixture::new().with_plan(plans::MINIMAL);
        assert!(fixture.plan_path().exists());
    }

    #[test]
    fn test_fixture_with_source_file() {
        let fixture = TestFixture::new().with_source_file("jobs/a.xml", xml::VIEW);
        assert!(fixture.source("jobs/a.xml").exists());
    }

    #[test]
    fn test_plans_are_valid_yaml() {
        for plan in [plans::MINIMAL, plans::RENAME_AND_DISABLE, plans::BLANK_INCLUDES] {
            serde_yaml::from_str::<serde_yaml::Value>(plan).expect("Plan should be valid YAML");
        }
    }

    #[test]
    fn test_invalid_yaml_is_actually_invalid() {
        let result = serde_yaml::from_str::<serde_yaml::Value>(plans::INVALID_YAML);
        assert!(result.is_err(), "INVALID_YAML should not parse");
    }
}
