//! Glob pattern helpers for fileset matching
//!
//! Patterns follow the Ant conventions used by fileset declarations: `*`
//! stays inside one path segment, `**` spans any number of segments, matching
//! is case-sensitive and always relative to the fileset root.

use std::path::Path;

use glob::{MatchOptions, Pattern};

use crate::error::{Error, Result};

/// Options shared by every fileset match.
pub const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Version-control and editor files skipped unless default excludes are off.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "**/*~",
    "**/#*#",
    "**/.#*",
    "**/%*%",
    "**/._*",
    "**/CVS/**",
    "**/.cvsignore",
    "**/SCCS/**",
    "**/vssver.scc",
    "**/.svn/**",
    "**/.DS_Store",
    "**/.git/**",
    "**/.gitattributes",
    "**/.gitignore",
    "**/.gitmodules",
    "**/.hg/**",
    "**/.hgignore",
    "**/.hgsub",
    "**/.hgsubstate",
    "**/.hgtags",
    "**/.bzr/**",
    "**/.bzrignore",
];

/// Split a comma-separated pattern list.
///
/// Each token is trimmed and empty tokens are dropped, so `","` yields an
/// empty list.
pub fn split_patterns(spec: &str) -> Vec<String> {
    spec.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(normalize_pattern)
        .collect()
}

/// Normalize a pattern to `/` separators; a trailing `/` means "everything below".
pub fn normalize_pattern(pattern: &str) -> String {
    let mut normalized = pattern.replace('\\', "/");
    if normalized.ends_with('/') {
        normalized.push_str("**");
    }
    normalized
}

/// Compile a glob pattern.
pub fn compile_glob(pattern: &str) -> Result<Pattern> {
    Pattern::new(pattern).map_err(Error::Glob)
}

/// Match a relative path against a glob pattern
pub fn glob_match(pattern: &str, path: &str) -> Result<bool> {
    let pattern = compile_glob(pattern)?;
    Ok(pattern.matches_with(path, MATCH_OPTIONS))
}

/// Render a relative path with `/` separators, the form patterns match against.
pub fn to_match_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
