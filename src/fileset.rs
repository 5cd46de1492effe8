//! Filesets: auxiliary files selected by glob patterns
//!
//! A [`FilesetSpec`] declares which files below the source root are copied
//! alongside the primary document and which pipeline edits them. The
//! [`FileSetResolver`] turns its comma-separated include/exclude lists into a
//! [`MatchResult`].
//!
//! ## Include list quirk
//!
//! An include list that is absent or blank selects **nothing**. An include list
//! that is present but splits into no patterns at all (for example `","`)
//! selects **everything**, because an empty pattern list means "no
//! restriction" to the matcher. Existing plans rely on this, so it is kept.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glob::Pattern;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::encoding::Encoding;
use crate::error::Result;
use crate::filesystem::FileTree;
use crate::path::{compile_glob, split_patterns, to_match_path, DEFAULT_EXCLUDES, MATCH_OPTIONS};
use crate::pipeline::Pipeline;

/// Relative paths selected by a fileset, deduplicated and sorted.
pub type MatchResult = BTreeSet<PathBuf>;

fn default_true() -> bool {
    true
}

/// One declared group of auxiliary files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesetSpec {
    /// Comma-separated include patterns.
    #[serde(default)]
    pub includes: Option<String>,
    /// Comma-separated exclude patterns.
    #[serde(default)]
    pub excludes: Option<String>,
    /// Replace destination files that already exist.
    #[serde(default)]
    pub overwrite: bool,
    /// Skip version-control and editor files.
    #[serde(default = "default_true", rename = "default-excludes")]
    pub default_excludes: bool,
    /// Encoding of the matched files when the pipeline parses them.
    #[serde(default)]
    pub encoding: Encoding,
    /// Edits applied to every matched file.
    #[serde(default)]
    pub operations: Pipeline,
}

impl FilesetSpec {
    pub fn new(
        includes: Option<&str>,
        excludes: Option<&str>,
        overwrite: bool,
        operations: Pipeline,
    ) -> Self {
        Self {
            includes: includes.map(str::to_string),
            excludes: excludes.map(str::to_string),
            overwrite,
            default_excludes: true,
            encoding: Encoding::default(),
            operations,
        }
    }

    /// Whether the include list is absent or whitespace only.
    pub fn includes_blank(&self) -> bool {
        self.includes
            .as_deref()
            .is_none_or(|includes| includes.trim().is_empty())
    }

    /// Build the resolver for this fileset.
    pub fn resolver(&self) -> Result<FileSetResolver> {
        Ok(FileSetResolver::new(self.includes.as_deref(), self.excludes.as_deref())?
            .with_default_excludes(self.default_excludes))
    }
}

#[derive(Debug, Clone)]
enum Selection {
    /// No include list was declared.
    Nothing,
    /// The include list split into zero patterns.
    Everything,
    Patterns(Vec<Pattern>),
}

/// Compiled include/exclude patterns.
#[derive(Debug, Clone)]
pub struct FileSetResolver {
    includes: Selection,
    excludes: Vec<Pattern>,
    default_excludes: Vec<Pattern>,
}

impl FileSetResolver {
    /// Compile comma-separated include and exclude lists.
    ///
    /// Default excludes are off; see [`FileSetResolver::with_default_excludes`].
    pub fn new(includes: Option<&str>, excludes: Option<&str>) -> Result<Self> {
        let includes = match includes.map(str::trim) {
            None | Some("") => Selection::Nothing,
            Some(spec) => {
                let patterns = compile_all(&split_patterns(spec))?;
                if patterns.is_empty() {
                    Selection::Everything
                } else {
                    Selection::Patterns(patterns)
                }
            }
        };
        let excludes = match excludes {
            Some(spec) => compile_all(&split_patterns(spec))?,
            None => Vec::new(),
        };

        Ok(Self {
            includes,
            excludes,
            default_excludes: Vec::new(),
        })
    }

    /// Also exclude version-control and editor files.
    pub fn with_default_excludes(mut self, enabled: bool) -> Self {
        self.default_excludes = if enabled {
            DEFAULT_EXCLUDES
                .iter()
                .filter_map(|pattern| Pattern::new(pattern).ok())
                .collect()
        } else {
            Vec::new()
        };
        self
    }

    /// Whether a relative, `/`-separated path is selected.
    pub fn matches(&self, relative: &str) -> bool {
        let included = match &self.includes {
            Selection::Nothing => false,
            Selection::Everything => true,
            Selection::Patterns(patterns) => any_match(patterns, relative),
        };
        included
            && !any_match(&self.excludes, relative)
            && !any_match(&self.default_excludes, relative)
    }

    /// Select files below `root`.
    pub fn resolve<F: FileTree + ?Sized>(&self, fs: &F, root: &Path) -> Result<MatchResult> {
        if matches!(self.includes, Selection::Nothing) {
            debug!("no include patterns declared; selecting nothing");
            return Ok(MatchResult::new());
        }

        let matched: MatchResult = fs
            .list_files(root)?
            .into_iter()
            .filter(|relative| self.matches(&to_match_path(relative)))
            .collect();
        debug!("{} file(s) matched below {}", matched.len(), root.display());
        Ok(matched)
    }
}

/// Resolve comma-separated include/exclude lists below `root`.
///
/// Default excludes are not applied.
pub fn resolve<F: FileTree + ?Sized>(
    fs: &F,
    root: &Path,
    includes: Option<&str>,
    excludes: Option<&str>,
) -> Result<MatchResult> {
    FileSetResolver::new(includes, excludes)?.resolve(fs, root)
}

fn compile_all(patterns: &[String]) -> Result<Vec<Pattern>> {
    patterns.iter().map(|pattern| compile_glob(pattern)).collect()
}

fn any_match(patterns: &[Pattern], relative: &str) -> bool {
    patterns
        .iter()
        .any(|pattern| pattern.matches_with(relative, MATCH_OPTIONS))
}
