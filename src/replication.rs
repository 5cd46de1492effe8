//! Replication engine
//!
//! The [`Replicator`] copies a primary document and any number of filesets
//! from a source root to a destination root, editing each through its
//! [`Pipeline`]. It is the recovery boundary of the crate: every error below it
//! is written to the run's [`LogSink`] and turned into a `false` outcome, so a
//! run always finishes with a [`RunReport`].
//!
//! Failure policy:
//! - a failing primary copy ends the run before any fileset is attempted;
//! - inside a fileset every matched file is attempted, even after a failure;
//! - every fileset is attempted, even after a failing one.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::encoding::Encoding;
use crate::env::EnvVars;
use crate::error::{Error, Result};
use crate::fileset::FilesetSpec;
use crate::filesystem::FileTree;
use crate::logging::LogSink;
use crate::pipeline::Pipeline;

fn default_primary_file() -> PathBuf {
    PathBuf::from("config.xml")
}

fn default_true() -> bool {
    true
}

/// How the primary document is located and written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimarySpec {
    /// Path of the document, relative to both roots.
    #[serde(default = "default_primary_file")]
    pub file: PathBuf,
    #[serde(default)]
    pub encoding: Encoding,
    /// Replace an existing destination document.
    #[serde(default)]
    pub overwrite: bool,
    /// Indent the serialized document.
    #[serde(default = "default_true")]
    pub indent: bool,
}

impl Default for PrimarySpec {
    fn default() -> Self {
        Self {
            file: default_primary_file(),
            encoding: Encoding::default(),
            overwrite: false,
            indent: true,
        }
    }
}

/// Everything one replication run needs, with both roots resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicationPlan {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub primary: PrimarySpec,
    pub operations: Pipeline,
    pub filesets: Vec<FilesetSpec>,
}

impl ReplicationPlan {
    pub fn new<S: Into<PathBuf>, D: Into<PathBuf>>(source: S, destination: D) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            primary: PrimarySpec::default(),
            operations: Pipeline::default(),
            filesets: Vec::new(),
        }
    }

    pub fn with_operations(mut self, operations: Pipeline) -> Self {
        self.operations = operations;
        self
    }

    pub fn with_fileset(mut self, fileset: FilesetSpec) -> Self {
        self.filesets.push(fileset);
        self
    }
}

/// Outcome of one replication run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Whether the primary document was copied.
    pub primary: bool,
    /// One entry per declared fileset, in declaration order. Empty when the
    /// primary copy failed.
    pub filesets: Vec<bool>,
}

impl RunReport {
    /// Whether the primary document and every fileset succeeded.
    pub fn success(&self) -> bool {
        self.primary && self.filesets.iter().all(|ok| *ok)
    }
}

/// Copies documents and filesets through a [`FileTree`].
pub struct Replicator<'a, F: FileTree + ?Sized> {
    fs: &'a mut F,
    env: &'a EnvVars,
    log: &'a mut dyn LogSink,
}

impl<'a, F: FileTree + ?Sized> Replicator<'a, F> {
    pub fn new(fs: &'a mut F, env: &'a EnvVars, log: &'a mut dyn LogSink) -> Self {
        Self { fs, env, log }
    }

    /// Run a whole plan: the primary document first, then every fileset.
    pub fn run(&mut self, plan: &ReplicationPlan) -> RunReport {
        let mut report = RunReport {
            primary: self.replicate_primary(plan),
            filesets: Vec::with_capacity(plan.filesets.len()),
        };
        if !report.primary {
            warn!("primary copy failed; skipping {} fileset(s)", plan.filesets.len());
            return report;
        }

        for (index, fileset) in plan.filesets.iter().enumerate() {
            debug!("fileset {}/{}", index + 1, plan.filesets.len());
            let ok = self.copy_fileset(fileset, &plan.source, &plan.destination);
            report.filesets.push(ok);
        }
        report
    }

    /// Parse, edit and serialize the primary document.
    ///
    /// The document is always parsed, so an empty pipeline still rejects
    /// malformed input. Failures are written to the log before being returned.
    pub fn copy_primary(
        &mut self,
        src: &[u8],
        encoding: Encoding,
        pipeline: &Pipeline,
        indent: bool,
    ) -> Result<Vec<u8>> {
        pipeline
            .transform(src, encoding, indent, self.env, &mut *self.log)
            .map_err(|e| {
                self.log.line(&format!("Error occurred in document operation: {}", e));
                e
            })
    }

    fn replicate_primary(&mut self, plan: &ReplicationPlan) -> bool {
        let src = plan.source.join(&plan.primary.file);
        let dst = plan.destination.join(&plan.primary.file);

        match self.try_replicate_primary(plan, &src, &dst) {
            Ok(()) => true,
            Err(e) => {
                self.log.line(&format!("Failed to copy {}: {}", src.display(), e));
                false
            }
        }
    }

    fn try_replicate_primary(&mut self, plan: &ReplicationPlan, src: &Path, dst: &Path) -> Result<()> {
        if self.fs.exists(dst) && !plan.primary.overwrite {
            return Err(Error::DestinationExists {
                path: dst.to_path_buf(),
            });
        }

        let bytes = self.fs.read_file(src)?;
        let output = self.copy_primary(
            &bytes,
            plan.primary.encoding,
            &plan.operations,
            plan.primary.indent,
        )?;
        self.fs.write_file(dst, &output)?;
        self.log
            .line(&format!("Copied {} to {}", src.display(), dst.display()));
        Ok(())
    }

    /// Copy one file of a fileset.
    ///
    /// An existing destination is left alone when `overwrite` is false and
    /// counts as success. With an empty pipeline the bytes are copied verbatim.
    pub fn copy_file(
        &mut self,
        dst: &Path,
        src: &Path,
        overwrite: bool,
        pipeline: &Pipeline,
        encoding: Encoding,
    ) -> bool {
        if self.fs.exists(dst) {
            if !overwrite {
                self.log
                    .line(&format!("{} already exists; skipped", dst.display()));
                return true;
            }
            self.log.line(&format!("Overwriting {}", dst.display()));
        }

        match self.try_copy_file(dst, src, pipeline, encoding) {
            Ok(()) => {
                self.log
                    .line(&format!("Copied {} to {}", src.display(), dst.display()));
                true
            }
            Err(e) => {
                self.log
                    .line(&format!("Failed to copy {}: {}", src.display(), e));
                false
            }
        }
    }

    fn try_copy_file(&mut self, dst: &Path, src: &Path, pipeline: &Pipeline, encoding: Encoding) -> Result<()> {
        let bytes = self.fs.read_file(src)?;
        let output = if pipeline.is_empty() {
            bytes
        } else {
            pipeline.transform(&bytes, encoding, true, self.env, &mut *self.log)?
        };
        self.fs.write_file(dst, &output)
    }

    /// Copy every file a fileset selects; true only if all of them succeeded.
    pub fn copy_fileset(&mut self, spec: &FilesetSpec, src_root: &Path, dst_root: &Path) -> bool {
        if spec.includes_blank() {
            let e = Error::MatchConfiguration {
                message: "fileset includes are blank".to_string(),
            };
            self.log.line(&e.to_string());
            return false;
        }

        let matched = match spec
            .resolver()
            .and_then(|resolver| resolver.resolve(&*self.fs, src_root))
        {
            Ok(matched) => matched,
            Err(e) => {
                self.log.line(&format!("Failed to resolve fileset: {}", e));
                return false;
            }
        };
        if matched.is_empty() {
            self.log.line(&format!(
                "No files matched {} in {}",
                spec.includes.as_deref().unwrap_or(""),
                src_root.display()
            ));
        }

        let mut ok = true;
        for relative in &matched {
            let src = src_root.join(relative);
            let dst = dst_root.join(relative);
            ok &= self.copy_file(&dst, &src, spec.overwrite, &spec.operations, spec.encoding);
        }
        ok
    }
}
