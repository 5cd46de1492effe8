//! # Replication Plan Files
//!
//! A replication plan is a YAML document naming the source and destination
//! roots, the primary document, the variables available to `${NAME}`
//! expansion, the primary pipeline and any filesets:
//!
//! ```yaml
//! source: /srv/bundles/template
//! destination: /srv/bundles/copy
//! primary:
//!   file: config.xml
//!   overwrite: false
//! vars:
//!   NAME: copy
//! operations:
//!   - replace: { from: template, to: "${NAME}", expand-to: true }
//!   - disable: {}
//! filesets:
//!   - includes: "**/*.xml"
//!     excludes: "builds/**"
//!     overwrite: true
//! ```
//!
//! [`ReplicationConfig::validate`] checks a plan statically, without touching
//! any file, and reports [`Finding`]s.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::env::EnvVars;
use crate::error::{Error, Result};
use crate::fileset::FilesetSpec;
use crate::operations::Operation;
use crate::path::{compile_glob, split_patterns};
use crate::pipeline::Pipeline;
use crate::replication::{PrimarySpec, ReplicationPlan};

/// A parsed replication plan file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReplicationConfig {
    #[serde(default)]
    pub source: Option<PathBuf>,
    #[serde(default)]
    pub destination: Option<PathBuf>,
    #[serde(default)]
    pub primary: PrimarySpec,
    /// Variables overlaid on the process environment.
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
    /// Pipeline for the primary document.
    #[serde(default)]
    pub operations: Pipeline,
    #[serde(default)]
    pub filesets: Vec<FilesetSpec>,
}

/// Parse a replication plan from YAML text.
pub fn parse(yaml_content: &str) -> Result<ReplicationConfig> {
    if yaml_content.trim().is_empty() {
        return Err(Error::ConfigParse {
            message: "configuration is empty".to_string(),
            hint: Some("a plan needs at least `source:` and `destination:`".to_string()),
        });
    }
    Ok(serde_yaml::from_str(yaml_content)?)
}

/// Read and parse a replication plan file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<ReplicationConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| Error::FileIo {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&content)
}

impl ReplicationConfig {
    /// Resolve the roots, preferring the given overrides, into a runnable plan.
    pub fn into_plan(self, source: Option<PathBuf>, destination: Option<PathBuf>) -> Result<ReplicationPlan> {
        let source = source.or(self.source).ok_or_else(|| Error::ConfigParse {
            message: "no source root".to_string(),
            hint: Some("set `source:` in the plan or pass --source".to_string()),
        })?;
        let destination = destination
            .or(self.destination)
            .ok_or_else(|| Error::ConfigParse {
                message: "no destination root".to_string(),
                hint: Some("set `destination:` in the plan or pass --destination".to_string()),
            })?;

        Ok(ReplicationPlan {
            source,
            destination,
            primary: self.primary,
            operations: self.operations,
            filesets: self.filesets,
        })
    }

    /// Build the variables for one run.
    ///
    /// Later layers win: the process environment (when `inherit` is set), then
    /// the plan's `vars:`, then `overrides`.
    pub fn build_env(&self, inherit: bool, overrides: &[(String, String)]) -> EnvVars {
        let mut env = if inherit {
            EnvVars::from_process()
        } else {
            EnvVars::new()
        };
        let vars: EnvVars = self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        env.overlay(&vars);
        for (name, value) in overrides {
            env.insert(name.as_str(), value.as_str());
        }
        env
    }

    /// Check the plan for mistakes that would fail or misbehave at run time.
    pub fn validate(&self) -> Vec<Finding> {
        let mut findings = Vec::new();
        check_pipeline(&self.operations, "operations", &mut findings);

        for (index, fileset) in self.filesets.iter().enumerate() {
            let location = format!("filesets[{}]", index);
            if fileset.includes_blank() {
                findings.push(Finding::error(
                    format!("{}.includes", location),
                    "includes are blank; the fileset would fail",
                ));
            }
            for (field, spec) in [("includes", &fileset.includes), ("excludes", &fileset.excludes)] {
                let Some(spec) = spec else {
                    continue;
                };
                for pattern in split_patterns(spec) {
                    if let Err(e) = compile_glob(&pattern) {
                        findings.push(Finding::error(format!("{}.{}", location, field), e.to_string()));
                    }
                }
            }
            check_pipeline(&fileset.operations, &format!("{}.operations", location), &mut findings);
        }
        findings
    }
}

fn check_pipeline(pipeline: &Pipeline, location: &str, findings: &mut Vec<Finding>) {
    for (index, operation) in pipeline.operations().iter().enumerate() {
        let Operation::Replace { replace } = operation else {
            continue;
        };
        let location = format!("{}[{}]", location, index);
        let from = replace.from.as_deref().unwrap_or("");

        if from.trim().is_empty() {
            findings.push(Finding::error(location, "from pattern is empty"));
            continue;
        }
        if from.trim() != from {
            findings.push(Finding::warning(
                location.clone(),
                "from pattern has surrounding whitespace",
            ));
        }
        // Expanded patterns depend on run-time values; only check fixed ones.
        if !replace.expand_from {
            if let Err(e) = replace.compile(&EnvVars::new()) {
                findings.push(Finding::warning(location, e.to_string()));
            }
        }
    }
}

/// How serious a validation finding is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// One problem found by [`ReplicationConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    /// Where in the plan, e.g. `filesets[0].operations[1]`.
    pub location: String,
    pub message: String,
}

impl Finding {
    pub fn error(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            location: location.into(),
            message: message.into(),
        }
    }

    pub fn warning(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            location: location.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(f, "{}: {}: {}", severity, self.location, self.message)
    }
}
