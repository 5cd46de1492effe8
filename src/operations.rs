//! Document edit operations
//!
//! Every operation implements the same contract: take a [`Document`], the run's
//! [`EnvVars`] and a [`LogSink`], and either hand back the (edited) document or
//! fail. The set of operations is closed; [`Operation`] dispatches with a
//! `match`.
//!
//! - **replace**: regex substitution over every text node.
//! - **enable** / **disable**: flip the top-level `disabled` flag.

use std::fmt;

use log::debug;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::env::{escape_for_literal_match, EnvVars};
use crate::error::{Error, Result};
use crate::logging::LogSink;

/// Replace operator configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceOp {
    /// Regular expression matched against text nodes.
    #[serde(default)]
    pub from: Option<String>,
    /// Expand `${NAME}` references in `from` before compiling it.
    #[serde(default, rename = "expand-from")]
    pub expand_from: bool,
    /// Replacement text. Absent means the empty string.
    #[serde(default)]
    pub to: Option<String>,
    /// Expand `${NAME}` references in `to`; also enables `$1`-style group references.
    #[serde(default, rename = "expand-to")]
    pub expand_to: bool,
}

/// Enable/disable operator configuration (no parameters)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOp {}

/// All supported document operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operation {
    /// Substitute regex matches inside text nodes.
    Replace { replace: ReplaceOp },
    /// Set the top-level `disabled` flag to `false`.
    Enable { enable: ToggleOp },
    /// Set the top-level `disabled` flag to `true`.
    Disable { disable: ToggleOp },
}

impl Operation {
    pub fn replace(from: &str, expand_from: bool, to: &str, expand_to: bool) -> Self {
        Operation::Replace {
            replace: ReplaceOp {
                from: Some(from.to_string()),
                expand_from,
                to: Some(to.to_string()),
                expand_to,
            },
        }
    }

    pub fn enable() -> Self {
        Operation::Enable {
            enable: ToggleOp {},
        }
    }

    pub fn disable() -> Self {
        Operation::Disable {
            disable: ToggleOp {},
        }
    }

    /// Apply this operation to `doc`.
    pub fn perform(&self, doc: Document, env: &EnvVars, log: &mut dyn LogSink) -> Result<Document> {
        match self {
            Operation::Replace { replace } => replace.perform(doc, env, log),
            Operation::Enable { .. } => set_disabled_flag(doc, false, log),
            Operation::Disable { .. } => set_disabled_flag(doc, true, log),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Replace { replace } => write!(
                f,
                "replace {:?} -> {:?}",
                replace.from.as_deref().unwrap_or(""),
                replace.to.as_deref().unwrap_or("")
            ),
            Operation::Enable { .. } => f.write_str("enable"),
            Operation::Disable { .. } => f.write_str("disable"),
        }
    }
}

impl ReplaceOp {
    /// The from-pattern as it will be compiled for this run.
    pub fn effective_from(&self, env: &EnvVars) -> String {
        let from = self.from.as_deref().unwrap_or("");
        if self.expand_from {
            env.expand(from)
        } else {
            escape_for_literal_match(from)
        }
    }

    /// The to-text as it will be inserted for this run.
    pub fn effective_to(&self, env: &EnvVars) -> String {
        let to = self.to.as_deref().unwrap_or("");
        if self.expand_to {
            env.expand(to)
        } else {
            to.to_string()
        }
    }

    /// Compile the effective from-pattern.
    ///
    /// Rejects a pattern that is blank, that expands to nothing, or that can
    /// only ever match empty text (such as `^` or `\b`).
    pub fn compile(&self, env: &EnvVars) -> Result<Regex> {
        if self.from.as_deref().unwrap_or("").trim().is_empty() {
            return Err(Error::EmptyPattern {
                message: "from pattern is empty".to_string(),
            });
        }

        let pattern = self.effective_from(env);
        let regex = Regex::new(&pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;

        if pattern.is_empty() {
            return Err(Error::EmptyPattern {
                message: "from pattern became empty after expansion".to_string(),
            });
        }
        if matches_only_empty(&pattern) {
            return Err(Error::EmptyPattern {
                message: format!("from pattern {:?} can only match empty text", pattern),
            });
        }

        Ok(regex)
    }

    pub fn perform(&self, mut doc: Document, env: &EnvVars, log: &mut dyn LogSink) -> Result<Document> {
        let regex = self.compile(env)?;
        let to = self.to.as_deref().unwrap_or("");
        let replacement = if self.expand_to {
            let template = env.expand_replacement(to);
            check_group_references(&regex, &template)?;
            template
        } else {
            to.to_string()
        };

        log.line(&format!(
            "Replacing with regex: {} -> {}",
            regex.as_str(),
            self.effective_to(env)
        ));

        let changed = substitute(&mut doc, &regex, &replacement, self.expand_to)?;
        debug!("{} text node(s) changed by {}", changed, regex.as_str());
        Ok(doc)
    }
}

/// Rewrite every text node that `regex` matches, replacing all matches.
///
/// Returns the number of nodes changed. Nodes without a match are not touched.
/// With `expand` set, `replacement` is a template whose `$1`, `$name` and
/// `${name}` references name capture groups and `$$` is a literal `$`;
/// otherwise it is inserted literally.
pub fn substitute(doc: &mut Document, regex: &Regex, replacement: &str, expand: bool) -> Result<usize> {
    let mut changed = 0;
    for node in doc.text_nodes() {
        let Some(value) = doc.text(node) else {
            continue;
        };
        if !regex.is_match(value) {
            continue;
        }
        let new_value = if expand {
            regex.replace_all(value, replacement).into_owned()
        } else {
            regex.replace_all(value, NoExpand(replacement)).into_owned()
        };
        doc.set_text(node, new_value)?;
        changed += 1;
    }
    Ok(changed)
}

/// Whether every match of `pattern` is necessarily empty.
fn matches_only_empty(pattern: &str) -> bool {
    regex_syntax::Parser::new()
        .parse(pattern)
        .is_ok_and(|hir| hir.properties().maximum_len() == Some(0))
}

/// Fail when a group reference in `template` names no group of `regex`.
///
/// References are read the way [`regex::Captures::expand`] reads them: `$$`
/// is a literal `$`, `${name}` runs to the closing brace, and a bare `$name`
/// takes the longest run of letters, digits and `_` (so `$1_old` names the
/// group `1_old`). A `$` that starts no reference is literal. Without this
/// check a missing group would silently expand to the empty string.
fn check_group_references(regex: &Regex, template: &str) -> Result<()> {
    let mut rest = template;
    while let Some(start) = rest.find('$') {
        let after = &rest[start + 1..];
        if let Some(escaped) = after.strip_prefix('$') {
            rest = escaped;
            continue;
        }

        let (group, remainder) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], &braced[end + 1..]),
                None => break,
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], &after[end..])
        };
        if group.is_empty() && !after.starts_with('{') {
            rest = after;
            continue;
        }

        let known = match group.parse::<usize>() {
            Ok(index) => index < regex.captures_len(),
            Err(_) => regex.capture_names().flatten().any(|name| name == group),
        };
        if !known {
            return Err(Error::InvalidReplacement {
                replacement: template.to_string(),
                group: group.to_string(),
            });
        }
        rest = remainder;
    }
    Ok(())
}

/// Set the text of the document element's single `disabled` child.
fn set_disabled_flag(mut doc: Document, disabled: bool, log: &mut dyn LogSink) -> Result<Document> {
    let operation = if disabled { "disable" } else { "enable" };
    let nodes = doc.top_level_elements("disabled")?;
    let [node] = nodes.as_slice() else {
        return Err(Error::Operation {
            operation: operation.to_string(),
            message: format!(
                "expected exactly one top-level <disabled> element, found {}",
                nodes.len()
            ),
        });
    };

    let value = if disabled { "true" } else { "false" };
    doc.set_element_text(*node, value)?;
    log.line(&format!("Set disabled to {}", value));
    Ok(doc)
}
