//! Run-scoped variables and `${NAME}` expansion
//!
//! An [`EnvVars`] is built fresh for each replication run and handed to every
//! operation by reference. It is never mutated while a run is in progress.

use std::collections::BTreeMap;

/// Mapping from variable name to value for a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVars {
    vars: BTreeMap<String, String>,
}

impl EnvVars {
    /// Create an empty variable map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment.
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect()
    }

    /// Set a variable, returning the previous value if any.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.vars.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Overlay `other` on top of `self`; `other` wins on conflicts.
    pub fn overlay(&mut self, other: &EnvVars) {
        for (name, value) in &other.vars {
            self.vars.insert(name.clone(), value.clone());
        }
    }

    /// Expand every `${NAME}` whose `NAME` is defined.
    ///
    /// - Undefined references are kept literally: `${UNSET}` stays `${UNSET}`.
    /// - A defined name expands to its value, even when that value is empty.
    /// - Values are inserted as-is and never expanded again.
    /// - An unterminated `${` is kept literally, as is the rest of the text.
    /// - In a nested form such as `${A${B}}` the outer reference is malformed
    ///   and kept, while the inner `${B}` is expanded.
    ///
    /// ```
    /// use confclone::env::EnvVars;
    ///
    /// let mut env = EnvVars::new();
    /// env.insert("JOB", "nightly");
    /// assert_eq!(env.expand("build-${JOB}-${UNSET}"), "build-nightly-${UNSET}");
    /// ```
    pub fn expand(&self, text: &str) -> String {
        self.expand_inner(text, false)
    }

    /// Expand like [`EnvVars::expand`], doubling every `$` inside inserted
    /// values.
    ///
    /// The result is a replacement template for [`regex::Captures::expand`]:
    /// only `$` references written in `text` itself can name capture groups,
    /// while a value such as `cost $5` comes out literally.
    ///
    /// ```
    /// use confclone::env::EnvVars;
    ///
    /// let mut env = EnvVars::new();
    /// env.insert("PRICE", "$5");
    /// assert_eq!(env.expand_replacement("$1 costs ${PRICE}"), "$1 costs $$5");
    /// ```
    pub fn expand_replacement(&self, text: &str) -> String {
        self.expand_inner(text, true)
    }

    fn expand_inner(&self, text: &str, double_dollars: bool) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];

            let Some(end) = after.find('}') else {
                // Unterminated reference: everything left is literal.
                out.push_str(&rest[start..]);
                return out;
            };

            let name = &after[..end];
            if name.contains('{') {
                // Malformed outer reference; rescan from just after its `${`.
                out.push_str("${");
                rest = after;
                continue;
            }

            match self.vars.get(name) {
                Some(value) if double_dollars => out.push_str(&value.replace('$', "$$")),
                Some(value) => out.push_str(value),
                None => out.push_str(&rest[start..start + 2 + end + 1]),
            }
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        out
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvVars {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Neutralize `{` and `$` so unexpanded text compiles as a regex.
///
/// Each `{` and `$` is prefixed with a backslash. No other metacharacter is
/// touched: an unexpanded from-pattern is still a live regular expression, it
/// just cannot form a `{n,m}` repetition or an end anchor out of a literal
/// `${NAME}`.
///
/// ```
/// use confclone::env::escape_for_literal_match;
///
/// assert_eq!(escape_for_literal_match("a${b}c"), r"a\$\{b}c");
/// ```
pub fn escape_for_literal_match(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    for ch in text.chars() {
        if ch == '{' || ch == '$' {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
