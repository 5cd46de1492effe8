//! # Error Handling
//!
//! This module defines the centralized error type for `confclone`. It uses the
//! `thiserror` library to create an `Error` enum that covers every failure a
//! replication run can hit, with messages that are written verbatim into the
//! run log.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failures. Variants group into four families:
//!   - parse failures: a malformed document (`XmlParse`), a from-pattern that
//!     does not compile (`InvalidPattern`) or a to-text that names a capture
//!     group the pattern does not have (`InvalidReplacement`);
//!   - empty patterns (`EmptyPattern`), before or after expansion;
//!   - I/O failures (`FileIo`, `Io`, `Filesystem`);
//!   - fileset configuration failures (`MatchConfiguration`, `Glob`).
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! None of these errors cross the replication boundary: the
//! [`Replicator`](crate::replication::Replicator) renders them into the log
//! sink and reports a plain pass/fail.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for confclone operations
#[derive(Error, Debug)]
pub enum Error {
    /// The document could not be parsed as XML.
    #[error("XML parse error: {message}")]
    XmlParse { message: String },

    /// The document tree could not be serialized back to text.
    #[error("XML serialization error: {message}")]
    XmlSerialize { message: String },

    /// The from-pattern was empty, either as configured or after expansion.
    #[error("Empty pattern: {message}")]
    EmptyPattern { message: String },

    /// The effective from-pattern is not a valid regular expression.
    #[error("Error on regular expression {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The effective to-text references a capture group the pattern lacks.
    #[error("Invalid replacement {replacement:?}: no capture group named {group:?}")]
    InvalidReplacement { replacement: String, group: String },

    /// A document operation could not be applied.
    #[error("Operation error: {operation} - {message}")]
    Operation { operation: String, message: String },

    /// A glob pattern error, wrapped from `glob::PatternError`.
    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),

    /// The fileset declares no include patterns.
    #[error("Fileset configuration error: {message}")]
    MatchConfiguration { message: String },

    /// Reading or writing a specific file failed.
    #[error("I/O error on {}: {source}", path.display())]
    FileIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A file tree operation failed (walking, missing file in memory).
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// Bytes could not be decoded from, or text encoded into, an encoding.
    #[error("Encoding error: {message}")]
    Encoding { message: String },

    /// The primary destination exists and overwriting was not allowed.
    #[error("Destination already exists: {}", path.display())]
    DestinationExists { path: PathBuf },

    /// The replication plan file is invalid.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
