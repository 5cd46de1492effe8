//! # confclone
//!
//! Copies an XML configuration bundle from a source directory to a destination
//! directory, editing the documents on the way. It is used by the `confclone`
//! command-line tool but works as a plain library as well.
//!
//! ## Quick Example
//!
//! ```
//! use confclone::env::EnvVars;
//! use confclone::filesystem::MemoryFS;
//! use confclone::operations::Operation;
//! use confclone::replication::{ReplicationPlan, Replicator};
//!
//! let mut fs = MemoryFS::new();
//! fs.add_file_string(
//!     "/src/config.xml",
//!     "<project><disabled>false</disabled><name>template</name></project>",
//! );
//!
//! let env: EnvVars = [("NAME", "copy")].into_iter().collect();
//! let plan = ReplicationPlan::new("/src", "/dst").with_operations(
//!     vec![
//!         Operation::replace("template", false, "${NAME}", true),
//!         Operation::disable(),
//!     ]
//!     .into(),
//! );
//!
//! let mut log: Vec<String> = Vec::new();
//! let report = Replicator::new(&mut fs, &env, &mut log).run(&plan);
//! assert!(report.success());
//! assert!(fs.get_string("/dst/config.xml").unwrap().contains("<name>copy</name>"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Documents (`document`, `encoding`)**: an XML tree parsed from bytes in a
//!   declared character encoding and serialized back the same way.
//! - **Operations (`operations`, `pipeline`)**: edits applied to a document,
//!   run in order and stopping at the first failure.
//! - **Variables (`env`)**: `${NAME}` expansion against a per-run map.
//! - **Filesets (`fileset`, `path`)**: auxiliary files selected by
//!   comma-separated glob lists and copied next to the primary document.
//! - **Replication (`replication`, `filesystem`)**: the engine tying it all
//!   together over a pluggable file tree.
//! - **Plans (`config`)**: the YAML file the command-line tool reads.

pub mod config;
pub mod document;
pub mod encoding;
pub mod env;
pub mod error;
pub mod fileset;
pub mod filesystem;
pub mod logging;
pub mod operations;
pub mod path;
pub mod pipeline;
pub mod replication;

#[cfg(test)]
mod env_proptest;
#[cfg(test)]
mod operations_proptest;
