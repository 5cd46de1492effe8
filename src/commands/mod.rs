//! # CLI Command Implementations
//!
//! One file per subcommand of the `confclone` tool. Each defines an `Args`
//! struct derived with `clap` and an `execute` function that calls into the
//! `confclone` library.

pub mod copy;
pub mod validate;
