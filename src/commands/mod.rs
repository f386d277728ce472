//! # CLI Command Implementations
//!
//! `update-vendor` has a single command, so there are no subcommands: the
//! top-level flags are the `sync` command's arguments.
//!
//! Each command module contains:
//! - An `Args` struct that defines the command's arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and drives the
//!   `update_vendor` library.

pub mod sync;
