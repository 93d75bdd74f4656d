//! The tsgen command-line host.
//!
//! Everything user-facing lives here: argument parsing, tsgen.json loading,
//! document splicing, the generation driver, the change watcher, and the
//! colored reporter. The engine crates stay host-agnostic; this crate is the
//! only place that touches stdout, stderr, and process exit codes.

#![allow(clippy::print_stderr)]

pub mod args;
pub mod config;
pub mod document;
pub mod driver;
pub mod logging;
pub mod reporter;
pub mod watch;
