//! # CLI Layer
//!
//! One possible client of the cinesync library. The only place that:
//! - parses arguments (clap, see `setup.rs`)
//! - initialises logging
//! - writes to stdout/stderr (see `print.rs`)
//! - decides the process exit code
//!
//! Everything else goes through `SyncApi`.

mod commands;
mod print;
mod setup;

pub use commands::run;
