//! Command-line driver for cafelisp.
//!
//! This crate provides:
//! - [`CliConfig`] - Options parsed from the command line
//! - [`run`] - Read, compile, and write a class file
//! - [`render`] - Caret diagnostics for compile errors
//! - [`init_logging`] - `env_logger` setup

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod diagnostic;
pub mod driver;
pub mod error;

pub use config::CliConfig;
pub use diagnostic::{render, render_cli};
pub use driver::{Outcome, run};
pub use error::{CliError, Result};

/// Initializes logging to standard error.
///
/// `RUST_LOG` takes precedence; otherwise the level is `warn`, or `debug`
/// when `verbose` is set.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .try_init();
}
