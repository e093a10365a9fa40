//! Command-line adapter for `gitlab-ci-env`.
//!
//! The slug logic lives in [`gitlab_ci_env_slug`]; this crate only parses
//! arguments, wires up tracing and renders the resulting variables.

#![warn(missing_docs)]

pub mod cli;
pub mod output;
pub mod tracing;

pub use cli::{Cli, CliError, run};
pub use output::OutputFormat;
