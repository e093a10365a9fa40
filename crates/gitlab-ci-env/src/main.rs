//! gitlab-ci-env CLI Application
//!
//! Prints the predefined GitLab CI variables (`CI_COMMIT_REF_SLUG`,
//! `CI_ENVIRONMENT_SLUG`, ...) a pipeline would see for a branch and an
//! environment name.

// CLI binary needs to output to stderr - this is intentional
#![allow(clippy::print_stderr)]

use gitlab_ci_env::cli::{self, EXIT_OK, exit_code_for, render_error};
use gitlab_ci_env::tracing::{TracingConfig, init_tracing};
use std::io::{self, Write};

fn main() {
    // NOTE: Using eprintln! in panic hook is intentional - tracing infrastructure
    // may be corrupted during a panic, so we use the most reliable output method.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();

    let tracing_config = TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
        ..Default::default()
    };
    // Ignore error if tracing already initialized (e.g., in tests)
    let _ = init_tracing(tracing_config);

    // Non-UTF-8 variables cannot appear in a URL template; skip them
    let env = std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));

    let exit_code = match cli::run(&cli, env) {
        Ok(output) => {
            let mut stdout = io::stdout().lock();
            match stdout.write_all(output.as_bytes()).and_then(|()| stdout.flush()) {
                Ok(()) => EXIT_OK,
                Err(e) => {
                    let err = cli::CliError::other(format!("Failed to write output: {e}"));
                    render_error(&err);
                    exit_code_for(&err)
                }
            }
        }
        Err(err) => {
            tracing::debug!(error = %err, "Command failed");
            render_error(&err);
            exit_code_for(&err)
        }
    };

    std::process::exit(exit_code);
}
