//! Command-line interface definition, error types and exit codes for gitlab-ci-env

use crate::output::{self, OutputFormat};
use crate::tracing::{LogLevel, TracingFormat};
use clap::Parser;
use gitlab_ci_env_slug::{PredefinedVariables, SlugError};
use miette::{Diagnostic, Report};
use std::io::{self, Write};
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// Unexpected runtime error exit code
pub const EXIT_OTHER: i32 = 1;
/// CLI usage error exit code (matches clap's own)
pub const EXIT_CLI: i32 = 2;
/// Slug generation error exit code
pub const EXIT_SLUG: i32 = 3;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// A slug could not be derived from the input (exit code 3)
    #[error("Slug error: {message}")]
    #[diagnostic(code(gitlab_ci_env::cli::slug))]
    Slug {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Other unexpected error (exit code 1)
    #[error("Unexpected error: {message}")]
    #[diagnostic(code(gitlab_ci_env::cli::other))]
    Other {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new slug error with help text
    #[must_use]
    pub fn slug_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Slug {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new other error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            help: None,
        }
    }
}

impl From<SlugError> for CliError {
    fn from(err: SlugError) -> Self {
        let help = err.help().map_or_else(
            || "check the --branch and --environment-name values".to_string(),
            |h| h.to_string(),
        );
        match err {
            SlugError::Empty { .. } => Self::slug_with_help(err.to_string(), help),
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Slug { .. } => EXIT_SLUG,
        CliError::Other { .. } => EXIT_OTHER,
    }
}

/// Render a human-friendly error report on stderr
#[allow(clippy::print_stderr)]
pub fn render_error(err: &CliError) {
    let report = Report::new(err.clone());
    eprintln!("{report:?}");
    // Ensure output is flushed before potential process exit
    let _ = io::stderr().flush();
}

/// Generate the predefined GitLab CI environment variables for a given branch.
#[derive(Parser, Debug)]
#[command(name = "gitlab-ci-env")]
#[command(about = "Generate the predefined GitLab CI environment variables for a given branch")]
#[command(
    long_about = "Generate the predefined GitLab CI environment variables for a given branch.\n\n\
                  Example:\n  \
                  gitlab-ci-env --branch TEST-branch \
                  --environment-name 'deployment-$CI_COMMIT_REF_SLUG'"
)]
#[command(version)]
pub struct Cli {
    /// Upstream branch name of the merge request.
    #[arg(
        long,
        env = "GITLAB_CI_ENV_BRANCH",
        help = "Upstream branch name of the merge request"
    )]
    pub branch: String,

    /// Environment name of the CI job from `.gitlab-ci.yml`.
    #[arg(
        long,
        env = "GITLAB_CI_ENV_ENVIRONMENT_NAME",
        help = "Environment name of the CI job from .gitlab-ci.yml; \
                $CI_COMMIT_REF_NAME and $CI_COMMIT_REF_SLUG are resolved"
    )]
    pub environment_name: String,

    /// Environment URL of the CI job from `.gitlab-ci.yml`.
    #[arg(
        long,
        env = "GITLAB_CI_ENV_ENVIRONMENT_URL",
        help = "Environment URL of the CI job from .gitlab-ci.yml; \
                predefined and process environment variables are resolved"
    )]
    pub environment_url: Option<String>,

    /// Output format.
    #[arg(
        long = "output",
        short = 'o',
        help = "Output format",
        value_enum,
        default_value_t = OutputFormat::Json
    )]
    pub output_format: OutputFormat,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    /// Log output format.
    #[arg(
        long,
        help = "Set log output format",
        default_value = "compact",
        value_enum
    )]
    pub log_format: TracingFormat,
}

/// Parse command-line arguments, exiting with [`EXIT_CLI`] on usage errors
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Compute and render the variables for `cli`.
///
/// `env` is the substitution context for `--environment-url`, normally the
/// process environment.
///
/// # Errors
///
/// Returns [`CliError::Slug`] when the branch or environment name yields an
/// empty slug.
pub fn run<I>(cli: &Cli, env: I) -> Result<String, CliError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut builder = PredefinedVariables::builder(&cli.branch, &cli.environment_name);
    if let Some(url) = cli.environment_url.as_deref() {
        builder = builder.environment_url(url).context(env);
    }

    let vars = builder.build()?;
    tracing::info!(
        branch = %cli.branch,
        environment_slug = %vars.ci_environment_slug,
        format = %cli.output_format,
        "Generated predefined variables"
    );

    output::render(&vars, cli.output_format)
}
