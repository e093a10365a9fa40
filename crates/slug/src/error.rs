//! Error types for slug generation

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while deriving a slug
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SlugError {
    /// Sanitisation left nothing behind (e.g. a branch named `///`)
    #[error("cannot derive a slug from {input:?}: it contains no ASCII letters or digits")]
    #[diagnostic(
        code(gitlab_ci_env::slug::empty),
        help("use a name that contains at least one ASCII letter or digit")
    )]
    Empty {
        /// The raw input that produced an empty slug
        input: String,
    },
}

impl SlugError {
    /// Create an empty-slug error for the given input
    #[must_use]
    pub fn empty(input: impl Into<String>) -> Self {
        Self::Empty {
            input: input.into(),
        }
    }
}

/// Result type for slug operations
pub type Result<T> = std::result::Result<T, SlugError>;
