//! GitLab CI slug generation.
//!
//! This crate reproduces the predefined variables GitLab derives from a ref
//! name and an environment name, so review-app URLs can be predicted before a
//! pipeline runs:
//! - [`ref_slug`] for `CI_COMMIT_REF_SLUG`
//! - [`environment_slug`] for `CI_ENVIRONMENT_SLUG`
//! - [`interpolate`] for expanding `$CI_COMMIT_REF_NAME` in environment names
//! - [`build`] / [`PredefinedVariables`] for assembling the full set
//!
//! Every operation is a pure function of its inputs.
//!
//! # Example
//!
//! ```
//! use gitlab_ci_env_slug::build;
//!
//! let vars = build(
//!     "review/TEST-branch-with-really-long-name",
//!     "deployment-$CI_COMMIT_REF_NAME",
//! )?;
//!
//! assert_eq!(vars.ci_commit_ref_slug.as_str(), "review-test-branch-with-really-long-name");
//! assert_eq!(vars.ci_environment_slug.as_str(), "deployment-revie-l58kaf");
//! # Ok::<(), gitlab_ci_env_slug::SlugError>(())
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod fingerprint;
pub mod interpolate;
pub mod slug;
pub mod variables;

// Re-exports for convenience
pub use error::{Result, SlugError};
pub use fingerprint::{FINGERPRINT_LEN, fingerprint};
pub use interpolate::{interpolate, interpolate_variables};
pub use slug::{
    ENVIRONMENT_SLUG_MAX_LEN, ENVIRONMENT_SLUG_PREFIX_LEN, REF_SLUG_MAX_LEN, Slug,
    environment_slug, ref_slug, sanitize,
};
pub use variables::{PredefinedVariables, VariablesBuilder, build};
