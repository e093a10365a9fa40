//! Assembly of the predefined GitLab CI variables.
//!
//! The order of evaluation matters: the environment slug is derived from the
//! *interpolated* environment name, never from the raw template.

use crate::error::Result;
use crate::interpolate::interpolate_variables;
use crate::slug::{Slug, environment_slug, ref_slug};
use serde::Serialize;
use std::collections::BTreeMap;

/// Name of the raw branch or tag variable
pub const CI_COMMIT_REF_NAME: &str = "CI_COMMIT_REF_NAME";
/// Name of the ref slug variable
pub const CI_COMMIT_REF_SLUG: &str = "CI_COMMIT_REF_SLUG";
/// Name of the interpolated environment name variable
pub const CI_ENVIRONMENT_NAME: &str = "CI_ENVIRONMENT_NAME";
/// Name of the environment slug variable
pub const CI_ENVIRONMENT_SLUG: &str = "CI_ENVIRONMENT_SLUG";
/// Name of the interpolated environment URL variable
pub const CI_ENVIRONMENT_URL: &str = "CI_ENVIRONMENT_URL";

/// The predefined variables GitLab derives for a deployment job.
///
/// Serialises as a JSON object whose keys follow the field order below;
/// `CI_ENVIRONMENT_URL` is omitted unless a URL template was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct PredefinedVariables {
    /// Raw branch or tag name
    pub ci_commit_ref_name: String,
    /// Slugified ref name, at most 63 characters
    pub ci_commit_ref_slug: Slug,
    /// Environment name with ref variables expanded
    pub ci_environment_name: String,
    /// Slugified environment name, at most 24 characters
    pub ci_environment_slug: Slug,
    /// Environment URL with all known variables expanded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ci_environment_url: Option<String>,
}

impl PredefinedVariables {
    /// Start building a variable set for `branch` and `environment_name`
    #[must_use]
    pub fn builder<'a>(branch: &'a str, environment_name: &'a str) -> VariablesBuilder<'a> {
        VariablesBuilder::new(branch, environment_name)
    }

    /// Look up a variable by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        match name {
            CI_COMMIT_REF_NAME => Some(&self.ci_commit_ref_name),
            CI_COMMIT_REF_SLUG => Some(self.ci_commit_ref_slug.as_str()),
            CI_ENVIRONMENT_NAME => Some(&self.ci_environment_name),
            CI_ENVIRONMENT_SLUG => Some(self.ci_environment_slug.as_str()),
            CI_ENVIRONMENT_URL => self.ci_environment_url.as_deref(),
            _ => None,
        }
    }

    /// Iterate over `(name, value)` pairs in output order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        [
            (CI_COMMIT_REF_NAME, Some(self.ci_commit_ref_name.as_str())),
            (CI_COMMIT_REF_SLUG, Some(self.ci_commit_ref_slug.as_str())),
            (CI_ENVIRONMENT_NAME, Some(self.ci_environment_name.as_str())),
            (CI_ENVIRONMENT_SLUG, Some(self.ci_environment_slug.as_str())),
            (CI_ENVIRONMENT_URL, self.ci_environment_url.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }
}

/// Builder for [`PredefinedVariables`].
///
/// The optional context supplies extra variables (typically the process
/// environment) for the URL template. Predefined variables take precedence
/// over context entries with the same name.
#[derive(Debug, Clone)]
pub struct VariablesBuilder<'a> {
    branch: &'a str,
    environment_name: &'a str,
    environment_url: Option<&'a str>,
    context: BTreeMap<String, String>,
}

impl<'a> VariablesBuilder<'a> {
    /// Create a builder for `branch` and the `environment_name` template
    #[must_use]
    pub fn new(branch: &'a str, environment_name: &'a str) -> Self {
        Self {
            branch,
            environment_name,
            environment_url: None,
            context: BTreeMap::new(),
        }
    }

    /// Also compute `CI_ENVIRONMENT_URL` from this template
    #[must_use]
    pub fn environment_url(mut self, template: &'a str) -> Self {
        self.environment_url = Some(template);
        self
    }

    /// Add variables available to the URL template
    #[must_use]
    pub fn context<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.context
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Compute the variable set.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SlugError::Empty`] if the branch or the interpolated
    /// environment name has no ASCII letters or digits.
    #[tracing::instrument(
        name = "build_variables",
        skip(self),
        fields(branch = self.branch, environment_name = self.environment_name)
    )]
    pub fn build(&self) -> Result<PredefinedVariables> {
        let ci_commit_ref_slug = ref_slug(self.branch)?;

        let ci_environment_name = interpolate_variables(
            self.environment_name,
            [
                (CI_COMMIT_REF_NAME, self.branch),
                (CI_COMMIT_REF_SLUG, ci_commit_ref_slug.as_str()),
            ],
        );
        let ci_environment_slug = environment_slug(&ci_environment_name)?;

        let mut vars = PredefinedVariables {
            ci_commit_ref_name: self.branch.to_string(),
            ci_commit_ref_slug,
            ci_environment_name,
            ci_environment_slug,
            ci_environment_url: None,
        };

        if let Some(template) = self.environment_url {
            let context = self
                .context
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str()));
            let url = interpolate_variables(template, vars.iter().chain(context));
            vars.ci_environment_url = Some(url);
        }

        tracing::debug!(
            ref_slug = %vars.ci_commit_ref_slug,
            environment_slug = %vars.ci_environment_slug,
            "Computed predefined variables"
        );

        Ok(vars)
    }
}

/// Compute the four predefined variables for `branch` and an environment
/// name template.
///
/// # Errors
///
/// Returns [`crate::SlugError::Empty`] if the branch or the interpolated
/// environment name has no ASCII letters or digits.
pub fn build(branch: &str, environment_template: &str) -> Result<PredefinedVariables> {
    VariablesBuilder::new(branch, environment_template).build()
}
