//! Slug sanitisation for refs and environments.
//!
//! A [`Slug`] only ever holds lowercase ASCII letters, digits and single
//! hyphens, and never starts or ends with a hyphen.

use crate::error::{Result, SlugError};
use crate::fingerprint::fingerprint;
use serde::Serialize;
use std::fmt;

/// Maximum length of `CI_COMMIT_REF_SLUG`
pub const REF_SLUG_MAX_LEN: usize = 63;

/// Maximum length of `CI_ENVIRONMENT_SLUG`
pub const ENVIRONMENT_SLUG_MAX_LEN: usize = 24;

/// Length of the sanitised prefix kept when an environment slug is shortened
pub const ENVIRONMENT_SLUG_PREFIX_LEN: usize = 16;

/// A sanitised, URL-safe identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// The slug as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters (slugs are ASCII, so also in bytes)
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: an empty slug cannot be constructed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the slug, returning the inner string
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Slug {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Slug {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<Slug> for String {
    fn from(slug: Slug) -> Self {
        slug.0
    }
}

/// Lower-case `input` and replace every run of characters outside
/// `[a-z0-9]` with a single hyphen.
fn collapse(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_run = false;

    for c in input.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            out.push(c);
            in_run = false;
        } else if !in_run {
            out.push('-');
            in_run = true;
        }
    }

    out
}

/// Sanitise an arbitrary string into a [`Slug`] of at most `max_len` characters.
///
/// The input is lower-cased, every run of characters outside `[a-z0-9]` is
/// replaced with one hyphen, the result is truncated to `max_len` and any
/// leading or trailing hyphen is stripped.
///
/// # Errors
///
/// Returns [`SlugError::Empty`] when nothing is left after stripping, e.g.
/// for `"///"` or when `max_len` is zero.
pub fn sanitize(input: &str, max_len: usize) -> Result<Slug> {
    let collapsed = collapse(input);

    // `collapse` only emits ASCII, so byte slicing is char slicing
    let truncated = if collapsed.len() > max_len {
        &collapsed[..max_len]
    } else {
        collapsed.as_str()
    };

    let trimmed = truncated.trim_matches('-');
    if trimmed.is_empty() {
        return Err(SlugError::empty(input));
    }

    Ok(Slug(trimmed.to_string()))
}

/// Generate `CI_COMMIT_REF_SLUG` from a branch or tag name.
///
/// # Errors
///
/// Returns [`SlugError::Empty`] if the name has no ASCII letters or digits.
///
/// # Example
///
/// ```
/// use gitlab_ci_env_slug::ref_slug;
///
/// let slug = ref_slug("review/TEST-branch-with-really-long-name")?;
/// assert_eq!(slug.as_str(), "review-test-branch-with-really-long-name");
/// # Ok::<(), gitlab_ci_env_slug::SlugError>(())
/// ```
pub fn ref_slug(branch: &str) -> Result<Slug> {
    sanitize(branch, REF_SLUG_MAX_LEN)
}

/// Generate `CI_ENVIRONMENT_SLUG` from an (already interpolated) environment name.
///
/// Names whose sanitised form fits in [`ENVIRONMENT_SLUG_MAX_LEN`] characters
/// are returned as is. Longer names are cut to a
/// [`ENVIRONMENT_SLUG_PREFIX_LEN`] character prefix followed by a hyphen and
/// the [`fingerprint`] of the raw name, so long names sharing a prefix still
/// get distinct slugs.
///
/// # Errors
///
/// Returns [`SlugError::Empty`] if the name has no ASCII letters or digits.
pub fn environment_slug(environment_name: &str) -> Result<Slug> {
    let full = sanitize(environment_name, usize::MAX)?;
    if full.len() <= ENVIRONMENT_SLUG_MAX_LEN {
        return Ok(full);
    }

    let prefix = sanitize(environment_name, ENVIRONMENT_SLUG_PREFIX_LEN)?;
    let suffix = fingerprint(environment_name);
    tracing::debug!(
        environment_name,
        sanitized_len = full.len(),
        prefix = %prefix,
        suffix = %suffix,
        "Shortening environment slug"
    );

    Ok(Slug(format!("{prefix}-{suffix}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_basic() {
        assert_eq!(sanitize("main", 63).unwrap(), "main");
        assert_eq!(sanitize("Feature/ABC_123", 63).unwrap(), "feature-abc-123");
        assert_eq!(sanitize("a...b", 63).unwrap(), "a-b");
        assert_eq!(sanitize("a - b", 63).unwrap(), "a-b");
    }

    #[test]
    fn test_sanitize_strips_boundary_hyphens() {
        assert_eq!(sanitize("/leading", 63).unwrap(), "leading");
        assert_eq!(sanitize("trailing/", 63).unwrap(), "trailing");
        assert_eq!(sanitize("--both--", 63).unwrap(), "both");
        assert_eq!(sanitize("a-", 63).unwrap(), "a");
    }

    #[test]
    fn test_sanitize_truncates_before_stripping() {
        // "abc-def" cut at 4 leaves "abc-", which must lose its hyphen
        assert_eq!(sanitize("abc/def", 4).unwrap(), "abc");
        assert_eq!(sanitize("abcdef", 3).unwrap(), "abc");
    }

    #[test]
    fn test_sanitize_non_ascii() {
        assert_eq!(sanitize("café-crème", 63).unwrap(), "caf-cr-me");
        assert_eq!(sanitize("ÄBC", 63).unwrap(), "bc");
    }

    #[test]
    fn test_sanitize_empty() {
        assert_eq!(sanitize("///", 63), Err(SlugError::empty("///")));
        assert!(sanitize("", 63).is_err());
        assert!(sanitize("___", 63).is_err());
        assert!(sanitize("main", 0).is_err());
    }

    #[test]
    fn test_ref_slug_documented_example() {
        assert_eq!(
            ref_slug("review/TEST-branch-with-really-long-name").unwrap(),
            "review-test-branch-with-really-long-name"
        );
    }

    #[test]
    fn test_ref_slug_truncates_to_63() {
        let branch = format!("feature/{}", "x".repeat(100));
        let slug = ref_slug(&branch).unwrap();
        assert_eq!(slug.len(), REF_SLUG_MAX_LEN);
        assert!(slug.as_str().starts_with("feature-xxx"));
    }

    #[test]
    fn test_ref_slug_truncation_at_hyphen() {
        // 62 letters then a separator: the cut lands on the hyphen
        let branch = format!("{}/tail", "a".repeat(62));
        let slug = ref_slug(&branch).unwrap();
        assert_eq!(slug.as_str(), "a".repeat(62));
    }

    #[test]
    fn test_ref_slug_only_punctuation() {
        assert!(matches!(ref_slug("///"), Err(SlugError::Empty { .. })));
    }

    #[test]
    fn test_environment_slug_short_names_unchanged() {
        assert_eq!(environment_slug("production").unwrap(), "production");
        assert_eq!(
            environment_slug("Review Apps/My_Feature").unwrap(),
            "review-apps-my-feature"
        );
    }

    #[test]
    fn test_environment_slug_leading_digit_not_prefixed() {
        assert_eq!(environment_slug("123-review-app").unwrap(), "123-review-app");
        assert_eq!(environment_slug("_42").unwrap(), "42");
    }

    #[test]
    fn test_environment_slug_documented_example() {
        assert_eq!(
            environment_slug("deployment-review/TEST-branch-with-really-long-name").unwrap(),
            "deployment-revie-l58kaf"
        );
    }

    #[test]
    fn test_environment_slug_boundary() {
        let at_limit = "abcdefghijklmnopqrstuvwx";
        assert_eq!(at_limit.len(), 24);
        assert_eq!(environment_slug(at_limit).unwrap(), at_limit);

        let over_limit = "abcdefghijklmnopqrstuvwxy";
        assert_eq!(environment_slug(over_limit).unwrap(), "abcdefghijklmnop-45ai7v");
    }

    #[test]
    fn test_environment_slug_boundary_counts_sanitized_length() {
        // 26 raw characters, 24 after collapsing the separator run
        let name = "abcdefghijkl///mnopqrstuvw";
        let slug = environment_slug(name).unwrap();
        assert_eq!(slug.as_str(), "abcdefghijkl-mnopqrstuvw");
        assert_eq!(slug.len(), 24);
    }

    #[test]
    fn test_environment_slug_prefix_hyphen_not_doubled() {
        // Sanitised prefix would end in a hyphen at position 16
        let slug = environment_slug("abcdefghijklmno-pqrstuvwxyz12").unwrap();
        assert_eq!(slug.as_str(), "abcdefghijklmno-894rna");
        assert!(!slug.as_str().contains("--"));
    }

    #[test]
    fn test_environment_slug_collisions_resolved() {
        let one = environment_slug("review/feature-one-very-long-name").unwrap();
        let two = environment_slug("review/feature-two-very-long-name").unwrap();
        assert_eq!(one.as_str(), "review-feature-o-evvm6u");
        assert_eq!(two.as_str(), "review-feature-t-op3zym");

        let a = environment_slug("review/abcdefghijklmnopq-rst").unwrap();
        let b = environment_slug("review/abcdefghijklmnopq-rst-extra").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_environment_slug_empty() {
        assert!(environment_slug("").is_err());
        assert!(environment_slug("$$$").is_err());
    }

    #[test]
    fn test_slug_display_and_serialize() {
        let slug = ref_slug("Main").unwrap();
        assert_eq!(slug.to_string(), "main");
        assert_eq!(serde_json::to_string(&slug).unwrap(), "\"main\"");
        assert_eq!(String::from(slug), "main");
    }
}
