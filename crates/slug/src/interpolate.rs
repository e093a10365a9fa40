//! `$VAR` / `${VAR}` expansion for environment names and URLs.
//!
//! Known variable names are matched as literal prefixes after a `$`, so
//! `$CI_COMMIT_REF_NAME_v2` expands the ref name and keeps `_v2`. When several
//! names match, the longest wins. References to unknown variables are kept
//! verbatim, and substituted values are inserted literally and never
//! re-expanded.

use crate::variables::CI_COMMIT_REF_NAME;

/// Replace every `$CI_COMMIT_REF_NAME` and `${CI_COMMIT_REF_NAME}` in
/// `template` with `ref_name`.
///
/// # Example
///
/// ```
/// use gitlab_ci_env_slug::interpolate;
///
/// assert_eq!(
///     interpolate("deployment-$CI_COMMIT_REF_NAME", "review/x"),
///     "deployment-review/x"
/// );
/// assert_eq!(interpolate("$CI_JOB_ID", "main"), "$CI_JOB_ID");
/// ```
#[must_use]
pub fn interpolate(template: &str, ref_name: &str) -> String {
    interpolate_variables(template, [(CI_COMMIT_REF_NAME, ref_name)])
}

/// Expand `$NAME` and `${NAME}` references to the given variables.
///
/// Earlier entries win over later ones with the same name.
#[must_use]
pub fn interpolate_variables<'a, I>(template: &str, vars: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut vars: Vec<(&str, &str)> = vars
        .into_iter()
        .filter(|(name, _)| !name.is_empty())
        .collect();
    // Stable sort: longest names first, ties keep their original order
    vars.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        match match_reference(after, &vars) {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &after[consumed..];
            }
            None => {
                out.push('$');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Find the variable referenced right after a `$`.
///
/// Returns its value and the number of bytes consumed after the `$`.
fn match_reference<'a>(after: &str, vars: &[(&str, &'a str)]) -> Option<(&'a str, usize)> {
    if let Some(braced) = after.strip_prefix('{') {
        return vars.iter().find_map(|(name, value)| {
            braced
                .strip_prefix(name)
                .is_some_and(|tail| tail.starts_with('}'))
                .then_some((*value, name.len() + 2))
        });
    }

    vars.iter()
        .find(|(name, _)| after.starts_with(name))
        .map(|(name, value)| (*value, name.len()))
}
