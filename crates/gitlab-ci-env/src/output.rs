//! Rendering of the computed variables

use crate::cli::CliError;
use gitlab_ci_env_slug::PredefinedVariables;
use std::fmt::Write as _;

/// Output format for the computed variables
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, clap::ValueEnum, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON object
    #[default]
    Json,
    /// `KEY="value"` lines, suitable for `source` or `eval`
    Env,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl AsRef<str> for OutputFormat {
    fn as_ref(&self) -> &str {
        match self {
            Self::Json => "json",
            Self::Env => "env",
        }
    }
}

/// Render `vars` in the requested format, newline terminated.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(vars: &PredefinedVariables, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(vars)
                .map_err(|e| CliError::other(format!("Failed to serialize variables: {e}")))?;
            json.push('\n');
            Ok(json)
        }
        OutputFormat::Env => Ok(render_env(vars)),
    }
}

fn render_env(vars: &PredefinedVariables) -> String {
    vars.iter().fold(String::new(), |mut out, (name, value)| {
        let _ = writeln!(out, "{name}=\"{}\"", escape_shell_value(value));
        out
    })
}

/// Escape special characters for a double-quoted shell value
fn escape_shell_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('$', "\\$")
        .replace('`', "\\`")
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitlab_ci_env_slug::build;

    #[test]
    fn test_escape_shell_value() {
        assert_eq!(escape_shell_value("simple"), "simple");
        assert_eq!(escape_shell_value("review/TEST"), "review/TEST");
        assert_eq!(escape_shell_value("$CI_JOB_ID"), "\\$CI_JOB_ID");
        assert_eq!(escape_shell_value("a\"b"), "a\\\"b");
        assert_eq!(escape_shell_value("`cmd`"), "\\`cmd\\`");
        assert_eq!(escape_shell_value("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_render_json_key_order() {
        let vars = build("review/TEST", "deployment-$CI_COMMIT_REF_NAME").unwrap();
        let json = render(&vars, OutputFormat::Json).unwrap();

        let positions: Vec<usize> = [
            "CI_COMMIT_REF_NAME",
            "CI_COMMIT_REF_SLUG",
            "CI_ENVIRONMENT_NAME",
            "CI_ENVIRONMENT_SLUG",
        ]
        .iter()
        .map(|key| json.find(&format!("\"{key}\"")).unwrap())
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(!json.contains("CI_ENVIRONMENT_URL"));
        assert!(json.ends_with("}\n"));
    }

    #[test]
    fn test_render_env() {
        let vars = build("main", "$CI_JOB_NAME").unwrap();
        let env = render(&vars, OutputFormat::Env).unwrap();
        assert_eq!(
            env,
            "CI_COMMIT_REF_NAME=\"main\"\n\
             CI_COMMIT_REF_SLUG=\"main\"\n\
             CI_ENVIRONMENT_NAME=\"\\$CI_JOB_NAME\"\n\
             CI_ENVIRONMENT_SLUG=\"ci-job-name\"\n"
        );
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Env.to_string(), "env");
        assert_eq!(OutputFormat::default(), OutputFormat::Json);
    }
}
