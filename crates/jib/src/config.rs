//! Environment-based configuration.
//!
//! The bridge carries API credentials, so configuration comes from the
//! environment rather than a file: `JIRA_BASE_URL`, `JIRA_EMAIL`, and
//! `JIRA_API_TOKEN` are required, `JIRA_DEFAULT_PROJECT` is optional.

use crate::error::{Error, Result};

/// Connection settings for a Jira Cloud site.
#[derive(Debug, Clone)]
pub struct Config {
    /// Site base URL, e.g. `https://example.atlassian.net`, without a
    /// trailing slash.
    pub base_url: String,

    /// Account email used for basic auth.
    pub email: String,

    /// API token paired with the email. Never logged.
    pub api_token: String,

    /// Project key used when a create call does not name one.
    pub default_project: Option<String>,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingEnv`] naming the first required variable
    /// that is unset or empty.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: normalize_base_url(&require("JIRA_BASE_URL")?),
            email: require("JIRA_EMAIL")?,
            api_token: require("JIRA_API_TOKEN")?,
            default_project: std::env::var("JIRA_DEFAULT_PROJECT")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        })
    }
}

fn require(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(Error::MissingEnv(name)),
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::plain("https://x.atlassian.net", "https://x.atlassian.net")]
    #[case::trailing_slash("https://x.atlassian.net/", "https://x.atlassian.net")]
    #[case::many_slashes("https://x.atlassian.net///", "https://x.atlassian.net")]
    #[case::padded(" https://x.atlassian.net ", "https://x.atlassian.net")]
    fn test_normalize_base_url(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_base_url(input), expected);
    }
}
