//! Runtime configuration.
//!
//! All connection settings come from the environment (optionally via a
//! `.env` file loaded by the binary before this runs). Missing values are
//! startup errors, raised before any ticket is touched.

/// Connection settings for the tracked repository.
#[derive(Debug, Clone)]
pub struct Config {
    /// GitHub API token
    pub github_token: String,
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
}

/// Error types for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(&'static str),
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// The token is read from `GITHUB_TOKEN`, falling back to `GH_TOKEN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let github_token = std::env::var("GITHUB_TOKEN")
            .or_else(|_| std::env::var("GH_TOKEN"))
            .map_err(|_| ConfigError::MissingVar("GITHUB_TOKEN"))?;
        let owner =
            std::env::var("GITHUB_OWNER").map_err(|_| ConfigError::MissingVar("GITHUB_OWNER"))?;
        let repo =
            std::env::var("GITHUB_REPO").map_err(|_| ConfigError::MissingVar("GITHUB_REPO"))?;

        Ok(Self { github_token, owner, repo })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for var in ["GITHUB_TOKEN", "GH_TOKEN", "GITHUB_OWNER", "GITHUB_REPO"] {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_missing_token_names_the_variable() {
        clear_env();
        std::env::set_var("GITHUB_OWNER", "acme");
        std::env::set_var("GITHUB_REPO", "rocket");

        let err = Config::from_env().unwrap_err();
        assert_eq!(err.to_string(), "missing required environment variable: GITHUB_TOKEN");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_gh_token_fallback() {
        clear_env();
        std::env::set_var("GH_TOKEN", "t0ken");
        std::env::set_var("GITHUB_OWNER", "acme");
        std::env::set_var("GITHUB_REPO", "rocket");

        let config = Config::from_env().unwrap();
        assert_eq!(config.github_token, "t0ken");
        assert_eq!(config.owner, "acme");
        assert_eq!(config.repo, "rocket");
        clear_env();
    }
}
