use crate::error::RunError;
use std::env;

const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Everything the pipeline needs from the environment, resolved once at
/// process start. Stage code never reads the environment itself.
#[derive(Debug, Clone)]
pub struct Config {
    pub github: GitHubConfig,
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone)]
pub struct GitHubConfig {
    pub api_url: String,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Config {
    pub fn from_env() -> Result<Self, RunError> {
        let token = require_env("GITHUB_TOKEN")?;
        let api_key = require_env("OPENAI_API_KEY")?;
        let base_url = require_env("OPENAI_BASE_URL")?;

        Ok(Config {
            github: GitHubConfig {
                api_url: env::var("GITHUB_API_URL")
                    .unwrap_or_else(|_| DEFAULT_GITHUB_API_URL.to_string()),
                token,
            },
            generation: GenerationConfig {
                base_url,
                api_key,
                model: env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
                max_tokens: 4096,
                temperature: 0.1,
            },
        })
    }
}

fn require_env(key: &str) -> Result<String, RunError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(RunError::Configuration(format!(
            "{key} environment variable is required"
        ))),
    }
}

/// Host naming rules: alphanumeric plus hyphen, underscore and dot.
pub fn validate_repo_slug(owner: &str, name: &str) -> Result<(), RunError> {
    for (label, value) in [("owner", owner), ("repository name", name)] {
        if value.is_empty() {
            return Err(RunError::Configuration(format!("{label} must not be empty")));
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(RunError::Configuration(format!(
                "invalid {label} '{value}': only alphanumerics, '-', '_' and '.' are allowed"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_typical_slugs() {
        assert!(validate_repo_slug("acme", "widget").is_ok());
        assert!(validate_repo_slug("rust-lang", "rust.vim").is_ok());
        assert!(validate_repo_slug("user_1", "repo-2").is_ok());
    }

    #[test]
    fn rejects_empty_and_illegal_slugs() {
        assert!(validate_repo_slug("", "widget").is_err());
        assert!(validate_repo_slug("acme", "").is_err());
        assert!(validate_repo_slug("acme", "wid get").is_err());
        assert!(validate_repo_slug("acme/evil", "widget").is_err());
    }
}
