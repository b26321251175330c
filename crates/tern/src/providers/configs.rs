use anyhow::{anyhow, Context, Result};
use std::env;

pub const ANTHROPIC_HOST: &str = "https://api.anthropic.com";
pub const ANTHROPIC_MODEL: &str = "claude-3-7-sonnet-latest";
pub const ANTHROPIC_MAX_TOKENS: i32 = 1024;

pub trait ProviderConfig {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self>
    where
        Self: Sized;

    /// Helper function to get environment variables with error handling
    fn get_env(key: &str, required: bool, default: Option<String>) -> Result<Option<String>> {
        match env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) if !required => Ok(default),
            Err(env::VarError::NotPresent) => Err(anyhow!(
                "Environment variable '{}' is required but not set.",
                key
            )),
            Err(e) => Err(e.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnthropicProviderConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<i32>,
}

impl AnthropicProviderConfig {
    pub fn new<K: Into<String>>(api_key: K) -> Self {
        Self {
            host: ANTHROPIC_HOST.to_string(),
            api_key: api_key.into(),
            model: ANTHROPIC_MODEL.to_string(),
            temperature: None,
            max_tokens: Some(ANTHROPIC_MAX_TOKENS),
        }
    }

    /// Like `from_env`, but an explicitly supplied key wins over `ANTHROPIC_API_KEY`
    pub fn from_env_with_key(api_key: Option<String>) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => key,
            None => Self::get_env("ANTHROPIC_API_KEY", true, None)?
                .ok_or_else(|| anyhow!("Anthropic API key must be set"))?,
        };
        let host = Self::get_env("ANTHROPIC_HOST", false, Some(ANTHROPIC_HOST.to_string()))?
            .unwrap_or_else(|| ANTHROPIC_HOST.to_string());
        let model = Self::get_env("ANTHROPIC_MODEL", false, Some(ANTHROPIC_MODEL.to_string()))?
            .unwrap_or_else(|| ANTHROPIC_MODEL.to_string());

        let max_tokens = Self::get_env("ANTHROPIC_MAX_TOKENS", false, None)?
            .map(|v| v.parse::<i32>())
            .transpose()
            .context("ANTHROPIC_MAX_TOKENS must be an integer")?
            .unwrap_or(ANTHROPIC_MAX_TOKENS);

        let temperature = Self::get_env("ANTHROPIC_TEMPERATURE", false, None)?
            .map(|v| v.parse::<f32>())
            .transpose()
            .context("ANTHROPIC_TEMPERATURE must be a number")?;

        Ok(Self {
            host,
            api_key,
            model,
            temperature,
            max_tokens: Some(max_tokens),
        })
    }
}

impl ProviderConfig for AnthropicProviderConfig {
    fn from_env() -> Result<Self> {
        Self::from_env_with_key(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let config = AnthropicProviderConfig::new("key");
        assert_eq!(config.host, ANTHROPIC_HOST);
        assert_eq!(config.model, ANTHROPIC_MODEL);
        assert_eq!(config.max_tokens, Some(ANTHROPIC_MAX_TOKENS));
        assert_eq!(config.temperature, None);
    }

    #[test]
    fn test_get_env_optional_default() {
        let value = AnthropicProviderConfig::get_env(
            "TERN_TEST_SURELY_UNSET_VARIABLE",
            false,
            Some("fallback".to_string()),
        )
        .unwrap();
        assert_eq!(value.as_deref(), Some("fallback"));
    }

    #[test]
    fn test_get_env_required_missing() {
        let err =
            AnthropicProviderConfig::get_env("TERN_TEST_SURELY_UNSET_VARIABLE", true, None)
                .unwrap_err();
        assert!(err.to_string().contains("TERN_TEST_SURELY_UNSET_VARIABLE"));
    }

    #[test]
    fn test_explicit_key_wins() {
        let config =
            AnthropicProviderConfig::from_env_with_key(Some("from-flag".to_string())).unwrap();
        assert_eq!(config.api_key, "from-flag");
    }
}
