use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.gagiteck.com/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Missing configuration: {0}")]
    MissingConfig(String),
}

/// Connection settings for [`crate::Client`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        // trailing slashes would double up when joined with request paths
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read settings from `GAGITECK_API_KEY` and (optionally) `GAGITECK_BASE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("GAGITECK_API_KEY")
            .map_err(|_| ConfigError::MissingConfig("GAGITECK_API_KEY".into()))?;
        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("GAGITECK_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = ClientConfig::new("ggt_k");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = ClientConfig::new("ggt_k").with_base_url("https://example.test/v1/");
        assert_eq!(config.base_url, "https://example.test/v1");
    }

    // env mutation is unsafe in the 2024 edition and racy across threads,
    // so both from_env paths live in this single test
    #[test]
    fn from_env_requires_api_key_and_reads_base_url() {
        unsafe { std::env::remove_var("GAGITECK_API_KEY") };
        let err = ClientConfig::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::MissingConfig(name) if name == "GAGITECK_API_KEY"));

        unsafe {
            std::env::set_var("GAGITECK_API_KEY", "ggt_env_key");
            std::env::set_var("GAGITECK_BASE_URL", "https://env.example.test/v1/");
        }
        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.api_key, "ggt_env_key");
        assert_eq!(config.base_url, "https://env.example.test/v1");

        unsafe {
            std::env::remove_var("GAGITECK_API_KEY");
            std::env::remove_var("GAGITECK_BASE_URL");
        }
    }
}
