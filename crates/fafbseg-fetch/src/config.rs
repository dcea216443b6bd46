//! Artifact service configuration.
//!
//! Configures where per-segment artifacts are fetched from. There is no
//! built-in default service: the base URL must be given explicitly or via
//! the environment. Override individual fields via explicit construction for
//! staging/testing.

use url::Url;

/// Default path of an artifact relative to the service base URL.
pub const DEFAULT_PATH_TEMPLATE: &str = "meshes/{id}.{ext}";

/// Configuration for connecting to an artifact service.
///
/// `Debug` prints `[REDACTED]` in place of the token.
#[derive(Clone)]
pub struct FetchConfig {
    /// Base URL of the service.
    pub base_url: Url,
    /// Artifact path relative to `base_url`, with `{id}` and `{ext}`
    /// placeholders.
    pub path_template: String,
    /// Optional bearer token.
    pub api_token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries after a transport failure (statuses are never retried).
    pub max_retries: u32,
}

impl std::fmt::Debug for FetchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchConfig")
            .field("base_url", &self.base_url)
            .field("path_template", &self.path_template)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl FetchConfig {
    /// Configuration with default template, no token, 30 s timeout and
    /// three retries.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            path_template: DEFAULT_PATH_TEMPLATE.to_string(),
            api_token: None,
            timeout_secs: 30,
            max_retries: 3,
        }
    }

    /// Read the service settings from `FAFBSEG_*` variables.
    ///
    /// Variables:
    /// - `FAFBSEG_SERVICE_URL` (required)
    /// - `FAFBSEG_PATH_TEMPLATE` (default: `meshes/{id}.{ext}`)
    /// - `FAFBSEG_API_TOKEN` (optional)
    /// - `FAFBSEG_TIMEOUT_SECS` (default: 30)
    /// - `FAFBSEG_MAX_RETRIES` (default: 3)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_with_url(None)
    }

    /// Like [`from_env`](Self::from_env), but an explicit `service_url`
    /// takes precedence over `FAFBSEG_SERVICE_URL`.
    pub fn from_env_with_url(service_url: Option<&str>) -> Result<Self, ConfigError> {
        let base_url = match service_url {
            Some(raw) => parse_url("service_url", raw)?,
            None => {
                let raw = std::env::var("FAFBSEG_SERVICE_URL")
                    .map_err(|_| ConfigError::MissingServiceUrl)?;
                parse_url("FAFBSEG_SERVICE_URL", &raw)?
            }
        };

        let mut config = Self::new(base_url);
        if let Ok(template) = std::env::var("FAFBSEG_PATH_TEMPLATE") {
            config = config.with_path_template(template)?;
        }
        config.api_token = std::env::var("FAFBSEG_API_TOKEN")
            .ok()
            .filter(|t| !t.is_empty());
        config.timeout_secs = env_number("FAFBSEG_TIMEOUT_SECS", 30)?;
        config.max_retries = env_number("FAFBSEG_MAX_RETRIES", 3)?;
        Ok(config)
    }

    /// Settings for a mock server in tests: short timeout, no retries.
    pub fn local_mock(base_url: &str) -> Result<Self, ConfigError> {
        let mut config = Self::new(parse_url("base_url", base_url)?);
        config.timeout_secs = 5;
        config.max_retries = 0;
        Ok(config)
    }

    /// Replace the path template. It must contain an `{id}` placeholder.
    pub fn with_path_template(mut self, template: impl Into<String>) -> Result<Self, ConfigError> {
        let template = template.into();
        if !template.contains("{id}") {
            return Err(ConfigError::InvalidTemplate(template));
        }
        self.path_template = template;
        Ok(self)
    }

    /// Set the bearer token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }
}

fn parse_url(var: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn env_number<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber(var.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

/// Invalid or missing service settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("FAFBSEG_SERVICE_URL environment variable is required")]
    MissingServiceUrl,
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("path template \"{0}\" must contain an {{id}} placeholder")]
    InvalidTemplate(String),
    #[error("invalid number for {0}: \"{1}\"")]
    InvalidNumber(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_config_is_fast_and_unauthenticated() {
        let cfg = FetchConfig::local_mock("http://127.0.0.1:9000").unwrap();
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.max_retries, 0);
        assert_eq!(cfg.base_url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(cfg.path_template, DEFAULT_PATH_TEMPLATE);
        assert!(cfg.api_token.is_none());
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = FetchConfig::local_mock("http://127.0.0.1:9000")
            .unwrap()
            .with_token("secret-token");
        let dbg = format!("{cfg:?}");
        assert!(!dbg.contains("secret-token"));
        assert!(dbg.contains("[REDACTED]"));
    }

    #[test]
    fn template_requires_id_placeholder() {
        let cfg = FetchConfig::local_mock("http://127.0.0.1:9000").unwrap();
        assert!(cfg.clone().with_path_template("skeletons/{id}.swc").is_ok());
        assert!(matches!(
            cfg.with_path_template("skeletons/latest"),
            Err(ConfigError::InvalidTemplate(_))
        ));
    }

    #[test]
    fn env_number_uses_default_when_var_absent() {
        let n: u64 = env_number("NONEXISTENT_VAR_FAFBSEG_12345", 7).unwrap();
        assert_eq!(n, 7);
    }

    #[test]
    fn env_number_rejects_garbage() {
        std::env::set_var("TEST_BAD_NUMBER_FAFBSEG", "ten");
        let result: Result<u64, _> = env_number("TEST_BAD_NUMBER_FAFBSEG", 7);
        std::env::remove_var("TEST_BAD_NUMBER_FAFBSEG");
        assert!(matches!(result, Err(ConfigError::InvalidNumber(_, _))));
    }

    #[test]
    fn explicit_service_url_needs_no_env() {
        let cfg = FetchConfig::from_env_with_url(Some("https://meshes.example.org/v2/")).unwrap();
        assert_eq!(cfg.base_url.as_str(), "https://meshes.example.org/v2/");
    }

    #[test]
    fn invalid_base_url_rejected() {
        assert!(matches!(
            FetchConfig::local_mock("not a url"),
            Err(ConfigError::InvalidUrl(_, _))
        ));
    }
}
