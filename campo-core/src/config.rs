use crate::error::{CampoError, Result};

/// Backend URL used when nothing else is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "CAMPO_API_URL";

/// Environment variable holding the identity provider's web API key.
pub const IDENTITY_KEY_ENV: &str = "CAMPO_IDENTITY_KEY";

/// Where the backend and the identity provider live.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CampoConfig {
    pub api_base_url: String,
    pub identity_api_key: Option<String>,
}

impl CampoConfig {
    pub fn new(api_base_url: impl Into<String>, identity_api_key: Option<String>) -> Self {
        Self {
            api_base_url: trim_base_url(api_base_url.into()),
            identity_api_key: identity_api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    /// Values baked in at compile time (WASM builds have no environment).
    pub fn compiled() -> Self {
        Self::new(
            option_env!("CAMPO_API_URL").unwrap_or(DEFAULT_API_BASE_URL),
            option_env!("CAMPO_IDENTITY_KEY").map(str::to_string),
        )
    }

    /// Absolute URL for a backend path such as `/cultivo`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path.trim_start_matches('/'))
    }

    pub fn require_identity_key(&self) -> Result<&str> {
        self.identity_api_key
            .as_deref()
            .ok_or_else(|| CampoError::Config(format!("{IDENTITY_KEY_ENV} no está definido")))
    }
}

impl Default for CampoConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL, None)
    }
}

fn trim_base_url(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let config = CampoConfig::new("https://api.campo.ar/v1/", None);
        assert_eq!(config.endpoint("/cultivo"), "https://api.campo.ar/v1/cultivo");
        assert_eq!(config.endpoint("pais"), "https://api.campo.ar/v1/pais");
    }

    #[test]
    fn test_identity_key_required() {
        let config = CampoConfig::new(DEFAULT_API_BASE_URL, Some("  ".into()));
        assert!(matches!(config.require_identity_key(), Err(CampoError::Config(_))));
        let config = CampoConfig::new(DEFAULT_API_BASE_URL, Some("k".into()));
        assert_eq!(config.require_identity_key().unwrap(), "k");
    }
}
