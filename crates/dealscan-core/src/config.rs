use url::Url;

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://www.amazon.com/";

/// Which storefront the scenarios run against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteConfig {
    pub base_url: String,
}

impl SiteConfig {
    /// Validate `base_url` as an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, AppError> {
        let parsed = Url::parse(base_url)
            .map_err(|e| AppError::ConfigError(format!("Invalid base URL '{base_url}': {e}")))?;
        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(AppError::ConfigError(format!(
                    "Base URL scheme '{scheme}' is not allowed (only http/https)"
                )));
            }
        }
        Ok(Self {
            base_url: parsed.to_string(),
        })
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}
