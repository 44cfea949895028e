//! Service settings read from `API_*` environment variables

use anyhow::Result;
use axum::http::HeaderValue;
use serde::Deserialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::warn;

/// Listener and CORS settings for the API service
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    pub host: String,
    pub port: u16,
    /// Comma-separated list of allowed origins; empty allows any origin
    pub cors_origins: String,
}

impl ApiSettings {
    /// Load from `API_HOST` (default `0.0.0.0`), `API_PORT` (default 3001)
    /// and `API_CORS_ORIGINS` (default empty)
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3001)?
            .set_default("cors_origins", "")?
            .add_source(config::Environment::with_prefix("API").try_parsing(true))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn cors_layer(&self) -> CorsLayer {
        let origins: Vec<HeaderValue> = self
            .allowed_origins()
            .into_iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!("Ignoring invalid CORS origin: {}", origin);
                    None
                }
            })
            .collect();

        let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

        if origins.is_empty() {
            layer.allow_origin(Any)
        } else {
            layer.allow_origin(AllowOrigin::list(origins))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_defaults() {
        unsafe {
            std::env::remove_var("API_HOST");
            std::env::remove_var("API_PORT");
            std::env::remove_var("API_CORS_ORIGINS");
        }

        let settings = ApiSettings::from_env().unwrap();
        assert_eq!(settings.bind_address(), "0.0.0.0:3001");
        assert!(settings.allowed_origins().is_empty());
    }

    #[test]
    #[serial]
    fn test_cors_origins_are_split() {
        unsafe {
            std::env::set_var(
                "API_CORS_ORIGINS",
                "https://agribuyx.com, https://admin.agribuyx.com,",
            );
        }

        let settings = ApiSettings::from_env().unwrap();
        assert_eq!(
            settings.allowed_origins(),
            vec!["https://agribuyx.com", "https://admin.agribuyx.com"]
        );

        unsafe {
            std::env::remove_var("API_CORS_ORIGINS");
        }
    }
}
