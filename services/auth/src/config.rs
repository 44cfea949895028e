//! Service settings read from `AUTH_*` environment variables

use anyhow::Result;
use serde::Deserialize;

/// Listener settings for the authentication service
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub host: String,
    pub port: u16,
}

impl AuthSettings {
    /// Load from `AUTH_HOST` (default `0.0.0.0`) and `AUTH_PORT` (default 3000)
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 3000)?
            .add_source(config::Environment::with_prefix("AUTH").try_parsing(true))
            .build()?
            .try_deserialize()?;

        Ok(settings)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
