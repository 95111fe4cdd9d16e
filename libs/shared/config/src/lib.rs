use std::env;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token_file: Option<String>,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        let config = Self {
            base_url: env::var("NUTRI_API_URL")
                .unwrap_or_else(|_| {
                    warn!("NUTRI_API_URL not set, using empty value");
                    String::new()
                }),
            token_file: env::var("NUTRI_TOKEN_FILE").ok(),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token_file: None,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty()
    }
}
