use std::env;
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_PORT: u16 = 8001;
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Gateway configuration, read from the environment
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the back-office API this gateway forwards to
    pub api_base_url: String,
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            host: env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("GATEWAY_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            request_timeout_secs: env::var("GATEWAY_TIMEOUT_SECS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
