//! Application configuration loaded from environment variables.

use serde::Deserialize;
use url::Url;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// Interface the HTTP server binds to.
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    // === Albert Heijn API ===
    /// Base URL of the AH mobile API.
    #[serde(default = "default_ah_base_url")]
    pub ah_base_url: String,

    /// User agent presented to the AH API.
    #[serde(default = "default_ah_user_agent")]
    pub ah_user_agent: String,

    /// Client id used when requesting an anonymous token.
    #[serde(default = "default_ah_client_id")]
    pub ah_client_id: String,

    /// Timeout for a single upstream request, in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_ah_base_url() -> String {
    "https://api.ah.nl".to_string()
}

fn default_ah_user_agent() -> String {
    "Appie/8.22.3".to_string()
}

fn default_ah_client_id() -> String {
    "appie".to_string()
}

fn default_http_timeout_ms() -> u64 {
    10_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            ah_base_url: default_ah_base_url(),
            ah_user_agent: default_ah_user_agent(),
            ah_client_id: default_ah_client_id(),
            http_timeout_ms: default_http_timeout_ms(),
            rust_log: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("PORT must be non-zero".to_string());
        }

        if self.http_timeout_ms == 0 {
            return Err("HTTP_TIMEOUT_MS must be non-zero".to_string());
        }

        match Url::parse(&self.ah_base_url) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => {
                return Err(format!(
                    "AH_BASE_URL must use http or https, got {}",
                    url.scheme()
                ))
            }
            Err(e) => return Err(format!("AH_BASE_URL is not a valid URL: {}", e)),
        }

        Ok(())
    }

    /// Socket address string the server binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Tracing filter directive. `verbose` forces debug output for this crate.
    pub fn log_directive(&self, verbose: bool) -> String {
        if verbose {
            "supermarkt_api=debug,info".to_string()
        } else {
            self.rust_log.clone()
        }
    }

    /// AH base URL without a trailing slash.
    pub fn ah_base_url_trimmed(&self) -> &str {
        self.ah_base_url.trim_end_matches('/')
    }
}
