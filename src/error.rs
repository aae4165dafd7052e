//! Unified error types for the supermarket API.

use thiserror::Error;

/// Unified error type for process-level failures.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while talking to a supermarket connector.
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("upstream {endpoint} returned HTTP {status}")]
    UpstreamStatus {
        /// Logical endpoint name.
        endpoint: &'static str,
        /// Status code returned.
        status: u16,
    },

    /// Upstream payload could not be decoded.
    #[error("failed to parse upstream payload: {0}")]
    Parse(String),

    /// Anonymous token could not be obtained.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Connector is unavailable (used by the mock connector).
    #[error("connector unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while deriving prices for a product.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PricingError {
    /// A price rule needs the pre-discount price but the product has none.
    #[error("product {title:?} has a discount label but no price")]
    MissingPrice {
        /// Product title, if any.
        title: Option<String>,
    },
}

/// Errors surfaced by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The `query` parameter was absent or empty.
    #[error("missing query parameter")]
    MissingQuery,

    /// A numeric query parameter could not be parsed.
    #[error("invalid value {value:?} for parameter {name}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Raw value received.
        value: String,
    },

    /// Connector call failed.
    #[error(transparent)]
    Connector(#[from] ConnectorError),

    /// Price derivation failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
