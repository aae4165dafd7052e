//! Albert Heijn mobile API client.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::config::Config;
use crate::error::ConnectorError;
use crate::metrics::{self, LatencyTimer};

use super::types::SearchResults;
use super::Connector;

const TOKEN_PATH: &str = "/mobile-auth/v1/auth/token/anonymous";
const SEARCH_PATH: &str = "/mobile-services/product/search/v2";
const CATEGORIES_PATH: &str = "/mobile-services/v1/product-shelves/categories";

/// Albert Heijn catalog connector.
///
/// Holds no per-session state: every operation requests a fresh anonymous
/// token, so concurrent requests never share credentials.
#[derive(Debug, Clone)]
pub struct AhConnector {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Base URL of the mobile API.
    base_url: String,
    /// Client id sent when requesting a token.
    client_id: String,
}

/// Body of the anonymous token request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    client_id: &'a str,
}

/// Anonymous token reply.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    /// Bearer token.
    pub access_token: Option<String>,
    /// Lifetime in seconds.
    pub expires_in: Option<u64>,
}

impl AhConnector {
    /// Create a connector from config.
    pub fn new(config: &Config) -> Result<Self, ConnectorError> {
        let mut headers = HeaderMap::new();
        headers.insert("x-application", HeaderValue::from_static("AHWEBSHOP"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .user_agent(config.ah_user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            http,
            base_url: config.ah_base_url_trimmed().to_string(),
            client_id: config.ah_client_id.clone(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Request an anonymous access token.
    #[instrument(skip(self))]
    pub async fn anonymous_token(&self) -> Result<String, ConnectorError> {
        let url = format!("{}{}", self.base_url, TOKEN_PATH);

        let response = self
            .http
            .post(&url)
            .json(&TokenRequest {
                client_id: &self.client_id,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ConnectorError::UpstreamStatus {
                endpoint: "token",
                status: response.status().as_u16(),
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ConnectorError::Parse(format!("Failed to parse token: {}", e)))?;

        match token.access_token {
            Some(access_token) if !access_token.is_empty() => {
                debug!(expires_in = ?token.expires_in, "Obtained anonymous token");
                Ok(access_token)
            }
            _ => Err(ConnectorError::Auth(
                "token response has no access_token".to_string(),
            )),
        }
    }

    /// Authenticated GET returning a decoded JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ConnectorError> {
        let token = self.anonymous_token().await?;
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(endpoint, status = %response.status(), "Upstream request failed");
            return Err(ConnectorError::UpstreamStatus {
                endpoint,
                status: response.status().as_u16(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| ConnectorError::Parse(format!("Failed to parse {}: {}", endpoint, e)))
    }
}

impl Connector for AhConnector {
    #[instrument(skip(self))]
    async fn search_products(
        &self,
        query: &str,
        size: u32,
        page: u32,
    ) -> Result<SearchResults, ConnectorError> {
        let _timer = LatencyTimer::new("search_products");

        let params = [
            ("query", query.to_string()),
            ("sortOn", "RELEVANCE".to_string()),
            ("page", page.to_string()),
            ("size", size.to_string()),
        ];

        let result: Result<SearchResults, _> = self.get_json("search", SEARCH_PATH, &params).await;
        match result {
            Ok(results) => {
                debug!(count = results.products().len(), "Retrieved search results");
                Ok(results)
            }
            Err(e) => {
                metrics::inc_upstream_failures("search_products");
                Err(e)
            }
        }
    }

    #[instrument(skip(self))]
    async fn get_categories(&self) -> Result<Value, ConnectorError> {
        let _timer = LatencyTimer::new("get_categories");

        self.get_json("categories", CATEGORIES_PATH, &[])
            .await
            .inspect_err(|_| metrics::inc_upstream_failures("get_categories"))
    }
}
