//! HTTP API handlers.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::connector::Connector;
use crate::error::ApiError;
use crate::metrics;
use crate::pricing::{price_entries, ProductPriceEntry};

/// Message returned when `query` is missing or empty.
pub const MISSING_QUERY_MESSAGE: &str = "Query parameter is required";
/// Message returned for every server-side failure.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing your request";

/// Default page size for `/search`.
pub const DEFAULT_SIZE: u32 = 1;
/// Default page index for `/search`.
pub const DEFAULT_PAGE: u32 = 0;

/// Application state shared with handlers.
#[derive(Debug)]
pub struct AppState<C> {
    /// Catalog connector.
    pub connector: Arc<C>,
}

impl<C> AppState<C> {
    /// Create new app state.
    pub fn new(connector: C) -> Self {
        Self {
            connector: Arc::new(connector),
        }
    }
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            connector: Arc::clone(&self.connector),
        }
    }
}

/// Raw `/search` query string. Numbers stay text until validated.
#[derive(Debug, Default)]
pub struct SearchParams {
    /// Search text.
    pub query: Option<String>,
    /// Page size.
    pub size: Option<String>,
    /// Page index.
    pub page: Option<String>,
}

impl SearchParams {
    /// Build from raw query-string pairs. The first occurrence of a key wins;
    /// unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "query" => &mut params.query,
                "size" => &mut params.size,
                "page" => &mut params.page,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }
}

/// Validated search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    /// Search text, never empty.
    pub query: String,
    /// Page size.
    pub size: u32,
    /// Page index.
    pub page: u32,
}

impl TryFrom<SearchParams> for SearchRequest {
    type Error = ApiError;

    fn try_from(params: SearchParams) -> Result<Self, Self::Error> {
        let query = params
            .query
            .filter(|q| !q.is_empty())
            .ok_or(ApiError::MissingQuery)?;

        Ok(Self {
            query,
            size: parse_param("size", params.size, DEFAULT_SIZE)?,
            page: parse_param("page", params.page, DEFAULT_PAGE)?,
        })
    }
}

fn parse_param(name: &'static str, raw: Option<String>, default: u32) -> Result<u32, ApiError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ApiError::InvalidParameter { name, value }),
    }
}

/// Search response.
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// One entry per upstream product.
    pub results: Vec<ProductPriceEntry>,
}

/// Error body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Fixed, client-safe message.
    pub error: &'static str,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingQuery => StatusCode::BAD_REQUEST,
            ApiError::InvalidParameter { .. }
            | ApiError::Connector(_)
            | ApiError::Pricing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            ApiError::MissingQuery => {
                error!("Missing 'query' parameter in /search request");
                MISSING_QUERY_MESSAGE
            }
            other => {
                error!(error = ?other, "Error occurred while processing request: {}", other);
                GENERIC_ERROR_MESSAGE
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Product search handler.
pub async fn search<C: Connector>(
    State(state): State<AppState<C>>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<SearchResponse>, ApiError> {
    let params = SearchParams::from_pairs(pairs);
    debug!(?params, "Accessed /search");

    let result = search_inner(&state, params).await;
    let status = match &result {
        Ok(_) => StatusCode::OK,
        Err(e) => e.status_code(),
    };
    metrics::record_request("search", status.as_u16());

    result.map(Json)
}

async fn search_inner<C: Connector>(
    state: &AppState<C>,
    params: SearchParams,
) -> Result<SearchResponse, ApiError> {
    let request = SearchRequest::try_from(params)?;

    let raw = state
        .connector
        .search_products(&request.query, request.size, request.page)
        .await?;
    debug!(?raw, "Raw search results from connector");

    let results = price_entries(raw.products())?;
    debug!(?results, "Filtered product prices");
    metrics::add_products_returned(results.len());

    Ok(SearchResponse { results })
}

/// Category listing handler. Returns the connector payload unchanged.
pub async fn categories<C: Connector>(
    State(state): State<AppState<C>>,
) -> Result<Json<Value>, ApiError> {
    debug!("Accessed /categories");

    let result = state.connector.get_categories().await;
    match result {
        Ok(categories) => {
            debug!(?categories, "Categories from connector");
            metrics::record_request("categories", StatusCode::OK.as_u16());
            Ok(Json(categories))
        }
        Err(e) => {
            let err = ApiError::from(e);
            metrics::record_request("categories", err.status_code().as_u16());
            Err(err)
        }
    }
}
