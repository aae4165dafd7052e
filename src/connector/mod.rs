//! Supermarket connectors.
//!
//! This module handles:
//! - The [`Connector`] seam the HTTP handlers call through
//! - Upstream payload types
//! - The Albert Heijn mobile API client
//! - Mock connector for testing

use std::future::Future;

use serde_json::Value;

use crate::error::ConnectorError;

pub mod ah;
pub mod mock;
pub mod types;

pub use ah::AhConnector;
pub use mock::{MockConfig, MockConnector, MockProductBuilder};
pub use types::{DiscountCode, DiscountLabel, Product, SearchResults};

/// Catalog operations a supermarket connector provides.
pub trait Connector: Send + Sync + 'static {
    /// Search the catalog. `size` is the page size, `page` is zero based.
    fn search_products(
        &self,
        query: &str,
        size: u32,
        page: u32,
    ) -> impl Future<Output = Result<SearchResults, ConnectorError>> + Send;

    /// Fetch the category tree. The shape is owned by the retailer.
    fn get_categories(&self) -> impl Future<Output = Result<Value, ConnectorError>> + Send;
}
