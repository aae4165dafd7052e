//! Mock connector for unit testing.
//!
//! This module provides a connector that can be used in tests
//! without making real network requests.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::ConnectorError;

use super::types::{DiscountLabel, Product, SearchResults};
use super::Connector;

/// Configuration for mock connector behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Whether to fail search requests.
    pub fail_search: bool,
    /// Whether to fail category requests.
    pub fail_categories: bool,
    /// Simulated latency in milliseconds.
    pub latency_ms: u64,
}

/// Arguments of a recorded search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCall {
    /// Search text.
    pub query: String,
    /// Page size.
    pub size: u32,
    /// Page index.
    pub page: u32,
}

/// Mock connector for testing.
#[derive(Debug, Clone)]
pub struct MockConnector {
    /// Mock configuration.
    config: MockConfig,
    /// Products returned by every search.
    products: Arc<Mutex<Vec<Product>>>,
    /// Category payload.
    categories: Arc<Mutex<Value>>,
    /// Search calls received, oldest first.
    calls: Arc<Mutex<Vec<SearchCall>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockConnector {
    /// Create a new mock connector with default configuration.
    pub fn new() -> Self {
        Self::with_config(MockConfig::default())
    }

    /// Create a mock connector with custom configuration.
    pub fn with_config(config: MockConfig) -> Self {
        Self {
            config,
            products: Arc::new(Mutex::new(Vec::new())),
            categories: Arc::new(Mutex::new(Value::Array(Vec::new()))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a product to the search results.
    pub fn add_product(&self, product: Product) {
        lock(&self.products).push(product);
    }

    /// Set the category payload.
    pub fn set_categories(&self, categories: Value) {
        *lock(&self.categories) = categories;
    }

    /// Search calls received so far.
    pub fn search_calls(&self) -> Vec<SearchCall> {
        lock(&self.calls).clone()
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.latency_ms)).await;
        }
    }
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connector for MockConnector {
    async fn search_products(
        &self,
        query: &str,
        size: u32,
        page: u32,
    ) -> Result<SearchResults, ConnectorError> {
        lock(&self.calls).push(SearchCall {
            query: query.to_string(),
            size,
            page,
        });

        self.simulate_latency().await;

        if self.config.fail_search {
            return Err(ConnectorError::Unavailable(
                "Mock search failure".to_string(),
            ));
        }

        Ok(SearchResults::new(lock(&self.products).clone()))
    }

    async fn get_categories(&self) -> Result<Value, ConnectorError> {
        self.simulate_latency().await;

        if self.config.fail_categories {
            return Err(ConnectorError::Unavailable(
                "Mock categories failure".to_string(),
            ));
        }

        Ok(lock(&self.categories).clone())
    }
}

/// Builder for mock products.
#[derive(Debug, Clone, Default)]
pub struct MockProductBuilder {
    product: Product,
}

impl MockProductBuilder {
    /// Create a new builder for a product with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            product: Product {
                title: Some(title.into()),
                ..Product::default()
            },
        }
    }

    /// Set the pre-bonus price.
    pub fn price(mut self, price: Decimal) -> Self {
        self.product.price_before_bonus = Some(price);
        self
    }

    /// Append a discount label with the given code.
    pub fn discount(mut self, code: impl Into<String>) -> Self {
        self.product
            .discount_labels
            .get_or_insert_with(Vec::new)
            .push(DiscountLabel::new(code));
        self
    }

    /// Set the bonus description.
    pub fn bonus(mut self, mechanism: impl Into<String>) -> Self {
        self.product.bonus_mechanism = Some(mechanism.into());
        self
    }

    /// Set the sales unit size.
    pub fn unit_size(mut self, size: impl Into<String>) -> Self {
        self.product.sales_unit_size = Some(size.into());
        self
    }

    /// Set the unit price description.
    pub fn unit_price(mut self, description: impl Into<String>) -> Self {
        self.product.unit_price_description = Some(description.into());
        self
    }

    /// Set online availability.
    pub fn available_online(mut self, available: bool) -> Self {
        self.product.available_online = Some(available);
        self
    }

    /// Build the product.
    pub fn build(self) -> Product {
        self.product
    }
}
